use std::sync::{Arc, LazyLock};

use regex::Regex;
use tracing::{Instrument, info, info_span};
use uuid::Uuid;

use crate::errors::FlagError;
use crate::flag::{self, DefaultVariation, FlagChange};
use crate::github::{self, Github};

pub mod branch;

const MAX_FLAG_NAME_LEN: usize = 100;

static FLAG_NAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9][A-Za-z0-9._-]*$").unwrap());

/// Repository-wide knobs for a rollout.
#[derive(Debug, Clone)]
pub struct RolloutSettings {
    pub base_branch: String,
    pub branch_prefix: String,
    pub default_variation: DefaultVariation,
}

impl Default for RolloutSettings {
    fn default() -> Self {
        Self {
            base_branch: "main".to_string(),
            branch_prefix: branch::DEFAULT_BRANCH_PREFIX.to_string(),
            default_variation: DefaultVariation::default(),
        }
    }
}

/// A validated webhook request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RolloutRequest {
    pub issue_key: String,
    pub flag_name: String,
    pub change: FlagChange,
}

impl RolloutRequest {
    pub fn new(
        issue_key: &str,
        flag_name: &str,
        release_version: Option<&str>,
    ) -> Result<Self, FlagError> {
        let issue_key = issue_key.trim();
        if issue_key.is_empty() {
            return Err(FlagError::InvalidRequest("issueKey is empty".to_string()));
        }

        let flag_name = flag_name.trim();
        if flag_name.len() > MAX_FLAG_NAME_LEN
            || !FLAG_NAME.is_match(flag_name)
            || flag_name.contains("..")
        {
            return Err(FlagError::InvalidRequest(format!(
                "'{flag_name}' is not a valid feature flag name"
            )));
        }

        Ok(Self {
            issue_key: issue_key.to_string(),
            flag_name: flag_name.to_string(),
            change: FlagChange::from_release(release_version),
        })
    }

    pub fn file_name(&self) -> String {
        format!("{}.json", self.flag_name)
    }

    pub fn commit_message(&self) -> String {
        format!("Turn on flag for {}", self.issue_key)
    }

    pub fn pull_request_title(&self) -> String {
        format!("{} > PR for Feature Flags", self.issue_key)
    }

    pub fn pull_request_body(&self) -> String {
        format!(
            "This PR contains changes for feature flags as part of Jira issue {}.",
            self.issue_key
        )
    }
}

#[derive(Debug, Clone)]
pub struct RolloutOutcome {
    pub branch: String,
    pub pr_number: u64,
    pub pr_url: String,
}

/// Turns one webhook request into a pull request against the flag repository.
pub struct FlagRollout {
    github: Arc<Github>,
    settings: RolloutSettings,
}

impl FlagRollout {
    pub fn new(github: Arc<Github>, settings: RolloutSettings) -> Self {
        FlagRollout { github, settings }
    }

    pub async fn run(&self, request: &RolloutRequest) -> Result<RolloutOutcome, FlagError> {
        let span = info_span!(
            "rollout",
            request_id = %Uuid::new_v4(),
            issue = %request.issue_key,
            flag = %request.flag_name,
        );
        self.execute(request).instrument(span).await
    }

    async fn execute(&self, request: &RolloutRequest) -> Result<RolloutOutcome, FlagError> {
        let gh = &self.github;
        let base = self.settings.base_branch.as_str();

        let head_sha = gh.latest_commit(base).await?;

        // Everything that can fail on our side happens before the branch
        // exists, so a bad flag name or document leaves nothing behind.
        let file_name = request.file_name();
        let entry = gh
            .find_file(&file_name, base)
            .await?
            .ok_or_else(|| FlagError::FlagFileNotFound(file_name.clone()))?;

        let file = gh.get_file(&entry.path, base).await?;
        let mut doc = flag::parse_document(&github::decode_content(&file)?)?;
        flag::apply_change(&mut doc, &request.change, self.settings.default_variation)?;
        let content = flag::format_document(&doc)?;

        let branch = branch::branch_name(&self.settings.branch_prefix);
        gh.create_branch(&branch, &head_sha).await?;

        gh.update_file(
            &file.path,
            &request.commit_message(),
            &content,
            &file.sha,
            &branch,
        )
        .await?;

        let pr = gh
            .create_pull_request(
                &request.pull_request_title(),
                &branch,
                base,
                &request.pull_request_body(),
            )
            .await?;

        info!("Flag {} rolled out in {}", request.flag_name, pr.html_url);

        Ok(RolloutOutcome {
            branch,
            pr_number: pr.number,
            pr_url: pr.html_url,
        })
    }
}
