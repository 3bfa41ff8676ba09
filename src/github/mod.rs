use anyhow::anyhow;
use base64::{Engine, engine::general_purpose};
use octocrab::Octocrab;
use tracing::{debug, info, warn};

use crate::errors::{FlagError, Step};
use crate::repository::Repository;

pub mod types;

use types::contents::{ContentEntry, FileContent, FileUpdate, UpdateFileRequest};
use types::{Commit, CreatePullRequest, CreateRefRequest, GitRef, PullRequest, RefQuery};

/// Thin wrapper around an [`Octocrab`] client bound to the flag repository.
///
/// Every method maps to exactly one REST call and tags failures with the
/// [`Step`] they happened in.
pub struct Github {
    client: Octocrab,
    repository: Repository,
}

impl Github {
    /// Builds a client authenticated with a bearer token against `api_url`.
    pub fn new(token: &str, api_url: &str, repository: Repository) -> anyhow::Result<Self> {
        let client = Octocrab::builder()
            .base_uri(api_url)
            .map_err(|e| anyhow!("Invalid GitHub API url {}: {}", api_url, e))?
            .personal_token(token.to_string())
            .build()
            .map_err(|e| anyhow!("Failed to create GitHub client: {}", e))?;

        Ok(Self::with_client(client, repository))
    }

    pub fn with_client(client: Octocrab, repository: Repository) -> Self {
        Github { client, repository }
    }

    /// Returns the SHA at the tip of `branch`.
    pub async fn latest_commit(&self, branch: &str) -> Result<String, FlagError> {
        let commit: Commit = self
            .client
            .get(
                self.repository.api_route(&format!("commits/{branch}")),
                None::<&()>,
            )
            .await
            .map_err(FlagError::remote(Step::LatestCommit))?;

        debug!("Latest commit on {} is {}", branch, commit.sha);
        Ok(commit.sha)
    }

    /// Looks for a file called `name` in the repository root.
    ///
    /// Only the top level is listed; subdirectories are not searched.
    pub async fn find_file(
        &self,
        name: &str,
        git_ref: &str,
    ) -> Result<Option<ContentEntry>, FlagError> {
        let entries: Vec<ContentEntry> = self
            .client
            .get(
                self.repository.api_route("contents/"),
                Some(&RefQuery { git_ref }),
            )
            .await
            .map_err(FlagError::remote(Step::ListRoot))?;

        match entries.into_iter().find(|e| e.is_file() && e.name == name) {
            Some(entry) => {
                info!("File path found: {}", entry.path);
                Ok(Some(entry))
            }
            None => {
                warn!("File {} not found in {}", name, self.repository);
                Ok(None)
            }
        }
    }

    pub async fn get_file(&self, path: &str, git_ref: &str) -> Result<FileContent, FlagError> {
        self.client
            .get(
                self.repository.api_route(&format!("contents/{path}")),
                Some(&RefQuery { git_ref }),
            )
            .await
            .map_err(FlagError::remote(Step::FetchFile))
    }

    pub async fn create_branch(&self, branch: &str, sha: &str) -> Result<GitRef, FlagError> {
        let request = CreateRefRequest {
            git_ref: format!("refs/heads/{branch}"),
            sha,
        };
        let git_ref: GitRef = self
            .client
            .post(self.repository.api_route("git/refs"), Some(&request))
            .await
            .map_err(FlagError::remote(Step::CreateBranch))?;

        info!("Created branch {} at {}", git_ref.git_ref, git_ref.object.sha);
        Ok(git_ref)
    }

    /// Commits `content` to `path` on `branch`. `sha` is the blob SHA of the
    /// version being replaced; GitHub rejects the write if it is stale.
    pub async fn update_file(
        &self,
        path: &str,
        message: &str,
        content: &str,
        sha: &str,
        branch: &str,
    ) -> Result<FileUpdate, FlagError> {
        let request = UpdateFileRequest {
            message,
            content: general_purpose::STANDARD.encode(content),
            sha,
            branch,
        };
        let update: FileUpdate = self
            .client
            .put(
                self.repository.api_route(&format!("contents/{path}")),
                Some(&request),
            )
            .await
            .map_err(FlagError::remote(Step::UpdateFile))?;

        info!("Committed {} to {} ({})", path, branch, update.commit.sha);
        Ok(update)
    }

    pub async fn create_pull_request(
        &self,
        title: &str,
        head: &str,
        base: &str,
        body: &str,
    ) -> Result<PullRequest, FlagError> {
        let request = CreatePullRequest {
            title,
            head,
            base,
            body,
        };
        let pr: PullRequest = self
            .client
            .post(self.repository.api_route("pulls"), Some(&request))
            .await
            .map_err(FlagError::remote(Step::CreatePullRequest))?;

        info!("Opened pull request #{}: {}", pr.number, pr.html_url);
        Ok(pr)
    }
}

/// Decodes the base64 payload of a contents API response.
///
/// GitHub wraps the encoded text at 60 columns, so whitespace is dropped
/// before decoding.
pub fn decode_content(file: &FileContent) -> Result<String, FlagError> {
    let encoded = file
        .content
        .as_deref()
        .ok_or_else(|| FlagError::NotAFile(file.path.clone()))?;

    if let Some(encoding) = file.encoding.as_deref() {
        if encoding != "base64" {
            return Err(FlagError::NotAFile(file.path.clone()));
        }
    }

    let compact: String = encoded.chars().filter(|c| !c.is_whitespace()).collect();
    let bytes = general_purpose::STANDARD.decode(compact)?;
    Ok(String::from_utf8(bytes)?)
}
