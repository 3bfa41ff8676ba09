use anyhow::{Result, anyhow};

use crate::repository::Repository;
use crate::rollout::{RolloutSettings, branch};

/// Everything the server needs at startup, assembled by the CLI.
#[derive(Debug)]
pub struct ServerConfig {
    pub address: std::net::Ipv4Addr,
    pub port: u16,
    pub github_token: String,
    pub github_api_url: String,
    pub repository: Repository,
    pub rollout: RolloutSettings,
}

impl ServerConfig {
    pub fn validate(&self) -> Result<()> {
        if self.github_token.trim().is_empty() {
            return Err(anyhow!("GitHub token must not be empty"));
        }
        let url = self.github_api_url.as_str();
        if !url.starts_with("http://") && !url.starts_with("https://") {
            return Err(anyhow!(
                "GitHub API url must be http(s), got '{}'",
                self.github_api_url
            ));
        }
        if self.rollout.base_branch.trim().is_empty() {
            return Err(anyhow!("Base branch must not be empty"));
        }
        if !branch::is_valid_prefix(&self.rollout.branch_prefix) {
            return Err(anyhow!(
                "Invalid branch prefix '{}'",
                self.rollout.branch_prefix
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> ServerConfig {
        ServerConfig {
            address: std::net::Ipv4Addr::LOCALHOST,
            port: 3000,
            github_token: "token".to_string(),
            github_api_url: "https://api.github.com".to_string(),
            repository: Repository::new("acme", "flags"),
            rollout: RolloutSettings::default(),
        }
    }

    #[test]
    fn test_valid_config() {
        assert!(config().validate().is_ok());
    }

    #[test]
    fn test_rejects_empty_token() {
        let mut c = config();
        c.github_token = "  ".to_string();
        assert!(c.validate().is_err());
    }

    #[test]
    fn test_rejects_bad_api_url() {
        let mut c = config();
        c.github_api_url = "api.github.com".to_string();
        assert!(c.validate().is_err());
    }

    #[test]
    fn test_rejects_bad_branch_settings() {
        let mut c = config();
        c.rollout.branch_prefix = "bad prefix".to_string();
        assert!(c.validate().is_err());

        let mut c = config();
        c.rollout.base_branch = String::new();
        assert!(c.validate().is_err());
    }
}
