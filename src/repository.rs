use std::str::FromStr;

/// Identifies the GitHub repository that holds the feature flag documents.
///
/// The service is configured with a single repository in "owner/repo" format;
/// this struct keeps the two components apart so they can be spliced into
/// REST routes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Repository {
    pub owner: String,
    pub name: String,
}

impl Repository {
    /// Creates a new Repository instance.
    ///
    /// # Arguments
    ///
    /// * `owner` - The repository owner (username or organization)
    /// * `name` - The repository name
    pub fn new(owner: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            name: name.into(),
        }
    }

    /// Returns the repository in "owner/repo" format.
    pub fn full_name(&self) -> String {
        format!("{}/{}", self.owner, self.name)
    }

    /// Parses a "owner/repo" string into a Repository.
    ///
    /// Returns `None` when either component is empty or the name itself
    /// contains a '/'.
    pub fn parse(full_name: &str) -> Option<Self> {
        let (owner, name) = full_name.trim().split_once('/')?;
        if owner.is_empty() || name.is_empty() || name.contains('/') {
            return None;
        }
        Some(Self::new(owner, name))
    }

    /// Builds the REST route for a path below `/repos/{owner}/{repo}`.
    pub fn api_route(&self, suffix: &str) -> String {
        format!("/repos/{}/{}/{}", self.owner, self.name, suffix)
    }
}

impl std::fmt::Display for Repository {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.full_name())
    }
}

impl FromStr for Repository {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| format!("expected repository as owner/repo, got '{s}'"))
    }
}
