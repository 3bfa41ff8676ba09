use std::fmt;

/// The GitHub call a remote failure happened in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    LatestCommit,
    ListRoot,
    FetchFile,
    CreateBranch,
    UpdateFile,
    CreatePullRequest,
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Step::LatestCommit => "fetch latest commit",
            Step::ListRoot => "list repository root",
            Step::FetchFile => "fetch flag file",
            Step::CreateBranch => "create branch",
            Step::UpdateFile => "update flag file",
            Step::CreatePullRequest => "create pull request",
        };
        f.write_str(s)
    }
}

#[derive(thiserror::Error, Debug)]
pub enum FlagError {
    #[error("GitHub request failed during '{step}': {source}")]
    Remote {
        step: Step,
        #[source]
        source: octocrab::Error,
    },
    #[error("no file named '{0}' in the repository root")]
    FlagFileNotFound(String),
    #[error("'{0}' has no file content")]
    NotAFile(String),
    #[error("flag file is not valid base64: {0}")]
    Decode(#[from] base64::DecodeError),
    #[error("flag file is not valid UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
    #[error("flag file is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("malformed flag document: {0}")]
    MalformedDocument(String),
    #[error("invalid request: {0}")]
    InvalidRequest(String),
}

impl FlagError {
    pub fn remote(step: Step) -> impl FnOnce(octocrab::Error) -> FlagError {
        move |source| FlagError::Remote { step, source }
    }

    /// True for errors caused by the caller's input rather than by GitHub or
    /// the flag document.
    pub fn is_client_error(&self) -> bool {
        matches!(self, FlagError::InvalidRequest(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_step_display() {
        assert_eq!(Step::CreateBranch.to_string(), "create branch");
        assert_eq!(Step::CreatePullRequest.to_string(), "create pull request");
    }

    #[test]
    fn test_error_messages() {
        let err = FlagError::FlagFileNotFound("demo.json".to_string());
        assert_eq!(err.to_string(), "no file named 'demo.json' in the repository root");

        let err = FlagError::MalformedDocument("missing `environments`".to_string());
        assert!(err.to_string().starts_with("malformed flag document"));
    }

    #[test]
    fn test_is_client_error() {
        assert!(FlagError::InvalidRequest("empty".into()).is_client_error());
        assert!(!FlagError::FlagFileNotFound("x.json".into()).is_client_error());
    }
}
