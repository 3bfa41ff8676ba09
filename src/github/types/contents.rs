use serde::{Deserialize, Serialize};

/// One entry of a directory listing from the contents API.
#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct ContentEntry {
    pub name: String,
    pub path: String,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub sha: Option<String>,
}

impl ContentEntry {
    pub fn is_file(&self) -> bool {
        self.kind == "file"
    }
}

/// A single file as returned by the contents API. `content` is base64 with
/// embedded newlines.
#[derive(Deserialize, Serialize, Debug)]
pub struct FileContent {
    pub path: String,
    pub sha: String,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub encoding: Option<String>,
}

#[derive(Serialize, Debug)]
pub struct UpdateFileRequest<'a> {
    pub message: &'a str,
    pub content: String,
    pub sha: &'a str,
    pub branch: &'a str,
}

#[derive(Deserialize, Serialize, Debug)]
pub struct FileUpdate {
    pub commit: CommitSummary,
}

#[derive(Deserialize, Serialize, Debug)]
pub struct CommitSummary {
    pub sha: String,
}
