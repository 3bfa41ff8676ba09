use serde::{Deserialize, Serialize};

pub mod contents;

/// The subset of `GET /repos/{owner}/{repo}/commits/{ref}` we need.
#[derive(Deserialize, Serialize, Debug)]
pub struct Commit {
    pub sha: String,
}

#[derive(Serialize, Debug)]
pub struct CreateRefRequest<'a> {
    #[serde(rename = "ref")]
    pub git_ref: String,
    pub sha: &'a str,
}

#[derive(Deserialize, Serialize, Debug)]
pub struct GitRef {
    #[serde(rename = "ref")]
    pub git_ref: String,
    pub object: GitObject,
}

#[derive(Deserialize, Serialize, Debug)]
pub struct GitObject {
    pub sha: String,
}

#[derive(Serialize, Debug)]
pub struct CreatePullRequest<'a> {
    pub title: &'a str,
    pub head: &'a str,
    pub base: &'a str,
    pub body: &'a str,
}

#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct PullRequest {
    pub number: u64,
    pub html_url: String,
}

/// Query string for endpoints that accept a `ref`.
#[derive(Serialize, Debug)]
pub struct RefQuery<'a> {
    #[serde(rename = "ref")]
    pub git_ref: &'a str,
}
