use chrono::{DateTime, Utc};
use rand::Rng;
use regex::Regex;
use std::sync::LazyLock;

pub const DEFAULT_BRANCH_PREFIX: &str = "testbranch";

const SUFFIX_RANGE: u32 = 1_000_000;

static REF_FRAGMENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9][A-Za-z0-9._/-]*$").unwrap());

/// Builds a branch name of the form `<prefix><yyyymmddHHMMSS><6 random digits>`.
///
/// The suffix is always 20 digits, so names sort by creation time and two
/// requests in the same second only collide if they also draw the same
/// random number.
pub fn branch_name(prefix: &str) -> String {
    let suffix = rand::thread_rng().gen_range(0..SUFFIX_RANGE);
    branch_name_at(prefix, Utc::now(), suffix)
}

fn branch_name_at(prefix: &str, at: DateTime<Utc>, suffix: u32) -> String {
    format!("{prefix}{}{suffix:06}", at.format("%Y%m%d%H%M%S"))
}

/// Whether `prefix` can start a git branch name.
pub fn is_valid_prefix(prefix: &str) -> bool {
    REF_FRAGMENT.is_match(prefix) && !prefix.contains("..") && !prefix.ends_with('/')
}
