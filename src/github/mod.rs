//! GitHub transport of the bot: webhook intake, the REST client and the identifiers shared by
//! both.
use std::fmt::{Display, Formatter};

pub mod api;
pub mod server;
mod webhook;

pub use webhook::WebhookSecret;

/// Repository that a webhook was delivered for, normalized to lowercase.
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct GithubRepoName {
    owner: String,
    name: String,
}

impl GithubRepoName {
    pub fn new(owner: &str, name: &str) -> Self {
        Self {
            owner: owner.to_lowercase(),
            name: name.to_lowercase(),
        }
    }

    pub fn owner(&self) -> &str {
        &self.owner
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl Display for GithubRepoName {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}

/// Commit that file contents are read at, or that a review comment is anchored to.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CommitSha(pub String);

impl CommitSha {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for CommitSha {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PullRequestNumber(pub u64);

impl From<u64> for PullRequestNumber {
    fn from(number: u64) -> Self {
        Self(number)
    }
}

impl Display for PullRequestNumber {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repo_name_is_lowercased() {
        let repo = GithubRepoName::new("Octo-Org", "Playground");
        assert_eq!(repo.owner(), "octo-org");
        assert_eq!(repo.to_string(), "octo-org/playground");
    }

    #[test]
    fn commit_sha_display() {
        let sha = CommitSha("e5bd3914".to_string());
        assert_eq!(sha.as_str(), "e5bd3914");
        assert_eq!(sha.to_string(), "e5bd3914");
    }
}
