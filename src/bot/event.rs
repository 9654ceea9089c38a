use crate::github::{CommitSha, GithubRepoName, PullRequestNumber};

#[derive(Debug)]
pub enum BotEvent {
    /// A pull request was opened, reopened or its description was edited.
    PullRequest(PullRequestEvent),
    /// A review comment was created on a line of a pull request diff.
    ReviewComment(ReviewCommentEvent),
}

impl BotEvent {
    pub fn repository(&self) -> &GithubRepoName {
        match self {
            BotEvent::PullRequest(event) => &event.repository,
            BotEvent::ReviewComment(event) => &event.repository,
        }
    }

    /// GitHub App installation through which the event was delivered.
    pub fn installation_id(&self) -> Option<u64> {
        match self {
            BotEvent::PullRequest(event) => event.installation_id,
            BotEvent::ReviewComment(event) => event.installation_id,
        }
    }

    pub fn pr_number(&self) -> PullRequestNumber {
        match self {
            BotEvent::PullRequest(event) => event.pr_number,
            BotEvent::ReviewComment(event) => event.pr_number,
        }
    }
}

#[derive(Debug)]
pub struct PullRequestEvent {
    pub repository: GithubRepoName,
    pub installation_id: Option<u64>,
    pub pr_number: PullRequestNumber,
    pub head_sha: CommitSha,
    pub body: Option<String>,
}

#[derive(Debug)]
pub struct ReviewCommentEvent {
    pub repository: GithubRepoName,
    pub installation_id: Option<u64>,
    pub pr_number: PullRequestNumber,
    pub head_sha: CommitSha,
    pub body: Option<String>,
    /// Path of the file the comment is attached to.
    pub path: String,
    /// Commit the comment was written against.
    pub commit_id: CommitSha,
    /// Line index into the diff, missing for outdated comments.
    pub position: Option<u64>,
}
