use axum::async_trait;

use crate::github::{CommitSha, GithubRepoName, PullRequestNumber};

mod comment;
mod context;
mod error;
pub mod event;
mod handlers;
mod trigger;

pub use comment::{Comment, CommentTarget, ReviewAnchor};
pub use context::{BotContext, BotSettings};
pub use error::{BotError, UpstreamApi};
pub use handlers::handle_bot_event;
pub use trigger::{detect_actions, Action, Trigger};

/// A file changed by a pull request, decoded into text.
#[derive(Clone, Debug)]
pub struct ChangedFile {
    pub filename: String,
    pub content: String,
}

/// Provides functionality for working with a remote repository.
#[async_trait]
pub trait RepositoryClient: Send + Sync {
    fn repository(&self) -> &GithubRepoName;

    /// Return names of files changed by the pull request, in the order reported by GitHub.
    async fn list_changed_files(&self, pr: PullRequestNumber) -> Result<Vec<String>, BotError>;

    /// Load the content of the file at `path` as of commit `sha`, decoded into text.
    async fn get_file_content(&self, path: &str, sha: &CommitSha) -> Result<String, BotError>;

    /// Post a comment to the conversation of the pull request with the given number.
    async fn post_comment(&self, pr: PullRequestNumber, comment: Comment) -> anyhow::Result<()>;

    /// Post a review comment attached to the given diff location.
    async fn post_review_comment(
        &self,
        pr: PullRequestNumber,
        anchor: &ReviewAnchor,
        comment: Comment,
    ) -> anyhow::Result<()>;
}

/// Creates repository clients for incoming events.
/// It is behind a trait to allow easier mocking in tests.
pub trait RepositoryLoader: Send + Sync + 'static {
    type Client: RepositoryClient;

    /// Create a client for `repo`, authenticated through the given app installation.
    fn load_repository(
        &self,
        repo: &GithubRepoName,
        installation_id: Option<u64>,
    ) -> anyhow::Result<Self::Client>;
}
