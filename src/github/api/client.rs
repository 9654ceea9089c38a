use anyhow::Context;
use axum::async_trait;
use octocrab::Octocrab;

use crate::bot::{BotError, Comment, RepositoryClient, ReviewAnchor, UpstreamApi};
use crate::github::api::operations::{
    create_issue_comment, create_review_comment, decode_file_content, get_file_content,
    list_pull_request_files,
};
use crate::github::{CommitSha, GithubRepoName, PullRequestNumber};

/// Provides access to a single repository using the GitHub API.
pub struct GithubRepositoryClient {
    /// The client caches the access token of the app installation and refreshes it once it
    /// expires.
    client: Octocrab,
    repo_name: GithubRepoName,
}

impl GithubRepositoryClient {
    pub fn new(client: Octocrab, repo_name: GithubRepoName) -> Self {
        Self { client, repo_name }
    }

    pub fn client(&self) -> &Octocrab {
        &self.client
    }

    pub fn name(&self) -> &GithubRepoName {
        &self.repo_name
    }

    fn format_pr(&self, pr: PullRequestNumber) -> String {
        format!("{}/{}/{}", self.name().owner(), self.name().name(), pr)
    }
}

#[async_trait]
impl RepositoryClient for GithubRepositoryClient {
    fn repository(&self) -> &GithubRepoName {
        self.name()
    }

    async fn list_changed_files(&self, pr: PullRequestNumber) -> Result<Vec<String>, BotError> {
        list_pull_request_files(self, pr).await.map_err(|error| {
            BotError::upstream(
                UpstreamApi::GitHub,
                anyhow::Error::from(error)
                    .context(format!("Cannot list files of {}", self.format_pr(pr))),
            )
        })
    }

    async fn get_file_content(&self, path: &str, sha: &CommitSha) -> Result<String, BotError> {
        let content = get_file_content(self, path, sha).await.map_err(|error| {
            BotError::upstream(
                UpstreamApi::GitHub,
                error.context(format!("Cannot load {path} at {sha}")),
            )
        })?;
        decode_file_content(path, content)
    }

    /// The comment will be posted as the GitHub App user of the bot.
    async fn post_comment(&self, pr: PullRequestNumber, comment: Comment) -> anyhow::Result<()> {
        create_issue_comment(self, pr, comment.render())
            .await
            .with_context(|| format!("Cannot post comment to {}", self.format_pr(pr)))?;
        Ok(())
    }

    async fn post_review_comment(
        &self,
        pr: PullRequestNumber,
        anchor: &ReviewAnchor,
        comment: Comment,
    ) -> anyhow::Result<()> {
        create_review_comment(self, pr, anchor, comment.render())
            .await
            .with_context(|| {
                format!(
                    "Cannot post review comment on {} to {}",
                    anchor.path,
                    self.format_pr(pr)
                )
            })?;
        Ok(())
    }
}
