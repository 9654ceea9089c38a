use base64::Engine;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::bot::{BotError, ReviewAnchor};
use crate::github::api::client::GithubRepositoryClient;
use crate::github::{CommitSha, GithubRepoName, PullRequestNumber};

/// Maximum page size allowed by the GitHub API.
const FILES_PER_PAGE: usize = 100;

#[derive(Serialize)]
struct PageParams {
    per_page: usize,
    page: u32,
}

#[derive(Deserialize)]
struct PullRequestFile {
    filename: String,
}

/// Lists names of all files changed by the given pull request.
///
/// Documentation: https://docs.github.com/en/rest/pulls/pulls?apiVersion=2022-11-28#list-pull-requests-files
pub async fn list_pull_request_files(
    repo: &GithubRepositoryClient,
    pr: PullRequestNumber,
) -> Result<Vec<String>, octocrab::Error> {
    let url = format!("/repos/{}/pulls/{pr}/files", repo.name());

    let mut files = vec![];
    let mut page = 1;
    loop {
        let params = PageParams {
            per_page: FILES_PER_PAGE,
            page,
        };
        let batch: Vec<PullRequestFile> = repo.client().get(&url, Some(&params)).await?;
        let last_page = batch.len() < FILES_PER_PAGE;
        files.extend(batch.into_iter().map(|file| file.filename));
        if last_page {
            break;
        }
        page += 1;
    }
    tracing::trace!("Pull request {pr} changes files {files:?}");
    Ok(files)
}

#[derive(Serialize)]
struct ContentParams<'a> {
    #[serde(rename = "ref")]
    reference: &'a str,
}

#[derive(Deserialize, Debug)]
pub struct FileContent {
    encoding: Option<String>,
    content: Option<String>,
}

/// Loads the content of a file as of the given commit.
///
/// Documentation: https://docs.github.com/en/rest/repos/contents?apiVersion=2022-11-28#get-repository-content
pub async fn get_file_content(
    repo: &GithubRepositoryClient,
    path: &str,
    sha: &CommitSha,
) -> anyhow::Result<FileContent> {
    let url = contents_route(repo.name(), path)?;
    let content = repo
        .client()
        .get(
            &url,
            Some(&ContentParams {
                reference: sha.as_str(),
            }),
        )
        .await?;
    Ok(content)
}

/// Route of the contents endpoint for `path`.
///
/// Every segment of the path is percent-encoded on its own, so that names containing spaces,
/// `#`, `?` or `%` address the right file.
fn contents_route(repo: &GithubRepoName, path: &str) -> anyhow::Result<String> {
    let mut url = Url::parse("https://api.github.com/")?;
    url.path_segments_mut()
        .map_err(|_| anyhow::anyhow!("Cannot build contents route for {path}"))?
        .clear()
        .extend(["repos", repo.owner(), repo.name(), "contents"])
        .extend(path.split('/'));
    Ok(url.path().to_string())
}

/// Decodes base64 file content returned by the contents API into text.
pub fn decode_file_content(path: &str, file: FileContent) -> Result<String, BotError> {
    let decode_error = |reason: String| BotError::Decode {
        path: path.to_string(),
        reason,
    };

    match file.encoding.as_deref() {
        Some("base64") | None => {}
        Some(encoding) => return Err(decode_error(format!("unsupported encoding `{encoding}`"))),
    }
    let Some(content) = file.content else {
        return Err(decode_error("file has no content".to_string()));
    };

    // GitHub wraps the encoded content into lines
    let content: String = content
        .chars()
        .filter(|c| !c.is_ascii_whitespace())
        .collect();
    let bytes = base64::prelude::BASE64_STANDARD
        .decode(content)
        .map_err(|error| decode_error(format!("invalid base64: {error}")))?;
    String::from_utf8(bytes).map_err(|error| decode_error(format!("invalid UTF-8: {error}")))
}

#[derive(Serialize)]
struct IssueCommentRequest<'a> {
    body: &'a str,
}

/// Posts a comment to the conversation of a pull request.
///
/// Documentation: https://docs.github.com/en/rest/issues/comments?apiVersion=2022-11-28#create-an-issue-comment
pub async fn create_issue_comment(
    repo: &GithubRepositoryClient,
    pr: PullRequestNumber,
    body: &str,
) -> Result<(), octocrab::Error> {
    let url = format!("/repos/{}/issues/{pr}/comments", repo.name());
    let _: serde_json::Value = repo
        .client()
        .post(url, Some(&IssueCommentRequest { body }))
        .await?;
    Ok(())
}

#[derive(Serialize)]
struct ReviewCommentRequest<'a> {
    body: &'a str,
    commit_id: &'a str,
    path: &'a str,
    position: Option<u64>,
}

/// Posts a review comment attached to a diff location of a pull request.
///
/// Documentation: https://docs.github.com/en/rest/pulls/comments?apiVersion=2022-11-28#create-a-review-comment-for-a-pull-request
pub async fn create_review_comment(
    repo: &GithubRepositoryClient,
    pr: PullRequestNumber,
    anchor: &ReviewAnchor,
    body: &str,
) -> Result<(), octocrab::Error> {
    let url = format!("/repos/{}/pulls/{pr}/comments", repo.name());
    let request = ReviewCommentRequest {
        body,
        commit_id: anchor.commit_id.as_str(),
        path: &anchor.path,
        position: anchor.position,
    };
    let _: serde_json::Value = repo.client().post(url, Some(&request)).await?;
    Ok(())
}
