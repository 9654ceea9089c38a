use base64::Engine;
use octocrab::Octocrab;
use serde::Serialize;
use serde_json::json;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use crate::github::api::client::GithubRepositoryClient;
use crate::github::GithubRepoName;
use crate::tests::event::default_head_sha;
use crate::tests::state::default_repo_name;

/// Simulates the parts of the GitHub REST API used by the bot for the default repository.
pub struct GitHubMockServer {
    mock_server: MockServer,
    repo: GithubRepoName,
}

/// Returns type for the `GET /repos/{owner}/{repo}/pulls/{pr}/files` endpoint
#[derive(Serialize)]
struct PullRequestFile {
    sha: String,
    filename: String,
    status: String,
    additions: u64,
    deletions: u64,
    changes: u64,
}

impl PullRequestFile {
    fn new(filename: &str) -> Self {
        Self {
            sha: "bbcd538c8e72b8c175046e27cc8f907076331401".to_string(),
            filename: filename.to_string(),
            status: "added".to_string(),
            additions: 1,
            deletions: 0,
            changes: 1,
        }
    }
}

/// Returns type for the `GET /repos/{owner}/{repo}/contents/{path}` endpoint
#[derive(Serialize)]
struct Content {
    name: String,
    path: String,
    sha: String,
    size: usize,
    r#type: String,
    encoding: String,
    content: String,
}

impl Content {
    fn new(path: &str, text: &str) -> Self {
        let encoded = base64::prelude::BASE64_STANDARD.encode(text);
        // GitHub splits the encoded content into lines of 60 characters
        let content = encoded
            .as_bytes()
            .chunks(60)
            .map(|chunk| format!("{}\n", String::from_utf8_lossy(chunk)))
            .collect();
        Content {
            name: path.rsplit('/').next().unwrap_or(path).to_string(),
            path: path.to_string(),
            sha: "3d21ec53a331a6f037a91c368710b99387d012c1".to_string(),
            size: text.len(),
            r#type: "file".to_string(),
            encoding: "base64".to_string(),
            content,
        }
    }
}

impl GitHubMockServer {
    pub async fn start() -> Self {
        Self {
            mock_server: MockServer::start().await,
            repo: default_repo_name(),
        }
    }

    pub fn head_sha() -> String {
        default_head_sha()
    }

    pub fn client(&self) -> Octocrab {
        Octocrab::builder()
            .base_uri(self.mock_server.uri())
            .unwrap()
            .personal_token("test-token".to_string())
            .build()
            .unwrap()
    }

    pub fn repo_client(&self) -> GithubRepositoryClient {
        GithubRepositoryClient::new(self.client(), self.repo.clone())
    }

    /// Mounts the file listing of the pull request and the content of every file at the
    /// head commit.
    pub async fn mock_files(&self, pr: u64, files: &[(&str, &str)]) {
        let names: Vec<String> = files.iter().map(|(name, _)| name.to_string()).collect();
        self.mock_file_listing(pr, &names).await;

        for (name, text) in files {
            self.mock_file_content(name, name, text).await;
        }
    }

    /// Serves the content of the file `name` at the head commit from the contents route
    /// `encoded_path`, which must be written in its percent-encoded form.
    pub async fn mock_file_content(&self, encoded_path: &str, name: &str, text: &str) {
        Mock::given(method("GET"))
            .and(path(format!("/repos/{}/contents/{encoded_path}", self.repo)))
            .and(query_param("ref", Self::head_sha()))
            .respond_with(ResponseTemplate::new(200).set_body_json(Content::new(name, text)))
            .mount(&self.mock_server)
            .await;
    }

    /// Mounts the file listing of the pull request, split into pages of 100 files.
    pub async fn mock_file_listing(&self, pr: u64, names: &[String]) {
        let mut pages: Vec<&[String]> = names.chunks(100).collect();
        if pages.is_empty() {
            pages.push(names);
        }
        let page_count = pages.len();
        for (index, page) in pages.into_iter().enumerate() {
            let files: Vec<PullRequestFile> =
                page.iter().map(|name| PullRequestFile::new(name)).collect();
            Mock::given(method("GET"))
                .and(path(format!("/repos/{}/pulls/{pr}/files", self.repo)))
                .and(query_param("page", (index + 1).to_string()))
                .respond_with(ResponseTemplate::new(200).set_body_json(files))
                .mount(&self.mock_server)
                .await;
        }
        // A full last page makes the client ask for one more
        if names.len() == page_count * 100 {
            Mock::given(method("GET"))
                .and(path(format!("/repos/{}/pulls/{pr}/files", self.repo)))
                .and(query_param("page", (page_count + 1).to_string()))
                .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
                .mount(&self.mock_server)
                .await;
        }
    }

    /// Accepts both issue comments and review comments on the pull request.
    pub async fn mock_comments(&self, pr: u64) {
        Mock::given(method("POST"))
            .and(path(format!("/repos/{}/issues/{pr}/comments", self.repo)))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({ "id": 1 })))
            .mount(&self.mock_server)
            .await;
        Mock::given(method("POST"))
            .and(path(format!("/repos/{}/pulls/{pr}/comments", self.repo)))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({ "id": 2 })))
            .mount(&self.mock_server)
            .await;
    }

    /// Bodies of issue comments created so far.
    pub async fn issue_comments(&self) -> Vec<serde_json::Value> {
        self.posted_to("/issues/").await
    }

    /// Bodies of review comments created so far.
    pub async fn review_comments(&self) -> Vec<serde_json::Value> {
        self.posted_to("/pulls/").await
    }

    async fn posted_to(&self, segment: &str) -> Vec<serde_json::Value> {
        self.mock_server
            .received_requests()
            .await
            .unwrap_or_default()
            .into_iter()
            .filter(|request| {
                request.method.as_str() == "POST" && request.url.path().contains(segment)
            })
            .map(|request| request.body_json().unwrap())
            .collect()
    }
}
