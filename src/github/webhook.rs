use axum::async_trait;
use axum::body::Bytes;
use axum::extract::{FromRequest, Request};
use axum::http::request::Parts;
use axum::http::{HeaderMap, HeaderValue, StatusCode};
use hmac::{Hmac, Mac};
use secrecy::{ExposeSecret, SecretString};
use sha2::Sha256;

use crate::bot::event::{BotEvent, PullRequestEvent, ReviewCommentEvent};
use crate::github::server::ServerStateRef;
use crate::github::{CommitSha, GithubRepoName};

/// Webhooks larger than this are rejected.
const WEBHOOK_BODY_LIMIT: usize = 25 * 1024 * 1024;

#[derive(serde::Deserialize, Debug)]
struct WebhookUser {
    login: String,
}

#[derive(serde::Deserialize, Debug)]
struct WebhookRepository {
    name: String,
    owner: WebhookUser,
}

#[derive(serde::Deserialize, Debug)]
struct WebhookInstallation {
    id: u64,
}

#[derive(serde::Deserialize, Debug)]
struct HeadPayload {
    sha: String,
}

#[derive(serde::Deserialize, Debug)]
struct PullRequestPayload {
    number: u64,
    body: Option<String>,
    head: HeadPayload,
}

#[derive(serde::Deserialize, Debug)]
struct WebhookPullRequest<'a> {
    action: &'a str,
    number: u64,
    pull_request: PullRequestPayload,
    repository: WebhookRepository,
    installation: Option<WebhookInstallation>,
}

#[derive(serde::Deserialize, Debug)]
struct ReviewCommentPayload {
    body: Option<String>,
    path: String,
    commit_id: String,
    position: Option<u64>,
}

#[derive(serde::Deserialize, Debug)]
struct WebhookReviewComment<'a> {
    action: &'a str,
    comment: ReviewCommentPayload,
    pull_request: PullRequestPayload,
    repository: WebhookRepository,
    installation: Option<WebhookInstallation>,
}

/// axum extractor for GitHub webhook events.
#[derive(Debug)]
pub struct GitHubWebhook(pub BotEvent);

/// Extracts a webhook event from a HTTP request.
#[async_trait]
impl FromRequest<ServerStateRef> for GitHubWebhook {
    type Rejection = StatusCode;

    async fn from_request(
        request: Request,
        state: &ServerStateRef,
    ) -> Result<Self, Self::Rejection> {
        let (parts, body) = request.into_parts();

        // Eagerly load body
        let body: Bytes = axum::body::to_bytes(body, WEBHOOK_BODY_LIMIT)
            .await
            .map_err(|error| {
                tracing::error!("Parsing webhook body failed: {error:?}");
                StatusCode::BAD_REQUEST
            })?;

        // Verify that the request is valid
        if !verify_gh_signature(&parts.headers, &body, state.get_webhook_secret()) {
            tracing::error!("Webhook request failed, could not authenticate webhook");
            return Err(StatusCode::BAD_REQUEST);
        }

        // Parse webhook content
        match parse_webhook_event(parts, &body) {
            Ok(Some(event)) => Ok(GitHubWebhook(event)),
            Ok(None) => Err(StatusCode::OK),
            Err(error) => {
                tracing::error!("Cannot parse webhook event: {error:?}");
                Err(StatusCode::BAD_REQUEST)
            }
        }
    }
}

fn parse_webhook_event(request: Parts, body: &[u8]) -> anyhow::Result<Option<BotEvent>> {
    let Some(event_type) = request.headers.get("x-github-event") else {
        return Err(anyhow::anyhow!("x-github-event header not found"));
    };

    match event_type.as_bytes() {
        b"pull_request" => {
            let payload: WebhookPullRequest = serde_json::from_slice(body)?;
            if !matches!(payload.action, "opened" | "reopened" | "edited") {
                tracing::debug!("Ignoring pull request action {}", payload.action);
                return Ok(None);
            }
            Ok(Some(BotEvent::PullRequest(PullRequestEvent {
                repository: parse_repository_name(&payload.repository),
                installation_id: payload.installation.map(|installation| installation.id),
                pr_number: payload.number.into(),
                head_sha: CommitSha(payload.pull_request.head.sha),
                body: payload.pull_request.body,
            })))
        }
        b"pull_request_review_comment" => {
            let payload: WebhookReviewComment = serde_json::from_slice(body)?;
            if payload.action != "created" {
                tracing::debug!("Ignoring review comment action {}", payload.action);
                return Ok(None);
            }
            Ok(Some(BotEvent::ReviewComment(ReviewCommentEvent {
                repository: parse_repository_name(&payload.repository),
                installation_id: payload.installation.map(|installation| installation.id),
                pr_number: payload.pull_request.number.into(),
                head_sha: CommitSha(payload.pull_request.head.sha),
                body: payload.comment.body,
                path: payload.comment.path,
                commit_id: CommitSha(payload.comment.commit_id),
                position: payload.comment.position,
            })))
        }
        _ => {
            tracing::debug!("Ignoring unknown event type {:?}", event_type.to_str());
            Ok(None)
        }
    }
}

fn parse_repository_name(repository: &WebhookRepository) -> GithubRepoName {
    GithubRepoName::new(&repository.owner.login, &repository.name)
}

type HmacSha256 = Hmac<Sha256>;

/// Verifies that the request is properly signed by GitHub with SHA-256 and the passed `secret`.
fn verify_gh_signature(
    headers: &HeaderMap<HeaderValue>,
    body: &[u8],
    secret: &WebhookSecret,
) -> bool {
    let Some(signature) = headers.get("x-hub-signature-256").map(|v| v.as_bytes()) else {
        return false;
    };
    let Some(signature) = signature
        .get(b"sha256=".len()..)
        .and_then(|v| hex::decode(v).ok())
    else {
        return false;
    };

    let Ok(mut mac) = HmacSha256::new_from_slice(secret.expose().as_bytes()) else {
        return false;
    };
    mac.update(body);
    mac.verify_slice(&signature).is_ok()
}

/// Wrapper for a secret which is zeroed on drop and can be exposed only through the
/// [`WebhookSecret::expose`] method.
pub struct WebhookSecret(SecretString);

impl WebhookSecret {
    pub fn new(secret: String) -> Self {
        Self(secret.into())
    }

    pub fn expose(&self) -> &str {
        self.0.expose_secret().as_str()
    }
}
