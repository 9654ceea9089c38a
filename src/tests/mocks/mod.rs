use std::sync::Arc;

use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, Request, ResponseTemplate};

use crate::bot::event::BotEvent;
use crate::bot::{handle_bot_event, BotContext, BotSettings};
use crate::config::RuntimeVersionTable;
use crate::services::completion::DEFAULT_COMPLETION_MODEL;
use crate::services::{CompletionApiKey, CompletionClient, ExecutionClient};
use crate::tests::state::TestRepositoryClient;

pub mod github;

const EXECUTION_PATH: &str = "/api/v2/piston/execute";
const COMPLETION_PATH: &str = "/v1/completions";
pub const TEST_COMPLETION_API_KEY: &str = "test-llm-key";

/// Simulates both the execution and the completion API on a single mock server.
pub struct ServiceMocks {
    server: MockServer,
    settings: BotSettings,
}

impl ServiceMocks {
    pub async fn start() -> Self {
        Self::with_settings(BotSettings::default()).await
    }

    pub async fn start_with_failed_explanation_comments() -> Self {
        Self::with_settings(BotSettings {
            comment_on_failed_explanation: true,
        })
        .await
    }

    async fn with_settings(settings: BotSettings) -> Self {
        Self {
            server: MockServer::start().await,
            settings,
        }
    }

    /// Creates a bot context whose clients talk to this mock server.
    pub fn context(&self) -> BotContext {
        let execution = ExecutionClient::new(
            format!("{}{EXECUTION_PATH}", self.server.uri())
                .parse()
                .unwrap(),
            RuntimeVersionTable::bundled().unwrap(),
        );
        let completion = CompletionClient::new(
            format!("{}{COMPLETION_PATH}", self.server.uri())
                .parse()
                .unwrap(),
            DEFAULT_COMPLETION_MODEL.to_string(),
            CompletionApiKey::new(TEST_COMPLETION_API_KEY.to_string()),
        );
        BotContext::new(execution, completion, self.settings.clone())
    }

    /// Handles the event to completion. The handler itself must not fail.
    pub async fn handle(&self, event: BotEvent, client: &Arc<TestRepositoryClient>) {
        handle_bot_event(event, &self.context(), client)
            .await
            .unwrap();
    }

    pub async fn mock_explanation(&self, text: &str) {
        Mock::given(method("POST"))
            .and(path(COMPLETION_PATH))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": "cmpl-1",
                "object": "text_completion",
                "model": DEFAULT_COMPLETION_MODEL,
                "choices": [{ "text": text, "index": 0, "finish_reason": "stop" }]
            })))
            .mount(&self.server)
            .await;
    }

    pub async fn mock_completion_failure(&self) {
        Mock::given(method("POST"))
            .and(path(COMPLETION_PATH))
            .respond_with(ResponseTemplate::new(503))
            .mount(&self.server)
            .await;
    }

    pub async fn mock_execution_output(&self, output: &str) {
        Mock::given(method("POST"))
            .and(path(EXECUTION_PATH))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "run": { "stdout": output, "stderr": "", "code": 0, "output": output }
            })))
            .mount(&self.server)
            .await;
    }

    pub async fn mock_execution_failure(&self) {
        Mock::given(method("POST"))
            .and(path(EXECUTION_PATH))
            .respond_with(
                ResponseTemplate::new(400)
                    .set_body_json(json!({ "message": "runtime is unknown" })),
            )
            .mount(&self.server)
            .await;
    }

    pub async fn all_requests(&self) -> Vec<Request> {
        self.server.received_requests().await.unwrap_or_default()
    }

    /// Prompts sent to the completion API, in order.
    pub async fn completion_prompts(&self) -> Vec<String> {
        self.requests_to(COMPLETION_PATH)
            .await
            .into_iter()
            .map(|body| body["prompt"].as_str().unwrap().to_string())
            .collect()
    }

    /// Bodies sent to the execution API, in order.
    pub async fn execution_requests(&self) -> Vec<serde_json::Value> {
        self.requests_to(EXECUTION_PATH).await
    }

    async fn requests_to(&self, endpoint: &str) -> Vec<serde_json::Value> {
        self.all_requests()
            .await
            .into_iter()
            .filter(|request| request.url.path() == endpoint)
            .map(|request| request.body_json().unwrap())
            .collect()
    }
}
