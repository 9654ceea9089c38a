use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use url::Url;

use crate::bot::{BotError, UpstreamApi};

pub const DEFAULT_COMPLETION_API_URL: &str = "https://api.pawan.krd/v1/completions";
pub const DEFAULT_COMPLETION_MODEL: &str = "pai-001-light-beta";

const TEMPERATURE: f64 = 0.7;
const MAX_TOKENS: u32 = 256;
const STOP_SEQUENCES: [&str; 2] = ["Human:", "AI:"];

/// Bearer token of the completion API, exposed only through [`CompletionApiKey::expose`].
pub struct CompletionApiKey(SecretString);

impl CompletionApiKey {
    pub fn new(key: String) -> Self {
        Self(key.into())
    }

    pub fn expose(&self) -> &str {
        self.0.expose_secret().as_str()
    }
}

/// Asks a text completion API to explain source code.
pub struct CompletionClient {
    client: reqwest::Client,
    url: Url,
    model: String,
    api_key: CompletionApiKey,
}

#[derive(Serialize)]
struct CompletionRequest<'a> {
    model: &'a str,
    prompt: String,
    temperature: f64,
    max_tokens: u32,
    stop: [&'static str; 2],
}

#[derive(Deserialize)]
struct CompletionResponse {
    choices: Vec<CompletionChoice>,
}

#[derive(Deserialize)]
struct CompletionChoice {
    text: String,
}

impl CompletionClient {
    pub fn new(url: Url, model: String, api_key: CompletionApiKey) -> Self {
        Self {
            client: reqwest::Client::new(),
            url,
            model,
            api_key,
        }
    }

    /// Returns the text of the first completion generated for an explanation prompt of `code`.
    pub async fn explain(&self, code: &str) -> Result<String, BotError> {
        let request = CompletionRequest {
            model: &self.model,
            prompt: explanation_prompt(code),
            temperature: TEMPERATURE,
            max_tokens: MAX_TOKENS,
            stop: STOP_SEQUENCES,
        };
        let response = self
            .client
            .post(self.url.clone())
            .bearer_auth(self.api_key.expose())
            .json(&request)
            .send()
            .await
            .and_then(|response| response.error_for_status())
            .map_err(|error| BotError::upstream(UpstreamApi::Completion, error))?
            .json::<CompletionResponse>()
            .await
            .map_err(|error| BotError::upstream(UpstreamApi::Completion, error))?;

        response
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.text)
            .ok_or_else(|| {
                BotError::upstream(
                    UpstreamApi::Completion,
                    anyhow::anyhow!("Response contains no completion"),
                )
            })
    }
}

fn explanation_prompt(code: &str) -> String {
    format!("Explain this code to me:\n{code}\n\n")
}
