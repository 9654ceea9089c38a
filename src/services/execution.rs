use serde::{Deserialize, Serialize};
use url::Url;

use crate::bot::{BotError, UpstreamApi};
use crate::config::RuntimeVersionTable;

pub const DEFAULT_EXECUTION_API_URL: &str = "https://emkc.org/api/v2/piston/execute";

/// Runs source files in the Piston code execution sandbox.
pub struct ExecutionClient {
    client: reqwest::Client,
    url: Url,
    runtimes: RuntimeVersionTable,
}

#[derive(Serialize)]
struct ExecuteRequest<'a> {
    language: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    version: Option<&'a str>,
    files: [SourceFile<'a>; 1],
}

#[derive(Serialize)]
struct SourceFile<'a> {
    content: &'a str,
}

#[derive(Deserialize)]
struct ExecuteResponse {
    run: RunResult,
}

#[derive(Deserialize)]
struct RunResult {
    output: String,
}

impl ExecutionClient {
    pub fn new(url: Url, runtimes: RuntimeVersionTable) -> Self {
        Self {
            client: reqwest::Client::new(),
            url,
            runtimes,
        }
    }

    /// Executes `code` as the language given by the extension of `filename` and returns
    /// everything it printed.
    ///
    /// Extensions missing from the runtime table are sent without a version and left for the
    /// execution API to reject.
    pub async fn execute(&self, filename: &str, code: &str) -> Result<String, BotError> {
        let language = file_extension(filename);
        let version = self.runtimes.version(language);
        if version.is_none() {
            tracing::debug!("No runtime version known for `{language}`");
        }

        let request = ExecuteRequest {
            language,
            version,
            files: [SourceFile { content: code }],
        };
        let response = self
            .client
            .post(self.url.clone())
            .json(&request)
            .send()
            .await
            .and_then(|response| response.error_for_status())
            .map_err(|error| BotError::upstream(UpstreamApi::Execution, error))?
            .json::<ExecuteResponse>()
            .await
            .map_err(|error| BotError::upstream(UpstreamApi::Execution, error))?;
        Ok(response.run.output)
    }
}

/// Text after the last `.` of the filename, or the whole filename if it has no `.`.
pub fn file_extension(filename: &str) -> &str {
    filename
        .rsplit_once('.')
        .map_or(filename, |(_, extension)| extension)
}
