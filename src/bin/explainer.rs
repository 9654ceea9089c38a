use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use tokio::net::TcpListener;
use url::Url;

use explainer::services::completion::{DEFAULT_COMPLETION_API_URL, DEFAULT_COMPLETION_MODEL};
use explainer::services::execution::DEFAULT_EXECUTION_API_URL;
use explainer::services::{CompletionApiKey, CompletionClient, ExecutionClient};
use explainer::utils::logging::init_logging;
use explainer::{
    create_app, create_bot_process, create_github_client, BotContext, BotProcess, BotSettings,
    GithubAppClient, RuntimeVersionTable, ServerState, WebhookSecret,
};

#[derive(clap::Parser)]
struct Opts {
    /// Secret used to authenticate webhooks.
    #[arg(long, env = "WEBHOOK_SECRET")]
    webhook_secret: String,

    /// GitHub App ID.
    #[arg(long, env = "APP_ID")]
    app_id: u64,

    /// Private key used to authenticate as a GitHub App.
    #[arg(long, env = "PRIVATE_KEY")]
    private_key: String,

    /// Bearer token of the completion API.
    #[arg(long, env = "FREE_LLM")]
    completion_api_key: String,

    /// Base URL of the GitHub API.
    #[arg(long, env = "GITHUB_API_URL", default_value = explainer::github::api::base_github_url())]
    github_url: String,

    /// Endpoint of the code execution API.
    #[arg(long, env = "EXECUTION_API_URL", default_value = DEFAULT_EXECUTION_API_URL)]
    execution_api_url: Url,

    /// Endpoint of the text completion API.
    #[arg(long, env = "COMPLETION_API_URL", default_value = DEFAULT_COMPLETION_API_URL)]
    completion_api_url: Url,

    /// Model used to generate explanations.
    #[arg(long, env = "COMPLETION_MODEL", default_value = DEFAULT_COMPLETION_MODEL)]
    completion_model: String,

    /// TOML file mapping file extensions to runtime versions.
    /// The table bundled with the bot is used when missing.
    #[arg(long, env = "RUNTIME_TABLE")]
    runtime_table: Option<PathBuf>,

    /// Post an empty explanation comment when the completion API fails.
    #[arg(long, env = "COMMENT_ON_FAILED_EXPLANATION")]
    comment_on_failed_explanation: bool,

    /// Port of the webhook server.
    #[arg(long, env = "PORT", default_value_t = 8080)]
    port: u16,
}

async fn server(state: ServerState, port: u16) -> anyhow::Result<()> {
    let app = create_app(state);
    let listener = TcpListener::bind(("0.0.0.0", port))
        .await
        .with_context(|| format!("Cannot bind to port {port}"))?;
    tracing::info!("Listening on port {port}");

    axum::serve(listener, app).await?;
    Ok(())
}

fn try_main(opts: Opts) -> anyhow::Result<()> {
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("Cannot build tokio runtime")?;

    let runtimes = match &opts.runtime_table {
        Some(path) => RuntimeVersionTable::load(path)?,
        None => RuntimeVersionTable::bundled()?,
    };
    tracing::debug!("Loaded {} runtime versions", runtimes.len());

    let ctx = BotContext::new(
        ExecutionClient::new(opts.execution_api_url, runtimes),
        CompletionClient::new(
            opts.completion_api_url,
            opts.completion_model,
            CompletionApiKey::new(opts.completion_api_key),
        ),
        BotSettings {
            comment_on_failed_explanation: opts.comment_on_failed_explanation,
        },
    );

    // Building the app client requires a tokio runtime
    let app_id = opts.app_id.into();
    let github_url = opts.github_url;
    let private_key = opts.private_key.into_bytes().into();
    let client =
        runtime.block_on(async move { create_github_client(app_id, github_url, private_key) })?;
    let loader = GithubAppClient::new(client);

    let BotProcess {
        event_tx,
        bot_process,
    } = create_bot_process(ctx, loader);

    let state = ServerState::new(event_tx, WebhookSecret::new(opts.webhook_secret));
    let server_process = server(state, opts.port);

    runtime.block_on(async move {
        tokio::select! {
            () = bot_process => {
                tracing::warn!("Bot event handling process has ended");
                Ok(())
            },
            res = server_process => {
                tracing::warn!("Server has ended: {res:?}");
                res
            }
        }
    })?;

    Ok(())
}

fn main() {
    init_logging();

    let opts = Opts::parse();
    if let Err(error) = try_main(opts) {
        eprintln!("Error: {error:?}");
        std::process::exit(1);
    }
}
