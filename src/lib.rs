//! This is the library of the explainer bot.
//!
//! The bot listens to pull request webhooks of a GitHub App. When a pull request description or a
//! review comment asks for it with `/explain` or `/execute`, it explains the changed files with a
//! text completion API or runs them in a sandbox, and posts the result back to the pull request.
pub mod bot;
pub mod config;
pub mod github;
pub mod services;
pub mod utils;

pub use bot::{BotContext, BotSettings};
pub use config::RuntimeVersionTable;
pub use github::api::{create_github_client, GithubAppClient};
pub use github::server::{create_app, create_bot_process, BotProcess, ServerState};
pub use github::WebhookSecret;

#[cfg(test)]
mod tests;
