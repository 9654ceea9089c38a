use anyhow::Context;
use octocrab::models::{AppId, InstallationId};
use octocrab::Octocrab;
use secrecy::{ExposeSecret, SecretVec};

use client::GithubRepositoryClient;

use crate::bot::RepositoryLoader;
use crate::github::GithubRepoName;

pub mod client;
pub(crate) mod operations;

pub fn base_github_url() -> &'static str {
    "https://api.github.com"
}

/// Creates a client authenticated as the GitHub App with the given ID.
pub fn create_github_client(
    app_id: AppId,
    github_url: String,
    private_key: SecretVec<u8>,
) -> anyhow::Result<Octocrab> {
    let key = jsonwebtoken::EncodingKey::from_rsa_pem(private_key.expose_secret().as_ref())
        .context("Could not encode private key")?;

    Octocrab::builder()
        .base_uri(github_url)?
        .app(app_id, key)
        .build()
        .context("Could not create octocrab builder")
}

/// Provides access to repositories in which the GitHub App is installed.
pub struct GithubAppClient {
    client: Octocrab,
}

impl GithubAppClient {
    pub fn new(client: Octocrab) -> Self {
        Self { client }
    }
}

impl RepositoryLoader for GithubAppClient {
    type Client = GithubRepositoryClient;

    fn load_repository(
        &self,
        repo: &GithubRepoName,
        installation_id: Option<u64>,
    ) -> anyhow::Result<GithubRepositoryClient> {
        let Some(installation_id) = installation_id else {
            return Err(anyhow::anyhow!(
                "Event from {repo} was not delivered through an app installation"
            ));
        };
        let installation_client = self.client.installation(InstallationId(installation_id));
        Ok(GithubRepositoryClient::new(installation_client, repo.clone()))
    }
}
