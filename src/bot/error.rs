use std::fmt::{Display, Formatter};

use thiserror::Error;

/// External service contacted by the bot.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UpstreamApi {
    GitHub,
    Execution,
    Completion,
}

impl Display for UpstreamApi {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            UpstreamApi::GitHub => "GitHub",
            UpstreamApi::Execution => "execution",
            UpstreamApi::Completion => "completion",
        };
        f.write_str(name)
    }
}

#[derive(Error, Debug)]
pub enum BotError {
    #[error("{api} API call failed: {source:?}")]
    Upstream {
        api: UpstreamApi,
        source: anyhow::Error,
    },
    #[error("Cannot decode content of `{path}`: {reason}")]
    Decode { path: String, reason: String },
}

impl BotError {
    pub fn upstream<E: Into<anyhow::Error>>(api: UpstreamApi, error: E) -> Self {
        Self::Upstream {
            api,
            source: error.into(),
        }
    }
}
