use std::collections::HashMap;
use std::path::Path;

use anyhow::Context;

/// Runtime table shipped together with the bot.
pub const BUNDLED_RUNTIME_TABLE: &str = include_str!("../data/runtimes.toml");

/// Maps file extensions to the runtime version that the execution API should use for them.
///
/// Loaded from a TOML file where every key is an extension and every value is a version:
/// ```toml
/// py = "3.10.0"
/// ```
#[derive(serde::Deserialize, Clone, Debug, Default)]
#[serde(transparent)]
pub struct RuntimeVersionTable(HashMap<String, String>);

impl RuntimeVersionTable {
    pub fn bundled() -> anyhow::Result<Self> {
        Self::parse(BUNDLED_RUNTIME_TABLE).context("Cannot parse bundled runtime table")
    }

    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Cannot read runtime table from {}", path.display()))?;
        Self::parse(&content)
            .with_context(|| format!("Cannot parse runtime table {}", path.display()))
    }

    pub fn parse(content: &str) -> anyhow::Result<Self> {
        Ok(toml::from_str(content)?)
    }

    pub fn version(&self, extension: &str) -> Option<&str> {
        self.0.get(extension).map(|version| version.as_str())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<(String, String)> for RuntimeVersionTable {
    fn from_iter<T: IntoIterator<Item = (String, String)>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}
