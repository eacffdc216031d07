//! Pipeline configuration: built-in defaults, an optional YAML file, then
//! command-line overrides, in increasing precedence.
//!
//! ```yaml
//! content_selectors: ["div.article-content", "article"]
//! concurrency: 4
//! max_retries: 2
//! on_network_error: skip
//! text_dir: ./articles
//! sentiment_lexicon: ./lexicon.csv
//! ```

use crate::cli::Cli;
use crate::error::ConfigError;
use crate::extractor::ContentSelectors;
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::info;

/// Handling of transport-level failures for a single row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum NetworkErrorPolicy {
    /// Stop the run on the first network error.
    Abort,
    /// Log the failure, drop the row, keep going.
    #[default]
    Skip,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PipelineConfig {
    pub title_selector: String,
    /// Tried in order; the first match is the content container.
    pub content_selectors: Vec<String>,
    pub paragraph_selector: String,
    pub user_agent: String,
    pub timeout_secs: Option<u64>,
    pub concurrency: usize,
    pub max_retries: usize,
    pub retry_base_delay_ms: u64,
    pub on_network_error: NetworkErrorPolicy,
    /// `None` disables the text-file side channel.
    pub text_dir: Option<PathBuf>,
    pub sentiment_lexicon: Option<PathBuf>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            title_selector: "title".to_string(),
            content_selectors: vec!["div.article-content".to_string(), "article".to_string()],
            paragraph_selector: "p".to_string(),
            user_agent: concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")).to_string(),
            timeout_secs: None,
            concurrency: 1,
            max_retries: 0,
            retry_base_delay_ms: 1000,
            on_network_error: NetworkErrorPolicy::Skip,
            text_dir: Some(PathBuf::from(".")),
            sentiment_lexicon: None,
        }
    }
}

impl PipelineConfig {
    /// Parse a YAML config document; missing keys keep their defaults.
    pub fn from_yaml_str(yaml: &str, path: &Path) -> Result<Self, ConfigError> {
        serde_yaml::from_str(yaml).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Defaults, overlaid with the YAML file at `path` when given.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let yaml = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_yaml_str(&yaml, path)?;
        info!(path = %path.display(), "Loaded configuration");
        Ok(config)
    }

    /// Apply command-line overrides.
    pub fn apply_cli(&mut self, cli: &Cli) {
        if let Some(dir) = &cli.text_dir {
            self.text_dir = Some(dir.clone());
        }
        if cli.no_text_files {
            self.text_dir = None;
        }
        if let Some(n) = cli.concurrency {
            self.concurrency = n;
        }
        if let Some(n) = cli.max_retries {
            self.max_retries = n;
        }
        if let Some(policy) = cli.on_network_error {
            self.on_network_error = policy;
        }
        if let Some(ua) = &cli.user_agent {
            self.user_agent = ua.clone();
        }
        if let Some(secs) = cli.timeout_secs {
            self.timeout_secs = Some(secs);
        }
    }

    /// Check values and compile the selectors.
    pub fn validate(&self) -> Result<ContentSelectors, ConfigError> {
        if self.concurrency == 0 {
            return Err(ConfigError::InvalidValue(
                "concurrency must be at least 1".to_string(),
            ));
        }
        if self.timeout_secs == Some(0) {
            return Err(ConfigError::InvalidValue(
                "timeout_secs must be positive".to_string(),
            ));
        }
        ContentSelectors::new(
            &self.title_selector,
            &self.content_selectors,
            &self.paragraph_selector,
        )
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }

    pub fn retry_base_delay(&self) -> Duration {
        Duration::from_millis(self.retry_base_delay_ms)
    }
}
