//! Client configuration.
//!
//! Layering, lowest to highest priority:
//! 1. built-in defaults
//! 2. `config.json5` / `config.toml` in the config directory (both optional)
//! 3. `EXAMINER_*` environment variables, e.g. `EXAMINER_API_BASE_URL`

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;
use tracing::{debug, warn};
use url::Url;

use crate::error::ClientError;

pub const ENV_PREFIX: &str = "EXAMINER";

pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8000/api/";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_PER_PAGE: u32 = 10;

const CONFIG_FILES: [(&str, config::FileFormat); 2] = [
    ("config.json5", config::FileFormat::Json5),
    ("config.toml", config::FileFormat::Toml),
];

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ClientConfig {
    pub api_base_url: String,
    pub request_timeout_secs: u64,
    pub default_per_page: u32,
    /// Overrides the token location from the path context.
    #[serde(default)]
    pub token_file: Option<PathBuf>,
    /// `trace`, `debug`, `info`, `warn`, `error` or `off`.
    #[serde(default)]
    pub log_level: Option<String>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            request_timeout_secs: DEFAULT_TIMEOUT_SECS,
            default_per_page: DEFAULT_PER_PAGE,
            token_file: None,
            log_level: None,
        }
    }
}

impl ClientConfig {
    pub fn load(config_dir: &Path) -> Result<Self, ClientError> {
        Self::load_with_env(
            config_dir,
            config::Environment::with_prefix(ENV_PREFIX).try_parsing(true),
        )
    }

    /// Like [`ClientConfig::load`] with an explicit environment source.
    pub fn load_with_env(
        config_dir: &Path,
        env: config::Environment,
    ) -> Result<Self, ClientError> {
        let mut builder = config::Config::builder()
            .set_default("api_base_url", DEFAULT_API_BASE_URL)?
            .set_default("request_timeout_secs", DEFAULT_TIMEOUT_SECS)?
            .set_default("default_per_page", DEFAULT_PER_PAGE)?;

        let mut found_config = false;
        for (file, format) in CONFIG_FILES {
            let path = config_dir.join(file);
            if path.exists() {
                found_config = true;
                debug!(path = %path.display(), "reading configuration file");
            }
            builder = builder.add_source(config::File::from(path).format(format).required(false));
        }
        if !found_config {
            debug!(dir = %config_dir.display(), "no configuration file, using defaults");
        }

        let cfg: Self = builder.add_source(env).build()?.try_deserialize()?;
        cfg.api_url()?;
        if cfg.default_per_page == 0 {
            warn!("default_per_page is 0, falling back to {DEFAULT_PER_PAGE}");
            return Ok(Self {
                default_per_page: DEFAULT_PER_PAGE,
                ..cfg
            });
        }
        Ok(cfg)
    }

    pub fn api_url(&self) -> Result<ApiUrl, ClientError> {
        ApiUrl::parse(&self.api_base_url)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs.max(1))
    }
}

/// Base url of the portal API. Endpoint paths are appended segment-wise so
/// ids are percent-encoded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiUrl {
    url: Url,
}

impl ApiUrl {
    pub fn parse(raw: &str) -> Result<Self, ClientError> {
        let url = Url::parse(raw.trim())?;
        if url.cannot_be_a_base() {
            return Err(ClientError::NotABaseUrl(raw.to_string()));
        }
        Ok(Self { url })
    }

    pub fn as_url(&self) -> &Url {
        &self.url
    }

    pub fn for_api(&self, segments: &[&str]) -> Result<Url, ClientError> {
        let mut url = self.url.clone();
        url.path_segments_mut()
            .map_err(|()| ClientError::NotABaseUrl(self.url.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }
}
