//! Client configuration.
//!
//! `load_config` merges `ELASTICSEARCH_*` environment variables with an
//! optional TOML file. Values in the file win.

use std::path::Path;
use std::time::Duration;

use figment::providers::{Env, Format, Toml};
use figment::Figment;
use serde::Deserialize;
use tracing::info;

use crate::error::{Error, Result};

pub const DEFAULT_URL: &str = "http://localhost:9200";

/// How an action treats parameters outside its allow-list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ParamPolicy {
    /// Drop unknown parameters and log each one.
    #[default]
    Permissive,
    /// Fail the call with `Error::UnsupportedParameter`.
    Strict,
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct ClientConfig {
    /// Base URL of the cluster node requests are sent to.
    #[serde(default = "default_url")]
    pub url: String,
    /// Reject unknown parameters instead of dropping them.
    #[serde(default)]
    pub strict_params: bool,
    /// Overall per-request timeout; unset means wait indefinitely.
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

fn default_url() -> String {
    DEFAULT_URL.to_string()
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            url: default_url(),
            strict_params: false,
            timeout_secs: None,
        }
    }
}

impl ClientConfig {
    pub fn param_policy(&self) -> ParamPolicy {
        if self.strict_params {
            ParamPolicy::Strict
        } else {
            ParamPolicy::Permissive
        }
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }
}

/// Load configuration from the environment and, if given, a TOML file.
pub fn load_config(config_file: Option<&Path>) -> Result<ClientConfig> {
    info!(file = ?config_file, "loading client configuration");
    let figment = Figment::new().merge(Env::prefixed("ELASTICSEARCH_"));
    let figment = match config_file {
        Some(path) => figment.merge(Toml::file(path)),
        None => figment,
    };
    figment.extract().map_err(|e| Error::Config(Box::new(e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = ClientConfig::default();
        assert_eq!(config.url, "http://localhost:9200");
        assert_eq!(config.param_policy(), ParamPolicy::Permissive);
        assert_eq!(config.timeout(), None);
    }

    #[test]
    fn toml_file_is_loaded() {
        let path = std::env::temp_dir().join(format!("esapi_config_{}.toml", std::process::id()));
        std::fs::write(
            &path,
            "url = \"http://search:9200\"\nstrict_params = true\ntimeout_secs = 5\n",
        )
        .unwrap();

        let config = load_config(Some(path.as_path())).unwrap();
        assert_eq!(config.url, "http://search:9200");
        assert_eq!(config.param_policy(), ParamPolicy::Strict);
        assert_eq!(config.timeout(), Some(Duration::from_secs(5)));

        std::fs::remove_file(path).unwrap();
    }

    #[test]
    fn malformed_file_is_a_config_error() {
        let path = std::env::temp_dir().join(format!("esapi_bad_{}.toml", std::process::id()));
        std::fs::write(&path, "strict_params = \"sometimes\"\n").unwrap();

        let err = load_config(Some(path.as_path())).unwrap_err();
        assert!(matches!(err, Error::Config(_)));

        std::fs::remove_file(path).unwrap();
    }
}
