use std::{
    env, fs,
    path::{Path, PathBuf},
};

use serde::Deserialize;
use thiserror::Error;
use tracing::info;

pub mod client_id;
pub mod security;

pub use client_id::{ClientId, ClientIdLayer};
pub use security::create_security_headers_layer;

/// Environment variable naming the TOML file that overrides the defaults.
pub const CONFIG_ENV_VAR: &str = "ATTEND_CONFIG";

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:5090";
const DEFAULT_DATABASE_URL: &str = "sqlite://attend.db";
const DEFAULT_COOKIE_MAX_AGE_DAYS: i64 = 365;

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub bind_addr: String,
    pub database_url: String,
    pub max_connections: u32,
    /// Lifetime of the `client_id` and `session` cookies.
    pub cookie_max_age_days: i64,
    pub secure_cookies: bool,
    pub include_hsts: bool,
    /// Accept passwords stored as plain text and rehash them on login.
    pub legacy_plaintext_passwords: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind_addr: DEFAULT_BIND_ADDR.to_string(),
            database_url: DEFAULT_DATABASE_URL.to_string(),
            max_connections: 5,
            cookie_max_age_days: DEFAULT_COOKIE_MAX_AGE_DAYS,
            secure_cookies: false,
            include_hsts: false,
            legacy_plaintext_passwords: false,
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

impl Config {
    /// Defaults, overridden by the file named in `ATTEND_CONFIG` when set,
    /// then by `DATABASE_URL`.
    pub fn load() -> Result<Self, ConfigError> {
        let mut config = match env::var_os(CONFIG_ENV_VAR) {
            Some(path) => {
                let path = PathBuf::from(path);
                info!("Loading configuration from {}", path.display());
                Self::from_file(&path)?
            }
            None => {
                info!("{CONFIG_ENV_VAR} not set, using default configuration");
                Self::default()
            }
        };

        if let Ok(url) = env::var("DATABASE_URL") {
            config.database_url = url;
        }

        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let raw = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&raw).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn cookie_max_age_secs(&self) -> i64 {
        self.cookie_max_age_days * 24 * 60 * 60
    }
}
