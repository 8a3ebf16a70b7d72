//! Process configuration
//!
//! Resolved once at startup from command-line flags, falling back to
//! environment variables (a `.env` file is loaded first by `main`).

use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::api::ServiceAccountKey;

pub const CREDENTIALS_ENV: &str = "GOOGLE_SERVICE_ACCOUNT_FILE";
pub const SPREADSHEET_ID_ENV: &str = "SPREADSHEET_ID";
pub const BIND_ENV: &str = "STAFFING_BIND";
pub const TIMEOUT_ENV: &str = "STAFFING_TIMEOUT_SECS";

pub const DEFAULT_BIND: &str = "127.0.0.1:5000";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Clone)]
pub struct Config {
    /// Service-account key file
    pub credentials_path: PathBuf,
    /// Spreadsheet holding the three tables
    pub spreadsheet_id: String,
    pub bind: SocketAddr,
    /// Timeout for every call to the spreadsheet service
    pub request_timeout: Duration,
}

/// Values given on the command line; each wins over its environment variable
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub credentials_path: Option<PathBuf>,
    pub spreadsheet_id: Option<String>,
    pub bind: Option<String>,
    pub timeout_secs: Option<u64>,
}

#[derive(Debug)]
pub enum ConfigError {
    /// A required setting has no value
    Missing { setting: &'static str, env: &'static str },
    /// A setting has a value that cannot be parsed
    Invalid { setting: &'static str, value: String },
    /// The credential file cannot be read or is not a service-account key
    Credentials { path: PathBuf, message: String },
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Missing { setting, env } => {
                write!(f, "{} is not set (use the flag or set {})", setting, env)
            }
            ConfigError::Invalid { setting, value } => {
                write!(f, "Invalid {}: '{}'", setting, value)
            }
            ConfigError::Credentials { path, message } => write!(
                f,
                "Cannot load service account credentials from {}: {}",
                path.display(),
                message
            ),
        }
    }
}

impl std::error::Error for ConfigError {}

impl Config {
    /// Resolve against the process environment
    pub fn from_env(overrides: ConfigOverrides) -> Result<Self, ConfigError> {
        Self::resolve(overrides, |key| std::env::var(key).ok())
    }

    /// Resolve with an arbitrary variable lookup. Empty values count as unset.
    pub fn resolve(
        overrides: ConfigOverrides,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        let env = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let credentials_path = overrides
            .credentials_path
            .or_else(|| env(CREDENTIALS_ENV).map(PathBuf::from))
            .ok_or(ConfigError::Missing {
                setting: "credential file",
                env: CREDENTIALS_ENV,
            })?;

        let spreadsheet_id = overrides
            .spreadsheet_id
            .filter(|id| !id.trim().is_empty())
            .or_else(|| env(SPREADSHEET_ID_ENV))
            .ok_or(ConfigError::Missing {
                setting: "spreadsheet id",
                env: SPREADSHEET_ID_ENV,
            })?;

        let bind_str = overrides
            .bind
            .or_else(|| env(BIND_ENV))
            .unwrap_or_else(|| DEFAULT_BIND.to_string());
        let bind = bind_str.parse().map_err(|_| ConfigError::Invalid {
            setting: "bind address",
            value: bind_str.clone(),
        })?;

        let timeout_secs = match overrides.timeout_secs {
            Some(secs) => secs,
            None => match env(TIMEOUT_ENV) {
                Some(value) => value.trim().parse().map_err(|_| ConfigError::Invalid {
                    setting: "request timeout",
                    value,
                })?,
                None => DEFAULT_TIMEOUT_SECS,
            },
        };
        if timeout_secs == 0 {
            return Err(ConfigError::Invalid {
                setting: "request timeout",
                value: "0".to_string(),
            });
        }

        Ok(Self {
            credentials_path,
            spreadsheet_id,
            bind,
            request_timeout: Duration::from_secs(timeout_secs),
        })
    }

    /// Read and check the service-account key file
    pub fn load_service_account(&self) -> Result<ServiceAccountKey, ConfigError> {
        load_service_account(&self.credentials_path)
    }
}

fn load_service_account(path: &Path) -> Result<ServiceAccountKey, ConfigError> {
    let credentials_error = |message: String| ConfigError::Credentials {
        path: path.to_path_buf(),
        message,
    };

    let content = std::fs::read_to_string(path).map_err(|e| credentials_error(e.to_string()))?;
    let key: ServiceAccountKey =
        serde_json::from_str(&content).map_err(|e| credentials_error(e.to_string()))?;
    key.signing_key()
        .map_err(|e| credentials_error(format!("unusable private key: {}", e)))?;

    Ok(key)
}
