//! Configuration loading and representation.
//!
//! Values come from the process environment. Loading a `.env` file into the environment
//! is the binary's job; this module only reads variables.

use std::net::SocketAddr;
use std::time::Duration;

use thiserror::Error;

pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
pub const DEFAULT_ORACLE_TIMEOUT_MS: u64 = 5000;
pub const DEFAULT_COMMAND_PREFIX: &str = ".";

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{var} must be set")]
    Missing { var: &'static str },

    #[error("{var}={value:?} is invalid: {reason}")]
    Invalid {
        var: &'static str,
        value: String,
        reason: String,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreBackend {
    Memory,
    Postgres { database_url: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OracleBackend {
    /// Built-in English inflection rules.
    Rules,
    /// Remote inflection model.
    Http { url: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub bind_addr: SocketAddr,
    pub store: StoreBackend,
    pub oracle: OracleBackend,
    pub oracle_timeout: Duration,
    pub command_prefix: String,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Build a config from an arbitrary variable source. Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |var: &str| lookup(var).filter(|v| !v.trim().is_empty());

        let bind_raw = get("QM_BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string());
        let bind_addr = bind_raw.trim().parse().map_err(|e| ConfigError::Invalid {
            var: "QM_BIND_ADDR",
            value: bind_raw.clone(),
            reason: format!("{e}"),
        })?;

        let store = match get("QM_STORE").as_deref().map(str::trim) {
            None | Some("memory") => StoreBackend::Memory,
            Some("postgres") => StoreBackend::Postgres {
                database_url: get("DATABASE_URL").ok_or(ConfigError::Missing {
                    var: "DATABASE_URL",
                })?,
            },
            Some(other) => {
                return Err(ConfigError::Invalid {
                    var: "QM_STORE",
                    value: other.to_string(),
                    reason: "expected `memory` or `postgres`".to_string(),
                });
            }
        };

        let oracle = match get("QM_ORACLE").as_deref().map(str::trim) {
            None | Some("rules") => OracleBackend::Rules,
            Some("http") => OracleBackend::Http {
                url: get("QM_ORACLE_URL").ok_or(ConfigError::Missing {
                    var: "QM_ORACLE_URL",
                })?,
            },
            Some(other) => {
                return Err(ConfigError::Invalid {
                    var: "QM_ORACLE",
                    value: other.to_string(),
                    reason: "expected `rules` or `http`".to_string(),
                });
            }
        };

        let oracle_timeout = match get("QM_ORACLE_TIMEOUT_MS") {
            None => Duration::from_millis(DEFAULT_ORACLE_TIMEOUT_MS),
            Some(raw) => match raw.trim().parse::<u64>() {
                Ok(ms) if ms > 0 => Duration::from_millis(ms),
                _ => {
                    return Err(ConfigError::Invalid {
                        var: "QM_ORACLE_TIMEOUT_MS",
                        value: raw,
                        reason: "expected a positive number of milliseconds".to_string(),
                    });
                }
            },
        };

        // The prefix is not trimmed: it is matched literally at the start of a message.
        let command_prefix = lookup("QM_COMMAND_PREFIX")
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| DEFAULT_COMMAND_PREFIX.to_string());
        if command_prefix.chars().any(char::is_whitespace) {
            return Err(ConfigError::Invalid {
                var: "QM_COMMAND_PREFIX",
                value: command_prefix,
                reason: "must not contain whitespace".to_string(),
            });
        }

        Ok(Self {
            bind_addr,
            store,
            oracle,
            oracle_timeout,
            command_prefix,
        })
    }
}
