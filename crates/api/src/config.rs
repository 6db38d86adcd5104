//! Process configuration, read from the environment.

use thiserror::Error;

use saas_auth::Role;
use saas_observability::LogFormat;

pub const LOG_FORMAT_VAR: &str = "LOG_FORMAT";
pub const POLICY_DUMP_ROLE_VAR: &str = "POLICY_DUMP_ROLE";

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Config {
    pub log_format: LogFormat,
    /// Role whose rule summary is printed at startup, if any.
    pub policy_dump_role: Option<Role>,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid {name}: {reason}")]
    Invalid { name: &'static str, reason: String },
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build from an arbitrary variable source (tests pass a map).
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let log_format = match lookup(LOG_FORMAT_VAR) {
            Some(raw) => raw.parse::<LogFormat>().map_err(|e| {
                ConfigError::Invalid {
                    name: LOG_FORMAT_VAR,
                    reason: e.to_string(),
                }
            })?,
            None => LogFormat::default(),
        };

        let policy_dump_role = lookup(POLICY_DUMP_ROLE_VAR)
            .filter(|raw| !raw.trim().is_empty())
            .map(|raw| {
                raw.trim().parse::<Role>().map_err(|e| ConfigError::Invalid {
                    name: POLICY_DUMP_ROLE_VAR,
                    reason: e.to_string(),
                })
            })
            .transpose()?;

        Ok(Self {
            log_format,
            policy_dump_role,
        })
    }
}
