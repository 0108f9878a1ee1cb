//! Runtime configuration read from the environment (and `.env` via dotenv)

use std::path::PathBuf;
use std::time::Duration;

use chrono::{FixedOffset, Local, Offset};
use thiserror::Error;

pub const DEFAULT_USER_ID: &str = "admin-user-001";
pub const DEFAULT_TIMEOUT_SECS: u64 = 15;
pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_DATA_DIR: &str = "data";

/// Name of the credential file kept under the data directory
pub const CREDENTIAL_FILE: &str = "session.json";

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} must be set unless BLOODLOG_OFFLINE is enabled")]
    Missing(&'static str),

    #[error("Invalid value for {key}: {value}")]
    Invalid { key: &'static str, value: String },
}

/// Where collaborator requests go
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CollaboratorMode {
    /// Remote JSON endpoint
    Remote { url: String },
    /// In-process collaborator
    Offline,
}

impl CollaboratorMode {
    /// Short description for logs and the health endpoint
    pub fn describe(&self) -> String {
        match self {
            CollaboratorMode::Remote { url } => format!("remote ({})", url),
            CollaboratorMode::Offline => "in-memory (offline)".to_string(),
        }
    }
}

/// Application configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub collaborator: CollaboratorMode,
    /// Collaborator user id sent with every request
    pub user_id: String,
    /// Per-request timeout for collaborator calls
    pub timeout: Duration,
    /// Directory holding the credential file
    pub data_dir: PathBuf,
    pub port: u16,
    /// `APP_ENV`, reported by the health endpoint
    pub environment: String,
    /// Offset used for calendar days in history and charts
    pub tz_offset: FixedOffset,
}

impl AppConfig {
    /// Read configuration from the process environment
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read configuration through `lookup`, which returns a variable's value if set
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let offline = match get("BLOODLOG_OFFLINE") {
            Some(value) => parse_flag("BLOODLOG_OFFLINE", &value)?,
            None => false,
        };

        let collaborator = if offline {
            CollaboratorMode::Offline
        } else {
            let url = get("BLOODLOG_API_URL").ok_or(ConfigError::Missing("BLOODLOG_API_URL"))?;
            CollaboratorMode::Remote { url }
        };

        let timeout_secs = match get("BLOODLOG_TIMEOUT_SECS") {
            Some(value) => value
                .parse::<u64>()
                .ok()
                .filter(|secs| *secs > 0)
                .ok_or(ConfigError::Invalid {
                    key: "BLOODLOG_TIMEOUT_SECS",
                    value,
                })?,
            None => DEFAULT_TIMEOUT_SECS,
        };

        let port = match get("PORT") {
            Some(value) => value
                .parse::<u16>()
                .map_err(|_| ConfigError::Invalid { key: "PORT", value })?,
            None => DEFAULT_PORT,
        };

        let tz_offset = match get("BLOODLOG_TZ_OFFSET") {
            Some(value) => parse_offset(&value).ok_or(ConfigError::Invalid {
                key: "BLOODLOG_TZ_OFFSET",
                value,
            })?,
            None => Local::now().offset().fix(),
        };

        Ok(Self {
            collaborator,
            user_id: get("BLOODLOG_USER_ID").unwrap_or_else(|| DEFAULT_USER_ID.to_string()),
            timeout: Duration::from_secs(timeout_secs),
            data_dir: PathBuf::from(get("DATA_DIR").unwrap_or_else(|| DEFAULT_DATA_DIR.to_string())),
            port,
            environment: get("APP_ENV").unwrap_or_else(|| "development".to_string()),
            tz_offset,
        })
    }

    /// Path of the file the API secret is persisted to
    pub fn credential_path(&self) -> PathBuf {
        self.data_dir.join(CREDENTIAL_FILE)
    }
}

fn parse_flag(key: &'static str, value: &str) -> Result<bool, ConfigError> {
    match value.to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::Invalid {
            key,
            value: value.to_string(),
        }),
    }
}

/// `+08:00`, `-0530` or `Z`
fn parse_offset(value: &str) -> Option<FixedOffset> {
    if value.eq_ignore_ascii_case("z") || value.eq_ignore_ascii_case("utc") {
        return FixedOffset::east_opt(0);
    }

    let (sign, rest) = match value.as_bytes().first()? {
        b'+' => (1, &value[1..]),
        b'-' => (-1, &value[1..]),
        _ => return None,
    };
    let digits: String = rest.chars().filter(|c| *c != ':').collect();
    if digits.len() != 4 || !digits.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }

    let hours: i32 = digits[..2].parse().ok()?;
    let minutes: i32 = digits[2..].parse().ok()?;
    if minutes >= 60 {
        return None;
    }
    FixedOffset::east_opt(sign * (hours * 3600 + minutes * 60))
}
