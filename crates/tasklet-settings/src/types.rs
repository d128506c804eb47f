//! Settings type definitions.
//!
//! All types use `#[serde(rename_all = "camelCase")]` and `#[serde(default)]`,
//! so a settings file only needs to contain the values it changes.

use std::ops::RangeInclusive;

use serde::{Deserialize, Serialize};

use crate::errors::{Result, SettingsError};
use crate::loader::tasklet_home;

/// Accepted `remote.timeoutMs` values.
pub const TIMEOUT_MS_RANGE: RangeInclusive<u64> = 1000..=600_000;
/// Accepted `store.poolSize` values.
pub const POOL_SIZE_RANGE: RangeInclusive<u32> = 1..=64;
/// Accepted `store.busyTimeoutMs` values.
pub const BUSY_TIMEOUT_MS_RANGE: RangeInclusive<u32> = 0..=600_000;

/// Root settings type for the Tasklet client.
///
/// # JSON Format
///
/// ```json
/// {
///   "remote": { "baseUrl": "https://tasks.example.com/api/" },
///   "store": { "dbPath": "/data/tasks.db" },
///   "logging": { "level": "info" }
/// }
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TaskletSettings {
    /// Task API connection settings.
    pub remote: RemoteSettings,
    /// Local cache settings.
    pub store: StoreSettings,
    /// Logging configuration.
    pub logging: LoggingSettings,
}

impl TaskletSettings {
    /// Reject empty paths and numbers outside their accepted ranges.
    pub fn validate(&self) -> Result<()> {
        if self.remote.base_url.trim().is_empty() {
            return Err(SettingsError::InvalidValue(
                "remote.baseUrl must not be empty".to_string(),
            ));
        }
        if self.store.db_path.trim().is_empty() {
            return Err(SettingsError::InvalidValue(
                "store.dbPath must not be empty".to_string(),
            ));
        }
        check_range("remote.timeoutMs", self.remote.timeout_ms, &TIMEOUT_MS_RANGE)?;
        check_range("store.poolSize", self.store.pool_size, &POOL_SIZE_RANGE)?;
        check_range(
            "store.busyTimeoutMs",
            self.store.busy_timeout_ms,
            &BUSY_TIMEOUT_MS_RANGE,
        )?;
        Ok(())
    }
}

fn check_range<T>(key: &str, value: T, range: &RangeInclusive<T>) -> Result<()>
where
    T: PartialOrd + std::fmt::Display,
{
    if range.contains(&value) {
        Ok(())
    } else {
        Err(SettingsError::InvalidValue(format!(
            "{key} must be between {} and {}, got {value}",
            range.start(),
            range.end()
        )))
    }
}

/// Task API connection settings.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RemoteSettings {
    /// Base URL of the task API; endpoint paths are resolved against it.
    pub base_url: String,
    /// Whole-request timeout in milliseconds.
    pub timeout_ms: u64,
}

impl Default for RemoteSettings {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8080/".to_string(),
            timeout_ms: 30_000,
        }
    }
}

/// Local cache settings.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StoreSettings {
    /// Path of the `SQLite` database file.
    pub db_path: String,
    /// Maximum number of pooled connections.
    pub pool_size: u32,
    /// `SQLite` busy timeout in milliseconds.
    pub busy_timeout_ms: u32,
}

impl Default for StoreSettings {
    fn default() -> Self {
        Self {
            db_path: tasklet_home().join("tasks.db").to_string_lossy().into_owned(),
            pool_size: 4,
            busy_timeout_ms: 5_000,
        }
    }
}

/// Logging configuration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LoggingSettings {
    /// `tracing` filter directive, e.g. `"warn"` or `"tasklet_repository=debug"`.
    pub level: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
