//! Settings loading with deep merge and environment variable overrides.
//!
//! Loading flow:
//! 1. Start with compiled [`TaskletSettings::default()`]
//! 2. If `~/.tasklet/settings.json` exists, deep-merge user values over defaults
//! 3. Apply `TASKLET_*` environment variable overrides (highest priority)
//!
//! Deep merge rules:
//! - Objects are merged recursively (source overrides target per-key)
//! - Arrays and primitives are replaced entirely by source
//! - Null values in source are skipped (preserving target)

use std::ops::RangeInclusive;
use std::path::{Path, PathBuf};

use serde_json::Value;
use tracing::debug;

use crate::errors::Result;
use crate::types::{BUSY_TIMEOUT_MS_RANGE, POOL_SIZE_RANGE, TIMEOUT_MS_RANGE, TaskletSettings};

/// Directory holding Tasklet's settings file and default database.
pub fn tasklet_home() -> PathBuf {
    let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".to_string());
    PathBuf::from(home).join(".tasklet")
}

/// Resolve the path to the settings file (`~/.tasklet/settings.json`).
pub fn settings_path() -> PathBuf {
    tasklet_home().join("settings.json")
}

/// Load settings from the default path with env var overrides.
pub fn load_settings() -> Result<TaskletSettings> {
    load_settings_from_path(&settings_path())
}

/// Load settings from a specific path with env var overrides.
///
/// If the file does not exist, returns defaults. If the file contains
/// invalid JSON, returns an error.
pub fn load_settings_from_path(path: &Path) -> Result<TaskletSettings> {
    let mut settings = read_settings_file(path)?;
    apply_env_overrides(&mut settings);
    Ok(settings)
}

/// Load defaults merged with the file at `path`, without env overrides.
pub fn read_settings_file(path: &Path) -> Result<TaskletSettings> {
    let defaults = serde_json::to_value(TaskletSettings::default())?;

    let merged = if path.exists() {
        debug!(?path, "loading settings from file");
        let content = std::fs::read_to_string(path)?;
        let user: Value = serde_json::from_str(&content)?;
        deep_merge(defaults, user)
    } else {
        debug!(?path, "settings file not found, using defaults");
        defaults
    };

    Ok(serde_json::from_value(merged)?)
}

/// Recursive deep merge of two JSON values.
///
/// - Objects are merged recursively (source overrides target per-key)
/// - Arrays and primitives are replaced entirely by source
/// - Null values in source are skipped (preserving target)
pub fn deep_merge(target: Value, source: Value) -> Value {
    match (target, source) {
        (Value::Object(mut target_map), Value::Object(source_map)) => {
            for (key, source_val) in source_map {
                if source_val.is_null() {
                    continue;
                }
                let merged = if let Some(target_val) = target_map.remove(&key) {
                    deep_merge(target_val, source_val)
                } else {
                    source_val
                };
                let _ = target_map.insert(key, merged);
            }
            Value::Object(target_map)
        }
        (_, source) => source,
    }
}

/// Apply `TASKLET_*` environment variable overrides to loaded settings.
pub fn apply_env_overrides(settings: &mut TaskletSettings) {
    apply_overrides(settings, |name| std::env::var(name).ok());
}

/// Apply overrides read through `lookup`.
///
/// Each variable has strict parsing rules:
/// - Integers must be valid and within the specified range
/// - Strings must be non-empty
/// - Invalid values are ignored with a warning (fall back to file/default)
pub fn apply_overrides<F>(settings: &mut TaskletSettings, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    // ── Remote ──────────────────────────────────────────────────────
    if let Some(v) = read_string(&lookup, "TASKLET_BASE_URL") {
        settings.remote.base_url = v;
    }
    if let Some(v) = read_u64(&lookup, "TASKLET_TIMEOUT_MS", &TIMEOUT_MS_RANGE) {
        settings.remote.timeout_ms = v;
    }

    // ── Store ───────────────────────────────────────────────────────
    if let Some(v) = read_string(&lookup, "TASKLET_DB_PATH") {
        settings.store.db_path = v;
    }
    if let Some(v) = read_u32(&lookup, "TASKLET_POOL_SIZE", &POOL_SIZE_RANGE) {
        settings.store.pool_size = v;
    }
    if let Some(v) = read_u32(&lookup, "TASKLET_BUSY_TIMEOUT_MS", &BUSY_TIMEOUT_MS_RANGE) {
        settings.store.busy_timeout_ms = v;
    }

    // ── Logging ─────────────────────────────────────────────────────
    if let Some(v) = read_string(&lookup, "TASKLET_LOG_LEVEL") {
        settings.logging.level = v;
    }
}

// ── Pure parsing functions (testable without env vars) ──────────────────────

/// Parse a string as a `u32` within a range.
pub fn parse_u32_range(val: &str, min: u32, max: u32) -> Option<u32> {
    let n: u32 = val.parse().ok()?;
    (n >= min && n <= max).then_some(n)
}

/// Parse a string as a `u64` within a range.
pub fn parse_u64_range(val: &str, min: u64, max: u64) -> Option<u64> {
    let n: u64 = val.parse().ok()?;
    (n >= min && n <= max).then_some(n)
}

// ── Variable readers (thin wrappers) ────────────────────────────────────────

fn read_string<F: Fn(&str) -> Option<String>>(lookup: &F, name: &str) -> Option<String> {
    lookup(name).filter(|v| !v.is_empty())
}

fn read_u32<F: Fn(&str) -> Option<String>>(
    lookup: &F,
    name: &str,
    range: &RangeInclusive<u32>,
) -> Option<u32> {
    let val = lookup(name)?;
    let result = parse_u32_range(&val, *range.start(), *range.end());
    if result.is_none() {
        tracing::warn!(key = name, value = %val, "invalid u32 env var, ignoring");
    }
    result
}

fn read_u64<F: Fn(&str) -> Option<String>>(
    lookup: &F,
    name: &str,
    range: &RangeInclusive<u64>,
) -> Option<u64> {
    let val = lookup(name)?;
    let result = parse_u64_range(&val, *range.start(), *range.end());
    if result.is_none() {
        tracing::warn!(key = name, value = %val, "invalid u64 env var, ignoring");
    }
    result
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;
    use assert_matches::assert_matches;

    use crate::errors::SettingsError;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |name: &str| map.get(name).cloned()
    }

    // ── deep_merge ──────────────────────────────────────────────────

    #[test]
    fn merge_nested_override() {
        let target = serde_json::json!({
            "remote": {"baseUrl": "http://a/", "timeoutMs": 30000}
        });
        let source = serde_json::json!({
            "remote": {"timeoutMs": 5000}
        });
        let merged = deep_merge(target, source);
        assert_eq!(merged["remote"]["timeoutMs"], 5000);
        assert_eq!(merged["remote"]["baseUrl"], "http://a/");
    }

    #[test]
    fn merge_array_replace() {
        let target = serde_json::json!({"items": [1, 2, 3]});
        let source = serde_json::json!({"items": [4, 5]});
        let merged = deep_merge(target, source);
        assert_eq!(merged["items"], serde_json::json!([4, 5]));
    }

    #[test]
    fn merge_null_preserves_target() {
        let target = serde_json::json!({"a": 1, "b": 2});
        let source = serde_json::json!({"a": null});
        let merged = deep_merge(target, source);
        assert_eq!(merged["a"], 1);
        assert_eq!(merged["b"], 2);
    }

    #[test]
    fn merge_primitive_replaces_object() {
        let target = serde_json::json!({"a": {"nested": true}});
        let source = serde_json::json!({"a": 42});
        let merged = deep_merge(target, source);
        assert_eq!(merged["a"], 42);
    }

    #[test]
    fn merge_empty_source() {
        let target = serde_json::json!({"a": 1, "b": {"c": 2}});
        let merged = deep_merge(target.clone(), serde_json::json!({}));
        assert_eq!(merged, target);
    }

    // ── read_settings_file ──────────────────────────────────────────

    #[test]
    fn missing_file_returns_defaults() {
        let settings = read_settings_file(Path::new("/nonexistent/settings.json")).unwrap();
        assert_eq!(settings, TaskletSettings::default());
    }

    #[test]
    fn partial_file_overrides() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        std::fs::write(
            &path,
            r#"{"remote": {"baseUrl": "https://tasks.example.com/api/"}, "logging": {"level": "debug"}}"#,
        )
        .unwrap();

        let settings = read_settings_file(&path).unwrap();
        assert_eq!(settings.remote.base_url, "https://tasks.example.com/api/");
        assert_eq!(settings.remote.timeout_ms, 30_000);
        assert_eq!(settings.logging.level, "debug");
        assert_eq!(settings.store.pool_size, 4);
    }

    #[test]
    fn null_in_file_keeps_default() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        std::fs::write(&path, r#"{"store": {"dbPath": null, "poolSize": 2}}"#).unwrap();

        let settings = read_settings_file(&path).unwrap();
        assert_eq!(settings.store.db_path, TaskletSettings::default().store.db_path);
        assert_eq!(settings.store.pool_size, 2);
    }

    #[test]
    fn invalid_json_returns_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        std::fs::write(&path, "not valid json").unwrap();

        let result = read_settings_file(&path);
        assert!(matches!(result.unwrap_err(), SettingsError::Json(_)));
    }

    #[test]
    fn out_of_range_file_values_fail_validation() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");

        std::fs::write(&path, r#"{"remote": {"timeoutMs": 0}}"#).unwrap();
        let settings = read_settings_file(&path).unwrap();
        assert_eq!(settings.remote.timeout_ms, 0);
        assert_matches!(settings.validate(), Err(SettingsError::InvalidValue(msg)) if msg.contains("remote.timeoutMs"));

        std::fs::write(&path, r#"{"store": {"poolSize": 500}}"#).unwrap();
        let settings = read_settings_file(&path).unwrap();
        assert_matches!(settings.validate(), Err(SettingsError::InvalidValue(msg)) if msg.contains("store.poolSize"));
    }

    // ── apply_overrides ─────────────────────────────────────────────

    #[test]
    fn overrides_apply_valid_values() {
        let mut settings = TaskletSettings::default();
        apply_overrides(
            &mut settings,
            lookup_from(&[
                ("TASKLET_BASE_URL", "https://override.example/"),
                ("TASKLET_TIMEOUT_MS", "2500"),
                ("TASKLET_DB_PATH", "/tmp/t.db"),
                ("TASKLET_POOL_SIZE", "8"),
                ("TASKLET_LOG_LEVEL", "info"),
            ]),
        );
        assert_eq!(settings.remote.base_url, "https://override.example/");
        assert_eq!(settings.remote.timeout_ms, 2500);
        assert_eq!(settings.store.db_path, "/tmp/t.db");
        assert_eq!(settings.store.pool_size, 8);
        assert_eq!(settings.logging.level, "info");
    }

    #[test]
    fn overrides_ignore_invalid_values() {
        let mut settings = TaskletSettings::default();
        apply_overrides(
            &mut settings,
            lookup_from(&[
                ("TASKLET_BASE_URL", ""),
                ("TASKLET_TIMEOUT_MS", "10"),
                ("TASKLET_POOL_SIZE", "lots"),
            ]),
        );
        assert_eq!(settings, TaskletSettings::default());
    }

    // ── parse_*_range ───────────────────────────────────────────────

    #[test]
    fn parse_u32_bounds() {
        assert_eq!(parse_u32_range("8", 1, 64), Some(8));
        assert_eq!(parse_u32_range("0", 1, 64), None);
        assert_eq!(parse_u32_range("65", 1, 64), None);
        assert_eq!(parse_u32_range("x", 1, 64), None);
    }

    #[test]
    fn parse_u64_bounds() {
        assert_eq!(parse_u64_range("30000", 1000, 600_000), Some(30_000));
        assert_eq!(parse_u64_range("500", 1000, 600_000), None);
        assert_eq!(parse_u64_range("700000", 1000, 600_000), None);
        assert_eq!(parse_u64_range("abc", 1000, 600_000), None);
    }
}
