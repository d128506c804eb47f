//! # tasklet-settings
//!
//! Configuration management with layered sources for the Tasklet client.
//!
//! Settings are loaded from three layers (in priority order):
//! 1. **Compiled defaults**: [`TaskletSettings::default()`]
//! 2. **User file**: `~/.tasklet/settings.json` (deep-merged over defaults)
//! 3. **Environment variables**: `TASKLET_*` overrides (highest priority)
//!
//! Settings are loaded once by the binary and handed to the components that
//! need them; nothing here is global.

#![deny(unsafe_code)]

pub mod errors;
pub mod loader;
pub mod types;

pub use errors::{Result, SettingsError};
pub use loader::{
    apply_env_overrides, apply_overrides, deep_merge, load_settings, load_settings_from_path,
    read_settings_file, settings_path, tasklet_home,
};
pub use types::{LoggingSettings, RemoteSettings, StoreSettings, TaskletSettings};
