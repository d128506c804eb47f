//! # tasklet
//!
//! Command-line to-do client. Loads settings, installs logging, opens the
//! local task cache, and runs one command through the task repository.

#![deny(unsafe_code)]

mod commands;
mod render;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tasklet_remote::HttpTaskService;
use tasklet_repository::TaskRepository;
use tasklet_settings::TaskletSettings;
use tasklet_store::{ConnectionConfig, SqliteTaskStore};

use crate::commands::Command;

/// Tasklet to-do client.
#[derive(Parser, Debug)]
#[command(name = "tasklet", about = "Tasklet to-do client", version)]
struct Cli {
    /// Settings file (default: `~/.tasklet/settings.json`).
    #[arg(long, global = true)]
    settings: Option<PathBuf>,

    /// Path to the `SQLite` task cache (overrides settings).
    #[arg(long, global = true)]
    db_path: Option<PathBuf>,

    /// Base URL of the task API (overrides settings).
    #[arg(long, global = true)]
    base_url: Option<String>,

    /// Log filter, e.g. `info` or `tasklet_repository=debug` (overrides settings).
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Command,
}

impl Cli {
    fn load_settings(&self) -> Result<TaskletSettings> {
        let path = self
            .settings
            .clone()
            .unwrap_or_else(tasklet_settings::settings_path);
        let mut settings = tasklet_settings::load_settings_from_path(&path)
            .with_context(|| format!("Failed to load settings from {}", path.display()))?;
        self.apply_overrides(&mut settings);
        settings.validate().context("Invalid settings")?;
        Ok(settings)
    }

    fn apply_overrides(&self, settings: &mut TaskletSettings) {
        if let Some(db_path) = &self.db_path {
            settings.store.db_path = db_path.to_string_lossy().into_owned();
        }
        if let Some(base_url) = &self.base_url {
            settings.remote.base_url.clone_from(base_url);
        }
        if let Some(level) = &self.log_level {
            settings.logging.level.clone_from(level);
        }
    }
}

fn build_repository(settings: &TaskletSettings) -> Result<TaskRepository> {
    let config = ConnectionConfig {
        pool_size: settings.store.pool_size,
        busy_timeout_ms: settings.store.busy_timeout_ms,
    };
    let store = SqliteTaskStore::open(&settings.store.db_path, &config)
        .with_context(|| format!("Failed to open task cache at {}", settings.store.db_path))?;
    let service =
        HttpTaskService::new(&settings.remote).context("Failed to create task API client")?;
    Ok(TaskRepository::new(Arc::new(store), Arc::new(service)))
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Cli::parse();
    let settings = args.load_settings()?;
    tasklet_core::logging::init_subscriber(&settings.logging.level);
    tracing::debug!(
        db_path = %settings.store.db_path,
        base_url = %settings.remote.base_url,
        "starting tasklet"
    );

    let repo = build_repository(&settings)?;
    commands::run(&repo, args.command).await
}
