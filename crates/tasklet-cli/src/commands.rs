//! Subcommands and their handlers.

use std::pin::pin;
use std::time::Duration;

use anyhow::{Result, bail};
use clap::{Args, Subcommand};
use futures::StreamExt;
use tasklet_core::due::{local_now, parse_due_date};
use tasklet_core::{CreateTaskRequest, FieldUpdate, TaskId, TaskResult, UpdateTaskRequest};
use tasklet_repository::TaskRepository;
use tokio::time::{Interval, MissedTickBehavior};
use tracing::{info, warn};

use crate::render;

/// What to do once the repository is wired up.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Print the cached tasks.
    List {
        /// Refresh from the server first.
        #[arg(long)]
        refresh: bool,
    },
    /// Pull the full task list from the server into the cache.
    Refresh,
    /// Show one task.
    Show {
        /// Task id.
        id: TaskId,
    },
    /// Create a task.
    Add(AddArgs),
    /// Change some fields of a task.
    Edit(EditArgs),
    /// Mark a task as completed.
    Complete {
        /// Task id.
        id: TaskId,
    },
    /// Mark a task as not completed.
    Reopen {
        /// Task id.
        id: TaskId,
    },
    /// Delete a task.
    Delete {
        /// Task id.
        id: TaskId,
    },
    /// Print the task list every time it changes, until Ctrl-C.
    Watch {
        /// Also refresh from the server every SECS seconds.
        #[arg(long, value_name = "SECS", value_parser = clap::value_parser!(u64).range(1..))]
        refresh_every: Option<u64>,
    },
}

/// Arguments of `tasklet add`.
#[derive(Args, Debug)]
pub struct AddArgs {
    /// Title; must not be blank.
    #[arg(long)]
    pub title: String,
    /// Due date as `YYYY-MM-DDTHH:mm`.
    #[arg(long)]
    pub due: Option<String>,
    /// Free-text description.
    #[arg(long, default_value = "")]
    pub description: String,
    /// Attachment URL.
    #[arg(long)]
    pub file_url: Option<String>,
}

impl AddArgs {
    /// Validate the input and build the create request.
    pub fn into_request(self) -> Result<CreateTaskRequest> {
        let title = self.title.trim();
        if title.is_empty() {
            bail!("title must not be blank");
        }
        let due_date = checked_due(self.due.as_deref().unwrap_or_default())?;
        Ok(CreateTaskRequest {
            title: title.to_string(),
            due_date,
            description: self.description,
            file_url: self.file_url.filter(|url| !url.trim().is_empty()),
        })
    }
}

/// Arguments of `tasklet edit`. Only the flags given are sent.
#[derive(Args, Debug)]
pub struct EditArgs {
    /// Task id.
    pub id: TaskId,
    /// New title.
    #[arg(long)]
    pub title: Option<String>,
    /// New due date as `YYYY-MM-DDTHH:mm`; an empty value clears it.
    #[arg(long)]
    pub due: Option<String>,
    /// New description.
    #[arg(long)]
    pub description: Option<String>,
    /// New completion flag.
    #[arg(long, value_name = "BOOL")]
    pub completed: Option<bool>,
    /// New attachment URL.
    #[arg(long, conflicts_with = "clear_file")]
    pub file_url: Option<String>,
    /// Remove the attachment.
    #[arg(long)]
    pub clear_file: bool,
}

impl EditArgs {
    /// Build the partial update; fails when nothing would change.
    pub fn to_request(&self) -> Result<UpdateTaskRequest> {
        let mut request = UpdateTaskRequest::default();
        if let Some(title) = &self.title {
            let title = title.trim();
            if title.is_empty() {
                bail!("title must not be blank");
            }
            request.title = FieldUpdate::Set(title.to_string());
        }
        if let Some(due) = &self.due {
            request.due_date = FieldUpdate::Set(checked_due(due)?);
        }
        if let Some(description) = &self.description {
            request.description = FieldUpdate::Set(description.clone());
        }
        if let Some(completed) = self.completed {
            request.is_completed = FieldUpdate::Set(completed);
        }
        if let Some(url) = &self.file_url {
            request.file_url = FieldUpdate::Set(Some(url.clone()));
        } else if self.clear_file {
            request.file_url = FieldUpdate::Set(None);
        }
        if request.is_empty() {
            bail!("nothing to change; pass at least one field flag");
        }
        Ok(request)
    }
}

fn checked_due(due: &str) -> Result<String> {
    let due = due.trim();
    if !due.is_empty() && parse_due_date(due).is_none() {
        bail!("invalid due date {due:?}; expected YYYY-MM-DDTHH:mm");
    }
    Ok(due.to_string())
}

/// Log a repository failure and hand it back as an `anyhow` error.
fn report<T>(result: TaskResult<T>, what: &str) -> Result<T> {
    result.map_err(|error| {
        warn!(%error, "{what} failed");
        anyhow::Error::new(error).context(format!("{what} failed"))
    })
}

/// Run one command against the repository.
pub async fn run(repo: &TaskRepository, command: Command) -> Result<()> {
    match command {
        Command::List { refresh } => {
            if refresh {
                report(repo.refresh_tasks().await, "refresh")?;
            }
            let mut tasks = pin!(repo.observe_tasks());
            let snapshot = tasks.next().await.unwrap_or_default();
            println!("{}", render::task_list(&snapshot, local_now()));
        }
        Command::Refresh => {
            report(repo.refresh_tasks().await, "refresh")?;
            println!("Tasks refreshed");
        }
        Command::Show { id } => {
            let task = report(repo.get_task(id).await, "show")?;
            println!("{}", render::task_detail(&task, local_now()));
        }
        Command::Add(args) => {
            let request = args.into_request()?;
            let task = report(repo.create_task(&request).await, "add")?;
            println!("Created task {}", task.id);
        }
        Command::Edit(args) => {
            let request = args.to_request()?;
            let task = report(repo.update_task(args.id, &request).await, "edit")?;
            println!("{}", render::task_detail(&task, local_now()));
        }
        Command::Complete { id } => set_completed(repo, id, true).await?,
        Command::Reopen { id } => set_completed(repo, id, false).await?,
        Command::Delete { id } => {
            report(repo.delete_task(id).await, "delete")?;
            println!("Deleted task {id}");
        }
        Command::Watch { refresh_every } => watch(repo, refresh_every).await?,
    }
    Ok(())
}

async fn set_completed(repo: &TaskRepository, id: TaskId, completed: bool) -> Result<()> {
    let request = UpdateTaskRequest {
        is_completed: FieldUpdate::Set(completed),
        ..Default::default()
    };
    let task = report(repo.update_task(id, &request).await, "update")?;
    println!("{}", render::task_line(&task, local_now()));
    Ok(())
}

async fn watch(repo: &TaskRepository, refresh_every: Option<u64>) -> Result<()> {
    let mut snapshots = pin!(repo.observe_tasks());
    let mut shutdown = pin!(tokio::signal::ctrl_c());
    let mut ticker = refresh_every.map(|secs| {
        let mut interval = tokio::time::interval(Duration::from_secs(secs));
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        interval
    });

    loop {
        tokio::select! {
            _ = &mut shutdown => {
                info!("watch interrupted");
                break;
            }
            snapshot = snapshots.next() => {
                let Some(tasks) = snapshot else { break };
                println!("── {} ──", local_now().format("%H:%M:%S"));
                println!("{}", render::task_list(&tasks, local_now()));
            }
            () = tick(ticker.as_mut()) => {
                // A failed periodic refresh is logged and the watch continues.
                if let Err(error) = repo.refresh_tasks().await {
                    warn!(%error, "periodic refresh failed");
                }
            }
        }
    }
    Ok(())
}

async fn tick(ticker: Option<&mut Interval>) {
    match ticker {
        Some(interval) => {
            let _ = interval.tick().await;
        }
        None => std::future::pending().await,
    }
}
