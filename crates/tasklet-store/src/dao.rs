//! The local task store: the [`TaskDao`] contract and its `SQLite`
//! implementation.
//!
//! Every write runs as a single statement (or one transaction for
//! [`TaskDao::insert_all`]) and then re-reads the table on the same
//! connection, publishing the snapshot to all [`TaskDao::observe_all`]
//! subscribers. If that re-read fails the store is marked stale and the next
//! call of any kind publishes again.

use std::sync::atomic::{AtomicBool, Ordering};

use rusqlite::{Connection, OptionalExtension, params};
use tokio::sync::watch;
use tracing::{debug, instrument, warn};

use crate::connection::{self, ConnectionConfig, ConnectionPool};
use crate::entity::{SELECT_COLUMNS, TaskEntity};
use crate::errors::Result;
use crate::migrations::run_migrations;

const UPSERT_SQL: &str = "INSERT OR REPLACE INTO tasks \
     (id, title, due_date, description, is_completed, file_url) \
     VALUES (?1, ?2, ?3, ?4, ?5, ?6)";

/// Access to the local task table.
///
/// Calls are synchronous and may block on disk I/O; async callers should hop
/// onto a blocking thread.
pub trait TaskDao: Send + Sync {
    /// Subscribe to the whole table.
    ///
    /// The receiver starts out holding the current snapshot and is updated
    /// after every write that changes the table. A write whose snapshot could
    /// not be read reaches subscribers on the next store call instead.
    fn observe_all(&self) -> watch::Receiver<Vec<TaskEntity>>;

    /// Point-in-time read of every row, ordered by id.
    fn get_all(&self) -> Result<Vec<TaskEntity>>;

    /// Look up one row.
    fn get_by_id(&self, id: i64) -> Result<Option<TaskEntity>>;

    /// Insert a row, replacing any row with the same id.
    fn insert(&self, task: &TaskEntity) -> Result<()>;

    /// Insert-or-replace a batch in one transaction.
    fn insert_all(&self, tasks: &[TaskEntity]) -> Result<()>;

    /// Overwrite an existing row. Returns `false` when no row has that id.
    fn update(&self, task: &TaskEntity) -> Result<bool>;

    /// Delete one row. Returns whether a row was removed.
    fn delete_by_id(&self, id: i64) -> Result<bool>;

    /// Delete every row and return how many were removed.
    fn delete_all(&self) -> Result<usize>;
}

/// [`TaskDao`] backed by a pooled `SQLite` database.
pub struct SqliteTaskStore {
    pool: ConnectionPool,
    snapshots: watch::Sender<Vec<TaskEntity>>,
    stale: AtomicBool,
}

impl SqliteTaskStore {
    /// Wrap an existing pool, running pending migrations first.
    pub fn new(pool: ConnectionPool) -> Result<Self> {
        let conn = pool.get()?;
        let applied = run_migrations(&conn)?;
        let initial = read_all(&conn)?;
        debug!(applied, rows = initial.len(), "task store ready");
        drop(conn);

        let (snapshots, _) = watch::channel(initial);
        Ok(Self {
            pool,
            snapshots,
            stale: AtomicBool::new(false),
        })
    }

    /// Open (or create) the database file at `path`.
    pub fn open(path: &str, config: &ConnectionConfig) -> Result<Self> {
        Self::new(connection::new_file(path, config)?)
    }

    /// A fresh, empty in-memory store.
    pub fn in_memory() -> Result<Self> {
        Self::new(connection::new_in_memory(&ConnectionConfig::default())?)
    }

    /// Re-read the table and publish it if it changed.
    ///
    /// The read happens under the channel's lock, so snapshots are published
    /// in the order they were read. A failed read leaves the last snapshot in
    /// place and marks the store stale; the write itself has already committed.
    fn publish(&self, conn: &Connection) {
        let mut failure = None;
        let _ = self.snapshots.send_if_modified(|current| match read_all(conn) {
            Ok(rows) if rows != *current => {
                *current = rows;
                true
            }
            Ok(_) => false,
            Err(e) => {
                failure = Some(e);
                false
            }
        });
        if let Some(error) = failure {
            warn!(%error, "failed to publish task snapshot");
            self.stale.store(true, Ordering::Release);
        } else {
            self.stale.store(false, Ordering::Release);
        }
    }

    /// Publish when the table changed or an earlier publish failed.
    fn publish_after(&self, conn: &Connection, changed: bool) {
        if changed || self.stale.load(Ordering::Acquire) {
            self.publish(conn);
        }
    }
}

impl TaskDao for SqliteTaskStore {
    fn observe_all(&self) -> watch::Receiver<Vec<TaskEntity>> {
        self.snapshots.subscribe()
    }

    fn get_all(&self) -> Result<Vec<TaskEntity>> {
        let conn = self.pool.get()?;
        self.publish_after(&conn, false);
        read_all(&conn)
    }

    fn get_by_id(&self, id: i64) -> Result<Option<TaskEntity>> {
        let conn = self.pool.get()?;
        self.publish_after(&conn, false);
        let row = conn
            .query_row(
                &format!("{SELECT_COLUMNS} WHERE id = ?1"),
                params![id],
                TaskEntity::from_row,
            )
            .optional()?;
        Ok(row)
    }

    #[instrument(skip_all, fields(id = task.id))]
    fn insert(&self, task: &TaskEntity) -> Result<()> {
        let conn = self.pool.get()?;
        let _ = conn.execute(UPSERT_SQL, upsert_params(task))?;
        self.publish(&conn);
        Ok(())
    }

    #[instrument(skip_all, fields(count = tasks.len()))]
    fn insert_all(&self, tasks: &[TaskEntity]) -> Result<()> {
        let mut conn = self.pool.get()?;
        let tx = conn.transaction()?;
        {
            let mut stmt = tx.prepare_cached(UPSERT_SQL)?;
            for task in tasks {
                let _ = stmt.execute(upsert_params(task))?;
            }
        }
        tx.commit()?;
        self.publish(&conn);
        Ok(())
    }

    #[instrument(skip_all, fields(id = task.id))]
    fn update(&self, task: &TaskEntity) -> Result<bool> {
        let conn = self.pool.get()?;
        let changed = conn.execute(
            "UPDATE tasks SET title = ?2, due_date = ?3, description = ?4, \
                 is_completed = ?5, file_url = ?6 \
             WHERE id = ?1",
            upsert_params(task),
        )?;
        self.publish_after(&conn, changed > 0);
        Ok(changed > 0)
    }

    #[instrument(skip(self))]
    fn delete_by_id(&self, id: i64) -> Result<bool> {
        let conn = self.pool.get()?;
        let changed = conn.execute("DELETE FROM tasks WHERE id = ?1", params![id])?;
        self.publish_after(&conn, changed > 0);
        Ok(changed > 0)
    }

    #[instrument(skip(self))]
    fn delete_all(&self) -> Result<usize> {
        let conn = self.pool.get()?;
        let removed = conn.execute("DELETE FROM tasks", [])?;
        self.publish(&conn);
        Ok(removed)
    }
}

fn read_all(conn: &Connection) -> Result<Vec<TaskEntity>> {
    let mut stmt = conn.prepare_cached(&format!("{SELECT_COLUMNS} ORDER BY id"))?;
    let rows = stmt
        .query_map([], TaskEntity::from_row)?
        .collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(rows)
}

fn upsert_params(task: &TaskEntity) -> (i64, &str, &str, &str, bool, Option<&str>) {
    (
        task.id,
        &task.title,
        &task.due_date,
        &task.description,
        task.is_completed,
        task.file_url.as_deref(),
    )
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
