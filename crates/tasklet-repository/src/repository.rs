//! Read and write policies over the local cache and the task API.
//!
//! Reads are local-first. Every mutation goes to the API first and the cache
//! only ever receives records the API returned. Nothing here retries, queues,
//! or resolves conflicts: a failed call leaves the cache exactly as it was.

use std::sync::Arc;

use futures::{Stream, StreamExt};
use tasklet_core::{CreateTaskRequest, Task, TaskError, TaskId, TaskResult, UpdateTaskRequest};
use tasklet_remote::{ApiResponse, RemoteError, TaskResponse, TaskService};
use tasklet_store::{StoreError, TaskDao, TaskEntity};
use tokio_stream::wrappers::WatchStream;
use tracing::{debug, instrument, warn};

use crate::mappers::{entity_to_domain, response_to_domain, response_to_entity};

/// Single entry point for task data.
#[derive(Clone)]
pub struct TaskRepository {
    store: Arc<dyn TaskDao>,
    service: Arc<dyn TaskService>,
}

impl TaskRepository {
    /// Combine a local store and a remote service.
    pub fn new(store: Arc<dyn TaskDao>, service: Arc<dyn TaskService>) -> Self {
        Self { store, service }
    }

    /// Live view of every cached task.
    ///
    /// Yields the current contents immediately, then a fresh list after each
    /// change to the cache. Slow consumers only see the latest list. Never
    /// touches the network.
    pub fn observe_tasks(&self) -> impl Stream<Item = Vec<Task>> + Send + 'static {
        WatchStream::new(self.store.observe_all())
            .map(|rows| rows.into_iter().map(entity_to_domain).collect())
    }

    /// Replace the cache contents with the API's task list.
    ///
    /// Records are insert-or-replaced by id in one transaction, so repeating
    /// a refresh never duplicates rows. Cached tasks missing from the list
    /// are kept.
    #[instrument(skip(self))]
    pub async fn refresh_tasks(&self) -> TaskResult<()> {
        let response = self
            .service
            .get_tasks()
            .await
            .map_err(|e| remote_failure("Failed to fetch tasks", e))?;
        let status = response.status;
        let Some(tasks) = response.success_body() else {
            return Err(status_failure("Failed to fetch tasks", status));
        };

        let entities: Vec<_> = tasks.into_iter().map(response_to_entity).collect();
        let count = entities.len();
        self.with_store("refresh tasks", move |store| store.insert_all(&entities))
            .await?;
        debug!(count, "refreshed task cache");
        Ok(())
    }

    /// Fetch one task, from the cache when possible.
    ///
    /// On a cache miss the API is asked and a found task is cached before it
    /// is returned.
    #[instrument(skip(self))]
    pub async fn get_task(&self, id: TaskId) -> TaskResult<Task> {
        if let Some(entity) = self
            .with_store("get task", move |store| store.get_by_id(id))
            .await?
        {
            return Ok(entity_to_domain(entity));
        }

        let response = self
            .service
            .get_task(id)
            .await
            .map_err(|e| remote_failure("Failed to get task", e))?;
        let Some(found) = response.success_body() else {
            return Err(TaskError::new("Task not found"));
        };

        let task = response_to_domain(found.clone());
        self.cache(response_to_entity(found), "get task").await?;
        Ok(task)
    }

    /// Delete a task remotely, then locally.
    #[instrument(skip(self))]
    pub async fn delete_task(&self, id: TaskId) -> TaskResult<()> {
        let response = self
            .service
            .delete_task(id)
            .await
            .map_err(|e| remote_failure("Failed to delete task", e))?;
        if !response.is_success() {
            return Err(status_failure("Failed to delete task", response.status));
        }

        let removed = self
            .with_store("delete task", move |store| store.delete_by_id(id))
            .await?;
        if !removed {
            debug!(id, "deleted task was not cached");
        }
        Ok(())
    }

    /// Apply a partial update and cache the record the API returns.
    ///
    /// The returned record overwrites the cached one completely, including
    /// an attachment the API no longer reports.
    #[instrument(skip(self, request))]
    pub async fn update_task(&self, id: TaskId, request: &UpdateTaskRequest) -> TaskResult<Task> {
        if request.is_empty() {
            debug!(id, "update request changes nothing");
        }
        let response = self
            .service
            .update_task(id, request)
            .await
            .map_err(|e| remote_failure("Failed to update task", e))?;
        self.cache_returned(response, "Failed to update task").await
    }

    /// Create a task and cache it under the id the API assigned.
    #[instrument(skip_all)]
    pub async fn create_task(&self, request: &CreateTaskRequest) -> TaskResult<Task> {
        let response = self
            .service
            .create_task(request)
            .await
            .map_err(|e| remote_failure("Failed to create task", e))?;
        self.cache_returned(response, "Failed to create task").await
    }

    async fn cache_returned(
        &self,
        response: ApiResponse<TaskResponse>,
        failure: &'static str,
    ) -> TaskResult<Task> {
        let status = response.status;
        let Some(returned) = response.success_body() else {
            return Err(status_failure(failure, status));
        };
        let task = response_to_domain(returned.clone());
        self.cache(response_to_entity(returned), failure).await?;
        Ok(task)
    }

    async fn cache(&self, entity: TaskEntity, op: &'static str) -> TaskResult<()> {
        self.with_store(op, move |store| store.insert(&entity)).await
    }

    /// Run a store call on the blocking pool.
    async fn with_store<T, F>(&self, op: &'static str, f: F) -> TaskResult<T>
    where
        T: Send + 'static,
        F: FnOnce(&dyn TaskDao) -> Result<T, StoreError> + Send + 'static,
    {
        let store = Arc::clone(&self.store);
        tokio::task::spawn_blocking(move || f(store.as_ref()))
            .await
            .map_err(|e| TaskError::with_source(format!("{op}: store task aborted"), e))?
            .map_err(|e| {
                warn!(op, error = %e, "local store failure");
                TaskError::with_source(format!("{op}: local store failure"), e)
            })
    }
}

fn status_failure(what: &str, status: u16) -> TaskError {
    warn!(status, "{what}");
    TaskError::new(format!("{what}: {status}"))
}

fn remote_failure(what: &str, error: RemoteError) -> TaskError {
    warn!(error = %error, "{what}");
    TaskError::with_source(format!("{what}: {error}"), error)
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
