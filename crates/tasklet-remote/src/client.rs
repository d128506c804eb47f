//! The [`TaskService`] contract and its `reqwest` implementation.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Method, StatusCode, Url};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tasklet_core::{CreateTaskRequest, TaskId, UpdateTaskRequest};
use tasklet_settings::RemoteSettings;
use tracing::{debug, instrument};

use crate::dto::TaskResponse;
use crate::errors::{RemoteError, Result};

const USER_AGENT: &str = concat!("tasklet/", env!("CARGO_PKG_VERSION"));

/// Status code plus optional decoded body of one API call.
///
/// `body` is `None` for non-2xx responses and for empty 2xx bodies.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ApiResponse<T> {
    /// HTTP status code.
    pub status: u16,
    /// Decoded body, when there was one to decode.
    pub body: Option<T>,
}

impl<T> ApiResponse<T> {
    /// Whether the status is in the 2xx range.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// The body of a 2xx response, or `None`.
    pub fn success_body(self) -> Option<T> {
        if self.is_success() { self.body } else { None }
    }
}

/// Remote operations on tasks.
#[async_trait]
pub trait TaskService: Send + Sync {
    /// `GET /tasks`
    async fn get_tasks(&self) -> Result<ApiResponse<Vec<TaskResponse>>>;

    /// `GET /tasks/{id}`
    async fn get_task(&self, id: TaskId) -> Result<ApiResponse<TaskResponse>>;

    /// `POST /tasks`
    async fn create_task(&self, request: &CreateTaskRequest) -> Result<ApiResponse<TaskResponse>>;

    /// `PUT /tasks/{id}` with only the fields being changed.
    async fn update_task(
        &self,
        id: TaskId,
        request: &UpdateTaskRequest,
    ) -> Result<ApiResponse<TaskResponse>>;

    /// `DELETE /tasks/{id}`; any response body is ignored.
    async fn delete_task(&self, id: TaskId) -> Result<ApiResponse<()>>;
}

/// [`TaskService`] over HTTP/JSON.
#[derive(Debug)]
pub struct HttpTaskService {
    client: reqwest::Client,
    base_url: Url,
}

impl HttpTaskService {
    /// Build a client for `settings.base_url` with the configured timeout.
    pub fn new(settings: &RemoteSettings) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_millis(settings.timeout_ms))
            .user_agent(USER_AGENT)
            .build()?;
        Self::with_client(&settings.base_url, client)
    }

    /// Use an existing `reqwest` client.
    ///
    /// A missing trailing slash is added so endpoint paths resolve below the
    /// base path rather than replacing its last segment.
    pub fn with_client(base_url: &str, client: reqwest::Client) -> Result<Self> {
        let normalized = if base_url.ends_with('/') {
            base_url.to_string()
        } else {
            format!("{base_url}/")
        };
        let base_url = Url::parse(&normalized)
            .map_err(|e| RemoteError::InvalidBaseUrl(format!("{base_url}: {e}")))?;
        if base_url.cannot_be_a_base() {
            return Err(RemoteError::InvalidBaseUrl(base_url.to_string()));
        }
        Ok(Self { client, base_url })
    }

    /// The normalized base URL.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> Result<Url> {
        self.base_url
            .join(path)
            .map_err(|e| RemoteError::InvalidBaseUrl(format!("{}{path}: {e}", self.base_url)))
    }

    async fn send<T, B>(&self, method: Method, path: &str, body: Option<&B>) -> Result<ApiResponse<T>>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized + Sync,
    {
        let (status, bytes) = self.execute(method, path, body).await?;
        if !status.is_success() {
            return Ok(ApiResponse {
                status: status.as_u16(),
                body: None,
            });
        }
        if bytes.iter().all(u8::is_ascii_whitespace) {
            debug!(status = status.as_u16(), "empty response body");
            return Ok(ApiResponse {
                status: status.as_u16(),
                body: None,
            });
        }
        let decoded = serde_json::from_slice(&bytes).map_err(|source| RemoteError::Decode {
            status: status.as_u16(),
            source,
        })?;
        Ok(ApiResponse {
            status: status.as_u16(),
            body: Some(decoded),
        })
    }

    async fn execute<B>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
    ) -> Result<(StatusCode, Vec<u8>)>
    where
        B: Serialize + ?Sized + Sync,
    {
        let url = self.endpoint(path)?;
        let mut request = self.client.request(method, url);
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await?;
        let status = response.status();
        let bytes = response.bytes().await?;
        if !status.is_success() {
            debug!(
                status = status.as_u16(),
                body = %String::from_utf8_lossy(&bytes),
                "task api returned an error status"
            );
        }
        Ok((status, bytes.to_vec()))
    }
}

#[async_trait]
impl TaskService for HttpTaskService {
    #[instrument(skip(self))]
    async fn get_tasks(&self) -> Result<ApiResponse<Vec<TaskResponse>>> {
        self.send::<_, ()>(Method::GET, "tasks", None).await
    }

    #[instrument(skip(self))]
    async fn get_task(&self, id: TaskId) -> Result<ApiResponse<TaskResponse>> {
        self.send::<_, ()>(Method::GET, &format!("tasks/{id}"), None)
            .await
    }

    #[instrument(skip_all)]
    async fn create_task(&self, request: &CreateTaskRequest) -> Result<ApiResponse<TaskResponse>> {
        self.send(Method::POST, "tasks", Some(request)).await
    }

    #[instrument(skip(self, request))]
    async fn update_task(
        &self,
        id: TaskId,
        request: &UpdateTaskRequest,
    ) -> Result<ApiResponse<TaskResponse>> {
        self.send(Method::PUT, &format!("tasks/{id}"), Some(request))
            .await
    }

    #[instrument(skip(self))]
    async fn delete_task(&self, id: TaskId) -> Result<ApiResponse<()>> {
        let (status, _) = self
            .execute::<()>(Method::DELETE, &format!("tasks/{id}"), None)
            .await?;
        Ok(ApiResponse {
            status: status.as_u16(),
            body: status.is_success().then_some(()),
        })
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
