//! Wire shapes exchanged with the task API.

use serde::{Deserialize, Serialize};

/// A task as returned by the API.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskResponse {
    /// Server-assigned id.
    pub id: i64,
    /// Task title.
    pub title: String,
    /// `YYYY-MM-DDTHH:mm`, or empty.
    pub due_date: String,
    /// Free-text description.
    pub description: String,
    /// Completion flag.
    pub is_completed: bool,
    /// Attachment URL; absent or `null` when there is none.
    #[serde(default)]
    pub file_url: Option<String>,
}
