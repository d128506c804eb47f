//! Domain model for to-do tasks.
//!
//! [`Task`] is the canonical in-memory representation used by the repository
//! and the front-end. The request types describe what a caller may send to the
//! task API: [`CreateTaskRequest`] for new tasks and [`UpdateTaskRequest`] for
//! partial updates, where each field is a [`FieldUpdate`].
//!
//! JSON field names follow the task API (`dueDate`, `isCompleted`, `fileUrl`).

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Identifier of a task, assigned by the task API.
pub type TaskId = i64;

/// A single to-do item.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    /// Server-assigned identifier, unique within the local cache.
    pub id: TaskId,
    /// Display title.
    pub title: String,
    /// Due date as `YYYY-MM-DDTHH:mm`; empty means no due date.
    pub due_date: String,
    /// Free-text description, possibly empty.
    pub description: String,
    /// Completion flag.
    pub is_completed: bool,
    /// Attachment reference, if any.
    pub file_url: Option<String>,
}

/// Body of a create call. Completion cannot be set at creation time.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTaskRequest {
    /// Title of the new task.
    pub title: String,
    /// Due date as `YYYY-MM-DDTHH:mm`, or empty.
    pub due_date: String,
    /// Description, possibly empty.
    pub description: String,
    /// Optional attachment reference.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_url: Option<String>,
}

/// One field of a partial update.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FieldUpdate<T> {
    /// Leave the stored value as it is. Omitted from the request body.
    Unchanged,
    /// Replace the stored value.
    Set(T),
}

impl<T> FieldUpdate<T> {
    /// True for [`FieldUpdate::Unchanged`].
    pub fn is_unchanged(&self) -> bool {
        matches!(self, Self::Unchanged)
    }

    /// The new value, if one is set.
    pub fn as_set(&self) -> Option<&T> {
        match self {
            Self::Unchanged => None,
            Self::Set(value) => Some(value),
        }
    }
}

impl<T> Default for FieldUpdate<T> {
    fn default() -> Self {
        Self::Unchanged
    }
}

impl<T> From<T> for FieldUpdate<T> {
    fn from(value: T) -> Self {
        Self::Set(value)
    }
}

impl<T: Serialize> Serialize for FieldUpdate<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            // Only reached when a field forgets `skip_serializing_if`.
            Self::Unchanged => serializer.serialize_none(),
            Self::Set(value) => value.serialize(serializer),
        }
    }
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for FieldUpdate<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        T::deserialize(deserializer).map(Self::Set)
    }
}

/// Reads `null` as [`FieldUpdate::Unchanged`] for fields that cannot be cleared.
fn null_as_unchanged<'de, D, T>(deserializer: D) -> Result<FieldUpdate<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer)
        .map(|value| value.map_or(FieldUpdate::Unchanged, FieldUpdate::Set))
}

/// Body of an update call.
///
/// Every field is independent. `file_url` is a `FieldUpdate<Option<String>>`
/// so the three intents stay distinct: `Unchanged` keeps the attachment,
/// `Set(Some(url))` replaces it and `Set(None)` clears it (sent as `null`).
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTaskRequest {
    /// New title.
    #[serde(
        default,
        deserialize_with = "null_as_unchanged",
        skip_serializing_if = "FieldUpdate::is_unchanged"
    )]
    pub title: FieldUpdate<String>,
    /// New due date.
    #[serde(
        default,
        deserialize_with = "null_as_unchanged",
        skip_serializing_if = "FieldUpdate::is_unchanged"
    )]
    pub due_date: FieldUpdate<String>,
    /// New description.
    #[serde(
        default,
        deserialize_with = "null_as_unchanged",
        skip_serializing_if = "FieldUpdate::is_unchanged"
    )]
    pub description: FieldUpdate<String>,
    /// New completion flag.
    #[serde(
        default,
        deserialize_with = "null_as_unchanged",
        skip_serializing_if = "FieldUpdate::is_unchanged"
    )]
    pub is_completed: FieldUpdate<bool>,
    /// New attachment reference, or `Set(None)` to clear it.
    #[serde(default, skip_serializing_if = "FieldUpdate::is_unchanged")]
    pub file_url: FieldUpdate<Option<String>>,
}

impl UpdateTaskRequest {
    /// True when no field would change.
    pub fn is_empty(&self) -> bool {
        self.title.is_unchanged()
            && self.due_date.is_unchanged()
            && self.description.is_unchanged()
            && self.is_completed.is_unchanged()
            && self.file_url.is_unchanged()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
