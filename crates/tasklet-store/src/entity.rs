//! Row type for the `tasks` table.

/// A task as stored in the local cache.
///
/// Mirrors the domain task field for field; `is_completed` is kept as an
/// `INTEGER` 0/1 column.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TaskEntity {
    /// Primary key, assigned by the task API.
    pub id: i64,
    /// Task title.
    pub title: String,
    /// `YYYY-MM-DDTHH:mm`, or empty.
    pub due_date: String,
    /// Free-text description.
    pub description: String,
    /// Completion flag.
    pub is_completed: bool,
    /// Optional attachment URL.
    pub file_url: Option<String>,
}

pub(crate) const SELECT_COLUMNS: &str =
    "SELECT id, title, due_date, description, is_completed, file_url FROM tasks";

impl TaskEntity {
    pub(crate) fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            title: row.get(1)?,
            due_date: row.get(2)?,
            description: row.get(3)?,
            is_completed: row.get(4)?,
            file_url: row.get(5)?,
        })
    }
}
