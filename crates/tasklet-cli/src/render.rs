//! Plain-text rendering of tasks for the terminal.

use chrono::NaiveDateTime;
use tasklet_core::Task;
use tasklet_core::due::{
    due_date_text, format_full_date, format_time, is_due_soon, is_overdue, relative_time_text,
};

/// One row of `tasklet list`.
pub fn task_line(task: &Task, now: NaiveDateTime) -> String {
    let mark = if task.is_completed { 'x' } else { ' ' };
    let flag = if task.is_completed {
        ""
    } else if is_overdue(&task.due_date, now) {
        " !"
    } else if is_due_soon(&task.due_date, now) {
        " *"
    } else {
        ""
    };
    format!(
        "{:>5}  [{mark}] {}  ({}){flag}",
        task.id,
        task.title,
        due_date_text(&task.due_date, now)
    )
}

/// Every row of a snapshot, or a placeholder when there are none.
pub fn task_list(tasks: &[Task], now: NaiveDateTime) -> String {
    if tasks.is_empty() {
        return "No tasks".to_string();
    }
    tasks
        .iter()
        .map(|task| task_line(task, now))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Multi-line view for `tasklet show`.
pub fn task_detail(task: &Task, now: NaiveDateTime) -> String {
    let due = if task.due_date.trim().is_empty() {
        "none".to_string()
    } else {
        format!(
            "{} {} ({})",
            format_full_date(&task.due_date),
            format_time(&task.due_date),
            relative_time_text(&task.due_date, now)
        )
    };
    let status = if task.is_completed { "completed" } else { "open" };
    let description = if task.description.is_empty() {
        "-"
    } else {
        task.description.as_str()
    };

    format!(
        "#{id} {title}\n  status:      {status}\n  due:         {due}\n  description: {description}\n  attachment:  {attachment}",
        id = task.id,
        title = task.title,
        attachment = task.file_url.as_deref().unwrap_or("-"),
    )
}
