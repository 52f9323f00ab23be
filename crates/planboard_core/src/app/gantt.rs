//! Gantt bar rows derived from tasks.

use crate::model::task::{Task, TaskStatus};
use chrono::NaiveDate;
use serde::Serialize;

/// Bar colors as `#rrggbb`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BarStyle {
    pub background: &'static str,
    pub progress: &'static str,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GanttRow {
    pub id: String,
    pub name: String,
    pub project_id: Option<String>,
    pub start: NaiveDate,
    pub end: NaiveDate,
    /// Progress hint from status.
    pub progress: u8,
    pub style: BarStyle,
}

pub fn bar_style(status: TaskStatus) -> BarStyle {
    match status {
        TaskStatus::Completed => BarStyle {
            background: "#10b981",
            progress: "#059669",
        },
        TaskStatus::InProgress => BarStyle {
            background: "#3b82f6",
            progress: "#2563eb",
        },
        TaskStatus::OnHold => BarStyle {
            background: "#f59e0b",
            progress: "#d97706",
        },
        TaskStatus::NotStarted | TaskStatus::Pending => BarStyle {
            background: "#6b7280",
            progress: "#4b5563",
        },
    }
}

/// One row per dated task, ordered by start date. A task with only one date
/// is drawn as a single-day bar.
pub fn gantt_rows<'a>(tasks: impl IntoIterator<Item = &'a Task>) -> Vec<GanttRow> {
    let mut rows: Vec<GanttRow> = tasks
        .into_iter()
        .filter_map(|task| {
            let start = task.start_date.or(task.end_date)?;
            let end = task.end_date.unwrap_or(start).max(start);
            Some(GanttRow {
                id: task.id.clone(),
                name: task.name.clone(),
                project_id: task.project_id.clone(),
                start,
                end,
                progress: task.status.progress_hint(),
                style: bar_style(task.status),
            })
        })
        .collect();
    rows.sort_by_key(|row| row.start);
    rows
}
