//! Task entity and the canonical task status set.
//!
//! # Invariants
//! - `name` is non-empty after trim.
//! - `end_date >= start_date` when both are set.
//! - `project_id` is a weak reference; removing a project removes its tasks.
//! - Status strings from any older shape (`not_started`, `active`, ...)
//!   decode into the canonical set.

use super::{
    non_blank, require_date_order, require_text, Entity, EntityId, Priority, ValidationError,
};
use crate::utils::date::{flexible_date, is_overdue};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Canonical task status.
///
/// Serialized kebab-case. `active` and `overdue` are accepted on read and
/// mapped to `InProgress`; overdue is derived from dates, never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TaskStatus {
    #[default]
    #[serde(alias = "not_started", alias = "todo")]
    NotStarted,
    #[serde(alias = "in_progress", alias = "active", alias = "overdue")]
    InProgress,
    #[serde(alias = "done")]
    Completed,
    #[serde(alias = "on_hold")]
    OnHold,
    Pending,
}

impl TaskStatus {
    pub const ALL: [TaskStatus; 5] = [
        Self::NotStarted,
        Self::InProgress,
        Self::Completed,
        Self::OnHold,
        Self::Pending,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::NotStarted => "not-started",
            Self::InProgress => "in-progress",
            Self::Completed => "completed",
            Self::OnHold => "on-hold",
            Self::Pending => "pending",
        }
    }

    /// Status string used by the remote API.
    pub fn as_remote_str(self) -> &'static str {
        match self {
            Self::NotStarted | Self::Pending => "not_started",
            Self::InProgress => "in_progress",
            Self::Completed => "completed",
            Self::OnHold => "on_hold",
        }
    }

    /// Accepts canonical, snake_case and legacy spellings.
    pub fn parse(value: &str) -> Option<Self> {
        let normalized = value.trim().to_ascii_lowercase().replace('_', "-");
        match normalized.as_str() {
            "not-started" | "todo" => Some(Self::NotStarted),
            "in-progress" | "active" | "overdue" => Some(Self::InProgress),
            "completed" | "done" => Some(Self::Completed),
            "on-hold" => Some(Self::OnHold),
            "pending" => Some(Self::Pending),
            _ => None,
        }
    }

    /// Weight used when deriving project progress from task statuses.
    pub fn progress_hint(self) -> u8 {
        match self {
            Self::Completed => 100,
            Self::InProgress => 50,
            Self::OnHold => 25,
            Self::NotStarted | Self::Pending => 0,
        }
    }

    pub fn is_completed(self) -> bool {
        self == Self::Completed
    }
}

/// Persisted task record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: EntityId,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub status: TaskStatus,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default)]
    pub project_id: Option<EntityId>,
    /// Team member id.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assigned_to: Option<EntityId>,
    #[serde(default, with = "flexible_date")]
    pub start_date: Option<NaiveDate>,
    #[serde(default, with = "flexible_date")]
    pub end_date: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Task {
    pub fn validate(&self) -> Result<(), ValidationError> {
        require_text("name", &self.name)?;
        require_date_order(self.start_date, self.end_date)
    }

    /// True when unfinished and the end date lies before `today`.
    pub fn is_overdue(&self, today: NaiveDate) -> bool {
        !self.status.is_completed() && is_overdue(self.end_date, today)
    }

    pub fn belongs_to(&self, project_id: &str) -> bool {
        self.project_id.as_deref() == Some(project_id)
    }
}

impl Entity for Task {
    const KIND: &'static str = "task";

    fn id(&self) -> &str {
        &self.id
    }
}

/// Creation input for a task.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct NewTask {
    pub name: String,
    pub description: Option<String>,
    pub status: TaskStatus,
    pub priority: Priority,
    pub project_id: Option<EntityId>,
    pub assigned_to: Option<EntityId>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

impl NewTask {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn in_project(mut self, project_id: impl Into<EntityId>) -> Self {
        self.project_id = Some(project_id.into());
        self
    }

    pub fn into_task(self, id: EntityId, now: DateTime<Utc>) -> Task {
        Task {
            id,
            name: self.name.trim().to_string(),
            description: non_blank(self.description),
            status: self.status,
            priority: self.priority,
            project_id: non_blank(self.project_id),
            assigned_to: non_blank(self.assigned_to),
            start_date: self.start_date,
            end_date: self.end_date,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Partial update for a task. `None` leaves the field untouched.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TaskPatch {
    pub name: Option<String>,
    pub description: Option<String>,
    pub status: Option<TaskStatus>,
    pub priority: Option<Priority>,
    pub project_id: Option<EntityId>,
    /// Empty string unassigns.
    pub assigned_to: Option<EntityId>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

impl TaskPatch {
    pub fn status(status: TaskStatus) -> Self {
        Self {
            status: Some(status),
            ..Self::default()
        }
    }

    pub fn apply(&self, task: &mut Task) {
        if let Some(name) = &self.name {
            task.name = name.trim().to_string();
        }
        if let Some(description) = &self.description {
            task.description = non_blank(Some(description.clone()));
        }
        if let Some(status) = self.status {
            task.status = status;
        }
        if let Some(priority) = self.priority {
            task.priority = priority;
        }
        if let Some(project_id) = &self.project_id {
            task.project_id = non_blank(Some(project_id.clone()));
        }
        if let Some(assigned_to) = &self.assigned_to {
            task.assigned_to = non_blank(Some(assigned_to.clone()));
        }
        if self.start_date.is_some() {
            task.start_date = self.start_date;
        }
        if self.end_date.is_some() {
            task.end_date = self.end_date;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{NewTask, Task, TaskPatch, TaskStatus};
    use chrono::{NaiveDate, TimeZone, Utc};

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, d).unwrap()
    }

    fn sample() -> Task {
        NewTask::named("Draft copy")
            .in_project("p1")
            .into_task("t1".to_string(), Utc.with_ymd_and_hms(2024, 3, 1, 8, 0, 0).unwrap())
    }

    #[test]
    fn legacy_status_spellings_decode_to_canonical_set() {
        for (raw, expected) in [
            ("\"not_started\"", TaskStatus::NotStarted),
            ("\"in_progress\"", TaskStatus::InProgress),
            ("\"active\"", TaskStatus::InProgress),
            ("\"overdue\"", TaskStatus::InProgress),
            ("\"on_hold\"", TaskStatus::OnHold),
            ("\"on-hold\"", TaskStatus::OnHold),
            ("\"pending\"", TaskStatus::Pending),
        ] {
            let status: TaskStatus = serde_json::from_str(raw).unwrap();
            assert_eq!(status, expected, "decoding {raw}");
        }
        assert_eq!(
            serde_json::to_string(&TaskStatus::InProgress).unwrap(),
            "\"in-progress\""
        );
    }

    #[test]
    fn parse_and_remote_mapping_agree() {
        for status in TaskStatus::ALL {
            assert_eq!(TaskStatus::parse(status.as_str()), Some(status));
        }
        assert_eq!(TaskStatus::Pending.as_remote_str(), "not_started");
        assert_eq!(
            TaskStatus::parse(TaskStatus::OnHold.as_remote_str()),
            Some(TaskStatus::OnHold)
        );
        assert_eq!(TaskStatus::parse("blocked"), None);
    }

    #[test]
    fn overdue_requires_past_end_date_and_unfinished_status() {
        let mut task = sample();
        task.end_date = Some(day(4));
        assert!(task.is_overdue(day(5)));
        assert!(!task.is_overdue(day(4)));

        task.status = TaskStatus::Completed;
        assert!(!task.is_overdue(day(5)));

        task.end_date = None;
        task.status = TaskStatus::InProgress;
        assert!(!task.is_overdue(day(5)));
    }

    #[test]
    fn patch_with_empty_assignee_unassigns() {
        let mut task = sample();
        task.assigned_to = Some("m1".to_string());
        let patch = TaskPatch {
            assigned_to: Some(String::new()),
            ..TaskPatch::status(TaskStatus::Completed)
        };
        patch.apply(&mut task);
        assert_eq!(task.assigned_to, None);
        assert_eq!(task.status, TaskStatus::Completed);
        assert!(task.belongs_to("p1"));
    }
}
