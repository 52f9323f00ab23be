//! Wire types of the project-management REST API.
//!
//! Field names follow the server's snake_case JSON. Timestamps arrive as
//! ISO 8601 without an offset and are read as UTC.

use chrono::{DateTime, NaiveDate, Utc};
use planboard_core::model::project::{Project, ProjectStatus};
use planboard_core::model::task::{Task, TaskStatus};
use planboard_core::utils::date::flexible_date;
use planboard_core::Priority;
use serde::{Deserialize, Serialize};

/// The server has no project colors.
const DEFAULT_PROJECT_COLOR: &str = "#3b82f6";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteUser {
    pub id: String,
    pub username: String,
    pub email: String,
    #[serde(default, with = "server_timestamp")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, with = "server_timestamp")]
    pub updated_at: Option<DateTime<Utc>>,
}

/// Body of a successful login or registration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AuthResponse {
    #[serde(default)]
    pub message: Option<String>,
    pub user: RemoteUser,
    pub access_token: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct RegisterRequest<'a> {
    pub username: &'a str,
    pub email: &'a str,
    pub password: &'a str,
}

#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest<'a> {
    pub username: &'a str,
    pub password: &'a str,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteProject {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default, with = "flexible_date")]
    pub start_date: Option<NaiveDate>,
    #[serde(default, with = "flexible_date")]
    pub end_date: Option<NaiveDate>,
    #[serde(default)]
    pub owner_id: Option<String>,
    #[serde(default, with = "server_timestamp")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, with = "server_timestamp")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl RemoteProject {
    /// Local project record for statistics; missing timestamps become
    /// `fallback`.
    pub fn to_project(&self, fallback: DateTime<Utc>) -> Project {
        let created_at = self.created_at.unwrap_or(fallback);
        Project {
            id: self.id.clone(),
            name: self.name.clone(),
            description: self.description.clone().filter(|text| !text.is_empty()),
            color: DEFAULT_PROJECT_COLOR.to_string(),
            status: ProjectStatus::Active,
            priority: Priority::Medium,
            progress: 0,
            start_date: self.start_date,
            end_date: self.end_date,
            created_at,
            updated_at: self.updated_at.unwrap_or(created_at),
        }
    }
}

/// Project creation payload; the server requires both dates.
#[derive(Debug, Clone, Serialize)]
pub struct ProjectDraft {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

/// Partial project update; absent fields are left unchanged.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ProjectUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MemberRole {
    Admin,
    #[default]
    Member,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RemoteMember {
    pub project_id: String,
    pub user_id: String,
    #[serde(default)]
    pub role: MemberRole,
    #[serde(default, with = "server_timestamp")]
    pub joined_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize)]
pub struct NewMember {
    pub user_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<MemberRole>,
}

/// Task status as the server spells it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WireTaskStatus {
    #[default]
    #[serde(alias = "pending")]
    NotStarted,
    InProgress,
    Completed,
    OnHold,
}

impl From<TaskStatus> for WireTaskStatus {
    fn from(status: TaskStatus) -> Self {
        match status {
            TaskStatus::NotStarted | TaskStatus::Pending => Self::NotStarted,
            TaskStatus::InProgress => Self::InProgress,
            TaskStatus::Completed => Self::Completed,
            TaskStatus::OnHold => Self::OnHold,
        }
    }
}

impl From<WireTaskStatus> for TaskStatus {
    fn from(status: WireTaskStatus) -> Self {
        match status {
            WireTaskStatus::NotStarted => Self::NotStarted,
            WireTaskStatus::InProgress => Self::InProgress,
            WireTaskStatus::Completed => Self::Completed,
            WireTaskStatus::OnHold => Self::OnHold,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteTask {
    pub id: String,
    pub project_id: String,
    #[serde(default)]
    pub parent_task_id: Option<String>,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default, with = "flexible_date")]
    pub start_date: Option<NaiveDate>,
    #[serde(default, with = "flexible_date")]
    pub end_date: Option<NaiveDate>,
    #[serde(default)]
    pub assigned_to: Option<String>,
    #[serde(default)]
    pub status: WireTaskStatus,
    #[serde(default, with = "server_timestamp")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, with = "server_timestamp")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl RemoteTask {
    pub fn to_task(&self, fallback: DateTime<Utc>) -> Task {
        let created_at = self.created_at.unwrap_or(fallback);
        Task {
            id: self.id.clone(),
            name: self.name.clone(),
            description: self.description.clone().filter(|text| !text.is_empty()),
            status: self.status.into(),
            priority: Priority::Medium,
            project_id: Some(self.project_id.clone()),
            assigned_to: self.assigned_to.clone(),
            start_date: self.start_date,
            end_date: self.end_date,
            created_at,
            updated_at: self.updated_at.unwrap_or(created_at),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct TaskDraft {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<WireTaskStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assigned_to: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_task_id: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct TaskUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<WireTaskStatus>,
    /// `Some(None)` sends `null` and unassigns the task.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assigned_to: Option<Option<String>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DependencyType {
    #[default]
    FinishToStart,
    StartToStart,
    FinishToFinish,
    StartToFinish,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RemoteDependency {
    pub id: String,
    pub predecessor_task_id: String,
    pub successor_task_id: String,
    #[serde(rename = "type", default)]
    pub kind: DependencyType,
}

#[derive(Debug, Clone, Serialize)]
pub struct NewDependency {
    pub predecessor_task_id: String,
    #[serde(rename = "type")]
    pub kind: DependencyType,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RemoteComment {
    pub id: String,
    pub task_id: String,
    pub user_id: String,
    pub content: String,
    #[serde(default, with = "server_timestamp")]
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize)]
pub(crate) struct NewComment<'a> {
    pub content: &'a str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RemoteNotificationKind {
    TaskDue,
    TaskUpdated,
    CommentAdded,
    ProjectInvite,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RemoteNotification {
    pub id: String,
    pub user_id: String,
    pub message: String,
    #[serde(rename = "type")]
    pub kind: RemoteNotificationKind,
    #[serde(default)]
    pub is_read: bool,
    #[serde(default, with = "server_timestamp")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub related_entity_id: Option<String>,
}

/// `{"error": "..."}` body of a rejected request.
#[derive(Debug, Deserialize)]
pub(crate) struct ErrorBody {
    pub error: String,
}

/// Server timestamps: RFC 3339, or ISO 8601 without an offset read as UTC.
pub mod server_timestamp {
    use chrono::{DateTime, NaiveDateTime, SecondsFormat, Utc};
    use serde::de::Error as _;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn parse(value: &str) -> Option<DateTime<Utc>> {
        let trimmed = value.trim();
        DateTime::parse_from_rfc3339(trimmed)
            .map(|instant| instant.with_timezone(&Utc))
            .ok()
            .or_else(|| {
                NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%dT%H:%M:%S%.f")
                    .ok()
                    .map(|naive| naive.and_utc())
            })
    }

    pub fn serialize<S>(value: &Option<DateTime<Utc>>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match value {
            Some(instant) => {
                serializer.serialize_str(&instant.to_rfc3339_opts(SecondsFormat::Micros, true))
            }
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Option::<String>::deserialize(deserializer)? {
            None => Ok(None),
            Some(text) if text.trim().is_empty() => Ok(None),
            Some(text) => parse(&text)
                .map(Some)
                .ok_or_else(|| D::Error::custom(format!("invalid timestamp `{text}`"))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{DependencyType, NewDependency, RemoteTask, TaskUpdate, WireTaskStatus};
    use chrono::{TimeZone, Utc};
    use planboard_core::TaskStatus;
    use serde_json::json;

    #[test]
    fn server_task_payload_converts_to_local_task() {
        let payload = json!({
            "id": "t1",
            "project_id": "p1",
            "parent_task_id": null,
            "name": "Pour foundation",
            "description": "",
            "start_date": "2024-05-01",
            "end_date": "2024-05-10",
            "assigned_to": null,
            "status": "on_hold",
            "created_at": "2024-04-30T08:15:00.123456",
            "updated_at": null
        });
        let remote: RemoteTask = serde_json::from_value(payload).unwrap();
        let fallback = Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap();
        let task = remote.to_task(fallback);

        assert_eq!(task.status, TaskStatus::OnHold);
        assert_eq!(task.project_id.as_deref(), Some("p1"));
        assert_eq!(task.description, None);
        assert_eq!(task.created_at.to_rfc3339(), "2024-04-30T08:15:00.123456+00:00");
        assert_eq!(task.updated_at, task.created_at);
    }

    #[test]
    fn pending_is_sent_as_not_started() {
        assert_eq!(
            WireTaskStatus::from(TaskStatus::Pending),
            WireTaskStatus::NotStarted
        );
        let update = TaskUpdate {
            status: Some(TaskStatus::Pending.into()),
            assigned_to: Some(None),
            ..TaskUpdate::default()
        };
        assert_eq!(
            serde_json::to_value(&update).unwrap(),
            json!({"status": "not_started", "assigned_to": null})
        );
    }

    #[test]
    fn dependency_type_uses_server_spelling() {
        let body = NewDependency {
            predecessor_task_id: "t0".to_string(),
            kind: DependencyType::StartToFinish,
        };
        assert_eq!(
            serde_json::to_value(&body).unwrap(),
            json!({"predecessor_task_id": "t0", "type": "start_to_finish"})
        );
    }
}
