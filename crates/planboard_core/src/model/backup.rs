//! Whole-dataset backup snapshot.
//!
//! `data` members are optional on read: restoring writes only the members
//! present in the snapshot and leaves the others untouched.

use super::notification::Notification;
use super::project::Project;
use super::settings::Settings;
use super::task::Task;
use super::team::TeamMember;
use super::user::User;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Backup {
    pub version: String,
    pub timestamp: DateTime<Utc>,
    pub data: BackupData,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BackupData {
    #[serde(default)]
    pub user: Option<User>,
    #[serde(default)]
    pub projects: Option<Vec<Project>>,
    #[serde(default)]
    pub tasks: Option<Vec<Task>>,
    #[serde(default)]
    pub team_members: Option<Vec<TeamMember>>,
    #[serde(default)]
    pub settings: Option<Settings>,
    #[serde(default)]
    pub notifications: Option<Vec<Notification>>,
}

#[cfg(test)]
mod tests {
    use super::BackupData;

    #[test]
    fn partial_data_decodes_absent_members_as_none() {
        let data: BackupData = serde_json::from_str(r#"{"projects":[]}"#).unwrap();
        assert_eq!(data.projects, Some(Vec::new()));
        assert!(data.tasks.is_none());
        assert!(data.user.is_none());
    }
}
