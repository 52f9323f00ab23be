//! Whole-dataset export and import.

use super::backend::KeyValueBackend;
use super::StorageManager;
use crate::model::backup::{Backup, BackupData};
use log::{info, warn};

impl<B: KeyValueBackend> StorageManager<B> {
    /// Snapshot of the current user, settings and every collection.
    pub fn create_backup(&self) -> Backup {
        let backup = Backup {
            version: self.config().schema_version.clone(),
            timestamp: self.clock().now(),
            data: BackupData {
                user: self.get_current_user(),
                projects: Some(self.get_projects()),
                tasks: Some(self.get_tasks()),
                team_members: Some(self.get_team_members()),
                settings: Some(self.get_settings()),
                notifications: Some(self.get_notifications()),
            },
        };
        info!(
            "event=backup_create module=storage status=ok projects={} tasks={}",
            backup.data.projects.as_ref().map_or(0, Vec::len),
            backup.data.tasks.as_ref().map_or(0, Vec::len)
        );
        backup
    }

    /// Restores from an untyped backup document.
    ///
    /// Returns `false` when the document has no `data` object or it does not
    /// decode; members absent from `data` are left untouched.
    pub fn restore_from_backup(&self, document: &serde_json::Value) -> bool {
        let Some(data) = document.get("data").filter(|data| data.is_object()) else {
            warn!("event=backup_restore module=storage status=error reason=missing_data");
            return false;
        };
        match serde_json::from_value::<BackupData>(data.clone()) {
            Ok(data) => self.restore_data(&data),
            Err(err) => {
                warn!(
                    "event=backup_restore module=storage status=error reason=invalid_data error={err}"
                );
                false
            }
        }
    }

    pub fn restore_backup(&self, backup: &Backup) -> bool {
        if backup.version != self.config().schema_version {
            warn!(
                "event=backup_restore module=storage status=warn reason=version_mismatch backup_version={} expected_version={}",
                backup.version,
                self.config().schema_version
            );
        }
        self.restore_data(&backup.data)
    }

    /// Writes each present member independently; `true` only when every
    /// attempted write succeeded.
    fn restore_data(&self, data: &BackupData) -> bool {
        let mut ok = true;
        let mut restored = 0usize;

        if let Some(user) = &data.user {
            ok &= self.set_current_user(user);
            restored += 1;
        }
        if let Some(projects) = &data.projects {
            ok &= self.set_projects(projects);
            restored += 1;
        }
        if let Some(tasks) = &data.tasks {
            ok &= self.set_tasks(tasks);
            restored += 1;
        }
        if let Some(members) = &data.team_members {
            ok &= self.set_team_members(members);
            restored += 1;
        }
        if let Some(settings) = &data.settings {
            ok &= self.set_settings(settings);
            restored += 1;
        }
        if let Some(notifications) = &data.notifications {
            ok &= self.set_notifications(notifications);
            restored += 1;
        }

        info!(
            "event=backup_restore module=storage status={} restored_members={}",
            if ok { "ok" } else { "error" },
            restored
        );
        ok
    }
}
