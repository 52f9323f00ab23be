//! `StorageManager`: typed persistence over a [`KeyValueBackend`].

use super::backend::KeyValueBackend;
use super::envelope::Envelope;
use super::{keys, StorageConfig, StorageError, StorageResult};
use crate::capability::{Notifier, UserStore, WorkspaceReader, WorkspaceStore};
use crate::clock::{Clock, SystemClock};
use crate::model::notification::{NewNotification, Notification};
use crate::model::project::{NewProject, Project, ProjectPatch, ProjectStatus};
use crate::model::settings::{Settings, SettingsPatch};
use crate::model::task::{NewTask, Task, TaskPatch};
use crate::model::team::{NewTeamMember, TeamMember, TeamMemberPatch};
use crate::model::user::User;
use crate::model::Entity;
use crate::utils::format::format_file_size;
use crate::utils::generate_id;
use crate::utils::text::contains_ignore_case;
use chrono::{DateTime, Duration, Utc};
use log::{debug, error, info, warn};
use serde::de::DeserializeOwned;
use serde::Serialize;

/// Persistence layer service.
///
/// Constructed explicitly and passed by reference to the components that
/// need it; call [`StorageManager::initialize`] once after construction.
pub struct StorageManager<B: KeyValueBackend> {
    backend: B,
    config: StorageConfig,
    clock: Box<dyn Clock>,
}

/// Bytes used by namespaced payloads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StorageUsage {
    pub used: usize,
    pub formatted: String,
}

/// Collection counters plus storage usage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AppStats {
    pub total_projects: usize,
    pub active_projects: usize,
    pub completed_projects: usize,
    pub total_tasks: usize,
    pub completed_tasks: usize,
    pub overdue_tasks: usize,
    pub team_members: usize,
    pub storage_used: StorageUsage,
}

impl<B: KeyValueBackend> StorageManager<B> {
    pub fn new(backend: B, config: StorageConfig) -> Self {
        Self::with_clock(backend, config, SystemClock)
    }

    pub fn with_clock(backend: B, config: StorageConfig, clock: impl Clock + 'static) -> Self {
        Self {
            backend,
            config,
            clock: Box::new(clock),
        }
    }

    pub fn config(&self) -> &StorageConfig {
        &self.config
    }

    pub fn clock(&self) -> &dyn Clock {
        self.clock.as_ref()
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Seeds empty collections and default settings where absent.
    ///
    /// Returns `false` when the backend is unavailable or a seed write fails;
    /// existing values are never overwritten.
    pub fn initialize(&self) -> bool {
        if !self.is_available() {
            warn!("event=storage_init module=storage status=warn reason=backend_unavailable");
            return false;
        }

        let mut seeded = 0usize;
        let mut ok = true;
        for key in [keys::PROJECTS, keys::TASKS, keys::TEAM_MEMBERS] {
            if !self.has_item(key) {
                ok &= self.set_item(key, &Vec::<serde_json::Value>::new());
                seeded += 1;
            }
        }
        if !self.has_item(keys::SETTINGS) {
            ok &= self.set_item(keys::SETTINGS, &Settings::default());
            seeded += 1;
        }

        info!(
            "event=storage_init module=storage status={} seeded_keys={} version={}",
            if ok { "ok" } else { "error" },
            seeded,
            self.config.schema_version
        );
        ok
    }

    /// Write/remove round trip against the backend.
    pub fn is_available(&self) -> bool {
        match self.backend.check_writable() {
            Ok(()) => true,
            Err(err) => {
                warn!(
                    "event=storage_check module=storage status=warn error_code={} error={}",
                    err.code(),
                    err
                );
                false
            }
        }
    }

    pub fn full_key(&self, key: &str) -> String {
        format!("{}{}", self.config.key_prefix, key)
    }

    // ===== generic envelope access =====

    pub fn try_set_item<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> StorageResult<()> {
        self.write_envelope(&self.full_key(key), value)
    }

    pub fn set_item<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> bool {
        let result = self.try_set_item(key, value);
        self.report_write(key, result)
    }

    /// `Ok(None)` when the key is absent.
    pub fn try_get_item<T: DeserializeOwned>(&self, key: &str) -> StorageResult<Option<T>> {
        self.read_envelope(key, &self.full_key(key))
    }

    /// Returns `default` when the key is absent, undecodable or the backend
    /// fails.
    pub fn get_item<T: DeserializeOwned>(&self, key: &str, default: T) -> T {
        let result = self.try_get_item(key);
        self.report_read(key, result).unwrap_or(default)
    }

    pub fn has_item(&self, key: &str) -> bool {
        matches!(self.backend.get_raw(&self.full_key(key)), Ok(Some(_)))
    }

    pub fn remove_item(&self, key: &str) -> bool {
        let result = self.backend.remove(&self.full_key(key));
        self.report_write(key, result)
    }

    /// Removes every namespaced key. Unprefixed keys are kept.
    pub fn clear(&self) -> bool {
        let result = self.backend.keys().and_then(|all| {
            let mut removed = 0usize;
            for key in all
                .iter()
                .filter(|key| key.starts_with(&self.config.key_prefix))
            {
                self.backend.remove(key)?;
                removed += 1;
            }
            Ok(removed)
        });
        match result {
            Ok(removed) => {
                info!("event=storage_clear module=storage status=ok removed_keys={removed}");
                true
            }
            Err(err) => {
                error!(
                    "event=storage_clear module=storage status=error error_code={} error={}",
                    err.code(),
                    err
                );
                false
            }
        }
    }

    fn write_envelope<T: Serialize + ?Sized>(
        &self,
        full_key: &str,
        value: &T,
    ) -> StorageResult<()> {
        let envelope = Envelope::wrap(
            value,
            self.clock.now().timestamp_millis(),
            self.config.schema_version.as_str(),
        );
        let payload = envelope.to_payload()?;
        self.backend.set_raw(full_key, &payload)
    }

    fn read_envelope<T: DeserializeOwned>(
        &self,
        key: &str,
        full_key: &str,
    ) -> StorageResult<Option<T>> {
        let Some(payload) = self.backend.get_raw(full_key)? else {
            return Ok(None);
        };
        let envelope = Envelope::<T>::from_payload(&payload)?;
        if !envelope.is_version(&self.config.schema_version) {
            warn!(
                "event=storage_read module=storage status=warn key={} reason=version_mismatch stored_version={} expected_version={}",
                key, envelope.version, self.config.schema_version
            );
        }
        Ok(Some(envelope.into_value()))
    }

    fn report_write(&self, key: &str, result: StorageResult<()>) -> bool {
        match result {
            Ok(()) => {
                debug!("event=storage_write module=storage status=ok key={key}");
                true
            }
            Err(err) => {
                error!(
                    "event=storage_write module=storage status=error key={} error_code={} error={}",
                    key,
                    err.code(),
                    err
                );
                false
            }
        }
    }

    fn report_read<T>(&self, key: &str, result: StorageResult<Option<T>>) -> Option<T> {
        match result {
            Ok(value) => value,
            Err(err) => {
                error!(
                    "event=storage_read module=storage status=error key={} error_code={} error={}",
                    key,
                    err.code(),
                    err
                );
                None
            }
        }
    }

    // ===== collection plumbing =====

    fn load_list<T: Entity>(&self, key: &str) -> Vec<T> {
        self.get_item(key, Vec::new())
    }

    /// One read-modify-write over a collection.
    ///
    /// `mutate` returns `None` to abort without writing (e.g. id not found).
    /// A failed read aborts too, so an unreadable collection is never
    /// overwritten.
    fn modify_list<T: Entity, R>(
        &self,
        key: &str,
        operation: &'static str,
        mutate: impl FnOnce(&mut Vec<T>) -> Option<R>,
    ) -> Option<R> {
        let mut items = match self.try_get_item::<Vec<T>>(key) {
            Ok(items) => items.unwrap_or_default(),
            Err(err) => {
                error!(
                    "event={} module=storage status=error kind={} stage=read error_code={} error={}",
                    operation,
                    T::KIND,
                    err.code(),
                    err
                );
                return None;
            }
        };

        let Some(outcome) = mutate(&mut items) else {
            debug!(
                "event={} module=storage status=skipped kind={} reason=not_found",
                operation,
                T::KIND
            );
            return None;
        };

        match self.try_set_item(key, &items) {
            Ok(()) => {
                debug!(
                    "event={} module=storage status=ok kind={} count={}",
                    operation,
                    T::KIND,
                    items.len()
                );
                Some(outcome)
            }
            Err(err) => {
                error!(
                    "event={} module=storage status=error kind={} stage=write error_code={} error={}",
                    operation,
                    T::KIND,
                    err.code(),
                    err
                );
                None
            }
        }
    }

    /// `max(now, previous + 1 ms)`; strictly increasing per record.
    fn next_update_stamp(&self, previous: DateTime<Utc>) -> DateTime<Utc> {
        self.clock
            .now()
            .max(previous + Duration::milliseconds(1))
    }

    // ===== current user =====

    pub fn get_current_user(&self) -> Option<User> {
        let result = self.try_get_item::<Option<User>>(keys::CURRENT_USER);
        self.report_read(keys::CURRENT_USER, result).flatten()
    }

    pub fn set_current_user(&self, user: &User) -> bool {
        self.set_item(keys::CURRENT_USER, user)
    }

    pub fn clear_current_user(&self) -> bool {
        self.remove_item(keys::CURRENT_USER)
    }

    // ===== registered users (unprefixed key) =====

    pub fn get_registered_users(&self) -> Vec<User> {
        let result = self.read_envelope(keys::REGISTERED_USERS, keys::REGISTERED_USERS);
        self.report_read(keys::REGISTERED_USERS, result)
            .unwrap_or_default()
    }

    pub fn set_registered_users(&self, users: &[User]) -> bool {
        let result = self.write_envelope(keys::REGISTERED_USERS, users);
        self.report_write(keys::REGISTERED_USERS, result)
    }

    /// Inserts the user, replacing an existing entry with the same email.
    pub fn add_registered_user(&self, user: &User) -> bool {
        let stored =
            self.read_envelope::<Vec<User>>(keys::REGISTERED_USERS, keys::REGISTERED_USERS);
        let mut users = match stored {
            Ok(users) => users.unwrap_or_default(),
            Err(err) => {
                error!(
                    "event=add_registered_user module=storage status=error stage=read error_code={} error={}",
                    err.code(),
                    err
                );
                return false;
            }
        };
        match users
            .iter_mut()
            .find(|existing| existing.email.eq_ignore_ascii_case(&user.email))
        {
            Some(existing) => *existing = user.clone(),
            None => users.push(user.clone()),
        }
        self.set_registered_users(&users)
    }

    /// Case-insensitive email lookup.
    pub fn find_user_by_email(&self, email: &str) -> Option<User> {
        let email = email.trim();
        self.get_registered_users()
            .into_iter()
            .find(|user| user.email.eq_ignore_ascii_case(email))
    }

    // ===== projects =====

    pub fn get_projects(&self) -> Vec<Project> {
        self.load_list(keys::PROJECTS)
    }

    pub fn set_projects(&self, projects: &[Project]) -> bool {
        self.set_item(keys::PROJECTS, projects)
    }

    pub fn get_project(&self, id: &str) -> Option<Project> {
        self.get_projects().into_iter().find(|project| project.id == id)
    }

    /// Appends a project built from `draft` with a fresh id and timestamps.
    pub fn add_project(&self, draft: NewProject) -> Option<Project> {
        let project = draft.into_project(generate_id(), self.clock.now());
        self.modify_list(keys::PROJECTS, "project_add", |items: &mut Vec<Project>| {
            items.push(project.clone());
            Some(project)
        })
    }

    pub fn update_project(&self, id: &str, patch: &ProjectPatch) -> bool {
        self.modify_list(
            keys::PROJECTS,
            "project_update",
            |items: &mut Vec<Project>| {
                let project = items.iter_mut().find(|project| project.id == id)?;
                patch.apply(project);
                project.updated_at = self.next_update_stamp(project.updated_at);
                Some(())
            },
        )
        .is_some()
    }

    /// Removes the project and every task whose `project_id` matches.
    ///
    /// Tasks are written first. If the project write then fails, the
    /// original task list is put back, so a failure leaves both lists as
    /// they were. Returns `false` when the project does not exist or a
    /// write fails.
    pub fn delete_project(&self, id: &str) -> bool {
        let lists = self
            .try_get_item::<Vec<Project>>(keys::PROJECTS)
            .and_then(|projects| {
                let tasks = self.try_get_item::<Vec<Task>>(keys::TASKS)?;
                Ok((projects.unwrap_or_default(), tasks.unwrap_or_default()))
            });
        let (mut projects, tasks) = match lists {
            Ok(lists) => lists,
            Err(err) => {
                self.report_delete_failure("read", &err);
                return false;
            }
        };

        if remove_by_id(&mut projects, id).is_none() {
            debug!("event=project_delete module=storage status=skipped reason=not_found");
            return false;
        }
        let remaining: Vec<Task> = tasks
            .iter()
            .filter(|task| !task.belongs_to(id))
            .cloned()
            .collect();
        let cascaded = tasks.len() - remaining.len();

        if let Err(err) = self.try_set_item(keys::TASKS, &remaining) {
            self.report_delete_failure("write_tasks", &err);
            return false;
        }
        if let Err(err) = self.try_set_item(keys::PROJECTS, &projects) {
            self.report_delete_failure("write_projects", &err);
            if let Err(err) = self.try_set_item(keys::TASKS, &tasks) {
                self.report_delete_failure("rollback", &err);
            }
            return false;
        }

        info!("event=project_delete module=storage status=ok cascaded_tasks={cascaded}");
        true
    }

    fn report_delete_failure(&self, stage: &str, err: &StorageError) {
        error!(
            "event=project_delete module=storage status=error stage={} error_code={} error={}",
            stage,
            err.code(),
            err
        );
    }

    // ===== tasks =====

    pub fn get_tasks(&self) -> Vec<Task> {
        self.load_list(keys::TASKS)
    }

    pub fn set_tasks(&self, tasks: &[Task]) -> bool {
        self.set_item(keys::TASKS, tasks)
    }

    pub fn get_task(&self, id: &str) -> Option<Task> {
        self.get_tasks().into_iter().find(|task| task.id == id)
    }

    pub fn get_project_tasks(&self, project_id: &str) -> Vec<Task> {
        self.get_tasks()
            .into_iter()
            .filter(|task| task.belongs_to(project_id))
            .collect()
    }

    pub fn add_task(&self, draft: NewTask) -> Option<Task> {
        let task = draft.into_task(generate_id(), self.clock.now());
        self.modify_list(keys::TASKS, "task_add", |items: &mut Vec<Task>| {
            items.push(task.clone());
            Some(task)
        })
    }

    pub fn update_task(&self, id: &str, patch: &TaskPatch) -> bool {
        self.modify_list(keys::TASKS, "task_update", |items: &mut Vec<Task>| {
            let task = items.iter_mut().find(|task| task.id == id)?;
            patch.apply(task);
            task.updated_at = self.next_update_stamp(task.updated_at);
            Some(())
        })
        .is_some()
    }

    pub fn delete_task(&self, id: &str) -> bool {
        self.modify_list(keys::TASKS, "task_delete", |items: &mut Vec<Task>| {
            remove_by_id(items, id)
        })
        .is_some()
    }

    // ===== team members =====

    pub fn get_team_members(&self) -> Vec<TeamMember> {
        self.load_list(keys::TEAM_MEMBERS)
    }

    pub fn set_team_members(&self, members: &[TeamMember]) -> bool {
        self.set_item(keys::TEAM_MEMBERS, members)
    }

    pub fn add_team_member(&self, draft: NewTeamMember) -> Option<TeamMember> {
        let member = draft.into_member(generate_id(), self.clock.now());
        self.modify_list(keys::TEAM_MEMBERS, "team_member_add", |items: &mut Vec<TeamMember>| {
            items.push(member.clone());
            Some(member)
        })
    }

    pub fn update_team_member(&self, id: &str, patch: &TeamMemberPatch) -> bool {
        self.modify_list(keys::TEAM_MEMBERS, "team_member_update", |items: &mut Vec<TeamMember>| {
            let member = items.iter_mut().find(|member| member.id == id)?;
            patch.apply(member);
            let previous = member.updated_at.unwrap_or(member.joined_at);
            member.updated_at = Some(self.next_update_stamp(previous));
            Some(())
        })
        .is_some()
    }

    /// Assigned tasks keep their `assigned_to` reference.
    pub fn delete_team_member(&self, id: &str) -> bool {
        self.modify_list(keys::TEAM_MEMBERS, "team_member_delete", |items: &mut Vec<TeamMember>| {
            remove_by_id(items, id)
        })
        .is_some()
    }

    // ===== settings =====

    pub fn get_settings(&self) -> Settings {
        self.get_item(keys::SETTINGS, Settings::default())
    }

    pub fn set_settings(&self, settings: &Settings) -> bool {
        self.set_item(keys::SETTINGS, settings)
    }

    /// Merges `patch` over the stored settings (defaults when absent).
    pub fn update_settings(&self, patch: &SettingsPatch) -> bool {
        let mut settings = match self.try_get_item::<Settings>(keys::SETTINGS) {
            Ok(settings) => settings.unwrap_or_default(),
            Err(err) => {
                error!(
                    "event=settings_update module=storage status=error stage=read error_code={} error={}",
                    err.code(),
                    err
                );
                return false;
            }
        };
        patch.apply(&mut settings);
        self.set_settings(&settings)
    }

    // ===== notifications =====

    /// Newest first.
    pub fn get_notifications(&self) -> Vec<Notification> {
        self.load_list(keys::NOTIFICATIONS)
    }

    pub fn set_notifications(&self, notifications: &[Notification]) -> bool {
        self.set_item(keys::NOTIFICATIONS, notifications)
    }

    /// Prepends an unread notification and drops entries past the cap.
    pub fn add_notification(&self, draft: NewNotification) -> Option<Notification> {
        let notification = draft.into_notification(generate_id(), self.clock.now());
        let cap = self.config.notification_cap;
        self.modify_list(keys::NOTIFICATIONS, "notification_add", |items: &mut Vec<Notification>| {
            items.insert(0, notification.clone());
            items.truncate(cap);
            Some(notification)
        })
    }

    pub fn mark_notification_read(&self, id: &str) -> bool {
        self.modify_list(keys::NOTIFICATIONS, "notification_read", |items: &mut Vec<Notification>| {
            let notification = items.iter_mut().find(|item| item.id == id)?;
            notification.read = true;
            Some(())
        })
        .is_some()
    }

    pub fn mark_all_notifications_read(&self) -> bool {
        self.modify_list(
            keys::NOTIFICATIONS,
            "notification_read_all",
            |items: &mut Vec<Notification>| {
                items.iter_mut().for_each(|item| item.read = true);
                Some(())
            },
        )
        .is_some()
    }

    pub fn delete_notification(&self, id: &str) -> bool {
        self.modify_list(
            keys::NOTIFICATIONS,
            "notification_delete",
            |items: &mut Vec<Notification>| remove_by_id(items, id),
        )
        .is_some()
    }

    pub fn unread_notification_count(&self) -> usize {
        self.get_notifications()
            .iter()
            .filter(|notification| !notification.read)
            .count()
    }

    // ===== search =====

    /// Case-insensitive substring match on name or description, in stored
    /// order. The query is matched as typed, surrounding whitespace included.
    /// A blank query matches nothing.
    pub fn search_projects(&self, query: &str) -> Vec<Project> {
        let Some(needle) = normalize_query(query) else {
            return Vec::new();
        };
        self.get_projects()
            .into_iter()
            .filter(|project| {
                matches_text(&needle, &project.name, project.description.as_deref())
            })
            .collect()
    }

    /// Same matching rules as [`StorageManager::search_projects`].
    pub fn search_tasks(&self, query: &str) -> Vec<Task> {
        let Some(needle) = normalize_query(query) else {
            return Vec::new();
        };
        self.get_tasks()
            .into_iter()
            .filter(|task| matches_text(&needle, &task.name, task.description.as_deref()))
            .collect()
    }

    // ===== stats =====

    pub fn app_stats(&self) -> AppStats {
        let projects = self.get_projects();
        let tasks = self.get_tasks();
        let today = self.clock.today();

        AppStats {
            total_projects: projects.len(),
            active_projects: projects
                .iter()
                .filter(|project| project.status == ProjectStatus::Active)
                .count(),
            completed_projects: projects
                .iter()
                .filter(|project| project.status == ProjectStatus::Completed)
                .count(),
            total_tasks: tasks.len(),
            completed_tasks: tasks.iter().filter(|task| task.status.is_completed()).count(),
            overdue_tasks: tasks.iter().filter(|task| task.is_overdue(today)).count(),
            team_members: self.get_team_members().len(),
            storage_used: self.storage_usage(),
        }
    }

    /// Sum of payload bytes stored under the namespace prefix.
    pub fn storage_usage(&self) -> StorageUsage {
        let result = self.backend.keys().and_then(|all| {
            let mut used = 0usize;
            for key in all
                .iter()
                .filter(|key| key.starts_with(&self.config.key_prefix))
            {
                used += self.backend.get_raw(key)?.map_or(0, |payload| payload.len());
            }
            Ok(used)
        });
        let used = result.unwrap_or_else(|err| {
            error!(
                "event=storage_usage module=storage status=error error_code={} error={}",
                err.code(),
                err
            );
            0
        });
        StorageUsage {
            used,
            formatted: format_file_size(used as u64),
        }
    }
}

fn remove_by_id<T: Entity>(items: &mut Vec<T>, id: &str) -> Option<T> {
    let index = items.iter().position(|item| item.id() == id)?;
    Some(items.remove(index))
}

fn normalize_query(query: &str) -> Option<String> {
    if query.trim().is_empty() {
        None
    } else {
        Some(query.to_lowercase())
    }
}

fn matches_text(needle: &str, name: &str, description: Option<&str>) -> bool {
    contains_ignore_case(name, needle)
        || description.is_some_and(|description| contains_ignore_case(description, needle))
}

impl<B: KeyValueBackend> UserStore for StorageManager<B> {
    fn load_current_user(&self) -> Option<User> {
        self.get_current_user()
    }

    fn save_current_user(&self, user: &User) -> bool {
        self.set_current_user(user)
    }

    fn clear_current_user(&self) -> bool {
        StorageManager::clear_current_user(self)
    }

    fn find_registered_user(&self, email: &str) -> Option<User> {
        self.find_user_by_email(email)
    }

    fn save_registered_user(&self, user: &User) -> bool {
        self.add_registered_user(user)
    }
}

impl<B: KeyValueBackend> Notifier for StorageManager<B> {
    fn notify(&self, notification: NewNotification) -> bool {
        self.add_notification(notification).is_some()
    }
}

impl<B: KeyValueBackend> WorkspaceReader for StorageManager<B> {
    fn projects(&self) -> Vec<Project> {
        self.get_projects()
    }

    fn tasks(&self) -> Vec<Task> {
        self.get_tasks()
    }

    fn team_members(&self) -> Vec<TeamMember> {
        self.get_team_members()
    }

    fn search_projects(&self, query: &str) -> Vec<Project> {
        StorageManager::search_projects(self, query)
    }

    fn search_tasks(&self, query: &str) -> Vec<Task> {
        StorageManager::search_tasks(self, query)
    }
}

impl<B: KeyValueBackend> WorkspaceStore for StorageManager<B> {
    fn add_project(&self, draft: NewProject) -> Option<Project> {
        StorageManager::add_project(self, draft)
    }

    fn update_project(&self, id: &str, patch: &ProjectPatch) -> bool {
        StorageManager::update_project(self, id, patch)
    }

    fn delete_project(&self, id: &str) -> bool {
        StorageManager::delete_project(self, id)
    }

    fn add_task(&self, draft: NewTask) -> Option<Task> {
        StorageManager::add_task(self, draft)
    }

    fn update_task(&self, id: &str, patch: &TaskPatch) -> bool {
        StorageManager::update_task(self, id, patch)
    }

    fn delete_task(&self, id: &str) -> bool {
        StorageManager::delete_task(self, id)
    }

    fn add_team_member(&self, draft: NewTeamMember) -> Option<TeamMember> {
        StorageManager::add_team_member(self, draft)
    }

    fn update_team_member(&self, id: &str, patch: &TeamMemberPatch) -> bool {
        StorageManager::update_team_member(self, id, patch)
    }

    fn delete_team_member(&self, id: &str) -> bool {
        StorageManager::delete_team_member(self, id)
    }
}

#[cfg(test)]
mod tests {
    use super::StorageManager;
    use crate::clock::ManualClock;
    use crate::model::project::{NewProject, ProjectPatch};
    use crate::storage::{KeyValueBackend, MemoryKeyValueBackend, StorageConfig};
    use chrono::{TimeZone, Utc};

    fn manager() -> (StorageManager<MemoryKeyValueBackend>, ManualClock) {
        let clock = ManualClock::new(Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap());
        let storage = StorageManager::with_clock(
            MemoryKeyValueBackend::new(),
            StorageConfig::default(),
            clock.clone(),
        );
        assert!(storage.initialize());
        (storage, clock)
    }

    #[test]
    fn initialize_seeds_without_overwriting() {
        let (storage, _clock) = manager();
        assert!(storage.has_item("projects"));
        assert!(storage.has_item("app_settings"));

        storage.add_project(NewProject::named("Keep me")).unwrap();
        assert!(storage.initialize());
        assert_eq!(storage.get_projects().len(), 1);
    }

    #[test]
    fn update_stamp_strictly_increases_under_frozen_clock() {
        let (storage, _clock) = manager();
        let project = storage.add_project(NewProject::named("Frozen")).unwrap();

        assert!(storage.update_project(&project.id, &ProjectPatch::default()));
        let first = storage.get_project(&project.id).unwrap().updated_at;
        assert!(storage.update_project(&project.id, &ProjectPatch::default()));
        let second = storage.get_project(&project.id).unwrap().updated_at;

        assert!(first > project.updated_at);
        assert!(second > first);
    }

    #[test]
    fn corrupt_collection_is_not_overwritten_by_add() {
        let (storage, _clock) = manager();
        storage
            .backend()
            .set_raw("project_manager_projects", "{not json")
            .unwrap();

        assert!(storage.get_projects().is_empty());
        assert!(storage.add_project(NewProject::named("x")).is_none());
        assert_eq!(
            storage
                .backend()
                .get_raw("project_manager_projects")
                .unwrap()
                .as_deref(),
            Some("{not json")
        );
    }

    #[test]
    fn unavailable_backend_degrades_to_defaults() {
        let (storage, _clock) = manager();
        storage.backend().set_available(false);

        assert!(!storage.is_available());
        assert!(storage.get_projects().is_empty());
        assert!(!storage.set_projects(&[]));
        assert_eq!(storage.get_settings().language, "ar");
        assert!(storage.add_project(NewProject::named("x")).is_none());
    }
}
