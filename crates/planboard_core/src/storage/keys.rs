//! Logical storage keys.
//!
//! All keys except [`REGISTERED_USERS`] are stored under the configured
//! prefix.

pub const DEFAULT_PREFIX: &str = "project_manager_";

pub const CURRENT_USER: &str = "current_user";
pub const PROJECTS: &str = "projects";
pub const TASKS: &str = "tasks";
pub const TEAM_MEMBERS: &str = "team_members";
pub const SETTINGS: &str = "app_settings";
pub const NOTIFICATIONS: &str = "notifications";

/// Stored without prefix; survives `StorageManager::clear`.
pub const REGISTERED_USERS: &str = "registered_users";
