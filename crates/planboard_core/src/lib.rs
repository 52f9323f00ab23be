//! Core domain logic for planboard.
//! This crate is the single source of truth for project, task and team
//! invariants; front ends only render what it returns.

pub mod app;
pub mod auth;
pub mod capability;
pub mod clock;
pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod stats;
pub mod storage;
pub mod utils;

pub use app::{AppController, AppError, DashboardConfig, Startup, View, ViewContent};
pub use auth::{AuthConfig, AuthError, AuthManager, AuthState, RegistrationRequest};
pub use capability::{Notifier, SessionView, UserStore, WorkspaceReader, WorkspaceStore};
pub use clock::{Clock, ManualClock, SystemClock};
pub use config::{ConfigError, PlanboardConfig};
pub use db::{open_db, open_db_in_memory, DbError, DbResult};
pub use logging::{default_log_level, init_logging, logging_status, LoggingConfig, LoggingError};
pub use model::project::{NewProject, Project, ProjectPatch, ProjectStatus};
pub use model::task::{NewTask, Task, TaskPatch, TaskStatus};
pub use model::team::{NewTeamMember, TeamMember, TeamMemberPatch};
pub use model::user::{Role, User};
pub use model::{Priority, ValidationError};
pub use storage::{
    KeyValueBackend, MemoryKeyValueBackend, SqliteKeyValueBackend, StorageConfig, StorageError,
    StorageManager, StorageResult,
};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
