//! Application controller and its read-models.
//!
//! # Responsibility
//! - Sequence startup against an existing session.
//! - Switch views and build the read-model each view renders.
//! - Validate CRUD input before it reaches the workspace store.
//!
//! # Invariants
//! - Read-models are rebuilt from the store on every call; nothing is cached.
//! - Invalid input never reaches the store.

mod controller;
pub mod debounce;
pub mod gantt;
pub mod labels;

pub use controller::AppController;
pub use debounce::SearchDebouncer;
pub use gantt::{gantt_rows, BarStyle, GanttRow};
pub use labels::Language;

use crate::model::project::Project;
use crate::model::task::Task;
use crate::model::team::TeamMember;
use crate::model::user::User;
use crate::model::ValidationError;
use crate::stats::{DashboardStats, OverdueFill, ProgressMode, ScheduleState, TaskBreakdown};
use serde::Serialize;

/// Navigable views.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum View {
    #[default]
    Dashboard,
    Projects,
    Tasks,
    Gantt,
    Team,
}

impl View {
    pub const ALL: [View; 5] = [
        Self::Dashboard,
        Self::Projects,
        Self::Tasks,
        Self::Gantt,
        Self::Team,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Dashboard => "dashboard",
            Self::Projects => "projects",
            Self::Tasks => "tasks",
            Self::Gantt => "gantt",
            Self::Team => "team",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        let normalized = value.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|view| view.as_str() == normalized)
    }
}

/// Dashboard read-model sizing and policies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DashboardConfig {
    pub recent_projects: usize,
    pub upcoming_tasks: usize,
    pub overdue_fill: OverdueFill,
    pub progress_mode: ProgressMode,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            recent_projects: 3,
            upcoming_tasks: 5,
            overdue_fill: OverdueFill::Include,
            progress_mode: ProgressMode::Stored,
        }
    }
}

/// Result of [`AppController::initialize`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Startup {
    LoginRequired,
    Ready { user: User, dashboard: DashboardView },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardView {
    pub stats: DashboardStats,
    pub recent_projects: Vec<Project>,
    pub upcoming_tasks: Vec<TaskRow>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectCard {
    pub project: Project,
    pub schedule: ScheduleState,
    pub breakdown: TaskBreakdown,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskRow {
    pub task: Task,
    /// `None` when the task has no project or the project is gone.
    pub project_name: Option<String>,
    pub overdue: bool,
}

/// Content for one view, as returned by [`AppController::show_view`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "view", content = "content", rename_all = "lowercase")]
pub enum ViewContent {
    Dashboard(DashboardView),
    Projects(Vec<ProjectCard>),
    Tasks(Vec<TaskRow>),
    Gantt(Vec<GanttRow>),
    Team(Vec<TeamMember>),
}

/// Outcome of a (debounced) search submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "lowercase")]
pub enum SearchOutcome {
    /// Blank query: the caller clears any displayed results.
    Cleared,
    Results {
        projects: Vec<Project>,
        tasks: Vec<Task>,
    },
}

/// Controller-level failure surfaced to the user.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("{kind} `{id}` was not found")]
    NotFound { kind: &'static str, id: String },
    #[error("task references unknown project `{0}`")]
    UnknownProject(String),
    #[error("could not save changes ({operation})")]
    Storage { operation: &'static str },
}

impl AppError {
    pub fn code(&self) -> &'static str {
        match self {
            Self::Validation(_) => "validation",
            Self::NotFound { .. } => "not_found",
            Self::UnknownProject(_) => "unknown_project",
            Self::Storage { .. } => "storage",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::View;

    #[test]
    fn view_names_round_trip() {
        for view in View::ALL {
            assert_eq!(View::parse(view.as_str()), Some(view));
        }
        assert_eq!(View::parse(" Gantt "), Some(View::Gantt));
        assert_eq!(View::parse("reports"), None);
    }
}
