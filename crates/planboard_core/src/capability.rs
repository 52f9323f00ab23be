//! Narrow capability interfaces passed between components.
//!
//! Components declare the capability they need instead of reaching for a
//! concrete sibling: the auth manager needs a [`UserStore`], the controller a
//! [`WorkspaceStore`] and a [`SessionView`], and anything that reports to the
//! user an optional [`Notifier`].

use crate::model::notification::NewNotification;
use crate::model::project::{NewProject, Project, ProjectPatch};
use crate::model::task::{NewTask, Task, TaskPatch};
use crate::model::team::{NewTeamMember, TeamMember, TeamMemberPatch};
use crate::model::user::User;

/// Persistence of the signed-in user and the registered-user list.
pub trait UserStore {
    fn load_current_user(&self) -> Option<User>;
    fn save_current_user(&self, user: &User) -> bool;
    fn clear_current_user(&self) -> bool;
    fn find_registered_user(&self, email: &str) -> Option<User>;
    /// Inserts or replaces by email.
    fn save_registered_user(&self, user: &User) -> bool;
}

/// Posts a user-visible notification.
pub trait Notifier {
    fn notify(&self, notification: NewNotification) -> bool;
}

/// Read side of the project workspace.
pub trait WorkspaceReader {
    fn projects(&self) -> Vec<Project>;
    fn tasks(&self) -> Vec<Task>;
    fn team_members(&self) -> Vec<TeamMember>;
    fn search_projects(&self, query: &str) -> Vec<Project>;
    fn search_tasks(&self, query: &str) -> Vec<Task>;
}

/// Read and write side of the project workspace.
pub trait WorkspaceStore: WorkspaceReader {
    fn add_project(&self, draft: NewProject) -> Option<Project>;
    fn update_project(&self, id: &str, patch: &ProjectPatch) -> bool;
    /// Also removes the project's tasks.
    fn delete_project(&self, id: &str) -> bool;
    fn add_task(&self, draft: NewTask) -> Option<Task>;
    fn update_task(&self, id: &str, patch: &TaskPatch) -> bool;
    fn delete_task(&self, id: &str) -> bool;
    fn add_team_member(&self, draft: NewTeamMember) -> Option<TeamMember>;
    fn update_team_member(&self, id: &str, patch: &TeamMemberPatch) -> bool;
    fn delete_team_member(&self, id: &str) -> bool;
}

/// Read-only view of the authentication session.
pub trait SessionView {
    fn is_logged_in(&self) -> bool;
    fn session_user(&self) -> Option<User>;
}
