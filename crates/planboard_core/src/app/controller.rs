use super::gantt::{gantt_rows, GanttRow};
use super::labels::Language;
use super::{
    AppError, DashboardConfig, DashboardView, ProjectCard, SearchOutcome, Startup, TaskRow, View,
    ViewContent,
};
use crate::capability::{Notifier, SessionView, WorkspaceStore};
use crate::clock::{Clock, SystemClock};
use crate::model::notification::NewNotification;
use crate::model::project::{NewProject, Project, ProjectPatch};
use crate::model::task::{NewTask, Task, TaskPatch, TaskStatus};
use crate::model::team::{NewTeamMember, TeamMember, TeamMemberPatch};
use crate::model::Entity;
use crate::stats::{self, project_schedule, task_breakdown};
use log::{info, warn};
use std::collections::HashMap;

/// Orchestrates views over an injected workspace store.
pub struct AppController<'a, W: WorkspaceStore + ?Sized> {
    store: &'a W,
    notifier: Option<&'a dyn Notifier>,
    config: DashboardConfig,
    clock: Box<dyn Clock>,
    language: Language,
    current_view: View,
}

impl<'a, W: WorkspaceStore + ?Sized> AppController<'a, W> {
    pub fn new(store: &'a W, config: DashboardConfig) -> Self {
        Self {
            store,
            notifier: None,
            config,
            clock: Box::new(SystemClock),
            language: Language::default(),
            current_view: View::default(),
        }
    }

    pub fn with_notifier(mut self, notifier: &'a dyn Notifier) -> Self {
        self.notifier = Some(notifier);
        self
    }

    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }

    pub fn with_language(mut self, language: Language) -> Self {
        self.language = language;
        self
    }

    pub fn language(&self) -> Language {
        self.language
    }

    pub fn current_view(&self) -> View {
        self.current_view
    }

    /// Startup step after storage and auth are constructed: requires a
    /// session, then lands on the dashboard.
    pub fn initialize(&mut self, session: &dyn SessionView) -> Startup {
        let Some(user) = session.session_user().filter(|_| session.is_logged_in()) else {
            info!("event=app_init module=app status=ok outcome=login_required");
            return Startup::LoginRequired;
        };
        self.current_view = View::Dashboard;
        let dashboard = self.dashboard();
        info!(
            "event=app_init module=app status=ok outcome=ready projects={} tasks={}",
            dashboard.stats.total_projects, dashboard.stats.total_tasks
        );
        Startup::Ready { user, dashboard }
    }

    /// Switches to `view` and returns its freshly built content.
    pub fn show_view(&mut self, view: View) -> ViewContent {
        self.current_view = view;
        info!("event=view_show module=app status=ok view={}", view.as_str());
        match view {
            View::Dashboard => ViewContent::Dashboard(self.dashboard()),
            View::Projects => ViewContent::Projects(self.project_cards()),
            View::Tasks => ViewContent::Tasks(self.task_rows()),
            View::Gantt => ViewContent::Gantt(self.gantt(None)),
            View::Team => ViewContent::Team(self.store.team_members()),
        }
    }

    pub fn dashboard(&self) -> DashboardView {
        let today = self.clock.today();
        let tasks = self.store.tasks();
        let projects =
            stats::apply_progress(&self.store.projects(), &tasks, self.config.progress_mode);
        let names = project_names(&projects);

        let upcoming = stats::upcoming_tasks(
            &tasks,
            today,
            self.config.upcoming_tasks,
            self.config.overdue_fill,
        );

        DashboardView {
            stats: stats::dashboard_stats(&projects, &tasks, today),
            recent_projects: stats::recent_projects(&projects, self.config.recent_projects),
            upcoming_tasks: upcoming
                .into_iter()
                .map(|task| task_row(task, &names, today))
                .collect(),
        }
    }

    pub fn project_cards(&self) -> Vec<ProjectCard> {
        let today = self.clock.today();
        let tasks = self.store.tasks();
        stats::apply_progress(&self.store.projects(), &tasks, self.config.progress_mode)
            .into_iter()
            .map(|project| ProjectCard {
                schedule: project_schedule(&project, today),
                breakdown: task_breakdown(&project.id, &tasks, today),
                project,
            })
            .collect()
    }

    pub fn task_rows(&self) -> Vec<TaskRow> {
        let today = self.clock.today();
        let names = project_names(&self.store.projects());
        self.store
            .tasks()
            .into_iter()
            .map(|task| task_row(task, &names, today))
            .collect()
    }

    /// Gantt rows for every task, or one project's tasks.
    pub fn gantt(&self, project_id: Option<&str>) -> Vec<GanttRow> {
        let tasks = self.store.tasks();
        match project_id {
            Some(id) => gantt_rows(tasks.iter().filter(|task| task.belongs_to(id))),
            None => gantt_rows(&tasks),
        }
    }

    /// Searches projects and tasks; a blank query clears results.
    pub fn handle_search(&self, query: &str) -> SearchOutcome {
        if query.trim().is_empty() {
            return SearchOutcome::Cleared;
        }
        let projects = self.store.search_projects(query);
        let tasks = self.store.search_tasks(query);
        info!(
            "event=search module=app status=ok projects={} tasks={}",
            projects.len(),
            tasks.len()
        );
        SearchOutcome::Results { projects, tasks }
    }

    // ===== projects =====

    pub fn create_project(&self, draft: NewProject) -> Result<Project, AppError> {
        let candidate = draft.clone().into_project(String::new(), self.clock.now());
        if let Err(err) = candidate.validate() {
            return Err(self.fail("project_create", err.into()));
        }
        let project = self
            .store
            .add_project(draft)
            .ok_or_else(|| self.fail("project_create", storage_error("project_create")))?;
        self.succeed("project_create", &project.id, "Project created.");
        Ok(project)
    }

    pub fn update_project(&self, id: &str, patch: &ProjectPatch) -> Result<Project, AppError> {
        let mut merged = self
            .find_project(id)
            .ok_or_else(|| self.fail("project_update", not_found::<Project>(id)))?;
        patch.apply(&mut merged);
        if let Err(err) = merged.validate() {
            return Err(self.fail("project_update", err.into()));
        }
        if !self.store.update_project(id, patch) {
            return Err(self.fail("project_update", storage_error("project_update")));
        }
        self.succeed("project_update", id, "Project updated.");
        Ok(self.find_project(id).unwrap_or(merged))
    }

    /// Deletes the project together with its tasks.
    pub fn delete_project(&self, id: &str) -> Result<(), AppError> {
        if self.find_project(id).is_none() {
            return Err(self.fail("project_delete", not_found::<Project>(id)));
        }
        if !self.store.delete_project(id) {
            return Err(self.fail("project_delete", storage_error("project_delete")));
        }
        self.succeed("project_delete", id, "Project deleted.");
        Ok(())
    }

    // ===== tasks =====

    pub fn create_task(&self, draft: NewTask) -> Result<Task, AppError> {
        let candidate = draft.clone().into_task(String::new(), self.clock.now());
        if let Err(err) = candidate.validate() {
            return Err(self.fail("task_create", err.into()));
        }
        self.require_project(candidate.project_id.as_deref(), "task_create")?;
        let task = self
            .store
            .add_task(draft)
            .ok_or_else(|| self.fail("task_create", storage_error("task_create")))?;
        self.succeed("task_create", &task.id, "Task created.");
        Ok(task)
    }

    pub fn update_task(&self, id: &str, patch: &TaskPatch) -> Result<Task, AppError> {
        let mut merged = self
            .find_task(id)
            .ok_or_else(|| self.fail("task_update", not_found::<Task>(id)))?;
        patch.apply(&mut merged);
        if let Err(err) = merged.validate() {
            return Err(self.fail("task_update", err.into()));
        }
        if patch.project_id.is_some() {
            self.require_project(merged.project_id.as_deref(), "task_update")?;
        }
        if !self.store.update_task(id, patch) {
            return Err(self.fail("task_update", storage_error("task_update")));
        }
        self.succeed("task_update", id, "Task updated.");
        Ok(self.find_task(id).unwrap_or(merged))
    }

    pub fn set_task_status(&self, id: &str, status: TaskStatus) -> Result<Task, AppError> {
        self.update_task(id, &TaskPatch::status(status))
    }

    pub fn delete_task(&self, id: &str) -> Result<(), AppError> {
        if self.find_task(id).is_none() {
            return Err(self.fail("task_delete", not_found::<Task>(id)));
        }
        if !self.store.delete_task(id) {
            return Err(self.fail("task_delete", storage_error("task_delete")));
        }
        self.succeed("task_delete", id, "Task deleted.");
        Ok(())
    }

    // ===== team =====

    pub fn create_team_member(&self, draft: NewTeamMember) -> Result<TeamMember, AppError> {
        let candidate = draft.clone().into_member(String::new(), self.clock.now());
        if let Err(err) = candidate.validate() {
            return Err(self.fail("team_member_create", err.into()));
        }
        let member = self
            .store
            .add_team_member(draft)
            .ok_or_else(|| self.fail("team_member_create", storage_error("team_member_create")))?;
        self.succeed("team_member_create", &member.id, "Team member added.");
        Ok(member)
    }

    pub fn update_team_member(
        &self,
        id: &str,
        patch: &TeamMemberPatch,
    ) -> Result<TeamMember, AppError> {
        let mut merged = self
            .find_team_member(id)
            .ok_or_else(|| self.fail("team_member_update", not_found::<TeamMember>(id)))?;
        patch.apply(&mut merged);
        if let Err(err) = merged.validate() {
            return Err(self.fail("team_member_update", err.into()));
        }
        if !self.store.update_team_member(id, patch) {
            return Err(self.fail("team_member_update", storage_error("team_member_update")));
        }
        self.succeed("team_member_update", id, "Team member updated.");
        Ok(self.find_team_member(id).unwrap_or(merged))
    }

    pub fn delete_team_member(&self, id: &str) -> Result<(), AppError> {
        if self.find_team_member(id).is_none() {
            return Err(self.fail("team_member_delete", not_found::<TeamMember>(id)));
        }
        if !self.store.delete_team_member(id) {
            return Err(self.fail("team_member_delete", storage_error("team_member_delete")));
        }
        self.succeed("team_member_delete", id, "Team member removed.");
        Ok(())
    }

    // ===== helpers =====

    fn find_project(&self, id: &str) -> Option<Project> {
        self.store.projects().into_iter().find(|project| project.id == id)
    }

    fn find_task(&self, id: &str) -> Option<Task> {
        self.store.tasks().into_iter().find(|task| task.id == id)
    }

    fn find_team_member(&self, id: &str) -> Option<TeamMember> {
        self.store
            .team_members()
            .into_iter()
            .find(|member| member.id == id)
    }

    fn require_project(
        &self,
        project_id: Option<&str>,
        operation: &'static str,
    ) -> Result<(), AppError> {
        match project_id {
            Some(id) if self.find_project(id).is_none() => {
                Err(self.fail(operation, AppError::UnknownProject(id.to_string())))
            }
            _ => Ok(()),
        }
    }

    fn succeed(&self, operation: &'static str, id: &str, message: &str) {
        info!("event={operation} module=app status=ok id={id}");
        self.notify(NewNotification::success(message));
    }

    fn fail(&self, operation: &'static str, err: AppError) -> AppError {
        warn!(
            "event={} module=app status=error error_code={}",
            operation,
            err.code()
        );
        self.notify(NewNotification::error(err.to_string()));
        err
    }

    fn notify(&self, notification: NewNotification) {
        if let Some(notifier) = self.notifier {
            notifier.notify(notification);
        }
    }
}

fn project_names(projects: &[Project]) -> HashMap<String, String> {
    projects
        .iter()
        .map(|project| (project.id.clone(), project.name.clone()))
        .collect()
}

fn task_row(task: Task, names: &HashMap<String, String>, today: chrono::NaiveDate) -> TaskRow {
    TaskRow {
        project_name: task
            .project_id
            .as_ref()
            .and_then(|id| names.get(id))
            .cloned(),
        overdue: task.is_overdue(today),
        task,
    }
}

fn not_found<T: Entity>(id: &str) -> AppError {
    AppError::NotFound {
        kind: T::KIND,
        id: id.to_string(),
    }
}

fn storage_error(operation: &'static str) -> AppError {
    AppError::Storage { operation }
}
