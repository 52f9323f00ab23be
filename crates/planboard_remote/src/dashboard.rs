//! Dashboard figures assembled from the REST API.

use crate::client::ApiClient;
use crate::error::ApiResult;
use crate::model::{RemoteProject, RemoteTask};
use chrono::{DateTime, Utc};
use log::{info, warn};
use planboard_core::stats::{pending_count, project_progress};
use planboard_core::{KeyValueBackend, Task};

/// Number of projects shown as recent, in server order.
pub const RECENT_PROJECTS: usize = 3;

/// Read side of the API needed for the dashboard.
pub trait RemoteWorkspace {
    fn projects(&self) -> ApiResult<Vec<RemoteProject>>;
    fn project_tasks(&self, project_id: &str) -> ApiResult<Vec<RemoteTask>>;
}

impl<B: KeyValueBackend> RemoteWorkspace for ApiClient<B> {
    fn projects(&self) -> ApiResult<Vec<RemoteProject>> {
        ApiClient::projects(self)
    }

    fn project_tasks(&self, project_id: &str) -> ApiResult<Vec<RemoteTask>> {
        ApiClient::project_tasks(self, project_id)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectProgress {
    pub project_id: String,
    pub task_count: usize,
    pub progress: u8,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RemoteDashboard {
    pub total_projects: usize,
    pub total_tasks: usize,
    pub completed_tasks: usize,
    /// Not started or in progress.
    pub pending_tasks: usize,
    pub overdue_tasks: usize,
    pub recent_projects: Vec<RemoteProject>,
    /// Only projects whose tasks loaded.
    pub progress: Vec<ProjectProgress>,
    /// Projects whose task list failed to load.
    pub skipped_projects: Vec<String>,
}

/// Loads every project and its tasks and aggregates the dashboard.
///
/// A project whose tasks fail to load is logged and skipped. An expired
/// session aborts the whole load.
pub fn load_dashboard(
    source: &dyn RemoteWorkspace,
    now: DateTime<Utc>,
) -> ApiResult<RemoteDashboard> {
    let projects = source.projects()?;
    let today = now.date_naive();

    let mut dashboard = RemoteDashboard {
        total_projects: projects.len(),
        recent_projects: projects.iter().take(RECENT_PROJECTS).cloned().collect(),
        ..RemoteDashboard::default()
    };

    for project in &projects {
        let remote_tasks = match source.project_tasks(&project.id) {
            Ok(tasks) => tasks,
            Err(err) if err.is_session_expired() => return Err(err),
            Err(err) => {
                warn!(
                    "event=remote_dashboard module=remote status=warn project_id={} error_code={}",
                    project.id,
                    err.code()
                );
                dashboard.skipped_projects.push(project.id.clone());
                continue;
            }
        };
        let tasks: Vec<Task> = remote_tasks.iter().map(|task| task.to_task(now)).collect();

        dashboard.total_tasks += tasks.len();
        dashboard.completed_tasks += tasks.iter().filter(|task| task.status.is_completed()).count();
        dashboard.pending_tasks += pending_count(&tasks);
        dashboard.overdue_tasks += tasks.iter().filter(|task| task.is_overdue(today)).count();
        dashboard.progress.push(ProjectProgress {
            project_id: project.id.clone(),
            task_count: tasks.len(),
            progress: project_progress(&project.id, &tasks),
        });
    }

    info!(
        "event=remote_dashboard module=remote status=ok projects={} tasks={} skipped={}",
        dashboard.total_projects,
        dashboard.total_tasks,
        dashboard.skipped_projects.len()
    );
    Ok(dashboard)
}

#[cfg(test)]
mod tests {
    use super::{load_dashboard, RemoteWorkspace};
    use crate::error::{ApiError, ApiResult, LOGIN_ROUTE};
    use crate::model::{RemoteProject, RemoteTask, WireTaskStatus};
    use chrono::{NaiveDate, TimeZone, Utc};
    use std::collections::HashMap;

    struct Fixture {
        projects: Vec<RemoteProject>,
        tasks: HashMap<String, ApiResult<Vec<RemoteTask>>>,
    }

    impl RemoteWorkspace for Fixture {
        fn projects(&self) -> ApiResult<Vec<RemoteProject>> {
            Ok(self.projects.clone())
        }

        fn project_tasks(&self, project_id: &str) -> ApiResult<Vec<RemoteTask>> {
            match self.tasks.get(project_id) {
                Some(Ok(tasks)) => Ok(tasks.clone()),
                Some(Err(ApiError::SessionExpired { redirect_to })) => {
                    Err(ApiError::SessionExpired {
                        redirect_to: *redirect_to,
                    })
                }
                _ => Err(ApiError::Status {
                    status: 403,
                    message: "forbidden".to_string(),
                }),
            }
        }
    }

    fn project(id: &str) -> RemoteProject {
        RemoteProject {
            id: id.to_string(),
            name: format!("Project {id}"),
            description: None,
            start_date: None,
            end_date: None,
            owner_id: None,
            created_at: None,
            updated_at: None,
        }
    }

    fn task(id: &str, project_id: &str, status: WireTaskStatus, end: Option<u32>) -> RemoteTask {
        RemoteTask {
            id: id.to_string(),
            project_id: project_id.to_string(),
            parent_task_id: None,
            name: format!("Task {id}"),
            description: None,
            start_date: None,
            end_date: end.and_then(|day| NaiveDate::from_ymd_opt(2024, 3, day)),
            assigned_to: None,
            status,
            created_at: None,
            updated_at: None,
        }
    }

    #[test]
    fn failing_project_is_skipped_and_totals_cover_the_rest() {
        let now = Utc.with_ymd_and_hms(2024, 3, 10, 12, 0, 0).unwrap();
        let mut tasks = HashMap::new();
        tasks.insert(
            "p1".to_string(),
            Ok(vec![
                task("t1", "p1", WireTaskStatus::Completed, Some(1)),
                task("t2", "p1", WireTaskStatus::InProgress, Some(9)),
                task("t3", "p1", WireTaskStatus::NotStarted, Some(10)),
                task("t4", "p1", WireTaskStatus::OnHold, None),
            ]),
        );
        let fixture = Fixture {
            projects: vec![project("p1"), project("p2"), project("p3"), project("p4")],
            tasks,
        };

        let dashboard = load_dashboard(&fixture, now).unwrap();

        assert_eq!(dashboard.total_projects, 4);
        assert_eq!(dashboard.recent_projects.len(), 3);
        assert_eq!(dashboard.recent_projects[0].id, "p1");
        assert_eq!(dashboard.total_tasks, 4);
        assert_eq!(dashboard.completed_tasks, 1);
        assert_eq!(dashboard.pending_tasks, 2);
        assert_eq!(dashboard.overdue_tasks, 1);
        assert_eq!(dashboard.progress.len(), 1);
        assert_eq!(dashboard.progress[0].progress, 25);
        assert_eq!(dashboard.skipped_projects, vec!["p2", "p3", "p4"]);
    }

    #[test]
    fn expired_session_aborts_the_load() {
        let mut tasks = HashMap::new();
        tasks.insert(
            "p1".to_string(),
            Err(ApiError::SessionExpired {
                redirect_to: LOGIN_ROUTE,
            }),
        );
        let fixture = Fixture {
            projects: vec![project("p1")],
            tasks,
        };
        let err = load_dashboard(&fixture, Utc::now()).unwrap_err();
        assert!(err.is_session_expired());
    }
}
