//! Commands against the REST API.

use crate::cli::RemoteCommand;
use crate::output;
use anyhow::{Context, Result};
use chrono::Utc;
use planboard_core::{open_db, PlanboardConfig, SqliteKeyValueBackend};
use planboard_remote::{load_dashboard, ApiClient, SessionStore};

/// The session token and cached user share the local database file under
/// their own raw keys.
pub fn execute(command: RemoteCommand, config: &PlanboardConfig) -> Result<()> {
    let conn = open_db(&config.db_path)
        .with_context(|| format!("failed to open {}", config.db_path.display()))?;
    let session = SessionStore::new(SqliteKeyValueBackend::new(conn));
    let client = ApiClient::new(&config.api_base_url, session)?;

    match command {
        RemoteCommand::Login { username, password } => {
            let auth = client.login(&username, &password)?;
            output::done(format!("signed in to {} as {}", client.base_url(), auth.user.username));
        }
        RemoteCommand::Register {
            username,
            email,
            password,
        } => {
            let auth = client.register(&username, &email, &password)?;
            output::done(format!("registered {} at {}", auth.user.username, client.base_url()));
        }
        RemoteCommand::Logout => {
            client.logout()?;
            output::done("signed out");
        }
        RemoteCommand::Whoami => output::json(&client.current_user()?)?,
        RemoteCommand::Projects => output::json(&client.projects()?)?,
        RemoteCommand::Tasks { project_id } => output::json(&client.project_tasks(&project_id)?)?,
        RemoteCommand::Dashboard => {
            let dashboard = load_dashboard(&client, Utc::now())?;
            println!("projects:        {}", dashboard.total_projects);
            println!("tasks:           {}", dashboard.total_tasks);
            println!("completed tasks: {}", dashboard.completed_tasks);
            println!("pending tasks:   {}", dashboard.pending_tasks);
            println!("overdue tasks:   {}", dashboard.overdue_tasks);
            for project in &dashboard.recent_projects {
                let progress = dashboard
                    .progress
                    .iter()
                    .find(|entry| entry.project_id == project.id)
                    .map(|entry| format!("{}%", entry.progress))
                    .unwrap_or_else(|| "n/a".to_string());
                println!("recent: {} ({}) {}", project.name, project.id, progress);
            }
            if !dashboard.skipped_projects.is_empty() {
                println!("skipped: {}", dashboard.skipped_projects.join(", "));
            }
        }
        RemoteCommand::Notifications => {
            for notification in client.notifications()? {
                let marker = if notification.is_read { " " } else { "*" };
                println!("{marker} {} {}", notification.id, notification.message);
            }
        }
        RemoteCommand::MarkAllRead => {
            client.mark_all_notifications_read()?;
            output::done("all notifications marked read");
        }
    }
    Ok(())
}
