//! Commands against the local SQLite workspace.

use crate::cli::{
    Command, NotificationCommand, ProjectCommand, ProjectFields, SettingsCommand, TaskCommand,
    TaskFields, TeamCommand,
};
use crate::output;
use anyhow::{anyhow, bail, Context, Result};
use log::info;
use planboard_core::app::{Language, SearchOutcome};
use planboard_core::model::settings::SettingsPatch;
use planboard_core::{
    open_db, AppController, AuthManager, DashboardConfig, NewProject, NewTask, NewTeamMember,
    PlanboardConfig, ProjectPatch, RegistrationRequest, SqliteKeyValueBackend, Startup,
    StorageManager, TaskPatch, TeamMemberPatch, View,
};
use std::fs;

type Storage = StorageManager<SqliteKeyValueBackend>;

/// Runs the startup sequence (database → storage → auth session) and
/// dispatches `command`.
pub fn execute(command: Command, config: &PlanboardConfig, lang: Option<&str>) -> Result<()> {
    let conn = open_db(&config.db_path)
        .with_context(|| format!("failed to open {}", config.db_path.display()))?;
    let storage = StorageManager::new(SqliteKeyValueBackend::new(conn), config.storage());
    if !storage.initialize() {
        bail!("storage at {} is unavailable", config.db_path.display());
    }

    let mut auth = AuthManager::new(&storage, config.auth()).with_notifier(&storage);
    auth.restore_session();

    match command {
        Command::Login(args) => {
            let user = auth.login(&args.email, &args.password)?;
            output::done(format!("signed in as {} <{}>", user.name, user.email));
        }
        Command::Register(args) => {
            let request = RegistrationRequest {
                name: args.name,
                email: args.email,
                password: args.password,
                confirm_password: args.confirm,
            };
            let user = auth.register(&request)?;
            output::done(format!("registered {} <{}>", user.name, user.email));
        }
        Command::Logout => {
            auth.logout();
            output::done("signed out");
        }
        Command::Whoami => match auth.current_user() {
            Some(user) => output::json(user)?,
            None => println!("not signed in"),
        },
        Command::Settings(cmd) => settings(cmd, &storage)?,
        Command::Stats => output::json(&storage.app_stats())?,
        Command::Backup { output: target } => {
            let backup = storage.create_backup();
            let document = serde_json::to_string_pretty(&backup)?;
            match target {
                Some(path) => {
                    fs::write(&path, document)
                        .with_context(|| format!("failed to write {}", path.display()))?;
                    output::done(format!("backup written to {}", path.display()));
                }
                None => println!("{document}"),
            }
        }
        Command::Restore { input } => {
            let raw = fs::read_to_string(&input)
                .with_context(|| format!("failed to read {}", input.display()))?;
            let document: serde_json::Value =
                serde_json::from_str(&raw).context("backup is not valid JSON")?;
            if !storage.restore_from_backup(&document) {
                bail!("backup could not be restored");
            }
            output::done("backup restored");
        }
        other => {
            let language = lang
                .map(Language::from_tag)
                .unwrap_or_else(|| Language::from_tag(&storage.get_settings().language));
            let mut controller = AppController::new(&storage, DashboardConfig::default())
                .with_notifier(&storage)
                .with_language(language);
            if let Startup::LoginRequired = controller.initialize(&auth) {
                bail!("not signed in; run `planboard login <email> --password <password>` first");
            }
            workspace(other, &mut controller, &storage)?;
        }
    }
    Ok(())
}

fn workspace(
    command: Command,
    controller: &mut AppController<'_, Storage>,
    storage: &Storage,
) -> Result<()> {
    match command {
        Command::Dashboard => output::json(&controller.dashboard()),
        Command::View { name } => {
            let view = View::parse(&name).ok_or_else(|| {
                anyhow!("unknown view `{name}`; expected dashboard|projects|tasks|gantt|team")
            })?;
            output::json(&controller.show_view(view))
        }
        Command::Search { query } => match controller.handle_search(&query) {
            SearchOutcome::Cleared => {
                println!("empty query");
                Ok(())
            }
            results => output::json(&results),
        },
        Command::Project(cmd) => project(cmd, controller),
        Command::Task(cmd) => task(cmd, controller),
        Command::Team(cmd) => team(cmd, controller),
        Command::Notifications(cmd) => notifications(cmd, storage),
        other => bail!("`{}` is not a workspace command", other.name()),
    }
}

fn project(command: ProjectCommand, controller: &AppController<'_, Storage>) -> Result<()> {
    match command {
        ProjectCommand::List => output::json(&controller.project_cards())?,
        ProjectCommand::Add(fields) => {
            let draft = new_project(fields)?;
            let project = controller.create_project(draft)?;
            output::done(format!("created project {}", project.id));
        }
        ProjectCommand::Update { id, fields } => {
            let project = controller.update_project(&id, &project_patch(fields))?;
            output::done(format!("updated project {}", project.id));
        }
        ProjectCommand::Delete { id } => {
            controller.delete_project(&id)?;
            output::done(format!("deleted project {id} and its tasks"));
        }
    }
    Ok(())
}

fn task(command: TaskCommand, controller: &AppController<'_, Storage>) -> Result<()> {
    match command {
        TaskCommand::List => output::json(&controller.task_rows())?,
        TaskCommand::Gantt { project } => output::json(&controller.gantt(project.as_deref()))?,
        TaskCommand::Add(fields) => {
            let draft = new_task(fields)?;
            let task = controller.create_task(draft)?;
            output::done(format!("created task {}", task.id));
        }
        TaskCommand::Update { id, fields } => {
            let task = controller.update_task(&id, &task_patch(fields))?;
            output::done(format!("updated task {}", task.id));
        }
        TaskCommand::Status { id, status } => {
            let task = controller.set_task_status(&id, status)?;
            output::done(format!("task {} is now {}", task.id, task.status.as_str()));
        }
        TaskCommand::Delete { id } => {
            controller.delete_task(&id)?;
            output::done(format!("deleted task {id}"));
        }
    }
    Ok(())
}

fn team(command: TeamCommand, controller: &mut AppController<'_, Storage>) -> Result<()> {
    match command {
        TeamCommand::List => output::json(&controller.show_view(View::Team))?,
        TeamCommand::Add { name, role, email } => {
            let member = controller.create_team_member(NewTeamMember { name, role, email })?;
            output::done(format!("added team member {}", member.id));
        }
        TeamCommand::Update {
            id,
            name,
            role,
            email,
        } => {
            let member =
                controller.update_team_member(&id, &TeamMemberPatch { name, role, email })?;
            output::done(format!("updated team member {}", member.id));
        }
        TeamCommand::Delete { id } => {
            controller.delete_team_member(&id)?;
            output::done(format!("removed team member {id}"));
        }
    }
    Ok(())
}

fn notifications(command: NotificationCommand, storage: &Storage) -> Result<()> {
    match command {
        NotificationCommand::List => {
            info!(
                "event=notifications_list module=cli status=ok unread={}",
                storage.unread_notification_count()
            );
            output::json(&storage.get_notifications())?;
        }
        NotificationCommand::Read { id } => {
            ensure(storage.mark_notification_read(&id), "mark notification read")?;
            output::done(format!("notification {id} marked read"));
        }
        NotificationCommand::ReadAll => {
            ensure(storage.mark_all_notifications_read(), "mark notifications read")?;
            output::done("all notifications marked read");
        }
        NotificationCommand::Delete { id } => {
            ensure(storage.delete_notification(&id), "delete notification")?;
            output::done(format!("notification {id} deleted"));
        }
    }
    Ok(())
}

fn settings(command: SettingsCommand, storage: &Storage) -> Result<()> {
    match command {
        SettingsCommand::Show => output::json(&storage.get_settings())?,
        SettingsCommand::Set(fields) => {
            let patch = SettingsPatch {
                theme: fields.theme,
                language: fields.language,
                notifications: fields.notifications,
                auto_save: fields.auto_save,
                date_format: fields.date_format,
                time_format: fields.time_format,
            };
            ensure(storage.update_settings(&patch), "update settings")?;
            output::json(&storage.get_settings())?;
        }
    }
    Ok(())
}

fn ensure(succeeded: bool, operation: &str) -> Result<()> {
    if succeeded {
        Ok(())
    } else {
        bail!("could not {operation}; see the log for details")
    }
}

fn new_project(fields: ProjectFields) -> Result<NewProject> {
    let name = fields
        .name
        .ok_or_else(|| anyhow!("--name is required"))?;
    Ok(NewProject {
        name,
        description: fields.description,
        color: fields.color,
        status: fields.status.unwrap_or_default(),
        priority: fields.priority.unwrap_or_default(),
        progress: fields.progress.unwrap_or(0),
        start_date: fields.start,
        end_date: fields.end,
    })
}

fn project_patch(fields: ProjectFields) -> ProjectPatch {
    ProjectPatch {
        name: fields.name,
        description: fields.description,
        color: fields.color,
        status: fields.status,
        priority: fields.priority,
        progress: fields.progress,
        start_date: fields.start,
        end_date: fields.end,
    }
}

fn new_task(fields: TaskFields) -> Result<NewTask> {
    let name = fields
        .name
        .ok_or_else(|| anyhow!("--name is required"))?;
    Ok(NewTask {
        name,
        description: fields.description,
        status: fields.status.unwrap_or_default(),
        priority: fields.priority.unwrap_or_default(),
        project_id: fields.project,
        assigned_to: fields.assignee,
        start_date: fields.start,
        end_date: fields.end,
    })
}

fn task_patch(fields: TaskFields) -> TaskPatch {
    TaskPatch {
        name: fields.name,
        description: fields.description,
        status: fields.status,
        priority: fields.priority,
        project_id: fields.project,
        assigned_to: fields.assignee,
        start_date: fields.start,
        end_date: fields.end,
    }
}
