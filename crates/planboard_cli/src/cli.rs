//! Command-line definitions.

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use planboard_core::model::settings::{Theme, TimeFormat};
use planboard_core::utils::date::parse_date;
use planboard_core::{ConfigError, PlanboardConfig, Priority, ProjectStatus, TaskStatus};
use std::path::PathBuf;

/// Local project, task and team planner.
#[derive(Parser)]
#[command(name = "planboard", author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// SQLite file holding the local workspace (overrides PLANBOARD_DB_PATH)
    #[arg(long, global = true)]
    pub db: Option<PathBuf>,

    /// Log directory (overrides PLANBOARD_LOG_DIR)
    #[arg(long, global = true)]
    pub log_dir: Option<PathBuf>,

    /// trace|debug|info|warn|error (overrides PLANBOARD_LOG_LEVEL)
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// Label language tag, e.g. `ar` or `en` (defaults to the stored setting)
    #[arg(long, global = true)]
    pub lang: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    /// Environment configuration with command-line overrides applied.
    pub fn resolve_config(&self) -> Result<PlanboardConfig, ConfigError> {
        let overrides = [
            ("PLANBOARD_DB_PATH", self.db.as_ref().map(|path| path.display().to_string())),
            ("PLANBOARD_LOG_DIR", self.log_dir.as_ref().map(|path| path.display().to_string())),
            ("PLANBOARD_LOG_LEVEL", self.log_level.clone()),
        ];
        PlanboardConfig::from_lookup(|key| {
            overrides
                .iter()
                .find(|(name, _)| *name == key)
                .and_then(|(_, value)| value.clone())
                .or_else(|| std::env::var(key).ok())
        })
    }
}

#[derive(Subcommand)]
pub enum Command {
    /// Sign in; unknown emails get a new admin account
    Login(LoginArgs),
    /// Create an account and sign in
    Register(RegisterArgs),
    /// Sign out
    Logout,
    /// Show the signed-in user
    Whoami,
    /// Dashboard statistics, recent projects and upcoming tasks
    Dashboard,
    /// Render one view: dashboard, projects, tasks, gantt or team
    View {
        name: String,
    },
    /// Search project and task names and descriptions
    Search {
        query: String,
    },
    #[command(subcommand)]
    Project(ProjectCommand),
    #[command(subcommand)]
    Task(TaskCommand),
    #[command(subcommand)]
    Team(TeamCommand),
    #[command(subcommand)]
    Notifications(NotificationCommand),
    #[command(subcommand)]
    Settings(SettingsCommand),
    /// Entity counts and storage usage
    Stats,
    /// Write a backup document to a file, or stdout
    Backup {
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Restore a backup document
    Restore {
        input: PathBuf,
    },
    /// Server-backed workspace
    #[command(subcommand)]
    Remote(RemoteCommand),
}

impl Command {
    /// Name used in log events.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Login(_) => "login",
            Self::Register(_) => "register",
            Self::Logout => "logout",
            Self::Whoami => "whoami",
            Self::Dashboard => "dashboard",
            Self::View { .. } => "view",
            Self::Search { .. } => "search",
            Self::Project(_) => "project",
            Self::Task(_) => "task",
            Self::Team(_) => "team",
            Self::Notifications(_) => "notifications",
            Self::Settings(_) => "settings",
            Self::Stats => "stats",
            Self::Backup { .. } => "backup",
            Self::Restore { .. } => "restore",
            Self::Remote(_) => "remote",
        }
    }
}

#[derive(Args)]
pub struct LoginArgs {
    pub email: String,
    #[arg(short, long)]
    pub password: String,
}

#[derive(Args)]
pub struct RegisterArgs {
    pub name: String,
    pub email: String,
    #[arg(short, long)]
    pub password: String,
    /// Must match --password
    #[arg(long)]
    pub confirm: String,
}

#[derive(Subcommand)]
pub enum ProjectCommand {
    /// Project cards with schedule state and task breakdown
    List,
    Add(ProjectFields),
    Update {
        id: String,
        #[command(flatten)]
        fields: ProjectFields,
    },
    /// Delete a project and all of its tasks
    Delete {
        id: String,
    },
}

#[derive(Args, Default)]
pub struct ProjectFields {
    /// Required for `add`
    #[arg(long)]
    pub name: Option<String>,
    #[arg(long)]
    pub description: Option<String>,
    /// `#rrggbb`
    #[arg(long)]
    pub color: Option<String>,
    #[arg(long, value_parser = parse_project_status)]
    pub status: Option<ProjectStatus>,
    #[arg(long, value_parser = parse_priority)]
    pub priority: Option<Priority>,
    #[arg(long, value_parser = clap::value_parser!(u8).range(0..=100))]
    pub progress: Option<u8>,
    #[arg(long, value_parser = parse_day)]
    pub start: Option<NaiveDate>,
    #[arg(long, value_parser = parse_day)]
    pub end: Option<NaiveDate>,
}

#[derive(Subcommand)]
pub enum TaskCommand {
    List,
    Add(TaskFields),
    Update {
        id: String,
        #[command(flatten)]
        fields: TaskFields,
    },
    /// Change only the status
    Status {
        id: String,
        #[arg(value_parser = parse_task_status)]
        status: TaskStatus,
    },
    Delete {
        id: String,
    },
    /// Gantt bars, optionally for one project
    Gantt {
        #[arg(long)]
        project: Option<String>,
    },
}

#[derive(Args, Default)]
pub struct TaskFields {
    /// Required for `add`
    #[arg(long)]
    pub name: Option<String>,
    #[arg(long)]
    pub project: Option<String>,
    #[arg(long)]
    pub description: Option<String>,
    #[arg(long, value_parser = parse_task_status)]
    pub status: Option<TaskStatus>,
    #[arg(long, value_parser = parse_priority)]
    pub priority: Option<Priority>,
    /// Team member id; an empty value unassigns
    #[arg(long)]
    pub assignee: Option<String>,
    #[arg(long, value_parser = parse_day)]
    pub start: Option<NaiveDate>,
    #[arg(long, value_parser = parse_day)]
    pub end: Option<NaiveDate>,
}

#[derive(Subcommand)]
pub enum TeamCommand {
    List,
    Add {
        name: String,
        #[arg(long, default_value = "")]
        role: String,
        #[arg(long)]
        email: Option<String>,
    },
    Update {
        id: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        role: Option<String>,
        /// An empty value clears the email
        #[arg(long)]
        email: Option<String>,
    },
    Delete {
        id: String,
    },
}

#[derive(Subcommand)]
pub enum NotificationCommand {
    /// Newest first
    List,
    Read {
        id: String,
    },
    ReadAll,
    Delete {
        id: String,
    },
}

#[derive(Subcommand)]
pub enum SettingsCommand {
    Show,
    Set(SettingsFields),
}

#[derive(Args)]
pub struct SettingsFields {
    #[arg(long, value_parser = parse_theme)]
    pub theme: Option<Theme>,
    #[arg(long)]
    pub language: Option<String>,
    #[arg(long)]
    pub notifications: Option<bool>,
    #[arg(long)]
    pub auto_save: Option<bool>,
    #[arg(long)]
    pub date_format: Option<String>,
    #[arg(long, value_parser = parse_time_format)]
    pub time_format: Option<TimeFormat>,
}

#[derive(Subcommand)]
pub enum RemoteCommand {
    Login {
        username: String,
        #[arg(short, long)]
        password: String,
    },
    Register {
        username: String,
        email: String,
        #[arg(short, long)]
        password: String,
    },
    Logout,
    Whoami,
    Dashboard,
    Projects,
    Tasks {
        project_id: String,
    },
    Notifications,
    MarkAllRead,
}

fn parse_day(value: &str) -> Result<NaiveDate, String> {
    parse_date(value).ok_or_else(|| format!("expected YYYY-MM-DD, got `{value}`"))
}

fn parse_priority(value: &str) -> Result<Priority, String> {
    Priority::parse(value).ok_or_else(|| format!("expected high|medium|low, got `{value}`"))
}

fn parse_project_status(value: &str) -> Result<ProjectStatus, String> {
    ProjectStatus::parse(value)
        .ok_or_else(|| format!("expected active|completed|on-hold|pending, got `{value}`"))
}

fn parse_task_status(value: &str) -> Result<TaskStatus, String> {
    TaskStatus::parse(value).ok_or_else(|| {
        format!("expected not-started|in-progress|completed|on-hold|pending, got `{value}`")
    })
}

fn parse_theme(value: &str) -> Result<Theme, String> {
    serde_json::from_value(serde_json::Value::String(value.to_ascii_lowercase()))
        .map_err(|_| format!("expected light|dark, got `{value}`"))
}

fn parse_time_format(value: &str) -> Result<TimeFormat, String> {
    serde_json::from_value(serde_json::Value::String(value.to_ascii_lowercase()))
        .map_err(|_| format!("expected 24h|12h, got `{value}`"))
}

#[cfg(test)]
mod tests {
    use super::{Cli, Command, TaskCommand};
    use clap::Parser;
    use planboard_core::TaskStatus;

    #[test]
    fn task_status_accepts_snake_case_alias() {
        let cli = Cli::parse_from(["planboard", "task", "status", "t1", "in_progress"]);
        match cli.command {
            Command::Task(TaskCommand::Status { id, status }) => {
                assert_eq!(id, "t1");
                assert_eq!(status, TaskStatus::InProgress);
            }
            _ => panic!("unexpected command"),
        }
    }

    #[test]
    fn progress_outside_percentage_range_is_rejected() {
        let parsed = Cli::try_parse_from([
            "planboard",
            "project",
            "add",
            "--name",
            "x",
            "--progress",
            "120",
        ]);
        assert!(parsed.is_err());
    }

    #[test]
    fn command_definitions_are_consistent() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
