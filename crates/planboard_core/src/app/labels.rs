//! Display labels for statuses and priorities.

use crate::model::project::ProjectStatus;
use crate::model::task::TaskStatus;
use crate::model::Priority;
use crate::stats::ScheduleState;

/// Label language. Arabic is the default UI language.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Language {
    #[default]
    Arabic,
    English,
}

impl Language {
    /// Maps a settings language tag; unknown tags fall back to English.
    pub fn from_tag(tag: &str) -> Self {
        match tag.trim().to_ascii_lowercase().split(['-', '_']).next() {
            Some("ar") => Self::Arabic,
            _ => Self::English,
        }
    }

    pub fn is_rtl(self) -> bool {
        self == Self::Arabic
    }
}

pub fn project_status_label(status: ProjectStatus, language: Language) -> &'static str {
    match (language, status) {
        (Language::Arabic, ProjectStatus::Active) => "نشط",
        (Language::Arabic, ProjectStatus::Completed) => "مكتمل",
        (Language::Arabic, ProjectStatus::OnHold) => "متوقف",
        (Language::Arabic, ProjectStatus::Pending) => "قيد الانتظار",
        (Language::English, ProjectStatus::Active) => "Active",
        (Language::English, ProjectStatus::Completed) => "Completed",
        (Language::English, ProjectStatus::OnHold) => "On hold",
        (Language::English, ProjectStatus::Pending) => "Pending",
    }
}

pub fn task_status_label(status: TaskStatus, language: Language) -> &'static str {
    match (language, status) {
        (Language::Arabic, TaskStatus::NotStarted) => "لم تبدأ",
        (Language::Arabic, TaskStatus::InProgress) => "جاري",
        (Language::Arabic, TaskStatus::Completed) => "مكتمل",
        (Language::Arabic, TaskStatus::OnHold) => "متوقف",
        (Language::Arabic, TaskStatus::Pending) => "قيد الانتظار",
        (Language::English, TaskStatus::NotStarted) => "Not started",
        (Language::English, TaskStatus::InProgress) => "In progress",
        (Language::English, TaskStatus::Completed) => "Completed",
        (Language::English, TaskStatus::OnHold) => "On hold",
        (Language::English, TaskStatus::Pending) => "Pending",
    }
}

/// Label shown for derived overdue tasks.
pub fn overdue_label(language: Language) -> &'static str {
    match language {
        Language::Arabic => "متأخر",
        Language::English => "Overdue",
    }
}

pub fn schedule_label(state: ScheduleState, language: Language) -> &'static str {
    match (language, state) {
        (Language::Arabic, ScheduleState::Completed) => "مكتمل",
        (_, ScheduleState::Overdue) => overdue_label(language),
        (Language::Arabic, ScheduleState::Active) => "نشط",
        (Language::Arabic, ScheduleState::Upcoming) => "قادم",
        (Language::English, ScheduleState::Completed) => "Completed",
        (Language::English, ScheduleState::Active) => "Active",
        (Language::English, ScheduleState::Upcoming) => "Upcoming",
    }
}

pub fn priority_label(priority: Priority, language: Language) -> &'static str {
    match (language, priority) {
        (Language::Arabic, Priority::High) => "عالية",
        (Language::Arabic, Priority::Medium) => "متوسطة",
        (Language::Arabic, Priority::Low) => "منخفضة",
        (Language::English, Priority::High) => "High",
        (Language::English, Priority::Medium) => "Medium",
        (Language::English, Priority::Low) => "Low",
    }
}
