//! Derived dashboard statistics.
//!
//! Pure functions over project and task slices. "Today" is always passed in
//! so results are deterministic.

use crate::model::project::Project;
use crate::model::task::{Task, TaskStatus};
use crate::utils::collections::none_last;
use chrono::NaiveDate;
use serde::Serialize;
use std::cmp::Reverse;

/// Headline dashboard counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub total_projects: usize,
    pub total_tasks: usize,
    pub completed_tasks: usize,
    /// Unfinished tasks whose end date is before today.
    pub overdue_tasks: usize,
}

pub fn dashboard_stats(projects: &[Project], tasks: &[Task], today: NaiveDate) -> DashboardStats {
    DashboardStats {
        total_projects: projects.len(),
        total_tasks: tasks.len(),
        completed_tasks: tasks.iter().filter(|task| task.status.is_completed()).count(),
        overdue_tasks: tasks.iter().filter(|task| task.is_overdue(today)).count(),
    }
}

/// `round(100 * completed / total)` over the project's tasks; 0 without
/// tasks.
pub fn project_progress(project_id: &str, tasks: &[Task]) -> u8 {
    let (total, completed) = tasks
        .iter()
        .filter(|task| task.belongs_to(project_id))
        .fold((0usize, 0usize), |(total, completed), task| {
            (total + 1, completed + usize::from(task.status.is_completed()))
        });
    percentage(completed, total)
}

pub(crate) fn percentage(part: usize, total: usize) -> u8 {
    if total == 0 {
        return 0;
    }
    ((part as f64 / total as f64) * 100.0).round() as u8
}

/// Where a project's displayed progress comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ProgressMode {
    /// Keep the stored `progress` field.
    #[default]
    Stored,
    /// Recompute from task completion.
    Computed,
}

pub fn apply_progress(projects: &[Project], tasks: &[Task], mode: ProgressMode) -> Vec<Project> {
    match mode {
        ProgressMode::Stored => projects.to_vec(),
        ProgressMode::Computed => projects
            .iter()
            .map(|project| Project {
                progress: project_progress(&project.id, tasks),
                ..project.clone()
            })
            .collect(),
    }
}

/// The `limit` most recently created projects, newest first.
pub fn recent_projects(projects: &[Project], limit: usize) -> Vec<Project> {
    let mut sorted = projects.to_vec();
    sorted.sort_by_key(|project| Reverse(project.created_at));
    sorted.truncate(limit);
    sorted
}

/// Whether already-overdue tasks may fill the upcoming list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OverdueFill {
    /// Fill remaining slots with the most recently overdue tasks.
    #[default]
    Include,
    Exclude,
}

/// Unfinished tasks with an end date, soonest first.
///
/// Tasks due today or later come first in ascending end-date order. When
/// fewer than `limit` remain and `fill` is `Include`, overdue tasks follow,
/// most recently overdue first.
pub fn upcoming_tasks(
    tasks: &[Task],
    today: NaiveDate,
    limit: usize,
    fill: OverdueFill,
) -> Vec<Task> {
    let (mut due, mut overdue): (Vec<&Task>, Vec<&Task>) = tasks
        .iter()
        .filter(|task| !task.status.is_completed() && task.end_date.is_some())
        .partition(|task| !task.is_overdue(today));

    due.sort_by(|a, b| none_last(&a.end_date, &b.end_date));
    let mut selected: Vec<Task> = due.into_iter().take(limit).cloned().collect();

    if fill == OverdueFill::Include && selected.len() < limit {
        overdue.sort_by_key(|task| Reverse(task.end_date));
        let remaining = limit - selected.len();
        selected.extend(overdue.into_iter().take(remaining).cloned());
    }
    selected
}

/// Per-status task counts for one project.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskBreakdown {
    pub total: usize,
    pub not_started: usize,
    pub in_progress: usize,
    pub completed: usize,
    pub on_hold: usize,
    pub pending: usize,
    pub overdue: usize,
}

impl TaskBreakdown {
    pub fn progress(&self) -> u8 {
        percentage(self.completed, self.total)
    }
}

pub fn task_breakdown(project_id: &str, tasks: &[Task], today: NaiveDate) -> TaskBreakdown {
    let mut breakdown = TaskBreakdown::default();
    for task in tasks.iter().filter(|task| task.belongs_to(project_id)) {
        breakdown.total += 1;
        match task.status {
            TaskStatus::NotStarted => breakdown.not_started += 1,
            TaskStatus::InProgress => breakdown.in_progress += 1,
            TaskStatus::Completed => breakdown.completed += 1,
            TaskStatus::OnHold => breakdown.on_hold += 1,
            TaskStatus::Pending => breakdown.pending += 1,
        }
        if task.is_overdue(today) {
            breakdown.overdue += 1;
        }
    }
    breakdown
}

/// Open work: not-started plus in-progress tasks.
pub fn pending_count(tasks: &[Task]) -> usize {
    tasks
        .iter()
        .filter(|task| matches!(task.status, TaskStatus::NotStarted | TaskStatus::InProgress))
        .count()
}

/// Schedule position of a project derived from progress and dates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ScheduleState {
    Completed,
    Overdue,
    Active,
    Upcoming,
}

/// Progress 100 wins; then past end date; then started; else upcoming.
/// Missing dates never match their check.
pub fn project_schedule(project: &Project, today: NaiveDate) -> ScheduleState {
    if project.progress >= 100 {
        ScheduleState::Completed
    } else if project.end_date.is_some_and(|end| today > end) {
        ScheduleState::Overdue
    } else if project.start_date.is_some_and(|start| today >= start) {
        ScheduleState::Active
    } else {
        ScheduleState::Upcoming
    }
}
