use chrono::NaiveDate;
use egui::Color32;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::color;
use super::project::{Project, ProjectId};
use crate::error::ValidationError;

/// Identifier of a task, unique within the whole collection.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskId(String);

impl TaskId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TaskId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for TaskId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TaskStatus {
    #[default]
    Todo,
    InProgress,
    Completed,
}

impl TaskStatus {
    pub const ALL: [TaskStatus; 3] = [Self::Todo, Self::InProgress, Self::Completed];

    pub fn label(&self) -> &'static str {
        match self {
            Self::Todo => "To Do",
            Self::InProgress => "In Progress",
            Self::Completed => "Completed",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
}

impl Priority {
    pub const ALL: [Priority; 3] = [Self::Low, Self::Medium, Self::High];

    pub fn label(&self) -> &'static str {
        match self {
            Self::Low => "Low",
            Self::Medium => "Medium",
            Self::High => "High",
        }
    }

    pub fn color(&self) -> Color32 {
        match self {
            Self::High => color::DANGER,
            Self::Medium => color::WARNING,
            Self::Low => color::SUCCESS,
        }
    }
}

/// A unit of work owned by a project.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: TaskId,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub status: TaskStatus,
    #[serde(default)]
    pub priority: Priority,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assignee: Option<String>,
    /// Back-reference to the owning project.
    pub project_id: ProjectId,
    /// Ids of tasks this one waits on. Not required to resolve.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub dependencies: Vec<TaskId>,
    /// Completion percentage, 0..=100.
    #[serde(default)]
    pub progress: u8,
}

impl Task {
    /// Build a task from a creation payload. Progress is taken as given;
    /// the store applies the status policy afterwards.
    pub fn from_new(id: TaskId, project_id: ProjectId, data: NewTask) -> Self {
        Self {
            id,
            title: data.title,
            description: data.description,
            status: data.status,
            priority: data.priority,
            start_date: data.start_date,
            end_date: data.end_date,
            assignee: data.assignee,
            project_id,
            dependencies: data.dependencies,
            progress: data.progress.min(100),
        }
    }

    pub fn has_dependencies(&self) -> bool {
        !self.dependencies.is_empty()
    }

    pub fn depends_on(&self, id: &TaskId) -> bool {
        self.dependencies.contains(id)
    }

    /// Whole days from start to end. Negative when the dates are inverted.
    pub fn duration_days(&self) -> i64 {
        (self.end_date - self.start_date).num_days()
    }

    /// Bar color on the timeline.
    pub fn status_color(&self) -> Color32 {
        match self.status {
            TaskStatus::Completed => color::SUCCESS,
            TaskStatus::InProgress => color::WARNING,
            TaskStatus::Todo => color::NEUTRAL,
        }
    }

    /// Merge a partial update into this task. Fields left `None` are kept.
    pub fn apply(&mut self, patch: &TaskPatch) {
        if let Some(title) = &patch.title {
            self.title = title.clone();
        }
        if let Some(description) = &patch.description {
            self.description = description.clone();
        }
        if let Some(status) = patch.status {
            self.status = status;
        }
        if let Some(priority) = patch.priority {
            self.priority = priority;
        }
        if let Some(start) = patch.start_date {
            self.start_date = start;
        }
        if let Some(end) = patch.end_date {
            self.end_date = end;
        }
        if let Some(assignee) = &patch.assignee {
            self.assignee = assignee.clone();
        }
        if let Some(dependencies) = &patch.dependencies {
            self.dependencies = dependencies.clone();
        }
        if let Some(progress) = patch.progress {
            self.progress = progress.min(100);
        }
    }

    /// Pull the task's dates inside `[window_start, window_end]`.
    pub fn clamp_to_window(&mut self, window_start: NaiveDate, window_end: NaiveDate) {
        self.start_date = self.start_date.clamp(window_start, window_end.max(window_start));
        self.end_date = self.end_date.clamp(window_start, window_end.max(window_start));
    }
}

/// Payload for creating a task. Id and project back-reference are assigned
/// by the store.
#[derive(Debug, Clone, PartialEq)]
pub struct NewTask {
    pub title: String,
    pub description: Option<String>,
    pub status: TaskStatus,
    pub priority: Priority,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub assignee: Option<String>,
    pub dependencies: Vec<TaskId>,
    pub progress: u8,
}

impl NewTask {
    pub fn new(title: impl Into<String>, start_date: NaiveDate, end_date: NaiveDate) -> Self {
        Self {
            title: title.into(),
            description: None,
            status: TaskStatus::Todo,
            priority: Priority::Medium,
            start_date,
            end_date,
            assignee: None,
            dependencies: Vec::new(),
            progress: 0,
        }
    }

    pub fn with_status(mut self, status: TaskStatus) -> Self {
        self.status = status;
        self
    }

    pub fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
        self
    }

    pub fn with_dependencies(mut self, dependencies: Vec<TaskId>) -> Self {
        self.dependencies = dependencies;
        self
    }

    pub fn with_progress(mut self, progress: u8) -> Self {
        self.progress = progress;
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Checks the editor applies before submitting: a non-blank title,
    /// end strictly after start, and both dates inside the project window.
    pub fn validate(&self, project: &Project) -> Result<(), ValidationError> {
        validate_task_fields(&self.title, self.start_date, self.end_date, project)
    }
}

fn validate_task_fields(
    title: &str,
    start: NaiveDate,
    end: NaiveDate,
    project: &Project,
) -> Result<(), ValidationError> {
    if title.trim().is_empty() {
        return Err(ValidationError::BlankTitle);
    }
    if start < project.start_date {
        return Err(ValidationError::StartBeforeProject {
            start,
            project_start: project.start_date,
        });
    }
    if end > project.end_date {
        return Err(ValidationError::EndAfterProject {
            end,
            project_end: project.end_date,
        });
    }
    if end <= start {
        return Err(ValidationError::EndNotAfterStart { start, end });
    }
    Ok(())
}

/// Partial update for a task. `None` leaves the field untouched; the nested
/// `Option` on optional fields distinguishes "clear" from "keep".
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TaskPatch {
    pub title: Option<String>,
    pub description: Option<Option<String>>,
    pub status: Option<TaskStatus>,
    pub priority: Option<Priority>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub assignee: Option<Option<String>>,
    pub dependencies: Option<Vec<TaskId>>,
    pub progress: Option<u8>,
}

impl TaskPatch {
    pub fn status(status: TaskStatus) -> Self {
        Self {
            status: Some(status),
            ..Default::default()
        }
    }

    pub fn with_progress(mut self, progress: u8) -> Self {
        self.progress = Some(progress);
        self
    }

    pub fn with_dependencies(mut self, dependencies: Vec<TaskId>) -> Self {
        self.dependencies = Some(dependencies);
        self
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_dates(mut self, start: NaiveDate, end: NaiveDate) -> Self {
        self.start_date = Some(start);
        self.end_date = Some(end);
        self
    }

    pub fn sets_status(&self, status: TaskStatus) -> bool {
        self.status == Some(status)
    }
}
