use chrono::NaiveDate;
use egui::Color32;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::color;
use super::task::Task;
use crate::error::ValidationError;

/// Identifier of a project.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProjectId(String);

impl ProjectId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ProjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ProjectId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for ProjectId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ProjectStatus {
    #[default]
    Planning,
    Active,
    Completed,
    OnHold,
}

impl ProjectStatus {
    pub const ALL: [ProjectStatus; 4] = [
        Self::Planning,
        Self::Active,
        Self::Completed,
        Self::OnHold,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Self::Planning => "Planning",
            Self::Active => "Active",
            Self::Completed => "Completed",
            Self::OnHold => "On Hold",
        }
    }

    /// Badge color for the status.
    pub fn color(&self) -> Color32 {
        match self {
            Self::Active => color::SUCCESS,
            Self::Completed => color::ACCENT,
            Self::Planning => color::WARNING,
            Self::OnHold => color::DANGER,
        }
    }
}

/// A tracked project owning an ordered list of tasks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: ProjectId,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub status: ProjectStatus,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    /// Display only.
    #[serde(with = "color::hex_color")]
    pub color: Color32,
    /// Set by the editor, never derived from tasks.
    #[serde(default)]
    pub progress: u8,
    #[serde(default)]
    pub tasks: Vec<Task>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub team_members: Vec<String>,
}

impl Project {
    pub fn from_new(id: ProjectId, data: NewProject) -> Self {
        Self {
            id,
            title: data.title,
            description: data.description,
            status: data.status,
            start_date: data.start_date,
            end_date: data.end_date,
            color: data.color,
            progress: data.progress.min(100),
            tasks: Vec::new(),
            team_members: data.team_members,
        }
    }

    /// Merge a partial update. Tasks are never touched through a patch.
    pub fn apply(&mut self, patch: &ProjectPatch) {
        if let Some(title) = &patch.title {
            self.title = title.clone();
        }
        if let Some(description) = &patch.description {
            self.description = description.clone();
        }
        if let Some(status) = patch.status {
            self.status = status;
        }
        if let Some(start) = patch.start_date {
            self.start_date = start;
        }
        if let Some(end) = patch.end_date {
            self.end_date = end;
        }
        if let Some(color) = patch.color {
            self.color = color;
        }
        if let Some(progress) = patch.progress {
            self.progress = progress.min(100);
        }
        if let Some(members) = &patch.team_members {
            self.team_members = members.clone();
        }
    }

    pub fn contains_date(&self, date: NaiveDate) -> bool {
        date >= self.start_date && date <= self.end_date
    }

    /// Tasks whose dates fall outside the project window.
    pub fn tasks_outside_window(&self) -> impl Iterator<Item = &Task> {
        self.tasks
            .iter()
            .filter(|t| !self.contains_date(t.start_date) || !self.contains_date(t.end_date))
    }
}

/// Payload for creating a project.
#[derive(Debug, Clone, PartialEq)]
pub struct NewProject {
    pub title: String,
    pub description: Option<String>,
    pub status: ProjectStatus,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub color: Color32,
    pub progress: u8,
    pub team_members: Vec<String>,
}

impl NewProject {
    pub fn new(title: impl Into<String>, start_date: NaiveDate, end_date: NaiveDate) -> Self {
        Self {
            title: title.into(),
            description: None,
            status: ProjectStatus::Planning,
            start_date,
            end_date,
            color: color::project_color(0),
            progress: 0,
            team_members: Vec::new(),
        }
    }

    pub fn with_status(mut self, status: ProjectStatus) -> Self {
        self.status = status;
        self
    }

    pub fn with_color(mut self, color: Color32) -> Self {
        self.color = color;
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.title.trim().is_empty() {
            return Err(ValidationError::BlankTitle);
        }
        if self.end_date <= self.start_date {
            return Err(ValidationError::EndNotAfterStart {
                start: self.start_date,
                end: self.end_date,
            });
        }
        Ok(())
    }
}

/// Partial update for a project.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProjectPatch {
    pub title: Option<String>,
    pub description: Option<Option<String>>,
    pub status: Option<ProjectStatus>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub color: Option<Color32>,
    pub progress: Option<u8>,
    pub team_members: Option<Vec<String>>,
}

/// Counts shown on the home screen.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProjectSummary {
    pub total: usize,
    pub active: usize,
    pub completed: usize,
    pub tasks: usize,
}

impl ProjectSummary {
    pub fn of(projects: &[Project]) -> Self {
        projects.iter().fold(Self::default(), |mut acc, p| {
            acc.total += 1;
            acc.active += usize::from(p.status == ProjectStatus::Active);
            acc.completed += usize::from(p.status == ProjectStatus::Completed);
            acc.tasks += p.tasks.len();
            acc
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn validate_rejects_blank_title_and_inverted_dates() {
        let ok = NewProject::new("Site", date(2024, 2, 1), date(2024, 4, 15));
        assert!(ok.validate().is_ok());

        let blank = NewProject::new("   ", date(2024, 2, 1), date(2024, 4, 15));
        assert_eq!(blank.validate(), Err(ValidationError::BlankTitle));

        let same_day = NewProject::new("Site", date(2024, 2, 1), date(2024, 2, 1));
        assert!(matches!(
            same_day.validate(),
            Err(ValidationError::EndNotAfterStart { .. })
        ));
    }

    #[test]
    fn patch_merges_only_given_fields() {
        let mut project = Project::from_new(
            ProjectId::from("1"),
            NewProject::new("App", date(2024, 1, 15), date(2024, 3, 30)),
        );
        project.apply(&ProjectPatch {
            status: Some(ProjectStatus::OnHold),
            progress: Some(140),
            ..Default::default()
        });
        assert_eq!(project.status, ProjectStatus::OnHold);
        assert_eq!(project.progress, 100);
        assert_eq!(project.title, "App");
    }

    #[test]
    fn color_round_trips_as_hex() {
        let project = Project::from_new(
            ProjectId::from("2"),
            NewProject::new("Site", date(2024, 2, 1), date(2024, 4, 15))
                .with_color(color::SUCCESS)
                .with_status(ProjectStatus::OnHold),
        );
        let json = serde_json::to_value(&project).unwrap();
        assert_eq!(json["color"], "#10B981");
        assert_eq!(json["status"], "on-hold");
        let back: Project = serde_json::from_value(json).unwrap();
        assert_eq!(back, project);
    }
}
