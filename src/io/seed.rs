use chrono::NaiveDate;
use egui::Color32;

use crate::model::{Priority, Project, ProjectId, ProjectStatus, Task, TaskId, TaskStatus};

/// Seed dates are literals; a bad one must fail loudly rather than turn into
/// the epoch.
const fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    match NaiveDate::from_ymd_opt(y, m, d) {
        Some(date) => date,
        None => panic!("invalid seed date"),
    }
}

#[allow(clippy::too_many_arguments)]
fn task(
    id: &str,
    project: &str,
    title: &str,
    description: &str,
    status: TaskStatus,
    priority: Priority,
    (start, end): (NaiveDate, NaiveDate),
    progress: u8,
) -> Task {
    Task {
        id: TaskId::from(id),
        title: title.to_string(),
        description: Some(description.to_string()),
        status,
        priority,
        start_date: start,
        end_date: end,
        assignee: None,
        project_id: ProjectId::from(project),
        dependencies: Vec::new(),
        progress,
    }
}

/// Sample projects used when nothing has been stored yet, so a first run is
/// never empty.
pub fn sample_projects() -> Vec<Project> {
    // ── Mobile app ──────────────────────────────────────────────
    let mobile = Project {
        id: ProjectId::from("1"),
        title: "Mobile App Development".to_string(),
        description: Some("Build a new mobile application for our clients".to_string()),
        status: ProjectStatus::Active,
        start_date: date(2024, 1, 15),
        end_date: date(2024, 3, 30),
        color: Color32::from_rgb(0x63, 0x66, 0xF1),
        progress: 65,
        tasks: vec![
            task(
                "1-1",
                "1",
                "UI/UX Design",
                "Create wireframes and mockups",
                TaskStatus::Completed,
                Priority::High,
                (date(2024, 1, 15), date(2024, 2, 1)),
                100,
            ),
            task(
                "1-2",
                "1",
                "Frontend Development",
                "Implement React Native components",
                TaskStatus::InProgress,
                Priority::High,
                (date(2024, 2, 1), date(2024, 3, 15)),
                70,
            ),
            task(
                "1-3",
                "1",
                "Backend API",
                "Develop REST API endpoints",
                TaskStatus::InProgress,
                Priority::Medium,
                (date(2024, 2, 15), date(2024, 3, 20)),
                40,
            ),
            task(
                "1-4",
                "1",
                "Testing & QA",
                "Comprehensive testing and bug fixes",
                TaskStatus::Todo,
                Priority::High,
                (date(2024, 3, 15), date(2024, 3, 30)),
                0,
            ),
        ],
        team_members: Vec::new(),
    };

    // ── Website redesign ────────────────────────────────────────
    let website = Project {
        id: ProjectId::from("2"),
        title: "Website Redesign".to_string(),
        description: Some("Modernize company website with new branding".to_string()),
        status: ProjectStatus::Planning,
        start_date: date(2024, 2, 1),
        end_date: date(2024, 4, 15),
        color: Color32::from_rgb(0x10, 0xB9, 0x81),
        progress: 25,
        tasks: vec![
            task(
                "2-1",
                "2",
                "Brand Guidelines",
                "Define new visual identity",
                TaskStatus::Completed,
                Priority::High,
                (date(2024, 2, 1), date(2024, 2, 15)),
                100,
            ),
            task(
                "2-2",
                "2",
                "Content Strategy",
                "Plan website content and structure",
                TaskStatus::InProgress,
                Priority::Medium,
                (date(2024, 2, 10), date(2024, 3, 1)),
                60,
            ),
        ],
        team_members: Vec::new(),
    };

    vec![mobile, website]
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Datelike;

    #[test]
    fn seed_has_two_projects_and_six_tasks() {
        let projects = sample_projects();
        assert_eq!(projects.len(), 2);
        assert_eq!(projects.iter().map(|p| p.tasks.len()).sum::<usize>(), 6);
    }

    #[test]
    fn seed_tasks_point_back_at_their_project() {
        for project in sample_projects() {
            assert!(project.tasks.iter().all(|t| t.project_id == project.id));
            assert_eq!(project.tasks_outside_window().count(), 0);
        }
    }

    #[test]
    fn seed_dates_are_the_literal_ones() {
        let projects = sample_projects();
        assert_eq!(projects[0].start_date, NaiveDate::from_ymd_opt(2024, 1, 15).unwrap());
        assert_eq!(projects[1].end_date, NaiveDate::from_ymd_opt(2024, 4, 15).unwrap());
        assert!(projects
            .iter()
            .flat_map(|p| p.tasks.iter())
            .all(|t| t.start_date.year() == 2024 && t.end_date.year() == 2024));
    }

    #[test]
    #[should_panic(expected = "invalid seed date")]
    fn invalid_seed_date_panics() {
        let _ = date(2024, 2, 30);
    }
}
