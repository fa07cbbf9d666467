//! Gantt layout: task bars and dependency connectors in pixel space.
//!
//! Everything here is recomputed from the current task list on every render;
//! nothing is cached. Row order is whatever order the caller passes in, so the
//! filter feeding it must be stable.

use chrono::NaiveDate;
use egui::{Color32, Pos2, Rect, Vec2};

use crate::model::{Project, ProjectId, Task, TaskId, TaskStatus, TimelineWindow};

pub const DAY_WIDTH: f32 = 40.0;
pub const ROW_HEIGHT: f32 = 60.0;
/// Bar top relative to its row.
pub const BAR_TOP: f32 = 13.0;
pub const BAR_HEIGHT: f32 = 24.0;
/// Connector endpoints sit on the bar's vertical centre.
pub const ROW_CENTER: f32 = BAR_TOP + BAR_HEIGHT / 2.0;
pub const CONNECTOR_MIN_RUN: f32 = 20.0;
pub const CONNECTOR_THICKNESS: f32 = 2.0;
pub const ARROW_SIZE: f32 = 12.0;
/// Extra space below the last row.
pub const CONTENT_PADDING: f32 = 40.0;

/// Horizontal placement of a task bar.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BarPosition {
    pub offset: f32,
    pub width: f32,
}

/// Place a task bar against a window starting at `window_start`.
///
/// Bars starting before the window are pinned to its left edge, and every bar
/// is at least one day wide.
pub fn task_position(task: &Task, window_start: NaiveDate, day_width: f32) -> BarPosition {
    let start_days = (task.start_date - window_start).num_days() as f32;
    let duration_days = task.duration_days() as f32;
    BarPosition {
        offset: (start_days * day_width).max(0.0),
        width: (duration_days * day_width).max(day_width),
    }
}

/// Top of the row at `index`.
pub fn row_y(index: usize, row_height: f32) -> f32 {
    index as f32 * row_height
}

/// Which tasks the timeline shows. Order is always the store's order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum TimelineFilter {
    #[default]
    All,
    Project(ProjectId),
}

impl TimelineFilter {
    pub fn apply<'a>(&self, projects: &'a [Project]) -> Vec<&'a Task> {
        projects
            .iter()
            .flat_map(|p| p.tasks.iter())
            .filter(|t| match self {
                Self::All => true,
                Self::Project(id) => &t.project_id == id,
            })
            .collect()
    }
}

/// An L-shaped arrow from the end of a dependency's bar to the start of the
/// dependent's bar.
#[derive(Debug, Clone, PartialEq)]
pub struct Connector {
    pub dependency: TaskId,
    pub dependent: TaskId,
    /// Right edge of the dependency bar, at its row centre.
    pub from: Pos2,
    /// Left edge of the dependent bar, at its row centre.
    pub to: Pos2,
}

impl Connector {
    /// Column where the path turns down. Sits on the dependent's start unless
    /// that is closer than [`CONNECTOR_MIN_RUN`] to the dependency's end.
    pub fn elbow_x(&self) -> f32 {
        self.from.x + (self.to.x - self.from.x).max(CONNECTOR_MIN_RUN)
    }

    /// Segment leaving the dependency bar, never shorter than
    /// [`CONNECTOR_MIN_RUN`].
    pub fn horizontal(&self) -> Rect {
        Rect::from_min_size(
            Pos2::new(self.from.x, self.from.y - CONNECTOR_THICKNESS / 2.0),
            Vec2::new(self.elbow_x() - self.from.x, CONNECTOR_THICKNESS),
        )
    }

    /// Segment joining the two rows at the elbow column.
    pub fn vertical(&self) -> Option<Rect> {
        let height = (self.to.y - self.from.y).abs();
        if height <= 0.0 {
            return None;
        }
        Some(Rect::from_min_size(
            Pos2::new(
                self.elbow_x() - CONNECTOR_THICKNESS / 2.0,
                self.from.y.min(self.to.y),
            ),
            Vec2::new(CONNECTOR_THICKNESS, height),
        ))
    }

    /// Segment on the dependent's row running back left from the elbow, when
    /// the dependent starts before the elbow.
    pub fn return_run(&self) -> Option<Rect> {
        let run = self.elbow_x() - self.to.x;
        if run <= 0.0 {
            return None;
        }
        Some(Rect::from_min_size(
            Pos2::new(self.to.x, self.to.y - CONNECTOR_THICKNESS / 2.0),
            Vec2::new(run, CONNECTOR_THICKNESS),
        ))
    }

    /// Box of the arrowhead, centred on the dependent bar's left edge.
    pub fn arrow_head(&self) -> Rect {
        Rect::from_center_size(self.to, Vec2::splat(ARROW_SIZE))
    }

    /// Corner points of the path traced by the segments, start to end.
    pub fn path(&self) -> Vec<Pos2> {
        let elbow = self.elbow_x();
        let mut points = vec![
            self.from,
            Pos2::new(elbow, self.from.y),
            Pos2::new(elbow, self.to.y),
        ];
        if elbow != self.to.x {
            points.push(self.to);
        }
        points
    }
}

/// Connector from `dependency` to `task` in the current row order.
///
/// Only drawn when the dependency's row is above the dependent's; with any
/// other ordering, or when either task is filtered out, there is no arrow.
pub fn dependency_line(
    task: &Task,
    dependency: &TaskId,
    rows: &[&Task],
    window: &TimelineWindow,
    row_height: f32,
) -> Option<Connector> {
    let task_row = rows.iter().position(|t| t.id == task.id)?;
    let dep_row = rows.iter().position(|t| &t.id == dependency)?;
    if dep_row >= task_row {
        return None;
    }

    let task_pos = task_position(task, window.start, window.day_width);
    let dep_pos = task_position(rows[dep_row], window.start, window.day_width);
    Some(Connector {
        dependency: dependency.clone(),
        dependent: task.id.clone(),
        from: Pos2::new(
            dep_pos.offset + dep_pos.width,
            row_y(dep_row, row_height) + ROW_CENTER,
        ),
        to: Pos2::new(task_pos.offset, row_y(task_row, row_height) + ROW_CENTER),
    })
}

/// A bar ready to paint.
#[derive(Debug, Clone, PartialEq)]
pub struct Bar {
    pub task: TaskId,
    pub row: usize,
    pub rect: Rect,
    pub color: Color32,
    /// Filled share of the bar, shown while the task is in progress.
    pub progress: Option<Rect>,
}

/// Complete layout of one render pass.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GanttLayout {
    pub bars: Vec<Bar>,
    pub connectors: Vec<Connector>,
    pub content_width: f32,
    pub content_height: f32,
}

impl GanttLayout {
    /// Lay out `rows` in order. Blank-titled tasks keep their row but get no
    /// bar.
    pub fn compute(rows: &[&Task], window: &TimelineWindow, row_height: f32) -> Self {
        let bars = rows
            .iter()
            .enumerate()
            .filter(|(_, task)| !task.title.trim().is_empty())
            .map(|(row, task)| layout_bar(task, row, window, row_height))
            .collect();

        let connectors = rows
            .iter()
            .flat_map(|task| {
                task.dependencies
                    .iter()
                    .filter_map(move |dep| dependency_line(task, dep, rows, window, row_height))
            })
            .collect();

        Self {
            bars,
            connectors,
            content_width: window.total_width(),
            content_height: rows.len() as f32 * row_height + CONTENT_PADDING,
        }
    }
}

fn layout_bar(task: &Task, row: usize, window: &TimelineWindow, row_height: f32) -> Bar {
    let pos = task_position(task, window.start, window.day_width);
    let rect = Rect::from_min_size(
        Pos2::new(pos.offset, row_y(row, row_height) + BAR_TOP),
        Vec2::new(pos.width, BAR_HEIGHT),
    );
    let progress = (task.status == TaskStatus::InProgress).then(|| {
        let share = f32::from(task.progress.min(100)) / 100.0;
        Rect::from_min_size(rect.min, Vec2::new(rect.width() * share, rect.height()))
    });
    Bar {
        task: task.id.clone(),
        row,
        rect,
        color: task.status_color(),
        progress,
    }
}
