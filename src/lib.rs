//! Core of a personal project tracker with a Gantt timeline.
//!
//! [`ProjectStore`] owns the projects and tasks and keeps dependency-driven
//! progress current; [`layout`] turns a task list into bar and connector
//! geometry for a timeline view.

pub mod error;
pub mod io;
pub mod layout;
pub mod logging;
pub mod model;
pub mod progress;
pub mod settings;
pub mod store;

pub use error::{StorageError, StoreError, StoreResult, ValidationError};
pub use io::{JsonFileStorage, MemoryStorage, Storage};
pub use layout::{task_position, BarPosition, Connector, GanttLayout, TimelineFilter};
pub use model::{
    dates_in_window, NewProject, NewTask, Period, Priority, Project, ProjectId, ProjectPatch,
    ProjectStatus, ProjectSummary, Task, TaskId, TaskPatch, TaskStatus, TimelineWindow,
};
pub use progress::compute_progress;
pub use settings::{AppPaths, Settings};
pub use store::{ProjectStore, StoreEvent, SubscriptionId};
