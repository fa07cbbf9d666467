pub mod color;
pub mod project;
pub mod task;
pub mod timeline;

pub use project::{NewProject, Project, ProjectId, ProjectPatch, ProjectStatus, ProjectSummary};
pub use task::{NewTask, Priority, Task, TaskId, TaskPatch, TaskStatus};
pub use timeline::{dates_in_window, Period, TimelineWindow};
