//! Dependency-driven progress for tasks.
//!
//! An in-progress task with dependencies takes its progress from the share of
//! its resolvable dependencies that are completed. Every other task keeps the
//! value its status implies, or the one set by hand.

use std::collections::{HashMap, HashSet};

use crate::model::{Task, TaskId, TaskStatus};

/// Progress derived from dependencies, or the task's stored value when the
/// derivation does not apply.
///
/// Dependency ids that match no task are left out of the ratio. When none
/// resolve, the stored value is returned. Ties round half up.
pub fn compute_progress<'a, I>(task: &Task, all_tasks: I) -> u8
where
    I: IntoIterator<Item = &'a Task>,
{
    if task.status != TaskStatus::InProgress || !task.has_dependencies() {
        return task.progress;
    }

    let (resolved, completed) = all_tasks
        .into_iter()
        .filter(|t| task.depends_on(&t.id))
        .fold((0u32, 0u32), |(resolved, completed), dep| {
            (
                resolved + 1,
                completed + u32::from(dep.status == TaskStatus::Completed),
            )
        });

    if resolved == 0 {
        return task.progress;
    }
    ratio_percent(completed, resolved)
}

/// `round(100 * part / whole)` with halves rounded up, in integers.
fn ratio_percent(part: u32, whole: u32) -> u8 {
    let pct = (200 * part + whole) / (2 * whole);
    pct.min(100) as u8
}

/// Progress a task should carry after a mutation, following the status policy:
/// completed is 100, todo is 0, in-progress is derived when it has dependencies
/// and otherwise keeps the manual value.
pub fn progress_for_status<'a, I>(task: &Task, all_tasks: I) -> u8
where
    I: IntoIterator<Item = &'a Task>,
{
    match task.status {
        TaskStatus::Completed => 100,
        TaskStatus::Todo => 0,
        TaskStatus::InProgress => compute_progress(task, all_tasks).min(100),
    }
}

/// In-progress tasks that list `completed` as a direct dependency.
pub fn direct_dependents<'a, I>(completed: &TaskId, all_tasks: I) -> Vec<TaskId>
where
    I: IntoIterator<Item = &'a Task>,
{
    all_tasks
        .into_iter()
        .filter(|t| t.status == TaskStatus::InProgress && t.depends_on(completed))
        .map(|t| t.id.clone())
        .collect()
}

/// First dependency in `proposed` that would let `task_id` reach itself through
/// the dependency graph, or `None` if the edges are acyclic.
///
/// `proposed` replaces whatever `task_id` currently depends on. Unresolvable
/// ids end the walk.
pub fn find_cycle<'a, I>(task_id: &TaskId, proposed: &[TaskId], all_tasks: I) -> Option<TaskId>
where
    I: IntoIterator<Item = &'a Task>,
{
    let graph: HashMap<&TaskId, &[TaskId]> = all_tasks
        .into_iter()
        .filter(|t| &t.id != task_id)
        .map(|t| (&t.id, t.dependencies.as_slice()))
        .collect();

    proposed
        .iter()
        .find(|dep| reaches(dep, task_id, &graph))
        .cloned()
}

fn reaches(from: &TaskId, target: &TaskId, graph: &HashMap<&TaskId, &[TaskId]>) -> bool {
    let mut visited: HashSet<&TaskId> = HashSet::new();
    let mut stack = vec![from];

    while let Some(current) = stack.pop() {
        if current == target {
            return true;
        }
        if visited.insert(current) {
            if let Some(next) = graph.get(current) {
                stack.extend(next.iter());
            }
        }
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{NewTask, ProjectId};
    use chrono::NaiveDate;

    fn task(id: &str, status: TaskStatus, deps: &[&str], progress: u8) -> Task {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let end = NaiveDate::from_ymd_opt(2024, 1, 10).unwrap();
        Task::from_new(
            TaskId::from(id),
            ProjectId::from("p"),
            NewTask::new(id, start, end)
                .with_status(status)
                .with_dependencies(deps.iter().map(|d| TaskId::from(*d)).collect())
                .with_progress(progress),
        )
    }

    #[test]
    fn all_dependencies_completed_gives_full_progress() {
        let a = task("a", TaskStatus::Completed, &[], 100);
        let b = task("b", TaskStatus::Completed, &[], 100);
        let c = task("c", TaskStatus::InProgress, &["a", "b"], 10);
        let all = [a, b, c.clone()];
        assert_eq!(compute_progress(&c, &all), 100);
    }

    #[test]
    fn two_of_three_rounds_to_67() {
        let a = task("a", TaskStatus::Completed, &[], 100);
        let b = task("b", TaskStatus::Completed, &[], 100);
        let c = task("c", TaskStatus::InProgress, &["a", "b"], 100);
        let d = task("d", TaskStatus::InProgress, &["a", "b", "c"], 0);
        let all = [a, b, c, d.clone()];
        assert_eq!(compute_progress(&d, &all), 67);
    }

    #[test]
    fn halves_round_up() {
        assert_eq!(ratio_percent(1, 2), 50);
        assert_eq!(ratio_percent(1, 8), 13);
        assert_eq!(ratio_percent(1, 3), 33);
        assert_eq!(ratio_percent(0, 4), 0);
    }

    #[test]
    fn unresolved_dependencies_fall_back_to_stored_value() {
        let e = task("e", TaskStatus::InProgress, &["nonexistent-id"], 35);
        let all = [e.clone()];
        assert_eq!(compute_progress(&e, &all), 35);
    }

    #[test]
    fn dangling_ids_leave_the_denominator() {
        let a = task("a", TaskStatus::Completed, &[], 100);
        let f = task("f", TaskStatus::InProgress, &["a", "gone"], 0);
        let all = [a, f.clone()];
        assert_eq!(compute_progress(&f, &all), 100);
    }

    #[test]
    fn manual_mode_without_dependencies_or_outside_in_progress() {
        let manual = task("m", TaskStatus::InProgress, &[], 42);
        assert_eq!(compute_progress(&manual, [&manual]), 42);

        let a = task("a", TaskStatus::Completed, &[], 100);
        let todo = task("t", TaskStatus::Todo, &["a"], 0);
        assert_eq!(compute_progress(&todo, [&a, &todo]), 0);
    }

    #[test]
    fn status_policy_overrides_stored_value() {
        let a = task("a", TaskStatus::Todo, &[], 0);
        let done = task("d", TaskStatus::Completed, &["a"], 12);
        let todo = task("t", TaskStatus::Todo, &[], 80);
        assert_eq!(progress_for_status(&done, [&a, &done]), 100);
        assert_eq!(progress_for_status(&todo, [&todo]), 0);
    }

    #[test]
    fn direct_dependents_only_in_progress() {
        let a = task("a", TaskStatus::Completed, &[], 100);
        let b = task("b", TaskStatus::InProgress, &["a"], 0);
        let c = task("c", TaskStatus::Todo, &["a"], 0);
        let d = task("d", TaskStatus::InProgress, &["b"], 0);
        let all = [a, b, c, d];
        assert_eq!(direct_dependents(&TaskId::from("a"), &all), vec![TaskId::from("b")]);
    }

    #[test]
    fn detects_direct_and_transitive_cycles() {
        let a = task("a", TaskStatus::Todo, &["b"], 0);
        let b = task("b", TaskStatus::Todo, &["c"], 0);
        let c = task("c", TaskStatus::Todo, &[], 0);
        let all = [a, b, c];

        let id = TaskId::from("c");
        assert_eq!(
            find_cycle(&id, &[TaskId::from("a")], &all),
            Some(TaskId::from("a"))
        );
        assert_eq!(find_cycle(&id, &[TaskId::from("c")], &all), Some(TaskId::from("c")));
        assert_eq!(find_cycle(&id, &[TaskId::from("missing")], &all), None);
        assert_eq!(find_cycle(&TaskId::from("a"), &[TaskId::from("c")], &all), None);
    }
}
