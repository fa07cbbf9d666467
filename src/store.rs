//! The authoritative in-memory collection of projects and tasks.
//!
//! Every successful mutation runs the same pipeline: apply the change,
//! recompute dependent progress, write the whole collection to storage, then
//! notify observers. Unknown ids are a silent no-op.

use chrono::Utc;
use log::{debug, error, info, warn};
use std::collections::HashSet;

use crate::error::{StoreError, StoreResult};
use crate::io::{parse_projects, sample_projects, Storage};
use crate::model::{
    NewProject, NewTask, Project, ProjectId, ProjectPatch, ProjectSummary, Task, TaskId,
    TaskPatch, TaskStatus,
};
use crate::progress;

/// What changed in the store. Sent to observers after each mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreEvent {
    ProjectCreated(ProjectId),
    ProjectUpdated(ProjectId),
    ProjectDeleted(ProjectId),
    TaskCreated { project: ProjectId, task: TaskId },
    /// `recomputed` lists dependents whose progress was refreshed because
    /// `task` was completed.
    TaskUpdated { task: TaskId, recomputed: Vec<TaskId> },
    TaskDeleted(TaskId),
    DependenciesPruned(usize),
    Reloaded,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Observer = Box<dyn FnMut(&StoreEvent)>;

pub struct ProjectStore<S: Storage> {
    storage: S,
    projects: Vec<Project>,
    observers: Vec<(SubscriptionId, Observer)>,
    next_subscription: u64,
    last_stamp: i64,
}

impl<S: Storage> ProjectStore<S> {
    /// Open the store over `storage`. An empty storage is seeded with the
    /// sample projects; an unreadable one falls back to them.
    pub fn open(storage: S) -> Self {
        let mut store = Self {
            storage,
            projects: Vec::new(),
            observers: Vec::new(),
            next_subscription: 0,
            last_stamp: 0,
        };
        store.projects = store.load_or_seed();
        info!(
            "event=store_open module=store status=ok projects={}",
            store.projects.len()
        );
        store
    }

    fn load_or_seed(&self) -> Vec<Project> {
        match self.storage.load() {
            Ok(Some(projects)) => projects,
            Ok(None) => {
                let seed = sample_projects();
                if let Err(err) = self.storage.save(&seed) {
                    error!("event=seed_persist module=store status=error error={err}");
                }
                seed
            }
            Err(err) => {
                warn!("event=store_load module=store status=fallback error={err}");
                sample_projects()
            }
        }
    }

    /// Re-read the collection from storage, replacing the in-memory snapshot.
    pub fn reload(&mut self) {
        self.projects = self.load_or_seed();
        self.notify(&StoreEvent::Reloaded);
    }

    /// Replace the whole collection with a raw JSON payload. Payloads that
    /// are not an array of projects are rejected before anything is written.
    pub fn import_json(&mut self, raw: &str) -> StoreResult<()> {
        let projects = parse_projects(raw)?;
        self.projects = projects;
        self.commit(StoreEvent::Reloaded)
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    // --- Observers ---

    /// Register a callback run after every mutation.
    pub fn subscribe<F>(&mut self, observer: F) -> SubscriptionId
    where
        F: FnMut(&StoreEvent) + 'static,
    {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;
        self.observers.push((id, Box::new(observer)));
        id
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.observers.len();
        self.observers.retain(|(sid, _)| *sid != id);
        self.observers.len() != before
    }

    fn notify(&mut self, event: &StoreEvent) {
        for (_, observer) in self.observers.iter_mut() {
            observer(event);
        }
    }

    /// Persist the whole collection, then notify. Observers are told even if
    /// the write fails, since the in-memory state has already changed.
    fn commit(&mut self, event: StoreEvent) -> StoreResult<()> {
        let saved = self.storage.save(&self.projects);
        if let Err(err) = &saved {
            error!("event=store_persist module=store status=error error={err}");
        }
        self.notify(&event);
        saved.map_err(StoreError::from)
    }

    // --- Reads ---

    pub fn projects(&self) -> &[Project] {
        &self.projects
    }

    pub fn get_project(&self, id: &ProjectId) -> Option<&Project> {
        self.projects.iter().find(|p| &p.id == id)
    }

    /// Every task, project by project, in stored order.
    pub fn all_tasks(&self) -> Vec<&Task> {
        self.tasks().collect()
    }

    pub fn tasks(&self) -> impl Iterator<Item = &Task> {
        self.projects.iter().flat_map(|p| p.tasks.iter())
    }

    pub fn get_task(&self, id: &TaskId) -> Option<&Task> {
        self.tasks().find(|t| &t.id == id)
    }

    pub fn tasks_for_project(&self, id: &ProjectId) -> &[Task] {
        self.get_project(id).map(|p| p.tasks.as_slice()).unwrap_or(&[])
    }

    pub fn summary(&self) -> ProjectSummary {
        ProjectSummary::of(&self.projects)
    }

    // --- Project operations ---

    pub fn create_project(&mut self, data: NewProject) -> StoreResult<ProjectId> {
        let id = self.next_project_id();
        self.projects.push(Project::from_new(id.clone(), data));
        info!("event=project_create module=store status=ok id={id}");
        self.commit(StoreEvent::ProjectCreated(id.clone()))?;
        Ok(id)
    }

    /// Returns `false` if no project has `id`.
    pub fn update_project(&mut self, id: &ProjectId, patch: ProjectPatch) -> StoreResult<bool> {
        let Some(project) = self.projects.iter_mut().find(|p| &p.id == id) else {
            debug!("event=project_update module=store status=not_found id={id}");
            return Ok(false);
        };
        project.apply(&patch);
        self.commit(StoreEvent::ProjectUpdated(id.clone()))?;
        Ok(true)
    }

    /// Remove a project together with its tasks.
    pub fn delete_project(&mut self, id: &ProjectId) -> StoreResult<bool> {
        let before = self.projects.len();
        self.projects.retain(|p| &p.id != id);
        if self.projects.len() == before {
            return Ok(false);
        }
        info!("event=project_delete module=store status=ok id={id}");
        self.commit(StoreEvent::ProjectDeleted(id.clone()))?;
        Ok(true)
    }

    // --- Task operations ---

    /// Add a task to a project. Returns `None` if the project does not exist.
    ///
    /// The fresh id is not named by any existing dependency list, so a new
    /// task can never close a cycle.
    pub fn create_task(
        &mut self,
        project_id: &ProjectId,
        data: NewTask,
    ) -> StoreResult<Option<TaskId>> {
        if self.get_project(project_id).is_none() {
            debug!("event=task_create module=store status=not_found project={project_id}");
            return Ok(None);
        }

        let id = self.next_task_id(project_id);

        let mut task = Task::from_new(id.clone(), project_id.clone(), data);
        task.progress = progress::progress_for_status(&task, self.tasks());

        let Some(project) = self.projects.iter_mut().find(|p| &p.id == project_id) else {
            return Ok(None);
        };
        project.tasks.push(task);
        info!("event=task_create module=store status=ok id={id} project={project_id}");
        self.commit(StoreEvent::TaskCreated {
            project: project_id.clone(),
            task: id.clone(),
        })?;
        Ok(Some(id))
    }

    /// Merge `patch` into the task, recompute its progress, and when the patch
    /// completes it, refresh the in-progress tasks that directly depend on it.
    ///
    /// Returns `false` if no task has `id`.
    pub fn update_task(&mut self, id: &TaskId, patch: TaskPatch) -> StoreResult<bool> {
        let Some(mut updated) = self.get_task(id).cloned() else {
            debug!("event=task_update module=store status=not_found id={id}");
            return Ok(false);
        };
        if let Some(dependencies) = &patch.dependencies {
            self.check_cycle(id, dependencies)?;
        }

        updated.apply(&patch);
        updated.progress = progress::progress_for_status(&updated, self.tasks());
        if let Some(slot) = self.task_mut(id) {
            *slot = updated;
        }

        let recomputed = if patch.sets_status(TaskStatus::Completed) {
            self.refresh_dependents(id)
        } else {
            Vec::new()
        };

        debug!(
            "event=task_update module=store status=ok id={id} recomputed={}",
            recomputed.len()
        );
        self.commit(StoreEvent::TaskUpdated {
            task: id.clone(),
            recomputed,
        })?;
        Ok(true)
    }

    /// Remove a task. References to it in other tasks' dependencies are kept;
    /// see [`ProjectStore::prune_dangling_dependencies`].
    pub fn delete_task(&mut self, id: &TaskId) -> StoreResult<bool> {
        let mut removed = false;
        for project in self.projects.iter_mut() {
            let before = project.tasks.len();
            project.tasks.retain(|t| &t.id != id);
            removed |= project.tasks.len() != before;
        }
        if !removed {
            return Ok(false);
        }
        info!("event=task_delete module=store status=ok id={id}");
        self.commit(StoreEvent::TaskDeleted(id.clone()))?;
        Ok(true)
    }

    /// Drop dependency ids that no longer resolve to a task. Returns how many
    /// references were removed.
    pub fn prune_dangling_dependencies(&mut self) -> StoreResult<usize> {
        let known: HashSet<TaskId> = self.tasks().map(|t| t.id.clone()).collect();
        let mut pruned = 0;
        for task in self.projects.iter_mut().flat_map(|p| p.tasks.iter_mut()) {
            let before = task.dependencies.len();
            task.dependencies.retain(|d| known.contains(d));
            pruned += before - task.dependencies.len();
        }
        if pruned == 0 {
            return Ok(0);
        }
        info!("event=dependencies_prune module=store status=ok removed={pruned}");
        self.commit(StoreEvent::DependenciesPruned(pruned))?;
        Ok(pruned)
    }

    // --- Internals ---

    fn task_mut(&mut self, id: &TaskId) -> Option<&mut Task> {
        self.projects
            .iter_mut()
            .flat_map(|p| p.tasks.iter_mut())
            .find(|t| &t.id == id)
    }

    /// One hop only: dependents of dependents are left alone.
    fn refresh_dependents(&mut self, completed: &TaskId) -> Vec<TaskId> {
        let updates: Vec<(TaskId, u8)> = progress::direct_dependents(completed, self.tasks())
            .into_iter()
            .filter_map(|dep_id| {
                let task = self.get_task(&dep_id)?;
                Some((dep_id, progress::compute_progress(task, self.tasks())))
            })
            .collect();

        updates
            .into_iter()
            .filter_map(|(dep_id, value)| {
                let task = self.task_mut(&dep_id)?;
                task.progress = value;
                Some(dep_id)
            })
            .collect()
    }

    fn check_cycle(&self, id: &TaskId, dependencies: &[TaskId]) -> StoreResult<()> {
        match progress::find_cycle(id, dependencies, self.tasks()) {
            Some(dependency) => {
                warn!("event=dependency_cycle module=store status=rejected task={id} dependency={dependency}");
                Err(StoreError::DependencyCycle {
                    task: id.clone(),
                    dependency,
                })
            }
            None => Ok(()),
        }
    }

    /// Millisecond timestamp, strictly increasing within this store.
    fn next_stamp(&mut self) -> i64 {
        let stamp = Utc::now().timestamp_millis().max(self.last_stamp + 1);
        self.last_stamp = stamp;
        stamp
    }

    fn next_project_id(&mut self) -> ProjectId {
        loop {
            let id = ProjectId::new(self.next_stamp().to_string());
            if self.get_project(&id).is_none() {
                return id;
            }
        }
    }

    /// `"{project}-{stamp}"`, skipping ids still used by a task or named by a
    /// dangling dependency.
    fn next_task_id(&mut self, project_id: &ProjectId) -> TaskId {
        let taken: HashSet<TaskId> = self
            .tasks()
            .flat_map(|t| std::iter::once(&t.id).chain(t.dependencies.iter()))
            .cloned()
            .collect();
        loop {
            let id = TaskId::new(format!("{}-{}", project_id, self.next_stamp()));
            if !taken.contains(&id) {
                return id;
            }
        }
    }
}
