use chrono::NaiveDate;
use gantt_tracker::{
    MemoryStorage, NewProject, NewTask, Priority, ProjectId, ProjectPatch, ProjectStatus,
    ProjectStore, StoreEvent, TaskId, TaskPatch, TaskStatus,
};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn empty_store() -> ProjectStore<MemoryStorage> {
    ProjectStore::open(MemoryStorage::with_blob("[]"))
}

#[test]
fn fresh_storage_is_seeded_and_persisted() {
    let store = ProjectStore::open(MemoryStorage::new());
    assert_eq!(store.projects().len(), 2);
    assert_eq!(store.all_tasks().len(), 6);
    assert!(store.storage().blob().is_some());

    let summary = store.summary();
    assert_eq!(summary.total, 2);
    assert_eq!(summary.active, 1);
    assert_eq!(summary.completed, 0);
    assert_eq!(summary.tasks, 6);
}

#[test]
fn create_project_starts_with_no_tasks() {
    let mut store = empty_store();
    let id = store
        .create_project(
            NewProject::new("Launch", date(2024, 5, 1), date(2024, 7, 1))
                .with_status(ProjectStatus::Active)
                .with_description("Go live"),
        )
        .unwrap();

    let project = store.get_project(&id).unwrap();
    assert_eq!(project.title, "Launch");
    assert_eq!(project.description.as_deref(), Some("Go live"));
    assert!(project.tasks.is_empty());
    assert_eq!(store.projects().len(), 1);
}

#[test]
fn update_project_merges_fields() {
    let mut store = empty_store();
    let id = store
        .create_project(NewProject::new("Launch", date(2024, 5, 1), date(2024, 7, 1)))
        .unwrap();

    let patch = ProjectPatch {
        status: Some(ProjectStatus::Completed),
        progress: Some(100),
        description: Some(Some("done".into())),
        ..Default::default()
    };
    assert!(store.update_project(&id, patch).unwrap());

    let project = store.get_project(&id).unwrap();
    assert_eq!(project.status, ProjectStatus::Completed);
    assert_eq!(project.progress, 100);
    assert_eq!(project.title, "Launch");
    assert_eq!(project.description.as_deref(), Some("done"));
}

#[test]
fn tasks_belong_to_their_project_in_insertion_order() {
    let mut store = empty_store();
    let p1 = store
        .create_project(NewProject::new("One", date(2024, 1, 1), date(2024, 3, 1)))
        .unwrap();
    let p2 = store
        .create_project(NewProject::new("Two", date(2024, 1, 1), date(2024, 3, 1)))
        .unwrap();

    let a = store
        .create_task(&p2, NewTask::new("a", date(2024, 1, 2), date(2024, 1, 4)))
        .unwrap()
        .unwrap();
    let b = store
        .create_task(
            &p1,
            NewTask::new("b", date(2024, 1, 2), date(2024, 1, 4)).with_priority(Priority::High),
        )
        .unwrap()
        .unwrap();
    let c = store
        .create_task(&p1, NewTask::new("c", date(2024, 1, 5), date(2024, 1, 9)))
        .unwrap()
        .unwrap();

    let order: Vec<&TaskId> = store.tasks().map(|t| &t.id).collect();
    assert_eq!(order, vec![&b, &c, &a]);
    assert_eq!(store.get_task(&a).unwrap().project_id, p2);
    assert_eq!(store.get_task(&b).unwrap().priority, Priority::High);
    assert_eq!(store.tasks_for_project(&p1).len(), 2);
    assert!(store.tasks_for_project(&ProjectId::from("missing")).is_empty());
}

#[test]
fn delete_project_removes_its_tasks() {
    let mut store = empty_store();
    let p = store
        .create_project(NewProject::new("One", date(2024, 1, 1), date(2024, 3, 1)))
        .unwrap();
    let t = store
        .create_task(&p, NewTask::new("t", date(2024, 1, 2), date(2024, 1, 4)))
        .unwrap()
        .unwrap();

    assert!(store.delete_project(&p).unwrap());
    assert!(store.get_project(&p).is_none());
    assert!(store.get_task(&t).is_none());
    assert!(store.all_tasks().is_empty());
}

#[test]
fn update_task_merges_partial_fields() {
    let mut store = empty_store();
    let p = store
        .create_project(NewProject::new("One", date(2024, 1, 1), date(2024, 3, 1)))
        .unwrap();
    let t = store
        .create_task(
            &p,
            NewTask::new("draft", date(2024, 1, 2), date(2024, 1, 4)).with_description("notes"),
        )
        .unwrap()
        .unwrap();

    store
        .update_task(
            &t,
            TaskPatch::default()
                .with_title("final")
                .with_dates(date(2024, 1, 3), date(2024, 1, 8)),
        )
        .unwrap();

    let task = store.get_task(&t).unwrap();
    assert_eq!(task.title, "final");
    assert_eq!(task.description.as_deref(), Some("notes"));
    assert_eq!(task.start_date, date(2024, 1, 3));
    assert_eq!(task.end_date, date(2024, 1, 8));
    assert_eq!(task.status, TaskStatus::Todo);
}

#[test]
fn created_completed_task_is_at_full_progress() {
    let mut store = empty_store();
    let p = store
        .create_project(NewProject::new("One", date(2024, 1, 1), date(2024, 3, 1)))
        .unwrap();
    let t = store
        .create_task(
            &p,
            NewTask::new("done", date(2024, 1, 2), date(2024, 1, 4))
                .with_status(TaskStatus::Completed),
        )
        .unwrap()
        .unwrap();
    assert_eq!(store.get_task(&t).unwrap().progress, 100);
}

#[test]
fn task_created_event_names_project_and_task() {
    let mut store = empty_store();
    let p = store
        .create_project(NewProject::new("One", date(2024, 1, 1), date(2024, 3, 1)))
        .unwrap();

    let seen = std::rc::Rc::new(std::cell::RefCell::new(None));
    let sink = std::rc::Rc::clone(&seen);
    store.subscribe(move |e| *sink.borrow_mut() = Some(e.clone()));

    let t = store
        .create_task(&p, NewTask::new("t", date(2024, 1, 2), date(2024, 1, 4)))
        .unwrap()
        .unwrap();
    assert_eq!(
        *seen.borrow(),
        Some(StoreEvent::TaskCreated { project: p, task: t })
    );
}
