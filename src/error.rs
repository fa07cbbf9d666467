use chrono::NaiveDate;
use std::path::PathBuf;
use thiserror::Error;

use crate::model::TaskId;

/// Failures of the durable storage boundary.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("failed to read `{path}`: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to write `{path}`: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed project data: {0}")]
    Malformed(#[from] serde_json::Error),
    #[error("invalid projects payload: {0}")]
    InvalidPayload(String),
}

/// Failed-operation results handed back to the caller of a store mutation.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("dependency on `{dependency}` would make `{task}` depend on itself")]
    DependencyCycle { task: TaskId, dependency: TaskId },
    #[error(transparent)]
    Storage(#[from] StorageError),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Form-level checks the editor runs before submitting a payload.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("title must not be blank")]
    BlankTitle,
    #[error("end date {end} must be after start date {start}")]
    EndNotAfterStart { start: NaiveDate, end: NaiveDate },
    #[error("task start date {start} must be on or after the project start date {project_start}")]
    StartBeforeProject {
        start: NaiveDate,
        project_start: NaiveDate,
    },
    #[error("task end date {end} must be on or before the project end date {project_end}")]
    EndAfterProject {
        end: NaiveDate,
        project_end: NaiveDate,
    },
}
