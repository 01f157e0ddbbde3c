use thiserror::Error;

use crate::core::{EdgeId, TaskId};

#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("TOML serialize error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    #[error("No home directory")]
    NoHomeDir,

    #[error("Task join error: {0}")]
    TaskJoin(String),

    #[error("Task {task_id} cannot depend on itself")]
    SelfDependency { task_id: TaskId },

    #[error("Task {task_id} depending on {depends_on} would create a cycle")]
    CyclicDependency {
        task_id: TaskId,
        depends_on: TaskId,
        /// The chain that would be closed, starting and ending at `task_id`.
        path: Vec<TaskId>,
    },

    #[error("Task {task_id} already depends on {depends_on}")]
    DuplicateDependency { task_id: TaskId, depends_on: TaskId },

    #[error("Dependency not found: {edge_id}")]
    DependencyNotFound { edge_id: EdgeId },

    #[error("Task not found: {task_id}")]
    TaskNotFound { task_id: TaskId },

    #[error("Tasks {task_id} and {depends_on} belong to different projects")]
    ProjectMismatch { task_id: TaskId, depends_on: TaskId },

    #[error("Store error: {0}")]
    Store(String),
}

pub type Result<T> = std::result::Result<T, Error>;
