//! Data-access contract consumed by the engine.
//!
//! The engine never talks to a database directly. Everything it needs goes
//! through [`DependencyStore`], which a backend implements against its own
//! query interface. Store failures are propagated unmodified; the engine
//! performs no retries.
//!
//! The store must enforce uniqueness of `(task_id, depends_on)` on
//! `create_edge`: the engine checks for duplicates and cycles before
//! writing, but two concurrent callers can both pass those checks.

pub mod memory;

pub use memory::{MemoryStore, Snapshot};

use std::collections::BTreeSet;
use std::future::Future;

use crate::core::{DependencyEdge, EdgeId, Person, PersonId, ProjectId, Task, TaskId, TaskStatus};
use crate::error::Result;

pub trait DependencyStore: Send + Sync {
    /// Direct outgoing edges: what `task_id` depends on.
    fn get_dependency_edges(
        &self,
        task_id: TaskId,
    ) -> impl Future<Output = Result<Vec<DependencyEdge>>> + Send;

    /// Direct incoming edges: tasks that depend on `task_id`.
    fn get_dependent_edges(
        &self,
        task_id: TaskId,
    ) -> impl Future<Output = Result<Vec<DependencyEdge>>> + Send;

    /// All edges between tasks of a project.
    fn get_project_edges(
        &self,
        project_id: ProjectId,
    ) -> impl Future<Output = Result<Vec<DependencyEdge>>> + Send;

    /// Look up the edge for an exact pair, if any.
    fn find_edge(
        &self,
        task_id: TaskId,
        depends_on: TaskId,
    ) -> impl Future<Output = Result<Option<DependencyEdge>>> + Send;

    /// Persist a new edge.
    ///
    /// Fails with `DuplicateDependency` if the pair already exists.
    fn create_edge(
        &self,
        task_id: TaskId,
        depends_on: TaskId,
    ) -> impl Future<Output = Result<DependencyEdge>> + Send;

    /// Fails with `DependencyNotFound` if the edge does not exist.
    fn get_edge(&self, edge_id: EdgeId) -> impl Future<Output = Result<DependencyEdge>> + Send;

    /// Delete an edge. Fails with `DependencyNotFound` if it does not exist.
    fn delete_edge(&self, edge_id: EdgeId) -> impl Future<Output = Result<()>> + Send;

    /// Remove every edge touching `task_id`, returning how many were removed.
    fn delete_task_edges(&self, task_id: TaskId) -> impl Future<Output = Result<usize>> + Send;

    /// Fails with `TaskNotFound` if the task does not exist.
    fn get_task(&self, task_id: TaskId) -> impl Future<Output = Result<Task>> + Send;

    /// Fetch tasks in the order requested. Unknown ids are skipped.
    fn get_tasks_by_ids(
        &self,
        ids: Vec<TaskId>,
    ) -> impl Future<Output = Result<Vec<Task>>> + Send;

    fn get_project_tasks(
        &self,
        project_id: ProjectId,
    ) -> impl Future<Output = Result<Vec<Task>>> + Send;

    fn get_project_members(
        &self,
        project_id: ProjectId,
    ) -> impl Future<Output = Result<Vec<Person>>> + Send;

    /// Every task assigned to `person_id`, across all projects.
    fn get_person_tasks(
        &self,
        person_id: PersonId,
    ) -> impl Future<Output = Result<Vec<Task>>> + Send;

    /// Persist a status change and return the updated task.
    fn update_task_status(
        &self,
        task_id: TaskId,
        status: TaskStatus,
    ) -> impl Future<Output = Result<Task>> + Send;

    /// Replace a task's assignee set and return the updated task.
    fn set_assignees(
        &self,
        task_id: TaskId,
        assignees: BTreeSet<PersonId>,
    ) -> impl Future<Output = Result<Task>> + Send;
}
