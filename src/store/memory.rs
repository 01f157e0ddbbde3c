//! In-process [`DependencyStore`] backed by a JSON snapshot.
//!
//! Used by the CLI and by tests. Tables live behind a tokio `RwLock`, and
//! `create_edge` enforces the `(task_id, depends_on)` uniqueness constraint
//! the same way a relational backend would.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fs;
use std::path::Path;
use tokio::sync::RwLock;
use tracing::debug;

use super::DependencyStore;
use crate::core::{
    DependencyEdge, EdgeId, Person, PersonId, Project, ProjectId, Task, TaskId, TaskStatus,
};
use crate::error::{Error, Result};
use crate::util::blocking;

pub const SNAPSHOT_VERSION: u32 = 1;

/// Serializable contents of a [`MemoryStore`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Snapshot {
    #[serde(default = "default_version")]
    pub version: u32,
    #[serde(default)]
    pub projects: Vec<Project>,
    #[serde(default)]
    pub people: Vec<Person>,
    #[serde(default)]
    pub tasks: Vec<Task>,
    #[serde(default)]
    pub edges: Vec<DependencyEdge>,
}

fn default_version() -> u32 {
    SNAPSHOT_VERSION
}

impl Default for Snapshot {
    fn default() -> Self {
        Self {
            version: SNAPSHOT_VERSION,
            projects: Vec::new(),
            people: Vec::new(),
            tasks: Vec::new(),
            edges: Vec::new(),
        }
    }
}

impl Snapshot {
    fn task(&self, id: &TaskId) -> Result<&Task> {
        self.tasks
            .iter()
            .find(|t| t.id == *id)
            .ok_or(Error::TaskNotFound { task_id: *id })
    }

    fn task_mut(&mut self, id: &TaskId) -> Result<&mut Task> {
        self.tasks
            .iter_mut()
            .find(|t| t.id == *id)
            .ok_or(Error::TaskNotFound { task_id: *id })
    }

    fn project_task_ids(&self, project_id: &ProjectId) -> BTreeSet<TaskId> {
        self.tasks
            .iter()
            .filter(|t| t.project_id == *project_id)
            .map(|t| t.id)
            .collect()
    }

    fn remove_edges_touching(&mut self, task_id: &TaskId) -> usize {
        let before = self.edges.len();
        self.edges.retain(|e| !e.touches(task_id));
        before - self.edges.len()
    }
}

/// In-memory store.
#[derive(Debug, Default)]
pub struct MemoryStore {
    inner: RwLock<Snapshot>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_snapshot(snapshot: Snapshot) -> Self {
        Self {
            inner: RwLock::new(snapshot),
        }
    }

    /// Copy of the current contents.
    pub async fn snapshot(&self) -> Snapshot {
        self.inner.read().await.clone()
    }

    pub async fn insert_project(&self, project: Project) {
        let mut inner = self.inner.write().await;
        inner.projects.retain(|p| p.id != project.id);
        inner.projects.push(project);
    }

    pub async fn insert_person(&self, person: Person) {
        let mut inner = self.inner.write().await;
        inner.people.retain(|p| p.id != person.id);
        inner.people.push(person);
    }

    /// Insert or replace a task.
    pub async fn insert_task(&self, task: Task) {
        let mut inner = self.inner.write().await;
        if let Some(existing) = inner.tasks.iter_mut().find(|t| t.id == task.id) {
            *existing = task;
        } else {
            inner.tasks.push(task);
        }
    }

    /// Insert an edge as-is, bypassing every check.
    ///
    /// This is how pre-existing (possibly malformed) data gets loaded.
    pub async fn insert_edge(&self, edge: DependencyEdge) {
        self.inner.write().await.edges.push(edge);
    }

    /// Delete a task together with every edge touching it.
    pub async fn remove_task(&self, task_id: TaskId) -> Result<Task> {
        let mut inner = self.inner.write().await;
        let index = inner
            .tasks
            .iter()
            .position(|t| t.id == task_id)
            .ok_or(Error::TaskNotFound { task_id })?;
        let removed_edges = inner.remove_edges_touching(&task_id);
        debug!(%task_id, removed_edges, "task removed");
        Ok(inner.tasks.remove(index))
    }

    /// Load a store from a JSON snapshot file. A missing file yields an
    /// empty store.
    pub async fn load(path: &Path) -> Result<Self> {
        let path = path.to_path_buf();
        let snapshot = blocking(move || load_snapshot(&path)).await?;
        Ok(Self::from_snapshot(snapshot))
    }

    /// Write the current contents to `path` atomically, keeping a `.bak`
    /// copy of the previous file.
    pub async fn save(&self, path: &Path) -> Result<()> {
        let contents = serde_json::to_string_pretty(&*self.inner.read().await)?;
        let path = path.to_path_buf();
        blocking(move || write_snapshot(&path, &contents)).await
    }
}

fn load_snapshot(path: &Path) -> Result<Snapshot> {
    debug!(path = %path.display(), "MemoryStore::load");
    if !path.exists() {
        debug!("Snapshot file not found, starting empty");
        return Ok(Snapshot::default());
    }
    let snapshot: Snapshot = serde_json::from_str(&fs::read_to_string(path)?)?;
    debug!(
        tasks = snapshot.tasks.len(),
        edges = snapshot.edges.len(),
        "Snapshot loaded"
    );
    Ok(snapshot)
}

fn write_snapshot(path: &Path, contents: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            fs::create_dir_all(parent)?;
        }
    }
    if path.exists() {
        let backup_path = path.with_extension("json.bak");
        fs::copy(path, &backup_path)?;
    }
    let temp_path = path.with_extension("json.tmp");
    fs::write(&temp_path, contents)?;
    fs::rename(&temp_path, path)?;
    debug!(path = %path.display(), "Snapshot saved");
    Ok(())
}

impl DependencyStore for MemoryStore {
    async fn get_dependency_edges(&self, task_id: TaskId) -> Result<Vec<DependencyEdge>> {
        let inner = self.inner.read().await;
        Ok(inner
            .edges
            .iter()
            .filter(|e| e.task_id == task_id)
            .cloned()
            .collect())
    }

    async fn get_dependent_edges(&self, task_id: TaskId) -> Result<Vec<DependencyEdge>> {
        let inner = self.inner.read().await;
        Ok(inner
            .edges
            .iter()
            .filter(|e| e.depends_on == task_id)
            .cloned()
            .collect())
    }

    async fn get_project_edges(&self, project_id: ProjectId) -> Result<Vec<DependencyEdge>> {
        let inner = self.inner.read().await;
        let ids = inner.project_task_ids(&project_id);
        Ok(inner
            .edges
            .iter()
            .filter(|e| ids.contains(&e.task_id) || ids.contains(&e.depends_on))
            .cloned()
            .collect())
    }

    async fn find_edge(
        &self,
        task_id: TaskId,
        depends_on: TaskId,
    ) -> Result<Option<DependencyEdge>> {
        let inner = self.inner.read().await;
        Ok(inner
            .edges
            .iter()
            .find(|e| e.task_id == task_id && e.depends_on == depends_on)
            .cloned())
    }

    async fn create_edge(&self, task_id: TaskId, depends_on: TaskId) -> Result<DependencyEdge> {
        let mut inner = self.inner.write().await;
        if inner
            .edges
            .iter()
            .any(|e| e.task_id == task_id && e.depends_on == depends_on)
        {
            return Err(Error::DuplicateDependency {
                task_id,
                depends_on,
            });
        }
        let edge = DependencyEdge::new(task_id, depends_on);
        inner.edges.push(edge.clone());
        Ok(edge)
    }

    async fn get_edge(&self, edge_id: EdgeId) -> Result<DependencyEdge> {
        let inner = self.inner.read().await;
        inner
            .edges
            .iter()
            .find(|e| e.id == edge_id)
            .cloned()
            .ok_or(Error::DependencyNotFound { edge_id })
    }

    async fn delete_edge(&self, edge_id: EdgeId) -> Result<()> {
        let mut inner = self.inner.write().await;
        let index = inner
            .edges
            .iter()
            .position(|e| e.id == edge_id)
            .ok_or(Error::DependencyNotFound { edge_id })?;
        inner.edges.remove(index);
        Ok(())
    }

    async fn delete_task_edges(&self, task_id: TaskId) -> Result<usize> {
        Ok(self.inner.write().await.remove_edges_touching(&task_id))
    }

    async fn get_task(&self, task_id: TaskId) -> Result<Task> {
        self.inner.read().await.task(&task_id).cloned()
    }

    async fn get_tasks_by_ids(&self, ids: Vec<TaskId>) -> Result<Vec<Task>> {
        let inner = self.inner.read().await;
        Ok(ids
            .iter()
            .filter_map(|id| inner.tasks.iter().find(|t| t.id == *id))
            .cloned()
            .collect())
    }

    async fn get_project_tasks(&self, project_id: ProjectId) -> Result<Vec<Task>> {
        let inner = self.inner.read().await;
        Ok(inner
            .tasks
            .iter()
            .filter(|t| t.project_id == project_id)
            .cloned()
            .collect())
    }

    async fn get_project_members(&self, project_id: ProjectId) -> Result<Vec<Person>> {
        let inner = self.inner.read().await;
        let Some(project) = inner.projects.iter().find(|p| p.id == project_id) else {
            return Ok(Vec::new());
        };
        Ok(project
            .members
            .iter()
            .filter_map(|id| inner.people.iter().find(|p| p.id == *id))
            .cloned()
            .collect())
    }

    async fn get_person_tasks(&self, person_id: PersonId) -> Result<Vec<Task>> {
        let inner = self.inner.read().await;
        Ok(inner
            .tasks
            .iter()
            .filter(|t| t.is_assigned_to(&person_id))
            .cloned()
            .collect())
    }

    async fn update_task_status(&self, task_id: TaskId, status: TaskStatus) -> Result<Task> {
        let mut inner = self.inner.write().await;
        let task = inner.task_mut(&task_id)?;
        task.set_status(status);
        Ok(task.clone())
    }

    async fn set_assignees(&self, task_id: TaskId, assignees: BTreeSet<PersonId>) -> Result<Task> {
        let mut inner = self.inner.write().await;
        let task = inner.task_mut(&task_id)?;
        task.assignees = assignees;
        Ok(task.clone())
    }
}
