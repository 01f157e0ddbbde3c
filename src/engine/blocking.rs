//! Blocked-state evaluation.
//!
//! A task is blocked iff at least one of its direct dependencies is not
//! completed. The evaluator always reads current store state; [`BlockedCache`]
//! is an opt-in cache for callers that render many tasks at once.

use serde::Serialize;
use std::collections::HashMap;
use tracing::{debug, warn};

use crate::core::{DependencyGraph, Task, TaskId};
use crate::error::Result;
use crate::store::DependencyStore;

/// Result of evaluating a task's direct dependencies.
#[derive(Debug, Clone, Serialize)]
pub struct BlockingState {
    pub blocked: bool,
    /// Incomplete direct dependencies, in edge order.
    pub blocking_tasks: Vec<Task>,
}

impl BlockingState {
    /// Build the state from a task's direct dependencies.
    pub fn from_dependencies(dependencies: Vec<Task>) -> Self {
        let blocking_tasks: Vec<Task> = dependencies
            .into_iter()
            .filter(|t| !t.is_completed())
            .collect();
        Self {
            blocked: !blocking_tasks.is_empty(),
            blocking_tasks,
        }
    }

    pub fn unblocked() -> Self {
        Self {
            blocked: false,
            blocking_tasks: Vec::new(),
        }
    }

    /// "blocked by X, Y" style message, or `None` when unblocked.
    pub fn message(&self) -> Option<String> {
        if !self.blocked {
            return None;
        }
        let names: Vec<&str> = self.blocking_tasks.iter().map(|t| t.name.as_str()).collect();
        Some(format!("blocked by {}", names.join(", ")))
    }

    pub fn blocking_ids(&self) -> Vec<TaskId> {
        self.blocking_tasks.iter().map(|t| t.id).collect()
    }
}

/// Evaluate whether `task` is blocked by its direct dependencies.
pub async fn is_blocked<S: DependencyStore>(store: &S, task: &Task) -> Result<BlockingState> {
    let edges = store.get_dependency_edges(task.id).await?;
    if edges.is_empty() {
        return Ok(BlockingState::unblocked());
    }
    let ids: Vec<TaskId> = edges.iter().map(|e| e.depends_on).collect();
    let dependencies = store.get_tasks_by_ids(ids.clone()).await?;
    if dependencies.len() < ids.len() {
        // Orphaned edges should have been removed with their task.
        warn!(
            task_id = %task.id,
            missing = ids.len() - dependencies.len(),
            "dependency edges reference missing tasks"
        );
    }
    let state = BlockingState::from_dependencies(dependencies);
    debug!(task_id = %task.id, blocked = state.blocked, "is_blocked");
    Ok(state)
}

/// Caller-owned cache of blocked states.
///
/// Nothing invalidates it automatically: callers must invalidate the
/// dependents of any task whose status changes.
#[derive(Debug, Default)]
pub struct BlockedCache {
    entries: HashMap<TaskId, BlockingState>,
}

impl BlockedCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, task_id: &TaskId) -> Option<&BlockingState> {
        self.entries.get(task_id)
    }

    pub fn insert(&mut self, task_id: TaskId, state: BlockingState) {
        self.entries.insert(task_id, state);
    }

    /// Return the cached state, evaluating and caching it on a miss.
    pub async fn get_or_evaluate<S: DependencyStore>(
        &mut self,
        store: &S,
        task: &Task,
    ) -> Result<BlockingState> {
        if let Some(state) = self.entries.get(&task.id) {
            return Ok(state.clone());
        }
        let state = is_blocked(store, task).await?;
        self.entries.insert(task.id, state.clone());
        Ok(state)
    }

    pub fn invalidate(&mut self, task_id: &TaskId) {
        self.entries.remove(task_id);
    }

    /// Drop every entry whose blocked state depends on `task_id`'s status,
    /// along with the entry for `task_id` itself.
    pub fn invalidate_dependents_of(&mut self, task_id: &TaskId, graph: &DependencyGraph) {
        self.entries.remove(task_id);
        for dependent in graph.dependents_of(task_id) {
            self.entries.remove(&dependent);
        }
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
