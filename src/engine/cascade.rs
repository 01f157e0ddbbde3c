//! Resolution cascade after a task completes.
//!
//! The cascade is single-level: only direct dependents are re-evaluated.
//! Their statuses are never changed here, so a newly unblocked task only
//! cascades further once the caller actually completes it.

use futures::future::try_join_all;
use serde::Serialize;
use tracing::{debug, info};

use super::audit::{AuditAction, AuditEvent};
use super::blocking::is_blocked;
use super::context::ActorContext;
use crate::core::{Task, TaskId, TaskStatus};
use crate::error::Result;
use crate::store::DependencyStore;

/// Direct dependents of `completed_task_id` that are no longer blocked.
///
/// All-or-nothing: any store failure fails the whole call.
pub async fn resolve_on_completion<S: DependencyStore>(
    store: &S,
    completed_task_id: TaskId,
) -> Result<Vec<Task>> {
    let edges = store.get_dependent_edges(completed_task_id).await?;
    let mut ids: Vec<TaskId> = Vec::with_capacity(edges.len());
    for edge in &edges {
        if !ids.contains(&edge.task_id) {
            ids.push(edge.task_id);
        }
    }
    if ids.is_empty() {
        return Ok(Vec::new());
    }

    let dependents = store.get_tasks_by_ids(ids).await?;
    let states = try_join_all(dependents.iter().map(|t| is_blocked(store, t))).await?;

    let unblocked: Vec<Task> = dependents
        .into_iter()
        .zip(states)
        .filter(|(_, state)| !state.blocked)
        .map(|(task, _)| task)
        .collect();
    debug!(
        %completed_task_id,
        dependents = edges.len(),
        unblocked = unblocked.len(),
        "resolve_on_completion"
    );
    Ok(unblocked)
}

/// Outcome of [`complete_task`].
#[derive(Debug, Clone, Serialize)]
pub struct CompletionOutcome {
    pub task: Task,
    /// Direct dependents that became unblocked.
    pub unblocked: Vec<Task>,
    /// `None` when the task was already completed.
    pub audit: Option<AuditEvent>,
}

/// Persist `task_id` as completed, then run the resolution cascade.
///
/// Completing an already completed task changes nothing and cascades
/// nothing.
pub async fn complete_task<S: DependencyStore>(
    store: &S,
    ctx: &ActorContext,
    task_id: TaskId,
) -> Result<CompletionOutcome> {
    let current = store.get_task(task_id).await?;
    if current.is_completed() {
        debug!(%task_id, "complete_task: already completed");
        return Ok(CompletionOutcome {
            task: current,
            unblocked: Vec::new(),
            audit: None,
        });
    }

    let task = store
        .update_task_status(task_id, TaskStatus::Completed)
        .await?;
    let unblocked = resolve_on_completion(store, task_id).await?;
    info!(%task_id, unblocked = unblocked.len(), "task completed");

    let detail = if unblocked.is_empty() {
        format!("{} completed", task.name)
    } else {
        let names: Vec<&str> = unblocked.iter().map(|t| t.name.as_str()).collect();
        format!("{} completed, unblocked {}", task.name, names.join(", "))
    };
    let audit = AuditEvent::new(ctx.actor, AuditAction::TaskCompleted, task_id, detail);

    Ok(CompletionOutcome {
        task,
        unblocked,
        audit: Some(audit),
    })
}
