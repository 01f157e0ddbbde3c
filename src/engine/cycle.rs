//! Cycle checking and dependency creation/removal.
//!
//! A project's edge set is loaded once per call into a [`DependencyGraph`]
//! and traversed in memory.
//!
//! Check-then-insert is not atomic against the store. Concurrent creators
//! are handled in two layers: the store's uniqueness constraint rejects
//! duplicate pairs, and after every insert the project graph is re-read
//! and the new edge is deleted again if it now closes a cycle.

use tracing::{debug, info, warn};

use super::audit::{AuditAction, AuditEvent};
use super::context::ActorContext;
use crate::core::{DependencyEdge, DependencyGraph, EdgeId, TaskId};
use crate::error::{Error, Result};
use crate::store::DependencyStore;

/// Whether making `task_id` depend on `depends_on` would close a cycle.
///
/// Self-dependency always counts as a cycle. Does not write anything.
pub async fn would_create_cycle<S: DependencyStore>(
    store: &S,
    task_id: TaskId,
    depends_on: TaskId,
) -> Result<bool> {
    if task_id == depends_on {
        return Ok(true);
    }
    let task = store.get_task(task_id).await?;
    let edges = store.get_project_edges(task.project_id).await?;
    Ok(DependencyGraph::from_edges(&edges).would_create_cycle(&task_id, &depends_on))
}

/// Make `task_id` depend on `depends_on`.
///
/// Checks, in order and before any write: self-dependency, existence of
/// both tasks, same project, duplicate pair, cycle. After the write the
/// project graph is re-validated; if a concurrently inserted edge means the
/// new edge now closes a cycle, it is deleted again and
/// [`Error::CyclicDependency`] is returned.
pub async fn create_dependency<S: DependencyStore>(
    store: &S,
    ctx: &ActorContext,
    task_id: TaskId,
    depends_on: TaskId,
) -> Result<(DependencyEdge, AuditEvent)> {
    if task_id == depends_on {
        return Err(Error::SelfDependency { task_id });
    }
    debug!(%task_id, %depends_on, "create_dependency");

    let task = store.get_task(task_id).await?;
    let dependency = store.get_task(depends_on).await?;
    if task.project_id != dependency.project_id {
        return Err(Error::ProjectMismatch {
            task_id,
            depends_on,
        });
    }

    if store.find_edge(task_id, depends_on).await?.is_some() {
        return Err(Error::DuplicateDependency {
            task_id,
            depends_on,
        });
    }

    let edges = store.get_project_edges(task.project_id).await?;
    let graph = DependencyGraph::from_edges(&edges);
    if let Some(path) = graph.cycle_path(&task_id, &depends_on) {
        return Err(Error::CyclicDependency {
            task_id,
            depends_on,
            path,
        });
    }

    let edge = store.create_edge(task_id, depends_on).await?;

    let edges = store.get_project_edges(task.project_id).await?;
    let others = DependencyGraph::from_edges(edges.iter().filter(|e| e.id != edge.id));
    if let Some(path) = others.cycle_path(&task_id, &depends_on) {
        warn!(
            %task_id,
            %depends_on,
            edge_id = %edge.id,
            "dependency closes a cycle after concurrent insert, rolling back"
        );
        match store.delete_edge(edge.id).await {
            Ok(()) | Err(Error::DependencyNotFound { .. }) => {}
            Err(e) => return Err(e),
        }
        return Err(Error::CyclicDependency {
            task_id,
            depends_on,
            path,
        });
    }

    info!(%task_id, %depends_on, edge_id = %edge.id, "dependency created");
    let audit = AuditEvent::new(
        ctx.actor,
        AuditAction::DependencyCreated,
        task_id,
        format!("{} now depends on {}", task.name, dependency.name),
    );
    Ok((edge, audit))
}

/// Delete a dependency edge.
///
/// Fails with [`Error::DependencyNotFound`] if no such edge exists.
pub async fn delete_dependency<S: DependencyStore>(
    store: &S,
    ctx: &ActorContext,
    edge_id: EdgeId,
) -> Result<AuditEvent> {
    let edge = store.get_edge(edge_id).await?;
    store.delete_edge(edge_id).await?;
    info!(%edge_id, task_id = %edge.task_id, depends_on = %edge.depends_on, "dependency removed");
    Ok(AuditEvent::new(
        ctx.actor,
        AuditAction::DependencyRemoved,
        edge.task_id,
        format!("no longer depends on {}", edge.depends_on),
    ))
}
