//! Drag-and-drop reassignment validation.
//!
//! Checks run in a fixed order and the first failure wins:
//!
//! 1. payload shape (`invalid_data`)
//! 2. identity (`same_person`)
//! 3. caller permission (`missing_permissions`)
//! 4. task status (`task_completed`)
//! 5. dependencies (`unresolved_dependencies`)
//! 6. target capacity across all of their projects (`overloaded`)
//! 7. project membership (`not_project_member`)
//!
//! A rejected move is a normal outcome returned in [`MoveValidation`];
//! `Err` is reserved for store failures.

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::audit::{AuditAction, AuditEvent};
use super::blocking::is_blocked;
use super::context::ActorContext;
use crate::config::WorkloadPolicy;
use crate::core::{PersonId, Task, TaskId};
use crate::error::{Error, Result};
use crate::store::DependencyStore;

/// What the UI hands over when a task card is dropped on a person.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DragPayload {
    pub task_id: Option<TaskId>,
    /// The person the card was dragged from; `None` for unassigned tasks.
    pub source_person_id: Option<PersonId>,
}

impl DragPayload {
    pub fn new(task_id: TaskId, source_person_id: Option<PersonId>) -> Self {
        Self {
            task_id: Some(task_id),
            source_person_id,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReasonCode {
    InvalidData,
    SamePerson,
    MissingPermissions,
    TaskCompleted,
    UnresolvedDependencies,
    Overloaded,
    NotProjectMember,
}

impl std::fmt::Display for ReasonCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            ReasonCode::InvalidData => "invalid_data",
            ReasonCode::SamePerson => "same_person",
            ReasonCode::MissingPermissions => "missing_permissions",
            ReasonCode::TaskCompleted => "task_completed",
            ReasonCode::UnresolvedDependencies => "unresolved_dependencies",
            ReasonCode::Overloaded => "overloaded",
            ReasonCode::NotProjectMember => "not_project_member",
        };
        write!(f, "{}", s)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MoveValidation {
    pub is_valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<ReasonCode>,
    pub message: String,
}

impl MoveValidation {
    fn valid() -> Self {
        Self {
            is_valid: true,
            reason: None,
            message: "move allowed".to_string(),
        }
    }

    fn reject(reason: ReasonCode, message: impl Into<String>) -> Self {
        Self {
            is_valid: false,
            reason: Some(reason),
            message: message.into(),
        }
    }
}

/// Validate dropping `payload`'s task on `target_person_id`.
pub async fn validate_move<S: DependencyStore>(
    store: &S,
    ctx: &ActorContext,
    payload: &DragPayload,
    target_person_id: Option<PersonId>,
    policy: &WorkloadPolicy,
) -> Result<MoveValidation> {
    Ok(evaluate_move(store, ctx, payload, target_person_id, policy)
        .await?
        .0)
}

/// Shared by [`validate_move`] and [`reassign_task`]; also returns the
/// fetched task when the payload referenced one.
async fn evaluate_move<S: DependencyStore>(
    store: &S,
    ctx: &ActorContext,
    payload: &DragPayload,
    target_person_id: Option<PersonId>,
    policy: &WorkloadPolicy,
) -> Result<(MoveValidation, Option<Task>)> {
    let (Some(task_id), Some(target)) = (payload.task_id, target_person_id) else {
        return Ok((
            MoveValidation::reject(ReasonCode::InvalidData, "missing task or target person"),
            None,
        ));
    };
    debug!(%task_id, %target, "validate_move");

    if payload.source_person_id == Some(target) {
        return Ok((
            MoveValidation::reject(ReasonCode::SamePerson, "task is already with this person"),
            None,
        ));
    }

    if !ctx.permissions.can_assign_tasks {
        return Ok((
            MoveValidation::reject(
                ReasonCode::MissingPermissions,
                "you do not have permission to assign tasks",
            ),
            None,
        ));
    }

    let task = match store.get_task(task_id).await {
        Ok(task) => task,
        Err(Error::TaskNotFound { .. }) => {
            return Ok((
                MoveValidation::reject(ReasonCode::InvalidData, "task does not exist"),
                None,
            ));
        }
        Err(e) => return Err(e),
    };

    let rejection = check_task_state(store, &task, target, policy).await?;
    Ok((rejection.unwrap_or_else(MoveValidation::valid), Some(task)))
}

async fn check_task_state<S: DependencyStore>(
    store: &S,
    task: &Task,
    target: PersonId,
    policy: &WorkloadPolicy,
) -> Result<Option<MoveValidation>> {
    if task.is_completed() {
        return Ok(Some(MoveValidation::reject(
            ReasonCode::TaskCompleted,
            "completed tasks cannot be reassigned",
        )));
    }

    let blocking = is_blocked(store, task).await?;
    if let Some(message) = blocking.message() {
        return Ok(Some(MoveValidation::reject(
            ReasonCode::UnresolvedDependencies,
            message,
        )));
    }

    // Workload spans every project the person works in.
    let active = store
        .get_person_tasks(target)
        .await?
        .iter()
        .filter(|t| t.is_active())
        .count();
    if active >= policy.assignment_cap {
        return Ok(Some(MoveValidation::reject(
            ReasonCode::Overloaded,
            format!(
                "person already has {} active tasks (limit {})",
                active, policy.assignment_cap
            ),
        )));
    }

    let members = store.get_project_members(task.project_id).await?;
    if !members.iter().any(|p| p.id == target) {
        return Ok(Some(MoveValidation::reject(
            ReasonCode::NotProjectMember,
            "person is not a member of this project",
        )));
    }

    Ok(None)
}

/// Outcome of [`reassign_task`].
#[derive(Debug, Clone, Serialize)]
pub struct ReassignOutcome {
    pub validation: MoveValidation,
    /// The updated task when the move was applied.
    pub task: Option<Task>,
    pub audit: Option<AuditEvent>,
}

/// Validate and, if allowed, apply a drag-and-drop reassignment: the source
/// person (if any) is replaced by the target in the task's assignees.
pub async fn reassign_task<S: DependencyStore>(
    store: &S,
    ctx: &ActorContext,
    payload: &DragPayload,
    target_person_id: Option<PersonId>,
    policy: &WorkloadPolicy,
) -> Result<ReassignOutcome> {
    let (validation, task) =
        evaluate_move(store, ctx, payload, target_person_id, policy).await?;
    let (true, Some(task), Some(target)) = (validation.is_valid, task, target_person_id) else {
        return Ok(ReassignOutcome {
            validation,
            task: None,
            audit: None,
        });
    };

    let mut assignees = task.assignees.clone();
    if let Some(source) = payload.source_person_id {
        assignees.remove(&source);
    }
    assignees.insert(target);
    let updated = store.set_assignees(task.id, assignees).await?;
    info!(task_id = %task.id, %target, "task reassigned");

    let detail = match payload.source_person_id {
        Some(source) => format!("{} moved from {} to {}", task.name, source, target),
        None => format!("{} assigned to {}", task.name, target),
    };
    let audit = AuditEvent::new(ctx.actor, AuditAction::TaskReassigned, task.id, detail);
    Ok(ReassignOutcome {
        validation,
        task: Some(updated),
        audit: Some(audit),
    })
}
