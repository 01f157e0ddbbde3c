//! Audit events returned by mutating engine operations.
//!
//! Callers decide where these go (activity feed, notification fan-out,
//! persistence). Nothing here writes them anywhere.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::core::{PersonId, TaskId};

/// What happened.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditAction {
    DependencyCreated,
    DependencyRemoved,
    TaskCompleted,
    TaskReassigned,
}

impl std::fmt::Display for AuditAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            AuditAction::DependencyCreated => "dependency_created",
            AuditAction::DependencyRemoved => "dependency_removed",
            AuditAction::TaskCompleted => "task_completed",
            AuditAction::TaskReassigned => "task_reassigned",
        };
        write!(f, "{}", s)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditEvent {
    pub at: DateTime<Utc>,
    pub actor: PersonId,
    pub action: AuditAction,
    pub task_id: TaskId,
    pub detail: String,
}

impl AuditEvent {
    pub fn new(actor: PersonId, action: AuditAction, task_id: TaskId, detail: String) -> Self {
        Self {
            at: Utc::now(),
            actor,
            action,
            task_id,
            detail,
        }
    }
}
