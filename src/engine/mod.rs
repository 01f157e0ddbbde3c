//! Dependency graph engine.
//!
//! Stateless operations over a [`DependencyStore`](crate::store::DependencyStore):
//! cycle checking on dependency creation, blocked-state evaluation, the
//! completion cascade, assignee scoring and move validation.

pub mod audit;
pub mod blocking;
pub mod cascade;
pub mod context;
pub mod cycle;
pub mod moves;
pub mod workload;

pub use audit::{AuditAction, AuditEvent};
pub use blocking::{is_blocked, BlockedCache, BlockingState};
pub use cascade::{complete_task, resolve_on_completion, CompletionOutcome};
pub use context::{ActorContext, Permissions};
pub use cycle::{create_dependency, delete_dependency, would_create_cycle};
pub use moves::{
    reassign_task, validate_move, DragPayload, MoveValidation, ReassignOutcome, ReasonCode,
};
pub use workload::{score_candidate, suggest_assignees, AssignmentSuggestion};
