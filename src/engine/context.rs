//! Caller identity and capabilities, passed explicitly into every
//! mutating operation.

use serde::{Deserialize, Serialize};

use crate::core::PersonId;

/// Capability flags granted to the caller by the authorization layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Permissions {
    /// May assign or reassign tasks to people.
    #[serde(default)]
    pub can_assign_tasks: bool,
}

impl Permissions {
    pub fn all() -> Self {
        Self {
            can_assign_tasks: true,
        }
    }
}

/// Who is performing an operation and what they are allowed to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActorContext {
    pub actor: PersonId,
    pub permissions: Permissions,
}

impl ActorContext {
    pub fn new(actor: PersonId, permissions: Permissions) -> Self {
        Self { actor, permissions }
    }
}
