//! Core domain models for the dependency engine.
//!
//! This module contains the fundamental data structures shared by the
//! store and the engine: tasks, people, projects and the dependency graph.

/// Declare a UUID-backed identifier newtype with short-form display.
macro_rules! uuid_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(
            Debug,
            Clone,
            Copy,
            PartialEq,
            Eq,
            Hash,
            PartialOrd,
            Ord,
            serde::Serialize,
            serde::Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(pub uuid::Uuid);

        impl $name {
            /// Create a new unique identifier.
            pub fn new() -> Self {
                Self(uuid::Uuid::new_v4())
            }

            /// Return first 8 characters of the UUID for display.
            pub fn short(&self) -> String {
                self.0.to_string()[..8].to_string()
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl std::str::FromStr for $name {
            type Err = uuid::Error;

            fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
                Ok(Self(uuid::Uuid::parse_str(s)?))
            }
        }
    };
}

pub mod dag;
pub mod person;
pub mod project;
pub mod task;

pub use dag::{DependencyEdge, DependencyGraph, EdgeId};
pub use person::{Person, PersonId, Workload, WorkloadLevel};
pub use project::{Project, ProjectId};
pub use task::{Task, TaskId, TaskStatus, TaskStep};
