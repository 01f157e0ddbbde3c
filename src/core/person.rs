//! People who receive task assignments, and their derived workload.

use serde::{Deserialize, Serialize};

use super::task::Task;
use crate::config::WorkloadPolicy;

uuid_id!(
    /// Unique identifier for a person.
    PersonId
);

/// A person that can be assigned tasks.
///
/// Assignments are not stored on the person; they are derived from the
/// `assignees` of the tasks in scope.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Person {
    pub id: PersonId,
    pub display_name: String,
}

impl Person {
    pub fn new(display_name: &str) -> Self {
        Self {
            id: PersonId::new(),
            display_name: display_name.to_string(),
        }
    }

    /// Tasks in `tasks` assigned to this person, in input order.
    pub fn assignments<'a>(&self, tasks: &'a [Task]) -> Vec<&'a Task> {
        tasks.iter().filter(|t| t.is_assigned_to(&self.id)).collect()
    }

    /// Number of active (not completed) tasks assigned to this person.
    pub fn active_task_count(&self, tasks: &[Task]) -> usize {
        tasks
            .iter()
            .filter(|t| t.is_active() && t.is_assigned_to(&self.id))
            .count()
    }

    /// Classify this person's workload over `tasks`.
    pub fn workload(&self, tasks: &[Task], policy: &WorkloadPolicy) -> Workload {
        let active_task_count = self.active_task_count(tasks);
        Workload {
            active_task_count,
            level: WorkloadLevel::classify(active_task_count, policy),
        }
    }
}

/// Coarse workload bucket derived from the active task count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkloadLevel {
    Light,
    Moderate,
    Heavy,
}

impl WorkloadLevel {
    pub fn classify(active_task_count: usize, policy: &WorkloadPolicy) -> Self {
        if active_task_count >= policy.heavy_threshold {
            WorkloadLevel::Heavy
        } else if active_task_count >= policy.moderate_threshold {
            WorkloadLevel::Moderate
        } else {
            WorkloadLevel::Light
        }
    }
}

impl std::fmt::Display for WorkloadLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WorkloadLevel::Light => write!(f, "light"),
            WorkloadLevel::Moderate => write!(f, "moderate"),
            WorkloadLevel::Heavy => write!(f, "heavy"),
        }
    }
}

/// A person's workload snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Workload {
    pub active_task_count: usize,
    pub level: WorkloadLevel,
}
