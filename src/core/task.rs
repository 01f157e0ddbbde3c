//! Task data model.
//!
//! Tasks are the nodes of a project's dependency graph. Each task tracks
//! its status, assignees, topical labels and checklist steps.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use super::person::PersonId;
use super::project::ProjectId;

uuid_id!(
    /// Unique identifier for a task.
    ///
    /// Uses UUID v4 for generation and provides a short form display
    /// for human-readable output.
    TaskId
);

/// Task status in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    /// Task created but no work started.
    #[default]
    NotStarted,
    /// Task is being worked on.
    InProgress,
    /// Work started and was put on hold.
    Paused,
    /// Task is done. Completed tasks no longer count towards workload
    /// and no longer block their dependents.
    Completed,
}

impl TaskStatus {
    /// Whether a task in this status counts towards its assignees' workload.
    pub fn is_active(&self) -> bool {
        matches!(
            self,
            TaskStatus::NotStarted | TaskStatus::InProgress | TaskStatus::Paused
        )
    }
}

impl std::fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TaskStatus::NotStarted => write!(f, "not_started"),
            TaskStatus::InProgress => write!(f, "in_progress"),
            TaskStatus::Paused => write!(f, "paused"),
            TaskStatus::Completed => write!(f, "completed"),
        }
    }
}

/// A checklist step. Completion percentage is derived from these.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TaskStep {
    pub title: String,
    #[serde(default)]
    pub done: bool,
}

impl TaskStep {
    pub fn new(title: &str) -> Self {
        Self {
            title: title.to_string(),
            done: false,
        }
    }
}

/// A single task in a project.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Task {
    /// Unique identifier for this task.
    pub id: TaskId,
    /// Human-readable name for the task.
    pub name: String,
    /// Current status.
    #[serde(default)]
    pub status: TaskStatus,
    /// Project this task belongs to. Dependencies never cross projects.
    pub project_id: ProjectId,
    /// People currently assigned to this task.
    #[serde(default)]
    pub assignees: BTreeSet<PersonId>,
    /// Optional category used for topical similarity.
    #[serde(default)]
    pub category: Option<String>,
    /// Free-form tags used for topical similarity.
    #[serde(default)]
    pub tags: Vec<String>,
    /// Checklist steps.
    #[serde(default)]
    pub steps: Vec<TaskStep>,
    /// When the task was created.
    pub created_at: DateTime<Utc>,
    /// When the task was completed.
    #[serde(default)]
    pub completed_at: Option<DateTime<Utc>>,
}

impl Task {
    /// Create a new task in the given project.
    ///
    /// The task starts as NotStarted, unassigned and without labels.
    pub fn new(name: &str, project_id: ProjectId) -> Self {
        Self {
            id: TaskId::new(),
            name: name.to_string(),
            status: TaskStatus::NotStarted,
            project_id,
            assignees: BTreeSet::new(),
            category: None,
            tags: Vec::new(),
            steps: Vec::new(),
            created_at: Utc::now(),
            completed_at: None,
        }
    }

    /// Builder-style status setter.
    pub fn with_status(mut self, status: TaskStatus) -> Self {
        self.set_status(status);
        self
    }

    /// Builder-style category setter.
    pub fn with_category(mut self, category: &str) -> Self {
        self.category = Some(category.to_string());
        self
    }

    /// Builder-style tags setter.
    pub fn with_tags(mut self, tags: &[&str]) -> Self {
        self.tags = tags.iter().map(|t| t.to_string()).collect();
        self
    }

    /// Builder-style assignment.
    pub fn assigned_to(mut self, person: PersonId) -> Self {
        self.assignees.insert(person);
        self
    }

    /// Transition to a new status.
    ///
    /// Moving to Completed records the completion time and checks off every
    /// step; moving away from Completed clears the completion time.
    pub fn set_status(&mut self, status: TaskStatus) {
        if status == TaskStatus::Completed {
            if self.status != TaskStatus::Completed {
                self.completed_at = Some(Utc::now());
            }
            for step in &mut self.steps {
                step.done = true;
            }
        } else {
            self.completed_at = None;
        }
        self.status = status;
    }

    /// Mark the task as completed.
    pub fn complete(&mut self) {
        self.set_status(TaskStatus::Completed);
    }

    pub fn is_completed(&self) -> bool {
        self.status == TaskStatus::Completed
    }

    /// Whether this task counts towards its assignees' workload.
    pub fn is_active(&self) -> bool {
        self.status.is_active()
    }

    pub fn is_assigned_to(&self, person: &PersonId) -> bool {
        self.assignees.contains(person)
    }

    /// Percentage of steps checked off, 0-100. A task without steps is 0%
    /// unless completed.
    pub fn completion_percentage(&self) -> u8 {
        if self.steps.is_empty() {
            return if self.is_completed() { 100 } else { 0 };
        }
        let done = self.steps.iter().filter(|s| s.done).count();
        let pct = (done as f64 * 100.0 / self.steps.len() as f64).round();
        pct.clamp(0.0, 100.0) as u8
    }

    /// Whether two tasks are topically related: same category, or at least
    /// one tag in common. Comparison is case-insensitive.
    pub fn shares_topic_with(&self, other: &Task) -> bool {
        let same_category = match (&self.category, &other.category) {
            (Some(a), Some(b)) => a.eq_ignore_ascii_case(b),
            _ => false,
        };
        same_category
            || self
                .tags
                .iter()
                .any(|t| other.tags.iter().any(|o| o.eq_ignore_ascii_case(t)))
    }
}
