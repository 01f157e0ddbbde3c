//! Assignment suggestions ranked by workload and topical fit.
//!
//! Scoring per candidate:
//! - start at `base_score`, minus `load_penalty` per active task
//! - plus `topical_bonus` per other active assignment sharing the target
//!   task's category or a tag
//! - clamp at 0
//! - at or above `assignment_cap` active tasks the candidate cannot receive
//!   work and scores 0, whatever the bonus
//!
//! Ranking is a stable sort by descending score, so equal scores keep
//! candidate input order.

use serde::Serialize;
use tracing::debug;

use crate::config::WorkloadPolicy;
use crate::core::{Person, Task, WorkloadLevel};

/// One ranked assignment suggestion.
#[derive(Debug, Clone, Serialize)]
pub struct AssignmentSuggestion {
    pub person: Person,
    pub score: u32,
    pub current_active_task_count: usize,
    pub workload: WorkloadLevel,
    /// Active assignments topically related to the target task.
    pub related_task_count: usize,
    pub can_receive: bool,
    pub reason: String,
}

/// Score a single candidate against `task`.
pub fn score_candidate(
    task: &Task,
    person: &Person,
    all_tasks: &[Task],
    policy: &WorkloadPolicy,
) -> AssignmentSuggestion {
    let active: Vec<&Task> = all_tasks
        .iter()
        .filter(|t| t.is_active() && t.is_assigned_to(&person.id))
        .collect();
    let active_count = active.len();
    let workload = WorkloadLevel::classify(active_count, policy);

    let related = active
        .iter()
        .filter(|t| t.id != task.id && t.shares_topic_with(task))
        .count();

    if active_count >= policy.assignment_cap {
        return AssignmentSuggestion {
            person: person.clone(),
            score: 0,
            current_active_task_count: active_count,
            workload,
            related_task_count: related,
            can_receive: false,
            reason: format!(
                "at capacity ({} active tasks, limit {})",
                active_count, policy.assignment_cap
            ),
        };
    }

    let penalty = policy.load_penalty as i64 * active_count as i64;
    let bonus = policy.topical_bonus as i64 * related as i64;
    let score = (policy.base_score as i64 - penalty + bonus).max(0);
    let score = u32::try_from(score).unwrap_or(u32::MAX);

    let mut reason = format!("{} workload ({} active tasks)", workload, active_count);
    if related > 0 {
        let noun = if related == 1 { "task" } else { "tasks" };
        reason.push_str(&format!(", {} related {}", related, noun));
    }

    AssignmentSuggestion {
        person: person.clone(),
        score,
        current_active_task_count: active_count,
        workload,
        related_task_count: related,
        can_receive: true,
        reason,
    }
}

/// Rank `candidates` for `task`, returning at most `policy.max_suggestions`.
///
/// Assignments are derived from `all_tasks`, which must hold every task
/// assigned to the candidates, across projects.
pub fn suggest_assignees(
    task: &Task,
    candidates: &[Person],
    all_tasks: &[Task],
    policy: &WorkloadPolicy,
) -> Vec<AssignmentSuggestion> {
    let mut suggestions: Vec<AssignmentSuggestion> = candidates
        .iter()
        .map(|person| score_candidate(task, person, all_tasks, policy))
        .collect();
    suggestions.sort_by(|a, b| b.score.cmp(&a.score));
    suggestions.truncate(policy.max_suggestions);
    debug!(
        task_id = %task.id,
        candidates = candidates.len(),
        returned = suggestions.len(),
        "suggest_assignees"
    );
    suggestions
}
