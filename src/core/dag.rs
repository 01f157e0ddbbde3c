//! Dependency edges and the in-memory project dependency graph.
//!
//! Edges are persisted as `(task_id, depends_on)` pairs by the store. For
//! traversal, a project's edge set is loaded once into a [`DependencyGraph`],
//! a petgraph `DiGraph` whose edges point from a task to the task it depends
//! on. Reachability along outgoing edges therefore follows "depends-on"
//! transitively.

use crate::core::task::TaskId;
use crate::error::{Error, Result};
use chrono::{DateTime, Utc};
use petgraph::algo::{is_cyclic_directed, tarjan_scc, toposort};
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;
use petgraph::Direction;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

uuid_id!(
    /// Unique identifier for a persisted dependency edge.
    EdgeId
);

/// A persisted dependency: `task_id` cannot be considered unblocked until
/// `depends_on` is completed.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DependencyEdge {
    pub id: EdgeId,
    pub task_id: TaskId,
    pub depends_on: TaskId,
    pub created_at: DateTime<Utc>,
}

impl DependencyEdge {
    pub fn new(task_id: TaskId, depends_on: TaskId) -> Self {
        Self {
            id: EdgeId::new(),
            task_id,
            depends_on,
            created_at: Utc::now(),
        }
    }

    /// Whether this edge touches the given task at either end.
    pub fn touches(&self, task: &TaskId) -> bool {
        self.task_id == *task || self.depends_on == *task
    }
}

/// The dependency graph of a single project.
///
/// Nodes are task ids, edges carry the persisted [`EdgeId`]. The graph
/// mirrors persisted data as-is: it does not reject cycles on insertion, so
/// it can also be used to inspect malformed data.
pub struct DependencyGraph {
    graph: DiGraph<TaskId, EdgeId>,
    task_index: HashMap<TaskId, NodeIndex>,
}

impl DependencyGraph {
    /// Create a new empty graph.
    pub fn new() -> Self {
        Self {
            graph: DiGraph::new(),
            task_index: HashMap::new(),
        }
    }

    /// Build a graph from a loaded edge set.
    pub fn from_edges<'a, I>(edges: I) -> Self
    where
        I: IntoIterator<Item = &'a DependencyEdge>,
    {
        let mut graph = Self::new();
        for edge in edges {
            graph.insert_edge(edge);
        }
        graph
    }

    /// Add a task node, returning the existing index if already present.
    pub fn add_task(&mut self, id: TaskId) -> NodeIndex {
        if let Some(&index) = self.task_index.get(&id) {
            return index;
        }
        let index = self.graph.add_node(id);
        self.task_index.insert(id, index);
        index
    }

    /// Insert a persisted edge without validation.
    pub fn insert_edge(&mut self, edge: &DependencyEdge) {
        let from = self.add_task(edge.task_id);
        let to = self.add_task(edge.depends_on);
        self.graph.add_edge(from, to, edge.id);
    }

    /// Get the number of tasks that appear in at least one edge or were added.
    pub fn task_count(&self) -> usize {
        self.graph.node_count()
    }

    /// Get the number of dependency edges.
    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    pub fn is_empty(&self) -> bool {
        self.graph.node_count() == 0
    }

    pub fn contains_task(&self, id: &TaskId) -> bool {
        self.task_index.contains_key(id)
    }

    /// Check if `task_id` directly depends on `depends_on`.
    pub fn has_dependency(&self, task_id: &TaskId, depends_on: &TaskId) -> bool {
        match (self.task_index.get(task_id), self.task_index.get(depends_on)) {
            (Some(&from), Some(&to)) => self.graph.find_edge(from, to).is_some(),
            _ => false,
        }
    }

    /// Tasks that `id` directly depends on.
    pub fn dependencies_of(&self, id: &TaskId) -> Vec<TaskId> {
        self.neighbors(id, Direction::Outgoing)
    }

    /// Tasks that directly depend on `id`.
    pub fn dependents_of(&self, id: &TaskId) -> Vec<TaskId> {
        self.neighbors(id, Direction::Incoming)
    }

    fn neighbors(&self, id: &TaskId, direction: Direction) -> Vec<TaskId> {
        let Some(&index) = self.task_index.get(id) else {
            return Vec::new();
        };
        self.graph
            .neighbors_directed(index, direction)
            .filter_map(|n| self.graph.node_weight(n).copied())
            .collect()
    }

    /// Check whether adding `task_id -> depends_on` would close a cycle.
    pub fn would_create_cycle(&self, task_id: &TaskId, depends_on: &TaskId) -> bool {
        self.cycle_path(task_id, depends_on).is_some()
    }

    /// Return the cycle that adding `task_id -> depends_on` would close,
    /// formatted as `task_id -> depends_on -> ... -> task_id`.
    ///
    /// Runs a depth-first search from `depends_on` along existing depends-on
    /// edges looking for `task_id`. Visited nodes are tracked so malformed
    /// (already cyclic) data still terminates. A self-dependency is always
    /// reported as a cycle.
    pub fn cycle_path(&self, task_id: &TaskId, depends_on: &TaskId) -> Option<Vec<TaskId>> {
        if task_id == depends_on {
            return Some(vec![*task_id, *task_id]);
        }

        let target = *self.task_index.get(task_id)?;
        let start = *self.task_index.get(depends_on)?;

        let mut stack = vec![start];
        let mut visited: HashSet<NodeIndex> = HashSet::from([start]);
        let mut parent: HashMap<NodeIndex, NodeIndex> = HashMap::new();

        while let Some(current) = stack.pop() {
            if current == target {
                let mut chain = vec![target];
                let mut cursor = target;
                while let Some(&prev) = parent.get(&cursor) {
                    chain.push(prev);
                    cursor = prev;
                }
                chain.push(target);
                chain.reverse();
                return Some(chain.into_iter().map(|n| self.graph[n]).collect());
            }

            for edge in self.graph.edges(current) {
                let next = edge.target();
                if visited.insert(next) {
                    parent.insert(next, current);
                    stack.push(next);
                }
            }
        }

        None
    }

    /// Check whether the graph currently contains any directed cycle.
    pub fn is_acyclic(&self) -> bool {
        !is_cyclic_directed(&self.graph)
    }

    /// Find one cycle currently present in the graph, if any.
    ///
    /// Returns the task ids of a strongly connected component with more than
    /// one node (or a self-loop), sorted for deterministic output.
    pub fn find_cycle(&self) -> Option<Vec<TaskId>> {
        tarjan_scc(&self.graph)
            .into_iter()
            .find(|component| {
                component.len() > 1
                    || component
                        .first()
                        .is_some_and(|&n| self.graph.find_edge(n, n).is_some())
            })
            .map(|component| {
                let mut ids: Vec<TaskId> = component.into_iter().map(|n| self.graph[n]).collect();
                ids.sort();
                ids
            })
    }

    /// Get tasks in execution order: every task comes after all of the
    /// tasks it depends on.
    ///
    /// # Errors
    /// Returns an error if the graph contains a cycle.
    pub fn topological_order(&self) -> Result<Vec<TaskId>> {
        let mut sorted = toposort(&self.graph, None).map_err(|cycle| {
            let task_id = self.graph[cycle.node_id()];
            Error::CyclicDependency {
                task_id,
                depends_on: task_id,
                path: self.find_cycle().unwrap_or_default(),
            }
        })?;
        // Edges point at dependencies, so toposort yields dependents first.
        sorted.reverse();
        Ok(sorted.into_iter().map(|n| self.graph[n]).collect())
    }
}

impl Default for DependencyGraph {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for DependencyGraph {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DependencyGraph")
            .field("tasks", &self.task_count())
            .field("dependencies", &self.edge_count())
            .finish()
    }
}
