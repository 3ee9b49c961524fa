//! Dependency graph construction and topological ordering.
//!
//! Turns a flat task snapshot into an adjacency structure: per-task
//! valid dependencies, reverse edges (who depends on me), and in-degree
//! counts. A dependency referencing a task outside the snapshot is
//! silently dropped — the edge is treated as nonexistent, not as an
//! error.
//!
//! # Cycle Detection
//! [`DependencyGraph::topo_order`] runs Kahn's algorithm and fails with
//! a diagnostic when any task is never dequeued. Downstream algorithms
//! (reconciliation, propagation) fail fast on cyclic input instead of
//! stalling or recursing unboundedly.
//!
//! # Reference
//! Cormen et al. (2009), "Introduction to Algorithms", Ch. 22.4

use std::collections::{HashMap, HashSet, VecDeque};

use crate::error::ScheduleError;
use crate::models::Task;

/// Adjacency view over a fixed task snapshot.
///
/// Derived, never persisted. Holds only IDs; task data stays with the
/// caller's snapshot.
#[derive(Debug, Clone)]
pub struct DependencyGraph {
    /// Task IDs in input order (drives deterministic tie-breaking).
    order: Vec<String>,
    /// Valid (non-dangling) dependencies per task.
    valid_deps: HashMap<String, Vec<String>>,
    /// Reverse edges: task -> tasks that depend on it.
    dependents: HashMap<String, Vec<String>>,
    /// Count of valid predecessors per task.
    in_degree: HashMap<String, usize>,
}

impl DependencyGraph {
    /// Builds the graph from a task snapshot, filtering dangling
    /// dependency references.
    pub fn build(tasks: &[Task]) -> Self {
        let ids: HashSet<&str> = tasks.iter().map(|t| t.id.as_str()).collect();

        let mut order = Vec::with_capacity(tasks.len());
        let mut valid_deps: HashMap<String, Vec<String>> = HashMap::new();
        let mut dependents: HashMap<String, Vec<String>> = HashMap::new();
        let mut in_degree: HashMap<String, usize> = HashMap::new();

        for task in tasks {
            order.push(task.id.clone());
            dependents.entry(task.id.clone()).or_default();
        }

        for task in tasks {
            let deps: Vec<String> = task
                .dependencies
                .iter()
                .filter(|d| ids.contains(d.as_str()))
                .cloned()
                .collect();

            in_degree.insert(task.id.clone(), deps.len());

            for dep in &deps {
                dependents
                    .entry(dep.clone())
                    .or_default()
                    .push(task.id.clone());
            }

            valid_deps.insert(task.id.clone(), deps);
        }

        Self {
            order,
            valid_deps,
            dependents,
            in_degree,
        }
    }

    /// Valid dependencies of a task (dangling refs already removed).
    pub fn valid_deps(&self, task_id: &str) -> &[String] {
        self.valid_deps.get(task_id).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Tasks that directly depend on the given task.
    pub fn dependents(&self, task_id: &str) -> &[String] {
        self.dependents.get(task_id).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Count of valid predecessors.
    pub fn in_degree(&self, task_id: &str) -> usize {
        self.in_degree.get(task_id).copied().unwrap_or(0)
    }

    /// Number of tasks in the graph.
    pub fn task_count(&self) -> usize {
        self.order.len()
    }

    /// Task IDs in snapshot order.
    pub fn task_ids(&self) -> &[String] {
        &self.order
    }

    /// Topological order via Kahn's algorithm.
    ///
    /// Zero-in-degree tasks are seeded in snapshot order, so ties break
    /// deterministically. Returns [`ScheduleError::CyclicDependency`]
    /// naming one stranded task when the graph contains a cycle.
    pub fn topo_order(&self) -> Result<Vec<String>, ScheduleError> {
        let mut in_degree = self.in_degree.clone();
        let mut queue: VecDeque<&str> = self
            .order
            .iter()
            .filter(|id| in_degree.get(id.as_str()) == Some(&0))
            .map(String::as_str)
            .collect();

        let mut sorted = Vec::with_capacity(self.order.len());

        while let Some(id) = queue.pop_front() {
            sorted.push(id.to_string());

            for dependent in self.dependents(id) {
                if let Some(count) = in_degree.get_mut(dependent.as_str()) {
                    *count -= 1;
                    if *count == 0 {
                        queue.push_back(dependent);
                    }
                }
            }
        }

        if sorted.len() < self.order.len() {
            let stranded = self
                .order
                .iter()
                .find(|id| in_degree.get(id.as_str()).copied().unwrap_or(0) > 0)
                .cloned()
                .unwrap_or_default();
            return Err(ScheduleError::CyclicDependency { task_id: stranded });
        }

        Ok(sorted)
    }

    /// All transitive dependents of a task (the task itself excluded).
    pub fn transitive_dependents(&self, task_id: &str) -> HashSet<String> {
        let mut seen = HashSet::new();
        let mut stack: Vec<&str> = self.dependents(task_id).iter().map(String::as_str).collect();

        while let Some(id) = stack.pop() {
            if seen.insert(id.to_string()) {
                stack.extend(self.dependents(id).iter().map(String::as_str));
            }
        }

        seen
    }
}
