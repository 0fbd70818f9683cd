// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! The scheduling problem: a dataflow DAG plus a hard memory budget.
//!
//! # Type-State Pattern
//!
//! The problem transitions through states enforced at compile time:
//!
//! ```text
//! Problem<Loaded>     — specs collected, consumer maps not yet built.
//!       │  .validate()
//!       ▼
//! Problem<Validated>  — acyclic, input-closed, impacts derived.
//! ```
//!
//! This prevents the search strategies from ever receiving an unchecked
//! graph. The transition consumes the old state and returns the new one, so
//! there is zero runtime cost — the marker types are `PhantomData` (ZST).

use crate::{GraphError, Node};
use std::collections::{BTreeMap, BTreeSet, VecDeque};
use std::fmt;

// ── Type-state markers ─────────────────────────────────────────────

/// Marker: specs have been loaded but not validated.
#[derive(Debug, Clone)]
pub struct Loaded;

/// Marker: the graph has been validated and is ready for scheduling.
#[derive(Debug, Clone)]
pub struct Validated;

/// Sealed trait for problem states.
pub trait ProblemState: fmt::Debug + Clone {}
impl ProblemState for Loaded {}
impl ProblemState for Validated {}

// ── Problem ────────────────────────────────────────────────────────

/// The immutable description of one scheduling problem.
///
/// The generic parameter `S` encodes the validation state at compile time.
/// All search strategies take `&Problem<Validated>` and share it by
/// reference; nothing in the core ever mutates a validated problem.
#[derive(Debug, Clone)]
pub struct Problem<S: ProblemState = Loaded> {
    /// Hard peak-memory ceiling for any feasible schedule.
    total_memory: u64,
    /// Specs in parse order; moved into `nodes` during validation.
    specs: Vec<Node>,
    /// Node map keyed by name (populated by `validate`).
    nodes: BTreeMap<String, Node>,
    /// Node names in parse order (populated by `validate`).
    order: Vec<String>,
    /// `input name → set of consumer names` (populated by `validate`).
    dependencies: BTreeMap<String, BTreeSet<String>>,
    /// `node name → consumers in parse order` (populated by `validate`).
    successors: BTreeMap<String, Vec<String>>,
    /// State marker (zero-sized, compile-time only).
    _state: std::marker::PhantomData<S>,
}

// ── Loaded state ───────────────────────────────────────────────────

impl Problem<Loaded> {
    /// Creates a new problem in the `Loaded` state from parsed specs.
    pub fn new(total_memory: u64, specs: Vec<Node>) -> Self {
        Self {
            total_memory,
            specs,
            nodes: BTreeMap::new(),
            order: Vec::new(),
            dependencies: BTreeMap::new(),
            successors: BTreeMap::new(),
            _state: std::marker::PhantomData,
        }
    }

    /// Validates the problem and transitions to the `Validated` state.
    ///
    /// # Checks
    /// - The graph is non-empty and the budget is positive.
    /// - Node names are unique.
    /// - Every input name resolves to a node in the graph.
    /// - The graph is acyclic (Kahn reachability covers all nodes).
    ///
    /// On success the consumer/successor maps are built and each node's
    /// static impact is derived with the sole-consumer rule.
    pub fn validate(self) -> Result<Problem<Validated>, GraphError> {
        if self.specs.is_empty() {
            return Err(GraphError::EmptyGraph);
        }
        if self.total_memory == 0 {
            return Err(GraphError::InvalidBudget {
                budget: self.total_memory,
            });
        }

        let mut nodes = BTreeMap::new();
        let mut order = Vec::with_capacity(self.specs.len());
        for spec in self.specs {
            if nodes.contains_key(&spec.name) {
                return Err(GraphError::DuplicateNode { name: spec.name });
            }
            order.push(spec.name.clone());
            nodes.insert(spec.name.clone(), spec);
        }

        // Build `dependencies` (input → consumers) and `successors`
        // (node → consumers, parse order), checking input closure.
        let mut dependencies: BTreeMap<String, BTreeSet<String>> = BTreeMap::new();
        let mut successors: BTreeMap<String, Vec<String>> = BTreeMap::new();
        for name in &order {
            successors.entry(name.clone()).or_default();
        }
        for name in &order {
            let node = &nodes[name];
            for input in &node.inputs {
                if !nodes.contains_key(input) {
                    return Err(GraphError::UnknownInput {
                        node: name.clone(),
                        input: input.clone(),
                    });
                }
                dependencies
                    .entry(input.clone())
                    .or_default()
                    .insert(name.clone());
                successors
                    .entry(input.clone())
                    .or_default()
                    .push(name.clone());
            }
        }

        // Kahn reachability: every node must appear in a topological order.
        let mut indegree: BTreeMap<&str, usize> = order
            .iter()
            .map(|n| (n.as_str(), nodes[n].inputs.len()))
            .collect();
        let mut queue: VecDeque<&str> = order
            .iter()
            .filter(|n| indegree[n.as_str()] == 0)
            .map(|n| n.as_str())
            .collect();
        let mut reached = 0usize;
        while let Some(u) = queue.pop_front() {
            reached += 1;
            for v in &successors[u] {
                let d = indegree.get_mut(v.as_str()).expect("successor is a node");
                *d -= 1;
                if *d == 0 {
                    queue.push_back(v.as_str());
                }
            }
        }
        if reached != order.len() {
            return Err(GraphError::Cyclic {
                unreached: order.len() - reached,
            });
        }

        // Derive static impacts with the sole-consumer rule:
        // impact(v) = output_mem(v) − Σ output_mem(u) over inputs u whose
        // only consumer is v.
        let impacts: Vec<(String, i64)> = order
            .iter()
            .map(|name| {
                let node = &nodes[name];
                let unique_inputs: BTreeSet<&String> = node.inputs.iter().collect();
                let freed: i64 = unique_inputs
                    .iter()
                    .filter(|u| {
                        dependencies
                            .get(u.as_str())
                            .is_some_and(|cs| cs.len() == 1 && cs.contains(name))
                    })
                    .map(|u| nodes[u.as_str()].output_mem as i64)
                    .sum();
                (name.clone(), node.output_mem as i64 - freed)
            })
            .collect();
        for (name, impact) in impacts {
            nodes
                .get_mut(&name)
                .expect("impact target is a node")
                .set_impact(impact);
        }

        tracing::debug!(
            nodes = order.len(),
            total_memory = self.total_memory,
            "problem validated"
        );

        Ok(Problem {
            total_memory: self.total_memory,
            specs: Vec::new(),
            nodes,
            order,
            dependencies,
            successors,
            _state: std::marker::PhantomData,
        })
    }
}

// ── Validated state ────────────────────────────────────────────────

impl Problem<Validated> {
    /// Returns the hard memory budget.
    pub fn total_memory(&self) -> u64 {
        self.total_memory
    }

    /// Returns the number of nodes.
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Returns `true` if the problem has no nodes (never true after
    /// validation, but keeps clippy and callers honest).
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Returns a node by name.
    pub fn node(&self, name: &str) -> Option<&Node> {
        self.nodes.get(name)
    }

    /// Iterates over the nodes in parse order.
    pub fn iter_nodes(&self) -> impl Iterator<Item = &Node> {
        self.order.iter().map(|n| &self.nodes[n])
    }

    /// Returns the set of consumers of `name`'s output, if any.
    pub fn consumers_of(&self, name: &str) -> Option<&BTreeSet<String>> {
        self.dependencies.get(name)
    }

    /// Returns `name`'s consumers in parse order (empty for sinks).
    pub fn successors_of(&self, name: &str) -> &[String] {
        self.successors
            .get(name)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Returns a node whose intrinsic peak alone exceeds the budget, if one
    /// exists. Such a problem has no feasible schedule at all.
    pub fn infeasible_node(&self) -> Option<&Node> {
        self.iter_nodes().find(|n| n.peak() > self.total_memory)
    }

    /// Returns a human-readable summary of the problem.
    pub fn summary(&self) -> String {
        let edges: usize = self.iter_nodes().map(|n| n.inputs.len()).sum();
        format!(
            "Problem: {} nodes, {} edges, memory limit {}",
            self.len(),
            edges,
            self.total_memory,
        )
    }
}

impl<S: ProblemState> fmt::Display for Problem<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Problem ({} nodes, limit={}):",
            self.order.len().max(self.specs.len()),
            self.total_memory,
        )?;
        let nodes: Vec<&Node> = if self.order.is_empty() {
            self.specs.iter().collect()
        } else {
            self.order.iter().map(|n| &self.nodes[n]).collect()
        };
        for node in nodes {
            writeln!(f, "  {}", node.summary())?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node(name: &str, inputs: &[&str], out: u64) -> Node {
        Node::new(
            name,
            inputs.iter().map(|s| s.to_string()).collect(),
            0,
            out,
            1,
        )
    }

    fn diamond() -> Vec<Node> {
        vec![
            node("a", &[], 10),
            node("b", &["a"], 10),
            node("c", &["a"], 10),
            node("d", &["b", "c"], 10),
        ]
    }

    #[test]
    fn test_validate_ok() {
        let p = Problem::new(100, diamond()).validate().unwrap();
        assert_eq!(p.len(), 4);
        assert_eq!(p.total_memory(), 100);
    }

    #[test]
    fn test_validate_empty() {
        assert!(matches!(
            Problem::new(100, vec![]).validate(),
            Err(GraphError::EmptyGraph)
        ));
    }

    #[test]
    fn test_validate_zero_budget() {
        assert!(matches!(
            Problem::new(0, diamond()).validate(),
            Err(GraphError::InvalidBudget { .. })
        ));
    }

    #[test]
    fn test_validate_duplicate_name() {
        let specs = vec![node("a", &[], 1), node("a", &[], 2)];
        assert!(matches!(
            Problem::new(10, specs).validate(),
            Err(GraphError::DuplicateNode { .. })
        ));
    }

    #[test]
    fn test_validate_unknown_input() {
        let specs = vec![node("a", &["ghost"], 1)];
        assert!(matches!(
            Problem::new(10, specs).validate(),
            Err(GraphError::UnknownInput { .. })
        ));
    }

    #[test]
    fn test_validate_cycle() {
        let specs = vec![node("a", &["b"], 1), node("b", &["a"], 1)];
        assert!(matches!(
            Problem::new(10, specs).validate(),
            Err(GraphError::Cyclic { unreached: 2 })
        ));
    }

    #[test]
    fn test_consumer_maps() {
        let p = Problem::new(100, diamond()).validate().unwrap();
        let a_consumers = p.consumers_of("a").unwrap();
        assert_eq!(a_consumers.len(), 2);
        assert!(a_consumers.contains("b") && a_consumers.contains("c"));
        assert_eq!(p.successors_of("a"), &["b".to_string(), "c".to_string()]);
        assert!(p.consumers_of("d").is_none());
        assert!(p.successors_of("d").is_empty());
    }

    #[test]
    fn test_static_impact_sole_consumer() {
        // b is the sole consumer of nothing (a feeds both b and c), so its
        // impact stays at output_mem. d is the sole consumer of both b and
        // c, so its impact is 10 − (10 + 10) = −10.
        let p = Problem::new(100, diamond()).validate().unwrap();
        assert_eq!(p.node("b").unwrap().impact(), 10);
        assert_eq!(p.node("c").unwrap().impact(), 10);
        assert_eq!(p.node("d").unwrap().impact(), -10);
    }

    #[test]
    fn test_static_impact_chain() {
        let specs = vec![node("a", &[], 20), node("b", &["a"], 5)];
        let p = Problem::new(100, specs).validate().unwrap();
        assert_eq!(p.node("a").unwrap().impact(), 20);
        assert_eq!(p.node("b").unwrap().impact(), 5 - 20);
    }

    #[test]
    fn test_infeasible_node() {
        let specs = vec![Node::new("huge", vec![], 1000, 0, 1)];
        let p = Problem::new(500, specs).validate().unwrap();
        assert_eq!(p.infeasible_node().unwrap().name, "huge");

        let p = Problem::new(100, diamond()).validate().unwrap();
        assert!(p.infeasible_node().is_none());
    }

    #[test]
    fn test_summary() {
        let p = Problem::new(100, diamond()).validate().unwrap();
        let s = p.summary();
        assert!(s.contains("4 nodes"));
        assert!(s.contains("4 edges"));
        assert!(s.contains("100"));
    }

    #[test]
    fn test_display_lists_nodes() {
        let p = Problem::new(100, diamond()).validate().unwrap();
        let shown = format!("{p}");
        assert!(shown.contains("a (run_mem"));
        assert!(shown.contains("d (run_mem"));
    }
}
