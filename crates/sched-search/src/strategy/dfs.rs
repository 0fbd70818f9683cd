// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Bounded depth-first search with spill and recomputation.
//!
//! The primary strategy. Explores orderings of the partially ordered node
//! set under the memory-accounting model, extended with two escape hatches
//! the linear strategies lack:
//!
//! - **Recomputation**: when nothing is compute-ready, a node whose output
//!   was dropped but is still needed may run again (paying its time cost).
//! - **Spill**: when every candidate would breach the budget, one resident
//!   output is evicted and the expansion retried once.
//!
//! Each expansion point garbage-collects dead outputs, prunes the candidate
//! list with the negative-impact rule, and hard-rejects candidates whose
//! predicted peak exceeds the budget — so every completed leaf is feasible
//! by construction. Two cooperative budgets (expansion counter, wall-clock
//! deadline) bound the search; on exhaustion the best leaf found so far is
//! returned.
//!
//! # When to use
//! - Always first: the only strategy that can trade time for memory, and
//!   the only one that backtracks.

use crate::strategy::{rank, Strategy};
use dataflow_ir::{Node, Problem, Validated};
use sched_core::{
    collect_garbage, compute_ready, execute, prune_negative_impact, recompute_candidates,
    spill, spill_victim, ScheduleState, SearchBudget,
};

/// Depth-first search bounded by expansions and a deadline.
#[derive(Debug, Clone)]
pub struct BoundedDfs {
    /// Expansion cap; `0` selects the sched-core default.
    pub max_expansions: u64,
    /// Wall-clock limit in seconds; non-positive selects the default.
    pub time_limit_seconds: f64,
}

/// Counters describing one bounded-DFS run.
#[derive(Debug, Clone, Copy, Default)]
pub struct DfsStats {
    /// Transitions executed (expansion budget consumed).
    pub expansions: u64,
    /// Branches abandoned with no candidate left.
    pub dead_ends: u64,
    /// Evictions performed to unblock an expansion.
    pub spills: u64,
    /// Times a completed leaf replaced the incumbent best.
    pub best_updates: u64,
}

impl BoundedDfs {
    pub fn new(max_expansions: u64, time_limit_seconds: f64) -> Self {
        Self {
            max_expansions,
            time_limit_seconds,
        }
    }

    /// Runs the search, returning the best feasible complete schedule found
    /// (the empty state if none) together with run counters.
    ///
    /// The tree is walked pre-order with an explicit frame stack: recursion
    /// depth equals schedule length, which under spill/recompute churn can
    /// reach the expansion budget and must not live on the call stack.
    pub fn search(&self, problem: &Problem<Validated>) -> (ScheduleState, DfsStats) {
        let mut budget = SearchBudget::new(self.max_expansions, self.time_limit_seconds);
        let mut best: Option<ScheduleState> = None;
        let mut stats = DfsStats::default();

        let mut stack: Vec<Frame> = Vec::new();
        if let Some(frame) = Frame::expand(problem, ScheduleState::new(), &mut stats) {
            stack.push(frame);
        }

        'search: while let Some(frame) = stack.last_mut() {
            let Some(node) = frame.candidates.get(frame.next).copied() else {
                stack.pop();
                continue;
            };
            frame.next += 1;

            if budget.exhausted() {
                break 'search;
            }
            let next = execute(problem, &frame.state, node);
            budget.charge();

            if next.is_complete(problem) {
                let feasible = next.is_feasible(problem.total_memory());
                let better = match &best {
                    None => feasible,
                    Some(incumbent) => next.is_better_than(incumbent, problem.total_memory()),
                };
                if feasible && better {
                    stats.best_updates += 1;
                    best = Some(next);
                }
                continue;
            }
            if let Some(frame) = Frame::expand(problem, next, &mut stats) {
                stack.push(frame);
            }
        }

        stats.expansions = budget.expansions_used();
        tracing::debug!(
            expansions = stats.expansions,
            dead_ends = stats.dead_ends,
            spills = stats.spills,
            found = best.is_some(),
            "bounded DFS finished"
        );
        (best.unwrap_or_default(), stats)
    }
}

impl Strategy for BoundedDfs {
    fn name(&self) -> &str {
        "bounded-dfs"
    }

    fn run(&self, problem: &Problem<Validated>) -> ScheduleState {
        self.search(problem).0
    }
}

/// One expansion point: a state plus its remaining untried candidates.
struct Frame<'a> {
    state: ScheduleState,
    candidates: Vec<&'a Node>,
    next: usize,
}

impl<'a> Frame<'a> {
    /// Prepares a state for expansion: garbage-collect, enumerate
    /// compute-ready candidates (falling back to recompute candidates),
    /// prune, rank, and drop everything that breaches the budget. When
    /// nothing survives, one spill is attempted and the enumeration
    /// retried; a second failure is a dead end (`None`).
    fn expand(
        problem: &'a Problem<Validated>,
        mut state: ScheduleState,
        stats: &mut DfsStats,
    ) -> Option<Self> {
        collect_garbage(problem, &mut state);

        let mut spilled = false;
        loop {
            let mut candidates = compute_ready(problem, &state);
            if candidates.is_empty() {
                candidates = recompute_candidates(problem, &state);
            }
            let candidates = prune_negative_impact(problem, &state, candidates);
            let fitting: Vec<&Node> = rank(&state, candidates)
                .into_iter()
                .filter(|s| s.predicted_peak <= problem.total_memory())
                .map(|s| s.node)
                .collect();
            if !fitting.is_empty() {
                return Some(Frame {
                    state,
                    candidates: fitting,
                    next: 0,
                });
            }
            if spilled {
                stats.dead_ends += 1;
                return None;
            }
            let Some(victim) = spill_victim(problem, &state) else {
                stats.dead_ends += 1;
                return None;
            };
            spill(&mut state, &victim);
            stats.spills += 1;
            spilled = true;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dataflow_ir::Node;

    fn node(name: &str, inputs: &[&str], run: u64, out: u64, time: u64) -> Node {
        Node::new(
            name,
            inputs.iter().map(|s| s.to_string()).collect(),
            run,
            out,
            time,
        )
    }

    fn dfs_default() -> BoundedDfs {
        BoundedDfs::new(200_000, 2.0)
    }

    #[test]
    fn test_dfs_linear_chain() {
        let specs = vec![
            node("a", &[], 0, 10, 1),
            node("b", &["a"], 0, 10, 1),
            node("c", &["b"], 0, 10, 1),
            node("d", &["c"], 0, 10, 1),
        ];
        let p = Problem::new(100, specs).validate().unwrap();
        let (s, stats) = dfs_default().search(&p);
        assert!(s.is_complete(&p));
        assert!(s.is_feasible(100));
        assert_eq!(s.total_time, 4);
        assert!(stats.expansions >= 4);
    }

    #[test]
    fn test_dfs_diamond_budget_exact() {
        let specs = vec![
            node("a", &[], 0, 10, 1),
            node("b", &["a"], 0, 10, 1),
            node("c", &["a"], 0, 10, 1),
            node("d", &["b", "c"], 0, 10, 1),
        ];
        let p = Problem::new(30, specs).validate().unwrap();
        let (s, _) = dfs_default().search(&p);
        assert!(s.is_complete(&p));
        assert_eq!(s.memory_peak, 30);
        assert_eq!(s.total_time, 4);
        assert_eq!(s.execution_order[0], "a");
        assert_eq!(s.execution_order[3], "d");
    }

    #[test]
    fn test_dfs_forces_recomputation() {
        // A's output must be dropped to fit the siblings and rebuilt for F.
        let specs = vec![
            node("a", &[], 0, 20, 1),
            node("b", &["a"], 0, 5, 1),
            node("c", &["a"], 0, 5, 1),
            node("d", &["b"], 0, 5, 1),
            node("e", &["c"], 0, 5, 1),
            node("f", &["a"], 0, 5, 1),
        ];
        let p = Problem::new(25, specs).validate().unwrap();
        let (s, stats) = dfs_default().search(&p);
        assert!(s.is_complete(&p));
        assert!(s.is_feasible(25));
        assert_eq!(s.recompute_count(), 1);
        let a_runs = s.execution_order.iter().filter(|n| *n == "a").count();
        assert_eq!(a_runs, 2);
        assert!(stats.spills > 0);
    }

    #[test]
    fn test_dfs_is_deterministic() {
        let specs = vec![
            node("src", &[], 0, 30, 2),
            node("x", &["src"], 5, 5, 1),
            node("y", &["src"], 5, 5, 1),
            node("z", &[], 10, 10, 3),
            node("sink", &["x", "y", "z"], 0, 1, 1),
        ];
        let p = Problem::new(100, specs).validate().unwrap();
        let (first, _) = dfs_default().search(&p);
        let (second, _) = dfs_default().search(&p);
        assert_eq!(first.execution_order, second.execution_order);
        assert_eq!(first.recompute_flags, second.recompute_flags);
        assert_eq!(first.total_time, second.total_time);
        assert_eq!(first.memory_peak, second.memory_peak);
    }

    #[test]
    fn test_dfs_infeasible_returns_empty() {
        let specs = vec![node("huge", &[], 1000, 0, 1)];
        let p = Problem::new(500, specs).validate().unwrap();
        let (s, _) = dfs_default().search(&p);
        assert!(s.execution_order.is_empty());
        assert!(!s.is_complete(&p));
    }

    #[test]
    fn test_dfs_tight_budget_returns_partial_or_empty() {
        let specs: Vec<Node> = (0..20)
            .map(|i| {
                if i == 0 {
                    node("n0", &[], 0, 1, 1)
                } else {
                    let prev = format!("n{}", i - 1);
                    node(&format!("n{i}"), &[prev.as_str()], 0, 1, 1)
                }
            })
            .collect();
        let p = Problem::new(100, specs).validate().unwrap();
        let limited = BoundedDfs::new(5, 2.0);
        let (s, stats) = limited.search(&p);
        assert!(!s.is_complete(&p));
        assert!(stats.expansions <= 5);
    }

    #[test]
    fn test_dfs_prefers_lower_total_time() {
        // Both orders complete; the better one avoids recomputation, so the
        // returned schedule must be recompute-free here.
        let specs = vec![
            node("a", &[], 0, 10, 5),
            node("b", &["a"], 0, 10, 1),
            node("c", &["a"], 0, 10, 1),
            node("d", &["b", "c"], 0, 10, 1),
        ];
        let p = Problem::new(100, specs).validate().unwrap();
        let (s, _) = dfs_default().search(&p);
        assert!(s.is_complete(&p));
        assert_eq!(s.recompute_count(), 0);
        assert_eq!(s.total_time, 8);
    }
}
