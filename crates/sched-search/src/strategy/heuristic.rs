// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Negative-impact-first heuristic strategy.
//!
//! Like [`crate::Greedy`], except that whenever a fitting compute-ready
//! candidate would shrink live memory (dynamic impact ≤ 0), the one with
//! the smallest intrinsic peak is taken first. Freeing memory early widens
//! the corridor for the heavy nodes that follow, which lets this strategy
//! finish problems greedy cannot.
//!
//! # When to use
//! - First fallback after the bounded search: same linear cost as greedy
//!   with strictly better behaviour on graphs with reduction nodes.

use crate::strategy::{rank_fitting, Strategy};
use dataflow_ir::{Problem, Validated};
use sched_core::{compute_ready, dynamic_impact, execute, ScheduleState};

/// Greedy with a preference for memory-shrinking candidates.
#[derive(Debug, Clone, Default)]
pub struct Heuristic;

impl Heuristic {
    pub fn new() -> Self {
        Self
    }
}

impl Strategy for Heuristic {
    fn name(&self) -> &str {
        "heuristic"
    }

    fn run(&self, problem: &Problem<Validated>) -> ScheduleState {
        let mut state = ScheduleState::new();
        while !state.is_complete(problem) {
            let ranked = rank_fitting(problem, &state, compute_ready(problem, &state));
            if ranked.is_empty() {
                tracing::debug!(
                    computed = state.computed.len(),
                    total = problem.len(),
                    "heuristic stuck: no candidate fits the budget"
                );
                break;
            }

            let shrinking = ranked
                .iter()
                .filter(|s| dynamic_impact(problem, &state, s.node) <= 0)
                .min_by_key(|s| (s.node.peak(), s.node.name.as_str()));

            let choice = match shrinking {
                Some(s) => s.node,
                None => ranked[0].node,
            };
            state = execute(problem, &state, choice);
        }
        state
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

    #[test]
    fn test_heuristic_takes_shrinking_candidate_first() {
        // "scratch" leaves nothing resident (impact 0) while "grow" adds 20.
        // Greedy ranks grow first (predicted peak 20 < 30); the heuristic
        // overrides with the non-growing scratch node.
        let specs = vec![
            node("scratch", &[], 30, 0, 1),
            node("grow", &[], 5, 20, 1),
            node("sink", &["scratch", "grow"], 0, 1, 1),
        ];
        let p = Problem::new(1000, specs).validate().unwrap();
        let s = Heuristic::new().run(&p);
        assert_eq!(s.execution_order[0], "scratch");
        assert!(s.is_complete(&p));

        let g = crate::Greedy::new().run(&p);
        assert_eq!(g.execution_order[0], "grow");
    }

    #[test]
    fn test_heuristic_matches_greedy_without_shrinkers() {
        let specs = vec![
            node("a", &[], 0, 10, 1),
            node("b", &["a"], 0, 10, 1),
            node("c", &["a"], 0, 10, 1),
            node("d", &["b", "c"], 0, 10, 1),
        ];
        let p = Problem::new(100, specs).validate().unwrap();
        let heuristic = Heuristic::new().run(&p);
        let greedy = crate::Greedy::new().run(&p);
        assert!(heuristic.is_complete(&p));
        assert_eq!(heuristic.total_time, greedy.total_time);
    }

    #[test]
    fn test_heuristic_respects_budget() {
        let specs = vec![node("a", &[], 0, 80, 1), node("b", &["a"], 80, 10, 1)];
        let p = Problem::new(100, specs).validate().unwrap();
        let s = Heuristic::new().run(&p);
        assert!(!s.is_complete(&p));
        assert!(s.is_feasible(p.total_memory()));
    }
}
