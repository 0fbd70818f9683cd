// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Greedy scheduling strategy.
//!
//! Repeatedly executes the compute-ready candidate with the lowest
//! `(predicted_peak, time_cost)`, rejecting any candidate that would breach
//! the memory budget. Never spills, never recomputes.
//!
//! # When to use
//! - Last-resort fallback: linear-time, always terminates, and any complete
//!   schedule it returns is feasible by construction (every step was
//!   budget-checked).
//! - Baseline for the primary search's quality comparison.

use crate::strategy::{rank_fitting, Strategy};
use dataflow_ir::{Problem, Validated};
use sched_core::{compute_ready, execute, ScheduleState};

/// Lowest-predicted-peak-first scheduling; no spills, no recomputation.
#[derive(Debug, Clone, Default)]
pub struct Greedy;

impl Greedy {
    pub fn new() -> Self {
        Self
    }
}

impl Strategy for Greedy {
    fn name(&self) -> &str {
        "greedy"
    }

    fn run(&self, problem: &Problem<Validated>) -> ScheduleState {
        let mut state = ScheduleState::new();
        while !state.is_complete(problem) {
            let ranked = rank_fitting(problem, &state, compute_ready(problem, &state));
            let Some(choice) = ranked.first() else {
                tracing::debug!(
                    computed = state.computed.len(),
                    total = problem.len(),
                    "greedy stuck: no candidate fits the budget"
                );
                break;
            };
            state = execute(problem, &state, choice.node);
        }
        state
    }
}
