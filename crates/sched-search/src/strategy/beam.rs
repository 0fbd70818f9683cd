// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Beam search strategy.
//!
//! Keeps at most `beam_width` partial schedules alive. Each round extends
//! every state in the beam by its best budget-fitting compute-ready
//! candidates, then keeps the `beam_width` most promising successors
//! (complete-and-feasible states first, then lower total time, then lower
//! peak). The beam cannot backtrack, but unlike greedy it carries several
//! competing prefixes at once, which rescues problems where the single
//! greedy prefix paints itself into a corner.
//!
//! # When to use
//! - Mid-size graphs where bounded DFS runs out of budget but a single
//!   greedy prefix is too brittle.

use crate::strategy::{rank_fitting, Strategy};
use dataflow_ir::{Problem, Validated};
use sched_core::{compute_ready, execute, ScheduleState, SearchBudget};

/// Default beam width, matching the binary's `--beam-width` default.
pub const DEFAULT_BEAM_WIDTH: usize = 64;

/// Fixed-width frontier search; no spills, no recomputation.
#[derive(Debug, Clone)]
pub struct BeamSearch {
    /// Maximum number of partial schedules kept per round.
    pub beam_width: usize,
    /// Expansion cap shared across the whole run; `0` selects the default.
    pub max_expansions: u64,
}

impl BeamSearch {
    pub fn new(beam_width: usize, max_expansions: u64) -> Self {
        Self {
            beam_width: beam_width.max(1),
            max_expansions,
        }
    }
}

impl Default for BeamSearch {
    fn default() -> Self {
        Self::new(DEFAULT_BEAM_WIDTH, 0)
    }
}

impl Strategy for BeamSearch {
    fn name(&self) -> &str {
        "beam-search"
    }

    fn run(&self, problem: &Problem<Validated>) -> ScheduleState {
        let mut budget = SearchBudget::expansions_only(self.max_expansions);
        let mut beam = vec![ScheduleState::new()];
        let mut best_complete: Option<ScheduleState> = None;

        loop {
            let mut successors: Vec<ScheduleState> = Vec::new();

            'states: for state in &beam {
                let ranked = rank_fitting(problem, state, compute_ready(problem, state));
                for scored in ranked.into_iter().take(self.beam_width) {
                    if budget.exhausted() {
                        break 'states;
                    }
                    let next = execute(problem, state, scored.node);
                    budget.charge();
                    if next.is_complete(problem) && next.is_feasible(problem.total_memory()) {
                        let better = best_complete
                            .as_ref()
                            .map_or(true, |b| next.is_better_than(b, problem.total_memory()));
                        if better {
                            best_complete = Some(next.clone());
                        }
                    }
                    successors.push(next);
                }
            }

            if successors.is_empty() {
                break;
            }

            // Complete feasible states first, then by time, then by peak.
            successors.sort_by_key(|s| {
                let done = s.is_complete(problem) && s.is_feasible(problem.total_memory());
                (!done, s.total_time, s.memory_peak)
            });
            successors.truncate(self.beam_width);
            beam = successors;

            if budget.exhausted() {
                break;
            }
        }

        if let Some(best) = best_complete {
            return best;
        }
        tracing::debug!(
            beam = beam.len(),
            "beam search ended without a complete schedule; returning best partial"
        );
        beam.into_iter().next().unwrap_or_default()
    }
}
