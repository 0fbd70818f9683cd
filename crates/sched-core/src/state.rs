// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! The evolving record of a partial or complete schedule.
//!
//! A [`ScheduleState`] is created empty and mutated only by the memory
//! accounting transition ([`crate::execute`]). Search strategies clone it at
//! branch points; there is never an aliased mutable state.
//!
//! # Invariants
//!
//! On any state reachable from the empty state:
//! - `current_memory` equals the sum of `output_memory` values.
//! - `memory_peak ≥ current_memory` and never decreases.
//! - `execution_order` and `recompute_flags` have equal length.
//! - a completed state has every problem node in `computed`.

use dataflow_ir::{Problem, Validated};
use std::collections::{BTreeMap, BTreeSet};

/// Mutable record of an execution being simulated.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize)]
pub struct ScheduleState {
    /// Node names in the order they were run (recomputations extend it).
    pub execution_order: Vec<String>,
    /// Parallel to `execution_order`; `true` at position `i` iff that step
    /// re-executed a node that had already produced its output once.
    pub recompute_flags: Vec<bool>,
    /// Sum of the sizes of all currently resident outputs.
    pub current_memory: u64,
    /// Highest predicted execution peak observed across all steps.
    pub memory_peak: u64,
    /// Sum of `time_cost` over every step, recomputations included.
    pub total_time: u64,
    /// Nodes that have produced their output at least once.
    pub computed: BTreeSet<String>,
    /// Currently resident outputs and their sizes. A name is present iff
    /// its artifact occupies live memory right now.
    pub output_memory: BTreeMap<String, u64>,
}

impl ScheduleState {
    /// Creates the initial empty state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of executed steps (≥ number of distinct computed nodes).
    pub fn steps(&self) -> usize {
        self.execution_order.len()
    }

    /// Returns `true` if `name`'s output is resident right now.
    pub fn is_resident(&self, name: &str) -> bool {
        self.output_memory.contains_key(name)
    }

    /// Returns `true` once every node of `problem` has been computed.
    pub fn is_complete(&self, problem: &Problem<Validated>) -> bool {
        self.computed.len() == problem.len()
    }

    /// Returns `true` if the observed peak fits within `total_memory`.
    pub fn is_feasible(&self, total_memory: u64) -> bool {
        self.memory_peak <= total_memory
    }

    /// Number of recomputation steps taken so far.
    pub fn recompute_count(&self) -> usize {
        self.recompute_flags.iter().filter(|&&f| f).count()
    }

    /// Lexicographic schedule comparison: feasibility dominates, then lower
    /// total time, then lower peak. Returns `true` if `self` is strictly
    /// better than `other` under the given budget.
    pub fn is_better_than(&self, other: &ScheduleState, total_memory: u64) -> bool {
        let self_valid = self.is_feasible(total_memory);
        let other_valid = other.is_feasible(total_memory);
        match (self_valid, other_valid) {
            (false, false) => false,
            (true, false) => true,
            (false, true) => false,
            (true, true) => {
                if self.total_time != other.total_time {
                    self.total_time < other.total_time
                } else {
                    self.memory_peak < other.memory_peak
                }
            }
        }
    }

    /// Returns a human-readable summary of the schedule so far.
    pub fn summary(&self) -> String {
        format!(
            "{} step(s) ({} recomputed), time {}, peak {}, resident {}",
            self.steps(),
            self.recompute_count(),
            self.total_time,
            self.memory_peak,
            self.current_memory,
        )
    }
}
