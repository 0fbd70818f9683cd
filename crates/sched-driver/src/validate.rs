// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Schedule validation by replay.
//!
//! A returned schedule is replayed step by step through the accounting
//! transition, checking the structural invariants a correct strategy can
//! never violate: parallel order/flag sequences, inputs resident before
//! every step, truthful recompute flags, exact time accounting, and
//! completeness. The driver replays every candidate result before
//! accepting it; the test-suite replays everything.
//!
//! The replay cannot reconstruct spill decisions, so resident-set and peak
//! bookkeeping are checked for internal consistency rather than equality
//! with the replayed run (a spill-free replay retains at least as much in
//! memory as the original run did).

use crate::DriverError;
use dataflow_ir::{Problem, Validated};
use sched_core::{execute, ScheduleState};

/// Defects a replay can find in a schedule.
#[derive(Debug, thiserror::Error)]
pub enum ValidationError {
    /// `execution_order` and `recompute_flags` differ in length.
    #[error("execution order has {order} step(s) but {flags} recompute flag(s)")]
    LengthMismatch { order: usize, flags: usize },

    /// A scheduled name does not exist in the problem.
    #[error("step {step}: unknown node '{name}'")]
    UnknownNode { step: usize, name: String },

    /// An input was not resident when its consumer ran.
    #[error("step {step}: input '{input}' of '{node}' not resident")]
    MissingInput {
        step: usize,
        node: String,
        input: String,
    },

    /// A step's recompute flag contradicts the execution history.
    #[error("step {step}: recompute flag for '{node}' should be {expected}")]
    FlagMismatch {
        step: usize,
        node: String,
        expected: bool,
    },

    /// `total_time` does not equal the sum of step costs.
    #[error("total time {actual} does not match summed step costs {expected}")]
    TimeMismatch { actual: u64, expected: u64 },

    /// The schedule misses at least one problem node.
    #[error("schedule is incomplete: {missing} node(s) never executed")]
    Incomplete { missing: usize },

    /// The claimed peak is below what any execution of this order must
    /// reach even with maximal freeing.
    #[error("claimed peak {claimed} is impossible for this order (minimum {minimum})")]
    PeakUnderstated { claimed: u64, minimum: u64 },
}

/// Replays `state` against `problem` and checks the structural invariants.
///
/// Returns `Ok(())` for a structurally sound complete schedule.
pub fn validate_schedule(
    problem: &Problem<Validated>,
    state: &ScheduleState,
) -> Result<(), ValidationError> {
    if state.execution_order.len() != state.recompute_flags.len() {
        return Err(ValidationError::LengthMismatch {
            order: state.execution_order.len(),
            flags: state.recompute_flags.len(),
        });
    }

    let mut replay = ScheduleState::new();
    let mut expected_time = 0u64;
    let mut minimum_peak = 0u64;

    for (step, name) in state.execution_order.iter().enumerate() {
        let Some(node) = problem.node(name) else {
            return Err(ValidationError::UnknownNode {
                step,
                name: name.clone(),
            });
        };

        // The real run may have held *less* in memory than the replay
        // (spills), never more, so replay residency is a sound upper bound
        // for checking input availability.
        for input in &node.inputs {
            if !replay.is_resident(input) {
                return Err(ValidationError::MissingInput {
                    step,
                    node: name.clone(),
                    input: input.clone(),
                });
            }
        }

        let expected_flag = replay.computed.contains(name);
        if state.recompute_flags[step] != expected_flag {
            return Err(ValidationError::FlagMismatch {
                step,
                node: name.clone(),
                expected: expected_flag,
            });
        }

        expected_time += node.time_cost;
        minimum_peak = minimum_peak.max(node.peak());
        replay = execute(problem, &replay, node);
    }

    if state.total_time != expected_time {
        return Err(ValidationError::TimeMismatch {
            actual: state.total_time,
            expected: expected_time,
        });
    }
    if state.memory_peak < minimum_peak {
        return Err(ValidationError::PeakUnderstated {
            claimed: state.memory_peak,
            minimum: minimum_peak,
        });
    }
    if replay.computed.len() != problem.len() {
        return Err(ValidationError::Incomplete {
            missing: problem.len() - replay.computed.len(),
        });
    }
    Ok(())
}

/// Driver-facing acceptance check: structurally sound, complete, and
/// within the budget.
pub(crate) fn acceptable(problem: &Problem<Validated>, state: &ScheduleState) -> bool {
    if !state.is_complete(problem) || !state.is_feasible(problem.total_memory()) {
        return false;
    }
    match validate_schedule(problem, state) {
        Ok(()) => true,
        Err(defect) => {
            tracing::warn!(%defect, "strategy returned a structurally invalid schedule");
            false
        }
    }
}

/// Convenience used by the binary: maps an up-front feasibility probe to
/// the driver error.
pub fn ensure_feasible(problem: &Problem<Validated>) -> Result<(), DriverError> {
    if let Some(node) = problem.infeasible_node() {
        return Err(DriverError::Infeasible {
            node: node.name.clone(),
            peak: node.peak(),
            budget: problem.total_memory(),
        });
    }
    Ok(())
}
