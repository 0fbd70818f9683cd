// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Candidate enumeration and the negative-impact pruning rule.
//!
//! Two distinct notions of "ready" exist and are kept separate:
//!
//! - **Compute-ready**: a node not yet computed whose every input is
//!   currently resident. First-time execution.
//! - **Recompute candidate**: a node already computed whose output has been
//!   dropped, whose inputs are all resident again, and whose output some
//!   uncomputed consumer still needs.
//!
//! Readiness is defined over residency in `output_memory`, not membership
//! in `computed` — the only definition compatible with spill/recompute: a
//! consumer cannot run on an input that was computed once but evicted since.

use crate::{dynamic_impact, sequential_peak, ScheduleState};
use dataflow_ir::{Node, Problem, Validated};

/// Nodes eligible for first-time execution at `state`, in parse order.
pub fn compute_ready<'a>(
    problem: &'a Problem<Validated>,
    state: &ScheduleState,
) -> Vec<&'a Node> {
    problem
        .iter_nodes()
        .filter(|n| !state.computed.contains(&n.name))
        .filter(|n| n.inputs.iter().all(|i| state.is_resident(i)))
        .collect()
}

/// Nodes eligible for re-execution at `state`, in parse order.
///
/// A node qualifies when it has been computed before, its output is no
/// longer resident, every input is resident, and at least one consumer has
/// not run yet (so the output is still needed).
pub fn recompute_candidates<'a>(
    problem: &'a Problem<Validated>,
    state: &ScheduleState,
) -> Vec<&'a Node> {
    problem
        .iter_nodes()
        .filter(|n| state.computed.contains(&n.name))
        .filter(|n| !state.is_resident(&n.name))
        .filter(|n| n.inputs.iter().all(|i| state.is_resident(i)))
        .filter(|n| {
            problem
                .consumers_of(&n.name)
                .is_some_and(|cs| cs.iter().any(|c| !state.computed.contains(c)))
        })
        .collect()
}

/// Applies the negative-impact pruning rule to a candidate list.
///
/// Let `N` be the candidate with dynamic impact ≤ 0 and the smallest
/// intrinsic peak (name-tied). If none exists the list is unchanged. If
/// executing `N` would not raise the observed peak, `N` alone is returned:
/// a memory-freeing step that costs nothing is taken immediately. Otherwise
/// `N` survives together with every candidate whose intrinsic peak is
/// strictly smaller than `N`'s; should that leave nothing, the original
/// list is returned.
pub fn prune_negative_impact<'a>(
    problem: &Problem<Validated>,
    state: &ScheduleState,
    candidates: Vec<&'a Node>,
) -> Vec<&'a Node> {
    let best_negative = candidates
        .iter()
        .filter(|n| dynamic_impact(problem, state, n) <= 0)
        .min_by_key(|n| (n.peak(), n.name.as_str()))
        .copied();

    let Some(best) = best_negative else {
        return candidates;
    };

    if sequential_peak(state, best) <= state.memory_peak {
        return vec![best];
    }

    let pruned: Vec<&Node> = candidates
        .iter()
        .filter(|n| n.name == best.name || n.peak() < best.peak())
        .copied()
        .collect();
    if pruned.is_empty() {
        candidates
    } else {
        pruned
    }
}
