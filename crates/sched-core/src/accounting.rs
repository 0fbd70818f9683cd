// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Memory accounting: the state transition and its pure predictions.
//!
//! Everything the search strategies know about memory flows through four
//! functions:
//!
//! - [`sequential_peak`] — what executing a node now would push the peak to.
//! - [`dynamic_impact`] — the net memory delta of executing a node now.
//! - [`execute`] — the single authoritative transition `(state, node) → state'`.
//! - [`collect_garbage`] / [`spill_victim`] — dropping resident outputs,
//!   either dead ones for free or a live one to make room (paid for later by
//!   recomputation).
//!
//! The peak model stacks a node's intrinsic PBC peak on top of the memory
//! that is currently live: `max(memory_peak, node.peak() + current_memory)`.

use crate::ScheduleState;
use dataflow_ir::{Node, Problem, Validated};
use std::collections::BTreeSet;

/// Predicted peak if `node` were executed at `state`.
pub fn sequential_peak(state: &ScheduleState, node: &Node) -> u64 {
    state.memory_peak.max(node.peak() + state.current_memory)
}

/// Inputs of `node` that become dead once `node` completes: every consumer
/// of the input is computed in the hypothetical post-state (`node` counts
/// as computed). Inputs with no consumer entry at all are freeable.
///
/// Returns unique names; an input listed twice frees once.
pub fn freeable_inputs<'a>(
    problem: &Problem<Validated>,
    state: &ScheduleState,
    node: &'a Node,
) -> BTreeSet<&'a str> {
    let mut freeable = BTreeSet::new();
    for input in &node.inputs {
        let all_consumers_done = match problem.consumers_of(input) {
            None => true,
            Some(consumers) => consumers
                .iter()
                .all(|c| c == &node.name || state.computed.contains(c)),
        };
        if all_consumers_done {
            freeable.insert(input.as_str());
        }
    }
    freeable
}

/// Sum of resident sizes that executing `node` at `state` would free.
fn freed_sum(problem: &Problem<Validated>, state: &ScheduleState, node: &Node) -> u64 {
    freeable_inputs(problem, state, node)
        .iter()
        .filter_map(|name| state.output_memory.get(*name))
        .sum()
}

/// Net memory delta of executing `node` at `state`: `output_mem − freed`.
///
/// Computed non-destructively. The value is clamped to `i32` bounds so that
/// interface consumers on 32-bit paths cannot overflow; internally
/// everything stays 64-bit.
pub fn dynamic_impact(problem: &Problem<Validated>, state: &ScheduleState, node: &Node) -> i64 {
    let impact = node.output_mem as i64 - freed_sum(problem, state, node) as i64;
    impact.clamp(i32::MIN as i64, i32::MAX as i64)
}

/// Executes `node` at `state`, returning the successor state.
///
/// Steps: predict the peak, free the inputs that just became dead, account
/// the new output, charge the time cost, and record the step (flagged as a
/// recomputation if the node had already produced its output once).
pub fn execute(
    problem: &Problem<Validated>,
    state: &ScheduleState,
    node: &Node,
) -> ScheduleState {
    let mut next = state.clone();

    let predicted = sequential_peak(state, node);
    next.memory_peak = next.memory_peak.max(predicted);

    let mut freed = 0u64;
    for name in freeable_inputs(problem, state, node) {
        if let Some(size) = next.output_memory.remove(name) {
            freed += size;
        }
    }
    next.current_memory = (next.current_memory + node.output_mem).saturating_sub(freed);

    next.total_time += node.time_cost;

    let recompute = next.computed.contains(&node.name);
    next.output_memory.insert(node.name.clone(), node.output_mem);
    next.execution_order.push(node.name.clone());
    next.recompute_flags.push(recompute);
    next.computed.insert(node.name.clone());

    tracing::trace!(
        node = %node.name,
        recompute,
        freed,
        current = next.current_memory,
        peak = next.memory_peak,
        "executed"
    );

    next
}

/// Drops every resident output that no uncomputed consumer still needs.
///
/// Cost-free: reduces `current_memory`, never touches `total_time` or the
/// peak. Returns the number of bytes reclaimed.
pub fn collect_garbage(problem: &Problem<Validated>, state: &mut ScheduleState) -> u64 {
    let dead: Vec<String> = state
        .output_memory
        .keys()
        .filter(|name| {
            match problem.consumers_of(name) {
                None => true,
                Some(consumers) => consumers.iter().all(|c| state.computed.contains(c)),
            }
        })
        .cloned()
        .collect();

    let mut freed = 0u64;
    for name in dead {
        if let Some(size) = state.output_memory.remove(&name) {
            freed += size;
        }
    }
    state.current_memory = state.current_memory.saturating_sub(freed);
    if freed > 0 {
        tracing::trace!(freed, "garbage collected dead outputs");
    }
    freed
}

/// Chooses the resident output to evict when no candidate fits.
///
/// Preference order:
/// 1. among outputs some uncomputed consumer still needs, the one
///    maximising `size / max(1, time_cost(producer))` — cheap to rebuild,
///    big to hold;
/// 2. otherwise, the largest resident output.
///
/// Ties break on name so eviction is deterministic. Returns `None` when
/// nothing is resident. Dead outputs should have been garbage-collected
/// before asking for a victim.
pub fn spill_victim(problem: &Problem<Validated>, state: &ScheduleState) -> Option<String> {
    // Compare a/b vs c/d as a*d vs c*b in u128 to stay exact.
    let ratio_gt = |a: (u64, u64), b: (u64, u64)| -> bool {
        (a.0 as u128) * (b.1 as u128) > (b.0 as u128) * (a.1 as u128)
    };

    let mut best_live: Option<(&String, (u64, u64))> = None;
    for (name, &size) in &state.output_memory {
        let still_needed = problem
            .consumers_of(name)
            .is_some_and(|cs| cs.iter().any(|c| !state.computed.contains(c)));
        if !still_needed {
            continue;
        }
        let rebuild = problem.node(name).map_or(1, |n| n.time_cost.max(1));
        let score = (size, rebuild);
        match best_live {
            Some((_, best)) if !ratio_gt(score, best) => {}
            _ => best_live = Some((name, score)),
        }
    }
    if let Some((name, _)) = best_live {
        return Some(name.clone());
    }

    state
        .output_memory
        .iter()
        .max_by_key(|(name, size)| (**size, std::cmp::Reverse(name.as_str())))
        .map(|(name, _)| name.clone())
}

/// Evicts `victim` from residency, returning the bytes released.
///
/// Charges nothing: the cost surfaces later if the producer has to run
/// again. The victim stays in `computed`.
pub fn spill(state: &mut ScheduleState, victim: &str) -> u64 {
    let size = state.output_memory.remove(victim).unwrap_or(0);
    state.current_memory = state.current_memory.saturating_sub(size);
    tracing::trace!(victim, size, "spilled resident output");
    size
}
