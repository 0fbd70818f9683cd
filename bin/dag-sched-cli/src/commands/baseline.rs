// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! `dag-sched baseline`: plain topological order with naive accounting.
//!
//! The baseline never frees anything, so its "peak" is simply the sum of
//! all outputs produced so far. Comparing it against the scheduler's
//! output shows what the freeing/spilling machinery buys.

use super::{load_problem, EXIT_OK};
use std::collections::VecDeque;
use std::path::Path;

pub fn execute(input: &Path) -> u8 {
    let problem = match load_problem(input) {
        Ok(p) => p,
        Err(failure) => {
            failure.report(input);
            return failure.exit_code();
        }
    };

    // Kahn's algorithm over the successor lists, seeded in parse order.
    let mut indegree: std::collections::BTreeMap<&str, usize> = problem
        .iter_nodes()
        .map(|n| (n.name.as_str(), n.inputs.len()))
        .collect();
    let mut queue: VecDeque<&str> = problem
        .iter_nodes()
        .filter(|n| n.inputs.is_empty())
        .map(|n| n.name.as_str())
        .collect();

    let mut order = Vec::with_capacity(problem.len());
    let mut total_time = 0u64;
    let mut current_memory = 0u64;
    let mut memory_peak = 0u64;

    while let Some(name) = queue.pop_front() {
        let node = problem.node(name).expect("queued name is a node");
        order.push(name);
        total_time += node.time_cost;
        current_memory += node.output_mem;
        memory_peak = memory_peak.max(current_memory);

        for consumer in problem.successors_of(name) {
            let d = indegree.get_mut(consumer.as_str()).expect("consumer is a node");
            *d -= 1;
            if *d == 0 {
                queue.push_back(consumer.as_str());
            }
        }
    }

    println!("Baseline schedule (topological):");
    println!("{}", order.join(" -> "));
    println!("Total time: {total_time}");
    println!("Naive memory peak (no freeing): {memory_peak}");
    EXIT_OK
}
