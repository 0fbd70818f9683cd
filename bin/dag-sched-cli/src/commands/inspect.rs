// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! `dag-sched inspect`: print the parsed problem.

use super::{load_problem, EXIT_OK};
use std::path::Path;

pub fn execute(input: &Path) -> u8 {
    let problem = match load_problem(input) {
        Ok(p) => p,
        Err(failure) => {
            failure.report(input);
            return failure.exit_code();
        }
    };

    println!("{}", problem.summary());
    println!();
    println!("Nodes:");
    for node in problem.iter_nodes() {
        println!(
            "  {} — peak {}, static impact {}",
            node.summary(),
            node.peak(),
            node.impact(),
        );
    }

    let sinks: Vec<&str> = problem
        .iter_nodes()
        .filter(|n| problem.successors_of(&n.name).is_empty())
        .map(|n| n.name.as_str())
        .collect();
    println!();
    println!("Sinks: {}", if sinks.is_empty() { "-".into() } else { sinks.join(", ") });

    if let Some(node) = problem.infeasible_node() {
        println!(
            "WARNING: node '{}' needs {} bytes alone; budget is {}",
            node.name,
            node.peak(),
            problem.total_memory(),
        );
    }
    EXIT_OK
}
