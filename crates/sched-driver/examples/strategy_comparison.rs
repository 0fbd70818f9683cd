// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Example: compare search strategies on a synthetic layered DAG.
//!
//! Demonstrates the core trade-off of the scheduler: under a tight budget
//! only the spill/recompute-capable search survives, while under a loose
//! budget the cheap linear strategies match it at a fraction of the cost.
//!
//! ```bash
//! cargo run -p sched-driver --example strategy_comparison
//! ```

use dataflow_ir::{Node, Problem, Validated};
use sched_search::{BeamSearch, BoundedDfs, DpGreedy, Greedy, Heuristic, Strategy};

fn main() {
    tracing_subscriber::fmt().with_env_filter("info").init();

    let budgets = [60u64, 120, 1_000];

    println!(
        "{:<14} {:>8} {:>10} {:>10} {:>8} {:>10}",
        "Strategy", "Budget", "Complete", "Time", "Peak", "Recomputed",
    );
    println!("{}", "-".repeat(66));

    for budget in budgets {
        let problem = build_problem(budget);
        let strategies: Vec<Box<dyn Strategy>> = vec![
            Box::new(BoundedDfs::new(100_000, 1.0)),
            Box::new(Heuristic::new()),
            Box::new(DpGreedy::default()),
            Box::new(BeamSearch::new(16, 100_000)),
            Box::new(Greedy::new()),
        ];
        for strategy in &strategies {
            let s = strategy.run(&problem);
            let complete = s.is_complete(&problem) && s.is_feasible(budget);
            println!(
                "{:<14} {:>8} {:>10} {:>10} {:>8} {:>10}",
                strategy.name(),
                budget,
                if complete { "yes" } else { "no" },
                s.total_time,
                s.memory_peak,
                s.recompute_count(),
            );
        }
        println!();
    }
}

/// Two wide producer fan-outs feeding reductions, sized so the smallest
/// budget forces recomputation.
fn build_problem(budget: u64) -> Problem<Validated> {
    let node = |name: &str, inputs: &[&str], run: u64, out: u64, time: u64| {
        Node::new(
            name,
            inputs.iter().map(|s| s.to_string()).collect(),
            run,
            out,
            time,
        )
    };
    let specs = vec![
        node("src", &[], 0, 50, 2),
        node("p1", &["src"], 5, 10, 1),
        node("p2", &["src"], 5, 10, 1),
        node("p3", &["src"], 5, 10, 1),
        node("r1", &["p1", "p2"], 0, 5, 1),
        node("r2", &["p3"], 0, 5, 1),
        node("late", &["src"], 0, 5, 1),
        node("sink", &["r1", "r2", "late"], 0, 1, 1),
    ];
    Problem::new(budget, specs).validate().unwrap()
}
