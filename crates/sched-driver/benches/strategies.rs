// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Benchmarks comparing the search strategies on a synthetic layered DAG.

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use dataflow_ir::{Node, Problem, Validated};
use sched_search::{BeamSearch, BoundedDfs, DpGreedy, Greedy, Heuristic, Strategy};

/// Builds a layered DAG: `layers × width` nodes, each layer fully
/// connected to the previous one.
fn layered_problem(layers: usize, width: usize, budget: u64) -> Problem<Validated> {
    let mut specs = Vec::with_capacity(layers * width);
    for layer in 0..layers {
        for slot in 0..width {
            let inputs: Vec<String> = if layer == 0 {
                Vec::new()
            } else {
                (0..width).map(|p| format!("l{}s{p}", layer - 1)).collect()
            };
            specs.push(Node::new(
                format!("l{layer}s{slot}"),
                inputs,
                (slot as u64 + 1) * 2,
                6 + slot as u64,
                1 + (layer + slot) as u64 % 5,
            ));
        }
    }
    Problem::new(budget, specs).validate().unwrap()
}

fn bench_strategies(c: &mut Criterion) {
    let problem = layered_problem(8, 4, 5_000);
    let strategies: Vec<Box<dyn Strategy>> = vec![
        Box::new(BoundedDfs::new(5_000, 0.5)),
        Box::new(Heuristic::new()),
        Box::new(DpGreedy::default()),
        Box::new(BeamSearch::new(16, 5_000)),
        Box::new(Greedy::new()),
    ];

    let mut group = c.benchmark_group("layered_8x4");
    for strategy in &strategies {
        group.bench_with_input(
            BenchmarkId::from_parameter(strategy.name()),
            strategy,
            |b, strategy| b.iter(|| strategy.run(&problem)),
        );
    }
    group.finish();
}

fn bench_graph_sizes(c: &mut Criterion) {
    let mut group = c.benchmark_group("greedy_scaling");
    for layers in [4usize, 8, 16] {
        let problem = layered_problem(layers, 4, 100_000);
        group.bench_with_input(
            BenchmarkId::from_parameter(layers),
            &problem,
            |b, problem| b.iter(|| Greedy::new().run(problem)),
        );
    }
    group.finish();
}

criterion_group!(benches, bench_strategies, bench_graph_sizes);
criterion_main!(benches);
