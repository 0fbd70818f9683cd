// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! The strategy portfolio driver.
//!
//! One primary search plus a fixed fallback chain:
//!
//! ```text
//! bounded-dfs → heuristic → dp-greedy → beam-search → greedy
//! ```
//!
//! The chain is declared as data (a list of strategy names resolved
//! through [`DriverConfig::create_strategy`]) rather than control flow, so
//! reordering or extending it is a one-line change and the tests can
//! enumerate it. Every candidate result is replay-validated before
//! acceptance; the first complete, feasible, structurally sound schedule
//! wins. Strategies never mix per-node — each runs to completion on the
//! full problem under its own budget.

use crate::validate::{acceptable, ensure_feasible};
use crate::{DebugOptions, DebugStats, DriverConfig, DriverError};
use dataflow_ir::{Problem, Validated};
use sched_core::ScheduleState;
use sched_search::BoundedDfs;
use std::time::Instant;

/// Fallback chain consulted, in order, when the primary search fails.
const FALLBACK_CHAIN: [&str; 4] = ["heuristic", "dp-greedy", "beam-search", "greedy"];

/// Runs the full portfolio with explicit limits.
///
/// Returns the accepted schedule and what the run did, or
/// [`DriverError::Infeasible`] / [`DriverError::NoSchedule`].
pub fn schedule_with_debug(
    problem: &Problem<Validated>,
    max_expansions: u64,
    time_limit_seconds: f64,
    opts: &DebugOptions,
) -> Result<(ScheduleState, DebugStats), DriverError> {
    let config = DriverConfig {
        max_expansions,
        time_limit_seconds,
        ..Default::default()
    };
    schedule_with_config(problem, &config, opts)
}

/// Runs the portfolio (or a single forced strategy) as configured.
pub fn schedule_with_config(
    problem: &Problem<Validated>,
    config: &DriverConfig,
    opts: &DebugOptions,
) -> Result<(ScheduleState, DebugStats), DriverError> {
    let started = Instant::now();
    ensure_feasible(problem)?;

    if let Some(forced) = &config.strategy {
        return run_forced(problem, config, forced, started);
    }

    // Primary: the bounded search, with its counters kept for diagnostics.
    let primary = BoundedDfs::new(config.max_expansions, config.time_limit_seconds);
    let (state, dfs_stats) = primary.search(problem);
    if opts.verbose {
        tracing::info!(
            strategy = "bounded-dfs",
            expansions = dfs_stats.expansions,
            complete = state.is_complete(problem),
            "primary search finished"
        );
    }
    if acceptable(problem, &state) {
        log_accepted(opts, "bounded-dfs", &state);
        let stats = make_stats("bounded-dfs", &state, &dfs_stats, 0, started);
        return Ok((state, stats));
    }

    for (tried, name) in FALLBACK_CHAIN.iter().enumerate() {
        let strategy = config
            .create_strategy(name)
            .expect("fallback chain names are valid");
        let state = strategy.run(problem);
        if opts.verbose {
            tracing::info!(
                strategy = name,
                complete = state.is_complete(problem),
                feasible = state.is_feasible(problem.total_memory()),
                "fallback finished"
            );
        }
        if acceptable(problem, &state) {
            log_accepted(opts, name, &state);
            let stats = make_stats(name, &state, &dfs_stats, tried as u32 + 1, started);
            return Ok((state, stats));
        }
    }

    tracing::debug!("portfolio exhausted without a feasible schedule");
    Err(DriverError::NoSchedule)
}

fn log_accepted(opts: &DebugOptions, strategy: &str, state: &ScheduleState) {
    if opts.trace {
        tracing::trace!(
            strategy,
            order = ?state.execution_order,
            "accepted schedule"
        );
    }
}

fn run_forced(
    problem: &Problem<Validated>,
    config: &DriverConfig,
    name: &str,
    started: Instant,
) -> Result<(ScheduleState, DebugStats), DriverError> {
    let strategy = config.create_strategy(name)?;
    let state = strategy.run(problem);
    if !acceptable(problem, &state) {
        return Err(DriverError::NoSchedule);
    }
    let stats = make_stats(
        strategy.name(),
        &state,
        &sched_search::DfsStats::default(),
        0,
        started,
    );
    Ok((state, stats))
}

fn make_stats(
    strategy: &str,
    state: &ScheduleState,
    dfs_stats: &sched_search::DfsStats,
    fallbacks_tried: u32,
    started: Instant,
) -> DebugStats {
    DebugStats {
        strategy: strategy.to_string(),
        expansions: dfs_stats.expansions,
        dead_ends: dfs_stats.dead_ends,
        spills: dfs_stats.spills,
        best_updates: dfs_stats.best_updates,
        fallbacks_tried,
        recomputed_steps: state.recompute_count(),
        elapsed: started.elapsed(),
    }
}
