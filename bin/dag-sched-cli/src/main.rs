// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! # dag-sched
//!
//! Command-line interface for the memory-bounded DAG scheduler.
//!
//! ## Usage
//! ```bash
//! # Compute a schedule
//! dag-sched schedule graph.txt --max-expansions 200000 --time-limit 2.0
//!
//! # Inspect a parsed problem
//! dag-sched inspect graph.txt
//!
//! # Topological baseline with naive accounting
//! dag-sched baseline graph.txt
//! ```
//!
//! ## Exit codes
//! `0` success · `1` open failure · `2` parse error · `3` no feasible
//! schedule (or structurally infeasible problem).

mod commands;

use clap::{Parser, Subcommand};
use std::process::ExitCode;

#[derive(Parser)]
#[command(
    name = "dag-sched",
    about = "Sequential scheduling of dataflow graphs under a peak-memory budget",
    version,
    author
)]
struct Cli {
    /// Raise the log level (repeat for more: -v, -vv).
    #[arg(short = 'v', action = clap::ArgAction::Count, global = true)]
    log_verbosity: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute an execution order under the memory budget.
    Schedule {
        /// Path to the input graph (examples or simple format).
        input: std::path::PathBuf,

        /// Per-strategy progress summaries on stderr.
        #[arg(long)]
        verbose: bool,

        /// Per-transition trace output on stderr.
        #[arg(long)]
        trace: bool,

        /// Expansion cap for the bounded search.
        #[arg(long)]
        max_expansions: Option<u64>,

        /// Wall-clock limit for the bounded search, in seconds.
        #[arg(long)]
        time_limit: Option<f64>,

        /// Beam width for the beam-search fallback.
        #[arg(long)]
        beam_width: Option<usize>,

        /// Lookahead depth for the DP fallback.
        #[arg(long)]
        dp_depth: Option<usize>,

        /// Branch factor for the DP fallback.
        #[arg(long)]
        dp_branch: Option<usize>,

        /// Force a single strategy instead of the portfolio.
        #[arg(long)]
        strategy: Option<String>,

        /// TOML configuration file; explicit flags override its values.
        #[arg(long)]
        config: Option<std::path::PathBuf>,
    },

    /// Print the parsed problem: budget, nodes, costs, and edges.
    Inspect {
        /// Path to the input graph.
        input: std::path::PathBuf,
    },

    /// Print a plain topological order with naive (no freeing) accounting.
    Baseline {
        /// Path to the input graph.
        input: std::path::PathBuf,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let (verbose_requested, trace_requested) = match &cli.command {
        Commands::Schedule { verbose, trace, .. } => (*verbose, *trace),
        _ => (false, false),
    };
    commands::init_tracing(cli.log_verbosity, verbose_requested, trace_requested);

    let code = match cli.command {
        Commands::Schedule {
            input,
            verbose,
            trace,
            max_expansions,
            time_limit,
            beam_width,
            dp_depth,
            dp_branch,
            strategy,
            config,
        } => commands::schedule::execute(commands::schedule::Args {
            input,
            verbose,
            trace,
            max_expansions,
            time_limit,
            beam_width,
            dp_depth,
            dp_branch,
            strategy,
            config,
        }),
        Commands::Inspect { input } => commands::inspect::execute(&input),
        Commands::Baseline { input } => commands::baseline::execute(&input),
    };
    ExitCode::from(code)
}
