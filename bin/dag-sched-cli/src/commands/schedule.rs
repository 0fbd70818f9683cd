// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! `dag-sched schedule`: run the portfolio driver and print the order.

use super::{load_problem, EXIT_NO_SCHEDULE, EXIT_OK};
use sched_driver::{schedule_with_config, DebugOptions, DriverConfig, DriverError};
use std::path::PathBuf;

/// Flags for the schedule subcommand; `None` means "keep the config-file
/// or default value".
pub struct Args {
    pub input: PathBuf,
    pub verbose: bool,
    pub trace: bool,
    pub max_expansions: Option<u64>,
    pub time_limit: Option<f64>,
    pub beam_width: Option<usize>,
    pub dp_depth: Option<usize>,
    pub dp_branch: Option<usize>,
    pub strategy: Option<String>,
    pub config: Option<PathBuf>,
}

pub fn execute(args: Args) -> u8 {
    let problem = match load_problem(&args.input) {
        Ok(p) => p,
        Err(failure) => {
            failure.report(&args.input);
            return failure.exit_code();
        }
    };
    tracing::info!("{}", problem.summary());

    let config = match build_config(&args) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("{e}");
            return EXIT_NO_SCHEDULE;
        }
    };
    let opts = DebugOptions {
        verbose: args.verbose,
        trace: args.trace,
    };

    match schedule_with_config(&problem, &config, &opts) {
        Ok((schedule, stats)) => {
            println!("Schedule (order):");
            let rendered: Vec<String> = schedule
                .execution_order
                .iter()
                .zip(&schedule.recompute_flags)
                .map(|(name, &recompute)| {
                    if recompute {
                        format!("{name}*")
                    } else {
                        name.clone()
                    }
                })
                .collect();
            println!("{}", rendered.join(" -> "));
            if schedule.recompute_count() > 0 {
                println!("* denotes recomputation");
            }
            println!("Total time: {}", schedule.total_time);
            println!(
                "Memory peak: {} (limit={})",
                schedule.memory_peak,
                problem.total_memory(),
            );
            if args.verbose {
                eprintln!("{}", stats.summary());
            }
            EXIT_OK
        }
        Err(e) => {
            eprintln!("{e}");
            EXIT_NO_SCHEDULE
        }
    }
}

/// Builds the driver config: file first (when given), explicit flags win.
fn build_config(args: &Args) -> Result<DriverConfig, DriverError> {
    let mut config = match &args.config {
        Some(path) => DriverConfig::from_file(path)?,
        None => DriverConfig::default(),
    };
    if let Some(v) = args.max_expansions {
        config.max_expansions = v;
    }
    if let Some(v) = args.time_limit {
        config.time_limit_seconds = v;
    }
    if let Some(v) = args.beam_width {
        config.beam_width = v;
    }
    if let Some(v) = args.dp_depth {
        config.dp_depth = v;
    }
    if let Some(v) = args.dp_branch {
        config.dp_branch = v;
    }
    if let Some(v) = &args.strategy {
        config.strategy = Some(v.clone());
    }
    Ok(config)
}
