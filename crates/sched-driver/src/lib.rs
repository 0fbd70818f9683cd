// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! # sched-driver
//!
//! The portfolio driver that turns a validated [`dataflow_ir::Problem`]
//! into an accepted schedule.
//!
//! The driver runs the strongest affordable strategy first (bounded DFS
//! with spill and recomputation), replay-validates whatever comes back,
//! and walks a fixed fallback chain until something produces a complete
//! feasible schedule:
//!
//! ```text
//! bounded-dfs → heuristic → dp-greedy → beam-search → greedy
//! ```
//!
//! # Example
//! ```
//! use dataflow_ir::{parse_any, Problem};
//! use sched_driver::{schedule_with_debug, DebugOptions};
//!
//! let text = "total_memory: 100\nnode a 0 10 1 inputs=-\nnode b 0 10 1 inputs=a\n";
//! let (total_memory, specs) = parse_any(text).unwrap();
//! let problem = Problem::new(total_memory, specs).validate().unwrap();
//! let (schedule, stats) =
//!     schedule_with_debug(&problem, 10_000, 2.0, &DebugOptions::default()).unwrap();
//! assert!(schedule.is_complete(&problem));
//! println!("{}", stats.summary());
//! ```

mod config;
mod debug;
mod driver;
mod error;
mod validate;

pub use config::DriverConfig;
pub use debug::{DebugOptions, DebugStats};
pub use driver::{schedule_with_config, schedule_with_debug};
pub use error::DriverError;
pub use validate::{ensure_feasible, validate_schedule, ValidationError};
