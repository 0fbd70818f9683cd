// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Debug options and run statistics for the driver.

use std::time::Duration;

/// Knobs controlling how chatty a driver run is.
///
/// These gate extra `tracing` events; the subscriber installed by the
/// binary decides where they end up.
#[derive(Debug, Clone, Copy, Default)]
pub struct DebugOptions {
    /// Per-strategy progress and result summaries.
    pub verbose: bool,
    /// Per-transition events from the accounting layer.
    pub trace: bool,
}

/// What one driver run did, for diagnostics and benchmarking.
#[derive(Debug, Clone, serde::Serialize)]
pub struct DebugStats {
    /// Name of the strategy whose schedule was accepted.
    pub strategy: String,
    /// Transitions executed by the primary bounded search.
    pub expansions: u64,
    /// Branches the primary search abandoned.
    pub dead_ends: u64,
    /// Evictions the primary search performed.
    pub spills: u64,
    /// Times the primary search improved its incumbent.
    pub best_updates: u64,
    /// Fallback strategies consulted after the primary (0 if it won).
    pub fallbacks_tried: u32,
    /// Recomputed steps in the accepted schedule.
    pub recomputed_steps: usize,
    /// Wall-clock time for the whole driver run.
    pub elapsed: Duration,
}

impl DebugStats {
    /// Returns a human-readable summary suitable for CLI output.
    pub fn summary(&self) -> String {
        format!(
            "Driver: '{}' won after {} fallback(s); primary search: {} expansions, \
             {} dead ends, {} spills, {} best updates; {} recomputed step(s); {:.1}ms",
            self.strategy,
            self.fallbacks_tried,
            self.expansions,
            self.dead_ends,
            self.spills,
            self.best_updates,
            self.recomputed_steps,
            self.elapsed.as_secs_f64() * 1000.0,
        )
    }
}
