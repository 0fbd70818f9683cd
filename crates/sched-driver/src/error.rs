// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Error types for the strategy driver.

/// Errors the driver can report to its caller.
///
/// Budget exhaustion is deliberately absent: a strategy that runs out of
/// budget returns its best partial result and the driver moves on to the
/// next fallback.
#[derive(Debug, thiserror::Error)]
pub enum DriverError {
    /// Some node cannot execute under the budget even on an empty memory.
    #[error(
        "problem is infeasible: node '{node}' needs {peak} bytes alone, budget is {budget}"
    )]
    Infeasible { node: String, peak: u64, budget: u64 },

    /// Every strategy in the portfolio failed to produce a feasible
    /// complete schedule.
    #[error("no feasible schedule found under memory limit")]
    NoSchedule,

    /// Configuration could not be read or is inconsistent.
    #[error("configuration error: {0}")]
    Config(String),
}
