// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Node definitions for the dataflow IR.
//!
//! Each [`Node`] describes a single operator in the dataflow graph: its
//! scratch and output memory requirements, its time cost, and the names of
//! the operators it consumes. Input *data* is **not** stored here — only
//! names (keys into the [`crate::Problem`] node map). The scheduler resolves
//! inputs on demand through the problem's consumer maps.

/// A single operator in the dataflow graph.
///
/// Memory follows the produce-before-consume (PBC) model: while the operator
/// runs, its scratch memory and its output coexist, so the intrinsic
/// execution peak is `max(run_mem, output_mem)`.
///
/// All quantities are 64-bit; the large fixtures reach peaks in the tens of
/// billions.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Node {
    /// Unique identifier for this operator (e.g., `"conv1"`, `"MatMul"`).
    pub name: String,
    /// Names of the operators whose outputs this one consumes, in input order.
    pub inputs: Vec<String>,
    /// Scratch memory held only while the operator executes.
    pub run_mem: u64,
    /// Size of the produced artifact that stays live after execution.
    pub output_mem: u64,
    /// Time taken by one execution (recomputations pay it again).
    pub time_cost: u64,
    /// Static scheduling hint; see [`Node::impact`].
    impact: i64,
}

impl Node {
    /// Creates a node. The static impact starts at `output_mem` and is
    /// refined by [`crate::Problem::validate`] once the consumer maps exist.
    pub fn new(
        name: impl Into<String>,
        inputs: Vec<String>,
        run_mem: u64,
        output_mem: u64,
        time_cost: u64,
    ) -> Self {
        Self {
            name: name.into(),
            inputs,
            run_mem,
            output_mem,
            time_cost,
            impact: output_mem as i64,
        }
    }

    /// Intrinsic execution peak under the PBC model.
    pub fn peak(&self) -> u64 {
        self.run_mem.max(self.output_mem)
    }

    /// Static impact: `output_mem − Σ output_mem(u)` over inputs `u` for
    /// which this node is the sole consumer.
    ///
    /// A scheduling hint only — the authoritative value during search is the
    /// dynamic impact, which accounts for what is actually resident.
    pub fn impact(&self) -> i64 {
        self.impact
    }

    pub(crate) fn set_impact(&mut self, impact: i64) {
        self.impact = impact;
    }

    /// Returns a concise summary string for display.
    pub fn summary(&self) -> String {
        format!(
            "{} (run_mem: {}, output_mem: {}, time_cost: {}, inputs: {})",
            self.name,
            self.run_mem,
            self.output_mem,
            self.time_cost,
            if self.inputs.is_empty() {
                "-".to_string()
            } else {
                self.inputs.join(",")
            },
        )
    }
}

impl std::fmt::Display for Node {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.summary())
    }
}
