// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Driver configuration loaded from TOML files or constructed
//! programmatically.
//!
//! # TOML Format
//! ```toml
//! max_expansions = 200000
//! time_limit_seconds = 2.0
//! beam_width = 64
//! dp_depth = 3
//! dp_branch = 8
//! # strategy = "greedy"   # force a single strategy instead of the portfolio
//! ```

use crate::DriverError;
use sched_search::{BeamSearch, BoundedDfs, DpGreedy, Greedy, Heuristic, Strategy};
use std::path::Path;

/// Knobs for the driver and its strategies.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct DriverConfig {
    /// Expansion cap for the bounded strategies.
    #[serde(default = "default_max_expansions")]
    pub max_expansions: u64,
    /// Wall-clock limit for the primary search, in seconds.
    #[serde(default = "default_time_limit")]
    pub time_limit_seconds: f64,
    /// Beam width for the beam-search fallback.
    #[serde(default = "default_beam_width")]
    pub beam_width: usize,
    /// Lookahead depth for the DP fallback.
    #[serde(default = "default_dp_depth")]
    pub dp_depth: usize,
    /// Branch factor for the DP fallback.
    #[serde(default = "default_dp_branch")]
    pub dp_branch: usize,
    /// When set, run only this strategy instead of the portfolio.
    #[serde(default)]
    pub strategy: Option<String>,
}

fn default_max_expansions() -> u64 {
    200_000
}
fn default_time_limit() -> f64 {
    2.0
}
fn default_beam_width() -> usize {
    sched_search::DEFAULT_BEAM_WIDTH
}
fn default_dp_depth() -> usize {
    sched_search::DEFAULT_LOOKAHEAD_DEPTH
}
fn default_dp_branch() -> usize {
    sched_search::DEFAULT_BRANCH_FACTOR
}

impl Default for DriverConfig {
    fn default() -> Self {
        Self {
            max_expansions: default_max_expansions(),
            time_limit_seconds: default_time_limit(),
            beam_width: default_beam_width(),
            dp_depth: default_dp_depth(),
            dp_branch: default_dp_branch(),
            strategy: None,
        }
    }
}

impl DriverConfig {
    /// Loads configuration from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, DriverError> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            DriverError::Config(format!("cannot read config '{}': {e}", path.display()))
        })?;
        Self::from_toml(&content)
    }

    /// Parses configuration from a TOML string.
    pub fn from_toml(toml_str: &str) -> Result<Self, DriverError> {
        toml::from_str(toml_str)
            .map_err(|e| DriverError::Config(format!("TOML parse error: {e}")))
    }

    /// Serialises configuration to TOML.
    pub fn to_toml(&self) -> Result<String, DriverError> {
        toml::to_string_pretty(self)
            .map_err(|e| DriverError::Config(format!("TOML serialise error: {e}")))
    }

    /// Creates the strategy named by `name`, parameterised by this config.
    pub fn create_strategy(&self, name: &str) -> Result<Box<dyn Strategy>, DriverError> {
        match name.to_lowercase().as_str() {
            "bounded-dfs" | "dfs" => Ok(Box::new(BoundedDfs::new(
                self.max_expansions,
                self.time_limit_seconds,
            ))),
            "heuristic" => Ok(Box::new(Heuristic::new())),
            "dp-greedy" | "dp" => Ok(Box::new(DpGreedy::new(self.dp_depth, self.dp_branch))),
            "beam-search" | "beam" => Ok(Box::new(BeamSearch::new(
                self.beam_width,
                self.max_expansions,
            ))),
            "greedy" => Ok(Box::new(Greedy::new())),
            other => Err(DriverError::Config(format!(
                "unknown strategy '{other}'; expected 'bounded-dfs', 'heuristic', \
                 'dp-greedy', 'beam-search', or 'greedy'"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default() {
        let c = DriverConfig::default();
        assert_eq!(c.max_expansions, 200_000);
        assert_eq!(c.beam_width, 64);
        assert_eq!(c.dp_depth, 3);
        assert_eq!(c.dp_branch, 8);
        assert!(c.strategy.is_none());
    }

    #[test]
    fn test_from_toml_partial() {
        let c = DriverConfig::from_toml("beam_width = 16\n").unwrap();
        assert_eq!(c.beam_width, 16);
        assert_eq!(c.max_expansions, 200_000);
    }

    #[test]
    fn test_toml_roundtrip() {
        let c = DriverConfig {
            max_expansions: 1000,
            strategy: Some("greedy".into()),
            ..Default::default()
        };
        let toml = c.to_toml().unwrap();
        let back = DriverConfig::from_toml(&toml).unwrap();
        assert_eq!(back.max_expansions, 1000);
        assert_eq!(back.strategy.as_deref(), Some("greedy"));
    }

    #[test]
    fn test_create_strategy_names() {
        let c = DriverConfig::default();
        for name in ["bounded-dfs", "heuristic", "dp-greedy", "beam-search", "greedy"] {
            assert_eq!(c.create_strategy(name).unwrap().name(), name);
        }
    }

    #[test]
    fn test_create_strategy_aliases() {
        let c = DriverConfig::default();
        assert_eq!(c.create_strategy("dfs").unwrap().name(), "bounded-dfs");
        assert_eq!(c.create_strategy("beam").unwrap().name(), "beam-search");
        assert_eq!(c.create_strategy("dp").unwrap().name(), "dp-greedy");
    }

    #[test]
    fn test_create_strategy_unknown() {
        let c = DriverConfig::default();
        assert!(matches!(
            c.create_strategy("bogus"),
            Err(DriverError::Config(_))
        ));
    }

    #[test]
    fn test_from_file_missing() {
        let err = DriverConfig::from_file(Path::new("/nonexistent/config.toml")).unwrap_err();
        assert!(matches!(err, DriverError::Config(_)));
    }

    #[test]
    fn test_from_file_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("driver.toml");
        std::fs::write(&path, "max_expansions = 5\ntime_limit_seconds = 0.5\n").unwrap();
        let c = DriverConfig::from_file(&path).unwrap();
        assert_eq!(c.max_expansions, 5);
        assert!((c.time_limit_seconds - 0.5).abs() < 1e-9);
    }
}
