// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Subcommand implementations and shared CLI plumbing.

pub mod baseline;
pub mod inspect;
pub mod schedule;

use dataflow_ir::{parse_any, GraphError, ParseError, Problem, Validated};
use std::path::Path;

/// Exit codes shared by all subcommands.
pub const EXIT_OK: u8 = 0;
pub const EXIT_OPEN_FAILURE: u8 = 1;
pub const EXIT_PARSE_ERROR: u8 = 2;
pub const EXIT_NO_SCHEDULE: u8 = 3;

/// Initialises the tracing subscriber from the `-v` count and the
/// schedule subcommand's `--verbose`/`--trace` flags.
pub fn init_tracing(verbosity: u8, verbose: bool, trace: bool) {
    let level = if trace {
        tracing::Level::TRACE
    } else {
        match verbosity.max(verbose as u8) {
            0 => tracing::Level::WARN,
            1 => tracing::Level::INFO,
            _ => tracing::Level::DEBUG,
        }
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// What went wrong while turning a path into a validated problem.
#[derive(Debug)]
pub enum LoadFailure {
    Open(std::io::Error),
    Parse(ParseError),
    Graph(GraphError),
}

impl LoadFailure {
    /// Maps the failure onto the CLI's exit-code contract: open failures
    /// are I/O (1), malformed lines are parse errors (2), and structural
    /// defects (cycles, unknown inputs) mean no schedule can exist (3).
    pub fn exit_code(&self) -> u8 {
        match self {
            LoadFailure::Open(_) => EXIT_OPEN_FAILURE,
            LoadFailure::Parse(_) => EXIT_PARSE_ERROR,
            LoadFailure::Graph(_) => EXIT_NO_SCHEDULE,
        }
    }

    pub fn report(&self, path: &Path) {
        match self {
            LoadFailure::Open(e) => eprintln!("Failed to open input: {}: {e}", path.display()),
            LoadFailure::Parse(e) => eprintln!("Parse error: {e}"),
            LoadFailure::Graph(e) => eprintln!("Invalid problem: {e}"),
        }
    }
}

/// Reads, parses, and validates an input file.
pub fn load_problem(path: &Path) -> Result<Problem<Validated>, LoadFailure> {
    let content = std::fs::read_to_string(path).map_err(LoadFailure::Open)?;
    let (total_memory, specs) = parse_any(&content).map_err(LoadFailure::Parse)?;
    Problem::new(total_memory, specs)
        .validate()
        .map_err(LoadFailure::Graph)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_input(dir: &tempfile::TempDir, name: &str, content: &str) -> std::path::PathBuf {
        let path = dir.path().join(name);
        std::fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_load_simple_format() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_input(
            &dir,
            "ok.txt",
            "total_memory: 100\nnode a 0 10 1 inputs=-\nnode b 0 10 1 inputs=a\n",
        );
        let problem = load_problem(&path).unwrap();
        assert_eq!(problem.len(), 2);
        assert_eq!(problem.total_memory(), 100);
    }

    #[test]
    fn test_load_examples_format() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_input(&dir, "ok.txt", "Return 50\n0 load 0 0 10 1\n1 use 1 0 0 5 1\n");
        let problem = load_problem(&path).unwrap();
        assert_eq!(problem.len(), 2);
        assert_eq!(problem.total_memory(), 50);
    }

    #[test]
    fn test_missing_file_maps_to_exit_1() {
        let failure = load_problem(Path::new("/nonexistent/graph.txt")).unwrap_err();
        assert_eq!(failure.exit_code(), EXIT_OPEN_FAILURE);
    }

    #[test]
    fn test_malformed_input_maps_to_exit_2() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_input(&dir, "bad.txt", "not a header at all\n");
        let failure = load_problem(&path).unwrap_err();
        assert_eq!(failure.exit_code(), EXIT_PARSE_ERROR);
    }

    #[test]
    fn test_self_reference_maps_to_exit_2() {
        // Both formats only accept references to earlier lines, so a cycle
        // cannot survive parsing; it surfaces as an unknown reference.
        let dir = tempfile::tempdir().unwrap();
        let path = write_input(
            &dir,
            "cycle.txt",
            "total_memory: 100\nnode a 0 1 1 inputs=-\nnode b 0 1 1 inputs=a,b\n",
        );
        let failure = load_problem(&path).unwrap_err();
        assert_eq!(failure.exit_code(), EXIT_PARSE_ERROR);
    }

    #[test]
    fn test_zero_budget_maps_to_exit_3() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_input(&dir, "zero.txt", "total_memory: 0\nnode a 0 1 1 inputs=-\n");
        let failure = load_problem(&path).unwrap_err();
        assert_eq!(failure.exit_code(), EXIT_NO_SCHEDULE);
    }
}
