// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Parsing of the two accepted ASCII problem formats.
//!
//! # Simple format
//! First significant line declares the budget, then one line per node:
//! ```text
//! total_memory: 100
//! node a 0 10 1 inputs=-
//! node b 0 10 1 inputs=a
//! ```
//! Blank lines and lines starting with `#` are skipped. `inputs=-` denotes
//! an empty input list; otherwise inputs are comma-separated names that
//! must refer to earlier node lines.
//!
//! # Examples format
//! First significant line is `Return <budget>`, then one line per node:
//! ```text
//! Return 100
//! 0 load 0 0 10 1
//! 1 conv 1 0 20 10 5
//! ```
//! Fields: `<id> <op_name> <num_inputs> [<id>…] <run_mem> <output_mem>
//! <time_cost>`, with inputs referring to earlier ids. The node's name is
//! the op name; input names are resolved by id lookup.
//!
//! Both parsers are pure functions of the input text; the CLI owns file
//! I/O. [`parse_any`] tries the examples format first, then the simple
//! format, mirroring the binary's historical behaviour.

use crate::{Node, ParseError};
use std::collections::BTreeMap;

/// Parses input in whichever of the two formats matches.
///
/// The examples format is tried first; on failure the simple format is
/// tried from the top. If both fail the simple-format diagnostic is
/// reported (it is the richer of the two for hand-written inputs).
pub fn parse_any(input: &str) -> Result<(u64, Vec<Node>), ParseError> {
    match parse_examples(input) {
        Ok(parsed) => Ok(parsed),
        Err(examples_err) => parse_simple(input).map_err(|simple_err| {
            tracing::debug!(%examples_err, "examples-format parse failed; reporting simple-format error");
            simple_err
        }),
    }
}

/// Parses the simple format.
pub fn parse_simple(input: &str) -> Result<(u64, Vec<Node>), ParseError> {
    let mut lines = significant_lines(input, true);

    let (line_no, header) = lines.next().ok_or(ParseError::Empty)?;
    let total_memory = parse_simple_header(line_no, header)?;

    let mut specs: Vec<Node> = Vec::new();
    for (line_no, line) in lines {
        let spec = parse_simple_node(line_no, line, &specs)?;
        if specs.iter().any(|n| n.name == spec.name) {
            return Err(ParseError::DuplicateName {
                line: line_no,
                name: spec.name,
            });
        }
        specs.push(spec);
    }
    Ok((total_memory, specs))
}

fn parse_simple_header(line_no: usize, line: &str) -> Result<u64, ParseError> {
    let Some((key, value)) = line.split_once(':') else {
        return Err(ParseError::Header {
            line: line_no,
            detail: format!("expected 'total_memory: <int>', got '{line}'"),
        });
    };
    if key.trim() != "total_memory" {
        return Err(ParseError::Header {
            line: line_no,
            detail: format!("expected 'total_memory', got '{}'", key.trim()),
        });
    }
    parse_int(line_no, value.trim())
}

fn parse_simple_node(line_no: usize, line: &str, earlier: &[Node]) -> Result<Node, ParseError> {
    let tokens: Vec<&str> = line.split_whitespace().collect();
    if tokens.len() != 6 || tokens[0] != "node" {
        return Err(ParseError::NodeLine {
            line: line_no,
            detail: format!(
                "expected 'node <name> <run_mem> <output_mem> <time_cost> inputs=<csv|->', got '{line}'"
            ),
        });
    }
    let name = tokens[1];
    let run_mem = parse_int(line_no, tokens[2])?;
    let output_mem = parse_int(line_no, tokens[3])?;
    let time_cost = parse_int(line_no, tokens[4])?;

    let Some(inputs_csv) = tokens[5].strip_prefix("inputs=") else {
        return Err(ParseError::NodeLine {
            line: line_no,
            detail: format!("expected 'inputs=<csv|->', got '{}'", tokens[5]),
        });
    };
    let inputs: Vec<String> = if inputs_csv == "-" {
        Vec::new()
    } else {
        inputs_csv.split(',').map(str::to_string).collect()
    };
    for input in &inputs {
        if input.is_empty() || !earlier.iter().any(|n| &n.name == input) {
            return Err(ParseError::UnknownInput {
                line: line_no,
                reference: input.clone(),
            });
        }
    }

    Ok(Node::new(name, inputs, run_mem, output_mem, time_cost))
}

/// Parses the examples format.
pub fn parse_examples(input: &str) -> Result<(u64, Vec<Node>), ParseError> {
    let mut lines = significant_lines(input, false);

    let (line_no, header) = lines.next().ok_or(ParseError::Empty)?;
    let total_memory = parse_examples_header(line_no, header)?;

    // id → name, for resolving input references to earlier specs.
    let mut names_by_id: BTreeMap<u64, String> = BTreeMap::new();
    let mut specs: Vec<Node> = Vec::new();

    for (line_no, line) in lines {
        let tokens: Vec<&str> = line.split_whitespace().collect();
        if tokens.len() < 6 {
            return Err(ParseError::NodeLine {
                line: line_no,
                detail: format!("expected at least 6 tokens, got {}", tokens.len()),
            });
        }
        let id = parse_int(line_no, tokens[0])?;
        let op_name = tokens[1];
        let num_inputs = parse_int(line_no, tokens[2])? as usize;
        if tokens.len() != 6 + num_inputs {
            return Err(ParseError::NodeLine {
                line: line_no,
                detail: format!(
                    "declared {num_inputs} input(s) but line has {} token(s)",
                    tokens.len()
                ),
            });
        }

        let mut inputs = Vec::with_capacity(num_inputs);
        for token in &tokens[3..3 + num_inputs] {
            let input_id = parse_int(line_no, token)?;
            let Some(input_name) = names_by_id.get(&input_id) else {
                return Err(ParseError::UnknownInput {
                    line: line_no,
                    reference: token.to_string(),
                });
            };
            inputs.push(input_name.clone());
        }

        let run_mem = parse_int(line_no, tokens[3 + num_inputs])?;
        let output_mem = parse_int(line_no, tokens[4 + num_inputs])?;
        let time_cost = parse_int(line_no, tokens[5 + num_inputs])?;

        if names_by_id.contains_key(&id) {
            return Err(ParseError::NodeLine {
                line: line_no,
                detail: format!("duplicate node id {id}"),
            });
        }
        if specs.iter().any(|n| n.name == op_name) {
            return Err(ParseError::DuplicateName {
                line: line_no,
                name: op_name.to_string(),
            });
        }

        names_by_id.insert(id, op_name.to_string());
        specs.push(Node::new(op_name, inputs, run_mem, output_mem, time_cost));
    }

    Ok((total_memory, specs))
}

fn parse_examples_header(line_no: usize, line: &str) -> Result<u64, ParseError> {
    let tokens: Vec<&str> = line.split_whitespace().collect();
    if tokens.len() != 2 || tokens[0] != "Return" {
        return Err(ParseError::Header {
            line: line_no,
            detail: format!("expected 'Return <int>', got '{line}'"),
        });
    }
    parse_int(line_no, tokens[1])
}

// ── Shared helpers ─────────────────────────────────────────────────

/// Yields `(1-based line number, trimmed line)` for significant lines.
/// `skip_comments` additionally drops `#` lines (simple format only).
fn significant_lines(
    input: &str,
    skip_comments: bool,
) -> impl Iterator<Item = (usize, &str)> {
    input
        .lines()
        .enumerate()
        .map(|(i, l)| (i + 1, l.trim()))
        .filter(move |(_, l)| !l.is_empty() && !(skip_comments && l.starts_with('#')))
}

fn parse_int(line_no: usize, token: &str) -> Result<u64, ParseError> {
    token.parse::<u64>().map_err(|_| ParseError::Integer {
        line: line_no,
        token: token.to_string(),
    })
}
