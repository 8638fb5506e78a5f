// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 pipeflow contributors

//! Flow description parser
//!
//! Parses the line-oriented `key=value` flow format. Two pending buffers
//! accumulate across lines: `node=` sets a pending node name completed by
//! the next `command=`, and `from=` sets a pending pipe source completed by
//! the next `to=`. The buffers are independent, so node blocks and pipe
//! blocks may interleave. Out-of-order or dangling fields are rejected
//! rather than silently committed with stale state.

use crate::errors::{FlowError, FlowResult};
use crate::flow::{Edge, Flow, Node};

/// Parser for the flow description format
pub struct FlowParser;

impl FlowParser {
    /// Parse raw flow description text into a `Flow`
    pub fn parse(text: &str) -> FlowResult<Flow> {
        let mut flow = Flow::default();

        // Pending state, each with the line that set it for diagnostics
        let mut pending_node: Option<(String, usize)> = None;
        let mut pending_from: Option<(String, usize)> = None;

        for (idx, raw) in text.lines().enumerate() {
            let lineno = idx + 1;
            let line = raw.trim();
            if line.is_empty() {
                continue;
            }

            let Some((key_part, value_part)) = line.split_once('=') else {
                return Err(FlowError::parse(lineno, "expected a key=value pair"));
            };

            let key = key_part.trim();
            if key.is_empty() {
                return Err(FlowError::parse(lineno, "missing key before '='"));
            }

            match key {
                "node" => {
                    let name = Self::single_token(value_part, lineno, "node")?;
                    if let Some((prev, _)) = &pending_node {
                        return Err(FlowError::parse(
                            lineno,
                            format!("node '{}' is missing its command", prev),
                        ));
                    }
                    pending_node = Some((name, lineno));
                }
                "command" => {
                    let Some((name, _)) = pending_node.take() else {
                        return Err(FlowError::parse(lineno, "command with no preceding node"));
                    };
                    let command = value_part.trim();
                    if command.is_empty() {
                        return Err(FlowError::parse(lineno, "missing value for 'command'"));
                    }
                    flow.nodes.push(Node {
                        name,
                        command: command.to_string(),
                    });
                }
                // Section marker: accepted for readability, carries no state
                "pipe" => {}
                "from" => {
                    let from = Self::single_token(value_part, lineno, "from")?;
                    if let Some((prev, _)) = &pending_from {
                        return Err(FlowError::parse(
                            lineno,
                            format!("pipe from '{}' is missing its destination", prev),
                        ));
                    }
                    pending_from = Some((from, lineno));
                }
                "to" => {
                    let Some((from, _)) = pending_from.take() else {
                        return Err(FlowError::parse(lineno, "to with no preceding from"));
                    };
                    let to = Self::single_token(value_part, lineno, "to")?;
                    flow.edges.push(Edge { from, to });
                }
                other => {
                    tracing::debug!(key = other, line = lineno, "skipping unrecognized key");
                }
            }
        }

        if let Some((name, line)) = pending_node {
            return Err(FlowError::parse(
                line,
                format!("node '{}' is missing its command", name),
            ));
        }
        if let Some((from, line)) = pending_from {
            return Err(FlowError::parse(
                line,
                format!("pipe from '{}' is missing its destination", from),
            ));
        }

        Ok(flow)
    }

    /// Extract exactly one whitespace-delimited token from a value
    ///
    /// Trailing text is an error, never silently dropped.
    fn single_token(value: &str, line: usize, key: &str) -> FlowResult<String> {
        let mut parts = value.split_whitespace();
        let Some(first) = parts.next() else {
            return Err(FlowError::parse(line, format!("missing value for '{}'", key)));
        };
        if parts.next().is_some() {
            return Err(FlowError::parse(
                line,
                format!("trailing text after '{}' value", key),
            ));
        }
        Ok(first.to_string())
    }
}
