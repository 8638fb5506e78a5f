// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 pipeflow contributors

//! Error types for flow loading, validation, and execution
//!
//! Configuration-phase errors (file read, parse, validation, pipe
//! allocation) are fatal and surface before any process is spawned.
//! Execution-phase failures are carried per node in the run report
//! instead, so one failing node never masks its siblings.

use miette::Diagnostic;
use std::path::PathBuf;
use thiserror::Error;

/// Result type for pipeflow operations
pub type FlowResult<T> = Result<T, FlowError>;

/// Main error type for pipeflow
#[derive(Error, Debug, Diagnostic)]
pub enum FlowError {
    // ─────────────────────────────────────────────────────────────────────────
    // Flow Description Errors
    // ─────────────────────────────────────────────────────────────────────────
    #[error("Failed to read flow description '{path}': {error}")]
    #[diagnostic(code(pipeflow::file_read_error))]
    FileRead { path: PathBuf, error: String },

    #[error("Parse error on line {line}: {message}")]
    #[diagnostic(
        code(pipeflow::parse_error),
        help("Flow descriptions hold one key=value pair per line. Keys: node, command, pipe, from, to.")
    )]
    Parse { line: usize, message: String },

    // ─────────────────────────────────────────────────────────────────────────
    // Graph Validation Errors
    // ─────────────────────────────────────────────────────────────────────────
    #[error("Flow has no nodes")]
    #[diagnostic(
        code(pipeflow::empty_flow),
        help("Declare at least one node: a `node=NAME` line followed by a `command=...` line")
    )]
    EmptyFlow,

    #[error("Duplicate node name: '{name}'")]
    #[diagnostic(
        code(pipeflow::duplicate_node),
        help("Node names identify pipe endpoints and must be unique within a flow")
    )]
    DuplicateNode { name: String },

    #[error("Pipe '{edge}' references undeclared node '{node}'")]
    #[diagnostic(
        code(pipeflow::unknown_node),
        help("Every from=/to= value must name a node declared in the same flow")
    )]
    UnknownNode { edge: String, node: String },

    #[error("Node '{node}' has more than one inbound pipe")]
    #[diagnostic(
        code(pipeflow::multiple_inbound),
        help("A node's standard input can be fed by at most one pipe")
    )]
    MultipleInbound { node: String },

    #[error("Node '{node}' has more than one outbound pipe")]
    #[diagnostic(
        code(pipeflow::multiple_outbound),
        help("A node's standard output can feed at most one pipe")
    )]
    MultipleOutbound { node: String },

    #[error("Pipes form a cycle")]
    #[diagnostic(
        code(pipeflow::circular_flow),
        help("A cycle deadlocks: every node in it blocks reading until its predecessor writes and closes")
    )]
    CircularFlow { nodes: Vec<String> },

    // ─────────────────────────────────────────────────────────────────────────
    // Execution Setup Errors
    // ─────────────────────────────────────────────────────────────────────────
    #[error("Failed to allocate pipe for '{edge}': {error}")]
    #[diagnostic(
        code(pipeflow::pipe_allocation),
        help("The process may have hit its file descriptor limit (see `ulimit -n`)")
    )]
    PipeAllocation { edge: String, error: String },

    #[error("Shell interpreter '{shell}' not found")]
    #[diagnostic(
        code(pipeflow::shell_not_found),
        help("Node commands run via a shell; install it or point --shell at another interpreter")
    )]
    ShellNotFound { shell: String },

    // ─────────────────────────────────────────────────────────────────────────
    // IO/System Errors
    // ─────────────────────────────────────────────────────────────────────────
    #[error("IO error: {message}")]
    #[diagnostic(code(pipeflow::io_error))]
    Io { message: String },
}

impl From<std::io::Error> for FlowError {
    fn from(e: std::io::Error) -> Self {
        Self::Io { message: e.to_string() }
    }
}

impl FlowError {
    /// Create a parse error for a 1-based line number
    pub fn parse(line: usize, message: impl Into<String>) -> Self {
        Self::Parse {
            line,
            message: message.into(),
        }
    }

    /// Create an unknown-node error for one endpoint of an edge
    pub fn unknown_node(from: &str, to: &str, node: &str) -> Self {
        Self::UnknownNode {
            edge: format!("{} -> {}", from, to),
            node: node.to_string(),
        }
    }
}
