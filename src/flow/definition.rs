// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 pipeflow contributors

//! Flow definition structures
//!
//! Defines the in-memory model for flow description files: named command
//! nodes and the directed pipes between them. A `Flow` is immutable once
//! parsed and owned by the run that parsed it.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A named pipeline stage with one shell-interpreted command
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Node {
    /// Node name (unique within a flow, never empty)
    pub name: String,

    /// Command line, passed verbatim to the shell interpreter
    pub command: String,
}

/// A directed pipe: standard output of `from` feeds standard input of `to`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Edge {
    /// Producing node name
    pub from: String,

    /// Consuming node name
    pub to: String,
}

impl fmt::Display for Edge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {}", self.from, self.to)
    }
}

/// A parsed flow description: ordered nodes plus ordered pipes
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Flow {
    /// Nodes in declaration order
    pub nodes: Vec<Node>,

    /// Pipes in declaration order
    pub edges: Vec<Edge>,
}

impl Flow {
    /// Load a flow from a description file
    pub fn from_file(path: &std::path::Path) -> Result<Self, crate::FlowError> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            crate::FlowError::FileRead {
                path: path.to_path_buf(),
                error: e.to_string(),
            }
        })?;

        crate::flow::FlowParser::parse(&content)
    }

    /// Get a node by name
    pub fn node(&self, name: &str) -> Option<&Node> {
        self.nodes.iter().find(|n| n.name == name)
    }

    /// Get all node names in declaration order
    pub fn node_names(&self) -> Vec<&str> {
        self.nodes.iter().map(|n| n.name.as_str()).collect()
    }

    /// Get the pipe feeding a node's standard input, if any
    pub fn inbound_edge(&self, name: &str) -> Option<&Edge> {
        self.edges.iter().find(|e| e.to == name)
    }

    /// Get the pipe fed by a node's standard output, if any
    pub fn outbound_edge(&self, name: &str) -> Option<&Edge> {
        self.edges.iter().find(|e| e.from == name)
    }
}
