// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 pipeflow contributors

//! Flow validation
//!
//! Validates a flow definition before execution. Collects every problem
//! found rather than stopping at the first, so one run reports all of them.

use std::collections::HashSet;

use crate::errors::FlowError;
use crate::flow::{Flow, FlowDag};

/// Flow validator
pub struct FlowValidator;

impl FlowValidator {
    /// Validate a flow definition
    pub fn validate(flow: &Flow) -> Result<ValidationResult, FlowError> {
        let mut result = ValidationResult::new();

        // Check for empty flow
        if flow.nodes.is_empty() {
            result.add_error("Flow has no nodes defined");
        }

        // Check for duplicate node names
        let mut seen_names = HashSet::new();
        for node in &flow.nodes {
            if !seen_names.insert(&node.name) {
                result.add_error(&format!("Duplicate node name: '{}'", node.name));
            }
        }

        // Check for empty names and commands (a parsed flow never has them,
        // but a programmatically built one might)
        for (position, node) in flow.nodes.iter().enumerate() {
            if node.name.trim().is_empty() {
                result.add_error(&format!("Node {} has an empty name", position + 1));
            }
            if node.command.trim().is_empty() {
                result.add_error(&format!("Node '{}': command is empty", node.name));
            }
        }

        // Validate graph structure (dangling references, pipe limits, cycles)
        match FlowDag::build(flow) {
            Ok(_) => {}
            Err(FlowError::EmptyFlow) | Err(FlowError::DuplicateNode { .. }) => {
                // Already reported above
            }
            Err(FlowError::UnknownNode { edge, node }) => {
                result.add_error(&format!(
                    "Pipe '{}' references unknown node '{}'",
                    edge, node
                ));
            }
            Err(FlowError::MultipleInbound { node }) => {
                result.add_error(&format!(
                    "Node '{}' has more than one inbound pipe",
                    node
                ));
            }
            Err(FlowError::MultipleOutbound { node }) => {
                result.add_error(&format!(
                    "Node '{}' has more than one outbound pipe",
                    node
                ));
            }
            Err(FlowError::CircularFlow { nodes }) => {
                let mut ring = nodes.clone();
                if let Some(first) = nodes.first() {
                    ring.push(first.clone());
                }
                result.add_error(&format!("Pipes form a cycle: {}", ring.join(" -> ")));
            }
            Err(e) => {
                result.add_error(&format!("Graph validation error: {}", e));
            }
        }

        // A flow of several nodes with no pipes is legal but usually a
        // sign that from/to lines were forgotten
        if flow.nodes.len() > 1 && flow.edges.is_empty() {
            result.add_warning(&format!(
                "Flow defines {} nodes but no pipes; nodes will run independently",
                flow.nodes.len()
            ));
        }

        Ok(result)
    }
}

/// Result of flow validation
#[derive(Debug, Default)]
pub struct ValidationResult {
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

impl ValidationResult {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_error(&mut self, message: &str) {
        self.errors.push(message.to_string());
    }

    pub fn add_warning(&mut self, message: &str) {
        self.warnings.push(message.to_string());
    }

    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }
}
