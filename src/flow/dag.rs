// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 pipeflow contributors

//! Graph structure checks for flows
//!
//! Builds a directed graph over a flow's nodes and pipes, rejecting
//! dangling endpoint references, multiple inbound or outbound pipes per
//! node, and cycles. All checks run before any process is spawned.

use petgraph::algo::toposort;
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::Direction;
use std::collections::HashMap;

use crate::errors::FlowError;
use crate::flow::Flow;

/// Directed graph over a flow's nodes and pipes
#[derive(Debug)]
pub struct FlowDag {
    graph: DiGraph<(), ()>,
    name_to_index: HashMap<String, NodeIndex>,
    index_to_name: HashMap<NodeIndex, String>,
}

impl FlowDag {
    /// Build and check the graph for a flow
    pub fn build(flow: &Flow) -> Result<Self, FlowError> {
        if flow.nodes.is_empty() {
            return Err(FlowError::EmptyFlow);
        }

        let mut dag = Self {
            graph: DiGraph::new(),
            name_to_index: HashMap::new(),
            index_to_name: HashMap::new(),
        };

        for node in &flow.nodes {
            if dag.name_to_index.contains_key(&node.name) {
                return Err(FlowError::DuplicateNode {
                    name: node.name.clone(),
                });
            }
            let ix = dag.graph.add_node(());
            dag.name_to_index.insert(node.name.clone(), ix);
            dag.index_to_name.insert(ix, node.name.clone());
        }

        for edge in &flow.edges {
            let from_ix = *dag.name_to_index.get(&edge.from).ok_or_else(|| {
                FlowError::unknown_node(&edge.from, &edge.to, &edge.from)
            })?;
            let to_ix = *dag.name_to_index.get(&edge.to).ok_or_else(|| {
                FlowError::unknown_node(&edge.from, &edge.to, &edge.to)
            })?;

            // One pipe per standard stream: a second edge on the same end
            // would silently overwrite the first node's redirection.
            if dag.graph.edges_directed(from_ix, Direction::Outgoing).next().is_some() {
                return Err(FlowError::MultipleOutbound {
                    node: edge.from.clone(),
                });
            }
            if dag.graph.edges_directed(to_ix, Direction::Incoming).next().is_some() {
                return Err(FlowError::MultipleInbound {
                    node: edge.to.clone(),
                });
            }

            dag.graph.add_edge(from_ix, to_ix, ());
        }

        dag.validate_acyclic()?;

        Ok(dag)
    }

    /// Reject cycles: every node in one blocks reading until its
    /// predecessor writes and closes, so the whole ring deadlocks.
    fn validate_acyclic(&self) -> Result<(), FlowError> {
        match toposort(&self.graph, None) {
            Ok(_) => Ok(()),
            Err(cycle) => Err(FlowError::CircularFlow {
                nodes: self.cycle_members(cycle.node_id()),
            }),
        }
    }

    /// List the nodes of the cycle containing `start`
    ///
    /// With at most one outbound pipe per node the cycle is a simple ring,
    /// so following successors from `start` walks exactly its members.
    fn cycle_members(&self, start: NodeIndex) -> Vec<String> {
        let mut members = vec![self.index_to_name[&start].clone()];
        let mut current = start;

        while let Some(next) = self
            .graph
            .neighbors_directed(current, Direction::Outgoing)
            .next()
        {
            if next == start {
                break;
            }
            members.push(self.index_to_name[&next].clone());
            current = next;
        }

        members
    }

    /// Generate DOT diagram of the flow
    pub fn to_dot(&self) -> String {
        let mut out = String::from("digraph flow {\n");
        out.push_str("    rankdir=LR;\n");
        out.push_str("    node [shape=box, style=rounded];\n\n");

        for edge in self.graph.edge_indices() {
            let (from, to) = self.graph.edge_endpoints(edge).unwrap();
            let from_name = &self.index_to_name[&from];
            let to_name = &self.index_to_name[&to];
            out.push_str(&format!("    \"{}\" -> \"{}\";\n", from_name, to_name));
        }

        // Nodes with no pipes at all would otherwise not appear
        for ix in self.graph.node_indices() {
            if self.graph.neighbors_undirected(ix).count() == 0 {
                out.push_str(&format!("    \"{}\";\n", self.index_to_name[&ix]));
            }
        }

        out.push_str("}\n");
        out
    }

    /// Generate Mermaid diagram of the flow
    pub fn to_mermaid(&self) -> String {
        let mut out = String::from("graph LR\n");

        for ix in self.graph.node_indices() {
            let name = &self.index_to_name[&ix];
            out.push_str(&format!("    {}[{}]\n", name, name));
        }

        for edge in self.graph.edge_indices() {
            let (from, to) = self.graph.edge_endpoints(edge).unwrap();
            out.push_str(&format!(
                "    {} --> {}\n",
                self.index_to_name[&from], self.index_to_name[&to]
            ));
        }

        out
    }
}
