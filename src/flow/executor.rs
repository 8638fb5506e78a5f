// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 pipeflow contributors

//! Flow executor
//!
//! Launches one process per node with stdin/stdout wired through the
//! flow's pipes, then waits for all of them and reports every outcome.
//!
//! Descriptor discipline: both ends of every pipe are created up front
//! and each end is moved into exactly one node's `Command`. The command
//! owns its ends only until its spawn attempt finishes, so by the time
//! the wait phase starts the parent holds no pipe descriptors at all.
//! A reader therefore sees EOF exactly when its upstream writer exits,
//! which is what lets chains of nodes terminate instead of deadlocking.

use std::collections::HashMap;
use std::io::{PipeReader, PipeWriter};
use std::os::unix::process::ExitStatusExt;
use std::path::{Path, PathBuf};
use std::process::ExitStatus;
use std::time::Instant;

use tokio::process::Command;

use crate::errors::FlowError;
use crate::flow::{Flow, FlowDag, NodeOutcome, NodeResult, RunReport};

/// Flow execution options
#[derive(Debug, Clone, Default)]
pub struct ExecutionOptions {
    /// Validate and plan, but spawn nothing
    pub dry_run: bool,
}

/// Flow executor
pub struct FlowExecutor {
    shell: PathBuf,
}

impl FlowExecutor {
    /// Create an executor using `sh` from the search path
    pub fn new() -> Result<Self, FlowError> {
        let shell = which::which("sh").map_err(|_| FlowError::ShellNotFound {
            shell: "sh".into(),
        })?;
        Ok(Self { shell })
    }

    /// Create an executor using a specific shell binary
    ///
    /// The path is not checked here; an unusable shell surfaces as a
    /// spawn failure on every node.
    pub fn with_shell(shell: impl Into<PathBuf>) -> Self {
        Self {
            shell: shell.into(),
        }
    }

    /// The shell used to run node commands
    pub fn shell(&self) -> &Path {
        &self.shell
    }

    /// Execute a flow
    ///
    /// The graph is checked before anything is spawned; a structural
    /// error means zero processes were started. Spawn failures of
    /// individual nodes do not abort the run: the remaining nodes still
    /// execute, and every outcome lands in the report.
    pub async fn execute(
        &self,
        flow: &Flow,
        working_dir: &Path,
        options: &ExecutionOptions,
    ) -> Result<RunReport, FlowError> {
        let start = Instant::now();

        FlowDag::build(flow)?;
        tracing::debug!(
            nodes = flow.nodes.len(),
            edges = flow.edges.len(),
            "flow graph validated"
        );

        if options.dry_run {
            return Ok(RunReport::from_outcomes(Vec::new(), start.elapsed()));
        }

        // Allocate every pipe before spawning anything, so an exhausted
        // descriptor table cannot leave a half-started flow behind.
        let mut inbound: HashMap<&str, PipeReader> = HashMap::new();
        let mut outbound: HashMap<&str, PipeWriter> = HashMap::new();
        for edge in &flow.edges {
            let (reader, writer) = std::io::pipe().map_err(|e| FlowError::PipeAllocation {
                edge: edge.to_string(),
                error: e.to_string(),
            })?;
            outbound.insert(edge.from.as_str(), writer);
            inbound.insert(edge.to.as_str(), reader);
        }
        tracing::debug!(pipes = flow.edges.len(), "pipes allocated");

        let mut spawned: Vec<(String, Result<tokio::process::Child, std::io::Error>)> =
            Vec::with_capacity(flow.nodes.len());

        for node in &flow.nodes {
            let mut command = Command::new(&self.shell);
            command
                .arg("-c")
                .arg(&node.command)
                .current_dir(working_dir);

            if let Some(reader) = inbound.remove(node.name.as_str()) {
                command.stdin(reader);
            }
            if let Some(writer) = outbound.remove(node.name.as_str()) {
                command.stdout(writer);
            }

            match command.spawn() {
                Ok(child) => {
                    tracing::debug!(node = %node.name, pid = ?child.id(), "node spawned");
                    spawned.push((node.name.clone(), Ok(child)));
                }
                Err(e) => {
                    tracing::debug!(node = %node.name, error = %e, "node failed to spawn");
                    spawned.push((node.name.clone(), Err(e)));
                }
            }

            // `command` is dropped here, closing the parent's copies of
            // this node's pipe ends whether or not the spawn succeeded.
        }

        // Graph checks guarantee both ends of every pipe were claimed
        debug_assert!(inbound.is_empty() && outbound.is_empty());
        drop(inbound);
        drop(outbound);

        let mut results = Vec::with_capacity(spawned.len());
        for (name, spawn_result) in spawned {
            let outcome = match spawn_result {
                Ok(mut child) => match child.wait().await {
                    Ok(status) => outcome_from_status(status),
                    Err(e) => NodeOutcome::Signaled {
                        description: format!("wait error: {}", e),
                    },
                },
                Err(e) => NodeOutcome::SpawnFailed {
                    error: e.to_string(),
                },
            };
            tracing::debug!(node = %name, outcome = %outcome.describe(), "node finished");
            results.push(NodeResult {
                node: name,
                outcome,
            });
        }

        Ok(RunReport::from_outcomes(results, start.elapsed()))
    }
}

fn outcome_from_status(status: ExitStatus) -> NodeOutcome {
    match status.code() {
        Some(code) => NodeOutcome::Exited { code },
        None => NodeOutcome::Signaled {
            description: match status.signal() {
                Some(signal) => format!("signal {}", signal),
                None => "unknown status".to_string(),
            },
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flow::{Edge, Node};
    use std::time::Duration;

    fn make_flow(nodes: Vec<(&str, &str)>, edges: Vec<(&str, &str)>) -> Flow {
        Flow {
            nodes: nodes
                .into_iter()
                .map(|(name, command)| Node {
                    name: name.into(),
                    command: command.into(),
                })
                .collect(),
            edges: edges
                .into_iter()
                .map(|(from, to)| Edge {
                    from: from.into(),
                    to: to.into(),
                })
                .collect(),
        }
    }

    #[tokio::test]
    async fn test_pipe_carries_output_between_nodes() {
        let dir = tempfile::tempdir().unwrap();
        let flow = make_flow(
            vec![("producer", "echo hi"), ("consumer", "cat > out.txt")],
            vec![("producer", "consumer")],
        );

        let executor = FlowExecutor::new().unwrap();
        let report = executor
            .execute(&flow, dir.path(), &ExecutionOptions::default())
            .await
            .unwrap();

        assert!(report.success);
        let out = std::fs::read_to_string(dir.path().join("out.txt")).unwrap();
        assert_eq!(out, "hi\n");
    }

    #[tokio::test]
    async fn test_three_node_chain_terminates() {
        let dir = tempfile::tempdir().unwrap();
        let flow = make_flow(
            vec![
                ("source", "printf abc"),
                ("upper", "tr a-z A-Z"),
                ("sink", "cat > out.txt"),
            ],
            vec![("source", "upper"), ("upper", "sink")],
        );

        let executor = FlowExecutor::new().unwrap();
        // A leaked writer descriptor would make the chain hang on EOF,
        // so a timeout turns that bug into a test failure.
        let report = tokio::time::timeout(
            Duration::from_secs(10),
            executor.execute(&flow, dir.path(), &ExecutionOptions::default()),
        )
        .await
        .expect("flow run timed out")
        .unwrap();

        assert!(report.success);
        let out = std::fs::read_to_string(dir.path().join("out.txt")).unwrap();
        assert_eq!(out, "ABC");
    }

    #[tokio::test]
    async fn test_chain_delivers_large_payload_intact() {
        let dir = tempfile::tempdir().unwrap();
        // Well past the kernel pipe buffer, so the chain only finishes if
        // the stages genuinely run concurrently and every parent-held
        // descriptor was closed.
        let flow = make_flow(
            vec![
                ("source", "head -c 1000000 /dev/zero"),
                ("relay", "cat"),
                ("sink", "cat > out.bin"),
            ],
            vec![("source", "relay"), ("relay", "sink")],
        );

        let executor = FlowExecutor::new().unwrap();
        let report = tokio::time::timeout(
            Duration::from_secs(10),
            executor.execute(&flow, dir.path(), &ExecutionOptions::default()),
        )
        .await
        .expect("flow run timed out")
        .unwrap();

        assert!(report.success);
        let out = std::fs::read(dir.path().join("out.bin")).unwrap();
        assert_eq!(out.len(), 1_000_000);
    }

    #[tokio::test]
    async fn test_every_failure_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let flow = make_flow(
            vec![("bad1", "exit 3"), ("good", "true"), ("bad2", "exit 4")],
            vec![],
        );

        let executor = FlowExecutor::new().unwrap();
        let report = executor
            .execute(&flow, dir.path(), &ExecutionOptions::default())
            .await
            .unwrap();

        assert!(!report.success);
        let failures = report.failures();
        assert_eq!(failures.len(), 2);
        assert_eq!(failures[0].node, "bad1");
        assert_eq!(failures[0].outcome, NodeOutcome::Exited { code: 3 });
        assert_eq!(failures[1].node, "bad2");
        assert_eq!(failures[1].outcome, NodeOutcome::Exited { code: 4 });
    }

    #[tokio::test]
    async fn test_signaled_node_reported() {
        let dir = tempfile::tempdir().unwrap();
        let flow = make_flow(vec![("doomed", "kill -9 $$")], vec![]);

        let executor = FlowExecutor::new().unwrap();
        let report = executor
            .execute(&flow, dir.path(), &ExecutionOptions::default())
            .await
            .unwrap();

        assert!(!report.success);
        match &report.results[0].outcome {
            NodeOutcome::Signaled { description } => assert_eq!(description, "signal 9"),
            other => panic!("expected Signaled, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_unusable_shell_fails_every_spawn() {
        let dir = tempfile::tempdir().unwrap();
        let flow = make_flow(vec![("a", "true"), ("b", "true")], vec![]);

        let executor = FlowExecutor::with_shell("/nonexistent/shell");
        let report = executor
            .execute(&flow, dir.path(), &ExecutionOptions::default())
            .await
            .unwrap();

        assert!(!report.success);
        assert_eq!(report.results.len(), 2);
        for result in &report.results {
            assert!(matches!(
                result.outcome,
                NodeOutcome::SpawnFailed { .. }
            ));
        }
    }

    #[tokio::test]
    async fn test_dry_run_spawns_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let flow = make_flow(vec![("toucher", "touch marker")], vec![]);

        let executor = FlowExecutor::new().unwrap();
        let options = ExecutionOptions { dry_run: true };
        let report = executor.execute(&flow, dir.path(), &options).await.unwrap();

        assert!(report.success);
        assert!(report.results.is_empty());
        assert!(!dir.path().join("marker").exists());
    }

    #[tokio::test]
    async fn test_invalid_graph_spawns_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let flow = make_flow(
            vec![("toucher", "touch marker")],
            vec![("toucher", "ghost")],
        );

        let executor = FlowExecutor::new().unwrap();
        let err = executor
            .execute(&flow, dir.path(), &ExecutionOptions::default())
            .await
            .unwrap_err();

        assert!(matches!(err, FlowError::UnknownNode { .. }));
        assert!(!dir.path().join("marker").exists());
    }

    #[tokio::test]
    async fn test_empty_flow_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let executor = FlowExecutor::new().unwrap();
        let err = executor
            .execute(&Flow::default(), dir.path(), &ExecutionOptions::default())
            .await
            .unwrap_err();

        assert!(matches!(err, FlowError::EmptyFlow));
    }
}
