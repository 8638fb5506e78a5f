// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 pipeflow contributors

//! Run reports
//!
//! Aggregated outcome of a flow run. Every node's fate is recorded, so a
//! failing run reports the full set of failing nodes rather than the
//! first one encountered.

use std::time::Duration;

use serde::{Serialize, Serializer};

/// How a single node ended
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum NodeOutcome {
    /// Process ran to completion and exited
    Exited { code: i32 },
    /// Process was terminated before it could exit
    Signaled { description: String },
    /// Process never started
    SpawnFailed { error: String },
}

impl NodeOutcome {
    /// A node succeeded only if it exited with status zero
    pub fn success(&self) -> bool {
        matches!(self, NodeOutcome::Exited { code: 0 })
    }

    /// Human-readable description for text reports
    pub fn describe(&self) -> String {
        match self {
            NodeOutcome::Exited { code } => format!("exited with status {}", code),
            NodeOutcome::Signaled { description } => format!("terminated by {}", description),
            NodeOutcome::SpawnFailed { error } => format!("failed to start: {}", error),
        }
    }
}

/// Outcome of one node in a run
#[derive(Debug, Clone, Serialize)]
pub struct NodeResult {
    pub node: String,
    pub outcome: NodeOutcome,
}

/// Result of executing a flow
#[derive(Debug, Serialize)]
pub struct RunReport {
    /// Outcome per node, in definition order
    pub results: Vec<NodeResult>,
    /// Total wall-clock time
    #[serde(rename = "duration_secs", serialize_with = "duration_secs")]
    pub duration: Duration,
    /// Whether every node exited with status zero
    pub success: bool,
}

fn duration_secs<S: Serializer>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_f64(duration.as_secs_f64())
}

impl RunReport {
    /// Build a report from collected outcomes
    pub fn from_outcomes(results: Vec<NodeResult>, duration: Duration) -> Self {
        let success = results.iter().all(|r| r.outcome.success());
        Self {
            results,
            duration,
            success,
        }
    }

    /// The nodes that did not succeed
    pub fn failures(&self) -> Vec<&NodeResult> {
        self.results
            .iter()
            .filter(|r| !r.outcome.success())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result(node: &str, outcome: NodeOutcome) -> NodeResult {
        NodeResult {
            node: node.into(),
            outcome,
        }
    }

    #[test]
    fn test_only_zero_exit_succeeds() {
        assert!(NodeOutcome::Exited { code: 0 }.success());
        assert!(!NodeOutcome::Exited { code: 3 }.success());
        assert!(!NodeOutcome::Signaled {
            description: "signal 9".into()
        }
        .success());
        assert!(!NodeOutcome::SpawnFailed {
            error: "no such file".into()
        }
        .success());
    }

    #[test]
    fn test_report_success_requires_all_nodes() {
        let report = RunReport::from_outcomes(
            vec![
                result("a", NodeOutcome::Exited { code: 0 }),
                result("b", NodeOutcome::Exited { code: 0 }),
            ],
            Duration::from_millis(12),
        );
        assert!(report.success);
        assert!(report.failures().is_empty());
    }

    #[test]
    fn test_report_collects_every_failure() {
        let report = RunReport::from_outcomes(
            vec![
                result("a", NodeOutcome::Exited { code: 1 }),
                result("b", NodeOutcome::Exited { code: 0 }),
                result(
                    "c",
                    NodeOutcome::SpawnFailed {
                        error: "permission denied".into(),
                    },
                ),
            ],
            Duration::from_millis(40),
        );
        assert!(!report.success);

        let failing: Vec<&str> = report.failures().iter().map(|r| r.node.as_str()).collect();
        assert_eq!(failing, vec!["a", "c"]);
    }

    #[test]
    fn test_empty_report_is_success() {
        let report = RunReport::from_outcomes(vec![], Duration::ZERO);
        assert!(report.success);
    }

    #[test]
    fn test_describe_outcomes() {
        assert_eq!(
            NodeOutcome::Exited { code: 3 }.describe(),
            "exited with status 3"
        );
        assert_eq!(
            NodeOutcome::Signaled {
                description: "signal 15".into()
            }
            .describe(),
            "terminated by signal 15"
        );
        assert!(NodeOutcome::SpawnFailed {
            error: "boom".into()
        }
        .describe()
        .starts_with("failed to start"));
    }

    #[test]
    fn test_report_serializes_to_json() {
        let report = RunReport::from_outcomes(
            vec![result("a", NodeOutcome::Exited { code: 0 })],
            Duration::from_millis(250),
        );

        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["success"], true);
        assert_eq!(json["results"][0]["node"], "a");
        assert_eq!(json["results"][0]["outcome"]["status"], "exited");
        assert_eq!(json["results"][0]["outcome"]["code"], 0);
        assert!((json["duration_secs"].as_f64().unwrap() - 0.25).abs() < 1e-9);
    }
}
