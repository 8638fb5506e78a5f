// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 pipeflow contributors

//! CLI definitions and handlers
//!
//! Defines the command-line interface for pipeflow.

pub mod run;

use clap::Parser;
use std::path::PathBuf;

/// Declarative process flow runner
///
/// Wires ordinary shell commands together with pipes, as declared in a
/// flow file.
#[derive(Parser, Debug)]
#[clap(
    name = "pipeflow",
    version,
    about = "Run a declared flow of piped processes",
    long_about = None,
    after_help = "Examples:\n\
        pipeflow build.flow run             Execute the flow\n\
        pipeflow build.flow run --dry-run   Validate and show the plan\n\
        pipeflow build.flow run --graph dot Print the flow as Graphviz DOT\n\n\
        A flow file declares nodes and pipes, one key=value per line:\n\
            node=producer\n\
            command=echo hi\n\
            node=consumer\n\
            command=cat\n\
            pipe=x\n\
            from=producer\n\
            to=consumer"
)]
pub struct Cli {
    /// Flow definition file
    #[clap(value_name = "FLOW_FILE")]
    pub flow_file: PathBuf,

    /// Action to perform (reserved; every action currently runs the flow)
    #[clap(value_name = "ACTION")]
    pub action: String,

    /// Enable verbose output
    #[clap(short, long)]
    pub verbose: bool,

    /// Change to directory before executing
    #[clap(short = 'C', long, value_name = "DIR")]
    pub directory: Option<PathBuf>,

    /// Shell used to run node commands
    #[clap(long, default_value = "sh", value_name = "SHELL")]
    pub shell: String,

    /// Report format: text or json
    #[clap(short, long, default_value = "text", value_name = "FORMAT")]
    pub format: ReportFormat,

    /// Print the flow graph (dot or mermaid) instead of running it
    #[clap(long, value_name = "FORMAT")]
    pub graph: Option<GraphFormat>,

    /// Validate and show the plan without spawning processes
    #[clap(long)]
    pub dry_run: bool,
}

/// Report output format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportFormat {
    Text,
    Json,
}

impl std::str::FromStr for ReportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            _ => Err(format!("Unknown report format: {}", s)),
        }
    }
}

/// Graph output format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GraphFormat {
    Dot,
    Mermaid,
}

impl std::str::FromStr for GraphFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "dot" => Ok(Self::Dot),
            "mermaid" => Ok(Self::Mermaid),
            _ => Err(format!("Unknown graph format: {}", s)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_format_from_str() {
        assert_eq!("text".parse::<ReportFormat>().unwrap(), ReportFormat::Text);
        assert_eq!("JSON".parse::<ReportFormat>().unwrap(), ReportFormat::Json);
        assert!("yaml".parse::<ReportFormat>().is_err());
    }

    #[test]
    fn test_graph_format_from_str() {
        assert_eq!("dot".parse::<GraphFormat>().unwrap(), GraphFormat::Dot);
        assert_eq!(
            "Mermaid".parse::<GraphFormat>().unwrap(),
            GraphFormat::Mermaid
        );
        assert!("svg".parse::<GraphFormat>().is_err());
    }

    #[test]
    fn test_cli_parses_minimal_invocation() {
        let cli = Cli::try_parse_from(["pipeflow", "build.flow", "run"]).unwrap();
        assert_eq!(cli.flow_file, PathBuf::from("build.flow"));
        assert_eq!(cli.action, "run");
        assert_eq!(cli.shell, "sh");
        assert_eq!(cli.format, ReportFormat::Text);
        assert!(cli.graph.is_none());
        assert!(!cli.dry_run);
    }

    #[test]
    fn test_cli_requires_flow_file_and_action() {
        assert!(Cli::try_parse_from(["pipeflow"]).is_err());
        assert!(Cli::try_parse_from(["pipeflow", "build.flow"]).is_err());
    }
}
