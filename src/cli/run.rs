// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 pipeflow contributors

//! Run handler - validate and execute a flow

use colored::Colorize;
use miette::Result;
use std::path::Path;

use crate::cli::{Cli, GraphFormat, ReportFormat};
use crate::errors::FlowError;
use crate::flow::{ExecutionOptions, Flow, FlowDag, FlowExecutor, FlowValidator, RunReport};

/// Run a flow
pub async fn run(cli: Cli) -> Result<()> {
    // Check flow file exists
    if !cli.flow_file.exists() {
        return Err(miette::miette!(
            "Flow file not found: {}",
            cli.flow_file.display()
        ));
    }

    // The action argument is reserved for future verbs
    tracing::debug!(action = %cli.action, "requested action");

    // Load flow
    let flow = Flow::from_file(&cli.flow_file)?;

    // Validate flow
    let validation = FlowValidator::validate(&flow)?;

    if !validation.is_valid() {
        eprintln!("{}", "Flow validation failed:".red().bold());
        for error in &validation.errors {
            eprintln!("  {} {}", "✗".red(), error);
        }
        return Err(miette::miette!("Flow definition is invalid"));
    }

    if validation.has_warnings() {
        eprintln!("{}", "Flow warnings:".yellow().bold());
        for warning in &validation.warnings {
            eprintln!("  {} {}", "⚠".yellow(), warning);
        }
        eprintln!();
    }

    // Graph mode prints the structure and stops
    if let Some(format) = cli.graph {
        let dag = FlowDag::build(&flow)?;
        match format {
            GraphFormat::Dot => print!("{}", dag.to_dot()),
            GraphFormat::Mermaid => print!("{}", dag.to_mermaid()),
        }
        return Ok(());
    }

    // Create executor with the requested shell
    let shell = which::which(&cli.shell).map_err(|_| FlowError::ShellNotFound {
        shell: cli.shell.clone(),
    })?;
    let executor = FlowExecutor::with_shell(shell);

    let working_dir = std::env::current_dir().map_err(FlowError::from)?;

    // The plan is part of the text surface; JSON mode keeps stdout parseable
    if (cli.dry_run || cli.verbose) && cli.format == ReportFormat::Text {
        print_plan(&flow, &cli.flow_file, executor.shell());
    }

    // Execute
    let options = ExecutionOptions {
        dry_run: cli.dry_run,
    };
    let report = executor.execute(&flow, &working_dir, &options).await?;

    if cli.dry_run {
        match cli.format {
            ReportFormat::Json => print_json_report(&report)?,
            ReportFormat::Text => {
                println!();
                println!("Dry run: no processes were spawned.");
            }
        }
        return Ok(());
    }

    match cli.format {
        ReportFormat::Json => print_json_report(&report)?,
        ReportFormat::Text => print_text_report(&report),
    }

    if !report.success {
        let failures = report.failures();
        return Err(miette::miette!(
            "{} of {} nodes failed",
            failures.len(),
            report.results.len()
        ));
    }

    Ok(())
}

/// Print what a run would do
fn print_plan(flow: &Flow, flow_file: &Path, shell: &Path) {
    println!();
    println!("{}: {}", "Flow".bold(), flow_file.display());
    println!("{}", "═".repeat(50));
    println!(
        "Plan ({} node{}, {} pipe{}, shell: {}):",
        flow.nodes.len(),
        if flow.nodes.len() == 1 { "" } else { "s" },
        flow.edges.len(),
        if flow.edges.len() == 1 { "" } else { "s" },
        shell.display()
    );
    println!();

    for (i, node) in flow.nodes.iter().enumerate() {
        print!("  {}. {}", i + 1, node.name.bold());
        if let Some(edge) = flow.inbound_edge(&node.name) {
            print!(" {}", format!("[stdin <- {}]", edge.from).dimmed());
        }
        if let Some(edge) = flow.outbound_edge(&node.name) {
            print!(" {}", format!("[stdout -> {}]", edge.to).dimmed());
        }
        println!();
        println!("     {}", node.command.dimmed());
    }
}

fn print_text_report(report: &RunReport) {
    println!();
    for result in &report.results {
        if result.outcome.success() {
            println!("  {} {}", "✓".green(), result.node.bold());
        } else {
            println!(
                "  {} {} {}",
                "✗".red(),
                result.node.bold(),
                result.outcome.describe()
            );
        }
    }

    println!();
    if report.success {
        println!(
            "{}",
            format!(
                "Flow completed successfully in {:.2}s",
                report.duration.as_secs_f64()
            )
            .green()
        );
    } else {
        println!(
            "{}",
            format!("Flow failed after {:.2}s", report.duration.as_secs_f64()).red()
        );
    }
}

fn print_json_report(report: &RunReport) -> Result<()> {
    let json = serde_json::to_string_pretty(report)
        .map_err(|e| miette::miette!("Failed to serialize report: {}", e))?;
    println!("{}", json);
    Ok(())
}
