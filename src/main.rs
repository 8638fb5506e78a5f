// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 pipeflow contributors

//! pipeflow - Declarative Process Flow Runner
//!
//! Runs a flow of shell commands wired together with pipes.

use clap::error::ErrorKind;
use clap::Parser;
use miette::Result;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use pipeflow::cli::Cli;

#[tokio::main]
async fn main() -> Result<()> {
    // Usage problems exit 1 like any other failure; help and version
    // requests keep clap's zero exit.
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => match e.kind() {
            ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => e.exit(),
            _ => {
                let _ = e.print();
                std::process::exit(1);
            }
        },
    };

    // Initialize tracing; events go to stderr so report output on
    // stdout stays machine-readable.
    let default_filter = if cli.verbose {
        "pipeflow=debug"
    } else {
        "pipeflow=info"
    };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();

    // Change to specified directory if provided
    if let Some(ref dir) = cli.directory {
        std::env::set_current_dir(dir).map_err(|e| {
            miette::miette!("Failed to change to directory '{}': {}", dir.display(), e)
        })?;
    }

    pipeflow::cli::run::run(cli).await
}
