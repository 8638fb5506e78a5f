// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 pipeflow contributors

//! # pipeflow - Declarative Process Flow Runner
//!
//! `pipeflow` runs a flow of ordinary shell commands wired together with
//! pipes, as declared in a plain-text flow file.
//!
//! ## Features
//!
//! - **Declarative flows** - Nodes and pipes in a line-oriented key=value file
//! - **Validated before launch** - Dangling pipes, fan-in/fan-out, and cycles
//!   are rejected with zero processes spawned
//! - **Concurrent execution** - Every node runs at once; the pipes do the
//!   scheduling
//! - **Complete reports** - Every node's outcome is collected, not just the
//!   first failure
//!
//! ## Quick Start
//!
//! ```bash
//! # Run a flow
//! pipeflow build.flow run
//!
//! # Validate and show the plan without spawning anything
//! pipeflow build.flow run --dry-run
//!
//! # Print the flow as Graphviz DOT
//! pipeflow build.flow run --graph dot
//! ```

pub mod cli;
pub mod errors;
pub mod flow;

// Re-export commonly used types
pub use errors::{FlowError, FlowResult};
pub use flow::{Edge, Flow, FlowExecutor, Node, RunReport};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
