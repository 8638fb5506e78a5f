// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 pipeflow contributors

//! Flow definitions and types
//!
//! This module defines the core data structures for pipeflow flows,
//! along with the parser, graph checks, executor, and run reports.

mod dag;
mod definition;
mod executor;
mod parser;
mod report;
mod validation;

pub use dag::FlowDag;
pub use definition::*;
pub use executor::{ExecutionOptions, FlowExecutor};
pub use parser::FlowParser;
pub use report::{NodeOutcome, NodeResult, RunReport};
pub use validation::{FlowValidator, ValidationResult};
