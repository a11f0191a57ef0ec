#![doc(hidden)]
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! Core library for stdrank
//!
//! This library holds all functionality of the stdrank tool, which measures how many packages
//! import each package of the Go standard library and writes the counts to a JSON file.
//!
//! # Module Organization
//!
//! - `commands`: Command-line interface and orchestration
//! - [`targets`]: Enumeration and filtering of the packages to measure
//! - [`fetch`]: The bounded-concurrency fetch pipeline
//! - [`extract`]: Pulling a count out of a response body
//! - [`results`]: Aggregation and persistence of the counts

pub type Result<T, E = ohno::AppError> = core::result::Result<T, E>;

mod commands;
pub mod extract;
pub mod fetch;
pub mod results;
pub mod targets;

pub use crate::commands::{Host, run};
