//! Command-line interface and orchestration for stdrank
//!
//! This module implements the CLI commands and ties the other modules together: it parses
//! arguments, merges them with the configuration file, and drives a run from package enumeration
//! to the results file.
//!
//! ## Commands
//!
//! - **scrape**: Enumerate the public standard library packages, check that the upstream service
//!   answers, fetch every package's importer count, and write the results
//! - **targets**: Print the packages a scrape would measure
//! - **init**: Generate a default configuration file
//! - **validate**: Check a configuration file
//!
//! ## Execution Flow
//!
//! A scrape moves through fixed phases and stops at the first fatal one, printing which phase
//! failed:
//!
//! 1. Load configuration (`stdrank.toml`, overridden by command-line options)
//! 2. Load the list of packages and remove internal ones
//! 3. Probe the upstream root address
//! 4. Fetch all packages through the bounded pipeline
//! 5. Write the results atomically
//!
//! Packages that fail in phase 4 are listed on stderr and left out of the results; they do not
//! fail the run.

mod common;
mod config;
mod host;
mod init;
mod run;
mod scrape;
mod targets;
mod validate;

pub use host::Host;
pub use init::{InitArgs, init_config};
pub use run::run;
pub use scrape::{ScrapeArgs, process_scrape};
pub use targets::{TargetsArgs, list_targets};
pub use validate::{ValidateArgs, validate_config};
