//! Argument groups and helpers shared by the commands.

use super::Host;
use super::config::Config;
use crate::Result;
use crate::targets::{Target, TargetSource, filter_targets};
use camino::{Utf8Path, Utf8PathBuf};
use clap::{Args, ValueEnum};
use std::io::Write;

const LOG_TARGET: &str = "   stdrank";

/// Log level for diagnostic output
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum LogLevel {
    /// No logging output
    None,

    /// Only error messages
    Error,

    /// Warning and error messages
    Warn,

    /// Info, warning, and error messages
    #[default]
    Info,

    /// Debug, info, warning, and error messages
    Debug,

    /// Trace, debug, info, warning, and error messages
    Trace,
}

/// Arguments that decide where configuration and the package list come from
#[derive(Args, Debug, Default)]
pub struct SourceArgs {
    /// Path to configuration file (default is `stdrank.toml`)
    #[arg(long, short = 'c', value_name = "PATH")]
    pub config: Option<Utf8PathBuf>,

    /// Read the packages to measure from a file, one per line, instead of running `go list std`
    #[arg(long, value_name = "PATH")]
    pub targets_file: Option<Utf8PathBuf>,

    /// Go toolchain used to list the standard library
    #[arg(long, value_name = "PATH")]
    pub go: Option<Utf8PathBuf>,

    /// Set the logging level for diagnostic output
    #[arg(long, value_name = "LEVEL", default_value = "info")]
    pub log_level: LogLevel,
}

impl SourceArgs {
    /// Set up logging and read the configuration.
    pub fn load_config(&self) -> Result<Config> {
        init_logging(self.log_level);
        Config::load(Utf8Path::new("."), self.config.as_ref())
    }

    /// Where the package list comes from; the command line wins over the configuration file.
    #[must_use]
    pub fn target_source(&self, config: &Config) -> TargetSource {
        if let Some(path) = self.targets_file.as_ref().or(config.targets_file.as_ref()) {
            return TargetSource::File(path.clone());
        }

        TargetSource::GoList {
            go: self.go.clone().unwrap_or_else(|| config.go.clone()),
        }
    }
}

/// Enumerate the packages to measure, with internal packages removed.
pub async fn load_targets(source: &TargetSource) -> Result<Vec<Target>> {
    let raw = source.load().await?;
    let total = raw.len();
    let targets = filter_targets(raw);

    log::info!(target: LOG_TARGET, "Found {total} packages, {} of them public", targets.len());
    Ok(targets)
}

/// Report a fatal error, naming the phase that failed, and end the process.
pub fn fail<H: Host, T>(host: &mut H, phase: &str, e: ohno::AppError) -> Result<T> {
    let _ = writeln!(host.error(), "❌ Failed while {phase}: {e}");
    host.exit(1);
    Err(e)
}

pub fn init_logging(log_level: LogLevel) {
    let level = match log_level {
        LogLevel::None => return,
        LogLevel::Error => "error",
        LogLevel::Warn => "warn",
        LogLevel::Info => "info",
        LogLevel::Debug => "debug",
        LogLevel::Trace => "trace",
    };

    let env = env_logger::Env::default().filter_or("RUST_LOG", level);

    // A second command in the same process keeps the first logger
    let _ = env_logger::Builder::from_env(env)
        .format_timestamp(None)
        .format_module_path(false)
        .format_target(matches!(log_level, LogLevel::Debug | LogLevel::Trace))
        .try_init();
}
