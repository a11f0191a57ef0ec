//! Command dispatch logic for stdrank

use super::{
    InitArgs, ScrapeArgs, TargetsArgs, ValidateArgs, init_config, list_targets, process_scrape, validate_config,
};
use crate::{Host, Result};
use clap::builder::Styles;
use clap::builder::styling::{AnsiColor, Effects};
use clap::{Parser, Subcommand};

const CLAP_STYLES: Styles = Styles::styled()
    .header(AnsiColor::Green.on_default().effects(Effects::BOLD))
    .usage(AnsiColor::Green.on_default().effects(Effects::BOLD))
    .literal(AnsiColor::Cyan.on_default().effects(Effects::BOLD))
    .placeholder(AnsiColor::Cyan.on_default());

#[derive(Parser, Debug)]
#[command(name = "stdrank", version, author, long_about = None)]
#[command(about = "Rank Go standard library packages by how many packages import them")]
#[command(styles = CLAP_STYLES)]
struct Cli {
    #[command(subcommand)]
    command: StdrankSubcommand,
}

#[derive(Subcommand, Debug)]
enum StdrankSubcommand {
    /// Fetch the importer count of every public standard library package and write the results
    Scrape(Box<ScrapeArgs>),
    /// Print the packages that would be measured
    Targets(TargetsArgs),
    /// Generate a default configuration file
    Init(InitArgs),
    /// Validate a configuration file
    Validate(ValidateArgs),
}

/// Dispatch command-line arguments to the appropriate handler
///
/// This function parses the command-line arguments and executes the corresponding
/// subcommand. It's designed to be called from main.rs with the program arguments.
///
/// # Errors
///
/// Returns an error if the executed command fails
pub async fn run<I, T, H>(host: &mut H, args: I) -> Result<()>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
    H: Host,
{
    match &Cli::parse_from(args).command {
        StdrankSubcommand::Scrape(scrape_args) => process_scrape(host, scrape_args).await,
        StdrankSubcommand::Targets(targets_args) => list_targets(host, targets_args).await,
        StdrankSubcommand::Init(init_args) => init_config(host, init_args),
        StdrankSubcommand::Validate(validate_args) => validate_config(host, validate_args),
    }
}
