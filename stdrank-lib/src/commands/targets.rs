use super::Host;
use super::common::{SourceArgs, fail, load_targets};
use crate::Result;
use clap::Parser;
use std::io::Write;

#[derive(Parser, Debug, Default)]
pub struct TargetsArgs {
    #[command(flatten)]
    pub source: SourceArgs,
}

/// Print the packages a scrape would measure, one per line.
pub async fn list_targets<H: Host>(host: &mut H, args: &TargetsArgs) -> Result<()> {
    let config = match args.source.load_config() {
        Ok(config) => config,
        Err(e) => return fail(host, "loading configuration", e),
    };

    let targets = match load_targets(&args.source.target_source(&config)).await {
        Ok(targets) => targets,
        Err(e) => return fail(host, "loading the list of packages", e),
    };

    let mut out = host.output();
    for target in &targets {
        let _ = writeln!(out, "{target}");
    }

    Ok(())
}
