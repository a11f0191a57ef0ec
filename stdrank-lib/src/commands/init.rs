use super::Host;
use super::config::{CONFIG_FILE_NAME, Config};
use crate::Result;
use camino::Utf8PathBuf;
use clap::Parser;
use std::io::Write;

#[derive(Parser, Debug, Default)]
pub struct InitArgs {
    /// Output configuration file path (default is `stdrank.toml` in the working directory)
    #[arg(value_name = "PATH")]
    pub output: Option<Utf8PathBuf>,
}

pub fn init_config<H: Host>(host: &mut H, args: &InitArgs) -> Result<()> {
    let output = args.output.clone().unwrap_or_else(|| Utf8PathBuf::from(CONFIG_FILE_NAME));

    if let Err(e) = Config::save_default(&output) {
        let _ = writeln!(host.error(), "❌ Could not write configuration file: {e}");
        host.exit(1);
        return Err(e);
    }

    let _ = writeln!(host.output(), "Generated default configuration file: {output}");
    Ok(())
}
