use crate::Result;
use camino::Utf8PathBuf;
use ohno::{IntoAppError, app_err};
use tokio::process::Command;

const LOG_TARGET: &str = "   targets";

/// Where the raw list of standard library packages comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TargetSource {
    /// Ask the Go toolchain with `<go> list std`.
    GoList { go: Utf8PathBuf },

    /// Read one identifier per line from a file. Blank lines and `#` comments are skipped.
    File(Utf8PathBuf),
}

impl TargetSource {
    /// Load the raw, unfiltered identifiers.
    pub async fn load(&self) -> Result<Vec<String>> {
        match self {
            Self::GoList { go } => list_std(go).await,
            Self::File(path) => {
                log::debug!(target: LOG_TARGET, "Reading package list from '{path}'");
                let text = tokio::fs::read_to_string(path)
                    .await
                    .into_app_err_with(|| format!("reading package list '{path}'"))?;
                Ok(parse_list(&text))
            }
        }
    }
}

async fn list_std(go: &Utf8PathBuf) -> Result<Vec<String>> {
    log::debug!(target: LOG_TARGET, "Running '{go} list std'");

    let output = Command::new(go)
        .args(["list", "std"])
        .output()
        .await
        .into_app_err_with(|| format!("running '{go} list std'"))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(app_err!("'{go} list std' failed with {}: {}", output.status, stderr.trim()));
    }

    let stdout = String::from_utf8(output.stdout).into_app_err_with(|| format!("decoding output of '{go} list std'"))?;
    let ids = parse_list(&stdout);

    log::debug!(target: LOG_TARGET, "'{go} list std' reported {} packages", ids.len());
    Ok(ids)
}

/// Split a newline-separated package list into identifiers.
#[must_use]
pub fn parse_list(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(str::to_string)
        .collect()
}
