use super::ResultSet;
use crate::Result;
use camino::{Utf8Path, Utf8PathBuf};
use clap::ValueEnum;
use ohno::IntoAppError;
use serde::{Deserialize, Serialize};
use std::io::Write;
use tempfile::NamedTempFile;

const LOG_TARGET: &str = "   results";

/// Layout of the results file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum OutputFormat {
    /// An array of `{"libPath", "num"}` records, most imported first
    Ranked,

    /// An object mapping each package to its count
    Map,
}

/// Serialize the results in the requested layout.
///
/// [`OutputFormat::Ranked`] sorts the set by decreasing count first.
pub fn render(results: &mut ResultSet, format: OutputFormat) -> Result<String> {
    let text = match format {
        OutputFormat::Ranked => {
            results.sort_descending();
            serde_json::to_string_pretty(results.entries())
        }
        OutputFormat::Map => serde_json::to_string_pretty(&results.to_map()),
    };

    text.into_app_err("serializing results")
}

/// Write the results to `path`, replacing any previous file in one step.
///
/// The document is written to a temporary file next to `path` and then renamed over it, so a
/// failure never leaves a truncated results file behind.
pub fn write_results(mut results: ResultSet, format: OutputFormat, path: &Utf8Path) -> Result<()> {
    let text = render(&mut results, format)?;

    let dir = match path.parent() {
        Some(parent) if !parent.as_str().is_empty() => parent.to_path_buf(),
        _ => Utf8PathBuf::from("."),
    };

    let mut file = NamedTempFile::new_in(&dir).into_app_err_with(|| format!("unable to create a temporary file in '{dir}'"))?;
    file.write_all(text.as_bytes())
        .into_app_err_with(|| format!("unable to write results for '{path}'"))?;
    file.flush().into_app_err_with(|| format!("unable to flush results for '{path}'"))?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        file.as_file()
            .set_permissions(std::fs::Permissions::from_mode(0o644))
            .into_app_err_with(|| format!("unable to set permissions on results for '{path}'"))?;
    }

    let _ = file
        .persist(path)
        .map_err(|e| e.error)
        .into_app_err_with(|| format!("unable to replace '{path}'"))?;

    log::debug!(target: LOG_TARGET, "Wrote {} entries to '{path}'", results.len());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::results::ResultEntry;
    use crate::targets::Target;

    fn sample() -> ResultSet {
        [("os", 12), ("fmt", 40), ("unsafe", 12), ("io", 31)]
            .into_iter()
            .map(|(id, n)| ResultEntry::new(Target::new(id).unwrap(), n))
            .collect()
    }

    fn temp_path(dir: &tempfile::TempDir, name: &str) -> Utf8PathBuf {
        Utf8PathBuf::try_from(dir.path().join(name)).unwrap()
    }

    #[test]
    fn test_render_ranked() {
        let mut set = sample();
        let text = render(&mut set, OutputFormat::Ranked).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&text).unwrap();

        assert_eq!(
            parsed,
            serde_json::json!([
                { "libPath": "fmt", "num": 40 },
                { "libPath": "io", "num": 31 },
                { "libPath": "os", "num": 12 },
                { "libPath": "unsafe", "num": 12 },
            ])
        );
    }

    #[test]
    fn test_render_map() {
        let mut set = sample();
        let text = render(&mut set, OutputFormat::Map).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&text).unwrap();

        assert_eq!(parsed, serde_json::json!({ "fmt": 40, "io": 31, "os": 12, "unsafe": 12 }));
    }

    #[test]
    fn test_render_empty() {
        let mut set = ResultSet::new();
        assert_eq!(render(&mut set, OutputFormat::Ranked).unwrap(), "[]");
        assert_eq!(render(&mut set, OutputFormat::Map).unwrap(), "{}");
    }

    #[test]
    #[cfg_attr(miri, ignore = "Miri cannot call GetTempPathW")]
    fn test_write_results_replaces_previous_file() {
        let tmp = tempfile::tempdir().unwrap();
        let path = temp_path(&tmp, "result.json");
        std::fs::write(&path, "stale").unwrap();

        write_results(sample(), OutputFormat::Ranked, &path).unwrap();

        let parsed: serde_json::Value = serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(parsed.as_array().unwrap().len(), 4);
        assert_eq!(std::fs::read_dir(tmp.path()).unwrap().count(), 1);
    }

    #[test]
    #[cfg_attr(miri, ignore = "Miri cannot call GetTempPathW")]
    fn test_write_results_into_missing_directory_fails() {
        let tmp = tempfile::tempdir().unwrap();
        let path = temp_path(&tmp, "missing/result.json");

        let err = write_results(sample(), OutputFormat::Map, &path).unwrap_err();
        assert!(err.to_string().contains("temporary file"));
        assert!(!path.exists());
    }

    #[test]
    fn test_format_value_names() {
        let names: Vec<_> = OutputFormat::value_variants()
            .iter()
            .filter_map(|v| v.to_possible_value())
            .map(|v| v.get_name().to_string())
            .collect();
        assert_eq!(names, vec!["ranked", "map"]);
    }
}
