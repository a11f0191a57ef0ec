use crate::Result;
use crate::fetch::Backend;
use crate::results::OutputFormat;
use camino::{Utf8Path, Utf8PathBuf};
use core::time::Duration;
use ohno::{IntoAppError, app_err};
use serde::Deserialize;
use std::fs;
use std::io;

/// The default configuration TOML content, embedded from `default_config.toml`
pub const DEFAULT_CONFIG_TOML: &str = include_str!("../../default_config.toml");

/// Name of the configuration file looked up in the working directory
pub const CONFIG_FILE_NAME: &str = "stdrank.toml";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Package index to query
    #[serde(default)]
    pub backend: Backend,

    /// Address each package identifier is appended to, overriding the backend's
    pub base_url: Option<String>,

    /// Address probed before the batch starts, overriding the backend's
    pub root_url: Option<String>,

    /// Maximum number of requests in flight, overriding the backend's default
    pub concurrency: Option<usize>,

    /// Upper bound on each request
    #[serde(default = "default_request_timeout", with = "humantime_serde")]
    pub request_timeout: Duration,

    /// Results file
    #[serde(default = "default_output")]
    pub output: Utf8PathBuf,

    /// Layout of the results file, overriding the backend's default
    pub format: Option<OutputFormat>,

    /// Go toolchain used to list the standard library
    #[serde(default = "default_go")]
    pub go: Utf8PathBuf,

    /// File to read the package list from instead of asking the Go toolchain
    pub targets_file: Option<Utf8PathBuf>,
}

const fn default_request_timeout() -> Duration {
    Duration::from_secs(30)
}

fn default_output() -> Utf8PathBuf {
    Utf8PathBuf::from("result.json")
}

fn default_go() -> Utf8PathBuf {
    Utf8PathBuf::from("go")
}

impl Config {
    /// Load configuration from a file or use defaults
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed, or holds invalid values
    pub fn load(base_dir: &Utf8Path, config_path: Option<&Utf8PathBuf>) -> Result<Self> {
        let (final_path, text) = if let Some(path) = config_path {
            let text = fs::read_to_string(path).into_app_err_with(|| format!("reading stdrank configuration file '{path}'"))?;
            (path.clone(), text)
        } else {
            let path = base_dir.join(CONFIG_FILE_NAME);
            match fs::read_to_string(&path) {
                Ok(text) => (path, text),
                Err(e) if e.kind() == io::ErrorKind::NotFound => {
                    return Ok(Self::default());
                }
                Err(e) => return Err(e).into_app_err_with(|| format!("reading stdrank configuration file '{path}'")),
            }
        };

        let config: Self = toml::from_str(&text).into_app_err_with(|| format!("parsing configuration file '{final_path}'"))?;
        config.validate().into_app_err_with(|| format!("validating configuration file '{final_path}'"))?;

        Ok(config)
    }

    /// Save the default configuration to a TOML file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written
    pub fn save_default(output_path: &Utf8Path) -> Result<()> {
        fs::write(output_path, DEFAULT_CONFIG_TOML).into_app_err_with(|| format!("writing default configuration to {output_path}"))?;
        Ok(())
    }

    /// Validate configuration values
    ///
    /// # Errors
    ///
    /// Returns an error if a value is out of range or an address does not parse
    fn validate(&self) -> Result<()> {
        if self.concurrency == Some(0) {
            return Err(app_err!("concurrency must be at least 1"));
        }

        if self.request_timeout.is_zero() {
            return Err(app_err!("request_timeout must be greater than zero"));
        }

        for (name, value) in [("base_url", &self.base_url), ("root_url", &self.root_url)] {
            if let Some(value) = value {
                let _ = validate_url(value).into_app_err_with(|| format!("{name} is not a valid URL"))?;
            }
        }

        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        toml::from_str(DEFAULT_CONFIG_TOML).expect("default_config.toml should be valid TOML that deserializes to Config")
    }
}

/// Check that `value` is an absolute http(s) address.
pub fn validate_url(value: &str) -> Result<url::Url> {
    let url = url::Url::parse(value).into_app_err_with(|| format!("parsing '{value}'"))?;

    match url.scheme() {
        "http" | "https" => Ok(url),
        scheme => Err(app_err!("'{value}' uses unsupported scheme '{scheme}'")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(text: &str) -> Result<Config> {
        let config: Config = toml::from_str(text).into_app_err("parsing test configuration")?;
        config.validate()?;
        Ok(config)
    }

    #[test]
    fn test_default_config_is_valid() {
        let config = Config::default();
        config.validate().unwrap();
    }

    #[test]
    fn test_default_values() {
        let config = Config::default();
        assert_eq!(config.backend, Backend::PkgGoDev);
        assert_eq!(config.base_url, None);
        assert_eq!(config.concurrency, None);
        assert_eq!(config.request_timeout, Duration::from_secs(30));
        assert_eq!(config.output, "result.json");
        assert_eq!(config.format, None);
        assert_eq!(config.go, "go");
        assert_eq!(config.targets_file, None);
    }

    #[test]
    fn test_empty_file_matches_defaults() {
        assert_eq!(parse("").unwrap(), Config::default());
    }

    #[test]
    fn test_full_file() {
        let config = parse(
            r#"
backend = "godoc-api"
base_url = "http://localhost:8080/importers/"
root_url = "http://localhost:8080/"
concurrency = 8
request_timeout = "2m 30s"
output = "out/counts.json"
format = "ranked"
go = "/usr/local/go/bin/go"
targets_file = "std.txt"
"#,
        )
        .unwrap();

        assert_eq!(config.backend, Backend::GodocApi);
        assert_eq!(config.base_url.as_deref(), Some("http://localhost:8080/importers/"));
        assert_eq!(config.concurrency, Some(8));
        assert_eq!(config.request_timeout, Duration::from_secs(150));
        assert_eq!(config.format, Some(OutputFormat::Ranked));
        assert_eq!(config.targets_file.as_deref(), Some(Utf8Path::new("std.txt")));
    }

    #[test]
    fn test_validate_zero_concurrency() {
        let err = parse("concurrency = 0").unwrap_err();
        assert!(err.to_string().contains("concurrency must be at least 1"));
    }

    #[test]
    fn test_validate_zero_timeout() {
        assert!(parse("request_timeout = \"0s\"").is_err());
    }

    #[test]
    fn test_validate_bad_url() {
        assert!(parse("base_url = \"not a url\"").is_err());
        assert!(parse("root_url = \"ftp://example.com/\"").is_err());
    }

    #[test]
    fn test_unknown_field() {
        assert!(parse("retries = 3").is_err());
    }

    #[test]
    fn test_unknown_backend() {
        assert!(parse("backend = \"proxy-golang-org\"").is_err());
    }

    #[test]
    fn test_validate_url() {
        assert_eq!(validate_url("https://pkg.go.dev/").unwrap().host_str(), Some("pkg.go.dev"));
        assert!(validate_url("pkg.go.dev").is_err());
    }

    #[test]
    #[cfg_attr(miri, ignore = "Miri cannot call GetTempPathW")]
    fn test_save_default_and_load() {
        let tmp = tempfile::tempdir().unwrap();
        let output_path = Utf8PathBuf::try_from(tmp.path().join(CONFIG_FILE_NAME)).unwrap();
        Config::save_default(&output_path).unwrap();
        let loaded = Config::load(&Utf8PathBuf::try_from(tmp.path().to_path_buf()).unwrap(), Some(&output_path)).unwrap();
        assert_eq!(loaded, Config::default());
    }

    #[test]
    #[cfg_attr(miri, ignore = "Miri cannot call GetTempPathW")]
    fn test_load_from_base_dir() {
        let tmp = tempfile::tempdir().unwrap();
        let base_dir = Utf8PathBuf::try_from(tmp.path().to_path_buf()).unwrap();
        fs::write(base_dir.join(CONFIG_FILE_NAME), "concurrency = 3\n").unwrap();

        let config = Config::load(&base_dir, None).unwrap();
        assert_eq!(config.concurrency, Some(3));
    }

    #[test]
    #[cfg_attr(miri, ignore = "Miri cannot call GetTempPathW")]
    fn test_load_missing_config_uses_defaults() {
        let tmp = tempfile::tempdir().unwrap();
        let base_dir = Utf8PathBuf::try_from(tmp.path().to_path_buf()).unwrap();
        let config = Config::load(&base_dir, None).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    #[cfg_attr(miri, ignore = "Miri cannot call GetTempPathW")]
    fn test_load_missing_explicit_config_fails() {
        let tmp = tempfile::tempdir().unwrap();
        let base_dir = Utf8PathBuf::try_from(tmp.path().to_path_buf()).unwrap();
        let missing = base_dir.join("nope.toml");
        assert!(Config::load(&base_dir, Some(&missing)).is_err());
    }

    #[test]
    fn test_default_config_toml_is_not_empty() {
        assert!(!DEFAULT_CONFIG_TOML.is_empty());
    }
}
