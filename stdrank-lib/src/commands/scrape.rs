use super::Host;
use super::common::{SourceArgs, fail, load_targets};
use super::config::{Config, validate_url};
use crate::Result;
use crate::fetch::{Backend, BatchReport, Pipeline, PipelineSettings};
use crate::results::{OutputFormat, write_results};
use camino::Utf8PathBuf;
use clap::Parser;
use core::time::Duration;
use ohno::{IntoAppError, app_err};
use std::io::Write;

const LOG_TARGET: &str = "    scrape";

#[derive(Parser, Debug, Default)]
pub struct ScrapeArgs {
    #[command(flatten)]
    pub source: SourceArgs,

    /// Package index to query
    #[arg(long, short = 'b', value_name = "BACKEND")]
    pub backend: Option<Backend>,

    /// Address each package identifier is appended to
    #[arg(long, value_name = "URL")]
    pub base_url: Option<String>,

    /// Address probed before any package is fetched
    #[arg(long, value_name = "URL")]
    pub root_url: Option<String>,

    /// Maximum number of requests in flight
    #[arg(long, short = 'j', value_name = "N")]
    pub concurrency: Option<usize>,

    /// Upper bound on each request (e.g. `30s`, `2m`)
    #[arg(long, value_name = "DURATION", value_parser = parse_duration)]
    pub timeout: Option<Duration>,

    /// Where to write the results
    #[arg(long, short = 'o', value_name = "PATH")]
    pub output: Option<Utf8PathBuf>,

    /// Layout of the results file
    #[arg(long, value_name = "FORMAT")]
    pub format: Option<OutputFormat>,
}

fn parse_duration(value: &str) -> Result<Duration, String> {
    humantime_serde::re::humantime::parse_duration(value).map_err(|e| e.to_string())
}

/// Everything a scrape run needs, with command line, configuration file, and backend defaults merged.
#[derive(Debug, Clone, PartialEq, Eq)]
struct ScrapeSettings {
    pipeline: PipelineSettings,
    output: Utf8PathBuf,
    format: OutputFormat,
}

impl ScrapeSettings {
    fn resolve(args: &ScrapeArgs, config: &Config) -> Result<Self> {
        let backend = args.backend.unwrap_or(config.backend);

        let base_url = args
            .base_url
            .clone()
            .or_else(|| config.base_url.clone())
            .unwrap_or_else(|| backend.base_url().to_string());

        let root_url = args
            .root_url
            .clone()
            .or_else(|| config.root_url.clone())
            .unwrap_or_else(|| backend.root_url().to_string());

        let _ = validate_url(&base_url).into_app_err("invalid base URL")?;
        let _ = validate_url(&root_url).into_app_err("invalid root URL")?;

        let concurrency = args.concurrency.or(config.concurrency).unwrap_or_else(|| backend.default_concurrency());
        if concurrency == 0 {
            return Err(app_err!("concurrency must be at least 1"));
        }

        let request_timeout = args.timeout.unwrap_or(config.request_timeout);
        if request_timeout.is_zero() {
            return Err(app_err!("the request timeout must be greater than zero"));
        }

        Ok(Self {
            pipeline: PipelineSettings {
                base_url,
                root_url,
                extractor: backend.extractor(),
                concurrency,
                request_timeout,
            },
            output: args.output.clone().unwrap_or_else(|| config.output.clone()),
            format: args.format.or(config.format).unwrap_or_else(|| backend.default_format()),
        })
    }
}

/// Measure every public standard library package and write the counts.
///
/// The run stops at the first phase that fails: configuration, package enumeration, the upstream
/// check, or writing the results. Packages that cannot be measured are reported but do not fail
/// the run.
pub async fn process_scrape<H: Host>(host: &mut H, args: &ScrapeArgs) -> Result<()> {
    let config = match args.source.load_config() {
        Ok(config) => config,
        Err(e) => return fail(host, "loading configuration", e),
    };

    let settings = match ScrapeSettings::resolve(args, &config) {
        Ok(settings) => settings,
        Err(e) => return fail(host, "resolving settings", e),
    };

    let pipeline = match Pipeline::new(&settings.pipeline) {
        Ok(pipeline) => pipeline,
        Err(e) => return fail(host, "creating the HTTP client", e),
    };

    log::info!(target: LOG_TARGET, "Loading the list of packages");
    let targets = match load_targets(&args.source.target_source(&config)).await {
        Ok(targets) => targets,
        Err(e) => return fail(host, "loading the list of packages", e),
    };

    if let Err(e) = pipeline.check_upstream().await {
        return fail(host, "checking the upstream service", e);
    }

    let report = pipeline.run(targets).await;
    report_failures(host, &report);

    let count = report.results.len();
    log::info!(target: LOG_TARGET, "Writing {count} results to '{}'", settings.output);
    if let Err(e) = write_results(report.results, settings.format, &settings.output) {
        return fail(host, "writing results", e);
    }

    let _ = writeln!(host.output(), "✅ Done! Wrote {count} packages to '{}'", settings.output);
    Ok(())
}

fn report_failures<H: Host>(host: &mut H, report: &BatchReport) {
    if report.failures.is_empty() {
        return;
    }

    let mut err = host.error();
    let _ = writeln!(err, "⚠️ {} package(s) could not be measured:", report.failures.len());
    for (target, outcome) in &report.failures {
        let _ = writeln!(err, "  {target}: {outcome}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::common::LogLevel;
    use crate::commands::host::TestHost;
    use crate::extract::Extractor;
    use crate::fetch::FetchOutcome;
    use crate::results::ResultEntry;
    use crate::targets::Target;
    use reqwest::StatusCode;

    #[test]
    fn test_resolve_backend_defaults() {
        let settings = ScrapeSettings::resolve(&ScrapeArgs::default(), &Config::default()).unwrap();
        assert_eq!(settings.pipeline.base_url, Backend::PkgGoDev.base_url());
        assert_eq!(settings.pipeline.root_url, Backend::PkgGoDev.root_url());
        assert_eq!(settings.pipeline.extractor, Extractor::Markup);
        assert_eq!(settings.pipeline.concurrency, 1);
        assert_eq!(settings.pipeline.request_timeout, Duration::from_secs(30));
        assert_eq!(settings.output, "result.json");
        assert_eq!(settings.format, OutputFormat::Ranked);
    }

    #[test]
    fn test_resolve_godoc_defaults() {
        let args = ScrapeArgs {
            backend: Some(Backend::GodocApi),
            ..ScrapeArgs::default()
        };

        let settings = ScrapeSettings::resolve(&args, &Config::default()).unwrap();
        assert_eq!(settings.pipeline.base_url, Backend::GodocApi.base_url());
        assert_eq!(settings.pipeline.extractor, Extractor::Document);
        assert_eq!(settings.pipeline.concurrency, 20);
        assert_eq!(settings.format, OutputFormat::Map);
    }

    #[test]
    fn test_resolve_precedence() {
        let config = Config {
            concurrency: Some(4),
            base_url: Some("http://config.example/".to_string()),
            request_timeout: Duration::from_secs(5),
            ..Config::default()
        };
        let args = ScrapeArgs {
            concurrency: Some(8),
            output: Some(Utf8PathBuf::from("cli.json")),
            ..ScrapeArgs::default()
        };

        let settings = ScrapeSettings::resolve(&args, &config).unwrap();
        assert_eq!(settings.pipeline.concurrency, 8);
        assert_eq!(settings.pipeline.base_url, "http://config.example/");
        assert_eq!(settings.pipeline.request_timeout, Duration::from_secs(5));
        assert_eq!(settings.output, "cli.json");
    }

    #[test]
    fn test_resolve_rejects_bad_values() {
        let zero = ScrapeArgs {
            concurrency: Some(0),
            ..ScrapeArgs::default()
        };
        assert!(ScrapeSettings::resolve(&zero, &Config::default()).is_err());

        let bad_url = ScrapeArgs {
            base_url: Some("pkg.go.dev".to_string()),
            ..ScrapeArgs::default()
        };
        assert!(ScrapeSettings::resolve(&bad_url, &Config::default()).is_err());

        let no_time = ScrapeArgs {
            timeout: Some(Duration::ZERO),
            ..ScrapeArgs::default()
        };
        assert!(ScrapeSettings::resolve(&no_time, &Config::default()).is_err());
    }

    #[test]
    fn test_parse_duration() {
        assert_eq!(parse_duration("1m 5s").unwrap(), Duration::from_secs(65));
        assert!(parse_duration("soon").is_err());
    }

    #[test]
    fn test_report_failures() {
        let report = BatchReport::from_outcomes([
            (Target::new("fmt").unwrap(), FetchOutcome::Found(10)),
            (Target::new("os").unwrap(), FetchOutcome::Status(StatusCode::NOT_FOUND)),
        ]);

        let mut host = TestHost::new();
        report_failures(&mut host, &report);

        let stderr = host.error_str();
        assert!(stderr.contains("1 package(s) could not be measured"));
        assert!(stderr.contains("os: "));
        assert!(!stderr.contains("fmt"));
        assert_eq!(report.results.entries(), [ResultEntry::new(Target::new("fmt").unwrap(), 10)]);
    }

    #[test]
    fn test_report_no_failures_is_silent() {
        let mut host = TestHost::new();
        report_failures(&mut host, &BatchReport::default());
        assert!(host.error_buf.is_empty());
    }

    #[tokio::test]
    #[cfg_attr(miri, ignore = "Miri cannot call GetTempPathW")]
    async fn test_missing_targets_file_fails_before_network() {
        let tmp = tempfile::tempdir().unwrap();
        let output = Utf8PathBuf::try_from(tmp.path().join("result.json")).unwrap();

        let args = ScrapeArgs {
            source: SourceArgs {
                targets_file: Some(Utf8PathBuf::try_from(tmp.path().join("missing.txt")).unwrap()),
                log_level: LogLevel::None,
                ..SourceArgs::default()
            },
            root_url: Some("http://127.0.0.1:9/".to_string()),
            output: Some(output.clone()),
            ..ScrapeArgs::default()
        };

        let mut host = TestHost::new();
        assert!(process_scrape(&mut host, &args).await.is_err());
        assert_eq!(host.exit_code, Some(1));
        assert!(host.error_str().contains("loading the list of packages"));
        assert!(!output.exists());
    }
}
