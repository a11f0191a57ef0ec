use super::{BatchReport, FetchOutcome, Throttler};
use crate::Result;
use crate::extract::Extractor;
use crate::targets::Target;
use core::time::Duration;
use futures_util::future::join_all;
use ohno::{IntoAppError, app_err};
use std::sync::Arc;

const LOG_TARGET: &str = "     fetch";

const USER_AGENT: &str = "stdrank";

/// Everything needed to build a [`Pipeline`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineSettings {
    /// Prefix the target identifier is appended to.
    pub base_url: String,

    /// Address probed by [`Pipeline::check_upstream`].
    pub root_url: String,

    pub extractor: Extractor,

    /// Maximum number of requests in flight.
    pub concurrency: usize,

    /// Upper bound on a single request, from connect to the last body byte.
    pub request_timeout: Duration,
}

/// Fetches one count per target, with a fixed cap on concurrent requests.
#[derive(Debug, Clone)]
pub struct Pipeline {
    client: Arc<reqwest::Client>,
    base_url: Arc<str>,
    root_url: Arc<str>,
    extractor: Extractor,
    throttler: Arc<Throttler>,
}

impl Pipeline {
    pub fn new(settings: &PipelineSettings) -> Result<Self> {
        let throttler = Throttler::new(settings.concurrency)?;

        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(settings.request_timeout)
            .build()
            .into_app_err("unable to create HTTP client")?;

        Ok(Self {
            client: Arc::new(client),
            base_url: Arc::from(settings.base_url.as_str()),
            root_url: Arc::from(settings.root_url.as_str()),
            extractor: settings.extractor,
            throttler,
        })
    }

    /// Address queried for `target`.
    #[must_use]
    pub fn target_url(&self, target: &Target) -> String {
        format!("{}{target}", self.base_url)
    }

    /// Make sure the upstream service answers before starting a batch.
    pub async fn check_upstream(&self) -> Result<()> {
        log::info!(target: LOG_TARGET, "Checking that '{}' is reachable", self.root_url);

        let response = self
            .client
            .get(&*self.root_url)
            .send()
            .await
            .into_app_err_with(|| format!("sending HTTP request to {}", self.root_url))?;

        let status = response.status();
        if !status.is_success() {
            return Err(app_err!("{} returned HTTP {status}", self.root_url));
        }

        Ok(())
    }

    /// Fetch every target and gather the outcomes.
    ///
    /// Each target is handled by its own task; a failing task only loses its own count. Outcomes are
    /// merged once all tasks have finished, in target order.
    pub async fn run(&self, targets: Vec<Target>) -> BatchReport {
        log::info!(target: LOG_TARGET,
            "Fetching {} packages from '{}' with at most {} requests in flight",
            targets.len(),
            self.base_url,
            self.throttler.max_concurrent()
        );

        let outcomes = join_all(targets.into_iter().map(|target| {
            let handle = tokio::spawn(self.clone().fetch_target(target.clone()));

            async move {
                let outcome = handle
                    .await
                    .unwrap_or_else(|e| FetchOutcome::Error(Arc::new(app_err!("task for package '{target}' failed: {e}"))));
                (target, outcome)
            }
        }))
        .await;

        let report = BatchReport::from_outcomes(outcomes);

        log::info!(target: LOG_TARGET,
            "Measured {} of {} packages",
            report.results.len(),
            report.attempted()
        );

        report
    }

    async fn fetch_target(self, target: Target) -> FetchOutcome {
        let _permit = match self.throttler.acquire().await {
            Ok(permit) => permit,
            Err(e) => return FetchOutcome::Error(Arc::new(e)),
        };

        log::info!(target: LOG_TARGET, "Start request about package '{target}'");
        let outcome = match self.fetch_count(&target).await {
            Ok(outcome) => outcome,
            Err(e) => FetchOutcome::Error(Arc::new(e)),
        };
        log::info!(target: LOG_TARGET, "Finish request about package '{target}'");

        match &outcome {
            FetchOutcome::Found(count) => log::debug!(target: LOG_TARGET, "Package '{target}' is imported by {count} packages"),
            FetchOutcome::Status(status) => log::error!(target: LOG_TARGET, "Could not measure package '{target}': HTTP {status}"),
            FetchOutcome::Error(e) => log::error!(target: LOG_TARGET, "Could not measure package '{target}': {e:#}"),
        }

        outcome
    }

    async fn fetch_count(&self, target: &Target) -> Result<FetchOutcome> {
        let url = self.target_url(target);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .into_app_err_with(|| format!("sending HTTP request to {url}"))?;

        let status = response.status();
        if !status.is_success() {
            return Ok(FetchOutcome::Status(status));
        }

        let body = response
            .bytes()
            .await
            .into_app_err_with(|| format!("reading response body from {url}"))?;

        log::debug!(target: LOG_TARGET, "Received {} bytes for package '{target}'", body.len());

        let count = self
            .extractor
            .extract(&body)
            .into_app_err_with(|| format!("extracting count for package '{target}'"))?;

        Ok(FetchOutcome::Found(count))
    }
}
