use crate::results::{ResultEntry, ResultSet};
use crate::targets::Target;
use core::fmt::{Display, Formatter};
use reqwest::StatusCode;
use std::sync::Arc;

/// What happened when one target was fetched.
#[derive(Debug, Clone)]
pub enum FetchOutcome {
    /// The response was read and a count extracted from it.
    Found(u64),

    /// The server answered with a non-success status.
    Status(StatusCode),

    /// The request, the body read, or the extraction failed.
    Error(Arc<ohno::AppError>),
}

impl FetchOutcome {
    #[must_use]
    pub const fn is_found(&self) -> bool {
        matches!(self, Self::Found(_))
    }

    /// The extracted count, if any.
    #[must_use]
    pub const fn ok(&self) -> Option<u64> {
        match self {
            Self::Found(count) => Some(*count),
            _ => None,
        }
    }

    #[must_use]
    pub const fn status_str(&self) -> &'static str {
        match self {
            Self::Found(_) => "Found",
            Self::Status(_) => "Status",
            Self::Error(_) => "Error",
        }
    }
}

impl Display for FetchOutcome {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Found(count) => write!(f, "{count}"),
            Self::Status(status) => write!(f, "HTTP {status}"),
            Self::Error(e) => write!(f, "{e:#}"),
        }
    }
}

/// Everything a batch produced: the measured packages and the ones that could not be measured.
#[derive(Debug, Clone, Default)]
pub struct BatchReport {
    pub results: ResultSet,
    pub failures: Vec<(Target, FetchOutcome)>,
}

impl BatchReport {
    /// Merge per-target outcomes. Found counts become result entries, everything else a failure.
    pub fn from_outcomes(outcomes: impl IntoIterator<Item = (Target, FetchOutcome)>) -> Self {
        let mut report = Self::default();

        for (target, outcome) in outcomes {
            match outcome {
                FetchOutcome::Found(count) => report.results.insert(ResultEntry::new(target, count)),
                failure => report.failures.push((target, failure)),
            }
        }

        report
    }

    /// Number of targets attempted.
    #[must_use]
    pub const fn attempted(&self) -> usize {
        self.results.len() + self.failures.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn target(id: &str) -> Target {
        Target::new(id).unwrap()
    }

    #[test]
    fn test_from_outcomes_partitions() {
        let report = BatchReport::from_outcomes(vec![
            (target("fmt"), FetchOutcome::Found(7)),
            (target("os"), FetchOutcome::Status(StatusCode::NOT_FOUND)),
            (target("io"), FetchOutcome::Error(Arc::new(ohno::app_err!("boom")))),
            (target("net"), FetchOutcome::Found(0)),
        ]);

        assert_eq!(report.attempted(), 4);
        assert_eq!(report.results.get("fmt"), Some(7));
        assert_eq!(report.results.get("net"), Some(0));
        assert_eq!(report.failures.len(), 2);
        assert_eq!(report.failures[0].0.as_str(), "os");
        assert_eq!(report.failures[1].1.status_str(), "Error");
    }

    #[test]
    fn test_display() {
        assert_eq!(FetchOutcome::Found(3).to_string(), "3");
        assert_eq!(FetchOutcome::Status(StatusCode::BAD_GATEWAY).to_string(), "HTTP 502 Bad Gateway");
        assert!(FetchOutcome::Error(Arc::new(ohno::app_err!("timed out"))).to_string().contains("timed out"));
    }

    #[test]
    fn test_ok() {
        assert_eq!(FetchOutcome::Found(5).ok(), Some(5));
        assert!(FetchOutcome::Found(5).is_found());
        assert_eq!(FetchOutcome::Status(StatusCode::NOT_FOUND).ok(), None);
    }
}
