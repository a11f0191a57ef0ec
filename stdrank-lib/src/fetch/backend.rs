use crate::extract::Extractor;
use crate::results::OutputFormat;
use clap::ValueEnum;
use core::fmt::{Display, Formatter};
use serde::{Deserialize, Serialize};

/// A package index that publishes how many packages import a given package.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum Backend {
    /// pkg.go.dev package pages, scraped for their imported-by count
    #[default]
    PkgGoDev,

    /// The godoc.org importers API, counted by its results array
    GodocApi,
}

impl Backend {
    /// Name used on the command line and in `stdrank.toml`.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::PkgGoDev => "pkg-go-dev",
            Self::GodocApi => "godoc-api",
        }
    }

    /// Prefix that the package identifier is appended to.
    #[must_use]
    pub const fn base_url(self) -> &'static str {
        match self {
            Self::PkgGoDev => "https://pkg.go.dev/",
            Self::GodocApi => "https://api.godoc.org/importers/",
        }
    }

    /// Address probed once before any package is fetched.
    #[must_use]
    pub const fn root_url(self) -> &'static str {
        match self {
            Self::PkgGoDev => "https://pkg.go.dev/",
            Self::GodocApi => "https://api.godoc.org/",
        }
    }

    #[must_use]
    pub const fn extractor(self) -> Extractor {
        match self {
            Self::PkgGoDev => Extractor::Markup,
            Self::GodocApi => Extractor::Document,
        }
    }

    /// Requests kept in flight unless configured otherwise.
    #[must_use]
    pub const fn default_concurrency(self) -> usize {
        match self {
            Self::PkgGoDev => 1,
            Self::GodocApi => 20,
        }
    }

    #[must_use]
    pub const fn default_format(self) -> OutputFormat {
        match self {
            Self::PkgGoDev => OutputFormat::Ranked,
            Self::GodocApi => OutputFormat::Map,
        }
    }
}

impl Display for Backend {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}
