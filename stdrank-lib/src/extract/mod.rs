//! Turning a response body into a single count.
//!
//! Two strategies exist, one per kind of upstream:
//!
//! - [`Extractor::Markup`]: the body is an HTML package page. The imported-by number is located
//!   structurally ([`find_imported_by`]) and parsed from its display form ([`parse_count`]).
//! - [`Extractor::Document`]: the body is a JSON importers listing, and the count is the length of
//!   its `results` array ([`count_results`]).

mod document;
mod markup;
mod numeral;

pub use document::count_results;
pub use markup::{Element, Hop, IMPORTED_BY_HOPS, MarkupNode, find_imported_by};
pub use numeral::parse_count;

use crate::Result;
use ohno::IntoAppError;
use serde::{Deserialize, Serialize};

/// How a count is pulled out of a response body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Extractor {
    /// Walk an HTML page to the imported-by number.
    Markup,

    /// Count the `results` of a JSON document.
    Document,
}

impl Extractor {
    /// Extract the count from a successful response body.
    pub fn extract(self, body: &[u8]) -> Result<u64> {
        match self {
            Self::Markup => {
                let text = String::from_utf8_lossy(body);
                let tree = MarkupNode::parse_html(&text);
                let raw = find_imported_by(&tree).into_app_err("could not find the imported-by count in the page")?;
                parse_count(raw)
            }
            Self::Document => count_results(body),
        }
    }
}
