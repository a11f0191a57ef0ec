//! Enumeration of the packages to measure.
//!
//! A [`TargetSource`] supplies the raw list of standard library package identifiers, either by
//! asking the Go toolchain or by reading a list file. [`filter_targets`] then removes the packages
//! that cannot be imported from outside the standard library (any identifier with an `internal`
//! path segment) and yields the [`Target`] values handed to the fetch pipeline.

mod filter;
mod source;
mod target;

pub use filter::{INTERNAL_SEGMENT, filter_targets, is_internal};
pub use source::{TargetSource, parse_list};
pub use target::Target;
