//! The bounded fetch pipeline.
//!
//! A [`Pipeline`] issues one GET per target against a [`Backend`], hands each successful body to
//! the backend's [`Extractor`](crate::extract::Extractor), and records a [`FetchOutcome`] per
//! target. A [`Throttler`] keeps at most N requests in flight. Every task owns its outcome; the
//! outcomes are merged into a [`BatchReport`] after all tasks have joined, so no result storage is
//! shared while requests are running.

mod backend;
mod outcome;
mod pipeline;
mod throttler;

pub use backend::Backend;
pub use outcome::{BatchReport, FetchOutcome};
pub use pipeline::{Pipeline, PipelineSettings};
pub use throttler::Throttler;
