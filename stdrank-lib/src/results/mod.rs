//! Aggregation and persistence of measured counts.
//!
//! The fetch pipeline produces a [`ResultSet`] once every task has finished. It is serialized
//! exactly once, in one of two [`OutputFormat`]s, and written atomically by [`write_results`].

mod result_set;
mod writer;

pub use result_set::{ResultEntry, ResultSet};
pub use writer::{OutputFormat, render, write_results};
