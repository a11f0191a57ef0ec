//! Rank the Go standard library packages by how many packages import them.
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

use std::io::Write;
use std::io::{stderr, stdout};
use stdrank_lib::{Host, run};

/// Host backed by the real process streams.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessHost;

#[cfg_attr(coverage_nightly, coverage(off))]
impl Host for ProcessHost {
    fn output(&mut self) -> impl Write {
        stdout()
    }

    fn error(&mut self) -> impl Write {
        stderr()
    }

    fn exit(&mut self, code: i32) {
        std::process::exit(code);
    }
}

#[tokio::main]
#[cfg_attr(coverage_nightly, coverage(off))]
async fn main() -> Result<(), ohno::AppError> {
    run(&mut ProcessHost, std::env::args()).await
}
