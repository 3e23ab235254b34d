//! Common test utilities for the booth.
//!
//! - `cli`: runner for the `booth` binary with fluent assertions
//! - `fixtures`: temporary asset sets, frames and mock device contexts
#![allow(dead_code)]

pub mod cli;
pub mod fixtures;

use tracing_subscriber::EnvFilter;

pub fn init_test_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}
