//! Photo booth kiosk library.
//!
//! Watches a trigger, runs a timed multi-shot capture over a live preview,
//! renders the frames into a composite and shows it back. The `booth`
//! binary is a thin CLI over these modules; tests drive them with the mocks
//! in [`device::mock`].
//!
//! # Modules
//!
//! - `controller`: the session state machine
//! - `overlay`: overlay lifecycle and the screen table
//! - `capture`: countdown and still capture
//! - `composite`: 2x2 grid and vertical strip rendering
//! - `input`: trigger polling
//! - `device`: peripheral traits and backends
//! - `config`: configuration file handling
//! - `error`: error types with operator hints
#![forbid(unsafe_code)]

pub mod capture;
pub mod check;
pub mod cli;
pub mod composite;
pub mod config;
pub mod controller;
pub mod device;
pub mod error;
pub mod image_ops;
pub mod input;
pub mod interrupt;
pub mod logging;
pub mod output;
pub mod overlay;
pub mod session;
