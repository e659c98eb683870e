// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! ClusterFox Simulator
//!
//! Library half of the `clusterfox-sim` binary: CLI definitions, fleet
//! construction from `SimulatorConfig`, and run summaries. Kept as a library so
//! the wiring can be tested without spawning the binary.

pub mod cli;
pub mod fleet;
pub mod summary;

pub use cli::{Args, Command};
pub use fleet::{
    build_cutoff, build_fleet, build_transport, cutoff_config, cutoff_timing, run_cutoff,
    run_fleet, scheduler_timing, sensor_config, CutoffRun,
};

/// Crate version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
