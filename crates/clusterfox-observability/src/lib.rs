// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! # clusterfox-observability
//!
//! Logging setup shared by the ClusterFox simulator crates, with per-crate
//! debug flag support.
//!
//! ## Features
//! - `file-logging`: JSON log file per run (tracing-appender)

/// Crate version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod cli;
pub mod init;

// Re-export commonly used items
pub use cli::*;
pub use init::*;

/// Known crate names for debug flags
pub const KNOWN_CRATES: &[&str] = &[
    "clusterfox",
    "clusterfox-agent",
    "clusterfox-config",
    "clusterfox-observability",
    "clusterfox-simulator",
];

/// Observability setup errors
#[derive(Debug, thiserror::Error)]
pub enum ObservabilityError {
    #[error("Unknown log format '{0}' (expected text or json)")]
    UnknownFormat(String),
}

/// Tracing target for a crate name (`clusterfox-agent` -> `clusterfox_agent`)
pub fn filter_target(crate_name: &str) -> String {
    crate_name.replace('-', "_")
}
