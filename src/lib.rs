// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! # ClusterFox - IoT module simulator
//!
//! Simulated sensor producers and cutoff actuators that talk to a ClusterFox
//! server over HTTP. This crate re-exports the workspace members; each one is
//! also usable on its own.
//!
//! ## Quick Start
//!
//! ```toml
//! [dependencies]
//! clusterfox = "0.3"  # Default: agent + config + observability
//! ```
//!
//! ## Feature Flags
//!
//! - **`config`** (default): TOML configuration with env/CLI overrides
//! - **`observability`** (default): tracing subscriber setup and per-crate debug flags
//! - **`file-logging`**: per-run JSON log files (tracing-appender)
//!
//! ## Usage
//!
//! ```rust,no_run
//! use clusterfox::prelude::*;
//! use std::{sync::Arc, time::Duration};
//!
//! # async fn run() -> Result<(), AgentError> {
//! let transport: Arc<dyn ModuleTransport> =
//!     Arc::new(HttpTransport::new("http://localhost:3000", DEFAULT_REQUEST_TIMEOUT)?);
//!
//! let relay = ModuleConfig::cutoff_with_random_umid().with_pool_id("POOL001");
//! let mut cutoff = CutoffModule::new(ModuleClient::new(relay, transport)?);
//! cutoff.client_mut().connect().await?;
//!
//! loop {
//!     if let Some(transition) = cutoff.check_status().await? {
//!         println!("{:?}", transition);
//!     }
//!     tokio::time::sleep(Duration::from_secs(2)).await;
//! }
//! # }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │  Foundation: clusterfox-config, clusterfox-observability│
//! │  (TOML + overrides, tracing setup)                      │
//! └─────────────────────────────────────────────────────────┘
//!                         ↓
//! ┌─────────────────────────────────────────────────────────┐
//! │  Core: clusterfox-agent                                 │
//! │  (client, heartbeat, cutoff edge detection, scheduler)  │
//! └─────────────────────────────────────────────────────────┘
//!                         ↓
//! ┌─────────────────────────────────────────────────────────┐
//! │  Application: clusterfox-simulator (clusterfox-sim)     │
//! └─────────────────────────────────────────────────────────┘
//! ```
//!
//! ## License
//!
//! Apache-2.0

// Re-export core
pub use clusterfox_agent as agent;

// Re-export foundation
#[cfg(feature = "config")]
pub use clusterfox_config as config;

#[cfg(feature = "observability")]
pub use clusterfox_observability as observability;

/// Prelude - commonly used types and traits
pub mod prelude {
    pub use crate::agent::{
        AgentError, CutoffModule, CutoffState, CutoffTransition, HttpTransport, ModuleClient,
        ModuleConfig, ModuleKind, ModuleTransport, RunMode, SchedulerTiming, SensorModule,
        Shutdown, SimulatedModule, Simulation, SimulationReport, DEFAULT_REQUEST_TIMEOUT,
    };

    #[cfg(feature = "config")]
    pub use crate::config::{load_config, validate_config, SimulatorConfig};

    #[cfg(feature = "observability")]
    pub use crate::observability::{init_logging, parse_debug_flags, LoggingOptions};
}
