// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! ClusterFox Agent - simulated IoT modules talking to a ClusterFox server
//!
//! # Features
//! - Single-shot registration with session tracking
//! - Per-cycle heartbeat for cutoff modules
//! - Edge detection over the remote `cutoffActive` flag, with relay side effects
//! - Synthetic sensor readings pushed to the data pool
//! - Fleet scheduler with bounded and cancellable runs
//!
//! # Quick Start
//!
//! ```ignore
//! use clusterfox_agent::{
//!     HttpTransport, ModuleClient, ModuleConfig, ModuleKind, RunMode, SchedulerTiming,
//!     SimulatedModule, Simulation,
//! };
//! use std::{sync::Arc, time::Duration};
//!
//! let transport = Arc::new(HttpTransport::new("http://localhost:3000", Duration::from_secs(5))?);
//!
//! let sensor = ModuleConfig::new("temp-humi-sensor-001", ModuleKind::Sensor)
//!     .with_display_name("temperature-humidity")
//!     .with_sensor_fields(["temp", "humi"]);
//! let module = SimulatedModule::from_client(ModuleClient::new(sensor, transport)?);
//!
//! let mut sim = Simulation::new(vec![module], SchedulerTiming::default());
//! let report = sim.run(RunMode::Bounded(Duration::from_secs(60))).await;
//! println!("{} cycles", report.cycles);
//! ```
//!
//! # Error Handling
//!
//! Operations return `Result<T, AgentError>`; `AgentError::kind()` separates
//! transport failures, protocol failures and caller misuse. Only registration
//! failure removes a module from a run. Everything else is logged and the next
//! cycle tries again.

pub mod client;
pub mod config;
pub mod cutoff;
pub mod error;
pub mod generator;
pub mod heartbeat;
pub mod http;
pub mod relay;
pub mod scheduler;
pub mod sensor;
pub mod transport;

// Re-export main types for convenience
pub use client::ModuleClient;
pub use config::{ModuleConfig, ModuleKind, DEFAULT_CUTOFF_NAME, DEFAULT_POOL_ID};
pub use cutoff::{
    CutoffModule, CutoffState, CutoffStateMachine, CutoffSummary, CutoffTransition, Observation,
};
pub use error::{AgentError, FailureKind, Result};
pub use generator::{generate_value, FieldCategory, SensorValue};
pub use heartbeat::HeartbeatReporter;
pub use http::{HttpTransport, DEFAULT_REQUEST_TIMEOUT};
pub use relay::{RelayAction, RelayReport, RelaySimulator};
pub use scheduler::{
    ActionOutcome, RunMode, SchedulerTiming, Shutdown, SimulatedModule, Simulation,
    SimulationReport,
};
pub use sensor::SensorModule;
pub use transport::{
    ModuleTransport, RegistrationAck, RegistrationRequest, RosterEntry, SensorPayload,
};
