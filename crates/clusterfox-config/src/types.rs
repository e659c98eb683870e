// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Configuration type definitions
//!
//! This module defines all configuration structs that map to sections in
//! `clusterfox_simulator.toml`.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration structure
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct SimulatorConfig {
    pub server: ServerConfig,
    pub timing: TimingConfig,
    pub cutoff: CutoffConfig,
    pub logging: LoggingConfig,
    /// Sensor fleet. An explicit `[[modules]]` list replaces the demo fleet.
    pub modules: Vec<ModuleEntry>,
}

impl Default for SimulatorConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            timing: TimingConfig::default(),
            cutoff: CutoffConfig::default(),
            logging: LoggingConfig::default(),
            modules: default_modules(),
        }
    }
}

/// ClusterFox server connection
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct ServerConfig {
    /// Base URL, e.g. `http://localhost:3000`
    pub url: String,
    pub request_timeout_ms: u64,
    /// Pool used by modules that do not name one
    pub default_pool: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            url: "http://localhost:3000".to_string(),
            request_timeout_ms: 5000,
            default_pool: "POOL001".to_string(),
        }
    }
}

/// Scheduler pacing
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct TimingConfig {
    /// Seconds between fleet cycles
    pub interval_secs: u64,
    /// Fleet run length in seconds
    pub duration_secs: u64,
    pub registration_delay_ms: u64,
    pub device_spacing_ms: u64,
    /// Relay settling delay on every cutoff transition
    pub relay_delay_ms: u64,
    /// Run all fleet members concurrently within a cycle
    pub parallel: bool,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            interval_secs: 5,
            duration_secs: 300,
            registration_delay_ms: 500,
            device_spacing_ms: 200,
            relay_delay_ms: 100,
            parallel: false,
        }
    }
}

/// Standalone cutoff module
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct CutoffConfig {
    /// Fixed identifier; generated as `CUTOFF-NNNN` when absent
    pub umid: Option<String>,
    pub name: String,
    pub pool_id: Option<String>,
    pub poll_interval_secs: u64,
}

impl Default for CutoffConfig {
    fn default() -> Self {
        Self {
            umid: None,
            name: "Cutoff Relay".to_string(),
            pool_id: None,
            poll_interval_secs: 2,
        }
    }
}

/// Logging output
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct LoggingConfig {
    /// trace, debug, info, warn or error
    pub level: String,
    /// `text` or `json`
    pub format: String,
    /// Directory for log files (only used with file logging enabled)
    pub log_dir: Option<PathBuf>,
    pub retention_days: u64,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "text".to_string(),
            log_dir: None,
            retention_days: 7,
        }
    }
}

/// One simulated sensor module
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct ModuleEntry {
    pub umid: String,
    pub module_type: String,
    pub sensor_fields: Vec<String>,
    #[serde(default)]
    pub pool_id: Option<String>,
}

impl ModuleEntry {
    pub fn new(umid: &str, module_type: &str, sensor_fields: &[&str]) -> Self {
        Self {
            umid: umid.to_string(),
            module_type: module_type.to_string(),
            sensor_fields: sensor_fields.iter().map(|f| f.to_string()).collect(),
            pool_id: None,
        }
    }
}

/// Demo fleet used when the configuration declares no modules
pub fn default_modules() -> Vec<ModuleEntry> {
    vec![
        ModuleEntry::new("temp-humi-sensor-001", "temperature-humidity", &["temp", "humi"]),
        ModuleEntry::new(
            "weather-station-002",
            "weather-station",
            &["temp", "humi", "pressure", "light"],
        ),
        ModuleEntry::new("air-quality-003", "air-quality", &["temp", "humi", "co2"]),
        ModuleEntry::new(
            "smart-garden-004",
            "garden-sensor",
            &["soil_moisture", "temp", "light"],
        ),
        ModuleEntry::new("motion-sensor-005", "motion-detector", &["motion", "temp", "light"]),
        ModuleEntry::new("power-monitor-006", "power-meter", &["voltage", "current", "power"]),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = SimulatorConfig::default();
        assert_eq!(config.server.url, "http://localhost:3000");
        assert_eq!(config.timing.interval_secs, 5);
        assert_eq!(config.timing.duration_secs, 300);
        assert_eq!(config.cutoff.poll_interval_secs, 2);
        assert_eq!(config.modules.len(), 6);
    }

    #[test]
    fn test_empty_toml_yields_demo_fleet() {
        let config: SimulatorConfig = toml::from_str("").unwrap();
        assert_eq!(config.modules.len(), 6);
        assert_eq!(config.modules[2].sensor_fields, vec!["temp", "humi", "co2"]);
    }

    #[test]
    fn test_explicit_modules_replace_demo_fleet() {
        let config: SimulatorConfig = toml::from_str(
            r#"
            [[modules]]
            umid = "lab-1"
            module_type = "lab-sensor"
            sensor_fields = ["ph", "temp"]
            pool_id = "LAB"
            "#,
        )
        .unwrap();
        assert_eq!(config.modules.len(), 1);
        assert_eq!(config.modules[0].pool_id.as_deref(), Some("LAB"));
    }
}
