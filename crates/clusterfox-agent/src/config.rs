// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Configuration for a simulated ClusterFox module

use crate::error::{AgentError, Result};
use rand::Rng;

/// Pool a module joins when none is given
pub const DEFAULT_POOL_ID: &str = "POOL001";

/// Display name used for cutoff modules when none is given
pub const DEFAULT_CUTOFF_NAME: &str = "Cutoff Relay";

const MAX_UMID_LEN: usize = 200;
const MAX_TYPE_LEN: usize = 100;

/// Device class
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModuleKind {
    /// Producer: registers, then publishes synthetic field values
    Sensor,
    /// Actuator: registers, then heartbeats and mirrors the remote cutoff flag
    Cutoff,
}

impl std::fmt::Display for ModuleKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ModuleKind::Sensor => write!(f, "sensor"),
            ModuleKind::Cutoff => write!(f, "cutoff"),
        }
    }
}

/// Module configuration builder
#[derive(Debug, Clone)]
pub struct ModuleConfig {
    /// Unique module identifier
    pub umid: String,

    /// Device class
    pub kind: ModuleKind,

    /// Module type (sensor) or human-readable name (cutoff)
    pub display_name: String,

    /// Pool grouping label
    pub pool_id: String,

    /// Reported fields, in declaration order, without duplicates
    pub sensor_fields: Vec<String>,
}

impl ModuleConfig {
    /// Create a new module configuration
    ///
    /// # Example
    /// ```
    /// use clusterfox_agent::{ModuleConfig, ModuleKind};
    ///
    /// let config = ModuleConfig::new("SENSOR001", ModuleKind::Sensor)
    ///     .with_display_name("temp-humidity")
    ///     .with_sensor_fields(["temp", "humi"]);
    /// assert!(config.validate().is_ok());
    /// ```
    pub fn new(umid: impl Into<String>, kind: ModuleKind) -> Self {
        let display_name = match kind {
            ModuleKind::Sensor => String::new(),
            ModuleKind::Cutoff => DEFAULT_CUTOFF_NAME.to_string(),
        };
        Self {
            umid: umid.into(),
            kind,
            display_name,
            pool_id: DEFAULT_POOL_ID.to_string(),
            sensor_fields: Vec::new(),
        }
    }

    /// Cutoff module with a generated `CUTOFF-NNNN` identifier
    pub fn cutoff_with_random_umid() -> Self {
        Self::new(random_cutoff_umid(&mut rand::thread_rng()), ModuleKind::Cutoff)
    }

    /// Set module type (sensor) or display name (cutoff)
    pub fn with_display_name(mut self, name: impl Into<String>) -> Self {
        self.display_name = name.into();
        self
    }

    /// Set pool identifier
    pub fn with_pool_id(mut self, pool_id: impl Into<String>) -> Self {
        self.pool_id = pool_id.into();
        self
    }

    /// Set the reported fields. Later duplicates are dropped.
    pub fn with_sensor_fields<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.sensor_fields.clear();
        for field in fields {
            let field = field.into();
            if !self.sensor_fields.contains(&field) {
                self.sensor_fields.push(field);
            }
        }
        self
    }

    /// Validate configuration
    ///
    /// Sensors follow the query-string registration rules (identifier and type
    /// charsets). Cutoffs register through the JSON endpoint, which only needs
    /// non-empty umid, name and pool.
    pub fn validate(&self) -> Result<()> {
        match self.kind {
            ModuleKind::Sensor => {
                if !is_valid_umid(&self.umid) {
                    return Err(AgentError::InvalidConfig(format!(
                        "umid '{}' must be 1-{} characters of [A-Za-z0-9_-]",
                        self.umid, MAX_UMID_LEN
                    )));
                }
                if !is_valid_module_type(&self.display_name) {
                    return Err(AgentError::InvalidConfig(format!(
                        "module type '{}' must be 1-{} characters of [A-Za-z0-9-]",
                        self.display_name, MAX_TYPE_LEN
                    )));
                }
                if self.sensor_fields.is_empty() {
                    return Err(AgentError::InvalidConfig(format!(
                        "sensor module '{}' must declare at least one field",
                        self.umid
                    )));
                }
            }
            ModuleKind::Cutoff => {
                let required = [
                    ("umid", &self.umid),
                    ("name", &self.display_name),
                    ("pool id", &self.pool_id),
                ];
                for (what, value) in required {
                    if value.trim().is_empty() {
                        return Err(AgentError::InvalidConfig(format!(
                            "cutoff module {} cannot be empty",
                            what
                        )));
                    }
                }
            }
        }

        Ok(())
    }
}

/// Generate a `CUTOFF-NNNN` identifier (NNNN in 1000..=9999)
pub fn random_cutoff_umid<R: Rng + ?Sized>(rng: &mut R) -> String {
    format!("CUTOFF-{}", rng.gen_range(1000..=9999))
}

/// Identifier charset accepted by the server's register endpoint
pub fn is_valid_umid(umid: &str) -> bool {
    !umid.is_empty()
        && umid.len() <= MAX_UMID_LEN
        && umid
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

/// Module type charset accepted by the server's register endpoint
pub fn is_valid_module_type(module_type: &str) -> bool {
    !module_type.is_empty()
        && module_type.len() <= MAX_TYPE_LEN
        && module_type
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-')
}
