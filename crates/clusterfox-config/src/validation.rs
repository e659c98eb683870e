// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Configuration validation
//!
//! Sensor identifier rules mirror the server's query-string register endpoint so
//! a bad fleet entry is reported at startup instead of as a registration
//! failure. Cutoff identifiers and pools only need to be non-empty.

use crate::{ConfigError, ConfigResult, SimulatorConfig};
use std::collections::HashSet;

const MAX_UMID_LEN: usize = 200;
const MAX_MODULE_TYPE_LEN: usize = 100;
const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];
const LOG_FORMATS: [&str; 2] = ["text", "json"];

/// Validation errors that can occur during config validation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigValidationError {
    MissingRequired { field: String },
    InvalidValue { field: String, reason: String },
    DuplicateUmid { umid: String },
}

impl std::fmt::Display for ConfigValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingRequired { field } => {
                write!(f, "Missing required configuration: {}", field)
            }
            Self::InvalidValue { field, reason } => {
                write!(f, "Invalid configuration value for {}: {}", field, reason)
            }
            Self::DuplicateUmid { umid } => {
                write!(f, "Duplicate module umid: {}", umid)
            }
        }
    }
}

/// Validate the complete configuration
///
/// Checks for:
/// - Server URL scheme and positive timeouts/intervals
/// - Identifier charsets and lengths
/// - Duplicate module identifiers
/// - Sensor modules declaring at least one field
/// - Known log level and format
///
/// # Errors
///
/// Returns `ConfigError::ValidationError` listing every problem found
pub fn validate_config(config: &SimulatorConfig) -> ConfigResult<()> {
    let errors = collect_errors(config);

    if !errors.is_empty() {
        let error_messages = errors
            .iter()
            .map(|e| format!("  - {}", e))
            .collect::<Vec<_>>()
            .join("\n");

        return Err(ConfigError::ValidationError(format!(
            "Configuration validation failed:\n{}",
            error_messages
        )));
    }

    Ok(())
}

/// All problems in the configuration, in section order
pub fn collect_errors(config: &SimulatorConfig) -> Vec<ConfigValidationError> {
    let mut errors = Vec::new();
    validate_server(config, &mut errors);
    validate_timing(config, &mut errors);
    validate_cutoff(config, &mut errors);
    validate_logging(config, &mut errors);
    validate_modules(config, &mut errors);
    errors
}

fn invalid(field: impl Into<String>, reason: impl Into<String>) -> ConfigValidationError {
    ConfigValidationError::InvalidValue {
        field: field.into(),
        reason: reason.into(),
    }
}

fn validate_server(config: &SimulatorConfig, errors: &mut Vec<ConfigValidationError>) {
    let url = config.server.url.trim();
    if url.is_empty() {
        errors.push(ConfigValidationError::MissingRequired {
            field: "server.url".to_string(),
        });
    } else {
        let host = url
            .strip_prefix("http://")
            .or_else(|| url.strip_prefix("https://"));
        match host {
            Some(rest) if !rest.is_empty() && !rest.starts_with('/') => {}
            Some(_) => errors.push(invalid("server.url", "missing host")),
            None => errors.push(invalid("server.url", "must start with http:// or https://")),
        }
    }

    if config.server.request_timeout_ms == 0 {
        errors.push(invalid("server.request_timeout_ms", "must be greater than 0"));
    }
    if config.server.default_pool.trim().is_empty() {
        errors.push(ConfigValidationError::MissingRequired {
            field: "server.default_pool".to_string(),
        });
    }
}

fn validate_timing(config: &SimulatorConfig, errors: &mut Vec<ConfigValidationError>) {
    if config.timing.interval_secs == 0 {
        errors.push(invalid("timing.interval_secs", "must be greater than 0"));
    }
    if config.timing.duration_secs == 0 {
        errors.push(invalid("timing.duration_secs", "must be greater than 0"));
    }
}

/// Cutoffs register through the JSON endpoint: umid, name and pool only need content
fn validate_cutoff(config: &SimulatorConfig, errors: &mut Vec<ConfigValidationError>) {
    if let Some(umid) = &config.cutoff.umid {
        if umid.trim().is_empty() {
            errors.push(ConfigValidationError::MissingRequired {
                field: "cutoff.umid".to_string(),
            });
        }
    }
    if config.cutoff.name.trim().is_empty() {
        errors.push(ConfigValidationError::MissingRequired {
            field: "cutoff.name".to_string(),
        });
    }
    if let Some(pool) = &config.cutoff.pool_id {
        if pool.trim().is_empty() {
            errors.push(ConfigValidationError::MissingRequired {
                field: "cutoff.pool_id".to_string(),
            });
        }
    }
    if config.cutoff.poll_interval_secs == 0 {
        errors.push(invalid("cutoff.poll_interval_secs", "must be greater than 0"));
    }
}

fn is_valid_module_type(module_type: &str) -> bool {
    !module_type.is_empty()
        && module_type.len() <= MAX_MODULE_TYPE_LEN
        && module_type
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-')
}
