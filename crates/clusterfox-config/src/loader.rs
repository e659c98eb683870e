// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Configuration file loading with override support
//!
//! This module implements the 3-tier configuration loading system:
//! 1. TOML file (base defaults; optional)
//! 2. Environment variables (runtime overrides)
//! 3. CLI arguments (explicit user overrides)

use crate::{ConfigError, ConfigResult, SimulatorConfig};
use std::collections::HashMap;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

/// Default configuration file name
pub const CONFIG_FILE_NAME: &str = "clusterfox_simulator.toml";

/// Environment variable naming an explicit config file
pub const CONFIG_PATH_ENV: &str = "CLUSTERFOX_CONFIG_PATH";

/// Find the simulator configuration file
///
/// Search order:
/// 1. `CLUSTERFOX_CONFIG_PATH` environment variable
/// 2. Current working directory: `./clusterfox_simulator.toml`
/// 3. Up to 3 parent directories
///
/// Returns `Ok(None)` when no file exists; the simulator then runs on defaults.
///
/// # Errors
///
/// Returns `ConfigError::FileNotFound` if `CLUSTERFOX_CONFIG_PATH` points nowhere
pub fn find_config_file() -> ConfigResult<Option<PathBuf>> {
    if let Ok(env_path) = env::var(CONFIG_PATH_ENV) {
        let path = PathBuf::from(env_path);
        if path.exists() {
            return Ok(Some(path));
        }
        return Err(ConfigError::FileNotFound(format!(
            "Config file specified by {} not found: {}",
            CONFIG_PATH_ENV,
            path.display()
        )));
    }

    let Ok(cwd) = env::current_dir() else {
        return Ok(None);
    };

    Ok(cwd
        .ancestors()
        .take(4)
        .map(|dir| dir.join(CONFIG_FILE_NAME))
        .find(|path| path.exists()))
}

/// Load configuration
///
/// # Arguments
///
/// * `config_path` - Optional path to config file. If `None`, will search for one.
/// * `cli_args` - Optional CLI argument overrides
///
/// # Errors
///
/// Returns error if an explicit config file is missing or contains invalid TOML.
/// Validation is a separate step (`validate_config`).
pub fn load_config(
    config_path: Option<&Path>,
    cli_args: Option<&HashMap<String, String>>,
) -> ConfigResult<SimulatorConfig> {
    let config_file = match config_path {
        Some(path) if !path.exists() => {
            return Err(ConfigError::FileNotFound(path.display().to_string()))
        }
        Some(path) => Some(path.to_path_buf()),
        None => find_config_file()?,
    };

    let mut config = match config_file {
        Some(file) => {
            let content = fs::read_to_string(&file)?;
            toml::from_str(&content)?
        }
        None => SimulatorConfig::default(),
    };

    apply_environment_overrides(&mut config);

    if let Some(cli) = cli_args {
        apply_cli_overrides(&mut config, cli);
    }

    Ok(config)
}

/// Apply environment variable overrides to configuration
///
/// Supported environment variables:
/// - `CLUSTERFOX_SERVER_URL` -> `server.url`
/// - `CLUSTERFOX_REQUEST_TIMEOUT_MS` -> `server.request_timeout_ms`
/// - `CLUSTERFOX_POOL_ID` -> `server.default_pool`
/// - `CLUSTERFOX_INTERVAL_SECS` -> `timing.interval_secs`
/// - `CLUSTERFOX_DURATION_SECS` -> `timing.duration_secs`
/// - `CLUSTERFOX_LOG_LEVEL` -> `logging.level`
pub fn apply_environment_overrides(config: &mut SimulatorConfig) {
    if let Ok(value) = env::var("CLUSTERFOX_SERVER_URL") {
        config.server.url = value;
    }
    if let Ok(value) = env::var("CLUSTERFOX_REQUEST_TIMEOUT_MS") {
        if let Ok(ms) = value.parse::<u64>() {
            config.server.request_timeout_ms = ms;
        }
    }
    if let Ok(value) = env::var("CLUSTERFOX_POOL_ID") {
        config.server.default_pool = value;
    }
    if let Ok(value) = env::var("CLUSTERFOX_INTERVAL_SECS") {
        if let Ok(secs) = value.parse::<u64>() {
            config.timing.interval_secs = secs;
        }
    }
    if let Ok(value) = env::var("CLUSTERFOX_DURATION_SECS") {
        if let Ok(secs) = value.parse::<u64>() {
            config.timing.duration_secs = secs;
        }
    }
    if let Ok(value) = env::var("CLUSTERFOX_LOG_LEVEL") {
        config.logging.level = value;
    }
}

/// Apply CLI argument overrides to configuration
///
/// # Arguments
///
/// * `config` - Configuration to modify
/// * `cli_args` - HashMap of CLI arguments (e.g., `{"server_url": "http://10.0.0.5:3000"}`)
pub fn apply_cli_overrides(config: &mut SimulatorConfig, cli_args: &HashMap<String, String>) {
    if let Some(value) = cli_args.get("server_url") {
        config.server.url = value.clone();
    }
    if let Some(value) = cli_args.get("pool_id") {
        config.server.default_pool = value.clone();
    }

    // Timing
    if let Some(value) = cli_args.get("interval_secs") {
        if let Ok(secs) = value.parse::<u64>() {
            config.timing.interval_secs = secs;
        }
    }
    if let Some(value) = cli_args.get("duration_secs") {
        if let Ok(secs) = value.parse::<u64>() {
            config.timing.duration_secs = secs;
        }
    }
    if let Some(value) = cli_args.get("parallel") {
        config.timing.parallel = value.to_lowercase() == "true" || value == "1";
    }

    // Cutoff module
    if let Some(value) = cli_args.get("cutoff_umid") {
        config.cutoff.umid = Some(value.clone());
    }
    if let Some(value) = cli_args.get("cutoff_name") {
        config.cutoff.name = value.clone();
    }
    if let Some(value) = cli_args.get("cutoff_pool") {
        config.cutoff.pool_id = Some(value.clone());
    }
    if let Some(value) = cli_args.get("cutoff_interval_secs") {
        if let Ok(secs) = value.parse::<u64>() {
            config.cutoff.poll_interval_secs = secs;
        }
    }

    // Logging
    if let Some(value) = cli_args.get("log_level") {
        config.logging.level = value.clone();
    }
    if let Some(value) = cli_args.get("log_format") {
        config.logging.format = value.clone();
    }
}
