// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Command-line interface for `clusterfox-sim`

use clap::{Parser, Subcommand};
use std::collections::HashMap;
use std::path::PathBuf;

/// ClusterFox Module Simulator - sensor fleet and cutoff relay simulation
#[derive(Parser, Debug)]
#[command(name = "clusterfox-sim", version, author, long_about = None)]
pub struct Args {
    /// Path to clusterfox_simulator.toml (default: search CLUSTERFOX_CONFIG_PATH, cwd, parents)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Server URL (default: http://localhost:3000)
    #[arg(long, global = true)]
    pub url: Option<String>,

    /// Enable debug logging for a crate (repeatable; `all` for every crate).
    /// Goes before the subcommand.
    #[arg(long = "debug", value_name = "CRATE")]
    pub debug: Vec<String>,

    /// Console log format
    #[arg(long, value_parser = ["text", "json"], global = true)]
    pub log_format: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Run the sensor fleet for a bounded duration
    Fleet {
        /// Run length in seconds (default: 300)
        #[arg(long)]
        duration: Option<u64>,

        /// Seconds between data transmissions (default: 5)
        #[arg(long)]
        interval: Option<u64>,

        /// Send every module's reading concurrently within a cycle
        #[arg(long, default_value_t = false)]
        parallel: bool,
    },

    /// Run a single cutoff relay until Ctrl+C
    Cutoff {
        /// Unique module ID (default: auto-generated CUTOFF-NNNN)
        #[arg(long)]
        umid: Option<String>,

        /// Module name (default: Cutoff Relay)
        #[arg(long)]
        name: Option<String>,

        /// Pool ID (default: POOL001)
        #[arg(long)]
        pool: Option<String>,

        /// Seconds between status checks (default: 2)
        #[arg(long)]
        interval: Option<u64>,
    },
}

impl Args {
    /// Explicit CLI values as configuration overrides
    pub fn config_overrides(&self) -> HashMap<String, String> {
        let mut overrides = HashMap::new();

        if let Some(url) = &self.url {
            overrides.insert("server_url".to_string(), url.clone());
        }
        if let Some(format) = &self.log_format {
            overrides.insert("log_format".to_string(), format.clone());
        }

        match &self.command {
            Command::Fleet {
                duration,
                interval,
                parallel,
            } => {
                if let Some(duration) = duration {
                    overrides.insert("duration_secs".to_string(), duration.to_string());
                }
                if let Some(interval) = interval {
                    overrides.insert("interval_secs".to_string(), interval.to_string());
                }
                if *parallel {
                    overrides.insert("parallel".to_string(), "true".to_string());
                }
            }
            Command::Cutoff {
                umid,
                name,
                pool,
                interval,
            } => {
                if let Some(umid) = umid {
                    overrides.insert("cutoff_umid".to_string(), umid.clone());
                }
                if let Some(name) = name {
                    overrides.insert("cutoff_name".to_string(), name.clone());
                }
                if let Some(pool) = pool {
                    overrides.insert("cutoff_pool".to_string(), pool.clone());
                }
                if let Some(interval) = interval {
                    overrides.insert("cutoff_interval_secs".to_string(), interval.to_string());
                }
            }
        }

        overrides
    }
}
