// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{error, info, warn};

use clusterfox_agent::{ModuleConfig, ModuleTransport, Shutdown};
use clusterfox_config::{load_config, validate_config};
use clusterfox_observability::{init_logging, parse_debug_flags, LogFormat, LoggingOptions};
use clusterfox_simulator::{build_transport, run_cutoff, run_fleet, summary, Args, Command};

/// Main entry point
#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Configuration problems are the only fatal errors
    let overrides = args.config_overrides();
    let mut config = load_config(args.config.as_deref(), Some(&overrides))
        .context("Failed to load configuration")?;
    if matches!(args.command, Command::Cutoff { .. }) && config.cutoff.umid.is_none() {
        config.cutoff.umid = Some(ModuleConfig::cutoff_with_random_umid().umid);
    }
    validate_config(&config).context("Invalid configuration")?;

    let debug_flags = parse_debug_flags(&args.debug);
    let log_format: LogFormat = config.logging.format.parse()?;
    let _log_guard = init_logging(
        &debug_flags,
        &LoggingOptions {
            level: config.logging.level.clone(),
            format: log_format,
            log_dir: config.logging.log_dir.clone(),
            retention_days: config.logging.retention_days,
            ..LoggingOptions::default()
        },
    )?;
    if debug_flags.any_enabled() {
        info!(
            "Debug logging enabled for: {}",
            debug_flags.enabled_crates().collect::<Vec<_>>().join(", ")
        );
    }

    let transport: Arc<dyn ModuleTransport> =
        build_transport(&config).context("Failed to create HTTP client")?;

    // Setup signal handler
    let (stop_tx, shutdown) = Shutdown::channel();
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                info!("Received shutdown signal, stopping...");
                let _ = stop_tx.send(true);
            }
            Err(e) => warn!("Ctrl+C handler unavailable: {}", e),
        }
    });

    match args.command {
        Command::Fleet { .. } => {
            println!("{}", summary::fleet_banner(&config));
            let report = run_fleet(&config, transport, shutdown).await?;
            println!("{}", summary::fleet_summary(&report));
        }
        Command::Cutoff { .. } => {
            let umid = config.cutoff.umid.clone().unwrap_or_default();
            println!("{}", summary::cutoff_banner(&config, &umid));
            let run = run_cutoff(&config, transport, shutdown).await?;
            if run.never_registered() {
                error!("✗ Cutoff module {} could not register; nothing was simulated", umid);
            }
            println!("{}", summary::cutoff_summary(&run.summary));
        }
    }

    info!("Shutdown complete");
    Ok(())
}
