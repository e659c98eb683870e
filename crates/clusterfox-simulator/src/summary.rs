// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Console output: startup banner and end-of-run summaries

use clusterfox_agent::{CutoffSummary, SimulationReport};
use clusterfox_config::SimulatorConfig;

const RULE: &str = "============================================================";

pub fn fleet_banner(config: &SimulatorConfig) -> String {
    let mut lines = vec![
        RULE.to_string(),
        "ClusterFox Module Simulator".to_string(),
        RULE.to_string(),
        format!("Server URL: {}", config.server.url),
        format!("Number of modules: {}", config.modules.len()),
        format!("Data interval: {} seconds", config.timing.interval_secs),
        format!("Simulation duration: {} seconds", config.timing.duration_secs),
    ];
    if config.timing.parallel {
        lines.push("Mode: parallel".to_string());
    }
    lines.push(RULE.to_string());
    lines.join("\n")
}

pub fn cutoff_banner(config: &SimulatorConfig, umid: &str) -> String {
    [
        RULE.to_string(),
        "ClusterFox Cutoff Module Simulator".to_string(),
        RULE.to_string(),
        format!("Server URL: {}", config.server.url),
        format!("UMID: {}", umid),
        format!("Name: {}", config.cutoff.name),
        format!(
            "Pool: {}",
            config
                .cutoff
                .pool_id
                .as_deref()
                .unwrap_or(&config.server.default_pool)
        ),
        format!("Check interval: {} seconds", config.cutoff.poll_interval_secs),
        "Press Ctrl+C to stop".to_string(),
        RULE.to_string(),
    ]
    .join("\n")
}

pub fn fleet_summary(report: &SimulationReport) -> String {
    let mut lines = vec![
        RULE.to_string(),
        if report.cancelled {
            "Simulation stopped by user".to_string()
        } else {
            "Simulation complete".to_string()
        },
        format!("Cycles: {}", report.cycles),
        format!(
            "Modules registered: {} (excluded: {})",
            report.registered, report.excluded
        ),
        format!(
            "Readings sent: {} (failed: {})",
            report.published, report.publish_failures
        ),
    ];
    if report.activations > 0 || report.deactivations > 0 {
        lines.push(format!(
            "Cutoff activations: {} (deactivations: {})",
            report.activations, report.deactivations
        ));
    }
    lines.push(RULE.to_string());
    lines.join("\n")
}

/// Shutdown summary. Reports the real activation count.
pub fn cutoff_summary(summary: &CutoffSummary) -> String {
    let last = summary
        .last_activation
        .map(|at| at.format("%Y-%m-%d %H:%M:%S UTC").to_string())
        .unwrap_or_else(|| "never".to_string());
    [
        RULE.to_string(),
        format!("Cutoff module {} ({}) stopped", summary.umid, summary.name),
        format!("Final state: {}", summary.state),
        format!("Total activations: {}", summary.activations),
        format!("Total deactivations: {}", summary.deactivations),
        format!("Last activation: {}", last),
        format!("Heartbeat failures: {}", summary.heartbeat_failures),
        RULE.to_string(),
    ]
    .join("\n")
}
