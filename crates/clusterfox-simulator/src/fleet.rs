// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Turning a validated `SimulatorConfig` into runnable modules

use std::sync::Arc;
use std::time::Duration;

use clusterfox_agent::{
    AgentError, CutoffModule, CutoffSummary, HttpTransport, ModuleClient, ModuleConfig,
    ModuleKind, ModuleTransport, RelaySimulator, Result, RunMode, SchedulerTiming, Shutdown,
    SimulatedModule, Simulation, SimulationReport,
};
use clusterfox_config::{CutoffConfig, ModuleEntry, SimulatorConfig};
use tracing::info;

/// HTTP transport for the configured server
pub fn build_transport(config: &SimulatorConfig) -> Result<Arc<HttpTransport>> {
    let timeout = Duration::from_millis(config.server.request_timeout_ms);
    Ok(Arc::new(HttpTransport::new(&config.server.url, timeout)?))
}

/// Fleet pacing from the `[timing]` section
pub fn scheduler_timing(config: &SimulatorConfig) -> SchedulerTiming {
    SchedulerTiming::default()
        .with_interval(Duration::from_secs(config.timing.interval_secs))
        .with_registration_delay(Duration::from_millis(config.timing.registration_delay_ms))
        .with_device_spacing(Duration::from_millis(config.timing.device_spacing_ms))
}

/// Standalone cutoff pacing: one module, polled every `poll_interval_secs`
pub fn cutoff_timing(config: &SimulatorConfig) -> SchedulerTiming {
    SchedulerTiming::default()
        .with_interval(Duration::from_secs(config.cutoff.poll_interval_secs))
        .with_registration_delay(Duration::ZERO)
        .with_device_spacing(Duration::ZERO)
}

pub fn sensor_config(entry: &ModuleEntry, default_pool: &str) -> ModuleConfig {
    ModuleConfig::new(entry.umid.clone(), ModuleKind::Sensor)
        .with_display_name(entry.module_type.clone())
        .with_pool_id(entry.pool_id.as_deref().unwrap_or(default_pool))
        .with_sensor_fields(entry.sensor_fields.iter().map(String::as_str))
}

pub fn cutoff_config(cutoff: &CutoffConfig, default_pool: &str) -> ModuleConfig {
    let base = match &cutoff.umid {
        Some(umid) => ModuleConfig::new(umid.clone(), ModuleKind::Cutoff),
        None => ModuleConfig::cutoff_with_random_umid(),
    };
    base.with_display_name(cutoff.name.clone())
        .with_pool_id(cutoff.pool_id.as_deref().unwrap_or(default_pool))
}

/// One sensor module per `[[modules]]` entry, in file order
pub fn build_fleet(
    config: &SimulatorConfig,
    transport: Arc<dyn ModuleTransport>,
) -> Result<Vec<SimulatedModule>> {
    config
        .modules
        .iter()
        .map(|entry| {
            let module_config = sensor_config(entry, &config.server.default_pool);
            let client = ModuleClient::new(module_config, Arc::clone(&transport))?;
            Ok(SimulatedModule::from_client(client))
        })
        .collect()
}

pub fn build_cutoff(
    config: &SimulatorConfig,
    transport: Arc<dyn ModuleTransport>,
) -> Result<CutoffModule> {
    let module_config = cutoff_config(&config.cutoff, &config.server.default_pool);
    let client = ModuleClient::new(module_config, transport)?;
    let relay = RelaySimulator::new(Duration::from_millis(config.timing.relay_delay_ms));
    Ok(CutoffModule::with_relay(client, relay))
}

/// Run the sensor fleet for `timing.duration_secs` or until shutdown
pub async fn run_fleet(
    config: &SimulatorConfig,
    transport: Arc<dyn ModuleTransport>,
    shutdown: Shutdown,
) -> Result<SimulationReport> {
    let modules = build_fleet(config, transport)?;
    info!(
        "[SIM] Fleet of {} modules against {} (duration {}s, interval {}s)",
        modules.len(),
        config.server.url,
        config.timing.duration_secs,
        config.timing.interval_secs
    );

    let mut simulation = Simulation::new(modules, scheduler_timing(config))
        .with_parallel(config.timing.parallel)
        .with_shutdown(shutdown);
    let duration = Duration::from_secs(config.timing.duration_secs);
    Ok(simulation.run(RunMode::Bounded(duration)).await)
}

/// Result of a standalone cutoff run
#[derive(Debug, Clone)]
pub struct CutoffRun {
    pub report: SimulationReport,
    pub summary: CutoffSummary,
}

impl CutoffRun {
    /// Registration failed and no status check ever ran
    pub fn never_registered(&self) -> bool {
        self.report.registered == 0
    }
}

/// Run one cutoff module until shutdown
pub async fn run_cutoff(
    config: &SimulatorConfig,
    transport: Arc<dyn ModuleTransport>,
    shutdown: Shutdown,
) -> Result<CutoffRun> {
    let module = build_cutoff(config, transport)?;
    info!(
        "[SIM] Cutoff module {} ({}) polling every {}s",
        module.client().umid(),
        module.client().config().display_name,
        config.cutoff.poll_interval_secs
    );

    let mut simulation = Simulation::new(
        vec![SimulatedModule::Cutoff(module)],
        cutoff_timing(config),
    )
    .with_shutdown(shutdown);
    let report = simulation.run(RunMode::UntilCancelled).await;

    match simulation.into_modules().pop() {
        Some(SimulatedModule::Cutoff(module)) => Ok(CutoffRun {
            report,
            summary: module.summary(),
        }),
        _ => Err(AgentError::InvalidConfig(
            "cutoff run lost its module".to_string(),
        )),
    }
}
