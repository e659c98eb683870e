// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Simulation scheduler
//!
//! Drives a fleet of simulated modules: registers each one once, then runs
//! repeated cycles (one action per registered module, spaced apart) separated by
//! a fixed interval. A run ends when its duration budget is spent or when the
//! shutdown signal fires. Device actions are never interrupted; cancellation is
//! observed between actions and during pacing sleeps.

use crate::client::ModuleClient;
use crate::config::ModuleKind;
use crate::cutoff::{CutoffModule, CutoffTransition};
use crate::sensor::SensorModule;
use futures::future::join_all;
use std::time::Duration;
use tokio::sync::watch;
use tokio::time::Instant;
use tracing::{debug, info, warn};

/// Pause after each registration
pub const DEFAULT_REGISTRATION_DELAY: Duration = Duration::from_millis(500);
/// Pause between two modules' actions within a cycle
pub const DEFAULT_DEVICE_SPACING: Duration = Duration::from_millis(200);
/// Pause between cycles
pub const DEFAULT_INTERVAL: Duration = Duration::from_secs(5);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SchedulerTiming {
    pub registration_delay: Duration,
    pub device_spacing: Duration,
    pub interval: Duration,
}

impl Default for SchedulerTiming {
    fn default() -> Self {
        Self {
            registration_delay: DEFAULT_REGISTRATION_DELAY,
            device_spacing: DEFAULT_DEVICE_SPACING,
            interval: DEFAULT_INTERVAL,
        }
    }
}

impl SchedulerTiming {
    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    pub fn with_registration_delay(mut self, delay: Duration) -> Self {
        self.registration_delay = delay;
        self
    }

    pub fn with_device_spacing(mut self, spacing: Duration) -> Self {
        self.device_spacing = spacing;
        self
    }
}

/// When a run stops on its own
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunMode {
    /// Stop once this much time has elapsed since the first cycle began
    Bounded(Duration),
    /// Run until the shutdown signal fires
    UntilCancelled,
}

/// Cooperative stop signal backed by a `watch` channel
#[derive(Debug, Clone, Default)]
pub struct Shutdown {
    rx: Option<watch::Receiver<bool>>,
}

impl Shutdown {
    /// A signal that never fires
    pub fn never() -> Self {
        Self { rx: None }
    }

    pub fn new(rx: watch::Receiver<bool>) -> Self {
        Self { rx: Some(rx) }
    }

    /// Sender plus the matching signal; send `true` to stop
    pub fn channel() -> (watch::Sender<bool>, Self) {
        let (tx, rx) = watch::channel(false);
        (tx, Self::new(rx))
    }

    pub fn is_triggered(&self) -> bool {
        self.rx.as_ref().map(|rx| *rx.borrow()).unwrap_or(false)
    }

    /// Resolves once the signal fires. A dropped sender can no longer fire.
    pub async fn triggered(&mut self) {
        let Some(rx) = self.rx.as_mut() else {
            return std::future::pending().await;
        };
        loop {
            if *rx.borrow_and_update() {
                return;
            }
            if rx.changed().await.is_err() {
                return std::future::pending().await;
            }
        }
    }

    /// Sleep for `duration`, waking early on shutdown. Returns `false` if interrupted.
    pub async fn sleep(&mut self, duration: Duration) -> bool {
        if self.is_triggered() {
            return false;
        }
        if duration.is_zero() {
            return true;
        }
        tokio::select! {
            _ = tokio::time::sleep(duration) => true,
            _ = self.triggered() => false,
        }
    }
}

/// A fleet member
#[derive(Debug)]
pub enum SimulatedModule {
    Sensor(SensorModule),
    Cutoff(CutoffModule),
}

impl SimulatedModule {
    /// Wrap a client according to its configured kind
    pub fn from_client(client: ModuleClient) -> Self {
        match client.config().kind {
            ModuleKind::Sensor => SimulatedModule::Sensor(SensorModule::new(client)),
            ModuleKind::Cutoff => SimulatedModule::Cutoff(CutoffModule::new(client)),
        }
    }

    pub fn client(&self) -> &ModuleClient {
        match self {
            SimulatedModule::Sensor(m) => m.client(),
            SimulatedModule::Cutoff(m) => m.client(),
        }
    }

    fn client_mut(&mut self) -> &mut ModuleClient {
        match self {
            SimulatedModule::Sensor(m) => m.client_mut(),
            SimulatedModule::Cutoff(m) => m.client_mut(),
        }
    }

    pub fn is_registered(&self) -> bool {
        self.client().is_registered()
    }

    /// Run this module's per-cycle action. Failures are absorbed into the outcome.
    pub async fn act(&mut self) -> ActionOutcome {
        let mut outcome = ActionOutcome::default();
        match self {
            SimulatedModule::Sensor(sensor) => match sensor.send_reading().await {
                Ok(_) => outcome.published = 1,
                Err(_) => outcome.publish_failures = 1,
            },
            SimulatedModule::Cutoff(cutoff) => {
                let failures_before = cutoff.heartbeat().failed();
                match cutoff.check_status().await {
                    Ok(Some(CutoffTransition::Activated { .. })) => outcome.activations = 1,
                    Ok(Some(CutoffTransition::Deactivated { .. })) => outcome.deactivations = 1,
                    Ok(None) => {}
                    Err(e) => warn!("[SIM] ✗ {}: {}", cutoff.client().umid(), e),
                }
                outcome.heartbeat_failures = cutoff.heartbeat().failed() - failures_before;
            }
        }
        outcome
    }
}

/// What one device action produced
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ActionOutcome {
    pub published: u64,
    pub publish_failures: u64,
    pub heartbeat_failures: u64,
    pub activations: u64,
    pub deactivations: u64,
}

/// Totals for a finished run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SimulationReport {
    pub cycles: u64,
    pub registered: usize,
    pub excluded: usize,
    pub published: u64,
    pub publish_failures: u64,
    pub heartbeat_failures: u64,
    pub activations: u64,
    pub deactivations: u64,
    pub cancelled: bool,
}

impl SimulationReport {
    fn absorb(&mut self, outcome: ActionOutcome) {
        self.published += outcome.published;
        self.publish_failures += outcome.publish_failures;
        self.heartbeat_failures += outcome.heartbeat_failures;
        self.activations += outcome.activations;
        self.deactivations += outcome.deactivations;
    }
}

/// Fleet runner
#[derive(Debug)]
pub struct Simulation {
    modules: Vec<SimulatedModule>,
    timing: SchedulerTiming,
    parallel: bool,
    shutdown: Shutdown,
}

impl Simulation {
    pub fn new(modules: Vec<SimulatedModule>, timing: SchedulerTiming) -> Self {
        Self {
            modules,
            timing,
            parallel: false,
            shutdown: Shutdown::never(),
        }
    }

    /// Fan out one action per module per cycle instead of running them in sequence
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    pub fn with_shutdown(mut self, shutdown: Shutdown) -> Self {
        self.shutdown = shutdown;
        self
    }

    pub fn modules(&self) -> &[SimulatedModule] {
        &self.modules
    }

    pub fn into_modules(self) -> Vec<SimulatedModule> {
        self.modules
    }

    /// Register every module once, in order. Returns (registered, excluded).
    pub async fn register_all(&mut self) -> (usize, usize) {
        let mut registered = 0;
        let mut excluded = 0;
        let delay = self.timing.registration_delay;

        for module in self.modules.iter_mut() {
            if module.is_registered() {
                registered += 1;
                continue;
            }
            if self.shutdown.is_triggered() {
                excluded += 1;
                continue;
            }
            match module.client_mut().connect().await {
                Ok(()) => registered += 1,
                Err(e) => {
                    excluded += 1;
                    warn!("[SIM] ⚠ Excluding {} from the run: {}", module.client().umid(), e);
                }
            }
            self.shutdown.sleep(delay).await;
        }

        (registered, excluded)
    }

    /// Register, then cycle until the stop condition
    pub async fn run(&mut self, mode: RunMode) -> SimulationReport {
        let mut report = SimulationReport::default();

        info!("[SIM] Registering {} modules", self.modules.len());
        let (registered, excluded) = self.register_all().await;
        report.registered = registered;
        report.excluded = excluded;

        if registered == 0 {
            warn!("[SIM] ⚠ No module registered; nothing to simulate");
            report.cancelled = self.shutdown.is_triggered();
            return report;
        }

        info!(
            "[SIM] Starting cycles: {} active, interval {:?}, mode {:?}",
            registered, self.timing.interval, mode
        );

        let started = Instant::now();
        loop {
            if self.shutdown.is_triggered() {
                break;
            }
            if let RunMode::Bounded(duration) = mode {
                if started.elapsed() >= duration {
                    break;
                }
            }

            report.cycles += 1;
            debug!(
                "[SIM] --- Cycle {} ({}s elapsed) ---",
                report.cycles,
                started.elapsed().as_secs()
            );

            if self.parallel {
                self.run_cycle_parallel(&mut report).await;
            } else {
                self.run_cycle_sequential(&mut report).await;
            }

            let pause = match mode {
                RunMode::Bounded(duration) => {
                    let remaining = duration.saturating_sub(started.elapsed());
                    self.timing.interval.min(remaining)
                }
                RunMode::UntilCancelled => self.timing.interval,
            };
            if !self.shutdown.sleep(pause).await {
                break;
            }
        }

        report.cancelled = self.shutdown.is_triggered();
        info!(
            "[SIM] ✓ Simulation finished after {} cycles ({} published, {} failed, {} activations)",
            report.cycles, report.published, report.publish_failures, report.activations
        );
        report
    }

    async fn run_cycle_sequential(&mut self, report: &mut SimulationReport) {
        let spacing = self.timing.device_spacing;
        for module in self.modules.iter_mut().filter(|m| m.is_registered()) {
            if self.shutdown.is_triggered() {
                return;
            }
            report.absorb(module.act().await);
            if !self.shutdown.sleep(spacing).await {
                return;
            }
        }
    }

    async fn run_cycle_parallel(&mut self, report: &mut SimulationReport) {
        let actions = self
            .modules
            .iter_mut()
            .filter(|m| m.is_registered())
            .map(|m| m.act());
        for outcome in join_all(actions).await {
            report.absorb(outcome);
        }
    }
}
