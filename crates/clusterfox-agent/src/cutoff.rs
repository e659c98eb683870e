// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Cutoff actuator: edge detection over the remote `cutoffActive` flag.
//!
//! `CutoffStateMachine` is pure and deterministic:
//! - No I/O, no sleeps
//! - The caller supplies every observation and the current wall-clock time
//! - Poll-driven today; a push source can feed the same `observe()` call
//!
//! `CutoffModule` is the poll driver: heartbeat, roster fetch, `observe()`,
//! then the relay side effect for any transition.

use crate::client::ModuleClient;
use crate::error::Result;
use crate::heartbeat::HeartbeatReporter;
use crate::relay::{RelayAction, RelayReport, RelaySimulator};
use crate::transport::find_in_roster;
use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CutoffState {
    Standby,
    Active,
}

impl CutoffState {
    fn from_flag(active: bool) -> Self {
        if active {
            CutoffState::Active
        } else {
            CutoffState::Standby
        }
    }
}

impl std::fmt::Display for CutoffState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CutoffState::Standby => write!(f, "STANDBY"),
            CutoffState::Active => write!(f, "ACTIVE (CUTOFF)"),
        }
    }
}

/// Outcome of one poll, as seen by the state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Observation {
    /// Module found; carries its `cutoffActive` flag
    State(bool),
    /// Module absent from the roster
    Missing,
    /// Transport or parse failure
    Failed,
}

/// Edge event emitted exactly once per observed change
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CutoffTransition {
    Activated { at: DateTime<Utc> },
    Deactivated { at: DateTime<Utc> },
}

impl CutoffTransition {
    pub fn relay_action(&self) -> RelayAction {
        match self {
            CutoffTransition::Activated { .. } => RelayAction::Open,
            CutoffTransition::Deactivated { .. } => RelayAction::Close,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct CutoffStateMachine {
    cutoff_active: bool,
    last_activation: Option<DateTime<Utc>>,
    activation_count: u64,
    deactivation_count: u64,
}

impl CutoffStateMachine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> CutoffState {
        CutoffState::from_flag(self.cutoff_active)
    }

    pub fn cutoff_active(&self) -> bool {
        self.cutoff_active
    }

    pub fn last_activation(&self) -> Option<DateTime<Utc>> {
        self.last_activation
    }

    pub fn activation_count(&self) -> u64 {
        self.activation_count
    }

    pub fn deactivation_count(&self) -> u64 {
        self.deactivation_count
    }

    /// Feed one observation. Cache changes only on `State`.
    pub fn observe(
        &mut self,
        observation: Observation,
        now: DateTime<Utc>,
    ) -> Option<CutoffTransition> {
        let observed = match observation {
            Observation::State(flag) => flag,
            Observation::Missing | Observation::Failed => return None,
        };

        let transition = match (self.cutoff_active, observed) {
            (false, true) => {
                self.activation_count += 1;
                self.last_activation = Some(now);
                Some(CutoffTransition::Activated { at: now })
            }
            (true, false) => {
                self.deactivation_count += 1;
                Some(CutoffTransition::Deactivated { at: now })
            }
            _ => None,
        };
        self.cutoff_active = observed;
        transition
    }
}

/// Per-check status line, e.g. `Status: STANDBY | Last check: 14:03:27`
pub fn status_line(state: CutoffState, checked_at: DateTime<Utc>) -> String {
    format!("Status: {} | Last check: {}", state, checked_at.format("%H:%M:%S"))
}

/// Shutdown summary for a cutoff module
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CutoffSummary {
    pub umid: String,
    pub name: String,
    pub state: CutoffState,
    pub activations: u64,
    pub deactivations: u64,
    pub last_activation: Option<DateTime<Utc>>,
    pub heartbeat_failures: u64,
}

/// Poll-driven cutoff actuator
#[derive(Debug)]
pub struct CutoffModule {
    client: ModuleClient,
    machine: CutoffStateMachine,
    heartbeat: HeartbeatReporter,
    relay: RelaySimulator,
    last_check: Option<DateTime<Utc>>,
}

impl CutoffModule {
    pub fn new(client: ModuleClient) -> Self {
        Self::with_relay(client, RelaySimulator::default())
    }

    pub fn with_relay(client: ModuleClient, relay: RelaySimulator) -> Self {
        Self {
            client,
            machine: CutoffStateMachine::new(),
            heartbeat: HeartbeatReporter::new(),
            relay,
            last_check: None,
        }
    }

    pub fn client(&self) -> &ModuleClient {
        &self.client
    }

    pub fn client_mut(&mut self) -> &mut ModuleClient {
        &mut self.client
    }

    pub fn machine(&self) -> &CutoffStateMachine {
        &self.machine
    }

    pub fn heartbeat(&self) -> &HeartbeatReporter {
        &self.heartbeat
    }

    /// Time of the most recent status check
    pub fn last_check(&self) -> Option<DateTime<Utc>> {
        self.last_check
    }

    fn name(&self) -> &str {
        &self.client.config().display_name
    }

    /// Fetch the roster and reduce it to this module's observation
    pub async fn poll(&self) -> Observation {
        match self.client.transport().fetch_roster().await {
            Ok(roster) => match find_in_roster(&roster, self.client.umid()) {
                Some(entry) => Observation::State(entry.cutoff_active),
                None => {
                    debug!("[CUTOFF] {} not present in roster", self.client.umid());
                    Observation::Missing
                }
            },
            Err(e) => {
                warn!("[CUTOFF] ✗ [{}] Error checking status: {}", self.name(), e);
                Observation::Failed
            }
        }
    }

    /// One cycle: heartbeat, poll, edge detection, relay side effect
    pub async fn check_status(&mut self) -> Result<Option<CutoffTransition>> {
        self.client.ensure_registered()?;

        self.heartbeat.beat(&self.client).await;
        let observation = self.poll().await;
        let checked_at = Utc::now();
        self.last_check = Some(checked_at);
        let transition = self.machine.observe(observation, checked_at);

        if let Some(transition) = transition {
            self.announce(&transition);
            let action = transition.relay_action();
            let report: RelayReport = self.relay.actuate(self.name(), action).await;
            debug!("[CUTOFF] Relay report for {}: {:?}", self.client.umid(), report);
        }

        info!(
            "[CUTOFF] [{}] {}",
            self.name(),
            status_line(self.machine.state(), checked_at)
        );
        Ok(transition)
    }

    fn announce(&self, transition: &CutoffTransition) {
        match transition {
            CutoffTransition::Activated { at } => info!(
                "[CUTOFF] [{}] CUTOFF ACTIVATED at {}",
                self.name(),
                at.format("%Y-%m-%d %H:%M:%S")
            ),
            CutoffTransition::Deactivated { at } => info!(
                "[CUTOFF] [{}] ✓ CUTOFF DEACTIVATED at {}",
                self.name(),
                at.format("%Y-%m-%d %H:%M:%S")
            ),
        }
    }

    pub fn summary(&self) -> CutoffSummary {
        CutoffSummary {
            umid: self.client.umid().to_string(),
            name: self.name().to_string(),
            state: self.machine.state(),
            activations: self.machine.activation_count(),
            deactivations: self.machine.deactivation_count(),
            last_activation: self.machine.last_activation(),
            heartbeat_failures: self.heartbeat.failed(),
        }
    }
}
