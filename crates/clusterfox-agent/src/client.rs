// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Registration and session state for one simulated module

use crate::config::ModuleConfig;
use crate::error::{AgentError, Result};
use crate::transport::{ModuleTransport, RegistrationRequest};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Session-holding client for a single module
///
/// Registration is single-shot: a failed `connect()` leaves the client
/// unregistered and the caller is expected to drop the module from the run.
///
/// # Example
/// ```ignore
/// use clusterfox_agent::{HttpTransport, ModuleClient, ModuleConfig, ModuleKind};
/// use std::sync::Arc;
///
/// let transport = Arc::new(HttpTransport::new("http://localhost:3000", timeout)?);
/// let config = ModuleConfig::new("SENSOR001", ModuleKind::Sensor)
///     .with_display_name("temp-humidity")
///     .with_sensor_fields(["temp", "humi"]);
///
/// let mut client = ModuleClient::new(config, transport)?;
/// client.connect().await?;
/// ```
pub struct ModuleClient {
    /// Configuration
    config: ModuleConfig,

    /// Shared transport
    transport: Arc<dyn ModuleTransport>,

    /// Session token, set once on successful registration
    session_id: Option<String>,

    /// Registration state
    registered: bool,
}

impl ModuleClient {
    /// Create a client for a validated module configuration
    pub fn new(config: ModuleConfig, transport: Arc<dyn ModuleTransport>) -> Result<Self> {
        config.validate()?;

        Ok(Self {
            config,
            transport,
            session_id: None,
            registered: false,
        })
    }

    /// Register the module with the server (one attempt)
    pub async fn connect(&mut self) -> Result<()> {
        if self.registered {
            return Err(AgentError::AlreadyConnected);
        }

        info!(
            "[CLIENT] Registering {} module: {} ({})",
            self.config.kind, self.config.umid, self.config.display_name
        );

        let request = RegistrationRequest::from(&self.config);
        match self.transport.register(&request).await {
            Ok(ack) => {
                self.session_id = ack.session_id;
                self.registered = true;
                match &self.session_id {
                    Some(session) => info!(
                        "[CLIENT] ✓ Registered {} (session {}...)",
                        self.config.umid,
                        session.get(..8).unwrap_or(session)
                    ),
                    None => info!("[CLIENT] ✓ Registered {}", self.config.umid),
                }
                if let Some(status) = ack.status.as_deref() {
                    debug!("[CLIENT] Registration status for {}: {}", self.config.umid, status);
                }
                Ok(())
            }
            Err(e) => {
                warn!("[CLIENT] ✗ Registration failed for {}: {}", self.config.umid, e);
                Err(e)
            }
        }
    }

    /// Guard for operations that need a session
    pub fn ensure_registered(&self) -> Result<()> {
        if self.registered {
            Ok(())
        } else {
            Err(AgentError::NotRegistered)
        }
    }

    pub fn is_registered(&self) -> bool {
        self.registered
    }

    pub fn session_id(&self) -> Option<&str> {
        self.session_id.as_deref()
    }

    pub fn umid(&self) -> &str {
        &self.config.umid
    }

    pub fn config(&self) -> &ModuleConfig {
        &self.config
    }

    pub fn transport(&self) -> &Arc<dyn ModuleTransport> {
        &self.transport
    }
}

impl std::fmt::Debug for ModuleClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModuleClient")
            .field("umid", &self.config.umid)
            .field("kind", &self.config.kind)
            .field("registered", &self.registered)
            .finish()
    }
}
