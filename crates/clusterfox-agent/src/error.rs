// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Error types for the ClusterFox module client

/// Result type alias using AgentError
pub type Result<T> = std::result::Result<T, AgentError>;

/// Coarse failure classes used by callers to decide how far an error propagates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// Connection refused, DNS, timeout. Never fatal.
    Transport,
    /// Server answered, but not with an acknowledgment we can use.
    Protocol,
    /// Caller misuse (unregistered device, bad configuration).
    Usage,
}

/// Error types for the ClusterFox module client
#[derive(Debug, thiserror::Error)]
pub enum AgentError {
    /// HTTP transport error (connect, DNS, body read)
    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// Request did not complete in time
    #[error("Request timeout: {0}")]
    Timeout(String),

    /// Non-success HTTP status
    #[error("HTTP {status}: {body}")]
    HttpStatus { status: u16, body: String },

    /// Server answered with an explicit negative acknowledgment
    #[error("Rejected by server: {0}")]
    Rejected(String),

    /// JSON body without the expected fields or structure
    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    /// Response body is not JSON at all
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Module not registered
    #[error("Module not registered - call connect() first")]
    NotRegistered,

    /// Module already registered in this run
    #[error("Module already registered")]
    AlreadyConnected,

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl AgentError {
    /// Classify the error for the action-boundary policy
    pub fn kind(&self) -> FailureKind {
        match self {
            AgentError::Transport(e) if e.is_decode() => FailureKind::Protocol,
            AgentError::Transport(_) | AgentError::Timeout(_) => FailureKind::Transport,
            AgentError::HttpStatus { .. }
            | AgentError::Rejected(_)
            | AgentError::MalformedResponse(_)
            | AgentError::Json(_) => FailureKind::Protocol,
            AgentError::NotRegistered
            | AgentError::AlreadyConnected
            | AgentError::InvalidConfig(_) => FailureKind::Usage,
        }
    }

    pub fn is_transport(&self) -> bool {
        self.kind() == FailureKind::Transport
    }
}
