//! Error types shared by the iWF client crates.
//!
//! Three layers are defined here:
//!
//! - [`EncodingError`]: payload serialization failures
//! - [`RegistryError`]: invalid workflow models rejected at registration
//! - [`TransportError`]: failures reaching or talking to the iWF server
//!
//! Client-level validation errors live in `iwf-client` and wrap these.

use std::time::Duration;
use thiserror::Error;

/// Errors produced while encoding or decoding payloads.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EncodingError {
    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Deserialization error: {0}")]
    Deserialization(String),
}

/// Errors raised while building workflow models or the registry.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    #[error("Workflow type {0} is registered more than once")]
    DuplicateWorkflowType(String),

    #[error("Workflow {workflow_type} declares state {state_id} more than once")]
    DuplicateState {
        workflow_type: String,
        state_id: String,
    },

    #[error("Workflow {workflow_type} declares signal channel {channel_name} more than once")]
    DuplicateSignalChannel {
        workflow_type: String,
        channel_name: String,
    },

    #[error("Workflow {workflow_type} declares query attribute {key} more than once")]
    DuplicateQueryAttribute { workflow_type: String, key: String },
}

/// Transport-level errors talking to the iWF server.
///
/// These are surfaced to callers unchanged; the client never retries.
#[derive(Debug, Clone, Error)]
pub enum TransportError {
    /// The server could not be reached
    #[error("Connection failed to {endpoint}: {message}")]
    Connection { endpoint: String, message: String },

    /// Invalid server URL provided
    #[error("Invalid endpoint: {0}")]
    InvalidEndpoint(String),

    /// The server answered with a non-success status
    #[error("Server returned status {status}: {message}")]
    Status { status: u16, message: String },

    /// The response body could not be decoded
    #[error("Failed to decode server response: {0}")]
    Decode(String),

    /// Request timed out
    #[error("Request timeout after {0:?}")]
    Timeout(Duration),
}

impl TransportError {
    /// Create a connection failed error for a specific endpoint
    pub fn connection(endpoint: impl Into<String>, message: impl Into<String>) -> Self {
        TransportError::Connection {
            endpoint: endpoint.into(),
            message: message.into(),
        }
    }

    /// Check if this error is a transient failure.
    ///
    /// Callers may use this to drive their own retry policy.
    pub fn is_retryable(&self) -> bool {
        match self {
            TransportError::Status { status, .. } => matches!(status, 429 | 502 | 503 | 504),
            TransportError::Timeout(_) => true,
            TransportError::Connection { .. } => true,
            _ => false,
        }
    }

    /// Get the HTTP status code if the server answered
    pub fn status(&self) -> Option<u16> {
        match self {
            TransportError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}
