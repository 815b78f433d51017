//! Client-layer error types for workflow operations and validation.
//!
//! Validation errors are raised before any request reaches the server.
//! Response-shape errors are raised after a call returned something the
//! operation cannot use. Transport and encoding errors are wrapped as-is.

use iwf_core::EncodingError;
use thiserror::Error;

use super::TransportError;

/// Client-level errors for workflow operations.
///
/// # Examples
///
/// ```no_run
/// use iwf_client::error::ClientError;
///
/// fn handle_error(error: ClientError) {
///     match error {
///         ClientError::UnknownQueryAttributes { keys, .. } => {
///             eprintln!("not registered: {}", keys.join(", "));
///         }
///         ClientError::Transport(e) if e.is_retryable() => {
///             eprintln!("server unavailable: {}", e);
///         }
///         e => eprintln!("Error: {}", e),
///     }
/// }
/// ```
#[derive(Debug, Error)]
pub enum ClientError {
    /// Workflow type is not in the registry
    #[error("Workflow {0} is not registered")]
    WorkflowTypeNotRegistered(String),

    /// Start state is unknown or cannot start the workflow
    #[error("Invalid start state {state_id} for workflow {workflow_type}")]
    InvalidStartState {
        workflow_type: String,
        state_id: String,
    },

    /// Signal channel is not declared by the workflow
    #[error("Workflow {workflow_type} doesn't have signal {channel_name}")]
    SignalChannelNotRegistered {
        workflow_type: String,
        channel_name: String,
    },

    /// Signal value type differs from the channel's declared type
    #[error("Signal value for channel {channel_name} is not of type {expected} (got {actual})")]
    SignalTypeMismatch {
        channel_name: String,
        expected: &'static str,
        actual: &'static str,
    },

    /// Query attribute keys not declared by the workflow
    #[error("Query attributes not registered: {}", .keys.join(", "))]
    UnknownQueryAttributes {
        workflow_type: String,
        keys: Vec<String>,
    },

    /// Workflow completed in more than one state
    #[error(
        "Workflow {workflow_id} completed in {} states ({}), expected at most one",
        .state_ids.len(),
        .state_ids.join(", ")
    )]
    MultipleCompletionStates {
        workflow_id: String,
        state_ids: Vec<String>,
    },

    /// Completion state carries no output
    #[error("Workflow {workflow_id} completed in state {state_id} without output")]
    MissingOutput {
        workflow_id: String,
        state_id: String,
    },

    /// Server response lacks a required field
    #[error("Malformed server response: {0}")]
    MalformedServerResponse(String),

    /// Transport-layer error
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// Serialization/deserialization error
    #[error(transparent)]
    Encoding(#[from] EncodingError),
}

impl ClientError {
    pub fn workflow_type_not_registered(workflow_type: impl Into<String>) -> Self {
        ClientError::WorkflowTypeNotRegistered(workflow_type.into())
    }

    /// Check if this error was raised locally before any request was sent
    pub fn is_validation_error(&self) -> bool {
        matches!(
            self,
            ClientError::WorkflowTypeNotRegistered(_)
                | ClientError::InvalidStartState { .. }
                | ClientError::SignalChannelNotRegistered { .. }
                | ClientError::SignalTypeMismatch { .. }
                | ClientError::UnknownQueryAttributes { .. }
        )
    }

    /// Check if this error is retryable
    pub fn is_retryable(&self) -> bool {
        match self {
            ClientError::Transport(e) => e.is_retryable(),
            _ => false,
        }
    }
}

/// Result type for client operations
pub type ClientResult<T> = Result<T, ClientError>;
