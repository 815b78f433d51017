//! Shared wire types used by several iWF API operations.

use serde::{Deserialize, Serialize};

/// Output of one completed state of a workflow run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StateCompletionOutput {
    pub completed_state_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_state_output: Option<String>,
}

/// Query attribute key with its encoded value.
///
/// An absent value means the attribute has not been set yet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyValue {
    pub key: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
}

/// Error body returned by the iWF server on non-success statuses
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorResponse {
    #[serde(default)]
    pub detail: Option<String>,
    #[serde(default)]
    pub sub_status: Option<String>,
}

/// Reset strategy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ResetType {
    HistoryEventId,
    BadBinary,
    DecisionCompletedTime,
    LastDecisionCompleted,
}
