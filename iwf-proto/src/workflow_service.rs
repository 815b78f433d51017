//! Workflow service interface.
//!
//! This module defines the service interface for communicating with the
//! iWF server. It includes request/response types for all operations the
//! client issues. Field names follow the server's JSON API.

use crate::shared::*;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Start workflow request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkflowStartRequest {
    pub workflow_id: String,
    /// Callback address of the worker hosting the workflow states
    pub iwf_worker_url: String,
    pub iwf_workflow_type: String,
    pub workflow_timeout_seconds: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state_input: Option<String>,
    pub start_state_id: String,
}

/// Start workflow response
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkflowStartResponse {
    pub workflow_run_id: String,
}

/// Get workflow request, used with server-side wait
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkflowGetRequest {
    pub workflow_id: String,
    /// Empty for the current run
    pub workflow_run_id: String,
    pub needs_results: bool,
}

/// Get workflow response
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkflowGetResponse {
    #[serde(default)]
    pub workflow_run_id: String,
    #[serde(default)]
    pub workflow_status: Option<String>,
    #[serde(default)]
    pub results: Option<Vec<StateCompletionOutput>>,
}

/// Signal workflow request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkflowSignalRequest {
    pub workflow_id: String,
    pub workflow_run_id: String,
    pub signal_channel_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub signal_value: Option<String>,
}

/// Reset workflow request.
///
/// Only the fields relevant to `reset_type` are populated; the server is the
/// authority on which fields each reset type requires.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkflowResetRequest {
    pub workflow_id: String,
    pub workflow_run_id: String,
    pub reset_type: ResetType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub history_event_id: Option<i32>,
    pub reason: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub decision_offset: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reset_bad_binary_checksum: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub earliest_time: Option<String>,
    pub skip_signal_reapply: bool,
}

/// Reset workflow response
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkflowResetResponse {
    /// Run id of the new run forked by the reset
    pub workflow_run_id: String,
}

/// Get query attributes request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkflowGetQueryAttributesRequest {
    pub workflow_id: String,
    pub workflow_run_id: String,
    /// Absent to fetch every attribute
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attribute_keys: Option<Vec<String>>,
}

/// Get query attributes response
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkflowGetQueryAttributesResponse {
    #[serde(default)]
    pub query_attributes: Option<Vec<KeyValue>>,
}

/// iWF server API.
///
/// Every method issues exactly one call. Implementations must not retry.
#[async_trait]
pub trait WorkflowService: Send + Sync {
    type Error;

    async fn start_workflow(
        &self,
        request: WorkflowStartRequest,
    ) -> Result<WorkflowStartResponse, Self::Error>;

    /// Blocks at the server until the workflow completes or the server's own
    /// wait limit elapses.
    async fn get_workflow_with_wait(
        &self,
        request: WorkflowGetRequest,
    ) -> Result<WorkflowGetResponse, Self::Error>;

    async fn signal_workflow(&self, request: WorkflowSignalRequest) -> Result<(), Self::Error>;

    async fn reset_workflow(
        &self,
        request: WorkflowResetRequest,
    ) -> Result<WorkflowResetResponse, Self::Error>;

    async fn get_query_attributes(
        &self,
        request: WorkflowGetQueryAttributesRequest,
    ) -> Result<WorkflowGetQueryAttributesResponse, Self::Error>;
}
