//! Shared fixtures for client tests: an in-memory workflow service that
//! records every request and answers with canned responses, and the
//! `Order` workflow model used across the suites.

#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::Arc;

use async_trait::async_trait;
use iwf_client::{
    Client, ClientOptions, Registry, StateDescriptor, TransportError, WorkflowTypeModel,
};
use iwf_proto::*;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

pub const WORKER_URL: &str = "http://worker.test:8802";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderInput {
    pub order_id: String,
    pub amount_cents: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CancelReason {
    pub reason: String,
    pub refund: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Receipt {
    pub order_id: String,
    pub charged_cents: i64,
}

/// Request recorded by [`RecordingWorkflowService`]
#[derive(Debug, Clone, PartialEq)]
pub enum RecordedCall {
    Start(WorkflowStartRequest),
    GetWithWait(WorkflowGetRequest),
    Signal(WorkflowSignalRequest),
    Reset(WorkflowResetRequest),
    QueryAttributes(WorkflowGetQueryAttributesRequest),
}

#[derive(Default)]
struct Responses {
    start: VecDeque<Result<WorkflowStartResponse, TransportError>>,
    get: VecDeque<Result<WorkflowGetResponse, TransportError>>,
    signal: VecDeque<Result<(), TransportError>>,
    reset: VecDeque<Result<WorkflowResetResponse, TransportError>>,
    query: VecDeque<Result<WorkflowGetQueryAttributesResponse, TransportError>>,
}

/// Workflow service double.
///
/// Answers each call with the next queued response for its operation, or a
/// default success response when nothing is queued.
#[derive(Default)]
pub struct RecordingWorkflowService {
    calls: Mutex<Vec<RecordedCall>>,
    responses: Mutex<Responses>,
}

impl RecordingWorkflowService {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().len()
    }

    pub fn push_start(&self, response: Result<WorkflowStartResponse, TransportError>) {
        self.responses.lock().start.push_back(response);
    }

    pub fn push_get(&self, response: Result<WorkflowGetResponse, TransportError>) {
        self.responses.lock().get.push_back(response);
    }

    pub fn push_signal(&self, response: Result<(), TransportError>) {
        self.responses.lock().signal.push_back(response);
    }

    pub fn push_reset(&self, response: Result<WorkflowResetResponse, TransportError>) {
        self.responses.lock().reset.push_back(response);
    }

    pub fn push_query(&self, response: Result<WorkflowGetQueryAttributesResponse, TransportError>) {
        self.responses.lock().query.push_back(response);
    }

    /// Queue a get-with-wait response carrying `results`
    pub fn push_results(&self, results: Vec<StateCompletionOutput>) {
        self.push_get(Ok(WorkflowGetResponse {
            workflow_run_id: "run-1".to_string(),
            workflow_status: Some("COMPLETED".to_string()),
            results: Some(results),
        }));
    }

    fn record(&self, call: RecordedCall) {
        self.calls.lock().push(call);
    }
}

#[async_trait]
impl WorkflowService for RecordingWorkflowService {
    type Error = TransportError;

    async fn start_workflow(
        &self,
        request: WorkflowStartRequest,
    ) -> Result<WorkflowStartResponse, Self::Error> {
        self.record(RecordedCall::Start(request));
        self.responses.lock().start.pop_front().unwrap_or_else(|| {
            Ok(WorkflowStartResponse {
                workflow_run_id: "run-1".to_string(),
            })
        })
    }

    async fn get_workflow_with_wait(
        &self,
        request: WorkflowGetRequest,
    ) -> Result<WorkflowGetResponse, Self::Error> {
        self.record(RecordedCall::GetWithWait(request));
        self.responses.lock().get.pop_front().unwrap_or_else(|| {
            Ok(WorkflowGetResponse {
                workflow_run_id: "run-1".to_string(),
                workflow_status: Some("COMPLETED".to_string()),
                results: None,
            })
        })
    }

    async fn signal_workflow(&self, request: WorkflowSignalRequest) -> Result<(), Self::Error> {
        self.record(RecordedCall::Signal(request));
        self.responses.lock().signal.pop_front().unwrap_or(Ok(()))
    }

    async fn reset_workflow(
        &self,
        request: WorkflowResetRequest,
    ) -> Result<WorkflowResetResponse, Self::Error> {
        self.record(RecordedCall::Reset(request));
        self.responses.lock().reset.pop_front().unwrap_or_else(|| {
            Ok(WorkflowResetResponse {
                workflow_run_id: "run-2".to_string(),
            })
        })
    }

    async fn get_query_attributes(
        &self,
        request: WorkflowGetQueryAttributesRequest,
    ) -> Result<WorkflowGetQueryAttributesResponse, Self::Error> {
        self.record(RecordedCall::QueryAttributes(request));
        self.responses.lock().query.pop_front().unwrap_or_else(|| {
            Ok(WorkflowGetQueryAttributesResponse {
                query_attributes: Some(Vec::new()),
            })
        })
    }
}

/// `Order`: starts at `validate`, `ship` is internal, `cancel` takes a
/// [`CancelReason`], query attributes `status` (String) and `items` (i64).
pub fn order_model() -> WorkflowTypeModel {
    WorkflowTypeModel::builder("Order")
        .state(StateDescriptor::starting("validate"))
        .state(StateDescriptor::non_starting("ship"))
        .signal_channel::<CancelReason>("cancel")
        .signal_channel::<i64>("add_item")
        .query_attribute::<String>("status")
        .query_attribute::<i64>("items")
        .build()
        .expect("order model is valid")
}

pub fn test_client() -> (Client, Arc<RecordingWorkflowService>) {
    let registry = Arc::new(Registry::build(vec![order_model()]).expect("registry builds"));
    let service = RecordingWorkflowService::new();
    let options = ClientOptions::new("http://iwf.test:8801", WORKER_URL);
    let client = Client::new(registry, service.clone(), options);
    (client, service)
}

pub fn completion(state_id: &str, output: Option<&str>) -> StateCompletionOutput {
    StateCompletionOutput {
        completed_state_id: state_id.to_string(),
        completed_state_output: output.map(str::to_string),
    }
}

pub fn init_test_tracing() {
    let _ = tracing_subscriber::fmt().with_env_filter("debug").try_init();
}
