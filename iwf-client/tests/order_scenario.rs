//! End-to-end `Order` scenario against the in-memory service: start,
//! signal, reject a mistyped signal, then collect the result.

mod common;

use std::sync::Arc;

use common::*;
use iwf_client::{
    Client, ClientError, ClientOptions, Registry, SignalChannelDef, StateDescriptor, Workflow,
    WorkflowStartOptions,
};
use iwf_proto::{WorkflowSignalRequest, WorkflowStartResponse};
use uuid::Uuid;

struct OrderWorkflow;

impl Workflow for OrderWorkflow {
    fn workflow_type(&self) -> &str {
        "Order"
    }

    fn states(&self) -> Vec<StateDescriptor> {
        vec![StateDescriptor::starting("validate")]
    }

    fn signal_channels(&self) -> Vec<SignalChannelDef> {
        vec![SignalChannelDef::new::<CancelReason>("cancel")]
    }
}

#[tokio::test]
async fn test_order_start_then_signal() {
    init_test_tracing();

    let workflows: [&dyn Workflow; 1] = [&OrderWorkflow];
    let registry = Arc::new(Registry::from_workflows(&workflows).unwrap());
    let service = RecordingWorkflowService::new();
    let client = Client::new(
        registry,
        service.clone(),
        ClientOptions::new("http://iwf.test:8801", WORKER_URL),
    );

    let workflow_id = format!("order-{}", Uuid::new_v4());
    service.push_start(Ok(WorkflowStartResponse {
        workflow_run_id: "run-order".to_string(),
    }));
    let input = OrderInput {
        order_id: workflow_id.clone(),
        amount_cents: 2500,
    };

    let run_id = client
        .start_workflow("Order", "validate", &input, &workflow_id, &WorkflowStartOptions::minimum(60))
        .await
        .unwrap();
    assert_eq!(run_id, "run-order");

    let reason = CancelReason {
        reason: "changed my mind".to_string(),
        refund: true,
    };
    client
        .signal_workflow("Order", &workflow_id, Some(run_id.as_str()), "cancel", &reason)
        .await
        .unwrap();

    let err = client
        .signal_workflow("Order", &workflow_id, Some(run_id.as_str()), "cancel", &"not-a-reason")
        .await
        .unwrap_err();
    assert!(matches!(err, ClientError::SignalTypeMismatch { .. }));

    let calls = service.calls();
    assert_eq!(calls.len(), 2);
    assert_eq!(
        calls[1],
        RecordedCall::Signal(WorkflowSignalRequest {
            workflow_id: workflow_id.clone(),
            workflow_run_id: run_id.clone(),
            signal_channel_name: "cancel".to_string(),
            signal_value: Some(serde_json::to_string(&reason).unwrap()),
        })
    );

    service.push_results(vec![completion("validate", Some("\"cancelled\""))]);
    let outcome: Option<String> = client
        .get_simple_workflow_result_with_wait(&workflow_id, Some(run_id.as_str()))
        .await
        .unwrap();
    assert_eq!(outcome.as_deref(), Some("cancelled"));
}

#[tokio::test]
async fn test_client_is_shareable_across_tasks() {
    let (client, service) = test_client();

    let handles: Vec<_> = (0..8)
        .map(|i| {
            let client = client.clone();
            tokio::spawn(async move {
                client
                    .signal_workflow("Order", &format!("order-{i}"), None, "add_item", &(i as i64))
                    .await
            })
        })
        .collect();

    for handle in handles {
        handle.await.unwrap().unwrap();
    }
    assert_eq!(service.call_count(), 8);
}
