//! Drives an `Order` workflow on a running iWF server.
//!
//! Expects an iWF server at `IWF_SERVER_URL` and a worker hosting the
//! `Order` workflow at `IWF_WORKER_URL`.
//!
//! ```bash
//! cargo run -p iwf-client --example order_workflow
//! ```

use std::sync::Arc;
use std::time::Duration;

use iwf_client::{
    Client, ClientOptions, Registry, StateDescriptor, WorkflowStartOptions, WorkflowTypeModel,
};
use serde::{Deserialize, Serialize};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Debug, Serialize, Deserialize)]
struct OrderInput {
    order_id: String,
    amount_cents: i64,
}

#[derive(Debug, Serialize, Deserialize)]
struct Receipt {
    order_id: String,
    charged_cents: i64,
}

fn setup_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    setup_tracing();

    let order = WorkflowTypeModel::builder("Order")
        .state(StateDescriptor::starting("validate"))
        .state(StateDescriptor::non_starting("ship"))
        .signal_channel::<i64>("add_item")
        .query_attribute::<String>("status")
        .build()?;
    let registry = Arc::new(Registry::build(vec![order])?);
    let client = Client::connect(registry, ClientOptions::from_env())?;

    let workflow_id = format!("order-{}", uuid::Uuid::new_v4());
    let input = OrderInput {
        order_id: workflow_id.clone(),
        amount_cents: 2500,
    };
    let start_options = WorkflowStartOptions::with_timeout(Duration::from_secs(300));

    let run_id = client
        .start_workflow("Order", "validate", &input, &workflow_id, &start_options)
        .await?;
    info!(%workflow_id, %run_id, "order started");

    client
        .signal_workflow("Order", &workflow_id, Some(run_id.as_str()), "add_item", &2_i64)
        .await?;

    let attributes = client
        .get_workflow_query_attributes("Order", &workflow_id, Some(run_id.as_str()), &["status"])
        .await?;
    info!(status = ?attributes.get::<String>("status"), "order status");

    let receipt: Option<Receipt> = client
        .get_simple_workflow_result_with_wait(&workflow_id, Some(run_id.as_str()))
        .await?;
    info!(?receipt, "order finished");

    Ok(())
}
