//! Client for the iWF workflow orchestration service.
//!
//! Applications declare a model of each workflow type, build a
//! [`Registry`] from them, and hand it to a [`Client`]. The client checks
//! every call against the registry before sending it to the server.
//!
//! ```no_run
//! use std::sync::Arc;
//! use iwf_client::{Client, ClientOptions, Registry, StateDescriptor, WorkflowStartOptions, WorkflowTypeModel};
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let order = WorkflowTypeModel::builder("Order")
//!     .state(StateDescriptor::starting("validate"))
//!     .signal_channel::<String>("cancel")
//!     .build()?;
//! let registry = Arc::new(Registry::build(vec![order])?);
//! let client = Client::connect(registry, ClientOptions::from_env())?;
//!
//! let run_id = client
//!     .start_workflow("Order", "validate", &42, "order-1", &WorkflowStartOptions::minimum(60))
//!     .await?;
//! client
//!     .signal_workflow("Order", "order-1", Some(run_id.as_str()), "cancel", &"changed my mind".to_string())
//!     .await?;
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod error;
pub mod http;
pub mod options;
pub mod reset;

pub use client::*;
pub use error::{ClientError, ClientResult};
pub use http::HttpWorkflowServiceClient;
pub use options::*;
pub use reset::ResetSpec;

pub use iwf_core::{
    EncodingError, JsonPayloadCodec, PayloadCodec, PayloadCodecExt, QueryAttributeDef, Registry,
    RegistryError, SignalChannelDef, StateDescriptor, TransportError, TypeDescriptor, Workflow,
    WorkflowTypeModel,
};
pub use iwf_proto::{StateCompletionOutput, WorkflowService};
