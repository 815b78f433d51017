//! Protocol definitions for the iWF client.
//!
//! This crate contains the request/response shapes of the iWF server API
//! and the [`WorkflowService`] trait that transports implement.

pub mod shared;
pub mod workflow_service;

pub use shared::*;
pub use workflow_service::*;
