//! Error types for the iWF client.
//!
//! - [`TransportError`]: HTTP and network-level failures (re-exported from core)
//! - [`ClientError`]: validation and response-shape errors of client operations
//!
//! # Error Hierarchy
//!
//! ```text
//! TransportError (HTTP/network)      EncodingError (payloads)
//!              ↘                     ↙
//!       ClientError (validation, response shape)
//! ```

pub mod client;

pub use client::{ClientError, ClientResult};
pub use iwf_core::{EncodingError, TransportError};
