//! Core types for the iWF client.
//!
//! This crate provides the workflow type models, the registry that holds
//! them, payload encoding, and the error types shared by the other crates.

pub mod encoded;
pub mod error;
pub mod registry;
pub mod types;

pub use encoded::*;
pub use error::*;
pub use registry::*;
pub use types::*;
