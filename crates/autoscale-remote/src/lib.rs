//! HTTP adapters for the resize driver (4.D) and operation-status
//! client (4.E) ports.

pub mod http;
pub mod wire;

pub use http::{HttpOperationStatusClient, HttpResizeClient};
