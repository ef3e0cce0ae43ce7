//! HTTP Handlers
//!
//! Request handlers for all HTTP endpoints.

pub mod channels;
pub mod device;
pub mod health;
