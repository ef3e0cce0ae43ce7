//! HTTP Layer
//!
//! REST endpoints over the channel surface.

pub mod handlers;
pub mod routes;
