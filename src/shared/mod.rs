//! Shared Utilities
//!
//! Common utilities used across all layers.

pub mod encoding;
pub mod error;
