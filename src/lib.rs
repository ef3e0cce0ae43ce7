//! # Therapy Module Simulator
//!
//! This crate provides a virtual infrared therapy module with:
//! - A RESTful HTTP API over the module's attribute channels
//! - A WebSocket gateway for change notifications
//! - A session state machine driven by a periodic reconciliation tick
//! - A simulated battery and a pluggable display surface
//!
//! ## Architecture
//!
//! The crate follows Clean Architecture principles:
//!
//! - **Domain Layer**: Channel table, session state, battery, device identity
//! - **Application Layer**: Session controller, battery monitor, channel dispatch
//! - **Infrastructure Layer**: Display sinks and metrics
//! - **Presentation Layer**: HTTP handlers and WebSocket gateway
//!
//! ## Module Structure
//!
//! ```text
//! therapy_sim/
//! +-- config/        Configuration management
//! +-- domain/        Channel table and device model
//! +-- application/   Session controller and channel dispatch
//! +-- infrastructure/ Display sinks and metrics
//! +-- presentation/  HTTP routes and WebSocket handlers
//! +-- shared/        Common utilities (errors, payload decoding)
//! ```

// Configuration module
pub mod config;

// Domain layer - Device model
pub mod domain;

// Application layer - Session orchestration
pub mod application;

// Infrastructure layer - Display and metrics adapters
pub mod infrastructure;

// Presentation layer - HTTP and WebSocket handlers
pub mod presentation;

// Shared utilities
pub mod shared;

// Application startup and state management
pub mod startup;

// Telemetry and observability
pub mod telemetry;
