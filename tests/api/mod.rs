//! REST API Tests

mod channel_tests;
mod health_tests;
mod session_tests;
