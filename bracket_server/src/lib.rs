//! HTTP service wrapping the bracket engine.
//!
//! The service is stateless: brackets and matches travel in request bodies,
//! so any instance can answer any request.

pub mod api;
pub mod config;
pub mod logging;
pub mod metrics;
