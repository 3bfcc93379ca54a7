//! # Middleware Stack
//!
//! - [`metrics`]: per-request counters and latency histograms.
//!
//! Request tracing is `tower_http::trace::TraceLayer`, attached in
//! [`crate::app`].

pub mod metrics;
