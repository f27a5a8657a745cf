//! Observability infrastructure.
//!
//! Provides structured tracing for the CLI and tests.

pub mod tracing;
