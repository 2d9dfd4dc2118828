//! Observability for the sweeper: tracing initialization.
//!
//! All runtime reporting goes through `tracing` structured events; this module
//! wires the subscriber up from [`crate::config::LoggingConfig`].

mod tracing_init;

pub use tracing_init::{TracingError, init_tracing};
