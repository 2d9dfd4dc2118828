//! dropsweep — stale droplet housekeeping for DigitalOcean accounts.
//!
//! The daemon periodically lists every droplet in an account, classifies each
//! one as fresh or stale by comparing its creation age against a configured
//! threshold, and (when enabled) deletes the stale ones. Outcomes are reported
//! through structured logs.
//!
//! Module layout:
//!
//! - [`api`] — DigitalOcean API adapter: the [`api::DropletApi`] trait and the
//!   reqwest-backed [`api::DoClient`].
//! - [`sweep`] — the sweep pipeline: paginated inventory fetch, pure staleness
//!   evaluation, concurrent per-droplet fan-out, and outcome reporting.
//! - [`config`] — JSON configuration with `${VAR}` environment interpolation.
//! - [`observability`] — tracing initialization.

pub mod api;
pub mod config;
pub mod observability;
pub mod sweep;
