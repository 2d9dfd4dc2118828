//! The sweep pipeline: fetch, evaluate, act, report.
//!
//! One *sweep* is a complete pass over the account's droplet inventory:
//!
//! 1. [`inventory`] pages through the listing API and builds a full snapshot;
//!    a failed fetch aborts the sweep so we never act on a partial inventory.
//! 2. [`staleness`] classifies each droplet's age against the threshold,
//!    judged against a single "now" captured at sweep start.
//! 3. [`orchestrator`] fans the evaluations out concurrently, issues delete
//!    calls when the policy allows, and waits for every droplet's fate before
//!    finalizing the summary.
//! 4. [`report`] records each per-droplet outcome and the aggregate.
//!
//! Sweeps are stateless: nothing carries over between invocations, so the
//! next scheduled sweep is the retry mechanism for anything that failed.

pub mod inventory;
pub mod orchestrator;
pub mod report;
pub mod staleness;
pub mod worker;

#[cfg(test)]
pub(crate) mod test_support;

pub use orchestrator::{Clock, Sweeper, SystemClock};
pub use report::{LogReporter, Reporter, SweepOutcome, SweepSummary};
pub use staleness::AgeClass;
pub use worker::run_sweep_worker;
