//! Per-droplet outcomes, sweep summaries, and the reporting sink.

use std::fmt;

/// The fate of a single droplet in one sweep.
///
/// Produced exactly once per droplet per sweep; never merged across sweeps.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SweepOutcome {
    /// Fresh; left alone.
    Retained,
    /// Stale, but the delete policy is disabled (dry run) or cancellation
    /// was observed before the delete could be issued.
    Stale,
    /// Stale and successfully deleted.
    Deleted,
    /// Stale, delete attempted, delete failed. The droplet remains a
    /// candidate on the next sweep.
    DeleteFailed,
    /// Creation timestamp could not be parsed; excluded from deletion.
    Unparseable,
}

impl SweepOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Retained => "retained",
            Self::Stale => "stale",
            Self::Deleted => "deleted",
            Self::DeleteFailed => "delete_failed",
            Self::Unparseable => "unparseable",
        }
    }
}

impl fmt::Display for SweepOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Aggregate results from a single sweep.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct SweepSummary {
    /// Fresh droplets left alone.
    pub retained: u64,
    /// Stale droplets logged but not deleted.
    pub stale: u64,
    /// Stale droplets deleted.
    pub deleted: u64,
    /// Stale droplets whose delete call failed.
    pub delete_failed: u64,
    /// Droplets with unparseable creation timestamps.
    pub unparseable: u64,
    /// The inventory fetch failed; no droplets were evaluated and no
    /// deletions were performed.
    pub fetch_failed: bool,
    /// Cancellation was observed during the sweep; counts are partial in the
    /// sense that stale droplets may not have been deleted.
    pub cancelled: bool,
    /// Duration of the sweep in milliseconds.
    pub duration_ms: u64,
}

impl SweepSummary {
    /// Total droplets evaluated in this sweep.
    pub fn total(&self) -> u64 {
        self.retained + self.stale + self.deleted + self.delete_failed + self.unparseable
    }

    /// Check if any droplets were deleted.
    pub fn has_deletions(&self) -> bool {
        self.deleted > 0
    }

    /// Count one droplet's outcome.
    pub fn tally(&mut self, outcome: SweepOutcome) {
        match outcome {
            SweepOutcome::Retained => self.retained += 1,
            SweepOutcome::Stale => self.stale += 1,
            SweepOutcome::Deleted => self.deleted += 1,
            SweepOutcome::DeleteFailed => self.delete_failed += 1,
            SweepOutcome::Unparseable => self.unparseable += 1,
        }
    }
}

/// Sink for sweep results.
///
/// `record` is called once per droplet from concurrently running units, so
/// implementations must tolerate concurrent calls without losing entries.
/// `summarize` is called once, after every droplet's fate has been recorded.
pub trait Reporter: Send + Sync {
    /// Record one droplet's outcome. `detail` carries the delete error text
    /// or the raw unparseable timestamp; empty when there is nothing to add.
    fn record(&self, id: u64, name: &str, outcome: SweepOutcome, detail: &str);

    /// Record the sweep aggregate.
    fn summarize(&self, summary: &SweepSummary);
}

/// Reporter that emits structured `tracing` events.
///
/// Stateless, so concurrent `record` calls need no synchronization here;
/// ordering across droplets is whatever completion order was.
#[derive(Debug, Default)]
pub struct LogReporter;

impl Reporter for LogReporter {
    fn record(&self, id: u64, name: &str, outcome: SweepOutcome, detail: &str) {
        match outcome {
            SweepOutcome::Retained => {
                tracing::debug!(droplet_id = id, name, "Droplet retained");
            }
            SweepOutcome::Stale => {
                tracing::info!(droplet_id = id, name, "Stale droplet (not deleted)");
            }
            SweepOutcome::Deleted => {
                tracing::info!(droplet_id = id, name, "Deleted stale droplet");
            }
            SweepOutcome::DeleteFailed => {
                tracing::warn!(droplet_id = id, name, error = detail, "Failed to delete stale droplet");
            }
            SweepOutcome::Unparseable => {
                tracing::warn!(
                    droplet_id = id,
                    name,
                    created_at = detail,
                    "Could not parse droplet creation timestamp"
                );
            }
        }
    }

    fn summarize(&self, summary: &SweepSummary) {
        if summary.fetch_failed {
            tracing::warn!(
                duration_ms = summary.duration_ms,
                "Sweep aborted: droplet inventory could not be retrieved"
            );
            return;
        }

        tracing::info!(
            total = summary.total(),
            retained = summary.retained,
            stale = summary.stale,
            deleted = summary.deleted,
            delete_failed = summary.delete_failed,
            unparseable = summary.unparseable,
            cancelled = summary.cancelled,
            duration_ms = summary.duration_ms,
            "Sweep complete"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_default_is_empty() {
        let summary = SweepSummary::default();

        assert_eq!(summary.total(), 0);
        assert!(!summary.has_deletions());
        assert!(!summary.fetch_failed);
        assert!(!summary.cancelled);
    }

    #[test]
    fn test_tally_counts_each_outcome() {
        let mut summary = SweepSummary::default();
        summary.tally(SweepOutcome::Retained);
        summary.tally(SweepOutcome::Retained);
        summary.tally(SweepOutcome::Stale);
        summary.tally(SweepOutcome::Deleted);
        summary.tally(SweepOutcome::DeleteFailed);
        summary.tally(SweepOutcome::Unparseable);

        assert_eq!(summary.retained, 2);
        assert_eq!(summary.stale, 1);
        assert_eq!(summary.deleted, 1);
        assert_eq!(summary.delete_failed, 1);
        assert_eq!(summary.unparseable, 1);
        assert_eq!(summary.total(), 6);
        assert!(summary.has_deletions());
    }

    #[test]
    fn test_outcome_display() {
        assert_eq!(SweepOutcome::DeleteFailed.to_string(), "delete_failed");
        assert_eq!(SweepOutcome::Retained.to_string(), "retained");
    }
}
