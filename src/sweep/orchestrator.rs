//! Sweep orchestration: fetch, concurrent evaluation, conditional delete.

use std::{sync::Arc, time::Instant};

use chrono::{DateTime, Duration, Utc};
use futures::future::join_all;
use tokio_util::sync::CancellationToken;

use crate::{
    api::{Droplet, DropletApi},
    config::SweepConfig,
    sweep::{
        inventory,
        report::{Reporter, SweepOutcome, SweepSummary},
        staleness::{self, AgeClass},
    },
};

/// Wall-clock source, injectable so tests can pin "now".
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// The real clock.
#[derive(Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Runs complete sweeps over the account's droplet inventory.
///
/// Threshold and delete policy are fixed at construction; each call to
/// [`Sweeper::sweep`] is one self-contained pass with no state carried over.
pub struct Sweeper {
    api: Arc<dyn DropletApi>,
    reporter: Arc<dyn Reporter>,
    clock: Arc<dyn Clock>,
    threshold: Duration,
    delete_stale: bool,
}

impl Sweeper {
    pub fn new(api: Arc<dyn DropletApi>, reporter: Arc<dyn Reporter>, config: &SweepConfig) -> Self {
        Self::with_clock(api, reporter, config, Arc::new(SystemClock))
    }

    pub fn with_clock(
        api: Arc<dyn DropletApi>,
        reporter: Arc<dyn Reporter>,
        config: &SweepConfig,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            api,
            reporter,
            clock,
            threshold: config.threshold(),
            delete_stale: config.delete_stale,
        }
    }

    /// Run one complete sweep: fetch the inventory, evaluate every droplet,
    /// delete the stale ones when the policy allows, and report outcomes.
    ///
    /// The summary is finalized only after every droplet's fate has been
    /// recorded. If `cancel` fires mid-sweep, in-flight deletes finish on
    /// their own terms but no new deletes are issued, and the summary carries
    /// the `cancelled` flag so partial results are not mistaken for a
    /// complete pass.
    pub async fn sweep(&self, cancel: &CancellationToken) -> SweepSummary {
        let start = Instant::now();
        let mut summary = SweepSummary::default();

        let droplets = match inventory::fetch_all_droplets(self.api.as_ref()).await {
            Ok(droplets) => droplets,
            Err(e) => {
                // A failed listing is never "empty inventory, nothing to
                // delete": abort with zero deletions and let the next
                // scheduled sweep retry.
                tracing::error!(error = %e, "Failed to retrieve droplet inventory, skipping sweep");
                summary.fetch_failed = true;
                summary.duration_ms = start.elapsed().as_millis() as u64;
                self.reporter.summarize(&summary);
                return summary;
            }
        };

        // Every droplet in this sweep is judged against the same instant, so
        // results stay self-consistent however long the sweep takes.
        let now = self.clock.now();

        tracing::debug!(
            droplets = droplets.len(),
            threshold_secs = self.threshold.num_seconds(),
            delete_stale = self.delete_stale,
            "Evaluating droplet inventory"
        );

        let units = droplets
            .into_iter()
            .map(|droplet| self.evaluate_one(droplet, now, cancel));
        let outcomes = join_all(units).await;

        for outcome in outcomes {
            summary.tally(outcome);
        }

        summary.cancelled = cancel.is_cancelled();
        summary.duration_ms = start.elapsed().as_millis() as u64;
        self.reporter.summarize(&summary);

        summary
    }

    /// Evaluate one droplet and conditionally delete it.
    ///
    /// Independent unit of work: its errors never affect other droplets, and
    /// completion order across units is unspecified.
    async fn evaluate_one(
        &self,
        droplet: Droplet,
        now: DateTime<Utc>,
        cancel: &CancellationToken,
    ) -> SweepOutcome {
        let mut detail = String::new();

        let outcome = match staleness::classify(now, &droplet.created_at, self.threshold) {
            AgeClass::Unparseable => {
                detail = droplet.created_at.clone();
                SweepOutcome::Unparseable
            }
            AgeClass::Fresh => SweepOutcome::Retained,
            AgeClass::Stale if !self.delete_stale => SweepOutcome::Stale,
            // No new deletes once cancellation is observed.
            AgeClass::Stale if cancel.is_cancelled() => SweepOutcome::Stale,
            AgeClass::Stale => match self.api.delete_droplet(droplet.id).await {
                Ok(()) => SweepOutcome::Deleted,
                Err(e) => {
                    detail = e.to_string();
                    SweepOutcome::DeleteFailed
                }
            },
        };

        self.reporter.record(droplet.id, &droplet.name, outcome, &detail);

        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sweep::test_support::{CollectingReporter, FixedClock, MockApi};

    const TWO_DAYS_AGO: &str = "2024-05-30T12:00:00Z";
    const ONE_HOUR_AGO: &str = "2024-06-01T11:00:00Z";

    fn one_day_threshold(delete_stale: bool) -> SweepConfig {
        SweepConfig {
            threshold_secs: 86400,
            delete_stale,
            interval_secs: 3600,
        }
    }

    fn sweeper(api: Arc<MockApi>, reporter: Arc<CollectingReporter>, config: &SweepConfig) -> Sweeper {
        Sweeper::with_clock(api, reporter, config, Arc::new(FixedClock))
    }

    #[tokio::test]
    async fn test_dry_run_never_deletes() {
        let api = Arc::new(MockApi::with_pages(vec![vec![
            (1, "old-a", TWO_DAYS_AGO),
            (2, "old-b", TWO_DAYS_AGO),
        ]]));
        let reporter = Arc::new(CollectingReporter::default());
        let sweeper = sweeper(api.clone(), reporter.clone(), &one_day_threshold(false));

        let summary = sweeper.sweep(&CancellationToken::new()).await;

        assert!(api.delete_attempts().is_empty());
        assert_eq!(summary.stale, 2);
        assert_eq!(summary.deleted, 0);
        assert_eq!(reporter.outcome_for(1), Some(SweepOutcome::Stale));
        assert_eq!(reporter.outcome_for(2), Some(SweepOutcome::Stale));
    }

    #[tokio::test]
    async fn test_policy_enabled_deletes_each_stale_droplet_once() {
        let api = Arc::new(MockApi::with_pages(vec![vec![
            (1, "old-a", TWO_DAYS_AGO),
            (2, "old-b", TWO_DAYS_AGO),
            (3, "young", ONE_HOUR_AGO),
        ]]));
        let reporter = Arc::new(CollectingReporter::default());
        let sweeper = sweeper(api.clone(), reporter.clone(), &one_day_threshold(true));

        let summary = sweeper.sweep(&CancellationToken::new()).await;

        let mut attempts = api.delete_attempts();
        attempts.sort_unstable();
        assert_eq!(attempts, vec![1, 2]);
        assert_eq!(summary.deleted, 2);
        assert_eq!(summary.retained, 1);
        assert_eq!(reporter.outcome_for(3), Some(SweepOutcome::Retained));
    }

    #[tokio::test]
    async fn test_delete_failure_is_isolated() {
        let api = Arc::new(
            MockApi::with_pages(vec![vec![
                (1, "old-a", TWO_DAYS_AGO),
                (2, "old-b", TWO_DAYS_AGO),
            ]])
            .fail_delete(1),
        );
        let reporter = Arc::new(CollectingReporter::default());
        let sweeper = sweeper(api.clone(), reporter.clone(), &one_day_threshold(true));

        let summary = sweeper.sweep(&CancellationToken::new()).await;

        // Both deletes were attempted; the failure stayed contained.
        assert_eq!(api.delete_attempts().len(), 2);
        assert_eq!(summary.deleted, 1);
        assert_eq!(summary.delete_failed, 1);
        assert_eq!(reporter.outcome_for(1), Some(SweepOutcome::DeleteFailed));
        assert_eq!(reporter.outcome_for(2), Some(SweepOutcome::Deleted));

        let failed = reporter
            .records()
            .into_iter()
            .find(|r| r.id == 1)
            .expect("record for droplet 1");
        assert!(failed.detail.contains("injected delete failure"));
    }

    #[tokio::test]
    async fn test_fetch_failure_aborts_sweep_with_zero_deletions() {
        let api = Arc::new(
            MockApi::with_pages(vec![
                vec![(1, "old-a", TWO_DAYS_AGO)],
                vec![(2, "old-b", TWO_DAYS_AGO)],
            ])
            .fail_list_page(2),
        );
        let reporter = Arc::new(CollectingReporter::default());
        let sweeper = sweeper(api.clone(), reporter.clone(), &one_day_threshold(true));

        let summary = sweeper.sweep(&CancellationToken::new()).await;

        // The first page succeeded, yet nothing from it was acted on.
        assert!(summary.fetch_failed);
        assert_eq!(summary.total(), 0);
        assert!(api.delete_attempts().is_empty());
        assert!(reporter.records().is_empty());
        assert_eq!(reporter.summaries().len(), 1);
        assert!(reporter.summaries()[0].fetch_failed);
    }

    #[tokio::test]
    async fn test_mixed_inventory_scenario() {
        let api = Arc::new(MockApi::with_pages(vec![vec![
            (1, "two-days-old", TWO_DAYS_AGO),
            (2, "one-hour-old", ONE_HOUR_AGO),
            (3, "broken", "not-a-date"),
        ]]));
        let reporter = Arc::new(CollectingReporter::default());
        let sweeper = sweeper(api.clone(), reporter.clone(), &one_day_threshold(true));

        let summary = sweeper.sweep(&CancellationToken::new()).await;

        assert_eq!(summary.deleted, 1);
        assert_eq!(summary.retained, 1);
        assert_eq!(summary.unparseable, 1);
        assert_eq!(summary.total(), 3);

        assert_eq!(reporter.outcome_for(1), Some(SweepOutcome::Deleted));
        assert_eq!(reporter.outcome_for(2), Some(SweepOutcome::Retained));
        assert_eq!(reporter.outcome_for(3), Some(SweepOutcome::Unparseable));

        // The unparseable droplet never saw a delete attempt.
        assert_eq!(api.delete_attempts(), vec![1]);

        // Every droplet's fate was recorded before the summary.
        assert_eq!(reporter.records().len() as u64, summary.total());
        assert_eq!(reporter.summaries().len(), 1);
    }

    #[tokio::test]
    async fn test_unparseable_detail_carries_raw_timestamp() {
        let api = Arc::new(MockApi::with_pages(vec![vec![(7, "broken", "not-a-date")]]));
        let reporter = Arc::new(CollectingReporter::default());
        let sweeper = sweeper(api.clone(), reporter.clone(), &one_day_threshold(true));

        sweeper.sweep(&CancellationToken::new()).await;

        let record = reporter.records().pop().expect("one record");
        assert_eq!(record.detail, "not-a-date");
    }

    #[tokio::test]
    async fn test_cancellation_stops_new_deletes() {
        let api = Arc::new(MockApi::with_pages(vec![vec![
            (1, "old-a", TWO_DAYS_AGO),
            (2, "old-b", TWO_DAYS_AGO),
        ]]));
        let reporter = Arc::new(CollectingReporter::default());
        let sweeper = sweeper(api.clone(), reporter.clone(), &one_day_threshold(true));

        let cancel = CancellationToken::new();
        cancel.cancel();
        let summary = sweeper.sweep(&cancel).await;

        assert!(summary.cancelled);
        assert!(api.delete_attempts().is_empty());
        // Stale droplets are still reported, just not deleted.
        assert_eq!(summary.stale, 2);
        assert_eq!(reporter.records().len(), 2);
    }

    #[tokio::test]
    async fn test_empty_inventory_is_a_clean_sweep() {
        let api = Arc::new(MockApi::with_pages(vec![vec![]]));
        let reporter = Arc::new(CollectingReporter::default());
        let sweeper = sweeper(api.clone(), reporter.clone(), &one_day_threshold(true));

        let summary = sweeper.sweep(&CancellationToken::new()).await;

        assert!(!summary.fetch_failed);
        assert_eq!(summary.total(), 0);
        assert_eq!(reporter.summaries().len(), 1);
    }

    #[tokio::test]
    async fn test_rerun_after_delete_sees_smaller_inventory() {
        let config = one_day_threshold(true);

        let first_api = Arc::new(MockApi::with_pages(vec![vec![
            (1, "old-a", TWO_DAYS_AGO),
            (2, "young", ONE_HOUR_AGO),
        ]]));
        let first_reporter = Arc::new(CollectingReporter::default());
        let first = sweeper(first_api.clone(), first_reporter, &config)
            .sweep(&CancellationToken::new())
            .await;

        assert_eq!(first.deleted, 1);
        assert_eq!(first.total(), 2);

        // The provider no longer lists the deleted droplet on the next sweep.
        let second_api = Arc::new(MockApi::with_pages(vec![vec![(2, "young", ONE_HOUR_AGO)]]));
        let second_reporter = Arc::new(CollectingReporter::default());
        let second = sweeper(second_api.clone(), second_reporter, &config)
            .sweep(&CancellationToken::new())
            .await;

        assert!(!second.fetch_failed);
        assert_eq!(second.total(), 1);
        assert_eq!(second.deleted, 0);
        assert!(second_api.delete_attempts().is_empty());
    }
}
