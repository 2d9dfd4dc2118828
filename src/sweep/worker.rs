//! Scheduled sweep worker.
//!
//! Invokes the [`Sweeper`] in a serial loop: the next interval only starts
//! once the previous sweep has completed, so sweeps never overlap.

use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use crate::{config::SweepConfig, sweep::orchestrator::Sweeper};

/// Run sweeps at the configured interval until `cancel` fires.
///
/// The first sweep runs immediately on startup. Cancellation is honored both
/// between sweeps (the sleep is interrupted) and inside a sweep (no new
/// delete calls are issued once observed).
pub async fn run_sweep_worker(sweeper: Arc<Sweeper>, config: SweepConfig, cancel: CancellationToken) {
    if config.delete_stale {
        tracing::info!("Stale droplets WILL BE DELETED automatically");
    } else {
        tracing::info!("Stale droplets will be logged, but not deleted (dry run)");
    }

    tracing::info!(
        interval_secs = config.interval_secs,
        threshold_secs = config.threshold_secs,
        "Starting droplet sweep worker"
    );

    let interval = config.interval();

    loop {
        sweeper.sweep(&cancel).await;

        if cancel.is_cancelled() {
            break;
        }

        tokio::select! {
            _ = tokio::time::sleep(interval) => {}
            _ = cancel.cancelled() => break,
        }
    }

    tracing::info!("Droplet sweep worker stopped");
}
