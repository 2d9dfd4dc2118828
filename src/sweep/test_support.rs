//! Shared test doubles for the sweep pipeline.

use std::sync::{
    Mutex,
    atomic::{AtomicUsize, Ordering},
};

use async_trait::async_trait;

use chrono::{DateTime, Utc};

use crate::{
    api::{ApiError, Droplet, DropletApi, DropletPage},
    sweep::{
        orchestrator::Clock,
        report::{Reporter, SweepOutcome, SweepSummary},
    },
};

/// Clock pinned to 2024-06-01T12:00:00Z.
pub(crate) struct FixedClock;

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        "2024-06-01T12:00:00Z".parse().expect("valid timestamp")
    }
}

/// In-memory `DropletApi` with scripted pages and failure injection.
#[derive(Default)]
pub(crate) struct MockApi {
    pages: Vec<Vec<Droplet>>,
    failing_page: Option<u32>,
    failing_deletes: Vec<u64>,
    list_calls: AtomicUsize,
    deleted: Mutex<Vec<u64>>,
}

impl MockApi {
    /// Build a paginated inventory from `(id, name, created_at)` tuples.
    pub fn with_pages(pages: Vec<Vec<(u64, &str, &str)>>) -> Self {
        let pages = pages
            .into_iter()
            .map(|page| {
                page.into_iter()
                    .map(|(id, name, created_at)| Droplet {
                        id,
                        name: name.to_string(),
                        created_at: created_at.to_string(),
                    })
                    .collect()
            })
            .collect();

        Self {
            pages,
            ..Self::default()
        }
    }

    /// Make `list_page` fail when asked for the given page number.
    pub fn fail_list_page(mut self, page: u32) -> Self {
        self.failing_page = Some(page);
        self
    }

    /// Make `delete_droplet` fail for the given id.
    pub fn fail_delete(mut self, id: u64) -> Self {
        self.failing_deletes.push(id);
        self
    }

    pub fn list_calls(&self) -> usize {
        self.list_calls.load(Ordering::SeqCst)
    }

    /// Every id a delete was attempted for, in completion order.
    pub fn delete_attempts(&self) -> Vec<u64> {
        self.deleted.lock().expect("mutex poisoned").clone()
    }
}

#[async_trait]
impl DropletApi for MockApi {
    async fn list_page(&self, page: u32) -> Result<DropletPage, ApiError> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);

        if self.failing_page == Some(page) {
            return Err(ApiError::Status {
                status: reqwest::StatusCode::INTERNAL_SERVER_ERROR,
                body: "injected listing failure".to_string(),
            });
        }

        let index = page.saturating_sub(1) as usize;
        let droplets = self.pages.get(index).cloned().unwrap_or_default();
        let next_page = if index + 1 < self.pages.len() {
            Some(page + 1)
        } else {
            None
        };

        Ok(DropletPage { droplets, next_page })
    }

    async fn delete_droplet(&self, id: u64) -> Result<(), ApiError> {
        self.deleted.lock().expect("mutex poisoned").push(id);

        if self.failing_deletes.contains(&id) {
            return Err(ApiError::Status {
                status: reqwest::StatusCode::FORBIDDEN,
                body: "injected delete failure".to_string(),
            });
        }

        Ok(())
    }
}

/// One recorded reporter entry.
#[derive(Debug, Clone)]
pub(crate) struct RecordedOutcome {
    pub id: u64,
    pub name: String,
    pub outcome: SweepOutcome,
    pub detail: String,
}

/// Reporter that collects everything behind a mutex for assertions.
#[derive(Default)]
pub(crate) struct CollectingReporter {
    records: Mutex<Vec<RecordedOutcome>>,
    summaries: Mutex<Vec<SweepSummary>>,
}

impl CollectingReporter {
    pub fn records(&self) -> Vec<RecordedOutcome> {
        self.records.lock().expect("mutex poisoned").clone()
    }

    pub fn outcome_for(&self, id: u64) -> Option<SweepOutcome> {
        self.records()
            .iter()
            .find(|r| r.id == id)
            .map(|r| r.outcome)
    }

    pub fn summaries(&self) -> Vec<SweepSummary> {
        self.summaries.lock().expect("mutex poisoned").clone()
    }
}

impl Reporter for CollectingReporter {
    fn record(&self, id: u64, name: &str, outcome: SweepOutcome, detail: &str) {
        self.records
            .lock()
            .expect("mutex poisoned")
            .push(RecordedOutcome {
                id,
                name: name.to_string(),
                outcome,
                detail: detail.to_string(),
            });
    }

    fn summarize(&self, summary: &SweepSummary) {
        self.summaries
            .lock()
            .expect("mutex poisoned")
            .push(summary.clone());
    }
}
