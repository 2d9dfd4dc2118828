//! Sweep policy and scheduling configuration.

use serde::{Deserialize, Serialize};

/// Staleness threshold, delete policy, and sweep schedule.
///
/// All three values are fixed for the lifetime of the process.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SweepConfig {
    /// Age in seconds beyond which a droplet counts as stale.
    /// A droplet is stale when its age *strictly* exceeds this value, so a
    /// threshold of 0 marks everything with a past creation time.
    /// Default: 86400 (one day)
    #[serde(default = "default_threshold_secs")]
    pub threshold_secs: u64,

    /// Whether stale droplets are actually deleted. When false the sweeper
    /// runs in dry-run mode: stale droplets are logged but left alone.
    /// Default: false (must be explicitly enabled)
    #[serde(default)]
    pub delete_stale: bool,

    /// Seconds between sweeps. Sweeps never overlap: the next interval only
    /// starts once the previous sweep has completed.
    /// Default: 3600 (once per hour)
    #[serde(default = "default_interval_secs")]
    pub interval_secs: u64,
}

impl SweepConfig {
    /// The staleness threshold as a duration.
    pub fn threshold(&self) -> chrono::Duration {
        chrono::Duration::seconds(self.threshold_secs as i64)
    }

    /// The pause between sweeps.
    pub fn interval(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.interval_secs)
    }
}

impl Default for SweepConfig {
    fn default() -> Self {
        Self {
            threshold_secs: default_threshold_secs(),
            delete_stale: false,
            interval_secs: default_interval_secs(),
        }
    }
}

fn default_threshold_secs() -> u64 {
    86400 // one day
}

fn default_interval_secs() -> u64 {
    3600
}
