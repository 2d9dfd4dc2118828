//! Pure staleness evaluation.

use chrono::{DateTime, Duration, Utc};

/// Age classification for a single droplet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AgeClass {
    /// Created at or after the staleness cutoff.
    Fresh,
    /// Age strictly exceeds the threshold.
    Stale,
    /// The creation timestamp could not be parsed. Never treated as stale;
    /// the droplet is reported and excluded from deletion.
    Unparseable,
}

/// Classify a droplet's age against the threshold.
///
/// A droplet is stale iff `now - threshold > created_at`: the droplet whose
/// age equals the threshold exactly is still fresh. With a zero threshold,
/// anything created in the past is stale; no special-casing is needed, the
/// strict comparison covers it.
///
/// `created_at` is the provider's wire text, expected in RFC 3339 form
/// (`2024-01-15T10:00:00Z`).
pub fn classify(now: DateTime<Utc>, created_at: &str, threshold: Duration) -> AgeClass {
    let created = match DateTime::parse_from_rfc3339(created_at) {
        Ok(ts) => ts.with_timezone(&Utc),
        Err(_) => return AgeClass::Unparseable,
    };

    if now - threshold > created {
        AgeClass::Stale
    } else {
        AgeClass::Fresh
    }
}
