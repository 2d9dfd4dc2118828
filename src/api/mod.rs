//! DigitalOcean API adapter.
//!
//! The sweep pipeline talks to the provider exclusively through the
//! [`DropletApi`] trait so tests can substitute an in-memory implementation.
//! [`DoClient`] is the production implementation backed by reqwest.
//!
//! No retry happens at this layer: a failed sweep is simply retried on the
//! next scheduled invocation.

mod client;
mod error;

use async_trait::async_trait;
pub use client::DoClient;
pub use error::ApiError;
use serde::Deserialize;

/// A droplet as reported by the provider at fetch time.
///
/// Immutable snapshot; never mutated locally.
#[derive(Debug, Clone, Deserialize)]
pub struct Droplet {
    /// Stable identifier, unique within the account.
    pub id: u64,
    /// Display name. Not guaranteed unique.
    pub name: String,
    /// Creation timestamp exactly as it appeared on the wire (RFC 3339
    /// expected). Kept as text so a malformed value is a per-droplet outcome
    /// rather than a decode failure for the whole page.
    pub created_at: String,
}

/// One page of the droplet listing.
#[derive(Debug, Clone)]
pub struct DropletPage {
    /// Droplets on this page, in the order the provider returned them.
    pub droplets: Vec<Droplet>,
    /// Page number of the next page, or `None` on the last page.
    pub next_page: Option<u32>,
}

/// Provider operations consumed by the sweep pipeline.
#[async_trait]
pub trait DropletApi: Send + Sync {
    /// Fetch a single page of the account's droplet listing.
    async fn list_page(&self, page: u32) -> Result<DropletPage, ApiError>;

    /// Delete a single droplet by id.
    async fn delete_droplet(&self, id: u64) -> Result<(), ApiError>;
}
