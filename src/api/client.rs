//! Reqwest-backed DigitalOcean client.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use url::Url;

use super::{ApiError, Droplet, DropletApi, DropletPage};
use crate::config::ApiConfig;

/// DigitalOcean v2 API client.
///
/// Holds the bearer token for the lifetime of the process; the credential is
/// part of adapter construction, not of the sweep logic.
pub struct DoClient {
    http: Client,
    base_url: Url,
    token: String,
    per_page: u32,
}

/// Wire shape of `GET /v2/droplets`.
///
/// Unknown provider fields are ignored; only the slice the sweeper needs is
/// modeled.
#[derive(Debug, Deserialize)]
struct ListDropletsResponse {
    droplets: Vec<Droplet>,
    #[serde(default)]
    links: Links,
}

#[derive(Debug, Default, Deserialize)]
struct Links {
    #[serde(default)]
    pages: Pages,
}

#[derive(Debug, Default, Deserialize)]
struct Pages {
    next: Option<String>,
}

impl DoClient {
    /// Build a client from the `api` configuration section.
    pub fn from_config(config: &ApiConfig) -> Result<Self, ApiError> {
        let http = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        let base_url =
            Url::parse(&config.base_url).map_err(|e| ApiError::BaseUrl(e.to_string()))?;

        Ok(Self {
            http,
            base_url,
            token: config.token.clone(),
            per_page: config.per_page,
        })
    }

    fn endpoint(&self, path: &str) -> Result<Url, ApiError> {
        self.base_url
            .join(path)
            .map_err(|e| ApiError::BaseUrl(e.to_string()))
    }
}

#[async_trait]
impl DropletApi for DoClient {
    async fn list_page(&self, page: u32) -> Result<DropletPage, ApiError> {
        let url = self.endpoint("/v2/droplets")?;

        let response = self
            .http
            .get(url)
            .query(&[("page", page), ("per_page", self.per_page)])
            .bearer_auth(&self.token)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ApiError::Status { status, body });
        }

        let body = response.text().await?;
        let listing: ListDropletsResponse = serde_json::from_str(&body)?;

        let next_page = listing.links.pages.next.as_deref().and_then(page_param);

        Ok(DropletPage {
            droplets: listing.droplets,
            next_page,
        })
    }

    async fn delete_droplet(&self, id: u64) -> Result<(), ApiError> {
        let url = self.endpoint(&format!("/v2/droplets/{id}"))?;

        let response = self.http.delete(url).bearer_auth(&self.token).send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ApiError::Status { status, body });
        }

        Ok(())
    }
}

/// Extract the `page` query parameter from a pagination link.
///
/// The API reports the next page as a full URL in `links.pages.next`; an
/// absent or unparseable link ends the pagination.
fn page_param(next: &str) -> Option<u32> {
    let url = Url::parse(next).ok()?;
    url.query_pairs()
        .find(|(key, _)| key == "page")
        .and_then(|(_, value)| value.parse().ok())
}
