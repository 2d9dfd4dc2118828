//! Paginated inventory snapshot.

use crate::api::{ApiError, Droplet, DropletApi};

/// The provider's first-page cursor value.
pub const FIRST_PAGE: u32 = 1;

/// Fetch the complete droplet inventory, one page at a time.
///
/// Pages are fetched sequentially: each request depends on the previous
/// page's cursor. Droplets accumulate in the order received; the order
/// carries no semantic guarantee downstream.
///
/// Any error on any page aborts the whole fetch. Acting on a partial
/// stale-candidate set is worse than skipping the sweep, so partial
/// inventories are never returned.
pub async fn fetch_all_droplets(api: &dyn DropletApi) -> Result<Vec<Droplet>, ApiError> {
    let mut inventory = Vec::new();
    let mut page = FIRST_PAGE;

    loop {
        let fetched = api.list_page(page).await?;
        inventory.extend(fetched.droplets);

        match fetched.next_page {
            Some(next) => page = next,
            None => break,
        }
    }

    Ok(inventory)
}
