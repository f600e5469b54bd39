//! Paginated project listing.
//!
//! Pages are requested `PAGE_SIZE` at a time. Listing stops on the first
//! short page, or once the collected count reaches the total the server
//! reports (`grandTotalItems`, else `totalItems`; zero means unknown).

use compose_sync_core::RemoteProject;
use serde::Deserialize;

use crate::error::RemoteError;

pub const PAGE_SIZE: usize = 50;

/// Pagination block of a list response.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Pagination {
    pub current_page: u64,
    pub grand_total_items: usize,
    pub items_per_page: usize,
    pub total_items: usize,
    pub total_pages: u64,
}

impl Pagination {
    pub fn reported_total(&self) -> Option<usize> {
        if self.grand_total_items > 0 {
            Some(self.grand_total_items)
        } else if self.total_items > 0 {
            Some(self.total_items)
        } else {
            None
        }
    }
}

/// One page of `GET .../projects`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ProjectPage {
    pub success: bool,
    pub data: Vec<RemoteProject>,
    pub pagination: Pagination,
}

/// Fetch pages via `fetch_page(start)` until the listing is exhausted.
pub fn collect_pages<F>(mut fetch_page: F) -> Result<Vec<RemoteProject>, RemoteError>
where
    F: FnMut(usize) -> Result<ProjectPage, RemoteError>,
{
    let mut start = 0;
    let mut all = Vec::new();

    loop {
        let page = fetch_page(start)?;
        let returned = page.data.len();
        all.extend(page.data);

        if returned < PAGE_SIZE {
            break;
        }
        if let Some(total) = page.pagination.reported_total() {
            if all.len() >= total {
                break;
            }
        }
        start += PAGE_SIZE;
    }

    Ok(all)
}
