//! # Repository Discovery
//!
//! Pages through the GitHub search API until the requested number of
//! repositories is collected or the API reports no further pages. Any failed
//! page aborts the whole run.

pub mod client;


use std::collections::HashSet;
use std::future::Future;

use crate::error::DiscoveryResult;
use crate::types::RepositoryRecord;

pub use client::{parse_search_response, GitHubClient, SearchPage, DEFAULT_ENDPOINT};

/// Collect up to `target` repositories, pulling pages from `fetch_page`.
///
/// `fetch_page` receives the cursor of the previous page (`None` first).
/// Collection stops mid-page once `target` is reached. A repository seen on
/// an earlier page is not added twice.
pub async fn collect_repositories<F, Fut>(target: usize, mut fetch_page: F) -> DiscoveryResult<Vec<RepositoryRecord>>
where
    F: FnMut(Option<String>) -> Fut,
    Fut: Future<Output = DiscoveryResult<SearchPage>>,
{
    let mut collected = Vec::with_capacity(target);
    let mut seen = HashSet::new();
    let mut cursor: Option<String> = None;
    let mut page_number = 0usize;

    while collected.len() < target {
        page_number += 1;
        let page = fetch_page(cursor.take()).await?;

        for record in page.repositories {
            if collected.len() >= target {
                break;
            }
            if seen.insert(record.name.clone()) {
                collected.push(record);
            } else {
                log::debug!("Skipping duplicate repository {}", record.name);
            }
        }

        log::info!(
            "Page {}: {} / {} repositories collected",
            page_number,
            collected.len(),
            target
        );

        match (page.has_next_page, page.end_cursor) {
            (true, Some(next)) => cursor = Some(next),
            (true, None) => {
                log::warn!("API reported another page without a cursor, stopping");
                break;
            }
            (false, _) => break,
        }
    }

    Ok(collected)
}

/// Run discovery against the GitHub API.
pub async fn discover(
    client: &GitHubClient,
    query: &str,
    page_size: u32,
    target: usize,
) -> DiscoveryResult<Vec<RepositoryRecord>> {
    log::info!(
        "Searching `{}` for {} repositories ({} per page)",
        query,
        target,
        page_size
    );

    collect_repositories(target, |cursor| async move {
        client.search_page(query, page_size, cursor.as_deref()).await
    })
    .await
}
