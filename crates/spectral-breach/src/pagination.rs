//! Page walking for the breach search API.
//!
//! The API returns neither a total count nor a next-page token. Whether to
//! ask for another page is decided by a [`PagePolicy`]; the default
//! [`FullPagePolicy`] keeps going while every page so far came back full.
//! That is a heuristic: a result set that is an exact multiple of the page
//! size costs one extra, empty request, and nothing guarantees the last
//! page really was the last.

use crate::client::PageFetcher;
use crate::record::BreachRecord;

/// Documented Dehashed page size.
pub const DEHASHED_PAGE_SIZE: usize = 5000;

/// Decides whether another page should be requested.
pub trait PagePolicy: Send + Sync {
    /// `collected` is the cumulative entry count after fetching `page`.
    fn should_continue(&self, collected: usize, page: u32) -> bool;
}

/// Continue while `collected >= page_size * page`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FullPagePolicy {
    /// Entries per full page
    pub page_size: usize,
}

impl Default for FullPagePolicy {
    fn default() -> Self {
        Self {
            page_size: DEHASHED_PAGE_SIZE,
        }
    }
}

impl PagePolicy for FullPagePolicy {
    fn should_continue(&self, collected: usize, page: u32) -> bool {
        let page = usize::try_from(page).unwrap_or(usize::MAX);
        collected >= self.page_size.saturating_mul(page)
    }
}

/// Why the page walk ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// A page returned no usable data
    NoData,
    /// The policy judged the last page not full
    Exhausted,
    /// The configured page ceiling was reached
    Ceiling,
}

/// Records gathered across all pages for one query.
#[derive(Debug, Clone)]
pub struct PageWalk {
    /// Decoded records, in page order
    pub records: Vec<BreachRecord>,
    /// Number of fetch calls issued
    pub pages_fetched: u32,
    /// Cumulative entry count, including undecodable rows
    pub entries_seen: usize,
    /// Why the walk ended
    pub stop: StopReason,
}

/// Fetch pages `1..=max_pages` for `query` strictly one after another.
pub async fn collect_pages<F, P>(fetcher: &F, policy: &P, query: &str, max_pages: u32) -> PageWalk
where
    F: PageFetcher + ?Sized,
    P: PagePolicy + ?Sized,
{
    let mut records = Vec::new();
    let mut entries_seen = 0usize;
    let mut pages_fetched = 0u32;
    let mut page = 1u32;

    let stop = loop {
        if page > max_pages {
            tracing::debug!("Reached page ceiling of {} for {}", max_pages, query);
            break StopReason::Ceiling;
        }

        tracing::debug!("Looking for page {} of {}", page, query);
        pages_fetched += 1;

        let Some(response) = fetcher.fetch(query, page).await else {
            tracing::debug!("No data received for page {} of {}", page, query);
            break StopReason::NoData;
        };

        let batch = response.into_batch();
        entries_seen += batch.entry_count;
        records.extend(batch.records);

        if !policy.should_continue(entries_seen, page) {
            break StopReason::Exhausted;
        }

        page += 1;
    };

    tracing::debug!(
        "Collected {} records from {} page requests for {} ({:?})",
        records.len(),
        pages_fetched,
        query,
        stop
    );

    PageWalk {
        records,
        pages_fetched,
        entries_seen,
        stop,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::SearchResponse;
    use async_trait::async_trait;
    use serde_json::json;
    use std::sync::atomic::{AtomicU32, Ordering};

    /// Serves `full_pages` full pages, then a short page of `tail` entries.
    struct SizedFetcher {
        page_size: usize,
        full_pages: u32,
        tail: Option<usize>,
        calls: AtomicU32,
    }

    #[async_trait]
    impl PageFetcher for SizedFetcher {
        async fn fetch(&self, _query: &str, page: u32) -> Option<SearchResponse> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let count = if page <= self.full_pages {
                self.page_size
            } else {
                self.tail?
            };
            let entries = (0..count)
                .map(|i| json!({"email": format!("user{i}@example.com")}))
                .collect();
            Some(SearchResponse::from_entries(entries))
        }
    }

    fn fetcher(page_size: usize, full_pages: u32, tail: Option<usize>) -> SizedFetcher {
        SizedFetcher {
            page_size,
            full_pages,
            tail,
            calls: AtomicU32::new(0),
        }
    }

    #[test]
    fn test_full_page_policy() {
        let policy = FullPagePolicy::default();
        assert!(policy.should_continue(5000, 1));
        assert!(!policy.should_continue(4999, 1));
        assert!(policy.should_continue(10_000, 2));
        assert!(!policy.should_continue(5000, 2));
        assert!(!policy.should_continue(0, 1));
    }

    #[test]
    fn test_policy_does_not_overflow() {
        let policy = FullPagePolicy {
            page_size: usize::MAX,
        };
        assert!(!policy.should_continue(usize::MAX - 1, u32::MAX));
    }

    #[tokio::test]
    async fn test_single_partial_page() {
        let fetcher = fetcher(10, 0, Some(3));
        let walk = collect_pages(&fetcher, &FullPagePolicy { page_size: 10 }, "q", 5).await;

        assert_eq!(walk.pages_fetched, 1);
        assert_eq!(walk.records.len(), 3);
        assert_eq!(walk.stop, StopReason::Exhausted);
    }

    #[tokio::test]
    async fn test_full_pages_then_no_data() {
        let fetcher = fetcher(10, 3, None);
        let walk = collect_pages(&fetcher, &FullPagePolicy { page_size: 10 }, "q", 10).await;

        assert_eq!(fetcher.calls.load(Ordering::SeqCst), 4);
        assert_eq!(walk.pages_fetched, 4);
        assert_eq!(walk.records.len(), 30);
        assert_eq!(walk.stop, StopReason::NoData);
    }

    #[tokio::test]
    async fn test_full_pages_then_partial_page() {
        let fetcher = fetcher(10, 2, Some(4));
        let walk = collect_pages(&fetcher, &FullPagePolicy { page_size: 10 }, "q", 10).await;

        assert_eq!(walk.pages_fetched, 3);
        assert_eq!(walk.entries_seen, 24);
        assert_eq!(walk.stop, StopReason::Exhausted);
    }

    #[tokio::test]
    async fn test_ceiling_stops_walk() {
        let fetcher = fetcher(10, u32::MAX, None);
        let walk = collect_pages(&fetcher, &FullPagePolicy { page_size: 10 }, "q", 2).await;

        assert_eq!(fetcher.calls.load(Ordering::SeqCst), 2);
        assert_eq!(walk.records.len(), 20);
        assert_eq!(walk.stop, StopReason::Ceiling);
    }

    #[tokio::test]
    async fn test_zero_ceiling_fetches_nothing() {
        let fetcher = fetcher(10, 1, None);
        let walk = collect_pages(&fetcher, &FullPagePolicy { page_size: 10 }, "q", 0).await;

        assert_eq!(walk.pages_fetched, 0);
        assert_eq!(walk.stop, StopReason::Ceiling);
    }
}
