//! Page-number pagination over the GitHub REST API.
//!
//! A single [`Paginator`] drives every paginated endpoint. What differs between
//! endpoints is how a decoded page payload turns into items:
//!
//! - plain lists (`tags`, `pulls`, ...) are the items themselves
//! - search envelopes wrap the items and report a `total_count`
//! - the compare envelope carries the commits plus fields repeated on every page
//!
//! Each shape is an extract function producing a [`Page`].

use std::marker::PhantomData;

use serde::de::DeserializeOwned;
use tracing::debug;

use crate::error::ApiError;

use super::fetcher::{Fetcher, Request};
use super::models::{Comparison, FullCommit, SearchResult, Summary};

/// Items requested per page unless configured otherwise.
pub const DEFAULT_PAGE_SIZE: u32 = 100;

/// Items extracted from one decoded page.
#[derive(Debug)]
pub struct Page<T, M = ()> {
    pub items: Vec<T>,
    /// Total number of items the endpoint reports across all pages, if known.
    pub total_count: Option<usize>,
    /// Envelope fields that are not part of the item list.
    pub meta: M,
}

/// Accumulated result of fetching several pages.
#[derive(Debug)]
pub struct Paginated<T, M = ()> {
    pub items: Vec<T>,
    /// Envelope of the first page.
    pub meta: M,
}

/// Where a paginator is in its run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaginationState {
    NotStarted,
    Fetching(u32),
    Done,
}

/// Turns a decoded payload into a page of items.
pub type Extract<P, T, M> = fn(P) -> Page<T, M>;

/// Fetches consecutive pages from one endpoint and accumulates the items.
///
/// Pages are requested strictly in order; page `n + 1` is only requested once
/// page `n` has been received and inspected.
pub struct Paginator<'a, P, T, M = ()> {
    fetcher: &'a Fetcher,
    request: Request,
    page_size: u32,
    extract: Extract<P, T, M>,
    state: PaginationState,
    _payload: PhantomData<fn() -> P>,
}

fn extract_list<T>(items: Vec<T>) -> Page<T> {
    Page {
        items,
        total_count: None,
        meta: (),
    }
}

fn extract_search<T>(result: SearchResult<T>) -> Page<T> {
    Page {
        items: result.items,
        total_count: Some(result.total_count),
        meta: (),
    }
}

fn extract_comparison(mut comparison: Comparison) -> Page<FullCommit, Comparison> {
    let items = std::mem::take(&mut comparison.commits);
    Page {
        items,
        total_count: Some(comparison.total_commits),
        meta: comparison,
    }
}

impl<'a, T> Paginator<'a, Vec<T>, T>
where
    Vec<T>: DeserializeOwned + Summary,
{
    /// Paginate an endpoint that returns a plain JSON array.
    pub fn list(fetcher: &'a Fetcher, request: Request) -> Self {
        Self::with_extract(fetcher, request, extract_list)
    }
}

impl<'a, T> Paginator<'a, SearchResult<T>, T>
where
    SearchResult<T>: DeserializeOwned + Summary,
{
    /// Paginate a search endpoint, unwrapping the `items` of each envelope.
    pub fn search(fetcher: &'a Fetcher, request: Request) -> Self {
        Self::with_extract(fetcher, request, extract_search)
    }
}

impl<'a> Paginator<'a, Comparison, FullCommit, Comparison> {
    /// Paginate the compare endpoint over its commit list.
    pub fn comparison(fetcher: &'a Fetcher, request: Request) -> Self {
        Self::with_extract(fetcher, request, extract_comparison)
    }

    /// Fetch pages until every commit the endpoint reports has been collected.
    pub async fn fetch_comparison(
        &mut self,
        max_pages: Option<u32>,
    ) -> Result<Comparison, ApiError> {
        let Paginated { items, mut meta } = self.fetch_all_pages(max_pages).await?;
        meta.commits = items;
        Ok(meta)
    }
}

impl<'a, P, T, M> Paginator<'a, P, T, M>
where
    P: DeserializeOwned + Summary,
{
    /// Paginate with a custom extract function.
    pub fn with_extract(fetcher: &'a Fetcher, request: Request, extract: Extract<P, T, M>) -> Self {
        Self {
            fetcher,
            request,
            page_size: DEFAULT_PAGE_SIZE,
            extract,
            state: PaginationState::NotStarted,
            _payload: PhantomData,
        }
    }

    /// Use a different page size.
    pub fn page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size;
        self
    }

    pub fn state(&self) -> PaginationState {
        self.state
    }

    /// Fetch a single page (1-based).
    pub async fn fetch_page(&self, page: u32) -> Result<Page<T, M>, ApiError> {
        let params = [
            ("per_page".to_string(), self.page_size.to_string()),
            ("page".to_string(), page.to_string()),
        ];

        let payload: P = self.fetcher.fetch_with(&self.request, &params).await?;
        Ok((self.extract)(payload))
    }

    /// Fetch pages until the data runs out or `max_pages` is reached.
    pub async fn fetch_all_pages(&mut self, max_pages: Option<u32>) -> Result<Paginated<T, M>, ApiError> {
        self.fetch_all_pages_while(max_pages, |_| true).await
    }

    /// Fetch pages while `should_continue` approves of the items accumulated so far.
    ///
    /// After each page the run stops when any of these holds:
    /// - the page was shorter than the page size
    /// - the endpoint's reported total has been reached
    /// - `max_pages` pages have been fetched
    /// - `should_continue` returns `false`
    ///
    /// The first failing page aborts the run; nothing accumulated is returned.
    pub async fn fetch_all_pages_while<F>(
        &mut self,
        max_pages: Option<u32>,
        mut should_continue: F,
    ) -> Result<Paginated<T, M>, ApiError>
    where
        F: FnMut(&[T]) -> bool,
    {
        let mut page = 1;
        self.state = PaginationState::Fetching(page);

        let first = match self.fetch_page(page).await {
            Ok(first) => first,
            Err(e) => {
                self.state = PaginationState::Done;
                return Err(e);
            }
        };

        let meta = first.meta;
        let mut items = Vec::new();
        let mut last_len = first.items.len();
        let mut total_count = first.total_count;
        items.extend(first.items);

        loop {
            let short_page = last_len < self.page_size as usize;
            let reached_total = total_count.is_some_and(|total| items.len() >= total);
            let reached_max = max_pages.is_some_and(|max| page >= max);

            if short_page || reached_total || reached_max || !should_continue(&items) {
                break;
            }

            page += 1;
            self.state = PaginationState::Fetching(page);

            let next = match self.fetch_page(page).await {
                Ok(next) => next,
                Err(e) => {
                    self.state = PaginationState::Done;
                    return Err(e);
                }
            };

            last_len = next.items.len();
            total_count = next.total_count.or(total_count);
            items.extend(next.items);
        }

        debug!(pages = page, items = items.len(), "Pagination finished");
        self.state = PaginationState::Done;

        Ok(Paginated { items, meta })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_list_has_no_total() {
        let page = extract_list(vec![1, 2, 3]);
        assert_eq!(page.items, vec![1, 2, 3]);
        assert!(page.total_count.is_none());
    }

    #[test]
    fn test_extract_search_unwraps_items() {
        let page = extract_search(SearchResult {
            total_count: 17,
            incomplete_results: false,
            items: vec!["a", "b"],
        });
        assert_eq!(page.items, vec!["a", "b"]);
        assert_eq!(page.total_count, Some(17));
    }

    #[tokio::test]
    async fn test_new_paginator_has_not_started() {
        let fetcher = Fetcher::new("http://127.0.0.1:1").unwrap();
        let paginator: Paginator<'_, Vec<crate::github::Tag>, crate::github::Tag> =
            Paginator::list(&fetcher, Request::new("http://127.0.0.1:1/tags"));
        assert_eq!(paginator.state(), PaginationState::NotStarted);
    }
}
