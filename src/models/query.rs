// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

use crate::models::product::Product;
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Lifecycle of the listing's most recent fetch
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "reason", rename_all = "snake_case")]
pub enum FetchStatus {
    /// Nothing requested yet
    Idle,
    /// A fetch is in flight
    Loading,
    /// The latest fetch resolved with a page
    Loaded,
    /// The latest fetch failed; carries the user-facing reason
    Failed(String),
}

impl FetchStatus {
    pub fn is_loading(&self) -> bool {
        matches!(self, FetchStatus::Loading)
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            FetchStatus::Failed(reason) => Some(reason),
            _ => None,
        }
    }
}

impl std::fmt::Display for FetchStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FetchStatus::Idle => write!(f, "idle"),
            FetchStatus::Loading => write!(f, "loading"),
            FetchStatus::Loaded => write!(f, "loaded"),
            FetchStatus::Failed(reason) => write!(f, "failed: {}", reason),
        }
    }
}

/// Parameters of a single product fetch.
///
/// An empty `query` selects the browse endpoint, anything else the search one.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PageRequest {
    pub query: String,
    pub page: u32,
    pub page_size: u32,
}

impl PageRequest {
    pub fn is_search(&self) -> bool {
        !self.query.is_empty()
    }

    /// Number of items to skip for this page (pages are 1-based)
    pub fn skip(&self) -> u64 {
        u64::from(self.page.saturating_sub(1)) * u64::from(self.page_size)
    }
}

/// Everything the listing view renders from
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QueryState {
    /// Live text of the search input, not yet committed
    pub raw_input: String,
    /// Query driving fetches; empty means browse all
    pub committed_query: String,
    pub page: u32,
    pub page_size: u32,
    /// Total matches reported by the last successful fetch
    pub total_count: u64,
    /// Products of the current page in server order
    pub results: Vec<Product>,
    pub status: FetchStatus,
    pub last_loaded_at: Option<DateTime<Utc>>,
}

impl QueryState {
    pub fn new(page_size: u32) -> Self {
        Self {
            raw_input: String::new(),
            committed_query: String::new(),
            page: 1,
            page_size,
            total_count: 0,
            results: Vec::new(),
            status: FetchStatus::Idle,
            last_loaded_at: None,
        }
    }

    pub fn total_pages(&self) -> u32 {
        crate::services::pagination::total_pages(self.total_count, self.page_size)
    }

    /// Request matching the current committed query and page
    pub fn page_request(&self) -> PageRequest {
        PageRequest {
            query: self.committed_query.clone(),
            page: self.page,
            page_size: self.page_size,
        }
    }

    /// True when a fetch completed successfully with nothing to show
    pub fn is_empty_result(&self) -> bool {
        self.status == FetchStatus::Loaded && self.results.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_request_skip() {
        let request = PageRequest {
            query: String::new(),
            page: 3,
            page_size: 10,
        };
        assert_eq!(request.skip(), 20);
        assert!(!request.is_search());
    }

    #[test]
    fn test_page_request_skip_first_page() {
        let request = PageRequest {
            query: "phone".to_string(),
            page: 1,
            page_size: 10,
        };
        assert_eq!(request.skip(), 0);
        assert!(request.is_search());
    }

    #[test]
    fn test_new_state_starts_idle_on_first_page() {
        let state = QueryState::new(10);
        assert_eq!(state.page, 1);
        assert_eq!(state.status, FetchStatus::Idle);
        assert_eq!(state.total_pages(), 0);
        assert!(!state.is_empty_result());
    }

    #[test]
    fn test_total_pages_rounds_up() {
        let mut state = QueryState::new(10);
        state.total_count = 194;
        assert_eq!(state.total_pages(), 20);
    }

    #[test]
    fn test_fetch_status_display() {
        assert_eq!(FetchStatus::Loading.to_string(), "loading");
        assert_eq!(
            FetchStatus::Failed("Failed to fetch products".to_string()).to_string(),
            "failed: Failed to fetch products"
        );
    }

    #[test]
    fn test_fetch_status_error() {
        assert_eq!(FetchStatus::Failed("boom".to_string()).error(), Some("boom"));
        assert_eq!(FetchStatus::Loaded.error(), None);
    }
}
