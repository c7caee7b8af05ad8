// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

//! Page-number window shown under the listing.

use serde::Serialize;

/// Number of pages needed to show `total_count` items, `page_size` at a time
pub fn total_pages(total_count: u64, page_size: u32) -> u32 {
    if page_size == 0 {
        return 0;
    }
    let pages = total_count.div_ceil(u64::from(page_size));
    u32::try_from(pages).unwrap_or(u32::MAX)
}

/// Compute the run of page numbers centered on `current_page`.
///
/// The window holds at most `window_size` pages and never extends past
/// `total_pages`; near the end it slides left so it stays full. Callers are
/// responsible for keeping `current_page` in range.
pub fn compute_window(current_page: u32, total_pages: u32, window_size: u32) -> Vec<u32> {
    if total_pages == 0 || window_size == 0 {
        return Vec::new();
    }

    let mut start = current_page.saturating_sub(window_size / 2).max(1);
    let mut end = start.saturating_add(window_size - 1);

    if end > total_pages {
        end = total_pages;
        start = end.saturating_sub(window_size - 1).max(1);
    }

    (start..=end).collect()
}

/// Derived pagination controls for one render
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PaginationView {
    pub current: u32,
    pub total_pages: u32,
    pub visible_pages: Vec<u32>,
    pub has_prev: bool,
    pub has_next: bool,
}

impl PaginationView {
    pub fn new(current: u32, total_pages: u32, window_size: u32) -> Self {
        Self {
            current,
            total_pages,
            visible_pages: compute_window(current, total_pages, window_size),
            has_prev: current > 1,
            has_next: current < total_pages,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_window_centered_on_current_page() {
        assert_eq!(compute_window(10, 20, 5), vec![8, 9, 10, 11, 12]);
    }

    #[test]
    fn test_window_at_first_page() {
        assert_eq!(compute_window(1, 20, 5), vec![1, 2, 3, 4, 5]);
        assert_eq!(compute_window(2, 20, 5), vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_window_slides_left_near_end() {
        assert_eq!(compute_window(20, 20, 5), vec![16, 17, 18, 19, 20]);
        assert_eq!(compute_window(19, 20, 5), vec![16, 17, 18, 19, 20]);
    }

    #[test]
    fn test_window_fewer_pages_than_window() {
        assert_eq!(compute_window(2, 3, 5), vec![1, 2, 3]);
        assert_eq!(compute_window(1, 1, 5), vec![1]);
    }

    #[test]
    fn test_window_empty_without_pages() {
        assert!(compute_window(1, 0, 5).is_empty());
    }

    #[test]
    fn test_window_properties_hold_for_all_inputs() {
        for total in 0..=30u32 {
            for page in 1..=total.max(1) {
                let window = compute_window(page, total, 5);
                assert_eq!(window.len() as u32, total.min(5), "page {page} of {total}");
                assert!(window.windows(2).all(|w| w[1] == w[0] + 1));
                assert!(window.iter().all(|p| (1..=total).contains(p)));
                if page <= total {
                    assert!(window.contains(&page), "page {page} of {total}");
                }
            }
        }
    }

    #[test]
    fn test_total_pages() {
        assert_eq!(total_pages(0, 10), 0);
        assert_eq!(total_pages(1, 10), 1);
        assert_eq!(total_pages(10, 10), 1);
        assert_eq!(total_pages(11, 10), 2);
        assert_eq!(total_pages(194, 10), 20);
        assert_eq!(total_pages(5, 0), 0);
    }

    #[test]
    fn test_pagination_view_flags() {
        let first = PaginationView::new(1, 3, 5);
        assert!(!first.has_prev);
        assert!(first.has_next);

        let last = PaginationView::new(3, 3, 5);
        assert!(last.has_prev);
        assert!(!last.has_next);

        let empty = PaginationView::new(1, 0, 5);
        assert!(empty.visible_pages.is_empty());
        assert!(!empty.has_prev);
        assert!(!empty.has_next);
    }
}
