// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

//! State machine behind the product listing: search input, debounce, paging,
//! fetch sequencing and recent-search history.

use crate::models::product::ProductPage;
use crate::models::query::{FetchStatus, PageRequest, QueryState};
use crate::models::settings::ListingSettings;
use crate::services::catalog::{CatalogResult, CatalogSource};
use crate::services::debounce::Debouncer;
use crate::services::history::SearchHistoryCache;
use crate::services::logging::summarize_query;
use crate::services::pagination::PaginationView;
use crate::services::suggestions::{HitTest, Point, SuggestionEntry, SuggestionOverlay};
use chrono::Utc;
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

/// Reason shown to the user whenever a product fetch fails
pub const FETCH_FAILED_MESSAGE: &str = "Failed to fetch products";

/// Identity of an issued fetch. Ids increase monotonically per controller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchTicket {
    pub id: u64,
    pub request: PageRequest,
}

/// Completion produced by a timer or fetch task, to be fed back through
/// [`ListingQueryController::handle_event`].
#[derive(Debug)]
pub struct ListingEvent(EventKind);

#[derive(Debug)]
enum EventKind {
    DebounceElapsed {
        generation: u64,
        text: String,
    },
    FetchResolved {
        ticket: FetchTicket,
        outcome: CatalogResult<ProductPage>,
    },
}

/// Receiving side of the controller's completion channel
#[derive(Debug)]
pub struct ListingEvents {
    rx: mpsc::UnboundedReceiver<ListingEvent>,
}

impl ListingEvents {
    /// Wait for the next completion. `None` once the controller is gone.
    pub async fn next(&mut self) -> Option<ListingEvent> {
        self.rx.recv().await
    }
}

/// What applying an event did to the state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventOutcome {
    /// State changed
    Applied,
    /// Event was current but changed nothing
    Unchanged,
    /// Event belonged to superseded input or a superseded fetch and was dropped
    Stale,
}

/// Everything a view needs to render the listing
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ListingSnapshot {
    pub state: QueryState,
    pub pagination: PaginationView,
    pub suggestions_visible: bool,
    pub history: Vec<String>,
    pub suggestions: Vec<SuggestionEntry>,
}

/// Owns the listing's [`QueryState`] and sequences debounce, fetch and
/// history updates.
///
/// All mutation goes through `&mut self`; timers and fetches run as spawned
/// tasks that report back through [`ListingEvents`]. Only the resolution of
/// the most recently issued fetch is ever committed. Methods that schedule
/// work must be called inside a tokio runtime.
pub struct ListingQueryController {
    state: QueryState,
    catalog: Arc<dyn CatalogSource>,
    history: SearchHistoryCache,
    overlay: SuggestionOverlay,
    debouncer: Debouncer,
    debounce_delay: Duration,
    debounce_generation: u64,
    debounce_armed: bool,
    pagination_window: u32,
    latest_ticket: u64,
    events: mpsc::UnboundedSender<ListingEvent>,
}

impl ListingQueryController {
    pub fn new(
        settings: &ListingSettings,
        catalog: Arc<dyn CatalogSource>,
        history: SearchHistoryCache,
        overlay: SuggestionOverlay,
    ) -> (Self, ListingEvents) {
        let (tx, rx) = mpsc::unbounded_channel();
        let controller = Self {
            state: QueryState::new(settings.page_size),
            catalog,
            history,
            overlay,
            debouncer: Debouncer::new(),
            debounce_delay: settings.debounce_delay,
            debounce_generation: 0,
            debounce_armed: false,
            pagination_window: settings.pagination_window,
            latest_ticket: 0,
            events: tx,
        };
        (controller, ListingEvents { rx })
    }

    /// Initial load of the first browse page
    pub fn mount(&mut self) -> FetchTicket {
        info!(
            history = self.history.entries().len(),
            capacity = self.history.capacity(),
            "Listing mounted"
        );
        self.fetch_page()
    }

    /// Update the live input and (re)arm the debounced commit
    pub fn set_raw_input(&mut self, text: impl Into<String>) {
        let text = text.into();
        self.state.raw_input = text.clone();

        self.debounce_generation += 1;
        self.debounce_armed = true;
        let generation = self.debounce_generation;
        let events = self.events.clone();
        self.debouncer.schedule(self.debounce_delay, async move {
            let _ = events.send(ListingEvent(EventKind::DebounceElapsed { generation, text }));
        });
    }

    /// Commit the live input right away, skipping the debounce
    pub fn submit_search(&mut self) -> FetchTicket {
        self.cancel_debounce();
        self.overlay.close();
        let query = self.state.raw_input.clone();
        self.commit_query(&query);
        self.fetch_page()
    }

    /// Search for a suggested or previous term
    pub fn select_suggestion(&mut self, term: &str) -> FetchTicket {
        self.cancel_debounce();
        self.overlay.close();
        self.state.raw_input = term.to_string();
        self.commit_query(term);
        self.fetch_page()
    }

    /// Jump to page `page`, clamped into the known page range
    pub fn set_page(&mut self, page: u32) -> FetchTicket {
        let last = self.state.total_pages().max(1);
        let page = page.clamp(1, last);
        if page != self.state.page {
            debug!(from = self.state.page, to = page, "Page changed");
        }
        self.state.page = page;
        self.fetch_page()
    }

    pub fn next_page(&mut self) -> FetchTicket {
        self.set_page(self.state.page.saturating_add(1))
    }

    pub fn prev_page(&mut self) -> FetchTicket {
        self.set_page(self.state.page.saturating_sub(1))
    }

    /// Issue a fetch for the current query and page.
    ///
    /// Supersedes any fetch still in flight.
    pub fn fetch_page(&mut self) -> FetchTicket {
        self.latest_ticket += 1;
        let ticket = FetchTicket {
            id: self.latest_ticket,
            request: self.state.page_request(),
        };
        self.state.status = FetchStatus::Loading;

        debug!(
            ticket = ticket.id,
            query = %summarize_query(&ticket.request.query),
            page = ticket.request.page,
            "Fetching products"
        );

        let catalog = self.catalog.clone();
        let events = self.events.clone();
        let task_ticket = ticket.clone();
        tokio::spawn(async move {
            let outcome = catalog.fetch_page(&task_ticket.request).await;
            let _ = events.send(ListingEvent(EventKind::FetchResolved {
                ticket: task_ticket,
                outcome,
            }));
        });

        ticket
    }

    /// Apply a completion received from [`ListingEvents`]
    pub fn handle_event(&mut self, event: ListingEvent) -> EventOutcome {
        match event.0 {
            EventKind::DebounceElapsed { generation, text } => {
                if generation != self.debounce_generation {
                    debug!(generation, "Dropping superseded input commit");
                    return EventOutcome::Stale;
                }
                self.debounce_armed = false;
                self.apply_debounced(&text)
            }
            EventKind::FetchResolved { ticket, outcome } => {
                if ticket.id != self.latest_ticket {
                    debug!(
                        ticket = ticket.id,
                        latest = self.latest_ticket,
                        "Dropping superseded fetch result"
                    );
                    return EventOutcome::Stale;
                }
                self.resolve(ticket, outcome);
                EventOutcome::Applied
            }
        }
    }

    pub fn open_suggestions(&mut self) {
        self.overlay.open();
    }

    pub fn close_suggestions(&mut self) {
        self.overlay.close();
    }

    /// Grant the region of the search input used for click-outside detection
    pub fn set_search_boundary(&mut self, boundary: impl HitTest + 'static) {
        self.overlay.set_boundary(boundary);
    }

    /// Forward a pointer event; returns whether suggestions remain visible
    pub fn pointer_down(&mut self, point: Point) -> bool {
        self.overlay.pointer_down(point)
    }

    pub fn state(&self) -> &QueryState {
        &self.state
    }

    pub fn history(&self) -> &[String] {
        self.history.entries()
    }

    pub fn suggestions_visible(&self) -> bool {
        self.overlay.is_visible()
    }

    pub fn suggestion_entries(&self) -> Vec<SuggestionEntry> {
        self.overlay.entries(self.history.entries())
    }

    pub fn pagination(&self) -> PaginationView {
        PaginationView::new(
            self.state.page,
            self.state.total_pages(),
            self.pagination_window,
        )
    }

    /// Whether the latest input still awaits its debounced commit, including
    /// a commit whose timer fired but has not been handled yet
    pub fn is_debounce_pending(&self) -> bool {
        self.debounce_armed
    }

    pub fn snapshot(&self) -> ListingSnapshot {
        ListingSnapshot {
            state: self.state.clone(),
            pagination: self.pagination(),
            suggestions_visible: self.suggestions_visible(),
            history: self.history.entries().to_vec(),
            suggestions: self.suggestion_entries(),
        }
    }

    fn cancel_debounce(&mut self) {
        self.debouncer.cancel();
        // Invalidates a commit that already fired but is still queued
        self.debounce_generation += 1;
        self.debounce_armed = false;
    }

    fn commit_query(&mut self, query: &str) {
        self.state.committed_query = query.trim().to_string();
        self.state.page = 1;
    }

    fn apply_debounced(&mut self, text: &str) -> EventOutcome {
        if text.trim() == self.state.committed_query && self.state.page == 1 {
            return EventOutcome::Unchanged;
        }
        self.commit_query(text);
        self.fetch_page();
        EventOutcome::Applied
    }

    fn resolve(&mut self, ticket: FetchTicket, outcome: CatalogResult<ProductPage>) {
        match outcome {
            Ok(page) => {
                info!(
                    query = %summarize_query(&ticket.request.query),
                    page = ticket.request.page,
                    items = page.products.len(),
                    total = page.total,
                    "Products loaded"
                );
                self.state.results = page.products;
                self.state.total_count = page.total;
                self.state.status = FetchStatus::Loaded;
                self.state.last_loaded_at = Some(Utc::now());

                if ticket.request.is_search() {
                    self.history.record(&ticket.request.query);
                }
            }
            Err(e) => {
                warn!(
                    query = %summarize_query(&ticket.request.query),
                    page = ticket.request.page,
                    error = %e,
                    "Product fetch failed"
                );
                self.state.results.clear();
                self.state.status = FetchStatus::Failed(FETCH_FAILED_MESSAGE.to_string());
            }
        }
    }
}

impl std::fmt::Debug for ListingQueryController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ListingQueryController")
            .field("state", &self.state)
            .field("history", &self.history)
            .field("overlay", &self.overlay)
            .field("latest_ticket", &self.latest_ticket)
            .finish()
    }
}
