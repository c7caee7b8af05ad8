// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

//! Listing session: wiring of the controller to its collaborators, the
//! command loop that serializes every state change, and the handle views use
//! to drive it.
//!
//! This module is `pub` so that integration tests can run a session against a
//! local catalog without starting the binary.

use crate::models::settings::{ListingSettings, HISTORY_STORAGE_KEY};
use crate::services::catalog::{CatalogSource, HttpCatalogClient};
use crate::services::controller::{
    EventOutcome, ListingEvents, ListingQueryController, ListingSnapshot,
};
use crate::services::history::SearchHistoryCache;
use crate::services::storage::{FileStore, KeyValueStore};
use crate::services::suggestions::{Point, SuggestionOverlay};
use anyhow::{Context, Result};
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tracing::{debug, info};

/// Application version extracted from `Cargo.toml` at compile time.
/// The patch segment can be overridden via `CATALOG_PATCH_VERSION` (see `build.rs`).
pub const VERSION: &str = env!("CATALOG_VERSION");

/// Commands pending in the session queue before senders wait
const COMMAND_BUFFER: usize = 64;

/// User intent forwarded by the view
#[derive(Debug, Clone, PartialEq)]
pub enum ListingCommand {
    /// Search input text changed
    Input(String),
    /// Search form submitted
    Submit,
    /// A history entry or static suggestion was clicked
    SelectSuggestion(String),
    SetPage(u32),
    NextPage,
    PrevPage,
    /// Search input focused or clicked
    FocusInput,
    /// Pointer pressed somewhere in the view
    PointerDown(Point),
    /// Re-issue the current fetch, e.g. after a failure
    Refresh,
}

#[derive(Debug, Error)]
#[error("Listing session has stopped")]
pub struct SessionClosed;

/// Cloneable handle for sending commands to a running session and watching
/// its snapshots.
#[derive(Debug, Clone)]
pub struct ListingHandle {
    commands: mpsc::Sender<ListingCommand>,
    snapshots: watch::Receiver<ListingSnapshot>,
}

impl ListingHandle {
    pub async fn send(&self, command: ListingCommand) -> Result<(), SessionClosed> {
        self.commands.send(command).await.map_err(|_| SessionClosed)
    }

    /// Latest published snapshot
    pub fn snapshot(&self) -> ListingSnapshot {
        self.snapshots.borrow().clone()
    }

    /// Receiver notified on every published snapshot
    pub fn subscribe(&self) -> watch::Receiver<ListingSnapshot> {
        self.snapshots.clone()
    }
}

/// Collaborators of a session built from settings
pub struct ListingServices {
    pub catalog: Arc<HttpCatalogClient>,
    pub store: Arc<FileStore>,
}

impl ListingServices {
    /// Build the HTTP catalog client and on-disk history store
    pub fn from_settings(settings: &ListingSettings) -> Result<Self> {
        let catalog = HttpCatalogClient::new(&settings.api_base_url, settings.request_timeout)
            .context("Failed to create catalog client")?;
        let store = FileStore::open(&settings.history_dir).with_context(|| {
            format!(
                "Failed to open history directory {}",
                settings.history_dir.display()
            )
        })?;

        info!(
            api = %catalog.base_url(),
            history_dir = %settings.history_dir.display(),
            "Listing services ready"
        );

        Ok(Self {
            catalog: Arc::new(catalog),
            store: Arc::new(store),
        })
    }
}

/// Assemble a controller from its collaborators, loading persisted history
pub fn build_controller(
    settings: &ListingSettings,
    catalog: Arc<dyn CatalogSource>,
    store: Arc<dyn KeyValueStore>,
) -> (ListingQueryController, ListingEvents) {
    let history = SearchHistoryCache::open(
        store,
        HISTORY_STORAGE_KEY,
        settings.history_capacity,
        settings.duplicate_policy,
    );
    ListingQueryController::new(settings, catalog, history, SuggestionOverlay::new())
}

/// Mount the controller and run it on a background task.
///
/// The session stops once every [`ListingHandle`] has been dropped.
pub fn spawn_session(
    mut controller: ListingQueryController,
    events: ListingEvents,
) -> (ListingHandle, JoinHandle<()>) {
    let (command_tx, command_rx) = mpsc::channel(COMMAND_BUFFER);

    controller.mount();
    let (snapshot_tx, snapshot_rx) = watch::channel(controller.snapshot());

    let task = tokio::spawn(run_session(controller, events, command_rx, snapshot_tx));

    (
        ListingHandle {
            commands: command_tx,
            snapshots: snapshot_rx,
        },
        task,
    )
}

async fn run_session(
    mut controller: ListingQueryController,
    mut events: ListingEvents,
    mut commands: mpsc::Receiver<ListingCommand>,
    snapshots: watch::Sender<ListingSnapshot>,
) {
    loop {
        tokio::select! {
            command = commands.recv() => match command {
                Some(command) => apply_command(&mut controller, command),
                None => break,
            },
            Some(event) = events.next() => {
                if controller.handle_event(event) == EventOutcome::Stale {
                    continue;
                }
            }
        }
        snapshots.send_replace(controller.snapshot());
    }

    debug!("Listing session stopped");
}

fn apply_command(controller: &mut ListingQueryController, command: ListingCommand) {
    match command {
        ListingCommand::Input(text) => controller.set_raw_input(text),
        ListingCommand::Submit => {
            controller.submit_search();
        }
        ListingCommand::SelectSuggestion(term) => {
            controller.select_suggestion(&term);
        }
        ListingCommand::SetPage(page) => {
            controller.set_page(page);
        }
        ListingCommand::NextPage => {
            controller.next_page();
        }
        ListingCommand::PrevPage => {
            controller.prev_page();
        }
        ListingCommand::FocusInput => controller.open_suggestions(),
        ListingCommand::PointerDown(point) => {
            controller.pointer_down(point);
        }
        ListingCommand::Refresh => {
            controller.fetch_page();
        }
    }
}
