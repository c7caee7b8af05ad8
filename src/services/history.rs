// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

use crate::services::logging::summarize_query;
use crate::services::storage::KeyValueStore;
use std::str::FromStr;
use std::sync::Arc;
use tracing::{debug, warn};

/// What `record` does with a term that is already in the history
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DuplicatePolicy {
    /// Leave the history untouched
    #[default]
    KeepPosition,
    /// Move the existing entry to the front
    MoveToFront,
}

impl FromStr for DuplicatePolicy {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "keep" | "keep_position" => Ok(DuplicatePolicy::KeepPosition),
            "move_to_front" => Ok(DuplicatePolicy::MoveToFront),
            other => Err(format!(
                "expected 'keep' or 'move_to_front', got '{}'",
                other
            )),
        }
    }
}

impl std::fmt::Display for DuplicatePolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DuplicatePolicy::KeepPosition => write!(f, "keep"),
            DuplicatePolicy::MoveToFront => write!(f, "move_to_front"),
        }
    }
}

/// Most-recent-first list of past search terms, persisted as a JSON array
/// under a single storage key.
///
/// The persisted value is the source of truth: it is read once on open and
/// rewritten in full on every change.
pub struct SearchHistoryCache {
    store: Arc<dyn KeyValueStore>,
    key: String,
    capacity: usize,
    policy: DuplicatePolicy,
    entries: Vec<String>,
}

impl SearchHistoryCache {
    /// Open the cache and load whatever is persisted under `key`
    pub fn open(
        store: Arc<dyn KeyValueStore>,
        key: impl Into<String>,
        capacity: usize,
        policy: DuplicatePolicy,
    ) -> Self {
        let mut cache = Self {
            store,
            key: key.into(),
            capacity,
            policy,
            entries: Vec::new(),
        };
        cache.load();
        cache
    }

    /// Re-read the persisted history.
    ///
    /// A missing, unreadable or malformed value yields an empty history.
    pub fn load(&mut self) -> &[String] {
        self.entries = match self.store.read(&self.key) {
            Ok(Some(raw)) => match serde_json::from_str::<Vec<String>>(&raw) {
                Ok(stored) => self.normalize(stored),
                Err(e) => {
                    debug!(key = %self.key, error = %e, "Ignoring malformed search history");
                    Vec::new()
                }
            },
            Ok(None) => Vec::new(),
            Err(e) => {
                warn!(key = %self.key, error = %e, "Failed to read search history");
                Vec::new()
            }
        };
        &self.entries
    }

    /// Add `term` to the front of the history.
    ///
    /// Blank terms are ignored. A term already present is left alone unless
    /// the cache moves duplicates to the front.
    pub fn record(&mut self, term: &str) -> &[String] {
        let term = term.trim();
        if term.is_empty() {
            return &self.entries;
        }

        match self.entries.iter().position(|entry| entry == term) {
            Some(_) if self.policy == DuplicatePolicy::KeepPosition => return &self.entries,
            Some(0) => return &self.entries,
            Some(index) => {
                let existing = self.entries.remove(index);
                self.entries.insert(0, existing);
            }
            None => {
                self.entries.insert(0, term.to_string());
                self.entries.truncate(self.capacity);
            }
        }

        debug!(term = %summarize_query(term), size = self.entries.len(), "Recorded search");
        self.persist();
        &self.entries
    }

    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    fn persist(&self) {
        let encoded = match serde_json::to_string(&self.entries) {
            Ok(encoded) => encoded,
            Err(e) => {
                warn!(error = %e, "Failed to encode search history");
                return;
            }
        };
        if let Err(e) = self.store.write(&self.key, &encoded) {
            warn!(key = %self.key, error = %e, "Failed to persist search history");
        }
    }

    fn normalize(&self, stored: Vec<String>) -> Vec<String> {
        let mut entries: Vec<String> = Vec::with_capacity(self.capacity);
        for term in stored {
            let term = term.trim();
            if term.is_empty() || entries.iter().any(|e| e == term) {
                continue;
            }
            entries.push(term.to_string());
            if entries.len() == self.capacity {
                break;
            }
        }
        entries
    }
}

impl std::fmt::Debug for SearchHistoryCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SearchHistoryCache")
            .field("key", &self.key)
            .field("capacity", &self.capacity)
            .field("policy", &self.policy)
            .field("entries", &self.entries)
            .finish()
    }
}
