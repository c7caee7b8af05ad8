// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

use crate::services::catalog::normalize_base_url;
use crate::services::history::DuplicatePolicy;
use anyhow::{bail, Context, Result};
use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

pub const DEFAULT_API_BASE: &str = "https://dummyjson.com";
pub const DEFAULT_PAGE_SIZE: u32 = 10;
pub const DEFAULT_DEBOUNCE_MS: u64 = 1000;
pub const DEFAULT_HISTORY_CAPACITY: usize = 3;
pub const DEFAULT_PAGINATION_WINDOW: u32 = 5;
pub const DEFAULT_REQUEST_TIMEOUT_MS: u64 = 10_000;
pub const DEFAULT_HISTORY_DIR: &str = ".catalog-listing";

/// Storage key under which recent searches are persisted
pub const HISTORY_STORAGE_KEY: &str = "searchHistory";

/// Tunables of the listing controller and its collaborators.
#[derive(Debug, Clone, PartialEq)]
pub struct ListingSettings {
    pub api_base_url: String,
    pub page_size: u32,
    pub debounce_delay: Duration,
    pub history_capacity: usize,
    pub pagination_window: u32,
    pub request_timeout: Duration,
    pub history_dir: PathBuf,
    pub duplicate_policy: DuplicatePolicy,
}

impl Default for ListingSettings {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE.to_string(),
            page_size: DEFAULT_PAGE_SIZE,
            debounce_delay: Duration::from_millis(DEFAULT_DEBOUNCE_MS),
            history_capacity: DEFAULT_HISTORY_CAPACITY,
            pagination_window: DEFAULT_PAGINATION_WINDOW,
            request_timeout: Duration::from_millis(DEFAULT_REQUEST_TIMEOUT_MS),
            history_dir: PathBuf::from(DEFAULT_HISTORY_DIR),
            duplicate_policy: DuplicatePolicy::KeepPosition,
        }
    }
}

impl ListingSettings {
    /// Load settings from `CATALOG_*` environment variables, falling back to defaults.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build settings from an arbitrary variable source
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let settings = Self {
            api_base_url: lookup("CATALOG_API_BASE").unwrap_or(defaults.api_base_url),
            page_size: parse_or(&lookup, "CATALOG_PAGE_SIZE", defaults.page_size)?,
            debounce_delay: Duration::from_millis(parse_or(
                &lookup,
                "CATALOG_DEBOUNCE_MS",
                DEFAULT_DEBOUNCE_MS,
            )?),
            history_capacity: parse_or(
                &lookup,
                "CATALOG_HISTORY_CAPACITY",
                defaults.history_capacity,
            )?,
            pagination_window: parse_or(
                &lookup,
                "CATALOG_PAGINATION_WINDOW",
                defaults.pagination_window,
            )?,
            request_timeout: Duration::from_millis(parse_or(
                &lookup,
                "CATALOG_REQUEST_TIMEOUT_MS",
                DEFAULT_REQUEST_TIMEOUT_MS,
            )?),
            history_dir: lookup("CATALOG_HISTORY_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.history_dir),
            duplicate_policy: parse_or(
                &lookup,
                "CATALOG_HISTORY_POLICY",
                defaults.duplicate_policy,
            )?,
        };

        settings.validate()?;
        Ok(settings)
    }

    /// Reject values the controller cannot work with
    pub fn validate(&self) -> Result<()> {
        if self.page_size == 0 {
            bail!("page size must be greater than zero");
        }
        if self.pagination_window == 0 {
            bail!("pagination window must be greater than zero");
        }
        if self.history_capacity == 0 {
            bail!("history capacity must be greater than zero");
        }
        normalize_base_url(&self.api_base_url)
            .with_context(|| format!("invalid catalog API base URL: {}", self.api_base_url))?;
        Ok(())
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> Result<T>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|e| anyhow::anyhow!("{} has an invalid value '{}': {}", key, raw, e)),
        None => Ok(default),
    }
}
