// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

//! Logging setup and helpers for keeping user input out of logs verbatim.

use tracing_subscriber::EnvFilter;

/// Longest search term echoed into logs
const MAX_LOGGED_QUERY_CHARS: usize = 32;

/// Install the global tracing subscriber.
///
/// Logs go to stderr so stdout stays free for the rendered listing.
/// `RUST_LOG` wins over `verbose` when set. Calling this twice is harmless.
pub fn init_tracing(verbose: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if verbose {
            EnvFilter::new("catalog_listing=debug,info")
        } else {
            EnvFilter::new("info")
        }
    });

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

/// Short, log-safe rendition of a search term: `<browse>` for the empty
/// query, otherwise the quoted term cut to a fixed length.
pub fn summarize_query(query: &str) -> String {
    if query.is_empty() {
        return "<browse>".to_string();
    }
    let mut chars = query.chars();
    let head: String = chars.by_ref().take(MAX_LOGGED_QUERY_CHARS).collect();
    if chars.next().is_some() {
        format!("\"{}...\"", head)
    } else {
        format!("\"{}\"", head)
    }
}
