// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

use anyhow::{Context, Result};
use catalog_listing::app::{
    build_controller, spawn_session, ListingCommand, ListingHandle, ListingServices, VERSION,
};
use catalog_listing::models::product::Product;
use catalog_listing::models::query::FetchStatus;
use catalog_listing::models::settings::ListingSettings;
use catalog_listing::services::catalog::{CatalogSource, HttpCatalogClient};
use catalog_listing::services::controller::ListingSnapshot;
use catalog_listing::services::logging::init_tracing;
use catalog_listing::services::suggestions::{Point, SuggestionSource};
use clap::Parser;
use std::fmt::Write as _;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::warn;

const HELP: &str = "\
commands:
  type <text>     edit the search input (committed after a pause)
  submit          search for the current input now
  pick <term>     choose a suggestion or previous search
  page <n>        go to page n
  next | prev     move one page
  focus           focus the search input (shows suggestions)
  click <x> <y>   pointer press at view coordinates
  refresh         repeat the current fetch
  show <id>       product details
  help | quit";

/// Browse and search the product catalog from the terminal
#[derive(Debug, Parser)]
#[command(name = "catalog-listing", version = VERSION, about)]
struct Cli {
    /// Catalog API base URL (overrides CATALOG_API_BASE)
    #[arg(long)]
    api_base: Option<String>,

    /// Directory holding the recent-search history (overrides CATALOG_HISTORY_DIR)
    #[arg(long)]
    history_dir: Option<PathBuf>,

    /// Products per page (overrides CATALOG_PAGE_SIZE)
    #[arg(long)]
    page_size: Option<u32>,

    /// Quiet period before typed input is searched, in milliseconds
    #[arg(long)]
    debounce_ms: Option<u64>,

    /// Debug logging for this crate
    #[arg(short, long)]
    verbose: bool,
}

impl Cli {
    fn settings(&self) -> Result<ListingSettings> {
        let mut settings = ListingSettings::from_env()?;
        if let Some(api_base) = &self.api_base {
            settings.api_base_url = api_base.clone();
        }
        if let Some(dir) = &self.history_dir {
            settings.history_dir = dir.clone();
        }
        if let Some(page_size) = self.page_size {
            settings.page_size = page_size;
        }
        if let Some(ms) = self.debounce_ms {
            settings.debounce_delay = Duration::from_millis(ms);
        }
        settings.validate()?;
        Ok(settings)
    }
}

/// One line of terminal input
#[derive(Debug, Clone, PartialEq)]
enum ShellCommand {
    Listing(ListingCommand),
    Show(u64),
    Help,
    Quit,
}

fn parse_command(line: &str) -> Result<ShellCommand, String> {
    let line = line.trim();
    let (verb, rest) = line.split_once(' ').unwrap_or((line, ""));
    let rest = rest.trim();

    let command = match verb {
        // Raw input keeps its spacing; the controller trims on commit
        "type" => ListingCommand::Input(line.strip_prefix("type ").unwrap_or("").to_string()),
        "submit" => ListingCommand::Submit,
        "pick" if !rest.is_empty() => ListingCommand::SelectSuggestion(rest.to_string()),
        "page" => ListingCommand::SetPage(
            rest.parse()
                .map_err(|_| format!("invalid page number: {:?}", rest))?,
        ),
        "next" => ListingCommand::NextPage,
        "prev" => ListingCommand::PrevPage,
        "focus" => ListingCommand::FocusInput,
        "click" => ListingCommand::PointerDown(parse_point(rest)?),
        "refresh" => ListingCommand::Refresh,
        "show" => {
            return rest
                .parse()
                .map(ShellCommand::Show)
                .map_err(|_| format!("invalid product id: {:?}", rest))
        }
        "help" | "" => return Ok(ShellCommand::Help),
        "quit" | "exit" => return Ok(ShellCommand::Quit),
        other => return Err(format!("unknown command: {}", other)),
    };

    Ok(ShellCommand::Listing(command))
}

fn parse_point(rest: &str) -> Result<Point, String> {
    let mut coords = rest.split_whitespace().map(str::parse::<f64>);
    match (coords.next(), coords.next(), coords.next()) {
        (Some(Ok(x)), Some(Ok(y)), None) => Ok(Point::new(x, y)),
        _ => Err(format!("expected two coordinates, got {:?}", rest)),
    }
}

fn render_snapshot(snapshot: &ListingSnapshot) -> String {
    let state = &snapshot.state;
    let mut out = String::new();

    let scope = if state.committed_query.is_empty() {
        "all products".to_string()
    } else {
        format!("search \"{}\"", state.committed_query)
    };
    let _ = write!(
        out,
        "== {} | page {}/{} | {} total | {}",
        scope,
        state.page,
        snapshot.pagination.total_pages,
        state.total_count,
        state.status
    );
    if let Some(at) = state.last_loaded_at {
        let _ = write!(out, " at {}", at.format("%H:%M:%S"));
    }
    out.push('\n');

    match &state.status {
        FetchStatus::Loading => out.push_str("   loading...\n"),
        FetchStatus::Failed(reason) => {
            let _ = writeln!(out, "   {}", reason);
        }
        _ if state.is_empty_result() => out.push_str("   No products found\n"),
        _ => {
            for product in &state.results {
                let _ = writeln!(out, "   {}", render_product_line(product));
            }
        }
    }

    if !state.results.is_empty() || state.status.error().is_some() {
        let pagination = &snapshot.pagination;
        let pages: Vec<String> = pagination
            .visible_pages
            .iter()
            .map(|p| {
                if *p == pagination.current {
                    format!("[{}]", p)
                } else {
                    p.to_string()
                }
            })
            .collect();
        let _ = writeln!(
            out,
            "   {} {} {}",
            if pagination.has_prev { "< prev" } else { "      " },
            pages.join(" "),
            if pagination.has_next { "next >" } else { "" }
        );
    }

    if snapshot.suggestions_visible {
        let pick = |source: SuggestionSource| {
            snapshot
                .suggestions
                .iter()
                .filter(|entry| entry.source == source)
                .map(|entry| entry.term.as_str())
                .collect::<Vec<_>>()
                .join(", ")
        };
        if !snapshot.history.is_empty() {
            let _ = writeln!(out, "   previous searches: {}", pick(SuggestionSource::History));
        }
        let _ = writeln!(out, "   suggestions: {}", pick(SuggestionSource::Static));
    }

    out
}

fn render_product_line(product: &Product) -> String {
    format!(
        "#{:<4} {:<40} ${:>8.2}  rating {:.1}  stock {}",
        product.id, product.title, product.price, product.rating, product.stock
    )
}

fn render_product_details(product: &Product) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "== {} (#{})", product.title, product.id);
    if let Some(brand) = &product.brand {
        let _ = writeln!(out, "   brand: {}", brand);
    }
    let _ = writeln!(out, "   category: {}", product.category);
    let _ = writeln!(
        out,
        "   price: ${:.2} ({:.2}% off)",
        product.price, product.discount_percentage
    );
    let _ = writeln!(out, "   rating: {:.2} | stock: {}", product.rating, product.stock);
    let _ = writeln!(out, "   {}", product.description);
    let _ = writeln!(out, "   images: {}", product.images.len());
    out
}

async fn show_product(catalog: &HttpCatalogClient, id: u64) {
    match catalog.fetch_product(id).await {
        Ok(product) => print!("{}", render_product_details(&product)),
        Err(e) => {
            warn!(id, error = %e, "Product details fetch failed");
            println!("   Failed to fetch product details");
        }
    }
}

async fn read_commands(handle: ListingHandle, catalog: Arc<HttpCatalogClient>) -> Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    while let Some(line) = lines.next_line().await.context("Failed to read stdin")? {
        match parse_command(&line) {
            Ok(ShellCommand::Listing(command)) => handle.send(command).await?,
            Ok(ShellCommand::Show(id)) => show_product(&catalog, id).await,
            Ok(ShellCommand::Help) => println!("{}", HELP),
            Ok(ShellCommand::Quit) => break,
            Err(message) => println!("   {} (try 'help')", message),
        }
    }

    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let settings = cli.settings()?;
    let services = ListingServices::from_settings(&settings)?;

    let (controller, events) =
        build_controller(&settings, services.catalog.clone(), services.store.clone());
    let (handle, session) = spawn_session(controller, events);

    let mut snapshots = handle.subscribe();
    let renderer = tokio::spawn(async move {
        print!("{}", render_snapshot(&snapshots.borrow_and_update().clone()));
        while snapshots.changed().await.is_ok() {
            let snapshot = snapshots.borrow_and_update().clone();
            print!("{}", render_snapshot(&snapshot));
        }
    });

    println!("catalog-listing v{} (type 'help' for commands)", VERSION);
    read_commands(handle, services.catalog.clone()).await?;

    session.await.context("Listing session panicked")?;
    renderer.abort();
    Ok(())
}
