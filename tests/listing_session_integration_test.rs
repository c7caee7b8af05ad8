// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

use axum::extract::Query;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use catalog_listing::app::{build_controller, spawn_session, ListingCommand, ListingHandle};
use catalog_listing::models::query::FetchStatus;
use catalog_listing::models::settings::ListingSettings;
use catalog_listing::services::catalog::HttpCatalogClient;
use catalog_listing::services::controller::ListingSnapshot;
use catalog_listing::services::storage::{FileStore, KeyValueStore};
use serde::Deserialize;
use serde_json::{json, Value};
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::timeout;

const TOTAL: u64 = 23;

#[derive(Debug, Deserialize)]
struct PageParams {
    q: Option<String>,
    limit: u64,
    skip: u64,
}

fn products(ids: impl Iterator<Item = u64>, title: &str) -> Vec<Value> {
    ids.map(|id| json!({ "id": id, "title": format!("{} {}", title, id), "price": 1.0 }))
        .collect()
}

async fn list_products(Query(params): Query<PageParams>) -> Json<Value> {
    let end = (params.skip + params.limit).min(TOTAL);
    Json(json!({
        "products": products(params.skip + 1..=end, "Item"),
        "total": TOTAL,
        "skip": params.skip,
        "limit": params.limit
    }))
}

/// Three hits for any query except "broken", which fails
async fn search_products(Query(params): Query<PageParams>) -> impl IntoResponse {
    let q = params.q.unwrap_or_default();
    if q == "broken" {
        return StatusCode::INTERNAL_SERVER_ERROR.into_response();
    }
    Json(json!({
        "products": products(1..=3, &q),
        "total": 3,
        "skip": params.skip,
        "limit": params.limit
    }))
    .into_response()
}

async fn catalog_server() -> String {
    let router = Router::new()
        .route("/products", get(list_products))
        .route("/products/search", get(search_products));
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{}", addr)
}

fn settings(base: &str, history_dir: &Path) -> ListingSettings {
    ListingSettings {
        api_base_url: base.to_string(),
        debounce_delay: Duration::from_millis(50),
        history_dir: history_dir.to_path_buf(),
        ..ListingSettings::default()
    }
}

fn start(settings: &ListingSettings) -> (ListingHandle, JoinHandle<()>, Arc<FileStore>) {
    let catalog = Arc::new(
        HttpCatalogClient::new(&settings.api_base_url, settings.request_timeout).unwrap(),
    );
    let store = Arc::new(FileStore::open(&settings.history_dir).unwrap());
    let (controller, events) = build_controller(settings, catalog, store.clone());
    let (handle, task) = spawn_session(controller, events);
    (handle, task, store)
}

async fn wait_until(
    handle: &ListingHandle,
    condition: impl FnMut(&ListingSnapshot) -> bool,
) -> ListingSnapshot {
    let mut rx = handle.subscribe();
    let snapshot = timeout(Duration::from_secs(5), rx.wait_for(condition))
        .await
        .expect("session did not reach the expected state")
        .unwrap()
        .clone();
    snapshot
}

#[tokio::test]
async fn test_mount_then_paginate_against_http_catalog() {
    let base = catalog_server().await;
    let dir = tempfile::tempdir().unwrap();
    let (handle, task, _) = start(&settings(&base, dir.path()));

    let first = wait_until(&handle, |s| s.state.status == FetchStatus::Loaded).await;
    assert_eq!(first.state.total_count, TOTAL);
    assert_eq!(first.state.results.len(), 10);
    assert_eq!(first.pagination.total_pages, 3);
    assert_eq!(first.pagination.visible_pages, vec![1, 2, 3]);

    handle.send(ListingCommand::SetPage(3)).await.unwrap();
    let last = wait_until(&handle, |s| {
        s.state.page == 3 && s.state.status == FetchStatus::Loaded
    })
    .await;
    let ids: Vec<u64> = last.state.results.iter().map(|p| p.id).collect();
    assert_eq!(ids, vec![21, 22, 23]);
    assert!(!last.pagination.has_next);

    handle.send(ListingCommand::NextPage).await.unwrap();
    handle.send(ListingCommand::PrevPage).await.unwrap();
    let back = wait_until(&handle, |s| {
        s.state.page == 2 && s.state.status == FetchStatus::Loaded
    })
    .await;
    assert_eq!(back.state.results[0].id, 11);

    drop(handle);
    task.await.unwrap();
}

#[tokio::test]
async fn test_history_persists_across_sessions() {
    let base = catalog_server().await;
    let dir = tempfile::tempdir().unwrap();
    let settings = settings(&base, dir.path());

    let (handle, task, store) = start(&settings);
    wait_until(&handle, |s| s.state.status == FetchStatus::Loaded).await;

    for term in ["phone", "laptop", "shoes", "laptop", "beauty"] {
        handle
            .send(ListingCommand::SelectSuggestion(term.to_string()))
            .await
            .unwrap();
        wait_until(&handle, |s| {
            s.state.committed_query == term && s.state.status == FetchStatus::Loaded
        })
        .await;
    }

    let snapshot = handle.snapshot();
    assert_eq!(snapshot.history, vec!["beauty", "shoes", "laptop"]);
    assert_eq!(
        store.read("searchHistory").unwrap().as_deref(),
        Some(r#"["beauty","shoes","laptop"]"#)
    );

    drop(handle);
    task.await.unwrap();

    let (handle, task, _) = start(&settings);
    assert_eq!(handle.snapshot().history, vec!["beauty", "shoes", "laptop"]);
    drop(handle);
    task.await.unwrap();
}

#[tokio::test]
async fn test_typed_input_is_debounced_then_searched() {
    let base = catalog_server().await;
    let dir = tempfile::tempdir().unwrap();
    let settings = ListingSettings {
        debounce_delay: Duration::from_millis(300),
        ..settings(&base, dir.path())
    };
    let (handle, task, _) = start(&settings);
    wait_until(&handle, |s| s.state.status == FetchStatus::Loaded).await;

    for text in ["d", "de", "des", "desk "] {
        handle
            .send(ListingCommand::Input(text.to_string()))
            .await
            .unwrap();
    }

    let searched = wait_until(&handle, |s| {
        s.state.committed_query == "desk" && s.state.status == FetchStatus::Loaded
    })
    .await;
    assert_eq!(searched.state.raw_input, "desk ");
    assert_eq!(searched.state.total_count, 3);
    assert_eq!(searched.state.results[0].title, "desk 1");
    assert_eq!(searched.history, vec!["desk"]);

    drop(handle);
    task.await.unwrap();
}

#[tokio::test]
async fn test_failed_search_shows_error_and_skips_history() {
    let base = catalog_server().await;
    let dir = tempfile::tempdir().unwrap();
    let (handle, task, _) = start(&settings(&base, dir.path()));
    wait_until(&handle, |s| s.state.status == FetchStatus::Loaded).await;

    handle
        .send(ListingCommand::SelectSuggestion("broken".to_string()))
        .await
        .unwrap();
    let failed = wait_until(&handle, |s| s.state.status.error().is_some()).await;
    assert_eq!(failed.state.status.error(), Some("Failed to fetch products"));
    assert!(failed.state.results.is_empty());
    assert!(failed.history.is_empty());

    // Retrying through a valid search recovers
    handle
        .send(ListingCommand::SelectSuggestion("phone".to_string()))
        .await
        .unwrap();
    let recovered = wait_until(&handle, |s| {
        s.state.committed_query == "phone" && s.state.status == FetchStatus::Loaded
    })
    .await;
    assert_eq!(recovered.state.results.len(), 3);
    assert_eq!(recovered.history, vec!["phone"]);

    drop(handle);
    task.await.unwrap();
}
