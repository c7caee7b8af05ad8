// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

use serde::{Deserialize, Serialize};

/// Product as returned by the catalog API.
///
/// The listing never interprets these fields beyond `id`; they are carried
/// through to whatever renders the cards and detail view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: u64,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub price: f64,
    #[serde(default)]
    pub discount_percentage: f64,
    /// Average rating on a 0-5 scale
    #[serde(default)]
    pub rating: f64,
    #[serde(default)]
    pub stock: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub brand: Option<String>,
    #[serde(default)]
    pub thumbnail: String,
    #[serde(default)]
    pub images: Vec<String>,
    /// Any remaining fields (reviews, dimensions, ...) kept verbatim
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// One page of products from the browse or search endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductPage {
    /// Products on this page, in server order
    pub products: Vec<Product>,
    /// Total number of products matching the request across all pages
    pub total: u64,
    /// Offset the server applied
    #[serde(default)]
    pub skip: u64,
    /// Page size the server applied
    #[serde(default)]
    pub limit: u64,
}
