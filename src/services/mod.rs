// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

pub mod catalog;
pub mod controller;
pub mod debounce;
pub mod history;
pub mod logging;
pub mod pagination;
pub mod storage;
pub mod suggestions;
