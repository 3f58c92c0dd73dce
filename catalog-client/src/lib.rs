// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

//! Client-side view layer of the library catalog search page: search state,
//! paginated searches, result mapping, fragment routing and typeahead.

pub mod app;
pub mod error;
pub mod models;
pub mod services;
