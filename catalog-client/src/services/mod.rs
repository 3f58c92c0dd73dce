// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

pub mod logging;
pub mod mapper;
pub mod route;
pub mod search;
pub mod seen_store;
pub mod suggest;
