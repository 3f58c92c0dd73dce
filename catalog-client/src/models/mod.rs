// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

pub mod route;
pub mod search;
pub mod settings;
pub mod suggest;
pub mod version;
