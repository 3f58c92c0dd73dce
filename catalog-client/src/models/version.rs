// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

use serde::{Deserialize, Serialize};

/// Printed by `catalog-client version`
#[derive(Debug, Serialize, Deserialize)]
pub struct VersionInfo {
    pub client: String,
    pub version: String,
    pub search_endpoint: Option<String>,
}
