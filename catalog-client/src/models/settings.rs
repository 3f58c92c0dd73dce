// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

use crate::models::search::DEFAULT_PAGE_SIZE;
use crate::models::suggest::SelectionMode;
use anyhow::{anyhow, Context, Result};
use std::env;
use std::path::PathBuf;
use std::time::Duration;

/// Configuration for talking to the catalog backend
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Scheme and host of the catalog, e.g. `http://localhost:5000`
    pub base_url: String,
    pub search_path: String,
    pub typeahead_path: String,
    pub page_size: u64,
    pub search_type: String,
    pub csrf_token: String,
    /// Skip hits whose id has already been displayed
    pub dedup: bool,
    /// Persist seen ids to this JSON file instead of memory
    pub seen_store_path: Option<PathBuf>,
    pub selection_mode: SelectionMode,
    pub request_timeout: Duration,
}

impl ClientConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            search_path: "/search".to_string(),
            typeahead_path: "/typeahead".to_string(),
            page_size: DEFAULT_PAGE_SIZE,
            search_type: "kw".to_string(),
            csrf_token: String::new(),
            dedup: false,
            seen_store_path: None,
            selection_mode: SelectionMode::HashRoute,
            request_timeout: Duration::from_secs(10),
        }
    }

    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        let base_url = env::var("CATALOG_BASE_URL")
            .map_err(|_| anyhow!("CATALOG_BASE_URL environment variable not set"))?;
        Self::from_env_with_base(base_url)
    }

    /// Load every optional setting from the environment around a base URL
    /// supplied by the caller
    pub fn from_env_with_base(base_url: impl Into<String>) -> Result<Self> {
        let mut config = Self::new(base_url);

        if let Ok(path) = env::var("CATALOG_SEARCH_PATH") {
            config.search_path = path;
        }
        if let Ok(path) = env::var("CATALOG_TYPEAHEAD_PATH") {
            config.typeahead_path = path;
        }
        config.page_size = env::var("CATALOG_PAGE_SIZE")
            .ok()
            .and_then(|v| v.parse().ok())
            .filter(|size| *size > 0)
            .unwrap_or(DEFAULT_PAGE_SIZE);
        if let Ok(search_type) = env::var("CATALOG_SEARCH_TYPE") {
            config.search_type = search_type;
        }
        config.csrf_token = env::var("CATALOG_CSRF_TOKEN").unwrap_or_default();
        config.dedup = env::var("CATALOG_DEDUP")
            .unwrap_or_else(|_| "false".to_string())
            .parse()
            .unwrap_or(false);
        config.seen_store_path = env::var("CATALOG_SEEN_STORE_PATH").ok().map(PathBuf::from);
        if let Ok(mode) = env::var("CATALOG_SELECTION_MODE") {
            config.selection_mode = mode
                .parse()
                .context("Invalid CATALOG_SELECTION_MODE")?;
        }
        config.request_timeout = Duration::from_secs(
            env::var("CATALOG_REQUEST_TIMEOUT_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(10),
        );

        Ok(config)
    }

    /// Absolute URL for a backend path
    pub fn endpoint(&self, path: &str) -> Result<url::Url> {
        let base = if self.base_url.starts_with("http://") || self.base_url.starts_with("https://")
        {
            self.base_url.clone()
        } else {
            format!("http://{}", self.base_url)
        };
        let base = url::Url::parse(&base).with_context(|| format!("Invalid base URL: {}", base))?;
        base.join(path)
            .with_context(|| format!("Invalid endpoint path: {}", path))
    }
}
