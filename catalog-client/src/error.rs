// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

//! Error taxonomy for the catalog client.
//!
//! None of these errors is fatal to a page: every variant leaves the view in a
//! state from which a new query can be issued.

use thiserror::Error;

/// Message shown to the user when the search backend could not be reached.
pub const TRANSPORT_ERROR_MESSAGE: &str = "Search service unavailable, please try again";

#[derive(Error, Debug)]
pub enum CatalogError {
    /// The request never produced a usable response.
    #[error("transport error: {0}")]
    Transport(String),

    /// The backend answered with an explicit error message.
    #[error("{0}")]
    Application(String),

    /// The backend answered with a body we could not decode.
    #[error("decode error: {0}")]
    Decode(String),

    #[error("invalid route: {0}")]
    InvalidRoute(String),

    /// Seen-result store could not be read or written.
    #[error("store error: {0}")]
    Store(String),

    #[error("configuration error: {0}")]
    Config(String),
}

impl CatalogError {
    /// Text surfaced to the user as the flash / `last_error` message.
    pub fn user_message(&self) -> String {
        match self {
            CatalogError::Application(message) => message.clone(),
            CatalogError::Transport(_) | CatalogError::Decode(_) => {
                TRANSPORT_ERROR_MESSAGE.to_string()
            }
            other => other.to_string(),
        }
    }
}

impl From<reqwest::Error> for CatalogError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            CatalogError::Decode(e.to_string())
        } else {
            CatalogError::Transport(e.to_string())
        }
    }
}

impl From<serde_json::Error> for CatalogError {
    fn from(e: serde_json::Error) -> Self {
        CatalogError::Decode(e.to_string())
    }
}

impl From<std::io::Error> for CatalogError {
    fn from(e: std::io::Error) -> Self {
        CatalogError::Store(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, CatalogError>;
