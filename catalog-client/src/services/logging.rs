// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

//! Logging setup and redaction of sensitive values.

use tracing_subscriber::EnvFilter;

/// Install the global tracing subscriber.
/// `RUST_LOG` takes precedence over `default_level`.
pub fn init_logging(default_level: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    // A subscriber may already be installed (tests, embedding callers).
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}

/// Mask a CSRF token for logging.
/// Shows the first four characters: "a1b2***"
pub fn mask_token(token: &str) -> String {
    if token.is_empty() {
        return "<none>".to_string();
    }
    let visible: String = token.chars().take(4).collect();
    if visible.len() == token.len() {
        // Too short to reveal anything
        "***".to_string()
    } else {
        format!("{}***", visible)
    }
}
