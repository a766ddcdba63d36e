// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Logging initialisation for processes hosting the reconciler.
//!
//! Format: timestamp file:line LEVEL message
//! Example: 2025-11-29T23:45:00.123456Z engine.rs:49 INFO Reconciling Queue apps/orders
//!
//! Respects the `RUST_LOG` environment variable if set, otherwise defaults to INFO level.
//! Respects the `RUST_LOG_FORMAT` environment variable for output format (`text` or `json`).

use crate::constants::ENV_LOG_FORMAT;

/// Output format for log lines.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LogFormat {
    /// Compact, human readable, ANSI coloured
    Text,
    /// One JSON object per line
    Json,
}

impl LogFormat {
    /// Parse a `RUST_LOG_FORMAT` value. Anything other than `json` means text.
    #[must_use]
    pub fn parse(value: &str) -> Self {
        if value.trim().eq_ignore_ascii_case("json") {
            Self::Json
        } else {
            Self::Text
        }
    }

    /// Read the format from `RUST_LOG_FORMAT`.
    #[must_use]
    pub fn from_env() -> Self {
        std::env::var(ENV_LOG_FORMAT).map_or(Self::Text, |value| Self::parse(&value))
    }
}

/// Install the global `tracing` subscriber.
///
/// # Errors
///
/// Returns an error if a global subscriber has already been installed.
pub fn init_tracing(format: LogFormat) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    match format {
        LogFormat::Json => tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_file(true)
            .with_line_number(true)
            .with_thread_names(true)
            .with_target(false)
            .json()
            .try_init(),
        LogFormat::Text => tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_file(true)
            .with_line_number(true)
            .with_thread_names(true)
            .with_target(false)
            .with_ansi(true)
            .compact()
            .try_init(),
    }
}
