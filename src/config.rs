// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Engine configuration.
//!
//! Defaults come from [`crate::constants`]; each value can be overridden through an
//! `OCI_RECONCILER_*` environment variable. Values that fail to parse are logged and
//! ignored so a typo never prevents the controller from starting.

use crate::constants::{
    DEFAULT_LIST_LIMIT, DEFAULT_MAX_POLL_ATTEMPTS, DEFAULT_POLL_BACKOFF_BASE,
    DEFAULT_POLL_INTERVAL_SECS, DEFAULT_REMOTE_CALL_TIMEOUT_SECS, ENV_LIST_LIMIT,
    ENV_MAX_POLL_ATTEMPTS, ENV_POLL_INTERVAL_SECS, ENV_REMOTE_CALL_TIMEOUT_SECS,
    ENV_REQUEUE_PENDING_SECS, ENV_REQUEUE_READY_SECS, ERROR_REQUEUE_DURATION_SECS,
    INVALID_REQUEST_REQUEUE_DURATION_SECS, MAX_CONFIGURED_INTERVAL_SECS,
    REQUEUE_WHEN_PENDING_SECS, REQUEUE_WHEN_READY_SECS,
};
use std::str::FromStr;
use std::time::Duration;
use tracing::warn;

/// Tunables shared by every reconcile pass.
#[derive(Clone, Debug, PartialEq)]
pub struct EngineConfig {
    /// Page size for display-name lookups
    pub list_limit: u32,
    /// Maximum Get calls issued by the create poll
    pub max_poll_attempts: u32,
    /// Delay between polls for kinds using the fixed policy
    pub poll_interval: Duration,
    /// Base of the exponential poll policy
    pub poll_backoff_base: u32,
    /// Upper bound for a single remote call
    pub remote_call_timeout: Duration,
    /// Requeue interval once a resource is active
    pub requeue_ready: Duration,
    /// Requeue interval while a resource is transitional
    pub requeue_pending: Duration,
    /// Requeue interval after a retryable error
    pub requeue_error: Duration,
    /// Requeue interval after the remote API rejected a request as invalid
    pub requeue_invalid: Duration,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            list_limit: DEFAULT_LIST_LIMIT,
            max_poll_attempts: DEFAULT_MAX_POLL_ATTEMPTS,
            poll_interval: Duration::from_secs(DEFAULT_POLL_INTERVAL_SECS),
            poll_backoff_base: DEFAULT_POLL_BACKOFF_BASE,
            remote_call_timeout: Duration::from_secs(DEFAULT_REMOTE_CALL_TIMEOUT_SECS),
            requeue_ready: Duration::from_secs(REQUEUE_WHEN_READY_SECS),
            requeue_pending: Duration::from_secs(REQUEUE_WHEN_PENDING_SECS),
            requeue_error: Duration::from_secs(ERROR_REQUEUE_DURATION_SECS),
            requeue_invalid: Duration::from_secs(INVALID_REQUEST_REQUEUE_DURATION_SECS),
        }
    }
}

impl EngineConfig {
    /// Build a configuration from the process environment.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a configuration from an arbitrary key lookup.
    ///
    /// Separated from [`EngineConfig::from_env`] so overrides can be tested without
    /// touching the process environment.
    #[must_use]
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(value) = parse_var::<u32, _>(&lookup, ENV_LIST_LIMIT) {
            config.list_limit = value.max(1);
        }
        if let Some(value) = parse_var::<u32, _>(&lookup, ENV_MAX_POLL_ATTEMPTS) {
            config.max_poll_attempts = value;
        }
        if let Some(value) = parse_var::<u64, _>(&lookup, ENV_POLL_INTERVAL_SECS) {
            config.poll_interval = Duration::from_secs(value.min(MAX_CONFIGURED_INTERVAL_SECS));
        }
        if let Some(value) = parse_var::<u64, _>(&lookup, ENV_REMOTE_CALL_TIMEOUT_SECS) {
            config.remote_call_timeout = Duration::from_secs(value.max(1));
        }
        if let Some(value) = parse_var::<u64, _>(&lookup, ENV_REQUEUE_READY_SECS) {
            config.requeue_ready = Duration::from_secs(value.min(MAX_CONFIGURED_INTERVAL_SECS));
        }
        if let Some(value) = parse_var::<u64, _>(&lookup, ENV_REQUEUE_PENDING_SECS) {
            config.requeue_pending = Duration::from_secs(value.min(MAX_CONFIGURED_INTERVAL_SECS));
        }

        config
    }
}

fn parse_var<T, F>(lookup: &F, key: &str) -> Option<T>
where
    T: FromStr,
    F: Fn(&str) -> Option<String>,
{
    let raw = lookup(key)?;
    match raw.trim().parse::<T>() {
        Ok(value) => Some(value),
        Err(_) => {
            warn!(variable = key, value = %raw, "Ignoring unparsable configuration override");
            None
        }
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod config_tests;
