// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Bounded polling while a freshly created object is still being created, and jitter for
//! requeue intervals.
//!
//! This is the only retry the engine performs itself. Every other retry happens because
//! the host calls the engine again after a requeue or error.

use crate::config::EngineConfig;
use crate::constants::MAX_POLL_DELAY_SECS;
use crate::context::EngineContext;
use crate::errors::{CloudError, ReconcileError};
use crate::identity::ResourceId;
use crate::kinds::{PollStrategy, ResourceKind};
use crate::lifecycle::LifecycleState;
use crate::metrics::record_poll_attempt;
use crate::reconcilers::remote::{RemoteCalls, OP_GET};
use rand::Rng;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::debug;

/// Delay schedule and attempt bound for the create poll.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PollPolicy {
    /// Fixed or exponential delays
    pub strategy: PollStrategy,
    /// Maximum number of Get calls; zero disables polling
    pub max_attempts: u32,
    /// Delay between attempts for [`PollStrategy::Fixed`]
    pub interval: Duration,
    /// Base for [`PollStrategy::Exponential`]
    pub base: u32,
}

impl PollPolicy {
    /// Build a policy for `strategy` from the engine configuration.
    #[must_use]
    pub fn new(strategy: PollStrategy, config: &EngineConfig) -> Self {
        Self {
            strategy,
            max_attempts: config.max_poll_attempts,
            interval: config.poll_interval,
            base: config.poll_backoff_base,
        }
    }

    /// Keep polling only while the object is in its "in creation" state.
    ///
    /// Active, failed and every other transitional state all stop the loop.
    #[must_use]
    pub fn should_retry<S: LifecycleState>(&self, state: S) -> bool {
        state.is_creating()
    }

    /// Delay before the given 1-based attempt.
    ///
    /// # Example
    ///
    /// ```rust
    /// use oci_reconciler::config::EngineConfig;
    /// use oci_reconciler::kinds::PollStrategy;
    /// use oci_reconciler::reconcilers::retry::PollPolicy;
    /// use std::time::Duration;
    ///
    /// let policy = PollPolicy::new(PollStrategy::Exponential, &EngineConfig::default());
    /// assert_eq!(policy.next_delay(1), Duration::from_secs(2));
    /// assert_eq!(policy.next_delay(3), Duration::from_secs(8));
    /// ```
    #[must_use]
    pub fn next_delay(&self, attempt: u32) -> Duration {
        match self.strategy {
            PollStrategy::Fixed => self.interval,
            PollStrategy::Exponential => {
                let secs = u64::from(self.base)
                    .checked_pow(attempt)
                    .map_or(MAX_POLL_DELAY_SECS, |secs| secs.min(MAX_POLL_DELAY_SECS));
                Duration::from_secs(secs)
            }
        }
    }
}

/// Re-read a created object until it leaves its creating state.
///
/// Returns the freshest observation. A 404 while polling is read as "not visible yet"
/// and polled again.
///
/// # Errors
///
/// Returns [`ReconcileError::PollTimeout`] if the object is still creating after
/// `max_attempts` reads, and [`ReconcileError::Cloud`] if a read fails or the pass is
/// cancelled.
pub async fn poll_while_creating<K: ResourceKind>(
    ctx: &EngineContext<K>,
    policy: &PollPolicy,
    id: &ResourceId,
    name: &str,
    initial: K::Remote,
    cancel: &CancellationToken,
) -> Result<K::Remote, ReconcileError> {
    let remote = RemoteCalls::new(ctx, cancel);
    let mut current = initial;

    for attempt in 1..=policy.max_attempts {
        let state = K::remote_state(&current);
        if !policy.should_retry(state) {
            return Ok(current);
        }

        let delay = policy.next_delay(attempt);
        debug!(
            kind = K::KIND,
            name,
            attempt,
            state = %state,
            delay = ?delay,
            "Waiting for remote object to finish creating"
        );
        tokio::select! {
            () = cancel.cancelled() => {
                return Err(ReconcileError::from_cloud(K::KIND, name, OP_GET, CloudError::Cancelled));
            }
            () = tokio::time::sleep(delay) => {}
        }

        record_poll_attempt(K::KIND);
        match remote.get(id).await {
            Ok(observed) => current = observed,
            Err(e) if e.is_not_found() => {
                debug!(kind = K::KIND, name, attempt, "Created object not visible yet");
            }
            Err(e) => return Err(ReconcileError::from_cloud(K::KIND, name, OP_GET, e)),
        }
    }

    let state = K::remote_state(&current);
    if policy.max_attempts > 0 && policy.should_retry(state) {
        return Err(ReconcileError::PollTimeout {
            kind: K::KIND,
            name: name.to_string(),
            attempts: policy.max_attempts,
            state: state.to_string(),
        });
    }
    Ok(current)
}

/// Apply randomization (jitter) to an interval.
///
/// The result lies within `interval ± interval * factor`. Intervals whose jittered
/// value does not fit a [`Duration`] are returned unchanged.
#[must_use]
pub fn apply_jitter(interval: Duration, factor: f64) -> Duration {
    if factor <= 0.0 || interval.is_zero() {
        return interval;
    }

    let secs = interval.as_secs_f64();
    let delta = secs * factor;
    let min = secs - delta;
    let max = secs + delta;

    let mut rng = rand::thread_rng();
    let jittered = rng.gen_range(min..=max);

    Duration::try_from_secs_f64(jittered.max(0.0)).unwrap_or(interval)
}

#[cfg(test)]
#[path = "retry_tests.rs"]
mod retry_tests;
