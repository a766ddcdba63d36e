// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Unit tests for `controller.rs`

#[cfg(test)]
mod tests {
    use crate::config::EngineConfig;
    use crate::constants::{ENV_REQUEUE_READY_SECS, MAX_CONFIGURED_INTERVAL_SECS};
    use crate::controller::{outcome_to_action, requeue_after_error, requeue_interval, Error};
    use crate::errors::{CloudError, ReconcileError};
    use crate::reconcilers::ReconcileOutcome;
    use kube::runtime::controller::Action;
    use std::time::Duration;

    #[test]
    fn test_ready_requeues_after_ready_interval() {
        let config = EngineConfig::default();
        assert_eq!(
            requeue_interval(&ReconcileOutcome::READY, &config),
            Some(config.requeue_ready)
        );
    }

    #[test]
    fn test_pending_requeues_after_pending_interval() {
        let config = EngineConfig::default();
        assert_eq!(
            requeue_interval(&ReconcileOutcome::PENDING, &config),
            Some(config.requeue_pending)
        );
        assert!(config.requeue_pending < config.requeue_ready);
    }

    #[test]
    fn test_remote_failure_waits_for_change() {
        let config = EngineConfig::default();

        assert_eq!(requeue_interval(&ReconcileOutcome::FAILED, &config), None);
        assert_eq!(
            outcome_to_action(&ReconcileOutcome::FAILED, &config),
            Action::await_change()
        );
    }

    #[test]
    fn test_zero_interval_is_not_jittered() {
        let config = EngineConfig {
            requeue_ready: Duration::ZERO,
            ..EngineConfig::default()
        };

        assert_eq!(
            outcome_to_action(&ReconcileOutcome::READY, &config),
            Action::requeue(Duration::ZERO)
        );
    }

    #[test]
    fn test_invalid_spec_uses_longer_interval() {
        let config = EngineConfig::default();
        let err = Error::from(ReconcileError::InvalidSpec {
            kind: "Queue",
            name: "orders".to_string(),
            reason: "compartmentId must not be empty".to_string(),
        });

        assert!(err.is_invalid_request());
        assert_eq!(requeue_after_error(&err, &config), config.requeue_invalid);
    }

    #[test]
    fn test_bad_request_uses_longer_interval() {
        let config = EngineConfig::default();
        let err = Error::from(ReconcileError::from_cloud(
            "Queue",
            "orders",
            "create",
            CloudError::from_status(400, "retention out of range"),
        ));

        assert_eq!(requeue_after_error(&err, &config), config.requeue_invalid);
    }

    #[test]
    fn test_server_error_uses_error_interval() {
        let config = EngineConfig::default();
        let err = Error::from(ReconcileError::from_cloud(
            "Queue",
            "orders",
            "get",
            CloudError::from_status(503, "unavailable"),
        ));

        assert!(!err.is_invalid_request());
        assert_eq!(requeue_after_error(&err, &config), config.requeue_error);
    }

    #[test]
    fn test_kube_error_uses_error_interval() {
        let config = EngineConfig::default();
        let err = Error::from(anyhow::anyhow!("status patch rejected"));

        assert_eq!(requeue_after_error(&err, &config), config.requeue_error);
        assert_eq!(err.to_string(), "status patch rejected");
    }

    #[test]
    fn test_huge_requeue_override_is_scheduled_without_panicking() {
        let config = EngineConfig::from_lookup(|key| {
            (key == ENV_REQUEUE_READY_SECS).then(|| u64::MAX.to_string())
        });
        let ceiling = Duration::from_secs(MAX_CONFIGURED_INTERVAL_SECS);

        assert_eq!(config.requeue_ready, ceiling);
        for _ in 0..64 {
            assert_ne!(
                outcome_to_action(&ReconcileOutcome::READY, &config),
                Action::await_change()
            );
        }
    }
}
