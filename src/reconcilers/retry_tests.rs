// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Unit tests for `retry.rs`

#[cfg(test)]
mod tests {
    use crate::config::EngineConfig;
    use crate::constants::MAX_POLL_DELAY_SECS;
    use crate::errors::{CloudError, ReconcileError};
    use crate::identity::ResourceId;
    use crate::kinds::api_gateway_deployment::{DeploymentState, RemoteDeployment};
    use crate::kinds::nat_gateway::NatGatewayState;
    use crate::kinds::{ApiGatewayDeploymentKind, PollStrategy};
    use crate::lifecycle::LifecycleState;
    use crate::reconcilers::retry::*;
    use crate::reconcilers::test_support::{context, Call, MemorySecretStore, StubClient};
    use std::sync::Arc;
    use std::time::Duration;
    use tokio_util::sync::CancellationToken;

    fn policy(strategy: PollStrategy) -> PollPolicy {
        PollPolicy::new(strategy, &EngineConfig::default())
    }

    #[test]
    fn test_policy_takes_config_values() {
        let config = EngineConfig {
            max_poll_attempts: 7,
            poll_interval: Duration::from_secs(3),
            poll_backoff_base: 3,
            ..EngineConfig::default()
        };
        let policy = PollPolicy::new(PollStrategy::Fixed, &config);

        assert_eq!(policy.max_attempts, 7);
        assert_eq!(policy.interval, Duration::from_secs(3));
        assert_eq!(policy.base, 3);
    }

    #[test]
    fn test_fixed_delay_is_constant() {
        let policy = policy(PollStrategy::Fixed);
        let interval = EngineConfig::default().poll_interval;

        assert_eq!(policy.next_delay(1), interval);
        assert_eq!(policy.next_delay(4), interval);
    }

    #[test]
    fn test_exponential_delay_grows_and_caps() {
        let policy = policy(PollStrategy::Exponential);

        assert_eq!(policy.next_delay(1), Duration::from_secs(2));
        assert_eq!(policy.next_delay(2), Duration::from_secs(4));
        assert_eq!(policy.next_delay(5), Duration::from_secs(32));
        assert_eq!(policy.next_delay(10), Duration::from_secs(MAX_POLL_DELAY_SECS));
        assert_eq!(policy.next_delay(200), Duration::from_secs(MAX_POLL_DELAY_SECS));
    }

    #[test]
    fn test_only_creating_state_retries() {
        let policy = policy(PollStrategy::Fixed);

        for state in NatGatewayState::ALL {
            assert_eq!(
                policy.should_retry(*state),
                *state == NatGatewayState::Provisioning,
                "{state}"
            );
        }
    }

    #[test]
    fn test_jitter_stays_within_bounds() {
        let interval = Duration::from_secs(100);
        for _ in 0..100 {
            let jittered = apply_jitter(interval, 0.1);
            assert!(jittered >= Duration::from_secs(90));
            assert!(jittered <= Duration::from_secs(110));
        }
    }

    #[test]
    fn test_zero_jitter_is_identity() {
        let interval = Duration::from_secs(30);
        assert_eq!(apply_jitter(interval, 0.0), interval);
        assert_eq!(apply_jitter(Duration::ZERO, 0.1), Duration::ZERO);
    }

    #[test]
    fn test_jitter_near_duration_max_does_not_overflow() {
        let interval = Duration::from_secs(u64::MAX);
        for _ in 0..64 {
            let jittered = apply_jitter(interval, 0.1);
            assert!(jittered >= Duration::from_secs_f64(u64::MAX as f64 * 0.9));
        }
        assert!(apply_jitter(Duration::MAX, 0.5) >= Duration::MAX / 2);
    }

    fn deployment(state: DeploymentState) -> RemoteDeployment {
        serde_json::from_value(serde_json::json!({
            "id": "ocid1.apideployment.oc1..v1",
            "compartmentId": "ocid1.compartment.oc1..apps",
            "displayName": "v1",
            "gatewayId": "ocid1.apigateway.oc1..gw",
            "pathPrefix": "/v1",
            "lifecycleState": state.label(),
        }))
        .unwrap()
    }

    fn deployment_id() -> ResourceId {
        ResourceId::Opaque("ocid1.apideployment.oc1..v1".to_string())
    }

    #[tokio::test(start_paused = true)]
    async fn test_poll_uses_exponential_schedule() {
        let client = Arc::new(StubClient::<ApiGatewayDeploymentKind>::new());
        client
            .on_get(Ok(deployment(DeploymentState::Creating)))
            .on_get(Ok(deployment(DeploymentState::Creating)))
            .on_get(Ok(deployment(DeploymentState::Active)));
        let secrets = Arc::new(MemorySecretStore::new());
        let ctx = context(&client, &secrets);
        let policy = PollPolicy::new(PollStrategy::Exponential, &ctx.config);

        let start = tokio::time::Instant::now();
        let settled = poll_while_creating(
            &ctx,
            &policy,
            &deployment_id(),
            "v1",
            deployment(DeploymentState::Creating),
            &CancellationToken::new(),
        )
        .await
        .unwrap();

        assert_eq!(settled.lifecycle_state, DeploymentState::Active);
        assert_eq!(client.count(|c| matches!(c, Call::Get(_))), 3);
        assert_eq!(start.elapsed(), Duration::from_secs(2 + 4 + 8));
    }

    #[tokio::test(start_paused = true)]
    async fn test_poll_stops_on_failure_state() {
        let client = Arc::new(StubClient::<ApiGatewayDeploymentKind>::new());
        client.on_get(Ok(deployment(DeploymentState::Failed)));
        let secrets = Arc::new(MemorySecretStore::new());
        let ctx = context(&client, &secrets);
        let policy = PollPolicy::new(PollStrategy::Exponential, &ctx.config);

        let settled = poll_while_creating(
            &ctx,
            &policy,
            &deployment_id(),
            "v1",
            deployment(DeploymentState::Creating),
            &CancellationToken::new(),
        )
        .await
        .unwrap();

        assert_eq!(settled.lifecycle_state, DeploymentState::Failed);
        assert_eq!(client.count(|c| matches!(c, Call::Get(_))), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_poll_tolerates_not_yet_visible_object() {
        let client = Arc::new(StubClient::<ApiGatewayDeploymentKind>::new());
        client
            .on_get(Err(CloudError::NotFound {
                message: "not yet".to_string(),
            }))
            .on_get(Ok(deployment(DeploymentState::Active)));
        let secrets = Arc::new(MemorySecretStore::new());
        let ctx = context(&client, &secrets);
        let policy = PollPolicy::new(PollStrategy::Exponential, &ctx.config);

        let settled = poll_while_creating(
            &ctx,
            &policy,
            &deployment_id(),
            "v1",
            deployment(DeploymentState::Creating),
            &CancellationToken::new(),
        )
        .await
        .unwrap();

        assert_eq!(settled.lifecycle_state, DeploymentState::Active);
    }

    #[tokio::test(start_paused = true)]
    async fn test_poll_surfaces_read_errors() {
        let client = Arc::new(StubClient::<ApiGatewayDeploymentKind>::new());
        client.on_get(Err(CloudError::from_status(500, "internal")));
        let secrets = Arc::new(MemorySecretStore::new());
        let ctx = context(&client, &secrets);
        let policy = PollPolicy::new(PollStrategy::Exponential, &ctx.config);

        let err = poll_while_creating(
            &ctx,
            &policy,
            &deployment_id(),
            "v1",
            deployment(DeploymentState::Creating),
            &CancellationToken::new(),
        )
        .await
        .unwrap_err();

        assert!(matches!(err, ReconcileError::Cloud { operation: "get", .. }));
    }

    #[tokio::test(start_paused = true)]
    async fn test_poll_sleep_is_cancellable() {
        let client = Arc::new(StubClient::<ApiGatewayDeploymentKind>::new());
        let secrets = Arc::new(MemorySecretStore::new());
        let ctx = context(&client, &secrets);
        let policy = PollPolicy::new(PollStrategy::Exponential, &ctx.config);
        let cancel = CancellationToken::new();
        cancel.cancel();

        let err = poll_while_creating(
            &ctx,
            &policy,
            &deployment_id(),
            "v1",
            deployment(DeploymentState::Creating),
            &cancel,
        )
        .await
        .unwrap_err();

        assert!(matches!(
            err,
            ReconcileError::Cloud {
                source: CloudError::Cancelled,
                ..
            }
        ));
        assert!(client.calls().is_empty());
    }
}
