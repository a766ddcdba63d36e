// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Unit tests for `deletion.rs`

#[cfg(test)]
mod tests {
    use crate::crd::{ObjectStorageBucketSpec, OpenSearchClusterSpec, QueueSpec, ResourceStatus};
    use crate::errors::{CloudError, ReconcileError};
    use crate::kinds::{ObjectStorageBucketKind, OpenSearchClusterKind, QueueKind};
    use crate::reconcilers::deletion::delete;
    use crate::reconcilers::engine::ObjectRef;
    use crate::reconcilers::test_support::{context, Call, MemorySecretStore, StubClient};
    use std::collections::BTreeMap;
    use std::sync::Arc;
    use tokio_util::sync::CancellationToken;

    const OBJECT: ObjectRef<'static> = ObjectRef {
        name: "orders",
        namespace: "apps",
    };

    fn queue_spec(id: Option<&str>) -> QueueSpec {
        QueueSpec {
            id: id.map(str::to_string),
            compartment_id: "ocid1.compartment.oc1..apps".to_string(),
            display_name: "orders".to_string(),
            retention_in_seconds: None,
            visibility_in_seconds: None,
            timeout_in_seconds: None,
            dead_letter_queue_delivery_count: None,
            custom_encryption_key_id: None,
            freeform_tags: None,
        }
    }

    fn recorded(id: &str) -> ResourceStatus {
        ResourceStatus {
            remote_id: Some(id.to_string()),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_nothing_recorded_makes_no_calls() {
        let client = Arc::new(StubClient::<QueueKind>::new());
        let secrets = Arc::new(MemorySecretStore::new());
        let ctx = context(&client, &secrets);
        let status = ResourceStatus {
            remote_id: Some(String::new()),
            ..Default::default()
        };

        let done = delete(&ctx, OBJECT, &queue_spec(Some("")), &status, &CancellationToken::new())
            .await
            .unwrap();

        assert!(done);
        assert!(client.calls().is_empty());
        assert_eq!(secrets.delete_count(), 0);
    }

    #[tokio::test]
    async fn test_delete_twice_is_idempotent() {
        let client = Arc::new(StubClient::<QueueKind>::new());
        client
            .on_delete(Ok(()))
            .on_delete(Err(CloudError::NotFound {
                message: "gone".to_string(),
            }));
        let secrets = Arc::new(MemorySecretStore::new());
        secrets.insert("orders", "apps", BTreeMap::new());
        let ctx = context(&client, &secrets);
        let status = recorded("r-1");
        let cancel = CancellationToken::new();

        let first = delete(&ctx, OBJECT, &queue_spec(None), &status, &cancel).await;
        let second = delete(&ctx, OBJECT, &queue_spec(None), &status, &cancel).await;

        assert_eq!(first, Ok(true));
        assert_eq!(second, Ok(true));
        assert_eq!(
            client.calls(),
            vec![Call::Delete("r-1".to_string()), Call::Delete("r-1".to_string())]
        );
        assert!(secrets.data("orders", "apps").is_none());
    }

    #[tokio::test]
    async fn test_explicit_identifier_is_deleted() {
        let client = Arc::new(StubClient::<QueueKind>::new());
        let secrets = Arc::new(MemorySecretStore::new());
        let ctx = context(&client, &secrets);

        delete(
            &ctx,
            OBJECT,
            &queue_spec(Some("ocid1.queue.oc1..explicit")),
            &ResourceStatus::default(),
            &CancellationToken::new(),
        )
        .await
        .unwrap();

        assert_eq!(
            client.calls(),
            vec![Call::Delete("ocid1.queue.oc1..explicit".to_string())]
        );
    }

    #[tokio::test]
    async fn test_propagating_kind_returns_delete_error() {
        let client = Arc::new(StubClient::<QueueKind>::new());
        client.on_delete(Err(CloudError::from_status(409, "queue busy")));
        let secrets = Arc::new(MemorySecretStore::new());
        secrets.insert("orders", "apps", BTreeMap::new());
        let ctx = context(&client, &secrets);

        let err = delete(
            &ctx,
            OBJECT,
            &queue_spec(None),
            &recorded("r-1"),
            &CancellationToken::new(),
        )
        .await
        .unwrap_err();

        assert!(matches!(err, ReconcileError::Cloud { operation: "delete", .. }));
        assert!(secrets.data("orders", "apps").is_some());
    }

    fn opensearch_spec() -> OpenSearchClusterSpec {
        OpenSearchClusterSpec {
            id: None,
            compartment_id: "ocid1.compartment.oc1..apps".to_string(),
            display_name: "search".to_string(),
            software_version: "2.11.0".to_string(),
            master_node_count: 3,
            master_node_host_type: "FLEX".to_string(),
            master_node_host_ocpu_count: 1,
            master_node_host_memory_gb: 20,
            data_node_count: 3,
            data_node_host_type: "FLEX".to_string(),
            data_node_host_ocpu_count: 2,
            data_node_host_memory_gb: 30,
            data_node_storage_gb: 50,
            opendashboard_node_count: 1,
            opendashboard_node_host_ocpu_count: 1,
            opendashboard_node_host_memory_gb: 8,
            vcn_id: "ocid1.vcn.oc1..main".to_string(),
            subnet_id: "ocid1.subnet.oc1..private".to_string(),
            vcn_compartment_id: "ocid1.compartment.oc1..net".to_string(),
            subnet_compartment_id: "ocid1.compartment.oc1..net".to_string(),
            freeform_tags: None,
        }
    }

    #[tokio::test]
    async fn test_swallowing_kind_releases_on_delete_error() {
        let client = Arc::new(StubClient::<OpenSearchClusterKind>::new());
        client.on_delete(Err(CloudError::from_status(500, "internal")));
        let secrets = Arc::new(MemorySecretStore::new());
        let ctx = context(&client, &secrets);

        let done = delete(
            &ctx,
            OBJECT,
            &opensearch_spec(),
            &recorded("ocid1.opensearchcluster.oc1..search"),
            &CancellationToken::new(),
        )
        .await
        .unwrap();

        assert!(done);
        assert_eq!(secrets.delete_count(), 1);
    }

    #[tokio::test]
    async fn test_cancellation_propagates_even_when_swallowing() {
        let client = Arc::new(StubClient::<OpenSearchClusterKind>::new());
        let secrets = Arc::new(MemorySecretStore::new());
        let ctx = context(&client, &secrets);
        let cancel = CancellationToken::new();
        cancel.cancel();

        let err = delete(
            &ctx,
            OBJECT,
            &opensearch_spec(),
            &recorded("ocid1.opensearchcluster.oc1..search"),
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
    }

    fn bucket_spec() -> ObjectStorageBucketSpec {
        ObjectStorageBucketSpec {
            id: None,
            compartment_id: "ocid1.compartment.oc1..apps".to_string(),
            namespace: Some("ns1".to_string()),
            name: "bucket1".to_string(),
            storage_tier: None,
            public_access_type: None,
            versioning: None,
            freeform_tags: None,
        }
    }

    #[tokio::test]
    async fn test_malformed_composite_identifier_is_tolerated() {
        let client = Arc::new(StubClient::<ObjectStorageBucketKind>::new());
        let secrets = Arc::new(MemorySecretStore::new());
        let ctx = context(&client, &secrets);

        let done = delete(
            &ctx,
            OBJECT,
            &bucket_spec(),
            &recorded("invalid"),
            &CancellationToken::new(),
        )
        .await
        .unwrap();

        assert!(done);
        assert!(client.calls().is_empty());
    }

    #[tokio::test]
    async fn test_composite_identifier_is_passed_through() {
        let client = Arc::new(StubClient::<ObjectStorageBucketKind>::new());
        let secrets = Arc::new(MemorySecretStore::new());
        let ctx = context(&client, &secrets);

        delete(
            &ctx,
            OBJECT,
            &bucket_spec(),
            &recorded("ns1/bucket1"),
            &CancellationToken::new(),
        )
        .await
        .unwrap();

        assert_eq!(client.calls(), vec![Call::Delete("ns1/bucket1".to_string())]);
    }

    #[tokio::test]
    async fn test_secret_delete_failure_does_not_block() {
        let client = Arc::new(StubClient::<QueueKind>::new());
        let secrets = Arc::new(MemorySecretStore::new());
        let ctx = context(&client, &secrets);

        // No secret exists; the store answers NotFound.
        let done = delete(
            &ctx,
            OBJECT,
            &queue_spec(None),
            &recorded("r-1"),
            &CancellationToken::new(),
        )
        .await
        .unwrap();

        assert!(done);
        assert_eq!(secrets.delete_count(), 1);
    }
}
