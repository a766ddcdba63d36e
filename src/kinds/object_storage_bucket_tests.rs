// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Unit tests for `object_storage_bucket.rs`

#[cfg(test)]
mod tests {
    use crate::crd::ObjectStorageBucketSpec;
    use crate::identity::{CompositeId, IdentifierStyle, ResourceId};
    use crate::kinds::object_storage_bucket::*;
    use crate::kinds::ResourceKind;
    use crate::lifecycle::{LifecycleClass, LifecycleState};
    use std::collections::BTreeMap;

    fn spec() -> ObjectStorageBucketSpec {
        ObjectStorageBucketSpec {
            id: None,
            compartment_id: "ocid1.compartment.oc1..data".to_string(),
            namespace: Some("axaxnpcrorw5".to_string()),
            name: "logs".to_string(),
            storage_tier: None,
            public_access_type: None,
            versioning: None,
            freeform_tags: None,
        }
    }

    fn remote() -> RemoteBucket {
        RemoteBucket {
            namespace: "axaxnpcrorw5".to_string(),
            name: "logs".to_string(),
            compartment_id: "ocid1.compartment.oc1..data".to_string(),
            storage_tier: Some("Standard".to_string()),
            public_access_type: Some("NoPublicAccess".to_string()),
            versioning: Some("Disabled".to_string()),
            etag: None,
            freeform_tags: BTreeMap::new(),
        }
    }

    #[test]
    fn test_identifier_is_composite() {
        assert_eq!(ObjectStorageBucketKind::IDENTIFIER, IdentifierStyle::Composite);
        assert!(ObjectStorageBucketKind::NAMESPACED);
    }

    #[test]
    fn test_remote_id_is_namespace_and_name() {
        let id = ObjectStorageBucketKind::remote_id(&remote()).unwrap();
        assert_eq!(id.to_string(), "axaxnpcrorw5/logs");
        assert_eq!(
            id,
            ResourceId::Composite(CompositeId::new("axaxnpcrorw5", "logs").unwrap())
        );
    }

    #[test]
    fn test_remote_id_requires_namespace() {
        let mut remote = remote();
        remote.namespace.clear();
        assert!(ObjectStorageBucketKind::remote_id(&remote).is_none());
    }

    #[test]
    fn test_buckets_are_always_active() {
        assert_eq!(BucketState::ALL.len(), 2);
        assert_eq!(
            ObjectStorageBucketKind::remote_state(&remote()).class(),
            LifecycleClass::Active
        );
        assert!(!BucketState::Available.is_creating());
    }

    #[test]
    fn test_versioning_change_needs_update() {
        let mut spec = spec();
        assert!(!ObjectStorageBucketKind::needs_update(&spec, &remote()));

        spec.versioning = Some("Enabled".to_string());
        assert!(ObjectStorageBucketKind::needs_update(&spec, &remote()));
    }

    #[test]
    fn test_storage_tier_is_create_only() {
        let mut spec = spec();
        spec.storage_tier = Some("Archive".to_string());
        assert!(!ObjectStorageBucketKind::needs_update(&spec, &remote()));
    }

    #[test]
    fn test_create_details_requires_namespace() {
        let mut spec = spec();
        spec.namespace = None;
        let err = ObjectStorageBucketKind::create_details(&spec).unwrap_err();
        assert!(err.to_string().contains("namespace"));
    }

    #[test]
    fn test_create_details_rejects_slash_in_name() {
        let mut spec = spec();
        spec.name = "logs/2025".to_string();
        assert!(ObjectStorageBucketKind::create_details(&spec).is_err());
    }

    #[test]
    fn test_namespace_can_be_cached() {
        let mut spec = spec();
        spec.namespace = Some(String::new());
        assert_eq!(ObjectStorageBucketKind::namespace(&spec), None);

        ObjectStorageBucketKind::set_namespace(&mut spec, "resolved".to_string());
        assert_eq!(ObjectStorageBucketKind::namespace(&spec), Some("resolved"));
    }

    #[test]
    fn test_credentials() {
        let secret = ObjectStorageBucketKind::credentials(&spec(), &remote());
        assert_eq!(secret.get(SECRET_KEY_NAMESPACE), Some(&b"axaxnpcrorw5".to_vec()));
        assert_eq!(secret.get(SECRET_KEY_BUCKET_NAME), Some(&b"logs".to_vec()));
        assert_eq!(
            secret.get(SECRET_KEY_URI),
            Some(&b"oci://logs@axaxnpcrorw5/".to_vec())
        );
    }
}
