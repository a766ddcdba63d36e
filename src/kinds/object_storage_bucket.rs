// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Object storage buckets.
//!
//! Buckets have no opaque identifier and no lifecycle: a bucket that exists is usable.
//! They are addressed as `namespace/name`, where the namespace is the tenancy's object
//! storage namespace. When the spec omits the namespace the engine resolves it once and
//! caches it in the spec.
//!
//! The secret carries `namespace`, `bucketName` and an `oci://` `uri`.

use super::{credential_map, invalid_spec, DeletePolicy, ResourceKind};
use crate::constants::KIND_OBJECT_STORAGE_BUCKET;
use crate::crd::{ObjectStorageBucket, ObjectStorageBucketSpec, ResourceStatus};
use crate::errors::ReconcileError;
use crate::identity::{CompositeId, IdentifierStyle, ResourceId};
use crate::labels::FINALIZER_OBJECT_STORAGE_BUCKET;
use crate::predicate::{string_differs, tags_differ};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

crate::lifecycle_states! {
    /// Buckets report no lifecycle; every observed bucket is available.
    BucketState {
        Available => "AVAILABLE": Active,
    }
    creating = [];
    live = [Available];
}

/// Secret key holding the object storage namespace.
pub const SECRET_KEY_NAMESPACE: &str = "namespace";

/// Secret key holding the bucket name.
pub const SECRET_KEY_BUCKET_NAME: &str = "bucketName";

/// Secret key holding the `oci://bucket@namespace/` URI.
pub const SECRET_KEY_URI: &str = "uri";

const MAX_BUCKET_NAME_LEN: usize = 256;

/// A bucket as returned by the remote API.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoteBucket {
    pub namespace: String,
    pub name: String,
    pub compartment_id: String,
    #[serde(default)]
    pub storage_tier: Option<String>,
    #[serde(default)]
    pub public_access_type: Option<String>,
    #[serde(default)]
    pub versioning: Option<String>,
    #[serde(default)]
    pub etag: Option<String>,
    #[serde(default)]
    pub freeform_tags: BTreeMap<String, String>,
}

/// A bucket list entry.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BucketSummary {
    pub namespace: String,
    pub name: String,
    pub compartment_id: String,
}

/// Body of a create bucket call.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateBucketDetails {
    pub namespace: String,
    pub name: String,
    pub compartment_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub storage_tier: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub public_access_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub versioning: Option<String>,
    pub freeform_tags: BTreeMap<String, String>,
}

/// Body of an update bucket call. The storage tier is fixed at creation.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateBucketDetails {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub public_access_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub versioning: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub freeform_tags: Option<BTreeMap<String, String>>,
}

fn valid_bucket_name(name: &str) -> bool {
    !name.is_empty()
        && name.len() <= MAX_BUCKET_NAME_LEN
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
}

/// [`ResourceKind`] implementation for [`ObjectStorageBucket`].
pub struct ObjectStorageBucketKind;

impl ResourceKind for ObjectStorageBucketKind {
    type Resource = ObjectStorageBucket;
    type Spec = ObjectStorageBucketSpec;
    type Remote = RemoteBucket;
    type Summary = BucketSummary;
    type CreateDetails = CreateBucketDetails;
    type UpdateDetails = UpdateBucketDetails;
    type State = BucketState;

    const KIND: &'static str = KIND_OBJECT_STORAGE_BUCKET;
    const FINALIZER: &'static str = FINALIZER_OBJECT_STORAGE_BUCKET;
    const IDENTIFIER: IdentifierStyle = IdentifierStyle::Composite;
    const DELETE_POLICY: DeletePolicy = DeletePolicy::Propagate;
    const NAMESPACED: bool = true;

    fn spec(resource: &ObjectStorageBucket) -> &ObjectStorageBucketSpec {
        &resource.spec
    }

    fn spec_mut(resource: &mut ObjectStorageBucket) -> &mut ObjectStorageBucketSpec {
        &mut resource.spec
    }

    fn status(resource: &ObjectStorageBucket) -> Option<&ResourceStatus> {
        resource.status.as_ref()
    }

    fn status_mut(resource: &mut ObjectStorageBucket) -> &mut Option<ResourceStatus> {
        &mut resource.status
    }

    fn display_name(spec: &ObjectStorageBucketSpec) -> &str {
        &spec.name
    }

    fn compartment_id(spec: &ObjectStorageBucketSpec) -> &str {
        &spec.compartment_id
    }

    fn explicit_id(spec: &ObjectStorageBucketSpec) -> Option<&str> {
        spec.id.as_deref()
    }

    fn namespace(spec: &ObjectStorageBucketSpec) -> Option<&str> {
        spec.namespace.as_deref().filter(|ns| !ns.is_empty())
    }

    fn set_namespace(spec: &mut ObjectStorageBucketSpec, namespace: String) {
        spec.namespace = Some(namespace);
    }

    fn remote_id(remote: &RemoteBucket) -> Option<ResourceId> {
        CompositeId::new(remote.namespace.as_str(), remote.name.as_str()).map(ResourceId::Composite)
    }

    fn remote_state(_remote: &RemoteBucket) -> BucketState {
        BucketState::Available
    }

    fn summary_id(summary: &BucketSummary) -> Option<ResourceId> {
        CompositeId::new(summary.namespace.as_str(), summary.name.as_str())
            .map(ResourceId::Composite)
    }

    fn summary_name(summary: &BucketSummary) -> &str {
        &summary.name
    }

    fn summary_state(_summary: &BucketSummary) -> BucketState {
        BucketState::Available
    }

    fn create_details(spec: &ObjectStorageBucketSpec) -> Result<CreateBucketDetails, ReconcileError> {
        if !valid_bucket_name(&spec.name) {
            return Err(invalid_spec::<Self>(
                spec,
                "bucket names use letters, digits, '-', '_' and '.' (at most 256 characters)",
            ));
        }
        let Some(namespace) = Self::namespace(spec) else {
            return Err(invalid_spec::<Self>(spec, "object storage namespace is unresolved"));
        };

        Ok(CreateBucketDetails {
            namespace: namespace.to_string(),
            name: spec.name.clone(),
            compartment_id: spec.compartment_id.clone(),
            storage_tier: spec.storage_tier.clone(),
            public_access_type: spec.public_access_type.clone(),
            versioning: spec.versioning.clone(),
            freeform_tags: spec.freeform_tags.clone().unwrap_or_default(),
        })
    }

    fn needs_update(spec: &ObjectStorageBucketSpec, remote: &RemoteBucket) -> bool {
        string_differs(
            spec.public_access_type.as_deref(),
            remote.public_access_type.as_deref(),
        ) || string_differs(spec.versioning.as_deref(), remote.versioning.as_deref())
            || tags_differ(spec.freeform_tags.as_ref(), &remote.freeform_tags)
    }

    fn update_details(spec: &ObjectStorageBucketSpec) -> UpdateBucketDetails {
        UpdateBucketDetails {
            public_access_type: spec.public_access_type.clone(),
            versioning: spec.versioning.clone(),
            freeform_tags: spec.freeform_tags.clone(),
        }
    }

    fn credentials(_spec: &ObjectStorageBucketSpec, remote: &RemoteBucket) -> BTreeMap<String, Vec<u8>> {
        let uri = format!("oci://{}@{}/", remote.name, remote.namespace);
        credential_map([
            (SECRET_KEY_NAMESPACE, Some(remote.namespace.as_str())),
            (SECRET_KEY_BUCKET_NAME, Some(remote.name.as_str())),
            (SECRET_KEY_URI, Some(uri.as_str())),
        ])
    }
}

#[cfg(test)]
#[path = "object_storage_bucket_tests.rs"]
mod object_storage_bucket_tests;
