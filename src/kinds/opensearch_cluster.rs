// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Managed search clusters.
//!
//! Cluster creation returns a work request; the cluster is discovered by display name
//! on a later pass. Node shapes and counts are fixed at creation (resizing is a separate
//! remote operation), so only the display name, software version and tags are updated.

use super::{credential_map, invalid_spec, opaque_id, DeletePolicy, ResourceKind};
use crate::constants::KIND_OPENSEARCH_CLUSTER;
use crate::crd::{OpenSearchCluster, OpenSearchClusterSpec, ResourceStatus};
use crate::errors::ReconcileError;
use crate::identity::ResourceId;
use crate::labels::FINALIZER_OPENSEARCH_CLUSTER;
use crate::predicate::{required_string_differs, tags_differ};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

crate::lifecycle_states! {
    /// Lifecycle of a search cluster.
    OpenSearchClusterState {
        Creating => "CREATING": Transitional,
        Active => "ACTIVE": Active,
        Updating => "UPDATING": Transitional,
        Deleting => "DELETING": Transitional,
        Deleted => "DELETED": Failed,
        Failed => "FAILED": Failed,
    }
    creating = [Creating];
    live = [Creating, Active, Updating];
}

/// Secret key holding the OpenSearch API endpoint.
pub const SECRET_KEY_OPENSEARCH_FQDN: &str = "opensearchFqdn";

/// Secret key holding the OpenSearch Dashboards endpoint.
pub const SECRET_KEY_OPENDASHBOARD_FQDN: &str = "opendashboardFqdn";

/// Secret key holding the private IP of the OpenSearch API.
pub const SECRET_KEY_OPENSEARCH_PRIVATE_IP: &str = "opensearchPrivateIp";

/// A search cluster as returned by the remote API.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoteOpenSearchCluster {
    pub id: String,
    pub compartment_id: String,
    pub display_name: String,
    pub lifecycle_state: OpenSearchClusterState,
    pub software_version: String,
    #[serde(default)]
    pub master_node_count: i32,
    #[serde(default)]
    pub data_node_count: i32,
    #[serde(default)]
    pub opendashboard_node_count: i32,
    #[serde(default)]
    pub opensearch_fqdn: Option<String>,
    #[serde(default)]
    pub opendashboard_fqdn: Option<String>,
    #[serde(default)]
    pub opensearch_private_ip: Option<String>,
    #[serde(default)]
    pub freeform_tags: BTreeMap<String, String>,
}

/// A search cluster list entry.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OpenSearchClusterSummary {
    pub id: String,
    pub display_name: String,
    pub lifecycle_state: OpenSearchClusterState,
}

/// Body of a create cluster call.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateOpenSearchClusterDetails {
    pub compartment_id: String,
    pub display_name: String,
    pub software_version: String,
    pub master_node_count: i32,
    pub master_node_host_type: String,
    pub master_node_host_ocpu_count: i32,
    pub master_node_host_memory_gb: i32,
    pub data_node_count: i32,
    pub data_node_host_type: String,
    pub data_node_host_ocpu_count: i32,
    pub data_node_host_memory_gb: i32,
    pub data_node_storage_gb: i32,
    pub opendashboard_node_count: i32,
    pub opendashboard_node_host_ocpu_count: i32,
    pub opendashboard_node_host_memory_gb: i32,
    pub vcn_id: String,
    pub subnet_id: String,
    pub vcn_compartment_id: String,
    pub subnet_compartment_id: String,
    pub freeform_tags: BTreeMap<String, String>,
}

/// Body of an update cluster call.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateOpenSearchClusterDetails {
    pub display_name: String,
    pub software_version: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub freeform_tags: Option<BTreeMap<String, String>>,
}

/// [`ResourceKind`] implementation for [`OpenSearchCluster`].
pub struct OpenSearchClusterKind;

impl ResourceKind for OpenSearchClusterKind {
    type Resource = OpenSearchCluster;
    type Spec = OpenSearchClusterSpec;
    type Remote = RemoteOpenSearchCluster;
    type Summary = OpenSearchClusterSummary;
    type CreateDetails = CreateOpenSearchClusterDetails;
    type UpdateDetails = UpdateOpenSearchClusterDetails;
    type State = OpenSearchClusterState;

    const KIND: &'static str = KIND_OPENSEARCH_CLUSTER;
    const FINALIZER: &'static str = FINALIZER_OPENSEARCH_CLUSTER;
    const DELETE_POLICY: DeletePolicy = DeletePolicy::Swallow;

    fn spec(resource: &OpenSearchCluster) -> &OpenSearchClusterSpec {
        &resource.spec
    }

    fn spec_mut(resource: &mut OpenSearchCluster) -> &mut OpenSearchClusterSpec {
        &mut resource.spec
    }

    fn status(resource: &OpenSearchCluster) -> Option<&ResourceStatus> {
        resource.status.as_ref()
    }

    fn status_mut(resource: &mut OpenSearchCluster) -> &mut Option<ResourceStatus> {
        &mut resource.status
    }

    fn display_name(spec: &OpenSearchClusterSpec) -> &str {
        &spec.display_name
    }

    fn compartment_id(spec: &OpenSearchClusterSpec) -> &str {
        &spec.compartment_id
    }

    fn explicit_id(spec: &OpenSearchClusterSpec) -> Option<&str> {
        spec.id.as_deref()
    }

    fn remote_id(remote: &RemoteOpenSearchCluster) -> Option<ResourceId> {
        opaque_id(&remote.id)
    }

    fn remote_state(remote: &RemoteOpenSearchCluster) -> OpenSearchClusterState {
        remote.lifecycle_state
    }

    fn summary_id(summary: &OpenSearchClusterSummary) -> Option<ResourceId> {
        opaque_id(&summary.id)
    }

    fn summary_name(summary: &OpenSearchClusterSummary) -> &str {
        &summary.display_name
    }

    fn summary_state(summary: &OpenSearchClusterSummary) -> OpenSearchClusterState {
        summary.lifecycle_state
    }

    fn create_details(
        spec: &OpenSearchClusterSpec,
    ) -> Result<CreateOpenSearchClusterDetails, ReconcileError> {
        if spec.master_node_count < 1 || spec.data_node_count < 1 {
            return Err(invalid_spec::<Self>(
                spec,
                "masterNodeCount and dataNodeCount must be at least 1",
            ));
        }
        if spec.vcn_id.is_empty() || spec.subnet_id.is_empty() {
            return Err(invalid_spec::<Self>(spec, "vcnId and subnetId are required"));
        }

        Ok(CreateOpenSearchClusterDetails {
            compartment_id: spec.compartment_id.clone(),
            display_name: spec.display_name.clone(),
            software_version: spec.software_version.clone(),
            master_node_count: spec.master_node_count,
            master_node_host_type: spec.master_node_host_type.clone(),
            master_node_host_ocpu_count: spec.master_node_host_ocpu_count,
            master_node_host_memory_gb: spec.master_node_host_memory_gb,
            data_node_count: spec.data_node_count,
            data_node_host_type: spec.data_node_host_type.clone(),
            data_node_host_ocpu_count: spec.data_node_host_ocpu_count,
            data_node_host_memory_gb: spec.data_node_host_memory_gb,
            data_node_storage_gb: spec.data_node_storage_gb,
            opendashboard_node_count: spec.opendashboard_node_count,
            opendashboard_node_host_ocpu_count: spec.opendashboard_node_host_ocpu_count,
            opendashboard_node_host_memory_gb: spec.opendashboard_node_host_memory_gb,
            vcn_id: spec.vcn_id.clone(),
            subnet_id: spec.subnet_id.clone(),
            vcn_compartment_id: spec.vcn_compartment_id.clone(),
            subnet_compartment_id: spec.subnet_compartment_id.clone(),
            freeform_tags: spec.freeform_tags.clone().unwrap_or_default(),
        })
    }

    fn needs_update(spec: &OpenSearchClusterSpec, remote: &RemoteOpenSearchCluster) -> bool {
        required_string_differs(&spec.display_name, &remote.display_name)
            || required_string_differs(&spec.software_version, &remote.software_version)
            || tags_differ(spec.freeform_tags.as_ref(), &remote.freeform_tags)
    }

    fn update_details(spec: &OpenSearchClusterSpec) -> UpdateOpenSearchClusterDetails {
        UpdateOpenSearchClusterDetails {
            display_name: spec.display_name.clone(),
            software_version: spec.software_version.clone(),
            freeform_tags: spec.freeform_tags.clone(),
        }
    }

    fn credentials(
        _spec: &OpenSearchClusterSpec,
        remote: &RemoteOpenSearchCluster,
    ) -> BTreeMap<String, Vec<u8>> {
        credential_map([
            (SECRET_KEY_OPENSEARCH_FQDN, remote.opensearch_fqdn.as_deref()),
            (SECRET_KEY_OPENDASHBOARD_FQDN, remote.opendashboard_fqdn.as_deref()),
            (SECRET_KEY_OPENSEARCH_PRIVATE_IP, remote.opensearch_private_ip.as_deref()),
        ])
    }
}

#[cfg(test)]
#[path = "opensearch_cluster_tests.rs"]
mod opensearch_cluster_tests;
