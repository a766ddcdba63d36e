// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Custom Resource Definitions (CRDs) for managed OCI resources.
//!
//! This module defines all Kubernetes Custom Resource Definitions used to declare the
//! desired state of resources living in an external cloud control plane.
//!
//! # Resource Types
//!
//! ## Networking
//!
//! - [`ApiGateway`] - API gateway endpoint
//! - [`ApiGatewayDeployment`] - Route table deployed onto an API gateway
//! - [`NatGateway`] - Network address translation gateway for a VCN
//!
//! ## Data
//!
//! - [`ObjectStorageBucket`] - Object storage bucket (composite `namespace/name` identity)
//! - [`OpenSearchCluster`] - Managed search cluster
//! - [`Queue`] - Managed message queue
//! - [`DataFlowApplication`] - Spark application definition
//!
//! All kinds share the same [`ResourceStatus`], which is owned exclusively by the
//! reconciliation engine.
//!
//! # Example: Declaring a Queue
//!
//! ```rust,no_run
//! use oci_reconciler::crd::QueueSpec;
//!
//! let spec = QueueSpec {
//!     id: None,
//!     compartment_id: "ocid1.compartment.oc1..example".to_string(),
//!     display_name: "orders".to_string(),
//!     retention_in_seconds: Some(86_400),
//!     visibility_in_seconds: None,
//!     timeout_in_seconds: None,
//!     dead_letter_queue_delivery_count: None,
//!     custom_encryption_key_id: None,
//!     freeform_tags: None,
//! };
//! ```

use kube::CustomResource;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Canonical condition types recorded by the engine.
///
/// Every remote lifecycle state, whatever its provider-specific label, is reported
/// through one of these.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
pub enum ConditionType {
    /// The remote object is being created or is in a transitional state.
    Provisioning,
    /// The remote object is usable.
    Active,
    /// An update has been issued and is being applied.
    Updating,
    /// The remote object failed, or the engine could not act on it.
    Failed,
}

impl ConditionType {
    /// The string form used in the status subresource.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Provisioning => "Provisioning",
            Self::Active => "Active",
            Self::Updating => "Updating",
            Self::Failed => "Failed",
        }
    }
}

impl fmt::Display for ConditionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Condition represents an observation of a resource's current state.
///
/// Conditions are appended to [`ResourceStatus::conditions`] and never mutated in place;
/// consumers read the last element for the current state.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Condition {
    /// Type of condition: Provisioning, Active, Updating or Failed.
    pub r#type: ConditionType,

    /// Status of the condition: True, False, or Unknown.
    pub status: String,

    /// Brief CamelCase reason for the condition.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,

    /// Human-readable message indicating details about the transition.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,

    /// Time the condition was recorded (RFC3339 format).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_transition_time: Option<String>,
}

/// Observed state shared by every managed resource kind.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ResourceStatus {
    /// Identifier of the remote object: an opaque OCID, or `scope/name` for kinds
    /// without a native identifier.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remote_id: Option<String>,

    /// Append-only history of reconcile outcomes.
    #[serde(default)]
    pub conditions: Vec<Condition>,

    /// Time the remote object was first observed (RFC3339 format). Set once.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,

    /// Generation of the spec last processed by the engine.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub observed_generation: Option<i64>,
}

/// `ApiGateway` declares an OCI API gateway.
///
/// # Example
///
/// ```yaml
/// apiVersion: oci.firestoned.io/v1beta1
/// kind: ApiGateway
/// metadata:
///   name: public-gw
///   namespace: apps
/// spec:
///   compartmentId: ocid1.compartment.oc1..example
///   displayName: public-gw
///   endpointType: PUBLIC
///   subnetId: ocid1.subnet.oc1..example
/// ```
#[derive(CustomResource, Clone, Debug, Serialize, Deserialize, JsonSchema)]
#[kube(
    group = "oci.firestoned.io",
    version = "v1beta1",
    kind = "ApiGateway",
    namespaced,
    doc = "ApiGateway declares an OCI API gateway. The gateway hostname is published to a Secret named after the resource once the gateway is active.",
    printcolumn = r#"{"name":"Status","type":"string","jsonPath":".status.conditions[-1:].type"}"#,
    printcolumn = r#"{"name":"RemoteId","type":"string","jsonPath":".status.remoteId","priority":1}"#,
    printcolumn = r#"{"name":"Age","type":"date","jsonPath":".metadata.creationTimestamp"}"#
)]
#[kube(status = "ResourceStatus")]
#[serde(rename_all = "camelCase")]
pub struct ApiGatewaySpec {
    /// Existing gateway OCID to bind to instead of creating one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    /// Compartment that owns the gateway.
    pub compartment_id: String,

    /// Display name, also used to find an existing gateway.
    pub display_name: String,

    /// `PUBLIC` or `PRIVATE`.
    #[schemars(regex(pattern = r"^(PUBLIC|PRIVATE)$"))]
    pub endpoint_type: String,

    /// Subnet the gateway endpoint is placed in.
    pub subnet_id: String,

    /// TLS certificate served by the gateway.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub certificate_id: Option<String>,

    /// Network security groups applied to the gateway.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub network_security_group_ids: Option<Vec<String>>,

    /// Free-form tags, compared as a whole against the remote tags.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub freeform_tags: Option<BTreeMap<String, String>>,
}

/// Backend a deployment route forwards to.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct RouteBackend {
    /// `HTTP_BACKEND` or `STOCK_RESPONSE_BACKEND`.
    pub r#type: String,

    /// Upstream URL for HTTP backends.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,

    /// Status code for stock responses.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<i32>,

    /// Body for stock responses.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
}

/// A single route of an API deployment.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct DeploymentRoute {
    /// Path relative to the deployment path prefix.
    pub path: String,

    /// HTTP methods accepted on the path.
    #[serde(default)]
    pub methods: Vec<String>,

    /// Where matching requests are sent.
    pub backend: RouteBackend,
}

/// `ApiGatewayDeployment` declares a set of routes deployed onto an [`ApiGateway`].
#[derive(CustomResource, Clone, Debug, Serialize, Deserialize, JsonSchema)]
#[kube(
    group = "oci.firestoned.io",
    version = "v1beta1",
    kind = "ApiGatewayDeployment",
    namespaced,
    doc = "ApiGatewayDeployment declares routes served under a path prefix of an OCI API gateway.",
    printcolumn = r#"{"name":"Status","type":"string","jsonPath":".status.conditions[-1:].type"}"#,
    printcolumn = r#"{"name":"RemoteId","type":"string","jsonPath":".status.remoteId","priority":1}"#,
    printcolumn = r#"{"name":"Age","type":"date","jsonPath":".metadata.creationTimestamp"}"#
)]
#[kube(status = "ResourceStatus")]
#[serde(rename_all = "camelCase")]
pub struct ApiGatewayDeploymentSpec {
    /// Existing deployment OCID to bind to instead of creating one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    /// Compartment that owns the deployment.
    pub compartment_id: String,

    /// Display name, also used to find an existing deployment.
    pub display_name: String,

    /// Gateway the deployment is attached to.
    pub gateway_id: String,

    /// Path prefix, e.g. `/v1`.
    pub path_prefix: String,

    /// Routes served by the deployment.
    #[serde(default)]
    pub routes: Vec<DeploymentRoute>,

    /// Free-form tags, compared as a whole against the remote tags.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub freeform_tags: Option<BTreeMap<String, String>>,
}

/// `ObjectStorageBucket` declares an object storage bucket.
///
/// Buckets have no opaque identifier; they are addressed as `namespace/name`.
/// When `namespace` is omitted it is resolved from the compartment's tenancy on the
/// first reconcile and cached back into the spec.
#[derive(CustomResource, Clone, Debug, Serialize, Deserialize, JsonSchema)]
#[kube(
    group = "oci.firestoned.io",
    version = "v1beta1",
    kind = "ObjectStorageBucket",
    namespaced,
    doc = "ObjectStorageBucket declares an OCI object storage bucket addressed as namespace/name.",
    printcolumn = r#"{"name":"Status","type":"string","jsonPath":".status.conditions[-1:].type"}"#,
    printcolumn = r#"{"name":"RemoteId","type":"string","jsonPath":".status.remoteId"}"#,
    printcolumn = r#"{"name":"Age","type":"date","jsonPath":".metadata.creationTimestamp"}"#
)]
#[kube(status = "ResourceStatus")]
#[serde(rename_all = "camelCase")]
pub struct ObjectStorageBucketSpec {
    /// Existing bucket to bind to, as `namespace/name`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    /// Compartment that owns the bucket.
    pub compartment_id: String,

    /// Object storage namespace. Resolved and cached when omitted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,

    /// Bucket name, unique within the namespace.
    pub name: String,

    /// `Standard` or `Archive`. Only honoured at creation time.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub storage_tier: Option<String>,

    /// `NoPublicAccess`, `ObjectRead` or `ObjectReadWithoutList`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub public_access_type: Option<String>,

    /// `Enabled` or `Disabled`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub versioning: Option<String>,

    /// Free-form tags, compared as a whole against the remote tags.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub freeform_tags: Option<BTreeMap<String, String>>,
}

/// `OpenSearchCluster` declares a managed search cluster.
#[derive(CustomResource, Clone, Debug, Serialize, Deserialize, JsonSchema)]
#[kube(
    group = "oci.firestoned.io",
    version = "v1beta1",
    kind = "OpenSearchCluster",
    namespaced,
    doc = "OpenSearchCluster declares an OCI search cluster. Connection endpoints are published to a Secret once the cluster is active.",
    printcolumn = r#"{"name":"Status","type":"string","jsonPath":".status.conditions[-1:].type"}"#,
    printcolumn = r#"{"name":"RemoteId","type":"string","jsonPath":".status.remoteId","priority":1}"#,
    printcolumn = r#"{"name":"Age","type":"date","jsonPath":".metadata.creationTimestamp"}"#
)]
#[kube(status = "ResourceStatus")]
#[serde(rename_all = "camelCase")]
pub struct OpenSearchClusterSpec {
    /// Existing cluster OCID to bind to instead of creating one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    /// Compartment that owns the cluster.
    pub compartment_id: String,

    /// Display name, also used to find an existing cluster.
    pub display_name: String,

    /// OpenSearch software version, e.g. `2.11.0`.
    pub software_version: String,

    /// Number of master nodes.
    #[schemars(range(min = 1))]
    pub master_node_count: i32,

    /// Master node host type (`FLEX`).
    pub master_node_host_type: String,

    /// OCPUs per master node.
    pub master_node_host_ocpu_count: i32,

    /// Memory per master node in GB.
    pub master_node_host_memory_gb: i32,

    /// Number of data nodes.
    #[schemars(range(min = 1))]
    pub data_node_count: i32,

    /// Data node host type (`FLEX`).
    pub data_node_host_type: String,

    /// OCPUs per data node.
    pub data_node_host_ocpu_count: i32,

    /// Memory per data node in GB.
    pub data_node_host_memory_gb: i32,

    /// Storage per data node in GB.
    pub data_node_storage_gb: i32,

    /// Number of OpenSearch Dashboards nodes.
    pub opendashboard_node_count: i32,

    /// OCPUs per dashboards node.
    pub opendashboard_node_host_ocpu_count: i32,

    /// Memory per dashboards node in GB.
    pub opendashboard_node_host_memory_gb: i32,

    /// VCN hosting the cluster.
    pub vcn_id: String,

    /// Subnet hosting the cluster.
    pub subnet_id: String,

    /// Compartment of the VCN.
    pub vcn_compartment_id: String,

    /// Compartment of the subnet.
    pub subnet_compartment_id: String,

    /// Free-form tags, compared as a whole against the remote tags.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub freeform_tags: Option<BTreeMap<String, String>>,
}

/// `Queue` declares a managed message queue.
#[derive(CustomResource, Clone, Debug, Serialize, Deserialize, JsonSchema)]
#[kube(
    group = "oci.firestoned.io",
    version = "v1beta1",
    kind = "Queue",
    namespaced,
    doc = "Queue declares an OCI message queue. The messages endpoint is published to a Secret once the queue is active.",
    printcolumn = r#"{"name":"Status","type":"string","jsonPath":".status.conditions[-1:].type"}"#,
    printcolumn = r#"{"name":"RemoteId","type":"string","jsonPath":".status.remoteId","priority":1}"#,
    printcolumn = r#"{"name":"Age","type":"date","jsonPath":".metadata.creationTimestamp"}"#
)]
#[kube(status = "ResourceStatus")]
#[serde(rename_all = "camelCase")]
pub struct QueueSpec {
    /// Existing queue OCID to bind to instead of creating one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    /// Compartment that owns the queue.
    pub compartment_id: String,

    /// Display name, also used to find an existing queue.
    pub display_name: String,

    /// How long messages are retained. Only honoured at creation time.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub retention_in_seconds: Option<i32>,

    /// Default visibility timeout of consumed messages.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub visibility_in_seconds: Option<i32>,

    /// Default long-polling timeout for GetMessages.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_in_seconds: Option<i32>,

    /// Deliveries before a message is moved to the dead letter queue.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dead_letter_queue_delivery_count: Option<i32>,

    /// Vault key used to encrypt messages.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_encryption_key_id: Option<String>,

    /// Free-form tags, compared as a whole against the remote tags.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub freeform_tags: Option<BTreeMap<String, String>>,
}

/// `DataFlowApplication` declares a Spark application definition.
#[derive(CustomResource, Clone, Debug, Serialize, Deserialize, JsonSchema)]
#[kube(
    group = "oci.firestoned.io",
    version = "v1beta1",
    kind = "DataFlowApplication",
    namespaced,
    doc = "DataFlowApplication declares an OCI Data Flow (Spark) application.",
    printcolumn = r#"{"name":"Status","type":"string","jsonPath":".status.conditions[-1:].type"}"#,
    printcolumn = r#"{"name":"RemoteId","type":"string","jsonPath":".status.remoteId","priority":1}"#,
    printcolumn = r#"{"name":"Age","type":"date","jsonPath":".metadata.creationTimestamp"}"#
)]
#[kube(status = "ResourceStatus")]
#[serde(rename_all = "camelCase")]
pub struct DataFlowApplicationSpec {
    /// Existing application OCID to bind to instead of creating one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    /// Compartment that owns the application.
    pub compartment_id: String,

    /// Display name, also used to find an existing application.
    pub display_name: String,

    /// `PYTHON`, `SCALA`, `JAVA` or `SQL`.
    #[schemars(regex(pattern = r"^(PYTHON|SCALA|JAVA|SQL)$"))]
    pub language: String,

    /// Spark version, e.g. `3.2.1`.
    pub spark_version: String,

    /// Compute shape of the driver.
    pub driver_shape: String,

    /// Compute shape of each executor.
    pub executor_shape: String,

    /// Number of executors.
    #[schemars(range(min = 1))]
    pub num_executors: i32,

    /// Object storage URI of the application artifact.
    pub file_uri: String,

    /// Main class for JVM languages.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub class_name: Option<String>,

    /// Arguments passed to the application.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub arguments: Option<Vec<String>>,

    /// Free text description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Free-form tags, compared as a whole against the remote tags.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub freeform_tags: Option<BTreeMap<String, String>>,
}

/// `NatGateway` declares a NAT gateway attached to a VCN.
#[derive(CustomResource, Clone, Debug, Serialize, Deserialize, JsonSchema)]
#[kube(
    group = "oci.firestoned.io",
    version = "v1beta1",
    kind = "NatGateway",
    namespaced,
    doc = "NatGateway declares an OCI NAT gateway. The gateway public IP is published to a Secret once the gateway is available.",
    printcolumn = r#"{"name":"Status","type":"string","jsonPath":".status.conditions[-1:].type"}"#,
    printcolumn = r#"{"name":"RemoteId","type":"string","jsonPath":".status.remoteId","priority":1}"#,
    printcolumn = r#"{"name":"Age","type":"date","jsonPath":".metadata.creationTimestamp"}"#
)]
#[kube(status = "ResourceStatus")]
#[serde(rename_all = "camelCase")]
pub struct NatGatewaySpec {
    /// Existing NAT gateway OCID to bind to instead of creating one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    /// Compartment that owns the NAT gateway.
    pub compartment_id: String,

    /// Display name, also used to find an existing gateway.
    pub display_name: String,

    /// VCN the gateway belongs to.
    pub vcn_id: String,

    /// Block all traffic through the gateway.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub block_traffic: Option<bool>,

    /// Reserved public IP to use instead of an ephemeral one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub public_ip_id: Option<String>,

    /// Free-form tags, compared as a whole against the remote tags.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub freeform_tags: Option<BTreeMap<String, String>>,
}
