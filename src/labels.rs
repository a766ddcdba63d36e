// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Common label and finalizer constants used across all reconcilers.
//!
//! This module defines standard Kubernetes labels and reconciler-specific finalizers
//! to ensure consistency across all objects written by the controller.

use std::collections::BTreeMap;

// ============================================================================
// Kubernetes Standard Labels
// https://kubernetes.io/docs/concepts/overview/working-with-objects/common-labels/
// ============================================================================

/// Standard label for the tool being used to manage the operation of an application
pub const K8S_MANAGED_BY: &str = "app.kubernetes.io/managed-by";

/// Standard label for a unique name identifying the instance of an application
pub const K8S_INSTANCE: &str = "app.kubernetes.io/instance";

/// Standard label for the name of a higher-level application this one is part of
pub const K8S_PART_OF: &str = "app.kubernetes.io/part-of";

/// Value for `app.kubernetes.io/part-of` and `app.kubernetes.io/managed-by`
pub const PART_OF_OCI_RECONCILER: &str = "oci-reconciler";

// ============================================================================
// Reconciler-Specific Labels
// ============================================================================

/// Label carrying the kind of the resource a secret was materialized for
pub const OCI_KIND_LABEL: &str = "oci.firestoned.io/kind";

// ============================================================================
// Finalizers
// ============================================================================

/// Finalizer for `ApiGateway` resources
pub const FINALIZER_API_GATEWAY: &str = "oci.firestoned.io/apigateway-finalizer";

/// Finalizer for `ApiGatewayDeployment` resources
pub const FINALIZER_API_GATEWAY_DEPLOYMENT: &str =
    "oci.firestoned.io/apigatewaydeployment-finalizer";

/// Finalizer for `ObjectStorageBucket` resources
pub const FINALIZER_OBJECT_STORAGE_BUCKET: &str = "oci.firestoned.io/objectstoragebucket-finalizer";

/// Finalizer for `OpenSearchCluster` resources
pub const FINALIZER_OPENSEARCH_CLUSTER: &str = "oci.firestoned.io/opensearchcluster-finalizer";

/// Finalizer for `Queue` resources
pub const FINALIZER_QUEUE: &str = "oci.firestoned.io/queue-finalizer";

/// Finalizer for `DataFlowApplication` resources
pub const FINALIZER_DATAFLOW_APPLICATION: &str = "oci.firestoned.io/dataflowapplication-finalizer";

/// Finalizer for `NatGateway` resources
pub const FINALIZER_NAT_GATEWAY: &str = "oci.firestoned.io/natgateway-finalizer";

/// Build the label set attached to a secret materialized for a managed resource.
#[must_use]
pub fn secret_labels(kind: &str, instance: &str) -> BTreeMap<String, String> {
    BTreeMap::from([
        (K8S_MANAGED_BY.to_string(), PART_OF_OCI_RECONCILER.to_string()),
        (K8S_PART_OF.to_string(), PART_OF_OCI_RECONCILER.to_string()),
        (K8S_INSTANCE.to_string(), instance.to_string()),
        (OCI_KIND_LABEL.to_string(), kind.to_string()),
    ])
}
