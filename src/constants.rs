// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Global constants for the OCI reconciler.
//!
//! This module contains all numeric and string constants used throughout the codebase.
//! Constants are organized by category for easy maintenance.

// ============================================================================
// API Constants
// ============================================================================

/// API group for all managed OCI CRDs
pub const API_GROUP: &str = "oci.firestoned.io";

/// API version for all managed OCI CRDs
pub const API_VERSION: &str = "v1beta1";

/// Fully qualified API version (group/version)
pub const API_GROUP_VERSION: &str = "oci.firestoned.io/v1beta1";

/// Kind name for `ApiGateway` resource
pub const KIND_API_GATEWAY: &str = "ApiGateway";

/// Kind name for `ApiGatewayDeployment` resource
pub const KIND_API_GATEWAY_DEPLOYMENT: &str = "ApiGatewayDeployment";

/// Kind name for `ObjectStorageBucket` resource
pub const KIND_OBJECT_STORAGE_BUCKET: &str = "ObjectStorageBucket";

/// Kind name for `OpenSearchCluster` resource
pub const KIND_OPENSEARCH_CLUSTER: &str = "OpenSearchCluster";

/// Kind name for `Queue` resource
pub const KIND_QUEUE: &str = "Queue";

/// Kind name for `DataFlowApplication` resource
pub const KIND_DATAFLOW_APPLICATION: &str = "DataFlowApplication";

/// Kind name for `NatGateway` resource
pub const KIND_NAT_GATEWAY: &str = "NatGateway";

// ============================================================================
// Identifier Constants
// ============================================================================

/// Separator between scope and name in a composite remote identifier
pub const COMPOSITE_ID_SEPARATOR: char = '/';

// ============================================================================
// Remote API Constants
// ============================================================================

/// Page size used when listing remote objects by display name
pub const DEFAULT_LIST_LIMIT: u32 = 50;

/// Upper bound for a single remote call (30 seconds)
pub const DEFAULT_REMOTE_CALL_TIMEOUT_SECS: u64 = 30;

// ============================================================================
// Create Polling Constants
// ============================================================================

/// Maximum number of Get calls issued while waiting for a created object to leave CREATING
pub const DEFAULT_MAX_POLL_ATTEMPTS: u32 = 5;

/// Interval between polls for kinds using a fixed polling policy (5 seconds)
pub const DEFAULT_POLL_INTERVAL_SECS: u64 = 5;

/// Base of the exponential polling policy (`base^attempt` seconds)
pub const DEFAULT_POLL_BACKOFF_BASE: u32 = 2;

/// Ceiling for a single exponential polling delay (2 minutes)
pub const MAX_POLL_DELAY_SECS: u64 = 120;

// ============================================================================
// Controller Requeue Constants
// ============================================================================

/// Requeue interval for resources that are active (5 minutes)
pub const REQUEUE_WHEN_READY_SECS: u64 = 300;

/// Requeue interval for resources in a transitional state (30 seconds)
pub const REQUEUE_WHEN_PENDING_SECS: u64 = 30;

/// Requeue duration for controller errors (30 seconds)
pub const ERROR_REQUEUE_DURATION_SECS: u64 = 30;

/// Requeue duration for requests rejected as invalid by the remote API (10 minutes)
pub const INVALID_REQUEST_REQUEUE_DURATION_SECS: u64 = 600;

/// Ceiling for configured requeue and poll intervals (1 day)
pub const MAX_CONFIGURED_INTERVAL_SECS: u64 = 86_400;

/// Randomization factor applied to requeue intervals (±10%)
pub const REQUEUE_RANDOMIZATION_FACTOR: f64 = 0.1;

/// Field manager recorded on status and finalizer patches
pub const FIELD_MANAGER: &str = "oci-reconciler";

// ============================================================================
// Environment Variables
// ============================================================================

/// Overrides [`DEFAULT_LIST_LIMIT`]
pub const ENV_LIST_LIMIT: &str = "OCI_RECONCILER_LIST_LIMIT";

/// Overrides [`DEFAULT_MAX_POLL_ATTEMPTS`]
pub const ENV_MAX_POLL_ATTEMPTS: &str = "OCI_RECONCILER_MAX_POLL_ATTEMPTS";

/// Overrides [`DEFAULT_POLL_INTERVAL_SECS`]
pub const ENV_POLL_INTERVAL_SECS: &str = "OCI_RECONCILER_POLL_INTERVAL_SECS";

/// Overrides [`DEFAULT_REMOTE_CALL_TIMEOUT_SECS`]
pub const ENV_REMOTE_CALL_TIMEOUT_SECS: &str = "OCI_RECONCILER_REMOTE_CALL_TIMEOUT_SECS";

/// Overrides [`REQUEUE_WHEN_READY_SECS`]
pub const ENV_REQUEUE_READY_SECS: &str = "OCI_RECONCILER_REQUEUE_READY_SECS";

/// Overrides [`REQUEUE_WHEN_PENDING_SECS`]
pub const ENV_REQUEUE_PENDING_SECS: &str = "OCI_RECONCILER_REQUEUE_PENDING_SECS";

/// Log output format (`text` or `json`)
pub const ENV_LOG_FORMAT: &str = "RUST_LOG_FORMAT";
