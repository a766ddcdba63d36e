// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Standard status condition reasons for managed OCI resources.
//!
//! This module defines constants for condition reasons following Kubernetes conventions.
//! Reasons are programmatic identifiers in CamelCase that explain why a condition was
//! appended.
//!
//! # Condition History
//!
//! Conditions are append-only. A typical history for a resource created from scratch:
//!
//! ```yaml
//! status:
//!   remoteId: ocid1.queue.oc1..aaaa
//!   createdAt: "2025-11-29T23:45:00Z"
//!   conditions:
//!     - type: Provisioning
//!       status: "True"
//!       reason: CreateRequested
//!       message: "Queue orders create requested"
//!     - type: Provisioning
//!       status: "True"
//!       reason: LifecycleTransitional
//!       message: "Queue orders is CREATING"
//!     - type: Active
//!       status: "True"
//!       reason: LifecycleActive
//!       message: "Queue orders is ACTIVE"
//! ```

// ============================================================================
// Write Reasons
// ============================================================================

/// A create call was accepted and returned the new object.
pub const REASON_CREATE_REQUESTED: &str = "CreateRequested";

/// A create call was accepted as an asynchronous work request.
///
/// The remote identifier is not known yet; the next pass discovers the object by name.
pub const REASON_WORK_REQUEST_ACCEPTED: &str = "WorkRequestAccepted";

/// An update call was issued because the spec differs from the remote object.
pub const REASON_UPDATE_REQUESTED: &str = "UpdateRequested";

// ============================================================================
// Lifecycle Reasons
// ============================================================================

/// The remote object reports a fully active lifecycle state.
pub const REASON_LIFECYCLE_ACTIVE: &str = "LifecycleActive";

/// The remote object reports a creating, updating or otherwise transitional state.
pub const REASON_LIFECYCLE_TRANSITIONAL: &str = "LifecycleTransitional";

/// The remote object reports a terminal failure state.
///
/// This is a reported fact about the remote object, not a reconciler error.
pub const REASON_LIFECYCLE_FAILED: &str = "LifecycleFailed";

// ============================================================================
// Error Reasons
// ============================================================================

/// The remote API rejected the request as invalid (HTTP 400 and similar).
pub const REASON_INVALID_REQUEST: &str = "InvalidRequest";

/// The remote API refused the credentials or permissions (HTTP 401/403).
pub const REASON_AUTH_FAILED: &str = "AuthFailed";

/// The remote object was not found (HTTP 404).
pub const REASON_REMOTE_NOT_FOUND: &str = "RemoteNotFound";

/// The remote object is in a state that conflicts with the request (HTTP 409).
pub const REASON_REMOTE_CONFLICT: &str = "RemoteConflict";

/// The remote API is rate limiting requests (HTTP 429).
pub const REASON_RATE_LIMITED: &str = "RateLimited";

/// The remote API failed internally (HTTP 5xx).
pub const REASON_REMOTE_SERVICE_ERROR: &str = "RemoteServiceError";

/// No HTTP response was received from the remote API.
pub const REASON_REMOTE_UNREACHABLE: &str = "RemoteUnreachable";

/// A remote call exceeded its time bound.
pub const REASON_REMOTE_TIMEOUT: &str = "RemoteTimeout";

/// The reconcile pass was cancelled by the host.
pub const REASON_CANCELLED: &str = "Cancelled";

/// A composite identifier could not be split into scope and name.
pub const REASON_MALFORMED_IDENTITY: &str = "MalformedIdentity";

/// The spec cannot be turned into a remote request.
pub const REASON_INVALID_SPEC: &str = "InvalidSpec";

/// A create call succeeded without returning a usable identifier.
pub const REASON_MISSING_IDENTIFIER: &str = "MissingIdentifier";

/// The create poll ran out of attempts while the object was still being created.
pub const REASON_POLL_TIMEOUT: &str = "PollTimeout";

/// The credentials secret could not be written.
pub const REASON_SECRET_FAILED: &str = "SecretFailed";

/// The engine was handed an object of an unexpected kind.
pub const REASON_TYPE_MISMATCH: &str = "TypeMismatch";
