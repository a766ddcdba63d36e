// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Error mapping to Kubernetes status condition reasons.
//!
//! This module maps HTTP status codes returned by the cloud control plane, and the
//! reconciler's own error types, to standardized condition reasons. This enables
//! consistent error reporting in the `Failed` conditions written by the engine.
//!
//! # Usage
//!
//! ```rust
//! use oci_reconciler::http_errors::map_http_error_to_reason;
//!
//! let (reason, _message) = map_http_error_to_reason(404);
//! assert_eq!(reason, "RemoteNotFound");
//!
//! let (reason, _message) = map_http_error_to_reason(503);
//! assert_eq!(reason, "RemoteServiceError");
//! ```

use crate::errors::{CloudError, ReconcileError};
use crate::status_reasons::{
    REASON_AUTH_FAILED, REASON_CANCELLED, REASON_INVALID_REQUEST, REASON_INVALID_SPEC,
    REASON_MALFORMED_IDENTITY, REASON_MISSING_IDENTIFIER, REASON_POLL_TIMEOUT,
    REASON_RATE_LIMITED, REASON_REMOTE_CONFLICT, REASON_REMOTE_NOT_FOUND,
    REASON_REMOTE_SERVICE_ERROR, REASON_REMOTE_TIMEOUT, REASON_REMOTE_UNREACHABLE,
    REASON_SECRET_FAILED, REASON_TYPE_MISMATCH,
};

/// Map HTTP status code to condition reason and message.
///
/// # HTTP Code Mapping
///
/// | HTTP Code | Reason | Meaning |
/// |-----------|--------|---------|
/// | 400 | `InvalidRequest` | Invalid parameters |
/// | 401 | `AuthFailed` | Authentication required |
/// | 403 | `AuthFailed` | Insufficient permissions |
/// | 404 | `RemoteNotFound` | Object not found |
/// | 409 | `RemoteConflict` | Object in an incompatible state |
/// | 429 | `RateLimited` | Too many requests |
/// | 5xx | `RemoteServiceError` | Server-side failure |
/// | Other 4xx | `InvalidRequest` | Rejected request |
/// | Other | `RemoteUnreachable` | Unexpected response |
#[must_use]
pub fn map_http_error_to_reason(status_code: u16) -> (&'static str, String) {
    match status_code {
        400 => (
            REASON_INVALID_REQUEST,
            "Invalid request to cloud API (400)".into(),
        ),
        401 => (
            REASON_AUTH_FAILED,
            "Cloud API authentication required (401)".into(),
        ),
        403 => (
            REASON_AUTH_FAILED,
            "Cloud API authorization failed (403)".into(),
        ),
        404 => (
            REASON_REMOTE_NOT_FOUND,
            "Remote object not found (404)".into(),
        ),
        409 => (
            REASON_REMOTE_CONFLICT,
            "Remote object is in a conflicting state (409)".into(),
        ),
        429 => (
            REASON_RATE_LIMITED,
            "Cloud API rate limit exceeded (429)".into(),
        ),
        500..=599 => (
            REASON_REMOTE_SERVICE_ERROR,
            format!("Cloud API server error ({status_code})"),
        ),
        400..=499 => (
            REASON_INVALID_REQUEST,
            format!("Request rejected by cloud API ({status_code})"),
        ),
        _ => (
            REASON_REMOTE_UNREACHABLE,
            format!("Unexpected HTTP response from cloud API ({status_code})"),
        ),
    }
}

/// Map a client error to a condition reason.
#[must_use]
pub fn map_cloud_error_to_reason(error: &CloudError) -> &'static str {
    match error {
        CloudError::Transport(_) => REASON_REMOTE_UNREACHABLE,
        CloudError::Timeout(_) => REASON_REMOTE_TIMEOUT,
        CloudError::Cancelled => REASON_CANCELLED,
        other => other
            .status_code()
            .map_or(REASON_REMOTE_UNREACHABLE, |code| {
                map_http_error_to_reason(code).0
            }),
    }
}

/// Map a reconcile error to the reason recorded on its `Failed` condition.
#[must_use]
pub fn map_reconcile_error_to_reason(error: &ReconcileError) -> &'static str {
    match error {
        ReconcileError::MalformedIdentity { .. } => REASON_MALFORMED_IDENTITY,
        ReconcileError::InvalidSpec { .. } => REASON_INVALID_SPEC,
        ReconcileError::InvalidRequest { source, .. } | ReconcileError::Cloud { source, .. } => {
            map_cloud_error_to_reason(source)
        }
        ReconcileError::MissingIdentifier { .. } => REASON_MISSING_IDENTIFIER,
        ReconcileError::PollTimeout { .. } => REASON_POLL_TIMEOUT,
        ReconcileError::Secret { .. } => REASON_SECRET_FAILED,
        ReconcileError::TypeMismatch { .. } => REASON_TYPE_MISMATCH,
    }
}

#[cfg(test)]
#[path = "http_errors_tests.rs"]
mod http_errors_tests;
