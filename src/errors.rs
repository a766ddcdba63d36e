// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Error types for remote API calls, secret materialization and reconciliation.
//!
//! This module provides specialized error types for:
//! - Calls made through a [`ServiceClient`](crate::client::ServiceClient) to the cloud control plane
//! - Secret store operations
//! - Engine-level failures that end a reconcile pass
//!
//! The engine always records a `Failed` condition before returning a [`ReconcileError`],
//! so its `Display` output is written to the condition message and must name the resource
//! kind, the display name and the underlying error.

use std::time::Duration;
use thiserror::Error;

/// Errors returned by a [`ServiceClient`](crate::client::ServiceClient) implementation.
///
/// Client implementations classify transport and HTTP failures into these variants;
/// [`CloudError::from_status`] does the classification for HTTP status codes.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CloudError {
    /// The remote API rejected the request as invalid (HTTP 400 and other non-retryable 4xx).
    ///
    /// The same request will never succeed unmodified.
    #[error("request rejected (HTTP {status}): {message}")]
    BadRequest {
        /// HTTP status code returned by the remote API
        status: u16,
        /// Error message returned by the remote API
        message: String,
    },

    /// The remote object does not exist (HTTP 404)
    #[error("remote object not found (HTTP 404): {message}")]
    NotFound {
        /// Error message returned by the remote API
        message: String,
    },

    /// The remote object is in a state that conflicts with the request (HTTP 409)
    #[error("conflict with remote state (HTTP 409): {message}")]
    Conflict {
        /// Error message returned by the remote API
        message: String,
    },

    /// Rate limiting or a server-side failure (HTTP 429, 5xx)
    #[error("remote service error (HTTP {status}): {message}")]
    Service {
        /// HTTP status code returned by the remote API
        status: u16,
        /// Error message returned by the remote API
        message: String,
    },

    /// The request never produced an HTTP response
    #[error("transport error: {0}")]
    Transport(String),

    /// The remote call exceeded its time bound
    #[error("remote call timed out after {0:?}")]
    Timeout(Duration),

    /// The caller cancelled the reconcile pass while the call was in flight
    #[error("remote call cancelled")]
    Cancelled,
}

impl CloudError {
    /// Classify an HTTP status code and message into a `CloudError`.
    ///
    /// # Example
    ///
    /// ```rust
    /// use oci_reconciler::errors::CloudError;
    ///
    /// assert!(CloudError::from_status(400, "bad shape").is_bad_request());
    /// assert!(CloudError::from_status(404, "gone").is_not_found());
    /// assert!(!CloudError::from_status(503, "busy").is_bad_request());
    /// ```
    #[must_use]
    pub fn from_status(status: u16, message: impl Into<String>) -> Self {
        let message = message.into();
        match status {
            404 => Self::NotFound { message },
            409 => Self::Conflict { message },
            429 | 500..=599 => Self::Service { status, message },
            400..=499 => Self::BadRequest { status, message },
            _ => Self::Transport(format!("unexpected HTTP status {status}: {message}")),
        }
    }

    /// HTTP status code carried by the error, if any.
    #[must_use]
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::BadRequest { status, .. } | Self::Service { status, .. } => Some(*status),
            Self::NotFound { .. } => Some(404),
            Self::Conflict { .. } => Some(409),
            Self::Transport(_) | Self::Timeout(_) | Self::Cancelled => None,
        }
    }

    /// True if the remote object does not exist.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// True if the request was rejected as invalid and must not be retried unmodified.
    #[must_use]
    pub fn is_bad_request(&self) -> bool {
        matches!(self, Self::BadRequest { .. })
    }
}

/// Errors returned by a [`SecretStore`](crate::secrets::SecretStore).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SecretError {
    /// A secret with this name already exists
    #[error("secret '{namespace}/{name}' already exists")]
    AlreadyExists {
        /// Secret name
        name: String,
        /// Secret namespace
        namespace: String,
    },

    /// The secret does not exist
    #[error("secret '{namespace}/{name}' not found")]
    NotFound {
        /// Secret name
        name: String,
        /// Secret namespace
        namespace: String,
    },

    /// Any other failure talking to the secret store
    #[error("secret store error: {0}")]
    Store(String),
}

/// Errors that end a reconcile or delete pass.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ReconcileError {
    /// A composite identifier did not split into exactly two non-empty parts
    #[error("{kind} '{name}': malformed identifier '{value}', expected '<scope>/<name>'")]
    MalformedIdentity {
        /// Resource kind
        kind: &'static str,
        /// Display name of the resource
        name: String,
        /// The offending identifier
        value: String,
    },

    /// The desired state cannot be expressed as a remote request
    #[error("{kind} '{name}': invalid specification: {reason}")]
    InvalidSpec {
        /// Resource kind
        kind: &'static str,
        /// Display name of the resource
        name: String,
        /// What is missing or wrong
        reason: String,
    },

    /// The remote API rejected a request as invalid; retrying unmodified will not help
    #[error("{kind} '{name}': {operation} rejected by remote API: {source}")]
    InvalidRequest {
        /// Resource kind
        kind: &'static str,
        /// Display name of the resource
        name: String,
        /// Remote operation (`create`, `update`, ...)
        operation: &'static str,
        /// Underlying client error
        #[source]
        source: CloudError,
    },

    /// A remote call failed for a transport, server or conflict reason
    #[error("{kind} '{name}': {operation} failed: {source}")]
    Cloud {
        /// Resource kind
        kind: &'static str,
        /// Display name of the resource
        name: String,
        /// Remote operation (`create`, `get`, ...)
        operation: &'static str,
        /// Underlying client error
        #[source]
        source: CloudError,
    },

    /// A create or list response carried no usable identifier
    #[error("{kind} '{name}': {operation} returned no usable identifier")]
    MissingIdentifier {
        /// Resource kind
        kind: &'static str,
        /// Display name of the resource
        name: String,
        /// Remote operation whose response lacked the identifier
        operation: &'static str,
    },

    /// The create poll ran out of attempts while the object was still being created
    #[error("{kind} '{name}': still {state} after {attempts} poll attempt(s)")]
    PollTimeout {
        /// Resource kind
        kind: &'static str,
        /// Display name of the resource
        name: String,
        /// Number of Get calls issued
        attempts: u32,
        /// Last observed lifecycle state
        state: String,
    },

    /// Writing the credentials secret failed
    #[error("{kind} '{name}': failed to materialize secret '{secret}': {source}")]
    Secret {
        /// Resource kind
        kind: &'static str,
        /// Display name of the resource
        name: String,
        /// Secret name
        secret: String,
        /// Underlying secret store error
        #[source]
        source: SecretError,
    },

    /// The engine was handed an object that is not one of the managed kinds
    #[error("unexpected object of kind '{found}': {reason}")]
    TypeMismatch {
        /// Kind found on the object
        found: String,
        /// Why the object could not be used
        reason: String,
    },
}

impl ReconcileError {
    /// Wrap a client error for `operation`, separating invalid requests from retryable failures.
    #[must_use]
    pub fn from_cloud(
        kind: &'static str,
        name: &str,
        operation: &'static str,
        source: CloudError,
    ) -> Self {
        if source.is_bad_request() {
            Self::InvalidRequest {
                kind,
                name: name.to_string(),
                operation,
                source,
            }
        } else {
            Self::Cloud {
                kind,
                name: name.to_string(),
                operation,
                source,
            }
        }
    }

    /// True if the host should not apply its normal retry cadence to this error.
    #[must_use]
    pub fn is_invalid_request(&self) -> bool {
        matches!(
            self,
            Self::InvalidRequest { .. } | Self::InvalidSpec { .. } | Self::MalformedIdentity { .. }
        )
    }

    /// Short category label used for metrics.
    #[must_use]
    pub fn error_type(&self) -> &'static str {
        match self {
            Self::MalformedIdentity { .. } => "malformed_identity",
            Self::InvalidSpec { .. } => "invalid_spec",
            Self::InvalidRequest { .. } => "invalid_request",
            Self::Cloud { .. } => "cloud_error",
            Self::MissingIdentifier { .. } => "missing_identifier",
            Self::PollTimeout { .. } => "poll_timeout",
            Self::Secret { .. } => "secret_error",
            Self::TypeMismatch { .. } => "type_mismatch",
        }
    }
}

#[cfg(test)]
#[path = "errors_tests.rs"]
mod errors_tests;
