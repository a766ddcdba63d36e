// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Unit tests for `http_errors.rs`

#[cfg(test)]
mod tests {
    use crate::errors::{CloudError, ReconcileError, SecretError};
    use crate::http_errors::*;
    use std::time::Duration;

    #[test]
    fn test_map_http_400() {
        let (reason, message) = map_http_error_to_reason(400);
        assert_eq!(reason, REASON_INVALID_REQUEST);
        assert!(message.contains("400"));
    }

    #[test]
    fn test_map_http_auth_codes() {
        assert_eq!(map_http_error_to_reason(401).0, REASON_AUTH_FAILED);
        assert_eq!(map_http_error_to_reason(403).0, REASON_AUTH_FAILED);
    }

    #[test]
    fn test_map_http_404() {
        let (reason, message) = map_http_error_to_reason(404);
        assert_eq!(reason, REASON_REMOTE_NOT_FOUND);
        assert!(message.contains("not found"));
    }

    #[test]
    fn test_map_http_409_and_429() {
        assert_eq!(map_http_error_to_reason(409).0, REASON_REMOTE_CONFLICT);
        assert_eq!(map_http_error_to_reason(429).0, REASON_RATE_LIMITED);
    }

    #[test]
    fn test_map_http_5xx() {
        for code in [500, 502, 503, 504, 599] {
            let (reason, message) = map_http_error_to_reason(code);
            assert_eq!(reason, REASON_REMOTE_SERVICE_ERROR);
            assert!(message.contains(&code.to_string()));
        }
    }

    #[test]
    fn test_map_http_other_4xx() {
        let (reason, message) = map_http_error_to_reason(412);
        assert_eq!(reason, REASON_INVALID_REQUEST);
        assert!(message.contains("412"));
    }

    #[test]
    fn test_map_http_unknown() {
        let (reason, message) = map_http_error_to_reason(302);
        assert_eq!(reason, REASON_REMOTE_UNREACHABLE);
        assert!(message.contains("302"));
    }

    #[test]
    fn test_map_cloud_error_without_status() {
        assert_eq!(
            map_cloud_error_to_reason(&CloudError::Transport("connection reset".into())),
            REASON_REMOTE_UNREACHABLE
        );
        assert_eq!(
            map_cloud_error_to_reason(&CloudError::Timeout(Duration::from_secs(30))),
            REASON_REMOTE_TIMEOUT
        );
        assert_eq!(
            map_cloud_error_to_reason(&CloudError::Cancelled),
            REASON_CANCELLED
        );
    }

    #[test]
    fn test_map_reconcile_error() {
        let error = ReconcileError::from_cloud(
            "Queue",
            "orders",
            "create",
            CloudError::from_status(400, "bad"),
        );
        assert_eq!(map_reconcile_error_to_reason(&error), REASON_INVALID_REQUEST);

        let error = ReconcileError::MissingIdentifier {
            kind: "Queue",
            name: "orders".into(),
            operation: "create",
        };
        assert_eq!(
            map_reconcile_error_to_reason(&error),
            REASON_MISSING_IDENTIFIER
        );

        let error = ReconcileError::Secret {
            kind: "Queue",
            name: "orders".into(),
            secret: "orders".into(),
            source: SecretError::Store("forbidden".into()),
        };
        assert_eq!(map_reconcile_error_to_reason(&error), REASON_SECRET_FAILED);
    }
}
