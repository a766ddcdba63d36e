// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Status condition helpers for managed resources.
//!
//! Conditions are an append-only history: each reconcile pass appends what it observed
//! and consumers read the last entry. Appending a condition identical (ignoring the
//! timestamp) to the last one is a no-op, so steady-state passes do not grow the history
//! or trigger status writes.
//!
//! # Example
//!
//! ```rust
//! use oci_reconciler::crd::{ConditionType, ResourceStatus};
//! use oci_reconciler::reconcilers::status::{append_condition, create_condition, current_condition};
//!
//! let mut status = ResourceStatus::default();
//! let condition = create_condition(ConditionType::Active, "LifecycleActive", "Queue orders is ACTIVE");
//!
//! assert!(append_condition(&mut status.conditions, condition.clone()));
//! assert!(!append_condition(&mut status.conditions, condition));
//! assert_eq!(current_condition(&status.conditions).map(|c| c.r#type), Some(ConditionType::Active));
//! ```

use crate::crd::{Condition, ConditionType, ResourceStatus};
use crate::errors::ReconcileError;
use crate::http_errors::map_reconcile_error_to_reason;
use crate::identity::ResourceId;
use chrono::Utc;
use tracing::{debug, info};

/// Status value recorded on every appended condition.
pub const CONDITION_STATUS_TRUE: &str = "True";

/// Create a new condition with the current timestamp.
#[must_use]
pub fn create_condition(condition_type: ConditionType, reason: &str, message: &str) -> Condition {
    Condition {
        r#type: condition_type,
        status: CONDITION_STATUS_TRUE.to_string(),
        reason: Some(reason.to_string()),
        message: Some(message.to_string()),
        last_transition_time: Some(Utc::now().to_rfc3339()),
    }
}

/// Check if a condition differs from the last recorded one.
///
/// Type, status, reason and message are compared; `lastTransitionTime` is not.
#[must_use]
pub fn condition_changed(existing: Option<&Condition>, new_condition: &Condition) -> bool {
    existing.is_none_or(|current| {
        current.r#type != new_condition.r#type
            || current.status != new_condition.status
            || current.reason != new_condition.reason
            || current.message != new_condition.message
    })
}

/// The most recent condition.
#[must_use]
pub fn current_condition(conditions: &[Condition]) -> Option<&Condition> {
    conditions.last()
}

/// Append a condition unless it repeats the last one.
///
/// Returns `true` if the history grew.
pub fn append_condition(conditions: &mut Vec<Condition>, condition: Condition) -> bool {
    if condition_changed(conditions.last(), &condition) {
        debug!(
            condition_type = %condition.r#type,
            reason = condition.reason.as_deref().unwrap_or_default(),
            "Appending condition"
        );
        conditions.push(condition);
        true
    } else {
        false
    }
}

/// Append a condition built from its parts.
pub fn push(status: &mut ResourceStatus, condition_type: ConditionType, reason: &str, message: &str) {
    append_condition(
        &mut status.conditions,
        create_condition(condition_type, reason, message),
    );
}

/// Record the remote identifier the resource is bound to.
///
/// `createdAt` is set the first time an identifier is recorded and never changed.
/// Returns `true` if the stored identifier changed.
pub fn record_remote_id(status: &mut ResourceStatus, id: &ResourceId) -> bool {
    let id = id.to_string();
    if status.remote_id.as_deref() == Some(id.as_str()) {
        return false;
    }
    if let Some(previous) = status.remote_id.as_deref().filter(|p| !p.is_empty()) {
        info!("Rebinding from remote object {} to {}", previous, id);
    }
    status.remote_id = Some(id);
    if status.created_at.is_none() {
        status.created_at = Some(Utc::now().to_rfc3339());
    }
    true
}

/// Append a `Failed` condition describing an error that ended a pass.
pub fn record_failure(status: &mut ResourceStatus, error: &ReconcileError) {
    push(
        status,
        ConditionType::Failed,
        map_reconcile_error_to_reason(error),
        &error.to_string(),
    );
}

#[cfg(test)]
#[path = "status_tests.rs"]
mod status_tests;
