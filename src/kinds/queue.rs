// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Managed message queues.
//!
//! Queue creation is asynchronous: the create call returns a work request and the queue
//! is found by display name on the next pass. The messages endpoint is published under
//! `messagesEndpoint`.

use super::{credential_map, invalid_spec, opaque_id, DeletePolicy, ResourceKind};
use crate::constants::KIND_QUEUE;
use crate::crd::{Queue, QueueSpec, ResourceStatus};
use crate::errors::ReconcileError;
use crate::identity::ResourceId;
use crate::labels::FINALIZER_QUEUE;
use crate::predicate::{number_differs, required_string_differs, string_differs, tags_differ};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

crate::lifecycle_states! {
    /// Lifecycle of a queue.
    QueueState {
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

/// Secret key holding the messages endpoint.
pub const SECRET_KEY_MESSAGES_ENDPOINT: &str = "messagesEndpoint";

/// A queue as returned by the remote API.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoteQueue {
    pub id: String,
    pub compartment_id: String,
    pub display_name: String,
    pub lifecycle_state: QueueState,
    #[serde(default)]
    pub messages_endpoint: Option<String>,
    #[serde(default)]
    pub retention_in_seconds: Option<i32>,
    #[serde(default)]
    pub visibility_in_seconds: Option<i32>,
    #[serde(default)]
    pub timeout_in_seconds: Option<i32>,
    #[serde(default)]
    pub dead_letter_queue_delivery_count: Option<i32>,
    #[serde(default)]
    pub custom_encryption_key_id: Option<String>,
    #[serde(default)]
    pub freeform_tags: BTreeMap<String, String>,
}

/// A queue list entry.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueueSummary {
    pub id: String,
    pub display_name: String,
    pub lifecycle_state: QueueState,
}

/// Body of a create queue call.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateQueueDetails {
    pub compartment_id: String,
    pub display_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub retention_in_seconds: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub visibility_in_seconds: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout_in_seconds: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dead_letter_queue_delivery_count: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub custom_encryption_key_id: Option<String>,
    pub freeform_tags: BTreeMap<String, String>,
}

/// Body of an update queue call. Retention cannot be changed after creation.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateQueueDetails {
    pub display_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub visibility_in_seconds: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout_in_seconds: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dead_letter_queue_delivery_count: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub custom_encryption_key_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub freeform_tags: Option<BTreeMap<String, String>>,
}

/// [`ResourceKind`] implementation for [`Queue`].
pub struct QueueKind;

impl ResourceKind for QueueKind {
    type Resource = Queue;
    type Spec = QueueSpec;
    type Remote = RemoteQueue;
    type Summary = QueueSummary;
    type CreateDetails = CreateQueueDetails;
    type UpdateDetails = UpdateQueueDetails;
    type State = QueueState;

    const KIND: &'static str = KIND_QUEUE;
    const FINALIZER: &'static str = FINALIZER_QUEUE;
    const DELETE_POLICY: DeletePolicy = DeletePolicy::Propagate;

    fn spec(resource: &Queue) -> &QueueSpec {
        &resource.spec
    }

    fn spec_mut(resource: &mut Queue) -> &mut QueueSpec {
        &mut resource.spec
    }

    fn status(resource: &Queue) -> Option<&ResourceStatus> {
        resource.status.as_ref()
    }

    fn status_mut(resource: &mut Queue) -> &mut Option<ResourceStatus> {
        &mut resource.status
    }

    fn display_name(spec: &QueueSpec) -> &str {
        &spec.display_name
    }

    fn compartment_id(spec: &QueueSpec) -> &str {
        &spec.compartment_id
    }

    fn explicit_id(spec: &QueueSpec) -> Option<&str> {
        spec.id.as_deref()
    }

    fn remote_id(remote: &RemoteQueue) -> Option<ResourceId> {
        opaque_id(&remote.id)
    }

    fn remote_state(remote: &RemoteQueue) -> QueueState {
        remote.lifecycle_state
    }

    fn summary_id(summary: &QueueSummary) -> Option<ResourceId> {
        opaque_id(&summary.id)
    }

    fn summary_name(summary: &QueueSummary) -> &str {
        &summary.display_name
    }

    fn summary_state(summary: &QueueSummary) -> QueueState {
        summary.lifecycle_state
    }

    fn create_details(spec: &QueueSpec) -> Result<CreateQueueDetails, ReconcileError> {
        let durations = [
            ("retentionInSeconds", spec.retention_in_seconds),
            ("visibilityInSeconds", spec.visibility_in_seconds),
            ("timeoutInSeconds", spec.timeout_in_seconds),
            ("deadLetterQueueDeliveryCount", spec.dead_letter_queue_delivery_count),
        ];
        if let Some((field, _)) = durations.iter().find(|(_, v)| v.is_some_and(|v| v < 0)) {
            return Err(invalid_spec::<Self>(spec, format!("{field} must not be negative")));
        }

        Ok(CreateQueueDetails {
            compartment_id: spec.compartment_id.clone(),
            display_name: spec.display_name.clone(),
            retention_in_seconds: spec.retention_in_seconds,
            visibility_in_seconds: spec.visibility_in_seconds,
            timeout_in_seconds: spec.timeout_in_seconds,
            dead_letter_queue_delivery_count: spec.dead_letter_queue_delivery_count,
            custom_encryption_key_id: spec.custom_encryption_key_id.clone(),
            freeform_tags: spec.freeform_tags.clone().unwrap_or_default(),
        })
    }

    fn needs_update(spec: &QueueSpec, remote: &RemoteQueue) -> bool {
        required_string_differs(&spec.display_name, &remote.display_name)
            || number_differs(spec.visibility_in_seconds, remote.visibility_in_seconds)
            || number_differs(spec.timeout_in_seconds, remote.timeout_in_seconds)
            || number_differs(
                spec.dead_letter_queue_delivery_count,
                remote.dead_letter_queue_delivery_count,
            )
            || string_differs(
                spec.custom_encryption_key_id.as_deref(),
                remote.custom_encryption_key_id.as_deref(),
            )
            || tags_differ(spec.freeform_tags.as_ref(), &remote.freeform_tags)
    }

    fn update_details(spec: &QueueSpec) -> UpdateQueueDetails {
        UpdateQueueDetails {
            display_name: spec.display_name.clone(),
            visibility_in_seconds: spec.visibility_in_seconds,
            timeout_in_seconds: spec.timeout_in_seconds,
            dead_letter_queue_delivery_count: spec.dead_letter_queue_delivery_count,
            custom_encryption_key_id: spec.custom_encryption_key_id.clone(),
            freeform_tags: spec.freeform_tags.clone(),
        }
    }

    fn credentials(_spec: &QueueSpec, remote: &RemoteQueue) -> BTreeMap<String, Vec<u8>> {
        credential_map([(
            SECRET_KEY_MESSAGES_ENDPOINT,
            remote.messages_endpoint.as_deref(),
        )])
    }
}

#[cfg(test)]
#[path = "queue_tests.rs"]
mod queue_tests;
