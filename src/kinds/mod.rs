// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Resource kind capabilities.
//!
//! The engine is generic over [`ResourceKind`]. Each implementation supplies the
//! kind-specific pieces: remote models, lifecycle states, how to build create and update
//! requests, which fields trigger an update, and which endpoints to publish in a secret.
//! Everything else (identity resolution, polling, status bookkeeping, deletion) is shared.
//!
//! | Kind | Identifier | Create returns | Delete errors | Create poll |
//! |------|------------|----------------|---------------|-------------|
//! | [`ApiGatewayKind`] | opaque | object | propagate | none |
//! | [`ApiGatewayDeploymentKind`] | opaque | object | swallow | exponential |
//! | [`ObjectStorageBucketKind`] | `namespace/name` | object | propagate | none |
//! | [`OpenSearchClusterKind`] | opaque | work request | swallow | none |
//! | [`QueueKind`] | opaque | work request | propagate | none |
//! | [`DataFlowApplicationKind`] | opaque | object | swallow | none |
//! | [`NatGatewayKind`] | opaque | object | propagate | fixed |

use crate::crd::ResourceStatus;
use crate::errors::ReconcileError;
use crate::identity::{IdentifierStyle, ResourceId};
use crate::lifecycle::LifecycleState;
use k8s_openapi::NamespaceResourceScope;
use kube::Resource;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt::Debug;

pub mod api_gateway;
pub mod api_gateway_deployment;
pub mod dataflow_application;
pub mod nat_gateway;
pub mod object_storage_bucket;
pub mod opensearch_cluster;
pub mod queue;

pub use api_gateway::ApiGatewayKind;
pub use api_gateway_deployment::ApiGatewayDeploymentKind;
pub use dataflow_application::DataFlowApplicationKind;
pub use nat_gateway::NatGatewayKind;
pub use object_storage_bucket::ObjectStorageBucketKind;
pub use opensearch_cluster::OpenSearchClusterKind;
pub use queue::QueueKind;

/// What a failed remote delete does to the delete pass.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DeletePolicy {
    /// Return the error; the finalizer stays and deletion is retried
    Propagate,
    /// Log the error and report the delete as done
    Swallow,
}

/// Delay schedule used while waiting for a created object to leave its creating state.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PollStrategy {
    /// The configured poll interval between every attempt
    Fixed,
    /// `base^attempt` seconds, capped
    Exponential,
}

/// Capabilities of a managed resource kind.
pub trait ResourceKind: Send + Sync + 'static {
    /// The Kubernetes custom resource declaring this kind
    type Resource: Resource<DynamicType = (), Scope = NamespaceResourceScope>
        + Clone
        + Debug
        + DeserializeOwned
        + Serialize
        + Send
        + Sync
        + 'static;

    /// Desired state
    type Spec: Clone + Debug + Send + Sync + 'static;

    /// Full remote object returned by create, get and update
    type Remote: Clone + Debug + Send + Sync + 'static;

    /// Entry returned by list
    type Summary: Clone + Debug + Send + Sync + 'static;

    /// Body of a create call
    type CreateDetails: Clone + Debug + Send + Sync + 'static;

    /// Body of an update call
    type UpdateDetails: Clone + Debug + Send + Sync + 'static;

    /// Remote lifecycle states
    type State: LifecycleState;

    /// Kind name, used in logs, metrics and error messages
    const KIND: &'static str;

    /// Finalizer guarding deletion of the custom resource
    const FINALIZER: &'static str;

    /// How remote objects are identified
    const IDENTIFIER: IdentifierStyle = IdentifierStyle::Opaque;

    /// Whether a failed remote delete blocks removal of the custom resource
    const DELETE_POLICY: DeletePolicy;

    /// Wait for a created object to leave its creating state within the create pass
    const CREATE_POLL: Option<PollStrategy> = None;

    /// The kind is scoped by an object storage namespace that may need resolving
    const NAMESPACED: bool = false;

    /// The kind publishes connection details in a secret
    const MATERIALIZES_SECRET: bool = true;

    /// Borrow the spec of a custom resource.
    fn spec(resource: &Self::Resource) -> &Self::Spec;

    /// Mutably borrow the spec of a custom resource.
    fn spec_mut(resource: &mut Self::Resource) -> &mut Self::Spec;

    /// Borrow the status of a custom resource.
    fn status(resource: &Self::Resource) -> Option<&ResourceStatus>;

    /// Mutably borrow the status slot of a custom resource.
    fn status_mut(resource: &mut Self::Resource) -> &mut Option<ResourceStatus>;

    /// Name used for lookups, logs and messages.
    fn display_name(spec: &Self::Spec) -> &str;

    /// Compartment owning the remote object.
    fn compartment_id(spec: &Self::Spec) -> &str;

    /// Identifier given in the spec, if any.
    fn explicit_id(spec: &Self::Spec) -> Option<&str>;

    /// Object storage namespace from the spec, for [`Self::NAMESPACED`] kinds.
    fn namespace(_spec: &Self::Spec) -> Option<&str> {
        None
    }

    /// Store a resolved object storage namespace back into the spec.
    fn set_namespace(_spec: &mut Self::Spec, _namespace: String) {}

    /// Identifier of a remote object. `None` if the object carries no usable identifier.
    fn remote_id(remote: &Self::Remote) -> Option<ResourceId>;

    /// Lifecycle state of a remote object.
    fn remote_state(remote: &Self::Remote) -> Self::State;

    /// Identifier of a list entry.
    fn summary_id(summary: &Self::Summary) -> Option<ResourceId>;

    /// Display name of a list entry.
    fn summary_name(summary: &Self::Summary) -> &str;

    /// Lifecycle state of a list entry.
    fn summary_state(summary: &Self::Summary) -> Self::State;

    /// Build the create request.
    ///
    /// # Errors
    ///
    /// Returns [`ReconcileError::InvalidSpec`] if the spec cannot be expressed as a request.
    fn create_details(spec: &Self::Spec) -> Result<Self::CreateDetails, ReconcileError>;

    /// True if a mutable field set in the spec differs from the remote object.
    ///
    /// Fields the spec leaves unset are never compared.
    fn needs_update(spec: &Self::Spec, remote: &Self::Remote) -> bool;

    /// Build the update request.
    fn update_details(spec: &Self::Spec) -> Self::UpdateDetails;

    /// Secret payload published once the remote object is active.
    fn credentials(_spec: &Self::Spec, _remote: &Self::Remote) -> BTreeMap<String, Vec<u8>> {
        BTreeMap::new()
    }
}

/// Shorthand for an [`ReconcileError::InvalidSpec`] raised while building a request.
pub(crate) fn invalid_spec<K: ResourceKind>(spec: &K::Spec, reason: impl Into<String>) -> ReconcileError {
    ReconcileError::InvalidSpec {
        kind: K::KIND,
        name: K::display_name(spec).to_string(),
        reason: reason.into(),
    }
}

/// Build a secret payload from string values, skipping empty ones.
pub(crate) fn credential_map<'a, I>(entries: I) -> BTreeMap<String, Vec<u8>>
where
    I: IntoIterator<Item = (&'a str, Option<&'a str>)>,
{
    entries
        .into_iter()
        .filter_map(|(key, value)| {
            value
                .filter(|v| !v.is_empty())
                .map(|v| (key.to_string(), v.as_bytes().to_vec()))
        })
        .collect()
}

/// Opaque identifier from a remote `id` field. Empty identifiers are unusable.
pub(crate) fn opaque_id(id: &str) -> Option<ResourceId> {
    (!id.is_empty()).then(|| ResourceId::Opaque(id.to_string()))
}
