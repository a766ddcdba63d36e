// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Dispatch over the finite set of managed resource kinds.
//!
//! [`ManagedResource`] is a tagged union of the seven custom resources. A host that
//! receives untyped objects decodes them once with [`ManagedResource::from_dynamic`];
//! from then on [`Engines`] routes each variant to the matching [`EngineContext`]
//! without any runtime downcast.
//!
//! # Example
//!
//! ```rust,no_run
//! use oci_reconciler::resources::{Engines, ManagedResource};
//! use kube::api::DynamicObject;
//! use tokio_util::sync::CancellationToken;
//!
//! async fn handle(engines: &Engines, obj: &DynamicObject) -> anyhow::Result<()> {
//!     let mut resource = ManagedResource::from_dynamic(obj)?;
//!     let outcome = engines.reconcile(&mut resource, &CancellationToken::new()).await?;
//!     println!("{} ready: {}", resource.kind(), outcome.is_successful);
//!     Ok(())
//! }
//! ```

use crate::constants::{
    API_GROUP_VERSION, KIND_API_GATEWAY, KIND_API_GATEWAY_DEPLOYMENT, KIND_DATAFLOW_APPLICATION,
    KIND_NAT_GATEWAY, KIND_OBJECT_STORAGE_BUCKET, KIND_OPENSEARCH_CLUSTER, KIND_QUEUE,
};
use crate::context::EngineContext;
use crate::crd::{
    ApiGateway, ApiGatewayDeployment, DataFlowApplication, NatGateway, ObjectStorageBucket,
    OpenSearchCluster, Queue, ResourceStatus,
};
use crate::errors::ReconcileError;
use crate::kinds::{
    ApiGatewayDeploymentKind, ApiGatewayKind, DataFlowApplicationKind, NatGatewayKind,
    ObjectStorageBucketKind, OpenSearchClusterKind, QueueKind, ResourceKind,
};
use crate::reconcilers::{self, ObjectRef, ReconcileOutcome};
use kube::api::DynamicObject;
use kube::ResourceExt;
use tokio_util::sync::CancellationToken;

/// One of the managed custom resources.
#[derive(Clone, Debug)]
pub enum ManagedResource {
    ApiGateway(ApiGateway),
    ApiGatewayDeployment(ApiGatewayDeployment),
    ObjectStorageBucket(ObjectStorageBucket),
    OpenSearchCluster(OpenSearchCluster),
    Queue(Queue),
    DataFlowApplication(DataFlowApplication),
    NatGateway(NatGateway),
}

/// Apply `$body` to the typed resource inside any variant.
macro_rules! each_variant {
    ($value:expr, $resource:ident => $body:expr) => {
        match $value {
            ManagedResource::ApiGateway($resource) => $body,
            ManagedResource::ApiGatewayDeployment($resource) => $body,
            ManagedResource::ObjectStorageBucket($resource) => $body,
            ManagedResource::OpenSearchCluster($resource) => $body,
            ManagedResource::Queue($resource) => $body,
            ManagedResource::DataFlowApplication($resource) => $body,
            ManagedResource::NatGateway($resource) => $body,
        }
    };
}

fn parse<K: ResourceKind>(obj: &DynamicObject) -> Result<K::Resource, ReconcileError> {
    obj.clone()
        .try_parse::<K::Resource>()
        .map_err(|e| ReconcileError::TypeMismatch {
            found: K::KIND.to_string(),
            reason: e.to_string(),
        })
}

impl ManagedResource {
    /// Decode an untyped object into the matching variant.
    ///
    /// # Errors
    ///
    /// Returns [`ReconcileError::TypeMismatch`] if the object carries no type
    /// information, belongs to another API group, names an unmanaged kind, or its body
    /// does not parse as that kind.
    pub fn from_dynamic(obj: &DynamicObject) -> Result<Self, ReconcileError> {
        let Some(types) = obj.types.as_ref() else {
            return Err(ReconcileError::TypeMismatch {
                found: String::new(),
                reason: "object carries no apiVersion/kind".to_string(),
            });
        };

        if types.api_version != API_GROUP_VERSION {
            return Err(ReconcileError::TypeMismatch {
                found: types.kind.clone(),
                reason: format!(
                    "apiVersion {} is not {API_GROUP_VERSION}",
                    types.api_version
                ),
            });
        }

        match types.kind.as_str() {
            KIND_API_GATEWAY => parse::<ApiGatewayKind>(obj).map(Self::ApiGateway),
            KIND_API_GATEWAY_DEPLOYMENT => {
                parse::<ApiGatewayDeploymentKind>(obj).map(Self::ApiGatewayDeployment)
            }
            KIND_OBJECT_STORAGE_BUCKET => {
                parse::<ObjectStorageBucketKind>(obj).map(Self::ObjectStorageBucket)
            }
            KIND_OPENSEARCH_CLUSTER => {
                parse::<OpenSearchClusterKind>(obj).map(Self::OpenSearchCluster)
            }
            KIND_QUEUE => parse::<QueueKind>(obj).map(Self::Queue),
            KIND_DATAFLOW_APPLICATION => {
                parse::<DataFlowApplicationKind>(obj).map(Self::DataFlowApplication)
            }
            KIND_NAT_GATEWAY => parse::<NatGatewayKind>(obj).map(Self::NatGateway),
            other => Err(ReconcileError::TypeMismatch {
                found: other.to_string(),
                reason: "not a managed resource kind".to_string(),
            }),
        }
    }

    /// Kind name of the variant.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::ApiGateway(_) => KIND_API_GATEWAY,
            Self::ApiGatewayDeployment(_) => KIND_API_GATEWAY_DEPLOYMENT,
            Self::ObjectStorageBucket(_) => KIND_OBJECT_STORAGE_BUCKET,
            Self::OpenSearchCluster(_) => KIND_OPENSEARCH_CLUSTER,
            Self::Queue(_) => KIND_QUEUE,
            Self::DataFlowApplication(_) => KIND_DATAFLOW_APPLICATION,
            Self::NatGateway(_) => KIND_NAT_GATEWAY,
        }
    }

    /// `metadata.name` of the resource.
    #[must_use]
    pub fn name(&self) -> String {
        each_variant!(self, r => r.name_any())
    }

    /// Observed status, if any pass has recorded one.
    #[must_use]
    pub fn status(&self) -> Option<&ResourceStatus> {
        each_variant!(self, r => r.status.as_ref())
    }
}

/// One engine context per managed kind.
#[derive(Clone)]
pub struct Engines {
    pub api_gateway: EngineContext<ApiGatewayKind>,
    pub api_gateway_deployment: EngineContext<ApiGatewayDeploymentKind>,
    pub object_storage_bucket: EngineContext<ObjectStorageBucketKind>,
    pub opensearch_cluster: EngineContext<OpenSearchClusterKind>,
    pub queue: EngineContext<QueueKind>,
    pub dataflow_application: EngineContext<DataFlowApplicationKind>,
    pub nat_gateway: EngineContext<NatGatewayKind>,
}

impl Engines {
    /// Run a create-or-update pass, writing the new spec and status back into `resource`.
    ///
    /// # Errors
    ///
    /// Returns the pass error after its `Failed` condition has been stored on `resource`.
    pub async fn reconcile(
        &self,
        resource: &mut ManagedResource,
        cancel: &CancellationToken,
    ) -> Result<ReconcileOutcome, ReconcileError> {
        match resource {
            ManagedResource::ApiGateway(r) => reconcile_typed(&self.api_gateway, r, cancel).await,
            ManagedResource::ApiGatewayDeployment(r) => {
                reconcile_typed(&self.api_gateway_deployment, r, cancel).await
            }
            ManagedResource::ObjectStorageBucket(r) => {
                reconcile_typed(&self.object_storage_bucket, r, cancel).await
            }
            ManagedResource::OpenSearchCluster(r) => {
                reconcile_typed(&self.opensearch_cluster, r, cancel).await
            }
            ManagedResource::Queue(r) => reconcile_typed(&self.queue, r, cancel).await,
            ManagedResource::DataFlowApplication(r) => {
                reconcile_typed(&self.dataflow_application, r, cancel).await
            }
            ManagedResource::NatGateway(r) => reconcile_typed(&self.nat_gateway, r, cancel).await,
        }
    }

    /// Delete the remote object bound to `resource`.
    ///
    /// # Errors
    ///
    /// Returns the delete error for kinds that propagate remote delete failures.
    pub async fn delete(
        &self,
        resource: &ManagedResource,
        cancel: &CancellationToken,
    ) -> Result<bool, ReconcileError> {
        match resource {
            ManagedResource::ApiGateway(r) => delete_typed(&self.api_gateway, r, cancel).await,
            ManagedResource::ApiGatewayDeployment(r) => {
                delete_typed(&self.api_gateway_deployment, r, cancel).await
            }
            ManagedResource::ObjectStorageBucket(r) => {
                delete_typed(&self.object_storage_bucket, r, cancel).await
            }
            ManagedResource::OpenSearchCluster(r) => {
                delete_typed(&self.opensearch_cluster, r, cancel).await
            }
            ManagedResource::Queue(r) => delete_typed(&self.queue, r, cancel).await,
            ManagedResource::DataFlowApplication(r) => {
                delete_typed(&self.dataflow_application, r, cancel).await
            }
            ManagedResource::NatGateway(r) => delete_typed(&self.nat_gateway, r, cancel).await,
        }
    }
}

/// Run a pass against a typed resource, storing the resulting status on it.
///
/// # Errors
///
/// Returns the pass error; the status carrying its `Failed` condition is stored first.
pub async fn reconcile_typed<K: ResourceKind>(
    ctx: &EngineContext<K>,
    resource: &mut K::Resource,
    cancel: &CancellationToken,
) -> Result<ReconcileOutcome, ReconcileError> {
    let name = resource.name_any();
    let namespace = resource.namespace().unwrap_or_default();
    let mut status = K::status(resource).cloned().unwrap_or_default();

    let result = reconcilers::create_or_update(
        ctx,
        ObjectRef {
            name: &name,
            namespace: &namespace,
        },
        K::spec_mut(resource),
        &mut status,
        cancel,
    )
    .await;

    *K::status_mut(resource) = Some(status);
    result
}

/// Delete the remote object bound to a typed resource.
///
/// # Errors
///
/// Returns the delete error for kinds that propagate remote delete failures.
pub async fn delete_typed<K: ResourceKind>(
    ctx: &EngineContext<K>,
    resource: &K::Resource,
    cancel: &CancellationToken,
) -> Result<bool, ReconcileError> {
    let name = resource.name_any();
    let namespace = resource.namespace().unwrap_or_default();
    let status = K::status(resource).cloned().unwrap_or_default();

    reconcilers::delete(
        ctx,
        ObjectRef {
            name: &name,
            namespace: &namespace,
        },
        K::spec(resource),
        &status,
        cancel,
    )
    .await
}

#[cfg(test)]
#[path = "resources_tests.rs"]
mod resources_tests;
