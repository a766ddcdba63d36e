// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Teardown of remote objects when a managed resource is deleted.
//!
//! Deletion is idempotent: a resource that never recorded an identifier has nothing to
//! delete, a 404 means the object is already gone, and a malformed stored identifier is
//! logged and treated as nothing to act on. Other remote failures follow the kind's
//! [`DeletePolicy`]. Cancellation always propagates.
//!
//! The credentials secret is deleted best-effort afterwards.

use crate::context::EngineContext;
use crate::crd::ResourceStatus;
use crate::errors::{CloudError, ReconcileError, SecretError};
use crate::identity::ResourceId;
use crate::kinds::{DeletePolicy, ResourceKind};
use crate::metrics;
use crate::reconcilers::engine::ObjectRef;
use crate::reconcilers::remote::{RemoteCalls, OP_DELETE};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Delete the remote object bound to a resource.
///
/// Returns `Ok(true)` once the resource may be released by its finalizer.
///
/// # Errors
///
/// Returns [`ReconcileError::Cloud`] if the remote delete fails for a kind using
/// [`DeletePolicy::Propagate`], or if the pass is cancelled.
pub async fn delete<K: ResourceKind>(
    ctx: &EngineContext<K>,
    object: ObjectRef<'_>,
    spec: &K::Spec,
    status: &ResourceStatus,
    cancel: &CancellationToken,
) -> Result<bool, ReconcileError> {
    let name = K::display_name(spec);
    let recorded = K::explicit_id(spec)
        .filter(|id| !id.is_empty())
        .or_else(|| status.remote_id.as_deref().filter(|id| !id.is_empty()));

    let Some(raw) = recorded else {
        debug!(kind = K::KIND, name, "No remote identifier recorded, nothing to delete");
        return Ok(true);
    };

    match ResourceId::parse(K::IDENTIFIER, raw) {
        Some(id) => delete_remote(ctx, name, &id, cancel).await?,
        None => {
            warn!(kind = K::KIND, name, remote_id = raw, "Ignoring malformed identifier during deletion");
        }
    }

    if K::MATERIALIZES_SECRET {
        delete_secret::<K>(ctx, object).await;
    }
    Ok(true)
}

async fn delete_remote<K: ResourceKind>(
    ctx: &EngineContext<K>,
    name: &str,
    id: &ResourceId,
    cancel: &CancellationToken,
) -> Result<(), ReconcileError> {
    match RemoteCalls::new(ctx, cancel).delete(id).await {
        Ok(()) => {
            info!(kind = K::KIND, name, remote_id = %id, "Deleted remote object");
            metrics::record_resource_deleted(K::KIND);
            Ok(())
        }
        Err(e) if e.is_not_found() => {
            debug!(kind = K::KIND, name, remote_id = %id, "Remote object already gone");
            Ok(())
        }
        Err(e) if e == CloudError::Cancelled || K::DELETE_POLICY == DeletePolicy::Propagate => {
            let error = ReconcileError::from_cloud(K::KIND, name, OP_DELETE, e);
            metrics::record_error(K::KIND, error.error_type());
            Err(error)
        }
        Err(e) => {
            warn!(
                kind = K::KIND,
                name,
                remote_id = %id,
                error = %e,
                "Remote delete failed, releasing resource anyway"
            );
            metrics::record_error(K::KIND, "delete_swallowed");
            Ok(())
        }
    }
}

async fn delete_secret<K: ResourceKind>(ctx: &EngineContext<K>, object: ObjectRef<'_>) {
    match ctx.secrets.delete_secret(object.name, object.namespace).await {
        Ok(()) => info!(kind = K::KIND, "Deleted Secret {}/{}", object.namespace, object.name),
        Err(SecretError::NotFound { .. }) => {}
        Err(e) => warn!(
            kind = K::KIND,
            error = %e,
            "Failed to delete Secret {}/{}", object.namespace, object.name
        ),
    }
}

#[cfg(test)]
#[path = "deletion_tests.rs"]
mod deletion_tests;
