// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! kube-runtime glue for the engine.
//!
//! [`run_controller`] watches one custom resource kind and drives each object through
//! [`reconcile`]:
//!
//! 1. Objects being deleted run the delete pass and, once it reports done, lose their
//!    finalizer.
//! 2. Live objects gain the kind's finalizer, then run a create-or-update pass.
//! 3. The resulting status is patched only when it differs from the stored one, so
//!    steady-state passes do not write to the API server.
//!
//! The [`ReconcileOutcome`] of a pass becomes a requeue [`Action`]; errors go through
//! [`error_policy`].

use crate::config::EngineConfig;
use crate::constants::{FIELD_MANAGER, REQUEUE_RANDOMIZATION_FACTOR};
use crate::context::EngineContext;
use crate::errors::ReconcileError;
use crate::kinds::ResourceKind;
use crate::metrics;
use crate::reconcilers::retry::apply_jitter;
use crate::reconcilers::{generation_changed, status_changed, ReconcileOutcome};
use crate::resources::{delete_typed, reconcile_typed};
use anyhow::Context as _;
use futures::StreamExt;
use kube::api::{Patch, PatchParams};
use kube::runtime::{controller::Action, watcher::Config, Controller};
use kube::{Api, Client, Resource, ResourceExt};
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info};

/// Error returned from [`reconcile`] to the controller runtime.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The engine pass failed
    #[error(transparent)]
    Reconcile(#[from] ReconcileError),

    /// Talking to the Kubernetes API failed
    #[error(transparent)]
    Kube(#[from] anyhow::Error),
}

impl Error {
    /// True if the failure will not go away without a spec change.
    #[must_use]
    pub fn is_invalid_request(&self) -> bool {
        matches!(self, Self::Reconcile(e) if e.is_invalid_request())
    }
}

/// State shared by every reconcile of one kind.
pub struct ControllerContext<K: ResourceKind> {
    /// Kubernetes client used for finalizer and status patches
    pub client: Client,

    /// Engine dependencies for the kind
    pub engine: EngineContext<K>,

    /// Cancelled on shutdown; every pass runs under a child token
    pub shutdown: CancellationToken,
}

/// Requeue interval for a finished pass, before jitter.
///
/// `None` means the resource is terminally failed remotely and only a change to the
/// object should trigger another pass.
#[must_use]
pub fn requeue_interval(outcome: &ReconcileOutcome, config: &EngineConfig) -> Option<Duration> {
    if outcome.is_successful {
        Some(config.requeue_ready)
    } else if outcome.should_requeue {
        Some(config.requeue_pending)
    } else {
        None
    }
}

/// Map a pass outcome to the controller's scheduling decision.
#[must_use]
pub fn outcome_to_action(outcome: &ReconcileOutcome, config: &EngineConfig) -> Action {
    match requeue_interval(outcome, config) {
        Some(interval) => Action::requeue(apply_jitter(interval, REQUEUE_RANDOMIZATION_FACTOR)),
        None => Action::await_change(),
    }
}

/// Requeue interval after a failed pass.
///
/// Requests the remote API rejected as invalid wait for the longer interval.
#[must_use]
pub fn requeue_after_error(err: &Error, config: &EngineConfig) -> Duration {
    if err.is_invalid_request() {
        config.requeue_invalid
    } else {
        config.requeue_error
    }
}

/// Error policy handed to the controller runtime.
pub fn error_policy<K: ResourceKind>(
    resource: Arc<K::Resource>,
    err: &Error,
    ctx: Arc<ControllerContext<K>>,
) -> Action {
    let delay = requeue_after_error(err, &ctx.engine.config);
    let reason = if err.is_invalid_request() {
        "invalid"
    } else {
        "error"
    };
    error!(
        kind = K::KIND,
        name = %resource.name_any(),
        error = %err,
        requeue_secs = delay.as_secs(),
        "Reconciliation error"
    );
    metrics::record_reconciliation_requeue(K::KIND, reason);
    Action::requeue(delay)
}

/// Reconcile one custom resource.
///
/// # Errors
///
/// Returns an error if the engine pass fails or a Kubernetes patch is rejected.
pub async fn reconcile<K: ResourceKind>(
    resource: Arc<K::Resource>,
    ctx: Arc<ControllerContext<K>>,
) -> Result<Action, Error> {
    let namespace = resource.namespace().unwrap_or_default();
    let api: Api<K::Resource> = Api::namespaced(ctx.client.clone(), &namespace);
    let cancel = ctx.shutdown.child_token();

    if resource.meta().deletion_timestamp.is_some() {
        return cleanup::<K>(&api, &resource, &ctx.engine, &cancel).await;
    }

    ensure_finalizer::<K>(&api, &resource).await?;

    let generation = resource.meta().generation;
    let observed = K::status(&resource).and_then(|s| s.observed_generation);
    if !generation_changed(generation, observed) {
        debug!(
            kind = K::KIND,
            name = %resource.name_any(),
            "Spec unchanged since last pass, re-verifying remote state"
        );
    }

    let mut updated = (*resource).clone();
    let result = reconcile_typed(&ctx.engine, &mut updated, &cancel).await;

    if let Some(status) = K::status_mut(&mut updated).as_mut() {
        status.observed_generation = generation;
    }

    if K::NAMESPACED && K::namespace(K::spec(&resource)) != K::namespace(K::spec(&updated)) {
        patch_spec::<K>(&api, &updated).await?;
    }

    let current = K::status(&resource).cloned();
    let new = K::status(&updated).cloned();
    if status_changed(&current, &new) {
        patch_status::<K>(&api, &updated).await?;
    }

    let outcome = result?;
    Ok(outcome_to_action(&outcome, &ctx.engine.config))
}

async fn cleanup<K: ResourceKind>(
    api: &Api<K::Resource>,
    resource: &K::Resource,
    engine: &EngineContext<K>,
    cancel: &CancellationToken,
) -> Result<Action, Error> {
    let name = resource.name_any();

    if !has_finalizer::<K>(resource) {
        return Ok(Action::await_change());
    }

    info!(kind = K::KIND, name = %name, "Resource is being deleted, running cleanup");

    if delete_typed(engine, resource, cancel).await? {
        remove_finalizer::<K>(api, resource).await?;
    }
    Ok(Action::await_change())
}

fn has_finalizer<K: ResourceKind>(resource: &K::Resource) -> bool {
    resource.finalizers().iter().any(|f| f == K::FINALIZER)
}

async fn ensure_finalizer<K: ResourceKind>(
    api: &Api<K::Resource>,
    resource: &K::Resource,
) -> anyhow::Result<()> {
    if has_finalizer::<K>(resource) {
        return Ok(());
    }

    let name = resource.name_any();
    info!(kind = K::KIND, name = %name, finalizer = K::FINALIZER, "Adding finalizer");

    let mut finalizers = resource.finalizers().to_vec();
    finalizers.push(K::FINALIZER.to_string());
    let patch = json!({ "metadata": { "finalizers": finalizers } });
    api.patch(&name, &PatchParams::default(), &Patch::Merge(&patch))
        .await
        .with_context(|| format!("failed to add finalizer to {} {name}", K::KIND))?;
    Ok(())
}

async fn remove_finalizer<K: ResourceKind>(
    api: &Api<K::Resource>,
    resource: &K::Resource,
) -> anyhow::Result<()> {
    let name = resource.name_any();
    info!(kind = K::KIND, name = %name, finalizer = K::FINALIZER, "Removing finalizer");

    let finalizers: Vec<String> = resource
        .finalizers()
        .iter()
        .filter(|f| f.as_str() != K::FINALIZER)
        .cloned()
        .collect();
    let patch = json!({ "metadata": { "finalizers": finalizers } });
    api.patch(&name, &PatchParams::default(), &Patch::Merge(&patch))
        .await
        .with_context(|| format!("failed to remove finalizer from {} {name}", K::KIND))?;
    Ok(())
}

async fn patch_status<K: ResourceKind>(
    api: &Api<K::Resource>,
    resource: &K::Resource,
) -> anyhow::Result<()> {
    let name = resource.name_any();
    let patch = json!({ "status": K::status(resource) });
    api.patch_status(&name, &PatchParams::apply(FIELD_MANAGER), &Patch::Merge(&patch))
        .await
        .with_context(|| format!("failed to patch status of {} {name}", K::KIND))?;
    Ok(())
}

// Only the resolved namespace is written back; the rest of the spec is user-owned.
async fn patch_spec<K: ResourceKind>(
    api: &Api<K::Resource>,
    resource: &K::Resource,
) -> anyhow::Result<()> {
    let name = resource.name_any();
    let patch = json!({ "spec": { "namespace": K::namespace(K::spec(resource)) } });
    info!(kind = K::KIND, name = %name, "Caching resolved object storage namespace");
    api.patch(&name, &PatchParams::apply(FIELD_MANAGER), &Patch::Merge(&patch))
        .await
        .with_context(|| format!("failed to cache namespace on {} {name}", K::KIND))?;
    Ok(())
}

/// Run the controller for one kind until the watch stream ends.
pub async fn run_controller<K: ResourceKind>(
    client: Client,
    engine: EngineContext<K>,
    shutdown: CancellationToken,
) {
    info!(kind = K::KIND, "Starting controller");

    let api: Api<K::Resource> = Api::all(client.clone());
    let ctx = Arc::new(ControllerContext {
        client,
        engine,
        shutdown: shutdown.clone(),
    });

    Controller::new(api, Config::default())
        .run(reconcile::<K>, error_policy::<K>, ctx)
        .take_until(shutdown.cancelled_owned())
        .for_each(|result| {
            if let Err(e) = result {
                debug!(kind = K::KIND, error = %e, "Controller event error");
            }
            futures::future::ready(())
        })
        .await;
}

#[cfg(test)]
#[path = "controller_tests.rs"]
mod controller_tests;
