// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! The create-or-bind-or-update decision procedure.
//!
//! A pass resolves which remote object the resource is bound to, creates it if nothing
//! matches, applies an update if a mutable field drifted, and finally maps the freshest
//! observed lifecycle state onto a condition and a [`ReconcileOutcome`].
//!
//! The pass is safe to repeat: a recorded identifier is re-verified rather than
//! recreated, a lookup binds to an object created by an earlier pass whose response was
//! lost, and no update is issued while the remote object matches the spec.
//!
//! Errors are recorded as a `Failed` condition on the status before they are returned.

use crate::client::{CreateResponse, ListQuery};
use crate::context::EngineContext;
use crate::crd::{ConditionType, ResourceStatus};
use crate::errors::{CloudError, ReconcileError, SecretError};
use crate::identity::{first_live_match, resolve_identity, IdentityPath, ResourceId};
use crate::kinds::ResourceKind;
use crate::labels::secret_labels;
use crate::lifecycle::{map_lifecycle, LifecycleClass, LifecycleState};
use crate::metrics;
use crate::reconcilers::remote::{
    RemoteCalls, OP_CREATE, OP_GET, OP_LIST, OP_RESOLVE_NAMESPACE, OP_UPDATE,
};
use crate::reconcilers::retry::{poll_while_creating, PollPolicy};
use crate::reconcilers::status::{push, record_failure, record_remote_id};
use crate::status_reasons::{
    REASON_CREATE_REQUESTED, REASON_UPDATE_REQUESTED, REASON_WORK_REQUEST_ACCEPTED,
};
use std::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// The Kubernetes object a pass runs for.
///
/// The materialized secret is named after the object and lives in its namespace.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ObjectRef<'a> {
    /// `metadata.name`
    pub name: &'a str,
    /// `metadata.namespace`
    pub namespace: &'a str,
}

/// Result of a successful pass.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ReconcileOutcome {
    /// The remote object is active and no error occurred
    pub is_successful: bool,
    /// Call again later; the remote object is still transitioning
    pub should_requeue: bool,
}

impl ReconcileOutcome {
    /// Active and usable.
    pub const READY: Self = Self {
        is_successful: true,
        should_requeue: false,
    };

    /// Still transitioning.
    pub const PENDING: Self = Self {
        is_successful: false,
        should_requeue: true,
    };

    /// Terminally failed remotely; nothing the engine can do.
    pub const FAILED: Self = Self {
        is_successful: false,
        should_requeue: false,
    };
}

/// Drive one resource towards its desired state.
///
/// `spec` is only written to cache a resolved object storage namespace. `status` gains
/// at most a recorded identifier and a few conditions.
///
/// # Errors
///
/// Returns a [`ReconcileError`] if the spec is unusable, a remote call fails, the create
/// poll times out, or the secret cannot be written. A `Failed` condition describing the
/// error has already been appended to `status`.
pub async fn create_or_update<K: ResourceKind>(
    ctx: &EngineContext<K>,
    object: ObjectRef<'_>,
    spec: &mut K::Spec,
    status: &mut ResourceStatus,
    cancel: &CancellationToken,
) -> Result<ReconcileOutcome, ReconcileError> {
    let start = Instant::now();
    let pass = Pass {
        ctx,
        object,
        remote: RemoteCalls::new(ctx, cancel),
        cancel,
    };

    let result = pass.run(spec, status).await;
    let duration = start.elapsed();

    match &result {
        Ok(outcome) if outcome.is_successful => {
            metrics::record_reconciliation_success(K::KIND, duration);
        }
        Ok(outcome) if outcome.should_requeue => {
            metrics::record_reconciliation_pending(K::KIND, duration);
        }
        Ok(_) => metrics::record_reconciliation_failed(K::KIND, duration),
        Err(e) => {
            warn!(kind = K::KIND, name = object.name, error = %e, "Reconcile pass failed");
            record_failure(status, e);
            metrics::record_error(K::KIND, e.error_type());
            metrics::record_reconciliation_error(K::KIND, duration);
        }
    }

    result
}

struct Pass<'a, K: ResourceKind> {
    ctx: &'a EngineContext<K>,
    object: ObjectRef<'a>,
    remote: RemoteCalls<'a, K>,
    cancel: &'a CancellationToken,
}

impl<K: ResourceKind> Pass<'_, K> {
    async fn run(
        &self,
        spec: &mut K::Spec,
        status: &mut ResourceStatus,
    ) -> Result<ReconcileOutcome, ReconcileError> {
        validate::<K>(spec)?;

        match resolve_identity::<K>(spec, status)? {
            IdentityPath::Explicit(id) => {
                debug!(kind = K::KIND, name = K::display_name(spec), remote_id = %id, "Binding to explicit identifier");
                self.bind(spec, status, id).await
            }
            IdentityPath::Recorded(id) => {
                debug!(kind = K::KIND, name = K::display_name(spec), remote_id = %id, "Re-verifying recorded identifier");
                self.bind(spec, status, id).await
            }
            IdentityPath::Lookup => match self.lookup(spec).await? {
                Some(id) => {
                    info!(kind = K::KIND, name = K::display_name(spec), remote_id = %id, "Found existing remote object by name");
                    self.bind(spec, status, id).await
                }
                None => self.create(spec, status).await,
            },
        }
    }

    /// Fetch a known object, record it, update it if needed and map its lifecycle.
    async fn bind(
        &self,
        spec: &K::Spec,
        status: &mut ResourceStatus,
        id: ResourceId,
    ) -> Result<ReconcileOutcome, ReconcileError> {
        let name = K::display_name(spec);
        let observed = self
            .remote
            .get(&id)
            .await
            .map_err(|e| ReconcileError::from_cloud(K::KIND, name, OP_GET, e))?;

        let id = K::remote_id(&observed).unwrap_or(id);
        record_remote_id(status, &id);

        let observed = self.update_if_needed(spec, status, &id, observed).await?;
        self.observe(spec, status, &observed).await
    }

    /// Search by display name for a live object.
    async fn lookup(&self, spec: &mut K::Spec) -> Result<Option<ResourceId>, ReconcileError> {
        let namespace = if K::NAMESPACED {
            Some(self.ensure_namespace(spec).await?)
        } else {
            None
        };

        let name = K::display_name(spec);
        let query = ListQuery {
            compartment_id: K::compartment_id(spec).to_string(),
            namespace,
            display_name: name.to_string(),
            limit: self.ctx.config.list_limit,
        };
        let summaries = self
            .remote
            .list(&query)
            .await
            .map_err(|e| ReconcileError::from_cloud(K::KIND, name, OP_LIST, e))?;

        let Some(summary) = first_live_match::<K>(&summaries, name) else {
            debug!(kind = K::KIND, name, candidates = summaries.len(), "No live remote object matches");
            return Ok(None);
        };
        K::summary_id(summary)
            .map(Some)
            .ok_or_else(|| ReconcileError::MissingIdentifier {
                kind: K::KIND,
                name: name.to_string(),
                operation: OP_LIST,
            })
    }

    /// Resolve and cache the object storage namespace when the spec omits it.
    async fn ensure_namespace(&self, spec: &mut K::Spec) -> Result<String, ReconcileError> {
        if let Some(namespace) = K::namespace(spec) {
            return Ok(namespace.to_string());
        }

        let name = K::display_name(spec).to_string();
        let namespace = self
            .remote
            .resolve_namespace(K::compartment_id(spec))
            .await
            .and_then(|ns| {
                if ns.is_empty() {
                    Err(CloudError::Transport(
                        "empty object storage namespace in response".to_string(),
                    ))
                } else {
                    Ok(ns)
                }
            })
            .map_err(|e| ReconcileError::from_cloud(K::KIND, &name, OP_RESOLVE_NAMESPACE, e))?;

        info!(kind = K::KIND, name = %name, namespace = %namespace, "Resolved object storage namespace");
        K::set_namespace(spec, namespace.clone());
        Ok(namespace)
    }

    async fn create(
        &self,
        spec: &K::Spec,
        status: &mut ResourceStatus,
    ) -> Result<ReconcileOutcome, ReconcileError> {
        let name = K::display_name(spec);
        let details = K::create_details(spec)?;

        info!(kind = K::KIND, name, "Creating remote object");
        let response = self
            .remote
            .create(&details)
            .await
            .map_err(|e| ReconcileError::from_cloud(K::KIND, name, OP_CREATE, e))?;
        metrics::record_resource_created(K::KIND);

        let created = match response {
            CreateResponse::WorkRequest { work_request_id } => {
                let Some(work_request_id) = work_request_id.filter(|id| !id.is_empty()) else {
                    return Err(ReconcileError::MissingIdentifier {
                        kind: K::KIND,
                        name: name.to_string(),
                        operation: OP_CREATE,
                    });
                };
                info!(kind = K::KIND, name, work_request_id = %work_request_id, "Create accepted as work request");
                push(
                    status,
                    ConditionType::Provisioning,
                    REASON_WORK_REQUEST_ACCEPTED,
                    &format!("{} {name} create accepted as work request {work_request_id}", K::KIND),
                );
                return Ok(ReconcileOutcome::PENDING);
            }
            CreateResponse::Object(created) => created,
        };

        let id = K::remote_id(&created).ok_or_else(|| ReconcileError::MissingIdentifier {
            kind: K::KIND,
            name: name.to_string(),
            operation: OP_CREATE,
        })?;
        record_remote_id(status, &id);
        push(
            status,
            ConditionType::Provisioning,
            REASON_CREATE_REQUESTED,
            &format!("{} {name} create requested", K::KIND),
        );

        let created = match K::CREATE_POLL {
            Some(strategy) => {
                let policy = PollPolicy::new(strategy, &self.ctx.config);
                poll_while_creating(self.ctx, &policy, &id, name, created, self.cancel).await?
            }
            None => created,
        };

        let state = K::remote_state(&created);
        if state.class() == LifecycleClass::Transitional {
            debug!(kind = K::KIND, name, state = %state, "Created object is not settled yet");
            return Ok(ReconcileOutcome::PENDING);
        }
        self.observe(spec, status, &created).await
    }

    async fn update_if_needed(
        &self,
        spec: &K::Spec,
        status: &mut ResourceStatus,
        id: &ResourceId,
        observed: K::Remote,
    ) -> Result<K::Remote, ReconcileError> {
        let name = K::display_name(spec);
        let state = K::remote_state(&observed);

        if state.class() != LifecycleClass::Active {
            debug!(kind = K::KIND, name, state = %state, "Skipping update check while not active");
            return Ok(observed);
        }
        if !K::needs_update(spec, &observed) {
            debug!(kind = K::KIND, name, "Remote object matches spec");
            return Ok(observed);
        }

        info!(kind = K::KIND, name, remote_id = %id, "Updating remote object");
        push(
            status,
            ConditionType::Updating,
            REASON_UPDATE_REQUESTED,
            &format!("{} {name} update requested", K::KIND),
        );
        let updated = self
            .remote
            .update(id, &K::update_details(spec))
            .await
            .map_err(|e| ReconcileError::from_cloud(K::KIND, name, OP_UPDATE, e))?;
        metrics::record_resource_updated(K::KIND);
        Ok(updated)
    }

    /// Map the freshest observation onto a condition; publish the secret once active.
    async fn observe(
        &self,
        spec: &K::Spec,
        status: &mut ResourceStatus,
        observed: &K::Remote,
    ) -> Result<ReconcileOutcome, ReconcileError> {
        let name = K::display_name(spec);
        let state = K::remote_state(observed);
        let decision = map_lifecycle(state);

        push(
            status,
            decision.condition,
            decision.reason,
            &format!("{} {name} is {state}", K::KIND),
        );

        if decision.is_successful && K::MATERIALIZES_SECRET {
            self.materialize_secret(spec, observed).await?;
        }

        Ok(ReconcileOutcome {
            is_successful: decision.is_successful,
            should_requeue: decision.should_requeue,
        })
    }

    async fn materialize_secret(
        &self,
        spec: &K::Spec,
        observed: &K::Remote,
    ) -> Result<(), ReconcileError> {
        let data = K::credentials(spec, observed);
        let secret = self.object.name;
        let namespace = self.object.namespace;

        if data.is_empty() {
            debug!(kind = K::KIND, secret, "No connection details to publish yet");
            return Ok(());
        }

        let labels = secret_labels(K::KIND, self.object.name);
        match self
            .ctx
            .secrets
            .create_secret(secret, namespace, &labels, &data)
            .await
        {
            Ok(()) => {
                info!(kind = K::KIND, "Created Secret {}/{}", namespace, secret);
                Ok(())
            }
            Err(SecretError::AlreadyExists { .. }) => {
                match self.ctx.secrets.get_secret(secret, namespace).await {
                    Ok(existing) if existing == data => {}
                    Ok(_) => {
                        if let Err(e) = self
                            .ctx
                            .secrets
                            .update_secret(secret, namespace, &labels, &data)
                            .await
                        {
                            warn!(kind = K::KIND, error = %e, "Failed to refresh Secret {}/{}", namespace, secret);
                        } else {
                            info!(kind = K::KIND, "Refreshed Secret {}/{}", namespace, secret);
                        }
                    }
                    Err(e) => {
                        warn!(kind = K::KIND, error = %e, "Failed to read existing Secret {}/{}", namespace, secret);
                    }
                }
                Ok(())
            }
            Err(source) => Err(ReconcileError::Secret {
                kind: K::KIND,
                name: K::display_name(spec).to_string(),
                secret: secret.to_string(),
                source,
            }),
        }
    }
}

fn validate<K: ResourceKind>(spec: &K::Spec) -> Result<(), ReconcileError> {
    let reason = if K::compartment_id(spec).is_empty() {
        "compartmentId must not be empty"
    } else if K::display_name(spec).is_empty() {
        "display name must not be empty"
    } else {
        return Ok(());
    };
    Err(ReconcileError::InvalidSpec {
        kind: K::KIND,
        name: K::display_name(spec).to_string(),
        reason: reason.to_string(),
    })
}

#[cfg(test)]
#[path = "engine_tests.rs"]
mod engine_tests;
