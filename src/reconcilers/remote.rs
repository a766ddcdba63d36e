// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Bounded, cancellable calls to the remote API.
//!
//! Every call made by the engine goes through [`RemoteCalls`], which races the client
//! future against the caller's [`CancellationToken`] and the configured call timeout, and
//! records the call in the remote call metrics.

use crate::client::{CreateResponse, ListQuery};
use crate::context::EngineContext;
use crate::errors::CloudError;
use crate::identity::ResourceId;
use crate::kinds::ResourceKind;
use crate::metrics::record_remote_call;
use std::future::Future;
use std::time::Instant;
use tokio_util::sync::CancellationToken;

pub const OP_CREATE: &str = "create";
pub const OP_GET: &str = "get";
pub const OP_LIST: &str = "list";
pub const OP_UPDATE: &str = "update";
pub const OP_DELETE: &str = "delete";
pub const OP_RESOLVE_NAMESPACE: &str = "resolve_namespace";

/// Remote operations for one pass, bound to its cancellation token.
pub(crate) struct RemoteCalls<'a, K: ResourceKind> {
    ctx: &'a EngineContext<K>,
    cancel: &'a CancellationToken,
}

impl<'a, K: ResourceKind> RemoteCalls<'a, K> {
    pub(crate) fn new(ctx: &'a EngineContext<K>, cancel: &'a CancellationToken) -> Self {
        Self { ctx, cancel }
    }

    pub(crate) async fn create(
        &self,
        details: &K::CreateDetails,
    ) -> Result<CreateResponse<K::Remote>, CloudError> {
        self.guarded(OP_CREATE, self.ctx.client.create(details)).await
    }

    pub(crate) async fn get(&self, id: &ResourceId) -> Result<K::Remote, CloudError> {
        self.guarded(OP_GET, self.ctx.client.get(id)).await
    }

    pub(crate) async fn list(&self, query: &ListQuery) -> Result<Vec<K::Summary>, CloudError> {
        self.guarded(OP_LIST, self.ctx.client.list(query)).await
    }

    pub(crate) async fn update(
        &self,
        id: &ResourceId,
        details: &K::UpdateDetails,
    ) -> Result<K::Remote, CloudError> {
        self.guarded(OP_UPDATE, self.ctx.client.update(id, details)).await
    }

    pub(crate) async fn delete(&self, id: &ResourceId) -> Result<(), CloudError> {
        self.guarded(OP_DELETE, self.ctx.client.delete(id)).await
    }

    pub(crate) async fn resolve_namespace(&self, compartment_id: &str) -> Result<String, CloudError> {
        self.guarded(
            OP_RESOLVE_NAMESPACE,
            self.ctx.client.resolve_namespace(compartment_id),
        )
        .await
    }

    async fn guarded<T, F>(&self, operation: &'static str, call: F) -> Result<T, CloudError>
    where
        F: Future<Output = Result<T, CloudError>>,
    {
        let limit = self.ctx.config.remote_call_timeout;
        let start = Instant::now();

        let result = tokio::select! {
            biased;
            () = self.cancel.cancelled() => Err(CloudError::Cancelled),
            outcome = tokio::time::timeout(limit, call) => {
                outcome.unwrap_or(Err(CloudError::Timeout(limit)))
            }
        };

        record_remote_call(K::KIND, operation, outcome_label(&result), start.elapsed());
        result
    }
}

/// Metric label for the outcome of a remote call.
pub(crate) fn outcome_label<T>(result: &Result<T, CloudError>) -> &'static str {
    match result {
        Ok(_) => "success",
        Err(CloudError::NotFound { .. }) => "not_found",
        Err(CloudError::BadRequest { .. }) => "bad_request",
        Err(CloudError::Timeout(_)) => "timeout",
        Err(CloudError::Cancelled) => "cancelled",
        Err(_) => "error",
    }
}
