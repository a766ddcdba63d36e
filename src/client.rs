// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Remote control plane client abstraction.
//!
//! The engine never talks HTTP itself. Each resource kind is driven through a
//! [`ServiceClient`] supplied by the host, which wraps the provider SDK and classifies
//! its failures into [`CloudError`] variants. Tests substitute an in-memory client.

use crate::errors::CloudError;
use crate::identity::ResourceId;
use crate::kinds::ResourceKind;
use async_trait::async_trait;

/// Response to a create call.
#[derive(Clone, Debug, PartialEq)]
pub enum CreateResponse<R> {
    /// The remote API returned the new object
    Object(R),
    /// The remote API accepted an asynchronous work request.
    ///
    /// The object is discovered by name on a later pass.
    WorkRequest {
        /// Identifier of the work request, if the response carried one
        work_request_id: Option<String>,
    },
}

/// Parameters of a display-name lookup.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ListQuery {
    /// Compartment to search
    pub compartment_id: String,
    /// Object storage namespace, for kinds scoped by one
    pub namespace: Option<String>,
    /// Exact display name to match
    pub display_name: String,
    /// Maximum number of results
    pub limit: u32,
}

/// Operations the engine needs from the remote API for one resource kind.
///
/// Implementations must be safe to call concurrently for different resources.
#[async_trait]
pub trait ServiceClient<K: ResourceKind>: Send + Sync {
    /// Create a new remote object.
    async fn create(
        &self,
        details: &K::CreateDetails,
    ) -> Result<CreateResponse<K::Remote>, CloudError>;

    /// Fetch a remote object by identifier.
    async fn get(&self, id: &ResourceId) -> Result<K::Remote, CloudError>;

    /// List remote objects by display name, in the order the remote API returns them.
    async fn list(&self, query: &ListQuery) -> Result<Vec<K::Summary>, CloudError>;

    /// Apply mutable fields to an existing remote object.
    async fn update(
        &self,
        id: &ResourceId,
        details: &K::UpdateDetails,
    ) -> Result<K::Remote, CloudError>;

    /// Delete a remote object.
    async fn delete(&self, id: &ResourceId) -> Result<(), CloudError>;

    /// Resolve the object storage namespace of a compartment's tenancy.
    ///
    /// Only called for kinds that declare [`ResourceKind::NAMESPACED`].
    async fn resolve_namespace(&self, compartment_id: &str) -> Result<String, CloudError> {
        Err(CloudError::BadRequest {
            status: 400,
            message: format!(
                "{} resources have no object storage namespace (compartment {compartment_id})",
                K::KIND
            ),
        })
    }
}
