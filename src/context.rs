// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Shared context for reconcile passes.
//!
//! Each resource kind gets an [`EngineContext`] holding:
//! - The [`ServiceClient`] for the kind's remote API
//! - The [`SecretStore`] used to publish connection details
//! - The [`EngineConfig`] tunables
//!
//! Contexts are cheap to clone and safe to share between concurrent reconcile passes;
//! the engine keeps no per-resource state in them.

use crate::client::ServiceClient;
use crate::config::EngineConfig;
use crate::kinds::ResourceKind;
use crate::secrets::SecretStore;
use std::sync::Arc;

/// Dependencies of a reconcile pass for resource kind `K`.
pub struct EngineContext<K: ResourceKind> {
    /// Remote API client for the kind
    pub client: Arc<dyn ServiceClient<K>>,

    /// Secret store for connection details
    pub secrets: Arc<dyn SecretStore>,

    /// Engine tunables
    pub config: EngineConfig,
}

impl<K: ResourceKind> EngineContext<K> {
    /// Create a context from its parts.
    #[must_use]
    pub fn new(
        client: Arc<dyn ServiceClient<K>>,
        secrets: Arc<dyn SecretStore>,
        config: EngineConfig,
    ) -> Self {
        Self {
            client,
            secrets,
            config,
        }
    }
}

// Derived Clone would require `K: Clone`; the kind markers are never cloned.
impl<K: ResourceKind> Clone for EngineContext<K> {
    fn clone(&self) -> Self {
        Self {
            client: Arc::clone(&self.client),
            secrets: Arc::clone(&self.secrets),
            config: self.config.clone(),
        }
    }
}
