// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! In-memory collaborators for engine unit tests.
//!
//! [`StubClient`] replays scripted responses per operation and records every call it
//! receives. Unscripted reads fall back to "empty list" and "not found"; unscripted
//! writes fail so a test never passes through an unexpected create or update.

use crate::client::{CreateResponse, ListQuery, ServiceClient};
use crate::config::EngineConfig;
use crate::context::EngineContext;
use crate::errors::{CloudError, SecretError};
use crate::identity::ResourceId;
use crate::kinds::ResourceKind;
use crate::secrets::{SecretData, SecretStore};
use async_trait::async_trait;
use std::collections::{BTreeMap, VecDeque};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// A call received by [`StubClient`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Call {
    Create,
    Get(String),
    List(ListQuery),
    Update(String),
    Delete(String),
    ResolveNamespace(String),
}

type Script<T> = Mutex<VecDeque<Result<T, CloudError>>>;

pub struct StubClient<K: ResourceKind> {
    calls: Mutex<Vec<Call>>,
    creates: Script<CreateResponse<K::Remote>>,
    gets: Script<K::Remote>,
    lists: Script<Vec<K::Summary>>,
    updates: Script<K::Remote>,
    deletes: Script<()>,
    namespaces: Script<String>,
    created_details: Mutex<Vec<K::CreateDetails>>,
    updated_details: Mutex<Vec<K::UpdateDetails>>,
    latency: Option<Duration>,
}

impl<K: ResourceKind> Default for StubClient<K> {
    fn default() -> Self {
        Self {
            calls: Mutex::default(),
            creates: Mutex::default(),
            gets: Mutex::default(),
            lists: Mutex::default(),
            updates: Mutex::default(),
            deletes: Mutex::default(),
            namespaces: Mutex::default(),
            created_details: Mutex::default(),
            updated_details: Mutex::default(),
            latency: None,
        }
    }
}

fn pop<T>(script: &Script<T>) -> Option<Result<T, CloudError>> {
    script.lock().unwrap().pop_front()
}

impl<K: ResourceKind> StubClient<K> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every call take `latency` before answering.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    pub fn on_create(&self, response: Result<CreateResponse<K::Remote>, CloudError>) -> &Self {
        self.creates.lock().unwrap().push_back(response);
        self
    }

    pub fn on_get(&self, response: Result<K::Remote, CloudError>) -> &Self {
        self.gets.lock().unwrap().push_back(response);
        self
    }

    pub fn on_list(&self, response: Result<Vec<K::Summary>, CloudError>) -> &Self {
        self.lists.lock().unwrap().push_back(response);
        self
    }

    pub fn on_update(&self, response: Result<K::Remote, CloudError>) -> &Self {
        self.updates.lock().unwrap().push_back(response);
        self
    }

    pub fn on_delete(&self, response: Result<(), CloudError>) -> &Self {
        self.deletes.lock().unwrap().push_back(response);
        self
    }

    pub fn on_resolve_namespace(&self, response: Result<String, CloudError>) -> &Self {
        self.namespaces.lock().unwrap().push_back(response);
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn count(&self, matches: impl Fn(&Call) -> bool) -> usize {
        self.calls.lock().unwrap().iter().filter(|c| matches(c)).count()
    }

    pub fn created_details(&self) -> Vec<K::CreateDetails> {
        self.created_details.lock().unwrap().clone()
    }

    pub fn updated_details(&self) -> Vec<K::UpdateDetails> {
        self.updated_details.lock().unwrap().clone()
    }

    async fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }
    }
}

fn unscripted(operation: &str) -> CloudError {
    CloudError::Transport(format!("unscripted {operation}"))
}

#[async_trait]
impl<K: ResourceKind> ServiceClient<K> for StubClient<K> {
    async fn create(
        &self,
        details: &K::CreateDetails,
    ) -> Result<CreateResponse<K::Remote>, CloudError> {
        self.record(Call::Create).await;
        self.created_details.lock().unwrap().push(details.clone());
        pop(&self.creates).unwrap_or_else(|| Err(unscripted("create")))
    }

    async fn get(&self, id: &ResourceId) -> Result<K::Remote, CloudError> {
        self.record(Call::Get(id.to_string())).await;
        pop(&self.gets).unwrap_or_else(|| {
            Err(CloudError::NotFound {
                message: id.to_string(),
            })
        })
    }

    async fn list(&self, query: &ListQuery) -> Result<Vec<K::Summary>, CloudError> {
        self.record(Call::List(query.clone())).await;
        pop(&self.lists).unwrap_or_else(|| Ok(Vec::new()))
    }

    async fn update(
        &self,
        id: &ResourceId,
        details: &K::UpdateDetails,
    ) -> Result<K::Remote, CloudError> {
        self.record(Call::Update(id.to_string())).await;
        self.updated_details.lock().unwrap().push(details.clone());
        pop(&self.updates).unwrap_or_else(|| Err(unscripted("update")))
    }

    async fn delete(&self, id: &ResourceId) -> Result<(), CloudError> {
        self.record(Call::Delete(id.to_string())).await;
        pop(&self.deletes).unwrap_or(Ok(()))
    }

    async fn resolve_namespace(&self, compartment_id: &str) -> Result<String, CloudError> {
        self.record(Call::ResolveNamespace(compartment_id.to_string()))
            .await;
        pop(&self.namespaces).unwrap_or_else(|| Err(unscripted("resolve_namespace")))
    }
}

/// Secret store keeping secrets in memory.
#[derive(Default)]
pub struct MemorySecretStore {
    secrets: Mutex<BTreeMap<(String, String), SecretData>>,
    creates: Mutex<usize>,
    updates: Mutex<usize>,
    deletes: Mutex<usize>,
    fail_creates: Mutex<Option<SecretError>>,
}

impl MemorySecretStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, name: &str, namespace: &str, data: SecretData) {
        self.secrets
            .lock()
            .unwrap()
            .insert((namespace.to_string(), name.to_string()), data);
    }

    pub fn data(&self, name: &str, namespace: &str) -> Option<SecretData> {
        self.secrets
            .lock()
            .unwrap()
            .get(&(namespace.to_string(), name.to_string()))
            .cloned()
    }

    pub fn fail_creates_with(&self, error: SecretError) {
        *self.fail_creates.lock().unwrap() = Some(error);
    }

    pub fn create_count(&self) -> usize {
        *self.creates.lock().unwrap()
    }

    pub fn update_count(&self) -> usize {
        *self.updates.lock().unwrap()
    }

    pub fn delete_count(&self) -> usize {
        *self.deletes.lock().unwrap()
    }
}

#[async_trait]
impl SecretStore for MemorySecretStore {
    async fn create_secret(
        &self,
        name: &str,
        namespace: &str,
        _labels: &BTreeMap<String, String>,
        data: &SecretData,
    ) -> Result<(), SecretError> {
        *self.creates.lock().unwrap() += 1;
        if let Some(error) = self.fail_creates.lock().unwrap().clone() {
            return Err(error);
        }
        let mut secrets = self.secrets.lock().unwrap();
        let key = (namespace.to_string(), name.to_string());
        if secrets.contains_key(&key) {
            return Err(SecretError::AlreadyExists {
                name: name.to_string(),
                namespace: namespace.to_string(),
            });
        }
        secrets.insert(key, data.clone());
        Ok(())
    }

    async fn get_secret(&self, name: &str, namespace: &str) -> Result<SecretData, SecretError> {
        self.data(name, namespace).ok_or_else(|| SecretError::NotFound {
            name: name.to_string(),
            namespace: namespace.to_string(),
        })
    }

    async fn update_secret(
        &self,
        name: &str,
        namespace: &str,
        _labels: &BTreeMap<String, String>,
        data: &SecretData,
    ) -> Result<(), SecretError> {
        *self.updates.lock().unwrap() += 1;
        let mut secrets = self.secrets.lock().unwrap();
        match secrets.get_mut(&(namespace.to_string(), name.to_string())) {
            Some(existing) => {
                *existing = data.clone();
                Ok(())
            }
            None => Err(SecretError::NotFound {
                name: name.to_string(),
                namespace: namespace.to_string(),
            }),
        }
    }

    async fn delete_secret(&self, name: &str, namespace: &str) -> Result<(), SecretError> {
        *self.deletes.lock().unwrap() += 1;
        self.secrets
            .lock()
            .unwrap()
            .remove(&(namespace.to_string(), name.to_string()))
            .map(|_| ())
            .ok_or_else(|| SecretError::NotFound {
                name: name.to_string(),
                namespace: namespace.to_string(),
            })
    }
}

/// Engine context over the given stubs with default configuration.
pub fn context<K: ResourceKind>(
    client: &Arc<StubClient<K>>,
    secrets: &Arc<MemorySecretStore>,
) -> EngineContext<K> {
    context_with(client, secrets, EngineConfig::default())
}

pub fn context_with<K: ResourceKind>(
    client: &Arc<StubClient<K>>,
    secrets: &Arc<MemorySecretStore>,
    config: EngineConfig,
) -> EngineContext<K> {
    EngineContext::new(client.clone(), secrets.clone(), config)
}
