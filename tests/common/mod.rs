// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

// Common test utilities for integration tests

#![allow(dead_code)]

use async_trait::async_trait;
use kube::client::Client;
use oci_reconciler::client::{CreateResponse, ListQuery, ServiceClient};
use oci_reconciler::config::EngineConfig;
use oci_reconciler::context::EngineContext;
use oci_reconciler::crd::QueueSpec;
use oci_reconciler::errors::{CloudError, SecretError};
use oci_reconciler::identity::ResourceId;
use oci_reconciler::kinds::queue::{
    CreateQueueDetails, QueueState, QueueSummary, RemoteQueue, UpdateQueueDetails,
};
use oci_reconciler::kinds::QueueKind;
use oci_reconciler::secrets::{SecretData, SecretStore};
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

/// Get a Kubernetes client or skip the test if not in a cluster
pub async fn get_kube_client_or_skip() -> Option<Client> {
    match Client::try_default().await {
        Ok(client) => Some(client),
        Err(e) => {
            eprintln!("Skipping integration test: not running in Kubernetes cluster: {e}");
            None
        }
    }
}

struct StoredQueue {
    queue: RemoteQueue,
    gets_until_active: u32,
}

#[derive(Default)]
struct QueueServiceState {
    queues: BTreeMap<String, StoredQueue>,
    next_id: u32,
    creates: usize,
    updates: usize,
    deletes: usize,
}

/// Stateful stand-in for the queue service.
///
/// Creates are asynchronous: they return a work request and the queue appears in list
/// results in `CREATING`. Each queue turns `ACTIVE` after `gets_until_active` reads.
pub struct FakeQueueService {
    state: Mutex<QueueServiceState>,
    gets_until_active: u32,
}

impl FakeQueueService {
    pub fn new(gets_until_active: u32) -> Self {
        Self {
            state: Mutex::default(),
            gets_until_active,
        }
    }

    pub fn creates(&self) -> usize {
        self.state.lock().unwrap().creates
    }

    pub fn updates(&self) -> usize {
        self.state.lock().unwrap().updates
    }

    pub fn deletes(&self) -> usize {
        self.state.lock().unwrap().deletes
    }

    pub fn queue(&self, id: &str) -> Option<RemoteQueue> {
        self.state
            .lock()
            .unwrap()
            .queues
            .get(id)
            .map(|q| q.queue.clone())
    }

    pub fn len(&self) -> usize {
        self.state.lock().unwrap().queues.len()
    }
}

#[async_trait]
impl ServiceClient<QueueKind> for FakeQueueService {
    async fn create(
        &self,
        details: &CreateQueueDetails,
    ) -> Result<CreateResponse<RemoteQueue>, CloudError> {
        let mut state = self.state.lock().unwrap();
        state.creates += 1;
        state.next_id += 1;
        let id = format!("ocid1.queue.oc1..q{}", state.next_id);

        let queue = RemoteQueue {
            id: id.clone(),
            compartment_id: details.compartment_id.clone(),
            display_name: details.display_name.clone(),
            lifecycle_state: QueueState::Creating,
            messages_endpoint: Some(format!("https://cell-1.queue.example.com/{id}")),
            retention_in_seconds: details.retention_in_seconds,
            visibility_in_seconds: details.visibility_in_seconds,
            timeout_in_seconds: details.timeout_in_seconds,
            dead_letter_queue_delivery_count: details.dead_letter_queue_delivery_count,
            custom_encryption_key_id: details.custom_encryption_key_id.clone(),
            freeform_tags: details.freeform_tags.clone(),
        };
        let work_request_id = format!("ocid1.workrequest.oc1..wr{}", state.next_id);
        state.queues.insert(
            id,
            StoredQueue {
                queue,
                gets_until_active: self.gets_until_active,
            },
        );

        Ok(CreateResponse::WorkRequest {
            work_request_id: Some(work_request_id),
        })
    }

    async fn get(&self, id: &ResourceId) -> Result<RemoteQueue, CloudError> {
        let mut state = self.state.lock().unwrap();
        let stored = state
            .queues
            .get_mut(&id.to_string())
            .ok_or_else(|| CloudError::NotFound {
                message: format!("queue {id} not found"),
            })?;

        if stored.queue.lifecycle_state == QueueState::Creating {
            stored.gets_until_active = stored.gets_until_active.saturating_sub(1);
            if stored.gets_until_active == 0 {
                stored.queue.lifecycle_state = QueueState::Active;
            }
        }
        Ok(stored.queue.clone())
    }

    async fn list(&self, query: &ListQuery) -> Result<Vec<QueueSummary>, CloudError> {
        let state = self.state.lock().unwrap();
        Ok(state
            .queues
            .values()
            .map(|s| &s.queue)
            .filter(|q| {
                q.compartment_id == query.compartment_id && q.display_name == query.display_name
            })
            .take(query.limit as usize)
            .map(|q| QueueSummary {
                id: q.id.clone(),
                display_name: q.display_name.clone(),
                lifecycle_state: q.lifecycle_state,
            })
            .collect())
    }

    async fn update(
        &self,
        id: &ResourceId,
        details: &UpdateQueueDetails,
    ) -> Result<RemoteQueue, CloudError> {
        let mut state = self.state.lock().unwrap();
        state.updates += 1;
        let stored = state
            .queues
            .get_mut(&id.to_string())
            .ok_or_else(|| CloudError::NotFound {
                message: format!("queue {id} not found"),
            })?;

        let queue = &mut stored.queue;
        queue.display_name = details.display_name.clone();
        if details.visibility_in_seconds.is_some() {
            queue.visibility_in_seconds = details.visibility_in_seconds;
        }
        if details.timeout_in_seconds.is_some() {
            queue.timeout_in_seconds = details.timeout_in_seconds;
        }
        if details.dead_letter_queue_delivery_count.is_some() {
            queue.dead_letter_queue_delivery_count = details.dead_letter_queue_delivery_count;
        }
        if details.custom_encryption_key_id.is_some() {
            queue.custom_encryption_key_id = details.custom_encryption_key_id.clone();
        }
        if let Some(tags) = &details.freeform_tags {
            queue.freeform_tags = tags.clone();
        }
        Ok(queue.clone())
    }

    async fn delete(&self, id: &ResourceId) -> Result<(), CloudError> {
        let mut state = self.state.lock().unwrap();
        state.deletes += 1;
        state
            .queues
            .remove(&id.to_string())
            .map(|_| ())
            .ok_or_else(|| CloudError::NotFound {
                message: format!("queue {id} not found"),
            })
    }
}

/// Secret store keeping secrets in memory.
#[derive(Default)]
pub struct InMemorySecrets {
    secrets: Mutex<BTreeMap<(String, String), SecretData>>,
}

impl InMemorySecrets {
    pub fn get(&self, name: &str, namespace: &str) -> Option<SecretData> {
        self.secrets
            .lock()
            .unwrap()
            .get(&(namespace.to_string(), name.to_string()))
            .cloned()
    }

    pub fn len(&self) -> usize {
        self.secrets.lock().unwrap().len()
    }
}

fn not_found(name: &str, namespace: &str) -> SecretError {
    SecretError::NotFound {
        name: name.to_string(),
        namespace: namespace.to_string(),
    }
}

#[async_trait]
impl SecretStore for InMemorySecrets {
    async fn create_secret(
        &self,
        name: &str,
        namespace: &str,
        _labels: &BTreeMap<String, String>,
        data: &SecretData,
    ) -> Result<(), SecretError> {
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
        self.get(name, namespace)
            .ok_or_else(|| not_found(name, namespace))
    }

    async fn update_secret(
        &self,
        name: &str,
        namespace: &str,
        _labels: &BTreeMap<String, String>,
        data: &SecretData,
    ) -> Result<(), SecretError> {
        let mut secrets = self.secrets.lock().unwrap();
        let existing = secrets
            .get_mut(&(namespace.to_string(), name.to_string()))
            .ok_or_else(|| not_found(name, namespace))?;
        *existing = data.clone();
        Ok(())
    }

    async fn delete_secret(&self, name: &str, namespace: &str) -> Result<(), SecretError> {
        self.secrets
            .lock()
            .unwrap()
            .remove(&(namespace.to_string(), name.to_string()))
            .map(|_| ())
            .ok_or_else(|| not_found(name, namespace))
    }
}

/// Queue engine context over a fake service and in-memory secrets.
pub fn queue_engine(
    service: &Arc<FakeQueueService>,
    secrets: &Arc<InMemorySecrets>,
) -> EngineContext<QueueKind> {
    EngineContext::new(service.clone(), secrets.clone(), EngineConfig::default())
}

pub fn queue_spec(display_name: &str) -> QueueSpec {
    QueueSpec {
        id: None,
        compartment_id: "ocid1.compartment.oc1..apps".to_string(),
        display_name: display_name.to_string(),
        retention_in_seconds: Some(86400),
        visibility_in_seconds: Some(30),
        timeout_in_seconds: None,
        dead_letter_queue_delivery_count: None,
        custom_encryption_key_id: None,
        freeform_tags: None,
    }
}
