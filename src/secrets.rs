// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Secret store used to publish connection details of active resources.
//!
//! The engine only needs create and best-effort delete; get and update are used to
//! refresh a secret whose endpoints changed after it was first written.

use crate::errors::SecretError;
use async_trait::async_trait;
use k8s_openapi::api::core::v1::Secret;
use k8s_openapi::ByteString;
use kube::api::{DeleteParams, ObjectMeta, PostParams};
use kube::{Api, Client};
use std::collections::BTreeMap;
use tracing::debug;

/// Payload of a secret: key to raw bytes.
pub type SecretData = BTreeMap<String, Vec<u8>>;

/// Key/value store for credentials secrets.
#[async_trait]
pub trait SecretStore: Send + Sync {
    /// Create a secret.
    ///
    /// # Errors
    ///
    /// Returns [`SecretError::AlreadyExists`] if a secret with this name exists.
    async fn create_secret(
        &self,
        name: &str,
        namespace: &str,
        labels: &BTreeMap<String, String>,
        data: &SecretData,
    ) -> Result<(), SecretError>;

    /// Read the payload of a secret.
    ///
    /// # Errors
    ///
    /// Returns [`SecretError::NotFound`] if the secret does not exist.
    async fn get_secret(&self, name: &str, namespace: &str) -> Result<SecretData, SecretError>;

    /// Replace the payload of an existing secret.
    ///
    /// # Errors
    ///
    /// Returns [`SecretError::NotFound`] if the secret does not exist.
    async fn update_secret(
        &self,
        name: &str,
        namespace: &str,
        labels: &BTreeMap<String, String>,
        data: &SecretData,
    ) -> Result<(), SecretError>;

    /// Delete a secret.
    ///
    /// # Errors
    ///
    /// Returns [`SecretError::NotFound`] if the secret does not exist.
    async fn delete_secret(&self, name: &str, namespace: &str) -> Result<(), SecretError>;
}

/// [`SecretStore`] backed by Kubernetes `Secret` objects.
#[derive(Clone)]
pub struct KubeSecretStore {
    client: Client,
}

impl KubeSecretStore {
    /// Create a store using the given Kubernetes client.
    #[must_use]
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    fn api(&self, namespace: &str) -> Api<Secret> {
        Api::namespaced(self.client.clone(), namespace)
    }
}

/// Build the `Secret` object written for a managed resource.
#[must_use]
pub fn build_secret(
    name: &str,
    namespace: &str,
    labels: &BTreeMap<String, String>,
    data: &SecretData,
) -> Secret {
    Secret {
        metadata: ObjectMeta {
            name: Some(name.to_string()),
            namespace: Some(namespace.to_string()),
            labels: Some(labels.clone()),
            ..Default::default()
        },
        data: Some(
            data.iter()
                .map(|(key, value)| (key.clone(), ByteString(value.clone())))
                .collect(),
        ),
        type_: Some("Opaque".to_string()),
        ..Default::default()
    }
}

fn map_kube_error(err: kube::Error, name: &str, namespace: &str) -> SecretError {
    match err {
        kube::Error::Api(api_err) if api_err.code == 409 => SecretError::AlreadyExists {
            name: name.to_string(),
            namespace: namespace.to_string(),
        },
        kube::Error::Api(api_err) if api_err.code == 404 => SecretError::NotFound {
            name: name.to_string(),
            namespace: namespace.to_string(),
        },
        other => SecretError::Store(other.to_string()),
    }
}

#[async_trait]
impl SecretStore for KubeSecretStore {
    async fn create_secret(
        &self,
        name: &str,
        namespace: &str,
        labels: &BTreeMap<String, String>,
        data: &SecretData,
    ) -> Result<(), SecretError> {
        let secret = build_secret(name, namespace, labels, data);
        self.api(namespace)
            .create(&PostParams::default(), &secret)
            .await
            .map_err(|e| map_kube_error(e, name, namespace))?;
        debug!("Created Secret {}/{}", namespace, name);
        Ok(())
    }

    async fn get_secret(&self, name: &str, namespace: &str) -> Result<SecretData, SecretError> {
        let secret = self
            .api(namespace)
            .get(name)
            .await
            .map_err(|e| map_kube_error(e, name, namespace))?;
        Ok(secret
            .data
            .unwrap_or_default()
            .into_iter()
            .map(|(key, value)| (key, value.0))
            .collect())
    }

    async fn update_secret(
        &self,
        name: &str,
        namespace: &str,
        labels: &BTreeMap<String, String>,
        data: &SecretData,
    ) -> Result<(), SecretError> {
        let api = self.api(namespace);
        let mut secret = api
            .get(name)
            .await
            .map_err(|e| map_kube_error(e, name, namespace))?;
        let desired = build_secret(name, namespace, labels, data);
        secret.data = desired.data;
        secret.metadata.labels = desired.metadata.labels;
        api.replace(name, &PostParams::default(), &secret)
            .await
            .map_err(|e| map_kube_error(e, name, namespace))?;
        debug!("Updated Secret {}/{}", namespace, name);
        Ok(())
    }

    async fn delete_secret(&self, name: &str, namespace: &str) -> Result<(), SecretError> {
        self.api(namespace)
            .delete(name, &DeleteParams::default())
            .await
            .map_err(|e| map_kube_error(e, name, namespace))?;
        debug!("Deleted Secret {}/{}", namespace, name);
        Ok(())
    }
}

#[cfg(test)]
#[path = "secrets_tests.rs"]
mod secrets_tests;
