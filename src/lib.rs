// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

#![allow(unexpected_cfgs)]

//! # oci-reconciler - Cloud Resource Reconciliation for Kubernetes
//!
//! oci-reconciler drives OCI cloud resources declared as Kubernetes custom resources
//! towards their desired state against an eventually-consistent control plane.
//!
//! ## Overview
//!
//! One generic engine handles every managed kind. A reconcile pass:
//!
//! - Resolves which remote object a resource is bound to (explicit identifier, recorded
//!   identifier, display-name lookup, or a fresh create)
//! - Updates the remote object when a mutable field drifted from the spec
//! - Maps the remote lifecycle state onto an append-only condition history
//! - Publishes connection details to a Secret once the object is active
//!
//! Deletion is idempotent and follows a per-kind error policy.
//!
//! ## Modules
//!
//! - [`crd`] - Custom Resource Definitions and the shared status shape
//! - [`kinds`] - Per-kind capability tables ([`kinds::ResourceKind`])
//! - [`reconcilers`] - The create-or-update and delete passes
//! - [`resources`] - Tagged-union dispatch over the managed kinds
//! - [`controller`] - kube-runtime controller glue
//! - [`client`] - The remote service client seam
//! - [`secrets`] - The secret store seam and its Kubernetes implementation
//!
//! ## Example
//!
//! ```rust,no_run
//! use oci_reconciler::crd::QueueSpec;
//!
//! let spec = QueueSpec {
//!     id: None,
//!     compartment_id: "ocid1.compartment.oc1..example".to_string(),
//!     display_name: "orders".to_string(),
//!     retention_in_seconds: Some(86400),
//!     visibility_in_seconds: None,
//!     timeout_in_seconds: None,
//!     dead_letter_queue_delivery_count: None,
//!     custom_encryption_key_id: None,
//!     freeform_tags: None,
//! };
//! ```
//!
//! ## Managed Kinds
//!
//! - **ApiGateway** and **ApiGatewayDeployment**
//! - **ObjectStorageBucket**
//! - **OpenSearchCluster**
//! - **Queue**
//! - **DataFlowApplication**
//! - **NatGateway**

pub mod client;
pub mod config;
pub mod constants;
pub mod context;
pub mod controller;
pub mod crd;
pub mod errors;
pub mod http_errors;
pub mod identity;
pub mod labels;

#[macro_use]
pub mod lifecycle;

pub mod kinds;
pub mod metrics;
pub mod predicate;
pub mod reconcilers;
pub mod resources;
pub mod secrets;
pub mod status_reasons;
pub mod telemetry;
