// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Prometheus metrics for the OCI reconciler.
//!
//! This module provides metrics collection with the namespace prefix
//! `oci_firestoned_io_` (prometheus-safe version of "oci.firestoned.io").
//!
//! # Metrics Categories
//!
//! - **Reconciliation Metrics** - Track reconcile passes and their outcomes
//! - **Remote Call Metrics** - Track calls to the cloud control plane by operation
//! - **Resource Lifecycle Metrics** - Track remote creates, updates and deletes
//! - **Error Metrics** - Track error conditions and types
//!
//! # Example
//!
//! ```rust,no_run
//! use oci_reconciler::metrics::record_reconciliation_success;
//!
//! // Record a successful reconciliation
//! record_reconciliation_success("Queue", std::time::Duration::from_secs(1));
//! ```

use prometheus::{CounterVec, Encoder, HistogramOpts, HistogramVec, Opts, Registry, TextEncoder};
use std::sync::LazyLock;
use std::time::Duration;

// ============================================================================
// Metric Name Constants
// ============================================================================

/// Namespace prefix for all reconciler metrics (prometheus-safe)
const METRICS_NAMESPACE: &str = "oci_firestoned_io";

// ============================================================================
// Global Metrics Registry
// ============================================================================

/// Global Prometheus metrics registry
///
/// All metrics are registered in this registry; hosts expose it through [`gather_metrics`].
pub static METRICS_REGISTRY: LazyLock<Registry> = LazyLock::new(Registry::new);

fn counter_vec(name: &str, help: &str, labels: &[&str]) -> CounterVec {
    let opts = Opts::new(format!("{METRICS_NAMESPACE}_{name}"), help);
    let counter = CounterVec::new(opts, labels).expect("static metric definition is valid");
    METRICS_REGISTRY
        .register(Box::new(counter.clone()))
        .expect("metric is registered once");
    counter
}

fn histogram_vec(name: &str, help: &str, labels: &[&str], buckets: Vec<f64>) -> HistogramVec {
    let opts = HistogramOpts::new(format!("{METRICS_NAMESPACE}_{name}"), help).buckets(buckets);
    let histogram = HistogramVec::new(opts, labels).expect("static metric definition is valid");
    METRICS_REGISTRY
        .register(Box::new(histogram.clone()))
        .expect("metric is registered once");
    histogram
}

// ============================================================================
// Reconciliation Metrics
// ============================================================================

/// Total number of reconcile passes by resource type and outcome
///
/// Labels:
/// - `resource_type`: Kind of resource (e.g., `Queue`, `NatGateway`)
/// - `status`: Outcome (`success`, `pending`, `failed`, `error`)
pub static RECONCILIATION_TOTAL: LazyLock<CounterVec> = LazyLock::new(|| {
    counter_vec(
        "reconciliations_total",
        "Total number of reconciliations by resource type and status",
        &["resource_type", "status"],
    )
});

/// Duration of reconcile passes in seconds
///
/// Labels:
/// - `resource_type`: Kind of resource
pub static RECONCILIATION_DURATION_SECONDS: LazyLock<HistogramVec> = LazyLock::new(|| {
    histogram_vec(
        "reconciliation_duration_seconds",
        "Duration of reconciliations in seconds by resource type",
        &["resource_type"],
        vec![0.01, 0.1, 0.5, 1.0, 2.0, 5.0, 10.0, 30.0, 60.0, 300.0],
    )
});

/// Total number of requeue decisions
///
/// Labels:
/// - `resource_type`: Kind of resource
/// - `reason`: Reason for requeue (`ready`, `pending`, `error`, `invalid_request`)
pub static REQUEUE_TOTAL: LazyLock<CounterVec> = LazyLock::new(|| {
    counter_vec(
        "requeues_total",
        "Total number of requeue operations by resource type and reason",
        &["resource_type", "reason"],
    )
});

// ============================================================================
// Remote Call Metrics
// ============================================================================

/// Total number of calls to the cloud control plane
///
/// Labels:
/// - `resource_type`: Kind of resource
/// - `operation`: `create`, `get`, `list`, `update`, `delete`, `resolve_namespace`
/// - `outcome`: `success`, `not_found`, `bad_request`, `error`, `timeout`, `cancelled`
pub static REMOTE_CALLS_TOTAL: LazyLock<CounterVec> = LazyLock::new(|| {
    counter_vec(
        "remote_calls_total",
        "Total number of remote API calls by resource type, operation and outcome",
        &["resource_type", "operation", "outcome"],
    )
});

/// Latency of calls to the cloud control plane in seconds
///
/// Labels:
/// - `resource_type`: Kind of resource
/// - `operation`: Remote operation
pub static REMOTE_CALL_DURATION_SECONDS: LazyLock<HistogramVec> = LazyLock::new(|| {
    histogram_vec(
        "remote_call_duration_seconds",
        "Duration of remote API calls in seconds",
        &["resource_type", "operation"],
        vec![0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0, 30.0],
    )
});

/// Total number of Get calls issued while waiting for a created object
///
/// Labels:
/// - `resource_type`: Kind of resource
pub static POLL_ATTEMPTS_TOTAL: LazyLock<CounterVec> = LazyLock::new(|| {
    counter_vec(
        "poll_attempts_total",
        "Total number of create poll attempts by resource type",
        &["resource_type"],
    )
});

// ============================================================================
// Resource Lifecycle Metrics
// ============================================================================

/// Total number of remote objects created
///
/// Labels:
/// - `resource_type`: Kind of resource created
pub static RESOURCES_CREATED_TOTAL: LazyLock<CounterVec> = LazyLock::new(|| {
    counter_vec(
        "resources_created_total",
        "Total number of resources created by type",
        &["resource_type"],
    )
});

/// Total number of remote objects updated
///
/// Labels:
/// - `resource_type`: Kind of resource updated
pub static RESOURCES_UPDATED_TOTAL: LazyLock<CounterVec> = LazyLock::new(|| {
    counter_vec(
        "resources_updated_total",
        "Total number of resources updated by type",
        &["resource_type"],
    )
});

/// Total number of remote objects deleted
///
/// Labels:
/// - `resource_type`: Kind of resource deleted
pub static RESOURCES_DELETED_TOTAL: LazyLock<CounterVec> = LazyLock::new(|| {
    counter_vec(
        "resources_deleted_total",
        "Total number of resources deleted by type",
        &["resource_type"],
    )
});

// ============================================================================
// Error Metrics
// ============================================================================

/// Total number of errors by resource type and error category
///
/// Labels:
/// - `resource_type`: Kind of resource
/// - `error_type`: Category from [`ReconcileError::error_type`](crate::errors::ReconcileError::error_type)
pub static ERRORS_TOTAL: LazyLock<CounterVec> = LazyLock::new(|| {
    counter_vec(
        "errors_total",
        "Total number of errors by resource type and error category",
        &["resource_type", "error_type"],
    )
});

// ============================================================================
// Helper Functions
// ============================================================================

fn observe_reconciliation(resource_type: &str, status: &str, duration: Duration) {
    RECONCILIATION_TOTAL
        .with_label_values(&[resource_type, status])
        .inc();
    RECONCILIATION_DURATION_SECONDS
        .with_label_values(&[resource_type])
        .observe(duration.as_secs_f64());
}

/// Record a pass that left the resource active
pub fn record_reconciliation_success(resource_type: &str, duration: Duration) {
    observe_reconciliation(resource_type, "success", duration);
}

/// Record a pass that left the resource transitional
pub fn record_reconciliation_pending(resource_type: &str, duration: Duration) {
    observe_reconciliation(resource_type, "pending", duration);
}

/// Record a pass that observed a terminally failed remote object
pub fn record_reconciliation_failed(resource_type: &str, duration: Duration) {
    observe_reconciliation(resource_type, "failed", duration);
}

/// Record a pass that ended with an error
pub fn record_reconciliation_error(resource_type: &str, duration: Duration) {
    observe_reconciliation(resource_type, "error", duration);
}

/// Record a requeue decision
///
/// # Arguments
/// * `resource_type` - The kind of resource reconciled
/// * `reason` - Reason for requeue (e.g., `pending`, `error`)
pub fn record_reconciliation_requeue(resource_type: &str, reason: &str) {
    REQUEUE_TOTAL
        .with_label_values(&[resource_type, reason])
        .inc();
}

/// Record a remote call
///
/// # Arguments
/// * `resource_type` - The kind of resource
/// * `operation` - The remote operation
/// * `outcome` - Outcome label
/// * `duration` - Time spent waiting for the call
pub fn record_remote_call(resource_type: &str, operation: &str, outcome: &str, duration: Duration) {
    REMOTE_CALLS_TOTAL
        .with_label_values(&[resource_type, operation, outcome])
        .inc();
    REMOTE_CALL_DURATION_SECONDS
        .with_label_values(&[resource_type, operation])
        .observe(duration.as_secs_f64());
}

/// Record a create poll attempt
pub fn record_poll_attempt(resource_type: &str) {
    POLL_ATTEMPTS_TOTAL.with_label_values(&[resource_type]).inc();
}

/// Record resource creation
pub fn record_resource_created(resource_type: &str) {
    RESOURCES_CREATED_TOTAL
        .with_label_values(&[resource_type])
        .inc();
}

/// Record resource update
pub fn record_resource_updated(resource_type: &str) {
    RESOURCES_UPDATED_TOTAL
        .with_label_values(&[resource_type])
        .inc();
}

/// Record resource deletion
pub fn record_resource_deleted(resource_type: &str) {
    RESOURCES_DELETED_TOTAL
        .with_label_values(&[resource_type])
        .inc();
}

/// Record an error
///
/// # Arguments
/// * `resource_type` - The kind of resource where error occurred
/// * `error_type` - Category of error (e.g., `cloud_error`, `poll_timeout`)
pub fn record_error(resource_type: &str, error_type: &str) {
    ERRORS_TOTAL
        .with_label_values(&[resource_type, error_type])
        .inc();
}

/// Gather and encode all metrics in Prometheus text format
///
/// # Errors
/// Returns error if encoding fails
pub fn gather_metrics() -> Result<String, prometheus::Error> {
    let encoder = TextEncoder::new();
    let metric_families = METRICS_REGISTRY.gather();
    let mut buffer = Vec::new();
    encoder.encode(&metric_families, &mut buffer)?;
    String::from_utf8(buffer).map_err(|e| prometheus::Error::Msg(format!("UTF-8 error: {e}")))
}
