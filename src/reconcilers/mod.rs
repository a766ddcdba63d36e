// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! The reconciliation engine.
//!
//! Everything here is generic over [`ResourceKind`](crate::kinds::ResourceKind); the
//! kind modules only supply data and small hooks.
//!
//! # Reconciliation Architecture
//!
//! A pass follows the same steps for every kind:
//!
//! 1. **Identify** - bind to an explicit, recorded or looked-up remote object
//! 2. **Create** - create the object if nothing matched
//! 3. **Update** - apply mutable fields that drifted from the spec
//! 4. **Observe** - map the remote lifecycle state to a condition and outcome
//! 5. **Publish** - write connection details to a Secret once the object is active
//!
//! # Modules
//!
//! - [`engine`] - [`create_or_update`], the create-or-bind-or-update procedure
//! - [`deletion`] - [`delete`], idempotent teardown behind the finalizer
//! - [`status`] - append-only condition helpers
//! - [`retry`] - bounded create polling and requeue jitter
//!
//! # Example: Running a Pass
//!
//! ```rust,no_run
//! use oci_reconciler::context::EngineContext;
//! use oci_reconciler::crd::{QueueSpec, ResourceStatus};
//! use oci_reconciler::kinds::QueueKind;
//! use oci_reconciler::reconcilers::{create_or_update, ObjectRef};
//! use tokio_util::sync::CancellationToken;
//!
//! async fn reconcile_queue(
//!     ctx: &EngineContext<QueueKind>,
//!     spec: &mut QueueSpec,
//!     status: &mut ResourceStatus,
//! ) -> anyhow::Result<bool> {
//!     let object = ObjectRef { name: "orders", namespace: "apps" };
//!     let outcome = create_or_update(ctx, object, spec, status, &CancellationToken::new()).await?;
//!     Ok(outcome.is_successful)
//! }
//! ```

pub mod deletion;
pub mod engine;
pub(crate) mod remote;
pub mod retry;
pub mod status;

#[cfg(test)]
pub(crate) mod test_support;

pub use deletion::delete;
pub use engine::{create_or_update, ObjectRef, ReconcileOutcome};

/// Check if the spec changed since the engine last processed it.
///
/// `metadata.generation` is bumped by the API server on spec changes only, and the
/// controller copies it into `status.observedGeneration` after each pass. Passes run
/// regardless, because the remote object can drift on its own; this only tells a spec
/// change apart from a periodic resync.
///
/// # Example
///
/// ```rust
/// use oci_reconciler::reconcilers::generation_changed;
///
/// assert!(generation_changed(Some(2), Some(1)));
/// assert!(generation_changed(Some(1), None));
/// assert!(!generation_changed(Some(2), Some(2)));
/// ```
#[must_use]
pub fn generation_changed(current_generation: Option<i64>, observed_generation: Option<i64>) -> bool {
    match (current_generation, observed_generation) {
        (Some(current), Some(observed)) => current != observed,
        (Some(_), None) => true, // First pass
        _ => false,              // No generation tracking available
    }
}

/// Check if a status value has actually changed compared to the current status.
///
/// Status writes trigger watch events and therefore new passes, so the controller only
/// patches the status subresource when a pass changed it.
///
/// # Example
///
/// ```rust
/// use oci_reconciler::crd::ResourceStatus;
/// use oci_reconciler::reconcilers::status_changed;
///
/// let current = Some(ResourceStatus::default());
/// let mut next = current.clone();
/// assert!(!status_changed(&current, &next));
///
/// if let Some(status) = next.as_mut() {
///     status.remote_id = Some("ocid1.queue.oc1..orders".to_string());
/// }
/// assert!(status_changed(&current, &next));
/// ```
#[must_use]
pub fn status_changed<T: PartialEq>(current_value: &Option<T>, new_value: &Option<T>) -> bool {
    current_value != new_value
}
