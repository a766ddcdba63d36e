// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Remote identity resolution.
//!
//! Every reconcile pass binds the declared resource to exactly one remote object, choosing
//! the first applicable path:
//!
//! 1. **Explicit** - the spec carries an `id`
//! 2. **Recorded** - a previous pass stored `status.remoteId`
//! 3. **Lookup** - list by compartment and display name, bind to the first live match
//! 4. **Create** - the lookup found nothing
//!
//! Most kinds use opaque OCIDs. Kinds without one (object storage buckets) are addressed
//! by a [`CompositeId`] of the form `scope/name`.

use crate::constants::COMPOSITE_ID_SEPARATOR;
use crate::crd::ResourceStatus;
use crate::errors::ReconcileError;
use crate::kinds::ResourceKind;
use crate::lifecycle::LifecycleState;
use std::fmt;

/// How a kind identifies its remote objects.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum IdentifierStyle {
    /// A single opaque token assigned by the remote API
    Opaque,
    /// `scope/name`, built from two fields of the remote object
    Composite,
}

/// A `scope/name` identifier.
///
/// Both parts are non-empty and neither contains the separator, so formatting and
/// parsing are inverse operations.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct CompositeId {
    scope: String,
    name: String,
}

impl CompositeId {
    /// Build an identifier from its parts.
    ///
    /// Returns `None` if either part is empty or contains the separator.
    #[must_use]
    pub fn new(scope: impl Into<String>, name: impl Into<String>) -> Option<Self> {
        let scope = scope.into();
        let name = name.into();
        if valid_part(&scope) && valid_part(&name) {
            Some(Self { scope, name })
        } else {
            None
        }
    }

    /// Parse `scope/name`.
    ///
    /// Returns `None` unless the value splits into exactly two non-empty parts.
    ///
    /// # Example
    ///
    /// ```rust
    /// use oci_reconciler::identity::CompositeId;
    ///
    /// let id = CompositeId::parse("axaxnpcrorw5/logs").unwrap();
    /// assert_eq!(id.scope(), "axaxnpcrorw5");
    /// assert_eq!(id.name(), "logs");
    ///
    /// assert!(CompositeId::parse("invalid").is_none());
    /// assert!(CompositeId::parse("a/b/c").is_none());
    /// assert!(CompositeId::parse("/logs").is_none());
    /// ```
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        let (scope, name) = value.split_once(COMPOSITE_ID_SEPARATOR)?;
        Self::new(scope, name)
    }

    /// The scope part (for buckets, the object storage namespace).
    #[must_use]
    pub fn scope(&self) -> &str {
        &self.scope
    }

    /// The name part.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }
}

fn valid_part(part: &str) -> bool {
    !part.is_empty() && !part.contains(COMPOSITE_ID_SEPARATOR)
}

impl fmt::Display for CompositeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{COMPOSITE_ID_SEPARATOR}{}", self.scope, self.name)
    }
}

/// Identifier of a remote object.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum ResourceId {
    /// Opaque token (OCID)
    Opaque(String),
    /// `scope/name`
    Composite(CompositeId),
}

impl ResourceId {
    /// Parse a stored identifier according to the kind's identifier style.
    ///
    /// Returns `None` for empty values and malformed composite identifiers.
    #[must_use]
    pub fn parse(style: IdentifierStyle, value: &str) -> Option<Self> {
        if value.is_empty() {
            return None;
        }
        match style {
            IdentifierStyle::Opaque => Some(Self::Opaque(value.to_string())),
            IdentifierStyle::Composite => CompositeId::parse(value).map(Self::Composite),
        }
    }
}

impl fmt::Display for ResourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Opaque(id) => f.write_str(id),
            Self::Composite(id) => id.fmt(f),
        }
    }
}

/// The path used to bind a declared resource to a remote object.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum IdentityPath {
    /// The spec names the remote object
    Explicit(ResourceId),
    /// A previous pass recorded the remote object
    Recorded(ResourceId),
    /// Neither is set; find the object by display name or create it
    Lookup,
}

/// Choose the identity path for this pass.
///
/// Empty strings count as absent. A value that does not parse under the kind's
/// identifier style is an error; it is never silently replaced by a lookup.
///
/// # Errors
///
/// Returns [`ReconcileError::MalformedIdentity`] if the explicit or recorded identifier
/// of a composite-identified kind does not split into two non-empty parts.
pub fn resolve_identity<K: ResourceKind>(
    spec: &K::Spec,
    status: &ResourceStatus,
) -> Result<IdentityPath, ReconcileError> {
    if let Some(explicit) = K::explicit_id(spec).filter(|id| !id.is_empty()) {
        return parse_for::<K>(spec, explicit).map(IdentityPath::Explicit);
    }
    if let Some(recorded) = status.remote_id.as_deref().filter(|id| !id.is_empty()) {
        return parse_for::<K>(spec, recorded).map(IdentityPath::Recorded);
    }
    Ok(IdentityPath::Lookup)
}

fn parse_for<K: ResourceKind>(spec: &K::Spec, value: &str) -> Result<ResourceId, ReconcileError> {
    ResourceId::parse(K::IDENTIFIER, value).ok_or_else(|| ReconcileError::MalformedIdentity {
        kind: K::KIND,
        name: K::display_name(spec).to_string(),
        value: value.to_string(),
    })
}

/// Pick the remote object a lookup binds to.
///
/// Only summaries whose name matches exactly and whose state is live are considered;
/// ties are broken by the order the remote API returned them in.
#[must_use]
pub fn first_live_match<'a, K: ResourceKind>(
    summaries: &'a [K::Summary],
    display_name: &str,
) -> Option<&'a K::Summary> {
    summaries.iter().find(|summary| {
        K::summary_name(summary) == display_name && K::summary_state(summary).is_live()
    })
}

#[cfg(test)]
#[path = "identity_tests.rs"]
mod identity_tests;
