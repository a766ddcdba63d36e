// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Field comparison helpers for update predicates.
//!
//! A field left unset (or empty, or zero) in the spec means "leave the remote value
//! alone", so it never triggers an update. Tags are the exception: once the spec sets any
//! tag, the whole map must match.

use std::collections::BTreeMap;

/// A string set in the spec differs from the remote value.
#[must_use]
pub fn string_differs(desired: Option<&str>, observed: Option<&str>) -> bool {
    match desired {
        Some(desired) if !desired.is_empty() => observed != Some(desired),
        _ => false,
    }
}

/// A required string differs from the remote value. Empty means unset.
#[must_use]
pub fn required_string_differs(desired: &str, observed: &str) -> bool {
    !desired.is_empty() && desired != observed
}

/// A number set (and non-zero) in the spec differs from the remote value.
#[must_use]
pub fn number_differs<T>(desired: Option<T>, observed: Option<T>) -> bool
where
    T: Copy + Default + PartialEq,
{
    match desired {
        Some(desired) if desired != T::default() => observed != Some(desired),
        _ => false,
    }
}

/// A required number differs from the remote value. Zero means unset.
#[must_use]
pub fn required_number_differs<T>(desired: T, observed: T) -> bool
where
    T: Copy + Default + PartialEq,
{
    desired != T::default() && desired != observed
}

/// A flag set in the spec differs from the remote value.
#[must_use]
pub fn flag_differs(desired: Option<bool>, observed: bool) -> bool {
    desired.is_some_and(|desired| desired != observed)
}

/// A non-empty list set in the spec differs from the remote value.
#[must_use]
pub fn list_differs<T: PartialEq>(desired: Option<&[T]>, observed: &[T]) -> bool {
    match desired {
        Some(desired) if !desired.is_empty() => desired != observed,
        _ => false,
    }
}

/// Tags set in the spec differ from the remote tags in any key or value.
///
/// # Example
///
/// ```rust
/// use oci_reconciler::predicate::tags_differ;
/// use std::collections::BTreeMap;
///
/// let desired = BTreeMap::from([("team".to_string(), "data".to_string())]);
/// let observed = BTreeMap::from([
///     ("team".to_string(), "data".to_string()),
///     ("cost".to_string(), "42".to_string()),
/// ]);
/// assert!(tags_differ(Some(&desired), &observed));
/// assert!(!tags_differ(None, &observed));
/// ```
#[must_use]
pub fn tags_differ(
    desired: Option<&BTreeMap<String, String>>,
    observed: &BTreeMap<String, String>,
) -> bool {
    match desired {
        Some(desired) if !desired.is_empty() => desired != observed,
        _ => false,
    }
}

#[cfg(test)]
#[path = "predicate_tests.rs"]
mod predicate_tests;
