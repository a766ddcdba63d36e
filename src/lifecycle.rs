// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Lifecycle state classification.
//!
//! Every resource kind exposes its own lifecycle enum (`ACTIVE`, `AVAILABLE`,
//! `PROVISIONING`, ...). The engine never looks at those labels directly; it asks the
//! state for its [`LifecycleClass`] and maps that onto a condition and requeue decision:
//!
//! | Class | Condition | Successful | Requeue |
//! |-------|-----------|------------|---------|
//! | Active | `Active` | yes | no |
//! | Failed | `Failed` | no | no |
//! | Transitional | `Provisioning` | no | yes |
//!
//! States added by the remote API later deserialize into the `Unknown` variant every
//! lifecycle enum carries, which is transitional.

use crate::crd::ConditionType;
use crate::status_reasons::{
    REASON_LIFECYCLE_ACTIVE, REASON_LIFECYCLE_FAILED, REASON_LIFECYCLE_TRANSITIONAL,
};
use std::fmt::{Debug, Display};

/// Coarse classification of a remote lifecycle state.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum LifecycleClass {
    /// Fully active and usable
    Active,
    /// Terminally failed or gone
    Failed,
    /// Anything else: creating, updating, deleting, or unknown
    Transitional,
}

/// A resource-kind-specific remote lifecycle state.
pub trait LifecycleState:
    Copy + Debug + Display + PartialEq + Eq + Send + Sync + 'static
{
    /// Every variant, including `Unknown`.
    const ALL: &'static [Self];

    /// Classification used by [`map_lifecycle`].
    fn class(self) -> LifecycleClass;

    /// True only for the "in creation" state the create poll waits on.
    fn is_creating(self) -> bool;

    /// True for states that identify the same logical resource during a name lookup:
    /// active, in creation or in update. Never true for failed or deleted states.
    fn is_live(self) -> bool;

    /// The label used by the remote API.
    fn label(self) -> &'static str;
}

/// Result of mapping a lifecycle state.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LifecycleDecision {
    /// Condition to append
    pub condition: ConditionType,
    /// Reason recorded on the condition
    pub reason: &'static str,
    /// The resource is usable
    pub is_successful: bool,
    /// The host should call again later
    pub should_requeue: bool,
}

/// Translate a remote lifecycle state into a condition and requeue decision.
///
/// # Example
///
/// ```rust
/// use oci_reconciler::crd::ConditionType;
/// use oci_reconciler::kinds::queue::QueueState;
/// use oci_reconciler::lifecycle::map_lifecycle;
///
/// let decision = map_lifecycle(QueueState::Creating);
/// assert_eq!(decision.condition, ConditionType::Provisioning);
/// assert!(decision.should_requeue);
/// ```
#[must_use]
pub fn map_lifecycle<S: LifecycleState>(state: S) -> LifecycleDecision {
    match state.class() {
        LifecycleClass::Active => LifecycleDecision {
            condition: ConditionType::Active,
            reason: REASON_LIFECYCLE_ACTIVE,
            is_successful: true,
            should_requeue: false,
        },
        LifecycleClass::Failed => LifecycleDecision {
            condition: ConditionType::Failed,
            reason: REASON_LIFECYCLE_FAILED,
            is_successful: false,
            should_requeue: false,
        },
        LifecycleClass::Transitional => LifecycleDecision {
            condition: ConditionType::Provisioning,
            reason: REASON_LIFECYCLE_TRANSITIONAL,
            is_successful: false,
            should_requeue: true,
        },
    }
}

/// Macro to generate a lifecycle state enum and its [`LifecycleState`] implementation.
///
/// Each variant is listed with its remote label and class. An `Unknown` variant is always
/// added as the serde fallback and classified as transitional. `creating` may be empty
/// for kinds whose remote objects are usable as soon as they exist.
///
/// # Example
///
/// ```ignore
/// lifecycle_states! {
///     /// Lifecycle of a widget.
///     WidgetState {
///         Creating => "CREATING": Transitional,
///         Active => "ACTIVE": Active,
///         Failed => "FAILED": Failed,
///     }
///     creating = [Creating];
///     live = [Creating, Active];
/// }
/// ```
#[macro_export]
macro_rules! lifecycle_states {
    (
        $(#[$meta:meta])*
        $name:ident {
            $( $variant:ident => $label:literal : $class:ident ),+ $(,)?
        }
        creating = [ $( $creating:ident ),* $(,)? ];
        live = [ $( $live:ident ),+ $(,)? ];
    ) => {
        $(#[$meta])*
        #[derive(
            Clone, Copy, Debug, PartialEq, Eq, Hash, ::serde::Serialize, ::serde::Deserialize,
        )]
        pub enum $name {
            $(
                #[serde(rename = $label)]
                $variant,
            )+
            /// A state this build does not know about.
            #[serde(other)]
            Unknown,
        }

        impl $crate::lifecycle::LifecycleState for $name {
            const ALL: &'static [Self] = &[$( Self::$variant, )+ Self::Unknown];

            fn class(self) -> $crate::lifecycle::LifecycleClass {
                match self {
                    $( Self::$variant => $crate::lifecycle::LifecycleClass::$class, )+
                    Self::Unknown => $crate::lifecycle::LifecycleClass::Transitional,
                }
            }

            fn is_creating(self) -> bool {
                false $( || self == Self::$creating )*
            }

            fn is_live(self) -> bool {
                matches!(self, $( Self::$live )|+)
            }

            fn label(self) -> &'static str {
                match self {
                    $( Self::$variant => $label, )+
                    Self::Unknown => "UNKNOWN",
                }
            }
        }

        impl ::std::fmt::Display for $name {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                f.write_str($crate::lifecycle::LifecycleState::label(*self))
            }
        }
    };
}

#[cfg(test)]
#[path = "lifecycle_tests.rs"]
mod lifecycle_tests;
