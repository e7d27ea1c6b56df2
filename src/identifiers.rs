//! Type-safe identifiers for host entities.
//!
//! Newtype wrappers prevent mixing incompatible IDs at compile time:
//! a [`SubscriptionId`] can never be passed where a [`WidgetId`] is
//! expected, even though both are UUID-backed.
//!
//! | Identifier | Identifies |
//! |------------|------------|
//! | [`WidgetId`] | One mounted widget instance (one frame) |
//! | [`SubscriptionId`] | One registered bus subscription |

// ============================================================================
// Imports
// ============================================================================

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ============================================================================
// WidgetId
// ============================================================================

/// Unique identifier for a mounted widget instance.
///
/// Generated at mount time; the frame created for the instance carries
/// the same ID so attach/detach pairs can be correlated by the container.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WidgetId(Uuid);

impl WidgetId {
    /// Generates a new random widget ID.
    #[inline]
    #[must_use]
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }

    /// Returns the underlying UUID.
    #[inline]
    #[must_use]
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for WidgetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ============================================================================
// SubscriptionId
// ============================================================================

/// Unique identifier for a bus subscription.
///
/// Returned by [`MessageBus::subscribe`] and used as the stable identity
/// for removal: the subscribe/unsubscribe pair always refers to exactly
/// the same registered handler.
///
/// [`MessageBus::subscribe`]: crate::bus::MessageBus::subscribe
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SubscriptionId(Uuid);

impl SubscriptionId {
    /// Generates a new random subscription ID.
    #[inline]
    #[must_use]
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }

    /// Returns the underlying UUID.
    #[inline]
    #[must_use]
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for SubscriptionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ============================================================================
// Tests
// ============================================================================
