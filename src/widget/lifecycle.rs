//! Lifecycle states and pre-initialization policy.

// ============================================================================
// Imports
// ============================================================================

use std::fmt;

use serde::{Deserialize, Serialize};

// ============================================================================
// LifecycleState
// ============================================================================

/// Readiness of an embedded widget, as observed by the host.
///
/// Transitions are driven from two sides: the frame's lifecycle events
/// move an instance between `Initializing`, `Ready`, `Busy` and `Error`;
/// the host alone drives the `Uninitialized → Initializing` (mount) and
/// `* → Terminated` (unmount) edges. There is no frame-emitted terminal
/// event; `Terminated` is host-driven.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LifecycleState {
    /// No frame exists yet.
    Uninitialized,

    /// Frame created; its internal script has not reported readiness.
    Initializing,

    /// Widget reported initialized and is idle.
    Ready,

    /// A scan or save operation is in progress.
    Busy,

    /// The widget errored before ever reaching `Ready`.
    ///
    /// Errors reported after readiness do not enter this state; they
    /// surface as status text on an otherwise `Ready` instance and the
    /// widget stays usable.
    Error,

    /// Unmounted. Terminal; all further events are ignored.
    Terminated,
}

impl LifecycleState {
    /// Returns `true` for the terminal state.
    #[inline]
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Terminated)
    }

    /// Returns `true` once the frame exists and events are meaningful.
    #[inline]
    #[must_use]
    pub const fn is_mounted(&self) -> bool {
        !matches!(self, Self::Uninitialized | Self::Terminated)
    }

    /// Returns `true` if the widget has reported readiness at least once
    /// and has not terminated.
    #[inline]
    #[must_use]
    pub const fn is_operational(&self) -> bool {
        matches!(self, Self::Ready | Self::Busy)
    }
}

impl fmt::Display for LifecycleState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Uninitialized => "uninitialized",
            Self::Initializing => "initializing",
            Self::Ready => "ready",
            Self::Busy => "busy",
            Self::Error => "error",
            Self::Terminated => "terminated",
        };
        f.write_str(name)
    }
}

// ============================================================================
// PreInitPolicy
// ============================================================================

/// What to do with events observed before the instance is mounted.
///
/// The message bus can be subscribed before the frame exists; whatever
/// arrives in that window has no frame to belong to yet.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PreInitPolicy {
    /// Drop pre-mount events silently. Matches the observed widgets.
    #[default]
    Ignore,

    /// Hold pre-mount events and replay them, in arrival order, once the
    /// instance enters `Initializing`.
    Buffer,
}

// ============================================================================
// Tests
// ============================================================================
