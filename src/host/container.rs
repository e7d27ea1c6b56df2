//! The embedder's slot for frame elements.

// ============================================================================
// Imports
// ============================================================================

use tracing::debug;

use crate::host::FrameDescriptor;
use crate::identifiers::WidgetId;

// ============================================================================
// FrameContainer
// ============================================================================

/// Where frames get realized.
///
/// The surrounding application owns the actual frame elements (webview
/// panes, DOM nodes, whatever the platform provides); the host only tells
/// it when to create and release one. Both operations are synchronous and
/// infallible: a container that cannot attach simply renders nothing,
/// and the widget stays in `Initializing` until its frame speaks.
pub trait FrameContainer: Send + Sync {
    /// Realizes a frame from its resolved descriptor.
    ///
    /// Called at most once per mount; this is the point the widget's
    /// internal script starts executing.
    fn attach(&self, descriptor: &FrameDescriptor);

    /// Releases the frame created for `id`.
    ///
    /// Called exactly once per unmount, before the subscription is
    /// revoked.
    fn detach(&self, id: WidgetId);
}

// ============================================================================
// NullContainer
// ============================================================================

/// A container that realizes nothing.
///
/// Useful headless: the protocol, bus and lifecycle all behave normally,
/// there just is no visible frame.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullContainer;

impl FrameContainer for NullContainer {
    fn attach(&self, descriptor: &FrameDescriptor) {
        debug!(id = %descriptor.id, kind = %descriptor.kind, "NullContainer attach");
    }

    fn detach(&self, id: WidgetId) {
        debug!(%id, "NullContainer detach");
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_null_container_is_object_safe() {
        fn assert_container(_: &dyn FrameContainer) {}
        assert_container(&NullContainer);
    }
}
