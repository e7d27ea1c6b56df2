//! Resolved frame descriptors.

// ============================================================================
// Imports
// ============================================================================

use url::Url;

use crate::identifiers::WidgetId;
use crate::widget::WidgetKind;

// ============================================================================
// Constants
// ============================================================================

/// Default inline style applied to widget frames.
pub const DEFAULT_FRAME_STYLE: &str =
    "height:100%;width:100%;border:1px solid #dddbda;border-radius:4px;";

// ============================================================================
// FrameDescriptor
// ============================================================================

/// A fully resolved frame, ready to be attached by a container.
///
/// The descriptor is the host's owned reference to the frame: it exists
/// from mount to unmount, and everything the embedder needs to realize
/// the frame element (content URL, capability allow-list, sandbox
/// restriction set, styling) is resolved into it up front.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameDescriptor {
    /// Identity shared with the owning widget instance.
    pub id: WidgetId,

    /// Widget kind the frame hosts.
    pub kind: WidgetKind,

    /// Content URL loaded into the frame.
    pub src: Url,

    /// Rendered `allow` attribute. Empty means no attribute.
    pub allow: String,

    /// Rendered `sandbox` attribute.
    pub sandbox: String,

    /// Inline style string.
    pub style: String,
}

impl FrameDescriptor {
    /// Returns `true` if the frame grants any capability.
    #[inline]
    #[must_use]
    pub fn has_capabilities(&self) -> bool {
        !self.allow.is_empty()
    }
}

// ============================================================================
// Tests
// ============================================================================
