//! Host → frame commands.
//!
//! The observed widgets never consume host commands, but the channel is
//! bidirectional-capable and the shapes are structurally symmetric with
//! the inbound direction: JSON objects discriminated by a `type` tag.
//! Delivery is fire-and-forget; the widget's internal script is free to
//! ignore anything it does not understand.

// ============================================================================
// Imports
// ============================================================================

use serde_json::{Value, json};

use crate::error::Result;

// ============================================================================
// OutboundCommand
// ============================================================================

/// A command from the host to embedded widget frames.
///
/// # Format
///
/// ```json
/// { "type": "HOST_TERMINATE" }
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum OutboundCommand {
    /// Best-effort teardown notice sent on unmount when configured.
    ///
    /// The frame may ignore it; the host tears down either way.
    Terminate,

    /// An embedder-defined command.
    Custom {
        /// Wire `type` tag.
        type_tag: String,
        /// Command-specific fields, merged into the wire object.
        payload: Value,
    },
}

impl OutboundCommand {
    /// Creates a custom command.
    #[inline]
    #[must_use]
    pub fn custom(type_tag: impl Into<String>, payload: Value) -> Self {
        Self::Custom {
            type_tag: type_tag.into(),
            payload,
        }
    }

    /// Returns the wire `type` tag for this command.
    #[must_use]
    pub fn type_tag(&self) -> &str {
        match self {
            Self::Terminate => "HOST_TERMINATE",
            Self::Custom { type_tag, .. } => type_tag,
        }
    }

    /// Renders the command as its JSON wire shape.
    #[must_use]
    pub fn to_wire(&self) -> Value {
        match self {
            Self::Terminate => json!({ "type": "HOST_TERMINATE" }),
            Self::Custom { type_tag, payload } => {
                let mut wire = json!({ "type": type_tag });
                if let (Some(obj), Some(extra)) = (wire.as_object_mut(), payload.as_object()) {
                    for (key, value) in extra {
                        obj.entry(key.clone()).or_insert_with(|| value.clone());
                    }
                }
                wire
            }
        }
    }

    /// Encodes the command as a JSON text frame.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Json`] if serialization fails.
    ///
    /// [`Error::Json`]: crate::error::Error::Json
    pub fn encode(&self) -> Result<String> {
        Ok(serde_json::to_string(&self.to_wire())?)
    }
}

// ============================================================================
// Tests
// ============================================================================
