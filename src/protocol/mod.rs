//! Cross-frame protocol message types.
//!
//! This module defines the message format for communication between the
//! host (Rust) and the embedded widget frames (third-party scripts running
//! in isolated contexts).
//!
//! # Protocol Overview
//!
//! | Message Type | Direction | Purpose |
//! |--------------|-----------|---------|
//! | [`RawMessage`] | Frame → Host | Untrusted, untyped wire shape |
//! | [`WidgetEvent`] | Frame → Host | Typed application-layer event |
//! | [`OutboundCommand`] | Host → Frame | Host command (fire-and-forget) |
//!
//! # Wire Shape
//!
//! Frames emit JSON objects discriminated by a `type` tag:
//!
//! ```json
//! { "type": "DWT_SCAN_COMPLETE", "imageCount": 3 }
//! ```
//!
//! Validation happens once, at the boundary: [`WidgetEvent::from_raw`]
//! either produces a closed typed variant or `None`. Nothing downstream
//! ever touches the raw payload shape again.
//!
//! # Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | `message` | Untrusted inbound wire shape |
//! | `event` | Typed widget events |
//! | `outbound` | Host → frame commands |

// ============================================================================
// Submodules
// ============================================================================

/// Untrusted inbound wire shape.
pub mod message;

/// Typed widget events.
pub mod event;

/// Host → frame commands.
pub mod outbound;

// ============================================================================
// Re-exports
// ============================================================================

pub use event::WidgetEvent;
pub use message::RawMessage;
pub use outbound::OutboundCommand;
