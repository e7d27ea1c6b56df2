//! Process-wide message bus and frame transport.
//!
//! All mounted widget instances share ONE bus; there is no per-frame
//! private channel. Every consumer registers a narrow predicate filter
//! and gets back a [`SubscriptionId`] token; the filter is the only
//! isolation mechanism between instances, which makes its correctness
//! safety-critical rather than cosmetic.
//!
//! # Architecture
//!
//! ```text
//! ┌────────────┐        ┌───────────────────────────────┐
//! │ frame (ws) ─┼──────▶│          FrameGateway         │
//! │ frame (ws) ─┼──────▶│   (accept loop, one port)     │
//! └────────────┘        └──────────────┬────────────────┘
//!                                      │ RawMessage
//!                                      ▼
//!                       ┌───────────────────────────────┐
//!                       │          MessageBus           │
//!                       │  filter → decode → handler    │
//!                       └──────────────┬────────────────┘
//!                                      │ WidgetEvent
//!                                      ▼
//!                              widget instances
//! ```
//!
//! # Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | `core` | The shared bus: subscribe/unsubscribe/publish/post |
//! | `filter` | Predicate filters (widget kind + origin) |
//! | `gateway` | WebSocket bridge between frames and the bus |

// ============================================================================
// Submodules
// ============================================================================

mod core;
mod filter;
mod gateway;

// ============================================================================
// Re-exports
// ============================================================================

pub use self::core::{EventHandler, MessageBus, OutboundSink};
pub use filter::SubscriptionFilter;
pub use gateway::FrameGateway;

pub use crate::identifiers::SubscriptionId;
