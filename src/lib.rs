//! Capture Widget Host - Isolated-frame host for device-capture widgets.
//!
//! This library embeds third-party device-capture widgets (barcode, MRZ
//! and document scanners) in isolated frames and exchanges structured
//! messages with them across the frame boundary.
//!
//! # Architecture
//!
//! The host follows a shared-bus model:
//!
//! - **Host side (Rust)**: owns frames, applies isolation policies,
//!   projects events onto host-visible state
//! - **Frame side (third-party widget script)**: runs in its own isolated
//!   execution context, emits `type`-discriminated JSON events
//!
//! Key design principles:
//!
//! - Each [`FrameHost`] owns: one frame + one widget instance + one bus
//!   subscription token
//! - ONE process-wide [`MessageBus`] serves every instance; predicate
//!   filters are the only isolation between them
//! - Untrusted input is validated once, at the boundary
//!   ([`WidgetEvent::from_raw`]); unknown shapes are dropped, never raised
//! - Frame-originated failures become status text, never host errors
//!
//! # Quick Start
//!
//! ```no_run
//! use std::sync::Arc;
//! use std::time::Duration;
//!
//! use capture_widget_host::{
//!     FrameGateway, FrameHost, MessageBus, NullContainer, Result, WidgetKind, WidgetResources,
//! };
//! use url::Url;
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     // One bus for the whole process, bridged to frames over WebSocket
//!     let bus = Arc::new(MessageBus::new());
//!     let gateway = FrameGateway::bind(Arc::clone(&bus)).await?;
//!     println!("frames connect to {}", gateway.ws_url());
//!
//!     // Precomputed content locations
//!     let resources = WidgetResources::new()
//!         .with_shared_base(Url::parse("https://assets.example/widgets").unwrap());
//!
//!     // Mount a barcode widget and wait for it to report in
//!     let host = FrameHost::new(WidgetKind::Barcode, Arc::clone(&bus), resources);
//!     host.mount(&NullContainer)?;
//!
//!     let snapshot = host.wait_until_ready(Duration::from_secs(10)).await?;
//!     println!("barcode widget: {}", snapshot.state);
//!
//!     Ok(())
//! }
//! ```
//!
//! # Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`bus`] | Shared message bus, filters, WebSocket gateway |
//! | [`error`] | Error types and [`Result`] alias |
//! | [`host`] | Frame hosting: policies, resources, mount/unmount |
//! | [`identifiers`] | Type-safe ID wrappers |
//! | [`protocol`] | Wire message types (inbound and outbound) |
//! | [`widget`] | Widget kinds, lifecycle state machine, projection |
//!
//! # Features
//!
//! - **Filter-isolated**: instances on the shared bus can never observe
//!   each other's vocabulary
//! - **Idempotent lifecycle**: render loops may mount as often as they
//!   like; one frame, one listener
//! - **Replayable projection**: a recorded event log reproduces the exact
//!   projected state
//! - **Exact isolation policies**: camera/microphone for the camera
//!   kinds, elevated sandbox (and no camera) for the document scanner

// ============================================================================
// Modules
// ============================================================================

/// Shared message bus, subscription filters, and the frame gateway.
///
/// This module contains the cross-boundary messaging layer:
///
/// - [`MessageBus`] - process-wide, filter-isolated event delivery
/// - [`SubscriptionFilter`] - per-kind acceptance predicates
/// - [`FrameGateway`] - WebSocket bridge frames connect through
pub mod bus;

/// Error types and result aliases.
///
/// All fallible operations return [`Result<T>`] which uses [`Error`].
pub mod error;

/// Frame hosting and lifecycle control.
///
/// Use [`FrameHost::mount`] / [`FrameHost::unmount`] to drive a widget's
/// lifetime.
pub mod host;

/// Type-safe identifiers for host entities.
///
/// Newtype wrappers prevent mixing incompatible IDs at compile time.
pub mod identifiers;

/// Wire message types for both directions.
///
/// Inbound shapes are untrusted until validated into [`WidgetEvent`]s.
pub mod protocol;

/// Widget kinds, lifecycle state machine, and result projection.
pub mod widget;

// ============================================================================
// Re-exports
// ============================================================================

// Bus types
pub use bus::{EventHandler, FrameGateway, MessageBus, OutboundSink, SubscriptionFilter};

// Error types
pub use error::{Error, Result};

// Host types
pub use host::{
    Capability, CapabilityPolicy, FrameContainer, FrameDescriptor, FrameHost, HostConfig,
    NullContainer, ResourceLocator, SandboxFlag, SandboxPolicy, WidgetResources,
};

// Identifier types
pub use identifiers::{SubscriptionId, WidgetId};

// Protocol types
pub use protocol::{OutboundCommand, RawMessage, WidgetEvent};

// Widget types
pub use widget::{LifecycleState, PreInitPolicy, WidgetInstance, WidgetKind, WidgetSnapshot};
