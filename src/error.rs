//! Error types for the capture widget host.
//!
//! This module defines all error types used throughout the crate.
//!
//! # Usage
//!
//! All fallible operations return [`Result<T>`] which uses [`Error`]:
//!
//! ```ignore
//! use capture_widget_host::{Result, Error};
//!
//! async fn example(host: &FrameHost) -> Result<()> {
//!     let snapshot = host.wait_until_ready(Duration::from_secs(10)).await?;
//!     println!("{}", snapshot.status_message);
//!     Ok(())
//! }
//! ```
//!
//! # Error Categories
//!
//! | Category | Variants |
//! |----------|----------|
//! | Configuration | [`Error::Config`], [`Error::ResourceNotConfigured`] |
//! | Transport | [`Error::Transport`], [`Error::GatewayClosed`] |
//! | Protocol | [`Error::Protocol`] |
//! | Host | [`Error::NotMounted`], [`Error::ReadyTimeout`] |
//! | External | [`Error::Io`], [`Error::Json`], [`Error::WebSocket`] |
//!
//! Failures originating *inside* an embedded frame (device errors, scan
//! errors) are never represented here; they are projected onto the owning
//! widget instance as status text and the host keeps running.

// ============================================================================
// Imports
// ============================================================================

use std::io::Error as IoError;
use std::result::Result as StdResult;

use thiserror::Error;
use tokio::sync::oneshot::error::RecvError;
use tokio_tungstenite::tungstenite::Error as WsError;

use crate::widget::WidgetKind;

// ============================================================================
// Result Alias
// ============================================================================

/// Result type alias using crate [`enum@Error`].
///
/// All fallible operations in this crate return this type.
pub type Result<T> = StdResult<T, Error>;

// ============================================================================
// Error Enum
// ============================================================================

/// Main error type for the crate.
///
/// Each variant includes relevant context for debugging.
#[derive(Error, Debug)]
pub enum Error {
    // ========================================================================
    // Configuration Errors
    // ========================================================================
    /// Configuration error.
    ///
    /// Returned when host configuration is invalid.
    #[error("Configuration error: {message}")]
    Config {
        /// Description of the configuration error.
        message: String,
    },

    /// No content source configured for a widget kind.
    ///
    /// Returned when mount is attempted for a kind the resource locator
    /// cannot resolve.
    #[error("No content source configured for widget kind: {kind}")]
    ResourceNotConfigured {
        /// The widget kind lacking a base location.
        kind: WidgetKind,
    },

    /// Invalid content source URL.
    ///
    /// Returned when the resolved base location cannot form a frame URL.
    #[error("Invalid content source: {message}")]
    InvalidContentSource {
        /// Description of the URL problem.
        message: String,
    },

    // ========================================================================
    // Transport Errors
    // ========================================================================
    /// Gateway transport failure.
    ///
    /// Returned when the frame gateway cannot be set up or a connection
    /// operation fails.
    #[error("Transport error: {message}")]
    Transport {
        /// Description of the transport error.
        message: String,
    },

    /// Gateway has been shut down.
    ///
    /// Returned when posting to frames after shutdown.
    #[error("Gateway closed")]
    GatewayClosed,

    // ========================================================================
    // Protocol Errors
    // ========================================================================
    /// Protocol violation on the host side.
    ///
    /// Returned when an outbound command cannot be encoded.
    #[error("Protocol error: {message}")]
    Protocol {
        /// Description of the protocol violation.
        message: String,
    },

    // ========================================================================
    // Host Errors
    // ========================================================================
    /// Operation requires a mounted instance.
    ///
    /// Returned when waiting on or posting through a host that was never
    /// mounted, or was already unmounted.
    #[error("Widget not mounted: {kind}")]
    NotMounted {
        /// The widget kind of the host.
        kind: WidgetKind,
    },

    /// Bounded wait for readiness elapsed.
    ///
    /// Only produced by the explicit [`wait_until_ready`] API; the
    /// protocol itself never times out initialization.
    ///
    /// [`wait_until_ready`]: crate::host::FrameHost::wait_until_ready
    #[error("Widget {kind} not ready after {timeout_ms}ms")]
    ReadyTimeout {
        /// The widget kind still initializing.
        kind: WidgetKind,
        /// Milliseconds waited before giving up.
        timeout_ms: u64,
    },

    // ========================================================================
    // External Errors
    // ========================================================================
    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] IoError),

    /// JSON serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// WebSocket error.
    #[error("WebSocket error: {0}")]
    WebSocket(#[from] WsError),

    /// Channel receive error.
    #[error("Channel closed")]
    ChannelClosed(#[from] RecvError),
}

// ============================================================================
// Error Constructors
// ============================================================================

impl Error {
    /// Creates a configuration error.
    #[inline]
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Creates a resource-not-configured error.
    #[inline]
    pub fn resource_not_configured(kind: WidgetKind) -> Self {
        Self::ResourceNotConfigured { kind }
    }

    /// Creates an invalid content source error.
    #[inline]
    pub fn invalid_content_source(message: impl Into<String>) -> Self {
        Self::InvalidContentSource {
            message: message.into(),
        }
    }

    /// Creates a transport error.
    #[inline]
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport {
            message: message.into(),
        }
    }

    /// Creates a protocol error.
    #[inline]
    pub fn protocol(message: impl Into<String>) -> Self {
        Self::Protocol {
            message: message.into(),
        }
    }

    /// Creates a not-mounted error.
    #[inline]
    pub fn not_mounted(kind: WidgetKind) -> Self {
        Self::NotMounted { kind }
    }

    /// Creates a ready-timeout error.
    #[inline]
    pub fn ready_timeout(kind: WidgetKind, timeout_ms: u64) -> Self {
        Self::ReadyTimeout { kind, timeout_ms }
    }
}

// ============================================================================
// Error Predicates
// ============================================================================

impl Error {
    /// Returns `true` if this is a timeout error.
    #[inline]
    #[must_use]
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::ReadyTimeout { .. })
    }

    /// Returns `true` if this is a transport error.
    #[inline]
    #[must_use]
    pub fn is_transport_error(&self) -> bool {
        matches!(
            self,
            Self::Transport { .. } | Self::GatewayClosed | Self::WebSocket(_)
        )
    }

    /// Returns `true` if this is a configuration error.
    #[inline]
    #[must_use]
    pub fn is_config_error(&self) -> bool {
        matches!(
            self,
            Self::Config { .. }
                | Self::ResourceNotConfigured { .. }
                | Self::InvalidContentSource { .. }
        )
    }

    /// Returns `true` if this error is recoverable.
    ///
    /// Recoverable errors may succeed on retry.
    #[inline]
    #[must_use]
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::ReadyTimeout { .. } | Self::Transport { .. })
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    use std::io::ErrorKind;

    #[test]
    fn test_error_display() {
        let err = Error::transport("bind failed");
        assert_eq!(err.to_string(), "Transport error: bind failed");
    }

    #[test]
    fn test_config_error() {
        let err = Error::config("missing base url");
        assert_eq!(err.to_string(), "Configuration error: missing base url");
    }

    #[test]
    fn test_resource_not_configured_display() {
        let err = Error::resource_not_configured(WidgetKind::Barcode);
        assert!(err.to_string().contains("barcode"));
    }

    #[test]
    fn test_is_timeout() {
        let timeout_err = Error::ready_timeout(WidgetKind::Mrz, 5000);
        let other_err = Error::transport("test");

        assert!(timeout_err.is_timeout());
        assert!(!other_err.is_timeout());
    }

    #[test]
    fn test_is_transport_error() {
        let transport_err = Error::transport("test");
        let closed_err = Error::GatewayClosed;
        let other_err = Error::config("test");

        assert!(transport_err.is_transport_error());
        assert!(closed_err.is_transport_error());
        assert!(!other_err.is_transport_error());
    }

    #[test]
    fn test_is_config_error() {
        assert!(Error::config("x").is_config_error());
        assert!(Error::resource_not_configured(WidgetKind::DocumentScanner).is_config_error());
        assert!(!Error::GatewayClosed.is_config_error());
    }

    #[test]
    fn test_is_recoverable() {
        let timeout_err = Error::ready_timeout(WidgetKind::Barcode, 1000);
        let config_err = Error::config("test");

        assert!(timeout_err.is_recoverable());
        assert!(!config_err.is_recoverable());
    }

    #[test]
    fn test_from_io_error() {
        let io_err = IoError::new(ErrorKind::NotFound, "socket gone");
        let err: Error = io_err.into();
        assert!(matches!(err, Error::Io(_)));
    }

    #[test]
    fn test_from_json_error() {
        let json_err = serde_json::from_str::<String>("invalid").unwrap_err();
        let err: Error = json_err.into();
        assert!(matches!(err, Error::Json(_)));
    }
}
