//! Typed widget events.
//!
//! Events are notifications emitted by an embedded widget frame when
//! scanning activity occurs. The wire vocabulary is closed and
//! `type`-discriminated; anything outside it is not an event.
//!
//! # Event Vocabulary
//!
//! | Widget | Events |
//! |--------|--------|
//! | Barcode | `BARCODE_INITIALIZED`, `BARCODE_RESULT` |
//! | MRZ | `MRZ_INITIALIZED`, `MRZ_RESULT` |
//! | DocumentScanner | `DWT_INITIALIZED`, `DWT_DEVICES_LOADED`, `DWT_SCAN_COMPLETE`, `DWT_SAVE_COMPLETE`, `DWT_ERROR`, `DWT_STATUS`, `DWT_LOADING` |

// ============================================================================
// Imports
// ============================================================================

use serde_json::Value;

use crate::protocol::RawMessage;
use crate::widget::WidgetKind;

// ============================================================================
// WidgetEvent
// ============================================================================

/// A validated, typed event from an embedded widget frame.
///
/// Produced exclusively by [`WidgetEvent::from_raw`]; the variants form a
/// closed set so downstream state-machine code can match exhaustively.
#[derive(Debug, Clone, PartialEq)]
pub enum WidgetEvent {
    /// Barcode scanner frame finished initializing.
    BarcodeInitialized,

    /// Barcode scanner produced a decode result.
    BarcodeResult {
        /// Decoded payload, structure defined by the widget.
        data: Value,
    },

    /// MRZ scanner frame finished initializing.
    MrzInitialized,

    /// MRZ scanner produced a recognition result.
    MrzResult {
        /// Recognized payload, structure defined by the widget.
        data: Value,
    },

    /// Document scanner frame finished initializing.
    DwtInitialized,

    /// Document scanner enumerated its attached devices.
    DwtDevicesLoaded {
        /// Device names as reported by the widget.
        devices: Vec<String>,
    },

    /// Document scan finished successfully.
    DwtScanComplete {
        /// Number of images acquired.
        image_count: u64,
    },

    /// Scanned document was saved.
    DwtSaveComplete {
        /// Name of the saved file.
        filename: String,
    },

    /// Document scanner reported a device or scan error.
    DwtError {
        /// Error description from the widget.
        message: String,
    },

    /// Informational status text from the document scanner.
    DwtStatus {
        /// Status description.
        message: String,
    },

    /// Document scanner busy indicator changed.
    DwtLoading {
        /// `true` while a scan or save is in progress.
        loading: bool,
    },
}

// ============================================================================
// WidgetEvent - Parsing
// ============================================================================

impl WidgetEvent {
    /// Validates and parses a raw message into a typed event.
    ///
    /// Returns `None` for anything outside the known vocabulary: a missing
    /// or non-string `type` tag, an unrecognized tag, or a non-object
    /// payload. Missing event fields default (empty string, zero, false)
    /// rather than failing; the frame side is third-party code.
    #[must_use]
    pub fn from_raw(raw: &RawMessage) -> Option<Self> {
        let event = match raw.type_tag()? {
            "BARCODE_INITIALIZED" => Self::BarcodeInitialized,
            "BARCODE_RESULT" => Self::BarcodeResult {
                data: raw.get_value("data"),
            },

            "MRZ_INITIALIZED" => Self::MrzInitialized,
            "MRZ_RESULT" => Self::MrzResult {
                data: raw.get_value("data"),
            },

            "DWT_INITIALIZED" => Self::DwtInitialized,
            "DWT_DEVICES_LOADED" => Self::DwtDevicesLoaded {
                devices: raw.get_string_array("devices"),
            },
            "DWT_SCAN_COMPLETE" => Self::DwtScanComplete {
                image_count: raw.get_u64("imageCount"),
            },
            "DWT_SAVE_COMPLETE" => Self::DwtSaveComplete {
                filename: raw.get_string("filename"),
            },
            "DWT_ERROR" => Self::DwtError {
                message: raw.get_string("message"),
            },
            "DWT_STATUS" => Self::DwtStatus {
                message: raw.get_string("message"),
            },
            "DWT_LOADING" => Self::DwtLoading {
                loading: raw.get_bool("loading"),
            },

            _ => return None,
        };

        Some(event)
    }
}

// ============================================================================
// WidgetEvent - Accessors
// ============================================================================

impl WidgetEvent {
    /// Returns the widget kind whose vocabulary this event belongs to.
    #[must_use]
    pub const fn kind(&self) -> WidgetKind {
        match self {
            Self::BarcodeInitialized | Self::BarcodeResult { .. } => WidgetKind::Barcode,
            Self::MrzInitialized | Self::MrzResult { .. } => WidgetKind::Mrz,
            Self::DwtInitialized
            | Self::DwtDevicesLoaded { .. }
            | Self::DwtScanComplete { .. }
            | Self::DwtSaveComplete { .. }
            | Self::DwtError { .. }
            | Self::DwtStatus { .. }
            | Self::DwtLoading { .. } => WidgetKind::DocumentScanner,
        }
    }

    /// Returns the wire `type` tag for this event.
    #[must_use]
    pub const fn type_tag(&self) -> &'static str {
        match self {
            Self::BarcodeInitialized => "BARCODE_INITIALIZED",
            Self::BarcodeResult { .. } => "BARCODE_RESULT",
            Self::MrzInitialized => "MRZ_INITIALIZED",
            Self::MrzResult { .. } => "MRZ_RESULT",
            Self::DwtInitialized => "DWT_INITIALIZED",
            Self::DwtDevicesLoaded { .. } => "DWT_DEVICES_LOADED",
            Self::DwtScanComplete { .. } => "DWT_SCAN_COMPLETE",
            Self::DwtSaveComplete { .. } => "DWT_SAVE_COMPLETE",
            Self::DwtError { .. } => "DWT_ERROR",
            Self::DwtStatus { .. } => "DWT_STATUS",
            Self::DwtLoading { .. } => "DWT_LOADING",
        }
    }

    /// Returns `true` if this is an initialization event.
    #[inline]
    #[must_use]
    pub const fn is_initialized(&self) -> bool {
        matches!(
            self,
            Self::BarcodeInitialized | Self::MrzInitialized | Self::DwtInitialized
        )
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    use serde_json::json;

    #[test]
    fn test_barcode_result_parsing() {
        let raw = RawMessage::new(json!({
            "type": "BARCODE_RESULT",
            "data": { "format": "QR_CODE", "text": "hello" }
        }));

        let event = WidgetEvent::from_raw(&raw).expect("known tag");
        match event {
            WidgetEvent::BarcodeResult { data } => {
                assert_eq!(data.get("format").and_then(|v| v.as_str()), Some("QR_CODE"));
            }
            other => panic!("unexpected event: {other:?}"),
        }
    }

    #[test]
    fn test_initialized_events() {
        for (tag, kind) in [
            ("BARCODE_INITIALIZED", WidgetKind::Barcode),
            ("MRZ_INITIALIZED", WidgetKind::Mrz),
            ("DWT_INITIALIZED", WidgetKind::DocumentScanner),
        ] {
            let raw = RawMessage::new(json!({ "type": tag }));
            let event = WidgetEvent::from_raw(&raw).expect("known tag");
            assert!(event.is_initialized());
            assert_eq!(event.kind(), kind);
            assert_eq!(event.type_tag(), tag);
        }
    }

    #[test]
    fn test_scan_complete_parsing() {
        let raw = RawMessage::new(json!({ "type": "DWT_SCAN_COMPLETE", "imageCount": 3 }));
        let event = WidgetEvent::from_raw(&raw).expect("known tag");
        assert_eq!(event, WidgetEvent::DwtScanComplete { image_count: 3 });
    }

    #[test]
    fn test_loading_parsing() {
        let raw = RawMessage::new(json!({ "type": "DWT_LOADING", "loading": true }));
        let event = WidgetEvent::from_raw(&raw).expect("known tag");
        assert_eq!(event, WidgetEvent::DwtLoading { loading: true });
    }

    #[test]
    fn test_missing_fields_default() {
        let raw = RawMessage::new(json!({ "type": "DWT_ERROR" }));
        let event = WidgetEvent::from_raw(&raw).expect("known tag");
        assert_eq!(
            event,
            WidgetEvent::DwtError {
                message: String::new()
            }
        );

        let raw = RawMessage::new(json!({ "type": "DWT_LOADING" }));
        assert_eq!(
            WidgetEvent::from_raw(&raw),
            Some(WidgetEvent::DwtLoading { loading: false })
        );
    }

    #[test]
    fn test_unknown_tag_rejected() {
        let raw = RawMessage::new(json!({ "type": "TELEMETRY_PING", "data": 1 }));
        assert_eq!(WidgetEvent::from_raw(&raw), None);
    }

    #[test]
    fn test_empty_object_rejected() {
        let raw = RawMessage::new(json!({}));
        assert_eq!(WidgetEvent::from_raw(&raw), None);
    }

    #[test]
    fn test_null_payload_rejected() {
        let raw = RawMessage::new(serde_json::Value::Null);
        assert_eq!(WidgetEvent::from_raw(&raw), None);
    }

    #[test]
    fn test_devices_loaded_parsing() {
        let raw = RawMessage::new(json!({
            "type": "DWT_DEVICES_LOADED",
            "devices": ["EPSON DS-530", "Fujitsu fi-7160"]
        }));
        let event = WidgetEvent::from_raw(&raw).expect("known tag");
        match event {
            WidgetEvent::DwtDevicesLoaded { devices } => assert_eq!(devices.len(), 2),
            other => panic!("unexpected event: {other:?}"),
        }
    }

    #[test]
    fn test_kind_vocabulary_partition() {
        // Every DWT tag maps to DocumentScanner, never to the camera kinds.
        for tag in [
            "DWT_INITIALIZED",
            "DWT_DEVICES_LOADED",
            "DWT_SCAN_COMPLETE",
            "DWT_SAVE_COMPLETE",
            "DWT_ERROR",
            "DWT_STATUS",
            "DWT_LOADING",
        ] {
            let raw = RawMessage::new(json!({ "type": tag }));
            let event = WidgetEvent::from_raw(&raw).expect("known tag");
            assert_eq!(event.kind(), WidgetKind::DocumentScanner);
        }
    }
}
