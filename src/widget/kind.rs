//! Widget kinds and their wire vocabulary.

// ============================================================================
// Imports
// ============================================================================

use std::fmt;

use serde::{Deserialize, Serialize};

// ============================================================================
// WidgetKind
// ============================================================================

/// The kind of an embedded device-capture widget.
///
/// The kind determines three things: the content document loaded into the
/// frame, the capability/sandbox policy applied to the frame, and the set
/// of message `type` tags the host accepts from it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum WidgetKind {
    /// Camera-based barcode scanner.
    Barcode,

    /// Camera-based machine-readable-zone (passport/ID) scanner.
    Mrz,

    /// Desktop document scanner driving attached scanner hardware.
    DocumentScanner,
}

// ============================================================================
// WidgetKind - Wire Vocabulary
// ============================================================================

/// Accepted `type` tags for the barcode widget.
const BARCODE_TAGS: &[&str] = &["BARCODE_INITIALIZED", "BARCODE_RESULT"];

/// Accepted `type` tags for the MRZ widget.
const MRZ_TAGS: &[&str] = &["MRZ_INITIALIZED", "MRZ_RESULT"];

/// Accepted `type` tags for the document scanner widget.
const DWT_TAGS: &[&str] = &[
    "DWT_INITIALIZED",
    "DWT_DEVICES_LOADED",
    "DWT_SCAN_COMPLETE",
    "DWT_SAVE_COMPLETE",
    "DWT_ERROR",
    "DWT_STATUS",
    "DWT_LOADING",
];

impl WidgetKind {
    /// All widget kinds.
    pub const ALL: [Self; 3] = [Self::Barcode, Self::Mrz, Self::DocumentScanner];

    /// Returns the fixed relative path of the widget's content document.
    ///
    /// Appended to the externally resolved base location to form the
    /// frame URL.
    #[must_use]
    pub const fn content_path(&self) -> &'static str {
        match self {
            Self::Barcode => "/barcode-scanner.html",
            Self::Mrz => "/mrz-scanner.html",
            Self::DocumentScanner => "/document-scanner.html",
        }
    }

    /// Returns the message `type` tags this kind's widget may emit.
    #[must_use]
    pub const fn accepted_tags(&self) -> &'static [&'static str] {
        match self {
            Self::Barcode => BARCODE_TAGS,
            Self::Mrz => MRZ_TAGS,
            Self::DocumentScanner => DWT_TAGS,
        }
    }

    /// Returns `true` if `tag` belongs to this kind's vocabulary.
    #[must_use]
    pub fn accepts(&self, tag: &str) -> bool {
        self.accepted_tags().contains(&tag)
    }

    /// Returns a short stable name for logging and display.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Barcode => "barcode",
            Self::Mrz => "mrz",
            Self::DocumentScanner => "document-scanner",
        }
    }

    /// Returns `true` if this kind's widget drives a live camera.
    ///
    /// Camera kinds need the camera/microphone capability; the document
    /// scanner must NOT be granted it.
    #[inline]
    #[must_use]
    pub const fn uses_camera(&self) -> bool {
        matches!(self, Self::Barcode | Self::Mrz)
    }
}

impl fmt::Display for WidgetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Tests
// ============================================================================
