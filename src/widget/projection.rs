//! Pure event → display-state mapping.
//!
//! Every function here is deterministic: the same event against the same
//! prior state always yields the same projected state. That makes a
//! recorded event log replayable, the basis of the determinism property
//! tests in [`instance`].
//!
//! [`instance`]: crate::widget::WidgetInstance

// ============================================================================
// Imports
// ============================================================================

use serde_json::Value;

use crate::protocol::WidgetEvent;
use crate::widget::{WidgetInstance, WidgetKind};

// ============================================================================
// Constants
// ============================================================================

/// Status text shown when the document scanner reports readiness.
pub(crate) const DWT_READY_STATUS: &str = "Document Scanner ready";

// ============================================================================
// Projection Functions
// ============================================================================

/// Canonical display serialization of a structured result payload.
///
/// Stable key ordering, two-space indentation. Two payloads with the same
/// fields always render identically regardless of wire field order.
#[must_use]
pub fn canonical_result(data: &Value) -> String {
    // Map keys sort in serde_json's default (BTreeMap-backed) Value.
    serde_json::to_string_pretty(data).unwrap_or_else(|_| data.to_string())
}

/// Human-readable summary of a completed scan.
#[inline]
#[must_use]
pub fn scan_summary(image_count: u64) -> String {
    format!("Scanned {image_count} image(s) successfully")
}

/// Human-readable summary of a completed save.
#[inline]
#[must_use]
pub fn save_summary(filename: &str) -> String {
    format!("Saved: {filename}")
}

/// Status text for a widget-reported error.
#[inline]
#[must_use]
pub fn error_status(message: &str) -> String {
    format!("Error: {message}")
}

// ============================================================================
// Replay
// ============================================================================

/// Replays an ordered event log against a fresh, mounted instance.
///
/// Replaying the same log twice yields identical projected state: the
/// projection never consults anything outside the instance and the event.
#[must_use]
pub fn replay<'a>(
    kind: WidgetKind,
    events: impl IntoIterator<Item = &'a WidgetEvent>,
) -> WidgetInstance {
    let mut instance = WidgetInstance::new(kind);
    instance.begin_initializing();
    for event in events {
        instance.apply(event);
    }
    instance
}

// ============================================================================
// Tests
// ============================================================================
