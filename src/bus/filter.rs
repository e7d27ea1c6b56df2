//! Predicate filters for bus subscriptions.

// ============================================================================
// Imports
// ============================================================================

use crate::protocol::RawMessage;
use crate::widget::WidgetKind;

// ============================================================================
// SubscriptionFilter
// ============================================================================

/// Narrow acceptance predicate for one subscription.
///
/// A message is accepted only if it carries a `type` tag recognized by
/// the subscription's widget kind; everything else (absent tags, foreign
/// vocabularies, arbitrary shapes from unrelated senders) is silently
/// passed over. When both the filter and the message carry an origin, the
/// origins must also match.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubscriptionFilter {
    /// Widget kind whose vocabulary is accepted.
    kind: WidgetKind,
    /// Origin the frame is expected to send from, when known.
    expected_origin: Option<String>,
}

impl SubscriptionFilter {
    /// Creates a filter accepting one widget kind's vocabulary from any
    /// origin.
    #[inline]
    #[must_use]
    pub fn for_kind(kind: WidgetKind) -> Self {
        Self {
            kind,
            expected_origin: None,
        }
    }

    /// Restricts the filter to messages from a specific origin.
    ///
    /// Messages without origin information still pass: the transport,
    /// not the sender, decides whether origins are known.
    #[inline]
    #[must_use]
    pub fn with_origin(mut self, origin: impl Into<String>) -> Self {
        self.expected_origin = Some(origin.into());
        self
    }

    /// Returns the widget kind this filter accepts.
    #[inline]
    #[must_use]
    pub fn kind(&self) -> WidgetKind {
        self.kind
    }

    /// Returns the expected origin, if restricted.
    #[inline]
    #[must_use]
    pub fn expected_origin(&self) -> Option<&str> {
        self.expected_origin.as_deref()
    }

    /// Tests a raw message against this filter.
    #[must_use]
    pub fn accepts(&self, raw: &RawMessage) -> bool {
        let Some(tag) = raw.type_tag() else {
            return false;
        };

        if !self.kind.accepts(tag) {
            return false;
        }

        match (&self.expected_origin, &raw.origin) {
            (Some(expected), Some(actual)) => expected == actual,
            _ => true,
        }
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
    fn test_accepts_own_vocabulary() {
        let filter = SubscriptionFilter::for_kind(WidgetKind::Barcode);
        let msg = RawMessage::new(json!({ "type": "BARCODE_RESULT", "data": {} }));
        assert!(filter.accepts(&msg));
    }

    #[test]
    fn test_rejects_foreign_vocabulary() {
        let filter = SubscriptionFilter::for_kind(WidgetKind::Barcode);
        let msg = RawMessage::new(json!({ "type": "MRZ_RESULT", "data": {} }));
        assert!(!filter.accepts(&msg));
    }

    #[test]
    fn test_rejects_missing_tag() {
        let filter = SubscriptionFilter::for_kind(WidgetKind::DocumentScanner);
        assert!(!filter.accepts(&RawMessage::new(json!({}))));
        assert!(!filter.accepts(&RawMessage::new(json!({ "data": 1 }))));
        assert!(!filter.accepts(&RawMessage::new(serde_json::Value::Null)));
    }

    #[test]
    fn test_origin_match() {
        let filter =
            SubscriptionFilter::for_kind(WidgetKind::Mrz).with_origin("https://widgets.local");

        let from_widget = RawMessage::with_origin(
            "https://widgets.local",
            json!({ "type": "MRZ_INITIALIZED" }),
        );
        assert!(filter.accepts(&from_widget));

        let from_elsewhere =
            RawMessage::with_origin("https://evil.example", json!({ "type": "MRZ_INITIALIZED" }));
        assert!(!filter.accepts(&from_elsewhere));
    }

    #[test]
    fn test_unknown_origin_passes() {
        let filter =
            SubscriptionFilter::for_kind(WidgetKind::Mrz).with_origin("https://widgets.local");
        let msg = RawMessage::new(json!({ "type": "MRZ_INITIALIZED" }));
        assert!(filter.accepts(&msg));
    }
}
