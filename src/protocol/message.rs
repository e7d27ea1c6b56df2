//! Untrusted inbound wire shape.
//!
//! Everything arriving on the message bus starts life as a [`RawMessage`]:
//! an arbitrary JSON payload plus the origin it arrived from. The bus is
//! reachable by unrelated senders, so nothing about the payload shape can
//! be trusted until [`WidgetEvent::from_raw`] has validated it.
//!
//! [`WidgetEvent::from_raw`]: crate::protocol::WidgetEvent::from_raw

// ============================================================================
// Imports
// ============================================================================

use serde_json::Value;

// ============================================================================
// RawMessage
// ============================================================================

/// An untyped message as delivered by the transport.
///
/// # Format
///
/// ```json
/// {
///   "type": "BARCODE_RESULT",
///   "data": { ... }
/// }
/// ```
///
/// The `type` tag is the only field the channel itself inspects; all other
/// fields are event-specific and read by the typed parsing layer.
#[derive(Debug, Clone)]
pub struct RawMessage {
    /// Origin the message arrived from, when the transport knows it.
    pub origin: Option<String>,

    /// Arbitrary JSON payload. Untrusted.
    pub payload: Value,
}

impl RawMessage {
    /// Creates a raw message with no origin information.
    #[inline]
    #[must_use]
    pub fn new(payload: Value) -> Self {
        Self {
            origin: None,
            payload,
        }
    }

    /// Creates a raw message tagged with its source origin.
    #[inline]
    #[must_use]
    pub fn with_origin(origin: impl Into<String>, payload: Value) -> Self {
        Self {
            origin: Some(origin.into()),
            payload,
        }
    }

    /// Returns the `type` discriminator, if the payload carries one.
    ///
    /// Absent tags (including non-object payloads) yield `None`; such
    /// messages are filtered out, never errors.
    #[inline]
    #[must_use]
    pub fn type_tag(&self) -> Option<&str> {
        self.payload.get("type").and_then(Value::as_str)
    }

    /// Gets a string field from the payload.
    ///
    /// Returns empty string if the key is missing or not a string.
    #[inline]
    #[must_use]
    pub fn get_string(&self, key: &str) -> String {
        self.payload
            .get(key)
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string()
    }

    /// Gets a u64 field from the payload.
    ///
    /// Returns 0 if the key is missing or not a number.
    #[inline]
    #[must_use]
    pub fn get_u64(&self, key: &str) -> u64 {
        self.payload
            .get(key)
            .and_then(Value::as_u64)
            .unwrap_or_default()
    }

    /// Gets a boolean field from the payload.
    ///
    /// Returns false if the key is missing or not a boolean.
    #[inline]
    #[must_use]
    pub fn get_bool(&self, key: &str) -> bool {
        self.payload
            .get(key)
            .and_then(Value::as_bool)
            .unwrap_or_default()
    }

    /// Gets a field from the payload as an owned value.
    ///
    /// Returns `Value::Null` if the key is missing.
    #[inline]
    #[must_use]
    pub fn get_value(&self, key: &str) -> Value {
        self.payload.get(key).cloned().unwrap_or(Value::Null)
    }

    /// Gets an array field rendered as strings.
    ///
    /// String elements are taken verbatim; non-string elements are
    /// rendered as compact JSON. Returns empty when missing.
    #[must_use]
    pub fn get_string_array(&self, key: &str) -> Vec<String> {
        self.payload
            .get(key)
            .and_then(Value::as_array)
            .map(|arr| {
                arr.iter()
                    .map(|v| match v.as_str() {
                        Some(s) => s.to_string(),
                        None => v.to_string(),
                    })
                    .collect()
            })
            .unwrap_or_default()
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
    fn test_type_tag_present() {
        let msg = RawMessage::new(json!({ "type": "BARCODE_INITIALIZED" }));
        assert_eq!(msg.type_tag(), Some("BARCODE_INITIALIZED"));
    }

    #[test]
    fn test_type_tag_absent() {
        let msg = RawMessage::new(json!({}));
        assert_eq!(msg.type_tag(), None);
    }

    #[test]
    fn test_type_tag_non_object() {
        let msg = RawMessage::new(json!("just a string"));
        assert_eq!(msg.type_tag(), None);

        let msg = RawMessage::new(Value::Null);
        assert_eq!(msg.type_tag(), None);
    }

    #[test]
    fn test_type_tag_non_string_tag() {
        let msg = RawMessage::new(json!({ "type": 42 }));
        assert_eq!(msg.type_tag(), None);
    }

    #[test]
    fn test_get_helpers_defaults() {
        let msg = RawMessage::new(json!({ "type": "DWT_STATUS" }));
        assert_eq!(msg.get_string("message"), "");
        assert_eq!(msg.get_u64("imageCount"), 0);
        assert!(!msg.get_bool("loading"));
        assert_eq!(msg.get_value("data"), Value::Null);
        assert!(msg.get_string_array("devices").is_empty());
    }

    #[test]
    fn test_get_string_array_mixed() {
        let msg = RawMessage::new(json!({
            "devices": ["EPSON DS-530", { "name": "Fujitsu fi-7160" }]
        }));
        let devices = msg.get_string_array("devices");
        assert_eq!(devices.len(), 2);
        assert_eq!(devices[0], "EPSON DS-530");
        assert!(devices[1].contains("Fujitsu"));
    }

    #[test]
    fn test_origin_tagging() {
        let msg = RawMessage::with_origin("https://widgets.local", json!({}));
        assert_eq!(msg.origin.as_deref(), Some("https://widgets.local"));

        let msg = RawMessage::new(json!({}));
        assert!(msg.origin.is_none());
    }
}
