//! Per-widget state machine and projected state.

// ============================================================================
// Imports
// ============================================================================

use std::fmt;

use tracing::{debug, trace};

use crate::identifiers::WidgetId;
use crate::protocol::WidgetEvent;
use crate::widget::projection::{
    DWT_READY_STATUS, canonical_result, error_status, save_summary, scan_summary,
};
use crate::widget::{LifecycleState, PreInitPolicy, WidgetKind};

// ============================================================================
// WidgetInstance
// ============================================================================

/// Host-side representation of one embedded widget.
///
/// Owns the lifecycle state machine and the projected fields surfaced to
/// the surrounding application. Exactly one instance exists per mounted
/// frame host; it is created on first mount and terminated on unmount.
///
/// All mutation goes through [`apply`], which is deterministic: the same
/// event against the same prior state always produces the same projected
/// state, so a recorded event log is replayable.
///
/// [`apply`]: WidgetInstance::apply
pub struct WidgetInstance {
    /// Unique identity, shared with the frame created for this instance.
    id: WidgetId,
    /// Widget kind; fixes the accepted event vocabulary.
    kind: WidgetKind,
    /// Current lifecycle state.
    state: LifecycleState,
    /// Canonical serialization of the most recent result, if any.
    last_result: Option<String>,
    /// Most recent status text from the widget.
    status_message: String,
    /// `true` while a scan/save is in progress. Set only by
    /// `DWT_LOADING{true}`; cleared by loading-false, init, completion
    /// and error events.
    is_busy: bool,
    /// Device names reported by the document scanner.
    devices: Vec<String>,
    /// Policy for events observed before mount.
    pre_init_policy: PreInitPolicy,
    /// Events held back under [`PreInitPolicy::Buffer`].
    pre_init_buffer: Vec<WidgetEvent>,
}

impl fmt::Debug for WidgetInstance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WidgetInstance")
            .field("id", &self.id)
            .field("kind", &self.kind)
            .field("state", &self.state)
            .field("is_busy", &self.is_busy)
            .finish_non_exhaustive()
    }
}

// ============================================================================
// WidgetInstance - Constructor
// ============================================================================

impl WidgetInstance {
    /// Creates a fresh, unmounted instance.
    #[must_use]
    pub fn new(kind: WidgetKind) -> Self {
        Self::with_policy(kind, PreInitPolicy::default())
    }

    /// Creates a fresh instance with an explicit pre-init policy.
    #[must_use]
    pub fn with_policy(kind: WidgetKind, pre_init_policy: PreInitPolicy) -> Self {
        Self {
            id: WidgetId::generate(),
            kind,
            state: LifecycleState::Uninitialized,
            last_result: None,
            status_message: String::new(),
            is_busy: false,
            devices: Vec::new(),
            pre_init_policy,
            pre_init_buffer: Vec::new(),
        }
    }
}

// ============================================================================
// WidgetInstance - Accessors
// ============================================================================

impl WidgetInstance {
    /// Returns the instance identity.
    #[inline]
    #[must_use]
    pub fn id(&self) -> WidgetId {
        self.id
    }

    /// Returns the widget kind.
    #[inline]
    #[must_use]
    pub fn kind(&self) -> WidgetKind {
        self.kind
    }

    /// Returns the current lifecycle state.
    #[inline]
    #[must_use]
    pub fn state(&self) -> LifecycleState {
        self.state
    }

    /// Returns the canonical serialization of the latest result.
    #[inline]
    #[must_use]
    pub fn last_result(&self) -> Option<&str> {
        self.last_result.as_deref()
    }

    /// Returns the latest status text.
    #[inline]
    #[must_use]
    pub fn status_message(&self) -> &str {
        &self.status_message
    }

    /// Returns `true` while a scan/save is in progress.
    #[inline]
    #[must_use]
    pub fn is_busy(&self) -> bool {
        self.is_busy
    }

    /// Returns the device names reported by the widget.
    #[inline]
    #[must_use]
    pub fn devices(&self) -> &[String] {
        &self.devices
    }

    /// Takes a cheap copy of the projected state.
    #[must_use]
    pub fn snapshot(&self) -> WidgetSnapshot {
        WidgetSnapshot {
            kind: self.kind,
            state: self.state,
            last_result: self.last_result.clone(),
            status_message: self.status_message.clone(),
            is_busy: self.is_busy,
            devices: self.devices.clone(),
        }
    }
}

// ============================================================================
// WidgetInstance - Host-Driven Transitions
// ============================================================================

impl WidgetInstance {
    /// Marks the frame as created; the widget script is now running.
    ///
    /// Idempotent: only the `Uninitialized → Initializing` edge exists.
    /// Under [`PreInitPolicy::Buffer`], held-back events replay here in
    /// arrival order.
    pub fn begin_initializing(&mut self) {
        if self.state != LifecycleState::Uninitialized {
            return;
        }

        self.state = LifecycleState::Initializing;
        debug!(id = %self.id, kind = %self.kind, "Widget initializing");

        let buffered = std::mem::take(&mut self.pre_init_buffer);
        for event in &buffered {
            self.project(event);
        }
    }

    /// Terminates the instance. Host-driven and terminal.
    ///
    /// Projected fields are retained for inspection; all further events
    /// are ignored.
    pub fn terminate(&mut self) {
        if self.state.is_terminal() {
            return;
        }
        self.state = LifecycleState::Terminated;
        debug!(id = %self.id, kind = %self.kind, "Widget terminated");
    }
}

// ============================================================================
// WidgetInstance - Event Application
// ============================================================================

impl WidgetInstance {
    /// Applies one typed event to the state machine.
    ///
    /// Events for a different kind's vocabulary, and events after
    /// termination, are no-ops. Events before mount follow the pre-init
    /// policy.
    pub fn apply(&mut self, event: &WidgetEvent) {
        if self.state.is_terminal() {
            trace!(id = %self.id, tag = event.type_tag(), "Event after termination ignored");
            return;
        }

        if event.kind() != self.kind {
            trace!(
                id = %self.id,
                kind = %self.kind,
                tag = event.type_tag(),
                "Foreign-vocabulary event ignored"
            );
            return;
        }

        if self.state == LifecycleState::Uninitialized {
            match self.pre_init_policy {
                PreInitPolicy::Ignore => {
                    trace!(id = %self.id, tag = event.type_tag(), "Pre-mount event ignored");
                }
                PreInitPolicy::Buffer => {
                    trace!(id = %self.id, tag = event.type_tag(), "Pre-mount event buffered");
                    self.pre_init_buffer.push(event.clone());
                }
            }
            return;
        }

        self.project(event);
    }

    /// Projects one event onto the instance. Pure with respect to
    /// (prior state, event).
    fn project(&mut self, event: &WidgetEvent) {
        match event {
            WidgetEvent::BarcodeInitialized | WidgetEvent::MrzInitialized => {
                self.state = LifecycleState::Ready;
            }

            WidgetEvent::DwtInitialized => {
                self.state = LifecycleState::Ready;
                self.is_busy = false;
                self.status_message = DWT_READY_STATUS.to_string();
            }

            WidgetEvent::BarcodeResult { data } | WidgetEvent::MrzResult { data } => {
                self.last_result = Some(canonical_result(data));
            }

            WidgetEvent::DwtDevicesLoaded { devices } => {
                self.devices = devices.clone();
            }

            WidgetEvent::DwtScanComplete { image_count } => {
                self.is_busy = false;
                self.last_result = Some(scan_summary(*image_count));
                if self.state == LifecycleState::Busy {
                    self.state = LifecycleState::Ready;
                }
            }

            WidgetEvent::DwtSaveComplete { filename } => {
                self.is_busy = false;
                self.last_result = Some(save_summary(filename));
                if self.state == LifecycleState::Busy {
                    self.state = LifecycleState::Ready;
                }
            }

            WidgetEvent::DwtError { message } => {
                self.is_busy = false;
                self.status_message = error_status(message);
                // An error before first readiness is an init failure; after
                // readiness the widget stays usable.
                self.state = match self.state {
                    LifecycleState::Initializing => LifecycleState::Error,
                    LifecycleState::Busy => LifecycleState::Ready,
                    other => other,
                };
            }

            WidgetEvent::DwtStatus { message } => {
                self.status_message = message.clone();
            }

            WidgetEvent::DwtLoading { loading } => {
                self.is_busy = *loading;
                if self.state.is_operational() {
                    self.state = if *loading {
                        LifecycleState::Busy
                    } else {
                        LifecycleState::Ready
                    };
                }
            }
        }
    }
}

// ============================================================================
// WidgetSnapshot
// ============================================================================

/// A copy of the projected, host-visible state of a widget instance.
#[derive(Debug, Clone, PartialEq)]
pub struct WidgetSnapshot {
    /// Widget kind.
    pub kind: WidgetKind,
    /// Lifecycle state at snapshot time.
    pub state: LifecycleState,
    /// Canonical serialization of the latest result.
    pub last_result: Option<String>,
    /// Latest status text.
    pub status_message: String,
    /// Busy flag.
    pub is_busy: bool,
    /// Reported device names.
    pub devices: Vec<String>,
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    use proptest::prelude::*;
    use serde_json::json;

    use crate::widget::replay;

    fn mounted(kind: WidgetKind) -> WidgetInstance {
        let mut instance = WidgetInstance::new(kind);
        instance.begin_initializing();
        instance
    }

    #[test]
    fn test_initial_state() {
        let instance = WidgetInstance::new(WidgetKind::Barcode);
        assert_eq!(instance.state(), LifecycleState::Uninitialized);
        assert!(instance.last_result().is_none());
        assert_eq!(instance.status_message(), "");
        assert!(!instance.is_busy());
    }

    #[test]
    fn test_barcode_init_then_result() {
        let mut instance = mounted(WidgetKind::Barcode);
        instance.apply(&WidgetEvent::BarcodeInitialized);
        assert_eq!(instance.state(), LifecycleState::Ready);

        let payload = json!({ "format": "QR_CODE", "text": "hello" });
        instance.apply(&WidgetEvent::BarcodeResult {
            data: payload.clone(),
        });

        assert_eq!(instance.state(), LifecycleState::Ready);
        assert_eq!(
            instance.last_result(),
            Some(canonical_result(&payload).as_str())
        );
    }

    #[test]
    fn test_mrz_mirrors_barcode() {
        let mut instance = mounted(WidgetKind::Mrz);
        instance.apply(&WidgetEvent::MrzInitialized);
        instance.apply(&WidgetEvent::MrzResult {
            data: json!({ "documentNumber": "X123" }),
        });
        assert_eq!(instance.state(), LifecycleState::Ready);
        assert!(instance.last_result().unwrap().contains("documentNumber"));
    }

    #[test]
    fn test_dwt_init_clears_busy_and_sets_status() {
        let mut instance = mounted(WidgetKind::DocumentScanner);
        instance.apply(&WidgetEvent::DwtLoading { loading: true });
        assert!(instance.is_busy());

        instance.apply(&WidgetEvent::DwtInitialized);
        assert_eq!(instance.state(), LifecycleState::Ready);
        assert!(!instance.is_busy());
        assert_eq!(instance.status_message(), "Document Scanner ready");
    }

    #[test]
    fn test_dwt_loading_drives_busy_state() {
        let mut instance = mounted(WidgetKind::DocumentScanner);
        instance.apply(&WidgetEvent::DwtInitialized);

        instance.apply(&WidgetEvent::DwtLoading { loading: true });
        assert_eq!(instance.state(), LifecycleState::Busy);
        assert!(instance.is_busy());

        instance.apply(&WidgetEvent::DwtLoading { loading: false });
        assert_eq!(instance.state(), LifecycleState::Ready);
        assert!(!instance.is_busy());
    }

    #[test]
    fn test_scan_complete_clears_busy() {
        let mut instance = mounted(WidgetKind::DocumentScanner);
        instance.apply(&WidgetEvent::DwtInitialized);
        instance.apply(&WidgetEvent::DwtLoading { loading: true });
        instance.apply(&WidgetEvent::DwtScanComplete { image_count: 3 });

        assert!(!instance.is_busy());
        assert_eq!(instance.state(), LifecycleState::Ready);
        assert_eq!(
            instance.last_result(),
            Some("Scanned 3 image(s) successfully")
        );
    }

    #[test]
    fn test_save_complete_projection() {
        let mut instance = mounted(WidgetKind::DocumentScanner);
        instance.apply(&WidgetEvent::DwtInitialized);
        instance.apply(&WidgetEvent::DwtSaveComplete {
            filename: "passport.pdf".into(),
        });
        assert_eq!(instance.last_result(), Some("Saved: passport.pdf"));
    }

    #[test]
    fn test_error_without_init() {
        let mut instance = mounted(WidgetKind::DocumentScanner);
        instance.apply(&WidgetEvent::DwtError {
            message: "jam".into(),
        });

        assert_eq!(instance.status_message(), "Error: jam");
        assert!(!instance.is_busy());
        assert_eq!(instance.state(), LifecycleState::Error);
    }

    #[test]
    fn test_error_after_ready_keeps_widget_usable() {
        let mut instance = mounted(WidgetKind::DocumentScanner);
        instance.apply(&WidgetEvent::DwtInitialized);
        instance.apply(&WidgetEvent::DwtLoading { loading: true });
        instance.apply(&WidgetEvent::DwtError {
            message: "cover open".into(),
        });

        assert_eq!(instance.state(), LifecycleState::Ready);
        assert_eq!(instance.status_message(), "Error: cover open");
        assert!(!instance.is_busy());

        // Subsequent attempts still work.
        instance.apply(&WidgetEvent::DwtLoading { loading: true });
        instance.apply(&WidgetEvent::DwtScanComplete { image_count: 1 });
        assert_eq!(instance.state(), LifecycleState::Ready);
    }

    #[test]
    fn test_error_does_not_clear_last_result() {
        let mut instance = mounted(WidgetKind::DocumentScanner);
        instance.apply(&WidgetEvent::DwtInitialized);
        instance.apply(&WidgetEvent::DwtScanComplete { image_count: 2 });
        let result_before = instance.last_result().map(str::to_string);

        instance.apply(&WidgetEvent::DwtError {
            message: "jam".into(),
        });
        assert_eq!(instance.last_result().map(str::to_string), result_before);
    }

    #[test]
    fn test_status_and_devices_are_side_channels() {
        let mut instance = mounted(WidgetKind::DocumentScanner);
        instance.apply(&WidgetEvent::DwtInitialized);

        instance.apply(&WidgetEvent::DwtStatus {
            message: "warming up".into(),
        });
        assert_eq!(instance.state(), LifecycleState::Ready);
        assert_eq!(instance.status_message(), "warming up");

        instance.apply(&WidgetEvent::DwtDevicesLoaded {
            devices: vec!["EPSON DS-530".into()],
        });
        assert_eq!(instance.state(), LifecycleState::Ready);
        assert_eq!(instance.devices(), ["EPSON DS-530".to_string()]);
    }

    #[test]
    fn test_foreign_vocabulary_ignored() {
        let mut instance = mounted(WidgetKind::Barcode);
        instance.apply(&WidgetEvent::BarcodeInitialized);
        let before = instance.snapshot();

        instance.apply(&WidgetEvent::DwtError {
            message: "jam".into(),
        });
        instance.apply(&WidgetEvent::MrzResult { data: json!({}) });

        assert_eq!(instance.snapshot(), before);
    }

    #[test]
    fn test_events_after_terminate_ignored() {
        let mut instance = mounted(WidgetKind::Barcode);
        instance.apply(&WidgetEvent::BarcodeInitialized);
        instance.terminate();

        instance.apply(&WidgetEvent::BarcodeResult {
            data: json!({ "text": "late" }),
        });
        assert_eq!(instance.state(), LifecycleState::Terminated);
        assert!(instance.last_result().is_none());
    }

    #[test]
    fn test_pre_init_ignore_policy() {
        let mut instance = WidgetInstance::new(WidgetKind::Barcode);
        instance.apply(&WidgetEvent::BarcodeInitialized);
        assert_eq!(instance.state(), LifecycleState::Uninitialized);

        instance.begin_initializing();
        assert_eq!(instance.state(), LifecycleState::Initializing);
    }

    #[test]
    fn test_pre_init_buffer_policy_replays() {
        let mut instance = WidgetInstance::with_policy(WidgetKind::Barcode, PreInitPolicy::Buffer);
        instance.apply(&WidgetEvent::BarcodeInitialized);
        instance.apply(&WidgetEvent::BarcodeResult {
            data: json!({ "text": "early" }),
        });
        assert_eq!(instance.state(), LifecycleState::Uninitialized);

        instance.begin_initializing();
        assert_eq!(instance.state(), LifecycleState::Ready);
        assert!(instance.last_result().unwrap().contains("early"));
    }

    #[test]
    fn test_begin_initializing_idempotent() {
        let mut instance = mounted(WidgetKind::Mrz);
        instance.apply(&WidgetEvent::MrzInitialized);
        instance.begin_initializing();
        assert_eq!(instance.state(), LifecycleState::Ready);
    }

    // ========================================================================
    // Property Tests
    // ========================================================================

    fn dwt_event_strategy() -> impl Strategy<Value = WidgetEvent> {
        prop_oneof![
            Just(WidgetEvent::DwtInitialized),
            (0u64..10).prop_map(|image_count| WidgetEvent::DwtScanComplete { image_count }),
            "[a-z]{1,8}\\.pdf".prop_map(|filename| WidgetEvent::DwtSaveComplete { filename }),
            any::<bool>().prop_map(|loading| WidgetEvent::DwtLoading { loading }),
            "[a-z ]{0,12}".prop_map(|message| WidgetEvent::DwtError { message }),
            "[a-z ]{0,12}".prop_map(|message| WidgetEvent::DwtStatus { message }),
            proptest::collection::vec("[A-Za-z0-9 -]{1,16}", 0..4)
                .prop_map(|devices| WidgetEvent::DwtDevicesLoaded { devices }),
        ]
    }

    proptest! {
        #[test]
        fn prop_replay_deterministic(
            events in proptest::collection::vec(dwt_event_strategy(), 0..32)
        ) {
            let first = replay(WidgetKind::DocumentScanner, &events);
            let second = replay(WidgetKind::DocumentScanner, &events);
            prop_assert_eq!(first.snapshot(), second.snapshot());
        }

        #[test]
        fn prop_busy_only_while_loading(
            events in proptest::collection::vec(dwt_event_strategy(), 0..32)
        ) {
            let instance = replay(WidgetKind::DocumentScanner, &events);

            // Busy can only survive if the trailing busy-relevant event
            // was an explicit loading(true).
            let last_busy_relevant = events.iter().rev().find(|e| {
                matches!(
                    e,
                    WidgetEvent::DwtLoading { .. }
                        | WidgetEvent::DwtInitialized
                        | WidgetEvent::DwtScanComplete { .. }
                        | WidgetEvent::DwtSaveComplete { .. }
                        | WidgetEvent::DwtError { .. }
                )
            });

            let expect_busy =
                matches!(last_busy_relevant, Some(WidgetEvent::DwtLoading { loading: true }));
            prop_assert_eq!(instance.is_busy(), expect_busy);
        }

        #[test]
        fn prop_never_panics_on_any_sequence(
            events in proptest::collection::vec(dwt_event_strategy(), 0..64)
        ) {
            let instance = replay(WidgetKind::DocumentScanner, &events);
            let _ = instance.snapshot();
        }
    }
}
