//! Frame host controller: mount/unmount lifecycle.

// ============================================================================
// Imports
// ============================================================================

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::bus::{MessageBus, SubscriptionFilter};
use crate::error::{Error, Result};
use crate::host::frame::DEFAULT_FRAME_STYLE;
use crate::host::{
    CapabilityPolicy, FrameContainer, FrameDescriptor, SandboxPolicy, WidgetResources,
};
use crate::identifiers::{SubscriptionId, WidgetId};
use crate::protocol::OutboundCommand;
use crate::widget::{LifecycleState, PreInitPolicy, WidgetInstance, WidgetKind, WidgetSnapshot};

// ============================================================================
// HostConfig
// ============================================================================

/// Configuration for a [`FrameHost`].
///
/// # Example
///
/// ```
/// use capture_widget_host::HostConfig;
///
/// let config = HostConfig::new()
///     .with_terminate_on_unmount()
///     .with_frame_style("height:480px;width:640px;");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostConfig {
    /// What to do with events observed before mount.
    pub pre_init_policy: PreInitPolicy,

    /// Post a best-effort `HOST_TERMINATE` before detaching.
    ///
    /// Off by default: the observed protocol has no teardown handshake,
    /// and the frame is free to ignore the notice anyway.
    pub terminate_on_unmount: bool,

    /// Inline style applied to the frame element.
    pub frame_style: String,
}

impl Default for HostConfig {
    fn default() -> Self {
        Self {
            pre_init_policy: PreInitPolicy::default(),
            terminate_on_unmount: false,
            frame_style: DEFAULT_FRAME_STYLE.to_string(),
        }
    }
}

impl HostConfig {
    /// Creates the default configuration.
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the pre-init policy.
    #[inline]
    #[must_use]
    pub fn with_pre_init_policy(mut self, policy: PreInitPolicy) -> Self {
        self.pre_init_policy = policy;
        self
    }

    /// Enables the best-effort teardown notice on unmount.
    #[inline]
    #[must_use]
    pub fn with_terminate_on_unmount(mut self) -> Self {
        self.terminate_on_unmount = true;
        self
    }

    /// Sets the frame's inline style.
    #[inline]
    #[must_use]
    pub fn with_frame_style(mut self, style: impl Into<String>) -> Self {
        self.frame_style = style.into();
        self
    }
}

// ============================================================================
// Types
// ============================================================================

/// Per-mount owned resources, guarded together so mount/unmount pairs are
/// atomic.
#[derive(Default)]
struct MountState {
    /// The owned frame reference, present exactly while mounted.
    frame: Option<FrameDescriptor>,
    /// The owned bus subscription token.
    subscription: Option<SubscriptionId>,
}

// ============================================================================
// FrameHost
// ============================================================================

/// Controller owning one embedded widget's frame and lifecycle.
///
/// One instance exists per embedded widget type in a mounted host
/// component. The controller guarantees, regardless of how often the
/// surrounding application re-renders:
///
/// - the frame is created at most once per mount ([`mount`] is
///   idempotent),
/// - the bus listener is attached exactly once per mount and detached
///   exactly once per unmount (token-owned, no binding-identity drift),
/// - frame-originated failures surface as status text, never as host
///   errors.
///
/// # Example
///
/// ```ignore
/// let bus = Arc::new(MessageBus::new());
/// let resources = WidgetResources::new().with_shared_base(base_url);
///
/// let host = FrameHost::new(WidgetKind::Barcode, Arc::clone(&bus), resources);
/// host.mount(&container)?;
///
/// let snapshot = host.wait_until_ready(Duration::from_secs(10)).await?;
/// assert!(snapshot.state.is_operational());
/// ```
///
/// [`mount`]: FrameHost::mount
pub struct FrameHost {
    /// Widget kind this host embeds.
    kind: WidgetKind,

    /// The process-wide bus.
    bus: Arc<MessageBus>,

    /// Precomputed content base locations.
    resources: WidgetResources,

    /// Host configuration.
    config: HostConfig,

    /// The owned widget instance.
    instance: Arc<Mutex<WidgetInstance>>,

    /// Mount-scoped owned resources.
    mount: Mutex<MountState>,

    /// Broadcasts lifecycle state changes to waiters.
    state_tx: watch::Sender<LifecycleState>,
}

impl fmt::Debug for FrameHost {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FrameHost")
            .field("kind", &self.kind)
            .field("mounted", &self.is_mounted())
            .finish_non_exhaustive()
    }
}

// ============================================================================
// FrameHost - Constructor
// ============================================================================

impl FrameHost {
    /// Creates a host with the default configuration.
    #[must_use]
    pub fn new(kind: WidgetKind, bus: Arc<MessageBus>, resources: WidgetResources) -> Self {
        Self::with_config(kind, bus, resources, HostConfig::default())
    }

    /// Creates a host with an explicit configuration.
    #[must_use]
    pub fn with_config(
        kind: WidgetKind,
        bus: Arc<MessageBus>,
        resources: WidgetResources,
        config: HostConfig,
    ) -> Self {
        let instance = WidgetInstance::with_policy(kind, config.pre_init_policy);
        let (state_tx, _) = watch::channel(instance.state());

        Self {
            kind,
            bus,
            resources,
            config,
            instance: Arc::new(Mutex::new(instance)),
            mount: Mutex::new(MountState::default()),
            state_tx,
        }
    }
}

// ============================================================================
// FrameHost - Accessors
// ============================================================================

impl FrameHost {
    /// Returns the widget kind.
    #[inline]
    #[must_use]
    pub fn kind(&self) -> WidgetKind {
        self.kind
    }

    /// Returns the owned instance's identity.
    #[inline]
    #[must_use]
    pub fn widget_id(&self) -> WidgetId {
        self.instance.lock().id()
    }

    /// Returns `true` while a frame exists.
    #[inline]
    #[must_use]
    pub fn is_mounted(&self) -> bool {
        self.mount.lock().frame.is_some()
    }

    /// Returns the current lifecycle state.
    #[inline]
    #[must_use]
    pub fn state(&self) -> LifecycleState {
        self.instance.lock().state()
    }

    /// Takes a copy of the projected, host-visible state.
    #[must_use]
    pub fn snapshot(&self) -> WidgetSnapshot {
        self.instance.lock().snapshot()
    }
}

// ============================================================================
// FrameHost - Mount / Unmount
// ============================================================================

impl FrameHost {
    /// Creates the frame and wires the message pipeline.
    ///
    /// Idempotent: calling mount on an already-mounted host changes
    /// nothing and returns the existing frame's identity; render loops
    /// may call it as often as they like.
    ///
    /// Attaching the frame is the point at which the widget's internal
    /// script starts executing, so the bus subscription is registered
    /// first; nothing the frame says can be lost.
    ///
    /// # Errors
    ///
    /// - [`Error::ResourceNotConfigured`] if the kind has no base location
    /// - [`Error::InvalidContentSource`] if the content URL is invalid
    pub fn mount(&self, container: &dyn FrameContainer) -> Result<WidgetId> {
        let mut mount = self.mount.lock();

        if let Some(frame) = &mount.frame {
            debug!(kind = %self.kind, id = %frame.id, "Mount on mounted host ignored");
            return Ok(frame.id);
        }

        let id = {
            let instance = self.instance.lock();
            // A terminated instance never comes back; its host component is
            // gone and a fresh controller owns any replacement frame.
            if instance.state().is_terminal() {
                debug!(kind = %self.kind, "Mount after unmount ignored");
                return Ok(instance.id());
            }
            instance.id()
        };

        let src = self.resources.content_url(self.kind)?;

        let descriptor = FrameDescriptor {
            id,
            kind: self.kind,
            src,
            allow: CapabilityPolicy::for_kind(self.kind).to_allow_attribute(),
            sandbox: SandboxPolicy::for_kind(self.kind).to_attribute(),
            style: self.config.frame_style.clone(),
        };

        {
            let mut instance = self.instance.lock();
            instance.begin_initializing();
            let _ = self.state_tx.send(instance.state());
        }

        if mount.subscription.is_none() {
            let instance = Arc::clone(&self.instance);
            let state_tx = self.state_tx.clone();

            let token = self.bus.subscribe(
                SubscriptionFilter::for_kind(self.kind),
                Box::new(move |event| {
                    let mut instance = instance.lock();
                    instance.apply(event);
                    let _ = state_tx.send(instance.state());
                }),
            );
            mount.subscription = Some(token);
        }

        container.attach(&descriptor);
        info!(kind = %self.kind, %id, src = %descriptor.src, "Widget frame mounted");

        mount.frame = Some(descriptor);
        Ok(id)
    }

    /// Releases the frame and revokes the bus subscription.
    ///
    /// Idempotent: unmounting an unmounted host is a no-op. Any message
    /// already in flight finds no subscription afterwards and is dropped,
    /// never misapplied. The instance reaches `Terminated`, the only
    /// terminal transition, and it is host-driven.
    pub fn unmount(&self, container: &dyn FrameContainer) {
        let mut mount = self.mount.lock();

        let Some(frame) = mount.frame.take() else {
            debug!(kind = %self.kind, "Unmount on unmounted host ignored");
            return;
        };

        if self.config.terminate_on_unmount
            && let Err(e) = self.bus.post(&OutboundCommand::Terminate)
        {
            warn!(kind = %self.kind, error = %e, "Teardown notice failed");
        }

        container.detach(frame.id);

        if let Some(token) = mount.subscription.take() {
            self.bus.unsubscribe(&token);
        }

        {
            let mut instance = self.instance.lock();
            instance.terminate();
            let _ = self.state_tx.send(instance.state());
        }

        info!(kind = %self.kind, id = %frame.id, "Widget frame unmounted");
    }
}

// ============================================================================
// FrameHost - Commands
// ============================================================================

impl FrameHost {
    /// Posts a command toward the embedded frames.
    ///
    /// Fire-and-forget, like everything outbound in this protocol.
    ///
    /// # Errors
    ///
    /// - [`Error::NotMounted`] if no frame exists
    /// - [`Error::Json`] if the command cannot be encoded
    pub fn post(&self, command: &OutboundCommand) -> Result<usize> {
        if !self.is_mounted() {
            return Err(Error::not_mounted(self.kind));
        }
        self.bus.post(command)
    }
}

// ============================================================================
// FrameHost - Waiting
// ============================================================================

impl FrameHost {
    /// Waits until the widget reports readiness, bounded by `timeout`.
    ///
    /// The protocol itself defines NO initialization timeout: a widget
    /// that never reports in leaves the instance in `Initializing`
    /// forever. This bounded wait is the explicit opt-in alternative; on
    /// timeout the state machine is untouched.
    ///
    /// # Errors
    ///
    /// - [`Error::NotMounted`] if called before mount
    /// - [`Error::ReadyTimeout`] if readiness does not arrive in time
    pub async fn wait_until_ready(&self, timeout: Duration) -> Result<WidgetSnapshot> {
        if !self.is_mounted() {
            return Err(Error::not_mounted(self.kind));
        }

        let mut state_rx = self.state_tx.subscribe();
        let wait = state_rx.wait_for(|state| state.is_operational());

        match tokio::time::timeout(timeout, wait).await {
            Ok(Ok(_)) => Ok(self.snapshot()),
            Ok(Err(_)) => Err(Error::protocol("Lifecycle channel closed")),
            Err(_) => Err(Error::ready_timeout(
                self.kind,
                timeout.as_millis() as u64,
            )),
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
