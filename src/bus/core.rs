//! The shared message bus.
//!
//! One bus serves every mounted widget instance in the process.
//! Subscriptions are predicate-filtered and identified by a
//! [`SubscriptionId`] token, so teardown always removes exactly the
//! handler that registration added; binding identity can never drift
//! between the subscribe and unsubscribe calls.

// ============================================================================
// Imports
// ============================================================================

use parking_lot::{Mutex, RwLock};
use tracing::{debug, trace};

use crate::bus::SubscriptionFilter;
use crate::error::Result;
use crate::identifiers::SubscriptionId;
use crate::protocol::{OutboundCommand, RawMessage, WidgetEvent};

// ============================================================================
// Types
// ============================================================================

/// Handler invoked for each event a subscription's filter accepts.
///
/// By the time a handler runs, shape validation already happened: it
/// receives the typed event, never the raw payload.
pub type EventHandler = Box<dyn Fn(&WidgetEvent) + Send + Sync>;

/// Sink invoked for each outbound command text frame.
///
/// Attached by transports (the gateway); one sink per transport.
pub type OutboundSink = Box<dyn Fn(&str) + Send + Sync>;

/// One registered subscription.
struct Subscription {
    /// Token identity.
    id: SubscriptionId,
    /// Acceptance predicate.
    filter: SubscriptionFilter,
    /// Event callback.
    handler: EventHandler,
}

// ============================================================================
// MessageBus
// ============================================================================

/// Process-wide, bidirectional-capable message bus.
///
/// Inbound: transports publish [`RawMessage`]s; each is validated once
/// and delivered, in subscription-registration order, to every handler
/// whose filter accepts it. Outbound: [`post`] fans a command out to
/// every attached transport sink; there is no per-frame private channel
/// in either direction.
///
/// # Thread Safety
///
/// `MessageBus` is `Send + Sync`. Delivery is serialized by an interior
/// lock: no two messages are ever processed concurrently, preserving the
/// transport's delivery order.
///
/// [`post`]: MessageBus::post
#[derive(Default)]
pub struct MessageBus {
    /// Registered subscriptions, in registration order.
    subscriptions: RwLock<Vec<Subscription>>,
    /// Attached outbound transports.
    sinks: RwLock<Vec<OutboundSink>>,
    /// Serializes delivery so handlers never run concurrently.
    delivery: Mutex<()>,
}

// ============================================================================
// MessageBus - Constructor
// ============================================================================

impl MessageBus {
    /// Creates an empty bus.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

// ============================================================================
// MessageBus - Subscriptions
// ============================================================================

impl MessageBus {
    /// Registers a filtered handler.
    ///
    /// Returns the token that [`unsubscribe`] takes. The bus itself
    /// places no limit on subscriptions per kind; mount-level idempotence
    /// (one subscription per mounted instance) is the frame host's job.
    ///
    /// [`unsubscribe`]: MessageBus::unsubscribe
    pub fn subscribe(&self, filter: SubscriptionFilter, handler: EventHandler) -> SubscriptionId {
        let id = SubscriptionId::generate();
        debug!(subscription = %id, kind = %filter.kind(), "Bus subscription registered");

        self.subscriptions.write().push(Subscription {
            id,
            filter,
            handler,
        });
        id
    }

    /// Removes the subscription registered under `id`.
    ///
    /// Returns `true` if a subscription was removed. Removing twice is a
    /// no-op, not an error.
    pub fn unsubscribe(&self, id: &SubscriptionId) -> bool {
        let mut subscriptions = self.subscriptions.write();
        let before = subscriptions.len();
        subscriptions.retain(|s| s.id != *id);
        let removed = subscriptions.len() < before;

        if removed {
            debug!(subscription = %id, "Bus subscription removed");
        }
        removed
    }

    /// Returns the number of registered subscriptions.
    #[inline]
    #[must_use]
    pub fn subscription_count(&self) -> usize {
        self.subscriptions.read().len()
    }

    /// Returns `true` if `id` is currently registered.
    #[inline]
    #[must_use]
    pub fn is_subscribed(&self, id: &SubscriptionId) -> bool {
        self.subscriptions.read().iter().any(|s| s.id == *id)
    }
}

// ============================================================================
// MessageBus - Inbound
// ============================================================================

impl MessageBus {
    /// Publishes a raw message to every accepting subscription.
    ///
    /// The message is validated at most once; handlers receive the typed
    /// event. Messages nothing accepts (malformed shapes, unknown tags,
    /// unrelated senders) are dropped silently. Returns the number of
    /// handlers invoked.
    pub fn publish(&self, raw: RawMessage) -> usize {
        // One message at a time, in transport delivery order.
        let _serialized = self.delivery.lock();

        let subscriptions = self.subscriptions.read();
        let mut event: Option<WidgetEvent> = None;
        let mut delivered = 0usize;

        for subscription in subscriptions.iter() {
            if !subscription.filter.accepts(&raw) {
                continue;
            }

            // A filter only accepts tags from a known vocabulary, so the
            // decode can only fail for payloads no filter matched.
            if event.is_none() {
                event = WidgetEvent::from_raw(&raw);
            }

            if let Some(ref event) = event {
                (subscription.handler)(event);
                delivered += 1;
            }
        }

        if delivered == 0 {
            trace!(tag = raw.type_tag().unwrap_or("<none>"), "Message dropped by all filters");
        }

        delivered
    }
}

// ============================================================================
// MessageBus - Outbound
// ============================================================================

impl MessageBus {
    /// Attaches an outbound transport sink.
    pub fn attach_sink(&self, sink: OutboundSink) {
        self.sinks.write().push(sink);
        debug!(sinks = self.sinks.read().len(), "Outbound sink attached");
    }

    /// Posts a command toward every attached transport.
    ///
    /// Fire-and-forget: frames that ignore the command simply ignore it.
    /// Returns the number of sinks the encoded frame was handed to.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Json`] if the command cannot be encoded.
    ///
    /// [`Error::Json`]: crate::error::Error::Json
    pub fn post(&self, command: &OutboundCommand) -> Result<usize> {
        let text = command.encode()?;
        let sinks = self.sinks.read();

        for sink in sinks.iter() {
            sink(&text);
        }

        trace!(tag = command.type_tag(), sinks = sinks.len(), "Outbound command posted");
        Ok(sinks.len())
    }
}

// ============================================================================
// Tests
// ============================================================================
