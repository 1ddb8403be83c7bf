use shared::domain::event::{ChangeSignal, OrderTransition};
use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};
use tokio::sync::broadcast;
use tracing::debug;
use uuid::Uuid;

/// Per-channel ring buffer depth. A terminal that falls further behind
/// than this receives `Lagged` and reconciles, which heals it.
const SIGNAL_BUFFER: usize = 64;
const TRANSITION_BUFFER: usize = 256;

/// Broadcast hub for order changes, keyed by property id.
///
/// Every successful store mutation publishes a [`ChangeSignal`] on its
/// property's channel; subscribed terminals treat each signal as a cue to
/// refetch. Publishing never blocks and never waits on subscribers. A
/// second, property-agnostic channel carries full [`OrderTransition`]
/// payloads for the notification dispatcher.
pub struct OrderEventBus {
    channels: RwLock<HashMap<Uuid, broadcast::Sender<ChangeSignal>>>,
    transitions: broadcast::Sender<OrderTransition>,
}

impl Default for OrderEventBus {
    fn default() -> Self {
        Self::new()
    }
}

impl OrderEventBus {
    pub fn new() -> Self {
        let (transitions, _) = broadcast::channel(TRANSITION_BUFFER);
        Self {
            channels: RwLock::new(HashMap::new()),
            transitions,
        }
    }

    /// Subscribe to change signals for one property. Dropping the returned
    /// subscription unsubscribes immediately; the property's sender is
    /// pruned on a later publish once no subscribers remain.
    pub fn subscribe(&self, property_id: Uuid) -> ChangeSubscription {
        let mut channels = self
            .channels
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        let sender = channels
            .entry(property_id)
            .or_insert_with(|| broadcast::channel(SIGNAL_BUFFER).0);

        debug!("📡 Terminal subscribed to property {property_id}");

        ChangeSubscription {
            property_id,
            receiver: sender.subscribe(),
        }
    }

    /// Fan a signal out to the property's subscribers. A property nobody
    /// watches is a no-op.
    pub fn publish(&self, signal: ChangeSignal) {
        let mut channels = self
            .channels
            .write()
            .unwrap_or_else(PoisonError::into_inner);

        let mut dead = false;
        if let Some(sender) = channels.get(&signal.property_id) {
            if sender.receiver_count() == 0 {
                dead = true;
            } else {
                let delivered = sender.send(signal.clone()).unwrap_or(0);
                debug!(
                    "📤 Signal {:?} for property {} delivered to {delivered} subscriber(s)",
                    signal.kind, signal.property_id
                );
            }
        }

        if dead {
            channels.remove(&signal.property_id);
        }
    }

    /// Hand a completed status transition to the notification side.
    /// Fire-and-forget: with no dispatcher running the event is dropped.
    pub fn publish_transition(&self, transition: OrderTransition) {
        let _ = self.transitions.send(transition);
    }

    pub fn subscribe_transitions(&self) -> broadcast::Receiver<OrderTransition> {
        self.transitions.subscribe()
    }

    /// Live subscriber count for a property. Used by tests and the admin
    /// surface.
    pub fn subscriber_count(&self, property_id: Uuid) -> usize {
        self.channels
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&property_id)
            .map(|sender| sender.receiver_count())
            .unwrap_or(0)
    }
}

/// A live subscription to one property's change signals. Owns the
/// receiving end; dropping it ends delivery synchronously.
pub struct ChangeSubscription {
    property_id: Uuid,
    receiver: broadcast::Receiver<ChangeSignal>,
}

impl ChangeSubscription {
    pub fn property_id(&self) -> Uuid {
        self.property_id
    }

    pub async fn recv(&mut self) -> Result<ChangeSignal, broadcast::error::RecvError> {
        self.receiver.recv().await
    }

    pub fn into_receiver(self) -> broadcast::Receiver<ChangeSignal> {
        self.receiver
    }
}
