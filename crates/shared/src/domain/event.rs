use crate::domain::responses::OrderResponse;
use crate::domain::status::{OrderChannel, OrderStatus};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// What kind of mutation a change signal announces. Informational only:
/// subscribers treat every signal as a cue to reconcile, not as state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum SignalKind {
    Created,
    StatusUpdated,
    PaymentUpdated,
    Deleted,
    BulkDeleted,
}

/// Broadcast to every terminal subscribed to a property whenever any order
/// in that property changes. Carries no order payload.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ChangeSignal {
    pub property_id: Uuid,
    pub channel: OrderChannel,
    pub kind: SignalKind,
}

/// A completed status transition, handed to the notification dispatcher.
/// Unlike [`ChangeSignal`] this carries the full order so the dispatcher
/// can compose a guest message without reading the store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderTransition {
    pub order: OrderResponse,
    pub previous: OrderStatus,
    pub current: OrderStatus,
}
