use crate::{gateway::DynMessagingGateway, template};
use shared::domain::event::OrderTransition;
use tokio::sync::broadcast::{Receiver, error::RecvError};
use tracing::{error, info, warn};

/// Consumes completed status transitions and fires guest messages through
/// the messaging gateway.
///
/// Strictly fire-and-forget: a failed delivery is logged and dropped. It
/// never retries, never blocks a transition and never surfaces an error to
/// the staff terminal that triggered the status change.
pub struct NotificationDispatcher {
    gateway: DynMessagingGateway,
}

impl NotificationDispatcher {
    pub fn new(gateway: DynMessagingGateway) -> Self {
        Self { gateway }
    }

    pub async fn run(self, mut transitions: Receiver<OrderTransition>) {
        info!("🚀 Notification dispatcher started");

        loop {
            match transitions.recv().await {
                Ok(transition) => self.handle(transition).await,
                Err(RecvError::Lagged(missed)) => {
                    // Dropped transitions are lost messages by design; the
                    // store never waits for us.
                    warn!("⚠️ Notification dispatcher lagged, {missed} transition(s) skipped");
                }
                Err(RecvError::Closed) => {
                    info!("Notification dispatcher stopping: transition channel closed");
                    break;
                }
            }
        }
    }

    async fn handle(&self, transition: OrderTransition) {
        let order = &transition.order;

        let Some(phone) = order.guest_phone.as_deref() else {
            return;
        };

        let Some(message) = template::compose(transition.current, order) else {
            return;
        };

        info!(
            "📨 Sending {} notification for order {}",
            transition.current, order.id
        );

        if let Err(e) = self.gateway.send(phone, &message).await {
            error!(
                "❌ Failed to deliver {} notification for order {}: {e}",
                transition.current, order.id
            );
        }
    }
}
