use async_trait::async_trait;
use notification::dispatcher::NotificationDispatcher;
use notification::gateway::{DynMessagingGateway, MessagingGatewayTrait};
use shared::domain::event::OrderTransition;
use shared::domain::responses::OrderResponse;
use shared::domain::status::{OrderChannel, OrderStatus, PaymentStatus};
use shared::errors::ServiceError;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{broadcast, mpsc};
use uuid::Uuid;

/// Gateway double that records every attempt and optionally fails them.
struct RecordingGateway {
    attempts: mpsc::UnboundedSender<(String, String)>,
    fail: bool,
}

#[async_trait]
impl MessagingGatewayTrait for RecordingGateway {
    async fn send(&self, to: &str, body: &str) -> Result<(), ServiceError> {
        self.attempts
            .send((to.to_string(), body.to_string()))
            .expect("test receiver dropped");

        if self.fail {
            Err(ServiceError::NotificationDelivery("gateway down".into()))
        } else {
            Ok(())
        }
    }
}

fn order(phone: Option<&str>) -> OrderResponse {
    OrderResponse {
        id: Uuid::new_v4(),
        property_id: Uuid::new_v4(),
        channel: OrderChannel::Food,
        guest_name: "Ada".into(),
        locator: "Table 4".into(),
        guest_phone: phone.map(str::to_string),
        status: OrderStatus::Ready,
        total_amount: 130,
        notes: None,
        payment_method: None,
        payment_status: PaymentStatus::Pending,
        created_at: "2024-01-01 12:00:00".into(),
        updated_at: "2024-01-01 12:05:00".into(),
        items: vec![],
    }
}

fn transition(order: OrderResponse, previous: OrderStatus, current: OrderStatus) -> OrderTransition {
    OrderTransition {
        order,
        previous,
        current,
    }
}

fn start_dispatcher(
    fail: bool,
) -> (
    broadcast::Sender<OrderTransition>,
    mpsc::UnboundedReceiver<(String, String)>,
) {
    let (attempts_tx, attempts_rx) = mpsc::unbounded_channel();
    let gateway: DynMessagingGateway = Arc::new(RecordingGateway {
        attempts: attempts_tx,
        fail,
    });

    let (transitions_tx, transitions_rx) = broadcast::channel(16);
    tokio::spawn(NotificationDispatcher::new(gateway).run(transitions_rx));

    (transitions_tx, attempts_rx)
}

async fn next_attempt(
    attempts: &mut mpsc::UnboundedReceiver<(String, String)>,
) -> (String, String) {
    tokio::time::timeout(Duration::from_secs(2), attempts.recv())
        .await
        .expect("dispatcher should have attempted a delivery")
        .expect("attempt channel closed")
}

#[tokio::test]
async fn ready_transition_with_phone_fires_exactly_one_attempt() {
    let (transitions, mut attempts) = start_dispatcher(false);

    transitions
        .send(transition(
            order(Some("+35511122")),
            OrderStatus::Preparing,
            OrderStatus::Ready,
        ))
        .unwrap();

    let (to, body) = next_attempt(&mut attempts).await;
    assert_eq!(to, "+35511122");
    assert!(body.contains("ready"));

    // No second attempt for the same transition.
    let extra = tokio::time::timeout(Duration::from_millis(200), attempts.recv()).await;
    assert!(extra.is_err(), "expected exactly one delivery attempt");
}

#[tokio::test]
async fn gateway_failure_is_swallowed_and_loop_continues() {
    let (transitions, mut attempts) = start_dispatcher(true);

    transitions
        .send(transition(
            order(Some("+35511122")),
            OrderStatus::Preparing,
            OrderStatus::Ready,
        ))
        .unwrap();

    // The attempt happens even though the gateway rejects it.
    next_attempt(&mut attempts).await;

    // And the dispatcher is still alive for the next transition.
    transitions
        .send(transition(
            order(Some("+35533344")),
            OrderStatus::Ready,
            OrderStatus::Delivered,
        ))
        .unwrap();

    let (to, _) = next_attempt(&mut attempts).await;
    assert_eq!(to, "+35533344");
}

#[tokio::test]
async fn orders_without_phone_are_skipped() {
    let (transitions, mut attempts) = start_dispatcher(false);

    transitions
        .send(transition(
            order(None),
            OrderStatus::Preparing,
            OrderStatus::Ready,
        ))
        .unwrap();

    // A later qualifying transition proves the skipped one produced nothing.
    transitions
        .send(transition(
            order(Some("+35599900")),
            OrderStatus::Ready,
            OrderStatus::Delivered,
        ))
        .unwrap();

    let (to, _) = next_attempt(&mut attempts).await;
    assert_eq!(to, "+35599900");
}

#[tokio::test]
async fn transitions_into_pending_never_notify() {
    let (transitions, mut attempts) = start_dispatcher(false);

    transitions
        .send(transition(
            order(Some("+35511122")),
            OrderStatus::Pending,
            OrderStatus::Pending,
        ))
        .unwrap();

    let silent = tokio::time::timeout(Duration::from_millis(200), attempts.recv()).await;
    assert!(silent.is_err(), "pending must stay silent");
}
