use async_trait::async_trait;
use order::abstract_trait::order::service::{DynOrderQueryService, OrderQueryServiceTrait};
use order::domain::requests::{CreateOrderItemRequest, CreateOrderRequest, ListOrders};
use order::state::AppState;
use shared::domain::responses::{ApiResponse, OrderResponse};
use shared::domain::status::{OrderChannel, OrderStatus};
use shared::errors::ServiceError;
use std::sync::Arc;
use std::time::Duration;
use terminal::OrderTerminal;
use uuid::Uuid;

fn create_request(property_id: Uuid, phone: Option<&str>) -> CreateOrderRequest {
    CreateOrderRequest {
        property_id,
        channel: OrderChannel::Food,
        guest_name: "Ada".into(),
        locator: "Room 7".into(),
        guest_phone: phone.map(str::to_string),
        notes: None,
        payment_method: Some("room".into()),
        payment_status: None,
        items: vec![CreateOrderItemRequest {
            quantity: 1,
            unit_price: 30,
            item_name: "Lemonade".into(),
            item_description: None,
            ingredients: None,
            image_ref: None,
            portion: Some("0.4l".into()),
        }],
    }
}

fn terminal_for(state: &AppState, property_id: Uuid) -> OrderTerminal {
    OrderTerminal::new(
        property_id,
        OrderChannel::Food,
        state.di_container.order_query.clone(),
        state.di_container.order_command.clone(),
    )
}

#[tokio::test]
async fn foreign_mutation_reaches_subscribed_terminal_via_reconcile() {
    let state = AppState::new_in_memory();
    let property_id = Uuid::new_v4();

    // Terminal B subscribes before terminal A mutates.
    let mut subscription = state.bus.subscribe(property_id);
    let mut terminal_b = terminal_for(&state, property_id);
    terminal_b.reconcile().await.unwrap();
    assert!(terminal_b.orders().is_empty());

    // Terminal A (any other client of the same store) creates an order.
    state
        .di_container
        .order_command
        .create_order(&create_request(property_id, None))
        .await
        .unwrap();

    // The signal was published before create returned.
    let signal = tokio::time::timeout(Duration::from_secs(1), subscription.recv())
        .await
        .expect("expected a change signal")
        .unwrap();
    assert_eq!(signal.property_id, property_id);

    // Reconciling on the cue converges B to the store.
    terminal_b.reconcile().await.unwrap();
    assert_eq!(terminal_b.orders().len(), 1);
    assert_eq!(terminal_b.orders()[0].status, OrderStatus::Pending);
}

#[tokio::test]
async fn own_mutation_is_confirmed_by_refetch() {
    let state = AppState::new_in_memory();
    let property_id = Uuid::new_v4();

    let created = state
        .di_container
        .order_command
        .create_order(&create_request(property_id, None))
        .await
        .unwrap();

    let mut terminal = terminal_for(&state, property_id);
    terminal.reconcile().await.unwrap();

    terminal
        .update_status(created.data.id, OrderStatus::Preparing)
        .await
        .unwrap();

    assert_eq!(terminal.orders().len(), 1);
    assert_eq!(terminal.orders()[0].status, OrderStatus::Preparing);
}

#[tokio::test]
async fn rejected_mutation_rolls_back_to_reconciled_state() {
    let state = AppState::new_in_memory();
    let property_id = Uuid::new_v4();

    let created = state
        .di_container
        .order_command
        .create_order(&create_request(property_id, None))
        .await
        .unwrap();

    let mut terminal = terminal_for(&state, property_id);
    terminal.reconcile().await.unwrap();

    // pending -> ready skips a step and must be rejected.
    let result = terminal
        .update_status(created.data.id, OrderStatus::Ready)
        .await;

    assert!(matches!(
        result,
        Err(ServiceError::InvalidTransition { .. })
    ));

    // The optimistic write is gone; the terminal shows the store's truth.
    assert_eq!(terminal.orders().len(), 1);
    assert_eq!(terminal.orders()[0].status, OrderStatus::Pending);
}

#[tokio::test]
async fn optimistic_delete_converges_with_store() {
    let state = AppState::new_in_memory();
    let property_id = Uuid::new_v4();

    let created = state
        .di_container
        .order_command
        .create_order(&create_request(property_id, None))
        .await
        .unwrap();

    let mut terminal = terminal_for(&state, property_id);
    terminal.reconcile().await.unwrap();
    assert_eq!(terminal.orders().len(), 1);

    terminal.delete_order(created.data.id).await.unwrap();
    assert!(terminal.orders().is_empty());

    // Deleting again is a success and stays empty.
    terminal.delete_order(created.data.id).await.unwrap();
    assert!(terminal.orders().is_empty());
}

/// Query service double whose reads never complete in time.
struct StalledQueryService;

#[async_trait]
impl OrderQueryServiceTrait for StalledQueryService {
    async fn list_orders(
        &self,
        _req: &ListOrders,
    ) -> Result<ApiResponse<Vec<OrderResponse>>, ServiceError> {
        tokio::time::sleep(Duration::from_secs(30)).await;
        Ok(ApiResponse {
            status: "success".into(),
            message: "too late".into(),
            data: vec![],
        })
    }

    async fn find_by_id(
        &self,
        _order_id: Uuid,
    ) -> Result<ApiResponse<OrderResponse>, ServiceError> {
        Err(ServiceError::NotFound)
    }
}

#[tokio::test]
async fn stalled_backend_surfaces_timeout_not_empty_list() {
    let state = AppState::new_in_memory();
    let property_id = Uuid::new_v4();

    let stalled: DynOrderQueryService = Arc::new(StalledQueryService);

    let mut terminal = OrderTerminal::new(
        property_id,
        OrderChannel::Food,
        stalled,
        state.di_container.order_command.clone(),
    )
    .with_fetch_timeout(Duration::from_millis(100));

    let result = terminal.reconcile().await;
    assert!(matches!(result, Err(ServiceError::Timeout)));
}
