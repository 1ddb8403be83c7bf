use order::abstract_trait::order::repository::{
    DynOrderCommandRepository, DynOrderItemQueryRepository, DynOrderQueryRepository,
    OrderItemQueryRepositoryTrait,
};
use order::abstract_trait::order::service::{OrderCommandServiceTrait, OrderQueryServiceTrait};
use order::bus::OrderEventBus;
use order::domain::requests::{
    BulkDeleteHistoryRequest, CreateOrderItemRequest, CreateOrderRequest, ListOrders, SortOrder,
};
use order::repository::memory::MemoryOrderRepository;
use order::service::{OrderCommandService, OrderCommandServiceDeps, OrderQueryService};
use order::state::AppState;
use prometheus_client::registry::Registry;
use shared::domain::event::SignalKind;
use shared::domain::responses::OrderResponse;
use shared::domain::status::{OrderChannel, OrderStatus};
use shared::errors::ServiceError;
use std::sync::Arc;
use std::time::Duration;
use uuid::Uuid;

fn two_item_request(property_id: Uuid, phone: Option<&str>) -> CreateOrderRequest {
    CreateOrderRequest {
        property_id,
        channel: OrderChannel::Food,
        guest_name: "Ada".into(),
        locator: "Table 4".into(),
        guest_phone: phone.map(str::to_string),
        notes: Some("no onions".into()),
        payment_method: Some("cash".into()),
        payment_status: None,
        items: vec![
            CreateOrderItemRequest {
                quantity: 2,
                unit_price: 25,
                item_name: "Club sandwich".into(),
                item_description: Some("Triple decker".into()),
                ingredients: Some("chicken, bacon, lettuce".into()),
                image_ref: Some("catalog/club.png".into()),
                portion: Some("350g".into()),
            },
            CreateOrderItemRequest {
                quantity: 1,
                unit_price: 30,
                item_name: "Lemonade".into(),
                item_description: None,
                ingredients: None,
                image_ref: None,
                portion: Some("0.4l".into()),
            },
        ],
    }
}

fn list_request(property_id: Uuid) -> ListOrders {
    ListOrders {
        property_id,
        channel: OrderChannel::Food,
        statuses: None,
        sort: SortOrder::NewestFirst,
    }
}

async fn create(state: &AppState, property_id: Uuid) -> OrderResponse {
    state
        .di_container
        .order_command
        .create_order(&two_item_request(property_id, None))
        .await
        .unwrap()
        .data
}

async fn walk_to(state: &AppState, order_id: Uuid, target: OrderStatus) {
    let path = match target {
        OrderStatus::Preparing => vec![OrderStatus::Preparing],
        OrderStatus::Ready => vec![OrderStatus::Preparing, OrderStatus::Ready],
        OrderStatus::Delivered => vec![
            OrderStatus::Preparing,
            OrderStatus::Ready,
            OrderStatus::Delivered,
        ],
        OrderStatus::Cancelled => vec![OrderStatus::Cancelled],
        OrderStatus::Pending => vec![],
    };

    for status in path {
        state
            .di_container
            .order_command
            .update_order_status(order_id, status)
            .await
            .unwrap();
    }
}

#[tokio::test]
async fn create_computes_total_from_item_totals() {
    let state = AppState::new_in_memory();
    let order = create(&state, Uuid::new_v4()).await;

    assert_eq!(order.status, OrderStatus::Pending);
    assert_eq!(order.items.len(), 2);
    assert_eq!(order.items[0].total_price, 50);
    assert_eq!(order.items[1].total_price, 30);
    assert_eq!(order.total_amount, 130);

    let summed: i64 = order.items.iter().map(|item| item.total_price).sum();
    assert_eq!(order.total_amount, summed);
}

#[tokio::test]
async fn create_rejects_empty_items() {
    let state = AppState::new_in_memory();

    let mut request = two_item_request(Uuid::new_v4(), None);
    request.items.clear();

    let result = state.di_container.order_command.create_order(&request).await;
    assert!(matches!(result, Err(ServiceError::Validation(_))));
}

#[tokio::test]
async fn backward_transition_is_rejected_without_side_effects() {
    let state = AppState::new_in_memory();
    let property_id = Uuid::new_v4();
    let order = create(&state, property_id).await;

    walk_to(&state, order.id, OrderStatus::Preparing).await;

    let result = state
        .di_container
        .order_command
        .update_order_status(order.id, OrderStatus::Pending)
        .await;

    match result {
        Err(ServiceError::InvalidTransition { from, to }) => {
            assert_eq!(from, "preparing");
            assert_eq!(to, "pending");
        }
        other => panic!("expected InvalidTransition, got {other:?}"),
    }

    let current = state
        .di_container
        .order_query
        .find_by_id(order.id)
        .await
        .unwrap();
    assert_eq!(current.data.status, OrderStatus::Preparing);
}

#[tokio::test]
async fn same_status_reapplication_is_a_silent_success() {
    let state = AppState::new_in_memory();
    let property_id = Uuid::new_v4();
    let order = create(&state, property_id).await;

    walk_to(&state, order.id, OrderStatus::Preparing).await;

    // Subscribe after the real transition so only the no-op could signal.
    let mut subscription = state.bus.subscribe(property_id);

    let response = state
        .di_container
        .order_command
        .update_order_status(order.id, OrderStatus::Preparing)
        .await
        .unwrap();
    assert_eq!(response.data.status, OrderStatus::Preparing);

    let silent = tokio::time::timeout(Duration::from_millis(200), subscription.recv()).await;
    assert!(silent.is_err(), "idempotent re-application must not signal");
}

#[tokio::test]
async fn transitions_out_of_terminal_states_are_rejected() {
    let state = AppState::new_in_memory();
    let order = create(&state, Uuid::new_v4()).await;

    walk_to(&state, order.id, OrderStatus::Delivered).await;

    let result = state
        .di_container
        .order_command
        .update_order_status(order.id, OrderStatus::Cancelled)
        .await;

    assert!(matches!(
        result,
        Err(ServiceError::InvalidTransition { .. })
    ));
}

#[tokio::test]
async fn update_on_missing_order_is_not_found() {
    let state = AppState::new_in_memory();

    let result = state
        .di_container
        .order_command
        .update_order_status(Uuid::new_v4(), OrderStatus::Preparing)
        .await;

    assert!(matches!(result, Err(ServiceError::NotFound)));
}

#[tokio::test]
async fn every_mutation_signals_before_returning() {
    let state = AppState::new_in_memory();
    let property_id = Uuid::new_v4();
    let mut subscription = state.bus.subscribe(property_id);

    let order = create(&state, property_id).await;
    let signal = subscription.recv().await.unwrap();
    assert_eq!(signal.kind, SignalKind::Created);

    walk_to(&state, order.id, OrderStatus::Preparing).await;
    let signal = subscription.recv().await.unwrap();
    assert_eq!(signal.kind, SignalKind::StatusUpdated);

    state
        .di_container
        .order_command
        .delete_order(order.id)
        .await
        .unwrap();
    let signal = subscription.recv().await.unwrap();
    assert_eq!(signal.kind, SignalKind::Deleted);
}

#[tokio::test]
async fn deleting_missing_order_succeeds_and_stays_silent() {
    let state = AppState::new_in_memory();
    let property_id = Uuid::new_v4();
    let mut subscription = state.bus.subscribe(property_id);

    let response = state
        .di_container
        .order_command
        .delete_order(Uuid::new_v4())
        .await
        .unwrap();
    assert_eq!(response.status, "success");

    let silent = tokio::time::timeout(Duration::from_millis(200), subscription.recv()).await;
    assert!(silent.is_err(), "no observer should react to a no-op delete");
}

#[tokio::test]
async fn delete_cascades_to_items() {
    // Wire the services by hand so the test keeps a handle on the item
    // repository to check for orphans.
    let repo = MemoryOrderRepository::new();
    let bus = Arc::new(OrderEventBus::new());
    let mut registry = Registry::default();

    let query_repo: DynOrderQueryRepository = Arc::new(repo.clone());
    let command_repo: DynOrderCommandRepository = Arc::new(repo.clone());
    let item_repo: DynOrderItemQueryRepository = Arc::new(repo.clone());

    let query_service = OrderQueryService::new(query_repo.clone(), item_repo.clone(), &mut registry);
    let command_service = OrderCommandService::new(
        OrderCommandServiceDeps {
            command: command_repo,
            query: query_repo,
            item_query: item_repo,
            bus,
        },
        &mut registry,
    );

    let property_id = Uuid::new_v4();
    let order = command_service
        .create_order(&two_item_request(property_id, None))
        .await
        .unwrap()
        .data;

    command_service.delete_order(order.id).await.unwrap();

    let listed = query_service.list_orders(&list_request(property_id)).await.unwrap();
    assert!(listed.data.is_empty());

    let orphans = repo.find_by_order(order.id).await.unwrap();
    assert!(orphans.is_empty(), "items must die with their order");
}

#[tokio::test]
async fn bulk_delete_requires_confirmation_and_spares_active_orders() {
    let state = AppState::new_in_memory();
    let property_id = Uuid::new_v4();

    let delivered = create(&state, property_id).await;
    let cancelled = create(&state, property_id).await;
    let pending = create(&state, property_id).await;

    walk_to(&state, delivered.id, OrderStatus::Delivered).await;
    walk_to(&state, cancelled.id, OrderStatus::Cancelled).await;

    let unconfirmed = BulkDeleteHistoryRequest {
        property_id,
        channel: OrderChannel::Food,
        statuses: None,
        confirm: false,
    };
    let result = state
        .di_container
        .order_command
        .bulk_delete_history(&unconfirmed)
        .await;
    assert!(matches!(result, Err(ServiceError::Validation(_))));

    let confirmed = BulkDeleteHistoryRequest {
        confirm: true,
        ..unconfirmed
    };
    let deleted = state
        .di_container
        .order_command
        .bulk_delete_history(&confirmed)
        .await
        .unwrap();
    assert_eq!(deleted.data, 2);

    let remaining = state
        .di_container
        .order_query
        .list_orders(&list_request(property_id))
        .await
        .unwrap();
    assert_eq!(remaining.data.len(), 1);
    assert_eq!(remaining.data[0].id, pending.id);
    assert_eq!(remaining.data[0].status, OrderStatus::Pending);
}

#[tokio::test]
async fn bulk_delete_rejects_non_terminal_statuses() {
    let state = AppState::new_in_memory();

    let request = BulkDeleteHistoryRequest {
        property_id: Uuid::new_v4(),
        channel: OrderChannel::Bar,
        statuses: Some(vec![OrderStatus::Delivered, OrderStatus::Pending]),
        confirm: true,
    };

    let result = state
        .di_container
        .order_command
        .bulk_delete_history(&request)
        .await;
    assert!(matches!(result, Err(ServiceError::Validation(_))));
}

#[tokio::test]
async fn status_updates_emit_transitions_for_the_dispatcher() {
    let state = AppState::new_in_memory();
    let property_id = Uuid::new_v4();

    let mut transitions = state.bus.subscribe_transitions();

    let order = state
        .di_container
        .order_command
        .create_order(&two_item_request(property_id, Some("+35511122")))
        .await
        .unwrap()
        .data;

    walk_to(&state, order.id, OrderStatus::Ready).await;

    let first = transitions.recv().await.unwrap();
    assert_eq!(first.previous, OrderStatus::Pending);
    assert_eq!(first.current, OrderStatus::Preparing);

    let second = transitions.recv().await.unwrap();
    assert_eq!(second.current, OrderStatus::Ready);
    assert_eq!(second.order.guest_phone.as_deref(), Some("+35511122"));
}

#[tokio::test]
async fn lost_status_race_resolves_to_one_winner() {
    let state = AppState::new_in_memory();
    let order = create(&state, Uuid::new_v4()).await;

    walk_to(&state, order.id, OrderStatus::Ready).await;

    // Terminal 1 wins the ready -> delivered race.
    state
        .di_container
        .order_command
        .update_order_status(order.id, OrderStatus::Delivered)
        .await
        .unwrap();

    // Terminal 2's ready -> cancelled arrives second and must lose.
    let result = state
        .di_container
        .order_command
        .update_order_status(order.id, OrderStatus::Cancelled)
        .await;

    match result {
        Err(ServiceError::InvalidTransition { from, .. }) => assert_eq!(from, "delivered"),
        other => panic!("expected the loser to surface InvalidTransition, got {other:?}"),
    }
}

#[tokio::test]
async fn kitchen_sort_is_oldest_first() {
    let state = AppState::new_in_memory();
    let property_id = Uuid::new_v4();

    let first = create(&state, property_id).await;
    tokio::time::sleep(Duration::from_millis(5)).await;
    let second = create(&state, property_id).await;

    let kitchen_view = state
        .di_container
        .order_query
        .list_orders(&ListOrders {
            sort: SortOrder::OldestFirst,
            ..list_request(property_id)
        })
        .await
        .unwrap();

    assert_eq!(kitchen_view.data.len(), 2);
    assert_eq!(kitchen_view.data[0].id, first.id);
    assert_eq!(kitchen_view.data[1].id, second.id);
}

#[tokio::test]
async fn property_scope_never_leaks_across_tenants() {
    let state = AppState::new_in_memory();
    let mine = Uuid::new_v4();
    let other = Uuid::new_v4();

    create(&state, mine).await;
    create(&state, other).await;

    let listed = state
        .di_container
        .order_query
        .list_orders(&list_request(mine))
        .await
        .unwrap();

    assert_eq!(listed.data.len(), 1);
    assert!(listed.data.iter().all(|order| order.property_id == mine));
}
