use crate::{
    abstract_trait::order::service::{DynOrderCommandService, DynOrderQueryService},
    domain::requests::{
        BulkDeleteHistoryRequest, CreateOrderRequest, ListOrders, SortOrder,
        UpdateOrderStatusRequest, UpdatePaymentStatusRequest,
    },
    handler::{ValidatedJson, order_stream},
    state::AppState,
};
use axum::{
    Json,
    extract::{Extension, Path, Query},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post, put},
};
use serde::Deserialize;
use shared::domain::responses::{ApiResponse, OrderResponse};
use shared::domain::status::{OrderChannel, OrderStatus};
use shared::errors::HttpError;
use std::sync::Arc;
use utoipa::IntoParams;
use uuid::Uuid;

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListOrdersQuery {
    /// Tenant scope; every read is bound to exactly one property.
    pub property_id: Uuid,
    pub channel: OrderChannel,
    /// Comma-separated status filter, e.g. `pending,preparing`.
    pub status: Option<String>,
    pub sort: Option<SortOrder>,
}

impl ListOrdersQuery {
    fn into_request(self) -> Result<ListOrders, HttpError> {
        let statuses = match self.status.as_deref() {
            None | Some("") => None,
            Some(csv) => {
                let parsed = csv
                    .split(',')
                    .map(|status| status.trim().parse::<OrderStatus>())
                    .collect::<Result<Vec<_>, _>>()
                    .map_err(HttpError::BadRequest)?;
                Some(parsed)
            }
        };

        Ok(ListOrders {
            property_id: self.property_id,
            channel: self.channel,
            statuses,
            sort: self.sort.unwrap_or(SortOrder::NewestFirst),
        })
    }
}

#[utoipa::path(
    get,
    path = "/api/orders",
    tag = "Order",
    params(ListOrdersQuery),
    responses(
        (status = 200, description = "Orders for the property/channel", body = ApiResponse<Vec<OrderResponse>>),
        (status = 400, description = "Malformed status filter"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn get_orders(
    Extension(service): Extension<DynOrderQueryService>,
    Query(params): Query<ListOrdersQuery>,
) -> Result<impl IntoResponse, HttpError> {
    let request = params.into_request()?;
    let response = service.list_orders(&request).await?;
    Ok((StatusCode::OK, Json(response)))
}

#[utoipa::path(
    get,
    path = "/api/orders/{id}",
    tag = "Order",
    params(("id" = Uuid, Path, description = "Order ID")),
    responses(
        (status = 200, description = "Order details", body = ApiResponse<OrderResponse>),
        (status = 404, description = "Order not found")
    )
)]
pub async fn get_order(
    Extension(service): Extension<DynOrderQueryService>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, HttpError> {
    let response = service.find_by_id(id).await?;
    Ok(Json(response))
}

#[utoipa::path(
    post,
    path = "/api/orders",
    tag = "Order",
    request_body = CreateOrderRequest,
    responses(
        (status = 201, description = "Order created", body = ApiResponse<OrderResponse>),
        (status = 400, description = "Validation error"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn create_order(
    Extension(service): Extension<DynOrderCommandService>,
    ValidatedJson(body): ValidatedJson<CreateOrderRequest>,
) -> Result<impl IntoResponse, HttpError> {
    let response = service.create_order(&body).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

#[utoipa::path(
    put,
    path = "/api/orders/{id}/status",
    tag = "Order",
    params(("id" = Uuid, Path, description = "Order ID")),
    request_body = UpdateOrderStatusRequest,
    responses(
        (status = 200, description = "Status updated", body = ApiResponse<OrderResponse>),
        (status = 404, description = "Order not found"),
        (status = 409, description = "Illegal status transition")
    )
)]
pub async fn update_order_status(
    Extension(service): Extension<DynOrderCommandService>,
    Path(id): Path<Uuid>,
    Json(body): Json<UpdateOrderStatusRequest>,
) -> Result<impl IntoResponse, HttpError> {
    let response = service.update_order_status(id, body.status).await?;
    Ok((StatusCode::OK, Json(response)))
}

#[utoipa::path(
    put,
    path = "/api/orders/{id}/payment",
    tag = "Order",
    params(("id" = Uuid, Path, description = "Order ID")),
    request_body = UpdatePaymentStatusRequest,
    responses(
        (status = 200, description = "Payment status updated", body = ApiResponse<OrderResponse>),
        (status = 404, description = "Order not found")
    )
)]
pub async fn update_payment_status(
    Extension(service): Extension<DynOrderCommandService>,
    Path(id): Path<Uuid>,
    Json(body): Json<UpdatePaymentStatusRequest>,
) -> Result<impl IntoResponse, HttpError> {
    let response = service
        .update_payment_status(id, body.payment_status)
        .await?;
    Ok((StatusCode::OK, Json(response)))
}

#[utoipa::path(
    delete,
    path = "/api/orders/{id}",
    tag = "Order",
    params(("id" = Uuid, Path, description = "Order ID")),
    responses(
        (status = 200, description = "Order deleted (or was already gone)")
    )
)]
pub async fn delete_order(
    Extension(service): Extension<DynOrderCommandService>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, HttpError> {
    let response = service.delete_order(id).await?;
    Ok((StatusCode::OK, Json(response)))
}

#[utoipa::path(
    post,
    path = "/api/orders/history/delete",
    tag = "Order",
    request_body = BulkDeleteHistoryRequest,
    responses(
        (status = 200, description = "History deleted", body = ApiResponse<u64>),
        (status = 400, description = "Missing confirmation or non-terminal status requested")
    )
)]
pub async fn bulk_delete_history(
    Extension(service): Extension<DynOrderCommandService>,
    Json(body): Json<BulkDeleteHistoryRequest>,
) -> Result<impl IntoResponse, HttpError> {
    let response = service.bulk_delete_history(&body).await?;
    Ok((StatusCode::OK, Json(response)))
}

pub fn order_routes(state: Arc<AppState>) -> axum::Router {
    axum::Router::new()
        .route("/api/orders", post(create_order).get(get_orders))
        .route("/api/orders/stream", get(order_stream))
        .route("/api/orders/history/delete", post(bulk_delete_history))
        .route(
            "/api/orders/{id}",
            get(get_order).delete(delete_order),
        )
        .route("/api/orders/{id}/status", put(update_order_status))
        .route("/api/orders/{id}/payment", put(update_payment_status))
        .layer(Extension(state.di_container.order_command.clone()))
        .layer(Extension(state.di_container.order_query.clone()))
        .layer(Extension(state.bus.clone()))
}
