use crate::bus::OrderEventBus;
use axum::{
    extract::{Extension, Query},
    response::sse::{Event, KeepAlive, Sse},
};
use futures::Stream;
use serde::Deserialize;
use std::convert::Infallible;
use std::sync::Arc;
use tokio::sync::broadcast::error::RecvError;
use tracing::debug;
use utoipa::IntoParams;
use uuid::Uuid;

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct StreamParams {
    pub property_id: Uuid,
}

/// Server-sent change signals for one property. Each event is a cue to
/// refetch, not a payload; a lagged consumer gets a bare `lagged` event and
/// reconciles the same way. The subscription ends when the client
/// disconnects and the stream is dropped.
#[utoipa::path(
    get,
    path = "/api/orders/stream",
    tag = "Order",
    params(StreamParams),
    responses(
        (status = 200, description = "SSE stream of change signals")
    )
)]
pub async fn order_stream(
    Extension(bus): Extension<Arc<OrderEventBus>>,
    Query(params): Query<StreamParams>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    debug!("📡 SSE subscriber attached for property {}", params.property_id);

    let receiver = bus.subscribe(params.property_id).into_receiver();

    let stream = futures::stream::unfold(receiver, |mut receiver| async move {
        loop {
            match receiver.recv().await {
                Ok(signal) => match Event::default().event("change").json_data(&signal) {
                    Ok(event) => return Some((Ok(event), receiver)),
                    Err(_) => continue,
                },
                Err(RecvError::Lagged(_)) => {
                    return Some((Ok(Event::default().event("lagged")), receiver));
                }
                Err(RecvError::Closed) => return None,
            }
        }
    });

    Sse::new(stream).keep_alive(KeepAlive::default())
}
