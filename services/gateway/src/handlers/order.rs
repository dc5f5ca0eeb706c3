use crate::auth::AuthenticatedUser;
use crate::error::AppError;
use crate::models::{CreateOrderRequest, MessageResponse, OrderResponse};
use crate::state::AppState;
use axum::{
    extract::{Path, State},
    Json,
};
use engine::SubmitRequest;
use types::ids::{OrderId, SymbolId};

pub async fn submit_order(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Json(payload): Json<CreateOrderRequest>,
) -> Result<Json<OrderResponse>, AppError> {
    let outcome = state.exchange.submit(
        user.user_id,
        SubmitRequest {
            symbol_id: SymbolId::new(payload.symbol_id),
            side: payload.side,
            order_type: payload.order_type,
            price: payload.price,
            quantity: payload.quantity,
        },
    )?;

    Ok(Json(OrderResponse {
        order_status: outcome.status,
        trades_executed: outcome.fills,
        order_id: outcome.order_id,
    }))
}

pub async fn cancel_order(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(order_id): Path<u64>,
) -> Result<Json<MessageResponse>, AppError> {
    state.exchange.cancel(user.user_id, OrderId::new(order_id))?;

    Ok(Json(MessageResponse {
        message: "order cancelled".to_string(),
    }))
}
