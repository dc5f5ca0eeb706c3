use crate::auth::AuthenticatedUser;
use crate::error::AppError;
use crate::models::{BurnRequest, CreateSymbolRequest, MessageResponse, MintRequest, SymbolCreatedResponse};
use crate::state::AppState;
use axum::{
    extract::{Path, State},
    Json,
};
use types::ids::SymbolId;

pub async fn create_symbol(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Json(payload): Json<CreateSymbolRequest>,
) -> Result<Json<SymbolCreatedResponse>, AppError> {
    let symbol_id = state.exchange.create_symbol(&user.user_id, &payload.ticker)?;

    Ok(Json(SymbolCreatedResponse {
        symbol_id,
        ticker: payload.ticker,
    }))
}

pub async fn delete_symbol(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(symbol_id): Path<u64>,
) -> Result<Json<MessageResponse>, AppError> {
    state
        .exchange
        .delete_symbol(&user.user_id, &SymbolId::new(symbol_id))?;

    Ok(Json(MessageResponse {
        message: "symbol deleted".to_string(),
    }))
}

pub async fn mint(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(symbol_id): Path<u64>,
    Json(payload): Json<MintRequest>,
) -> Result<Json<MessageResponse>, AppError> {
    state
        .exchange
        .mint(&user.user_id, &SymbolId::new(symbol_id), payload.quantity)?;

    Ok(Json(MessageResponse {
        message: format!("minted {} shares", payload.quantity),
    }))
}

pub async fn burn(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(symbol_id): Path<u64>,
    Json(payload): Json<BurnRequest>,
) -> Result<Json<MessageResponse>, AppError> {
    state
        .exchange
        .burn(&user.user_id, &SymbolId::new(symbol_id), payload.quantity)?;

    Ok(Json(MessageResponse {
        message: format!("burned {} shares", payload.quantity),
    }))
}
