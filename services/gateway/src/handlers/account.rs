use crate::auth::AuthenticatedUser;
use crate::error::AppError;
use crate::models::{MessageResponse, PositionEntry, ProfileResponse, RegisterUserRequest};
use crate::state::AppState;
use axum::{
    extract::{Path, State},
    Json,
};
use types::errors::ExchangeError;
use types::ids::UserId;
use uuid::Uuid;

pub async fn me(
    State(state): State<AppState>,
    user: AuthenticatedUser,
) -> Result<Json<ProfileResponse>, AppError> {
    let profile = state.exchange.profile(&user.user_id)?;

    Ok(Json(ProfileResponse {
        id: profile.user.user_id,
        username: profile.user.username,
        role: profile.user.role,
        cash_balance: profile.user.cash,
        positions: profile
            .positions
            .into_iter()
            .map(|view| PositionEntry {
                symbol_id: view.symbol_id,
                symbol: view.ticker,
                quantity: view.quantity,
            })
            .collect(),
    }))
}

pub async fn register(
    State(state): State<AppState>,
    Json(payload): Json<RegisterUserRequest>,
) -> Result<Json<ProfileResponse>, AppError> {
    let user = state.exchange.register_user(&payload.username, payload.role)?;

    Ok(Json(ProfileResponse {
        id: user.user_id,
        username: user.username,
        role: user.role,
        cash_balance: user.cash,
        positions: Vec::new(),
    }))
}

pub async fn delete_user(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(target): Path<Uuid>,
) -> Result<Json<MessageResponse>, AppError> {
    let target = UserId::from_uuid(target);

    // Self-service, or a manager acting on any account
    if target != user.user_id {
        let caller = state.exchange.profile(&user.user_id)?;
        if !caller.user.role.is_manager() {
            return Err(ExchangeError::PermissionDenied.into());
        }
    }

    state.exchange.delete_user(&target)?;

    Ok(Json(MessageResponse {
        message: "account deleted".to_string(),
    }))
}
