use crate::error::AppError;
use axum::{async_trait, extract::FromRequestParts, http::request::Parts};
use types::ids::UserId;
use uuid::Uuid;

/// The caller identity, taken from the `x-user-id` header
///
/// Token issuance and verification live outside this service; by the time a
/// request arrives here the fronting layer has already resolved the caller,
/// so the gateway only parses the id and lets the engine decide everything
/// else.
pub struct AuthenticatedUser {
    pub user_id: UserId,
}

#[async_trait]
impl<S> FromRequestParts<S> for AuthenticatedUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get("x-user-id")
            .ok_or_else(|| AppError::Unauthorized("missing x-user-id header".to_string()))?;

        let raw = header
            .to_str()
            .map_err(|_| AppError::Unauthorized("invalid x-user-id header".to_string()))?;
        let uuid = Uuid::parse_str(raw)
            .map_err(|_| AppError::Unauthorized("x-user-id must be a UUID".to_string()))?;

        Ok(AuthenticatedUser {
            user_id: UserId::from_uuid(uuid),
        })
    }
}
