use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use types::errors::ExchangeError;

/// Central error type for the gateway
///
/// Non-2xx responses carry `{ "message": ... }` with the canonical message
/// of the underlying rejection.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    #[error(transparent)]
    Exchange(#[from] ExchangeError),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg),
            AppError::Exchange(err) => {
                let status = match err {
                    ExchangeError::InvalidInput(_)
                    | ExchangeError::CrossesBook
                    | ExchangeError::InsufficientFunds
                    | ExchangeError::InsufficientSharesInCirculation
                    | ExchangeError::NoLiquidity => StatusCode::BAD_REQUEST,
                    ExchangeError::UnknownSymbol
                    | ExchangeError::UnknownOrder
                    | ExchangeError::UnknownUser => StatusCode::NOT_FOUND,
                    ExchangeError::SymbolInUse | ExchangeError::LastManager => StatusCode::CONFLICT,
                    ExchangeError::PermissionDenied => StatusCode::FORBIDDEN,
                    ExchangeError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
                };
                (status, err.to_string())
            }
        };

        let body = Json(json!({ "message": message }));
        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        let resp = AppError::Exchange(ExchangeError::CrossesBook).into_response();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let resp = AppError::Exchange(ExchangeError::UnknownOrder).into_response();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);

        let resp = AppError::Exchange(ExchangeError::PermissionDenied).into_response();
        assert_eq!(resp.status(), StatusCode::FORBIDDEN);

        let resp = AppError::Unauthorized("missing header".into()).into_response();
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    }
}
