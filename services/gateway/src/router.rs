use crate::handlers::{account, admin, market, order};
use crate::state::AppState;
use axum::{
    routing::{delete, get, post},
    Router,
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub fn create_router(state: AppState) -> Router {
    let api_routes = Router::new()
        .route("/orders", post(order::submit_order))
        .route("/orders/:id", delete(order::cancel_order))
        .route("/symbols/:ticker/book", get(market::get_book))
        .route("/symbols/:ticker/trades", get(market::get_trades))
        .route("/me", get(account::me))
        .route("/users", post(account::register))
        .route("/users/:id", delete(account::delete_user))
        .route("/admin/symbols", post(admin::create_symbol))
        .route("/admin/symbols/:id", delete(admin::delete_symbol))
        .route("/admin/symbols/:id/mint", post(admin::mint))
        .route("/admin/symbols/:id/burn", post(admin::burn));

    Router::new()
        .nest("/v1", api_routes)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
