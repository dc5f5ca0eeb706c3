mod auth;
mod error;
mod handlers;
mod models;
mod router;
mod state;

use engine::Exchange;
use router::create_router;
use state::AppState;
use std::net::SocketAddr;
use tokio::net::TcpListener;
use types::user::Role;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    tracing::info!("Starting exchange gateway");

    let exchange = Exchange::new();

    // Seed the first manager so symbols can be created; the operator hands
    // this id out of band. Account provisioning proper is not the gateway's
    // job.
    let manager = exchange.register_user("admin", Role::Manager)?;
    tracing::info!(manager_id = %manager.user_id, "seeded initial manager");

    let state = AppState::new(exchange);
    let app = create_router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], 8080));
    let listener = TcpListener::bind(addr).await?;

    tracing::info!("Listening on {}", addr);
    axum::serve(listener, app).await?;

    Ok(())
}
