use axum::{Router, middleware::from_fn_with_state, routing::get};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use oauth2_gate_axum::{GateState, login_required, oauth2_gate_router};

mod handlers;

use crate::handlers::{index, restricted};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                format!("{}=debug,oauth2_gate=debug", env!("CARGO_CRATE_NAME")).into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let state = GateState::from_env().await?;

    let app = Router::new()
        .route("/", get(index))
        .route("/restricted", get(restricted))
        .route_layer(from_fn_with_state(state.clone(), login_required))
        .with_state(state.clone())
        .merge(oauth2_gate_router(state));

    let port: u16 = std::env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(3001);
    let listener = tokio::net::TcpListener::bind(("0.0.0.0", port)).await?;
    tracing::info!("HTTP server listening on {}", listener.local_addr()?);
    axum::serve(listener, app).await?;
    Ok(())
}
