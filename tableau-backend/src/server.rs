use crate::api::api_router;
use crate::state::AppState;
/// HTTP server: binds the listener and serves axum until shutdown.
use axum::Router;
use tower_http::cors::{Any, CorsLayer};

pub fn build_app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    api_router().layer(cors).with_state(state)
}

pub async fn run_server(state: AppState, bind_addr: &str) -> Result<(), Box<dyn std::error::Error>> {
    let port = state.port;
    let app = build_app(state);

    let listener = tokio::net::TcpListener::bind(format!("{}:{}", bind_addr, port)).await?;
    let actual_port = listener.local_addr()?.port();

    log::info!(
        target: "tableau.server",
        "HTTP server listening on http://{}:{}",
        bind_addr,
        actual_port
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    log::info!(target: "tableau.server", "HTTP server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        log::error!(target: "tableau.server", "Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
}
