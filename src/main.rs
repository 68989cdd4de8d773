use std::sync::Arc;

use bub_api::auth::JwtVerifier;
use bub_api::state::AppState;
use bub_api::store::memory::MemoryStore;
use bub_api::{app, config};

#[tokio::main]
async fn main() {
    // Load .env if present so cargo run picks up BUB_JWT_SECRET, BUB_API_PORT, etc.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt::init();

    let config = config::config();
    tracing::info!("starting Barely Used Bytes API in {:?} mode", config.environment);

    let state = AppState::new(
        Arc::new(MemoryStore::new()),
        Arc::new(JwtVerifier::new(config.security.jwt_secret.clone())),
    );

    let app = app(state);

    let bind_addr = format!("0.0.0.0:{}", config.server.port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .unwrap_or_else(|e| panic!("failed to bind {}: {}", bind_addr, e));

    println!("🚀 Barely Used Bytes API listening on http://{}", bind_addr);

    axum::serve(listener, app).await.expect("server");
}
