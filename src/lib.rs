use axum::extract::State;
use axum::http::StatusCode;
use axum::response::Json;
use axum::routing::get;
use axum::Router;
use serde_json::{json, Value};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub mod api;
pub mod auth;
pub mod config;
pub mod error;
pub mod handlers;
pub mod models;
pub mod policy;
pub mod state;
pub mod store;

use state::AppState;

/// Build the application router with all resource routes and middleware.
pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        .merge(product_routes())
        .merge(user_routes())
        .merge(order_routes())
        .merge(review_routes())
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn product_routes() -> Router<AppState> {
    use handlers::products;

    Router::new()
        .route("/products", get(products::list).post(products::create))
        .route(
            "/products/:product_id",
            get(products::get).put(products::update).delete(products::delete),
        )
}

fn user_routes() -> Router<AppState> {
    use handlers::users;

    Router::new()
        .route("/users", get(users::list).post(users::create))
        .route(
            "/users/:user_id",
            get(users::get).put(users::update).delete(users::delete),
        )
}

fn order_routes() -> Router<AppState> {
    use handlers::orders;

    Router::new()
        .route("/orders", get(orders::list).post(orders::create))
        .route(
            "/orders/:order_id",
            get(orders::get).put(orders::update).delete(orders::delete),
        )
}

fn review_routes() -> Router<AppState> {
    use handlers::reviews;

    Router::new()
        .route("/reviews", get(reviews::list).post(reviews::create))
        .route(
            "/reviews/:review_id",
            get(reviews::get).put(reviews::update).delete(reviews::delete),
        )
}

/// GET / - welcome message reflecting store connectivity.
async fn root(State(state): State<AppState>) -> Json<Value> {
    match state.store.ping().await {
        Ok(()) => Json(json!({ "message": "Welcome to Barely Used Bytes API!" })),
        Err(_) => Json(json!({ "message": "Database not found :(" })),
    }
}

/// GET /health - liveness plus store status.
async fn health(State(state): State<AppState>) -> (StatusCode, Json<Value>) {
    let now = chrono::Utc::now();

    match state.store.ping().await {
        Ok(()) => (
            StatusCode::OK,
            Json(json!({
                "status": "ok",
                "timestamp": now,
                "store": "ok"
            })),
        ),
        Err(e) => (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({
                "status": "degraded",
                "timestamp": now,
                "store_error": e.to_string()
            })),
        ),
    }
}
