#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tower::ServiceExt;

use bub_api::auth::{self, JwtVerifier};
use bub_api::state::AppState;
use bub_api::store::memory::MemoryStore;
use bub_api::{app, store::DocumentStore};

pub const JWT_SECRET: &str = "integration-test-secret";

/// In-process test harness: the router plus a handle on the raw store so
/// tests can assert on stored documents directly.
pub struct TestApi {
    pub router: Router,
    pub store: Arc<MemoryStore>,
}

pub fn test_api() -> TestApi {
    let store = Arc::new(MemoryStore::new());
    let verifier = Arc::new(JwtVerifier::new(JWT_SECRET.to_string()));
    let state = AppState::new(store.clone(), verifier);
    TestApi { router: app(state), store }
}

impl TestApi {
    pub async fn stored(&self, collection: &str, id: &str) -> Option<bub_api::store::Document> {
        self.store.get(collection, id).await.expect("store get")
    }
}

pub fn token_for(uid: &str) -> String {
    auth::issue_token(uid, JWT_SECRET, 1).expect("token")
}

pub async fn send(
    router: &Router,
    method: &str,
    path: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(path);
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {}", token));
    }
    let request = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .expect("request"),
        None => builder.body(Body::empty()).expect("request"),
    };

    let response = router.clone().oneshot(request).await.expect("response");
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.expect("body");
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).expect("json body")
    };
    (status, value)
}

pub fn product_payload(seller_id: &str) -> Value {
    json!({
        "name": "RTX 3080 GPU",
        "category": "Graphics Cards",
        "subcategory": "NVIDIA",
        "description": "Lightly used graphics card, never overclocked.",
        "price": 450.0,
        "condition": "Good",
        "images": ["https://img.example/gpu-front.jpg"],
        "sellerId": seller_id,
        "sellerName": "Hana Rahman",
        "location": { "city": "Dhaka", "country": "Bangladesh" }
    })
}

pub fn user_payload() -> Value {
    json!({
        "email": "hana@example.com",
        "displayName": "Hana Rahman"
    })
}

pub fn order_payload(buyer_id: &str, seller_id: &str) -> Value {
    json!({
        "productId": "prod-12345",
        "buyerId": buyer_id,
        "sellerId": seller_id,
        "productName": "RTX 3080 GPU",
        "productPrice": 450.0,
        "totalAmount": 450.0,
        "paymentMethod": "bkash",
        "shippingAddress": {
            "street": "12 Lake Road",
            "city": "Dhaka",
            "zipCode": "1207",
            "country": "Bangladesh"
        }
    })
}

pub fn review_payload(reviewer_id: &str) -> Value {
    json!({
        "productId": "prod-12345",
        "sellerId": "seller-1001",
        "reviewerId": reviewer_id,
        "orderId": "order-12345",
        "rating": 5,
        "comment": "Exactly as described, fast shipping.",
        "productName": "RTX 3080 GPU",
        "sellerName": "Hana Rahman",
        "reviewerName": "Rafi Ahmed"
    })
}
