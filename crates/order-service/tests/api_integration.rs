//! Integration tests for the order service router.

use std::sync::{Arc, OnceLock};

use auth::TokenSigner;
use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use client::InMemoryCartClient;
use common::{CartLine, CartSnapshot, ProductId, UserId};
use metrics_exporter_prometheus::PrometheusHandle;
use order_service::AppState;
use order_service::store::InMemoryOrderStore;
use rust_decimal::Decimal;
use tower::ServiceExt;

const SECRET: &str = "integration-secret";

static METRICS_HANDLE: OnceLock<PrometheusHandle> = OnceLock::new();

fn get_metrics_handle() -> PrometheusHandle {
    METRICS_HANDLE
        .get_or_init(|| {
            metrics_exporter_prometheus::PrometheusBuilder::new()
                .install_recorder()
                .expect("failed to install Prometheus recorder")
        })
        .clone()
}

struct TestApp {
    app: Router,
    cart: InMemoryCartClient,
    store: InMemoryOrderStore,
    signer: TokenSigner,
}

impl TestApp {
    fn token(&self, user_id: i64) -> String {
        self.signer
            .issue(UserId::new(user_id), "shopper@example.com")
            .unwrap()
    }

    /// Puts `quantity` units of a 250.00 product in the cart double.
    fn seed_cart(&self, quantity: i32) {
        let unit_price = Decimal::new(25000, 2);
        let line_total = unit_price * Decimal::from(quantity);
        self.cart.set_snapshot(CartSnapshot {
            items: vec![CartLine {
                id: 1,
                product_id: ProductId::new(7),
                name: "Wireless Mouse".to_string(),
                quantity,
                unit_price,
                line_total,
            }],
            total: line_total,
            item_count: 1,
        });
    }
}

fn setup() -> TestApp {
    let store = InMemoryOrderStore::new();
    let cart = InMemoryCartClient::new();
    let state = Arc::new(AppState::new(store.clone(), Arc::new(cart.clone()), SECRET));
    let app = order_service::create_app(state, get_metrics_handle());
    TestApp {
        app,
        cart,
        store,
        signer: TokenSigner::new(SECRET),
    }
}

fn address_body() -> serde_json::Value {
    serde_json::json!({
        "shipping_address": {
            "full_name": "Priya Sharma",
            "address": "221B MG Road",
            "city": "Bengaluru",
            "state": "Karnataka",
            "pincode": "560001",
            "phone": "+91-9876543210"
        }
    })
}

fn authed(method: &str, uri: &str, token: &str, body: Option<serde_json::Value>) -> Request<Body> {
    let builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::AUTHORIZATION, format!("Bearer {token}"));
    match body {
        Some(json) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

fn unauthed_json(method: &str, uri: &str, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, serde_json::Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = if body.is_empty() {
        serde_json::Value::Null
    } else {
        serde_json::from_slice(&body).unwrap()
    };
    (status, json)
}

async fn create_order(ctx: &TestApp, token: &str) -> serde_json::Value {
    let (status, json) = send(
        &ctx.app,
        authed("POST", "/orders", token, Some(address_body())),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    json
}

#[tokio::test]
async fn test_checkout_freezes_priced_order() {
    let ctx = setup();
    ctx.seed_cart(2);
    let token = ctx.token(1);

    let json = create_order(&ctx, &token).await;

    assert!(json["order_id"].as_str().unwrap().starts_with("ORD-"));
    assert_eq!(json["subtotal"], 500.0);
    assert_eq!(json["shipping_cost"], 0.0);
    assert_eq!(json["tax"], 90.0);
    assert_eq!(json["total"], 590.0);
    assert_eq!(json["payment_status"], "pending");
    assert_eq!(json["order_status"], "pending");
    assert_eq!(json["payment_id"], serde_json::Value::Null);

    let line = &json["items"][0];
    assert_eq!(line["product_id"], 7);
    assert_eq!(line["name"], "Wireless Mouse");
    assert_eq!(line["quantity"], 2);
    assert_eq!(line["unit_price"], 250.0);

    assert_eq!(json["shipping_address"]["pincode"], "560001");

    // The cart was priced with the caller's own credential.
    assert_eq!(ctx.cart.last_bearer().as_deref(), Some(token.as_str()));
}

#[tokio::test]
async fn test_checkout_below_threshold_pays_shipping() {
    let ctx = setup();
    ctx.seed_cart(1);
    let token = ctx.token(1);

    let json = create_order(&ctx, &token).await;

    assert_eq!(json["subtotal"], 250.0);
    assert_eq!(json["shipping_cost"], 40.0);
    assert_eq!(json["tax"], 45.0);
    assert_eq!(json["total"], 335.0);
}

#[tokio::test]
async fn test_checkout_empty_cart_writes_nothing() {
    let ctx = setup();
    let token = ctx.token(1);

    let (status, json) = send(
        &ctx.app,
        authed("POST", "/orders", &token, Some(address_body())),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"], "Cart is empty");
    assert_eq!(ctx.store.row_count().await, 0);
}

#[tokio::test]
async fn test_checkout_with_cart_down_writes_nothing() {
    let ctx = setup();
    ctx.cart.set_fail_on_fetch(true);
    let token = ctx.token(1);

    let (status, json) = send(
        &ctx.app,
        authed("POST", "/orders", &token, Some(address_body())),
    )
    .await;

    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(json["error"], "Cart service unavailable");
    assert_eq!(ctx.store.row_count().await, 0);
}

#[tokio::test]
async fn test_list_returns_newest_first() {
    let ctx = setup();
    ctx.seed_cart(2);
    let token = ctx.token(1);

    let first = create_order(&ctx, &token).await;
    let second = create_order(&ctx, &token).await;

    let (status, json) = send(&ctx.app, authed("GET", "/orders", &token, None)).await;
    assert_eq!(status, StatusCode::OK);

    let orders = json.as_array().unwrap();
    assert_eq!(orders.len(), 2);
    assert_eq!(orders[0]["order_id"], second["order_id"]);
    assert_eq!(orders[1]["order_id"], first["order_id"]);
}

#[tokio::test]
async fn test_get_order_is_scoped_to_owner() {
    let ctx = setup();
    ctx.seed_cart(2);
    let alice = ctx.token(1);
    let bob = ctx.token(2);

    let created = create_order(&ctx, &alice).await;
    let order_id = created["order_id"].as_str().unwrap();

    let (status, json) = send(
        &ctx.app,
        authed("GET", &format!("/orders/{order_id}"), &alice, None),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["order_id"], created["order_id"]);
    assert_eq!(json["total"], 590.0);

    let (status, json) = send(
        &ctx.app,
        authed("GET", &format!("/orders/{order_id}"), &bob, None),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["error"], "Order not found");
}

#[tokio::test]
async fn test_payment_push_promotes_to_confirmed() {
    let ctx = setup();
    ctx.seed_cart(2);
    let token = ctx.token(1);

    let created = create_order(&ctx, &token).await;
    let order_id = created["order_id"].as_str().unwrap();

    // The push carries no bearer token.
    let (status, json) = send(
        &ctx.app,
        unauthed_json(
            "PUT",
            &format!("/orders/{order_id}/payment"),
            serde_json::json!({"payment_id": "PAY-20260825-TEST01", "status": "completed"}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["message"], "Payment status updated");

    let (_, json) = send(
        &ctx.app,
        authed("GET", &format!("/orders/{order_id}"), &token, None),
    )
    .await;
    assert_eq!(json["payment_status"], "completed");
    assert_eq!(json["order_status"], "confirmed");
    assert_eq!(json["payment_id"], "PAY-20260825-TEST01");
}

#[tokio::test]
async fn test_failed_payment_push_leaves_order_pending() {
    let ctx = setup();
    ctx.seed_cart(2);
    let token = ctx.token(1);

    let created = create_order(&ctx, &token).await;
    let order_id = created["order_id"].as_str().unwrap();

    let (status, _) = send(
        &ctx.app,
        unauthed_json(
            "PUT",
            &format!("/orders/{order_id}/payment"),
            serde_json::json!({"payment_id": "PAY-20260825-TEST02", "status": "failed"}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (_, json) = send(
        &ctx.app,
        authed("GET", &format!("/orders/{order_id}"), &token, None),
    )
    .await;
    assert_eq!(json["payment_status"], "failed");
    assert_eq!(json["order_status"], "pending");
    assert_eq!(json["payment_id"], "PAY-20260825-TEST02");
}

#[tokio::test]
async fn test_payment_push_for_unknown_order() {
    let ctx = setup();

    let (status, json) = send(
        &ctx.app,
        unauthed_json(
            "PUT",
            "/orders/ORD-00000000-MISSING/payment",
            serde_json::json!({"payment_id": "PAY-X", "status": "completed"}),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["error"], "Order not found");
}

#[tokio::test]
async fn test_update_status_accepts_any_known_value() {
    let ctx = setup();
    ctx.seed_cart(2);
    let token = ctx.token(1);

    let created = create_order(&ctx, &token).await;
    let order_id = created["order_id"].as_str().unwrap();

    // No transition graph: delivered and then back to pending both land.
    for status_value in ["delivered", "pending"] {
        let (status, json) = send(
            &ctx.app,
            authed(
                "PUT",
                &format!("/orders/{order_id}/status"),
                &token,
                Some(serde_json::json!({"status": status_value})),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["message"], "Order status updated");
    }

    let (_, json) = send(
        &ctx.app,
        authed("GET", &format!("/orders/{order_id}"), &token, None),
    )
    .await;
    assert_eq!(json["order_status"], "pending");
}

#[tokio::test]
async fn test_update_status_rejects_unknown_value() {
    let ctx = setup();
    ctx.seed_cart(2);
    let token = ctx.token(1);

    let created = create_order(&ctx, &token).await;
    let order_id = created["order_id"].as_str().unwrap();

    let (status, json) = send(
        &ctx.app,
        authed(
            "PUT",
            &format!("/orders/{order_id}/status"),
            &token,
            Some(serde_json::json!({"status": "teleported"})),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"], "Invalid status");

    let (_, json) = send(
        &ctx.app,
        authed("GET", &format!("/orders/{order_id}"), &token, None),
    )
    .await;
    assert_eq!(json["order_status"], "pending");
}

#[tokio::test]
async fn test_update_status_is_scoped_to_owner() {
    let ctx = setup();
    ctx.seed_cart(2);
    let alice = ctx.token(1);
    let bob = ctx.token(2);

    let created = create_order(&ctx, &alice).await;
    let order_id = created["order_id"].as_str().unwrap();

    let (status, json) = send(
        &ctx.app,
        authed(
            "PUT",
            &format!("/orders/{order_id}/status"),
            &bob,
            Some(serde_json::json!({"status": "cancelled"})),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["error"], "Order not found");

    let (_, json) = send(
        &ctx.app,
        authed("GET", &format!("/orders/{order_id}"), &alice, None),
    )
    .await;
    assert_eq!(json["order_status"], "pending");
}

#[tokio::test]
async fn test_requests_without_token_are_rejected() {
    let ctx = setup();

    let response = ctx
        .app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/orders")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_health_check() {
    let ctx = setup();

    let response = ctx
        .app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(json["status"], "healthy");
    assert_eq!(json["service"], "order-service");
}
