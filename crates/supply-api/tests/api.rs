//! Router-level tests against the seeded demo marketplace

use async_trait::async_trait;
use axum::http::{HeaderName, HeaderValue, StatusCode};
use axum_test::{TestResponse, TestServer};
use serde_json::{json, Value};
use std::sync::{Arc, Mutex};
use supply_api::{create_router, AppConfig, AppState};
use supply_core::{
    BoxedPaymentStrategy, CheckoutSession, CheckoutStatus, HostedCheckout, MarketResult,
    MarketStore, PaymentStrategy, PaymentStrategySelector, WebhookEvent,
};
use supply_stripe::{sign_payload, StripeCheckoutStrategy, StripeConfig};

const WEBHOOK_SECRET: &str = "whsec_test_secret";

/// Hosted checkout stand-in that remembers what it was asked to charge
#[derive(Default)]
struct RecordingStrategy {
    seen: Mutex<Vec<HostedCheckout>>,
}

#[async_trait]
impl PaymentStrategy for RecordingStrategy {
    async fn create_checkout(
        &self,
        checkout: &HostedCheckout,
        _success_url: &str,
        _cancel_url: &str,
    ) -> MarketResult<CheckoutSession> {
        self.seen.lock().unwrap().push(checkout.clone());
        Ok(CheckoutSession {
            session_id: "cs_test_recorded".into(),
            reference: checkout.reference.clone(),
            provider: "recording".into(),
            checkout_url: "https://pay.example/cs_test_recorded".into(),
            status: CheckoutStatus::default(),
            expires_at: None,
            created_at: chrono::Utc::now(),
        })
    }

    async fn verify_webhook(&self, _payload: &[u8], _signature: &str) -> MarketResult<WebhookEvent> {
        unreachable!("webhooks go through the stripe strategy")
    }

    fn provider_name(&self) -> &'static str {
        "recording"
    }
}

fn test_config() -> AppConfig {
    AppConfig::from_lookup(|_| None)
}

fn server_with(strategies: PaymentStrategySelector) -> TestServer {
    let store = MarketStore::with_demo_data().unwrap();
    let state = AppState::with_parts(test_config(), store, strategies);
    TestServer::new(create_router(state)).unwrap()
}

fn server() -> TestServer {
    server_with(PaymentStrategySelector::default())
}

fn stripe_server() -> TestServer {
    let stripe = StripeCheckoutStrategy::new(StripeConfig::new("sk_test_key", WEBHOOK_SECRET)).unwrap();
    server_with(PaymentStrategySelector::default().with_strategy(Arc::new(stripe) as BoxedPaymentStrategy))
}

async fn login(server: &TestServer, email: &str, password: &str) -> Value {
    let response = server
        .post("/api/auth/login")
        .json(&json!({ "email": email, "password": password }))
        .await;
    response.assert_status_ok();
    response.json::<Value>()
}

async fn vendor_id(server: &TestServer) -> String {
    let body = login(server, "vendor@supplylink.com", "vendor123").await;
    body["user"]["id"].as_str().unwrap().to_string()
}

async fn product_id(server: &TestServer, name: &str) -> String {
    let products = server.get("/api/products").await.json::<Value>();
    products
        .as_array()
        .unwrap()
        .iter()
        .find(|p| p["name"] == name)
        .and_then(|p| p["id"].as_str())
        .unwrap()
        .to_string()
}

/// Adds ten Red Onions and returns the cart id
async fn fill_cart(server: &TestServer, vendor_id: &str) -> String {
    let onions = product_id(server, "Red Onions").await;
    let response = server
        .post("/api/carts/add")
        .json(&json!({ "vendorId": vendor_id, "productId": onions, "quantity": 10 }))
        .await;
    response.assert_status_ok();
    response.json::<Value>()["id"].as_str().unwrap().to_string()
}

fn signature_header(value: &str) -> (HeaderName, HeaderValue) {
    (
        HeaderName::from_static("stripe-signature"),
        HeaderValue::from_str(value).unwrap(),
    )
}

async fn supplier_id(server: &TestServer) -> String {
    let body = login(server, "supplier@supplylink.com", "supplier123").await;
    body["supplier"]["id"].as_str().unwrap().to_string()
}

/// Places a cash-on-delivery order for ten Red Onions
async fn cod_order(server: &TestServer, vendor_id: &str) -> String {
    let cart_id = fill_cart(server, vendor_id).await;
    let response = server
        .post("/api/create-checkout-session")
        .json(&json!({
            "cartId": cart_id,
            "deliveryAddress": "Stall 4, Dadar Market",
            "paymentMethod": "cod"
        }))
        .await;
    response.assert_status_ok();
    response.json::<Value>()["orderId"].as_str().unwrap().to_string()
}

async fn set_order_status(server: &TestServer, order_id: &str, status: &str) -> TestResponse {
    server
        .put(&format!("/api/orders/{}", order_id))
        .json(&json!({ "status": status }))
        .await
}

async fn deliver(server: &TestServer, order_id: &str) {
    for status in ["confirmed", "processing", "in_transit", "delivered"] {
        set_order_status(server, order_id, status).await.assert_status_ok();
    }
}

fn completed_session_payload(cart_id: &str) -> String {
    json!({
        "id": "evt_test_1",
        "type": "checkout.session.completed",
        "created": chrono::Utc::now().timestamp(),
        "data": { "object": {
            "id": "cs_test_1",
            "payment_intent": "pi_test_1",
            "amount_total": 41300,
            "currency": "inr",
            "payment_status": "paid",
            "metadata": {
                "cart_id": cart_id,
                "delivery_address": "Stall 4, Dadar Market",
                "notes": "Back gate"
            }
        }}
    })
    .to_string()
}

async fn post_signed_webhook(server: &TestServer, payload: String) -> TestResponse {
    let now = chrono::Utc::now().timestamp();
    let signature = sign_payload(WEBHOOK_SECRET, now, payload.as_bytes()).unwrap();
    let (name, value) = signature_header(&format!("t={},v1={}", now, signature));
    server
        .post("/api/stripe-webhook")
        .add_header(name, value)
        .text(payload)
        .await
}

#[tokio::test]
async fn test_health() {
    let server = server();
    let body = server.get("/health").await.json::<Value>();
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["service"], "supplylink");

    server.get("/").await.assert_status_ok();
}

#[tokio::test]
async fn test_login() {
    let server = server();

    let response = server
        .post("/api/auth/login")
        .json(&json!({ "email": "vendor@supplylink.com", "password": "wrong-password" }))
        .await;
    response.assert_status(StatusCode::UNAUTHORIZED);
    assert_eq!(response.json::<Value>()["code"], 401);

    let body = login(&server, "supplier@supplylink.com", "supplier123").await;
    assert_eq!(body["user"]["role"], "supplier");
    assert!(body["user"].get("password").is_none());
    assert_eq!(body["supplier"]["businessName"], "Fresh Farm Supplies");
}

#[tokio::test]
async fn test_register_rejects_taken_email() {
    let server = server();
    let response = server
        .post("/api/auth/register")
        .json(&json!({
            "username": "another",
            "email": "vendor@supplylink.com",
            "password": "secret123",
            "confirmPassword": "secret123",
            "role": "vendor",
            "firstName": "Ravi",
            "lastName": "Kumar"
        }))
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
    assert_eq!(response.json::<Value>()["error"], "Email already registered");
}

#[tokio::test]
async fn test_add_to_cart_merges_lines() {
    let server = server();
    let vendor = vendor_id(&server).await;
    fill_cart(&server, &vendor).await;
    fill_cart(&server, &vendor).await;

    let carts = server.get(&format!("/api/carts/{}", vendor)).await.json::<Value>();
    let carts = carts.as_array().unwrap();
    assert_eq!(carts.len(), 1);
    assert_eq!(carts[0]["items"].as_array().unwrap().len(), 1);
    assert_eq!(carts[0]["items"][0]["quantity"], 20);
    assert_eq!(carts[0]["totalItems"], 20);
    assert_eq!(carts[0]["totalAmount"]["amount"], 70000);
}

#[tokio::test]
async fn test_add_to_cart_requires_vendor() {
    let server = server();
    let onions = product_id(&server, "Red Onions").await;

    let response = server
        .post("/api/carts/add")
        .json(&json!({ "productId": onions, "quantity": 1 }))
        .await;
    response.assert_status(StatusCode::UNAUTHORIZED);
    assert_eq!(response.json::<Value>()["error"], "User not authenticated");

    let response = server
        .post("/api/carts/add")
        .json(&json!({ "vendorId": "v-1", "productId": onions, "quantity": 0 }))
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_cart_item_updates() {
    let server = server();
    let vendor = vendor_id(&server).await;
    let cart_id = fill_cart(&server, &vendor).await;

    let carts = server.get(&format!("/api/carts/{}", vendor)).await.json::<Value>();
    let item_id = carts[0]["items"][0]["id"].as_str().unwrap().to_string();

    let response = server
        .put(&format!("/api/carts/{}/items/{}", cart_id, item_id))
        .json(&json!({ "quantity": 3 }))
        .await;
    assert_eq!(response.json::<Value>()["success"], true);

    let response = server
        .delete(&format!("/api/carts/{}/items/missing", cart_id))
        .await;
    response.assert_status(StatusCode::NOT_FOUND);

    server
        .delete(&format!("/api/carts/{}", cart_id))
        .await
        .assert_status_ok();
    server
        .delete(&format!("/api/carts/{}", cart_id))
        .await
        .assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_cod_checkout_creates_order() {
    let server = server();
    let vendor = vendor_id(&server).await;
    let cart_id = fill_cart(&server, &vendor).await;

    let response = server
        .post("/api/create-checkout-session")
        .json(&json!({
            "cartId": cart_id,
            "deliveryAddress": "Stall 4, Dadar Market",
            "paymentMethod": "cod"
        }))
        .await;
    response.assert_status_ok();
    let body = response.json::<Value>();
    assert_eq!(body["success"], true);
    let order_id = body["orderId"].as_str().unwrap().to_string();
    assert!(body["url"].as_str().unwrap().contains(&order_id));

    let order = server.get(&format!("/api/orders/{}", order_id)).await.json::<Value>();
    assert_eq!(order["status"], "pending");
    assert_eq!(order["paymentMethod"], "cod");
    assert_eq!(order["totalAmount"]["amount"], 41300);

    let carts = server.get(&format!("/api/carts/{}", vendor)).await.json::<Value>();
    assert!(carts.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_checkout_validation() {
    let server = server();
    let vendor = vendor_id(&server).await;

    server
        .post("/api/create-checkout-session")
        .json(&json!({ "cartId": "missing", "deliveryAddress": "Dadar" }))
        .await
        .assert_status(StatusCode::NOT_FOUND);

    let cart_id = fill_cart(&server, &vendor).await;
    server
        .post("/api/create-checkout-session")
        .json(&json!({ "cartId": cart_id, "deliveryAddress": "  " }))
        .await
        .assert_status(StatusCode::BAD_REQUEST);

    // No payment provider configured
    server
        .post("/api/create-checkout-session")
        .json(&json!({
            "cartId": cart_id,
            "deliveryAddress": "Dadar",
            "paymentMethod": "online"
        }))
        .await
        .assert_status(StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn test_online_checkout_redirects() {
    let recording = Arc::new(RecordingStrategy::default());
    let strategies = PaymentStrategySelector::new("recording")
        .with_strategy(recording.clone() as BoxedPaymentStrategy);
    let server = server_with(strategies);
    let vendor = vendor_id(&server).await;
    let cart_id = fill_cart(&server, &vendor).await;

    let response = server
        .post("/api/create-checkout-session")
        .json(&json!({
            "cartId": cart_id,
            "deliveryAddress": "Stall 4, Dadar Market",
            "paymentMethod": "online"
        }))
        .await;
    response.assert_status_ok();
    let body = response.json::<Value>();
    assert_eq!(body["sessionId"], "cs_test_recorded");
    assert_eq!(body["url"], "https://pay.example/cs_test_recorded");

    let seen = recording.seen.lock().unwrap();
    assert_eq!(seen.len(), 1);
    assert_eq!(seen[0].reference, cart_id);
    drop(seen);

    // The cart stays until the payment is confirmed
    let carts = server.get(&format!("/api/carts/{}", vendor)).await.json::<Value>();
    assert_eq!(carts.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_signed_webhook_creates_paid_order() {
    let server = stripe_server();
    let vendor = vendor_id(&server).await;
    let cart_id = fill_cart(&server, &vendor).await;

    let response = post_signed_webhook(&server, completed_session_payload(&cart_id)).await;
    response.assert_status_ok();
    assert_eq!(response.json::<Value>()["received"], true);

    let orders = server
        .get("/api/orders")
        .add_query_param("vendorId", &vendor)
        .await
        .json::<Value>();
    let orders = orders.as_array().unwrap();
    assert_eq!(orders.len(), 1);
    assert_eq!(orders[0]["status"], "confirmed");
    assert_eq!(orders[0]["paymentStatus"], "paid");
    assert_eq!(orders[0]["notes"], "Back gate");

    let order_id = orders[0]["id"].as_str().unwrap();
    let payments = server
        .get(&format!("/api/orders/{}/payments", order_id))
        .await
        .json::<Value>();
    assert_eq!(payments[0]["status"], "succeeded");
}

#[tokio::test]
async fn test_webhook_rejects_bad_signature() {
    let server = stripe_server();
    let payload = json!({ "id": "evt_1", "type": "charge.refunded", "created": 0, "data": { "object": {} } })
        .to_string();

    server
        .post("/api/stripe-webhook")
        .text(payload.clone())
        .await
        .assert_status(StatusCode::BAD_REQUEST);

    let now = chrono::Utc::now().timestamp();
    let (name, value) = signature_header(&format!("t={},v1={}", now, "00".repeat(32)));
    server
        .post("/api/stripe-webhook")
        .add_header(name, value)
        .text(payload)
        .await
        .assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_supplier_directory() {
    let server = server();

    let nearby = server
        .get("/api/suppliers/nearby")
        .add_query_param("lat", 19.07)
        .add_query_param("lng", 72.88)
        .await
        .json::<Value>();
    assert_eq!(nearby.as_array().unwrap().len(), 1);

    let far = server
        .get("/api/suppliers/nearby")
        .add_query_param("lat", 28.61)
        .add_query_param("lng", 77.20)
        .add_query_param("radius", 5)
        .await
        .json::<Value>();
    assert!(far.as_array().unwrap().is_empty());

    let pending = server.get("/api/suppliers/pending").await.json::<Value>();
    assert!(pending.as_array().unwrap().is_empty());

    server
        .get("/api/suppliers/unknown")
        .await
        .assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_dashboard_and_analytics() {
    let server = server();
    let vendor = vendor_id(&server).await;

    let stats = server
        .get(&format!("/api/dashboard/stats/{}/vendor", vendor))
        .await
        .json::<Value>();
    assert_eq!(stats["totalOrders"], 0);
    assert_eq!(stats["verifiedSuppliers"], 1);

    let stats = server
        .get(&format!("/api/dashboard/stats/{}/guest", vendor))
        .await
        .json::<Value>();
    assert_eq!(stats, json!({}));

    let analytics = server.get("/api/admin/analytics").await.json::<Value>();
    assert_eq!(analytics["totalVendors"], 1);
    assert_eq!(analytics["verifiedSuppliers"], 1);
}

#[tokio::test]
async fn test_delete_product() {
    let server = server();
    let oil = product_id(&server, "Sunflower Oil").await;

    let response = server.delete(&format!("/api/products/{}", oil)).await;
    assert_eq!(response.json::<Value>()["message"], "Product deleted successfully");

    server
        .get(&format!("/api/products/{}", oil))
        .await
        .assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_order_lifecycle_over_http() {
    let server = server();
    let vendor = vendor_id(&server).await;
    let order_id = cod_order(&server, &vendor).await;

    let response = set_order_status(&server, &order_id, "delivered").await;
    response.assert_status(StatusCode::BAD_REQUEST);
    assert_eq!(response.json::<Value>()["code"], 400);

    for status in ["confirmed", "processing", "in_transit"] {
        let order = set_order_status(&server, &order_id, status).await.json::<Value>();
        assert_eq!(order["status"], status);
        assert!(order["actualDelivery"].is_null());
    }

    let order = set_order_status(&server, &order_id, "delivered").await.json::<Value>();
    assert_eq!(order["status"], "delivered");
    assert!(order["actualDelivery"].is_string());

    set_order_status(&server, &order_id, "cancelled")
        .await
        .assert_status(StatusCode::BAD_REQUEST);
    set_order_status(&server, "ORD-MISSING", "confirmed")
        .await
        .assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_admin_supplier_verification() {
    let server = server();
    let response = server
        .post("/api/auth/register")
        .json(&json!({
            "username": "masala",
            "email": "masala@example.com",
            "password": "secret123",
            "confirmPassword": "secret123",
            "role": "supplier",
            "firstName": "Meena",
            "lastName": "Shah"
        }))
        .await;
    response.assert_status_ok();
    let user_id = response.json::<Value>()["user"]["id"].as_str().unwrap().to_string();

    let supplier = server
        .post("/api/suppliers")
        .json(&json!({
            "userId": user_id,
            "businessName": "Masala House",
            "address": "Crawford Market, Mumbai"
        }))
        .await
        .json::<Value>();
    assert_eq!(supplier["verificationStatus"], "pending");
    assert_eq!(supplier["isVerified"], false);
    let supplier_id = supplier["id"].as_str().unwrap().to_string();

    let pending = server.get("/api/suppliers/pending").await.json::<Value>();
    assert_eq!(pending.as_array().unwrap().len(), 1);

    let url = format!("/api/admin/suppliers/{}/verification", supplier_id);
    server
        .put(&url)
        .json(&json!({ "status": "pending" }))
        .await
        .assert_status(StatusCode::BAD_REQUEST);

    let approved = server
        .put(&url)
        .json(&json!({ "status": "approved" }))
        .await
        .json::<Value>();
    assert_eq!(approved["verificationStatus"], "approved");
    assert_eq!(approved["isVerified"], true);

    let pending = server.get("/api/suppliers/pending").await.json::<Value>();
    assert!(pending.as_array().unwrap().is_empty());
    let verified = server
        .get("/api/suppliers")
        .add_query_param("verified", true)
        .await
        .json::<Value>();
    assert_eq!(verified.as_array().unwrap().len(), 2);

    let rejected = server
        .put(&url)
        .json(&json!({ "status": "rejected" }))
        .await
        .json::<Value>();
    assert_eq!(rejected["isVerified"], false);

    server
        .put("/api/admin/suppliers/unknown/verification")
        .json(&json!({ "status": "approved" }))
        .await
        .assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_reviews_require_delivery_and_update_rating() {
    let server = server();
    let vendor = vendor_id(&server).await;
    let supplier = supplier_id(&server).await;
    let order_id = cod_order(&server, &vendor).await;
    let review = json!({
        "orderId": order_id,
        "vendorId": vendor,
        "supplierId": supplier,
        "rating": 5,
        "comment": "Fresh onions, on time"
    });

    server
        .post("/api/reviews")
        .json(&review)
        .await
        .assert_status(StatusCode::BAD_REQUEST);

    deliver(&server, &order_id).await;
    let created = server.post("/api/reviews").json(&review).await;
    created.assert_status_ok();
    assert_eq!(created.json::<Value>()["rating"], 5);

    // One review per order
    server
        .post("/api/reviews")
        .json(&review)
        .await
        .assert_status(StatusCode::BAD_REQUEST);

    let profile = server
        .get(&format!("/api/suppliers/{}", supplier))
        .await
        .json::<Value>();
    assert_eq!(profile["totalRatings"], 151);

    let reviews = server
        .get("/api/reviews")
        .add_query_param("supplierId", &supplier)
        .await
        .json::<Value>();
    assert_eq!(reviews.as_array().unwrap().len(), 1);
    assert_eq!(reviews[0]["comment"], "Fresh onions, on time");

    let none = server
        .get("/api/reviews")
        .add_query_param("vendorId", "someone-else")
        .await
        .json::<Value>();
    assert!(none.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_create_and_update_product() {
    let server = server();
    let supplier = supplier_id(&server).await;
    let categories = server.get("/api/categories").await.json::<Value>();
    let grains = categories
        .as_array()
        .unwrap()
        .iter()
        .find(|c| c["name"] == "Grains")
        .and_then(|c| c["id"].as_str())
        .unwrap()
        .to_string();

    let response = server
        .post("/api/products")
        .json(&json!({
            "supplierId": supplier,
            "categoryId": grains,
            "name": "Basmati Rice",
            "unit": "kg",
            "pricePerUnit": { "amount": 9000, "currency": "inr" },
            "stockQuantity": 40
        }))
        .await;
    response.assert_status_ok();
    let product = response.json::<Value>();
    assert_eq!(product["minOrderQuantity"], 1);
    assert_eq!(product["isActive"], true);
    let rice = product["id"].as_str().unwrap().to_string();

    let listed = server
        .get("/api/products")
        .add_query_param("categoryId", &grains)
        .await
        .json::<Value>();
    assert_eq!(listed.as_array().unwrap().len(), 1);

    let updated = server
        .put(&format!("/api/products/{}", rice))
        .json(&json!({ "pricePerUnit": { "amount": 9500 }, "isActive": false }))
        .await
        .json::<Value>();
    assert_eq!(updated["pricePerUnit"]["amount"], 9500);
    assert_eq!(updated["isActive"], false);
    assert_eq!(updated["name"], "Basmati Rice");

    server
        .put(&format!("/api/products/{}", rice))
        .json(&json!({ "pricePerUnit": { "amount": -1 } }))
        .await
        .assert_status(StatusCode::BAD_REQUEST);
    server
        .put("/api/products/unknown")
        .json(&json!({ "name": "Anything" }))
        .await
        .assert_status(StatusCode::NOT_FOUND);
    server
        .post("/api/products")
        .json(&json!({
            "supplierId": supplier,
            "categoryId": "unknown",
            "name": "Ghee",
            "unit": "kg",
            "pricePerUnit": { "amount": 60000 }
        }))
        .await
        .assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_payment_lookups() {
    let server = stripe_server();
    let vendor = vendor_id(&server).await;

    let cod_id = cod_order(&server, &vendor).await;
    let payments = server
        .get(&format!("/api/orders/{}/payments", cod_id))
        .await
        .json::<Value>();
    assert!(payments.as_array().unwrap().is_empty());

    let cart_id = fill_cart(&server, &vendor).await;
    let payload = completed_session_payload(&cart_id);
    post_signed_webhook(&server, payload.clone()).await.assert_status_ok();
    // Redelivery of the same event records nothing new
    post_signed_webhook(&server, payload).await.assert_status_ok();

    let orders = server
        .get("/api/orders")
        .add_query_param("vendorId", &vendor)
        .add_query_param("status", "confirmed")
        .await
        .json::<Value>();
    let order_id = orders[0]["id"].as_str().unwrap().to_string();

    let payments = server
        .get(&format!("/api/orders/{}/payments", order_id))
        .await
        .json::<Value>();
    assert_eq!(payments.as_array().unwrap().len(), 1);
    let payment_id = payments[0]["id"].as_str().unwrap();

    let payment = server
        .get(&format!("/api/payments/{}", payment_id))
        .await
        .json::<Value>();
    assert_eq!(payment["orderId"], order_id.as_str());
    assert_eq!(payment["providerTransactionId"], "pi_test_1");
    assert_eq!(payment["amount"]["amount"], 41300);

    server
        .get("/api/payments/unknown")
        .await
        .assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_register_cannot_self_verify() {
    let server = server();
    let response = server
        .post("/api/auth/register")
        .json(&json!({
            "username": "sneaky",
            "email": "sneaky@example.com",
            "password": "secret123",
            "confirmPassword": "secret123",
            "role": "vendor",
            "firstName": "Sam",
            "lastName": "Patil",
            "isVerified": true
        }))
        .await;
    response.assert_status_ok();
    assert_eq!(response.json::<Value>()["user"]["isVerified"], false);
}

#[tokio::test]
async fn test_malformed_bodies_get_json_errors() {
    let server = server();

    let response = server
        .post("/api/auth/register")
        .json(&json!({
            "username": "nopass",
            "email": "nopass@example.com",
            "password": "secret123",
            "role": "vendor",
            "firstName": "No",
            "lastName": "Confirm"
        }))
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
    let body = response.json::<Value>();
    assert_eq!(body["code"], 400);
    assert!(body["error"].as_str().unwrap().contains("confirmPassword"));

    let vendor = vendor_id(&server).await;
    let onions = product_id(&server, "Red Onions").await;
    let response = server
        .post("/api/carts/add")
        .json(&json!({ "vendorId": vendor, "productId": onions, "quantity": "two" }))
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
    assert_eq!(response.json::<Value>()["code"], 400);

    let response = server
        .get("/api/suppliers")
        .add_query_param("verified", "maybe")
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
    assert_eq!(response.json::<Value>()["code"], 400);
}

#[tokio::test]
async fn test_oversized_cart_is_rejected_and_store_stays_usable() {
    let server = server();
    let vendor = vendor_id(&server).await;
    let oil = product_id(&server, "Sunflower Oil").await;

    server
        .put(&format!("/api/products/{}", oil))
        .json(&json!({ "pricePerUnit": { "amount": i64::MAX / 40 } }))
        .await
        .assert_status_ok();

    let response = server
        .post("/api/carts/add")
        .json(&json!({ "vendorId": vendor, "productId": oil, "quantity": 41 }))
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
    assert_eq!(
        response.json::<Value>()["error"],
        "Invalid request: Cart quantity or total too large"
    );

    let response = server
        .post("/api/carts/add")
        .json(&json!({ "vendorId": vendor, "productId": oil, "quantity": 1 }))
        .await;
    response.assert_status_ok();
    assert_eq!(response.json::<Value>()["totalItems"], 1);
    server.get("/api/products").await.assert_status_ok();
}

#[tokio::test]
async fn test_webhook_rejects_extreme_timestamp() {
    let server = stripe_server();
    let payload = json!({ "id": "evt_1", "type": "charge.refunded", "created": 0, "data": { "object": {} } })
        .to_string();
    let (name, value) = signature_header(&format!("t={},v1=00", i64::MIN));

    let response = server
        .post("/api/stripe-webhook")
        .add_header(name, value)
        .text(payload)
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
    assert_eq!(response.json::<Value>()["code"], 400);

    server.get("/health").await.assert_status_ok();
}
