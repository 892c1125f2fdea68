//! # Routes
//!
//! Axum router configuration for the marketplace API.

use crate::handlers::{
    self, admin, auth, carts, catalog, dashboard, orders, payments, reviews, suppliers, users,
};
use crate::state::AppState;
use axum::{
    routing::{get, post, put},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

/// Create the main application router
///
/// Static segments (`/suppliers/nearby`, `/carts/add`) win over the
/// `{id}` captures beside them. `/carts/{id}` is a vendor id for GET and a
/// cart id for DELETE.
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let auth_routes = Router::new()
        .route("/login", post(auth::login))
        .route("/register", post(auth::register));

    let supplier_routes = Router::new()
        .route(
            "/",
            get(suppliers::list_suppliers).post(suppliers::create_supplier),
        )
        .route("/nearby", get(suppliers::nearby_suppliers))
        .route("/pending", get(suppliers::pending_suppliers))
        .route(
            "/{id}",
            get(suppliers::get_supplier).put(suppliers::update_supplier),
        );

    let product_routes = Router::new()
        .route(
            "/",
            get(catalog::list_products).post(catalog::create_product),
        )
        .route(
            "/{id}",
            get(catalog::get_product)
                .put(catalog::update_product)
                .delete(catalog::delete_product),
        );

    let order_routes = Router::new()
        .route("/", get(orders::list_orders).post(orders::create_order))
        .route("/{id}", get(orders::get_order).put(orders::update_order))
        .route("/{id}/payments", get(orders::order_payments));

    let cart_routes = Router::new()
        .route("/add", post(carts::add_to_cart))
        .route("/{id}", get(carts::vendor_carts).delete(carts::clear_cart))
        .route(
            "/{id}/items/{item_id}",
            put(carts::update_cart_item).delete(carts::remove_cart_item),
        );

    let admin_routes = Router::new()
        .route("/analytics", get(admin::platform_analytics))
        .route("/suppliers/{id}/verification", put(admin::set_verification));

    let api_routes = Router::new()
        .nest("/auth", auth_routes)
        .route("/users/{id}", get(users::get_user))
        .nest("/suppliers", supplier_routes)
        .route(
            "/categories",
            get(catalog::list_categories).post(catalog::create_category),
        )
        .nest("/products", product_routes)
        .nest("/orders", order_routes)
        .route("/payments/{id}", get(payments::get_payment))
        .route(
            "/reviews",
            get(reviews::list_reviews).post(reviews::create_review),
        )
        .route(
            "/dashboard/stats/{user_id}/{role}",
            get(dashboard::dashboard_stats),
        )
        .nest("/admin", admin_routes)
        .nest("/carts", cart_routes)
        .route(
            "/create-checkout-session",
            post(payments::create_checkout_session),
        )
        // Raw body, signature checked in the handler
        .route("/stripe-webhook", post(payments::stripe_webhook));

    Router::new()
        .route("/health", get(handlers::health))
        .route("/", get(handlers::health))
        .nest("/api", api_routes)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
