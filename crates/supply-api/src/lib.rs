//! # supply-api
//!
//! HTTP API layer for the SupplyLink marketplace.
//!
//! This crate provides:
//! - Axum-based HTTP server over the in-memory `MarketStore`
//! - REST endpoints for users, suppliers, catalog, carts, orders and reviews
//! - Checkout and the Stripe webhook that fulfils online orders
//!
//! ## Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | GET | `/health` | Health check |
//! | POST | `/api/auth/login` | Log in |
//! | POST | `/api/auth/register` | Register |
//! | GET | `/api/users/{id}` | Get user |
//! | GET/POST | `/api/suppliers` | List / create suppliers |
//! | GET | `/api/suppliers/nearby` | Verified suppliers near a point |
//! | GET | `/api/suppliers/pending` | Suppliers awaiting verification |
//! | GET/PUT | `/api/suppliers/{id}` | Get / update supplier |
//! | GET/POST | `/api/categories` | Categories |
//! | GET/POST | `/api/products` | List / create products |
//! | GET/PUT/DELETE | `/api/products/{id}` | Product |
//! | GET/POST | `/api/orders` | List / create orders |
//! | GET/PUT | `/api/orders/{id}` | Order |
//! | GET | `/api/orders/{id}/payments` | Payments of an order |
//! | GET | `/api/payments/{id}` | Payment |
//! | GET/POST | `/api/reviews` | Reviews |
//! | GET | `/api/dashboard/stats/{userId}/{role}` | Dashboard counters |
//! | GET | `/api/admin/analytics` | Platform analytics |
//! | PUT | `/api/admin/suppliers/{id}/verification` | Approve / reject supplier |
//! | GET | `/api/carts/{vendorId}` | Vendor carts |
//! | POST | `/api/carts/add` | Add to cart |
//! | PUT/DELETE | `/api/carts/{cartId}/items/{itemId}` | Cart line |
//! | DELETE | `/api/carts/{cartId}` | Clear cart |
//! | POST | `/api/create-checkout-session` | Checkout |
//! | POST | `/api/stripe-webhook` | Stripe webhook |

pub mod fulfillment;
pub mod handlers;
pub mod routes;
pub mod state;

pub use routes::create_router;
pub use state::{AppConfig, AppState};
