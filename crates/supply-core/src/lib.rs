//! # supply-core
//!
//! Core types and the in-memory store for the SupplyLink marketplace,
//! where street-food vendors buy raw materials from verified suppliers.
//!
//! This crate provides:
//! - `MarketStore` holding users, suppliers, catalog, carts, orders,
//!   payments and reviews behind a single lock
//! - `checkout` and `complete_online_checkout` for the cart → order flow
//! - `PaymentStrategy` trait for implementing hosted payment providers
//! - `Price` and GST helpers for money held in the smallest currency unit
//! - `MarketError` for typed error handling
//!
//! ## Example
//!
//! ```rust,ignore
//! use supply_core::{checkout, CheckoutRequest, CheckoutUrls, MarketStore, PaymentMethod};
//!
//! let store = MarketStore::with_demo_data()?;
//!
//! // Vendor fills a cart
//! let cart = store.add_to_cart(&vendor_id, &product_id, 10, None)?;
//!
//! // Place a cash-on-delivery order
//! let request = CheckoutRequest {
//!     cart_id: cart.cart.id.clone(),
//!     delivery_address: "Stall 4, Dadar Market".into(),
//!     notes: None,
//!     payment_method: PaymentMethod::Cod,
//! };
//! let outcome = checkout(&store, None, &request, &CheckoutUrls::default()).await?;
//! ```

pub mod analytics;
pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod error;
pub mod money;
pub mod order;
pub mod payment;
pub mod review;
pub mod seed;
pub mod store;
pub mod strategy;
pub mod supplier;
pub mod user;

// Re-exports for convenience
pub use analytics::{DashboardStats, PlatformAnalytics, SupplierStats, VendorStats};
pub use cart::{Cart, CartItem, CartLine, CartView};
pub use catalog::{Category, NewCategory, NewProduct, Product, ProductFilter, ProductUpdate};
pub use checkout::{checkout, complete_online_checkout, CheckoutOutcome, CheckoutRequest};
pub use error::{MarketError, MarketResult};
pub use money::{gst_of, with_gst, Currency, Price, GST_PERCENT};
pub use order::{
    NewOrder, Order, OrderFilter, OrderLine, OrderPaymentStatus, OrderStatus, OrderUpdate,
    PaymentMethod,
};
pub use payment::{
    CheckoutSession, CheckoutStatus, HostedCheckout, HostedLineItem, PaidCheckout, Payment,
    PaymentDraft, PaymentStatus, PaymentUpdate, WebhookEvent, WebhookEventType,
};
pub use review::{NewReview, Review, ReviewFilter};
pub use seed::SeedData;
pub use store::MarketStore;
pub use strategy::{
    BoxedPaymentStrategy, CheckoutUrls, PaymentStrategy, PaymentStrategySelector,
};
pub use supplier::{
    NewSupplier, Supplier, SupplierFilter, SupplierUpdate, VerificationStatus,
};
pub use user::{LoginRequest, NewUser, RegisterRequest, Role, User};
