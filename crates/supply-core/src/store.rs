//! # Market Store
//!
//! In-memory tables keyed by generated identifiers. Every operation takes
//! the single store lock once, so multi-entity changes (cart find-or-create
//! and merge, order creation plus cart clearing) are atomic with respect
//! to concurrent requests. State is volatile.

use crate::cart::{cart_too_large, checked_totals, Cart, CartItem, CartLine, CartView};
use crate::catalog::{Category, NewCategory, NewProduct, Product, ProductFilter, ProductUpdate};
use crate::error::{MarketError, MarketResult};
use crate::money::{with_gst, Price};
use crate::order::{NewOrder, Order, OrderFilter, OrderStatus, OrderUpdate};
use crate::payment::{Payment, PaymentDraft, PaymentUpdate};
use crate::review::{NewReview, Review, ReviewFilter};
use crate::supplier::{
    NewSupplier, Supplier, SupplierFilter, SupplierUpdate, VerificationStatus, NEARBY_LIMIT,
};
use crate::user::{LoginRequest, NewUser, RegisterRequest, User};
use chrono::Utc;
use std::collections::HashMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use tracing::{debug, info};
use uuid::Uuid;

fn new_id() -> String {
    Uuid::new_v4().to_string()
}

/// Raw tables
#[derive(Debug, Default)]
pub(crate) struct Tables {
    pub(crate) users: HashMap<String, User>,
    pub(crate) suppliers: HashMap<String, Supplier>,
    pub(crate) categories: HashMap<String, Category>,
    pub(crate) products: HashMap<String, Product>,
    pub(crate) orders: HashMap<String, Order>,
    pub(crate) reviews: HashMap<String, Review>,
    pub(crate) carts: HashMap<String, Cart>,
    pub(crate) cart_items: HashMap<String, CartItem>,
    pub(crate) payments: HashMap<String, Payment>,
}

impl Tables {
    fn cart_view(&self, cart: &Cart) -> MarketResult<CartView> {
        let supplier_name = self
            .suppliers
            .get(&cart.supplier_id)
            .map(|s| s.business_name.clone())
            .unwrap_or_else(|| "Unknown Supplier".to_string());

        let mut items: Vec<&CartItem> = self
            .cart_items
            .values()
            .filter(|item| item.cart_id == cart.id)
            .collect();
        items.sort_by_key(|item| item.created_at);

        let lines = items
            .into_iter()
            .map(|item| {
                let product = self.products.get(&item.product_id);
                CartLine {
                    item: item.clone(),
                    product_name: product
                        .map(|p| p.name.clone())
                        .unwrap_or_else(|| "Unknown Product".to_string()),
                    unit: product
                        .map(|p| p.unit.clone())
                        .unwrap_or_else(|| "unit".to_string()),
                    supplier_name: supplier_name.clone(),
                    image_url: product.and_then(|p| p.image_url.clone()),
                    stock_quantity: product.map(|p| p.stock_quantity),
                    min_order_quantity: product.map(|p| p.min_order_quantity),
                }
            })
            .collect();

        CartView::new(cart.clone(), lines)
    }

    /// Check that the cart, with line `item_id` (or a new line when `None`)
    /// set to `unit x quantity`, still has a representable total with GST.
    fn check_cart_total(
        &self,
        cart_id: Option<&str>,
        item_id: Option<&str>,
        unit: Price,
        quantity: u32,
    ) -> MarketResult<()> {
        let others = self.cart_items.values().filter(|item| {
            Some(item.cart_id.as_str()) == cart_id && Some(item.id.as_str()) != item_id
        });
        let lines = others
            .map(|item| (item.price_per_unit, item.quantity))
            .chain(std::iter::once((unit, quantity)));
        checked_totals(lines)
            .and_then(|(total, _)| with_gst(total))
            .map(|_| ())
            .ok_or_else(cart_too_large)
    }

    fn touch_cart(&mut self, cart_id: &str) {
        if let Some(cart) = self.carts.get_mut(cart_id) {
            cart.updated_at = Utc::now();
        }
    }

    fn remove_cart(&mut self, cart_id: &str) -> bool {
        if self.carts.remove(cart_id).is_none() {
            return false;
        }
        self.cart_items.retain(|_, item| item.cart_id != cart_id);
        true
    }
}

/// The marketplace store
#[derive(Debug, Default)]
pub struct MarketStore {
    tables: RwLock<Tables>,
}

impl MarketStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn read(&self) -> MarketResult<RwLockReadGuard<'_, Tables>> {
        self.tables
            .read()
            .map_err(|_| MarketError::Internal("store lock poisoned".to_string()))
    }

    pub(crate) fn write(&self) -> MarketResult<RwLockWriteGuard<'_, Tables>> {
        self.tables
            .write()
            .map_err(|_| MarketError::Internal("store lock poisoned".to_string()))
    }

    // =========================================================================
    // Users & auth
    // =========================================================================

    pub fn get_user(&self, id: &str) -> MarketResult<User> {
        self.read()?
            .users
            .get(id)
            .cloned()
            .ok_or_else(|| MarketError::not_found("User", id))
    }

    /// Insert a user; emails are unique (case-insensitive)
    pub fn create_user(&self, new_user: NewUser) -> MarketResult<User> {
        let mut tables = self.write()?;
        if tables
            .users
            .values()
            .any(|u| u.email.eq_ignore_ascii_case(&new_user.email))
        {
            return Err(MarketError::EmailTaken);
        }

        let user = User {
            id: new_id(),
            username: new_user.username,
            email: new_user.email,
            password: new_user.password,
            role: new_user.role,
            first_name: new_user.first_name,
            last_name: new_user.last_name,
            phone: new_user.phone.filter(|p| !p.trim().is_empty()),
            is_verified: new_user.is_verified,
            created_at: Utc::now(),
        };
        tables.users.insert(user.id.clone(), user.clone());
        info!(user_id = %user.id, role = user.role.as_str(), "user created");
        Ok(user)
    }

    pub fn register(&self, request: RegisterRequest) -> MarketResult<User> {
        request.validate()?;
        // self-registered accounts start unverified
        self.create_user(NewUser {
            is_verified: false,
            ..request.user
        })
    }

    /// Check credentials; supplier accounts also get their profile
    pub fn login(&self, request: &LoginRequest) -> MarketResult<(User, Option<Supplier>)> {
        request.validate()?;
        let tables = self.read()?;
        let user = tables
            .users
            .values()
            .find(|u| u.email.eq_ignore_ascii_case(&request.email))
            .filter(|u| u.password_matches(&request.password))
            .cloned()
            .ok_or_else(|| MarketError::Unauthorized("Invalid credentials".to_string()))?;

        let supplier = tables
            .suppliers
            .values()
            .find(|s| s.user_id == user.id)
            .cloned();
        Ok((user, supplier))
    }

    // =========================================================================
    // Suppliers
    // =========================================================================

    pub fn get_supplier(&self, id: &str) -> MarketResult<Supplier> {
        self.read()?
            .suppliers
            .get(id)
            .cloned()
            .ok_or_else(|| MarketError::not_found("Supplier", id))
    }

    pub fn supplier_by_user(&self, user_id: &str) -> MarketResult<Option<Supplier>> {
        Ok(self
            .read()?
            .suppliers
            .values()
            .find(|s| s.user_id == user_id)
            .cloned())
    }

    pub fn create_supplier(&self, new_supplier: NewSupplier) -> MarketResult<Supplier> {
        if new_supplier.business_name.trim().is_empty() {
            return Err(MarketError::InvalidRequest("Business name is required".into()));
        }
        if new_supplier.address.trim().is_empty() {
            return Err(MarketError::InvalidRequest("Address is required".into()));
        }

        let mut tables = self.write()?;
        if !tables.users.contains_key(&new_supplier.user_id) {
            return Err(MarketError::not_found("User", new_supplier.user_id));
        }

        let supplier = Supplier {
            id: new_id(),
            user_id: new_supplier.user_id,
            business_name: new_supplier.business_name,
            description: new_supplier.description,
            address: new_supplier.address,
            latitude: new_supplier.latitude,
            longitude: new_supplier.longitude,
            rating: 0.0,
            total_ratings: 0,
            is_verified: false,
            verification_status: VerificationStatus::Pending,
            created_at: Utc::now(),
        };
        tables.suppliers.insert(supplier.id.clone(), supplier.clone());
        info!(supplier_id = %supplier.id, "supplier created, awaiting verification");
        Ok(supplier)
    }

    pub fn update_supplier(&self, id: &str, update: SupplierUpdate) -> MarketResult<Supplier> {
        let mut tables = self.write()?;
        let supplier = tables
            .suppliers
            .get_mut(id)
            .ok_or_else(|| MarketError::not_found("Supplier", id))?;
        update.apply(supplier);
        Ok(supplier.clone())
    }

    /// Admin approve/reject decision
    pub fn set_verification(&self, id: &str, status: VerificationStatus) -> MarketResult<Supplier> {
        if status == VerificationStatus::Pending {
            return Err(MarketError::InvalidRequest(
                "Verification decision must be approved or rejected".into(),
            ));
        }
        let mut tables = self.write()?;
        let supplier = tables
            .suppliers
            .get_mut(id)
            .ok_or_else(|| MarketError::not_found("Supplier", id))?;
        supplier.apply_verification(status);
        info!(supplier_id = %id, status = ?status, "supplier verification updated");
        Ok(supplier.clone())
    }

    pub fn list_suppliers(&self, filter: &SupplierFilter) -> MarketResult<Vec<Supplier>> {
        let tables = self.read()?;
        let mut suppliers: Vec<Supplier> = tables
            .suppliers
            .values()
            .filter(|s| filter.verified.map_or(true, |v| s.is_verified == v))
            .cloned()
            .collect();
        suppliers.sort_by(|a, b| {
            a.created_at
                .cmp(&b.created_at)
                .then_with(|| a.business_name.cmp(&b.business_name))
        });
        if let Some(limit) = filter.limit {
            suppliers.truncate(limit);
        }
        Ok(suppliers)
    }

    /// Suppliers awaiting an admin decision
    pub fn pending_suppliers(&self) -> MarketResult<Vec<Supplier>> {
        let tables = self.read()?;
        let mut suppliers: Vec<Supplier> = tables
            .suppliers
            .values()
            .filter(|s| s.verification_status == VerificationStatus::Pending)
            .cloned()
            .collect();
        suppliers.sort_by_key(|s| s.created_at);
        Ok(suppliers)
    }

    /// Verified suppliers within `radius_km`, nearest first
    pub fn nearby_suppliers(&self, lat: f64, lng: f64, radius_km: f64) -> MarketResult<Vec<Supplier>> {
        let tables = self.read()?;
        let mut nearby: Vec<(f64, &Supplier)> = tables
            .suppliers
            .values()
            .filter(|s| s.is_verified)
            .filter_map(|s| s.distance_km(lat, lng).map(|d| (d, s)))
            .filter(|(d, _)| *d <= radius_km)
            .collect();
        nearby.sort_by(|a, b| a.0.total_cmp(&b.0));
        Ok(nearby
            .into_iter()
            .take(NEARBY_LIMIT)
            .map(|(_, s)| s.clone())
            .collect())
    }

    // =========================================================================
    // Catalog
    // =========================================================================

    pub fn list_categories(&self) -> MarketResult<Vec<Category>> {
        let mut categories: Vec<Category> = self.read()?.categories.values().cloned().collect();
        categories.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(categories)
    }

    pub fn create_category(&self, new_category: NewCategory) -> MarketResult<Category> {
        if new_category.name.trim().is_empty() {
            return Err(MarketError::InvalidRequest("Category name is required".into()));
        }
        let category = Category {
            id: new_id(),
            name: new_category.name,
            description: new_category.description,
            icon: new_category.icon,
            color: new_category.color,
        };
        self.write()?
            .categories
            .insert(category.id.clone(), category.clone());
        Ok(category)
    }

    pub fn get_product(&self, id: &str) -> MarketResult<Product> {
        self.read()?
            .products
            .get(id)
            .cloned()
            .ok_or_else(|| MarketError::not_found("Product", id))
    }

    pub fn list_products(&self, filter: &ProductFilter) -> MarketResult<Vec<Product>> {
        let tables = self.read()?;
        let mut products: Vec<Product> = tables
            .products
            .values()
            .filter(|p| filter.matches(p))
            .cloned()
            .collect();
        products.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.name.cmp(&b.name)));
        Ok(products)
    }

    pub fn create_product(&self, new_product: NewProduct) -> MarketResult<Product> {
        new_product.validate()?;
        let mut tables = self.write()?;
        if !tables.suppliers.contains_key(&new_product.supplier_id) {
            return Err(MarketError::not_found("Supplier", new_product.supplier_id));
        }
        if !tables.categories.contains_key(&new_product.category_id) {
            return Err(MarketError::not_found("Category", new_product.category_id));
        }

        let product = Product {
            id: new_id(),
            supplier_id: new_product.supplier_id,
            category_id: new_product.category_id,
            name: new_product.name,
            description: new_product.description,
            unit: new_product.unit,
            price_per_unit: new_product.price_per_unit,
            stock_quantity: new_product.stock_quantity,
            min_order_quantity: new_product.min_order_quantity,
            image_url: new_product.image_url,
            is_active: new_product.is_active,
            created_at: Utc::now(),
        };
        tables.products.insert(product.id.clone(), product.clone());
        debug!(product_id = %product.id, "product created");
        Ok(product)
    }

    pub fn update_product(&self, id: &str, update: ProductUpdate) -> MarketResult<Product> {
        update.validate()?;
        let mut tables = self.write()?;
        if let Some(category_id) = &update.category_id {
            if !tables.categories.contains_key(category_id) {
                return Err(MarketError::not_found("Category", category_id.clone()));
            }
        }
        let product = tables
            .products
            .get_mut(id)
            .ok_or_else(|| MarketError::not_found("Product", id))?;
        update.apply(product);
        Ok(product.clone())
    }

    pub fn delete_product(&self, id: &str) -> MarketResult<()> {
        self.write()?
            .products
            .remove(id)
            .map(|_| ())
            .ok_or_else(|| MarketError::not_found("Product", id))
    }

    // =========================================================================
    // Carts
    // =========================================================================

    /// Every cart a vendor has open, with lines and totals
    pub fn carts_for_vendor(&self, vendor_id: &str) -> MarketResult<Vec<CartView>> {
        let tables = self.read()?;
        let mut carts: Vec<&Cart> = tables
            .carts
            .values()
            .filter(|c| c.vendor_id == vendor_id)
            .collect();
        carts.sort_by_key(|c| c.created_at);
        carts.into_iter().map(|c| tables.cart_view(c)).collect()
    }

    pub fn get_cart(&self, cart_id: &str) -> MarketResult<CartView> {
        let tables = self.read()?;
        let cart = tables
            .carts
            .get(cart_id)
            .ok_or_else(|| MarketError::not_found("Cart", cart_id))?;
        tables.cart_view(cart)
    }

    /// Add a product to the vendor's cart for its supplier.
    ///
    /// Finds or creates the cart for the (vendor, supplier) pair, merges
    /// into an existing line for the same product or appends a new line
    /// that snapshots the current product price.
    pub fn add_to_cart(
        &self,
        vendor_id: &str,
        product_id: &str,
        quantity: u32,
        supplier_id: Option<&str>,
    ) -> MarketResult<CartView> {
        if quantity == 0 {
            return Err(MarketError::InvalidRequest("Quantity must be positive".into()));
        }

        let mut tables = self.write()?;
        let product = tables
            .products
            .get(product_id)
            .cloned()
            .ok_or_else(|| MarketError::not_found("Product", product_id))?;
        if !product.is_available() {
            return Err(MarketError::InvalidRequest(format!(
                "Product is not available: {}",
                product_id
            )));
        }
        if let Some(supplier_id) = supplier_id {
            if supplier_id != product.supplier_id {
                return Err(MarketError::InvalidRequest(format!(
                    "Product {} is not sold by supplier {}",
                    product_id, supplier_id
                )));
            }
        }

        // Work out the merged line and check it before touching any table
        let existing_cart = tables
            .carts
            .values()
            .find(|c| c.vendor_id == vendor_id && c.supplier_id == product.supplier_id)
            .map(|c| c.id.clone());
        let existing_line = existing_cart.as_deref().and_then(|cart_id| {
            tables
                .cart_items
                .values()
                .find(|item| item.cart_id == cart_id && item.product_id == product_id)
                .map(|item| (item.id.clone(), item.quantity, item.price_per_unit))
        });
        let (line_quantity, unit) = match &existing_line {
            Some((_, current, unit)) => (
                current.checked_add(quantity).ok_or_else(cart_too_large)?,
                *unit,
            ),
            None => (quantity, product.price_per_unit),
        };
        tables.check_cart_total(
            existing_cart.as_deref(),
            existing_line.as_ref().map(|(id, _, _)| id.as_str()),
            unit,
            line_quantity,
        )?;

        let now = Utc::now();
        let cart_id = match existing_cart {
            Some(id) => id,
            None => {
                let cart = Cart {
                    id: new_id(),
                    vendor_id: vendor_id.to_string(),
                    supplier_id: product.supplier_id.clone(),
                    created_at: now,
                    updated_at: now,
                };
                let id = cart.id.clone();
                tables.carts.insert(id.clone(), cart);
                debug!(cart_id = %id, vendor_id, "cart created");
                id
            }
        };

        let existing_item = match &existing_line {
            Some((id, _, _)) => tables.cart_items.get_mut(id),
            None => None,
        };
        match existing_item {
            Some(item) => {
                item.quantity = line_quantity;
                item.updated_at = now;
            }
            None => {
                let item = CartItem {
                    id: new_id(),
                    cart_id: cart_id.clone(),
                    product_id: product_id.to_string(),
                    quantity,
                    price_per_unit: product.price_per_unit,
                    created_at: now,
                    updated_at: now,
                };
                tables.cart_items.insert(item.id.clone(), item);
            }
        }
        tables.touch_cart(&cart_id);

        let cart = tables
            .carts
            .get(&cart_id)
            .ok_or_else(|| MarketError::Internal(format!("cart {} vanished", cart_id)))?;
        tables.cart_view(cart)
    }

    /// Set a line's quantity; zero or less removes the line.
    /// Returns false when the item is not in that cart.
    pub fn update_cart_item(&self, cart_id: &str, item_id: &str, quantity: i64) -> MarketResult<bool> {
        if quantity <= 0 {
            return self.remove_cart_item(cart_id, item_id);
        }
        let quantity = u32::try_from(quantity).map_err(|_| cart_too_large())?;

        let mut tables = self.write()?;
        let unit = match tables.cart_items.get(item_id) {
            Some(item) if item.cart_id == cart_id => item.price_per_unit,
            _ => return Ok(false),
        };
        tables.check_cart_total(Some(cart_id), Some(item_id), unit, quantity)?;
        if let Some(item) = tables.cart_items.get_mut(item_id) {
            item.quantity = quantity;
            item.updated_at = Utc::now();
        }
        tables.touch_cart(cart_id);
        Ok(true)
    }

    /// Returns false when the item is not in that cart
    pub fn remove_cart_item(&self, cart_id: &str, item_id: &str) -> MarketResult<bool> {
        let mut tables = self.write()?;
        match tables.cart_items.get(item_id) {
            Some(item) if item.cart_id == cart_id => {}
            _ => return Ok(false),
        }
        tables.cart_items.remove(item_id);
        tables.touch_cart(cart_id);
        Ok(true)
    }

    /// Remove a cart and all of its lines. Returns false when missing.
    pub fn clear_cart(&self, cart_id: &str) -> MarketResult<bool> {
        Ok(self.write()?.remove_cart(cart_id))
    }

    /// Turn a cart into an order in one step: snapshot the cart, build
    /// the order from it, record an optional payment, and remove the cart.
    pub fn convert_cart<F>(
        &self,
        cart_id: &str,
        build: F,
        payment: Option<PaymentDraft>,
    ) -> MarketResult<(Order, Option<Payment>)>
    where
        F: FnOnce(&CartView) -> MarketResult<NewOrder>,
    {
        let mut tables = self.write()?;
        let cart = tables
            .carts
            .get(cart_id)
            .ok_or_else(|| MarketError::not_found("Cart", cart_id))?;
        let view = tables.cart_view(cart)?;

        let new_order = build(&view)?;
        new_order.validate()?;
        let order = new_order.into_order();
        tables.orders.insert(order.id.clone(), order.clone());

        let payment = payment.map(|draft| draft.for_order(&order.id));
        if let Some(payment) = &payment {
            tables.payments.insert(payment.id.clone(), payment.clone());
        }

        tables.remove_cart(cart_id);
        info!(
            order_id = %order.id,
            cart_id,
            total = %order.total_amount.display(),
            "cart converted to order"
        );
        Ok((order, payment))
    }

    // =========================================================================
    // Orders
    // =========================================================================

    pub fn get_order(&self, id: &str) -> MarketResult<Order> {
        self.read()?
            .orders
            .get(id)
            .cloned()
            .ok_or_else(|| MarketError::not_found("Order", id))
    }

    /// Matching orders, newest first
    pub fn list_orders(&self, filter: &OrderFilter) -> MarketResult<Vec<Order>> {
        let tables = self.read()?;
        let mut orders: Vec<Order> = tables
            .orders
            .values()
            .filter(|o| filter.matches(o))
            .cloned()
            .collect();
        orders.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(orders)
    }

    pub fn create_order(&self, new_order: NewOrder) -> MarketResult<Order> {
        new_order.validate()?;
        let mut tables = self.write()?;
        if !tables.suppliers.contains_key(&new_order.supplier_id) {
            return Err(MarketError::not_found("Supplier", new_order.supplier_id));
        }
        let order = new_order.into_order();
        tables.orders.insert(order.id.clone(), order.clone());
        info!(order_id = %order.id, "order created");
        Ok(order)
    }

    pub fn update_order(&self, id: &str, update: OrderUpdate) -> MarketResult<Order> {
        let mut tables = self.write()?;
        let order = tables
            .orders
            .get_mut(id)
            .ok_or_else(|| MarketError::not_found("Order", id))?;
        update.apply(order)?;
        info!(order_id = %id, status = %order.status, "order updated");
        Ok(order.clone())
    }

    // =========================================================================
    // Payments
    // =========================================================================

    pub fn get_payment(&self, id: &str) -> MarketResult<Payment> {
        self.read()?
            .payments
            .get(id)
            .cloned()
            .ok_or_else(|| MarketError::not_found("Payment", id))
    }

    pub fn payments_for_order(&self, order_id: &str) -> MarketResult<Vec<Payment>> {
        let tables = self.read()?;
        if !tables.orders.contains_key(order_id) {
            return Err(MarketError::not_found("Order", order_id));
        }
        let mut payments: Vec<Payment> = tables
            .payments
            .values()
            .filter(|p| p.order_id == order_id)
            .cloned()
            .collect();
        payments.sort_by_key(|p| p.created_at);
        Ok(payments)
    }

    pub fn find_payment_by_transaction(&self, transaction_id: &str) -> MarketResult<Option<Payment>> {
        Ok(self
            .read()?
            .payments
            .values()
            .find(|p| p.provider_transaction_id.as_deref() == Some(transaction_id))
            .cloned())
    }

    pub fn update_payment(&self, id: &str, update: PaymentUpdate) -> MarketResult<Payment> {
        let mut tables = self.write()?;
        let payment = tables
            .payments
            .get_mut(id)
            .ok_or_else(|| MarketError::not_found("Payment", id))?;
        update.apply(payment);
        Ok(payment.clone())
    }

    // =========================================================================
    // Reviews
    // =========================================================================

    /// Record a review of a delivered order and fold it into the
    /// supplier's rating
    pub fn create_review(&self, new_review: NewReview) -> MarketResult<Review> {
        new_review.validate()?;
        let mut tables = self.write()?;

        let order = tables
            .orders
            .get(&new_review.order_id)
            .ok_or_else(|| MarketError::not_found("Order", new_review.order_id.clone()))?;
        if order.vendor_id != new_review.vendor_id || order.supplier_id != new_review.supplier_id {
            return Err(MarketError::InvalidRequest(
                "Order does not belong to this vendor and supplier".into(),
            ));
        }
        if order.status != OrderStatus::Delivered {
            return Err(MarketError::InvalidRequest(
                "Only delivered orders can be reviewed".into(),
            ));
        }
        if tables
            .reviews
            .values()
            .any(|r| r.order_id == new_review.order_id)
        {
            return Err(MarketError::InvalidRequest("Order already reviewed".into()));
        }

        let supplier = tables
            .suppliers
            .get_mut(&new_review.supplier_id)
            .ok_or_else(|| MarketError::not_found("Supplier", new_review.supplier_id.clone()))?;
        supplier.record_rating(new_review.rating);

        let review = new_review.into_review();
        tables.reviews.insert(review.id.clone(), review.clone());
        Ok(review)
    }

    pub fn list_reviews(&self, filter: &ReviewFilter) -> MarketResult<Vec<Review>> {
        let tables = self.read()?;
        let mut reviews: Vec<Review> = tables
            .reviews
            .values()
            .filter(|r| filter.matches(r))
            .cloned()
            .collect();
        reviews.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(reviews)
    }

    // =========================================================================
    // Seeding
    // =========================================================================

    pub(crate) fn insert_user(&self, user: User) -> MarketResult<()> {
        self.write()?.users.insert(user.id.clone(), user);
        Ok(())
    }

    pub(crate) fn insert_supplier(&self, supplier: Supplier) -> MarketResult<()> {
        self.write()?.suppliers.insert(supplier.id.clone(), supplier);
        Ok(())
    }

    pub(crate) fn insert_category(&self, category: Category) -> MarketResult<()> {
        self.write()?.categories.insert(category.id.clone(), category);
        Ok(())
    }

    pub(crate) fn insert_product(&self, product: Product) -> MarketResult<()> {
        self.write()?.products.insert(product.id.clone(), product);
        Ok(())
    }
}
