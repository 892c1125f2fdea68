//! # Order Types
//!
//! Orders placed by vendors against a single supplier, with a
//! denormalized snapshot of the cart lines they were created from.

use crate::cart::CartLine;
use crate::error::{MarketError, MarketResult};
use crate::money::Price;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Order lifecycle
///
/// ```text
/// pending → confirmed → processing → in_transit → delivered
///    └──────────┴────────────┴─────────────┴──→ cancelled
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    #[default]
    Pending,
    Confirmed,
    Processing,
    InTransit,
    Delivered,
    Cancelled,
}

impl OrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Confirmed => "confirmed",
            OrderStatus::Processing => "processing",
            OrderStatus::InTransit => "in_transit",
            OrderStatus::Delivered => "delivered",
            OrderStatus::Cancelled => "cancelled",
        }
    }

    /// Delivered and cancelled orders never change again
    pub fn is_terminal(&self) -> bool {
        matches!(self, OrderStatus::Delivered | OrderStatus::Cancelled)
    }

    /// Still moving towards the vendor
    pub fn is_active(&self) -> bool {
        !self.is_terminal()
    }

    fn next(&self) -> Option<OrderStatus> {
        match self {
            OrderStatus::Pending => Some(OrderStatus::Confirmed),
            OrderStatus::Confirmed => Some(OrderStatus::Processing),
            OrderStatus::Processing => Some(OrderStatus::InTransit),
            OrderStatus::InTransit => Some(OrderStatus::Delivered),
            OrderStatus::Delivered | OrderStatus::Cancelled => None,
        }
    }

    /// One step forward, or cancellation from a non-terminal state.
    /// Setting the current status again is a no-op and allowed.
    pub fn can_transition_to(&self, to: OrderStatus) -> bool {
        if *self == to {
            return true;
        }
        if self.is_terminal() {
            return false;
        }
        to == OrderStatus::Cancelled || self.next() == Some(to)
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How the vendor pays
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum PaymentMethod {
    /// Cash on delivery
    #[default]
    Cod,
    /// Hosted payment page
    #[serde(alias = "stripe")]
    Online,
}

/// Payment state of an order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum OrderPaymentStatus {
    #[default]
    Pending,
    Paid,
    Failed,
}

/// A line in an order (snapshot of a cart line at checkout)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderLine {
    pub product_id: String,
    pub product_name: String,
    pub unit: String,
    pub quantity: u32,
    pub price_per_unit: Price,
}

impl From<&CartLine> for OrderLine {
    fn from(line: &CartLine) -> Self {
        Self {
            product_id: line.item.product_id.clone(),
            product_name: line.product_name.clone(),
            unit: line.unit.clone(),
            quantity: line.item.quantity,
            price_per_unit: line.item.price_per_unit,
        }
    }
}

/// An order placed by a vendor with one supplier
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    /// Short display id (ORD-XXXXXX)
    pub id: String,
    pub vendor_id: String,
    pub supplier_id: String,
    pub status: OrderStatus,
    pub total_amount: Price,
    pub items: Vec<OrderLine>,
    pub delivery_address: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub estimated_delivery: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub actual_delivery: Option<DateTime<Utc>>,
    pub payment_method: PaymentMethod,
    pub payment_status: OrderPaymentStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Generate a short order id
pub fn generate_order_id() -> String {
    let uuid = Uuid::new_v4().simple().to_string();
    format!("ORD-{}", uuid[..6].to_uppercase())
}

/// Fields needed to create an order
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewOrder {
    pub vendor_id: String,
    pub supplier_id: String,
    #[serde(default)]
    pub status: OrderStatus,
    pub total_amount: Price,
    pub items: Vec<OrderLine>,
    pub delivery_address: String,
    #[serde(default)]
    pub estimated_delivery: Option<DateTime<Utc>>,
    #[serde(default)]
    pub payment_method: PaymentMethod,
    #[serde(default)]
    pub payment_status: OrderPaymentStatus,
    #[serde(default)]
    pub notes: Option<String>,
}

impl NewOrder {
    pub fn validate(&self) -> MarketResult<()> {
        if self.items.is_empty() {
            return Err(MarketError::InvalidRequest("Order has no items".into()));
        }
        if self.items.iter().any(|line| line.quantity == 0) {
            return Err(MarketError::InvalidRequest(
                "Order line quantity must be positive".into(),
            ));
        }
        if self.delivery_address.trim().is_empty() {
            return Err(MarketError::InvalidRequest("Delivery address is required".into()));
        }
        if self.total_amount.amount < 0 {
            return Err(MarketError::InvalidRequest("Order total cannot be negative".into()));
        }
        Ok(())
    }

    pub fn into_order(self) -> Order {
        Order {
            id: generate_order_id(),
            vendor_id: self.vendor_id,
            supplier_id: self.supplier_id,
            status: self.status,
            total_amount: self.total_amount,
            items: self.items,
            delivery_address: self.delivery_address,
            estimated_delivery: self.estimated_delivery,
            actual_delivery: None,
            payment_method: self.payment_method,
            payment_status: self.payment_status,
            notes: self.notes.filter(|n| !n.trim().is_empty()),
            created_at: Utc::now(),
        }
    }
}

/// Order update (status tracking and delivery details)
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderUpdate {
    pub status: Option<OrderStatus>,
    pub payment_status: Option<OrderPaymentStatus>,
    pub estimated_delivery: Option<DateTime<Utc>>,
    pub notes: Option<String>,
}

impl OrderUpdate {
    /// Apply to an order, enforcing the status lifecycle
    pub fn apply(self, order: &mut Order) -> MarketResult<()> {
        if let Some(to) = self.status {
            if !order.status.can_transition_to(to) {
                return Err(MarketError::InvalidTransition {
                    from: order.status.to_string(),
                    to: to.to_string(),
                });
            }
            if to == OrderStatus::Delivered && order.status != OrderStatus::Delivered {
                order.actual_delivery = Some(Utc::now());
            }
            order.status = to;
        }
        if let Some(payment_status) = self.payment_status {
            order.payment_status = payment_status;
        }
        if let Some(eta) = self.estimated_delivery {
            order.estimated_delivery = Some(eta);
        }
        if let Some(notes) = self.notes {
            order.notes = Some(notes);
        }
        Ok(())
    }
}

/// Order listing filter
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderFilter {
    pub vendor_id: Option<String>,
    pub supplier_id: Option<String>,
    pub status: Option<OrderStatus>,
}

impl OrderFilter {
    pub fn matches(&self, order: &Order) -> bool {
        self.vendor_id.as_ref().map_or(true, |v| &order.vendor_id == v)
            && self
                .supplier_id
                .as_ref()
                .map_or(true, |s| &order.supplier_id == s)
            && self.status.map_or(true, |s| order.status == s)
    }
}
