//! # Cart Types
//!
//! One cart per (vendor, supplier) pair. Cart items snapshot the product
//! price when added; views join product and supplier details for display.

use crate::error::{MarketError, MarketResult};
use crate::money::Price;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A vendor's staging area for one supplier
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cart {
    pub id: String,
    pub vendor_id: String,
    pub supplier_id: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A line in a cart
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItem {
    pub id: String,
    pub cart_id: String,
    pub product_id: String,
    pub quantity: u32,
    /// Product price when the item was first added
    pub price_per_unit: Price,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Sum of `unit x quantity` and of quantities over the lines.
/// `None` on overflow or when lines mix currencies.
pub fn checked_totals<I>(lines: I) -> Option<(Price, u32)>
where
    I: IntoIterator<Item = (Price, u32)>,
{
    let mut lines = lines.into_iter().peekable();
    let currency = lines.peek().map(|(unit, _)| unit.currency).unwrap_or_default();
    lines.try_fold((Price::zero(currency), 0u32), |(total, count), (unit, quantity)| {
        let line = unit.checked_times(quantity)?;
        Some((total.checked_add(&line)?, count.checked_add(quantity)?))
    })
}

pub(crate) fn cart_too_large() -> MarketError {
    MarketError::InvalidRequest("Cart quantity or total too large".into())
}

/// A cart line joined with product and supplier details
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLine {
    #[serde(flatten)]
    pub item: CartItem,
    pub product_name: String,
    pub unit: String,
    pub supplier_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stock_quantity: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_order_quantity: Option<u32>,
}

/// A cart with its lines and computed totals
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartView {
    #[serde(flatten)]
    pub cart: Cart,
    pub items: Vec<CartLine>,
    /// Sum of price x quantity over all lines, before tax
    pub total_amount: Price,
    /// Sum of quantities over all lines
    pub total_items: u32,
}

impl CartView {
    /// Build a view and compute its totals
    pub fn new(cart: Cart, items: Vec<CartLine>) -> MarketResult<Self> {
        let (total_amount, total_items) =
            checked_totals(items.iter().map(|line| (line.item.price_per_unit, line.item.quantity)))
                .ok_or_else(cart_too_large)?;
        Ok(Self {
            cart,
            items,
            total_amount,
            total_items,
        })
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
