//! # Catalog
//!
//! Categories and the raw-material products suppliers list.

use crate::error::{MarketError, MarketResult};
use crate::money::Price;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A static taxonomy node (Vegetables, Oils, Spices, ...)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub icon: String,
    pub color: String,
}

/// Fields needed to create a category
#[derive(Debug, Clone, Deserialize)]
pub struct NewCategory {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub icon: String,
    pub color: String,
}

/// A product in a supplier's catalog
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: String,
    pub supplier_id: String,
    pub category_id: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Selling unit (kg, liter, piece)
    pub unit: String,
    pub price_per_unit: Price,
    pub stock_quantity: u32,
    pub min_order_quantity: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

impl Product {
    /// Whether the product can be added to a cart
    pub fn is_available(&self) -> bool {
        self.is_active
    }
}

fn default_true() -> bool {
    true
}

fn default_min_order() -> u32 {
    1
}

/// Fields needed to create a product
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewProduct {
    pub supplier_id: String,
    pub category_id: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub unit: String,
    pub price_per_unit: Price,
    #[serde(default)]
    pub stock_quantity: u32,
    #[serde(default = "default_min_order")]
    pub min_order_quantity: u32,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

impl NewProduct {
    pub fn validate(&self) -> MarketResult<()> {
        if self.name.trim().is_empty() {
            return Err(MarketError::InvalidRequest("Product name is required".into()));
        }
        if self.unit.trim().is_empty() {
            return Err(MarketError::InvalidRequest("Product unit is required".into()));
        }
        validate_price(&self.price_per_unit)?;
        validate_min_order(self.min_order_quantity)
    }
}

/// Partial product update; absent fields are left unchanged
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductUpdate {
    pub category_id: Option<String>,
    pub name: Option<String>,
    pub description: Option<String>,
    pub unit: Option<String>,
    pub price_per_unit: Option<Price>,
    pub stock_quantity: Option<u32>,
    pub min_order_quantity: Option<u32>,
    pub image_url: Option<String>,
    pub is_active: Option<bool>,
}

impl ProductUpdate {
    pub fn validate(&self) -> MarketResult<()> {
        if let Some(price) = &self.price_per_unit {
            validate_price(price)?;
        }
        if let Some(min) = self.min_order_quantity {
            validate_min_order(min)?;
        }
        Ok(())
    }

    pub fn apply(self, product: &mut Product) {
        if let Some(category_id) = self.category_id {
            product.category_id = category_id;
        }
        if let Some(name) = self.name {
            product.name = name;
        }
        if let Some(desc) = self.description {
            product.description = Some(desc);
        }
        if let Some(unit) = self.unit {
            product.unit = unit;
        }
        if let Some(price) = self.price_per_unit {
            product.price_per_unit = price;
        }
        if let Some(stock) = self.stock_quantity {
            product.stock_quantity = stock;
        }
        if let Some(min) = self.min_order_quantity {
            product.min_order_quantity = min;
        }
        if let Some(url) = self.image_url {
            product.image_url = Some(url);
        }
        if let Some(active) = self.is_active {
            product.is_active = active;
        }
    }
}

/// Product listing filter
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductFilter {
    pub category_id: Option<String>,
    pub supplier_id: Option<String>,
    pub active: Option<bool>,
}

impl ProductFilter {
    pub fn matches(&self, product: &Product) -> bool {
        self.category_id
            .as_ref()
            .map_or(true, |c| &product.category_id == c)
            && self
                .supplier_id
                .as_ref()
                .map_or(true, |s| &product.supplier_id == s)
            && self.active.map_or(true, |a| product.is_active == a)
    }
}

fn validate_price(price: &Price) -> MarketResult<()> {
    if price.amount < 0 {
        return Err(MarketError::InvalidRequest("Price cannot be negative".into()));
    }
    Ok(())
}

fn validate_min_order(min: u32) -> MarketResult<()> {
    if min == 0 {
        return Err(MarketError::InvalidRequest(
            "Minimum order quantity must be at least 1".into(),
        ));
    }
    Ok(())
}
