//! # Seed Data
//!
//! Demo categories, users, suppliers and products loaded into a fresh
//! store. The bundled `config/seed.toml` is compiled in; a different file
//! can be supplied at startup.

use crate::catalog::{Category, Product};
use crate::error::{MarketError, MarketResult};
use crate::money::{Currency, Price};
use crate::store::MarketStore;
use crate::supplier::{Supplier, VerificationStatus};
use crate::user::{Role, User};
use chrono::Utc;
use serde::Deserialize;
use std::collections::HashMap;
use uuid::Uuid;

/// The bundled demo data
pub const DEFAULT_SEED: &str = include_str!("../../../config/seed.toml");

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SeedData {
    #[serde(default)]
    pub categories: Vec<SeedCategory>,
    #[serde(default)]
    pub users: Vec<SeedUser>,
    #[serde(default)]
    pub suppliers: Vec<SeedSupplier>,
    #[serde(default)]
    pub products: Vec<SeedProduct>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SeedCategory {
    pub key: String,
    pub name: String,
    pub description: Option<String>,
    pub icon: String,
    pub color: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SeedUser {
    pub key: String,
    pub username: String,
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub role: Role,
    pub first_name: String,
    pub last_name: String,
    pub phone: Option<String>,
    #[serde(default)]
    pub is_verified: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SeedSupplier {
    pub key: String,
    /// Key of the owning user
    pub user: String,
    pub business_name: String,
    pub description: Option<String>,
    pub address: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    #[serde(default)]
    pub rating: f64,
    #[serde(default)]
    pub total_ratings: u32,
    #[serde(default)]
    pub verification_status: VerificationStatus,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SeedProduct {
    /// Key of the selling supplier
    pub supplier: String,
    /// Key of the category
    pub category: String,
    pub name: String,
    pub description: Option<String>,
    pub unit: String,
    /// Decimal price in rupees
    pub price: f64,
    #[serde(default)]
    pub stock_quantity: u32,
    #[serde(default = "default_min_order")]
    pub min_order_quantity: u32,
    pub image_url: Option<String>,
}

fn default_min_order() -> u32 {
    1
}

impl SeedData {
    pub fn from_toml(toml_str: &str) -> MarketResult<Self> {
        toml::from_str(toml_str)
            .map_err(|e| MarketError::Configuration(format!("invalid seed data: {}", e)))
    }

    /// The compiled-in demo data
    pub fn bundled() -> MarketResult<Self> {
        Self::from_toml(DEFAULT_SEED)
    }
}

fn resolve<'a>(ids: &'a HashMap<String, String>, kind: &str, key: &str) -> MarketResult<&'a String> {
    ids.get(key)
        .ok_or_else(|| MarketError::Configuration(format!("seed {} '{}' is not defined", kind, key)))
}

fn new_id() -> String {
    Uuid::new_v4().to_string()
}

impl MarketStore {
    /// A store populated from seed data
    pub fn from_seed(seed: SeedData) -> MarketResult<Self> {
        let store = MarketStore::new();
        let now = Utc::now();

        let mut category_ids = HashMap::new();
        for c in seed.categories {
            let id = new_id();
            category_ids.insert(c.key, id.clone());
            store.insert_category(Category {
                id,
                name: c.name,
                description: c.description,
                icon: c.icon,
                color: c.color,
            })?;
        }

        let mut user_ids = HashMap::new();
        for u in seed.users {
            let id = new_id();
            user_ids.insert(u.key, id.clone());
            store.insert_user(User {
                id,
                username: u.username,
                email: u.email,
                password: u.password,
                role: u.role,
                first_name: u.first_name,
                last_name: u.last_name,
                phone: u.phone,
                is_verified: u.is_verified,
                created_at: now,
            })?;
        }

        let mut supplier_ids = HashMap::new();
        for s in seed.suppliers {
            let id = new_id();
            let user_id = resolve(&user_ids, "user", &s.user)?.clone();
            supplier_ids.insert(s.key, id.clone());
            store.insert_supplier(Supplier {
                id,
                user_id,
                business_name: s.business_name,
                description: s.description,
                address: s.address,
                latitude: s.latitude,
                longitude: s.longitude,
                rating: s.rating,
                total_ratings: s.total_ratings,
                is_verified: s.verification_status == VerificationStatus::Approved,
                verification_status: s.verification_status,
                created_at: now,
            })?;
        }

        for p in seed.products {
            store.insert_product(Product {
                id: new_id(),
                supplier_id: resolve(&supplier_ids, "supplier", &p.supplier)?.clone(),
                category_id: resolve(&category_ids, "category", &p.category)?.clone(),
                name: p.name,
                description: p.description,
                unit: p.unit,
                price_per_unit: Price::new(p.price, Currency::INR),
                stock_quantity: p.stock_quantity,
                min_order_quantity: p.min_order_quantity,
                image_url: p.image_url,
                is_active: true,
                created_at: now,
            })?;
        }

        Ok(store)
    }

    /// A store with the bundled demo data
    pub fn with_demo_data() -> MarketResult<Self> {
        Self::from_seed(SeedData::bundled()?)
    }
}
