//! # Suppliers
//!
//! Supplier business profiles and their admin verification state.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Maximum suppliers returned by a nearby lookup
pub const NEARBY_LIMIT: usize = 10;

const EARTH_RADIUS_KM: f64 = 6371.0;

/// Admin verification state of a supplier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum VerificationStatus {
    #[default]
    Pending,
    Approved,
    Rejected,
}

/// A supplier business profile, linked to a user
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Supplier {
    pub id: String,
    pub user_id: String,
    pub business_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub address: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latitude: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub longitude: Option<f64>,
    /// Average rating, one decimal place
    pub rating: f64,
    pub total_ratings: u32,
    pub is_verified: bool,
    pub verification_status: VerificationStatus,
    pub created_at: DateTime<Utc>,
}

impl Supplier {
    /// Distance in kilometres from a point, when coordinates are known
    pub fn distance_km(&self, lat: f64, lng: f64) -> Option<f64> {
        match (self.latitude, self.longitude) {
            (Some(s_lat), Some(s_lng)) => Some(haversine_km(lat, lng, s_lat, s_lng)),
            _ => None,
        }
    }

    /// Apply an admin decision
    pub fn apply_verification(&mut self, status: VerificationStatus) {
        self.verification_status = status;
        self.is_verified = matches!(status, VerificationStatus::Approved);
    }

    /// Fold one more rating into the running average
    pub fn record_rating(&mut self, rating: u8) {
        let total = self.rating * self.total_ratings as f64 + rating as f64;
        self.total_ratings += 1;
        self.rating = (total / self.total_ratings as f64 * 10.0).round() / 10.0;
    }
}

/// Fields needed to create a supplier
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewSupplier {
    pub user_id: String,
    pub business_name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub address: String,
    #[serde(default)]
    pub latitude: Option<f64>,
    #[serde(default)]
    pub longitude: Option<f64>,
}

/// Partial supplier update; absent fields are left unchanged
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SupplierUpdate {
    pub business_name: Option<String>,
    pub description: Option<String>,
    pub address: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub is_verified: Option<bool>,
    pub verification_status: Option<VerificationStatus>,
}

impl SupplierUpdate {
    pub fn apply(self, supplier: &mut Supplier) {
        if let Some(name) = self.business_name {
            supplier.business_name = name;
        }
        if let Some(desc) = self.description {
            supplier.description = Some(desc);
        }
        if let Some(address) = self.address {
            supplier.address = address;
        }
        if let Some(lat) = self.latitude {
            supplier.latitude = Some(lat);
        }
        if let Some(lng) = self.longitude {
            supplier.longitude = Some(lng);
        }
        if let Some(status) = self.verification_status {
            supplier.apply_verification(status);
        }
        if let Some(verified) = self.is_verified {
            supplier.is_verified = verified;
        }
    }
}

/// Query for the supplier listing
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SupplierFilter {
    pub verified: Option<bool>,
    pub limit: Option<usize>,
}

/// Great-circle distance between two coordinates
pub fn haversine_km(lat1: f64, lng1: f64, lat2: f64, lng2: f64) -> f64 {
    let d_lat = (lat2 - lat1).to_radians();
    let d_lng = (lng2 - lng1).to_radians();
    let a = (d_lat / 2.0).sin().powi(2)
        + lat1.to_radians().cos() * lat2.to_radians().cos() * (d_lng / 2.0).sin().powi(2);
    2.0 * EARTH_RADIUS_KM * a.sqrt().asin()
}
