//! # Reviews
//!
//! Vendor ratings of suppliers, one per delivered order.

use crate::error::{MarketError, MarketResult};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Review {
    pub id: String,
    pub order_id: String,
    pub vendor_id: String,
    pub supplier_id: String,
    /// 1 to 5
    pub rating: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewReview {
    pub order_id: String,
    pub vendor_id: String,
    pub supplier_id: String,
    pub rating: u8,
    #[serde(default)]
    pub comment: Option<String>,
}

impl NewReview {
    pub fn validate(&self) -> MarketResult<()> {
        if !(1..=5).contains(&self.rating) {
            return Err(MarketError::InvalidRequest(
                "Rating must be between 1 and 5".into(),
            ));
        }
        Ok(())
    }

    pub fn into_review(self) -> Review {
        Review {
            id: Uuid::new_v4().to_string(),
            order_id: self.order_id,
            vendor_id: self.vendor_id,
            supplier_id: self.supplier_id,
            rating: self.rating,
            comment: self.comment,
            created_at: Utc::now(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewFilter {
    pub supplier_id: Option<String>,
    pub vendor_id: Option<String>,
}

impl ReviewFilter {
    pub fn matches(&self, review: &Review) -> bool {
        self.supplier_id
            .as_ref()
            .map_or(true, |s| &review.supplier_id == s)
            && self.vendor_id.as_ref().map_or(true, |v| &review.vendor_id == v)
    }
}
