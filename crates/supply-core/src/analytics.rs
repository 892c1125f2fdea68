//! # Dashboard Statistics
//!
//! Role-specific dashboard counters and platform-wide analytics for admins,
//! computed from the store on every request.

use crate::error::MarketResult;
use crate::money::{Currency, Price};
use crate::order::OrderStatus;
use crate::store::MarketStore;
use crate::supplier::VerificationStatus;
use crate::user::Role;
use serde::Serialize;

/// Counters shown on a vendor's dashboard
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VendorStats {
    pub active_orders: usize,
    pub total_orders: usize,
    pub total_spent: Price,
    pub verified_suppliers: usize,
}

/// Counters shown on a supplier's dashboard
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SupplierStats {
    pub total_products: usize,
    pub processing_orders: usize,
    pub revenue: Price,
    pub rating: f64,
}

/// Dashboard payload; other roles get an empty object
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum DashboardStats {
    Vendor(VendorStats),
    Supplier(SupplierStats),
    Empty {},
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlatformAnalytics {
    pub total_vendors: usize,
    pub verified_suppliers: usize,
    pub pending_verifications: usize,
    pub total_orders: usize,
    pub revenue: Price,
}

fn sum(amounts: impl Iterator<Item = Price>) -> Price {
    Price::from_minor(amounts.map(|p| p.amount).fold(0, i64::saturating_add), Currency::INR)
}

impl MarketStore {
    pub fn dashboard_stats(&self, user_id: &str, role: Role) -> MarketResult<DashboardStats> {
        let tables = self.read()?;
        let stats = match role {
            Role::Vendor => {
                let orders: Vec<_> = tables
                    .orders
                    .values()
                    .filter(|o| o.vendor_id == user_id)
                    .collect();
                DashboardStats::Vendor(VendorStats {
                    active_orders: orders.iter().filter(|o| o.status.is_active()).count(),
                    total_orders: orders.len(),
                    total_spent: sum(orders.iter().map(|o| o.total_amount)),
                    verified_suppliers: tables.suppliers.values().filter(|s| s.is_verified).count(),
                })
            }
            Role::Supplier => {
                let Some(supplier) = tables.suppliers.values().find(|s| s.user_id == user_id)
                else {
                    return Ok(DashboardStats::Supplier(SupplierStats {
                        total_products: 0,
                        processing_orders: 0,
                        revenue: Price::zero(Currency::INR),
                        rating: 0.0,
                    }));
                };
                let supplier_id = supplier.id.as_str();
                let orders: Vec<_> = tables
                    .orders
                    .values()
                    .filter(|o| o.supplier_id == supplier_id)
                    .collect();
                DashboardStats::Supplier(SupplierStats {
                    total_products: tables
                        .products
                        .values()
                        .filter(|p| p.supplier_id == supplier_id)
                        .count(),
                    processing_orders: orders
                        .iter()
                        .filter(|o| o.status == OrderStatus::Processing)
                        .count(),
                    revenue: sum(orders
                        .iter()
                        .filter(|o| o.status == OrderStatus::Delivered)
                        .map(|o| o.total_amount)),
                    rating: supplier.rating,
                })
            }
            Role::Admin => DashboardStats::Empty {},
        };
        Ok(stats)
    }

    pub fn platform_analytics(&self) -> MarketResult<PlatformAnalytics> {
        let tables = self.read()?;
        Ok(PlatformAnalytics {
            total_vendors: tables.users.values().filter(|u| u.role == Role::Vendor).count(),
            verified_suppliers: tables.suppliers.values().filter(|s| s.is_verified).count(),
            pending_verifications: tables
                .suppliers
                .values()
                .filter(|s| s.verification_status == VerificationStatus::Pending)
                .count(),
            total_orders: tables.orders.len(),
            revenue: sum(tables.orders.values().map(|o| o.total_amount)),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::order::{NewOrder, OrderUpdate};
    use crate::store::tests::fixture;

    fn place_order(f: &crate::store::tests::Fixture) -> String {
        let cart = f.store.add_to_cart(&f.vendor_id, &f.onions_id, 10, None).unwrap();
        let (order, _) = f
            .store
            .convert_cart(
                &cart.cart.id,
                |cart| {
                    Ok(NewOrder {
                        vendor_id: cart.cart.vendor_id.clone(),
                        supplier_id: cart.cart.supplier_id.clone(),
                        status: OrderStatus::Pending,
                        total_amount: cart.total_amount,
                        items: cart.items.iter().map(Into::into).collect(),
                        delivery_address: "Stall 4".into(),
                        estimated_delivery: None,
                        payment_method: Default::default(),
                        payment_status: Default::default(),
                        notes: None,
                    })
                },
                None,
            )
            .unwrap();
        order.id
    }

    #[test]
    fn test_vendor_stats() {
        let f = fixture();
        place_order(&f);
        let stats = f.store.dashboard_stats(&f.vendor_id, Role::Vendor).unwrap();
        assert_eq!(
            stats,
            DashboardStats::Vendor(VendorStats {
                active_orders: 1,
                total_orders: 1,
                total_spent: Price::from_minor(35000, Currency::INR),
                verified_suppliers: 1,
            })
        );
    }

    #[test]
    fn test_supplier_stats_resolve_profile_by_user() {
        let f = fixture();
        let order_id = place_order(&f);
        for status in [
            OrderStatus::Confirmed,
            OrderStatus::Processing,
            OrderStatus::InTransit,
            OrderStatus::Delivered,
        ] {
            f.store
                .update_order(
                    &order_id,
                    OrderUpdate {
                        status: Some(status),
                        ..Default::default()
                    },
                )
                .unwrap();
        }

        let user_id = f.store.get_supplier(&f.supplier_id).unwrap().user_id;
        match f.store.dashboard_stats(&user_id, Role::Supplier).unwrap() {
            DashboardStats::Supplier(stats) => {
                assert_eq!(stats.total_products, 2);
                assert_eq!(stats.processing_orders, 0);
                assert_eq!(stats.revenue.amount, 35000);
            }
            other => panic!("unexpected stats: {:?}", other),
        }
    }

    #[test]
    fn test_supplier_stats_count_processing_orders() {
        let f = fixture();
        let order_id = place_order(&f);
        place_order(&f);
        for status in [OrderStatus::Confirmed, OrderStatus::Processing] {
            f.store
                .update_order(
                    &order_id,
                    OrderUpdate {
                        status: Some(status),
                        ..Default::default()
                    },
                )
                .unwrap();
        }

        let user_id = f.store.get_supplier(&f.supplier_id).unwrap().user_id;
        match f.store.dashboard_stats(&user_id, Role::Supplier).unwrap() {
            DashboardStats::Supplier(stats) => {
                assert_eq!(stats.processing_orders, 1);
                assert_eq!(stats.revenue.amount, 0);
            }
            other => panic!("unexpected stats: {:?}", other),
        }
    }

    #[test]
    fn test_admin_stats_are_empty() {
        let f = fixture();
        let stats = f.store.dashboard_stats("anyone", Role::Admin).unwrap();
        assert_eq!(serde_json::to_value(stats).unwrap(), serde_json::json!({}));
    }

    #[test]
    fn test_platform_analytics() {
        let f = fixture();
        place_order(&f);
        let analytics = f.store.platform_analytics().unwrap();
        assert_eq!(analytics.total_vendors, 1);
        assert_eq!(analytics.verified_suppliers, 1);
        assert_eq!(analytics.pending_verifications, 0);
        assert_eq!(analytics.total_orders, 1);
        assert_eq!(analytics.revenue.amount, 35000);
    }
}
