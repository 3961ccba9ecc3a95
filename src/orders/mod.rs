//! Synthetic order payloads.
//!
//! Generates batches of orders for exercising the upstream: every order in a
//! batch belongs to a distinct user, and carries one to three distinct
//! products.

use chrono::{SecondsFormat, Utc};
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::ops::RangeInclusive;

pub const MAX_ORDERS: usize = 30;
pub const USER_IDS: RangeInclusive<u32> = 1..=30;
pub const PRODUCT_IDS: RangeInclusive<u32> = 1..=100;
pub const ITEMS_PER_ORDER: RangeInclusive<usize> = 1..=3;
pub const QTY: RangeInclusive<u32> = 1..=5;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderPayload {
    pub order: Order,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    pub order_id: String,
    pub created_at: String,
    pub user: OrderUser,
    pub cart: Cart,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderUser {
    pub user_id: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cart {
    pub items: Vec<OrderItem>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderItem {
    pub product_id: u32,
    pub qty: u32,
}

/// Up to `n` distinct values from `range`, in random order.
fn pick_unique<R: Rng + ?Sized>(rng: &mut R, range: RangeInclusive<u32>, n: usize) -> Vec<u32> {
    let mut pool: Vec<u32> = range.collect();
    let count = n.min(pool.len());
    let (picked, _) = pool.partial_shuffle(rng, count);
    picked.to_vec()
}

/// Generate `count` orders (clamped to `1..=MAX_ORDERS`) sharing one timestamp.
pub fn generate_order_payloads<R: Rng + ?Sized>(rng: &mut R, count: usize) -> Vec<OrderPayload> {
    let count = count.clamp(1, MAX_ORDERS);
    let created_at = Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true);

    pick_unique(rng, USER_IDS, count)
        .into_iter()
        .enumerate()
        .map(|(i, user_id)| {
            let item_count = rng.gen_range(ITEMS_PER_ORDER);
            let items = pick_unique(rng, PRODUCT_IDS, item_count)
                .into_iter()
                .map(|product_id| OrderItem {
                    product_id,
                    qty: rng.gen_range(QTY),
                })
                .collect();

            OrderPayload {
                order: Order {
                    order_id: (i + 1).to_string(),
                    created_at: created_at.clone(),
                    user: OrderUser { user_id },
                    cart: Cart { items },
                },
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::HashSet;

    #[test]
    fn test_count_is_clamped() {
        let mut rng = StdRng::seed_from_u64(7);
        assert_eq!(generate_order_payloads(&mut rng, 0).len(), 1);
        assert_eq!(generate_order_payloads(&mut rng, 12).len(), 12);
        assert_eq!(generate_order_payloads(&mut rng, 500).len(), MAX_ORDERS);
    }

    #[test]
    fn test_orders_respect_ranges_and_uniqueness() {
        let mut rng = StdRng::seed_from_u64(42);
        let orders = generate_order_payloads(&mut rng, MAX_ORDERS);

        let users: HashSet<u32> = orders.iter().map(|o| o.order.user.user_id).collect();
        assert_eq!(users.len(), MAX_ORDERS);

        let stamp = &orders[0].order.created_at;
        for (i, payload) in orders.iter().enumerate() {
            let order = &payload.order;
            assert_eq!(order.order_id, (i + 1).to_string());
            assert_eq!(&order.created_at, stamp);
            assert!(USER_IDS.contains(&order.user.user_id));
            assert!(ITEMS_PER_ORDER.contains(&order.cart.items.len()));

            let products: HashSet<u32> = order.cart.items.iter().map(|it| it.product_id).collect();
            assert_eq!(products.len(), order.cart.items.len());
            for item in &order.cart.items {
                assert!(PRODUCT_IDS.contains(&item.product_id));
                assert!(QTY.contains(&item.qty));
            }
        }
    }

    #[test]
    fn test_wire_shape() {
        let mut rng = StdRng::seed_from_u64(1);
        let payload = &generate_order_payloads(&mut rng, 1)[0];
        let value = serde_json::to_value(payload).unwrap();
        assert!(value["order"]["order_id"].is_string());
        assert!(value["order"]["user"]["user_id"].is_u64());
        assert!(value["order"]["cart"]["items"].is_array());
        assert!(chrono::DateTime::parse_from_rfc3339(value["order"]["created_at"].as_str().unwrap()).is_ok());
    }
}
