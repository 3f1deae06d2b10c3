use chrono::{Duration, Utc};
use parking_lot::RwLock;
use uuid::Uuid;

use crate::models::{NewOrder, OfflineOrder, OrderItem, OrderStatus, OrderUpdate};

pub struct OrderRegistry {
    orders: RwLock<Vec<OfflineOrder>>,
}

impl OrderRegistry {
    pub fn new() -> Self {
        Self {
            orders: RwLock::new(seed_orders()),
        }
    }

    pub fn empty() -> Self {
        Self {
            orders: RwLock::new(Vec::new()),
        }
    }

    pub fn find_by_id(&self, id: &str) -> Option<OfflineOrder> {
        self.orders.read().iter().find(|o| o.id == id).cloned()
    }

    pub fn find_by_customer_id(&self, customer_id: &str) -> Vec<OfflineOrder> {
        let mut orders: Vec<OfflineOrder> = self
            .orders
            .read()
            .iter()
            .filter(|o| o.customer_id == customer_id)
            .cloned()
            .collect();
        orders.sort_by(|a, b| b.order_date.cmp(&a.order_date));
        orders
    }

    /// Stores the order as submitted. Subtotal/discount/total are
    /// pre-computed by the caller and not re-validated here.
    pub fn create(&self, new: NewOrder) -> OfflineOrder {
        let now = Utc::now();
        let order = OfflineOrder {
            id: format!("order_{}", &Uuid::new_v4().simple().to_string()[..12]),
            customer_id: new.customer_id,
            store_id: new.store_id,
            order_date: new.order_date,
            items: new.items,
            subtotal: new.subtotal,
            discount: new.discount,
            total: new.total,
            status: new.status,
            created_at: now,
            updated_at: now,
        };
        self.orders.write().push(order.clone());
        order
    }

    pub fn update(&self, id: &str, updates: OrderUpdate) -> Option<OfflineOrder> {
        let mut orders = self.orders.write();
        let order = orders.iter_mut().find(|o| o.id == id)?;

        if let Some(v) = updates.store_id {
            order.store_id = v;
        }
        if let Some(v) = updates.items {
            order.items = v;
        }
        if let Some(v) = updates.subtotal {
            order.subtotal = v;
        }
        if let Some(v) = updates.discount {
            order.discount = v;
        }
        if let Some(v) = updates.total {
            order.total = v;
        }
        if let Some(v) = updates.status {
            order.status = v;
        }
        order.updated_at = Utc::now();
        Some(order.clone())
    }

    pub fn reset(&self) {
        *self.orders.write() = seed_orders();
    }
}

impl Default for OrderRegistry {
    fn default() -> Self {
        Self::new()
    }
}

fn item(
    product_id: &str,
    code: &str,
    name: &str,
    quantity: u32,
    unit_price: f64,
) -> OrderItem {
    OrderItem {
        product_id: product_id.into(),
        product_code: code.into(),
        product_name: name.into(),
        quantity,
        unit_price,
        total_price: quantity as f64 * unit_price,
    }
}

fn seed_orders() -> Vec<OfflineOrder> {
    let now = Utc::now();
    let order = |id: &str,
                 customer_id: &str,
                 days_ago: i64,
                 items: Vec<OrderItem>,
                 discount: f64,
                 status: OrderStatus| {
        let subtotal: f64 = items.iter().map(|i| i.total_price).sum();
        let date = now - Duration::days(days_ago);
        OfflineOrder {
            id: id.into(),
            customer_id: customer_id.into(),
            store_id: "store_001".into(),
            order_date: date,
            items,
            subtotal,
            discount,
            total: subtotal - discount,
            status,
            created_at: date,
            updated_at: date,
        }
    };

    vec![
        order(
            "order_001",
            "cust_001",
            5,
            vec![item("prod_001", "LUM-HL-200", "Lumina Hydra Lotion", 2, 1200.0)],
            0.0,
            OrderStatus::Completed,
        ),
        order(
            "order_002",
            "cust_001",
            12,
            vec![
                item("prod_002", "LUM-HE-200", "Lumina Hydra Emulsion", 1, 1300.0),
                item("prod_003", "LUM-HW-150", "Lumina Hydra Foaming Wash", 1, 850.0),
            ],
            100.0,
            OrderStatus::Completed,
        ),
        order(
            "order_003",
            "cust_001",
            1,
            vec![
                item("prod_006", "PUR-ML-200", "Pure Moist Lotion", 1, 1500.0),
                item("prod_009", "LUM-CM-30", "Lumina Clear Mask", 3, 450.0),
            ],
            0.0,
            OrderStatus::Pending,
        ),
        order(
            "order_004",
            "cust_002",
            8,
            vec![
                item("prod_008", "ESS-PC-30", "Essenza Precious Cream", 1, 1800.0),
                item("prod_010", "LUM-PW-100", "Lumina Powder Wash", 2, 950.0),
            ],
            200.0,
            OrderStatus::Completed,
        ),
        order(
            "order_005",
            "cust_002",
            3,
            vec![item("prod_004", "VEL-RC-30", "Velours Riche Cream", 1, 2500.0)],
            0.0,
            OrderStatus::Cancelled,
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_order(customer_id: &str, items: Vec<OrderItem>, discount: f64) -> NewOrder {
        let subtotal: f64 = items.iter().map(|i| i.total_price).sum();
        NewOrder {
            customer_id: customer_id.into(),
            store_id: "store_001".into(),
            order_date: Utc::now(),
            items,
            subtotal,
            discount,
            total: subtotal - discount,
            status: OrderStatus::Completed,
        }
    }

    #[test]
    fn create_then_find_by_id() {
        let registry = OrderRegistry::empty();
        let created = registry.create(new_order(
            "cust_x",
            vec![item("prod_001", "LUM-HL-200", "Lumina Hydra Lotion", 2, 1200.0)],
            100.0,
        ));

        let fetched = registry.find_by_id(&created.id).unwrap();
        assert_eq!(fetched.subtotal, 2400.0);
        assert_eq!(fetched.total, 2300.0);
    }

    #[test]
    fn find_by_customer_sorts_newest_first() {
        let registry = OrderRegistry::new();
        let orders = registry.find_by_customer_id("cust_001");

        assert_eq!(orders.len(), 3);
        assert!(orders.windows(2).all(|w| w[0].order_date >= w[1].order_date));
    }

    #[test]
    fn update_merges_status() {
        let registry = OrderRegistry::new();
        let updated = registry
            .update(
                "order_003",
                OrderUpdate {
                    status: Some(OrderStatus::Completed),
                    ..Default::default()
                },
            )
            .unwrap();

        assert_eq!(updated.status, OrderStatus::Completed);
        assert!(registry.update("order_missing", OrderUpdate::default()).is_none());
    }
}
