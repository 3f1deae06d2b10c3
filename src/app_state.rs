use std::sync::Arc;

use crate::otp::OtpService;
use crate::registry::{
    CustomerRegistry, OrderRegistry, PointsLedger, ProductCatalog, StaffDirectory, StoreDirectory,
};

/// Shared state handed to every route handler. Registries are
/// constructed once per process; tests build their own instance for
/// isolation.
#[derive(Clone)]
pub struct AppState {
    pub customers: Arc<CustomerRegistry>,
    pub orders: Arc<OrderRegistry>,
    pub points: Arc<PointsLedger>,
    pub staff: Arc<StaffDirectory>,
    pub products: Arc<ProductCatalog>,
    pub stores: Arc<StoreDirectory>,
    pub otp: Arc<OtpService>,
}

impl AppState {
    /// State backed by the seeded mock data.
    pub fn new() -> Self {
        Self {
            customers: Arc::new(CustomerRegistry::new()),
            orders: Arc::new(OrderRegistry::new()),
            points: Arc::new(PointsLedger::new()),
            staff: Arc::new(StaffDirectory::new()),
            products: Arc::new(ProductCatalog::new()),
            stores: Arc::new(StoreDirectory::new()),
            otp: Arc::new(OtpService),
        }
    }

    pub fn reset(&self) {
        self.customers.reset();
        self.orders.reset();
        self.points.reset();
        self.staff.reset();
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{NewPointTransaction, PointType};

    #[test]
    fn reset_restores_every_registry() {
        let state = AppState::new();
        state.points.create(NewPointTransaction {
            customer_id: "cust_001".into(),
            kind: PointType::Promotion,
            amount: 500,
            description: "Event Bonus".into(),
            order_id: None,
            transaction_date: chrono::Utc::now(),
            expiry_date: None,
        });
        state.staff.update_password("staff_001", "changed");

        state.reset();

        assert_eq!(state.points.find_by_customer_id("cust_001").len(), 3);
        assert!(state.staff.verify_password("staff_001", "password"));
    }
}
