use chrono::{Duration, Utc};
use parking_lot::RwLock;
use uuid::Uuid;

use crate::models::{CustomerPointsSummary, NewPointTransaction, PointTransaction, PointType};

pub struct PointsLedger {
    transactions: RwLock<Vec<PointTransaction>>,
}

impl PointsLedger {
    pub fn new() -> Self {
        Self {
            transactions: RwLock::new(seed_transactions()),
        }
    }

    pub fn empty() -> Self {
        Self {
            transactions: RwLock::new(Vec::new()),
        }
    }

    /// Transactions for a customer, newest first.
    pub fn find_by_customer_id(&self, customer_id: &str) -> Vec<PointTransaction> {
        let mut transactions: Vec<PointTransaction> = self
            .transactions
            .read()
            .iter()
            .filter(|t| t.customer_id == customer_id)
            .cloned()
            .collect();
        transactions.sort_by(|a, b| b.transaction_date.cmp(&a.transaction_date));
        transactions
    }

    pub fn create(&self, new: NewPointTransaction) -> PointTransaction {
        let transaction = PointTransaction {
            id: format!("pt_{}", &Uuid::new_v4().simple().to_string()[..12]),
            customer_id: new.customer_id,
            kind: new.kind,
            amount: new.amount,
            description: new.description,
            order_id: new.order_id,
            transaction_date: new.transaction_date,
            expiry_date: new.expiry_date,
            created_at: Utc::now(),
        };
        self.transactions.write().push(transaction.clone());
        transaction
    }

    /// Folds the customer's transaction history into a balance summary.
    ///
    /// Positive amounts count toward `total_earned`, and toward
    /// `available_points` only while unexpired. Batches expiring within
    /// the next 30 days accumulate into `points_expiring_soon`, with
    /// `points_expiring_date` tracking the earliest such expiry.
    /// Non-positive amounts add their magnitude to `total_used` and
    /// subtract from the available balance, which is floored at zero.
    pub fn summary(&self, customer_id: &str) -> CustomerPointsSummary {
        let now = Utc::now();
        let soon = now + Duration::days(30);

        let mut available_points: i64 = 0;
        let mut points_expiring_soon: i64 = 0;
        let mut points_expiring_date = None;
        let mut total_earned: i64 = 0;
        let mut total_used: i64 = 0;

        for transaction in self.find_by_customer_id(customer_id) {
            if transaction.amount > 0 {
                total_earned += transaction.amount;

                let unexpired = transaction.expiry_date.is_none_or(|d| d > now);
                if unexpired {
                    available_points += transaction.amount;

                    if let Some(expiry) = transaction.expiry_date {
                        if expiry < soon {
                            points_expiring_soon += transaction.amount;
                            if points_expiring_date.is_none_or(|d| expiry < d) {
                                points_expiring_date = Some(expiry);
                            }
                        }
                    }
                }
            } else {
                total_used += transaction.amount.abs();
                available_points += transaction.amount;
            }
        }

        CustomerPointsSummary {
            customer_id: customer_id.into(),
            available_points: available_points.max(0),
            points_expiring_soon,
            points_expiring_date,
            total_earned,
            total_used,
        }
    }

    pub fn reset(&self) {
        *self.transactions.write() = seed_transactions();
    }
}

impl Default for PointsLedger {
    fn default() -> Self {
        Self::new()
    }
}

fn seed_transactions() -> Vec<PointTransaction> {
    let now = Utc::now();
    vec![
        PointTransaction {
            id: "pt_001".into(),
            customer_id: "cust_001".into(),
            kind: PointType::Earned,
            amount: 120,
            description: "Purchase - Order #000001".into(),
            order_id: Some("order_001".into()),
            transaction_date: now - Duration::days(5),
            expiry_date: Some(now + Duration::days(365)),
            created_at: now - Duration::days(5),
        },
        PointTransaction {
            id: "pt_002".into(),
            customer_id: "cust_001".into(),
            kind: PointType::Promotion,
            amount: 50,
            description: "Welcome Bonus".into(),
            order_id: None,
            transaction_date: now - Duration::days(30),
            expiry_date: Some(now + Duration::days(335)),
            created_at: now - Duration::days(30),
        },
        PointTransaction {
            id: "pt_003".into(),
            customer_id: "cust_001".into(),
            kind: PointType::Used,
            amount: -30,
            description: "Redeemed - Order #000001".into(),
            order_id: Some("order_001".into()),
            transaction_date: now - Duration::days(5),
            expiry_date: None,
            created_at: now - Duration::days(5),
        },
    ]
}
