use chrono::{Duration, TimeZone, Utc};
use parking_lot::RwLock;
use uuid::Uuid;

use crate::models::{CustomerProfile, CustomerStatus, CustomerUpdate, Gender, NewCustomer, Tier};

/// Phone numbers are unique across the registry.
#[derive(Debug, thiserror::Error)]
#[error("Phone number already registered")]
pub struct DuplicatePhone;

pub struct CustomerRegistry {
    customers: RwLock<Vec<CustomerProfile>>,
}

impl CustomerRegistry {
    pub fn new() -> Self {
        Self {
            customers: RwLock::new(seed_customers()),
        }
    }

    pub fn empty() -> Self {
        Self {
            customers: RwLock::new(Vec::new()),
        }
    }

    pub fn find_by_id(&self, id: &str) -> Option<CustomerProfile> {
        self.customers.read().iter().find(|c| c.id == id).cloned()
    }

    pub fn find_by_phone(&self, phone: &str) -> Option<CustomerProfile> {
        self.customers
            .read()
            .iter()
            .find(|c| c.phone == phone)
            .cloned()
    }

    /// Case-insensitive substring match across name, phone, email and
    /// member number.
    pub fn search(&self, query: &str) -> Vec<CustomerProfile> {
        let q = query.to_lowercase();
        self.customers
            .read()
            .iter()
            .filter(|c| {
                c.first_name.to_lowercase().contains(&q)
                    || c.last_name.to_lowercase().contains(&q)
                    || c.phone.contains(&q)
                    || c.email
                        .as_deref()
                        .is_some_and(|e| e.to_lowercase().contains(&q))
                    || c.member_no.to_lowercase().contains(&q)
            })
            .cloned()
            .collect()
    }

    /// Assigns an id, derives a member number from the id suffix and
    /// fills in tier/status defaults. Rejects an already-registered
    /// phone without mutating the registry.
    pub fn create(&self, new: NewCustomer) -> Result<CustomerProfile, DuplicatePhone> {
        let mut customers = self.customers.write();
        if customers.iter().any(|c| c.phone == new.phone) {
            return Err(DuplicatePhone);
        }

        let now = Utc::now();
        let id = format!("cust_{}", &Uuid::new_v4().simple().to_string()[..12]);
        let member_no = new
            .member_no
            .unwrap_or_else(|| format!("LUM-{}", id[id.len() - 6..].to_uppercase()));

        let customer = CustomerProfile {
            id,
            first_name: new.first_name,
            last_name: new.last_name,
            phone: new.phone,
            email: new.email,
            dob: new.dob,
            gender: new.gender,
            image_url: new.image_url,
            terms_accepted: new.terms_accepted,
            data_processing_consent: new.data_processing_consent,
            marketing_consent: new.marketing_consent,
            phone_verified: new.phone_verified,
            email_verified: new.email_verified,
            member_no,
            tier: new.tier.unwrap_or(Tier::Silver),
            tier_expiry: Some(now + Duration::days(365)),
            status: new.status.unwrap_or(CustomerStatus::Pending),
            created_at: now,
            updated_at: now,
        };
        customers.push(customer.clone());
        Ok(customer)
    }

    /// Merges the supplied fields and bumps `updated_at`. A phone
    /// change is held to the same uniqueness rule as creation.
    pub fn update(
        &self,
        id: &str,
        updates: CustomerUpdate,
    ) -> Result<Option<CustomerProfile>, DuplicatePhone> {
        let mut customers = self.customers.write();
        if let Some(phone) = updates.phone.as_deref() {
            if customers.iter().any(|c| c.phone == phone && c.id != id) {
                return Err(DuplicatePhone);
            }
        }
        let Some(customer) = customers.iter_mut().find(|c| c.id == id) else {
            return Ok(None);
        };

        if let Some(v) = updates.first_name {
            customer.first_name = v;
        }
        if let Some(v) = updates.last_name {
            customer.last_name = v;
        }
        if let Some(v) = updates.phone {
            customer.phone = v;
        }
        if let Some(v) = updates.email {
            customer.email = Some(v);
        }
        if let Some(v) = updates.dob {
            customer.dob = Some(v);
        }
        if let Some(v) = updates.gender {
            customer.gender = Some(v);
        }
        if let Some(v) = updates.image_url {
            customer.image_url = Some(v);
        }
        if let Some(v) = updates.terms_accepted {
            customer.terms_accepted = v;
        }
        if let Some(v) = updates.data_processing_consent {
            customer.data_processing_consent = v;
        }
        if let Some(v) = updates.marketing_consent {
            customer.marketing_consent = v;
        }
        if let Some(v) = updates.phone_verified {
            customer.phone_verified = v;
        }
        if let Some(v) = updates.email_verified {
            customer.email_verified = v;
        }
        if let Some(v) = updates.tier {
            customer.tier = v;
        }
        if let Some(v) = updates.tier_expiry {
            customer.tier_expiry = Some(v);
        }
        if let Some(v) = updates.status {
            customer.status = v;
        }
        customer.updated_at = Utc::now();
        Ok(Some(customer.clone()))
    }

    pub fn verify_phone(&self, id: &str) -> bool {
        matches!(
            self.update(
                id,
                CustomerUpdate {
                    phone_verified: Some(true),
                    ..Default::default()
                },
            ),
            Ok(Some(_))
        )
    }

    pub fn verify_email(&self, id: &str) -> bool {
        matches!(
            self.update(
                id,
                CustomerUpdate {
                    email_verified: Some(true),
                    ..Default::default()
                },
            ),
            Ok(Some(_))
        )
    }

    pub fn activate(&self, id: &str) -> bool {
        matches!(
            self.update(
                id,
                CustomerUpdate {
                    status: Some(CustomerStatus::Active),
                    ..Default::default()
                },
            ),
            Ok(Some(_))
        )
    }

    pub fn reset(&self) {
        *self.customers.write() = seed_customers();
    }
}

impl Default for CustomerRegistry {
    fn default() -> Self {
        Self::new()
    }
}

fn seed_customers() -> Vec<CustomerProfile> {
    let seeded_at = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
    vec![
        CustomerProfile {
            id: "cust_001".into(),
            first_name: "Nara".into(),
            last_name: "Suksawat".into(),
            phone: "0812345678".into(),
            email: Some("nara@example.com".into()),
            dob: chrono::NaiveDate::from_ymd_opt(1990, 1, 15),
            gender: Some(Gender::Female),
            image_url: None,
            terms_accepted: true,
            data_processing_consent: true,
            marketing_consent: false,
            phone_verified: true,
            email_verified: true,
            member_no: "LUM-000001".into(),
            tier: Tier::Gold,
            tier_expiry: Some(Utc::now() + Duration::days(365)),
            status: CustomerStatus::Active,
            created_at: seeded_at,
            updated_at: seeded_at,
        },
        CustomerProfile {
            id: "cust_002".into(),
            first_name: "Kanya".into(),
            last_name: "Thongchai".into(),
            phone: "0823456789".into(),
            email: Some("kanya@example.com".into()),
            dob: chrono::NaiveDate::from_ymd_opt(1995, 5, 20),
            gender: Some(Gender::Female),
            image_url: None,
            terms_accepted: true,
            data_processing_consent: true,
            marketing_consent: true,
            phone_verified: true,
            email_verified: true,
            member_no: "LUM-000002".into(),
            tier: Tier::Platinum,
            tier_expiry: Some(Utc::now() + Duration::days(365)),
            status: CustomerStatus::Active,
            created_at: seeded_at + Duration::days(1),
            updated_at: seeded_at + Duration::days(1),
        },
    ]
}
