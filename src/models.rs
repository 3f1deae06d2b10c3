use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

// Customers

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    Silver,
    Gold,
    Platinum,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum CustomerStatus {
    Active,
    Inactive,
    Pending,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CustomerProfile {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    /// Unique across the registry.
    pub phone: String,
    pub email: Option<String>,
    pub dob: Option<NaiveDate>,
    pub gender: Option<Gender>,
    pub image_url: Option<String>,
    pub terms_accepted: bool,
    pub data_processing_consent: bool,
    pub marketing_consent: bool,
    pub phone_verified: bool,
    pub email_verified: bool,
    /// Human-readable identifier shown to staff, distinct from `id`.
    pub member_no: String,
    pub tier: Tier,
    pub tier_expiry: Option<DateTime<Utc>>,
    pub status: CustomerStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct NewCustomer {
    pub first_name: String,
    pub last_name: String,
    pub phone: String,
    pub email: Option<String>,
    pub dob: Option<NaiveDate>,
    pub gender: Option<Gender>,
    pub image_url: Option<String>,
    #[serde(default)]
    pub terms_accepted: bool,
    #[serde(default)]
    pub data_processing_consent: bool,
    #[serde(default)]
    pub marketing_consent: bool,
    #[serde(default)]
    pub phone_verified: bool,
    #[serde(default)]
    pub email_verified: bool,
    pub member_no: Option<String>,
    pub tier: Option<Tier>,
    pub status: Option<CustomerStatus>,
}

#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct CustomerUpdate {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub dob: Option<NaiveDate>,
    pub gender: Option<Gender>,
    pub image_url: Option<String>,
    pub terms_accepted: Option<bool>,
    pub data_processing_consent: Option<bool>,
    pub marketing_consent: Option<bool>,
    pub phone_verified: Option<bool>,
    pub email_verified: Option<bool>,
    pub tier: Option<Tier>,
    pub tier_expiry: Option<DateTime<Utc>>,
    pub status: Option<CustomerStatus>,
}

// Orders

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    Pending,
    Completed,
    Cancelled,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct OrderItem {
    pub product_id: String,
    pub product_code: String,
    pub product_name: String,
    pub quantity: u32,
    pub unit_price: f64,
    pub total_price: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct OfflineOrder {
    pub id: String,
    pub customer_id: String,
    pub store_id: String,
    pub order_date: DateTime<Utc>,
    pub items: Vec<OrderItem>,
    pub subtotal: f64,
    pub discount: f64,
    pub total: f64,
    pub status: OrderStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewOrder {
    pub customer_id: String,
    pub store_id: String,
    pub order_date: DateTime<Utc>,
    pub items: Vec<OrderItem>,
    pub subtotal: f64,
    pub discount: f64,
    pub total: f64,
    pub status: OrderStatus,
}

#[derive(Debug, Clone, Default)]
pub struct OrderUpdate {
    pub store_id: Option<String>,
    pub items: Option<Vec<OrderItem>>,
    pub subtotal: Option<f64>,
    pub discount: Option<f64>,
    pub total: Option<f64>,
    pub status: Option<OrderStatus>,
}

// Points

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum PointType {
    Earned,
    Used,
    Expired,
    Promotion,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PointTransaction {
    pub id: String,
    pub customer_id: String,
    #[serde(rename = "type")]
    pub kind: PointType,
    /// Positive for earned/promotion, negative for used/expired.
    pub amount: i64,
    pub description: String,
    pub order_id: Option<String>,
    pub transaction_date: DateTime<Utc>,
    pub expiry_date: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewPointTransaction {
    pub customer_id: String,
    pub kind: PointType,
    pub amount: i64,
    pub description: String,
    pub order_id: Option<String>,
    pub transaction_date: DateTime<Utc>,
    pub expiry_date: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct CustomerPointsSummary {
    pub customer_id: String,
    pub available_points: i64,
    pub points_expiring_soon: i64,
    pub points_expiring_date: Option<DateTime<Utc>>,
    pub total_earned: i64,
    pub total_used: i64,
}

// Staff

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum StaffRole {
    Staff,
    Admin,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct StaffProfile {
    pub id: String,
    pub username: String,
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub role: StaffRole,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct StaffUpdate {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
}

// Catalog

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Product {
    pub id: String,
    pub code: String,
    pub name: String,
    pub brand: String,
    pub category: String,
    pub price: f64,
    pub image_url: Option<String>,
    pub is_active: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum StoreType {
    Counter,
    Event,
    Popup,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Store {
    pub id: String,
    pub code: String,
    pub name: String,
    pub address: Option<String>,
    pub phone: Option<String>,
    #[serde(rename = "type")]
    pub store_type: StoreType,
    pub is_active: bool,
}
