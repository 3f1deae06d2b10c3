use axum::{
    Json,
    extract::{Path, Query, State},
    response::IntoResponse,
};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use utoipa_axum::router::OpenApiRouter;

use crate::{
    app_error::{AppError, StdResponse},
    app_state::AppState,
    models::{
        CustomerPointsSummary, CustomerProfile, CustomerStatus, CustomerUpdate, Gender,
        NewCustomer, PointTransaction,
    },
};

pub fn routes_with_openapi() -> OpenApiRouter<AppState> {
    utoipa_axum::router::OpenApiRouter::new().nest(
        "/customer",
        OpenApiRouter::new()
            .routes(utoipa_axum::routes!(search_customers))
            .routes(utoipa_axum::routes!(create_customer))
            .routes(utoipa_axum::routes!(register_customer))
            .routes(utoipa_axum::routes!(accept_terms))
            .routes(utoipa_axum::routes!(get_customer, update_customer))
            .routes(utoipa_axum::routes!(get_points_summary))
            .routes(utoipa_axum::routes!(get_points_history)),
    )
}

#[derive(Deserialize)]
struct SearchParams {
    q: Option<String>,
}

/// Case-insensitive substring search across name, phone, email and
/// member number.
#[utoipa::path(
    get,
    path = "/search",
    tags = ["Customers"],
    params(
        ("q" = Option<String>, Query, description = "Substring to match")
    ),
    responses(
        (status = 200, description = "Matching customers", body = StdResponse<Vec<CustomerProfile>>)
    )
)]
async fn search_customers(
    Query(params): Query<SearchParams>,
    State(state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let query = params.q.unwrap_or_default();
    let query = query.trim();
    if query.is_empty() {
        return Err(AppError::Validation("Search query is required".into()));
    }

    Ok(StdResponse::data(state.customers.search(query)))
}

/// Fetch a customer profile.
#[utoipa::path(
    get,
    path = "/{id}",
    tags = ["Customers"],
    params(
        ("id" = String, Path, description = "Customer ID to fetch")
    ),
    responses(
        (status = 200, description = "Customer profile", body = StdResponse<CustomerProfile>),
        (status = 404, description = "Customer not found")
    )
)]
async fn get_customer(
    Path(id): Path<String>,
    State(state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let customer = state.customers.find_by_id(&id).ok_or(AppError::NotFound)?;
    Ok(StdResponse::data(customer))
}

/// Merge profile fields into an existing customer.
#[utoipa::path(
    patch,
    path = "/{id}",
    tags = ["Customers"],
    params(
        ("id" = String, Path, description = "Customer ID to update")
    ),
    responses(
        (status = 200, description = "Updated customer", body = StdResponse<CustomerProfile>),
        (status = 400, description = "Phone already registered to another customer"),
        (status = 404, description = "Customer not found")
    )
)]
async fn update_customer(
    Path(id): Path<String>,
    State(state): State<AppState>,
    Json(updates): Json<CustomerUpdate>,
) -> Result<impl IntoResponse, AppError> {
    let customer = state
        .customers
        .update(&id, updates)
        .map_err(|e| AppError::Validation(e.to_string()))?
        .ok_or(AppError::NotFound)?;
    Ok(StdResponse::data(customer))
}

#[derive(Deserialize, ToSchema)]
struct CreateCustomerReq {
    first_name: String,
    last_name: String,
    phone: String,
    email: Option<String>,
    dob: Option<NaiveDate>,
    gender: Option<Gender>,
    #[serde(default)]
    terms_accepted: bool,
    #[serde(default)]
    data_processing_consent: bool,
    #[serde(default)]
    marketing_consent: bool,
    #[serde(default)]
    phone_verified: bool,
    #[serde(default)]
    email_verified: bool,
}

/// Create a customer from the full registration payload. The wizard
/// submits this once the OTP step succeeded, so the customer is
/// created active.
#[utoipa::path(
    post,
    path = "/create",
    tags = ["Customers"],
    responses(
        (status = 200, description = "Created customer", body = StdResponse<CustomerProfile>),
        (status = 400, description = "Missing fields or phone already registered")
    )
)]
async fn create_customer(
    State(state): State<AppState>,
    Json(req): Json<CreateCustomerReq>,
) -> Result<impl IntoResponse, AppError> {
    if req.first_name.trim().is_empty()
        || req.last_name.trim().is_empty()
        || req.phone.trim().is_empty()
    {
        return Err(AppError::Validation("Missing required fields".into()));
    }

    let customer = state
        .customers
        .create(NewCustomer {
            first_name: req.first_name,
            last_name: req.last_name,
            phone: req.phone,
            email: req.email,
            dob: req.dob,
            gender: req.gender,
            image_url: None,
            terms_accepted: req.terms_accepted,
            data_processing_consent: req.data_processing_consent,
            marketing_consent: req.marketing_consent,
            phone_verified: req.phone_verified,
            email_verified: req.email_verified,
            member_no: None,
            tier: None,
            status: Some(CustomerStatus::Active),
        })
        .map_err(|e| AppError::Validation(e.to_string()))?;

    tracing::info!(customer_id = %customer.id, member_no = %customer.member_no, "customer created");
    Ok(StdResponse::data(customer))
}

#[derive(Deserialize, ToSchema)]
struct RegisterReq {
    customer_id: String,
    terms_accepted: Option<bool>,
    data_processing_consent: Option<bool>,
    marketing_consent: Option<bool>,
}

#[derive(Serialize, ToSchema)]
struct RegisterRes {
    customer: CustomerProfile,
    registered_at: DateTime<Utc>,
}

/// Finalize a pending customer: record consents and flip the status to
/// active.
#[utoipa::path(
    post,
    path = "/register",
    tags = ["Customers"],
    responses(
        (status = 200, description = "Registration completed", body = StdResponse<RegisterRes>),
        (status = 404, description = "Customer not found")
    )
)]
async fn register_customer(
    State(state): State<AppState>,
    Json(req): Json<RegisterReq>,
) -> Result<impl IntoResponse, AppError> {
    if req.customer_id.is_empty() {
        return Err(AppError::Validation("Customer ID is required".into()));
    }

    let customer = state
        .customers
        .update(
            &req.customer_id,
            CustomerUpdate {
                status: Some(CustomerStatus::Active),
                terms_accepted: Some(req.terms_accepted.unwrap_or(true)),
                data_processing_consent: Some(req.data_processing_consent.unwrap_or(false)),
                marketing_consent: Some(req.marketing_consent.unwrap_or(false)),
                ..Default::default()
            },
        )
        .map_err(|e| AppError::Validation(e.to_string()))?
        .ok_or(AppError::NotFound)?;

    Ok(StdResponse::with_message(
        RegisterRes {
            customer,
            registered_at: Utc::now(),
        },
        "Registration completed successfully",
    ))
}

#[derive(Deserialize, ToSchema)]
struct AcceptTermsReq {
    customer_id: String,
    data_processing_consent: Option<bool>,
    marketing_consent: Option<bool>,
}

/// Record consent flags for an existing customer.
#[utoipa::path(
    post,
    path = "/accept_terms",
    tags = ["Customers"],
    responses(
        (status = 200, description = "Consents recorded", body = StdResponse<CustomerProfile>),
        (status = 404, description = "Customer not found")
    )
)]
async fn accept_terms(
    State(state): State<AppState>,
    Json(req): Json<AcceptTermsReq>,
) -> Result<impl IntoResponse, AppError> {
    if req.customer_id.is_empty() {
        return Err(AppError::Validation("Customer ID is required".into()));
    }

    let customer = state
        .customers
        .update(
            &req.customer_id,
            CustomerUpdate {
                terms_accepted: Some(true),
                data_processing_consent: Some(req.data_processing_consent.unwrap_or(true)),
                marketing_consent: Some(req.marketing_consent.unwrap_or(false)),
                ..Default::default()
            },
        )
        .map_err(|e| AppError::Validation(e.to_string()))?
        .ok_or(AppError::NotFound)?;

    Ok(StdResponse::data(customer))
}

/// Loyalty balance summary for a customer.
#[utoipa::path(
    get,
    path = "/{id}/points",
    tags = ["Points"],
    params(
        ("id" = String, Path, description = "Customer ID")
    ),
    responses(
        (status = 200, description = "Points summary", body = StdResponse<CustomerPointsSummary>)
    )
)]
async fn get_points_summary(
    Path(id): Path<String>,
    State(state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    Ok(StdResponse::data(state.points.summary(&id)))
}

/// Point transaction history for a customer, newest first.
#[utoipa::path(
    get,
    path = "/{id}/points/history",
    tags = ["Points"],
    params(
        ("id" = String, Path, description = "Customer ID")
    ),
    responses(
        (status = 200, description = "Point transactions", body = StdResponse<Vec<PointTransaction>>)
    )
)]
async fn get_points_history(
    Path(id): Path<String>,
    State(state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    Ok(StdResponse::data(state.points.find_by_customer_id(&id)))
}
