use axum::{
    Json,
    extract::{Path, State},
    response::IntoResponse,
};
use chrono::Utc;
use serde::Deserialize;
use utoipa::ToSchema;
use utoipa_axum::router::OpenApiRouter;

use crate::{
    app_error::{AppError, StdResponse},
    app_state::AppState,
    models::{NewOrder, OfflineOrder, OrderItem, OrderStatus},
};

pub fn routes_with_openapi() -> OpenApiRouter<AppState> {
    utoipa_axum::router::OpenApiRouter::new().nest(
        "/order",
        OpenApiRouter::new()
            .routes(utoipa_axum::routes!(get_customer_orders))
            .routes(utoipa_axum::routes!(create_order)),
    )
}

/// Fetch all orders belonging to a customer, newest first.
#[utoipa::path(
    get,
    path = "/customer/{customer_id}",
    tags = ["Orders"],
    params(
        ("customer_id" = String, Path, description = "Customer whose orders to fetch")
    ),
    responses(
        (status = 200, description = "Customer orders", body = StdResponse<Vec<OfflineOrder>>)
    )
)]
async fn get_customer_orders(
    Path(customer_id): Path<String>,
    State(state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    Ok(StdResponse::data(
        state.orders.find_by_customer_id(&customer_id),
    ))
}

#[derive(Deserialize, ToSchema)]
struct CreateOrderItem {
    product_id: String,
    product_code: String,
    product_name: String,
    quantity: u32,
    unit_price: f64,
}

#[derive(Deserialize, ToSchema)]
struct CreateOrderReq {
    customer_id: String,
    store_id: String,
    items: Vec<CreateOrderItem>,
    #[serde(default)]
    discount: f64,
}

/// Create an offline order. Line totals and the order subtotal are
/// recomputed here from quantity and unit price; the registry stores
/// the result as-is.
#[utoipa::path(
    post,
    path = "/create",
    tags = ["Orders"],
    responses(
        (status = 200, description = "Created order", body = StdResponse<OfflineOrder>),
        (status = 400, description = "Missing required fields")
    )
)]
async fn create_order(
    State(state): State<AppState>,
    Json(req): Json<CreateOrderReq>,
) -> Result<impl IntoResponse, AppError> {
    if req.customer_id.is_empty() || req.store_id.is_empty() || req.items.is_empty() {
        return Err(AppError::Validation("Missing required fields".into()));
    }
    if req.items.iter().any(|i| i.quantity < 1) {
        return Err(AppError::Validation(
            "Item quantity must be at least 1".into(),
        ));
    }

    let items: Vec<OrderItem> = req
        .items
        .into_iter()
        .map(|i| OrderItem {
            total_price: i.quantity as f64 * i.unit_price,
            product_id: i.product_id,
            product_code: i.product_code,
            product_name: i.product_name,
            quantity: i.quantity,
            unit_price: i.unit_price,
        })
        .collect();

    let subtotal: f64 = items.iter().map(|i| i.total_price).sum();
    let total = subtotal - req.discount;

    let order = state.orders.create(NewOrder {
        customer_id: req.customer_id,
        store_id: req.store_id,
        order_date: Utc::now(),
        items,
        subtotal,
        discount: req.discount,
        total,
        status: OrderStatus::Completed,
    });

    tracing::info!(order_id = %order.id, customer_id = %order.customer_id, total = order.total, "order created");
    Ok(StdResponse::data(order))
}
