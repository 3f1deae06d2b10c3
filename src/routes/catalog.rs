use axum::{
    extract::{Query, State},
    response::IntoResponse,
};
use serde::Deserialize;
use utoipa_axum::router::OpenApiRouter;

use crate::{
    app_error::{AppError, StdResponse},
    app_state::AppState,
    models::{Product, Store},
};

pub fn routes_with_openapi() -> OpenApiRouter<AppState> {
    utoipa_axum::router::OpenApiRouter::new()
        .nest(
            "/product",
            OpenApiRouter::new().routes(utoipa_axum::routes!(list_products)),
        )
        .nest(
            "/store",
            OpenApiRouter::new().routes(utoipa_axum::routes!(list_stores)),
        )
}

#[derive(Deserialize)]
struct ListParams {
    q: Option<String>,
}

/// Active products, optionally filtered by name/code/brand/category.
#[utoipa::path(
    get,
    path = "/list",
    tags = ["Catalog"],
    params(
        ("q" = Option<String>, Query, description = "Substring to match")
    ),
    responses(
        (status = 200, description = "Products", body = StdResponse<Vec<Product>>)
    )
)]
async fn list_products(
    Query(params): Query<ListParams>,
    State(state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let products = match params.q.as_deref().map(str::trim) {
        Some(q) if !q.is_empty() => state.products.search(q),
        _ => state.products.get_all(),
    };
    Ok(StdResponse::data(products))
}

/// Active stores, optionally filtered by name/code/address.
#[utoipa::path(
    get,
    path = "/list",
    tags = ["Catalog"],
    params(
        ("q" = Option<String>, Query, description = "Substring to match")
    ),
    responses(
        (status = 200, description = "Stores", body = StdResponse<Vec<Store>>)
    )
)]
async fn list_stores(
    Query(params): Query<ListParams>,
    State(state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let stores = match params.q.as_deref().map(str::trim) {
        Some(q) if !q.is_empty() => state.stores.search(q),
        _ => state.stores.get_all(),
    };
    Ok(StdResponse::data(stores))
}
