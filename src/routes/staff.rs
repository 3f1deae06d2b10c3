use anyhow::anyhow;
use axum::{Extension, Json, extract::State, response::IntoResponse};
use serde::Deserialize;
use utoipa::ToSchema;
use utoipa_axum::router::OpenApiRouter;

use crate::{
    app_error::{AppError, StdResponse},
    app_state::AppState,
    auth::StaffClaims,
    middleware,
    models::{StaffProfile, StaffUpdate},
};

pub fn routes_with_openapi() -> OpenApiRouter<AppState> {
    utoipa_axum::router::OpenApiRouter::new().nest(
        "/staff",
        OpenApiRouter::new()
            .routes(utoipa_axum::routes!(get_profile, update_profile))
            .routes(utoipa_axum::routes!(change_password))
            .route_layer(axum::middleware::from_fn(middleware::staff_authorization)),
    )
}

/// Fetch the authenticated staff member's own profile.
#[utoipa::path(
    get,
    path = "/profile",
    tags = ["Staff"],
    security(("bearerAuth" = [])),
    responses(
        (status = 200, description = "Staff profile", body = StdResponse<StaffProfile>),
        (status = 404, description = "Staff not found")
    )
)]
async fn get_profile(
    Extension(claims): Extension<StaffClaims>,
    State(state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let profile = state
        .staff
        .find_by_id(&claims.staff_id)
        .ok_or(AppError::NotFound)?;
    Ok(StdResponse::data(profile))
}

/// Update the authenticated staff member's own profile. Username and
/// role cannot be changed.
#[utoipa::path(
    patch,
    path = "/profile",
    tags = ["Staff"],
    security(("bearerAuth" = [])),
    responses(
        (status = 200, description = "Updated staff profile", body = StdResponse<StaffProfile>),
        (status = 404, description = "Staff not found")
    )
)]
async fn update_profile(
    Extension(claims): Extension<StaffClaims>,
    State(state): State<AppState>,
    Json(updates): Json<StaffUpdate>,
) -> Result<impl IntoResponse, AppError> {
    let profile = state
        .staff
        .update(&claims.staff_id, updates)
        .ok_or(AppError::NotFound)?;
    Ok(StdResponse::data(profile))
}

#[derive(Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
struct ChangePasswordReq {
    current_password: String,
    new_password: String,
}

/// Change the authenticated staff member's password after verifying
/// the current one.
#[utoipa::path(
    post,
    path = "/change-password",
    tags = ["Staff"],
    security(("bearerAuth" = [])),
    responses(
        (status = 200, description = "Password updated", body = StdResponse<String>),
        (status = 400, description = "Wrong current password or new password too short")
    )
)]
async fn change_password(
    Extension(claims): Extension<StaffClaims>,
    State(state): State<AppState>,
    Json(req): Json<ChangePasswordReq>,
) -> Result<impl IntoResponse, AppError> {
    if req.current_password.is_empty() || req.new_password.is_empty() {
        return Err(AppError::Validation(
            "Current password and new password are required".into(),
        ));
    }
    if !state
        .staff
        .verify_password(&claims.staff_id, &req.current_password)
    {
        return Err(AppError::Validation("Current password is incorrect".into()));
    }
    if req.new_password.len() < 6 {
        return Err(AppError::Validation(
            "New password must be at least 6 characters".into(),
        ));
    }

    if !state.staff.update_password(&claims.staff_id, &req.new_password) {
        return Err(AppError::Other(anyhow!("Failed to update password")));
    }

    tracing::info!(staff_id = %claims.staff_id, "staff password updated");
    Ok(StdResponse::<String>::message("Password updated successfully"))
}
