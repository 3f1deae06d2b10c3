use axum::{Extension, Json, extract::State, response::IntoResponse};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use utoipa_axum::router::OpenApiRouter;

use crate::{
    app_error::{AppError, StdResponse},
    app_state::AppState,
    auth::{self, StaffClaims},
    middleware,
    models::StaffRole,
};

pub fn routes_with_openapi() -> OpenApiRouter<AppState> {
    utoipa_axum::router::OpenApiRouter::new().nest(
        "/auth",
        OpenApiRouter::new()
            .routes(utoipa_axum::routes!(login))
            .routes(utoipa_axum::routes!(logout))
            .merge(
                OpenApiRouter::new()
                    .routes(utoipa_axum::routes!(me))
                    .route_layer(axum::middleware::from_fn(middleware::staff_authorization)),
            ),
    )
}

#[derive(Deserialize, ToSchema)]
struct LoginReq {
    username: String,
    password: String,
}

#[derive(Serialize, ToSchema)]
struct SessionUser {
    id: String,
    username: String,
    name: String,
    role: StaffRole,
}

#[derive(Serialize, ToSchema)]
struct LoginRes {
    token: String,
    user: SessionUser,
}

/// Exchange staff credentials for a bearer token.
#[utoipa::path(
    post,
    path = "/login",
    tags = ["Auth"],
    responses(
        (status = 200, description = "Logged in successfully", body = StdResponse<LoginRes>),
        (status = 401, description = "Invalid username or password")
    )
)]
async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginReq>,
) -> Result<impl IntoResponse, AppError> {
    if req.username.is_empty() || req.password.is_empty() {
        return Err(AppError::Validation(
            "Username and password are required".into(),
        ));
    }

    let user = state
        .staff
        .find_by_username(&req.username)
        .filter(|u| state.staff.verify_password(&u.id, &req.password))
        .ok_or_else(|| AppError::Auth("Invalid username or password".into()))?;

    let token = auth::issue_token(&user.id);
    tracing::info!(staff_id = %user.id, "staff logged in");

    Ok(StdResponse::data(LoginRes {
        token,
        user: SessionUser {
            id: user.id,
            username: user.username,
            name: user.name,
            role: user.role,
        },
    }))
}

/// Server-side logout is a no-op; the client discards its token.
#[utoipa::path(
    post,
    path = "/logout",
    tags = ["Auth"],
    responses(
        (status = 200, description = "Logged out successfully", body = StdResponse<String>)
    )
)]
async fn logout() -> Result<impl IntoResponse, AppError> {
    Ok(StdResponse::<String>::message("Logged out successfully"))
}

/// Resolve the current staff user from the bearer token.
#[utoipa::path(
    get,
    path = "/me",
    tags = ["Auth"],
    security(("bearerAuth" = [])),
    responses(
        (status = 200, description = "Current staff user", body = StdResponse<SessionUser>),
        (status = 401, description = "Missing or invalid token")
    )
)]
async fn me(
    Extension(claims): Extension<StaffClaims>,
    State(state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let user = state
        .staff
        .find_by_id(&claims.staff_id)
        .ok_or_else(|| AppError::Auth("Invalid token".into()))?;

    Ok(StdResponse::data(SessionUser {
        id: user.id,
        username: user.username,
        name: user.name,
        role: user.role,
    }))
}
