use axum::{extract::Request, middleware::Next, response::Response};

use crate::{app_error::AppError, auth};

/// Verifies the bearer token and injects [`auth::StaffClaims`] as a
/// request extension for downstream handlers.
pub async fn staff_authorization(mut req: Request, next: Next) -> Result<Response, AppError> {
    let claims =
        auth::claims_from_headers(req.headers()).map_err(|e| AppError::Auth(e.to_string()))?;
    req.extensions_mut().insert(claims);
    Ok(next.run(req).await)
}
