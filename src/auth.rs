//! Bearer token issuance and verification for staff sessions.
//!
//! Tokens are opaque to callers: issue on login, verify into
//! [`StaffClaims`] on every authenticated request. The backing format
//! is the mock `mock_token_<staffId>_<timestamp>` scheme, not a real
//! credential system.

use axum::http::{HeaderMap, header};
use chrono::Utc;

const TOKEN_PREFIX: &str = "mock_token_";

/// Claims recovered from a verified token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StaffClaims {
    pub staff_id: String,
    pub issued_at_ms: i64,
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum TokenError {
    #[error("No token provided")]
    Missing,
    #[error("Invalid token")]
    Invalid,
}

pub fn issue_token(staff_id: &str) -> String {
    format!("{TOKEN_PREFIX}{staff_id}_{}", Utc::now().timestamp_millis())
}

/// Structural verification: prefix check plus embedded id/timestamp
/// parse. Staff ids themselves contain underscores, so the timestamp is
/// split off from the right.
pub fn verify_token(token: &str) -> Result<StaffClaims, TokenError> {
    let rest = token.strip_prefix(TOKEN_PREFIX).ok_or(TokenError::Invalid)?;
    let (staff_id, timestamp) = rest.rsplit_once('_').ok_or(TokenError::Invalid)?;
    if staff_id.is_empty() {
        return Err(TokenError::Invalid);
    }
    let issued_at_ms = timestamp.parse().map_err(|_| TokenError::Invalid)?;

    Ok(StaffClaims {
        staff_id: staff_id.to_string(),
        issued_at_ms,
    })
}

/// Extract and verify the `Authorization: Bearer` header.
pub fn claims_from_headers(headers: &HeaderMap) -> Result<StaffClaims, TokenError> {
    let header = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or(TokenError::Missing)?;
    let token = header.strip_prefix("Bearer ").ok_or(TokenError::Missing)?;
    verify_token(token)
}
