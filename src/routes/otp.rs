use axum::{Json, extract::State, response::IntoResponse};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use utoipa_axum::router::OpenApiRouter;

use crate::{
    app_error::{AppError, StdResponse},
    app_state::AppState,
    otp::{self, OtpChallenge, OtpChannel},
};

pub fn routes_with_openapi() -> OpenApiRouter<AppState> {
    utoipa_axum::router::OpenApiRouter::new().nest(
        "/otp",
        OpenApiRouter::new()
            .routes(utoipa_axum::routes!(send_otp))
            .routes(utoipa_axum::routes!(verify_otp)),
    )
}

#[derive(Deserialize, ToSchema)]
struct SendOtpReq {
    #[serde(rename = "type")]
    channel: OtpChannel,
    phone: Option<String>,
    email: Option<String>,
}

fn destination(
    channel: OtpChannel,
    phone: Option<&str>,
    email: Option<&str>,
) -> Result<String, AppError> {
    let destination = match channel {
        OtpChannel::Phone => phone,
        OtpChannel::Email => email,
    };
    destination
        .filter(|d| !d.is_empty())
        .map(Into::into)
        .ok_or_else(|| AppError::Validation("Missing required fields".into()))
}

/// Issue a mock OTP challenge. Always succeeds and returns the fixed
/// testing bypass code alongside the ref code.
#[utoipa::path(
    post,
    path = "/send",
    tags = ["OTP"],
    responses(
        (status = 200, description = "OTP sent", body = StdResponse<OtpChallenge>),
        (status = 400, description = "Missing destination for the requested channel")
    )
)]
async fn send_otp(
    State(state): State<AppState>,
    Json(req): Json<SendOtpReq>,
) -> Result<impl IntoResponse, AppError> {
    let destination = destination(req.channel, req.phone.as_deref(), req.email.as_deref())?;
    let challenge = state.otp.send(req.channel, &destination);

    let message = match req.channel {
        // Last four characters, not bytes; phone numbers can carry
        // non-ASCII text.
        OtpChannel::Phone => {
            let skip = destination.chars().count().saturating_sub(4);
            let tail: String = destination.chars().skip(skip).collect();
            format!("OTP sent to {tail}")
        }
        OtpChannel::Email => format!("OTP sent to {destination}"),
    };

    Ok(StdResponse::with_message(challenge, message))
}

#[derive(Deserialize, ToSchema)]
struct VerifyOtpReq {
    #[serde(rename = "type")]
    channel: OtpChannel,
    otp: String,
    phone: Option<String>,
    email: Option<String>,
}

#[derive(Serialize, ToSchema)]
struct VerifyOtpRes {
    verified: bool,
}

/// Verify an OTP code. The mock service accepts any syntactically
/// valid 6-digit code.
#[utoipa::path(
    post,
    path = "/verify",
    tags = ["OTP"],
    responses(
        (status = 200, description = "OTP verified", body = StdResponse<VerifyOtpRes>),
        (status = 400, description = "Malformed OTP or missing destination")
    )
)]
async fn verify_otp(
    State(state): State<AppState>,
    Json(req): Json<VerifyOtpReq>,
) -> Result<impl IntoResponse, AppError> {
    // Format is checked before the destination fields, matching the
    // client's expectations.
    if !otp::is_valid_otp_format(&req.otp) {
        return Err(AppError::Validation("Invalid OTP format".into()));
    }
    let destination = destination(req.channel, req.phone.as_deref(), req.email.as_deref())?;

    if !state.otp.verify(req.channel, &req.otp, &destination) {
        return Err(AppError::Validation("Invalid OTP code".into()));
    }

    Ok(StdResponse::data(VerifyOtpRes { verified: true }))
}
