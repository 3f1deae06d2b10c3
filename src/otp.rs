//! Mock OTP delivery and verification.
//!
//! A stand-in for an external SMS/email OTP provider: sending always
//! succeeds and returns a fixed bypass code, verification accepts any
//! syntactically valid 6-digit code. No delivery, expiry or attempt
//! limiting happens here.

use rand::Rng;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// OTP code accepted in every environment during testing.
pub const TEST_BYPASS_OTP: &str = "123456";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum OtpChannel {
    Phone,
    Email,
}

/// Session reference returned to the client. The ref code is unrelated
/// to the actual OTP value.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct OtpChallenge {
    pub otp_sent: bool,
    pub ref_code: String,
    pub mock_otp: String,
}

pub struct OtpService;

impl OtpService {
    pub fn send(&self, channel: OtpChannel, destination: &str) -> OtpChallenge {
        let ref_code = rand::rng().random_range(100_000..=999_999).to_string();
        tracing::debug!(?channel, destination, ref_code, "mock OTP issued");

        OtpChallenge {
            otp_sent: true,
            ref_code,
            mock_otp: TEST_BYPASS_OTP.to_string(),
        }
    }

    pub fn verify(&self, channel: OtpChannel, otp: &str, destination: &str) -> bool {
        tracing::debug!(?channel, destination, "mock OTP verification");
        is_valid_otp_format(otp)
    }
}

pub fn is_valid_otp_format(otp: &str) -> bool {
    otp.len() == 6 && otp.bytes().all(|b| b.is_ascii_digit())
}
