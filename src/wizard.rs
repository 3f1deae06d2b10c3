//! Staff-assisted customer registration flow.
//!
//! The five-step sequence is driven through a typed draft: each
//! transition method checks the current step, applies its guard and
//! records the accumulated data. The draft crosses process boundaries
//! only through [`RegistrationDraft::stage`]/[`RegistrationDraft::restore`],
//! and nothing is submitted until the final verification step produces
//! the aggregate create-customer payload.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::models::{CustomerStatus, Gender, NewCustomer};
use crate::otp::{OtpChannel, OtpService};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RegistrationStep {
    EnterInfo,
    Review,
    Terms,
    VerifyPhone,
    VerifyEmail,
    Complete,
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum WizardError {
    #[error("expected step {expected:?}, draft is at {found:?}")]
    WrongStep {
        expected: RegistrationStep,
        found: RegistrationStep,
    },
    #[error("{0} is required")]
    MissingField(&'static str),
    #[error("terms must be scrolled to the bottom before accepting")]
    TermsNotRead,
    #[error("terms must be accepted")]
    TermsNotAccepted,
    #[error("data processing consent is required")]
    ConsentRequired,
    #[error("invalid OTP code")]
    InvalidOtp,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CustomerInfo {
    pub first_name: String,
    pub last_name: String,
    pub phone: String,
    pub email: Option<String>,
    pub dob: Option<NaiveDate>,
    pub gender: Option<Gender>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct TermsDecision {
    pub scrolled_to_bottom: bool,
    pub terms_accepted: bool,
    pub data_processing_consent: bool,
    pub marketing_consent: bool,
}

/// Staged registration data: customer-provided fields held by the
/// client, uncommitted until final verification.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegistrationDraft {
    step: RegistrationStep,
    info: Option<CustomerInfo>,
    terms: Option<TermsDecision>,
    phone_verified: bool,
    email_verified: bool,
}

impl RegistrationDraft {
    pub fn new() -> Self {
        Self {
            step: RegistrationStep::EnterInfo,
            info: None,
            terms: None,
            phone_verified: false,
            email_verified: false,
        }
    }

    pub fn step(&self) -> RegistrationStep {
        self.step
    }

    fn expect_step(&self, expected: RegistrationStep) -> Result<(), WizardError> {
        if self.step != expected {
            return Err(WizardError::WrongStep {
                expected,
                found: self.step,
            });
        }
        Ok(())
    }

    fn info(&self) -> Result<&CustomerInfo, WizardError> {
        self.info
            .as_ref()
            .ok_or(WizardError::MissingField("customer info"))
    }

    /// EnterInfo → Review. Name parts and phone are required; an empty
    /// email is normalized away so the verify branch sees it as absent.
    pub fn submit_info(&mut self, mut info: CustomerInfo) -> Result<RegistrationStep, WizardError> {
        self.expect_step(RegistrationStep::EnterInfo)?;

        if info.first_name.trim().is_empty() {
            return Err(WizardError::MissingField("first_name"));
        }
        if info.last_name.trim().is_empty() {
            return Err(WizardError::MissingField("last_name"));
        }
        if info.phone.trim().is_empty() {
            return Err(WizardError::MissingField("phone"));
        }
        info.email = info.email.filter(|e| !e.trim().is_empty());

        self.info = Some(info);
        self.step = RegistrationStep::Review;
        Ok(self.step)
    }

    /// Review → Terms.
    pub fn confirm_review(&mut self) -> Result<RegistrationStep, WizardError> {
        self.expect_step(RegistrationStep::Review)?;
        self.info()?;
        self.step = RegistrationStep::Terms;
        Ok(self.step)
    }

    /// Terms → VerifyPhone. Requires the terms text scrolled to the
    /// bottom, the accept checkbox checked and data-processing consent.
    pub fn accept_terms(&mut self, decision: TermsDecision) -> Result<RegistrationStep, WizardError> {
        self.expect_step(RegistrationStep::Terms)?;

        if !decision.scrolled_to_bottom {
            return Err(WizardError::TermsNotRead);
        }
        if !decision.terms_accepted {
            return Err(WizardError::TermsNotAccepted);
        }
        if !decision.data_processing_consent {
            return Err(WizardError::ConsentRequired);
        }

        self.terms = Some(decision);
        self.step = RegistrationStep::VerifyPhone;
        Ok(self.step)
    }

    /// VerifyPhone → VerifyEmail when an email was supplied, otherwise
    /// straight to Complete.
    pub fn verify_phone(
        &mut self,
        otp: &str,
        otp_service: &OtpService,
    ) -> Result<RegistrationStep, WizardError> {
        self.expect_step(RegistrationStep::VerifyPhone)?;
        let info = self.info()?;

        if !otp_service.verify(OtpChannel::Phone, otp, &info.phone) {
            return Err(WizardError::InvalidOtp);
        }

        let has_email = info.email.is_some();
        self.phone_verified = true;
        self.step = if has_email {
            RegistrationStep::VerifyEmail
        } else {
            RegistrationStep::Complete
        };
        Ok(self.step)
    }

    /// VerifyEmail → Complete.
    pub fn verify_email(
        &mut self,
        otp: &str,
        otp_service: &OtpService,
    ) -> Result<RegistrationStep, WizardError> {
        self.expect_step(RegistrationStep::VerifyEmail)?;
        let email = self
            .info()?
            .email
            .clone()
            .ok_or(WizardError::MissingField("email"))?;

        if !otp_service.verify(OtpChannel::Email, otp, &email) {
            return Err(WizardError::InvalidOtp);
        }

        self.email_verified = true;
        self.step = RegistrationStep::Complete;
        Ok(self.step)
    }

    /// Serialize for client-side staging between steps.
    pub fn stage(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    pub fn restore(raw: &str) -> serde_json::Result<Self> {
        serde_json::from_str(raw)
    }

    /// The aggregate create-customer payload, available only once the
    /// flow reached Complete. Borrows the draft so a failed submission
    /// leaves the staged data intact for a manual retry.
    pub fn create_request(&self) -> Result<NewCustomer, WizardError> {
        self.expect_step(RegistrationStep::Complete)?;
        let info = self.info()?.clone();
        let terms = self.terms.ok_or(WizardError::MissingField("terms decision"))?;

        Ok(NewCustomer {
            first_name: info.first_name,
            last_name: info.last_name,
            phone: info.phone,
            email: info.email,
            dob: info.dob,
            gender: info.gender,
            image_url: None,
            terms_accepted: terms.terms_accepted,
            data_processing_consent: terms.data_processing_consent,
            marketing_consent: terms.marketing_consent,
            phone_verified: self.phone_verified,
            email_verified: self.email_verified,
            member_no: None,
            tier: None,
            status: Some(CustomerStatus::Active),
        })
    }
}

impl Default for RegistrationDraft {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn info(email: Option<&str>) -> CustomerInfo {
        CustomerInfo {
            first_name: "Nara".into(),
            last_name: "Suksawat".into(),
            phone: "0899999999".into(),
            email: email.map(Into::into),
            dob: None,
            gender: None,
        }
    }

    fn accepted_terms() -> TermsDecision {
        TermsDecision {
            scrolled_to_bottom: true,
            terms_accepted: true,
            data_processing_consent: true,
            marketing_consent: false,
        }
    }

    #[test]
    fn full_flow_with_email_passes_both_verify_steps() {
        let otp = OtpService;
        let mut draft = RegistrationDraft::new();

        assert_eq!(draft.submit_info(info(Some("a@b.example"))).unwrap(), RegistrationStep::Review);
        assert_eq!(draft.confirm_review().unwrap(), RegistrationStep::Terms);
        assert_eq!(draft.accept_terms(accepted_terms()).unwrap(), RegistrationStep::VerifyPhone);
        assert_eq!(draft.verify_phone("123456", &otp).unwrap(), RegistrationStep::VerifyEmail);
        assert_eq!(draft.verify_email("654321", &otp).unwrap(), RegistrationStep::Complete);

        let request = draft.create_request().unwrap();
        assert_eq!(request.status, Some(CustomerStatus::Active));
        assert!(request.phone_verified);
        assert!(request.email_verified);
        assert!(request.data_processing_consent);
    }

    #[test]
    fn flow_without_email_skips_email_verification() {
        let otp = OtpService;
        let mut draft = RegistrationDraft::new();

        draft.submit_info(info(None)).unwrap();
        draft.confirm_review().unwrap();
        draft.accept_terms(accepted_terms()).unwrap();
        assert_eq!(draft.verify_phone("123456", &otp).unwrap(), RegistrationStep::Complete);

        let request = draft.create_request().unwrap();
        assert!(request.phone_verified);
        assert!(!request.email_verified);
    }

    #[test]
    fn empty_email_is_treated_as_absent() {
        let otp = OtpService;
        let mut draft = RegistrationDraft::new();

        draft.submit_info(info(Some("  "))).unwrap();
        draft.confirm_review().unwrap();
        draft.accept_terms(accepted_terms()).unwrap();
        assert_eq!(draft.verify_phone("123456", &otp).unwrap(), RegistrationStep::Complete);
    }

    #[test]
    fn terms_guard_requires_scroll_consent_and_checkbox() {
        let mut draft = RegistrationDraft::new();
        draft.submit_info(info(None)).unwrap();
        draft.confirm_review().unwrap();

        let not_scrolled = TermsDecision {
            scrolled_to_bottom: false,
            ..accepted_terms()
        };
        assert_eq!(draft.accept_terms(not_scrolled), Err(WizardError::TermsNotRead));
        assert_eq!(draft.step(), RegistrationStep::Terms);

        let unchecked = TermsDecision {
            terms_accepted: false,
            ..accepted_terms()
        };
        assert_eq!(draft.accept_terms(unchecked), Err(WizardError::TermsNotAccepted));

        let no_consent = TermsDecision {
            data_processing_consent: false,
            ..accepted_terms()
        };
        assert_eq!(draft.accept_terms(no_consent), Err(WizardError::ConsentRequired));
    }

    #[test]
    fn transitions_out_of_order_are_rejected() {
        let mut draft = RegistrationDraft::new();

        assert_eq!(
            draft.confirm_review(),
            Err(WizardError::WrongStep {
                expected: RegistrationStep::Review,
                found: RegistrationStep::EnterInfo,
            })
        );
        assert!(draft.create_request().is_err());
    }

    #[test]
    fn submit_info_requires_name_and_phone() {
        let mut draft = RegistrationDraft::new();
        let mut incomplete = info(None);
        incomplete.phone = "".into();

        assert_eq!(
            draft.submit_info(incomplete),
            Err(WizardError::MissingField("phone"))
        );
        assert_eq!(draft.step(), RegistrationStep::EnterInfo);
    }

    #[test]
    fn invalid_otp_keeps_draft_on_verify_step() {
        let otp = OtpService;
        let mut draft = RegistrationDraft::new();
        draft.submit_info(info(None)).unwrap();
        draft.confirm_review().unwrap();
        draft.accept_terms(accepted_terms()).unwrap();

        assert_eq!(draft.verify_phone("12x456", &otp), Err(WizardError::InvalidOtp));
        assert_eq!(draft.step(), RegistrationStep::VerifyPhone);
    }

    #[test]
    fn staging_roundtrip_preserves_progress() {
        let mut draft = RegistrationDraft::new();
        draft.submit_info(info(Some("a@b.example"))).unwrap();
        draft.confirm_review().unwrap();

        let staged = draft.stage().unwrap();
        let restored = RegistrationDraft::restore(&staged).unwrap();

        assert_eq!(restored.step(), RegistrationStep::Terms);
    }
}
