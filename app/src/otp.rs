//! OTP gate between a waiting driver and the start of the ride.
//!
//! This is a local check, not a security boundary: the default verifier
//! accepts any four-character code.

use crate::error::{Result, ShareCabError};
use crate::status::{StatusMachine, Transition};
use crate::types::RideStatus;

pub const OTP_LENGTH: usize = 4;

pub trait OtpVerifier: Send + Sync {
    fn verify(&self, code: &str) -> bool;
}

/// Accepts any code of exactly [`OTP_LENGTH`] characters.
#[derive(Debug, Clone, Copy, Default)]
pub struct LengthCheck;

impl OtpVerifier for LengthCheck {
    fn verify(&self, code: &str) -> bool {
        code.chars().count() == OTP_LENGTH
    }
}

/// Accepts only one known code.
#[derive(Debug, Clone)]
pub struct ExpectedCode {
    code: String,
}

impl ExpectedCode {
    pub fn new(code: impl Into<String>) -> Result<Self> {
        let code = code.into();
        if code.len() != OTP_LENGTH || !code.chars().all(|c| c.is_ascii_digit()) {
            return Err(ShareCabError::Config(format!(
                "OTP must be {OTP_LENGTH} digits"
            )));
        }
        Ok(Self { code })
    }
}

impl OtpVerifier for ExpectedCode {
    fn verify(&self, code: &str) -> bool {
        code == self.code
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OtpOutcome {
    Accepted(Transition),
    Rejected,
}

/// Check `code` and start the ride on success. Rejected codes leave the
/// status as it was; calling outside `waiting` is an error.
pub fn verify_otp(
    machine: &mut StatusMachine,
    verifier: &dyn OtpVerifier,
    code: &str,
) -> Result<OtpOutcome> {
    if machine.current() != RideStatus::Waiting {
        return Err(ShareCabError::InvalidTransition {
            from: machine.current(),
            to: RideStatus::Ongoing,
        });
    }

    if !verifier.verify(code) {
        return Ok(OtpOutcome::Rejected);
    }

    machine.start_ride().map(OtpOutcome::Accepted)
}
