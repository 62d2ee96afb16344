//! Auth domain - password reset by emailed one-time code
//!
//! Responsibilities:
//! - Issue a 6-digit code, keep only its salted hash, email the plaintext
//! - Verify the code (expiry, attempt cap) and replace the credential

pub mod actions;
pub mod error;
pub mod models;
pub mod otp;

pub use actions::{
    send_password_otp, verify_password_otp, SendPasswordOtpRequest, VerifyPasswordOtpRequest,
};
pub use error::PasswordResetError;
