//! Auth domain actions - password reset by emailed one-time code

mod send_otp;
mod verify_otp;

pub use send_otp::{send_password_otp, SendPasswordOtpRequest};
pub use verify_otp::{verify_password_otp, VerifyPasswordOtpRequest};
