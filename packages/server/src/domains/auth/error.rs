use thiserror::Error;

/// Why a password reset step was refused
#[derive(Debug, Error)]
pub enum PasswordResetError {
    #[error("{0}")]
    InvalidArgument(String),

    #[error("{0}")]
    NotFound(String),

    #[error("Reset code has expired. Please request a new one.")]
    Expired,

    #[error("Too many incorrect attempts. Please request a new code.")]
    TooManyAttempts,

    #[error("Invalid reset code")]
    InvalidCode,

    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl PasswordResetError {
    /// Stable category string returned to clients
    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidArgument(_) => "invalid-argument",
            Self::NotFound(_) => "not-found",
            Self::Expired => "expired",
            Self::TooManyAttempts => "too-many-attempts",
            Self::InvalidCode => "invalid-code",
            Self::Internal(_) => "internal",
        }
    }
}
