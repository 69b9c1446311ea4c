use thiserror::Error;

use crate::domain::account::models::AuthProvider;

/// Error for AccountId parsing failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AccountIdError {
    #[error("Invalid UUID format: {0}")]
    InvalidFormat(String),
}

/// Error for EmailAddress validation failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum EmailError {
    #[error("Invalid email format: {0}")]
    InvalidFormat(String),
}

/// Error for password policy violations
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PasswordPolicyError {
    #[error("Password too short: minimum {min} characters, got {actual}")]
    TooShort { min: usize, actual: usize },

    #[error("Password must contain upper, lower, number & symbol")]
    MissingCharacterClass,
}

/// Error for AuthProvider parsing failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AuthProviderError {
    #[error("Unknown auth provider: {0}")]
    Unknown(String),
}

/// Failures of the authorization-code exchange with the external provider
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum FederationError {
    #[error("Provider rejected the authorization code: {0}")]
    CodeRejected(String),

    #[error("Provider unavailable: {0}")]
    ProviderUnavailable(String),

    #[error("Provider profile has no email address")]
    MissingEmail,

    #[error("Invalid provider response: {0}")]
    InvalidResponse(String),
}

/// Top-level error for all identity operations
#[derive(Debug, Clone, Error)]
pub enum IdentityError {
    // Flow-level errors
    #[error("User not found with this email: {0}")]
    AccountNotFound(String),

    #[error(
        "This email is associated with a {0} login. Please use the corresponding provider to sign in"
    )]
    WrongAuthMethod(AuthProvider),

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("User with this email already exists: {0}")]
    DuplicateIdentity(String),

    #[error("Federated authentication failed: {0}")]
    FederatedExchangeFailed(#[from] FederationError),

    #[error("Token signing is misconfigured")]
    SigningMisconfigured,

    // Infrastructure errors
    #[error("Password error: {0}")]
    Password(String),

    #[error("Token error: {0}")]
    Token(String),

    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Unknown error: {0}")]
    Unknown(String),
}

impl From<auth::JwtError> for IdentityError {
    fn from(err: auth::JwtError) -> Self {
        match err {
            auth::JwtError::SecretNotConfigured => IdentityError::SigningMisconfigured,
            other => IdentityError::Token(other.to_string()),
        }
    }
}

impl From<auth::PasswordError> for IdentityError {
    fn from(err: auth::PasswordError) -> Self {
        IdentityError::Password(err.to_string())
    }
}

impl From<auth::AuthenticationError> for IdentityError {
    fn from(err: auth::AuthenticationError) -> Self {
        match err {
            auth::AuthenticationError::InvalidCredentials => IdentityError::InvalidCredentials,
            auth::AuthenticationError::JwtError(e) => e.into(),
        }
    }
}

impl From<anyhow::Error> for IdentityError {
    fn from(err: anyhow::Error) -> Self {
        IdentityError::Unknown(err.to_string())
    }
}
