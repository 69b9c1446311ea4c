use std::fmt;

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use thiserror::Error;

use super::ApiError;
use super::ApiSuccess;
use super::AuthSessionData;
use crate::domain::account::errors::EmailError;
use crate::domain::account::errors::PasswordPolicyError;
use crate::domain::account::models::EmailAddress;
use crate::domain::account::models::Password;
use crate::domain::account::models::SignInCommand;
use crate::domain::account::ports::IdentityServicePort;
use crate::inbound::http::router::AppState;

pub async fn sign_in<IS: IdentityServicePort>(
    State(state): State<AppState<IS>>,
    Json(body): Json<SignInRequest>,
) -> Result<ApiSuccess<AuthSessionData>, ApiError> {
    state
        .identity_service
        .sign_in(body.try_into_command()?)
        .await
        .map_err(ApiError::from)
        .map(|session| ApiSuccess::new(StatusCode::OK, "Login successful", session.into()))
}

/// HTTP request body for signing in (raw JSON)
#[derive(Clone, PartialEq, Eq, Deserialize)]
pub struct SignInRequest {
    email: String,
    password: String,
}

impl fmt::Debug for SignInRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SignInRequest")
            .field("email", &self.email)
            .field("password", &"***")
            .finish()
    }
}

#[derive(Debug, Clone, Error)]
enum ParseSignInRequestError {
    #[error("Invalid email: {0}")]
    Email(#[from] EmailError),

    #[error("Invalid password: {0}")]
    Password(#[from] PasswordPolicyError),
}

impl SignInRequest {
    fn try_into_command(self) -> Result<SignInCommand, ParseSignInRequestError> {
        let email = EmailAddress::new(self.email)?;
        let password = Password::new(self.password)?;
        Ok(SignInCommand::new(email, password))
    }
}

impl From<ParseSignInRequestError> for ApiError {
    fn from(err: ParseSignInRequestError) -> Self {
        ApiError::UnprocessableEntity(err.to_string())
    }
}
