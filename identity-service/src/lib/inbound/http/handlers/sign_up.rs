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
use crate::domain::account::models::SignUpCommand;
use crate::domain::account::ports::IdentityServicePort;
use crate::inbound::http::router::AppState;

pub async fn sign_up<IS: IdentityServicePort>(
    State(state): State<AppState<IS>>,
    Json(body): Json<SignUpRequest>,
) -> Result<ApiSuccess<AuthSessionData>, ApiError> {
    state
        .identity_service
        .sign_up(body.try_into_command()?)
        .await
        .map_err(ApiError::from)
        .map(|session| {
            ApiSuccess::new(
                StatusCode::CREATED,
                "User created successfully",
                session.into(),
            )
        })
}

/// HTTP request body for registering a local account (raw JSON)
#[derive(Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignUpRequest {
    email: String,
    password: String,
    full_name: String,
}

impl fmt::Debug for SignUpRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SignUpRequest")
            .field("email", &self.email)
            .field("password", &"***")
            .field("full_name", &self.full_name)
            .finish()
    }
}

#[derive(Debug, Clone, Error)]
enum ParseSignUpRequestError {
    #[error("Invalid email: {0}")]
    Email(#[from] EmailError),

    #[error("Invalid password: {0}")]
    Password(#[from] PasswordPolicyError),

    #[error("Full name must not be empty")]
    EmptyFullName,
}

impl SignUpRequest {
    fn try_into_command(self) -> Result<SignUpCommand, ParseSignUpRequestError> {
        let email = EmailAddress::new(self.email)?;
        let password = Password::new(self.password)?;
        if self.full_name.trim().is_empty() {
            return Err(ParseSignUpRequestError::EmptyFullName);
        }
        Ok(SignUpCommand::new(email, password, self.full_name))
    }
}

impl From<ParseSignUpRequestError> for ApiError {
    fn from(err: ParseSignUpRequestError) -> Self {
        ApiError::UnprocessableEntity(err.to_string())
    }
}
