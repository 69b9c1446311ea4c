use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;

use super::ApiError;
use super::ApiSuccess;
use super::AuthSessionData;
use crate::domain::account::models::FederatedAuthCommand;
use crate::domain::account::ports::IdentityServicePort;
use crate::inbound::http::router::AppState;

pub async fn federated_auth<IS: IdentityServicePort>(
    State(state): State<AppState<IS>>,
    Json(body): Json<FederatedAuthRequest>,
) -> Result<ApiSuccess<AuthSessionData>, ApiError> {
    if body.code.trim().is_empty() {
        return Err(ApiError::UnprocessableEntity(
            "Authorization code must not be empty".to_string(),
        ));
    }

    state
        .identity_service
        .federated_sign_in(FederatedAuthCommand::new(body.code))
        .await
        .map_err(ApiError::from)
        .map(|session| ApiSuccess::new(StatusCode::OK, "Login successful", session.into()))
}

/// HTTP request body carrying the provider's authorization code
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct FederatedAuthRequest {
    code: String,
}
