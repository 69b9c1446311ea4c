use axum::extract::State;
use axum::http::StatusCode;
use serde::Serialize;

use super::ApiError;
use super::ApiSuccess;
use crate::domain::account::ports::IdentityServicePort;
use crate::inbound::http::router::AppState;

pub async fn federated_auth_url<IS: IdentityServicePort>(
    State(state): State<AppState<IS>>,
) -> Result<ApiSuccess<FederatedAuthUrlData>, ApiError> {
    let url = state.identity_service.federated_authorization_url()?;

    Ok(ApiSuccess::new(
        StatusCode::OK,
        "Authorization URL generated",
        FederatedAuthUrlData { url },
    ))
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FederatedAuthUrlData {
    pub url: String,
}
