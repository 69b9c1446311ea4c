use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::response::Response;
use axum::Json;
use serde::Serialize;

use crate::domain::account::errors::IdentityError;
use crate::domain::account::models::AuthSession;

pub mod federated_auth;
pub mod federated_auth_url;
pub mod get_current_account;
pub mod sign_in;
pub mod sign_up;

#[derive(Debug, Clone)]
pub struct ApiSuccess<T: Serialize + PartialEq>(StatusCode, Json<ApiResponseBody<T>>);

impl<T> PartialEq for ApiSuccess<T>
where
    T: Serialize + PartialEq,
{
    fn eq(&self, other: &Self) -> bool {
        self.0 == other.0 && self.1 .0 == other.1 .0
    }
}

impl<T: Serialize + PartialEq> ApiSuccess<T> {
    pub fn new(status: StatusCode, message: &str, data: T) -> Self {
        ApiSuccess(status, Json(ApiResponseBody::new(status, message, data)))
    }
}

impl<T: Serialize + PartialEq> IntoResponse for ApiSuccess<T> {
    fn into_response(self) -> Response {
        (self.0, self.1).into_response()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    InternalServerError(String),
    UnprocessableEntity(String),
    BadRequest(String),
    NotFound(String),
    Forbidden(String),
    Unauthorized(String),
    BadGateway(String),
}

impl From<anyhow::Error> for ApiError {
    fn from(e: anyhow::Error) -> Self {
        Self::InternalServerError(e.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::InternalServerError(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
            ApiError::UnprocessableEntity(msg) => (StatusCode::UNPROCESSABLE_ENTITY, msg),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            ApiError::Forbidden(msg) => (StatusCode::FORBIDDEN, msg),
            ApiError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg),
            ApiError::BadGateway(msg) => (StatusCode::BAD_GATEWAY, msg),
        };

        (status, Json(ApiResponseBody::new_error(status, message))).into_response()
    }
}

impl From<IdentityError> for ApiError {
    fn from(err: IdentityError) -> Self {
        match err {
            IdentityError::AccountNotFound(_) => ApiError::NotFound(err.to_string()),
            IdentityError::WrongAuthMethod(_) => ApiError::BadRequest(err.to_string()),
            IdentityError::InvalidCredentials => ApiError::Unauthorized(err.to_string()),
            IdentityError::DuplicateIdentity(_) => {
                ApiError::Forbidden("User with this email already exists".to_string())
            }
            IdentityError::FederatedExchangeFailed(_) => ApiError::BadGateway(err.to_string()),
            IdentityError::SigningMisconfigured => {
                tracing::error!("Request failed: token signing secret is not configured");
                ApiError::InternalServerError("Internal server error".to_string())
            }
            IdentityError::Password(_)
            | IdentityError::Token(_)
            | IdentityError::DatabaseError(_)
            | IdentityError::Unknown(_) => {
                tracing::error!(error = %err, "Request failed");
                ApiError::InternalServerError(err.to_string())
            }
        }
    }
}

/// Response envelope shared by every route.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiResponseBody<T: Serialize + PartialEq> {
    status_code: u16,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<T>,
}

impl<T: Serialize + PartialEq> ApiResponseBody<T> {
    pub fn new(status_code: StatusCode, message: &str, data: T) -> Self {
        Self {
            status_code: status_code.as_u16(),
            message: message.to_string(),
            data: Some(data),
        }
    }
}

impl ApiResponseBody<()> {
    pub fn new_error(status_code: StatusCode, message: String) -> Self {
        Self {
            status_code: status_code.as_u16(),
            message,
            data: None,
        }
    }
}

/// Payload of every successful authentication.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthSessionData {
    pub account_id: String,
    pub token: String,
}

impl From<AuthSession> for AuthSessionData {
    fn from(session: AuthSession) -> Self {
        Self {
            account_id: session.account_id.to_string(),
            token: session.token,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::account::errors::FederationError;
    use crate::domain::account::models::AuthProvider;

    #[test]
    fn test_identity_error_status_mapping() {
        let cases = [
            (
                IdentityError::AccountNotFound("a@b.c".to_string()),
                StatusCode::NOT_FOUND,
            ),
            (
                IdentityError::WrongAuthMethod(AuthProvider::Google),
                StatusCode::BAD_REQUEST,
            ),
            (IdentityError::InvalidCredentials, StatusCode::UNAUTHORIZED),
            (
                IdentityError::DuplicateIdentity("a@b.c".to_string()),
                StatusCode::FORBIDDEN,
            ),
            (
                IdentityError::FederatedExchangeFailed(FederationError::MissingEmail),
                StatusCode::BAD_GATEWAY,
            ),
            (
                IdentityError::SigningMisconfigured,
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
            (
                IdentityError::DatabaseError("down".to_string()),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (err, expected) in cases {
            let response = ApiError::from(err).into_response();
            assert_eq!(response.status(), expected);
        }
    }

    #[test]
    fn test_error_body_omits_data() {
        let body = ApiResponseBody::new_error(StatusCode::NOT_FOUND, "gone".to_string());

        assert_eq!(
            serde_json::to_value(body).unwrap(),
            serde_json::json!({ "statusCode": 404, "message": "gone" })
        );
    }
}
