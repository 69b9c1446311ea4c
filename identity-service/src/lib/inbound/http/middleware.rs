use axum::extract::Request;
use axum::extract::State;
use axum::http::StatusCode;
use axum::http::{self};
use axum::middleware::Next;
use axum::response::IntoResponse;
use axum::response::Response;
use axum::Json;

use super::handlers::ApiResponseBody;
use crate::domain::account::models::AccountId;
use crate::domain::account::ports::IdentityServicePort;
use crate::inbound::http::router::AppState;

/// Extension type to store the authenticated account in request extensions
#[derive(Debug, Clone)]
pub struct AuthenticatedAccount {
    pub account_id: AccountId,
}

fn unauthorized(message: &str) -> Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(ApiResponseBody::new_error(
            StatusCode::UNAUTHORIZED,
            message.to_string(),
        )),
    )
        .into_response()
}

/// Middleware that validates bearer tokens and adds the account to request extensions
pub async fn authenticate<IS: IdentityServicePort>(
    State(state): State<AppState<IS>>,
    mut req: Request,
    next: Next,
) -> Result<Response, Response> {
    let token = extract_token_from_header(&req)?;

    let claims = state.authenticator.validate_token(token).map_err(|e| {
        tracing::warn!(error = %e, "JWT validation failed");
        unauthorized("Invalid or expired token")
    })?;

    let subject = claims.sub.as_deref().ok_or_else(|| {
        tracing::warn!("Missing 'sub' claim in token");
        unauthorized("Invalid token format")
    })?;

    let account_id = AccountId::from_string(subject).map_err(|e| {
        tracing::warn!(error = %e, "Failed to parse account ID from token");
        unauthorized("Invalid token format")
    })?;

    req.extensions_mut()
        .insert(AuthenticatedAccount { account_id });

    Ok(next.run(req).await)
}

fn extract_token_from_header(req: &Request) -> Result<&str, Response> {
    let auth_header = req
        .headers()
        .get(http::header::AUTHORIZATION)
        .ok_or_else(|| unauthorized("Authorization header is missing"))?;

    let auth_str = auth_header
        .to_str()
        .map_err(|_| unauthorized("Invalid authorization header format"))?;

    match auth_str.strip_prefix("Bearer ") {
        Some(token) if !token.trim().is_empty() => Ok(token.trim()),
        _ => Err(unauthorized("Invalid authorization header format")),
    }
}
