use std::sync::Arc;
use std::time::Duration;

use auth::Authenticator;
use axum::body::Body;
use axum::http::header;
use axum::http::header::InvalidHeaderValue;
use axum::http::HeaderValue;
use axum::http::Method;
use axum::http::Request;
use axum::http::Response;
use axum::middleware;
use axum::routing::get;
use axum::routing::post;
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::Span;

use super::handlers::federated_auth::federated_auth;
use super::handlers::federated_auth_url::federated_auth_url;
use super::handlers::get_current_account::get_current_account;
use super::handlers::sign_in::sign_in;
use super::handlers::sign_up::sign_up;
use super::middleware::authenticate as auth_middleware;
use crate::domain::account::ports::IdentityServicePort;

pub struct AppState<IS: IdentityServicePort> {
    pub identity_service: Arc<IS>,
    pub authenticator: Arc<Authenticator>,
}

impl<IS: IdentityServicePort> Clone for AppState<IS> {
    fn clone(&self) -> Self {
        Self {
            identity_service: Arc::clone(&self.identity_service),
            authenticator: Arc::clone(&self.authenticator),
        }
    }
}

/// CORS policy: a single credentialed origin when configured, permissive otherwise.
pub fn cors_layer(allowed_origin: Option<&str>) -> Result<CorsLayer, InvalidHeaderValue> {
    let Some(origin) = allowed_origin else {
        return Ok(CorsLayer::permissive());
    };

    Ok(CorsLayer::new()
        .allow_origin(HeaderValue::from_str(origin)?)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
        .allow_credentials(true))
}

pub fn create_router<IS: IdentityServicePort>(
    identity_service: Arc<IS>,
    authenticator: Arc<Authenticator>,
    cors: CorsLayer,
) -> Router {
    let state = AppState {
        identity_service,
        authenticator,
    };

    let public_routes = Router::new()
        .route("/auth/signin", post(sign_in::<IS>))
        .route("/auth/signup", post(sign_up::<IS>))
        .route("/auth/google", post(federated_auth::<IS>))
        .route("/auth/google/url", get(federated_auth_url::<IS>));

    let protected_routes = Router::new()
        .route("/auth/me", get(get_current_account::<IS>))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware::<IS>,
        ));

    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(|request: &Request<Body>| {
            tracing::info_span!(
                "http_request",
                method = %request.method(),
                uri = %request.uri(),
                version = ?request.version(),
            )
        })
        .on_request(|request: &Request<Body>, _span: &Span| {
            tracing::info!(
                method = %request.method(),
                uri = %request.uri(),
                "Request started"
            );
        })
        .on_response(
            |response: &Response<Body>, latency: Duration, _span: &Span| {
                tracing::info!(
                    status = response.status().as_u16(),
                    latency_ms = latency.as_millis(),
                    "Request completed"
                );
            },
        );

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .layer(trace_layer)
        .layer(cors)
        .with_state(state)
}
