use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use reqwest::Response;
use reqwest::Url;
use serde::Deserialize;

use crate::config::GoogleConfig;
use crate::domain::account::errors::FederationError;
use crate::domain::account::models::EmailAddress;
use crate::domain::account::models::FederatedAssertion;
use crate::domain::account::ports::FederatedIdentityProvider;

const SCOPES: &str = "openid email profile";

/// Google OAuth2 authorization-code client.
///
/// Exchanges a code at the token endpoint, then reads the profile from the
/// userinfo endpoint with the returned access token.
pub struct GoogleIdentityClient {
    http: Client,
    client_id: String,
    client_secret: String,
    redirect_uri: String,
    auth_url: String,
    token_url: String,
    userinfo_url: String,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
}

#[derive(Debug, Deserialize)]
struct GoogleUserInfo {
    id: Option<String>,
    email: Option<String>,
    name: Option<String>,
    picture: Option<String>,
}

impl GoogleIdentityClient {
    pub fn new(config: &GoogleConfig) -> Result<Self, FederationError> {
        let http = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| FederationError::ProviderUnavailable(e.to_string()))?;

        Ok(Self {
            http,
            client_id: config.client_id.clone(),
            client_secret: config.client_secret.clone(),
            redirect_uri: config.redirect_uri.clone(),
            auth_url: config.auth_url.clone(),
            token_url: config.token_url.clone(),
            userinfo_url: config.userinfo_url.clone(),
        })
    }

    async fn request_access_token(&self, code: &str) -> Result<String, FederationError> {
        let params = [
            ("code", code),
            ("client_id", self.client_id.as_str()),
            ("client_secret", self.client_secret.as_str()),
            ("redirect_uri", self.redirect_uri.as_str()),
            ("grant_type", "authorization_code"),
        ];

        tracing::debug!("Exchanging authorization code for tokens");

        let response = self
            .http
            .post(&self.token_url)
            .form(&params)
            .send()
            .await
            .map_err(|e| FederationError::ProviderUnavailable(e.to_string()))?;

        let token = check_status(response, "token exchange")
            .await?
            .json::<TokenResponse>()
            .await
            .map_err(|e| FederationError::InvalidResponse(e.to_string()))?;

        Ok(token.access_token)
    }

    async fn fetch_profile(&self, access_token: &str) -> Result<GoogleUserInfo, FederationError> {
        let response = self
            .http
            .get(&self.userinfo_url)
            .bearer_auth(access_token)
            .send()
            .await
            .map_err(|e| FederationError::ProviderUnavailable(e.to_string()))?;

        check_status(response, "userinfo")
            .await?
            .json::<GoogleUserInfo>()
            .await
            .map_err(|e| FederationError::InvalidResponse(e.to_string()))
    }
}

/// 4xx means the code (or the token derived from it) was refused; anything
/// else unsuccessful is treated as the provider being unavailable.
async fn check_status(response: Response, step: &str) -> Result<Response, FederationError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response
        .text()
        .await
        .unwrap_or_else(|_| "Unknown error".to_string());
    tracing::error!(status = %status, step, error = %body, "Google OAuth request failed");

    let detail = format!("HTTP {}: {}", status, body);
    if status.is_client_error() {
        Err(FederationError::CodeRejected(detail))
    } else {
        Err(FederationError::ProviderUnavailable(detail))
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

#[async_trait]
impl FederatedIdentityProvider for GoogleIdentityClient {
    fn authorization_url(&self) -> Result<String, FederationError> {
        Url::parse_with_params(
            &self.auth_url,
            &[
                ("client_id", self.client_id.as_str()),
                ("redirect_uri", self.redirect_uri.as_str()),
                ("response_type", "code"),
                ("scope", SCOPES),
                ("access_type", "offline"),
            ],
        )
        .map(String::from)
        .map_err(|e| FederationError::InvalidResponse(format!("Invalid auth URL: {}", e)))
    }

    async fn exchange(
        &self,
        authorization_code: &str,
    ) -> Result<FederatedAssertion, FederationError> {
        let access_token = self.request_access_token(authorization_code).await?;
        let profile = self.fetch_profile(&access_token).await?;

        let email = non_blank(profile.email).ok_or(FederationError::MissingEmail)?;
        let email = EmailAddress::new(email)
            .map_err(|e| FederationError::InvalidResponse(e.to_string()))?;

        tracing::info!(email = %email, "Google profile retrieved");

        Ok(FederatedAssertion {
            email,
            full_name: non_blank(profile.name),
            external_id: non_blank(profile.id),
            avatar_url: non_blank(profile.picture),
        })
    }
}
