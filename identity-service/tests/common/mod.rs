use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use auth::Authenticator;
use chrono::Duration;
use identity_service::domain::account::errors::FederationError;
use identity_service::domain::account::models::EmailAddress;
use identity_service::domain::account::models::FederatedAssertion;
use identity_service::domain::account::ports::FederatedIdentityProvider;
use identity_service::domain::account::service::IdentityService;
use identity_service::inbound::http::router::create_router;
use identity_service::outbound::repositories::InMemoryAccountRepository;
use tower_http::cors::CorsLayer;

pub const JWT_SECRET: &[u8] = b"test-secret-key-for-jwt-signing-at-least-32-bytes";

/// Provider double that knows a fixed set of authorization codes.
#[derive(Default)]
pub struct StubGoogleProvider {
    profiles: HashMap<String, FederatedAssertion>,
}

impl StubGoogleProvider {
    pub fn with_code(mut self, code: &str, email: &str, name: &str) -> Self {
        self.profiles.insert(
            code.to_string(),
            FederatedAssertion {
                email: EmailAddress::new(email.to_string()).expect("valid email"),
                full_name: Some(name.to_string()),
                external_id: Some(format!("google-{}", code)),
                avatar_url: Some(format!("https://lh3.googleusercontent.com/a/{}", code)),
            },
        );
        self
    }
}

#[async_trait]
impl FederatedIdentityProvider for StubGoogleProvider {
    fn authorization_url(&self) -> Result<String, FederationError> {
        Ok("https://accounts.google.com/o/oauth2/v2/auth?client_id=test".to_string())
    }

    async fn exchange(
        &self,
        authorization_code: &str,
    ) -> Result<FederatedAssertion, FederationError> {
        self.profiles
            .get(authorization_code)
            .cloned()
            .ok_or_else(|| FederationError::CodeRejected("invalid_grant".to_string()))
    }
}

/// Test application that spawns a real server over an in-memory store
pub struct TestApp {
    pub address: String,
    pub api_client: reqwest::Client,
    pub authenticator: Arc<Authenticator>,
    pub repository: Arc<InMemoryAccountRepository>,
}

impl TestApp {
    pub async fn spawn() -> Self {
        Self::spawn_with(JWT_SECRET, StubGoogleProvider::default()).await
    }

    /// Spawn the application in a background task with the given signing secret and provider
    pub async fn spawn_with(secret: &[u8], provider: StubGoogleProvider) -> Self {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind random port");
        let port = listener.local_addr().unwrap().port();
        let address = format!("http://127.0.0.1:{}", port);

        let repository = Arc::new(InMemoryAccountRepository::new());
        let authenticator = Arc::new(Authenticator::new(secret, Duration::hours(24)));
        let identity_service = Arc::new(IdentityService::new(
            Arc::clone(&repository),
            Arc::new(provider),
            Arc::clone(&authenticator),
        ));

        let router = create_router(
            identity_service,
            Arc::clone(&authenticator),
            CorsLayer::permissive(),
        );

        tokio::spawn(async move {
            axum::serve(listener, router).await.expect("Server error");
        });

        Self {
            address,
            api_client: reqwest::Client::new(),
            authenticator,
            repository,
        }
    }

    pub fn get(&self, path: &str) -> reqwest::RequestBuilder {
        self.api_client.get(format!("{}{}", self.address, path))
    }

    pub fn post(&self, path: &str) -> reqwest::RequestBuilder {
        self.api_client.post(format!("{}{}", self.address, path))
    }

    pub fn get_authenticated(&self, path: &str, token: &str) -> reqwest::RequestBuilder {
        self.get(path).bearer_auth(token)
    }

    /// Subject of a token issued by this app
    pub fn token_subject(&self, token: &str) -> String {
        self.authenticator
            .validate_token(token)
            .expect("token should validate")
            .sub
            .expect("token should carry a subject")
    }
}
