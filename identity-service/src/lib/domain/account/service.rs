use std::sync::Arc;

use async_trait::async_trait;
use auth::AuthenticationError;
use auth::Authenticator;
use auth::JwtError;

use crate::domain::account::errors::IdentityError;
use crate::domain::account::models::Account;
use crate::domain::account::models::AccountCredentials;
use crate::domain::account::models::AccountId;
use crate::domain::account::models::AuthSession;
use crate::domain::account::models::FederatedAuthCommand;
use crate::domain::account::models::NewLocalAccount;
use crate::domain::account::models::SignInCommand;
use crate::domain::account::models::SignUpCommand;
use crate::domain::account::ports::AccountRepository;
use crate::domain::account::ports::FederatedIdentityProvider;
use crate::domain::account::ports::IdentityServicePort;

/// Domain service resolving local and federated identities to accounts.
///
/// Stateless between calls: all coordination for concurrent sign-ups happens
/// inside the repository.
pub struct IdentityService<AR, FP>
where
    AR: AccountRepository,
    FP: FederatedIdentityProvider,
{
    repository: Arc<AR>,
    federated_provider: Arc<FP>,
    authenticator: Arc<Authenticator>,
}

impl<AR, FP> IdentityService<AR, FP>
where
    AR: AccountRepository,
    FP: FederatedIdentityProvider,
{
    /// Create a new identity service with injected dependencies.
    ///
    /// # Arguments
    /// * `repository` - Account persistence implementation
    /// * `federated_provider` - External OAuth2 provider client
    /// * `authenticator` - Password hashing and token issuance
    pub fn new(
        repository: Arc<AR>,
        federated_provider: Arc<FP>,
        authenticator: Arc<Authenticator>,
    ) -> Self {
        Self {
            repository,
            federated_provider,
            authenticator,
        }
    }

    /// Flows that write an account must not run when no session can follow.
    fn ensure_signing_configured(&self) -> Result<(), IdentityError> {
        if self.authenticator.is_signing_configured() {
            return Ok(());
        }
        tracing::error!("Token signing secret is not configured; refusing to create accounts");
        Err(IdentityError::SigningMisconfigured)
    }

    fn issue_session(&self, account_id: AccountId) -> Result<AuthSession, IdentityError> {
        let token = self
            .authenticator
            .issue_token(account_id)
            .map_err(|e| token_failure(e, &account_id))?;

        Ok(AuthSession { account_id, token })
    }
}

fn token_failure(err: JwtError, account_id: &AccountId) -> IdentityError {
    if err == JwtError::SecretNotConfigured {
        tracing::error!(
            account_id = %account_id,
            "Token signing secret is not configured; no session can be issued"
        );
    } else {
        tracing::error!(account_id = %account_id, error = %err, "Token issuance failed");
    }
    err.into()
}

#[async_trait]
impl<AR, FP> IdentityServicePort for IdentityService<AR, FP>
where
    AR: AccountRepository,
    FP: FederatedIdentityProvider,
{
    async fn sign_in(&self, command: SignInCommand) -> Result<AuthSession, IdentityError> {
        let account = self
            .repository
            .find_by_email(&command.email)
            .await?
            .ok_or_else(|| IdentityError::AccountNotFound(command.email.to_string()))?;

        let password_hash = match &account.credentials {
            AccountCredentials::Local { password_hash } => password_hash,
            other => {
                tracing::info!(
                    account_id = %account.id,
                    provider = %other.provider(),
                    "Password sign-in attempted on federated account"
                );
                return Err(IdentityError::WrongAuthMethod(other.provider()));
            }
        };

        let result = self
            .authenticator
            .authenticate(command.password.expose(), password_hash, account.id)
            .map_err(|e| match e {
                AuthenticationError::InvalidCredentials => {
                    tracing::info!(account_id = %account.id, "Password mismatch on sign-in");
                    IdentityError::InvalidCredentials
                }
                AuthenticationError::JwtError(err) => token_failure(err, &account.id),
            })?;

        tracing::info!(account_id = %account.id, "Local sign-in succeeded");

        Ok(AuthSession {
            account_id: account.id,
            token: result.access_token,
        })
    }

    async fn sign_up(&self, command: SignUpCommand) -> Result<AuthSession, IdentityError> {
        self.ensure_signing_configured()?;

        let password_hash = self
            .authenticator
            .hash_password(command.password.expose())?;

        let full_name = Some(command.full_name.trim().to_string()).filter(|n| !n.is_empty());

        let account = self
            .repository
            .create_local(NewLocalAccount {
                email: command.email,
                password_hash,
                full_name,
            })
            .await
            .inspect_err(|e| {
                if let IdentityError::DuplicateIdentity(email) = e {
                    tracing::info!(email = %email, "Sign-up rejected for registered email");
                }
            })?;

        tracing::info!(account_id = %account.id, "Local account created");

        self.issue_session(account.id)
    }

    async fn federated_sign_in(
        &self,
        command: FederatedAuthCommand,
    ) -> Result<AuthSession, IdentityError> {
        self.ensure_signing_configured()?;

        let assertion = self
            .federated_provider
            .exchange(&command.authorization_code)
            .await
            .map_err(|e| {
                tracing::warn!(error = %e, "Authorization code exchange failed");
                IdentityError::FederatedExchangeFailed(e)
            })?;

        let account = self.repository.find_or_create_federated(assertion).await?;

        tracing::info!(
            account_id = %account.id,
            provider = %account.provider(),
            "Federated sign-in resolved"
        );

        self.issue_session(account.id)
    }

    fn federated_authorization_url(&self) -> Result<String, IdentityError> {
        self.federated_provider
            .authorization_url()
            .map_err(IdentityError::FederatedExchangeFailed)
    }

    async fn get_account(&self, id: &AccountId) -> Result<Account, IdentityError> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or(IdentityError::AccountNotFound(id.to_string()))
    }
}
