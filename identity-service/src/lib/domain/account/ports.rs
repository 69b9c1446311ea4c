use async_trait::async_trait;

use crate::domain::account::errors::FederationError;
use crate::domain::account::errors::IdentityError;
use crate::domain::account::models::Account;
use crate::domain::account::models::AccountId;
use crate::domain::account::models::AuthSession;
use crate::domain::account::models::EmailAddress;
use crate::domain::account::models::FederatedAssertion;
use crate::domain::account::models::FederatedAuthCommand;
use crate::domain::account::models::NewLocalAccount;
use crate::domain::account::models::SignInCommand;
use crate::domain::account::models::SignUpCommand;

/// Port for identity resolution operations.
#[async_trait]
pub trait IdentityServicePort: Send + Sync + 'static {
    /// Authenticate a local account with email and password.
    ///
    /// # Errors
    /// * `AccountNotFound` - No account uses this email
    /// * `WrongAuthMethod` - The account was created through the external provider
    /// * `InvalidCredentials` - Password does not match
    /// * `SigningMisconfigured` - No token signing secret is configured
    async fn sign_in(&self, command: SignInCommand) -> Result<AuthSession, IdentityError>;

    /// Register a local account and sign it in.
    ///
    /// # Errors
    /// * `DuplicateIdentity` - Email is already registered, by any provider
    /// * `SigningMisconfigured` - No token signing secret is configured
    async fn sign_up(&self, command: SignUpCommand) -> Result<AuthSession, IdentityError>;

    /// Exchange an authorization code and sign in the resolved account,
    /// creating it on first use.
    ///
    /// # Errors
    /// * `FederatedExchangeFailed` - The provider rejected the code or returned an unusable profile
    /// * `SigningMisconfigured` - No token signing secret is configured
    async fn federated_sign_in(
        &self,
        command: FederatedAuthCommand,
    ) -> Result<AuthSession, IdentityError>;

    /// Consent URL of the external provider.
    fn federated_authorization_url(&self) -> Result<String, IdentityError>;

    /// Retrieve an account by identifier.
    ///
    /// # Errors
    /// * `AccountNotFound` - Account does not exist
    async fn get_account(&self, id: &AccountId) -> Result<Account, IdentityError>;
}

/// Persistence boundary for accounts.
///
/// Email uniqueness is the store's responsibility; both write operations must
/// stay correct under concurrent callers using the same email.
#[async_trait]
pub trait AccountRepository: Send + Sync + 'static {
    /// Retrieve the full record, credentials included, for an email.
    ///
    /// # Returns
    /// Optional account (None if not found)
    async fn find_by_email(&self, email: &EmailAddress) -> Result<Option<Account>, IdentityError>;

    /// Retrieve an account by identifier.
    async fn find_by_id(&self, id: &AccountId) -> Result<Option<Account>, IdentityError>;

    /// Persist a new local account.
    ///
    /// # Errors
    /// * `DuplicateIdentity` - Email is already used by any account
    /// * `DatabaseError` - Database operation failed
    async fn create_local(&self, account: NewLocalAccount) -> Result<Account, IdentityError>;

    /// Return the account for the asserted email, creating a Google account if
    /// none exists. An existing account is returned unchanged.
    ///
    /// # Errors
    /// * `DatabaseError` - Database operation failed
    async fn find_or_create_federated(
        &self,
        assertion: FederatedAssertion,
    ) -> Result<Account, IdentityError>;
}

/// Client of the external OAuth2 provider.
#[async_trait]
pub trait FederatedIdentityProvider: Send + Sync + 'static {
    /// URL the front end sends the user to for consent.
    fn authorization_url(&self) -> Result<String, FederationError>;

    /// Exchange a single-use authorization code for the user's profile.
    ///
    /// # Errors
    /// * `CodeRejected` - Code is invalid, expired or already used
    /// * `ProviderUnavailable` - Provider could not be reached or failed
    /// * `MissingEmail` - Profile carries no email address
    /// * `InvalidResponse` - Provider returned an unexpected payload
    async fn exchange(&self, authorization_code: &str)
        -> Result<FederatedAssertion, FederationError>;
}
