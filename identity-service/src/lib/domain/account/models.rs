use std::fmt;
use std::str::FromStr;

use chrono::DateTime;
use chrono::Utc;
use uuid::Uuid;

use crate::domain::account::errors::AccountIdError;
use crate::domain::account::errors::AuthProviderError;
use crate::domain::account::errors::EmailError;
use crate::domain::account::errors::PasswordPolicyError;

/// Account aggregate entity.
///
/// One record per email address, whichever provider established it. The
/// provider-specific data lives in [`AccountCredentials`] so a federated account
/// cannot carry a password hash.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Account {
    pub id: AccountId,
    pub email: EmailAddress,
    pub full_name: Option<String>,
    pub credentials: AccountCredentials,
    pub created_at: DateTime<Utc>,
}

impl Account {
    pub fn provider(&self) -> AuthProvider {
        self.credentials.provider()
    }

    /// Stored hash for local accounts, `None` for federated ones.
    pub fn password_hash(&self) -> Option<&str> {
        match &self.credentials {
            AccountCredentials::Local { password_hash } => Some(password_hash),
            AccountCredentials::Google { .. } => None,
        }
    }

    pub fn avatar_url(&self) -> Option<&str> {
        match &self.credentials {
            AccountCredentials::Local { .. } => None,
            AccountCredentials::Google { avatar_url, .. } => avatar_url.as_deref(),
        }
    }
}

/// How an account authenticates, fixed at creation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AccountCredentials {
    Local {
        password_hash: String,
    },
    Google {
        external_id: Option<String>,
        avatar_url: Option<String>,
    },
}

impl AccountCredentials {
    pub fn provider(&self) -> AuthProvider {
        match self {
            AccountCredentials::Local { .. } => AuthProvider::Local,
            AccountCredentials::Google { .. } => AuthProvider::Google,
        }
    }
}

/// Provider discriminant as persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AuthProvider {
    Local,
    Google,
}

impl AuthProvider {
    pub fn as_str(&self) -> &'static str {
        match self {
            AuthProvider::Local => "LOCAL",
            AuthProvider::Google => "GOOGLE",
        }
    }
}

impl fmt::Display for AuthProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AuthProvider {
    type Err = AuthProviderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "LOCAL" => Ok(AuthProvider::Local),
            "GOOGLE" => Ok(AuthProvider::Google),
            other => Err(AuthProviderError::Unknown(other.to_string())),
        }
    }
}

/// Account unique identifier type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AccountId(pub Uuid);

impl AccountId {
    /// Generate a new random account ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Parse an account ID from string.
    ///
    /// # Errors
    /// * `InvalidFormat` - String is not a valid UUID
    pub fn from_string(s: &str) -> Result<Self, AccountIdError> {
        Uuid::parse_str(s)
            .map(AccountId)
            .map_err(|e| AccountIdError::InvalidFormat(e.to_string()))
    }
}

impl Default for AccountId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Email address type
///
/// Validates email format using RFC 5322 compliant parser. Stored and compared
/// exactly as given.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EmailAddress(String);

impl EmailAddress {
    /// Create a new validated email address.
    ///
    /// # Errors
    /// * `InvalidFormat` - Email does not conform to RFC 5322
    pub fn new(email: String) -> Result<Self, EmailError> {
        email_address::EmailAddress::from_str(&email)
            .map(|_| EmailAddress(email))
            .map_err(|e| EmailError::InvalidFormat(e.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EmailAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Plaintext password accepted by the password policy.
///
/// At least six characters with an uppercase letter, a lowercase letter, a digit
/// and a symbol. Never printed by `Debug`.
#[derive(Clone, PartialEq, Eq)]
pub struct Password(String);

impl Password {
    const MIN_LENGTH: usize = 6;

    /// # Errors
    /// * `TooShort` - Fewer than 6 characters
    /// * `MissingCharacterClass` - Lacks one of upper, lower, digit or symbol
    pub fn new(password: String) -> Result<Self, PasswordPolicyError> {
        let length = password.chars().count();
        if length < Self::MIN_LENGTH {
            return Err(PasswordPolicyError::TooShort {
                min: Self::MIN_LENGTH,
                actual: length,
            });
        }

        let has_lower = password.chars().any(|c| c.is_ascii_lowercase());
        let has_upper = password.chars().any(|c| c.is_ascii_uppercase());
        let has_digit = password.chars().any(|c| c.is_ascii_digit());
        let has_symbol = password.chars().any(|c| !c.is_ascii_alphanumeric());

        if has_lower && has_upper && has_digit && has_symbol {
            Ok(Self(password))
        } else {
            Err(PasswordPolicyError::MissingCharacterClass)
        }
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Password {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Password(***)")
    }
}

/// Identity assertion returned by the external provider after a code exchange.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FederatedAssertion {
    pub email: EmailAddress,
    pub full_name: Option<String>,
    pub external_id: Option<String>,
    pub avatar_url: Option<String>,
}

/// Fields of a local account about to be persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewLocalAccount {
    pub email: EmailAddress,
    pub password_hash: String,
    pub full_name: Option<String>,
}

/// Command to sign in with email and password
#[derive(Debug)]
pub struct SignInCommand {
    pub email: EmailAddress,
    pub password: Password,
}

impl SignInCommand {
    pub fn new(email: EmailAddress, password: Password) -> Self {
        Self { email, password }
    }
}

/// Command to register a local account
#[derive(Debug)]
pub struct SignUpCommand {
    pub email: EmailAddress,
    pub password: Password,
    pub full_name: String,
}

impl SignUpCommand {
    pub fn new(email: EmailAddress, password: Password, full_name: String) -> Self {
        Self {
            email,
            password,
            full_name,
        }
    }
}

/// Command to sign in (or up) through the external provider
#[derive(Debug)]
pub struct FederatedAuthCommand {
    pub authorization_code: String,
}

impl FederatedAuthCommand {
    pub fn new(authorization_code: String) -> Self {
        Self { authorization_code }
    }
}

/// Outcome of every successful flow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthSession {
    pub account_id: AccountId,
    pub token: String,
}
