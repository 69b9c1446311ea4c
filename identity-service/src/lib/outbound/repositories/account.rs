use async_trait::async_trait;
use chrono::DateTime;
use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::account::errors::IdentityError;
use crate::domain::account::models::Account;
use crate::domain::account::models::AccountCredentials;
use crate::domain::account::models::AccountId;
use crate::domain::account::models::AuthProvider;
use crate::domain::account::models::EmailAddress;
use crate::domain::account::models::FederatedAssertion;
use crate::domain::account::models::NewLocalAccount;
use crate::domain::account::ports::AccountRepository;

const EMAIL_CONSTRAINT: &str = "accounts_email_key";

pub struct PostgresAccountRepository {
    pool: PgPool,
}

impl PostgresAccountRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn fetch_by_email(&self, email: &str) -> Result<Option<Account>, IdentityError> {
        sqlx::query_as::<_, AccountRow>(
            r#"
            SELECT id, email, password_hash, full_name, provider, external_id, avatar_url, created_at
            FROM accounts
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| IdentityError::DatabaseError(e.to_string()))?
        .map(Account::try_from)
        .transpose()
    }
}

#[derive(sqlx::FromRow)]
struct AccountRow {
    id: Uuid,
    email: String,
    password_hash: Option<String>,
    full_name: Option<String>,
    provider: String,
    external_id: Option<String>,
    avatar_url: Option<String>,
    created_at: DateTime<Utc>,
}

impl TryFrom<AccountRow> for Account {
    type Error = IdentityError;

    fn try_from(row: AccountRow) -> Result<Self, Self::Error> {
        let provider = row
            .provider
            .parse::<AuthProvider>()
            .map_err(|e| IdentityError::DatabaseError(e.to_string()))?;

        let credentials = match provider {
            AuthProvider::Local => AccountCredentials::Local {
                password_hash: row.password_hash.ok_or_else(|| {
                    IdentityError::DatabaseError(format!(
                        "Local account {} has no password hash",
                        row.id
                    ))
                })?,
            },
            AuthProvider::Google => AccountCredentials::Google {
                external_id: row.external_id,
                avatar_url: row.avatar_url,
            },
        };

        Ok(Account {
            id: AccountId(row.id),
            email: EmailAddress::new(row.email)
                .map_err(|e| IdentityError::DatabaseError(e.to_string()))?,
            full_name: row.full_name,
            credentials,
            created_at: row.created_at,
        })
    }
}

#[async_trait]
impl AccountRepository for PostgresAccountRepository {
    async fn find_by_email(&self, email: &EmailAddress) -> Result<Option<Account>, IdentityError> {
        self.fetch_by_email(email.as_str()).await
    }

    async fn find_by_id(&self, id: &AccountId) -> Result<Option<Account>, IdentityError> {
        sqlx::query_as::<_, AccountRow>(
            r#"
            SELECT id, email, password_hash, full_name, provider, external_id, avatar_url, created_at
            FROM accounts
            WHERE id = $1
            "#,
        )
        .bind(id.0)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| IdentityError::DatabaseError(e.to_string()))?
        .map(Account::try_from)
        .transpose()
    }

    async fn create_local(&self, account: NewLocalAccount) -> Result<Account, IdentityError> {
        let row = sqlx::query_as::<_, AccountRow>(
            r#"
            INSERT INTO accounts (id, email, password_hash, full_name, provider)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, email, password_hash, full_name, provider, external_id, avatar_url, created_at
            "#,
        )
        .bind(AccountId::new().0)
        .bind(account.email.as_str())
        .bind(&account.password_hash)
        .bind(&account.full_name)
        .bind(AuthProvider::Local.as_str())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if let Some(db_err) = e.as_database_error() {
                if db_err.is_unique_violation() && db_err.constraint() == Some(EMAIL_CONSTRAINT) {
                    return IdentityError::DuplicateIdentity(account.email.as_str().to_string());
                }
            }
            IdentityError::DatabaseError(e.to_string())
        })?;

        row.try_into()
    }

    async fn find_or_create_federated(
        &self,
        assertion: FederatedAssertion,
    ) -> Result<Account, IdentityError> {
        // ON CONFLICT waits for a concurrent inserter of the same email to commit,
        // so the follow-up SELECT (new statement, new snapshot) sees the winner.
        let inserted = sqlx::query_as::<_, AccountRow>(
            r#"
            INSERT INTO accounts (id, email, full_name, provider, external_id, avatar_url)
            VALUES ($1, $2, $3, $4, $5, $6)
            ON CONFLICT (email) DO NOTHING
            RETURNING id, email, password_hash, full_name, provider, external_id, avatar_url, created_at
            "#,
        )
        .bind(AccountId::new().0)
        .bind(assertion.email.as_str())
        .bind(&assertion.full_name)
        .bind(AuthProvider::Google.as_str())
        .bind(&assertion.external_id)
        .bind(&assertion.avatar_url)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| IdentityError::DatabaseError(e.to_string()))?;

        match inserted {
            Some(row) => row.try_into(),
            None => self
                .fetch_by_email(assertion.email.as_str())
                .await?
                .ok_or_else(|| {
                    IdentityError::DatabaseError(format!(
                        "Account for {} vanished after conflicting insert",
                        assertion.email
                    ))
                }),
        }
    }
}
