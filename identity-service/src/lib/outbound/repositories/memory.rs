use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::Mutex;

use crate::domain::account::errors::IdentityError;
use crate::domain::account::models::Account;
use crate::domain::account::models::AccountCredentials;
use crate::domain::account::models::AccountId;
use crate::domain::account::models::EmailAddress;
use crate::domain::account::models::FederatedAssertion;
use crate::domain::account::models::NewLocalAccount;
use crate::domain::account::ports::AccountRepository;

/// Process-local account store.
///
/// Accounts are keyed by email under one lock, so the uniqueness check and the
/// insert of every write happen atomically.
#[derive(Default)]
pub struct InMemoryAccountRepository {
    accounts: Mutex<HashMap<String, Account>>,
}

impl InMemoryAccountRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.accounts.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.accounts.lock().await.is_empty()
    }
}

#[async_trait]
impl AccountRepository for InMemoryAccountRepository {
    async fn find_by_email(&self, email: &EmailAddress) -> Result<Option<Account>, IdentityError> {
        Ok(self.accounts.lock().await.get(email.as_str()).cloned())
    }

    async fn find_by_id(&self, id: &AccountId) -> Result<Option<Account>, IdentityError> {
        Ok(self
            .accounts
            .lock()
            .await
            .values()
            .find(|account| account.id == *id)
            .cloned())
    }

    async fn create_local(&self, account: NewLocalAccount) -> Result<Account, IdentityError> {
        let mut accounts = self.accounts.lock().await;

        if accounts.contains_key(account.email.as_str()) {
            return Err(IdentityError::DuplicateIdentity(
                account.email.as_str().to_string(),
            ));
        }

        let created = Account {
            id: AccountId::new(),
            email: account.email,
            full_name: account.full_name,
            credentials: AccountCredentials::Local {
                password_hash: account.password_hash,
            },
            created_at: Utc::now(),
        };
        accounts.insert(created.email.as_str().to_string(), created.clone());

        Ok(created)
    }

    async fn find_or_create_federated(
        &self,
        assertion: FederatedAssertion,
    ) -> Result<Account, IdentityError> {
        let mut accounts = self.accounts.lock().await;

        let account = accounts
            .entry(assertion.email.as_str().to_string())
            .or_insert_with(|| Account {
                id: AccountId::new(),
                email: assertion.email,
                full_name: assertion.full_name,
                credentials: AccountCredentials::Google {
                    external_id: assertion.external_id,
                    avatar_url: assertion.avatar_url,
                },
                created_at: Utc::now(),
            });

        Ok(account.clone())
    }
}
