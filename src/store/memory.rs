use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;

use super::AccountStore;
use crate::account::{Account, AccountId, NewAccount};
use crate::error::StoreError;

#[derive(Default)]
struct Inner {
    accounts: HashMap<AccountId, Account>,
    last_id: AccountId,
}

/// Process-local account store. Ids start at 1 and are never handed out twice.
#[derive(Default)]
pub struct InMemoryStore {
    inner: RwLock<Inner>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl AccountStore for InMemoryStore {
    async fn create_account(&self, account: &NewAccount) -> Result<AccountId, StoreError> {
        let mut inner = self.inner.write().await;

        if inner
            .accounts
            .values()
            .any(|existing| existing.username == account.username)
        {
            return Err(StoreError::DuplicateUsername(account.username.clone()));
        }

        let id = inner
            .last_id
            .checked_add(1)
            .ok_or_else(|| StoreError::Backend("account id space exhausted".to_string()))?;
        inner.last_id = id;
        inner.accounts.insert(id, account.clone().into_account(id));

        Ok(id)
    }

    async fn get_by_id(&self, id: AccountId) -> Result<Account, StoreError> {
        self.inner
            .read()
            .await
            .accounts
            .get(&id)
            .cloned()
            .ok_or_else(|| StoreError::account_not_found(id))
    }

    async fn get_by_username(&self, username: &str) -> Result<Account, StoreError> {
        self.inner
            .read()
            .await
            .accounts
            .values()
            .find(|account| account.username == username)
            .cloned()
            .ok_or_else(|| StoreError::username_not_found(username))
    }

    async fn delete_by_id(&self, id: AccountId) -> Result<(), StoreError> {
        self.inner.write().await.accounts.remove(&id);
        Ok(())
    }
}
