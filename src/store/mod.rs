/// Account storage
///
/// The account service only talks to `AccountStore`. Postgres backs the
/// running service; the in-memory store backs tests and local runs.

mod memory;
mod postgres;

pub use memory::InMemoryStore;
pub use postgres::PostgresStore;

use async_trait::async_trait;

use crate::account::{Account, AccountId, NewAccount};
use crate::error::StoreError;

#[async_trait]
pub trait AccountStore: Send + Sync {
    /// Persist a new account and return its assigned id.
    /// A taken username yields `StoreError::DuplicateUsername`.
    async fn create_account(&self, account: &NewAccount) -> Result<AccountId, StoreError>;

    async fn get_by_id(&self, id: AccountId) -> Result<Account, StoreError>;

    async fn get_by_username(&self, username: &str) -> Result<Account, StoreError>;

    /// Deleting an id that does not exist is not an error.
    async fn delete_by_id(&self, id: AccountId) -> Result<(), StoreError>;
}
