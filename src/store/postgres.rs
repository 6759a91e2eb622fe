use async_trait::async_trait;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;

use super::AccountStore;
use crate::account::{Account, AccountId, NewAccount, Role};
use crate::configuration::DatabaseSettings;
use crate::error::StoreError;

type AccountRow = (i32, String, String, String);

/// Account store backed by the `account` table.
#[derive(Clone)]
pub struct PostgresStore {
    pool: PgPool,
}

impl PostgresStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Open a pool and make sure the database answers.
    pub async fn connect(config: &DatabaseSettings) -> Result<Self, sqlx::Error> {
        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(config.query_timeout())
            .connect(&config.connection_string())
            .await?;
        Ok(Self::new(pool))
    }

    /// Create the `account` table if it does not exist yet.
    pub async fn migrate(&self) -> Result<(), sqlx::migrate::MigrateError> {
        sqlx::migrate!("./migrations").run(&self.pool).await
    }
}

fn into_account(row: AccountRow) -> Result<Account, StoreError> {
    let (id, username, password_hash, user_type) = row;
    let role = user_type.parse::<Role>().map_err(StoreError::Backend)?;
    Ok(Account {
        id,
        username,
        password_hash,
        role,
    })
}

#[async_trait]
impl AccountStore for PostgresStore {
    async fn create_account(&self, account: &NewAccount) -> Result<AccountId, StoreError> {
        let id = sqlx::query_scalar::<_, i32>(
            r#"
            INSERT INTO account (user_name, encrypted_password, user_type)
            VALUES ($1, $2, $3)
            RETURNING id
            "#,
        )
        .bind(&account.username)
        .bind(&account.password_hash)
        .bind(account.role.as_str())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match StoreError::from(e) {
            StoreError::DuplicateUsername(_) => {
                StoreError::DuplicateUsername(account.username.clone())
            }
            other => other,
        })?;

        Ok(id)
    }

    async fn get_by_id(&self, id: AccountId) -> Result<Account, StoreError> {
        let row = sqlx::query_as::<_, AccountRow>(
            "SELECT id, user_name, encrypted_password, user_type FROM account WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| StoreError::account_not_found(id))?;

        into_account(row)
    }

    async fn get_by_username(&self, username: &str) -> Result<Account, StoreError> {
        let row = sqlx::query_as::<_, AccountRow>(
            "SELECT id, user_name, encrypted_password, user_type FROM account WHERE user_name = $1",
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| StoreError::username_not_found(username))?;

        into_account(row)
    }

    async fn delete_by_id(&self, id: AccountId) -> Result<(), StoreError> {
        sqlx::query("DELETE FROM account WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}
