use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use super::{Account, AccountId, NewAccount, Role};
use crate::auth::{generate_session_token, hash_password, verify_password};
use crate::configuration::{JwtSettings, SecuritySettings, SeedAccount};
use crate::error::{AppError, CredentialError, StoreError, ValidationError};
use crate::store::AccountStore;
use crate::validators::{is_valid_password, is_valid_username};

const DUMMY_PASSWORD: &str = "unknown-account-placeholder";

/// Result of a successful login
#[derive(Debug, Clone)]
pub struct LoginOutcome {
    pub account: Account,
    pub token: String,
}

/// Signup, login, lookup and deletion of accounts.
///
/// Every store call is bounded by `store_timeout`. bcrypt runs on the
/// blocking pool so it never stalls a request worker.
#[derive(Clone)]
pub struct AccountService {
    store: Arc<dyn AccountStore>,
    jwt: JwtSettings,
    security: SecuritySettings,
    store_timeout: Duration,
    // Compared against on unknown usernames; built once at the configured cost.
    dummy_hash: Arc<tokio::sync::OnceCell<String>>,
}

impl AccountService {
    pub fn new(
        store: Arc<dyn AccountStore>,
        jwt: JwtSettings,
        security: SecuritySettings,
        store_timeout: Duration,
    ) -> Self {
        Self {
            store,
            jwt,
            security,
            store_timeout,
            dummy_hash: Arc::new(tokio::sync::OnceCell::new()),
        }
    }

    pub fn jwt_settings(&self) -> &JwtSettings {
        &self.jwt
    }

    /// Create an account with the given role.
    pub async fn signup(
        &self,
        username: &str,
        password: &str,
        role: Role,
    ) -> Result<Account, AppError> {
        let username = is_valid_username(username)?;
        is_valid_password(password)?;

        let password_hash = self.hash(password).await?;
        let account = NewAccount {
            username,
            password_hash,
            role,
        };

        let id = self.bounded(self.store.create_account(&account)).await?;
        let account = account.into_account(id);

        tracing::info!(account_id = id, role = %role, "Account created");
        Ok(account)
    }

    /// Public signup: the requested role must be on the configured allow-list.
    pub async fn register(
        &self,
        username: &str,
        password: &str,
        role: Role,
    ) -> Result<Account, AppError> {
        if !self.security.signup_roles.contains(&role) {
            return Err(ValidationError::RoleNotAllowed(role.to_string()).into());
        }
        self.signup(username, password, role).await
    }

    /// Check credentials and issue a session token.
    ///
    /// An unknown username and a wrong password fail identically, and both
    /// pay for one bcrypt verification.
    pub async fn login(&self, username: &str, password: &str) -> Result<LoginOutcome, AppError> {
        let username = username.trim();
        let account = match self.bounded(self.store.get_by_username(username)).await {
            Ok(account) => Some(account),
            Err(StoreError::NotFound(_)) => None,
            Err(e) => return Err(e.into()),
        };

        let hash = match &account {
            Some(account) => account.password_hash.as_str(),
            None => self.dummy_hash().await?,
        };
        let password_matches = self.verify(password, hash).await?;

        let account = match account {
            Some(account) if password_matches => account,
            _ => return Err(CredentialError::InvalidCredentials.into()),
        };

        let token = generate_session_token(account.id, account.role, &self.jwt)?;
        tracing::info!(account_id = account.id, "Account logged in");

        Ok(LoginOutcome { account, token })
    }

    pub async fn get_by_id(&self, id: AccountId) -> Result<Account, AppError> {
        Ok(self.bounded(self.store.get_by_id(id)).await?)
    }

    /// Remove an account. Unknown ids are not an error.
    pub async fn delete_by_id(&self, id: AccountId) -> Result<(), AppError> {
        self.bounded(self.store.delete_by_id(id)).await?;
        tracing::info!(account_id = id, "Account deleted");
        Ok(())
    }

    /// Create configured accounts, skipping usernames that already exist.
    pub async fn seed(&self, seeds: &[SeedAccount]) -> Result<(), AppError> {
        for seed in seeds {
            match self.signup(&seed.username, &seed.password, seed.role).await {
                Ok(account) => {
                    tracing::info!(account_id = account.id, role = %account.role, "Seeded account")
                }
                Err(AppError::Store(StoreError::DuplicateUsername(_))) => {
                    tracing::warn!(username = %seed.username, "Seed account already exists, skipping")
                }
                Err(e) => return Err(e),
            }
        }
        Ok(())
    }

    async fn bounded<T, F>(&self, call: F) -> Result<T, StoreError>
    where
        F: Future<Output = Result<T, StoreError>>,
    {
        tokio::time::timeout(self.store_timeout, call)
            .await
            .map_err(|_| StoreError::Timeout)?
    }

    async fn hash(&self, password: &str) -> Result<String, AppError> {
        let password = password.to_string();
        let cost = self.security.password_hash_cost;
        tokio::task::spawn_blocking(move || hash_password(&password, cost))
            .await
            .map_err(|e| AppError::Internal(format!("Password hashing task failed: {}", e)))?
    }

    async fn dummy_hash(&self) -> Result<&str, AppError> {
        self.dummy_hash
            .get_or_try_init(|| self.hash(DUMMY_PASSWORD))
            .await
            .map(String::as_str)
    }

    async fn verify(&self, password: &str, hash: &str) -> Result<bool, AppError> {
        let password = password.to_string();
        let hash = hash.to_string();
        tokio::task::spawn_blocking(move || verify_password(&password, &hash))
            .await
            .map_err(|e| AppError::Internal(format!("Password verification task failed: {}", e)))
    }
}
