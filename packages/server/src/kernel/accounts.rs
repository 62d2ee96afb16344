// Postgres implementation of BaseAccountService
//
// Credentials are stored as argon2 PHC strings.

use anyhow::Result;
use argon2::password_hash::{rand_core::OsRng, SaltString};
use argon2::{Argon2, PasswordHasher};
use async_trait::async_trait;
use sqlx::PgPool;

use super::{AccountIdentity, BaseAccountService};
use crate::domains::auth::models::Account;

#[derive(Clone)]
pub struct PostgresAccountService {
    pool: PgPool,
}

impl PostgresAccountService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Hash a password into an argon2 PHC string
pub fn hash_password(password: &str) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| anyhow::anyhow!("failed to hash password: {}", e))
}

#[async_trait]
impl BaseAccountService for PostgresAccountService {
    async fn find_by_email(&self, email: &str) -> Result<Option<AccountIdentity>> {
        Ok(Account::find_by_email(email, &self.pool)
            .await?
            .map(|account| AccountIdentity {
                uid: account.uid,
                email: account.email,
            }))
    }

    async fn update_password(&self, uid: &str, new_password: &str) -> Result<()> {
        let hash = hash_password(new_password)?;
        Account::update_password_hash(uid, &hash, &self.pool).await
    }
}
