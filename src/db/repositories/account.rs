use anyhow::{Context, Result};
use argon2::{
    Algorithm, Argon2, Params, Version,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use chrono::{DateTime, SecondsFormat, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set, TransactionTrait,
};
use tokio::task;
use tracing::info;

use super::profile::upsert_with;
use crate::config::SecurityConfig;
use crate::domain::{AccountId, AccountStatus, Role};
use crate::entities::{accounts, prelude::*};
use crate::models::{Account, HealthProfile, NewAccount};

pub struct AccountRepository {
    conn: DatabaseConnection,
    security: SecurityConfig,
}

impl AccountRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection, security: SecurityConfig) -> Self {
        Self { conn, security }
    }

    fn map_model(m: accounts::Model) -> Result<Account> {
        let status = AccountStatus::parse(&m.status)
            .with_context(|| format!("Invalid status on account {}: {}", m.id, m.status))?;
        let created_at = DateTime::parse_from_rfc3339(&m.created_at)
            .with_context(|| format!("Invalid created_at on account {}", m.id))?
            .with_timezone(&Utc);

        Ok(Account {
            id: AccountId::new(m.id),
            email: m.email,
            nickname: m.nickname,
            role: Role::parse(&m.role).unwrap_or_default(),
            admin_access: m.admin_access,
            is_super_admin: m.is_super_admin,
            status,
            created_at,
        })
    }

    /// Get account by ID
    pub async fn get_by_id(&self, id: AccountId) -> Result<Option<Account>> {
        let row = Accounts::find_by_id(id.value())
            .one(&self.conn)
            .await
            .context("Failed to query account by ID")?;

        row.map(Self::map_model).transpose()
    }

    /// Get account by e-mail (trimmed, exact match)
    pub async fn get_by_email(&self, email: &str) -> Result<Option<Account>> {
        let row = Accounts::find()
            .filter(accounts::Column::Email.eq(email.trim()))
            .one(&self.conn)
            .await
            .context("Failed to query account by email")?;

        row.map(Self::map_model).transpose()
    }

    /// All accounts, newest first
    pub async fn list_all(&self) -> Result<Vec<Account>> {
        let rows = Accounts::find()
            .order_by_desc(accounts::Column::CreatedAt)
            .order_by_desc(accounts::Column::Id)
            .all(&self.conn)
            .await
            .context("Failed to list accounts")?;

        rows.into_iter().map(Self::map_model).collect()
    }

    pub async fn has_super_admin(&self) -> Result<bool> {
        let count = Accounts::find()
            .filter(accounts::Column::IsSuperAdmin.eq(true))
            .count(&self.conn)
            .await
            .context("Failed to count super-admins")?;

        Ok(count > 0)
    }

    /// Writes the mutable fields. A stored super-admin flag is never cleared.
    pub async fn update(&self, account: &Account) -> Result<()> {
        let existing = Accounts::find_by_id(account.id.value())
            .one(&self.conn)
            .await
            .context("Failed to query account for update")?
            .ok_or_else(|| anyhow::anyhow!("Account not found: {}", account.id))?;

        let is_super_admin = existing.is_super_admin || account.is_super_admin;

        let mut active: accounts::ActiveModel = existing.into();
        active.nickname = Set(account.nickname.clone());
        active.role = Set(account.role.as_str().to_string());
        active.admin_access = Set(account.admin_access);
        active.is_super_admin = Set(is_super_admin);
        active.status = Set(account.status.as_str().to_string());
        active
            .update(&self.conn)
            .await
            .context("Failed to update account")?;

        Ok(())
    }

    /// Inserts the account and its default health profile in one transaction.
    pub async fn create(&self, new_account: NewAccount) -> Result<Account> {
        let password = new_account.password;
        let security = self.security.clone();
        let password_hash = task::spawn_blocking(move || hash_password(&password, &security))
            .await
            .context("Password hashing task panicked")??;

        let now = Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true);
        let active_model = accounts::ActiveModel {
            email: Set(new_account.email.trim().to_string()),
            password_hash: Set(password_hash),
            nickname: Set(String::new()),
            role: Set(new_account.role.as_str().to_string()),
            admin_access: Set(new_account.admin_access),
            is_super_admin: Set(new_account.is_super_admin),
            status: Set(AccountStatus::Active.as_str().to_string()),
            created_at: Set(now),
            ..Default::default()
        };

        let txn = self.conn.begin().await?;

        let model = active_model
            .insert(&txn)
            .await
            .context("Failed to insert account")?;
        let account_id = AccountId::new(model.id);
        upsert_with(&txn, &HealthProfile::new_default(account_id)).await?;

        txn.commit()
            .await
            .context("Failed to commit account creation")?;

        info!("Created account {} ({})", account_id, model.email);
        Self::map_model(model)
    }

    /// Verify password for an account
    /// Note: This uses `spawn_blocking` because Argon2 hashing is CPU-intensive
    /// and would block the async runtime if run directly.
    pub async fn verify_password(&self, id: AccountId, password: &str) -> Result<bool> {
        let row = Accounts::find_by_id(id.value())
            .one(&self.conn)
            .await
            .context("Failed to query account for password verification")?;

        let Some(row) = row else {
            return Ok(false);
        };

        let password_hash = row.password_hash;
        let password = password.to_string();

        let is_valid = task::spawn_blocking(move || {
            let parsed_hash = PasswordHash::new(&password_hash)
                .map_err(|e| anyhow::anyhow!("Invalid password hash format: {e}"))?;

            Ok::<bool, anyhow::Error>(
                Argon2::default()
                    .verify_password(password.as_bytes(), &parsed_hash)
                    .is_ok(),
            )
        })
        .await
        .context("Password verification task panicked")??;

        Ok(is_valid)
    }
}

/// Hash a password using Argon2id with the configured cost parameters.
pub fn hash_password(password: &str, config: &SecurityConfig) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);

    let params = Params::new(
        config.argon2_memory_cost_kib,
        config.argon2_time_cost,
        config.argon2_parallelism,
        None,
    )
    .map_err(|e| anyhow::anyhow!("Invalid Argon2 params: {e}"))?;
    let argon2 = Argon2::new(Algorithm::Argon2id, Version::V0x13, params);

    let hash = argon2
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| anyhow::anyhow!("Failed to hash password: {e}"))?;

    Ok(hash.to_string())
}
