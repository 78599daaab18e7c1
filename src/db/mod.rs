use crate::config::{DatabaseConfig, SecurityConfig};
use crate::domain::{AccountId, EntryId, OnboardingStep, Role};
use crate::models::{Account, DailyLogEntry, HealthProfile, NewAccount, NewLogEntry};
use crate::store::{AccountStore, LogStore, ProfileStore, RevisionStore};
use anyhow::Result;
use chrono::NaiveDate;
use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection, Statement};
use std::path::Path;
use std::time::Duration;
use tracing::info;

pub mod migrator;
pub mod repositories;

/// SQLite-backed implementation of every store interface.
#[derive(Clone)]
pub struct Store {
    pub conn: DatabaseConnection,
    security: SecurityConfig,
}

impl Store {
    pub async fn new(db_url: &str) -> Result<Self> {
        Self::with_pool_options(db_url, 5, 1, SecurityConfig::default()).await
    }

    pub async fn connect(database: &DatabaseConfig, security: &SecurityConfig) -> Result<Self> {
        Self::with_pool_options(
            &database.url,
            database.max_connections,
            database.min_connections,
            security.clone(),
        )
        .await
    }

    pub async fn with_pool_options(
        db_url: &str,
        max_connections: u32,
        min_connections: u32,
        security: SecurityConfig,
    ) -> Result<Self> {
        use sea_orm_migration::MigratorTrait;

        if !db_url.contains(":memory:") {
            let path_str = db_url.trim_start_matches("sqlite://").trim_start_matches("sqlite:");
            let path_str = path_str.split('?').next().unwrap_or(path_str);
            if let Some(parent) = Path::new(path_str).parent() {
                tokio::fs::create_dir_all(parent).await.ok();
            }
            if !Path::new(path_str).exists() {
                std::fs::File::create(path_str)?;
            }
        }

        let mut opt = ConnectOptions::new(db_url.to_string());
        opt.max_connections(max_connections)
            .min_connections(min_connections)
            .connect_timeout(Duration::from_secs(10))
            .acquire_timeout(Duration::from_secs(10))
            .idle_timeout(Duration::from_secs(300))
            .max_lifetime(Duration::from_secs(600))
            .sqlx_logging(false);

        let conn = Database::connect(opt).await?;

        migrator::Migrator::up(&conn, None).await?;

        info!(
            "Database connected & migrations applied (pool: {}-{})",
            min_connections, max_connections
        );

        Ok(Self { conn, security })
    }

    pub async fn ping(&self) -> Result<()> {
        let backend = self.conn.get_database_backend();
        self.conn
            .query_one(Statement::from_string(backend, "SELECT 1".to_string()))
            .await?;
        Ok(())
    }

    fn account_repo(&self) -> repositories::account::AccountRepository {
        repositories::account::AccountRepository::new(self.conn.clone(), self.security.clone())
    }

    fn profile_repo(&self) -> repositories::profile::ProfileRepository {
        repositories::profile::ProfileRepository::new(self.conn.clone())
    }

    fn log_repo(&self) -> repositories::log_entry::LogEntryRepository {
        repositories::log_entry::LogEntryRepository::new(self.conn.clone())
    }

    /// Seeds the super-admin unless one already exists.
    ///
    /// An existing account with the seed e-mail is promoted instead of
    /// duplicated. Returns the account that was created or promoted.
    pub async fn ensure_super_admin(&self, email: &str, password: &str) -> Result<Option<Account>> {
        let repo = self.account_repo();
        if repo.has_super_admin().await? {
            return Ok(None);
        }

        let account = if let Some(mut existing) = repo.get_by_email(email).await? {
            existing.role = Role::Admin;
            existing.admin_access = true;
            existing.is_super_admin = true;
            repo.update(&existing).await?;
            existing
        } else {
            repo.create(NewAccount::super_admin(email, password)).await?
        };

        info!("Seeded super-admin account {}", account.id);
        Ok(Some(account))
    }
}

// ========== Profile Repository Methods ==========

#[async_trait::async_trait]
impl ProfileStore for Store {
    async fn load_profile(&self, account_id: AccountId) -> Result<Option<HealthProfile>> {
        self.profile_repo().get(account_id).await
    }

    async fn save_profile(&self, profile: &HealthProfile) -> Result<()> {
        self.profile_repo().upsert(profile).await
    }

    async fn set_onboarding_step(&self, account_id: AccountId, step: OnboardingStep) -> Result<()> {
        self.profile_repo().set_step(account_id, step).await
    }

    async fn mark_onboarding_complete(&self, account_id: AccountId) -> Result<()> {
        self.profile_repo().mark_complete(account_id).await
    }
}

// ========== Log Repository Methods ==========

#[async_trait::async_trait]
impl LogStore for Store {
    async fn delete_all_entries(&self, account_id: AccountId) -> Result<u64> {
        self.log_repo().delete_all(account_id).await
    }

    async fn insert_entry(
        &self,
        account_id: AccountId,
        entry: &NewLogEntry,
    ) -> Result<DailyLogEntry> {
        self.log_repo().insert(account_id, entry).await
    }

    async fn entries_for_day(
        &self,
        account_id: AccountId,
        day: NaiveDate,
    ) -> Result<Vec<DailyLogEntry>> {
        self.log_repo().for_day(account_id, day).await
    }

    async fn entries_between(
        &self,
        account_id: AccountId,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<DailyLogEntry>> {
        self.log_repo().between(account_id, from, to).await
    }

    async fn update_entry(
        &self,
        account_id: AccountId,
        entry_id: EntryId,
        entry: &NewLogEntry,
    ) -> Result<Option<DailyLogEntry>> {
        self.log_repo().update(account_id, entry_id, entry).await
    }

    async fn delete_entry(&self, account_id: AccountId, entry_id: EntryId) -> Result<bool> {
        self.log_repo().delete(account_id, entry_id).await
    }
}

#[async_trait::async_trait]
impl RevisionStore for Store {
    async fn save_profile_and_reset_logs(&self, profile: &HealthProfile) -> Result<u64> {
        self.profile_repo().save_and_reset_logs(profile).await
    }
}

// ========== Account Repository Methods ==========

#[async_trait::async_trait]
impl AccountStore for Store {
    async fn load_account(&self, account_id: AccountId) -> Result<Option<Account>> {
        self.account_repo().get_by_id(account_id).await
    }

    async fn save_account(&self, account: &Account) -> Result<()> {
        self.account_repo().update(account).await
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<Account>> {
        self.account_repo().get_by_email(email).await
    }

    async fn create_account(&self, account: NewAccount) -> Result<Account> {
        self.account_repo().create(account).await
    }

    async fn verify_password(&self, account_id: AccountId, password: &str) -> Result<bool> {
        self.account_repo().verify_password(account_id, password).await
    }

    async fn list_accounts(&self) -> Result<Vec<Account>> {
        self.account_repo().list_all().await
    }
}
