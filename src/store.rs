//! Persistence seams consumed by the services.
//!
//! Every method returns `anyhow::Result`; services map failures into their own
//! `Persistence` error variants. [`crate::db::Store`] implements all of them on
//! SQLite.

use anyhow::{Result, bail};
use chrono::NaiveDate;

use crate::domain::{AccountId, EntryId, OnboardingStep};
use crate::models::{Account, DailyLogEntry, HealthProfile, NewAccount, NewLogEntry};

#[async_trait::async_trait]
pub trait ProfileStore: Send + Sync {
    async fn load_profile(&self, account_id: AccountId) -> Result<Option<HealthProfile>>;

    /// Upserts the full profile keyed by its account id.
    async fn save_profile(&self, profile: &HealthProfile) -> Result<()>;

    async fn set_onboarding_step(&self, account_id: AccountId, step: OnboardingStep) -> Result<()>;

    /// Flags onboarding as finished. Derived metrics are not touched, so the
    /// caller must have saved a recomputed profile first.
    async fn mark_onboarding_complete(&self, account_id: AccountId) -> Result<()>;
}

#[async_trait::async_trait]
pub trait LogStore: Send + Sync {
    /// Deletes every log entry of the account and returns how many were removed.
    async fn delete_all_entries(&self, account_id: AccountId) -> Result<u64>;

    async fn insert_entry(&self, account_id: AccountId, entry: &NewLogEntry)
    -> Result<DailyLogEntry>;

    /// Entries of one day, newest first.
    async fn entries_for_day(
        &self,
        account_id: AccountId,
        day: NaiveDate,
    ) -> Result<Vec<DailyLogEntry>>;

    /// Entries from `from` to `to` inclusive, oldest day first.
    async fn entries_between(
        &self,
        account_id: AccountId,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<DailyLogEntry>>;

    /// Rewrites one entry owned by `account_id`. Returns `None` if none matched.
    async fn update_entry(
        &self,
        account_id: AccountId,
        entry_id: EntryId,
        entry: &NewLogEntry,
    ) -> Result<Option<DailyLogEntry>>;

    /// Deletes one entry owned by `account_id`. Returns false if none matched.
    async fn delete_entry(&self, account_id: AccountId, entry_id: EntryId) -> Result<bool>;
}

/// A profile write that must invalidate the account's log history.
#[async_trait::async_trait]
pub trait RevisionStore: ProfileStore + LogStore {
    /// Persists `profile` and removes every log entry of its account as one unit.
    ///
    /// The default deletes the logs first and writes the profile second, so a
    /// failure can leave an already-emptied log but never an updated profile
    /// next to stale entries. Stores with transactions should override it.
    async fn save_profile_and_reset_logs(&self, profile: &HealthProfile) -> Result<u64> {
        let removed = self.delete_all_entries(profile.account_id).await?;
        self.save_profile(profile).await?;
        Ok(removed)
    }
}

#[async_trait::async_trait]
pub trait AccountStore: Send + Sync {
    async fn load_account(&self, account_id: AccountId) -> Result<Option<Account>>;

    /// Writes every mutable field of `account`. `id`, `email` and
    /// `created_at` are never changed.
    async fn save_account(&self, account: &Account) -> Result<()>;

    async fn find_by_email(&self, email: &str) -> Result<Option<Account>>;

    /// Creates the account together with its default health profile.
    async fn create_account(&self, account: NewAccount) -> Result<Account>;

    async fn verify_password(&self, account_id: AccountId, password: &str) -> Result<bool>;

    /// Every account, newest first.
    async fn list_accounts(&self) -> Result<Vec<Account>>;

    /// Mirrors a profile's display name onto the account's nickname.
    async fn set_nickname(&self, account_id: AccountId, nickname: &str) -> Result<()> {
        let Some(mut account) = self.load_account(account_id).await? else {
            bail!("No account {account_id}");
        };
        if account.nickname == nickname {
            return Ok(());
        }
        account.nickname = nickname.to_string();
        self.save_account(&account).await
    }
}
