//! Domain service for the daily food log.

use chrono::NaiveDate;
use serde::Serialize;
use thiserror::Error;

use crate::domain::{AccountId, EntryId};
use crate::models::{DailyLogEntry, NewLogEntry};
use crate::validation::FieldErrors;

#[derive(Debug, Error)]
pub enum FoodLogError {
    #[error("Validation failed: {0}")]
    Validation(FieldErrors),

    #[error("Health profile not found for account {0}")]
    ProfileNotFound(AccountId),

    #[error("Log entry not found: {0}")]
    EntryNotFound(EntryId),

    #[error("Persistence error: {0}")]
    Persistence(String),
}

impl From<FieldErrors> for FoodLogError {
    fn from(errors: FieldErrors) -> Self {
        Self::Validation(errors)
    }
}

impl From<sea_orm::DbErr> for FoodLogError {
    fn from(err: sea_orm::DbErr) -> Self {
        Self::Persistence(err.to_string())
    }
}

impl From<anyhow::Error> for FoodLogError {
    fn from(err: anyhow::Error) -> Self {
        Self::Persistence(format!("{err:#}"))
    }
}

/// Calories eaten on one day against the stored goal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DaySummary {
    pub day: NaiveDate,
    pub consumed: i64,
    pub goal: i32,
    /// Negative once the goal is exceeded.
    pub remaining: i64,
    pub entries: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DailyCalories {
    pub day: NaiveDate,
    pub consumed: i64,
}

/// Calories per day over the recent history window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WeekSummary {
    pub goal: i32,
    /// Oldest day first, ending at the requested day. Days without entries
    /// report zero.
    pub days: Vec<DailyCalories>,
}

#[async_trait::async_trait]
pub trait FoodLogService: Send + Sync {
    async fn add_entry(
        &self,
        account_id: AccountId,
        entry: NewLogEntry,
    ) -> Result<DailyLogEntry, FoodLogError>;

    /// Entries of one day, newest first.
    async fn entries_for_day(
        &self,
        account_id: AccountId,
        day: NaiveDate,
    ) -> Result<Vec<DailyLogEntry>, FoodLogError>;

    async fn day_summary(
        &self,
        account_id: AccountId,
        day: NaiveDate,
    ) -> Result<DaySummary, FoodLogError>;

    /// Totals for the seven days ending at `today`, against the stored goal.
    async fn week_summary(
        &self,
        account_id: AccountId,
        today: NaiveDate,
    ) -> Result<WeekSummary, FoodLogError>;

    /// Replaces the fields of one of the account's own entries.
    ///
    /// # Errors
    ///
    /// - Returns [`FoodLogError::Validation`] for a blank name or bad calories
    /// - Returns [`FoodLogError::EntryNotFound`] when the entry does not exist
    ///   or belongs to another account
    async fn update_entry(
        &self,
        account_id: AccountId,
        entry_id: EntryId,
        entry: NewLogEntry,
    ) -> Result<DailyLogEntry, FoodLogError>;

    /// Deletes one of the account's own entries.
    ///
    /// # Errors
    ///
    /// Returns [`FoodLogError::EntryNotFound`] when the entry does not exist
    /// or belongs to another account.
    async fn delete_entry(
        &self,
        account_id: AccountId,
        entry_id: EntryId,
    ) -> Result<(), FoodLogError>;
}
