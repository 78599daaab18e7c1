//! Store-backed implementation of the `FoodLogService` trait.

use async_trait::async_trait;
use chrono::{Duration, NaiveDate};
use std::sync::Arc;
use tracing::{debug, info};

use crate::constants::food_log::HISTORY_DAYS;
use crate::domain::{AccountId, EntryId};
use crate::models::{DailyLogEntry, HealthProfile, NewLogEntry};
use crate::services::food_log_service::{
    DailyCalories, DaySummary, FoodLogError, FoodLogService, WeekSummary,
};
use crate::store::{LogStore, ProfileStore};
use crate::validation::{Field, FieldErrors, validate_calories, validate_name};

pub struct DefaultFoodLogService {
    logs: Arc<dyn LogStore>,
    profiles: Arc<dyn ProfileStore>,
}

impl DefaultFoodLogService {
    #[must_use]
    pub fn new(logs: Arc<dyn LogStore>, profiles: Arc<dyn ProfileStore>) -> Self {
        Self { logs, profiles }
    }

    fn validate(entry: &NewLogEntry) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::new();
        errors.check(Field::FoodName, validate_name(&entry.food_name, "Food name"));
        errors.check(Field::Calories, validate_calories(entry.calories));
        errors.into_result()
    }

    async fn profile(&self, account_id: AccountId) -> Result<HealthProfile, FoodLogError> {
        self.profiles
            .load_profile(account_id)
            .await?
            .ok_or(FoodLogError::ProfileNotFound(account_id))
    }
}

#[async_trait]
impl FoodLogService for DefaultFoodLogService {
    async fn add_entry(
        &self,
        account_id: AccountId,
        entry: NewLogEntry,
    ) -> Result<DailyLogEntry, FoodLogError> {
        Self::validate(&entry)?;
        self.profile(account_id).await?;

        let entry = NewLogEntry {
            food_name: entry.food_name.trim().to_string(),
            ..entry
        };
        let stored = self.logs.insert_entry(account_id, &entry).await?;

        debug!(%account_id, entry_id = %stored.id, calories = stored.calories, "Food logged");
        Ok(stored)
    }

    async fn entries_for_day(
        &self,
        account_id: AccountId,
        day: NaiveDate,
    ) -> Result<Vec<DailyLogEntry>, FoodLogError> {
        Ok(self.logs.entries_for_day(account_id, day).await?)
    }

    async fn day_summary(
        &self,
        account_id: AccountId,
        day: NaiveDate,
    ) -> Result<DaySummary, FoodLogError> {
        let profile = self.profile(account_id).await?;
        let entries = self.logs.entries_for_day(account_id, day).await?;

        let consumed: i64 = entries.iter().map(|e| i64::from(e.calories)).sum();
        Ok(DaySummary {
            day,
            consumed,
            goal: profile.goal_calories,
            remaining: i64::from(profile.goal_calories) - consumed,
            entries: entries.len(),
        })
    }

    async fn week_summary(
        &self,
        account_id: AccountId,
        today: NaiveDate,
    ) -> Result<WeekSummary, FoodLogError> {
        let profile = self.profile(account_id).await?;
        let from = today - Duration::days(HISTORY_DAYS - 1);
        let entries = self.logs.entries_between(account_id, from, today).await?;

        let days = (0..HISTORY_DAYS)
            .map(|offset| {
                let day = from + Duration::days(offset);
                let consumed = entries
                    .iter()
                    .filter(|e| e.day == day)
                    .map(|e| i64::from(e.calories))
                    .sum();
                DailyCalories { day, consumed }
            })
            .collect();

        Ok(WeekSummary {
            goal: profile.goal_calories,
            days,
        })
    }

    async fn update_entry(
        &self,
        account_id: AccountId,
        entry_id: EntryId,
        entry: NewLogEntry,
    ) -> Result<DailyLogEntry, FoodLogError> {
        Self::validate(&entry)?;

        let updated = self
            .logs
            .update_entry(account_id, entry_id, &entry)
            .await?
            .ok_or(FoodLogError::EntryNotFound(entry_id))?;

        debug!(%account_id, %entry_id, calories = updated.calories, "Food entry updated");
        Ok(updated)
    }

    async fn delete_entry(
        &self,
        account_id: AccountId,
        entry_id: EntryId,
    ) -> Result<(), FoodLogError> {
        if !self.logs.delete_entry(account_id, entry_id).await? {
            return Err(FoodLogError::EntryNotFound(entry_id));
        }
        info!(%account_id, %entry_id, "Food entry deleted");
        Ok(())
    }
}
