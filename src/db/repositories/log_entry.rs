use crate::domain::{AccountId, EntryId, MealType};
use crate::entities::{daily_log_entries, prelude::*};
use crate::models::{DailyLogEntry, NewLogEntry};
use anyhow::{Context, Result};
use chrono::NaiveDate;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, QueryFilter,
    QueryOrder, Set,
};

pub const DAY_FORMAT: &str = "%Y-%m-%d";

/// Repository for daily food-log entries
pub struct LogEntryRepository {
    conn: DatabaseConnection,
}

impl LogEntryRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    fn map_model(m: daily_log_entries::Model) -> Result<DailyLogEntry> {
        let day = NaiveDate::parse_from_str(&m.day, DAY_FORMAT)
            .with_context(|| format!("Invalid day on log entry {}: {}", m.id, m.day))?;
        let meal_type = MealType::parse(&m.meal_type)
            .with_context(|| format!("Invalid meal type on log entry {}: {}", m.id, m.meal_type))?;

        Ok(DailyLogEntry {
            id: EntryId::new(m.id),
            account_id: AccountId::new(m.account_id),
            day,
            food_name: m.food_name,
            calories: m.calories,
            meal_type,
        })
    }

    pub async fn insert(&self, account_id: AccountId, entry: &NewLogEntry) -> Result<DailyLogEntry> {
        let active_model = daily_log_entries::ActiveModel {
            account_id: Set(account_id.value()),
            day: Set(entry.day.format(DAY_FORMAT).to_string()),
            food_name: Set(entry.food_name.trim().to_string()),
            calories: Set(entry.calories),
            meal_type: Set(entry.meal_type.as_str().to_string()),
            created_at: Set(chrono::Utc::now().to_rfc3339()),
            ..Default::default()
        };

        let model = active_model
            .insert(&self.conn)
            .await
            .context("Failed to insert log entry")?;

        Self::map_model(model)
    }

    pub async fn for_day(&self, account_id: AccountId, day: NaiveDate) -> Result<Vec<DailyLogEntry>> {
        let rows = DailyLogEntries::find()
            .filter(daily_log_entries::Column::AccountId.eq(account_id.value()))
            .filter(daily_log_entries::Column::Day.eq(day.format(DAY_FORMAT).to_string()))
            .order_by_desc(daily_log_entries::Column::Id)
            .all(&self.conn)
            .await
            .context("Failed to query log entries for day")?;

        rows.into_iter().map(Self::map_model).collect()
    }

    /// Entries with `from <= day <= to`, oldest day first.
    pub async fn between(
        &self,
        account_id: AccountId,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<DailyLogEntry>> {
        // Zero-padded ISO days compare correctly as text.
        let rows = DailyLogEntries::find()
            .filter(daily_log_entries::Column::AccountId.eq(account_id.value()))
            .filter(daily_log_entries::Column::Day.between(
                from.format(DAY_FORMAT).to_string(),
                to.format(DAY_FORMAT).to_string(),
            ))
            .order_by_asc(daily_log_entries::Column::Day)
            .order_by_asc(daily_log_entries::Column::Id)
            .all(&self.conn)
            .await
            .context("Failed to query log entries for range")?;

        rows.into_iter().map(Self::map_model).collect()
    }

    /// Rewrites an entry owned by `account_id`. Returns `None` if none matched.
    pub async fn update(
        &self,
        account_id: AccountId,
        entry_id: EntryId,
        entry: &NewLogEntry,
    ) -> Result<Option<DailyLogEntry>> {
        let Some(model) = DailyLogEntries::find_by_id(entry_id.value())
            .filter(daily_log_entries::Column::AccountId.eq(account_id.value()))
            .one(&self.conn)
            .await
            .context("Failed to query log entry")?
        else {
            return Ok(None);
        };

        let mut active: daily_log_entries::ActiveModel = model.into();
        active.day = Set(entry.day.format(DAY_FORMAT).to_string());
        active.food_name = Set(entry.food_name.trim().to_string());
        active.calories = Set(entry.calories);
        active.meal_type = Set(entry.meal_type.as_str().to_string());

        let updated = active
            .update(&self.conn)
            .await
            .context("Failed to update log entry")?;

        Self::map_model(updated).map(Some)
    }

    pub async fn delete(&self, account_id: AccountId, entry_id: EntryId) -> Result<bool> {
        let result = DailyLogEntries::delete_many()
            .filter(daily_log_entries::Column::Id.eq(entry_id.value()))
            .filter(daily_log_entries::Column::AccountId.eq(account_id.value()))
            .exec(&self.conn)
            .await
            .context("Failed to delete log entry")?;

        Ok(result.rows_affected > 0)
    }

    pub async fn delete_all(&self, account_id: AccountId) -> Result<u64> {
        delete_all_with(&self.conn, account_id).await
    }
}

/// Deletes every entry of the account on `conn`, which may be a transaction.
pub async fn delete_all_with<C: ConnectionTrait>(conn: &C, account_id: AccountId) -> Result<u64> {
    let result = DailyLogEntries::delete_many()
        .filter(daily_log_entries::Column::AccountId.eq(account_id.value()))
        .exec(conn)
        .await
        .context("Failed to delete log entries")?;

    Ok(result.rows_affected)
}
