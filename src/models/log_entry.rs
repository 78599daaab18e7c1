use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::{AccountId, EntryId, MealType};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyLogEntry {
    pub id: EntryId,
    pub account_id: AccountId,
    pub day: NaiveDate,
    pub food_name: String,
    pub calories: i32,
    pub meal_type: MealType,
}

/// A food entry as submitted, before it has an id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewLogEntry {
    pub day: NaiveDate,
    pub food_name: String,
    pub calories: i32,
    pub meal_type: MealType,
}
