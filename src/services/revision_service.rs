//! Domain service for edits made after onboarding.
//!
//! Any edit that moves the daily calorie goal invalidates the account's food
//! log. The profile write and the log reset go through
//! [`crate::store::RevisionStore::save_profile_and_reset_logs`] as one unit.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::{AccountId, WeightGoal};
use crate::models::HealthProfile;
use crate::validation::FieldErrors;

#[derive(Debug, Error)]
pub enum RevisionError {
    #[error("Validation failed: {0}")]
    Validation(FieldErrors),

    #[error("Health profile not found for account {0}")]
    NotFound(AccountId),

    #[error("Onboarding not completed for account {0}")]
    OnboardingIncomplete(AccountId),

    #[error("Persistence error: {0}")]
    Persistence(String),
}

impl From<FieldErrors> for RevisionError {
    fn from(errors: FieldErrors) -> Self {
        Self::Validation(errors)
    }
}

impl From<sea_orm::DbErr> for RevisionError {
    fn from(err: sea_orm::DbErr) -> Self {
        Self::Persistence(err.to_string())
    }
}

impl From<anyhow::Error> for RevisionError {
    fn from(err: anyhow::Error) -> Self {
        Self::Persistence(format!("{err:#}"))
    }
}

/// Fields an edit may change. `None` leaves the stored value alone.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProfileEdit {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    /// `Some("")` clears the nickname.
    pub nickname: Option<String>,
    pub age_years: Option<u32>,
    pub height_cm: Option<f64>,
    pub weight_kg: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RevisionOutcome {
    pub profile: HealthProfile,
    /// Log entries deleted by the reset; zero when no reset happened.
    pub entries_removed: u64,
    pub logs_reset: bool,
}

#[async_trait::async_trait]
pub trait RevisionService: Send + Sync {
    /// Records a new weight, recomputes every metric and resets the food log.
    ///
    /// # Errors
    ///
    /// - Returns [`RevisionError::Validation`] if the weight is out of range
    /// - Returns [`RevisionError::OnboardingIncomplete`] before onboarding ends
    async fn change_weight(
        &self,
        account_id: AccountId,
        new_weight_kg: f64,
    ) -> Result<RevisionOutcome, RevisionError>;

    /// Records a new goal, recomputes the calorie target and resets the food log.
    async fn change_goal(
        &self,
        account_id: AccountId,
        weight_goal: WeightGoal,
    ) -> Result<RevisionOutcome, RevisionError>;

    /// Applies a general edit. The food log is reset only when the rounded
    /// calorie goal changes.
    async fn edit_profile(
        &self,
        account_id: AccountId,
        edit: ProfileEdit,
    ) -> Result<RevisionOutcome, RevisionError>;
}
