//! Domain service for the four-step onboarding wizard.
//!
//! Each step validates its own fields, merges them into the stored profile
//! and persists immediately, so a user can leave at any point and resume
//! later. Only [`OnboardingService::finalize`] requires the full input set.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::calculator::DerivedMetrics;
use crate::domain::{AccountId, ActivityLevel, Gender, OnboardingStep, WeightGoal};
use crate::models::HealthProfile;
use crate::validation::FieldErrors;

#[derive(Debug, Error)]
pub enum OnboardingError {
    #[error("Validation failed: {0}")]
    Validation(FieldErrors),

    #[error("Health profile not found for account {0}")]
    NotFound(AccountId),

    #[error("Onboarding already completed for account {0}")]
    AlreadyCompleted(AccountId),

    #[error("Persistence error: {0}")]
    Persistence(String),
}

impl From<FieldErrors> for OnboardingError {
    fn from(errors: FieldErrors) -> Self {
        Self::Validation(errors)
    }
}

impl From<sea_orm::DbErr> for OnboardingError {
    fn from(err: sea_orm::DbErr) -> Self {
        Self::Persistence(err.to_string())
    }
}

impl From<anyhow::Error> for OnboardingError {
    fn from(err: anyhow::Error) -> Self {
        Self::Persistence(format!("{err:#}"))
    }
}

/// Step 1 input.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NameStep {
    pub first_name: String,
    pub last_name: String,
    /// Blank means no nickname.
    pub nickname: Option<String>,
}

/// Step 2 input.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatsStep {
    pub gender: Gender,
    pub height_cm: f64,
    pub weight_kg: f64,
    pub birth_date: Option<NaiveDate>,
    pub activity_level: ActivityLevel,
}

/// Step 3 input.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GoalsStep {
    pub target_weight_kg: f64,
    pub weight_goal: WeightGoal,
}

/// Values shown in the wizard, rebuilt from a partially stored profile.
///
/// Numeric fields are `None` until their step has been saved.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct OnboardingForm {
    pub first_name: String,
    pub last_name: String,
    pub nickname: Option<String>,
    pub gender: Gender,
    pub height_cm: Option<f64>,
    pub weight_kg: Option<f64>,
    pub birth_date: Option<NaiveDate>,
    pub age_years: Option<u32>,
    pub activity_level: ActivityLevel,
    pub target_weight_kg: Option<f64>,
    pub weight_goal: WeightGoal,
    /// Preview, present once height, weight and age are all known.
    pub metrics: Option<DerivedMetrics>,
}

fn positive(value: f64) -> Option<f64> {
    (value > 0.0).then_some(value)
}

impl OnboardingForm {
    #[must_use]
    pub fn from_profile(profile: &HealthProfile) -> Self {
        let metrics = profile
            .has_body_stats()
            .then(|| DerivedMetrics::compute(&profile.inputs()));

        Self {
            first_name: profile.first_name.clone(),
            last_name: profile.last_name.clone(),
            nickname: profile.nickname.clone().filter(|n| !n.trim().is_empty()),
            gender: profile.gender,
            height_cm: positive(profile.height_cm),
            weight_kg: positive(profile.weight_kg),
            birth_date: profile.birth_date,
            age_years: (profile.age_years > 0).then_some(profile.age_years),
            activity_level: profile.activity_level,
            target_weight_kg: positive(profile.target_weight_kg),
            weight_goal: profile.weight_goal,
            metrics,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum OnboardingState {
    Step(OnboardingStep),
    Completed,
}

/// In-memory position within the wizard.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OnboardingSession {
    pub account_id: AccountId,
    pub state: OnboardingState,
    pub form: OnboardingForm,
}

impl OnboardingSession {
    #[must_use]
    pub const fn new(account_id: AccountId, state: OnboardingState, form: OnboardingForm) -> Self {
        Self {
            account_id,
            state,
            form,
        }
    }

    /// Moves one step forward. Returns false when already at the last step
    /// or completed.
    pub fn advance(&mut self) -> bool {
        match self.state {
            OnboardingState::Step(step) => step.next().is_some_and(|next| {
                self.state = OnboardingState::Step(next);
                true
            }),
            OnboardingState::Completed => false,
        }
    }

    /// Moves one step back. Returns false at step 1 or when completed.
    pub fn back(&mut self) -> bool {
        match self.state {
            OnboardingState::Step(step) => step.previous().is_some_and(|prev| {
                self.state = OnboardingState::Step(prev);
                true
            }),
            OnboardingState::Completed => false,
        }
    }

    #[must_use]
    pub const fn is_completed(&self) -> bool {
        matches!(self.state, OnboardingState::Completed)
    }
}

#[async_trait::async_trait]
pub trait OnboardingService: Send + Sync {
    /// Rebuilds the wizard from whatever has been stored so far.
    ///
    /// # Errors
    ///
    /// Returns [`OnboardingError::NotFound`] if the account has no profile.
    async fn resume(&self, account_id: AccountId) -> Result<OnboardingSession, OnboardingError>;

    async fn commit_name(
        &self,
        account_id: AccountId,
        step: NameStep,
    ) -> Result<HealthProfile, OnboardingError>;

    async fn commit_stats(
        &self,
        account_id: AccountId,
        step: StatsStep,
    ) -> Result<HealthProfile, OnboardingError>;

    async fn commit_goals(
        &self,
        account_id: AccountId,
        step: GoalsStep,
    ) -> Result<HealthProfile, OnboardingError>;

    /// Computes the step 4 preview and records step 4 as reached.
    ///
    /// The stored step is never moved backwards.
    async fn enter_results(&self, account_id: AccountId)
    -> Result<DerivedMetrics, OnboardingError>;

    /// Validates the complete input set, recomputes every metric and marks
    /// onboarding complete. Safe to call again with the same inputs.
    ///
    /// # Errors
    ///
    /// Returns [`OnboardingError::Validation`] if any input is missing or the
    /// computed BMI or goal is not positive.
    async fn finalize(&self, account_id: AccountId) -> Result<HealthProfile, OnboardingError>;
}
