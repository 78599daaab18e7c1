//! Store-backed implementation of the `OnboardingService` trait.

use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::calculator::DerivedMetrics;
use crate::domain::{AccountId, OnboardingStep};
use crate::models::HealthProfile;
use crate::services::onboarding_service::{
    GoalsStep, NameStep, OnboardingError, OnboardingForm, OnboardingService, OnboardingSession,
    OnboardingState, StatsStep,
};
use crate::store::{AccountStore, ProfileStore};
use crate::validation::{
    Field, FieldErrors, validate_age, validate_birth_date, validate_height, validate_name,
    validate_target_weight, validate_weight,
};

pub type Today = Arc<dyn Fn() -> NaiveDate + Send + Sync>;

pub struct DefaultOnboardingService {
    profiles: Arc<dyn ProfileStore>,
    accounts: Arc<dyn AccountStore>,
    today: Today,
}

impl DefaultOnboardingService {
    #[must_use]
    pub fn new(profiles: Arc<dyn ProfileStore>, accounts: Arc<dyn AccountStore>) -> Self {
        Self {
            profiles,
            accounts,
            today: Arc::new(|| Utc::now().date_naive()),
        }
    }

    /// Replaces the clock used for age checks.
    #[must_use]
    pub fn with_today(mut self, today: Today) -> Self {
        self.today = today;
        self
    }

    async fn load(&self, account_id: AccountId) -> Result<HealthProfile, OnboardingError> {
        self.profiles
            .load_profile(account_id)
            .await?
            .ok_or(OnboardingError::NotFound(account_id))
    }

    /// Loads a profile that is still being onboarded.
    async fn load_in_progress(
        &self,
        account_id: AccountId,
    ) -> Result<HealthProfile, OnboardingError> {
        let profile = self.load(account_id).await?;
        if profile.onboarding_completed {
            return Err(OnboardingError::AlreadyCompleted(account_id));
        }
        Ok(profile)
    }

    fn validate_complete(profile: &HealthProfile) -> FieldErrors {
        let mut errors = FieldErrors::new();
        errors.check(Field::FirstName, validate_name(&profile.first_name, "First name"));
        errors.check(Field::LastName, validate_name(&profile.last_name, "Last name"));
        errors.check(Field::Height, validate_height(profile.height_cm));
        errors.check(Field::Weight, validate_weight(profile.weight_kg));
        errors.check(Field::Age, validate_age(profile.age_years));
        errors.check(
            Field::TargetWeight,
            validate_target_weight(profile.target_weight_kg),
        );
        errors
    }

    fn missing_body_stats(profile: &HealthProfile) -> FieldErrors {
        let mut errors = FieldErrors::new();
        if profile.height_cm <= 0.0 {
            errors.push(Field::Height, "Height is required");
        }
        if profile.weight_kg <= 0.0 {
            errors.push(Field::Weight, "Weight is required");
        }
        if profile.age_years == 0 {
            errors.push(Field::BirthDate, "Please enter a valid date");
        }
        errors
    }
}

#[async_trait]
impl OnboardingService for DefaultOnboardingService {
    async fn resume(&self, account_id: AccountId) -> Result<OnboardingSession, OnboardingError> {
        let profile = self.load(account_id).await?;
        let form = OnboardingForm::from_profile(&profile);

        let state = if profile.onboarding_completed {
            OnboardingState::Completed
        } else {
            OnboardingState::Step(profile.current_onboarding_step)
        };

        debug!(%account_id, ?state, "Resumed onboarding");
        Ok(OnboardingSession::new(account_id, state, form))
    }

    async fn commit_name(
        &self,
        account_id: AccountId,
        step: NameStep,
    ) -> Result<HealthProfile, OnboardingError> {
        let mut errors = FieldErrors::new();
        errors.check(Field::FirstName, validate_name(&step.first_name, "First name"));
        errors.check(Field::LastName, validate_name(&step.last_name, "Last name"));
        errors.into_result()?;

        let mut profile = self.load_in_progress(account_id).await?;
        profile.first_name = step.first_name.trim().to_string();
        profile.last_name = step.last_name.trim().to_string();
        profile.nickname = step
            .nickname
            .map(|n| n.trim().to_string())
            .filter(|n| !n.is_empty());
        profile.current_onboarding_step = OnboardingStep::Name;
        self.profiles.save_profile(&profile).await?;

        // The profile holds the name; the account copy only feeds admin search.
        if let Err(err) = self
            .accounts
            .set_nickname(account_id, profile.display_name())
            .await
        {
            warn!(%account_id, "Failed to sync account nickname: {err:#}");
        }

        info!(%account_id, "Onboarding step 1 saved");
        Ok(profile)
    }

    async fn commit_stats(
        &self,
        account_id: AccountId,
        step: StatsStep,
    ) -> Result<HealthProfile, OnboardingError> {
        let today = (self.today)();
        let mut errors = FieldErrors::new();
        errors.check(Field::Height, validate_height(step.height_cm));
        errors.check(Field::Weight, validate_weight(step.weight_kg));
        let age = match step.birth_date {
            None => {
                errors.push(Field::BirthDate, "Please enter a valid date");
                None
            }
            Some(date) => match validate_birth_date(date, today) {
                Ok(age) => Some(age),
                Err(message) => {
                    errors.push(Field::BirthDate, message);
                    None
                }
            },
        };
        errors.into_result()?;

        let mut profile = self.load_in_progress(account_id).await?;
        profile.gender = step.gender;
        profile.height_cm = step.height_cm;
        profile.weight_kg = step.weight_kg;
        profile.birth_date = step.birth_date;
        profile.age_years = age.unwrap_or_default();
        profile.activity_level = step.activity_level;
        profile.current_onboarding_step = OnboardingStep::Stats;
        self.profiles.save_profile(&profile).await?;

        info!(%account_id, "Onboarding step 2 saved");
        Ok(profile)
    }

    async fn commit_goals(
        &self,
        account_id: AccountId,
        step: GoalsStep,
    ) -> Result<HealthProfile, OnboardingError> {
        validate_target_weight(step.target_weight_kg)
            .map_err(|message| FieldErrors::single(Field::TargetWeight, message))?;

        let mut profile = self.load_in_progress(account_id).await?;
        profile.target_weight_kg = step.target_weight_kg;
        profile.weight_goal = step.weight_goal;
        profile.current_onboarding_step = OnboardingStep::Goals;
        self.profiles.save_profile(&profile).await?;

        info!(%account_id, "Onboarding step 3 saved");
        Ok(profile)
    }

    async fn enter_results(
        &self,
        account_id: AccountId,
    ) -> Result<DerivedMetrics, OnboardingError> {
        let profile = self.load(account_id).await?;
        Self::missing_body_stats(&profile).into_result()?;

        let preview = DerivedMetrics::compute(&profile.inputs());
        debug!(%account_id, ?preview, "Computed onboarding preview");

        if profile.current_onboarding_step < OnboardingStep::Results {
            self.profiles
                .set_onboarding_step(account_id, OnboardingStep::Results)
                .await?;
        }

        Ok(preview)
    }

    async fn finalize(&self, account_id: AccountId) -> Result<HealthProfile, OnboardingError> {
        let mut profile = self.load(account_id).await?;
        Self::validate_complete(&profile).into_result()?;

        let derived = profile.recompute();
        if !derived.is_usable() {
            let mut errors = FieldErrors::new();
            errors.push(Field::Weight, "Calculated values are invalid");
            return Err(errors.into());
        }

        let was_completed = profile.onboarding_completed;
        profile.onboarding_completed = true;
        profile.current_onboarding_step = OnboardingStep::Results;
        self.profiles.save_profile(&profile).await?;

        if !was_completed {
            metrics::counter!("calorease_onboarding_completed_total").increment(1);
        }
        info!(
            %account_id,
            goal_calories = profile.goal_calories,
            "Onboarding finalized"
        );
        Ok(profile)
    }
}
