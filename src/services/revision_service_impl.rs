//! Store-backed implementation of the `RevisionService` trait.

use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::domain::{AccountId, WeightGoal};
use crate::models::HealthProfile;
use crate::services::revision_service::{
    ProfileEdit, RevisionError, RevisionOutcome, RevisionService,
};
use crate::store::{AccountStore, RevisionStore};
use crate::validation::{
    Field, FieldErrors, validate_age, validate_height, validate_name, validate_weight,
};

pub struct DefaultRevisionService {
    store: Arc<dyn RevisionStore>,
    accounts: Arc<dyn AccountStore>,
}

impl DefaultRevisionService {
    #[must_use]
    pub fn new(store: Arc<dyn RevisionStore>, accounts: Arc<dyn AccountStore>) -> Self {
        Self { store, accounts }
    }

    async fn load_completed(&self, account_id: AccountId) -> Result<HealthProfile, RevisionError> {
        let profile = self
            .store
            .load_profile(account_id)
            .await?
            .ok_or(RevisionError::NotFound(account_id))?;

        if !profile.onboarding_completed {
            return Err(RevisionError::OnboardingIncomplete(account_id));
        }
        Ok(profile)
    }

    /// Persists `profile` and clears the food log.
    async fn cascade(
        &self,
        profile: HealthProfile,
        reason: &'static str,
    ) -> Result<RevisionOutcome, RevisionError> {
        let entries_removed = self.store.save_profile_and_reset_logs(&profile).await?;

        metrics::counter!("calorease_log_resets_total", "reason" => reason).increment(1);
        info!(
            account_id = %profile.account_id,
            goal_calories = profile.goal_calories,
            entries_removed,
            reason,
            "Profile revised, food log reset"
        );

        Ok(RevisionOutcome {
            profile,
            entries_removed,
            logs_reset: true,
        })
    }
}

#[async_trait]
impl RevisionService for DefaultRevisionService {
    async fn change_weight(
        &self,
        account_id: AccountId,
        new_weight_kg: f64,
    ) -> Result<RevisionOutcome, RevisionError> {
        validate_weight(new_weight_kg)
            .map_err(|message| FieldErrors::single(Field::Weight, message))?;

        let mut profile = self.load_completed(account_id).await?;
        profile.weight_kg = new_weight_kg;
        let derived = profile.recompute();
        debug!(%account_id, ?derived, "Recomputed metrics for new weight");

        self.cascade(profile, "weight").await
    }

    async fn change_goal(
        &self,
        account_id: AccountId,
        weight_goal: WeightGoal,
    ) -> Result<RevisionOutcome, RevisionError> {
        let mut profile = self.load_completed(account_id).await?;
        profile.weight_goal = weight_goal;
        let derived = profile.recompute();
        debug!(%account_id, ?derived, "Recomputed metrics for new goal");

        self.cascade(profile, "goal").await
    }

    async fn edit_profile(
        &self,
        account_id: AccountId,
        edit: ProfileEdit,
    ) -> Result<RevisionOutcome, RevisionError> {
        let mut errors = FieldErrors::new();
        if let Some(first_name) = &edit.first_name {
            errors.check(Field::FirstName, validate_name(first_name, "First name"));
        }
        if let Some(last_name) = &edit.last_name {
            errors.check(Field::LastName, validate_name(last_name, "Last name"));
        }
        if let Some(age) = edit.age_years {
            errors.check(Field::Age, validate_age(age));
        }
        if let Some(height) = edit.height_cm {
            errors.check(Field::Height, validate_height(height));
        }
        if let Some(weight) = edit.weight_kg {
            errors.check(Field::Weight, validate_weight(weight));
        }
        errors.into_result()?;

        let mut profile = self.load_completed(account_id).await?;
        let previous_goal = profile.goal_calories;

        if let Some(first_name) = edit.first_name {
            profile.first_name = first_name.trim().to_string();
        }
        if let Some(last_name) = edit.last_name {
            profile.last_name = last_name.trim().to_string();
        }
        if let Some(nickname) = edit.nickname {
            let nickname = nickname.trim().to_string();
            profile.nickname = (!nickname.is_empty()).then_some(nickname);
        }
        if let Some(age) = edit.age_years.filter(|age| *age != profile.age_years) {
            profile.age_years = age;
            profile.birth_date = None;
        }
        if let Some(height) = edit.height_cm {
            profile.height_cm = height;
        }
        if let Some(weight) = edit.weight_kg {
            profile.weight_kg = weight;
        }
        profile.recompute();

        let outcome = if profile.goal_calories == previous_goal {
            self.store.save_profile(&profile).await?;
            info!(%account_id, "Profile edited, calorie goal unchanged");
            RevisionOutcome {
                profile,
                entries_removed: 0,
                logs_reset: false,
            }
        } else {
            self.cascade(profile, "edit").await?
        };

        if let Err(err) = self
            .accounts
            .set_nickname(account_id, outcome.profile.display_name())
            .await
        {
            warn!(%account_id, "Failed to sync account nickname: {err:#}");
        }

        Ok(outcome)
    }
}
