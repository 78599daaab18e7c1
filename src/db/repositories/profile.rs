use crate::domain::{AccountId, ActivityLevel, BmiStatus, Gender, OnboardingStep, WeightGoal};
use crate::entities::{health_profiles, prelude::*};
use crate::models::HealthProfile;
use anyhow::{Context, Result};
use chrono::NaiveDate;
use sea_orm::sea_query::{Expr, OnConflict};
use sea_orm::{
    ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, QueryFilter, Set,
    TransactionTrait,
};

use super::log_entry::{DAY_FORMAT, delete_all_with};

/// Repository for the per-account health profile
pub struct ProfileRepository {
    conn: DatabaseConnection,
}

impl ProfileRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    // ========================================================================
    // Model Conversion Helpers
    // ========================================================================

    fn map_model(m: health_profiles::Model) -> Result<HealthProfile> {
        let birth_date = m
            .birth_date
            .as_deref()
            .map(|s| NaiveDate::parse_from_str(s, DAY_FORMAT))
            .transpose()
            .with_context(|| format!("Invalid birth date for account {}", m.account_id))?;

        let step = u8::try_from(m.current_onboarding_step)
            .ok()
            .and_then(OnboardingStep::from_number)
            .unwrap_or_default();

        Ok(HealthProfile {
            account_id: AccountId::new(m.account_id),
            first_name: m.first_name,
            last_name: m.last_name,
            nickname: m.nickname,
            gender: Gender::parse_lossy(&m.gender),
            height_cm: m.height_cm,
            weight_kg: m.weight_kg,
            age_years: u32::try_from(m.age_years).unwrap_or(0),
            birth_date,
            activity_level: ActivityLevel::parse_lossy(&m.activity_level),
            weight_goal: WeightGoal::parse_lossy(&m.weight_goal),
            target_weight_kg: m.target_weight_kg,
            bmi_value: m.bmi_value,
            bmi_status: m.bmi_status.as_deref().and_then(BmiStatus::parse),
            ideal_weight_kg: m.ideal_weight_kg,
            bmr: m.bmr,
            tdee: m.tdee,
            goal_calories: m.goal_calories,
            onboarding_completed: m.onboarding_completed,
            current_onboarding_step: step,
        })
    }

    pub(crate) fn to_active_model(profile: &HealthProfile) -> Result<health_profiles::ActiveModel> {
        let age_years = i32::try_from(profile.age_years).with_context(|| {
            format!(
                "Age {} out of range for account {}",
                profile.age_years, profile.account_id
            )
        })?;

        Ok(health_profiles::ActiveModel {
            account_id: Set(profile.account_id.value()),
            first_name: Set(profile.first_name.clone()),
            last_name: Set(profile.last_name.clone()),
            nickname: Set(profile.nickname.clone()),
            gender: Set(profile.gender.as_str().to_string()),
            height_cm: Set(profile.height_cm),
            weight_kg: Set(profile.weight_kg),
            age_years: Set(age_years),
            birth_date: Set(profile.birth_date.map(|d| d.format(DAY_FORMAT).to_string())),
            activity_level: Set(profile.activity_level.as_str().to_string()),
            weight_goal: Set(profile.weight_goal.as_str().to_string()),
            target_weight_kg: Set(profile.target_weight_kg),
            bmi_value: Set(profile.bmi_value),
            bmi_status: Set(profile.bmi_status.map(|s| s.as_str().to_string())),
            ideal_weight_kg: Set(profile.ideal_weight_kg),
            bmr: Set(profile.bmr),
            tdee: Set(profile.tdee),
            goal_calories: Set(profile.goal_calories),
            onboarding_completed: Set(profile.onboarding_completed),
            current_onboarding_step: Set(i32::from(profile.current_onboarding_step.number())),
            updated_at: Set(chrono::Utc::now().to_rfc3339()),
        })
    }

    // ========================================================================
    // Profile Operations
    // ========================================================================

    pub async fn get(&self, account_id: AccountId) -> Result<Option<HealthProfile>> {
        let row = HealthProfiles::find_by_id(account_id.value())
            .one(&self.conn)
            .await
            .context("Failed to query health profile")?;

        row.map(Self::map_model).transpose()
    }

    pub async fn upsert(&self, profile: &HealthProfile) -> Result<()> {
        upsert_with(&self.conn, profile).await
    }

    pub async fn set_step(&self, account_id: AccountId, step: OnboardingStep) -> Result<()> {
        let result = HealthProfiles::update_many()
            .col_expr(
                health_profiles::Column::CurrentOnboardingStep,
                Expr::value(i32::from(step.number())),
            )
            .col_expr(
                health_profiles::Column::UpdatedAt,
                Expr::value(chrono::Utc::now().to_rfc3339()),
            )
            .filter(health_profiles::Column::AccountId.eq(account_id.value()))
            .exec(&self.conn)
            .await
            .context("Failed to update onboarding step")?;

        if result.rows_affected == 0 {
            anyhow::bail!("No health profile for account {account_id}");
        }
        Ok(())
    }

    /// Sets the completion flag only; metrics must already be stored.
    pub async fn mark_complete(&self, account_id: AccountId) -> Result<()> {
        let result = HealthProfiles::update_many()
            .col_expr(health_profiles::Column::OnboardingCompleted, Expr::value(true))
            .col_expr(
                health_profiles::Column::CurrentOnboardingStep,
                Expr::value(i32::from(OnboardingStep::Results.number())),
            )
            .col_expr(
                health_profiles::Column::UpdatedAt,
                Expr::value(chrono::Utc::now().to_rfc3339()),
            )
            .filter(health_profiles::Column::AccountId.eq(account_id.value()))
            .exec(&self.conn)
            .await
            .context("Failed to mark onboarding complete")?;

        if result.rows_affected == 0 {
            anyhow::bail!("No health profile for account {account_id}");
        }
        Ok(())
    }

    /// Writes the profile and clears the account's log in one transaction.
    pub async fn save_and_reset_logs(&self, profile: &HealthProfile) -> Result<u64> {
        let txn = self.conn.begin().await?;

        let removed = delete_all_with(&txn, profile.account_id).await?;
        upsert_with(&txn, profile).await?;

        txn.commit()
            .await
            .context("Failed to commit profile revision")?;

        Ok(removed)
    }
}

/// Inserts or fully replaces the profile row on `conn`.
pub async fn upsert_with<C: ConnectionTrait>(conn: &C, profile: &HealthProfile) -> Result<()> {
    HealthProfiles::insert(ProfileRepository::to_active_model(profile)?)
        .on_conflict(
            OnConflict::column(health_profiles::Column::AccountId)
                .update_columns([
                    health_profiles::Column::FirstName,
                    health_profiles::Column::LastName,
                    health_profiles::Column::Nickname,
                    health_profiles::Column::Gender,
                    health_profiles::Column::HeightCm,
                    health_profiles::Column::WeightKg,
                    health_profiles::Column::AgeYears,
                    health_profiles::Column::BirthDate,
                    health_profiles::Column::ActivityLevel,
                    health_profiles::Column::WeightGoal,
                    health_profiles::Column::TargetWeightKg,
                    health_profiles::Column::BmiValue,
                    health_profiles::Column::BmiStatus,
                    health_profiles::Column::IdealWeightKg,
                    health_profiles::Column::Bmr,
                    health_profiles::Column::Tdee,
                    health_profiles::Column::GoalCalories,
                    health_profiles::Column::OnboardingCompleted,
                    health_profiles::Column::CurrentOnboardingStep,
                    health_profiles::Column::UpdatedAt,
                ])
                .to_owned(),
        )
        .exec_without_returning(conn)
        .await
        .with_context(|| format!("Failed to save health profile for account {}", profile.account_id))?;

    Ok(())
}
