//! The persisted health profile of one account.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::calculator::{DerivedMetrics, HealthInputs};
use crate::domain::{AccountId, ActivityLevel, BmiStatus, Gender, OnboardingStep, WeightGoal};

/// Inputs collected during onboarding plus the metrics derived from them.
///
/// While `onboarding_completed` is false the derived fields may be zero or
/// stale. Once it is true they always match the stored inputs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthProfile {
    pub account_id: AccountId,

    pub first_name: String,
    pub last_name: String,
    pub nickname: Option<String>,

    pub gender: Gender,
    pub height_cm: f64,
    pub weight_kg: f64,
    pub age_years: u32,
    pub birth_date: Option<NaiveDate>,
    pub activity_level: ActivityLevel,
    pub weight_goal: WeightGoal,
    pub target_weight_kg: f64,

    pub bmi_value: f64,
    pub bmi_status: Option<BmiStatus>,
    pub ideal_weight_kg: f64,
    pub bmr: i32,
    pub tdee: i32,
    pub goal_calories: i32,

    pub onboarding_completed: bool,
    pub current_onboarding_step: OnboardingStep,
}

impl HealthProfile {
    /// The profile created alongside a fresh account.
    #[must_use]
    pub fn new_default(account_id: AccountId) -> Self {
        Self {
            account_id,
            first_name: String::new(),
            last_name: String::new(),
            nickname: None,
            gender: Gender::Unspecified,
            height_cm: 0.0,
            weight_kg: 0.0,
            age_years: 0,
            birth_date: None,
            activity_level: ActivityLevel::Sedentary,
            weight_goal: WeightGoal::Maintain,
            target_weight_kg: 0.0,
            bmi_value: 0.0,
            bmi_status: None,
            ideal_weight_kg: 0.0,
            bmr: 0,
            tdee: 0,
            goal_calories: 0,
            onboarding_completed: false,
            current_onboarding_step: OnboardingStep::Name,
        }
    }

    #[must_use]
    pub const fn inputs(&self) -> HealthInputs {
        HealthInputs {
            weight_kg: self.weight_kg,
            height_cm: self.height_cm,
            age_years: self.age_years,
            gender: self.gender,
            activity_level: self.activity_level,
            weight_goal: self.weight_goal,
        }
    }

    /// True once height, weight and age have all been supplied.
    #[must_use]
    pub fn has_body_stats(&self) -> bool {
        self.height_cm > 0.0 && self.weight_kg > 0.0 && self.age_years > 0
    }

    /// Copies computed metrics into the stored fields, rounding kcal values.
    pub fn apply_metrics(&mut self, metrics: &DerivedMetrics) {
        let (bmr, tdee, goal) = metrics.whole_kcal();
        self.bmi_value = metrics.bmi;
        self.bmi_status = Some(metrics.bmi_status);
        self.ideal_weight_kg = metrics.ideal_weight_kg;
        self.bmr = bmr;
        self.tdee = tdee;
        self.goal_calories = goal;
    }

    /// Recomputes every derived field from the stored inputs.
    pub fn recompute(&mut self) -> DerivedMetrics {
        let metrics = DerivedMetrics::compute(&self.inputs());
        self.apply_metrics(&metrics);
        metrics
    }

    /// Name shown in greetings: the nickname when set, else the first name.
    #[must_use]
    pub fn display_name(&self) -> &str {
        self.nickname
            .as_deref()
            .filter(|n| !n.trim().is_empty())
            .unwrap_or(&self.first_name)
    }

    /// Case-insensitive substring match on first, last, full or nickname.
    #[must_use]
    pub fn matches_name(&self, query: &str) -> bool {
        let query = query.trim().to_lowercase();
        if query.is_empty() {
            return true;
        }
        let full_name = format!("{} {}", self.first_name, self.last_name);
        [full_name.as_str(), self.nickname.as_deref().unwrap_or_default()]
            .iter()
            .any(|name| name.to_lowercase().contains(&query))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_default_profile() {
        let profile = HealthProfile::new_default(AccountId::new(7));
        assert_eq!(profile.gender, Gender::Unspecified);
        assert_eq!(profile.activity_level, ActivityLevel::Sedentary);
        assert_eq!(profile.weight_goal, WeightGoal::Maintain);
        assert_eq!(profile.current_onboarding_step, OnboardingStep::Name);
        assert!(profile.bmi_status.is_none());
        assert!(!profile.onboarding_completed);
        assert!(!profile.has_body_stats());
    }

    #[test]
    fn test_recompute_rounds_kcal() {
        let mut profile = HealthProfile::new_default(AccountId::new(1));
        profile.gender = Gender::Female;
        profile.height_cm = 165.0;
        profile.weight_kg = 60.0;
        profile.age_years = 30;

        let metrics = profile.recompute();

        assert_eq!(profile.bmr, 1320);
        assert_eq!(profile.tdee, 1584); // 1320.25 * 1.2 = 1584.3
        assert_eq!(profile.goal_calories, 1584);
        assert_eq!(profile.bmi_status, Some(metrics.bmi_status));
    }

    #[test]
    fn test_matches_name() {
        let mut profile = HealthProfile::new_default(AccountId::new(1));
        profile.first_name = "Ada".to_string();
        profile.last_name = "Lovelace".to_string();
        profile.nickname = Some("Countess".to_string());

        assert!(profile.matches_name("lovelace"));
        assert!(profile.matches_name("ADA LOVE"));
        assert!(profile.matches_name("count"));
        assert!(profile.matches_name("  "));
        assert!(!profile.matches_name("babbage"));
    }

    #[test]
    fn test_display_name_prefers_nickname() {
        let mut profile = HealthProfile::new_default(AccountId::new(1));
        profile.first_name = "Ada".to_string();
        assert_eq!(profile.display_name(), "Ada");
        profile.nickname = Some("Countess".to_string());
        assert_eq!(profile.display_name(), "Countess");
    }
}
