//! Health metric calculations.
//!
//! Every function here is pure and total for well-formed numeric input. The
//! chain bmr -> tdee -> goal calories stays in `f64`; rounding to whole kcal
//! happens only when a value is written into a persisted profile
//! (see [`round_kcal`]).
//!
//! # References
//!
//! - Mifflin, M.D., et al. (1990). A new predictive equation for resting energy
//!   expenditure. *American Journal of Clinical Nutrition*, 51(2), 241-247.

use serde::{Deserialize, Serialize};

use crate::constants::nutrition::{
    BMI_OBESE_FROM, BMI_OVERWEIGHT_FROM, BMI_UNDERWEIGHT_BELOW, IDEAL_BMI, MIN_GOAL_CALORIES,
};
use crate::domain::{ActivityLevel, BmiStatus, Gender, WeightGoal};

/// Basal metabolic rate in kcal/day (Mifflin-St Jeor).
///
/// Any gender other than [`Gender::Male`] uses the female constant.
#[must_use]
#[allow(clippy::suboptimal_flops)]
pub fn bmr(weight_kg: f64, height_cm: f64, age_years: u32, gender: Gender) -> f64 {
    let base = 10.0 * weight_kg + 6.25 * height_cm - 5.0 * f64::from(age_years);
    match gender {
        Gender::Male => base + 5.0,
        Gender::Female | Gender::Unspecified => base - 161.0,
    }
}

#[must_use]
pub fn tdee(bmr: f64, activity_level: ActivityLevel) -> f64 {
    bmr * activity_level.multiplier()
}

/// Daily calorie target, never below [`MIN_GOAL_CALORIES`].
#[must_use]
pub fn goal_calories(tdee: f64, weight_goal: WeightGoal) -> f64 {
    (tdee + weight_goal.calorie_delta()).max(MIN_GOAL_CALORIES)
}

#[must_use]
pub fn bmi(weight_kg: f64, height_cm: f64) -> f64 {
    let height_m = height_cm / 100.0;
    weight_kg / (height_m * height_m)
}

impl BmiStatus {
    #[must_use]
    pub fn from_bmi(bmi: f64) -> Self {
        if bmi < BMI_UNDERWEIGHT_BELOW {
            Self::Underweight
        } else if bmi < BMI_OVERWEIGHT_FROM {
            Self::Normal
        } else if bmi < BMI_OBESE_FROM {
            Self::Overweight
        } else {
            Self::Obese
        }
    }
}

/// Single-point ideal weight estimate at BMI 22.
#[must_use]
pub fn ideal_weight(height_cm: f64) -> f64 {
    let height_m = height_cm / 100.0;
    IDEAL_BMI * height_m * height_m
}

/// Rounds a kcal value for storage in an integer column.
#[must_use]
#[allow(clippy::cast_possible_truncation)]
pub fn round_kcal(value: f64) -> i32 {
    value.round() as i32
}

/// The scalar inputs every derived metric depends on.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HealthInputs {
    pub weight_kg: f64,
    pub height_cm: f64,
    pub age_years: u32,
    pub gender: Gender,
    pub activity_level: ActivityLevel,
    pub weight_goal: WeightGoal,
}

/// Results of one pass through the calculator chain.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DerivedMetrics {
    pub bmi: f64,
    pub bmi_status: BmiStatus,
    pub ideal_weight_kg: f64,
    pub bmr: f64,
    pub tdee: f64,
    pub goal_calories: f64,
}

impl DerivedMetrics {
    #[must_use]
    pub fn compute(inputs: &HealthInputs) -> Self {
        let bmi_value = bmi(inputs.weight_kg, inputs.height_cm);
        let bmr_value = bmr(
            inputs.weight_kg,
            inputs.height_cm,
            inputs.age_years,
            inputs.gender,
        );
        let tdee_value = tdee(bmr_value, inputs.activity_level);

        Self {
            bmi: bmi_value,
            bmi_status: BmiStatus::from_bmi(bmi_value),
            ideal_weight_kg: ideal_weight(inputs.height_cm),
            bmr: bmr_value,
            tdee: tdee_value,
            goal_calories: goal_calories(tdee_value, inputs.weight_goal),
        }
    }

    /// `(bmr, tdee, goal_calories)` rounded for the persisted profile.
    #[must_use]
    pub fn whole_kcal(&self) -> (i32, i32, i32) {
        (
            round_kcal(self.bmr),
            round_kcal(self.tdee),
            round_kcal(self.goal_calories),
        )
    }

    /// True when every value that finalization relies on is usable.
    #[must_use]
    pub fn is_usable(&self) -> bool {
        self.bmi.is_finite() && self.bmi > 0.0 && self.goal_calories > 0.0
    }
}
