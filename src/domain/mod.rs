//! Domain vocabulary for the health-profile engine.
//!
//! Identifiers are newtypes so account ids and log-entry ids cannot be mixed,
//! and every value that the original data layer kept as a free-form string
//! (gender, activity level, goal, status) is a closed enum here. Lossy parsers
//! keep the documented fallbacks for unrecognized input.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unique identifier of an account (and of its one-to-one health profile).
///
/// # Examples
///
/// ```rust
/// use calorease::domain::AccountId;
///
/// let id = AccountId::new(7);
/// assert_eq!(id.value(), 7);
/// assert_eq!(id.to_string(), "7");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct AccountId(i32);

impl AccountId {
    #[must_use]
    pub const fn new(id: i32) -> Self {
        debug_assert!(id >= 0, "AccountId should be non-negative");
        Self(id)
    }

    #[must_use]
    pub const fn value(&self) -> i32 {
        self.0
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<AccountId> for i32 {
    fn from(id: AccountId) -> Self {
        id.0
    }
}

impl From<i32> for AccountId {
    fn from(id: i32) -> Self {
        Self::new(id)
    }
}

impl Serialize for AccountId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_i32(self.0)
    }
}

impl<'de> Deserialize<'de> for AccountId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let id = i32::deserialize(deserializer)?;
        Ok(Self::new(id))
    }
}

/// Identifier of a single food-log entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntryId(i32);

impl EntryId {
    #[must_use]
    pub const fn new(id: i32) -> Self {
        Self(id)
    }

    #[must_use]
    pub const fn value(&self) -> i32 {
        self.0
    }
}

impl fmt::Display for EntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Gender as used by the Mifflin-St Jeor equation.
///
/// Anything other than male uses the female constant, so `Unspecified`
/// behaves like `Female` in every calculation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Gender {
    Male,
    Female,
    #[default]
    Unspecified,
}

impl Gender {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Male => "male",
            Self::Female => "female",
            Self::Unspecified => "unspecified",
        }
    }

    /// Case-insensitive parse; unknown strings become `Unspecified`.
    #[must_use]
    pub fn parse_lossy(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "male" => Self::Male,
            "female" => Self::Female,
            _ => Self::Unspecified,
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityLevel {
    #[default]
    Sedentary,
    Light,
    Moderate,
    Active,
    VeryActive,
}

impl ActivityLevel {
    #[must_use]
    pub const fn multiplier(&self) -> f64 {
        match self {
            Self::Sedentary => 1.2,
            Self::Light => 1.375,
            Self::Moderate => 1.55,
            Self::Active => 1.725,
            Self::VeryActive => 1.9,
        }
    }

    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Sedentary => "sedentary",
            Self::Light => "light",
            Self::Moderate => "moderate",
            Self::Active => "active",
            Self::VeryActive => "very_active",
        }
    }

    /// Accepts the labels used across the old data set ("light", "lightly
    /// active", "very active", ...). Unknown strings become `Moderate`.
    #[must_use]
    pub fn parse_lossy(value: &str) -> Self {
        let normalized: String = value
            .trim()
            .to_ascii_lowercase()
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .collect();

        match normalized.as_str() {
            "sedentary" => Self::Sedentary,
            "light" | "lightlyactive" => Self::Light,
            "moderate" | "moderatelyactive" => Self::Moderate,
            "active" => Self::Active,
            "veryactive" | "extraactive" => Self::VeryActive,
            _ => Self::Moderate,
        }
    }
}

impl fmt::Display for ActivityLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Weekly weight-change goal and its fixed daily calorie adjustment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum WeightGoal {
    #[serde(rename = "lose_1kg")]
    Lose1Kg,
    #[serde(rename = "lose_0.5kg")]
    LoseHalfKg,
    #[serde(rename = "lose_0.25kg")]
    LoseQuarterKg,
    #[default]
    #[serde(rename = "maintain")]
    Maintain,
    #[serde(rename = "gain_0.25kg")]
    GainQuarterKg,
    #[serde(rename = "gain_0.5kg")]
    GainHalfKg,
    #[serde(rename = "gain_1kg")]
    Gain1Kg,
}

impl WeightGoal {
    pub const ALL: [Self; 7] = [
        Self::Lose1Kg,
        Self::LoseHalfKg,
        Self::LoseQuarterKg,
        Self::Maintain,
        Self::GainQuarterKg,
        Self::GainHalfKg,
        Self::Gain1Kg,
    ];

    #[must_use]
    pub const fn calorie_delta(&self) -> f64 {
        match self {
            Self::Lose1Kg => -1000.0,
            Self::LoseHalfKg => -500.0,
            Self::LoseQuarterKg => -250.0,
            Self::Maintain => 0.0,
            Self::GainQuarterKg => 250.0,
            Self::GainHalfKg => 500.0,
            Self::Gain1Kg => 1000.0,
        }
    }

    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Lose1Kg => "lose_1kg",
            Self::LoseHalfKg => "lose_0.5kg",
            Self::LoseQuarterKg => "lose_0.25kg",
            Self::Maintain => "maintain",
            Self::GainQuarterKg => "gain_0.25kg",
            Self::GainHalfKg => "gain_0.5kg",
            Self::Gain1Kg => "gain_1kg",
        }
    }

    /// Unknown strings become `Maintain`.
    #[must_use]
    pub fn parse_lossy(value: &str) -> Self {
        let normalized = value.trim().to_ascii_lowercase().replace(['-', ' '], "_");
        Self::ALL
            .into_iter()
            .find(|goal| goal.as_str() == normalized)
            .unwrap_or(Self::Maintain)
    }
}

impl fmt::Display for WeightGoal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BmiStatus {
    Underweight,
    Normal,
    Overweight,
    Obese,
}

impl BmiStatus {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Underweight => "underweight",
            Self::Normal => "normal",
            Self::Overweight => "overweight",
            Self::Obese => "obese",
        }
    }

    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "underweight" => Some(Self::Underweight),
            "normal" => Some(Self::Normal),
            "overweight" => Some(Self::Overweight),
            "obese" => Some(Self::Obese),
            _ => None,
        }
    }
}

impl fmt::Display for BmiStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MealType {
    Breakfast,
    Lunch,
    Dinner,
    Snack,
}

impl MealType {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Breakfast => "breakfast",
            Self::Lunch => "lunch",
            Self::Dinner => "dinner",
            Self::Snack => "snack",
        }
    }

    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "breakfast" => Some(Self::Breakfast),
            "lunch" => Some(Self::Lunch),
            "dinner" => Some(Self::Dinner),
            "snack" => Some(Self::Snack),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccountStatus {
    #[default]
    Active,
    Deactivated,
}

impl AccountStatus {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Deactivated => "deactivated",
        }
    }

    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "active" => Some(Self::Active),
            "deactivated" => Some(Self::Deactivated),
            _ => None,
        }
    }

    #[must_use]
    pub const fn toggled(self) -> Self {
        match self {
            Self::Active => Self::Deactivated,
            Self::Deactivated => Self::Active,
        }
    }

    #[must_use]
    pub const fn is_active(&self) -> bool {
        matches!(self, Self::Active)
    }
}

impl fmt::Display for AccountStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Display label only; authorization is decided by `admin_access`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Role {
    #[default]
    User,
    Admin,
}

impl Role {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::User => "USER",
            Self::Admin => "ADMIN",
        }
    }

    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_uppercase().as_str() {
            "USER" => Some(Self::User),
            "ADMIN" => Some(Self::Admin),
            _ => None,
        }
    }
}

/// The four onboarding screens, numbered as they are persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
pub enum OnboardingStep {
    #[default]
    Name,
    Stats,
    Goals,
    Results,
}

impl OnboardingStep {
    #[must_use]
    pub const fn number(&self) -> u8 {
        match self {
            Self::Name => 1,
            Self::Stats => 2,
            Self::Goals => 3,
            Self::Results => 4,
        }
    }

    #[must_use]
    pub const fn from_number(number: u8) -> Option<Self> {
        match number {
            1 => Some(Self::Name),
            2 => Some(Self::Stats),
            3 => Some(Self::Goals),
            4 => Some(Self::Results),
            _ => None,
        }
    }

    #[must_use]
    pub const fn next(&self) -> Option<Self> {
        match self {
            Self::Name => Some(Self::Stats),
            Self::Stats => Some(Self::Goals),
            Self::Goals => Some(Self::Results),
            Self::Results => None,
        }
    }

    #[must_use]
    pub const fn previous(&self) -> Option<Self> {
        match self {
            Self::Name => None,
            Self::Stats => Some(Self::Name),
            Self::Goals => Some(Self::Stats),
            Self::Results => Some(Self::Goals),
        }
    }
}

impl fmt::Display for OnboardingStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.number())
    }
}
