//! Field-level input validation.
//!
//! Validators never fail fast across fields: a step collects every problem into
//! [`FieldErrors`] so the caller can show all messages at once.

use chrono::{Datelike, NaiveDate};
use regex::Regex;
use serde::Serialize;
use std::fmt;
use std::sync::LazyLock;

use crate::constants::limits::{
    MAX_AGE_YEARS, MAX_HEIGHT_CM, MAX_WEIGHT_KG, MIN_AGE_YEARS, MIN_HEIGHT_CM, MIN_PASSWORD_LEN, MIN_WEIGHT_KG,
};

static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z0-9+_.-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}$").expect("valid e-mail regex")
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    FirstName,
    LastName,
    Height,
    Weight,
    BirthDate,
    Age,
    TargetWeight,
    Email,
    Password,
    ConfirmPassword,
    FoodName,
    Calories,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: Field,
    pub message: String,
}

/// Every failing field of one submission.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FieldErrors(Vec<FieldError>);

impl FieldErrors {
    #[must_use]
    pub const fn new() -> Self {
        Self(Vec::new())
    }

    #[must_use]
    pub fn single(field: Field, message: impl Into<String>) -> Self {
        let mut errors = Self::new();
        errors.push(field, message);
        errors
    }

    pub fn push(&mut self, field: Field, message: impl Into<String>) {
        self.0.push(FieldError {
            field,
            message: message.into(),
        });
    }

    /// Records the error of `result`, if any.
    pub fn check(&mut self, field: Field, result: Result<(), String>) {
        if let Err(message) = result {
            self.push(field, message);
        }
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn message_for(&self, field: Field) -> Option<&str> {
        self.0
            .iter()
            .find(|e| e.field == field)
            .map(|e| e.message.as_str())
    }

    #[must_use]
    pub fn contains(&self, field: Field) -> bool {
        self.message_for(field).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = &FieldError> {
        self.0.iter()
    }

    /// `Ok(())` when nothing was recorded.
    pub fn into_result(self) -> Result<(), Self> {
        if self.is_empty() { Ok(()) } else { Err(self) }
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self
            .0
            .iter()
            .map(|e| format!("{:?}: {}", e.field, e.message))
            .collect();
        f.write_str(&parts.join("; "))
    }
}

pub fn validate_name(value: &str, label: &str) -> Result<(), String> {
    if value.trim().is_empty() {
        return Err(format!("{label} is required"));
    }
    Ok(())
}

pub fn validate_height(height_cm: f64) -> Result<(), String> {
    if !height_cm.is_finite() {
        return Err("Please enter a valid number".to_string());
    }
    if height_cm < MIN_HEIGHT_CM {
        return Err(format!("Height must be at least {MIN_HEIGHT_CM} cm"));
    }
    if height_cm > MAX_HEIGHT_CM {
        return Err(format!("Height must be at most {MAX_HEIGHT_CM} cm"));
    }
    Ok(())
}

pub fn validate_weight(weight_kg: f64) -> Result<(), String> {
    if !weight_kg.is_finite() {
        return Err("Please enter a valid number".to_string());
    }
    if weight_kg < MIN_WEIGHT_KG {
        return Err(format!("Weight must be at least {MIN_WEIGHT_KG} kg"));
    }
    if weight_kg > MAX_WEIGHT_KG {
        return Err(format!("Weight must be at most {MAX_WEIGHT_KG} kg"));
    }
    Ok(())
}

pub fn validate_age(age_years: u32) -> Result<(), String> {
    if age_years < MIN_AGE_YEARS {
        return Err(format!(
            "You must be at least {MIN_AGE_YEARS} years old to use this app"
        ));
    }
    if age_years > MAX_AGE_YEARS {
        return Err(format!("Age must be at most {MAX_AGE_YEARS} years"));
    }
    Ok(())
}

pub fn validate_target_weight(target_kg: f64) -> Result<(), String> {
    if !target_kg.is_finite() || target_kg <= 0.0 {
        return Err("Enter valid target weight in kg".to_string());
    }
    Ok(())
}

/// Whole years between `birth_date` and `today`, or `None` for a future date.
#[must_use]
pub fn age_on(birth_date: NaiveDate, today: NaiveDate) -> Option<u32> {
    if birth_date > today {
        return None;
    }
    let mut years = today.year() - birth_date.year();
    if (today.month(), today.day()) < (birth_date.month(), birth_date.day()) {
        years -= 1;
    }
    u32::try_from(years).ok()
}

/// Validates a birth date and returns the resulting age.
pub fn validate_birth_date(birth_date: NaiveDate, today: NaiveDate) -> Result<u32, String> {
    if birth_date >= today {
        return Err("Please enter a valid date".to_string());
    }
    let age = age_on(birth_date, today).ok_or_else(|| "Please enter a valid date".to_string())?;
    validate_age(age)?;
    Ok(age)
}

pub fn validate_email(email: &str) -> Result<(), String> {
    if email.trim().is_empty() {
        return Err("Email cannot be empty".to_string());
    }
    if !EMAIL_RE.is_match(email.trim()) {
        return Err("Invalid email format".to_string());
    }
    Ok(())
}

pub fn validate_password(password: &str) -> Result<(), String> {
    if password.trim().is_empty() {
        return Err("Password cannot be empty".to_string());
    }
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(format!(
            "Password must be at least {MIN_PASSWORD_LEN} characters"
        ));
    }
    Ok(())
}

pub fn validate_confirm_password(password: &str, confirm: &str) -> Result<(), String> {
    if confirm.is_empty() {
        return Err("Please confirm your password".to_string());
    }
    if password != confirm {
        return Err("Passwords do not match".to_string());
    }
    Ok(())
}

pub fn validate_calories(calories: i32) -> Result<(), String> {
    if calories <= 0 {
        return Err("Calories must be a positive number".to_string());
    }
    Ok(())
}
