//! Fixed business policy. None of these values are configurable.

pub mod nutrition {
    /// Daily calorie floor applied to every goal calculation.
    pub const MIN_GOAL_CALORIES: f64 = 1200.0;

    /// BMI used to estimate an ideal weight (midpoint of the normal band).
    pub const IDEAL_BMI: f64 = 22.0;

    pub const BMI_UNDERWEIGHT_BELOW: f64 = 18.5;

    pub const BMI_OVERWEIGHT_FROM: f64 = 25.0;

    pub const BMI_OBESE_FROM: f64 = 30.0;
}

pub mod limits {
    pub const MIN_HEIGHT_CM: f64 = 100.0;

    pub const MAX_HEIGHT_CM: f64 = 250.0;

    pub const MIN_WEIGHT_KG: f64 = 30.0;

    pub const MAX_WEIGHT_KG: f64 = 300.0;

    pub const MIN_AGE_YEARS: u32 = 13;

    pub const MAX_AGE_YEARS: u32 = 120;

    pub const MIN_PASSWORD_LEN: usize = 6;
}

pub mod food_log {
    /// Number of days covered by the calorie history, today included.
    pub const HISTORY_DAYS: i64 = 7;
}

pub mod admin {
    /// Number of days covered by the sign-up histogram, today included.
    pub const SIGNUP_WINDOW_DAYS: i64 = 7;
}
