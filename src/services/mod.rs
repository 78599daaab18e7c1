pub mod onboarding_service;
pub mod onboarding_service_impl;
pub use onboarding_service::{
    GoalsStep, NameStep, OnboardingError, OnboardingForm, OnboardingService, OnboardingSession,
    OnboardingState, StatsStep,
};
pub use onboarding_service_impl::DefaultOnboardingService;

pub mod revision_service;
pub mod revision_service_impl;
pub use revision_service::{ProfileEdit, RevisionError, RevisionOutcome, RevisionService};
pub use revision_service_impl::DefaultRevisionService;

pub mod account_service;
pub mod account_service_impl;
pub use account_service::{
    AccountError, AccountService, AdminStats, DailySignups, Denial, Registration, SignIn,
};
pub use account_service_impl::DefaultAccountService;

pub mod food_log_service;
pub mod food_log_service_impl;
pub use food_log_service::{
    DailyCalories, DaySummary, FoodLogError, FoodLogService, WeekSummary,
};
pub use food_log_service_impl::DefaultFoodLogService;

#[cfg(test)]
pub(crate) mod test_support;
