pub use super::accounts::Entity as Accounts;
pub use super::daily_log_entries::Entity as DailyLogEntries;
pub use super::health_profiles::Entity as HealthProfiles;
