pub mod prelude;

pub mod accounts;
pub mod daily_log_entries;
pub mod health_profiles;
