pub mod account;
pub mod log_entry;
pub mod profile;

pub use account::{Account, NewAccount};
pub use log_entry::{DailyLogEntry, NewLogEntry};
pub use profile::HealthProfile;
