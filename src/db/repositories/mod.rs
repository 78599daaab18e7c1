pub mod account;
pub mod log_entry;
pub mod profile;
