//! Health-profile engine for a calorie tracker.
//!
//! Covers the metric calculator, the resumable onboarding wizard, profile
//! revisions that reset the food log, and account lifecycle rules. Storage is
//! reached through the traits in [`store`]; [`db::Store`] implements them on
//! SQLite.

pub mod calculator;
pub mod config;
pub mod constants;
pub mod db;
pub mod domain;
pub mod entities;
pub mod models;
pub mod services;
pub mod session;
pub mod state;
pub mod store;
pub mod validation;

pub use config::Config;
pub use state::Engine;

use crate::config::LogFormat;
use tracing_subscriber::EnvFilter;

/// Installs the global tracing subscriber. `RUST_LOG` overrides the
/// configured level.
pub fn init_tracing(config: &Config) -> anyhow::Result<()> {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.general.log_level));

    let registry = tracing_subscriber::registry().with(env_filter);

    match config.general.log_format {
        LogFormat::Json => registry
            .with(tracing_subscriber::fmt::layer().json())
            .try_init()?,
        LogFormat::Pretty => registry.with(tracing_subscriber::fmt::layer()).try_init()?,
    }

    Ok(())
}

/// Loads the config file, installs tracing and starts the engine.
pub async fn start() -> anyhow::Result<Engine> {
    let config = Config::load()?;
    config.validate()?;
    init_tracing(&config)?;

    Engine::new(config).await
}
