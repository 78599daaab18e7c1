use std::sync::Arc;

use crate::config::Config;
use crate::db::Store;
use crate::services::{
    AccountService, DefaultAccountService, DefaultFoodLogService, DefaultOnboardingService,
    DefaultRevisionService, FoodLogService, OnboardingService, RevisionService,
};

/// The wired engine: one store shared by every service.
#[derive(Clone)]
pub struct Engine {
    pub config: Arc<Config>,

    pub store: Store,

    pub onboarding: Arc<dyn OnboardingService>,

    pub revisions: Arc<dyn RevisionService>,

    pub accounts: Arc<dyn AccountService>,

    pub food_log: Arc<dyn FoodLogService>,
}

impl Engine {
    /// Opens the database, applies migrations, seeds the super-admin when
    /// configured and wires the services.
    pub async fn new(config: Config) -> anyhow::Result<Self> {
        config.validate()?;

        let store = Store::connect(&config.database, &config.security).await?;

        if let Some((email, password)) = config.bootstrap.super_admin() {
            store.ensure_super_admin(email, password).await?;
        }

        Ok(Self::with_store(config, store))
    }

    /// Wires the services around an already opened store.
    #[must_use]
    pub fn with_store(config: Config, store: Store) -> Self {
        let shared = Arc::new(store.clone());

        let onboarding = Arc::new(DefaultOnboardingService::new(shared.clone(), shared.clone()))
            as Arc<dyn OnboardingService>;
        let revisions = Arc::new(DefaultRevisionService::new(shared.clone(), shared.clone()))
            as Arc<dyn RevisionService>;
        let accounts = Arc::new(DefaultAccountService::new(shared.clone(), shared.clone()))
            as Arc<dyn AccountService>;
        let food_log = Arc::new(DefaultFoodLogService::new(shared.clone(), shared))
            as Arc<dyn FoodLogService>;

        Self {
            config: Arc::new(config),
            store,
            onboarding,
            revisions,
            accounts,
            food_log,
        }
    }
}
