#![allow(dead_code)]

use std::path::PathBuf;
use std::sync::Arc;

use calorease::config::{Config, SecurityConfig};
use calorease::db::Store;
use calorease::domain::{AccountId, ActivityLevel, Gender, MealType, WeightGoal};
use calorease::models::{Account, NewAccount, NewLogEntry};
use calorease::services::{
    DefaultOnboardingService, GoalsStep, NameStep, OnboardingService, StatsStep,
};
use calorease::store::{AccountStore, LogStore};
use calorease::Engine;
use chrono::NaiveDate;

pub struct TestDb {
    pub path: PathBuf,
    pub url: String,
}

impl TestDb {
    pub fn new() -> Self {
        let path = std::env::temp_dir().join(format!("calorease-test-{}.db", uuid::Uuid::new_v4()));
        let url = format!("sqlite:{}?mode=rwc", path.display());
        Self { path, url }
    }
}

impl Drop for TestDb {
    fn drop(&mut self) {
        let _ = std::fs::remove_file(&self.path);
    }
}

/// Argon2 parameters small enough to keep the suite fast.
pub fn cheap_security() -> SecurityConfig {
    SecurityConfig {
        argon2_memory_cost_kib: 1024,
        argon2_time_cost: 1,
        argon2_parallelism: 1,
    }
}

pub fn test_config(db: &TestDb) -> Config {
    let mut config = Config::default();
    config.database.url = db.url.clone();
    config.database.max_connections = 1;
    config.security = cheap_security();
    config
}

pub async fn setup_engine() -> (TestDb, Engine) {
    let db = TestDb::new();
    let store = Store::with_pool_options(&db.url, 1, 1, cheap_security())
        .await
        .expect("open test database");
    let engine = Engine::with_store(test_config(&db), store);
    (db, engine)
}

pub fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 10, 18).unwrap()
}

/// Onboarding service over `store` with the clock pinned to [`today`].
pub fn onboarding_at_fixed_day(store: &Store) -> DefaultOnboardingService {
    let shared = Arc::new(store.clone());
    DefaultOnboardingService::new(shared.clone(), shared).with_today(Arc::new(today))
}

pub async fn create_user(store: &Store, email: &str) -> Account {
    store
        .create_account(NewAccount::user(email, "secret1"))
        .await
        .expect("create account")
}

pub fn name_step() -> NameStep {
    NameStep {
        first_name: "Ada".to_string(),
        last_name: "Lovelace".to_string(),
        nickname: None,
    }
}

/// Female, 165 cm, 60 kg, born 30 years before [`today`], moderately active.
pub fn stats_step() -> StatsStep {
    StatsStep {
        gender: Gender::Female,
        height_cm: 165.0,
        weight_kg: 60.0,
        birth_date: NaiveDate::from_ymd_opt(1996, 5, 1),
        activity_level: ActivityLevel::Moderate,
    }
}

pub fn goals_step() -> GoalsStep {
    GoalsStep {
        target_weight_kg: 58.0,
        weight_goal: WeightGoal::LoseHalfKg,
    }
}

/// Runs the whole wizard for `account_id`.
pub async fn complete_onboarding(store: &Store, account_id: AccountId) {
    let onboarding = onboarding_at_fixed_day(store);
    onboarding.commit_name(account_id, name_step()).await.unwrap();
    onboarding.commit_stats(account_id, stats_step()).await.unwrap();
    onboarding.commit_goals(account_id, goals_step()).await.unwrap();
    onboarding.enter_results(account_id).await.unwrap();
    onboarding.finalize(account_id).await.unwrap();
}

pub async fn log_food(store: &Store, account_id: AccountId, name: &str, calories: i32) {
    store
        .insert_entry(
            account_id,
            &NewLogEntry {
                day: today(),
                food_name: name.to_string(),
                calories,
                meal_type: MealType::Snack,
            },
        )
        .await
        .expect("insert entry");
}
