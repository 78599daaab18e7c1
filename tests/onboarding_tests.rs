mod common;

use calorease::domain::{BmiStatus, OnboardingStep, WeightGoal};
use calorease::services::{
    GoalsStep, OnboardingError, OnboardingService, OnboardingState,
};
use calorease::store::{AccountStore, ProfileStore};
use calorease::validation::Field;
use chrono::NaiveDate;
use common::*;

#[tokio::test]
async fn test_new_account_starts_at_step_one() {
    let (_db, engine) = setup_engine().await;
    let account = create_user(&engine.store, "new@example.com").await;

    let session = engine.onboarding.resume(account.id).await.unwrap();

    assert_eq!(session.state, OnboardingState::Step(OnboardingStep::Name));
    assert!(session.form.height_cm.is_none());
    assert!(session.form.metrics.is_none());
}

#[tokio::test]
async fn test_full_wizard_persists_metrics() {
    let (_db, engine) = setup_engine().await;
    let account = create_user(&engine.store, "ada@example.com").await;

    complete_onboarding(&engine.store, account.id).await;

    let profile = engine.store.load_profile(account.id).await.unwrap().unwrap();
    assert!(profile.onboarding_completed);
    assert_eq!(profile.current_onboarding_step, OnboardingStep::Results);
    assert_eq!(profile.age_years, 30);
    assert_eq!(profile.bmr, 1320);
    assert_eq!(profile.tdee, 2046);
    assert_eq!(profile.goal_calories, 1546);
    assert_eq!(profile.bmi_status, Some(BmiStatus::Normal));
    assert!((profile.ideal_weight_kg - 59.895).abs() < 1e-9);

    let session = engine.onboarding.resume(account.id).await.unwrap();
    assert!(session.is_completed());
}

#[tokio::test]
async fn test_resume_after_step_two_recomputes_preview() {
    let (_db, engine) = setup_engine().await;
    let account = create_user(&engine.store, "resume@example.com").await;
    let onboarding = onboarding_at_fixed_day(&engine.store);

    onboarding.commit_name(account.id, name_step()).await.unwrap();
    onboarding.commit_stats(account.id, stats_step()).await.unwrap();

    let session = onboarding.resume(account.id).await.unwrap();
    assert_eq!(session.state, OnboardingState::Step(OnboardingStep::Stats));
    assert_eq!(session.form.first_name, "Ada");
    assert_eq!(session.form.height_cm, Some(165.0));
    assert_eq!(session.form.age_years, Some(30));

    let preview = session.form.metrics.expect("preview from stored stats");
    assert!((preview.bmr - 1320.25).abs() < 1e-9);
}

#[tokio::test]
async fn test_commit_name_sets_account_nickname() {
    let (_db, engine) = setup_engine().await;
    let account = create_user(&engine.store, "nick@example.com").await;
    let onboarding = onboarding_at_fixed_day(&engine.store);

    let mut step = name_step();
    step.nickname = Some("  Countess ".to_string());
    onboarding.commit_name(account.id, step).await.unwrap();

    let stored = engine.store.load_account(account.id).await.unwrap().unwrap();
    assert_eq!(stored.nickname, "Countess");
}

#[tokio::test]
async fn test_underage_birth_date_is_rejected_without_writing() {
    let (_db, engine) = setup_engine().await;
    let account = create_user(&engine.store, "young@example.com").await;
    let onboarding = onboarding_at_fixed_day(&engine.store);
    onboarding.commit_name(account.id, name_step()).await.unwrap();

    let mut step = stats_step();
    step.birth_date = NaiveDate::from_ymd_opt(2014, 1, 1);
    let err = onboarding.commit_stats(account.id, step).await.unwrap_err();

    let OnboardingError::Validation(errors) = err else {
        panic!("expected validation error, got {err:?}");
    };
    assert!(errors.contains(Field::BirthDate));

    let profile = engine.store.load_profile(account.id).await.unwrap().unwrap();
    assert_eq!(profile.current_onboarding_step, OnboardingStep::Name);
    assert_eq!(profile.weight_kg, 0.0);
}

#[tokio::test]
async fn test_enter_results_requires_body_stats() {
    let (_db, engine) = setup_engine().await;
    let account = create_user(&engine.store, "early@example.com").await;
    let onboarding = onboarding_at_fixed_day(&engine.store);
    onboarding.commit_name(account.id, name_step()).await.unwrap();

    let err = onboarding.enter_results(account.id).await.unwrap_err();
    assert!(matches!(err, OnboardingError::Validation(_)));

    let profile = engine.store.load_profile(account.id).await.unwrap().unwrap();
    assert_eq!(profile.current_onboarding_step, OnboardingStep::Name);
}

#[tokio::test]
async fn test_finalize_with_missing_target_weight_fails() {
    let (_db, engine) = setup_engine().await;
    let account = create_user(&engine.store, "target@example.com").await;
    let onboarding = onboarding_at_fixed_day(&engine.store);
    onboarding.commit_name(account.id, name_step()).await.unwrap();
    onboarding.commit_stats(account.id, stats_step()).await.unwrap();

    let err = onboarding.finalize(account.id).await.unwrap_err();
    let OnboardingError::Validation(errors) = err else {
        panic!("expected validation error, got {err:?}");
    };
    assert!(errors.contains(Field::TargetWeight));

    let profile = engine.store.load_profile(account.id).await.unwrap().unwrap();
    assert!(!profile.onboarding_completed);
}

#[tokio::test]
async fn test_steps_are_closed_after_completion() {
    let (_db, engine) = setup_engine().await;
    let account = create_user(&engine.store, "done@example.com").await;
    complete_onboarding(&engine.store, account.id).await;
    let onboarding = onboarding_at_fixed_day(&engine.store);

    let err = onboarding
        .commit_goals(
            account.id,
            GoalsStep {
                target_weight_kg: 70.0,
                weight_goal: WeightGoal::Gain1Kg,
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, OnboardingError::AlreadyCompleted(_)));

    let again = onboarding.finalize(account.id).await.unwrap();
    assert_eq!(again.goal_calories, 1546);
}

#[tokio::test]
async fn test_resume_unknown_account() {
    let (_db, engine) = setup_engine().await;
    let err = engine
        .onboarding
        .resume(calorease::domain::AccountId::new(999))
        .await
        .unwrap_err();
    assert!(matches!(err, OnboardingError::NotFound(_)));
}

#[tokio::test]
async fn test_store_step_writes() {
    let (_db, engine) = setup_engine().await;
    let account = create_user(&engine.store, "steps@example.com").await;

    engine
        .store
        .set_onboarding_step(account.id, OnboardingStep::Goals)
        .await
        .unwrap();
    let profile = engine.store.load_profile(account.id).await.unwrap().unwrap();
    assert_eq!(profile.current_onboarding_step, OnboardingStep::Goals);
    assert!(!profile.onboarding_completed);

    let onboarding = onboarding_at_fixed_day(&engine.store);
    onboarding.commit_name(account.id, name_step()).await.unwrap();
    onboarding.commit_stats(account.id, stats_step()).await.unwrap();
    onboarding.commit_goals(account.id, goals_step()).await.unwrap();
    let mut profile = engine.store.load_profile(account.id).await.unwrap().unwrap();
    profile.recompute();
    engine.store.save_profile(&profile).await.unwrap();

    engine.store.mark_onboarding_complete(account.id).await.unwrap();
    let profile = engine.store.load_profile(account.id).await.unwrap().unwrap();
    assert!(profile.onboarding_completed);
    assert_eq!(profile.current_onboarding_step, OnboardingStep::Results);
    assert_eq!(profile.goal_calories, 1546);

    let missing = engine
        .store
        .set_onboarding_step(calorease::domain::AccountId::new(404), OnboardingStep::Stats)
        .await;
    assert!(missing.is_err());
}
