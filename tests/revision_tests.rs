mod common;

use calorease::domain::{AccountId, WeightGoal};
use calorease::services::{ProfileEdit, RevisionError, RevisionService};
use calorease::store::{LogStore, ProfileStore};
use calorease::Engine;
use common::*;
use sea_orm::ConnectionTrait;

async fn onboarded(engine: &Engine, email: &str) -> AccountId {
    let account = create_user(&engine.store, email).await;
    complete_onboarding(&engine.store, account.id).await;
    account.id
}

async fn entries_today(engine: &Engine, account_id: AccountId) -> usize {
    engine
        .store
        .entries_for_day(account_id, today())
        .await
        .unwrap()
        .len()
}

#[tokio::test]
async fn test_weight_change_recomputes_and_resets_logs() {
    let (_db, engine) = setup_engine().await;
    let id = onboarded(&engine, "weight@example.com").await;
    log_food(&engine.store, id, "Oats", 350).await;
    log_food(&engine.store, id, "Salad", 420).await;

    let outcome = engine.revisions.change_weight(id, 70.0).await.unwrap();

    assert!(outcome.logs_reset);
    assert_eq!(outcome.entries_removed, 2);
    assert_eq!(entries_today(&engine, id).await, 0);

    // 10 * 70 + 6.25 * 165 - 5 * 30 - 161 = 1420.25
    let stored = engine.store.load_profile(id).await.unwrap().unwrap();
    assert_eq!(stored.weight_kg, 70.0);
    assert_eq!(stored.bmr, 1420);
    assert_eq!(stored.tdee, 2201);
    assert_eq!(stored.goal_calories, 1701);
    assert_eq!(stored, outcome.profile);
}

#[tokio::test]
async fn test_goal_change_resets_logs_of_that_account_only() {
    let (_db, engine) = setup_engine().await;
    let id = onboarded(&engine, "goal@example.com").await;
    let other = onboarded(&engine, "bystander@example.com").await;
    log_food(&engine.store, id, "Toast", 200).await;
    log_food(&engine.store, other, "Rice", 500).await;

    let outcome = engine
        .revisions
        .change_goal(id, WeightGoal::Maintain)
        .await
        .unwrap();

    assert_eq!(outcome.profile.goal_calories, 2046);
    assert_eq!(entries_today(&engine, id).await, 0);
    assert_eq!(entries_today(&engine, other).await, 1);
}

#[tokio::test]
async fn test_goal_is_floored_at_minimum() {
    let (_db, engine) = setup_engine().await;
    let id = onboarded(&engine, "floor@example.com").await;

    let outcome = engine
        .revisions
        .change_goal(id, WeightGoal::Lose1Kg)
        .await
        .unwrap();

    assert_eq!(outcome.profile.goal_calories, 1200);
}

#[tokio::test]
async fn test_name_only_edit_keeps_logs() {
    let (_db, engine) = setup_engine().await;
    let id = onboarded(&engine, "rename@example.com").await;
    log_food(&engine.store, id, "Apple", 95).await;

    let outcome = engine
        .revisions
        .edit_profile(
            id,
            ProfileEdit {
                first_name: Some("Augusta".to_string()),
                ..ProfileEdit::default()
            },
        )
        .await
        .unwrap();

    assert!(!outcome.logs_reset);
    assert_eq!(outcome.profile.first_name, "Augusta");
    assert_eq!(entries_today(&engine, id).await, 1);
}

#[tokio::test]
async fn test_age_edit_changing_goal_resets_logs() {
    let (_db, engine) = setup_engine().await;
    let id = onboarded(&engine, "age@example.com").await;
    log_food(&engine.store, id, "Apple", 95).await;

    let outcome = engine
        .revisions
        .edit_profile(
            id,
            ProfileEdit {
                age_years: Some(50),
                ..ProfileEdit::default()
            },
        )
        .await
        .unwrap();

    assert!(outcome.logs_reset);
    assert_eq!(outcome.profile.age_years, 50);
    assert!(outcome.profile.birth_date.is_none());
    assert_eq!(entries_today(&engine, id).await, 0);
}

#[tokio::test]
async fn test_invalid_weight_writes_nothing() {
    let (_db, engine) = setup_engine().await;
    let id = onboarded(&engine, "invalid@example.com").await;
    log_food(&engine.store, id, "Apple", 95).await;

    let err = engine.revisions.change_weight(id, 10.0).await.unwrap_err();

    assert!(matches!(err, RevisionError::Validation(_)));
    assert_eq!(entries_today(&engine, id).await, 1);
    let stored = engine.store.load_profile(id).await.unwrap().unwrap();
    assert_eq!(stored.weight_kg, 60.0);
}

#[tokio::test]
async fn test_revision_before_onboarding_is_refused() {
    let (_db, engine) = setup_engine().await;
    let account = create_user(&engine.store, "pending@example.com").await;

    let err = engine
        .revisions
        .change_goal(account.id, WeightGoal::Maintain)
        .await
        .unwrap_err();

    assert!(matches!(err, RevisionError::OnboardingIncomplete(_)));
}

#[tokio::test]
async fn test_failed_profile_write_rolls_back_log_reset() {
    let (_db, engine) = setup_engine().await;
    let id = onboarded(&engine, "rollback@example.com").await;
    log_food(&engine.store, id, "Oats", 350).await;
    log_food(&engine.store, id, "Soup", 250).await;

    engine
        .store
        .conn
        .execute_unprepared(
            "CREATE TRIGGER block_profile_update BEFORE UPDATE ON health_profiles \
             BEGIN SELECT RAISE(ABORT, 'profile writes blocked'); END;",
        )
        .await
        .unwrap();

    let err = engine.revisions.change_weight(id, 72.0).await.unwrap_err();
    assert!(matches!(err, RevisionError::Persistence(_)));

    assert_eq!(entries_today(&engine, id).await, 2);
    let stored = engine.store.load_profile(id).await.unwrap().unwrap();
    assert_eq!(stored.weight_kg, 60.0);
    assert_eq!(stored.goal_calories, 1546);
}

#[tokio::test]
async fn test_implausible_age_is_rejected() {
    let (_db, engine) = setup_engine().await;
    let id = onboarded(&engine, "ancient@example.com").await;

    let err = engine
        .revisions
        .edit_profile(
            id,
            ProfileEdit {
                age_years: Some(3_000_000_000),
                ..ProfileEdit::default()
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, RevisionError::Validation(_)));

    let stored = engine.store.load_profile(id).await.unwrap().unwrap();
    assert_eq!(stored.age_years, 30);
    assert_eq!(stored.bmr, 1320);
}
