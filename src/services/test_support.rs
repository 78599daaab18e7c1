//! In-memory store used by the service unit tests.

use anyhow::{Result, bail};
use chrono::{NaiveDate, Utc};
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use tokio::sync::Mutex;

use crate::domain::{AccountId, AccountStatus, EntryId, OnboardingStep};
use crate::models::{Account, DailyLogEntry, HealthProfile, NewAccount, NewLogEntry};
use crate::store::{AccountStore, LogStore, ProfileStore, RevisionStore};

#[derive(Default)]
struct State {
    accounts: HashMap<AccountId, (Account, String)>,
    profiles: HashMap<AccountId, HealthProfile>,
    entries: Vec<DailyLogEntry>,
    next_account_id: i32,
    next_entry_id: i32,
}

#[derive(Default)]
pub struct MemoryStore {
    state: Mutex<State>,
    fail_profile_writes: AtomicBool,
    fail_account_writes: AtomicBool,
    profile_writes: AtomicUsize,
}

impl MemoryStore {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn fail_profile_writes(&self, fail: bool) {
        self.fail_profile_writes.store(fail, Ordering::SeqCst);
    }

    pub fn fail_account_writes(&self, fail: bool) {
        self.fail_account_writes.store(fail, Ordering::SeqCst);
    }

    pub fn profile_writes(&self) -> usize {
        self.profile_writes.load(Ordering::SeqCst)
    }

    fn check_profile_write(&self) -> Result<()> {
        if self.fail_profile_writes.load(Ordering::SeqCst) {
            bail!("profile write rejected");
        }
        self.profile_writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    pub async fn entry_count(&self, account_id: AccountId) -> usize {
        let state = self.state.lock().await;
        state
            .entries
            .iter()
            .filter(|e| e.account_id == account_id)
            .count()
    }

    pub async fn seed_entries(&self, account_id: AccountId, count: usize) {
        for i in 0..count {
            let entry = NewLogEntry {
                day: NaiveDate::from_ymd_opt(2026, 3, 1).unwrap(),
                food_name: format!("food {i}"),
                calories: 100,
                meal_type: crate::domain::MealType::Snack,
            };
            self.insert_entry(account_id, &entry).await.unwrap();
        }
    }

    /// Stores a profile directly, bypassing the failure switch.
    pub async fn put_profile(&self, profile: HealthProfile) {
        self.state
            .lock()
            .await
            .profiles
            .insert(profile.account_id, profile);
    }

    pub async fn add_account(&self, new_account: NewAccount) -> Account {
        self.create_account(new_account).await.unwrap()
    }
}

#[async_trait::async_trait]
impl ProfileStore for MemoryStore {
    async fn load_profile(&self, account_id: AccountId) -> Result<Option<HealthProfile>> {
        Ok(self.state.lock().await.profiles.get(&account_id).cloned())
    }

    async fn save_profile(&self, profile: &HealthProfile) -> Result<()> {
        self.check_profile_write()?;
        self.state
            .lock()
            .await
            .profiles
            .insert(profile.account_id, profile.clone());
        Ok(())
    }

    async fn set_onboarding_step(&self, account_id: AccountId, step: OnboardingStep) -> Result<()> {
        self.check_profile_write()?;
        let mut state = self.state.lock().await;
        let Some(profile) = state.profiles.get_mut(&account_id) else {
            bail!("no profile");
        };
        profile.current_onboarding_step = step;
        Ok(())
    }

    async fn mark_onboarding_complete(&self, account_id: AccountId) -> Result<()> {
        self.check_profile_write()?;
        let mut state = self.state.lock().await;
        let Some(profile) = state.profiles.get_mut(&account_id) else {
            bail!("no profile");
        };
        profile.onboarding_completed = true;
        profile.current_onboarding_step = OnboardingStep::Results;
        Ok(())
    }
}

#[async_trait::async_trait]
impl LogStore for MemoryStore {
    async fn delete_all_entries(&self, account_id: AccountId) -> Result<u64> {
        let mut state = self.state.lock().await;
        let before = state.entries.len();
        state.entries.retain(|e| e.account_id != account_id);
        Ok((before - state.entries.len()) as u64)
    }

    async fn insert_entry(
        &self,
        account_id: AccountId,
        entry: &NewLogEntry,
    ) -> Result<DailyLogEntry> {
        let mut state = self.state.lock().await;
        state.next_entry_id += 1;
        let stored = DailyLogEntry {
            id: EntryId::new(state.next_entry_id),
            account_id,
            day: entry.day,
            food_name: entry.food_name.clone(),
            calories: entry.calories,
            meal_type: entry.meal_type,
        };
        state.entries.push(stored.clone());
        Ok(stored)
    }

    async fn entries_for_day(
        &self,
        account_id: AccountId,
        day: NaiveDate,
    ) -> Result<Vec<DailyLogEntry>> {
        let state = self.state.lock().await;
        let mut entries: Vec<_> = state
            .entries
            .iter()
            .filter(|e| e.account_id == account_id && e.day == day)
            .cloned()
            .collect();
        entries.sort_by(|a, b| b.id.cmp(&a.id));
        Ok(entries)
    }

    async fn entries_between(
        &self,
        account_id: AccountId,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<DailyLogEntry>> {
        let state = self.state.lock().await;
        let mut entries: Vec<_> = state
            .entries
            .iter()
            .filter(|e| e.account_id == account_id && e.day >= from && e.day <= to)
            .cloned()
            .collect();
        entries.sort_by(|a, b| a.day.cmp(&b.day).then(a.id.cmp(&b.id)));
        Ok(entries)
    }

    async fn update_entry(
        &self,
        account_id: AccountId,
        entry_id: EntryId,
        entry: &NewLogEntry,
    ) -> Result<Option<DailyLogEntry>> {
        let mut state = self.state.lock().await;
        let Some(stored) = state
            .entries
            .iter_mut()
            .find(|e| e.id == entry_id && e.account_id == account_id)
        else {
            return Ok(None);
        };
        stored.day = entry.day;
        stored.food_name = entry.food_name.trim().to_string();
        stored.calories = entry.calories;
        stored.meal_type = entry.meal_type;
        Ok(Some(stored.clone()))
    }

    async fn delete_entry(&self, account_id: AccountId, entry_id: EntryId) -> Result<bool> {
        let mut state = self.state.lock().await;
        let before = state.entries.len();
        state
            .entries
            .retain(|e| !(e.id == entry_id && e.account_id == account_id));
        Ok(state.entries.len() < before)
    }
}

#[async_trait::async_trait]
impl RevisionStore for MemoryStore {
    async fn save_profile_and_reset_logs(&self, profile: &HealthProfile) -> Result<u64> {
        self.check_profile_write()?;
        let mut state = self.state.lock().await;
        let before = state.entries.len();
        state.entries.retain(|e| e.account_id != profile.account_id);
        let removed = (before - state.entries.len()) as u64;
        state.profiles.insert(profile.account_id, profile.clone());
        Ok(removed)
    }
}

#[async_trait::async_trait]
impl AccountStore for MemoryStore {
    async fn load_account(&self, account_id: AccountId) -> Result<Option<Account>> {
        let state = self.state.lock().await;
        Ok(state.accounts.get(&account_id).map(|(a, _)| a.clone()))
    }

    async fn save_account(&self, account: &Account) -> Result<()> {
        if self.fail_account_writes.load(Ordering::SeqCst) {
            bail!("account write rejected");
        }
        let mut state = self.state.lock().await;
        let Some((stored, _)) = state.accounts.get_mut(&account.id) else {
            bail!("no account");
        };
        let is_super_admin = stored.is_super_admin || account.is_super_admin;
        *stored = Account {
            is_super_admin,
            ..account.clone()
        };
        Ok(())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<Account>> {
        let state = self.state.lock().await;
        Ok(state
            .accounts
            .values()
            .find(|(a, _)| a.email == email.trim())
            .map(|(a, _)| a.clone()))
    }

    async fn create_account(&self, new_account: NewAccount) -> Result<Account> {
        let mut state = self.state.lock().await;
        state.next_account_id += 1;
        let id = AccountId::new(state.next_account_id);
        let account = Account {
            id,
            email: new_account.email.trim().to_string(),
            nickname: String::new(),
            role: new_account.role,
            admin_access: new_account.admin_access,
            is_super_admin: new_account.is_super_admin,
            status: AccountStatus::Active,
            created_at: Utc::now(),
        };
        state
            .accounts
            .insert(id, (account.clone(), new_account.password));
        state.profiles.insert(id, HealthProfile::new_default(id));
        Ok(account)
    }

    async fn verify_password(&self, account_id: AccountId, password: &str) -> Result<bool> {
        let state = self.state.lock().await;
        Ok(state
            .accounts
            .get(&account_id)
            .is_some_and(|(_, stored)| stored == password))
    }

    async fn list_accounts(&self) -> Result<Vec<Account>> {
        let state = self.state.lock().await;
        let mut accounts: Vec<_> = state.accounts.values().map(|(a, _)| a.clone()).collect();
        accounts.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(accounts)
    }
}

/// A completed profile: female, 165 cm, 60 kg, 30 years, sedentary, maintain.
pub fn completed_profile(account_id: AccountId) -> HealthProfile {
    let mut profile = HealthProfile::new_default(account_id);
    profile.first_name = "Ada".to_string();
    profile.last_name = "Lovelace".to_string();
    profile.gender = crate::domain::Gender::Female;
    profile.height_cm = 165.0;
    profile.weight_kg = 60.0;
    profile.age_years = 30;
    profile.target_weight_kg = 58.0;
    profile.recompute();
    profile.onboarding_completed = true;
    profile.current_onboarding_step = OnboardingStep::Results;
    profile
}
