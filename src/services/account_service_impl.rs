//! Store-backed implementation of the `AccountService` trait.

use async_trait::async_trait;
use chrono::{Duration, NaiveDate};
use std::sync::Arc;
use tracing::{info, warn};

use crate::constants::admin::SIGNUP_WINDOW_DAYS;
use crate::domain::{AccountId, AccountStatus, Role};
use crate::models::{Account, NewAccount};
use crate::services::account_service::{
    AccountError, AccountService, AdminStats, DailySignups, Denial, Registration, SignIn,
};
use crate::session::Session;
use crate::store::{AccountStore, ProfileStore};
use crate::validation::{
    Field, FieldErrors, validate_confirm_password, validate_email, validate_password,
};

pub struct DefaultAccountService {
    accounts: Arc<dyn AccountStore>,
    profiles: Arc<dyn ProfileStore>,
}

fn reject_sign_in(reason: &'static str) {
    metrics::counter!("calorease_sign_in_rejected_total", "reason" => reason).increment(1);
}

impl DefaultAccountService {
    #[must_use]
    pub fn new(accounts: Arc<dyn AccountStore>, profiles: Arc<dyn ProfileStore>) -> Self {
        Self { accounts, profiles }
    }

    async fn load(&self, account_id: AccountId) -> Result<Account, AccountError> {
        self.accounts
            .load_account(account_id)
            .await?
            .ok_or(AccountError::NotFound(account_id))
    }

    async fn profile_matches(
        &self,
        account_id: AccountId,
        query: &str,
    ) -> Result<bool, AccountError> {
        Ok(self
            .profiles
            .load_profile(account_id)
            .await?
            .is_some_and(|p| p.matches_name(query)))
    }

    async fn require_admin(&self, actor_id: AccountId) -> Result<Account, AccountError> {
        let actor = self.load(actor_id).await?;
        if !actor.admin_access {
            warn!(%actor_id, "Admin action refused");
            return Err(AccountError::AuthorizationDenied(Denial::NotAdmin));
        }
        Ok(actor)
    }

    /// Applies the admin-access rules in order; the first that fails wins.
    fn check_admin_access_change(
        actor: &Account,
        target: &Account,
        grant: bool,
    ) -> Result<(), Denial> {
        if !actor.is_super_admin {
            return Err(Denial::NotSuperAdmin);
        }
        if actor.id == target.id && !grant {
            return Err(Denial::SelfRevoke);
        }
        if target.is_super_admin {
            return Err(Denial::ProtectedSuperAdmin);
        }
        Ok(())
    }
}

#[async_trait]
impl AccountService for DefaultAccountService {
    async fn register(&self, registration: Registration) -> Result<Account, AccountError> {
        let mut errors = FieldErrors::new();
        errors.check(Field::Email, validate_email(&registration.email));
        errors.check(Field::Password, validate_password(&registration.password));
        errors.check(
            Field::ConfirmPassword,
            validate_confirm_password(&registration.password, &registration.confirm_password),
        );
        errors.into_result()?;

        let email = registration.email.trim();
        if self.accounts.find_by_email(email).await?.is_some() {
            return Err(AccountError::EmailTaken);
        }

        let account = self
            .accounts
            .create_account(NewAccount::user(email, registration.password))
            .await?;

        info!(account_id = %account.id, "Account registered");
        Ok(account)
    }

    async fn authenticate(
        &self,
        session: &dyn Session,
        email: &str,
        password: &str,
    ) -> Result<SignIn, AccountError> {
        let mut errors = FieldErrors::new();
        errors.check(Field::Email, validate_email(email));
        if password.is_empty() {
            errors.push(Field::Password, "Password cannot be empty");
        }
        errors.into_result()?;

        let Some(account) = self.accounts.find_by_email(email.trim()).await? else {
            reject_sign_in("unknown_email");
            warn!("Sign-in refused: unknown email");
            return Err(AccountError::UnknownEmail);
        };

        if !account.is_active() {
            reject_sign_in("deactivated");
            warn!(account_id = %account.id, "Sign-in refused: account deactivated");
            return Err(AccountError::AccountDeactivated);
        }

        if !self.accounts.verify_password(account.id, password).await? {
            reject_sign_in("invalid_credentials");
            warn!(account_id = %account.id, "Sign-in refused: incorrect password");
            return Err(AccountError::InvalidCredentials);
        }

        let onboarding_completed = self
            .profiles
            .load_profile(account.id)
            .await?
            .is_some_and(|p| p.onboarding_completed);

        session.sign_in(account.id).await;
        let account_deleted_notice = session.take_account_deleted_notice().await;

        info!(account_id = %account.id, onboarding_completed, "Signed in");
        Ok(SignIn {
            account,
            onboarding_completed,
            account_deleted_notice,
        })
    }

    async fn toggle_status(
        &self,
        actor_id: AccountId,
        target_id: AccountId,
    ) -> Result<AccountStatus, AccountError> {
        self.require_admin(actor_id).await?;
        let mut target = self.load(target_id).await?;

        target.status = target.status.toggled();
        self.accounts.save_account(&target).await?;

        info!(%actor_id, %target_id, status = %target.status, "Account status changed");
        Ok(target.status)
    }

    async fn delete_own_account(&self, session: &dyn Session) -> Result<(), AccountError> {
        let account_id = session
            .current_account_id()
            .await
            .ok_or(AccountError::NotSignedIn)?;
        let mut account = self.load(account_id).await?;

        account.status = AccountStatus::Deactivated;
        self.accounts.save_account(&account).await?;

        session.clear_session().await;
        session.mark_account_just_deleted().await;

        info!(%account_id, "Account deactivated by its owner");
        Ok(())
    }

    async fn set_admin_access(
        &self,
        actor_id: AccountId,
        target_id: AccountId,
        grant: bool,
    ) -> Result<bool, AccountError> {
        let actor = self.load(actor_id).await?;
        let mut target = self.load(target_id).await?;

        if let Err(denial) = Self::check_admin_access_change(&actor, &target, grant) {
            warn!(%actor_id, %target_id, grant, %denial, "Admin access change refused");
            return Err(AccountError::AuthorizationDenied(denial));
        }

        target.admin_access = grant;
        target.role = if grant { Role::Admin } else { Role::User };
        self.accounts.save_account(&target).await?;

        info!(%actor_id, %target_id, grant, "Admin access changed");
        Ok(grant)
    }

    async fn list_accounts(
        &self,
        actor_id: AccountId,
        query: Option<&str>,
    ) -> Result<Vec<Account>, AccountError> {
        self.require_admin(actor_id).await?;
        let accounts = self.accounts.list_accounts().await?;

        let Some(query) = query else {
            return Ok(accounts);
        };

        let mut matched = Vec::new();
        for account in accounts {
            if account.matches_query(query) || self.profile_matches(account.id, query).await? {
                matched.push(account);
            }
        }
        Ok(matched)
    }

    async fn admin_stats(
        &self,
        actor_id: AccountId,
        today: NaiveDate,
    ) -> Result<AdminStats, AccountError> {
        self.require_admin(actor_id).await?;
        let accounts = self.accounts.list_accounts().await?;

        let active = accounts.iter().filter(|a| a.is_active()).count();
        let signups = (0..SIGNUP_WINDOW_DAYS)
            .rev()
            .map(|offset| {
                let day = today - Duration::days(offset);
                let count = accounts
                    .iter()
                    .filter(|a| a.created_at.date_naive() == day)
                    .count();
                DailySignups { day, count }
            })
            .collect();

        Ok(AdminStats {
            total: accounts.len(),
            active,
            deactivated: accounts.len() - active,
            signups,
        })
    }
}
