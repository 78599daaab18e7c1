//! Domain service for account lifecycle and administration.
//!
//! Handles registration, sign-in, soft deletion, status toggling and the
//! admin-access rules that protect the super-admin.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

use crate::domain::{AccountId, AccountStatus};
use crate::models::Account;
use crate::session::Session;
use crate::validation::FieldErrors;

/// Why an administrative action was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Denial {
    NotAdmin,
    NotSuperAdmin,
    SelfRevoke,
    ProtectedSuperAdmin,
}

impl fmt::Display for Denial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let message = match self {
            Self::NotAdmin => "admin access required",
            Self::NotSuperAdmin => "only the super-admin can change admin access",
            Self::SelfRevoke => "you cannot revoke your own admin access",
            Self::ProtectedSuperAdmin => "the super-admin's access cannot be changed",
        };
        f.write_str(message)
    }
}

#[derive(Debug, Error)]
pub enum AccountError {
    #[error("Validation failed: {0}")]
    Validation(FieldErrors),

    #[error("Account not found: {0}")]
    NotFound(AccountId),

    #[error("Not authorized: {0}")]
    AuthorizationDenied(Denial),

    #[error("An account with this email already exists")]
    EmailTaken,

    #[error("No account found with this email")]
    UnknownEmail,

    #[error("This account is no longer accessible as it was deleted. Please contact support.")]
    AccountDeactivated,

    #[error("Incorrect password")]
    InvalidCredentials,

    #[error("Not signed in")]
    NotSignedIn,

    #[error("Persistence error: {0}")]
    Persistence(String),
}

impl From<FieldErrors> for AccountError {
    fn from(errors: FieldErrors) -> Self {
        Self::Validation(errors)
    }
}

impl From<sea_orm::DbErr> for AccountError {
    fn from(err: sea_orm::DbErr) -> Self {
        Self::Persistence(err.to_string())
    }
}

impl From<anyhow::Error> for AccountError {
    fn from(err: anyhow::Error) -> Self {
        Self::Persistence(format!("{err:#}"))
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Registration {
    pub email: String,
    pub password: String,
    pub confirm_password: String,
}

/// Result of a successful sign-in.
#[derive(Debug, Clone, Serialize)]
pub struct SignIn {
    pub account: Account,
    /// Routing hint: dashboard when true, onboarding otherwise.
    pub onboarding_completed: bool,
    /// Whether a self-deletion notice was pending and has now been consumed.
    pub account_deleted_notice: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DailySignups {
    pub day: NaiveDate,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AdminStats {
    pub total: usize,
    pub active: usize,
    pub deactivated: usize,
    /// Oldest day first, ending at the requested day.
    pub signups: Vec<DailySignups>,
}

#[async_trait::async_trait]
pub trait AccountService: Send + Sync {
    /// Creates an active user account and its empty health profile.
    ///
    /// # Errors
    ///
    /// - Returns [`AccountError::Validation`] for malformed input
    /// - Returns [`AccountError::EmailTaken`] if the e-mail is registered
    async fn register(&self, registration: Registration) -> Result<Account, AccountError>;

    /// Checks credentials and starts `session` for the account.
    ///
    /// Deactivated accounts are refused before the password is checked.
    async fn authenticate(
        &self,
        session: &dyn Session,
        email: &str,
        password: &str,
    ) -> Result<SignIn, AccountError>;

    /// Flips a target account between active and deactivated.
    async fn toggle_status(
        &self,
        actor_id: AccountId,
        target_id: AccountId,
    ) -> Result<AccountStatus, AccountError>;

    /// Deactivates the signed-in account and signs it out.
    async fn delete_own_account(&self, session: &dyn Session) -> Result<(), AccountError>;

    /// Grants or revokes admin access and returns the resulting value.
    ///
    /// # Errors
    ///
    /// Returns [`AccountError::AuthorizationDenied`] without writing when the
    /// actor is not the super-admin, revokes their own access, or targets the
    /// super-admin.
    async fn set_admin_access(
        &self,
        actor_id: AccountId,
        target_id: AccountId,
        grant: bool,
    ) -> Result<bool, AccountError>;

    /// Accounts newest first. A `query` filters on e-mail, the account
    /// nickname, and the profile's first, last and nickname.
    async fn list_accounts(
        &self,
        actor_id: AccountId,
        query: Option<&str>,
    ) -> Result<Vec<Account>, AccountError>;

    async fn admin_stats(
        &self,
        actor_id: AccountId,
        today: NaiveDate,
    ) -> Result<AdminStats, AccountError>;
}
