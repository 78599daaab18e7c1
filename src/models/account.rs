use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{AccountId, AccountStatus, Role};

/// A registered account. The password never travels on this value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    pub id: AccountId,
    pub email: String,
    pub nickname: String,
    pub role: Role,
    pub admin_access: bool,
    pub is_super_admin: bool,
    pub status: AccountStatus,
    pub created_at: DateTime<Utc>,
}

impl Account {
    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.status.is_active()
    }

    /// Case-insensitive substring match on e-mail or nickname.
    #[must_use]
    pub fn matches_query(&self, query: &str) -> bool {
        let query = query.trim().to_lowercase();
        if query.is_empty() {
            return true;
        }
        self.email.to_lowercase().contains(&query) || self.nickname.to_lowercase().contains(&query)
    }
}

#[derive(Debug, Clone)]
pub struct NewAccount {
    pub email: String,
    pub password: String,
    pub role: Role,
    pub admin_access: bool,
    pub is_super_admin: bool,
}

impl NewAccount {
    /// A plain, active user without admin access.
    #[must_use]
    pub fn user(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
            role: Role::User,
            admin_access: false,
            is_super_admin: false,
        }
    }

    #[must_use]
    pub fn super_admin(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
            role: Role::Admin,
            admin_access: true,
            is_super_admin: true,
        }
    }
}
