//! Who is signed in, passed explicitly to the operations that need it.

use tokio::sync::Mutex;

use crate::domain::AccountId;

#[async_trait::async_trait]
pub trait Session: Send + Sync {
    async fn current_account_id(&self) -> Option<AccountId>;

    async fn sign_in(&self, account_id: AccountId);

    /// Signs out. A pending account-deleted notice is kept.
    async fn clear_session(&self);

    /// Arms the one-shot notice shown after a self-service deletion.
    async fn mark_account_just_deleted(&self);

    /// Returns whether the notice was armed and disarms it.
    async fn take_account_deleted_notice(&self) -> bool;
}

#[derive(Debug, Default)]
struct SessionState {
    account_id: Option<AccountId>,
    account_deleted_notice: bool,
}

/// Process-local session.
#[derive(Debug, Default)]
pub struct MemorySession {
    state: Mutex<SessionState>,
}

impl MemorySession {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait::async_trait]
impl Session for MemorySession {
    async fn current_account_id(&self) -> Option<AccountId> {
        self.state.lock().await.account_id
    }

    async fn sign_in(&self, account_id: AccountId) {
        self.state.lock().await.account_id = Some(account_id);
    }

    async fn clear_session(&self) {
        self.state.lock().await.account_id = None;
    }

    async fn mark_account_just_deleted(&self) {
        self.state.lock().await.account_deleted_notice = true;
    }

    async fn take_account_deleted_notice(&self) -> bool {
        std::mem::take(&mut self.state.lock().await.account_deleted_notice)
    }
}
