//! Local account list with an explicit readiness signal.

use std::sync::RwLock;

use tokio::sync::watch;

/// Accounts managed by this gateway's wallet.
///
/// The list is populated asynchronously after connect; readers await the
/// readiness signal instead of polling or sleeping.
pub struct AccountStore {
    accounts: RwLock<Vec<String>>,
    ready: watch::Sender<bool>,
}

impl AccountStore {
    pub fn new() -> Self {
        let (ready, _) = watch::channel(false);
        Self {
            accounts: RwLock::new(Vec::new()),
            ready,
        }
    }

    /// Replace the account list and mark the store ready.
    pub fn publish(&self, accounts: Vec<String>) {
        if let Ok(mut current) = self.accounts.write() {
            *current = accounts;
        }
        let _ = self.ready.send_replace(true);
    }

    pub fn is_ready(&self) -> bool {
        *self.ready.borrow()
    }

    /// The managed account names, awaiting readiness first.
    pub async fn my_accounts(&self) -> Vec<String> {
        let mut ready = self.ready.subscribe();
        // Cannot fail: the store owns the sender for its whole lifetime
        let _ = ready.wait_for(|published| *published).await;
        self.accounts
            .read()
            .map(|accounts| accounts.clone())
            .unwrap_or_default()
    }
}

impl Default for AccountStore {
    fn default() -> Self {
        Self::new()
    }
}
