use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::models::account::Account;

/// Host callback invoked once when a session finishes.
pub trait PointsReporter: Send + Sync {
    fn on_points_earned(&self, points: u32);
}

/// In-memory per-wallet points, XP and level.
#[derive(Default)]
pub struct AccountLedger {
    accounts: RwLock<HashMap<String, Account>>,
}

impl AccountLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn credit(&self, address: &str, points: u32) -> Account {
        let mut accounts = match self.accounts.write() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        let account = accounts
            .entry(address.to_string())
            .or_insert_with(|| Account::new(address));
        account.credit(points);

        tracing::info!(
            address,
            points,
            total = account.points,
            level = account.level,
            "Points credited"
        );
        account.clone()
    }

    pub fn get(&self, address: &str) -> Option<Account> {
        let accounts = match self.accounts.read() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        accounts.get(address).cloned()
    }

    /// Reporter that credits `address` on this ledger.
    pub fn reporter_for(self: &Arc<Self>, address: &str) -> Arc<dyn PointsReporter> {
        Arc::new(LedgerReporter {
            ledger: Arc::clone(self),
            address: address.to_string(),
        })
    }
}

struct LedgerReporter {
    ledger: Arc<AccountLedger>,
    address: String,
}

impl PointsReporter for LedgerReporter {
    fn on_points_earned(&self, points: u32) {
        self.ledger.credit(&self.address, points);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reporter_credits_bound_address() {
        let ledger = Arc::new(AccountLedger::new());
        let reporter = ledger.reporter_for("0xaaa");

        reporter.on_points_earned(300);
        reporter.on_points_earned(200);

        let account = ledger.get("0xaaa").unwrap();
        assert_eq!(account.points, 500);
        assert_eq!(account.games_played, 2);
        assert!(ledger.get("0xbbb").is_none());
    }
}
