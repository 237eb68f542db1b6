//! Account ledger interface for fee remittance
//!
//! The treasury pays registration and renewal fees out to the registry owner
//! and to referrers through this interface. Credits are all-or-nothing: a
//! batch either lands completely or leaves every balance untouched.

use crate::errors::{Result, TreasuryError};
use multipass_types::{Address, Amount};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Interface for account ledger operations.
pub trait AccountLedger: Send + Sync {
    /// Credit every `(account, amount)` pair, or none of them on failure.
    fn credit_batch(&mut self, credits: &[(Address, Amount)]) -> Result<()>;

    /// Retrieve an account's balance.
    fn balance_of(&self, account: &Address) -> Amount;

    /// Total value credited across all accounts.
    fn total_credited(&self) -> Amount;
}

/// Apply `credits` to `balances` after checking that none of them overflows.
fn apply_checked(
    balances: &mut HashMap<Address, Amount>,
    total: &mut Amount,
    credits: &[(Address, Amount)],
) -> Result<()> {
    let mut staged: HashMap<Address, Amount> = HashMap::new();
    let mut new_total = *total;

    for (account, amount) in credits {
        let current = staged
            .get(account)
            .copied()
            .unwrap_or_else(|| balances.get(account).copied().unwrap_or(0));
        let updated = current
            .checked_add(*amount)
            .ok_or(TreasuryError::MathOverflow { context: "account balance" })?;
        new_total = new_total
            .checked_add(*amount)
            .ok_or(TreasuryError::MathOverflow { context: "total credited" })?;
        staged.insert(*account, updated);
    }

    balances.extend(staged);
    *total = new_total;
    Ok(())
}

// -----------------------------------------------------------------------------
// In-memory implementation
// -----------------------------------------------------------------------------
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InMemoryAccountLedger {
    balances: HashMap<Address, Amount>,
    total_credited: Amount,
}

impl InMemoryAccountLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start with `account` already holding `balance`.
    pub fn with_balance(account: Address, balance: Amount) -> Self {
        let mut balances = HashMap::new();
        balances.insert(account, balance);
        Self {
            balances,
            total_credited: balance,
        }
    }

    /// Snapshot of every non-empty balance.
    pub fn balances(&self) -> &HashMap<Address, Amount> {
        &self.balances
    }
}

impl AccountLedger for InMemoryAccountLedger {
    fn credit_batch(&mut self, credits: &[(Address, Amount)]) -> Result<()> {
        apply_checked(&mut self.balances, &mut self.total_credited, credits)
    }

    fn balance_of(&self, account: &Address) -> Amount {
        self.balances.get(account).copied().unwrap_or(0)
    }

    fn total_credited(&self) -> Amount {
        self.total_credited
    }
}

// -----------------------------------------------------------------------------
// Mock ledger (records calls, can be told to refuse credits)
// -----------------------------------------------------------------------------
#[derive(Debug, Clone, Default)]
pub struct MockAccountLedger {
    balances: HashMap<Address, Amount>,
    total_credited: Amount,
    credit_calls: Vec<(Address, Amount)>,
    reject_credits: bool,
}

impl MockAccountLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// A ledger whose every credit fails, for exercising rollback paths.
    pub fn rejecting() -> Self {
        Self {
            reject_credits: true,
            ..Self::default()
        }
    }

    pub fn get_credit_calls(&self) -> &[(Address, Amount)] {
        &self.credit_calls
    }

    pub fn clear_calls(&mut self) {
        self.credit_calls.clear();
    }
}

impl AccountLedger for MockAccountLedger {
    fn credit_batch(&mut self, credits: &[(Address, Amount)]) -> Result<()> {
        if self.reject_credits {
            return Err(TreasuryError::TransferRejected {
                account: credits.first().map(|(a, _)| *a).unwrap_or_default(),
            });
        }
        apply_checked(&mut self.balances, &mut self.total_credited, credits)?;
        self.credit_calls.extend_from_slice(credits);
        Ok(())
    }

    fn balance_of(&self, account: &Address) -> Amount {
        self.balances.get(account).copied().unwrap_or(0)
    }

    fn total_credited(&self) -> Amount {
        self.total_credited
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn account(n: u8) -> Address {
        Address([n; 32])
    }

    #[test]
    fn test_in_memory_ledger_creation() {
        let ledger = InMemoryAccountLedger::new();
        assert_eq!(ledger.total_credited(), 0);
        assert_eq!(ledger.balance_of(&account(1)), 0);
    }

    #[test]
    fn test_batch_credit() {
        let mut ledger = InMemoryAccountLedger::new();
        ledger
            .credit_batch(&[(account(1), 1_000), (account(2), 300), (account(1), 5)])
            .unwrap();
        assert_eq!(ledger.balance_of(&account(1)), 1_005);
        assert_eq!(ledger.balance_of(&account(2)), 300);
        assert_eq!(ledger.total_credited(), 1_305);
    }

    #[test]
    fn test_overflow_leaves_balances_untouched() {
        let mut ledger = InMemoryAccountLedger::with_balance(account(1), Amount::MAX - 10);
        let err = ledger
            .credit_batch(&[(account(2), 7), (account(1), 11)])
            .unwrap_err();
        assert!(matches!(err, TreasuryError::MathOverflow { .. }));
        assert_eq!(ledger.balance_of(&account(1)), Amount::MAX - 10);
        assert_eq!(ledger.balance_of(&account(2)), 0);
    }

    #[test]
    fn test_mock_ledger_calls() {
        let mut mock = MockAccountLedger::new();
        mock.credit_batch(&[(account(1), 1_000)]).unwrap();
        mock.credit_batch(&[(account(2), 300)]).unwrap();

        assert_eq!(mock.get_credit_calls(), &[(account(1), 1_000), (account(2), 300)]);
        mock.clear_calls();
        assert!(mock.get_credit_calls().is_empty());
        assert_eq!(mock.total_credited(), 1_300);
    }

    #[test]
    fn test_rejecting_mock_credits_nothing() {
        let mut mock = MockAccountLedger::rejecting();
        let err = mock.credit_batch(&[(account(4), 10)]).unwrap_err();
        assert!(matches!(err, TreasuryError::TransferRejected { .. }));
        assert_eq!(mock.balance_of(&account(4)), 0);
    }
}
