//! Fee settlement for registrations and renewals
//!
//! A payment is first turned into a [`Settlement`] with checked arithmetic,
//! before the registry commits any state. Once the ledger mutation is final,
//! the settlement is executed against the [`AccountLedger`]. Statistics are
//! kept for monitoring.

use crate::account_ledger::AccountLedger;
use crate::errors::{Result, TreasuryError};
use multipass_types::{Address, Amount};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// How one payment is split between the referrer and the registry owner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settlement {
    pub payment: Amount,
    pub owner_share: Amount,
    pub referral: Option<(Address, Amount)>,
}

impl Settlement {
    /// Split `payment`, paying `referral.1` to `referral.0` and the rest to the owner.
    pub fn plan(payment: Amount, referral: Option<(Address, Amount)>) -> Result<Self> {
        let owner_share = match referral {
            Some((_, reward)) => payment
                .checked_sub(reward)
                .ok_or(TreasuryError::MathOverflow { context: "owner share" })?,
            None => payment,
        };

        Ok(Self {
            payment,
            owner_share,
            referral,
        })
    }
}

/// Fee settlement statistics for monitoring and analytics
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreasuryStats {
    pub total_collected: Amount,
    pub paid_to_owner: Amount,
    pub paid_to_referrers: Amount,
    pub settlements: u64,
}

/// Forwards collected fees to the registry owner and referrers.
pub struct FeeTreasury {
    ledger: Box<dyn AccountLedger>,
    stats: TreasuryStats,
}

impl FeeTreasury {
    pub fn new(ledger: Box<dyn AccountLedger>) -> Self {
        Self {
            ledger,
            stats: TreasuryStats::default(),
        }
    }

    /// Execute a planned settlement. Nothing is credited if any credit fails.
    pub fn settle(&mut self, owner: &Address, settlement: &Settlement) -> Result<()> {
        if settlement.payment == 0 {
            debug!(target: "treasury", "Nothing to settle");
            return Ok(());
        }

        let mut credits = Vec::with_capacity(2);
        if let Some((referrer, reward)) = settlement.referral {
            if reward > 0 {
                credits.push((referrer, reward));
            }
        }
        if settlement.owner_share > 0 {
            credits.push((*owner, settlement.owner_share));
        }

        let referral_paid = settlement.referral.map(|(_, r)| r).unwrap_or(0);
        let next = TreasuryStats {
            total_collected: checked(self.stats.total_collected, settlement.payment, "total collected")?,
            paid_to_owner: checked(self.stats.paid_to_owner, settlement.owner_share, "owner payouts")?,
            paid_to_referrers: checked(self.stats.paid_to_referrers, referral_paid, "referral payouts")?,
            settlements: self.stats.settlements.saturating_add(1),
        };

        self.ledger.credit_batch(&credits)?;
        self.stats = next;

        info!(
            target: "treasury",
            owner = %owner,
            owner_share = %settlement.owner_share,
            referral = %referral_paid,
            "Settled payment of {}",
            settlement.payment
        );
        Ok(())
    }

    pub fn balance_of(&self, account: &Address) -> Amount {
        self.ledger.balance_of(account)
    }

    pub fn stats(&self) -> TreasuryStats {
        self.stats
    }

    pub fn ledger(&self) -> &dyn AccountLedger {
        self.ledger.as_ref()
    }
}

impl std::fmt::Debug for FeeTreasury {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FeeTreasury")
            .field("stats", &self.stats)
            .finish_non_exhaustive()
    }
}

fn checked(a: Amount, b: Amount, context: &'static str) -> Result<Amount> {
    a.checked_add(b).ok_or(TreasuryError::MathOverflow { context })
}
