use crate::{Address, Amount, Ident32};
use serde::{Deserialize, Serialize};

/// Configuration and counters of one registry namespace.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Domain {
    pub name: Ident32,
    /// Authority whose signature is required to register or renew records.
    pub registrar: Address,
    pub fee: Amount,
    pub renewal_fee: Amount,
    /// Paid to a referrer out of the registration fee.
    pub referrer_reward: Amount,
    /// Subtracted from the registration fee when a referral applies.
    pub referral_discount: Amount,
    pub is_active: bool,
    /// Reserved expiry policy, always zero.
    pub ttl: u64,
    /// Number of successful registrations. Deleting a record does not decrement it.
    pub register_size: u64,
}

impl Domain {
    /// Create an inactive domain with no registrations.
    pub fn new(
        name: Ident32,
        registrar: Address,
        fee: Amount,
        renewal_fee: Amount,
        referrer_reward: Amount,
        referral_discount: Amount,
    ) -> Self {
        Self {
            name,
            registrar,
            fee,
            renewal_fee,
            referrer_reward,
            referral_discount,
            is_active: false,
            ttl: 0,
            register_size: 0,
        }
    }

    /// Fee due when a valid referral applies, `None` on underflow.
    pub fn discounted_fee(&self) -> Option<Amount> {
        self.fee.checked_sub(self.referral_discount)
    }
}
