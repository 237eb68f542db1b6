//! Registration pricing with optional referral.

use crate::auth::AuthorizationVerifier;
use crate::errors::{MultipassError, Result};
use crate::resolver::QueryResolver;
use multipass_types::{Address, Amount, Domain, NameQuery, Record};

/// An accepted referral: who gets paid, how much, and the record they hold.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Referral {
    pub referrer: Record,
    pub reward: Amount,
}

impl Referral {
    pub fn wallet(&self) -> Address {
        self.referrer.wallet
    }
}

/// Amount due for a registration and the referral it includes, if any.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Quote {
    pub required: Amount,
    pub referral: Option<Referral>,
}

impl Quote {
    /// Referrer payout in the form the treasury settles.
    pub fn payout(&self) -> Option<(Address, Amount)> {
        self.referral.as_ref().map(|r| (r.wallet(), r.reward))
    }
}

#[derive(Debug, Clone, Copy)]
pub struct ReferralEngine<'a> {
    resolver: QueryResolver<'a>,
    verifier: &'a AuthorizationVerifier,
}

impl<'a> ReferralEngine<'a> {
    pub fn new(resolver: QueryResolver<'a>, verifier: &'a AuthorizationVerifier) -> Self {
        Self { resolver, verifier }
    }

    /// Price a registration in `domain` for `claimant`.
    ///
    /// A query without a lookup key, or one that resolves to nothing, leaves
    /// the full fee due. A query without a domain looks in `domain` itself.
    pub fn compute_payment(
        &self,
        domain: &Domain,
        referral_query: &NameQuery,
        referral_signature: &[u8],
        claimant: &Address,
    ) -> Result<Quote> {
        let full_fee = Quote {
            required: domain.fee,
            referral: None,
        };
        if referral_query.has_no_key() {
            return Ok(full_fee);
        }

        let mut query = referral_query.clone();
        if query.domain_name.is_empty() {
            query.domain_name = domain.name;
        }
        let Some(referrer) = self.resolver.resolve(&query)? else {
            return Ok(full_fee);
        };

        if referrer.wallet == *claimant {
            return Err(MultipassError::ReferredSelf { wallet: *claimant });
        }
        self.verifier
            .verify_referral(&referrer.wallet, referral_signature)?;

        let required = domain.discounted_fee().ok_or(MultipassError::MathOverflow {
            context: "discounted fee",
        })?;
        Ok(Quote {
            required,
            referral: Some(Referral {
                referrer: referrer.clone(),
                reward: domain.referrer_reward,
            }),
        })
    }
}
