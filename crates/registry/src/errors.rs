//! Error types for the Multipass registry

use multipass_treasury::TreasuryError;
use multipass_types::{Address, Amount, Ident32, IdentError};
use thiserror::Error;

/// Which index of a domain a uniqueness violation hit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordField {
    Name,
    Id,
    Wallet,
}

impl std::fmt::Display for RecordField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            RecordField::Name => "name",
            RecordField::Id => "id",
            RecordField::Wallet => "wallet",
        })
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MultipassError {
    #[error("Unknown domain: {domain}")]
    InvalidDomain { domain: String },

    #[error("Registrar must not be the zero address")]
    InvalidRegistrar,

    #[error("Invalid query: {reason}")]
    InvalidQuery { reason: &'static str },

    #[error("Referral reward {reward} plus discount {discount} exceeds fee {fee}")]
    ReferralRewardsTooHigh {
        reward: Amount,
        discount: Amount,
        fee: Amount,
    },

    #[error("Arithmetic overflow computing {context}")]
    MathOverflow { context: &'static str },

    #[error("Domain already exists: {domain}")]
    NameExists { domain: Ident32 },

    #[error("Domain {domain} is not active")]
    IsActive { domain: Ident32 },

    #[error("Signature does not match authorizer {expected}")]
    InvalidSignature { expected: Address },

    #[error("Authorization expired at {valid_until}, now {now}")]
    SignatureExpired { valid_until: u64, now: u64 },

    #[error("Nonce must be {expected}, got {provided}")]
    InvalidNonceIncrement { expected: u64, provided: u64 },

    #[error("Payment {provided} below required {required}")]
    PaymentTooLow { required: Amount, provided: Amount },

    #[error("Record {field} {value} already registered in {domain}")]
    RecordExists {
        domain: Ident32,
        field: RecordField,
        value: String,
    },

    #[error("Wallet {wallet} cannot refer itself")]
    ReferredSelf { wallet: Address },

    #[error("Unauthorized account: {account}")]
    Unauthorized { account: Address },

    #[error("Owner must not be the zero address")]
    InvalidOwner,

    #[error("No record matches the query in {domain}")]
    RecordNotFound { domain: Ident32 },

    #[error("Renewal record does not describe the resolved identity")]
    RecordMismatch,

    #[error("Invalid identifier: {0}")]
    InvalidIdentifier(#[from] IdentError),

    #[error("Treasury error: {0}")]
    Treasury(TreasuryError),
}

impl From<TreasuryError> for MultipassError {
    fn from(err: TreasuryError) -> Self {
        match err {
            TreasuryError::MathOverflow { context } => MultipassError::MathOverflow { context },
            other => MultipassError::Treasury(other),
        }
    }
}

impl MultipassError {
    pub(crate) fn unknown_domain(domain: &Ident32) -> Self {
        MultipassError::InvalidDomain {
            domain: domain.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, MultipassError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn treasury_overflow_maps_to_math_overflow() {
        let err: MultipassError = TreasuryError::MathOverflow { context: "x" }.into();
        assert_eq!(err, MultipassError::MathOverflow { context: "x" });

        let err: MultipassError = TreasuryError::TransferRejected {
            account: Address::ZERO,
        }
        .into();
        assert!(matches!(err, MultipassError::Treasury(_)));
    }

    #[test]
    fn record_exists_names_the_field() {
        let err = MultipassError::RecordExists {
            domain: Ident32::new("alpha").unwrap(),
            field: RecordField::Id,
            value: "bob-id.alpha".into(),
        };
        assert_eq!(
            err.to_string(),
            "Record id bob-id.alpha already registered in alpha"
        );
    }
}
