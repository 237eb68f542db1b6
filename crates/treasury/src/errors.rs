//! Error types for fee settlement

use multipass_types::Address;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TreasuryError {
    #[error("arithmetic overflow computing {context}")]
    MathOverflow { context: &'static str },

    #[error("transfer to {account} was rejected")]
    TransferRejected { account: Address },
}

pub type Result<T> = std::result::Result<T, TreasuryError>;
