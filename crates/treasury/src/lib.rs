//! Multipass Treasury Module
//!
//! Splits registration and renewal payments between the registry owner and
//! referrers, and remits them through an [`AccountLedger`].

pub mod account_ledger;
pub mod errors;
pub mod fee_treasury;

pub use account_ledger::{AccountLedger, InMemoryAccountLedger, MockAccountLedger};
pub use errors::{Result, TreasuryError};
pub use fee_treasury::{FeeTreasury, Settlement, TreasuryStats};
