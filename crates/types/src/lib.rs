//! Core data types shared by the Multipass registry crates.

pub mod address;
pub mod domain;
pub mod ident;
pub mod record;

pub use address::*;
pub use domain::*;
pub use ident::*;
pub use record::*;

/// Fee and payment amounts in the smallest unit of the settlement currency.
pub type Amount = u128;
