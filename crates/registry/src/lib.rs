//! Multipass identity registry
//!
//! Independent *domains* each keep a namespace mapping human identities
//! (name, id, wallet) to records. A domain's registrar pre-authorises every
//! registration and renewal with an off-ledger typed-data signature; the
//! registry checks the authorisation, enforces per-domain uniqueness, prices
//! the registration (with an optional referral discount and reward) and
//! forwards the payment to the registry owner and the referrer.
//!
//! Records can be resolved by name, id or wallet, and translated into another
//! domain through the wallet they share.

pub mod auth;
pub mod clock;
pub mod config;
pub mod domains;
pub mod errors;
pub mod events;
pub mod interface;
pub mod ledger;
pub mod multipass;
pub mod referral;
pub mod resolver;
pub mod telemetry;

pub use auth::{sign_referral, sign_registration, AuthorizationVerifier};
pub use clock::{Clock, ManualClock, SystemClock};
pub use config::{LoggingConfig, RegistryConfig, TypedDataConfig};
pub use domains::DomainRegistry;
pub use errors::{MultipassError, RecordField, Result};
pub use events::{EventLog, LedgerProjection, RegistryEvent};
pub use interface::{InterfaceId, INTROSPECTION_INTERFACE_ID};
pub use ledger::{IdentityLedger, LookupKey};
pub use multipass::{Multipass, SharedMultipass};
pub use referral::{Quote, Referral, ReferralEngine};
pub use resolver::QueryResolver;

pub use multipass_types::{Address, Amount, Domain, Ident32, NameQuery, Record};
