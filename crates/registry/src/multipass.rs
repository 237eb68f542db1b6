//! The Multipass registry service.
//!
//! [`Multipass`] composes the domain registry, the identity ledger, the
//! authorisation verifier and the fee treasury behind one owner-gated API.
//! Every mutating operation validates completely before it touches state,
//! commits all ledger changes before paying anyone, and only then records
//! its events. A failed payment undoes the ledger changes of its operation.

use crate::auth::{ensure_fresh, AuthorizationVerifier};
use crate::clock::Clock;
use crate::config::RegistryConfig;
use crate::domains::DomainRegistry;
use crate::errors::{MultipassError, Result};
use crate::events::{EventLog, LedgerProjection, RegistryEvent};
use crate::interface::{self, InterfaceId};
use crate::ledger::{IdentityLedger, LookupKey};
use crate::referral::{Quote, ReferralEngine};
use crate::resolver::QueryResolver;
use multipass_treasury::{FeeTreasury, Settlement};
use multipass_types::{Address, Amount, Domain, Ident32, NameQuery, Record};
use parking_lot::RwLock;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Registry service shared between threads. Mutations take the write lock.
pub type SharedMultipass = Arc<RwLock<Multipass>>;

pub struct Multipass {
    owner: Address,
    domains: DomainRegistry,
    ledger: IdentityLedger,
    verifier: AuthorizationVerifier,
    treasury: FeeTreasury,
    clock: Arc<dyn Clock>,
    events: EventLog,
}

impl Multipass {
    pub fn new(
        owner: Address,
        verifier: AuthorizationVerifier,
        treasury: FeeTreasury,
        clock: Arc<dyn Clock>,
    ) -> Result<Self> {
        if owner.is_zero() {
            return Err(MultipassError::InvalidOwner);
        }

        let mut events = EventLog::new();
        events.push(RegistryEvent::OwnershipTransferred {
            previous_owner: Address::ZERO,
            new_owner: owner,
        });
        info!(target: "registry", owner = %owner, "Multipass registry created");

        Ok(Self {
            owner,
            domains: DomainRegistry::new(),
            ledger: IdentityLedger::new(),
            verifier,
            treasury,
            clock,
            events,
        })
    }

    /// Build a registry verifying Ed25519 authorisations under the configured signing domain.
    pub fn from_config(
        config: &RegistryConfig,
        treasury: FeeTreasury,
        clock: Arc<dyn Clock>,
    ) -> Result<Self> {
        let verifier = AuthorizationVerifier::ed25519(config.typed_data_domain());
        Self::new(config.owner, verifier, treasury, clock)
    }

    pub fn into_shared(self) -> SharedMultipass {
        Arc::new(RwLock::new(self))
    }

    // ---------------------------------------------------------------------
    // Ownership
    // ---------------------------------------------------------------------

    pub fn owner(&self) -> Address {
        self.owner
    }

    fn only_owner(&self, caller: &Address) -> Result<()> {
        if *caller != self.owner {
            warn!(target: "registry", caller = %caller, "Rejected owner-only call");
            return Err(MultipassError::Unauthorized { account: *caller });
        }
        Ok(())
    }

    pub fn transfer_ownership(&mut self, caller: &Address, new_owner: Address) -> Result<()> {
        self.only_owner(caller)?;
        if new_owner.is_zero() {
            return Err(MultipassError::InvalidOwner);
        }

        let previous_owner = std::mem::replace(&mut self.owner, new_owner);
        info!(target: "registry", from = %previous_owner, to = %new_owner, "Ownership transferred");
        self.events.push(RegistryEvent::OwnershipTransferred {
            previous_owner,
            new_owner,
        });
        Ok(())
    }

    // ---------------------------------------------------------------------
    // Domain administration
    // ---------------------------------------------------------------------

    #[allow(clippy::too_many_arguments)]
    pub fn initialize_domain(
        &mut self,
        caller: &Address,
        registrar: Address,
        fee: Amount,
        renewal_fee: Amount,
        domain_name: &str,
        referrer_reward: Amount,
        referral_discount: Amount,
    ) -> Result<()> {
        self.only_owner(caller)?;
        let name = Ident32::new(domain_name)?;
        let domain = self
            .domains
            .initialize_domain(
                registrar,
                fee,
                renewal_fee,
                name,
                referrer_reward,
                referral_discount,
            )?
            .clone();

        info!(target: "registry", domain = %name, registrar = %registrar, fee = %fee, "Domain initialized");
        self.events.push(RegistryEvent::DomainInitialized { domain });
        Ok(())
    }

    pub fn activate_domain(&mut self, caller: &Address, domain_name: &str) -> Result<()> {
        self.only_owner(caller)?;
        let name = Ident32::new(domain_name)?;
        self.domains.set_active(&name, true)?;

        info!(target: "registry", domain = %name, "Domain activated");
        self.events
            .push(RegistryEvent::DomainActivated { domain_name: name });
        Ok(())
    }

    pub fn deactivate_domain(&mut self, caller: &Address, domain_name: &str) -> Result<()> {
        self.only_owner(caller)?;
        let name = Ident32::new(domain_name)?;
        self.domains.set_active(&name, false)?;

        info!(target: "registry", domain = %name, "Domain deactivated");
        self.events
            .push(RegistryEvent::DomainDeactivated { domain_name: name });
        Ok(())
    }

    pub fn change_fee(&mut self, caller: &Address, domain_name: &str, fee: Amount) -> Result<()> {
        self.only_owner(caller)?;
        let name = Ident32::new(domain_name)?;
        self.domains.change_fee(&name, fee)?;

        info!(target: "registry", domain = %name, fee = %fee, "Domain fee changed");
        self.events.push(RegistryEvent::DomainFeeChanged {
            domain_name: name,
            fee,
        });
        Ok(())
    }

    pub fn change_renewal_fee(
        &mut self,
        caller: &Address,
        renewal_fee: Amount,
        domain_name: &str,
    ) -> Result<()> {
        self.only_owner(caller)?;
        let name = Ident32::new(domain_name)?;
        self.domains.change_renewal_fee(&name, renewal_fee)?;

        info!(target: "registry", domain = %name, renewal_fee = %renewal_fee, "Renewal fee changed");
        self.events.push(RegistryEvent::RenewalFeeChanged {
            domain_name: name,
            renewal_fee,
        });
        Ok(())
    }

    pub fn change_registrar(
        &mut self,
        caller: &Address,
        domain_name: &str,
        registrar: Address,
    ) -> Result<()> {
        self.only_owner(caller)?;
        let name = Ident32::new(domain_name)?;
        self.domains.change_registrar(&name, registrar)?;

        info!(target: "registry", domain = %name, registrar = %registrar, "Registrar changed");
        self.events.push(RegistryEvent::RegistrarChanged {
            domain_name: name,
            registrar,
        });
        Ok(())
    }

    pub fn change_referral_program(
        &mut self,
        caller: &Address,
        referrer_reward: Amount,
        referral_discount: Amount,
        domain_name: &str,
    ) -> Result<()> {
        self.only_owner(caller)?;
        let name = Ident32::new(domain_name)?;
        self.domains
            .change_referral_program(referrer_reward, referral_discount, &name)?;

        info!(
            target: "registry",
            domain = %name,
            reward = %referrer_reward,
            discount = %referral_discount,
            "Referral program changed"
        );
        self.events.push(RegistryEvent::ReferralProgramChanged {
            domain_name: name,
            referrer_reward,
            referral_discount,
        });
        Ok(())
    }

    // ---------------------------------------------------------------------
    // Records
    // ---------------------------------------------------------------------

    /// Register `record` under a registrar authorisation, optionally referred.
    ///
    /// The stored record always starts at nonce zero. `payment` may exceed
    /// the quoted price; the whole payment is settled.
    pub fn register(
        &mut self,
        record: Record,
        registrar_signature: &[u8],
        referral_query: &NameQuery,
        referral_signature: &[u8],
        payment: Amount,
    ) -> Result<()> {
        let domain = self.domains.require(&record.domain_name)?.clone();
        if !domain.is_active {
            return Err(MultipassError::IsActive {
                domain: domain.name,
            });
        }

        ensure_fresh(record.valid_until, self.clock.now())?;
        self.verifier
            .verify_registration(&record, registrar_signature, &domain.registrar)?;

        if record.name.is_empty() || record.id.is_empty() || record.wallet.is_zero() {
            return Err(MultipassError::InvalidQuery {
                reason: "record name, id and wallet are required",
            });
        }
        self.ledger.ensure_unique(&record)?;

        let quote = self.quote(&domain, referral_query, referral_signature, &record.wallet)?;
        if payment < quote.required {
            return Err(MultipassError::PaymentTooLow {
                required: quote.required,
                provided: payment,
            });
        }
        let settlement = Settlement::plan(payment, quote.payout())?;

        let mut stored = record;
        stored.nonce = 0;
        let slot = self.ledger.insert(stored.clone())?;
        let previous_size = match self.domains.count_registration(&domain.name) {
            Ok(size) => size,
            Err(err) => {
                self.ledger.undo_insert(&domain.name, slot);
                return Err(err);
            }
        };

        if let Err(err) = self.treasury.settle(&self.owner, &settlement) {
            warn!(target: "registry", domain = %domain.name, name = %stored.name, error = %err, "Settlement failed, reverting registration");
            self.ledger.undo_insert(&domain.name, slot);
            self.domains.require_mut(&domain.name)?.register_size = previous_size;
            return Err(err.into());
        }

        info!(
            target: "registry",
            domain = %domain.name,
            name = %stored.name,
            wallet = %stored.wallet,
            paid = %payment,
            "Registered name"
        );
        let applicant = stored.wallet;
        self.events.push(RegistryEvent::Registered {
            record: stored,
            paid: payment,
        });
        if let Some(referral) = quote.referral {
            info!(target: "registry", domain = %domain.name, referrer = %referral.wallet(), reward = %referral.reward, "Referral applied");
            self.events.push(RegistryEvent::Referred {
                domain_name: domain.name,
                referrer: referral.referrer,
                applicant,
                reward: referral.reward,
            });
        }
        Ok(())
    }

    /// Extend the record `query` resolves to with a fresh registrar authorisation.
    pub fn renew_record(
        &mut self,
        query: &NameQuery,
        new_record: Record,
        registrar_signature: &[u8],
        payment: Amount,
    ) -> Result<()> {
        self.domains.require(&query.domain_name)?;
        let existing = self
            .resolver()
            .resolve(query)?
            .cloned()
            .ok_or(MultipassError::RecordNotFound {
                domain: query.domain_name,
            })?;
        if !existing.same_identity(&new_record) {
            return Err(MultipassError::RecordMismatch);
        }

        let domain = self.domains.require(&existing.domain_name)?.clone();
        ensure_fresh(new_record.valid_until, self.clock.now())?;
        self.verifier
            .verify_registration(&new_record, registrar_signature, &domain.registrar)?;

        if existing.nonce.checked_add(1) != Some(new_record.nonce) {
            return Err(MultipassError::InvalidNonceIncrement {
                expected: existing.nonce.saturating_add(1),
                provided: new_record.nonce,
            });
        }
        if payment < domain.renewal_fee {
            return Err(MultipassError::PaymentTooLow {
                required: domain.renewal_fee,
                provided: payment,
            });
        }
        let settlement = Settlement::plan(payment, None)?;

        self.ledger.renew(&new_record)?;
        if let Err(err) = self.treasury.settle(&self.owner, &settlement) {
            warn!(target: "registry", domain = %domain.name, name = %existing.name, error = %err, "Settlement failed, reverting renewal");
            self.ledger.renew(&existing)?;
            return Err(err.into());
        }

        info!(
            target: "registry",
            domain = %domain.name,
            name = %new_record.name,
            nonce = new_record.nonce,
            valid_until = new_record.valid_until,
            "Renewed record"
        );
        self.events.push(RegistryEvent::Renewed {
            record: new_record,
            paid: payment,
        });
        Ok(())
    }

    /// Remove the record `query` resolves to in its domain. The target domain is ignored.
    pub fn delete_name(&mut self, caller: &Address, query: &NameQuery) -> Result<Record> {
        self.only_owner(caller)?;
        self.domains.require(&query.domain_name)?;
        let key = LookupKey::for_query(query).ok_or(MultipassError::InvalidQuery {
            reason: "no name, id or wallet given",
        })?;
        let record = self
            .ledger
            .remove(&query.domain_name, &key)
            .ok_or(MultipassError::RecordNotFound {
                domain: query.domain_name,
            })?;

        info!(target: "registry", domain = %record.domain_name, name = %record.name, "Name deleted");
        self.events.push(RegistryEvent::NameDeleted {
            record: record.clone(),
        });
        Ok(record)
    }

    // ---------------------------------------------------------------------
    // Read-only
    // ---------------------------------------------------------------------

    /// Number of domains ever initialised.
    pub fn get_contract_state(&self) -> usize {
        self.domains.count()
    }

    pub fn get_domain_state(&self, domain_name: &str) -> Result<Domain> {
        let name = Ident32::new(domain_name)?;
        self.domains.require(&name).cloned()
    }

    /// Domain by 1-based initialisation order.
    pub fn get_domain_state_by_id(&self, index: usize) -> Result<Domain> {
        self.domains.get_by_index(index).cloned()
    }

    pub fn resolve_record(&self, query: &NameQuery) -> Result<Option<Record>> {
        let found = self.resolver().resolve(query)?.cloned();
        debug!(target: "registry", domain = %query.domain_name, found = found.is_some(), "Resolved query");
        Ok(found)
    }

    pub fn supports_interface(&self, interface_id: InterfaceId) -> bool {
        interface::supports_interface(interface_id)
    }

    pub fn events(&self) -> &[RegistryEvent] {
        self.events.as_slice()
    }

    pub fn drain_events(&mut self) -> Vec<RegistryEvent> {
        self.events.drain()
    }

    pub fn treasury(&self) -> &FeeTreasury {
        &self.treasury
    }

    pub fn verifier(&self) -> &AuthorizationVerifier {
        &self.verifier
    }

    /// Copy of ownership, domain and record state, comparable with a replayed projection.
    pub fn snapshot(&self) -> LedgerProjection {
        LedgerProjection {
            owner: self.owner,
            domains: self.domains.clone(),
            ledger: self.ledger.clone(),
        }
    }

    fn resolver(&self) -> QueryResolver<'_> {
        QueryResolver::new(&self.domains, &self.ledger)
    }

    fn quote(
        &self,
        domain: &Domain,
        referral_query: &NameQuery,
        referral_signature: &[u8],
        claimant: &Address,
    ) -> Result<Quote> {
        ReferralEngine::new(self.resolver(), &self.verifier).compute_payment(
            domain,
            referral_query,
            referral_signature,
            claimant,
        )
    }
}

impl std::fmt::Debug for Multipass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Multipass")
            .field("owner", &self.owner)
            .field("domains", &self.domains.count())
            .field("treasury", &self.treasury)
            .finish_non_exhaustive()
    }
}
