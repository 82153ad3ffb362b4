//! Core synchronization engine
//!
//! The SyncEngine is responsible for:
//! - Pulling the full contact lists from the ContactSource once per run
//! - Matching each record against the destination by its shape-specific key
//! - Creating or overwriting destination customers via the CustomerDirectory
//! - Tallying per-record outcomes and isolating per-record failures
//!
//! ## Architecture
//!
//! ```text
//! ┌───────────────┐                      ┌───────────────────┐
//! │ ContactSource │── contact lists ────▶│     SyncEngine    │
//! └───────────────┘                      └───────────────────┘
//!                                                  │
//!                         lookup / create / update │
//!                                                  ▼
//!                                        ┌───────────────────┐
//!                                        │ CustomerDirectory │
//!                                        └───────────────────┘
//! ```
//!
//! ## Record Flow
//!
//! Per record, strictly sequentially:
//! 1. Lookup by shape-specific key (external identity for individuals,
//!    customer number for organizations)
//! 2. Resolve the contact's country; absent → the record fails
//! 3. Matched: overwrite via update, reusing the existing default address id.
//!    Unmatched: mint a fresh address id and create.
//! 4. Tally into {updated, created, failed}; a per-record failure never
//!    aborts the batch.
//!
//! The two lists are processed as entirely separate passes with independent
//! counters. Source data is always authoritative; destination records are
//! only ever created or overwritten, never read back into the source.

use crate::error::{Error, Result};
use crate::mapper;
use crate::model::{Contact, ReferenceIds};
use crate::traits::{ContactSource, CustomerDirectory};
use tracing::{error, info};

/// Outcome of reconciling a single record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum WriteOutcome {
    /// A new destination customer was created
    Created,
    /// An existing destination customer was overwritten
    Updated,
}

/// Per-pass outcome counters.
///
/// `failed` is surfaced explicitly instead of being folded into the other
/// counters; `total` always equals `updated + created + failed`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PassReport {
    pub total: usize,
    pub updated: usize,
    pub created: usize,
    pub failed: usize,
}

impl PassReport {
    fn new(total: usize) -> Self {
        Self {
            total,
            ..Self::default()
        }
    }
}

/// Run-level result: one report per contact list
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SyncReport {
    pub individuals: PassReport,
    pub organizations: PassReport,
}

/// Core synchronization engine
///
/// ## Lifecycle
///
/// 1. Create with [`SyncEngine::new()`] once the collaborators are wired
///    and the reference ids are resolved
/// 2. Invoke [`SyncEngine::run()`] once per scheduled trigger
///
/// ## Concurrency
///
/// Processing is single-threaded and strictly sequential: one record is
/// fully reconciled (lookup, map, write) before the next begins. Overlapping
/// runs must be serialized by the caller.
pub struct SyncEngine {
    /// Contact source (system of record)
    source: Box<dyn ContactSource>,

    /// Destination customer directory
    directory: Box<dyn CustomerDirectory>,

    /// Reference ids resolved at startup
    refs: ReferenceIds,
}

impl SyncEngine {
    /// Create a new synchronization engine
    pub fn new(
        source: Box<dyn ContactSource>,
        directory: Box<dyn CustomerDirectory>,
        refs: ReferenceIds,
    ) -> Self {
        Self {
            source,
            directory,
            refs,
        }
    }

    /// Run one full synchronization pass: individual contacts, then
    /// organizational (ZR) contacts.
    ///
    /// A run-level error (failure to fetch a full contact list, destination
    /// auth failure surfacing on the first lookup) aborts the remaining
    /// work; writes already committed stay committed.
    pub async fn run(&self) -> Result<SyncReport> {
        let individuals = self.sync_individuals().await?;
        let organizations = self.sync_organizations().await?;
        Ok(SyncReport {
            individuals,
            organizations,
        })
    }

    /// Synchronize all individual contacts
    pub async fn sync_individuals(&self) -> Result<PassReport> {
        info!("Starting user synchronization from {}", self.source.source_name());

        let contacts = self.source.list_individual_contacts().await?;
        let contacts: Vec<Contact> = contacts.into_iter().map(Contact::from).collect();

        info!("Processing {} users from {}", contacts.len(), self.source.source_name());
        let report = self.sync_pass("user", &contacts).await;

        info!(
            "Synchronization completed. Total: {}, Updated: {}, Created: {}, Failed: {}",
            report.total, report.updated, report.created, report.failed
        );
        Ok(report)
    }

    /// Synchronize all organizational (ZR) contacts
    pub async fn sync_organizations(&self) -> Result<PassReport> {
        info!("Starting ZR customer synchronization from {}", self.source.source_name());

        let contacts = self.source.list_organization_contacts().await?;
        let contacts: Vec<Contact> = contacts.into_iter().map(Contact::from).collect();

        info!("Processing {} ZR contacts from {}", contacts.len(), self.source.source_name());
        let report = self.sync_pass("ZR customer", &contacts).await;

        info!(
            "ZR synchronization completed. Total: {}, Updated: {}, Created: {}, Failed: {}",
            report.total, report.updated, report.created, report.failed
        );
        Ok(report)
    }

    /// Reconcile one list of contacts, record by record.
    ///
    /// Per-record errors of any kind (lookup, mapping, write) are absorbed
    /// here: logged with the record's natural key, tallied as failed, and
    /// the loop continues with the next record.
    async fn sync_pass(&self, label: &str, contacts: &[Contact]) -> PassReport {
        let mut report = PassReport::new(contacts.len());

        for contact in contacts {
            match self.reconcile(contact).await {
                Ok(WriteOutcome::Updated) => {
                    report.updated += 1;
                    info!("Updated existing {}: {}", label, contact.natural_key());
                }
                Ok(WriteOutcome::Created) => {
                    report.created += 1;
                    info!("Created new {}: {}", label, contact.natural_key());
                }
                Err(e) => {
                    report.failed += 1;
                    error!("Failed to process {} {}: {}", label, contact.natural_key(), e);
                }
            }
        }

        report
    }

    /// Reconcile a single contact: lookup by shape-specific key, then
    /// create or overwrite.
    async fn reconcile(&self, contact: &Contact) -> Result<WriteOutcome> {
        let existing = match contact {
            Contact::Individual(c) => {
                self.directory.find_by_external_identity(&c.entra_id).await?
            }
            Contact::Organization(c) => {
                self.directory.find_by_customer_number(&c.zr_number).await?
            }
        };

        let country_id = self
            .directory
            .resolve_country(contact.country())
            .await?
            .ok_or_else(|| Error::CountryNotFound(contact.country().to_string()))?;

        match existing {
            Some(customer) => {
                // Reuse the existing default address id so the overwrite
                // updates the address in place instead of accumulating
                // duplicates. A matched customer without any default
                // address gets a fresh id, same as the create path.
                let address_id = customer
                    .reusable_address_id()
                    .map(str::to_string)
                    .unwrap_or_else(mapper::mint_address_id);

                let payload = mapper::map_contact(contact, &self.refs, &country_id, &address_id);
                self.directory.update(&customer.id, &payload).await?;
                Ok(WriteOutcome::Updated)
            }
            None => {
                let address_id = mapper::mint_address_id();
                let payload = mapper::map_contact(contact, &self.refs, &country_id, &address_id);
                self.directory.create(&payload).await?;
                Ok(WriteOutcome::Created)
            }
        }
    }
}
