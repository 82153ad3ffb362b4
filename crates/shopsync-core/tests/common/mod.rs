//! Test doubles and common utilities for engine contract tests
//!
//! This module provides call-counting mocks for the two engine
//! collaborators. The directory mock keeps an in-memory customer store so
//! that multi-run tests observe creates made by earlier runs.

use shopsync_core::error::{Error, Result};
use shopsync_core::model::{
    CountryId, CustomerId, CustomerPayload, DestinationCustomer, GroupId, IndividualContact,
    OrganizationContact, ReferenceIds,
};
use shopsync_core::traits::{ContactSource, CustomerDirectory};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// A scripted ContactSource returning fixed lists
pub struct MockContactSource {
    individuals: Vec<IndividualContact>,
    organizations: Vec<OrganizationContact>,
    /// When true, the individual list fetch fails at run level
    fail_individuals: bool,
    /// When true, the organization list fetch fails at run level
    fail_organizations: bool,
}

impl MockContactSource {
    pub fn new(
        individuals: Vec<IndividualContact>,
        organizations: Vec<OrganizationContact>,
    ) -> Self {
        Self {
            individuals,
            organizations,
            fail_individuals: false,
            fail_organizations: false,
        }
    }

    pub fn failing_individuals() -> Self {
        Self {
            individuals: Vec::new(),
            organizations: Vec::new(),
            fail_individuals: true,
            fail_organizations: false,
        }
    }

    pub fn failing_organizations(individuals: Vec<IndividualContact>) -> Self {
        Self {
            individuals,
            organizations: Vec::new(),
            fail_individuals: false,
            fail_organizations: true,
        }
    }
}

#[async_trait::async_trait]
impl ContactSource for MockContactSource {
    async fn list_individual_contacts(&self) -> Result<Vec<IndividualContact>> {
        if self.fail_individuals {
            return Err(Error::source_unavailable("scripted fetch failure"));
        }
        Ok(self.individuals.clone())
    }

    async fn list_organization_contacts(&self) -> Result<Vec<OrganizationContact>> {
        if self.fail_organizations {
            return Err(Error::source_unavailable("scripted fetch failure"));
        }
        Ok(self.organizations.clone())
    }

    fn source_name(&self) -> &'static str {
        "mock-admin-panel"
    }
}

/// A stored destination customer inside the mock directory
#[derive(Debug, Clone)]
pub struct StoredCustomer {
    pub id: String,
    pub entra_id: Option<String>,
    pub email: Option<String>,
    pub customer_number: String,
    pub default_billing_address_id: Option<String>,
    pub default_shipping_address_id: Option<String>,
}

impl StoredCustomer {
    fn snapshot(&self) -> DestinationCustomer {
        DestinationCustomer {
            id: CustomerId(self.id.clone()),
            email: self.email.clone(),
            customer_number: Some(self.customer_number.clone()),
            default_billing_address_id: self.default_billing_address_id.clone(),
            default_shipping_address_id: self.default_shipping_address_id.clone(),
        }
    }
}

/// A mock CustomerDirectory with an in-memory store and call counters
pub struct MockDirectory {
    customers: Arc<Mutex<Vec<StoredCustomer>>>,
    /// ISO code → destination country id; unknown codes resolve to None
    countries: Arc<Mutex<HashMap<String, String>>>,
    /// Lookup keys (entra id or customer number) that fail with a
    /// transport error
    failing_lookups: Arc<Mutex<Vec<String>>>,
    create_call_count: Arc<AtomicUsize>,
    update_call_count: Arc<AtomicUsize>,
    created_payloads: Arc<Mutex<Vec<CustomerPayload>>>,
    updated_payloads: Arc<Mutex<Vec<(String, CustomerPayload)>>>,
    next_id: Arc<AtomicUsize>,
}

impl MockDirectory {
    pub fn new() -> Self {
        let mut countries = HashMap::new();
        countries.insert("CH".to_string(), "ctry-ch".to_string());
        countries.insert("DE".to_string(), "ctry-de".to_string());

        Self {
            customers: Arc::new(Mutex::new(Vec::new())),
            countries: Arc::new(Mutex::new(countries)),
            failing_lookups: Arc::new(Mutex::new(Vec::new())),
            create_call_count: Arc::new(AtomicUsize::new(0)),
            update_call_count: Arc::new(AtomicUsize::new(0)),
            created_payloads: Arc::new(Mutex::new(Vec::new())),
            updated_payloads: Arc::new(Mutex::new(Vec::new())),
            next_id: Arc::new(AtomicUsize::new(1)),
        }
    }

    /// Create a new MockDirectory that shares store and counters with an
    /// existing one
    pub fn sharing_state_with(other: &Self) -> Self {
        Self {
            customers: Arc::clone(&other.customers),
            countries: Arc::clone(&other.countries),
            failing_lookups: Arc::clone(&other.failing_lookups),
            create_call_count: Arc::clone(&other.create_call_count),
            update_call_count: Arc::clone(&other.update_call_count),
            created_payloads: Arc::clone(&other.created_payloads),
            updated_payloads: Arc::clone(&other.updated_payloads),
            next_id: Arc::clone(&other.next_id),
        }
    }

    /// Seed an existing destination customer
    pub fn seed_customer(&self, customer: StoredCustomer) {
        self.customers.lock().unwrap().push(customer);
    }

    /// Make lookups for the given key fail with a transport error
    pub fn fail_lookup_for(&self, key: impl Into<String>) {
        self.failing_lookups.lock().unwrap().push(key.into());
    }

    pub fn create_call_count(&self) -> usize {
        self.create_call_count.load(Ordering::SeqCst)
    }

    pub fn update_call_count(&self) -> usize {
        self.update_call_count.load(Ordering::SeqCst)
    }

    pub fn created_payloads(&self) -> Vec<CustomerPayload> {
        self.created_payloads.lock().unwrap().clone()
    }

    pub fn updated_payloads(&self) -> Vec<(String, CustomerPayload)> {
        self.updated_payloads.lock().unwrap().clone()
    }

    fn check_lookup(&self, key: &str) -> Result<()> {
        if self.failing_lookups.lock().unwrap().iter().any(|k| k == key) {
            return Err(Error::destination_unavailable("scripted lookup failure"));
        }
        Ok(())
    }
}

#[async_trait::async_trait]
impl CustomerDirectory for MockDirectory {
    async fn find_by_external_identity(
        &self,
        entra_id: &str,
    ) -> Result<Option<DestinationCustomer>> {
        self.check_lookup(entra_id)?;
        Ok(self
            .customers
            .lock()
            .unwrap()
            .iter()
            .find(|c| c.entra_id.as_deref() == Some(entra_id))
            .map(StoredCustomer::snapshot))
    }

    async fn find_by_customer_number(
        &self,
        customer_number: &str,
    ) -> Result<Option<DestinationCustomer>> {
        self.check_lookup(customer_number)?;
        Ok(self
            .customers
            .lock()
            .unwrap()
            .iter()
            .find(|c| c.customer_number == customer_number)
            .map(StoredCustomer::snapshot))
    }

    async fn resolve_customer_group(&self, name: &str) -> Result<GroupId> {
        Ok(GroupId(format!("grp-{}", name)))
    }

    async fn resolve_country(&self, iso_code: &str) -> Result<Option<CountryId>> {
        Ok(self
            .countries
            .lock()
            .unwrap()
            .get(&iso_code.to_uppercase())
            .cloned()
            .map(CountryId))
    }

    async fn create(&self, payload: &CustomerPayload) -> Result<()> {
        self.create_call_count.fetch_add(1, Ordering::SeqCst);
        self.created_payloads.lock().unwrap().push(payload.clone());

        // Persist the create so later runs match against it, as the real
        // destination would.
        let id = format!("cust-{}", self.next_id.fetch_add(1, Ordering::SeqCst));
        self.customers.lock().unwrap().push(StoredCustomer {
            id,
            entra_id: payload.custom_fields.entra_id.clone(),
            email: Some(payload.email.clone()),
            customer_number: payload.customer_number.clone(),
            default_billing_address_id: payload.default_billing_address_id.clone(),
            default_shipping_address_id: payload.default_shipping_address_id.clone(),
        });
        Ok(())
    }

    async fn update(&self, id: &CustomerId, payload: &CustomerPayload) -> Result<()> {
        self.update_call_count.fetch_add(1, Ordering::SeqCst);
        self.updated_payloads
            .lock()
            .unwrap()
            .push((id.0.clone(), payload.clone()));

        let mut customers = self.customers.lock().unwrap();
        if let Some(stored) = customers.iter_mut().find(|c| c.id == id.0) {
            stored.email = Some(payload.email.clone());
            stored.customer_number = payload.customer_number.clone();
            stored.default_billing_address_id = payload.default_billing_address_id.clone();
            stored.default_shipping_address_id = payload.default_shipping_address_id.clone();
        }
        Ok(())
    }

    fn directory_name(&self) -> &'static str {
        "mock-shopware"
    }
}

/// Reference ids as the daemon would resolve them at startup
pub fn test_refs() -> ReferenceIds {
    ReferenceIds {
        salutation_id: "sal-1".to_string(),
        sales_channel_id: "chan-1".to_string(),
        language_id: "lang-1".to_string(),
        payment_method_id: "pay-1".to_string(),
        individual_group: GroupId("grp-User-Kunden".to_string()),
        organization_group: GroupId("grp-ZR-Kunden".to_string()),
        synthetic_email_domain: "einrichtungspartnerring.com".to_string(),
    }
}

/// An individual contact fixture; the suffix keeps keys unique per record
pub fn individual(suffix: &str) -> IndividualContact {
    IndividualContact {
        first_name: "Erika".to_string(),
        last_name: "Muster".to_string(),
        email: format!("erika.{}@example.ch", suffix),
        vat_id: None,
        zr_number: "112212".to_string(),
        company: "Muster AG".to_string(),
        street: "Bahnhofstrasse 1".to_string(),
        postal_code: "8001".to_string(),
        city: "Zürich".to_string(),
        country: "CH".to_string(),
        address_type: "Rechnungsanschrift;Lieferanschrift".to_string(),
        entra_id: format!("entra-{}", suffix),
    }
}

/// An organization contact fixture
pub fn organization(zr_number: &str) -> OrganizationContact {
    OrganizationContact {
        vat_id: None,
        zr_number: zr_number.to_string(),
        company: "Partner GmbH".to_string(),
        street: "Hauptstrasse 5".to_string(),
        postal_code: "3011".to_string(),
        city: "Bern".to_string(),
        country: "CH".to_string(),
        address_type: "Rechnungsanschrift".to_string(),
    }
}
