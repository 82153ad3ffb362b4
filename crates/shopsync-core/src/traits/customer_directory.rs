// # Customer Directory Trait
//
// Defines the interface for the destination customer store (the commerce
// platform's Admin API).
//
// ## Implementations
//
// - Shopware Admin API: `shopsync-shopware` crate
//
// Implementations are single-shot transport wrappers. They must not retry,
// cache lookups, or decide between create and update; that decision is
// owned by the `SyncEngine`. Every create/update is a full-overwrite
// POST/PATCH: omitted fields in the payload are interpreted by the
// destination as "clear" for nullable fields.

use crate::error::Result;
use crate::model::{CountryId, CustomerId, CustomerPayload, DestinationCustomer, GroupId};
use async_trait::async_trait;

/// Trait for destination customer directory implementations
///
/// # Thread Safety
///
/// Implementations must be thread-safe and usable across async tasks.
#[async_trait]
pub trait CustomerDirectory: Send + Sync {
    /// Look up a customer by the external identity reference custom field.
    ///
    /// This is the sole match key for individual contacts; it stays stable
    /// even when the contact's email changes.
    async fn find_by_external_identity(
        &self,
        entra_id: &str,
    ) -> Result<Option<DestinationCustomer>>;

    /// Look up a customer by customer number (zr number).
    ///
    /// This is the sole match key for organization contacts, which carry no
    /// external identity reference.
    async fn find_by_customer_number(
        &self,
        customer_number: &str,
    ) -> Result<Option<DestinationCustomer>>;

    /// Resolve a customer-group name to its destination id.
    ///
    /// # Returns
    ///
    /// - `Ok(GroupId)`: the matching group, or the directory's fallback
    /// - `Err(Error::ReferenceDataMissing)`: no group matches and no
    ///   fallback exists
    async fn resolve_customer_group(&self, name: &str) -> Result<GroupId>;

    /// Resolve an ISO country code to its destination id.
    ///
    /// Returns `Ok(None)` (not an error) when unmatched; the engine treats
    /// an absent country as a mapping failure for that record only.
    async fn resolve_country(&self, iso_code: &str) -> Result<Option<CountryId>>;

    /// Create a new destination customer from a full payload
    async fn create(&self, payload: &CustomerPayload) -> Result<()>;

    /// Overwrite an existing destination customer with a full payload
    async fn update(&self, id: &CustomerId, payload: &CustomerPayload) -> Result<()>;

    /// Get the directory name (for logging/debugging)
    fn directory_name(&self) -> &'static str;
}
