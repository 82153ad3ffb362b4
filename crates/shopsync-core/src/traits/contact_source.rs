// # Contact Source Trait
//
// Defines the interface for fetching contact lists from the system of
// record (the admin panel).
//
// ## Implementations
//
// - Admin panel HTTP API: `shopsync-source-adminpanel` crate
//
// Implementations are thin transport wrappers: they fetch, filter out
// records with missing mandatory fields, and map transport/parse failures
// into `SourceUnavailable` / `SourceDataInvalid`. All create-or-update
// decisions are owned by the engine.

use crate::error::Result;
use crate::model::{IndividualContact, OrganizationContact};
use async_trait::async_trait;

/// Trait for contact source implementations
///
/// The source is authoritative: every returned record has all mandatory
/// fields populated, and the organization list is pre-filtered to the
/// configured allow-list of organizational numbers.
///
/// # Thread Safety
///
/// Implementations must be thread-safe and usable across async tasks.
#[async_trait]
pub trait ContactSource: Send + Sync {
    /// Fetch all eligible individual contacts
    ///
    /// # Returns
    ///
    /// - `Ok(Vec<IndividualContact>)`: the filtered list (possibly empty)
    /// - `Err(Error::SourceUnavailable)`: transport or auth failure
    /// - `Err(Error::SourceDataInvalid)`: response body cannot be decoded
    async fn list_individual_contacts(&self) -> Result<Vec<IndividualContact>>;

    /// Fetch all eligible organizational (ZR) contacts
    ///
    /// Only records whose zr number is on the configured allow-list are
    /// returned.
    async fn list_organization_contacts(&self) -> Result<Vec<OrganizationContact>>;

    /// Get the source name (for logging/debugging)
    fn source_name(&self) -> &'static str;
}
