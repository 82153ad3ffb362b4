// # shopsync-core
//
// Core library for the admin-panel to Shopware contact synchronization.
//
// ## Architecture Overview
//
// This library provides the decision logic of the synchronization system:
// - **ContactSource**: Trait for fetching contact lists from the admin panel
// - **CustomerDirectory**: Trait for lookup/create/update of destination customers
// - **mapper**: Pure transformation from a source contact to a destination payload
// - **SyncEngine**: Reconciliation engine that decides create-vs-update per record
//
// ## Design Principles
//
// 1. **Separation of Concerns**: Core logic is separate from HTTP transport
// 2. **Source-Authoritative**: Destination records are only created or
//    overwritten, never read back into the source
// 3. **Failure Isolation**: A per-record failure never aborts the batch;
//    run-level failures terminate the run
// 4. **Library-First**: All core functionality can be used as a library

pub mod config;
pub mod engine;
pub mod error;
pub mod mapper;
pub mod model;
pub mod traits;

// Re-export core types for convenience
pub use config::SyncConfig;
pub use engine::{PassReport, SyncEngine, SyncReport};
pub use error::{Error, Result};
pub use model::{Contact, IndividualContact, OrganizationContact, ReferenceIds};
pub use traits::{ContactSource, CustomerDirectory};
