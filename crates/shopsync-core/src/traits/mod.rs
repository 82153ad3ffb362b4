//! Core trait definitions for the shopsync system
//!
//! These traits define the two external collaborators of the engine:
//! - `ContactSource`: supplies contact lists from the admin panel
//! - `CustomerDirectory`: lookup/create/update of destination customers

mod contact_source;
mod customer_directory;

pub use contact_source::ContactSource;
pub use customer_directory::CustomerDirectory;
