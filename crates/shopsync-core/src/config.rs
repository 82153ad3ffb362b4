//! Configuration types for the shopsync system
//!
//! This module defines all configuration structures used throughout the crate.

use serde::{Deserialize, Serialize};

/// Main shopsync configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncConfig {
    /// Contact source (admin panel) configuration
    pub source: SourceConfig,

    /// Destination (Shopware) configuration
    pub destination: DestinationConfig,

    /// Destination reference-data configuration
    pub references: ReferenceConfig,

    /// Daily trigger schedule
    #[serde(default)]
    pub schedule: ScheduleConfig,
}

impl SyncConfig {
    /// Validate the configuration
    pub fn validate(&self) -> Result<(), crate::Error> {
        self.source.validate()?;
        self.destination.validate()?;
        self.references.validate()?;
        self.schedule.validate()?;
        Ok(())
    }
}

/// Contact source (admin panel) configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceConfig {
    /// Base URL of the admin panel API
    pub base_url: String,

    /// Value of the `secretHeaderForAuth` header
    pub secret: String,

    /// Allow-list of organizational numbers eligible for ZR synchronization
    #[serde(default)]
    pub allowed_zr_numbers: Vec<String>,
}

impl SourceConfig {
    /// Validate the source configuration
    pub fn validate(&self) -> Result<(), crate::Error> {
        if self.base_url.is_empty() {
            return Err(crate::Error::config("admin panel base URL cannot be empty"));
        }
        if self.secret.is_empty() {
            return Err(crate::Error::config("admin panel secret cannot be empty"));
        }
        Ok(())
    }
}

/// Destination (Shopware) configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DestinationConfig {
    /// Base URL of the Shopware Admin API
    pub base_url: String,

    /// OAuth2 client id
    pub client_id: String,

    /// OAuth2 client secret
    pub client_secret: String,

    /// Base URL for country reference-data lookups. The country entity
    /// lives on a different host than the customer API.
    pub country_api_url: String,
}

impl DestinationConfig {
    /// Validate the destination configuration
    pub fn validate(&self) -> Result<(), crate::Error> {
        if self.base_url.is_empty() {
            return Err(crate::Error::config("Shopware base URL cannot be empty"));
        }
        if self.client_id.is_empty() || self.client_secret.is_empty() {
            return Err(crate::Error::config(
                "Shopware OAuth2 client credentials cannot be empty",
            ));
        }
        if self.country_api_url.is_empty() {
            return Err(crate::Error::config("country API URL cannot be empty"));
        }
        Ok(())
    }
}

/// Named destination reference entries.
///
/// These ids are environment-specific and must be supplied explicitly;
/// they are validated at startup rather than embedded in mapping logic.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReferenceConfig {
    /// Salutation id for "not specified"
    pub salutation_id: String,

    /// Sales channel id customers are assigned to
    pub sales_channel_id: String,

    /// Language id for created customers
    pub language_id: String,

    /// Default payment method id
    pub payment_method_id: String,

    /// Customer-group name for individual contacts
    #[serde(default = "default_individual_group")]
    pub individual_group: String,

    /// Customer-group name for organizational (ZR) contacts
    #[serde(default = "default_organization_group")]
    pub organization_group: String,

    /// Domain for synthetic organization emails (`zr<nr>@<domain>`)
    pub synthetic_email_domain: String,
}

impl ReferenceConfig {
    /// Validate the reference configuration
    pub fn validate(&self) -> Result<(), crate::Error> {
        for (name, value) in [
            ("salutation id", &self.salutation_id),
            ("sales channel id", &self.sales_channel_id),
            ("language id", &self.language_id),
            ("payment method id", &self.payment_method_id),
            ("individual customer-group name", &self.individual_group),
            ("organization customer-group name", &self.organization_group),
            ("synthetic email domain", &self.synthetic_email_domain),
        ] {
            if value.is_empty() {
                return Err(crate::Error::config(format!("{} cannot be empty", name)));
            }
        }
        Ok(())
    }
}

fn default_individual_group() -> String {
    "User-Kunden".to_string()
}

fn default_organization_group() -> String {
    "ZR-Kunden".to_string()
}

/// Daily trigger schedule (local time)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleConfig {
    /// Hour of day (0-23)
    #[serde(default = "default_sync_hour")]
    pub hour: u32,

    /// Minute (0-59)
    #[serde(default)]
    pub minute: u32,
}

impl ScheduleConfig {
    /// Validate the schedule configuration
    pub fn validate(&self) -> Result<(), crate::Error> {
        if self.hour > 23 {
            return Err(crate::Error::config(format!(
                "sync hour must be 0-23, got {}",
                self.hour
            )));
        }
        if self.minute > 59 {
            return Err(crate::Error::config(format!(
                "sync minute must be 0-59, got {}",
                self.minute
            )));
        }
        Ok(())
    }
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            hour: default_sync_hour(),
            minute: 0,
        }
    }
}

fn default_sync_hour() -> u32 {
    2
}
