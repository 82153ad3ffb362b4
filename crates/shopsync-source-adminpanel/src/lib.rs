// # Admin Panel Contact Source
//
// This crate provides the admin-panel-backed ContactSource for the
// shopsync system.
//
// ## Architecture
//
// Fetches the two contact lists over the admin panel's HTTP API,
// authenticated with a shared secret header:
//
// - GET /api/contacts/list_contact_gs     → individual contacts
// - GET /api/companys/list_gs_adresstyp   → organizational (ZR) contacts
//
// The admin panel returns records of varying completeness. This crate
// enforces the ContactSource guarantee: records missing any mandatory
// field are dropped before conversion, and the organization list is
// filtered to the configured allow-list of zr numbers. The engine never
// sees a partial record.

use serde::Deserialize;
use shopsync_core::config::SourceConfig;
use shopsync_core::model::{IndividualContact, OrganizationContact};
use shopsync_core::traits::ContactSource;
use shopsync_core::{Error, Result};
use std::time::Duration;

/// Default HTTP timeout for admin panel requests (30 seconds)
const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(30);

/// Header carrying the shared secret
const AUTH_HEADER: &str = "secretHeaderForAuth";

/// Admin-panel-backed contact source
pub struct AdminPanelSource {
    /// Base URL of the admin panel API (no trailing slash)
    base_url: String,

    /// Shared secret for the auth header
    /// ⚠️ NEVER log this value
    secret: String,

    /// Allow-list of zr numbers eligible for ZR synchronization
    allowed_zr_numbers: Vec<String>,

    /// HTTP client
    client: reqwest::Client,
}

// Custom Debug implementation that hides the shared secret
impl std::fmt::Debug for AdminPanelSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdminPanelSource")
            .field("base_url", &self.base_url)
            .field("secret", &"<REDACTED>")
            .field("allowed_zr_numbers", &self.allowed_zr_numbers)
            .finish()
    }
}

/// Raw individual contact record as the admin panel returns it.
///
/// Everything is optional at the wire level; mandatory-field enforcement
/// happens in [`RawIndividual::into_contact`].
#[derive(Debug, Clone, Deserialize)]
struct RawIndividual {
    vorname: Option<String>,
    name: Option<String>,
    #[serde(rename = "eMailadresse")]
    e_mailadresse: Option<String>,
    #[serde(rename = "uStID")]
    u_st_id: Option<String>,
    #[serde(rename = "zrNummer")]
    zr_nummer: Option<String>,
    firma: Option<String>,
    strasse: Option<String>,
    postleitzahl: Option<String>,
    stadt: Option<String>,
    land: Option<String>,
    adresstyp: Option<String>,
    #[serde(rename = "entraID")]
    entra_id: Option<String>,
}

impl RawIndividual {
    /// Convert to the core shape; None if any mandatory field is missing
    /// or empty. `uStID` is the only optional field.
    fn into_contact(self) -> Option<IndividualContact> {
        Some(IndividualContact {
            first_name: non_empty(self.vorname)?,
            last_name: non_empty(self.name)?,
            email: non_empty(self.e_mailadresse)?,
            vat_id: self.u_st_id.filter(|v| !v.is_empty()),
            zr_number: non_empty(self.zr_nummer)?,
            company: non_empty(self.firma)?,
            street: non_empty(self.strasse)?,
            postal_code: non_empty(self.postleitzahl)?,
            city: non_empty(self.stadt)?,
            country: non_empty(self.land)?,
            address_type: non_empty(self.adresstyp)?,
            entra_id: non_empty(self.entra_id)?,
        })
    }
}

/// Raw organization record as the admin panel returns it
#[derive(Debug, Clone, Deserialize)]
struct RawOrganization {
    #[serde(rename = "uStID")]
    u_st_id: Option<String>,
    #[serde(rename = "zrNummer")]
    zr_nummer: Option<String>,
    firma: Option<String>,
    strasse: Option<String>,
    postleitzahl: Option<String>,
    stadt: Option<String>,
    land: Option<String>,
    adresstyp: Option<String>,
}

impl RawOrganization {
    fn into_contact(self) -> Option<OrganizationContact> {
        Some(OrganizationContact {
            vat_id: self.u_st_id.filter(|v| !v.is_empty()),
            zr_number: non_empty(self.zr_nummer)?,
            company: non_empty(self.firma)?,
            street: non_empty(self.strasse)?,
            postal_code: non_empty(self.postleitzahl)?,
            city: non_empty(self.stadt)?,
            country: non_empty(self.land)?,
            address_type: non_empty(self.adresstyp)?,
        })
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

impl AdminPanelSource {
    /// Create a new admin panel source
    ///
    /// # Parameters
    ///
    /// - `base_url`: Base URL of the admin panel API
    /// - `secret`: Value for the `secretHeaderForAuth` header
    /// - `allowed_zr_numbers`: zr numbers eligible for ZR synchronization
    pub fn new(
        base_url: impl Into<String>,
        secret: impl Into<String>,
        allowed_zr_numbers: Vec<String>,
    ) -> Self {
        let client = reqwest::Client::builder()
            .timeout(DEFAULT_HTTP_TIMEOUT)
            .build()
            .unwrap_or_default();

        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            secret: secret.into(),
            allowed_zr_numbers,
            client,
        }
    }

    /// Create an admin panel source from configuration
    pub fn from_config(config: &SourceConfig) -> Result<Self> {
        if config.base_url.is_empty() {
            return Err(Error::config("admin panel base URL is required"));
        }
        Ok(Self::new(
            config.base_url.clone(),
            config.secret.clone(),
            config.allowed_zr_numbers.clone(),
        ))
    }

    /// Whether a zr number is on the ZR synchronization allow-list
    fn is_allowed(&self, zr_number: &str) -> bool {
        self.allowed_zr_numbers.iter().any(|n| n == zr_number)
    }

    /// Fetch a list endpoint and decode its JSON body
    async fn fetch_list<T: serde::de::DeserializeOwned>(&self, path: &str) -> Result<Vec<T>> {
        let url = format!("{}{}", self.base_url, path);

        let response = self
            .client
            .get(&url)
            .header(AUTH_HEADER, &self.secret)
            .header("Content-Type", "application/json")
            .send()
            .await
            .map_err(|e| Error::source_unavailable(format!("request to {} failed: {}", path, e)))?;

        if !response.status().is_success() {
            return Err(Error::source_unavailable(format!(
                "{} returned HTTP {}",
                path,
                response.status()
            )));
        }

        response
            .json::<Vec<T>>()
            .await
            .map_err(|e| Error::source_data_invalid(format!("cannot decode {}: {}", path, e)))
    }
}

#[async_trait::async_trait]
impl ContactSource for AdminPanelSource {
    async fn list_individual_contacts(&self) -> Result<Vec<IndividualContact>> {
        let raw: Vec<RawIndividual> = self.fetch_list("/api/contacts/list_contact_gs").await?;
        let fetched = raw.len();

        let contacts: Vec<IndividualContact> = raw
            .into_iter()
            .filter_map(RawIndividual::into_contact)
            .collect();

        if contacts.len() < fetched {
            tracing::warn!(
                "Dropped {} of {} contacts with missing mandatory fields",
                fetched - contacts.len(),
                fetched
            );
        }
        tracing::info!("Fetched {} contacts from admin panel", contacts.len());
        Ok(contacts)
    }

    async fn list_organization_contacts(&self) -> Result<Vec<OrganizationContact>> {
        let raw: Vec<RawOrganization> = self.fetch_list("/api/companys/list_gs_adresstyp").await?;

        let contacts: Vec<OrganizationContact> = raw
            .into_iter()
            .filter_map(RawOrganization::into_contact)
            .filter(|c| self.is_allowed(&c.zr_number))
            .collect();

        tracing::info!("Fetched {} ZR contacts from admin panel", contacts.len());
        Ok(contacts)
    }

    fn source_name(&self) -> &'static str {
        "admin-panel"
    }
}
