// # Shopware Customer Directory
//
// This crate provides the Shopware Admin API implementation of the
// CustomerDirectory trait.
//
// ## Architecture
//
// - OAuth2 client-credentials authentication at startup; the bearer token
//   is held for the lifetime of the directory (one token per daily run)
// - Customer lookup via `GET /api/customer?filter[...]=` (first match wins)
// - Full-overwrite writes via `POST /api/customer` and
//   `PATCH /api/customer/{id}`
// - Reference data via `GET /api/customer-group` and
//   `GET {country_api_url}/api/country` — the country entity lives on a
//   separate host
//
// All calls are single-shot with a fixed timeout. Retry, scheduling and
// the create-vs-update decision are owned by the SyncEngine; an error here
// fails the current record (or the run, for authentication).
//
// ## Security Requirements
//
// - Client secret and access token NEVER appear in logs or Debug output

use serde_json::Value;
use shopsync_core::config::DestinationConfig;
use shopsync_core::model::{
    CountryId, CustomerId, CustomerPayload, DestinationCustomer, GroupId,
};
use shopsync_core::traits::CustomerDirectory;
use shopsync_core::{Error, Result};
use std::time::Duration;

/// Default HTTP timeout for API requests (30 seconds)
const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(30);

/// Filter parameter for the external identity custom field
const ENTRA_ID_FILTER: &str = "filter[customFields.custom_identifier_user_entraid_]";

/// Filter parameter for the customer number
const CUSTOMER_NUMBER_FILTER: &str = "filter[customerNumber]";

/// Shopware Admin API customer directory
pub struct ShopwareDirectory {
    /// Base URL of the Shopware Admin API (no trailing slash)
    base_url: String,

    /// Base URL for country lookups (separate host)
    country_api_url: String,

    /// OAuth2 bearer token
    /// ⚠️ NEVER log this value
    access_token: String,

    /// HTTP client for API requests
    client: reqwest::Client,
}

// Custom Debug implementation that hides the access token
impl std::fmt::Debug for ShopwareDirectory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ShopwareDirectory")
            .field("base_url", &self.base_url)
            .field("country_api_url", &self.country_api_url)
            .field("access_token", &"<REDACTED>")
            .finish()
    }
}

impl ShopwareDirectory {
    /// Authenticate with the Shopware Admin API and build a directory.
    ///
    /// Authentication failure here is a run-level error: without a token no
    /// record can be processed, so the run terminates.
    pub async fn connect(config: &DestinationConfig) -> Result<Self> {
        if config.client_id.is_empty() || config.client_secret.is_empty() {
            return Err(Error::config("Shopware OAuth2 client credentials are required"));
        }

        let base_url = config.base_url.trim_end_matches('/').to_string();
        let country_api_url = config.country_api_url.trim_end_matches('/').to_string();

        let client = reqwest::Client::builder()
            .timeout(DEFAULT_HTTP_TIMEOUT)
            .build()
            .unwrap_or_default();

        let url = format!("{}/api/oauth/token", base_url);
        let body = serde_json::json!({
            "grant_type": "client_credentials",
            "client_id": config.client_id,
            "client_secret": config.client_secret,
        });

        let response = client
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(|e| Error::destination_unavailable(format!("token request failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(Error::destination_unavailable(format!(
                "authentication failed: HTTP {}",
                response.status()
            )));
        }

        let token_json: Value = response
            .json()
            .await
            .map_err(|e| Error::destination_unavailable(format!("cannot decode token response: {}", e)))?;

        let access_token = token_json["access_token"]
            .as_str()
            .ok_or_else(|| Error::destination_unavailable("token response has no access_token"))?
            .to_string();

        tracing::info!("Authenticated with Shopware Admin API");

        Ok(Self::with_token(base_url, country_api_url, access_token))
    }

    /// Build a directory around an already-obtained bearer token
    pub fn with_token(
        base_url: impl Into<String>,
        country_api_url: impl Into<String>,
        access_token: impl Into<String>,
    ) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            country_api_url: country_api_url.into().trim_end_matches('/').to_string(),
            access_token: access_token.into(),
            client: reqwest::Client::builder()
                .timeout(DEFAULT_HTTP_TIMEOUT)
                .build()
                .unwrap_or_default(),
        }
    }

    /// Look up a customer by a single filter parameter
    async fn find_customer(
        &self,
        filter_param: &str,
        value: &str,
    ) -> Result<Option<DestinationCustomer>> {
        let url = format!("{}/api/customer", self.base_url);

        let response = self
            .client
            .get(&url)
            .query(&[(filter_param, value)])
            .bearer_auth(&self.access_token)
            .send()
            .await
            .map_err(|e| Error::destination_unavailable(format!("customer lookup failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(map_error_status(
                response.status().as_u16(),
                "customer lookup",
            ));
        }

        let json: Value = response
            .json()
            .await
            .map_err(|e| Error::destination_unavailable(format!("cannot decode lookup response: {}", e)))?;

        Ok(first_customer(&json))
    }

    /// Send a write request and map the response status
    async fn send_write(&self, request: reqwest::RequestBuilder, context: &str) -> Result<()> {
        let response = request
            .bearer_auth(&self.access_token)
            .send()
            .await
            .map_err(|e| Error::destination_unavailable(format!("{} failed: {}", context, e)))?;

        let status = response.status();
        if !status.is_success() {
            let detail = response
                .text()
                .await
                .unwrap_or_else(|_| "unable to read error response".to_string());
            return Err(match map_error_status(status.as_u16(), context) {
                Error::DestinationWriteRejected(msg) => {
                    Error::write_rejected(format!("{}: {}", msg, detail))
                }
                other => other,
            });
        }
        Ok(())
    }
}

/// Map an HTTP error status to the error taxonomy.
///
/// Validation failures (400/422) are write rejections; everything else,
/// auth errors and server errors included, is the destination being
/// unavailable for this call.
fn map_error_status(status: u16, context: &str) -> Error {
    match status {
        400 | 422 => Error::write_rejected(format!("{} rejected with HTTP {}", context, status)),
        401 | 403 => Error::destination_unavailable(format!(
            "{} failed: authentication rejected (HTTP {})",
            context, status
        )),
        _ => Error::destination_unavailable(format!("{} failed with HTTP {}", context, status)),
    }
}

/// Pick a customer group from a listing response: the group whose name
/// matches, falling back to the first listed group when the named one is
/// absent. An empty listing is a reference-data error.
fn group_from_listing(json: &Value, name: &str) -> Result<GroupId> {
    let groups = json["data"].as_array().cloned().unwrap_or_default();

    if let Some(group) = groups
        .iter()
        .find(|g| g["attributes"]["name"].as_str() == Some(name))
    {
        if let Some(id) = group["id"].as_str() {
            return Ok(GroupId(id.to_string()));
        }
    }

    groups
        .first()
        .and_then(|g| g["id"].as_str())
        .map(|id| GroupId(id.to_string()))
        .ok_or_else(|| {
            Error::reference_data_missing(format!("no customer group matches '{}'", name))
        })
}

/// Extract the first customer from a Shopware listing response
fn first_customer(json: &Value) -> Option<DestinationCustomer> {
    let entry = json["data"].as_array()?.first()?;
    let id = entry["id"].as_str()?;
    let attributes = &entry["attributes"];

    Some(DestinationCustomer {
        id: CustomerId(id.to_string()),
        email: attributes["email"].as_str().map(str::to_string),
        customer_number: attributes["customerNumber"].as_str().map(str::to_string),
        default_billing_address_id: attributes["defaultBillingAddressId"]
            .as_str()
            .map(str::to_string),
        default_shipping_address_id: attributes["defaultShippingAddressId"]
            .as_str()
            .map(str::to_string),
    })
}

#[async_trait::async_trait]
impl CustomerDirectory for ShopwareDirectory {
    async fn find_by_external_identity(
        &self,
        entra_id: &str,
    ) -> Result<Option<DestinationCustomer>> {
        self.find_customer(ENTRA_ID_FILTER, entra_id).await
    }

    async fn find_by_customer_number(
        &self,
        customer_number: &str,
    ) -> Result<Option<DestinationCustomer>> {
        self.find_customer(CUSTOMER_NUMBER_FILTER, customer_number)
            .await
    }

    async fn resolve_customer_group(&self, name: &str) -> Result<GroupId> {
        let url = format!("{}/api/customer-group", self.base_url);

        let response = self
            .client
            .get(&url)
            .bearer_auth(&self.access_token)
            .send()
            .await
            .map_err(|e| Error::destination_unavailable(format!("group listing failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(map_error_status(response.status().as_u16(), "group listing"));
        }

        let json: Value = response
            .json()
            .await
            .map_err(|e| Error::destination_unavailable(format!("cannot decode group listing: {}", e)))?;

        group_from_listing(&json, name)
    }

    async fn resolve_country(&self, iso_code: &str) -> Result<Option<CountryId>> {
        let url = format!("{}/api/country", self.country_api_url);

        let response = self
            .client
            .get(&url)
            .query(&[("filter[iso]", iso_code.to_uppercase())])
            .bearer_auth(&self.access_token)
            .send()
            .await
            .map_err(|e| Error::destination_unavailable(format!("country lookup failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(map_error_status(response.status().as_u16(), "country lookup"));
        }

        let json: Value = response
            .json()
            .await
            .map_err(|e| Error::destination_unavailable(format!("cannot decode country lookup: {}", e)))?;

        Ok(json["data"]
            .as_array()
            .and_then(|countries| countries.first())
            .and_then(|country| country["id"].as_str())
            .map(|id| CountryId(id.to_string())))
    }

    async fn create(&self, payload: &CustomerPayload) -> Result<()> {
        let url = format!("{}/api/customer", self.base_url);
        self.send_write(self.client.post(&url).json(payload), "customer create")
            .await
    }

    async fn update(&self, id: &CustomerId, payload: &CustomerPayload) -> Result<()> {
        let url = format!("{}/api/customer/{}", self.base_url, id.0);
        self.send_write(self.client.patch(&url).json(payload), "customer update")
            .await
    }

    fn directory_name(&self) -> &'static str {
        "shopware"
    }
}
