//! Data model for the shopsync system
//!
//! Source contact shapes (individual and organizational "ZR" contacts), the
//! destination customer snapshot, and the full-overwrite write payload sent
//! to the destination.

use serde::{Deserialize, Serialize};

/// Address-type token marking an address as default billing
pub const ADDRESS_TYPE_BILLING: &str = "Rechnungsanschrift";

/// Address-type token marking an address as default shipping
pub const ADDRESS_TYPE_SHIPPING: &str = "Lieferanschrift";

/// An individual contact from the admin panel.
///
/// All fields except `vat_id` are mandatory; the contact source drops
/// records with missing mandatory fields before they reach the engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndividualContact {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub vat_id: Option<String>,
    /// Organizational number of the contact's company
    pub zr_number: String,
    pub company: String,
    pub street: String,
    pub postal_code: String,
    pub city: String,
    /// ISO country code
    pub country: String,
    /// Delimited address-type string, e.g. "Rechnungsanschrift;Lieferanschrift"
    pub address_type: String,
    /// External identity reference; the stable match key for individuals
    pub entra_id: String,
}

/// An organizational ("ZR") contact from the admin panel.
///
/// Has no personal name or email; a synthetic email is derived from the
/// zr number at mapping time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrganizationContact {
    pub vat_id: Option<String>,
    pub zr_number: String,
    pub company: String,
    pub street: String,
    pub postal_code: String,
    pub city: String,
    pub country: String,
    pub address_type: String,
}

/// A source contact of either shape.
///
/// The two shapes share the address block and zr number but differ in match
/// key and in how the destination email and name fields are derived.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Contact {
    Individual(IndividualContact),
    Organization(OrganizationContact),
}

impl Contact {
    pub fn zr_number(&self) -> &str {
        match self {
            Contact::Individual(c) => &c.zr_number,
            Contact::Organization(c) => &c.zr_number,
        }
    }

    pub fn company(&self) -> &str {
        match self {
            Contact::Individual(c) => &c.company,
            Contact::Organization(c) => &c.company,
        }
    }

    pub fn street(&self) -> &str {
        match self {
            Contact::Individual(c) => &c.street,
            Contact::Organization(c) => &c.street,
        }
    }

    pub fn postal_code(&self) -> &str {
        match self {
            Contact::Individual(c) => &c.postal_code,
            Contact::Organization(c) => &c.postal_code,
        }
    }

    pub fn city(&self) -> &str {
        match self {
            Contact::Individual(c) => &c.city,
            Contact::Organization(c) => &c.city,
        }
    }

    pub fn country(&self) -> &str {
        match self {
            Contact::Individual(c) => &c.country,
            Contact::Organization(c) => &c.country,
        }
    }

    pub fn vat_id(&self) -> Option<&str> {
        match self {
            Contact::Individual(c) => c.vat_id.as_deref(),
            Contact::Organization(c) => c.vat_id.as_deref(),
        }
    }

    pub fn address_type(&self) -> &str {
        match self {
            Contact::Individual(c) => &c.address_type,
            Contact::Organization(c) => &c.address_type,
        }
    }

    /// Parsed address roles for this contact
    pub fn address_roles(&self) -> AddressRoles {
        AddressRoles::parse(self.address_type())
    }

    /// The key used for logging per-record outcomes: email for individuals,
    /// zr number for organizations.
    pub fn natural_key(&self) -> &str {
        match self {
            Contact::Individual(c) => &c.email,
            Contact::Organization(c) => &c.zr_number,
        }
    }
}

impl From<IndividualContact> for Contact {
    fn from(c: IndividualContact) -> Self {
        Contact::Individual(c)
    }
}

impl From<OrganizationContact> for Contact {
    fn from(c: OrganizationContact) -> Self {
        Contact::Organization(c)
    }
}

/// Which default-address slots an address serves.
///
/// Parsed from the address-type string split on `;`. Exactly one address
/// object is ever written per contact; these flags decide which of the
/// customer's default billing/shipping references point at it. A contact may
/// be both, one, or neither.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AddressRoles {
    pub billing: bool,
    pub shipping: bool,
}

impl AddressRoles {
    /// Parse an address-type string. Unknown tokens are ignored.
    pub fn parse(address_type: &str) -> Self {
        let mut roles = Self {
            billing: false,
            shipping: false,
        };
        for token in address_type.split(';') {
            match token.trim() {
                ADDRESS_TYPE_BILLING => roles.billing = true,
                ADDRESS_TYPE_SHIPPING => roles.shipping = true,
                _ => {}
            }
        }
        roles
    }
}

/// Opaque destination customer-group id
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupId(pub String);

/// Opaque destination country id
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountryId(pub String);

/// Opaque destination customer id
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomerId(pub String);

/// Snapshot of an existing destination customer, as much of it as the
/// engine needs: the identifier to PATCH against and the default address
/// references to reuse on update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DestinationCustomer {
    pub id: CustomerId,
    pub email: Option<String>,
    pub customer_number: Option<String>,
    pub default_billing_address_id: Option<String>,
    pub default_shipping_address_id: Option<String>,
}

impl DestinationCustomer {
    /// The address id to reuse on update: the existing default billing
    /// address, falling back to shipping. Preserves address continuity
    /// instead of creating duplicate address objects.
    pub fn reusable_address_id(&self) -> Option<&str> {
        self.default_billing_address_id
            .as_deref()
            .or(self.default_shipping_address_id.as_deref())
    }
}

/// Destination reference ids resolved once at startup.
///
/// Salutation, sales channel, language and payment method come from named
/// configuration entries; the two customer-group ids are resolved against
/// the destination's group listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReferenceIds {
    pub salutation_id: String,
    pub sales_channel_id: String,
    pub language_id: String,
    pub payment_method_id: String,
    pub individual_group: GroupId,
    pub organization_group: GroupId,
    /// Domain for synthetic organization emails (`zr<nr>@<domain>`)
    pub synthetic_email_domain: String,
}

/// Full-overwrite customer write payload (Shopware Admin API field names).
///
/// The same payload type is used for create and update; omitted/null fields
/// are interpreted by the destination as "clear" for nullable fields, which
/// is load-bearing for organization contacts (explicitly null name fields).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerPayload {
    pub email: String,
    pub salutation_id: String,
    /// Always null for organization contacts
    pub first_name: Option<String>,
    /// Always null for organization contacts
    pub last_name: Option<String>,
    pub customer_number: String,
    pub company: String,
    pub vat_ids: Vec<String>,
    pub group_id: String,
    pub sales_channel_id: String,
    pub account_type: String,
    pub language_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_billing_address_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_shipping_address_id: Option<String>,
    pub default_payment_method_id: String,
    pub addresses: Vec<AddressPayload>,
    pub custom_fields: CustomFields,
}

/// The single address object written per contact
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddressPayload {
    pub id: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub street: String,
    pub zipcode: String,
    pub city: String,
    pub country_id: String,
    pub company: String,
}

/// Destination custom fields. Carries the external identity reference for
/// individual contacts; null for organizations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomFields {
    #[serde(rename = "custom_identifier_user_entraid_")]
    pub entra_id: Option<String>,
}
