//! Field mapper: source contact → destination customer payload
//!
//! Pure transformation, shape-polymorphic over the two contact shapes.
//! Reference ids and the country id are resolved by the caller; this module
//! never performs I/O.
//!
//! Shape differences:
//! - Individuals keep their real email and name fields and carry the
//!   external identity reference in the destination custom field.
//! - Organizations get a synthetic `zr<nr>@<domain>` email, explicitly null
//!   name fields, and a null custom field.
//!
//! Exactly one address object is written per contact. The address-type
//! roles decide which of the customer's default billing/shipping references
//! point at it, not how many addresses are created.

use crate::model::{
    AddressPayload, Contact, CountryId, CustomFields, CustomerPayload, ReferenceIds,
};

/// Account type assigned to every synced customer
const ACCOUNT_TYPE_BUSINESS: &str = "business";

/// Derive the synthetic email for an organization contact
pub fn synthetic_email(zr_number: &str, domain: &str) -> String {
    format!("zr{}@{}", zr_number, domain)
}

/// Mint a fresh destination address id (hyphenless UUIDv4, the id format
/// the destination expects)
pub fn mint_address_id() -> String {
    uuid::Uuid::new_v4().simple().to_string()
}

/// Build the full-overwrite customer payload for a contact.
///
/// # Parameters
///
/// - `contact`: the source contact (either shape)
/// - `refs`: reference ids resolved at startup
/// - `country_id`: the destination country id resolved for this record
/// - `address_id`: the address id to write; a fresh id on create, the
///   existing default address id on update
pub fn map_contact(
    contact: &Contact,
    refs: &ReferenceIds,
    country_id: &CountryId,
    address_id: &str,
) -> CustomerPayload {
    let (email, first_name, last_name, group_id, entra_id) = match contact {
        Contact::Individual(c) => (
            c.email.clone(),
            Some(c.first_name.clone()),
            Some(c.last_name.clone()),
            refs.individual_group.clone(),
            Some(c.entra_id.clone()),
        ),
        Contact::Organization(c) => (
            synthetic_email(&c.zr_number, &refs.synthetic_email_domain),
            None,
            None,
            refs.organization_group.clone(),
            None,
        ),
    };

    let roles = contact.address_roles();

    CustomerPayload {
        email,
        salutation_id: refs.salutation_id.clone(),
        first_name: first_name.clone(),
        last_name: last_name.clone(),
        customer_number: contact.zr_number().to_string(),
        company: format!("{} ({})", contact.company(), contact.zr_number()),
        vat_ids: contact.vat_id().map(str::to_string).into_iter().collect(),
        group_id: group_id.0,
        sales_channel_id: refs.sales_channel_id.clone(),
        account_type: ACCOUNT_TYPE_BUSINESS.to_string(),
        language_id: refs.language_id.clone(),
        default_billing_address_id: roles.billing.then(|| address_id.to_string()),
        default_shipping_address_id: roles.shipping.then(|| address_id.to_string()),
        default_payment_method_id: refs.payment_method_id.clone(),
        addresses: vec![AddressPayload {
            id: address_id.to_string(),
            first_name,
            last_name,
            street: contact.street().to_string(),
            zipcode: contact.postal_code().to_string(),
            city: contact.city().to_string(),
            country_id: country_id.0.clone(),
            company: contact.company().to_string(),
        }],
        custom_fields: CustomFields { entra_id },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{GroupId, IndividualContact, OrganizationContact};

    fn refs() -> ReferenceIds {
        ReferenceIds {
            salutation_id: "sal-1".to_string(),
            sales_channel_id: "chan-1".to_string(),
            language_id: "lang-1".to_string(),
            payment_method_id: "pay-1".to_string(),
            individual_group: GroupId("grp-user".to_string()),
            organization_group: GroupId("grp-zr".to_string()),
            synthetic_email_domain: "einrichtungspartnerring.com".to_string(),
        }
    }

    fn individual() -> Contact {
        Contact::Individual(IndividualContact {
            first_name: "Erika".to_string(),
            last_name: "Muster".to_string(),
            email: "erika.muster@example.ch".to_string(),
            vat_id: Some("CHE-123.456.789".to_string()),
            zr_number: "112212".to_string(),
            company: "Muster AG".to_string(),
            street: "Bahnhofstrasse 1".to_string(),
            postal_code: "8001".to_string(),
            city: "Zürich".to_string(),
            country: "CH".to_string(),
            address_type: "Rechnungsanschrift;Lieferanschrift".to_string(),
            entra_id: "entra-abc-123".to_string(),
        })
    }

    fn organization(address_type: &str) -> Contact {
        Contact::Organization(OrganizationContact {
            vat_id: None,
            zr_number: "112213".to_string(),
            company: "Partner GmbH".to_string(),
            street: "Hauptstrasse 5".to_string(),
            postal_code: "3011".to_string(),
            city: "Bern".to_string(),
            country: "CH".to_string(),
            address_type: address_type.to_string(),
        })
    }

    #[test]
    fn individual_payload_keeps_identity_fields() {
        let payload = map_contact(&individual(), &refs(), &CountryId("ctry-ch".into()), "addr1");

        assert_eq!(payload.email, "erika.muster@example.ch");
        assert_eq!(payload.first_name.as_deref(), Some("Erika"));
        assert_eq!(payload.last_name.as_deref(), Some("Muster"));
        assert_eq!(payload.customer_number, "112212");
        assert_eq!(payload.company, "Muster AG (112212)");
        assert_eq!(payload.vat_ids, vec!["CHE-123.456.789".to_string()]);
        assert_eq!(payload.group_id, "grp-user");
        assert_eq!(payload.custom_fields.entra_id.as_deref(), Some("entra-abc-123"));
    }

    #[test]
    fn organization_payload_synthesizes_email_and_nulls_names() {
        let payload = map_contact(
            &organization("Rechnungsanschrift"),
            &refs(),
            &CountryId("ctry-ch".into()),
            "addr1",
        );

        assert_eq!(payload.email, "zr112213@einrichtungspartnerring.com");
        assert_eq!(payload.first_name, None);
        assert_eq!(payload.last_name, None);
        assert_eq!(payload.group_id, "grp-zr");
        assert_eq!(payload.custom_fields.entra_id, None);
        assert!(payload.vat_ids.is_empty());
    }

    #[test]
    fn both_roles_point_default_slots_at_the_single_address() {
        let payload = map_contact(&individual(), &refs(), &CountryId("ctry-ch".into()), "addr1");

        assert_eq!(payload.addresses.len(), 1);
        assert_eq!(payload.default_billing_address_id.as_deref(), Some("addr1"));
        assert_eq!(payload.default_shipping_address_id.as_deref(), Some("addr1"));
        assert_eq!(payload.addresses[0].id, "addr1");
    }

    #[test]
    fn billing_only_sets_only_billing_slot() {
        let payload = map_contact(
            &organization("Rechnungsanschrift"),
            &refs(),
            &CountryId("ctry-ch".into()),
            "addr1",
        );

        assert_eq!(payload.default_billing_address_id.as_deref(), Some("addr1"));
        assert_eq!(payload.default_shipping_address_id, None);
        assert_eq!(payload.addresses.len(), 1);
    }

    #[test]
    fn address_block_carries_contact_address() {
        let payload = map_contact(
            &organization("Lieferanschrift"),
            &refs(),
            &CountryId("ctry-ch".into()),
            "addr1",
        );

        let address = &payload.addresses[0];
        assert_eq!(address.street, "Hauptstrasse 5");
        assert_eq!(address.zipcode, "3011");
        assert_eq!(address.city, "Bern");
        assert_eq!(address.country_id, "ctry-ch");
        assert_eq!(address.company, "Partner GmbH");
        assert_eq!(address.first_name, None);
    }

    #[test]
    fn minted_address_ids_are_hyphenless_and_unique() {
        let a = mint_address_id();
        let b = mint_address_id();
        assert_eq!(a.len(), 32);
        assert!(!a.contains('-'));
        assert_ne!(a, b);
    }

    #[test]
    fn payload_serializes_with_destination_field_names() {
        let payload = map_contact(&individual(), &refs(), &CountryId("ctry-ch".into()), "addr1");
        let json = serde_json::to_value(&payload).unwrap();

        assert_eq!(json["customerNumber"], "112212");
        assert_eq!(json["salesChannelId"], "chan-1");
        assert_eq!(json["defaultPaymentMethodId"], "pay-1");
        assert_eq!(json["accountType"], "business");
        assert_eq!(
            json["customFields"]["custom_identifier_user_entraid_"],
            "entra-abc-123"
        );
        assert_eq!(json["addresses"][0]["zipcode"], "8001");
    }

    #[test]
    fn organization_nulls_serialize_explicitly() {
        let payload = map_contact(
            &organization("Rechnungsanschrift"),
            &refs(),
            &CountryId("ctry-ch".into()),
            "addr1",
        );
        let json = serde_json::to_value(&payload).unwrap();

        // Null name fields must be present in the payload so the destination
        // clears them on overwrite; unset default slots are omitted instead.
        assert!(json["firstName"].is_null());
        assert!(json["lastName"].is_null());
        assert!(json.get("defaultShippingAddressId").is_none());
    }
}
