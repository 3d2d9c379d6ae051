//! Shipping address form validation and persistence

use crate::models::Address;
use serde::Deserialize;
use sqlx::PgPool;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

/// Raw address fields from a checkout request
///
/// Structural validation only; existence of the city/street is nobody's
/// business at this layer.
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AddressForm {
    #[validate(length(min = 2, message = "First name must be at least 2 characters"))]
    pub first_name: String,
    #[validate(length(min = 2, message = "Last name must be at least 2 characters"))]
    pub last_name: String,
    #[validate(length(min = 9, message = "Phone number must be at least 9 digits"))]
    pub phone: String,
    #[validate(length(min = 2, message = "City is required"))]
    pub city: String,
    pub district: Option<String>,
    #[validate(length(min = 2, message = "Street is required"))]
    pub street: String,
    pub building: Option<String>,
    pub apartment: Option<String>,
    pub landmark: Option<String>,
}

impl AddressForm {
    /// First failing field's message, in declaration order
    pub fn first_error(&self) -> Option<String> {
        let errors = match self.validate() {
            Ok(()) => return None,
            Err(e) => e,
        };

        // field_errors() iterates a map; pick by declaration order so the
        // reported message is stable.
        const FIELD_ORDER: &[&str] = &["first_name", "last_name", "phone", "city", "street"];
        let field_errors = errors.field_errors();
        for field in FIELD_ORDER {
            if let Some(errs) = field_errors.get(*field)
                && let Some(err) = errs.first()
            {
                return Some(
                    err.message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| format!("Invalid field: {}", field)),
                );
            }
        }
        Some("Invalid address".to_string())
    }
}

/// Persistence for shipping addresses
pub struct AddressStore;

impl AddressStore {
    /// Insert a new address scoped to the caller
    pub async fn create(
        pool: &PgPool,
        user_id: i64,
        form: &AddressForm,
    ) -> Result<Address, sqlx::Error> {
        let address: Address = sqlx::query_as(
            r#"INSERT INTO addresses_tb
                 (address_id, user_id, first_name, last_name, phone, city,
                  district, street, building, apartment, landmark)
               VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
               RETURNING address_id, user_id, first_name, last_name, phone, city,
                         district, street, building, apartment, landmark"#,
        )
        .bind(Uuid::new_v4())
        .bind(user_id)
        .bind(&form.first_name)
        .bind(&form.last_name)
        .bind(&form.phone)
        .bind(&form.city)
        .bind(&form.district)
        .bind(&form.street)
        .bind(&form.building)
        .bind(&form.apartment)
        .bind(&form.landmark)
        .fetch_one(pool)
        .await?;

        Ok(address)
    }

    /// Fetch an address only if it belongs to the caller
    pub async fn get_for_user(
        pool: &PgPool,
        address_id: Uuid,
        user_id: i64,
    ) -> Result<Option<Address>, sqlx::Error> {
        let row: Option<Address> = sqlx::query_as(
            r#"SELECT address_id, user_id, first_name, last_name, phone, city,
                      district, street, building, apartment, landmark
               FROM addresses_tb WHERE address_id = $1 AND user_id = $2"#,
        )
        .bind(address_id)
        .bind(user_id)
        .fetch_optional(pool)
        .await?;

        Ok(row)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_form() -> AddressForm {
        AddressForm {
            first_name: "Aziz".to_string(),
            last_name: "Karimov".to_string(),
            phone: "998901234567".to_string(),
            city: "Tashkent".to_string(),
            district: Some("Chilanzar".to_string()),
            street: "Bunyodkor Avenue".to_string(),
            building: Some("12".to_string()),
            apartment: None,
            landmark: None,
        }
    }

    #[test]
    fn test_valid_form_has_no_error() {
        assert_eq!(valid_form().first_error(), None);
    }

    #[test]
    fn test_short_phone_rejected() {
        let mut form = valid_form();
        form.phone = "12345".to_string();
        assert_eq!(
            form.first_error().as_deref(),
            Some("Phone number must be at least 9 digits")
        );
    }

    #[test]
    fn test_first_failing_field_wins() {
        let mut form = valid_form();
        form.first_name = "A".to_string();
        form.street = "".to_string();
        // first_name precedes street in declaration order
        assert_eq!(
            form.first_error().as_deref(),
            Some("First name must be at least 2 characters")
        );
    }

    #[test]
    fn test_optional_fields_not_validated() {
        let mut form = valid_form();
        form.district = None;
        form.building = None;
        form.apartment = None;
        form.landmark = None;
        assert_eq!(form.first_error(), None);
    }
}
