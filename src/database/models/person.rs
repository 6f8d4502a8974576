use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

use crate::api::validation::{exact_length, not_blank, Validate, Violation};

/// Required length of `phoneNumber` when present
pub const PHONE_NUMBER_LENGTH: usize = 10;

/// A persisted row of the `person` table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Person {
    pub id: i32,
    pub first_name: String,
    pub last_name: Option<String>,
    #[schema(min_length = 10, max_length = 10)]
    pub phone_number: Option<String>,
}

/// A validated record on its way to the store. `id` targets an existing row
/// for overwrite; when it is absent or unmatched the store assigns one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersonDraft {
    pub id: Option<i32>,
    pub first_name: String,
    pub last_name: Option<String>,
    pub phone_number: Option<String>,
}

/// Request body of `POST /v1/post-person`.
///
/// Every field is optional at the decoding stage so that a missing
/// `firstName` surfaces as a constraint violation rather than a decode error.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PersonPayload {
    pub id: Option<i32>,
    #[schema(min_length = 1)]
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    #[schema(min_length = 10, max_length = 10)]
    pub phone_number: Option<String>,
}

impl Validate for PersonPayload {
    fn validate(&self) -> Result<(), Vec<Violation>> {
        let mut violations = Vec::new();
        not_blank("firstName", self.first_name.as_deref(), &mut violations);
        exact_length(
            "phoneNumber",
            self.phone_number.as_deref(),
            PHONE_NUMBER_LENGTH,
            "phoneNumber must be 10 digits.",
            &mut violations,
        );

        if violations.is_empty() {
            Ok(())
        } else {
            Err(violations)
        }
    }
}

impl From<PersonPayload> for PersonDraft {
    fn from(payload: PersonPayload) -> Self {
        Self {
            id: payload.id,
            first_name: payload.first_name.unwrap_or_default(),
            last_name: payload.last_name,
            phone_number: payload.phone_number,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn payload(value: serde_json::Value) -> PersonPayload {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn accepts_complete_payload() {
        let p = payload(json!({
            "firstName": "Ada",
            "lastName": "Lovelace",
            "phoneNumber": "1234567890"
        }));
        assert!(p.validate().is_ok());
    }

    #[test]
    fn accepts_missing_optional_fields() {
        let p = payload(json!({ "firstName": "Ada" }));
        assert!(p.validate().is_ok());
    }

    #[test]
    fn rejects_missing_first_name() {
        let violations = payload(json!({ "lastName": "Lovelace" })).validate().unwrap_err();
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].field, "firstName");
        assert_eq!(violations[0].message, "must not be blank");
    }

    #[test]
    fn rejects_whitespace_first_name() {
        let violations = payload(json!({ "firstName": "   " })).validate().unwrap_err();
        assert_eq!(violations[0].field, "firstName");
    }

    #[test]
    fn rejects_short_and_long_phone_numbers() {
        for phone in ["", "123", "12345678901"] {
            let violations = payload(json!({ "firstName": "Ada", "phoneNumber": phone }))
                .validate()
                .unwrap_err();
            assert_eq!(violations.len(), 1, "phone {:?}", phone);
            assert_eq!(violations[0].field, "phoneNumber");
            assert_eq!(violations[0].message, "phoneNumber must be 10 digits.");
        }
    }

    #[test]
    fn reports_violations_in_field_order() {
        let violations = payload(json!({ "firstName": "", "phoneNumber": "1" }))
            .validate()
            .unwrap_err();
        let fields: Vec<_> = violations.iter().map(|v| v.field).collect();
        assert_eq!(fields, vec!["firstName", "phoneNumber"]);
    }

    #[test]
    fn serializes_camel_case_with_null_last_name() {
        let person = Person {
            id: 7,
            first_name: "Ada".to_string(),
            last_name: None,
            phone_number: Some("1234567890".to_string()),
        };
        assert_eq!(
            serde_json::to_value(&person).unwrap(),
            json!({
                "id": 7,
                "firstName": "Ada",
                "lastName": null,
                "phoneNumber": "1234567890"
            })
        );
    }
}
