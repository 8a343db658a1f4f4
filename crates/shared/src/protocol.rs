use serde::{Deserialize, Deserializer, Serialize};

use crate::{domain::RecordId, error::ApiError};

/// Envelope shared by every `/api` endpoint.
///
/// `success` defaults to `false` so a bare `{"error": ".."}` body decodes as a
/// failure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    #[serde(default)]
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn with_data(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            message: None,
            error: None,
        }
    }

    pub fn with_message(message: impl Into<String>) -> Self {
        Self {
            success: true,
            data: None,
            message: Some(message.into()),
            error: None,
        }
    }

    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            message: None,
            error: Some(error.into()),
        }
    }
}

impl<T> From<ApiError> for ApiResponse<T> {
    fn from(value: ApiError) -> Self {
        Self::failure(value.message)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Customer {
    #[serde(rename = "ID_CLIENTE")]
    pub id: RecordId,
    #[serde(rename = "NOMBRE")]
    pub name: String,
    #[serde(rename = "DIRECCION", default)]
    pub address: Option<String>,
    #[serde(rename = "TELEFONO", default)]
    pub phone: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomerPayload {
    #[serde(rename = "nombre")]
    pub name: String,
    #[serde(rename = "direccion", default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(rename = "telefono", default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    #[serde(rename = "ID_PRODUCTO")]
    pub id: RecordId,
    #[serde(rename = "NOMBRE")]
    pub name: String,
    #[serde(rename = "PRECIO", deserialize_with = "number_or_numeric_string")]
    pub price: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductPayload {
    #[serde(rename = "nombre")]
    pub name: String,
    #[serde(rename = "precio", deserialize_with = "number_or_numeric_string")]
    pub price: f64,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum NumberOrString {
    Number(f64),
    Text(String),
}

// NUMBER columns come back either as JSON numbers or as decimal strings.
fn number_or_numeric_string<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    match NumberOrString::deserialize(deserializer)? {
        NumberOrString::Number(value) => Ok(value),
        NumberOrString::Text(raw) => raw
            .trim()
            .parse::<f64>()
            .map_err(|err| serde::de::Error::custom(format!("invalid number {raw:?}: {err}"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn bare_error_body_decodes_as_failure() {
        let body: ApiResponse<Customer> =
            serde_json::from_value(json!({ "error": "Cliente no encontrado" })).expect("decode");
        assert!(!body.success);
        assert_eq!(body.error.as_deref(), Some("Cliente no encontrado"));
        assert!(body.data.is_none());
    }

    #[test]
    fn record_envelope_decodes_with_and_without_data() {
        let body: ApiResponse<Customer> = serde_json::from_value(json!({
            "success": true,
            "data": { "ID_CLIENTE": 4, "NOMBRE": "Luis" }
        }))
        .expect("decode");
        assert!(body.success);
        assert_eq!(body.data.map(|customer| customer.id), Some(RecordId(4)));

        let body: ApiResponse<Customer> = serde_json::from_value(json!({
            "success": true,
            "message": "Cliente creado exitosamente"
        }))
        .expect("decode");
        assert!(body.data.is_none());
        assert_eq!(body.message.as_deref(), Some("Cliente creado exitosamente"));
    }

    #[test]
    fn product_price_accepts_numeric_strings() {
        let product: Product = serde_json::from_value(json!({
            "ID_PRODUCTO": 3,
            "NOMBRE": "Tornillo",
            "PRECIO": "12.5"
        }))
        .expect("decode");
        assert_eq!(product.id, RecordId(3));
        assert_eq!(product.price, 12.5);
    }

    #[test]
    fn customer_optional_columns_may_be_null() {
        let customer: Customer = serde_json::from_value(json!({
            "ID_CLIENTE": 1,
            "NOMBRE": "Acme",
            "DIRECCION": null,
            "TELEFONO": "555-0100"
        }))
        .expect("decode");
        assert_eq!(customer.address, None);
        assert_eq!(customer.phone.as_deref(), Some("555-0100"));
    }

    #[test]
    fn customer_payload_uses_form_field_names() {
        let payload = CustomerPayload {
            name: "Acme".into(),
            address: None,
            phone: Some("555-0100".into()),
        };
        assert_eq!(
            serde_json::to_value(&payload).expect("encode"),
            json!({ "nombre": "Acme", "telefono": "555-0100" })
        );
    }

    #[test]
    fn failure_envelope_omits_empty_fields() {
        let body: ApiResponse<()> = ApiError::not_found("Producto no encontrado").into();
        assert_eq!(
            serde_json::to_value(&body).expect("encode"),
            json!({ "success": false, "error": "Producto no encontrado" })
        );
    }
}
