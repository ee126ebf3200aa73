//! Registration payloads: parsing, validation and enrichment.

mod metadata;

pub use metadata::{RequestMetadata, UNKNOWN};

use crate::error::RelayError;
use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;
use serde_json::Value;

/// Default for `producto` when the form does not send one.
pub const DEFAULT_PRODUCTO: &str = "Lanzamiento";

/// Registration form submission as received from the caller.
///
/// Values are kept as sent; normalization happens in [`EnrichedPayload::build`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InboundPayload {
    pub nombre: String,
    pub email: String,
    pub whatsapp: String,
    pub producto: Option<String>,
    pub producto_id: Option<String>,
    pub producto_handle: Option<String>,
    pub producto_price: Option<String>,
    pub producto_image: Option<String>,
}

impl InboundPayload {
    /// Parse a request body, checking that the required fields are present.
    pub fn from_json(body: &[u8]) -> Result<Self, RelayError> {
        let value: Value = serde_json::from_slice(body).map_err(|_| RelayError::InvalidJson)?;

        let (Some(nombre), Some(email), Some(whatsapp)) = (
            text_field(&value, "nombre"),
            text_field(&value, "email"),
            text_field(&value, "whatsapp"),
        ) else {
            return Err(RelayError::MissingFields);
        };

        Ok(Self {
            nombre,
            email,
            whatsapp,
            producto: text_field(&value, "producto"),
            producto_id: text_field(&value, "productoId"),
            producto_handle: text_field(&value, "productoHandle"),
            producto_price: text_field(&value, "productoPrice"),
            producto_image: text_field(&value, "productoImage"),
        })
    }

    /// Check the email format (surrounding whitespace is ignored).
    pub fn validate(&self) -> Result<(), RelayError> {
        if is_valid_email(trim_form(&self.email)) {
            Ok(())
        } else {
            Err(RelayError::InvalidEmail)
        }
    }
}

/// Payload forwarded to the Apps Script endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EnrichedPayload {
    pub nombre: String,
    pub email: String,
    pub whatsapp: String,
    pub producto: String,
    pub producto_id: String,
    pub producto_handle: String,
    pub producto_price: String,
    pub producto_image: String,
    pub ip: String,
    pub user_agent: String,
    pub origen: String,
    /// ISO-8601 UTC processing time, millisecond precision.
    pub fecha: String,
}

impl EnrichedPayload {
    /// Normalize the submission and attach request metadata.
    pub fn build(inbound: InboundPayload, metadata: RequestMetadata, now: DateTime<Utc>) -> Self {
        Self {
            nombre: trim_form(&inbound.nombre).to_string(),
            email: trim_form(&inbound.email).to_lowercase(),
            whatsapp: trim_form(&inbound.whatsapp).to_string(),
            producto: inbound
                .producto
                .unwrap_or_else(|| DEFAULT_PRODUCTO.to_string()),
            producto_id: inbound.producto_id.unwrap_or_default(),
            producto_handle: inbound.producto_handle.unwrap_or_default(),
            producto_price: inbound.producto_price.unwrap_or_default(),
            producto_image: inbound.producto_image.unwrap_or_default(),
            ip: metadata.ip,
            user_agent: metadata.user_agent,
            origen: metadata.origen,
            fecha: now.to_rfc3339_opts(SecondsFormat::Millis, true),
        }
    }
}

/// Simple `local@domain.tld` check: no whitespace, a single `@`, and a dot
/// inside the domain with text on both sides.
pub fn is_valid_email(email: &str) -> bool {
    if email.chars().any(is_form_whitespace) {
        return false;
    }

    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };

    if local.is_empty() || domain.contains('@') {
        return false;
    }

    domain
        .char_indices()
        .any(|(i, c)| c == '.' && i > 0 && i + 1 < domain.len())
}

/// Whitespace as browsers treat it in form values: Unicode `White_Space`
/// minus U+0085, plus the byte order mark U+FEFF.
fn is_form_whitespace(c: char) -> bool {
    (c.is_whitespace() && c != '\u{85}') || c == '\u{FEFF}'
}

fn trim_form(value: &str) -> &str {
    value.trim_matches(is_form_whitespace)
}

/// Read a form field as text.
///
/// Blank strings and zero count as absent. Other numbers are accepted in
/// their JSON form since forms often send phone numbers and prices
/// unquoted; any other type is treated as absent.
fn text_field(value: &Value, name: &str) -> Option<String> {
    match value.get(name)? {
        Value::String(s) if !trim_form(s).is_empty() => Some(s.clone()),
        Value::Number(n) if n.as_f64() != Some(0.0) => Some(n.to_string()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    fn parse(value: Value) -> Result<InboundPayload, RelayError> {
        InboundPayload::from_json(value.to_string().as_bytes())
    }

    fn metadata() -> RequestMetadata {
        RequestMetadata {
            ip: "203.0.113.7".into(),
            user_agent: "Mozilla/5.0".into(),
            origen: "https://tienda.example".into(),
        }
    }

    #[test]
    fn test_invalid_json() {
        assert!(matches!(
            InboundPayload::from_json(b"{not json"),
            Err(RelayError::InvalidJson)
        ));
        assert!(matches!(
            InboundPayload::from_json(b""),
            Err(RelayError::InvalidJson)
        ));
    }

    #[test]
    fn test_missing_required_fields() {
        let cases = [
            json!({"email": "a@b.co", "whatsapp": "1"}),
            json!({"nombre": "Ana", "whatsapp": "1"}),
            json!({"nombre": "Ana", "email": "a@b.co"}),
            json!({"nombre": "", "email": "a@b.co", "whatsapp": "1"}),
            json!({"nombre": "Ana", "email": "a@b.co", "whatsapp": "   "}),
            json!({"nombre": null, "email": "a@b.co", "whatsapp": "1"}),
            json!({"nombre": false, "email": "a@b.co", "whatsapp": "1"}),
            json!({"nombre": "Ana", "email": "a@b.co", "whatsapp": 0}),
            json!({"nombre": "Ana", "email": "a@b.co", "whatsapp": "\u{FEFF}"}),
            json!(["Ana", "a@b.co", "1"]),
            json!(null),
        ];

        for case in cases {
            assert!(
                matches!(parse(case.clone()), Err(RelayError::MissingFields)),
                "expected missing fields for {}",
                case
            );
        }
    }

    #[test]
    fn test_numeric_fields_accepted() {
        let inbound = parse(json!({
            "nombre": "Ana",
            "email": "a@b.co",
            "whatsapp": 5551234,
            "productoPrice": 199.5
        }))
        .unwrap();

        assert_eq!(inbound.whatsapp, "5551234");
        assert_eq!(inbound.producto_price.as_deref(), Some("199.5"));
    }

    #[test]
    fn test_email_validation() {
        for valid in ["ana@test.com", "a.b+c@sub.domain.mx", "x@y.z"] {
            assert!(is_valid_email(valid), "{} should be valid", valid);
        }

        for invalid in [
            "not-an-email",
            "@test.com",
            "ana@",
            "ana@test",
            "ana@.com",
            "ana@test.",
            "ana@@test.com",
            "ana@te@st.com",
            "ana gomez@test.com",
            "a\u{FEFF}b@c.de",
            "ana@test\u{00A0}.com",
            "",
        ] {
            assert!(!is_valid_email(invalid), "{} should be invalid", invalid);
        }
    }

    #[test]
    fn test_validate_ignores_surrounding_whitespace() {
        let inbound = parse(json!({
            "nombre": "Ana",
            "email": " Ana@Test.com ",
            "whatsapp": "1"
        }))
        .unwrap();

        assert!(inbound.validate().is_ok());
    }

    #[test]
    fn test_trim_matches_form_whitespace() {
        assert_eq!(trim_form("\u{FEFF} Ana\u{00A0}\t"), "Ana");
        assert_eq!(trim_form("\u{85}Ana"), "\u{85}Ana");
    }

    #[test]
    fn test_validate_rejects_bad_email() {
        let inbound = parse(json!({
            "nombre": "Ana",
            "email": "not-an-email",
            "whatsapp": "1"
        }))
        .unwrap();

        assert!(matches!(inbound.validate(), Err(RelayError::InvalidEmail)));
    }

    #[test]
    fn test_build_normalizes_and_enriches() {
        let inbound = parse(json!({
            "nombre": "  Ana Gómez ",
            "email": " Ana@Test.com ",
            "whatsapp": " 5551234 ",
            "productoId": "gid://shopify/Product/1",
            "productoHandle": "camisa",
            "productoPrice": "$199.00",
            "productoImage": "https://cdn.example/camisa.png",
            "producto": "Camisa"
        }))
        .unwrap();
        let now = Utc.with_ymd_and_hms(2026, 10, 19, 12, 30, 0).unwrap();

        let payload = EnrichedPayload::build(inbound, metadata(), now);

        assert_eq!(payload.nombre, "Ana Gómez");
        assert_eq!(payload.email, "ana@test.com");
        assert_eq!(payload.whatsapp, "5551234");
        assert_eq!(payload.producto, "Camisa");
        assert_eq!(payload.producto_handle, "camisa");
        assert_eq!(payload.ip, "203.0.113.7");
        assert_eq!(payload.fecha, "2026-10-19T12:30:00.000Z");
    }

    #[test]
    fn test_build_defaults_product_fields() {
        let inbound = parse(json!({
            "nombre": "Ana",
            "email": "ana@test.com",
            "whatsapp": "1",
            "producto": "",
            "productoPrice": 0
        }))
        .unwrap();

        let payload = EnrichedPayload::build(inbound, RequestMetadata::default(), Utc::now());

        assert_eq!(payload.producto, DEFAULT_PRODUCTO);
        assert_eq!(payload.producto_id, "");
        assert_eq!(payload.producto_handle, "");
        assert_eq!(payload.producto_price, "");
        assert_eq!(payload.producto_image, "");
        assert_eq!(payload.origen, UNKNOWN);
    }

    #[test]
    fn test_serialized_keys() {
        let payload = EnrichedPayload::build(
            parse(json!({"nombre": "Ana", "email": "a@b.co", "whatsapp": "1"})).unwrap(),
            metadata(),
            Utc::now(),
        );
        let json = serde_json::to_value(&payload).unwrap();

        for key in [
            "nombre",
            "email",
            "whatsapp",
            "producto",
            "productoId",
            "productoHandle",
            "productoPrice",
            "productoImage",
            "ip",
            "userAgent",
            "origen",
            "fecha",
        ] {
            assert!(json.get(key).is_some(), "missing key {}", key);
        }
    }
}
