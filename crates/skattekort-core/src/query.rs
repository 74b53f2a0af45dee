//! Inbound query validation.
//!
//! The raw request body is accepted leniently (`inntektsaar` may arrive as
//! a number or a numeric string) and validated into a [`SkattekortQuery`]
//! before anything else happens. Pure; the current year is a parameter so
//! the range check stays testable.

use std::fmt;

use chrono::{Datelike, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{ValidationError, FNR_DIGITS_MESSAGE, FNR_LENGTH_MESSAGE};

/// Oldest income year the upstream APIs answer for.
pub const MIN_INNTEKTSAAR: i32 = 2000;

/// Which upstream API serves the query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ApiVariant {
    #[default]
    Legacy,
    Current,
}

impl fmt::Display for ApiVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Legacy => f.write_str("legacy"),
            Self::Current => f.write_str("current"),
        }
    }
}

/// Raw inbound body of `POST /api/skattekort/hent-skattekort`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct HentSkattekortRequest {
    #[serde(default)]
    pub fnr: Option<Value>,
    #[serde(default)]
    pub inntektsaar: Option<Value>,
    #[serde(default, rename = "useNewApi")]
    pub use_new_api: bool,
}

/// A validated query. Serialization is the outbound upstream body; the
/// routing variant is internal and never leaves the service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkattekortQuery {
    pub fnr: String,
    pub inntektsaar: i32,
    #[serde(skip)]
    pub variant: ApiVariant,
}

/// Validate against the current calendar year.
pub fn validate(raw: &HentSkattekortRequest) -> Result<SkattekortQuery, ValidationError> {
    validate_at(raw, Utc::now().year())
}

/// Validate with an explicit current year. The accepted range for
/// `inntektsaar` is `[2000, current_year + 1]` — next year's card is
/// issued in December.
pub fn validate_at(
    raw: &HentSkattekortRequest,
    current_year: i32,
) -> Result<SkattekortQuery, ValidationError> {
    let fnr = raw
        .fnr
        .as_ref()
        .and_then(Value::as_str)
        .ok_or(ValidationError::InvalidNationalId(FNR_LENGTH_MESSAGE))?;

    if fnr.len() != 11 {
        return Err(ValidationError::InvalidNationalId(FNR_LENGTH_MESSAGE));
    }
    if !fnr.bytes().all(|b| b.is_ascii_digit()) {
        return Err(ValidationError::InvalidNationalId(FNR_DIGITS_MESSAGE));
    }

    let max_year = current_year + 1;
    let inntektsaar = coerce_year(raw.inntektsaar.as_ref())
        .filter(|year| (MIN_INNTEKTSAAR..=max_year).contains(year))
        .ok_or(ValidationError::InvalidYear(max_year))?;

    let variant = if raw.use_new_api {
        ApiVariant::Current
    } else {
        ApiVariant::Legacy
    };

    Ok(SkattekortQuery {
        fnr: fnr.to_string(),
        inntektsaar,
        variant,
    })
}

fn coerce_year(value: Option<&Value>) -> Option<i32> {
    match value? {
        Value::Number(n) => i32::try_from(n.as_i64()?).ok(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn request(fnr: Value, inntektsaar: Value) -> HentSkattekortRequest {
        HentSkattekortRequest {
            fnr: Some(fnr),
            inntektsaar: Some(inntektsaar),
            use_new_api: false,
        }
    }

    #[test]
    fn accepts_a_well_formed_query() {
        let query = validate_at(&request(json!("12345678901"), json!(2025)), 2025).unwrap();
        assert_eq!(query.fnr, "12345678901");
        assert_eq!(query.inntektsaar, 2025);
        assert_eq!(query.variant, ApiVariant::Legacy);
    }

    #[test]
    fn use_new_api_selects_the_current_variant() {
        let mut raw = request(json!("12345678901"), json!(2025));
        raw.use_new_api = true;
        let query = validate_at(&raw, 2025).unwrap();
        assert_eq!(query.variant, ApiVariant::Current);
    }

    #[test]
    fn rejects_missing_fnr() {
        let raw = HentSkattekortRequest {
            fnr: None,
            inntektsaar: Some(json!(2025)),
            use_new_api: false,
        };
        assert!(matches!(
            validate_at(&raw, 2025),
            Err(ValidationError::InvalidNationalId(_))
        ));
    }

    #[test]
    fn rejects_non_string_fnr() {
        let err = validate_at(&request(json!(12345678901_i64), json!(2025)), 2025).unwrap_err();
        assert!(matches!(err, ValidationError::InvalidNationalId(_)));
    }

    #[test]
    fn rejects_short_fnr() {
        let err = validate_at(&request(json!("123"), json!(2025)), 2025).unwrap_err();
        assert_eq!(err, ValidationError::InvalidNationalId(FNR_LENGTH_MESSAGE));
    }

    #[test]
    fn rejects_twelve_digit_fnr() {
        let err = validate_at(&request(json!("123456789012"), json!(2025)), 2025).unwrap_err();
        assert_eq!(err, ValidationError::InvalidNationalId(FNR_LENGTH_MESSAGE));
    }

    #[test]
    fn rejects_fnr_with_letters() {
        let err = validate_at(&request(json!("1234567890a"), json!(2025)), 2025).unwrap_err();
        assert_eq!(err, ValidationError::InvalidNationalId(FNR_DIGITS_MESSAGE));
    }

    #[test]
    fn coerces_numeric_string_year() {
        let query = validate_at(&request(json!("12345678901"), json!("2024")), 2025).unwrap();
        assert_eq!(query.inntektsaar, 2024);
    }

    #[test]
    fn rejects_year_before_2000() {
        let err = validate_at(&request(json!("12345678901"), json!(1999)), 2025).unwrap_err();
        assert_eq!(err, ValidationError::InvalidYear(2026));
    }

    #[test]
    fn accepts_next_years_card() {
        let query = validate_at(&request(json!("12345678901"), json!(2026)), 2025).unwrap();
        assert_eq!(query.inntektsaar, 2026);
    }

    #[test]
    fn rejects_year_two_past_current() {
        let err = validate_at(&request(json!("12345678901"), json!(2027)), 2025).unwrap_err();
        assert_eq!(err, ValidationError::InvalidYear(2026));
    }

    #[test]
    fn rejects_non_numeric_year() {
        let err = validate_at(&request(json!("12345678901"), json!("neste år")), 2025).unwrap_err();
        assert!(matches!(err, ValidationError::InvalidYear(_)));
    }

    #[test]
    fn outbound_body_carries_only_fnr_and_year() {
        let query = validate_at(&request(json!("12345678901"), json!(2025)), 2025).unwrap();
        let body = serde_json::to_value(&query).unwrap();
        assert_eq!(body, json!({ "fnr": "12345678901", "inntektsaar": 2025 }));
    }
}
