//! Shared validation helpers for inbound HTTP adapters.

use actix_web::{HttpRequest, error::JsonPayloadError, error::QueryPayloadError, web};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::domain::Error;

/// Validation error codes for HTTP request failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ErrorCode {
    MissingField,
    InvalidNumber,
    OutOfRange,
    TooLong,
    MalformedBody,
}

impl ErrorCode {
    fn as_str(self) -> &'static str {
        match self {
            ErrorCode::MissingField => "missing_field",
            ErrorCode::InvalidNumber => "invalid_number",
            ErrorCode::OutOfRange => "out_of_range",
            ErrorCode::TooLong => "too_long",
            ErrorCode::MalformedBody => "malformed_body",
        }
    }
}

/// Newtype wrapper for HTTP field names to provide type safety.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct FieldName(&'static str);

impl FieldName {
    pub(crate) const fn new(name: &'static str) -> Self {
        Self(name)
    }

    pub(crate) fn as_str(self) -> &'static str {
        self.0
    }
}

/// Build an `invalid_request` error carrying `{field, code}` details.
pub(crate) fn field_error(message: impl Into<String>, field: FieldName, code: ErrorCode) -> Error {
    Error::invalid_request(message).with_details(json!({
        "field": field.as_str(),
        "code": code.as_str(),
    }))
}

/// Integer accepted either as a JSON number or as a numeric string.
///
/// # Examples
/// ```
/// use inventory_backend::inbound::http::validation::IntegerField;
///
/// let parsed: IntegerField = serde_json::from_str("\"12\"").unwrap();
/// assert_eq!(parsed.to_i32(), Some(12));
/// let parsed: IntegerField = serde_json::from_str("7").unwrap();
/// assert_eq!(parsed.to_i32(), Some(7));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum IntegerField {
    /// A JSON number.
    Number(serde_json::Number),
    /// A string holding a base-10 integer.
    Text(String),
}

impl IntegerField {
    /// Integral value, if the input denotes one that fits in `i32`.
    ///
    /// Floating-point numbers are accepted only when they have no fractional
    /// part.
    pub fn to_i32(&self) -> Option<i32> {
        match self {
            Self::Number(number) => {
                let whole = match number.as_i64() {
                    Some(value) => value,
                    None => {
                        let value = number.as_f64()?;
                        if value.fract() != 0.0 || !value.is_finite() {
                            return None;
                        }
                        value as i64
                    }
                };
                i32::try_from(whole).ok()
            }
            Self::Text(text) => text.trim().parse::<i32>().ok(),
        }
    }
}

impl From<i32> for IntegerField {
    fn from(value: i32) -> Self {
        Self::Number(value.into())
    }
}

/// Decimal accepted either as a JSON number or as a numeric string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DecimalField {
    /// A JSON number.
    Number(serde_json::Number),
    /// A string holding a decimal number.
    Text(String),
}

impl DecimalField {
    /// Finite value denoted by the input, if any.
    pub fn to_f64(&self) -> Option<f64> {
        let value = match self {
            Self::Number(number) => number.as_f64()?,
            Self::Text(text) => text.trim().parse::<f64>().ok()?,
        };
        value.is_finite().then_some(value)
    }
}

impl From<f64> for DecimalField {
    fn from(value: f64) -> Self {
        serde_json::Number::from_f64(value).map_or_else(|| Self::Text(value.to_string()), Self::Number)
    }
}

/// Parse a query-string identifier; absent, non-numeric and non-positive
/// values all yield `None`.
pub(crate) fn positive_id(raw: Option<&str>) -> Option<i32> {
    raw.and_then(|value| value.trim().parse::<i32>().ok())
        .filter(|value| *value > 0)
}

/// JSON extractor configuration rendering body errors as domain errors.
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(json_error_handler)
}

/// Query extractor configuration rendering query errors as domain errors.
pub fn query_config() -> web::QueryConfig {
    web::QueryConfig::default().error_handler(query_error_handler)
}

fn json_error_handler(err: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    Error::invalid_request(format!("invalid JSON body: {err}"))
        .with_details(json!({ "code": ErrorCode::MalformedBody.as_str() }))
        .into()
}

fn query_error_handler(err: QueryPayloadError, _req: &HttpRequest) -> actix_web::Error {
    Error::invalid_request(format!("invalid query string: {err}"))
        .with_details(json!({ "code": ErrorCode::MalformedBody.as_str() }))
        .into()
}
