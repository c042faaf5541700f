//! Shared validation helpers for inbound HTTP adapters.

use actix_web::{HttpRequest, error::JsonPayloadError, web};
use chrono::{DateTime, NaiveDateTime, Utc};
use serde_json::json;

use crate::domain::Error;

/// Wire format for timestamps in request and response bodies.
pub(crate) const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.3fZ";

/// Validation error codes for HTTP request failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ErrorCode {
    MissingField,
    InvalidTimestamp,
    IdMismatch,
    MalformedBody,
}

impl ErrorCode {
    fn as_str(self) -> &'static str {
        match self {
            ErrorCode::MissingField => "missing_field",
            ErrorCode::InvalidTimestamp => "invalid_timestamp",
            ErrorCode::IdMismatch => "id_mismatch",
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

    fn as_str(&self) -> &str {
        self.0
    }
}

/// Builder for validation errors with field context.
struct ValidationError {
    field: String,
    message: String,
}

impl ValidationError {
    fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }

    fn with_code(self, code: ErrorCode) -> Error {
        Error::invalid_request(self.message).with_details(json!({
            "field": self.field,
            "code": code.as_str(),
        }))
    }

    fn with_value(self, code: ErrorCode, value: impl Into<String>) -> Error {
        Error::invalid_request(self.message).with_details(json!({
            "field": self.field,
            "value": value.into(),
            "code": code.as_str(),
        }))
    }
}

pub(crate) fn missing_field_error(field: FieldName) -> Error {
    let field = field.as_str();
    ValidationError::new(field, format!("missing required field: {field}"))
        .with_code(ErrorCode::MissingField)
}

pub(crate) fn id_mismatch_error(field: FieldName, path_id: &str, body_id: &str) -> Error {
    let field = field.as_str();
    ValidationError::new(
        field,
        format!("{field} in the body must match the path identifier {path_id}"),
    )
    .with_value(ErrorCode::IdMismatch, body_id)
}

pub(crate) fn invalid_timestamp_error(field: FieldName, value: &str) -> Error {
    let field = field.as_str();
    ValidationError::new(
        field,
        format!("{field} must use the format yyyy-MM-ddTHH:mm:ss.SSSZ"),
    )
    .with_value(ErrorCode::InvalidTimestamp, value)
}

/// Render a timestamp in the wire format.
pub(crate) fn format_timestamp(value: &DateTime<Utc>) -> String {
    value.format(TIMESTAMP_FORMAT).to_string()
}

pub(crate) fn parse_timestamp(value: String, field: FieldName) -> Result<DateTime<Utc>, Error> {
    NaiveDateTime::parse_from_str(&value, TIMESTAMP_FORMAT)
        .map(|timestamp| timestamp.and_utc())
        .map_err(|_| invalid_timestamp_error(field, &value))
}

pub(crate) fn parse_optional_timestamp(
    value: Option<String>,
    field: FieldName,
) -> Result<Option<DateTime<Utc>>, Error> {
    value.map(|raw| parse_timestamp(raw, field)).transpose()
}

fn malformed_body_error(err: &JsonPayloadError) -> Error {
    Error::invalid_request(format!("request body is not valid JSON: {err}")).with_details(json!({
        "field": "body",
        "code": ErrorCode::MalformedBody.as_str(),
    }))
}

/// JSON extractor configuration reporting malformed bodies as
/// `invalid_request` envelopes.
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default()
        .error_handler(|err, _req: &HttpRequest| malformed_body_error(&err).into())
}
