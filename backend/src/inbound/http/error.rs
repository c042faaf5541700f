//! `ResponseError` for the domain error.
//!
//! Statuses follow the error code. Store failures are logged in full and
//! sent to the client as a bare "Internal server error" that keeps only
//! the trace id; every other error reaches the client unchanged.

use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use tracing::{error, warn};

use crate::domain::{Error, ErrorCode, TRACE_ID_HEADER};

/// Handler result whose error renders as the JSON envelope.
pub type ApiResult<T> = Result<T, Error>;

const REDACTED_MESSAGE: &str = "Internal server error";

fn status_for(code: ErrorCode) -> StatusCode {
    match code {
        ErrorCode::InvalidRequest => StatusCode::BAD_REQUEST,
        ErrorCode::Unauthorized => StatusCode::UNAUTHORIZED,
        ErrorCode::Forbidden => StatusCode::FORBIDDEN,
        ErrorCode::NotFound => StatusCode::NOT_FOUND,
        ErrorCode::Conflict => StatusCode::CONFLICT,
        ErrorCode::ServiceUnavailable => StatusCode::SERVICE_UNAVAILABLE,
        ErrorCode::ConfigurationError => StatusCode::NOT_ACCEPTABLE,
        ErrorCode::PersistenceError => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// The envelope as the client sees it.
fn client_view(error: &Error) -> Error {
    if error.code() != ErrorCode::PersistenceError {
        return error.clone();
    }
    let redacted = Error::persistence(REDACTED_MESSAGE);
    match error.trace_id() {
        Some(id) => redacted.with_trace_id(id),
        None => redacted,
    }
}

fn log_server_side(error: &Error) {
    let trace_id = error.trace_id().unwrap_or_default();
    match error.code() {
        ErrorCode::PersistenceError => {
            error!(
                trace_id,
                message = error.message(),
                details = ?error.details(),
                "store failure"
            );
        }
        ErrorCode::ServiceUnavailable => {
            warn!(trace_id, message = error.message(), "dependency unavailable");
        }
        _ => {}
    }
}

impl ResponseError for Error {
    fn status_code(&self) -> StatusCode {
        status_for(self.code())
    }

    fn error_response(&self) -> HttpResponse {
        log_server_side(self);

        let mut response = HttpResponse::build(self.status_code());
        if let Some(id) = self.trace_id() {
            response.insert_header((TRACE_ID_HEADER, id));
        }
        response.json(client_view(self))
    }
}
