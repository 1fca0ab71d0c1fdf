//! `ResponseError` for the domain [`Error`].
//!
//! Client errors are returned as built. Internal errors are logged with their
//! real message and replaced by a generic body that keeps only the trace
//! identifier.

use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use tracing::error;

use crate::domain::{Error, ErrorCode, TRACE_ID_HEADER};

const INTERNAL_MESSAGE: &str = "Internal server error";

/// Result alias for HTTP handlers.
pub type ApiResult<T> = Result<T, Error>;

impl Error {
    /// Body sent to the client for this error.
    fn public_body(&self) -> Error {
        if self.code() != ErrorCode::InternalError {
            return self.clone();
        }
        error!(message = %self.message(), trace_id = ?self.trace_id(), "request failed");
        let generic = Error::internal(INTERNAL_MESSAGE);
        match self.trace_id() {
            Some(id) => generic.with_trace_id(id),
            None => generic,
        }
    }
}

impl ResponseError for Error {
    fn status_code(&self) -> StatusCode {
        match self.code() {
            ErrorCode::InvalidRequest | ErrorCode::InsufficientStock => StatusCode::BAD_REQUEST,
            ErrorCode::Unauthorized => StatusCode::UNAUTHORIZED,
            ErrorCode::Forbidden => StatusCode::FORBIDDEN,
            ErrorCode::NotFound => StatusCode::NOT_FOUND,
            ErrorCode::Conflict => StatusCode::CONFLICT,
            ErrorCode::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let mut response = HttpResponse::build(self.status_code());
        if let Some(id) = self.trace_id() {
            response.insert_header((TRACE_ID_HEADER, id.to_owned()));
        }
        response.json(self.public_body())
    }
}

/// Session and extractor failures surface as opaque internal errors.
impl From<actix_web::Error> for Error {
    fn from(err: actix_web::Error) -> Self {
        error!(error = %err, "framework error promoted to domain error");
        Error::internal(INTERNAL_MESSAGE)
    }
}

#[cfg(test)]
mod tests;
