// Copyright (c) 2022 Unfolded Circle ApS, Markus Zehnder <markus.z@unfoldedcircle.com>
// SPDX-License-Identifier: MPL-2.0

//! Custom application error with conversions from common Rust and 3rd-party errors.

use actix::MailboxError;
use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use awc::error::{PayloadError, SendRequestError};
use derive_more::Display;
use log::error;

use crate::server::web_model::ApiResponse;

#[derive(Debug, Display, PartialEq)]
pub enum ServiceError {
    #[display("Internal server error: {_0}")]
    InternalServerError(String),

    #[display("Internal serialization error: {_0}")]
    SerializationError(String),

    #[display("BadRequest: {_0}")]
    BadRequest(String),

    #[display("Not found: {_0}")]
    NotFound(String),

    #[display("Already exists: {_0}")]
    AlreadyExists(String),

    #[display("Pattern limit reached: {_0}")]
    LimitReached(String),

    #[display("Name conflict: {_0}")]
    NameConflict(String),

    #[display("Zone is off: {_0}")]
    ZoneOff(String),

    #[display("Controller not reachable: {_0}")]
    ServiceUnavailable(String),
}

impl ServiceError {
    /// Error code used in the REST API response body.
    pub fn code(&self) -> &'static str {
        match self {
            ServiceError::InternalServerError(_) => "INTERNAL_ERROR",
            ServiceError::SerializationError(_) => "SERIALIZATION_ERROR",
            ServiceError::BadRequest(_) => "BAD_REQUEST",
            ServiceError::NotFound(_) => "NOT_FOUND",
            ServiceError::AlreadyExists(_) => "ALREADY_EXISTS",
            ServiceError::LimitReached(_) => "LIMIT_REACHED",
            ServiceError::NameConflict(_) => "NAME_CONFLICT",
            ServiceError::ZoneOff(_) => "ZONE_OFF",
            ServiceError::ServiceUnavailable(_) => "SERVICE_UNAVAILABLE",
        }
    }
}

impl std::error::Error for ServiceError {}

impl ResponseError for ServiceError {
    fn status_code(&self) -> StatusCode {
        match self {
            ServiceError::InternalServerError(_) | ServiceError::SerializationError(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            ServiceError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ServiceError::NotFound(_) => StatusCode::NOT_FOUND,
            ServiceError::AlreadyExists(_)
            | ServiceError::LimitReached(_)
            | ServiceError::NameConflict(_)
            | ServiceError::ZoneOff(_) => StatusCode::CONFLICT,
            ServiceError::ServiceUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let message = self.to_string();
        HttpResponse::build(self.status_code()).json(ApiResponse::new(self.code(), &message))
    }
}

impl From<std::io::Error> for ServiceError {
    fn from(e: std::io::Error) -> Self {
        error!("{:?}", e);
        ServiceError::InternalServerError(format!("I/O error: {e}"))
    }
}

impl From<MailboxError> for ServiceError {
    fn from(e: MailboxError) -> Self {
        ServiceError::InternalServerError(format!("Internal message error: {:?}", e))
    }
}

impl From<serde_json::Error> for ServiceError {
    fn from(e: serde_json::Error) -> Self {
        error!("{:?}", e);
        ServiceError::SerializationError(e.to_string())
    }
}

impl From<strum::ParseError> for ServiceError {
    fn from(e: strum::ParseError) -> Self {
        ServiceError::BadRequest(e.to_string())
    }
}

impl From<SendRequestError> for ServiceError {
    fn from(e: SendRequestError) -> Self {
        ServiceError::ServiceUnavailable(e.to_string())
    }
}

impl From<PayloadError> for ServiceError {
    fn from(e: PayloadError) -> Self {
        ServiceError::ServiceUnavailable(format!("Error reading response: {e}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(ServiceError::BadRequest("x".into()), StatusCode::BAD_REQUEST)]
    #[case(ServiceError::NotFound("x".into()), StatusCode::NOT_FOUND)]
    #[case(ServiceError::LimitReached("x".into()), StatusCode::CONFLICT)]
    #[case(ServiceError::NameConflict("x".into()), StatusCode::CONFLICT)]
    #[case(ServiceError::ServiceUnavailable("x".into()), StatusCode::SERVICE_UNAVAILABLE)]
    #[case(ServiceError::SerializationError("x".into()), StatusCode::INTERNAL_SERVER_ERROR)]
    fn status_code_mapping(#[case] error: ServiceError, #[case] expected: StatusCode) {
        assert_eq!(expected, error.status_code());
    }

    #[test]
    fn display_contains_message() {
        let error = ServiceError::NotFound("pattern foo".into());
        assert_eq!("Not found: pattern foo", error.to_string());
    }
}
