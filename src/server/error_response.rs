//! Error normalisation: every failure leaves the server as
//! `{"detail": "<message>"}`.

use crate::config::ErrorStatusPolicy;
use crate::error::ConvertError;
use axum::extract::multipart::MultipartError;
use axum::extract::multipart::MultipartRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use tracing::warn;

/// JSON body of every error response.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    pub detail: String,
}

/// Why a conversion request failed.
#[derive(Debug)]
pub enum ApiError {
    /// The request is not a usable `multipart/form-data` body.
    Rejected(MultipartRejection),
    /// The multipart body could not be read.
    Multipart(MultipartError),
    /// The upload field the route expects was not in the form.
    MissingField(&'static str),
    /// The conversion itself failed.
    Convert(ConvertError),
}

impl From<MultipartRejection> for ApiError {
    fn from(rejection: MultipartRejection) -> Self {
        ApiError::Rejected(rejection)
    }
}

impl From<MultipartError> for ApiError {
    fn from(err: MultipartError) -> Self {
        ApiError::Multipart(err)
    }
}

impl From<ConvertError> for ApiError {
    fn from(err: ConvertError) -> Self {
        ApiError::Convert(err)
    }
}

impl ApiError {
    /// Status code under the given policy.
    ///
    /// Request-shape problems keep their own 4xx statuses whatever the
    /// policy; only conversion failures are subject to it.
    pub fn status(&self, policy: ErrorStatusPolicy) -> StatusCode {
        match self {
            ApiError::Rejected(r) => r.status(),
            ApiError::Multipart(e) => e.status(),
            ApiError::MissingField(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::Convert(e) => match (policy, e) {
                (ErrorStatusPolicy::Classified, ConvertError::Transform(t)) if t.is_bad_input() => {
                    StatusCode::UNPROCESSABLE_ENTITY
                }
                _ => StatusCode::INTERNAL_SERVER_ERROR,
            },
        }
    }

    pub fn message(&self) -> String {
        match self {
            ApiError::Rejected(r) => r.body_text(),
            ApiError::Multipart(e) => e.body_text(),
            ApiError::MissingField(field) => format!("Field required: {field}"),
            ApiError::Convert(e) => e.to_string(),
        }
    }

    /// Turn the error into the uniform response, logging it on the way out.
    pub fn into_response_with(self, policy: ErrorStatusPolicy) -> Response {
        let status = self.status(policy);
        let detail = self.message();
        match &self {
            ApiError::Convert(e) => warn!(
                "Conversion {} failed ({}): {}",
                e.conversion().map_or("?", |c| c.as_str()),
                status,
                detail
            ),
            _ => warn!("Rejected upload ({}): {}", status, detail),
        }
        error_response(status, detail)
    }
}

pub fn error_response(status: StatusCode, detail: impl Into<String>) -> Response {
    (
        status,
        Json(ErrorBody {
            detail: detail.into(),
        }),
    )
        .into_response()
}
