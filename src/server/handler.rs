//! Request handling for the conversion routes.

use super::error_response::ApiError;
use super::ServerState;
use crate::conversion::ConversionRequest;
use crate::convert::convert;
use crate::routes::Route;
use axum::extract::multipart::MultipartRejection;
use axum::extract::Multipart;
use axum::http::header;
use axum::response::{IntoResponse, Response};
use bytes::Bytes;
use tracing::debug;

/// Read the route's upload field, convert it and frame the result as a
/// download. A body axum refuses to treat as multipart is reported through
/// the same `{"detail": ...}` shape as every other failure.
pub async fn convert_upload(
    state: ServerState,
    route: &'static Route,
    multipart: Result<Multipart, MultipartRejection>,
) -> Response {
    match run(&state, route, multipart).await {
        Ok(body) => (
            [
                (header::CONTENT_TYPE, route.content_type().to_string()),
                (header::CONTENT_DISPOSITION, route.content_disposition()),
            ],
            body,
        )
            .into_response(),
        Err(err) => err.into_response_with(state.error_status),
    }
}

async fn run(
    state: &ServerState,
    route: &'static Route,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Vec<u8>, ApiError> {
    let payload = read_field(multipart?, route.field).await?;
    debug!("{}: received {} bytes", route.path, payload.len());

    let request = ConversionRequest::new(route.conversion, payload);
    let result = convert(&state.registry, request).await?;
    Ok(result.output)
}

/// Body of the first multipart field called `name`. Other fields are
/// drained and ignored.
async fn read_field(mut multipart: Multipart, name: &'static str) -> Result<Bytes, ApiError> {
    while let Some(field) = multipart.next_field().await? {
        if field.name() == Some(name) {
            return Ok(field.bytes().await?);
        }
    }
    Err(ApiError::MissingField(name))
}
