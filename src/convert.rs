//! Conversion dispatch: resolve the transform, run it, wrap the bytes.
//!
//! Transforms are CPU-bound library calls, so the async entry point moves
//! them onto Tokio's blocking pool. [`convert_sync`] is the same operation
//! for callers that are not inside a runtime.

use crate::conversion::{ConversionId, ConversionRequest, ConversionResult};
use crate::error::ConvertError;
use crate::registry::TransformRegistry;
use std::path::Path;
use std::time::Instant;
use tracing::{debug, info};

/// Run one conversion on the blocking pool.
///
/// # Errors
/// * [`ConvertError::Registry`] if no transform is registered for the id
/// * [`ConvertError::Transform`] if the transform rejects the input
/// * [`ConvertError::TaskFailed`] if the blocking task panicked
pub async fn convert(
    registry: &TransformRegistry,
    request: ConversionRequest,
) -> Result<ConversionResult, ConvertError> {
    let conversion = request.conversion;
    let transform = registry.lookup(conversion)?;
    let input_len = request.payload.len();
    debug!("Starting {} on {} bytes", conversion, input_len);

    let start = Instant::now();
    let payload = request.payload;
    let output = tokio::task::spawn_blocking(move || transform(&payload))
        .await
        .map_err(|e| ConvertError::TaskFailed {
            conversion,
            detail: e.to_string(),
        })??;

    info!(
        "Converted {}: {} bytes → {} bytes in {}ms",
        conversion,
        input_len,
        output.len(),
        start.elapsed().as_millis()
    );
    Ok(ConversionResult::new(conversion, output))
}

/// Synchronous version of [`convert`]; runs the transform on the calling
/// thread.
pub fn convert_sync(
    registry: &TransformRegistry,
    request: ConversionRequest,
) -> Result<ConversionResult, ConvertError> {
    let conversion = request.conversion;
    let transform = registry.lookup(conversion)?;
    let start = Instant::now();
    let output = transform(&request.payload)?;
    info!(
        "Converted {}: {} bytes → {} bytes in {}ms",
        conversion,
        request.payload.len(),
        output.len(),
        start.elapsed().as_millis()
    );
    Ok(ConversionResult::new(conversion, output))
}

/// Convert a file on disk and write the result to `output`.
///
/// Returns the result metadata (content type, suggested filename) with the
/// bytes already written.
pub fn convert_file(
    registry: &TransformRegistry,
    conversion: ConversionId,
    input: &Path,
    output: &Path,
) -> Result<ConversionResult, ConvertError> {
    let payload = std::fs::read(input).map_err(|source| ConvertError::InputReadFailed {
        path: input.to_path_buf(),
        source,
    })?;
    let result = convert_sync(registry, ConversionRequest::new(conversion, payload))?;
    std::fs::write(output, &result.output).map_err(|source| ConvertError::OutputWriteFailed {
        path: output.to_path_buf(),
        source,
    })?;
    info!("Wrote {}", output.display());
    Ok(result)
}
