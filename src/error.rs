//! Error types for the fileconvert library.
//!
//! Three layers, three types:
//!
//! * [`TransformError`]: a single conversion failed (bad input bytes,
//!   library refused to encode). Carries the conversion id and a
//!   human-readable message, nothing else. Classified by
//!   [`TransformErrorKind`].
//!
//! * [`ConvertError`]: anything that can go wrong between picking a
//!   transform and getting its bytes back, including the transform itself.
//!
//! * [`RegistryError`] / [`ServerError`]: startup problems. These are
//!   programming or deployment mistakes and stop the process before it
//!   accepts a single request.

use crate::conversion::ConversionId;
use std::net::SocketAddr;
use std::path::PathBuf;
use thiserror::Error;

/// What went wrong inside a transform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransformErrorKind {
    /// Input bytes do not match the expected source format.
    Decode,
    /// The library rejected the operation on otherwise valid decoded data.
    Encode,
    /// Text was expected but the bytes are not valid UTF-8.
    Encoding,
}

/// A failed transform.
///
/// The `Display` form is the bare message; it is what ends up in the
/// `detail` field of the HTTP error body.
#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct TransformError {
    pub conversion: ConversionId,
    pub kind: TransformErrorKind,
    pub message: String,
}

impl TransformError {
    pub fn new(
        conversion: ConversionId,
        kind: TransformErrorKind,
        message: impl Into<String>,
    ) -> Self {
        Self {
            conversion,
            kind,
            message: message.into(),
        }
    }

    pub fn decode(conversion: ConversionId, message: impl Into<String>) -> Self {
        Self::new(conversion, TransformErrorKind::Decode, message)
    }

    pub fn encode(conversion: ConversionId, message: impl Into<String>) -> Self {
        Self::new(conversion, TransformErrorKind::Encode, message)
    }

    pub fn encoding(conversion: ConversionId, message: impl Into<String>) -> Self {
        Self::new(conversion, TransformErrorKind::Encoding, message)
    }

    /// `true` when the client sent something unusable (decode or encoding
    /// failure), as opposed to the library failing on good input.
    pub fn is_bad_input(&self) -> bool {
        matches!(
            self.kind,
            TransformErrorKind::Decode | TransformErrorKind::Encoding
        )
    }
}

/// Failures of the transform registry.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RegistryError {
    /// No transform is registered for the id. A route pointing at an
    /// unregistered id is a programming error and is caught at startup.
    #[error("No transform registered for conversion '{0}'")]
    NotFound(ConversionId),

    /// The same id was registered twice while building the registry.
    #[error("Conversion '{0}' is registered more than once")]
    DuplicateTransform(ConversionId),

    /// A route references a conversion the registry does not know.
    #[error("Route '{path}' references unregistered conversion '{conversion}'")]
    UnresolvedRoute {
        path: &'static str,
        conversion: ConversionId,
    },
}

/// Everything that can fail while running one conversion.
#[derive(Debug, Error)]
pub enum ConvertError {
    #[error(transparent)]
    Transform(#[from] TransformError),

    #[error(transparent)]
    Registry(#[from] RegistryError),

    /// The blocking task running the transform panicked or was cancelled.
    #[error("Conversion '{conversion}' aborted: {detail}")]
    TaskFailed {
        conversion: ConversionId,
        detail: String,
    },

    /// Could not read the input file (CLI / file-based entry point).
    #[error("Failed to read input file '{path}': {source}")]
    InputReadFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Could not write the converted output file.
    #[error("Failed to write output file '{path}': {source}")]
    OutputWriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl ConvertError {
    /// The conversion this error belongs to, when known.
    pub fn conversion(&self) -> Option<ConversionId> {
        match self {
            ConvertError::Transform(e) => Some(e.conversion),
            ConvertError::Registry(RegistryError::NotFound(id)) => Some(*id),
            ConvertError::TaskFailed { conversion, .. } => Some(*conversion),
            _ => None,
        }
    }
}

/// Startup and serving failures.
#[derive(Debug, Error)]
pub enum ServerError {
    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error(transparent)]
    Registry(#[from] RegistryError),

    #[error("Failed to bind {addr}: {source}")]
    Bind {
        addr: SocketAddr,
        #[source]
        source: std::io::Error,
    },

    #[error("Server error: {0}")]
    Serve(#[source] std::io::Error),
}
