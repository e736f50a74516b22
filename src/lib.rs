//! # fileconvert
//!
//! Upload a file, get it back in a different format.
//!
//! A small HTTP service around a **conversion dispatch layer**: every
//! endpoint accepts one multipart upload, routes the bytes to the transform
//! bound to that endpoint, and streams the output back as a download with
//! the right `Content-Type` and `Content-Disposition`. Any failure comes back
//! in one uniform shape, `{"detail": "<message>"}`.
//!
//! ## Request Flow
//!
//! ```text
//! client
//!  │
//!  ├─ 1. Route     static table: path → conversion id + response metadata
//!  ├─ 2. Handler   read the `file` multipart field into memory
//!  ├─ 3. Registry  conversion id → transform fn (immutable after startup)
//!  ├─ 4. Transform bytes → bytes on the blocking pool (image, docx-rs, lopdf, …)
//!  ├─ 5. Errors    any failure → {"detail": …} (500 by default)
//!  └─ 6. Response  body + Content-Type + Content-Disposition: attachment
//! ```
//!
//! ## Conversions
//!
//! | Endpoint | Id | Output |
//! |----------|----|--------|
//! | `/convert-to-jpg/` | `image->jpeg` | `converted.jpg` |
//! | `/convert-to-png/` | `image->png` | `converted.png` |
//! | `/convert-to-pdf/` | `docx->pdf` | `converted.pdf` |
//! | `/convert-to-docx/` | `markdown->docx` | `converted.docx` |
//! | `/convert-to-csv/` | `spreadsheet->csv` | `converted.csv` |
//! | `/convert-to-xls/` | `csv->spreadsheet` | `converted.xlsx` |
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use fileconvert::{serve, ServerConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = ServerConfig::builder()
//!         .allowed_origins(["http://localhost:3000"])
//!         .build()?;
//!     serve(config).await?;
//!     Ok(())
//! }
//! ```
//!
//! The transforms are usable without the server:
//!
//! ```rust,no_run
//! use fileconvert::{convert_sync, ConversionId, ConversionRequest, TransformRegistry};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let registry = TransformRegistry::builtin();
//! let markdown = std::fs::read("notes.md")?;
//! let result = convert_sync(
//!     &registry,
//!     ConversionRequest::new(ConversionId::MarkdownToDocx, markdown),
//! )?;
//! std::fs::write(result.filename, &result.output)?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `fileconvert` binary (clap + anyhow + tracing-subscriber) |
//!
//! ## Known Limitations
//!
//! * Uploads are buffered whole and, unless `max_upload_bytes` is set, have
//!   no size cap.
//! * Conversions have no timeout; a pathological input occupies a blocking
//!   thread until the library gives up.
//! * `docx->pdf` renders one unwrapped line per paragraph on a single page.

// ── Modules ──────────────────────────────────────────────────────────────

pub mod config;
pub mod conversion;
pub mod convert;
pub mod error;
pub mod registry;
pub mod routes;
pub mod server;
pub mod transform;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use config::{ErrorStatusPolicy, ServerConfig, ServerConfigBuilder};
pub use conversion::{ConversionId, ConversionRequest, ConversionResult, OutputFormat};
pub use convert::{convert, convert_file, convert_sync};
pub use error::{ConvertError, RegistryError, ServerError, TransformError, TransformErrorKind};
pub use registry::{RegistryBuilder, TransformRegistry};
pub use routes::{Route, RouteTable};
pub use server::{app, build_router, serve, ServerState};
pub use transform::TransformFn;
