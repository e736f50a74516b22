//! Format-specific transforms.
//!
//! Each submodule wraps one external library. Every transform has the same
//! shape, [`TransformFn`]: bytes in, bytes out or a [`TransformError`].
//! Transforms build their library objects per call and touch no global
//! state, so the blocking pool can run any number of them at once.
//!
//! | Module | Conversion ids | Library |
//! |--------|----------------|---------|
//! | [`image`] | `image->jpeg`, `image->png` | `image` |
//! | [`document`] | `docx->pdf` | `docx-rs` + `lopdf` |
//! | [`markdown`] | `markdown->docx` | `pulldown-cmark` + `docx-rs` |
//! | [`spreadsheet`] | `spreadsheet->csv`, `csv->spreadsheet` | `calamine`, `csv`, `rust_xlsxwriter` |

use crate::error::TransformError;

pub mod document;
pub mod image;
pub mod markdown;
pub mod spreadsheet;

/// Signature shared by every transform.
pub type TransformFn = fn(&[u8]) -> Result<Vec<u8>, TransformError>;
