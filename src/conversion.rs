//! Conversion identifiers and the request/result values that flow through
//! the dispatch layer.

use bytes::Bytes;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Identifies one source→target transform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ConversionId {
    /// Any decodable image → JPEG.
    #[serde(rename = "image->jpeg")]
    ImageToJpeg,
    /// Any decodable image → PNG.
    #[serde(rename = "image->png")]
    ImageToPng,
    /// `.docx` paragraphs → single-page text PDF.
    #[serde(rename = "docx->pdf")]
    DocxToPdf,
    /// UTF-8 Markdown → `.docx`.
    #[serde(rename = "markdown->docx")]
    MarkdownToDocx,
    /// First sheet of a workbook → CSV.
    #[serde(rename = "spreadsheet->csv")]
    SpreadsheetToCsv,
    /// CSV with a header row → single-sheet `.xlsx`.
    #[serde(rename = "csv->spreadsheet")]
    CsvToSpreadsheet,
}

impl ConversionId {
    pub const ALL: [ConversionId; 6] = [
        ConversionId::ImageToJpeg,
        ConversionId::ImageToPng,
        ConversionId::DocxToPdf,
        ConversionId::MarkdownToDocx,
        ConversionId::SpreadsheetToCsv,
        ConversionId::CsvToSpreadsheet,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ConversionId::ImageToJpeg => "image->jpeg",
            ConversionId::ImageToPng => "image->png",
            ConversionId::DocxToPdf => "docx->pdf",
            ConversionId::MarkdownToDocx => "markdown->docx",
            ConversionId::SpreadsheetToCsv => "spreadsheet->csv",
            ConversionId::CsvToSpreadsheet => "csv->spreadsheet",
        }
    }

    /// The format this conversion produces.
    pub fn output_format(self) -> OutputFormat {
        match self {
            ConversionId::ImageToJpeg => OutputFormat::Jpeg,
            ConversionId::ImageToPng => OutputFormat::Png,
            ConversionId::DocxToPdf => OutputFormat::Pdf,
            ConversionId::MarkdownToDocx => OutputFormat::Docx,
            ConversionId::SpreadsheetToCsv => OutputFormat::Csv,
            ConversionId::CsvToSpreadsheet => OutputFormat::Xlsx,
        }
    }
}

impl fmt::Display for ConversionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ConversionId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ConversionId::ALL
            .into_iter()
            .find(|id| id.as_str() == s)
            .ok_or_else(|| format!("unknown conversion id '{s}'"))
    }
}

/// A target file format with its MIME type and download name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    Jpeg,
    Png,
    Pdf,
    Docx,
    Csv,
    Xlsx,
}

impl OutputFormat {
    pub fn content_type(self) -> &'static str {
        match self {
            OutputFormat::Jpeg => "image/jpeg",
            OutputFormat::Png => "image/png",
            OutputFormat::Pdf => "application/pdf",
            OutputFormat::Docx => {
                "application/vnd.openxmlformats-officedocument.wordprocessingml.document"
            }
            OutputFormat::Csv => "text/csv",
            OutputFormat::Xlsx => {
                "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"
            }
        }
    }

    /// Suggested download name, e.g. `converted.jpg`.
    pub fn filename(self) -> &'static str {
        match self {
            OutputFormat::Jpeg => "converted.jpg",
            OutputFormat::Png => "converted.png",
            OutputFormat::Pdf => "converted.pdf",
            OutputFormat::Docx => "converted.docx",
            OutputFormat::Csv => "converted.csv",
            OutputFormat::Xlsx => "converted.xlsx",
        }
    }
}

/// One uploaded payload and the conversion it asks for.
#[derive(Debug, Clone)]
pub struct ConversionRequest {
    pub payload: Bytes,
    pub conversion: ConversionId,
}

impl ConversionRequest {
    pub fn new(conversion: ConversionId, payload: impl Into<Bytes>) -> Self {
        Self {
            payload: payload.into(),
            conversion,
        }
    }
}

/// Converted bytes plus the framing metadata needed to send them back.
#[derive(Debug, Clone)]
pub struct ConversionResult {
    pub output: Vec<u8>,
    pub content_type: &'static str,
    pub filename: &'static str,
}

impl ConversionResult {
    pub fn new(conversion: ConversionId, output: Vec<u8>) -> Self {
        let format = conversion.output_format();
        Self {
            output,
            content_type: format.content_type(),
            filename: format.filename(),
        }
    }
}
