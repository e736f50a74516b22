//! The static route table: one POST endpoint per conversion.

use crate::conversion::ConversionId;

/// Multipart field every route reads its upload from.
pub const UPLOAD_FIELD: &str = "file";

/// A fixed HTTP endpoint bound to one conversion. Response metadata comes
/// from the conversion's [`OutputFormat`](crate::conversion::OutputFormat).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Route {
    pub path: &'static str,
    pub conversion: ConversionId,
    pub field: &'static str,
}

impl Route {
    pub fn content_type(&self) -> &'static str {
        self.conversion.output_format().content_type()
    }

    pub fn filename(&self) -> &'static str {
        self.conversion.output_format().filename()
    }

    /// Value of the `Content-Disposition` response header.
    pub fn content_disposition(&self) -> String {
        format!("attachment; filename={}", self.filename())
    }
}

static ROUTES: [Route; 6] = [
    Route {
        path: "/convert-to-jpg/",
        conversion: ConversionId::ImageToJpeg,
        field: UPLOAD_FIELD,
    },
    Route {
        path: "/convert-to-png/",
        conversion: ConversionId::ImageToPng,
        field: UPLOAD_FIELD,
    },
    Route {
        path: "/convert-to-pdf/",
        conversion: ConversionId::DocxToPdf,
        field: UPLOAD_FIELD,
    },
    Route {
        path: "/convert-to-docx/",
        conversion: ConversionId::MarkdownToDocx,
        field: UPLOAD_FIELD,
    },
    Route {
        path: "/convert-to-csv/",
        conversion: ConversionId::SpreadsheetToCsv,
        field: UPLOAD_FIELD,
    },
    Route {
        path: "/convert-to-xls/",
        conversion: ConversionId::CsvToSpreadsheet,
        field: UPLOAD_FIELD,
    },
];

/// Read-only view over a `'static` list of routes.
#[derive(Debug, Clone, Copy)]
pub struct RouteTable {
    routes: &'static [Route],
}

impl RouteTable {
    /// The six conversion endpoints served by default.
    pub fn builtin() -> Self {
        Self { routes: &ROUTES }
    }

    pub fn new(routes: &'static [Route]) -> Self {
        Self { routes }
    }

    pub fn iter(&self) -> impl Iterator<Item = &'static Route> {
        self.routes.iter()
    }
}

impl Default for RouteTable {
    fn default() -> Self {
        Self::builtin()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::conversion::ConversionResult;
    use std::collections::HashSet;

    #[test]
    fn builtin_table_matches_endpoint_list() {
        let table: Vec<_> = RouteTable::builtin()
            .iter()
            .map(|r| (r.path, r.content_type(), r.filename()))
            .collect();
        assert_eq!(
            table,
            vec![
                ("/convert-to-jpg/", "image/jpeg", "converted.jpg"),
                ("/convert-to-png/", "image/png", "converted.png"),
                ("/convert-to-pdf/", "application/pdf", "converted.pdf"),
                (
                    "/convert-to-docx/",
                    "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
                    "converted.docx"
                ),
                ("/convert-to-csv/", "text/csv", "converted.csv"),
                (
                    "/convert-to-xls/",
                    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
                    "converted.xlsx"
                ),
            ]
        );
    }

    #[test]
    fn route_metadata_matches_conversion_result() {
        for route in RouteTable::builtin().iter() {
            let result = ConversionResult::new(route.conversion, Vec::new());
            assert_eq!(route.content_type(), result.content_type, "{}", route.path);
            assert_eq!(route.filename(), result.filename, "{}", route.path);
            assert_eq!(route.field, UPLOAD_FIELD);
        }
    }

    #[test]
    fn paths_and_conversions_are_unique() {
        let routes: Vec<_> = RouteTable::builtin().iter().collect();
        let paths: HashSet<_> = routes.iter().map(|r| r.path).collect();
        let ids: HashSet<_> = routes.iter().map(|r| r.conversion).collect();
        assert_eq!(paths.len(), routes.len());
        assert_eq!(ids.len(), routes.len());
    }

    #[test]
    fn content_disposition_names_the_download() {
        let route = RouteTable::builtin()
            .iter()
            .find(|r| r.conversion == ConversionId::CsvToSpreadsheet)
            .unwrap();
        assert_eq!(route.content_disposition(), "attachment; filename=converted.xlsx");
    }
}
