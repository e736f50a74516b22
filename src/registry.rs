//! Transform registry: conversion id → transform function.
//!
//! Built once at startup through [`RegistryBuilder`] and immutable after
//! that. Lookups are plain map reads, so a single registry behind an `Arc`
//! serves every request without locking.

use crate::conversion::ConversionId;
use crate::error::RegistryError;
use crate::routes::RouteTable;
use crate::transform::{document, image, markdown, spreadsheet, TransformFn};
use std::collections::HashMap;
use std::fmt;

pub struct TransformRegistry {
    transforms: HashMap<ConversionId, TransformFn>,
}

impl TransformRegistry {
    pub fn builder() -> RegistryBuilder {
        RegistryBuilder::default()
    }

    /// Registry with every built-in transform.
    pub fn builtin() -> Self {
        let transforms = HashMap::from([
            (ConversionId::ImageToJpeg, image::to_jpeg as TransformFn),
            (ConversionId::ImageToPng, image::to_png as TransformFn),
            (ConversionId::DocxToPdf, document::docx_to_pdf as TransformFn),
            (ConversionId::MarkdownToDocx, markdown::markdown_to_docx as TransformFn),
            (ConversionId::SpreadsheetToCsv, spreadsheet::spreadsheet_to_csv as TransformFn),
            (ConversionId::CsvToSpreadsheet, spreadsheet::csv_to_spreadsheet as TransformFn),
        ]);
        Self { transforms }
    }

    pub fn lookup(&self, id: ConversionId) -> Result<TransformFn, RegistryError> {
        self.transforms
            .get(&id)
            .copied()
            .ok_or(RegistryError::NotFound(id))
    }

    pub fn contains(&self, id: ConversionId) -> bool {
        self.transforms.contains_key(&id)
    }

    /// Check that every route resolves to a registered transform.
    pub fn validate_routes(&self, routes: &RouteTable) -> Result<(), RegistryError> {
        match routes.iter().find(|r| !self.contains(r.conversion)) {
            Some(route) => Err(RegistryError::UnresolvedRoute {
                path: route.path,
                conversion: route.conversion,
            }),
            None => Ok(()),
        }
    }

    /// Registered ids in a stable order.
    pub fn ids(&self) -> Vec<ConversionId> {
        let mut ids: Vec<_> = self.transforms.keys().copied().collect();
        ids.sort();
        ids
    }
}

impl Default for TransformRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

impl fmt::Debug for TransformRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TransformRegistry")
            .field("conversions", &self.ids())
            .finish()
    }
}

#[derive(Default)]
pub struct RegistryBuilder {
    transforms: HashMap<ConversionId, TransformFn>,
}

impl RegistryBuilder {
    pub fn register(mut self, id: ConversionId, transform: TransformFn) -> Result<Self, RegistryError> {
        if self.transforms.insert(id, transform).is_some() {
            return Err(RegistryError::DuplicateTransform(id));
        }
        Ok(self)
    }

    pub fn build(self) -> TransformRegistry {
        TransformRegistry {
            transforms: self.transforms,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TransformError;
    use crate::routes::{Route, UPLOAD_FIELD};

    fn echo(input: &[u8]) -> Result<Vec<u8>, TransformError> {
        Ok(input.to_vec())
    }

    #[test]
    fn builtin_covers_every_conversion() {
        let registry = TransformRegistry::builtin();
        assert_eq!(registry.ids(), ConversionId::ALL.to_vec());
    }

    #[test]
    fn builtin_routes_validate() {
        TransformRegistry::builtin()
            .validate_routes(&RouteTable::builtin())
            .expect("every built-in route resolves");
    }

    #[test]
    fn lookup_missing_is_not_found() {
        let registry = TransformRegistry::builder().build();
        assert_eq!(
            registry.lookup(ConversionId::DocxToPdf).err(),
            Some(RegistryError::NotFound(ConversionId::DocxToPdf))
        );
    }

    #[test]
    fn duplicate_registration_is_rejected() {
        let err = TransformRegistry::builder()
            .register(ConversionId::ImageToPng, echo)
            .unwrap()
            .register(ConversionId::ImageToPng, echo)
            .err();
        assert_eq!(err, Some(RegistryError::DuplicateTransform(ConversionId::ImageToPng)));
    }

    #[test]
    fn registered_transform_is_callable() {
        let registry = TransformRegistry::builder()
            .register(ConversionId::CsvToSpreadsheet, echo)
            .unwrap()
            .build();
        let f = registry.lookup(ConversionId::CsvToSpreadsheet).unwrap();
        assert_eq!(f(b"abc").unwrap(), b"abc");
    }

    #[test]
    fn unregistered_route_fails_validation() {
        static ROUTES: [Route; 1] = [Route {
            path: "/convert-to-pdf/",
            conversion: ConversionId::DocxToPdf,
            field: UPLOAD_FIELD,
        }];
        let registry = TransformRegistry::builder()
            .register(ConversionId::ImageToJpeg, echo)
            .unwrap()
            .build();
        let err = registry.validate_routes(&RouteTable::new(&ROUTES)).unwrap_err();
        assert_eq!(
            err,
            RegistryError::UnresolvedRoute {
                path: "/convert-to-pdf/",
                conversion: ConversionId::DocxToPdf,
            }
        );
    }
}
