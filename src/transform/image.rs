//! Image recoding: decode anything the `image` crate recognises, re-encode
//! as JPEG or PNG.
//!
//! JPEG has no alpha channel and the encoder only accepts 8-bit luma or RGB,
//! so anything else is flattened to RGB first. The alpha channel is
//! dropped, not blended. PNG keeps whatever the source had.

use crate::conversion::ConversionId;
use crate::error::TransformError;
use image::{ColorType, DynamicImage, ImageFormat};
use std::io::Cursor;
use tracing::debug;

/// `image->jpeg`
pub fn to_jpeg(input: &[u8]) -> Result<Vec<u8>, TransformError> {
    recode(input, ConversionId::ImageToJpeg, ImageFormat::Jpeg)
}

/// `image->png`
pub fn to_png(input: &[u8]) -> Result<Vec<u8>, TransformError> {
    recode(input, ConversionId::ImageToPng, ImageFormat::Png)
}

fn recode(
    input: &[u8],
    conversion: ConversionId,
    target: ImageFormat,
) -> Result<Vec<u8>, TransformError> {
    let img = image::load_from_memory(input).map_err(|e| {
        TransformError::decode(conversion, format!("cannot identify image file: {e}"))
    })?;
    debug!(
        "Decoded {}x{} image ({:?})",
        img.width(),
        img.height(),
        img.color()
    );

    let img = match target {
        ImageFormat::Jpeg => flatten_for_jpeg(img),
        _ => img,
    };

    let mut buf = Vec::new();
    img.write_to(&mut Cursor::new(&mut buf), target)
        .map_err(|e| TransformError::encode(conversion, format!("cannot write {target:?}: {e}")))?;
    Ok(buf)
}

fn flatten_for_jpeg(img: DynamicImage) -> DynamicImage {
    match img.color() {
        ColorType::L8 | ColorType::Rgb8 => img,
        _ => DynamicImage::ImageRgb8(img.to_rgb8()),
    }
}
