//! Thumbnail generation for image uploads
//!
//! Decodes the uploaded image, resizes it to fit within a fixed bounding box
//! while keeping the aspect ratio, and encodes it as JPEG.

use anyhow::{Context, Result};
use image::{DynamicImage, ImageOutputFormat};
use std::io::Cursor;

/// Maximum thumbnail edge in pixels
const MAX_DIMENSION: u32 = 300;

/// JPEG quality (0-100)
const JPEG_QUALITY: u8 = 80;

/// Generate a JPEG thumbnail from raw image bytes.
pub fn generate(data: &[u8]) -> Result<Vec<u8>> {
    let img = image::load_from_memory(data).context("failed to decode image")?;
    let resized = img.thumbnail(MAX_DIMENSION, MAX_DIMENSION);

    // JPEG has no alpha channel, so flatten to RGB before encoding
    let mut out = Cursor::new(Vec::new());
    DynamicImage::ImageRgb8(resized.to_rgb8())
        .write_to(&mut out, ImageOutputFormat::Jpeg(JPEG_QUALITY))
        .context("failed to encode thumbnail")?;

    Ok(out.into_inner())
}
