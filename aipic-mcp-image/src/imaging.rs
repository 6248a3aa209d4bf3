//! Image resize/re-encode codec adapter.
//!
//! The only module that decodes pixels. Given raw image bytes and target
//! dimensions it produces a JPEG with "cover" semantics: scale to fill the
//! target box, center-cropping whatever overflows.

use image::codecs::jpeg::JpegEncoder;
use image::imageops::FilterType;
use image::ImageError;

/// JPEG output quality for re-encoded images.
pub const JPEG_QUALITY: u8 = 90;

/// Resize raw image bytes to exactly `width` x `height` and re-encode as JPEG.
///
/// Uses `resize_to_fill` (cover crop) so the output always has the requested
/// dimensions regardless of the source aspect ratio. The source format is
/// auto-detected from the bytes.
///
/// # Errors
/// Returns `ImageError` if the bytes cannot be decoded or the JPEG encoding
/// fails.
pub fn resize_to_cover(bytes: &[u8], width: u32, height: u32) -> Result<Vec<u8>, ImageError> {
    let source = image::load_from_memory(bytes)?;
    // JPEG has no alpha channel; flatten before encoding.
    let resized = source.resize_to_fill(width, height, FilterType::Lanczos3).to_rgb8();

    let mut out = Vec::new();
    let encoder = JpegEncoder::new_with_quality(&mut out, JPEG_QUALITY);
    resized.write_with_encoder(encoder)?;
    Ok(out)
}
