use std::io::Cursor;

use image::{GenericImageView, ImageFormat};

use crate::error::PipelineError;
use crate::fetcher::types::FetchedImage;

/// What a successful decode tells us about the bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageInfo {
    pub content_type: String,
    pub width: u32,
    pub height: u32,
}

/// Fully decode `bytes` to make sure they are a raster image we can hand off.
///
/// The content type comes from the sniffed format; the server's header is
/// only used when the format has no registered mime type.
pub fn inspect(bytes: &[u8], declared_type: Option<&str>) -> Result<ImageInfo, image::ImageError> {
    let format = image::guess_format(bytes)?;
    let decoded = image::load_from_memory_with_format(bytes, format)?;
    let (width, height) = decoded.dimensions();

    let sniffed = format.to_mime_type();
    let content_type = if sniffed == "application/octet-stream" {
        declared_type.unwrap_or(sniffed).to_string()
    } else {
        sniffed.to_string()
    };

    Ok(ImageInfo {
        content_type,
        width,
        height,
    })
}

impl FetchedImage {
    /// Re-encode as PNG for destinations that only take raw pixel data.
    pub fn to_png(&self) -> Result<Vec<u8>, PipelineError> {
        let decoded = image::load_from_memory(&self.bytes).map_err(|e| {
            PipelineError::DecodeFailed {
                url: self.url_final.to_string(),
                reason: e.to_string(),
            }
        })?;

        let mut out = Cursor::new(Vec::new());
        decoded
            .write_to(&mut out, ImageFormat::Png)
            .map_err(|e| PipelineError::DecodeFailed {
                url: self.url_final.to_string(),
                reason: e.to_string(),
            })?;
        Ok(out.into_inner())
    }
}

#[cfg(test)]
pub(crate) fn sample_png(width: u32, height: u32) -> Vec<u8> {
    let img = image::RgbaImage::from_pixel(width, height, image::Rgba([200, 30, 30, 255]));
    let mut out = Cursor::new(Vec::new());
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut out, ImageFormat::Png)
        .unwrap();
    out.into_inner()
}
