//! Image encoding: `DynamicImage` → PNG/JPEG file

use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::PngEncoder;
use image::DynamicImage;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use tracing::debug;

use super::types::{ImageFormat, Result};

/// Default JPEG quality for exported pages
pub const DEFAULT_JPEG_QUALITY: u8 = 85;

/// Encode `img` as `format` and write it to `path`.
///
/// `jpeg_quality` only applies to JPEG; PNG uses the encoder defaults.
pub fn write_image(
    img: &DynamicImage,
    format: ImageFormat,
    jpeg_quality: u8,
    path: &Path,
) -> Result<()> {
    let mut writer = BufWriter::new(File::create(path)?);

    match format {
        ImageFormat::Png => {
            img.write_with_encoder(PngEncoder::new(&mut writer))?;
        }
        ImageFormat::Jpeg => {
            // JPEG has no alpha channel
            let rgb = DynamicImage::ImageRgb8(img.to_rgb8());
            rgb.write_with_encoder(JpegEncoder::new_with_quality(&mut writer, jpeg_quality))?;
        }
    }
    writer.flush()?;

    debug!("Encoded {} → {}", format, path.display());
    Ok(())
}
