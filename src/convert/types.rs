//! Common types for the convert module

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;

/// MIME type of a Word document
pub const DOCX_MIME: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document";

/// Conversion error types
#[derive(Debug, Error)]
pub enum ConvertError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Required tool not found: {0}")]
    ToolNotFound(String),

    #[error("{tool} failed: {detail}")]
    ToolFailed { tool: String, detail: String },

    #[error("Conversion timed out after {}s", .0.as_secs())]
    Timeout(Duration),

    #[error("No pages found in PDF")]
    NoPages,

    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("Conversion task failed: {0}")]
    TaskFailed(String),
}

pub type Result<T> = std::result::Result<T, ConvertError>;

/// Raster output format
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ImageFormat {
    #[default]
    Png,
    Jpeg,
}

impl ImageFormat {
    /// MIME type sent with the response
    pub fn mime_type(&self) -> &'static str {
        match self {
            ImageFormat::Png => "image/png",
            ImageFormat::Jpeg => "image/jpeg",
        }
    }

    /// File extension for the download name
    pub fn extension(&self) -> &'static str {
        match self {
            ImageFormat::Png => "png",
            ImageFormat::Jpeg => "jpg",
        }
    }
}

/// Returned when a format name is neither `png` nor `jpeg`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownFormat(pub String);

impl FromStr for ImageFormat {
    type Err = UnknownFormat;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "png" => Ok(ImageFormat::Png),
            "jpeg" => Ok(ImageFormat::Jpeg),
            _ => Err(UnknownFormat(s.to_string())),
        }
    }
}

impl fmt::Display for ImageFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ImageFormat::Png => write!(f, "png"),
            ImageFormat::Jpeg => write!(f, "jpeg"),
        }
    }
}

/// A converted file ready to be sent back to the client
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversionResult {
    /// Location of the output inside the request's temp directory
    pub output_path: PathBuf,
    /// Content-Type of the output
    pub mime_type: &'static str,
    /// Name suggested in Content-Disposition
    pub download_name: String,
}

/// Replace the final extension of `filename` with `extension`.
///
/// A name without a dot keeps its full text as the base.
pub fn derive_output_name(filename: &str, extension: &str) -> String {
    let base = match filename.rsplit_once('.') {
        Some((base, _)) => base,
        None => filename,
    };
    format!("{}.{}", base, extension)
}
