//! Conversion orchestration
//!
//! Saves an upload into a request-scoped temp directory, drives one of the
//! external collaborators, and reads the produced file back. The temp
//! directory is removed when it goes out of scope, on success and failure
//! alike.
//!
//! # Collaborators
//!
//! - [`DocumentConverter`]: PDF → DOCX (default: `pdf2docx` CLI)
//! - [`PageRasterizer`]: PDF → page images (default: Poppler `pdftoppm`)

mod docx;
mod encode;
mod process;
mod raster;
mod types;

pub use docx::{DocumentConverter, Pdf2DocxConverter};
pub use encode::{write_image, DEFAULT_JPEG_QUALITY};
pub use process::{resolve_tool, run_tool};
pub use raster::{PageRasterizer, PopplerRasterizer, RENDER_DPI};
pub use types::{
    derive_output_name, ConversionResult, ConvertError, ImageFormat, Result, UnknownFormat,
    DOCX_MIME,
};

use std::path::{Path, PathBuf};
use std::sync::Arc;
use tempfile::TempDir;
use tracing::{debug, info};

/// File extension of converted documents
pub const DOCX_EXTENSION: &str = "docx";

/// Tunables for a [`ConversionService`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversionSettings {
    /// Rasterization resolution
    pub dpi: u32,
    /// JPEG encoder quality (1-100)
    pub jpeg_quality: u8,
    /// Parent for request temp directories (None = system temp dir)
    pub temp_root: Option<PathBuf>,
}

impl Default for ConversionSettings {
    fn default() -> Self {
        Self {
            dpi: RENDER_DPI,
            jpeg_quality: DEFAULT_JPEG_QUALITY,
            temp_root: None,
        }
    }
}

/// A converted file loaded into memory, ready for the response
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Download {
    pub data: Vec<u8>,
    pub filename: String,
    pub mime_type: &'static str,
}

/// Runs conversions against a pair of collaborators
#[derive(Clone)]
pub struct ConversionService {
    document: Arc<dyn DocumentConverter>,
    rasterizer: Arc<dyn PageRasterizer>,
    settings: ConversionSettings,
}

impl ConversionService {
    pub fn new(
        document: Arc<dyn DocumentConverter>,
        rasterizer: Arc<dyn PageRasterizer>,
        settings: ConversionSettings,
    ) -> Self {
        Self {
            document,
            rasterizer,
            settings,
        }
    }

    pub fn settings(&self) -> &ConversionSettings {
        &self.settings
    }

    /// Convert an uploaded PDF to DOCX and return the document bytes.
    ///
    /// Blocking: call from `spawn_blocking`.
    pub fn pdf_to_docx(&self, filename: &str, data: &[u8]) -> Result<Download> {
        let workdir = self.scoped_dir()?;
        let result = self.docx_in(workdir.path(), filename, data)?;
        read_result(&result)
    }

    /// Render the first page of an uploaded PDF as `format` and return it.
    ///
    /// All pages are rasterized but only page one is exported. Returns
    /// [`ConvertError::NoPages`] when the document has nothing to render.
    /// Blocking: call from `spawn_blocking`.
    pub fn pdf_to_image(&self, filename: &str, data: &[u8], format: ImageFormat) -> Result<Download> {
        let workdir = self.scoped_dir()?;
        let result = self.image_in(workdir.path(), filename, data, format)?;
        read_result(&result)
    }

    fn docx_in(&self, workdir: &Path, filename: &str, data: &[u8]) -> Result<ConversionResult> {
        let pdf_path = save_upload(workdir, filename, data)?;
        let download_name = derive_output_name(&local_name(filename), DOCX_EXTENSION);
        let docx_path = workdir.join(&download_name);

        self.document.convert(&pdf_path, &docx_path, 0, None)?;

        Ok(ConversionResult {
            output_path: docx_path,
            mime_type: DOCX_MIME,
            download_name,
        })
    }

    fn image_in(
        &self,
        workdir: &Path,
        filename: &str,
        data: &[u8],
        format: ImageFormat,
    ) -> Result<ConversionResult> {
        let pdf_path = save_upload(workdir, filename, data)?;
        let pages = self.rasterizer.rasterize(&pdf_path, self.settings.dpi)?;

        // Only the first page is exported; the rest are discarded
        let first = pages.first().ok_or(ConvertError::NoPages)?;
        if pages.len() > 1 {
            debug!("Discarding {} page(s) after the first", pages.len() - 1);
        }

        let download_name = derive_output_name(&local_name(filename), format.extension());
        let image_path = workdir.join(&download_name);
        write_image(first, format, self.settings.jpeg_quality, &image_path)?;
        info!("Exported page 1 as {}: {}", format, image_path.display());

        Ok(ConversionResult {
            output_path: image_path,
            mime_type: format.mime_type(),
            download_name,
        })
    }

    fn scoped_dir(&self) -> Result<TempDir> {
        let mut builder = tempfile::Builder::new();
        builder.prefix("pdfconv-");
        let dir = match &self.settings.temp_root {
            Some(root) => builder.tempdir_in(root)?,
            None => builder.tempdir()?,
        };
        Ok(dir)
    }
}

/// Run a blocking conversion on the blocking thread pool
pub async fn run_blocking<F, T>(f: F) -> Result<T>
where
    F: FnOnce() -> Result<T> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| ConvertError::TaskFailed(e.to_string()))?
}

/// Last path component of a client-supplied name, so uploads can't escape
/// the temp directory.
fn local_name(filename: &str) -> String {
    Path::new(filename)
        .file_name()
        .and_then(|n| n.to_str())
        .filter(|n| !n.is_empty())
        .unwrap_or("upload.pdf")
        .to_string()
}

fn save_upload(workdir: &Path, filename: &str, data: &[u8]) -> Result<PathBuf> {
    let path = workdir.join(local_name(filename));
    std::fs::write(&path, data)?;
    info!("Saved PDF to: {}", path.display());
    Ok(path)
}

fn read_result(result: &ConversionResult) -> Result<Download> {
    let data = std::fs::read(&result.output_path)?;
    Ok(Download {
        data,
        filename: result.download_name.clone(),
        mime_type: result.mime_type,
    })
}
