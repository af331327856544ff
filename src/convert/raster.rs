//! PDF rasterization: render every page of a PDF to a `DynamicImage`

use image::DynamicImage;
use std::path::{Path, PathBuf};
use std::process::Command;
use std::time::Duration;
use tracing::{debug, info};

use super::process::{resolve_tool, run_tool};
use super::types::{ConvertError, Result};

/// Resolution used for image export
pub const RENDER_DPI: u32 = 200;

/// Renders PDF pages to images
pub trait PageRasterizer: Send + Sync {
    /// Render all pages of `src` at `dpi`, in page order.
    ///
    /// A document with no renderable pages yields an empty vector.
    fn rasterize(&self, src: &Path, dpi: u32) -> Result<Vec<DynamicImage>>;
}

/// [`PageRasterizer`] backed by Poppler's `pdfinfo` and `pdftoppm`
#[derive(Debug, Clone)]
pub struct PopplerRasterizer {
    command: String,
    info_command: String,
    timeout: Duration,
}

impl PopplerRasterizer {
    /// Default executable name
    pub const DEFAULT_COMMAND: &'static str = "pdftoppm";
    /// Default page-count executable name
    pub const DEFAULT_INFO_COMMAND: &'static str = "pdfinfo";

    const PAGE_PREFIX: &'static str = "page";

    pub fn new(command: impl Into<String>, timeout: Duration) -> Self {
        Self {
            command: command.into(),
            info_command: Self::DEFAULT_INFO_COMMAND.to_string(),
            timeout,
        }
    }

    /// Use a different executable for reading the page count
    pub fn with_info_command(mut self, command: impl Into<String>) -> Self {
        self.info_command = command.into();
        self
    }

    /// Number of pages in `src`, as reported by `pdfinfo`
    fn page_count(&self, src: &Path) -> Result<u32> {
        let exe = resolve_tool(&self.info_command)?;
        let mut cmd = Command::new(exe);
        cmd.arg(src);
        let output = run_tool(&self.info_command, cmd, self.timeout)?;

        parse_page_count(&String::from_utf8_lossy(&output.stdout)).ok_or_else(|| {
            ConvertError::ToolFailed {
                tool: self.info_command.clone(),
                detail: "no page count in output".to_string(),
            }
        })
    }
}

impl Default for PopplerRasterizer {
    fn default() -> Self {
        Self::new(Self::DEFAULT_COMMAND, Duration::from_secs(crate::DEFAULT_TIMEOUT_SECS))
    }
}

impl PageRasterizer for PopplerRasterizer {
    fn rasterize(&self, src: &Path, dpi: u32) -> Result<Vec<DynamicImage>> {
        let exe = resolve_tool(&self.command)?;

        // pdftoppm rejects an empty page range, so check the count first
        let count = self.page_count(src)?;
        if count == 0 {
            info!("PDF has no pages: {}", src.display());
            return Ok(Vec::new());
        }

        // Page files live next to the source so they share its cleanup
        let parent = src.parent().unwrap_or_else(|| Path::new("."));
        let pages_dir = tempfile::tempdir_in(parent)?;
        let prefix = pages_dir.path().join(Self::PAGE_PREFIX);

        let mut cmd = Command::new(exe);
        cmd.arg("-r")
            .arg(dpi.to_string())
            .arg("-png")
            .arg(src)
            .arg(&prefix);
        run_tool(&self.command, cmd, self.timeout)?;

        let page_files = collect_page_files(pages_dir.path(), Self::PAGE_PREFIX)?;
        info!("Rasterized {} page(s) at {} DPI", page_files.len(), dpi);

        let mut images = Vec::with_capacity(page_files.len());
        for (page, path) in page_files {
            let img = image::open(&path)?;
            debug!("page {} → {}x{} px", page, img.width(), img.height());
            images.push(img);
        }
        Ok(images)
    }
}

/// Read the `Pages:` line of `pdfinfo` output
fn parse_page_count(info: &str) -> Option<u32> {
    info.lines()
        .find_map(|line| line.strip_prefix("Pages:"))
        .and_then(|count| count.trim().parse().ok())
}

/// List `<prefix>-<n>.png` files in `dir`, sorted by page number.
///
/// `pdftoppm` zero-pads the page number to the width of the page count,
/// so sorting by name alone is not reliable.
fn collect_page_files(dir: &Path, prefix: &str) -> Result<Vec<(u32, PathBuf)>> {
    let mut pages = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        if let Some(page) = page_number(&path, prefix) {
            pages.push((page, path));
        }
    }
    pages.sort_by_key(|(page, _)| *page);
    Ok(pages)
}

fn page_number(path: &Path, prefix: &str) -> Option<u32> {
    if path.extension()?.to_str()? != "png" {
        return None;
    }
    let stem = path.file_stem()?.to_str()?;
    stem.strip_prefix(prefix)?.strip_prefix('-')?.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage};

    #[cfg(unix)]
    fn write_script(path: &Path, body: &str) {
        use std::os::unix::fs::PermissionsExt;
        std::fs::write(path, format!("#!/bin/sh\n{}\n", body)).unwrap();
        std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o755)).unwrap();
    }

    #[test]
    fn test_parse_page_count() {
        let info = "Title:          Report\nPages:          12\nEncrypted:      no\n";
        assert_eq!(parse_page_count(info), Some(12));
        assert_eq!(parse_page_count("Pages: 0\n"), Some(0));
        assert_eq!(parse_page_count("Title: x\n"), None);
        assert_eq!(parse_page_count("Pages: many\n"), None);
    }

    #[test]
    fn test_page_number() {
        assert_eq!(page_number(Path::new("/x/page-1.png"), "page"), Some(1));
        assert_eq!(page_number(Path::new("/x/page-007.png"), "page"), Some(7));
        assert_eq!(page_number(Path::new("/x/page-1.ppm"), "page"), None);
        assert_eq!(page_number(Path::new("/x/other-1.png"), "page"), None);
        assert_eq!(page_number(Path::new("/x/page-a.png"), "page"), None);
    }

    #[test]
    fn test_collect_page_files_orders_numerically() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["page-10.png", "page-2.png", "page-1.png", "notes.txt"] {
            std::fs::write(dir.path().join(name), b"").unwrap();
        }

        let pages = collect_page_files(dir.path(), "page").unwrap();
        let numbers: Vec<u32> = pages.iter().map(|(n, _)| *n).collect();
        assert_eq!(numbers, vec![1, 2, 10]);
    }

    #[test]
    fn test_collect_page_files_empty_dir() {
        let dir = tempfile::tempdir().unwrap();
        assert!(collect_page_files(dir.path(), "page").unwrap().is_empty());
    }

    #[test]
    fn test_missing_tool_is_reported() {
        let rasterizer =
            PopplerRasterizer::new("pdftoppm-missing-for-test", Duration::from_secs(1));
        let err = rasterizer.rasterize(Path::new("a.pdf"), RENDER_DPI).unwrap_err();
        assert!(matches!(err, ConvertError::ToolNotFound(_)));
    }

    #[cfg(unix)]
    #[test]
    fn test_rasterize_loads_pages_in_order() {
        // Stand-in for pdftoppm: writes three pages of distinct widths
        let dir = tempfile::tempdir().unwrap();
        let fixtures = dir.path().join("fixtures");
        std::fs::create_dir(&fixtures).unwrap();
        for (page, width) in [(1, 10), (2, 20), (3, 30)] {
            RgbImage::from_pixel(width, 5, Rgb([0, 0, 0]))
                .save(fixtures.join(format!("page-{}.png", page)))
                .unwrap();
        }
        let script = dir.path().join("fake-pdftoppm");
        write_script(
            &script,
            &format!(
                "for f in {}/*.png; do cp \"$f\" \"$5-${{f##*-}}\"; done",
                fixtures.display()
            ),
        );
        let info = dir.path().join("fake-pdfinfo");
        write_script(&info, "echo 'Pages:          3'");

        let src = dir.path().join("doc.pdf");
        std::fs::write(&src, b"%PDF-1.4").unwrap();

        let rasterizer =
            PopplerRasterizer::new(script.display().to_string(), Duration::from_secs(5))
                .with_info_command(info.display().to_string());
        let pages = rasterizer.rasterize(&src, RENDER_DPI).unwrap();
        let widths: Vec<u32> = pages.iter().map(|p| p.width()).collect();
        assert_eq!(widths, vec![10, 20, 30]);
    }

    #[cfg(unix)]
    #[test]
    fn test_rasterize_zero_pages_skips_pdftoppm() {
        // pdftoppm fails on an empty page range, as Poppler does
        let dir = tempfile::tempdir().unwrap();
        let script = dir.path().join("fake-pdftoppm");
        write_script(
            &script,
            "echo 'Wrong page range given: the first page (1) can not be after the last page (0).' >&2; exit 99",
        );
        let info = dir.path().join("fake-pdfinfo");
        write_script(&info, "echo 'Pages:          0'");

        let src = dir.path().join("empty.pdf");
        std::fs::write(&src, b"%PDF-1.4").unwrap();

        let rasterizer =
            PopplerRasterizer::new(script.display().to_string(), Duration::from_secs(5))
                .with_info_command(info.display().to_string());
        assert!(rasterizer.rasterize(&src, RENDER_DPI).unwrap().is_empty());
    }

    #[cfg(unix)]
    #[test]
    fn test_rasterize_unreadable_page_count() {
        let dir = tempfile::tempdir().unwrap();
        let script = dir.path().join("fake-pdftoppm");
        write_script(&script, "exit 0");
        let info = dir.path().join("fake-pdfinfo");
        write_script(&info, "echo 'Title: nothing useful'");

        let src = dir.path().join("doc.pdf");
        std::fs::write(&src, b"%PDF-1.4").unwrap();

        let rasterizer =
            PopplerRasterizer::new(script.display().to_string(), Duration::from_secs(5))
                .with_info_command(info.display().to_string());
        let err = rasterizer.rasterize(&src, RENDER_DPI).unwrap_err();
        assert!(matches!(err, ConvertError::ToolFailed { .. }));
    }
}
