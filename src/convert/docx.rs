//! PDF → DOCX conversion
//!
//! The layout reconstruction itself is done by the `pdf2docx` command-line
//! tool; this module only drives it.

use std::path::Path;
use std::process::Command;
use std::time::Duration;
use tracing::info;

use super::process::{resolve_tool, run_tool};
use super::types::{ConvertError, Result};

/// Converts a PDF file into a Word document
pub trait DocumentConverter: Send + Sync {
    /// Convert pages `start..end` of `src` (0-based, `end = None` means up to
    /// the last page) and write the document to `dest`.
    fn convert(&self, src: &Path, dest: &Path, start: usize, end: Option<usize>) -> Result<()>;
}

/// [`DocumentConverter`] backed by the `pdf2docx` CLI
#[derive(Debug, Clone)]
pub struct Pdf2DocxConverter {
    command: String,
    timeout: Duration,
}

impl Pdf2DocxConverter {
    /// Default executable name
    pub const DEFAULT_COMMAND: &'static str = "pdf2docx";

    pub fn new(command: impl Into<String>, timeout: Duration) -> Self {
        Self {
            command: command.into(),
            timeout,
        }
    }

    /// Build the argument list for one conversion
    fn args(src: &Path, dest: &Path, start: usize, end: Option<usize>) -> Vec<String> {
        let mut args = vec![
            "convert".to_string(),
            src.display().to_string(),
            dest.display().to_string(),
            format!("--start={}", start),
        ];
        if let Some(end) = end {
            args.push(format!("--end={}", end));
        }
        args
    }
}

impl Default for Pdf2DocxConverter {
    fn default() -> Self {
        Self::new(Self::DEFAULT_COMMAND, Duration::from_secs(crate::DEFAULT_TIMEOUT_SECS))
    }
}

impl DocumentConverter for Pdf2DocxConverter {
    fn convert(&self, src: &Path, dest: &Path, start: usize, end: Option<usize>) -> Result<()> {
        let exe = resolve_tool(&self.command)?;
        let mut cmd = Command::new(exe);
        cmd.args(Self::args(src, dest, start, end));

        run_tool(&self.command, cmd, self.timeout)?;

        // pdf2docx reports some failures only in its log output
        if !dest.exists() {
            return Err(ConvertError::ToolFailed {
                tool: self.command.clone(),
                detail: format!("no output written to {}", dest.display()),
            });
        }

        info!("Converted to DOCX: {}", dest.display());
        Ok(())
    }
}
