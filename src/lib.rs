//! pdfconv - PDF conversion over HTTP
//!
//! A small web service that turns uploaded PDFs into Word documents
//! (`POST /convert`) or a raster image of their first page
//! (`POST /convert_pdf_to_image`). The heavy lifting is delegated to
//! external tools behind the [`DocumentConverter`] and [`PageRasterizer`]
//! traits.
//!
//! # Example
//!
//! ```no_run
//! use pdfconv::{AppState, Config, ServerConfig, WebServer};
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
//! let config = Config::default();
//! let state = AppState::new(pdfconv::build_service(&config), config.tool_commands());
//! WebServer::with_config(ServerConfig::default(), state).run().await?;
//! # Ok(())
//! # }
//! ```

pub mod cli;
pub mod config;
pub mod convert;
pub mod logging;
pub mod web;

use std::sync::Arc;

pub use cli::{Cli, Commands, ServeArgs};
pub use config::{CliOverrides, Config, ConfigError};
pub use convert::{
    ConversionResult, ConversionService, ConversionSettings, ConvertError, DocumentConverter,
    Download, ImageFormat, PageRasterizer, Pdf2DocxConverter, PopplerRasterizer,
};
pub use web::{build_router, ApiError, AppState, CorsConfig, ServerConfig, ToolCommands, WebServer};

/// Default upload limit in megabytes
pub const DEFAULT_UPLOAD_LIMIT_MB: usize = 100;

/// Default limit for a single external tool run, in seconds
pub const DEFAULT_TIMEOUT_SECS: u64 = 300;

/// Exit codes for the CLI
pub mod exit_codes {
    pub const SUCCESS: i32 = 0;
    pub const GENERAL_ERROR: i32 = 1;
}

/// Build a [`ConversionService`] backed by the configured command-line tools
pub fn build_service(config: &Config) -> ConversionService {
    let timeout = config.conversion_timeout();
    ConversionService::new(
        Arc::new(Pdf2DocxConverter::new(&config.conversion.pdf2docx_cmd, timeout)),
        Arc::new(
            PopplerRasterizer::new(&config.conversion.pdftoppm_cmd, timeout)
                .with_info_command(&config.conversion.pdfinfo_cmd),
        ),
        config.conversion_settings(),
    )
}
