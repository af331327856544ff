//! Web server module for pdfconv
//!
//! Exposes the conversion endpoints over HTTP.
//!
//! # Endpoints
//!
//! - `GET /hello` - greeting
//! - `GET /health` - status and external tool availability
//! - `POST /convert` - multipart `file` (PDF) → DOCX attachment
//! - `POST /convert_pdf_to_image` - multipart `file` (PDF) and optional
//!   `format` (`png`/`jpeg`) → first page as an image attachment
//!
//! # Usage
//!
//! ```bash
//! pdfconv serve --port 8080
//! ```

mod cors;
mod error;
mod routes;
mod server;
mod shutdown;
mod upload;

pub use cors::CorsConfig;
pub use error::{ApiError, ErrorResponse, ValidationError};
pub use routes::{api_routes, content_disposition, AppState, HealthResponse, ToolCommands, ToolStatus};
pub use server::{build_router, ServerConfig, WebServer};
pub use shutdown::wait_for_shutdown_signal;
pub use upload::{parse_format, validate_upload, ConvertForm, Upload, FILE_FIELD, FORMAT_FIELD};

/// Default server port
pub const DEFAULT_PORT: u16 = 8080;

/// Default bind address
pub const DEFAULT_BIND: &str = "127.0.0.1";
