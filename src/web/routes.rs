//! HTTP routes for the conversion service
//!
//! Provides the conversion endpoints plus greeting and health checks.

use axum::{
    extract::{multipart::MultipartRejection, Multipart, State},
    http::{header, StatusCode},
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use serde::Serialize;
use std::sync::Arc;
use tracing::info;

use super::error::ApiError;
use super::upload::ConvertForm;
use crate::convert::{run_blocking, ConversionService, Download};

/// Names of the external tools, reported by the health check
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolCommands {
    pub pdf2docx: String,
    pub pdftoppm: String,
    pub pdfinfo: String,
}

impl Default for ToolCommands {
    fn default() -> Self {
        Self {
            pdf2docx: "pdf2docx".to_string(),
            pdftoppm: "pdftoppm".to_string(),
            pdfinfo: "pdfinfo".to_string(),
        }
    }
}

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub converter: ConversionService,
    pub tools: ToolCommands,
    pub version: String,
}

impl AppState {
    pub fn new(converter: ConversionService, tools: ToolCommands) -> Self {
        Self {
            converter,
            tools,
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

/// Build the API router
pub fn api_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/hello", get(hello))
        .route("/health", get(health_check))
        .route("/convert", post(convert_pdf_to_docx))
        .route("/convert_pdf_to_image", post(convert_pdf_to_image))
}

async fn hello() -> &'static str {
    "Hello, world!"
}

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub tools: ToolStatus,
}

#[derive(Debug, Serialize)]
pub struct ToolStatus {
    pub pdf2docx: bool,
    pub pdftoppm: bool,
    pub pdfinfo: bool,
}

/// Health check endpoint
async fn health_check(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    let tools = ToolStatus {
        pdf2docx: which::which(&state.tools.pdf2docx).is_ok(),
        pdftoppm: which::which(&state.tools.pdftoppm).is_ok(),
        pdfinfo: which::which(&state.tools.pdfinfo).is_ok(),
    };

    Json(HealthResponse {
        status: "healthy".to_string(),
        version: state.version.clone(),
        tools,
    })
}

/// Convert an uploaded PDF to DOCX
async fn convert_pdf_to_docx(
    State(state): State<Arc<AppState>>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Download, ApiError> {
    let mut form = ConvertForm::read(multipart).await?;
    let upload = form.validated_file()?;

    let converter = state.converter.clone();
    let download =
        run_blocking(move || converter.pdf_to_docx(&upload.filename, &upload.data)).await?;

    info!("Converted to DOCX: {} ({} bytes)", download.filename, download.data.len());
    Ok(download)
}

/// Render the first page of an uploaded PDF as PNG or JPEG
async fn convert_pdf_to_image(
    State(state): State<Arc<AppState>>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Download, ApiError> {
    let mut form = ConvertForm::read(multipart).await?;
    let upload = form.validated_file()?;
    let format = form.image_format()?;

    let converter = state.converter.clone();
    let download = run_blocking(move || {
        converter.pdf_to_image(&upload.filename, &upload.data, format)
    })
    .await?;

    info!("Converted to {}: {} ({} bytes)", format, download.filename, download.data.len());
    Ok(download)
}

/// `Content-Disposition` value for a download name.
///
/// Characters that can't appear in a quoted header value are replaced.
pub fn content_disposition(filename: &str) -> String {
    let safe: String = filename
        .chars()
        .map(|c| match c {
            '"' | '\\' => '_',
            c if c.is_ascii_graphic() || c == ' ' => c,
            _ => '_',
        })
        .collect();
    format!("attachment; filename=\"{}\"", safe)
}

impl IntoResponse for Download {
    fn into_response(self) -> Response {
        (
            StatusCode::OK,
            [
                (header::CONTENT_TYPE, self.mime_type.to_string()),
                (header::CONTENT_DISPOSITION, content_disposition(&self.filename)),
            ],
            self.data,
        )
            .into_response()
    }
}
