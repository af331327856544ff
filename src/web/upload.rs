//! Multipart upload parsing and validation

use axum::body::Bytes;
use axum::extract::multipart::MultipartRejection;
use axum::extract::Multipart;
use tracing::debug;

use super::error::{ApiError, ValidationError};
use crate::convert::ImageFormat;

/// Multipart field carrying the PDF
pub const FILE_FIELD: &str = "file";

/// Multipart field selecting the image format
pub const FORMAT_FIELD: &str = "format";

/// The uploaded file of one request
#[derive(Debug, Clone)]
pub struct Upload {
    pub filename: String,
    pub data: Bytes,
}

/// Fields of a conversion request
#[derive(Debug, Default)]
pub struct ConvertForm {
    pub file: Option<Upload>,
    pub format: Option<String>,
}

impl ConvertForm {
    /// Read all fields of a multipart body.
    ///
    /// A request that isn't multipart at all is treated as carrying no
    /// file. A `file` part without a filename is not a file upload and is
    /// ignored.
    pub async fn read(
        multipart: Result<Multipart, MultipartRejection>,
    ) -> Result<Self, ApiError> {
        let mut form = ConvertForm::default();
        let mut multipart = match multipart {
            Ok(m) => m,
            Err(rejection) => {
                debug!("Not a multipart request: {}", rejection);
                return Ok(form);
            }
        };

        while let Some(field) = multipart.next_field().await? {
            let name = field.name().unwrap_or("").to_string();
            match name.as_str() {
                FILE_FIELD => {
                    // The first file part wins; later ones are ignored
                    if form.file.is_some() {
                        continue;
                    }
                    let Some(filename) = field.file_name().map(str::to_string) else {
                        continue;
                    };
                    let data = field.bytes().await?;
                    debug!("Received upload {:?} ({} bytes)", filename, data.len());
                    form.file = Some(Upload { filename, data });
                }
                FORMAT_FIELD => {
                    form.format = Some(field.text().await?);
                }
                _ => {}
            }
        }

        Ok(form)
    }

    /// The upload, if it passes the presence, filename, and extension checks
    pub fn validated_file(&mut self) -> Result<Upload, ValidationError> {
        validate_upload(self.file.take())
    }

    /// The requested image format (`png` when absent)
    pub fn image_format(&self) -> Result<ImageFormat, ValidationError> {
        parse_format(self.format.as_deref())
    }
}

/// Check that a PDF was uploaded
pub fn validate_upload(file: Option<Upload>) -> Result<Upload, ValidationError> {
    let upload = file.ok_or(ValidationError::NoFile)?;
    if upload.filename.is_empty() {
        return Err(ValidationError::EmptyFilename);
    }
    if !upload.filename.to_ascii_lowercase().ends_with(".pdf") {
        return Err(ValidationError::NotPdf);
    }
    Ok(upload)
}

/// Parse the optional `format` field
pub fn parse_format(raw: Option<&str>) -> Result<ImageFormat, ValidationError> {
    match raw {
        None => Ok(ImageFormat::default()),
        Some(value) => value
            .parse()
            .map_err(|_| ValidationError::InvalidFormat(value.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn upload(name: &str) -> Option<Upload> {
        Some(Upload {
            filename: name.to_string(),
            data: Bytes::from_static(b"%PDF-1.4"),
        })
    }

    #[test]
    fn test_validate_missing_file() {
        assert_eq!(validate_upload(None).unwrap_err(), ValidationError::NoFile);
    }

    #[test]
    fn test_validate_empty_filename() {
        assert_eq!(
            validate_upload(upload("")).unwrap_err(),
            ValidationError::EmptyFilename
        );
    }

    #[test]
    fn test_validate_extension() {
        for name in ["a.docx", "pdf", "a.pdf.txt", "a.pd"] {
            assert_eq!(
                validate_upload(upload(name)).unwrap_err(),
                ValidationError::NotPdf,
                "{} should be rejected",
                name
            );
        }
        for name in ["a.pdf", "B.PDF", "c.Pdf", ".pdf"] {
            assert!(validate_upload(upload(name)).is_ok(), "{} should pass", name);
        }
    }

    #[test]
    fn test_parse_format() {
        assert_eq!(parse_format(None), Ok(ImageFormat::Png));
        assert_eq!(parse_format(Some("PNG")), Ok(ImageFormat::Png));
        assert_eq!(parse_format(Some("jpeg")), Ok(ImageFormat::Jpeg));
        assert_eq!(
            parse_format(Some("gif")),
            Err(ValidationError::InvalidFormat("gif".to_string()))
        );
        assert!(parse_format(Some("")).is_err());
    }

    #[test]
    fn test_form_validated_file_takes_upload() {
        let mut form = ConvertForm {
            file: upload("x.pdf"),
            format: None,
        };
        assert_eq!(form.validated_file().unwrap().filename, "x.pdf");
        assert!(form.file.is_none());
    }
}
