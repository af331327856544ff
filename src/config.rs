//! Configuration file support
//!
//! Settings are layered: built-in defaults, then a TOML file, then CLI
//! overrides. The file is looked up at `./pdfconv.toml`, then
//! `<config dir>/pdfconv/config.toml`.
//!
//! ```toml
//! [server]
//! bind = "0.0.0.0"
//! port = 8080
//! upload_limit_mb = 100
//!
//! [conversion]
//! timeout_secs = 300
//! dpi = 200
//! jpeg_quality = 85
//!
//! [cors]
//! allowed_origins = ["https://app.example.com"]
//!
//! [logging]
//! level = "info"
//! json = false
//! ```

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

use crate::convert::{ConversionSettings, DEFAULT_JPEG_QUALITY, RENDER_DPI};
use crate::web::{CorsConfig, ServerConfig, ToolCommands};
use crate::{DEFAULT_TIMEOUT_SECS, DEFAULT_UPLOAD_LIMIT_MB};

/// Local config file name
pub const LOCAL_CONFIG_FILE: &str = "pdfconv.toml";

/// Config loading errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

/// Top-level configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerSection,
    pub conversion: ConversionSection,
    pub cors: CorsSection,
    pub logging: LoggingSection,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSection {
    pub bind: String,
    pub port: u16,
    pub upload_limit_mb: usize,
    /// Runtime worker threads (0 = one per CPU)
    pub workers: usize,
}

impl Default for ServerSection {
    fn default() -> Self {
        Self {
            bind: crate::web::DEFAULT_BIND.to_string(),
            port: crate::web::DEFAULT_PORT,
            upload_limit_mb: DEFAULT_UPLOAD_LIMIT_MB,
            workers: 0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConversionSection {
    pub timeout_secs: u64,
    pub dpi: u32,
    pub jpeg_quality: u8,
    pub pdf2docx_cmd: String,
    pub pdftoppm_cmd: String,
    pub pdfinfo_cmd: String,
    /// Parent directory for per-request temp dirs
    pub temp_dir: Option<PathBuf>,
}

impl Default for ConversionSection {
    fn default() -> Self {
        Self {
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            dpi: RENDER_DPI,
            jpeg_quality: DEFAULT_JPEG_QUALITY,
            pdf2docx_cmd: "pdf2docx".to_string(),
            pdftoppm_cmd: "pdftoppm".to_string(),
            pdfinfo_cmd: "pdfinfo".to_string(),
            temp_dir: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CorsSection {
    pub enabled: bool,
    /// None allows every origin
    pub allowed_origins: Option<Vec<String>>,
}

impl Default for CorsSection {
    fn default() -> Self {
        Self {
            enabled: true,
            allowed_origins: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSection {
    pub level: String,
    pub json: bool,
}

impl Default for LoggingSection {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
        }
    }
}

/// Values given on the command line; `None` keeps the file/default value
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub port: Option<u16>,
    pub bind: Option<String>,
    pub upload_limit_mb: Option<usize>,
    pub timeout_secs: Option<u64>,
    pub log_level: Option<String>,
}

impl Config {
    /// Load from the first config file found, or defaults if there is none
    pub fn load() -> Result<Self, ConfigError> {
        match Self::find_config_file() {
            Some(path) => Self::load_from_path(&path),
            None => Ok(Self::default()),
        }
    }

    /// Load from an explicit path
    pub fn load_from_path(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&raw).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn from_toml(raw: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(raw)
    }

    /// Candidate config locations in lookup order
    pub fn search_paths() -> Vec<PathBuf> {
        let mut paths = vec![PathBuf::from(LOCAL_CONFIG_FILE)];
        if let Some(dir) = dirs::config_dir() {
            paths.push(dir.join("pdfconv").join("config.toml"));
        }
        paths
    }

    fn find_config_file() -> Option<PathBuf> {
        Self::search_paths().into_iter().find(|p| p.is_file())
    }

    /// Apply command-line overrides on top of this config
    pub fn merge_with_cli(&self, cli: &CliOverrides) -> Config {
        let mut merged = self.clone();
        if let Some(port) = cli.port {
            merged.server.port = port;
        }
        if let Some(bind) = &cli.bind {
            merged.server.bind = bind.clone();
        }
        if let Some(limit) = cli.upload_limit_mb {
            merged.server.upload_limit_mb = limit;
        }
        if let Some(timeout) = cli.timeout_secs {
            merged.conversion.timeout_secs = timeout;
        }
        if let Some(level) = &cli.log_level {
            merged.logging.level = level.clone();
        }
        merged
    }

    pub fn conversion_timeout(&self) -> Duration {
        Duration::from_secs(self.conversion.timeout_secs)
    }

    pub fn conversion_settings(&self) -> ConversionSettings {
        ConversionSettings {
            dpi: self.conversion.dpi,
            jpeg_quality: self.conversion.jpeg_quality.clamp(1, 100),
            temp_root: self.conversion.temp_dir.clone(),
        }
    }

    /// Tool names reported by the health check
    pub fn tool_commands(&self) -> ToolCommands {
        ToolCommands {
            pdf2docx: self.conversion.pdf2docx_cmd.clone(),
            pdftoppm: self.conversion.pdftoppm_cmd.clone(),
            pdfinfo: self.conversion.pdfinfo_cmd.clone(),
        }
    }

    pub fn server_config(&self) -> ServerConfig {
        let cors = if !self.cors.enabled {
            CorsConfig::disabled()
        } else {
            match &self.cors.allowed_origins {
                Some(origins) => CorsConfig::strict(origins.clone()),
                None => CorsConfig::default(),
            }
        };

        let mut config = ServerConfig::default()
            .with_port(self.server.port)
            .with_bind(&self.server.bind)
            .with_upload_limit(self.server.upload_limit_mb.saturating_mul(1024 * 1024))
            .with_cors(cors);
        if self.server.workers > 0 {
            config.workers = self.server.workers;
        }
        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.server.bind, "127.0.0.1");
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.server.upload_limit_mb, 100);
        assert_eq!(config.conversion.timeout_secs, 300);
        assert_eq!(config.conversion.dpi, 200);
        assert_eq!(config.conversion.jpeg_quality, 85);
        assert_eq!(config.conversion.pdf2docx_cmd, "pdf2docx");
        assert_eq!(config.conversion.pdftoppm_cmd, "pdftoppm");
        assert_eq!(config.conversion.pdfinfo_cmd, "pdfinfo");
        assert!(config.cors.enabled);
        assert!(config.cors.allowed_origins.is_none());
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = Config::from_toml(
            r#"
            [server]
            port = 9000

            [conversion]
            jpeg_quality = 70
            "#,
        )
        .unwrap();
        assert_eq!(config.server.port, 9000);
        assert_eq!(config.server.bind, "127.0.0.1");
        assert_eq!(config.conversion.jpeg_quality, 70);
        assert_eq!(config.conversion.dpi, 200);
    }

    #[test]
    fn test_empty_toml_is_default() {
        assert_eq!(Config::from_toml("").unwrap(), Config::default());
    }

    #[test]
    fn test_invalid_toml_is_rejected() {
        assert!(Config::from_toml("[server]\nport = \"eighty\"").is_err());
    }

    #[test]
    fn test_load_from_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pdfconv.toml");
        std::fs::write(&path, "[logging]\nlevel = \"debug\"\njson = true\n").unwrap();

        let config = Config::load_from_path(&path).unwrap();
        assert_eq!(config.logging.level, "debug");
        assert!(config.logging.json);
    }

    #[test]
    fn test_load_from_missing_path() {
        let err = Config::load_from_path(Path::new("/nonexistent/pdfconv.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }

    #[test]
    fn test_merge_with_cli() {
        let overrides = CliOverrides {
            port: Some(3000),
            bind: Some("0.0.0.0".to_string()),
            upload_limit_mb: None,
            timeout_secs: Some(30),
            log_level: None,
        };
        let merged = Config::default().merge_with_cli(&overrides);
        assert_eq!(merged.server.port, 3000);
        assert_eq!(merged.server.bind, "0.0.0.0");
        assert_eq!(merged.server.upload_limit_mb, 100);
        assert_eq!(merged.conversion.timeout_secs, 30);
        assert_eq!(merged.logging.level, "info");
    }

    #[test]
    fn test_server_config_from_config() {
        let mut config = Config::default();
        config.server.port = 9100;
        config.server.upload_limit_mb = 5;
        config.server.workers = 3;
        config.cors.allowed_origins = Some(vec!["https://example.com".to_string()]);

        let server = config.server_config();
        assert_eq!(server.port, 9100);
        assert_eq!(server.upload_limit, 5 * 1024 * 1024);
        assert_eq!(server.workers, 3);
        assert!(server.cors.is_origin_allowed("https://example.com"));
        assert!(!server.cors.is_origin_allowed("https://other.com"));
    }

    #[test]
    fn test_huge_upload_limit_saturates() {
        let mut config = Config::default();
        config.server.upload_limit_mb = usize::MAX;
        assert_eq!(config.server_config().upload_limit, usize::MAX);
    }

    #[test]
    fn test_conversion_settings_clamps_quality() {
        let mut config = Config::default();
        config.conversion.jpeg_quality = 0;
        assert_eq!(config.conversion_settings().jpeg_quality, 1);
        config.conversion.jpeg_quality = 200;
        assert_eq!(config.conversion_settings().jpeg_quality, 100);
    }

    #[test]
    fn test_search_paths_start_with_local_file() {
        let paths = Config::search_paths();
        assert_eq!(paths[0], PathBuf::from(LOCAL_CONFIG_FILE));
    }
}
