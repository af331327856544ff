//! CORS (Cross-Origin Resource Sharing) configuration
//!
//! Browser clients upload from arbitrary pages, so every origin is allowed
//! unless the config restricts it.

use axum::http::{header, HeaderValue, Method};
use std::time::Duration;
use tower_http::cors::{Any, CorsLayer};

/// CORS configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CorsConfig {
    /// Enable CORS
    pub enabled: bool,
    /// Allowed origins (None = allow all)
    pub allowed_origins: Option<Vec<String>>,
    /// Preflight cache duration in seconds
    pub max_age_secs: u64,
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            allowed_origins: None,
            max_age_secs: 86400, // 24 hours
        }
    }
}

impl CorsConfig {
    /// Only the given origins may call the API
    pub fn strict(origins: Vec<String>) -> Self {
        Self {
            allowed_origins: Some(origins),
            ..Default::default()
        }
    }

    /// No CORS headers at all
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            ..Default::default()
        }
    }

    /// Check if a specific origin is allowed
    pub fn is_origin_allowed(&self, origin: &str) -> bool {
        if !self.enabled {
            return false;
        }

        match &self.allowed_origins {
            None => true,
            Some(origins) => origins.iter().any(|o| o == origin || o == "*"),
        }
    }

    /// Convert to tower-http CorsLayer
    pub fn into_layer(self) -> CorsLayer {
        if !self.enabled {
            return CorsLayer::new();
        }

        let mut layer = CorsLayer::new()
            .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
            .allow_headers(Any)
            // Lets browser clients read the download name
            .expose_headers([header::CONTENT_DISPOSITION])
            .max_age(Duration::from_secs(self.max_age_secs));

        match &self.allowed_origins {
            Some(origins) if !origins.iter().any(|o| o == "*") => {
                let origins: Vec<HeaderValue> = origins.iter().filter_map(|o| o.parse().ok()).collect();
                layer = layer.allow_origin(origins);
            }
            _ => layer = layer.allow_origin(Any),
        }

        layer
    }
}
