//! Server configuration.
//!
//! Everything the HTTP layer needs lives in [`ServerConfig`], built via
//! [`ServerConfigBuilder`]. The CLI maps flags and `FILECONVERT_*`
//! environment variables onto the builder; tests use the defaults.

use crate::error::ServerError;
use axum::http::HeaderValue;
use serde::{Deserialize, Serialize};
use std::net::{Ipv4Addr, SocketAddr};
use std::path::PathBuf;

/// Configuration for the conversion server.
///
/// # Example
/// ```rust
/// use fileconvert::{ErrorStatusPolicy, ServerConfig};
///
/// let config = ServerConfig::builder()
///     .bind_addr("127.0.0.1:9000".parse().unwrap())
///     .allowed_origins(["https://app.example.com"])
///     .max_upload_bytes(20 * 1024 * 1024)
///     .error_status(ErrorStatusPolicy::Classified)
///     .build()
///     .unwrap();
/// assert_eq!(config.allowed_origins.len(), 1);
/// ```
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address to listen on. Default: `0.0.0.0:8000`.
    pub bind_addr: SocketAddr,

    /// Origins allowed to make credentialed cross-origin requests.
    /// Default: `http://localhost:3000`.
    pub allowed_origins: Vec<String>,

    /// Directory served under `/static`. `None` disables the mount.
    /// Default: `static`.
    pub static_dir: Option<PathBuf>,

    /// Maximum request body size. `None` (default) means unlimited; the
    /// whole upload is buffered in memory, so an unbounded server can be
    /// pushed into exhausting RAM by a single large request.
    pub max_upload_bytes: Option<usize>,

    /// Which HTTP status a failed conversion maps to. Default: `Uniform`.
    pub error_status: ErrorStatusPolicy,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from((Ipv4Addr::UNSPECIFIED, 8000)),
            allowed_origins: vec!["http://localhost:3000".to_string()],
            static_dir: Some(PathBuf::from("static")),
            max_upload_bytes: None,
            error_status: ErrorStatusPolicy::default(),
        }
    }
}

impl ServerConfig {
    pub fn builder() -> ServerConfigBuilder {
        ServerConfigBuilder {
            config: ServerConfig::default(),
        }
    }

    /// Allowed origins as header values. Entries that fail to parse are
    /// skipped; [`ServerConfigBuilder::build`] rejects them up front.
    pub fn origin_header_values(&self) -> Vec<HeaderValue> {
        self.allowed_origins
            .iter()
            .filter_map(|o| HeaderValue::from_str(o).ok())
            .collect()
    }
}

/// Builder for [`ServerConfig`].
#[derive(Debug)]
pub struct ServerConfigBuilder {
    config: ServerConfig,
}

impl ServerConfigBuilder {
    pub fn bind_addr(mut self, addr: SocketAddr) -> Self {
        self.config.bind_addr = addr;
        self
    }

    /// Replace the origin allow-list.
    pub fn allowed_origins<I, S>(mut self, origins: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.config.allowed_origins = origins.into_iter().map(Into::into).collect();
        self
    }

    pub fn static_dir(mut self, dir: Option<PathBuf>) -> Self {
        self.config.static_dir = dir;
        self
    }

    pub fn max_upload_bytes(mut self, bytes: usize) -> Self {
        self.config.max_upload_bytes = Some(bytes);
        self
    }

    pub fn error_status(mut self, policy: ErrorStatusPolicy) -> Self {
        self.config.error_status = policy;
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<ServerConfig, ServerError> {
        let c = &self.config;
        for origin in &c.allowed_origins {
            let scheme_ok = origin.starts_with("http://") || origin.starts_with("https://");
            if !scheme_ok || HeaderValue::from_str(origin).is_err() {
                return Err(ServerError::InvalidConfig(format!(
                    "allowed origin must be an http(s) URL, got '{origin}'"
                )));
            }
            if origin.ends_with('/') {
                return Err(ServerError::InvalidConfig(format!(
                    "allowed origin must not end with '/', got '{origin}'"
                )));
            }
        }
        if c.max_upload_bytes == Some(0) {
            return Err(ServerError::InvalidConfig(
                "max upload size must be ≥ 1 byte".into(),
            ));
        }
        Ok(self.config)
    }
}

// ── Enums ────────────────────────────────────────────────────────────────

/// How a failed conversion is reported.
///
/// | Policy | Bad input (decode / encoding) | Library failure |
/// |--------|-------------------------------|-----------------|
/// | `Uniform` | 500 | 500 |
/// | `Classified` | 422 | 500 |
///
/// `Uniform` is the default and matches what existing clients of the
/// endpoints expect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorStatusPolicy {
    #[default]
    Uniform,
    Classified,
}
