//! Configuration management for the Blueprint Reader server

use std::collections::HashSet;
use std::env;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

use thiserror::Error;

/// Default upper bound for a request body (16 MiB)
pub const DEFAULT_MAX_CONTENT_LENGTH: usize = 16 * 1024 * 1024;

/// Configuration loading errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid value for {key}: {value:?}")]
    InvalidValue { key: &'static str, value: String },
}

#[derive(Debug, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub reference: ReferenceConfig,
    pub upload: UploadConfig,
    pub cors: CorsConfig,
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: IpAddr,
    pub port: u16,
    pub environment: Environment,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Development,
    Production,
}

#[derive(Debug, Clone)]
pub struct ReferenceConfig {
    /// The canonical PDF every upload is compared against
    pub pdf_path: PathBuf,
    /// JSON payload returned when an upload matches
    pub data_path: PathBuf,
}

#[derive(Debug, Clone)]
pub struct UploadConfig {
    pub dir: PathBuf,
    pub max_content_length: usize,
    /// Lower-cased extensions, without the leading dot
    pub allowed_extensions: HashSet<String>,
}

#[derive(Debug, Clone)]
pub struct CorsConfig {
    /// `None` allows any origin
    pub allowed_origins: Option<Vec<String>>,
}

impl Environment {
    fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "development" | "dev" => Some(Environment::Development),
            "production" | "prod" => Some(Environment::Production),
            _ => None,
        }
    }

    pub fn is_development(self) -> bool {
        self == Environment::Development
    }

    /// Loopback for local debugging, all interfaces otherwise
    fn default_host(self) -> IpAddr {
        match self {
            Environment::Development => IpAddr::from([127, 0, 0, 1]),
            Environment::Production => IpAddr::from([0, 0, 0, 0]),
        }
    }
}

impl ServerConfig {
    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            server: ServerConfig {
                host: Environment::Production.default_host(),
                port: 5000,
                environment: Environment::Production,
            },
            reference: ReferenceConfig {
                pdf_path: PathBuf::from("in/bp_1.pdf"),
                data_path: PathBuf::from("data/blueprint_data.json"),
            },
            upload: UploadConfig {
                dir: PathBuf::from("uploads"),
                max_content_length: DEFAULT_MAX_CONTENT_LENGTH,
                allowed_extensions: HashSet::from(["pdf".to_string()]),
            },
            cors: CorsConfig {
                allowed_origins: None,
            },
        }
    }
}

impl Config {
    /// Read configuration from the process environment
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup, falling back to defaults
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Config::default();

        // APP_ENV takes precedence over FLASK_ENV
        let environment = match ["APP_ENV", "FLASK_ENV"]
            .into_iter()
            .find_map(|key| lookup(key).map(|value| (key, value)))
        {
            Some((key, value)) => {
                Environment::parse(&value).ok_or(ConfigError::InvalidValue { key, value })?
            }
            None => defaults.server.environment,
        };

        let host = match lookup("HOST") {
            Some(value) => value
                .trim()
                .parse()
                .map_err(|_| ConfigError::InvalidValue { key: "HOST", value })?,
            None => environment.default_host(),
        };

        let port = match lookup("PORT") {
            Some(value) => value
                .trim()
                .parse()
                .map_err(|_| ConfigError::InvalidValue { key: "PORT", value })?,
            None => defaults.server.port,
        };

        let max_content_length = match lookup("MAX_CONTENT_LENGTH") {
            Some(value) => value.trim().parse().map_err(|_| ConfigError::InvalidValue {
                key: "MAX_CONTENT_LENGTH",
                value,
            })?,
            None => defaults.upload.max_content_length,
        };

        let allowed_extensions = match lookup("ALLOWED_EXTENSIONS") {
            Some(value) => {
                let extensions: HashSet<String> = split_list(&value)
                    .into_iter()
                    .map(|ext| ext.trim_start_matches('.').to_ascii_lowercase())
                    .filter(|ext| !ext.is_empty())
                    .collect();
                if extensions.is_empty() {
                    return Err(ConfigError::InvalidValue {
                        key: "ALLOWED_EXTENSIONS",
                        value,
                    });
                }
                extensions
            }
            None => defaults.upload.allowed_extensions,
        };

        let allowed_origins = lookup("ALLOWED_ORIGINS").and_then(|value| {
            let origins = split_list(&value);
            if origins.is_empty() || origins.iter().any(|origin| origin == "*") {
                None
            } else {
                Some(origins)
            }
        });

        Ok(Config {
            server: ServerConfig {
                host,
                port,
                environment,
            },
            reference: ReferenceConfig {
                pdf_path: lookup("REFERENCE_PDF_PATH")
                    .map(PathBuf::from)
                    .unwrap_or(defaults.reference.pdf_path),
                data_path: lookup("BLUEPRINT_DATA_PATH")
                    .map(PathBuf::from)
                    .unwrap_or(defaults.reference.data_path),
            },
            upload: UploadConfig {
                dir: lookup("UPLOAD_FOLDER")
                    .map(PathBuf::from)
                    .unwrap_or(defaults.upload.dir),
                max_content_length,
                allowed_extensions,
            },
            cors: CorsConfig { allowed_origins },
        })
    }
}

fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
}
