//! Configuration from defaults, `nyaya.yml` and environment variables.
//!
//! Layering, lowest to highest priority:
//!
//! 1. Built-in defaults.
//! 2. A YAML file (`--config <path>`, or `./nyaya.yml` when present):
//!
//! ```yaml
//! server:
//!   host: "127.0.0.1"
//!   port: 3000
//!   asset_root: "./public"
//! gemini:
//!   model: "gemini-1.5-flash"
//!   request_timeout_secs: 60
//! ```
//!
//! 3. Environment variables:
//! - `GEMINI_API_KEY`: upstream credential (required)
//! - `HOST` / `PORT`: bind address (default: 0.0.0.0:3000)
//! - `GEMINI_BASE_URL`: upstream base URL
//! - `GEMINI_API_VERSION`: versioned path segment (default: v1)
//! - `GEMINI_MODEL`: model name (default: gemini-1.5-flash)
//! - `REQUEST_TIMEOUT_SECS`: outbound request timeout (default: 60)
//! - `ASSET_ROOT`: directory holding pages, `libs/` and `node_modules/`
//!
//! CLI flags are applied on top by the binary.

use anyhow::{bail, Context, Result};
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

pub const DEFAULT_CONFIG_FILE: &str = "nyaya.yml";
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";
pub const DEFAULT_API_VERSION: &str = "v1";
pub const DEFAULT_MODEL: &str = "gemini-1.5-flash";

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub api_key: SecretString,
    pub base_url: String,
    pub api_version: String,
    pub model: String,
    pub request_timeout_secs: u64,
    pub shutdown_timeout_secs: u64,
    pub asset_root: PathBuf,
}

#[derive(Debug, Default, Deserialize)]
pub struct FileConfig {
    #[serde(default)]
    server: ServerSection,
    #[serde(default)]
    gemini: GeminiSection,
}

#[derive(Debug, Default, Deserialize)]
struct ServerSection {
    host: Option<String>,
    port: Option<u16>,
    asset_root: Option<PathBuf>,
    shutdown_timeout_secs: Option<u64>,
}

#[derive(Debug, Default, Deserialize)]
struct GeminiSection {
    api_key: Option<String>,
    base_url: Option<String>,
    api_version: Option<String>,
    model: Option<String>,
    request_timeout_secs: Option<u64>,
}

impl FileConfig {
    pub fn from_yaml_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config from {:?}", path))?;
        Self::from_yaml_str(&content).with_context(|| format!("Failed to parse {:?}", path))
    }

    pub fn from_yaml_str(content: &str) -> Result<Self> {
        Ok(serde_yaml_ng::from_str(content)?)
    }
}

impl ServerConfig {
    /// Load configuration for the running process.
    ///
    /// An explicit `path` must exist; the default `nyaya.yml` is optional.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let file = match path {
            Some(p) => FileConfig::from_yaml_file(p)?,
            None => {
                let default_path = Path::new(DEFAULT_CONFIG_FILE);
                if default_path.exists() {
                    FileConfig::from_yaml_file(default_path)?
                } else {
                    FileConfig::default()
                }
            }
        };

        Self::from_sources(file, |name| env::var(name).ok())
    }

    /// Merge a parsed file with an environment lookup.
    pub fn from_sources<F>(file: FileConfig, env: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let FileConfig { server, gemini } = file;

        let api_key = match env("GEMINI_API_KEY").or(gemini.api_key) {
            Some(key) if !key.trim().is_empty() => SecretString::from(key.trim().to_string()),
            _ => bail!(
                "GEMINI_API_KEY is not set; export it or add gemini.api_key to {}",
                DEFAULT_CONFIG_FILE
            ),
        };

        let port = match env("PORT") {
            Some(p) => p
                .parse()
                .with_context(|| format!("PORT must be a port number, got {:?}", p))?,
            None => server.port.unwrap_or(3000),
        };

        let request_timeout_secs = match env("REQUEST_TIMEOUT_SECS") {
            Some(t) => t
                .parse()
                .with_context(|| format!("REQUEST_TIMEOUT_SECS must be an integer, got {:?}", t))?,
            None => gemini.request_timeout_secs.unwrap_or(60),
        };

        Ok(Self {
            host: env("HOST")
                .or(server.host)
                .unwrap_or_else(|| "0.0.0.0".to_string()),
            port,
            api_key,
            base_url: env("GEMINI_BASE_URL")
                .or(gemini.base_url)
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            api_version: env("GEMINI_API_VERSION")
                .or(gemini.api_version)
                .unwrap_or_else(|| DEFAULT_API_VERSION.to_string()),
            model: env("GEMINI_MODEL")
                .or(gemini.model)
                .unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            request_timeout_secs,
            shutdown_timeout_secs: server.shutdown_timeout_secs.unwrap_or(30),
            asset_root: env("ASSET_ROOT")
                .map(PathBuf::from)
                .or(server.asset_root)
                .unwrap_or_else(|| PathBuf::from(".")),
        })
    }

    /// Config with defaults everywhere except the credential.
    pub fn with_api_key(api_key: impl Into<String>) -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3000,
            api_key: SecretString::from(api_key.into()),
            base_url: DEFAULT_BASE_URL.to_string(),
            api_version: DEFAULT_API_VERSION.to_string(),
            model: DEFAULT_MODEL.to_string(),
            request_timeout_secs: 60,
            shutdown_timeout_secs: 30,
            asset_root: PathBuf::from("."),
        }
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    pub fn with_asset_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.asset_root = root.into();
        self
    }

    pub fn with_request_timeout(mut self, secs: u64) -> Self {
        self.request_timeout_secs = secs;
        self
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn generate_content_url(&self) -> String {
        format!(
            "{}/{}/models/{}:generateContent",
            self.base_url.trim_end_matches('/'),
            self.api_version.trim_matches('/'),
            self.model,
        )
    }

    pub fn masked_api_key(&self) -> String {
        mask_secret(self.api_key.expose_secret())
    }
}

/// Render a credential for logs: first 6 and last 4 characters.
pub fn mask_secret(secret: &str) -> String {
    let chars: Vec<char> = secret.chars().collect();
    if chars.len() <= 10 {
        return "*".repeat(chars.len().max(4));
    }
    let head: String = chars[..6].iter().collect();
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{}...{}", head, tail)
}
