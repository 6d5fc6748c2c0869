//! Configuration loading and root folder resolution
//!
//! Values resolve with CLI → environment → TOML → compiled default
//! priority. The root folder holds all durable service data (the saved
//! invoice file lives directly under it).

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::warn;

/// Default HTTP bind port
pub const DEFAULT_PORT: u16 = 5741;

/// Default upload size cap (10 MB, matching the upload screen hint)
pub const DEFAULT_MAX_UPLOAD_BYTES: u64 = 10 * 1024 * 1024;

/// Default webhook endpoints (overridable via ENV or TOML)
pub const DEFAULT_EXTRACTION_URL: &str =
    "https://n8n-production.bridgenet-lab.site/webhook/0b884a80-f36c-4adf-8ad1-c3a7c376c526";
pub const DEFAULT_INGESTION_URL: &str =
    "https://n8n-production.bridgenet-lab.site/webhook/6f2d1c55-8a14-49c7-9e31-5d9f0b2a7c44";
pub const DEFAULT_CLEANUP_URL: &str =
    "https://n8n-production.bridgenet-lab.site/webhook/d41f7a02-33be-4c6a-8e55-1b6c9d8e0f27";

/// TOML configuration file contents (`~/.config/invio/invio.toml`)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TomlConfig {
    pub root_folder: Option<String>,
    pub port: Option<u16>,
    pub extraction_url: Option<String>,
    pub ingestion_url: Option<String>,
    pub cleanup_url: Option<String>,
    pub max_upload_bytes: Option<u64>,
}

/// Fully resolved service configuration
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    /// Durable data folder (created on startup if missing)
    pub root_folder: PathBuf,
    /// HTTP bind port
    pub port: u16,
    /// Extraction webhook (multipart file upload)
    pub extraction_url: String,
    /// Ingestion webhook (final confirmed record)
    pub ingestion_url: String,
    /// Cleanup webhook (cancelled attempts, best-effort)
    pub cleanup_url: String,
    /// Maximum accepted upload size in bytes
    pub max_upload_bytes: u64,
}

impl ServiceConfig {
    /// Resolve the full configuration from CLI overrides, environment,
    /// the TOML config file and compiled defaults (in that priority).
    pub fn resolve(cli_root: Option<&str>, cli_port: Option<u16>) -> Result<Self> {
        let toml_config = load_toml_config().unwrap_or_default();

        let root_folder = resolve_root_folder(cli_root, &toml_config);

        let port = match cli_port {
            Some(p) => p,
            None => match std::env::var("INVIO_PORT").ok() {
                Some(raw) => raw
                    .parse()
                    .map_err(|_| Error::Config(format!("Invalid INVIO_PORT value: {}", raw)))?,
                None => toml_config.port.unwrap_or(DEFAULT_PORT),
            },
        };

        let max_upload_bytes = match std::env::var("INVIO_MAX_UPLOAD_BYTES").ok() {
            Some(raw) => raw.parse().map_err(|_| {
                Error::Config(format!("Invalid INVIO_MAX_UPLOAD_BYTES value: {}", raw))
            })?,
            None => toml_config
                .max_upload_bytes
                .unwrap_or(DEFAULT_MAX_UPLOAD_BYTES),
        };

        Ok(Self {
            root_folder,
            port,
            extraction_url: resolve_endpoint(
                "extraction_url",
                std::env::var("INVIO_EXTRACTION_URL").ok(),
                toml_config.extraction_url.clone(),
                DEFAULT_EXTRACTION_URL,
            ),
            ingestion_url: resolve_endpoint(
                "ingestion_url",
                std::env::var("INVIO_INGESTION_URL").ok(),
                toml_config.ingestion_url.clone(),
                DEFAULT_INGESTION_URL,
            ),
            cleanup_url: resolve_endpoint(
                "cleanup_url",
                std::env::var("INVIO_CLEANUP_URL").ok(),
                toml_config.cleanup_url.clone(),
                DEFAULT_CLEANUP_URL,
            ),
            max_upload_bytes,
        })
    }
}

/// Root folder resolution priority order:
/// 1. Command-line argument (highest priority)
/// 2. Environment variable (INVIO_ROOT_FOLDER)
/// 3. TOML config file
/// 4. OS-dependent compiled default (fallback)
pub fn resolve_root_folder(cli_arg: Option<&str>, toml_config: &TomlConfig) -> PathBuf {
    // Priority 1: Command-line argument
    if let Some(path) = cli_arg {
        return PathBuf::from(path);
    }

    // Priority 2: Environment variable
    if let Ok(path) = std::env::var("INVIO_ROOT_FOLDER") {
        return PathBuf::from(path);
    }

    // Priority 3: TOML config file
    if let Some(path) = &toml_config.root_folder {
        return PathBuf::from(path);
    }

    // Priority 4: OS-dependent compiled default
    get_default_root_folder()
}

/// Endpoint URL resolution with ENV → TOML → default priority.
/// Warns when both ENV and TOML set the same key (potential misconfiguration).
fn resolve_endpoint(
    key: &str,
    env_value: Option<String>,
    toml_value: Option<String>,
    default: &str,
) -> String {
    if env_value.is_some() && toml_value.is_some() {
        warn!(
            "{} set in both environment and TOML config. Using environment (highest priority).",
            key
        );
    }

    env_value
        .or(toml_value)
        .unwrap_or_else(|| default.to_string())
}

/// Load the TOML config file from the platform config directory
pub fn load_toml_config() -> Result<TomlConfig> {
    let config_path = find_config_file()?;
    let content = std::fs::read_to_string(&config_path)
        .map_err(|e| Error::Config(format!("Read config failed: {}", e)))?;
    toml::from_str(&content).map_err(|e| Error::Config(format!("Parse config failed: {}", e)))
}

/// Get default configuration file path for the platform
fn find_config_file() -> Result<PathBuf> {
    let config_path = if cfg!(target_os = "linux") {
        // Try ~/.config/invio/invio.toml first, then /etc/invio/invio.toml
        let user_config = dirs::config_dir().map(|d| d.join("invio").join("invio.toml"));
        let system_config = PathBuf::from("/etc/invio/invio.toml");

        if let Some(path) = user_config {
            if path.exists() {
                return Ok(path);
            }
        }
        if system_config.exists() {
            return Ok(system_config);
        }
        return Err(Error::Config("No config file found".to_string()));
    } else {
        dirs::config_dir()
            .map(|d| d.join("invio").join("invio.toml"))
            .ok_or_else(|| Error::Config("Could not determine config directory".to_string()))?
    };

    if config_path.exists() {
        Ok(config_path)
    } else {
        Err(Error::Config(format!(
            "Config file not found: {:?}",
            config_path
        )))
    }
}

/// Get OS-dependent default root folder path
pub fn get_default_root_folder() -> PathBuf {
    if cfg!(target_os = "linux") {
        dirs::data_local_dir()
            .map(|d| d.join("invio"))
            .unwrap_or_else(|| PathBuf::from("/var/lib/invio"))
    } else if cfg!(target_os = "macos") {
        dirs::data_dir()
            .map(|d| d.join("invio"))
            .unwrap_or_else(|| PathBuf::from("/Library/Application Support/invio"))
    } else if cfg!(target_os = "windows") {
        dirs::data_local_dir()
            .map(|d| d.join("invio"))
            .unwrap_or_else(|| PathBuf::from("C:\\ProgramData\\invio"))
    } else {
        PathBuf::from("./invio_data")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toml_config_parses_full_file() {
        let parsed: TomlConfig = toml::from_str(
            r#"
            root_folder = "/tmp/invio-test"
            port = 6100
            extraction_url = "http://localhost:9000/extract"
            max_upload_bytes = 1048576
            "#,
        )
        .unwrap();

        assert_eq!(parsed.root_folder.as_deref(), Some("/tmp/invio-test"));
        assert_eq!(parsed.port, Some(6100));
        assert_eq!(
            parsed.extraction_url.as_deref(),
            Some("http://localhost:9000/extract")
        );
        assert_eq!(parsed.ingestion_url, None);
        assert_eq!(parsed.max_upload_bytes, Some(1048576));
    }

    #[test]
    fn toml_config_tolerates_empty_file() {
        let parsed: TomlConfig = toml::from_str("").unwrap();
        assert!(parsed.root_folder.is_none());
        assert!(parsed.port.is_none());
    }

    #[test]
    fn cli_argument_wins_over_toml() {
        let toml_config = TomlConfig {
            root_folder: Some("/from/toml".to_string()),
            ..Default::default()
        };
        let resolved = resolve_root_folder(Some("/from/cli"), &toml_config);
        assert_eq!(resolved, PathBuf::from("/from/cli"));
    }

    #[test]
    fn endpoint_falls_back_to_default() {
        let url = resolve_endpoint("extraction_url", None, None, DEFAULT_EXTRACTION_URL);
        assert_eq!(url, DEFAULT_EXTRACTION_URL);
    }

    #[test]
    fn endpoint_prefers_env_over_toml() {
        let url = resolve_endpoint(
            "extraction_url",
            Some("http://env.example/hook".to_string()),
            Some("http://toml.example/hook".to_string()),
            DEFAULT_EXTRACTION_URL,
        );
        assert_eq!(url, "http://env.example/hook");
    }
}
