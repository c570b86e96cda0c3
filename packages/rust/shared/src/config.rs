//! Application configuration for sheetsync.
//!
//! An optional `sheetsync.toml` in the working directory (or a path given on
//! the command line) overrides the built-in defaults, and CLI flags override
//! the file. Every field has a default, so an empty or missing file is valid.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Result, SheetSyncError};

/// Default configuration file name, resolved against the working directory.
pub const CONFIG_FILE_NAME: &str = "sheetsync.toml";

// ---------------------------------------------------------------------------
// Config structs (matching sheetsync.toml schema)
// ---------------------------------------------------------------------------

/// Top-level application config, deserialized from TOML.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Remote document settings.
    #[serde(default)]
    pub spreadsheet: SpreadsheetConfig,

    /// Numeric ids of the sheets read by each pass.
    #[serde(default)]
    pub sheets: SheetsConfig,

    /// Output location.
    #[serde(default)]
    pub output: OutputConfig,

    /// HTTP client settings.
    #[serde(default)]
    pub http: HttpConfig,
}

/// `[spreadsheet]` section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpreadsheetConfig {
    /// Identifier of the hosted spreadsheet document.
    #[serde(default = "default_document_id")]
    pub document_id: String,

    /// Name of the env var holding the API key (never store the key itself).
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,

    /// Base URL of the spreadsheet service.
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,
}

impl Default for SpreadsheetConfig {
    fn default() -> Self {
        Self {
            document_id: default_document_id(),
            api_key_env: default_api_key_env(),
            api_base_url: default_api_base_url(),
        }
    }
}

fn default_document_id() -> String {
    "1-n8ZnmZ3jssdhYSzkRF6ngOvlsea_qQVLP0E_bexzxY".into()
}
fn default_api_key_env() -> String {
    "SPREADSHEET_API_KEY".into()
}
fn default_api_base_url() -> String {
    "https://sheets.googleapis.com".into()
}

/// `[sheets]` section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SheetsConfig {
    /// Sponsor list.
    #[serde(default = "default_sponsor_sheet")]
    pub sponsor: u64,

    /// Sponsor news list.
    #[serde(default = "default_sponsor_news_sheet")]
    pub sponsor_news: u64,

    /// Room to livestream link list.
    #[serde(default = "default_youtube_sheet")]
    pub youtube: u64,
}

impl Default for SheetsConfig {
    fn default() -> Self {
        Self {
            sponsor: default_sponsor_sheet(),
            sponsor_news: default_sponsor_news_sheet(),
            youtube: default_youtube_sheet(),
        }
    }
}

fn default_sponsor_sheet() -> u64 {
    178607707
}
fn default_sponsor_news_sheet() -> u64 {
    1344636990
}
fn default_youtube_sheet() -> u64 {
    2044734677
}

/// `[output]` section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Output root; wiped and recreated on every run.
    #[serde(default = "default_output_dir")]
    pub dir: PathBuf,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: default_output_dir(),
        }
    }
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("dist")
}

/// `[http]` section.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HttpConfig {
    /// Per-request timeout. Unset means requests never time out.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,
}

// ---------------------------------------------------------------------------
// Config loading
// ---------------------------------------------------------------------------

/// Path of the default config file (`./sheetsync.toml`).
pub fn default_config_path() -> PathBuf {
    PathBuf::from(CONFIG_FILE_NAME)
}

/// Load the config from the default location. Returns defaults if the file does not exist.
pub fn load_config() -> Result<AppConfig> {
    let path = default_config_path();

    if !path.exists() {
        tracing::debug!(?path, "config file not found, using defaults");
        return Ok(AppConfig::default());
    }

    load_config_from(&path)
}

/// Load the config from a specific file path. The file must exist.
pub fn load_config_from(path: &Path) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path).map_err(|e| SheetSyncError::io(path, e))?;

    let config: AppConfig = toml::from_str(&content).map_err(|e| {
        SheetSyncError::config(format!("failed to parse {}: {e}", path.display()))
    })?;

    validate_config(&config)?;
    Ok(config)
}

/// Write a default config file to `path`, refusing to overwrite an existing one.
pub fn init_config(path: &Path) -> Result<PathBuf> {
    if path.exists() {
        return Err(SheetSyncError::config(format!(
            "{} already exists",
            path.display()
        )));
    }

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|e| SheetSyncError::io(parent, e))?;
    }

    let content = toml::to_string_pretty(&AppConfig::default())
        .map_err(|e| SheetSyncError::config(e.to_string()))?;

    std::fs::write(path, content).map_err(|e| SheetSyncError::io(path, e))?;
    tracing::info!(?path, "created default config file");

    Ok(path.to_path_buf())
}

/// Reject values that would make every run fail in a confusing way.
pub fn validate_config(config: &AppConfig) -> Result<()> {
    if config.spreadsheet.document_id.trim().is_empty() {
        return Err(SheetSyncError::config("spreadsheet.document_id must not be empty"));
    }
    if config.spreadsheet.api_key_env.trim().is_empty() {
        return Err(SheetSyncError::config("spreadsheet.api_key_env must not be empty"));
    }
    if config.output.dir.as_os_str().is_empty() {
        return Err(SheetSyncError::config("output.dir must not be empty"));
    }
    Ok(())
}

/// Read the API key from the configured env var.
///
/// `None` when the variable is unset or empty; the caller treats that as
/// "skip this run", not as an error.
pub fn resolve_api_key(config: &AppConfig) -> Option<String> {
    match std::env::var(&config.spreadsheet.api_key_env) {
        Ok(val) if !val.is_empty() => Some(val),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_serializes() {
        let config = AppConfig::default();
        let toml_str = toml::to_string_pretty(&config).expect("serialize default config");
        assert!(toml_str.contains("document_id"));
        assert!(toml_str.contains("SPREADSHEET_API_KEY"));
        assert!(!toml_str.contains("timeout_secs"));
    }

    #[test]
    fn config_roundtrip() {
        let config = AppConfig::default();
        let toml_str = toml::to_string_pretty(&config).expect("serialize");
        let parsed: AppConfig = toml::from_str(&toml_str).expect("deserialize");
        assert_eq!(parsed, config);
        assert_eq!(parsed.sheets.sponsor_news, 1344636990);
    }

    #[test]
    fn partial_config_keeps_defaults() {
        let toml_str = r#"
[output]
dir = "public"

[sheets]
youtube = 42
"#;
        let config: AppConfig = toml::from_str(toml_str).expect("parse");
        assert_eq!(config.output.dir, PathBuf::from("public"));
        assert_eq!(config.sheets.youtube, 42);
        assert_eq!(config.sheets.sponsor, 178607707);
        assert_eq!(config.spreadsheet.api_key_env, "SPREADSHEET_API_KEY");
        assert_eq!(config.http.timeout_secs, None);
    }

    #[test]
    fn load_from_file_validates() {
        let dir = std::env::temp_dir().join(format!("sheetsync-config-{}", uuid::Uuid::now_v7()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join(CONFIG_FILE_NAME);

        std::fs::write(&path, "[spreadsheet]\ndocument_id = \"  \"\n").unwrap();
        let err = load_config_from(&path).unwrap_err();
        assert!(err.to_string().contains("document_id"));

        std::fs::write(&path, "[http]\ntimeout_secs = 15\n").unwrap();
        let config = load_config_from(&path).unwrap();
        assert_eq!(config.http.timeout_secs, Some(15));

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn init_refuses_to_overwrite() {
        let dir = std::env::temp_dir().join(format!("sheetsync-init-{}", uuid::Uuid::now_v7()));
        let path = dir.join(CONFIG_FILE_NAME);

        let written = init_config(&path).unwrap();
        assert_eq!(load_config_from(&written).unwrap(), AppConfig::default());
        assert!(init_config(&path).is_err());

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn api_key_resolution() {
        let mut config = AppConfig::default();
        // Use a unique env var name to avoid interfering with other tests
        config.spreadsheet.api_key_env = "SHEETSYNC_TEST_NONEXISTENT_KEY_12345".into();
        assert_eq!(resolve_api_key(&config), None);
    }
}
