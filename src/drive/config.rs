//! Google Drive configuration
//!
//! Loads the `[drive]` section of `~/.config/dmboard/settings.toml` and
//! locates service account credentials.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use super::types::ServiceAccountKey;
use crate::util::config::{self as settings, expand_path};

/// Env var holding the whole service account JSON blob
pub const CREDENTIALS_ENV: &str = "GOOGLE_SERVICE_ACCOUNT";
/// Key file picked up from the working directory during development
pub const LOCAL_CREDENTIALS_FILE: &str = "google_service_account.json";

/// Drive configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DriveConfig {
    /// Path to a service account key file
    pub credentials_file: Option<String>,
    /// Folder that holds one sub-folder per account
    pub root_folder: String,
    /// Substring that account folder names contain
    pub folder_pattern: String,
    /// Stats file inside each account folder
    pub stats_file: String,
}

impl Default for DriveConfig {
    fn default() -> Self {
        Self {
            credentials_file: None,
            root_folder: "Twitter Accounts".to_string(),
            folder_pattern: "Twitter Selfmade".to_string(),
            stats_file: "usage_stats.json".to_string(),
        }
    }
}

/// Load Drive config from settings file and environment
pub fn load_config() -> Result<DriveConfig> {
    let mut config: DriveConfig = settings::load_section("drive")?;
    apply_env_overrides(&mut config, |name| std::env::var(name).ok());
    Ok(config)
}

fn apply_env_overrides(config: &mut DriveConfig, lookup: impl Fn(&str) -> Option<String>) {
    if let Some(path) = lookup("DMBOARD_CREDENTIALS_FILE") {
        config.credentials_file = Some(path);
    }
    if let Some(folder) = lookup("DMBOARD_ROOT_FOLDER") {
        config.root_folder = folder;
    }
    if let Some(pattern) = lookup("DMBOARD_FOLDER_PATTERN") {
        config.folder_pattern = pattern;
    }
}

/// Where service account credentials come from
#[derive(Clone, PartialEq)]
pub enum CredentialSource {
    /// Inline JSON from the environment
    Inline(String),
    /// Key file on disk
    File(PathBuf),
}

impl CredentialSource {
    /// Read and validate the key
    pub fn load(&self) -> Result<ServiceAccountKey> {
        match self {
            CredentialSource::Inline(json) => ServiceAccountKey::from_json(json)
                .with_context(|| format!("Invalid {} value", CREDENTIALS_ENV)),
            CredentialSource::File(path) => read_key_file(path),
        }
    }
}

impl fmt::Display for CredentialSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CredentialSource::Inline(_) => write!(f, "{} env", CREDENTIALS_ENV),
            CredentialSource::File(path) => write!(f, "{}", path.display()),
        }
    }
}

impl fmt::Debug for CredentialSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CredentialSource::Inline(_) => f.write_str("Inline(<redacted>)"),
            CredentialSource::File(path) => f.debug_tuple("File").field(path).finish(),
        }
    }
}

/// Find credentials: env blob, then configured file, then the working directory
pub fn locate_credentials(
    config: &DriveConfig,
    inline: Option<String>,
    cwd: &Path,
) -> Option<CredentialSource> {
    if let Some(json) = inline.filter(|s| !s.trim().is_empty()) {
        return Some(CredentialSource::Inline(json));
    }

    if let Some(path) = config.credentials_file.as_deref() {
        let path = expand_path(path);
        if path.exists() {
            return Some(CredentialSource::File(path));
        }
        tracing::debug!(path = %path.display(), "configured credentials file not found");
    }

    let local = cwd.join(LOCAL_CREDENTIALS_FILE);
    if local.exists() {
        return Some(CredentialSource::File(local));
    }

    None
}

/// Locate credentials using the process environment
pub fn credentials_from_env(config: &DriveConfig) -> Option<CredentialSource> {
    let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
    locate_credentials(config, std::env::var(CREDENTIALS_ENV).ok(), &cwd)
}

fn read_key_file(path: &Path) -> Result<ServiceAccountKey> {
    let contents =
        fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))?;
    ServiceAccountKey::from_json(&contents)
        .with_context(|| format!("Invalid key file {}", path.display()))
}

/// Validate a key file and store its path in settings.toml
pub fn save_credentials_file(key_path: &Path, settings_path: &Path) -> Result<ServiceAccountKey> {
    let key = read_key_file(key_path)?;
    let absolute = fs::canonicalize(key_path)
        .with_context(|| format!("Failed to resolve {}", key_path.display()))?;

    settings::set_value(
        settings_path,
        "drive",
        "credentials_file",
        toml::Value::String(absolute.to_string_lossy().into_owned()),
    )?;
    Ok(key)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    const KEY_JSON: &str = include_str!("../../tests/fixtures/service_account.json");

    fn write_key(dir: &Path, name: &str) -> PathBuf {
        let path = dir.join(name);
        fs::write(&path, KEY_JSON).unwrap();
        path
    }

    #[test]
    fn default_config_values() {
        let config = DriveConfig::default();
        assert!(config.credentials_file.is_none());
        assert_eq!(config.folder_pattern, "Twitter Selfmade");
        assert_eq!(config.stats_file, "usage_stats.json");
    }

    #[test]
    fn settings_section_overrides_defaults() {
        let toml = "[drive]\nroot_folder = \"Accounts\"\n";
        let config: DriveConfig = settings::parse_section(toml, "drive").unwrap();
        assert_eq!(config.root_folder, "Accounts");
        assert_eq!(config.stats_file, "usage_stats.json");
    }

    #[test]
    fn env_overrides_apply() {
        let env: HashMap<&str, &str> = [
            ("DMBOARD_ROOT_FOLDER", "From Env"),
            ("DMBOARD_FOLDER_PATTERN", "Acct"),
            ("DMBOARD_CREDENTIALS_FILE", "/tmp/key.json"),
        ]
        .into_iter()
        .collect();

        let mut config = DriveConfig::default();
        apply_env_overrides(&mut config, |name| env.get(name).map(|v| v.to_string()));

        assert_eq!(config.root_folder, "From Env");
        assert_eq!(config.folder_pattern, "Acct");
        assert_eq!(config.credentials_file.as_deref(), Some("/tmp/key.json"));
    }

    #[test]
    fn env_overrides_absent_keep_config() {
        let mut config = DriveConfig::default();
        apply_env_overrides(&mut config, |_| None);
        assert_eq!(config, DriveConfig::default());
    }

    #[test]
    fn locate_prefers_inline_blob() {
        let dir = tempfile::tempdir().unwrap();
        write_key(dir.path(), LOCAL_CREDENTIALS_FILE);
        let source = locate_credentials(
            &DriveConfig::default(),
            Some(KEY_JSON.to_string()),
            dir.path(),
        );
        assert!(matches!(source, Some(CredentialSource::Inline(_))));
    }

    #[test]
    fn locate_ignores_blank_blob() {
        let dir = tempfile::tempdir().unwrap();
        let source = locate_credentials(&DriveConfig::default(), Some("  ".into()), dir.path());
        assert!(source.is_none());
    }

    #[test]
    fn locate_uses_configured_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_key(dir.path(), "key.json");
        let config = DriveConfig {
            credentials_file: Some(path.to_string_lossy().into_owned()),
            ..DriveConfig::default()
        };
        let source = locate_credentials(&config, None, dir.path());
        assert_eq!(source, Some(CredentialSource::File(path)));
    }

    #[test]
    fn locate_falls_back_to_working_directory() {
        let dir = tempfile::tempdir().unwrap();
        let local = write_key(dir.path(), LOCAL_CREDENTIALS_FILE);
        let config = DriveConfig {
            credentials_file: Some("/definitely/not/here.json".into()),
            ..DriveConfig::default()
        };
        let source = locate_credentials(&config, None, dir.path());
        assert_eq!(source, Some(CredentialSource::File(local)));
    }

    #[test]
    fn locate_nothing_is_none() {
        let dir = tempfile::tempdir().unwrap();
        assert!(locate_credentials(&DriveConfig::default(), None, dir.path()).is_none());
    }

    #[test]
    fn inline_source_loads_key() {
        let key = CredentialSource::Inline(KEY_JSON.to_string()).load().unwrap();
        assert!(key.client_email.starts_with("reader@"));
    }

    #[test]
    fn inline_source_invalid_json_errors() {
        let err = CredentialSource::Inline("{".into()).load().unwrap_err();
        assert!(err.to_string().contains(CREDENTIALS_ENV));
    }

    #[test]
    fn source_display_and_debug_hide_secrets() {
        let inline = CredentialSource::Inline(KEY_JSON.to_string());
        assert_eq!(inline.to_string(), "GOOGLE_SERVICE_ACCOUNT env");
        assert!(!format!("{:?}", inline).contains("PRIVATE"));

        let file = CredentialSource::File(PathBuf::from("/tmp/key.json"));
        assert_eq!(file.to_string(), "/tmp/key.json");
    }

    #[test]
    fn save_credentials_file_records_path() {
        let dir = tempfile::tempdir().unwrap();
        let key_path = write_key(dir.path(), "key.json");
        let settings_path = dir.path().join("config").join("settings.toml");

        save_credentials_file(&key_path, &settings_path).unwrap();

        let config: DriveConfig = settings::load_section_from(&settings_path, "drive").unwrap();
        let stored = PathBuf::from(config.credentials_file.unwrap());
        assert_eq!(stored, fs::canonicalize(&key_path).unwrap());
    }

    #[test]
    fn save_credentials_file_rejects_invalid_key() {
        let dir = tempfile::tempdir().unwrap();
        let key_path = dir.path().join("bad.json");
        fs::write(&key_path, "{}").unwrap();
        let settings_path = dir.path().join("settings.toml");

        assert!(save_credentials_file(&key_path, &settings_path).is_err());
        assert!(!settings_path.exists());
    }
}
