//! Google Drive data types

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// MIME type Drive uses for folders
pub const FOLDER_MIME_TYPE: &str = "application/vnd.google-apps.folder";

const DEFAULT_TOKEN_URI: &str = "https://oauth2.googleapis.com/token";

/// A file or folder entry from `files.list`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DriveFile {
    /// File ID
    pub id: String,
    /// Display name
    pub name: String,
    /// MIME type
    #[serde(default)]
    pub mime_type: Option<String>,
}

impl DriveFile {
    /// Check if this entry is a folder
    pub fn is_folder(&self) -> bool {
        self.mime_type.as_deref() == Some(FOLDER_MIME_TYPE)
    }
}

/// `files.list` response
#[derive(Debug, Default, Deserialize)]
pub struct FileList {
    #[serde(default)]
    pub files: Vec<DriveFile>,
}

/// Service account key file, as downloaded from the cloud console
#[derive(Clone, Deserialize)]
pub struct ServiceAccountKey {
    /// Key type, `service_account` for keys we can use
    #[serde(rename = "type", default)]
    pub key_type: Option<String>,
    /// Service account email, the JWT issuer
    pub client_email: String,
    /// PEM-encoded RSA private key
    pub private_key: String,
    #[serde(default)]
    pub private_key_id: Option<String>,
    #[serde(default)]
    pub project_id: Option<String>,
    /// OAuth token endpoint
    #[serde(default = "default_token_uri")]
    pub token_uri: String,
}

fn default_token_uri() -> String {
    DEFAULT_TOKEN_URI.to_string()
}

impl ServiceAccountKey {
    /// Parse and validate a key from its JSON text
    pub fn from_json(json: &str) -> Result<Self> {
        let key: Self = serde_json::from_str(json).context("Invalid service account JSON")?;
        if let Some(kind) = key.key_type.as_deref() {
            if kind != "service_account" {
                bail!("Expected a service_account key, got '{}'", kind);
            }
        }
        if key.client_email.is_empty() {
            bail!("Service account key has no client_email");
        }
        if !key.private_key.contains("PRIVATE KEY") {
            bail!("Service account key has no PEM private_key");
        }
        Ok(key)
    }
}

impl fmt::Debug for ServiceAccountKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServiceAccountKey")
            .field("client_email", &self.client_email)
            .field("project_id", &self.project_id)
            .field("token_uri", &self.token_uri)
            .field("private_key", &"<redacted>")
            .finish()
    }
}

/// OAuth token endpoint response
#[derive(Debug, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
}
