//! Google Drive integration
//!
//! Read-only access to the folders and JSON files that hold per-account
//! usage stats.
//!
//! Use [`connect`] to build an authenticated [`DriveClient`], then drive it
//! through the [`DriveApi`] trait.

mod auth;
mod client;
mod config;
pub mod types;

use anyhow::Result;
use std::path::Path;

pub use client::{DriveApi, DriveClient};
pub use config::{credentials_from_env, load_config, CredentialSource, DriveConfig};

/// Authenticate with the located credentials and return a client
pub async fn connect(source: &CredentialSource) -> Result<DriveClient> {
    let key = source.load()?;
    DriveClient::connect(&key).await
}

/// Register a service account key file in settings.toml
#[cfg(not(tarpaulin_include))]
pub fn register_credentials(path: &Path) -> Result<()> {
    let settings_path = crate::util::config::settings_path()?;
    let key = config::save_credentials_file(path, &settings_path)?;
    println!(
        "Service account {} saved to {}",
        key.client_email,
        settings_path.display()
    );
    Ok(())
}
