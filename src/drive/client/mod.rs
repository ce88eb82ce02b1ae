//! Google Drive v3 HTTP client

use anyhow::{anyhow, bail, Context, Result};
use reqwest::Client;
use std::future::Future;
use std::time::Duration;
use tracing::debug;

use super::auth;
use super::types::{DriveFile, FileList, ServiceAccountKey, FOLDER_MIME_TYPE};

#[cfg(test)]
mod tests;

const DRIVE_API_URL: &str = "https://www.googleapis.com/drive/v3";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
const LIST_FIELDS: &str = "files(id,name,mimeType)";

/// Trait for the Drive lookups the dashboard needs (enables testing with mocks)
pub trait DriveApi {
    /// Find a folder anywhere by exact name
    fn find_folder(&self, name: &str) -> impl Future<Output = Result<Option<DriveFile>>> + Send;

    /// List folders under a parent whose name contains a pattern
    fn list_child_folders(
        &self,
        parent_id: &str,
        name_contains: &str,
    ) -> impl Future<Output = Result<Vec<DriveFile>>> + Send;

    /// Find a file under a parent by exact name
    fn find_child_file(
        &self,
        parent_id: &str,
        name: &str,
    ) -> impl Future<Output = Result<Option<DriveFile>>> + Send;

    /// Download a file's raw content
    fn download(&self, file_id: &str) -> impl Future<Output = Result<Vec<u8>>> + Send;
}

/// Escape a value for use inside a single-quoted Drive query literal
pub fn escape_query_literal(value: &str) -> String {
    value.replace('\\', "\\\\").replace('\'', "\\'")
}

/// Query: folder with an exact name
pub fn folder_by_name_query(name: &str) -> String {
    format!(
        "name='{}' and mimeType='{}' and trashed=false",
        escape_query_literal(name),
        FOLDER_MIME_TYPE
    )
}

/// Query: child folders whose name contains a pattern
pub fn child_folders_query(parent_id: &str, name_contains: &str) -> String {
    format!(
        "'{}' in parents and mimeType='{}' and name contains '{}' and trashed=false",
        escape_query_literal(parent_id),
        FOLDER_MIME_TYPE,
        escape_query_literal(name_contains)
    )
}

/// Query: child file with an exact name
pub fn child_file_query(parent_id: &str, name: &str) -> String {
    format!(
        "'{}' in parents and name='{}' and trashed=false",
        escape_query_literal(parent_id),
        escape_query_literal(name)
    )
}

/// Drive API client holding a bearer token for one load
pub struct DriveClient {
    http: Client,
    token: String,
    base_url: String,
}

impl DriveClient {
    /// Authenticate with a service account key and create a client
    pub async fn connect(key: &ServiceAccountKey) -> Result<Self> {
        let http = Client::builder()
            .user_agent(concat!("dmboard/", env!("CARGO_PKG_VERSION")))
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        let token = auth::fetch_access_token(&http, key).await?;
        Ok(Self {
            http,
            token,
            base_url: DRIVE_API_URL.to_string(),
        })
    }

    /// Run a `files.list` query
    async fn list_files(&self, query: &str) -> Result<Vec<DriveFile>> {
        let url = format!("{}/files", self.base_url);
        debug!(query, "drive files.list");

        let response = self
            .http
            .get(&url)
            .bearer_auth(&self.token)
            .query(&[("q", query), ("fields", LIST_FIELDS), ("pageSize", "1000")])
            .send()
            .await
            .context("Drive request failed")?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            bail!("HTTP {}: {}", status.as_u16(), body);
        }

        let text = response.text().await?;
        let list: FileList = serde_json::from_str(&text).map_err(|e| {
            let preview: String = text.chars().take(200).collect();
            anyhow!("Parse error: {}: {}", e, preview)
        })?;
        Ok(list.files)
    }
}

impl DriveApi for DriveClient {
    async fn find_folder(&self, name: &str) -> Result<Option<DriveFile>> {
        let files = self.list_files(&folder_by_name_query(name)).await?;
        Ok(files.into_iter().find(DriveFile::is_folder))
    }

    async fn list_child_folders(
        &self,
        parent_id: &str,
        name_contains: &str,
    ) -> Result<Vec<DriveFile>> {
        self.list_files(&child_folders_query(parent_id, name_contains))
            .await
    }

    async fn find_child_file(&self, parent_id: &str, name: &str) -> Result<Option<DriveFile>> {
        let files = self.list_files(&child_file_query(parent_id, name)).await?;
        Ok(files.into_iter().next())
    }

    async fn download(&self, file_id: &str) -> Result<Vec<u8>> {
        let url = format!("{}/files/{}", self.base_url, file_id);
        debug!(file_id, "drive files.get media");

        let response = self
            .http
            .get(&url)
            .bearer_auth(&self.token)
            .query(&[("alt", "media")])
            .send()
            .await
            .context("Drive download failed")?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            bail!("HTTP {}: {}", status.as_u16(), body);
        }

        Ok(response.bytes().await?.to_vec())
    }
}
