//! JSON file artifact store
//!
//! Writes each scraped document to its own pretty-printed JSON file named
//! after the source host and the save time.

use crate::config::OutputConfig;
use crate::output::traits::{Artifact, ArtifactStore};
use crate::pipeline::ScrapedDocument;
use crate::url::{extract_host, sanitize_host};
use crate::PersistError;
use async_trait::async_trait;
use chrono::Utc;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs::{self, File, OpenOptions};
use tokio::io::AsyncWriteExt;
use url::Url;

/// Upper bound on `-N` suffixes tried when a name is already taken
const MAX_NAME_ATTEMPTS: u32 = 1000;

/// Stores artifacts as JSON files in a single directory
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    directory: PathBuf,
    prefix: String,
}

impl JsonFileStore {
    pub fn new(directory: impl Into<PathBuf>, prefix: impl Into<String>) -> Self {
        Self {
            directory: directory.into(),
            prefix: prefix.into(),
        }
    }

    pub fn from_config(config: &OutputConfig) -> Self {
        Self::new(&config.directory, &config.file_name_prefix)
    }

    /// File stem for a save of `source_url` at the given Unix time in milliseconds
    ///
    /// Format: `{prefix}-{host}-{millis}`, with the host sanitized to `[A-Za-z0-9.-]`.
    pub fn file_stem(&self, source_url: &Url, millis: i64) -> String {
        let host = extract_host(source_url)
            .map(|host| sanitize_host(&host))
            .unwrap_or_else(|| "unknown".to_string());
        format!("{}-{}-{}", self.prefix, host, millis)
    }

    /// Creates a file that did not exist before, suffixing `-1`, `-2`, ... on collision
    async fn create_unique(directory: &Path, stem: &str) -> Result<(PathBuf, File), PersistError> {
        let mut attempt = 0;
        loop {
            let name = if attempt == 0 {
                format!("{}.json", stem)
            } else {
                format!("{}-{}.json", stem, attempt)
            };
            let path = directory.join(name);

            match OpenOptions::new()
                .write(true)
                .create_new(true)
                .open(&path)
                .await
            {
                Ok(file) => return Ok((path, file)),
                Err(e) if e.kind() == ErrorKind::AlreadyExists && attempt < MAX_NAME_ATTEMPTS => {
                    attempt += 1;
                }
                Err(e) => return Err(persist_error(&path, e)),
            }
        }
    }
}

#[async_trait]
impl ArtifactStore for JsonFileStore {
    async fn save(
        &self,
        document: &ScrapedDocument,
        source_url: &Url,
    ) -> Result<Artifact, PersistError> {
        let content = serde_json::to_string_pretty(document)?;

        // A relative directory resolves against the working directory
        let directory = std::path::absolute(&self.directory)
            .map_err(|e| persist_error(&self.directory, e))?;
        fs::create_dir_all(&directory)
            .await
            .map_err(|e| persist_error(&directory, e))?;

        let stem = self.file_stem(source_url, Utc::now().timestamp_millis());
        let (path, mut file) = Self::create_unique(&directory, &stem).await?;

        let written = async {
            file.write_all(content.as_bytes()).await?;
            file.flush().await?;
            file.sync_all().await
        }
        .await;

        if let Err(e) = written {
            drop(file);
            if let Err(cleanup) = fs::remove_file(&path).await {
                tracing::warn!(path = %path.display(), "Failed to remove partial artifact: {}", cleanup);
            }
            return Err(persist_error(&path, e));
        }

        tracing::info!(path = %path.display(), bytes = content.len(), "Artifact written");
        Ok(Artifact { path, content })
    }
}

fn persist_error(path: &Path, err: std::io::Error) -> PersistError {
    PersistError {
        cause: format!("{}: {}", path.display(), err),
    }
}
