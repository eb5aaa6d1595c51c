//! Artifact store trait and types
//!
//! This module defines the trait interface for persisting scraped documents
//! and the record describing a written artifact.

use crate::pipeline::ScrapedDocument;
use crate::PersistError;
use async_trait::async_trait;
use std::path::PathBuf;
use url::Url;

/// A persisted scrape result
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    /// Where the artifact was written
    pub path: PathBuf,

    /// The serialized document exactly as written
    pub content: String,
}

impl Artifact {
    /// The final path component, or the full path if it has none
    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.path.display().to_string())
    }
}

/// Trait for artifact stores
///
/// A store writes each document to a fresh location and never overwrites or
/// reads back earlier artifacts. Implementations must be thread-safe.
#[async_trait]
pub trait ArtifactStore: Send + Sync {
    /// Serializes and writes a document
    ///
    /// # Arguments
    ///
    /// * `document` - The extracted document
    /// * `source_url` - The URL the document was scraped from
    ///
    /// # Returns
    ///
    /// * `Ok(Artifact)` - The document was fully written
    /// * `Err(PersistError)` - Nothing valid was written
    async fn save(
        &self,
        document: &ScrapedDocument,
        source_url: &Url,
    ) -> Result<Artifact, PersistError>;
}
