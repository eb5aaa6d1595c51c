//! Output module for persisting scrape results
//!
//! This module handles:
//! - The `ArtifactStore` interface the pipeline writes through
//! - Writing documents as uniquely named JSON files

mod json_file;
mod traits;

pub use json_file::JsonFileStore;
pub use traits::{Artifact, ArtifactStore};
