use crate::error::PipelineError;
use folio_layout::LayoutConfig;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Selects how batches of documents are processed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExecutorKind {
    /// One document after the other on the calling thread.
    Sync,
    /// Rayon's work-stealing pool. Requires the `rayon-executor` feature.
    #[default]
    Rayon,
}

/// Top-level configuration: layout tunables plus the batch executor.
///
/// ```json
/// {
///   "layout": { "unresolvedPlaceholder": "??", "maxPages": 500 },
///   "executor": "rayon",
///   "threads": 4
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FolioConfig {
    pub layout: LayoutConfig,
    pub executor: ExecutorKind,
    /// Size of a dedicated rayon pool. `None` uses the global pool.
    pub threads: Option<usize>,
}

impl FolioConfig {
    pub fn from_json_str(json: &str) -> Result<Self, PipelineError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, PipelineError> {
        let path = path.as_ref();
        let source = fs::read_to_string(path).map_err(|e| {
            PipelineError::Io(std::io::Error::new(
                e.kind(),
                format!("Failed to read config from '{}': {}", path.display(), e),
            ))
        })?;
        Self::from_json_str(&source)
    }
}
