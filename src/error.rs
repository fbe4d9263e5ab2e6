use folio_layout::LayoutError;
use folio_render_core::RenderError;
use folio_style::StyleError;
use folio_traits::{ExecutorError, ResourceError};
use thiserror::Error;

/// A comprehensive error type for the entire layout pipeline.
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("Layout failed: {0}")]
    Layout(#[from] LayoutError),

    #[error("Rendering failed: {0}")]
    Render(#[from] RenderError),

    #[error("Invalid property: {0}")]
    Style(#[from] StyleError),

    #[error("Resource error: {0}")]
    Resource(#[from] ResourceError),

    #[error("Executor failed: {0}")]
    Executor(#[from] ExecutorError),

    #[error("Configuration is invalid: {0}")]
    Config(String),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
