//! Folio: a paginating layout engine.
//!
//! Content trees from [`idf`] are laid out by [`layout`] managers that
//! exchange break possibilities, producing an area tree whose page-number
//! citations are resolved as their targets are placed. Resolved pages
//! stream to an area tree model, typically a [`render`] backend.

pub mod config;
pub mod error;
pub mod pipeline;

pub use config::{ExecutorKind, FolioConfig};
pub use error::PipelineError;
pub use pipeline::{DocumentPipeline, LaidOutDocument, OutputFormat, PipelineBuilder, RenderedDocument};

pub use folio_idf as idf;
pub use folio_layout as layout;
pub use folio_render_core as render;
pub use folio_style as style;
pub use folio_traits as traits;
pub use folio_types as types;
