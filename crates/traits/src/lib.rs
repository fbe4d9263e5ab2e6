//! Narrow interfaces to the subsystems the layout engine depends on but
//! does not implement: font metrics, image intrinsic sizes, and executors
//! for batches of independent documents.

pub mod executor;
pub mod font;
pub mod resource;

pub use executor::{Executor, ExecutorError, SyncExecutor};
pub use font::{FontDescriptor, FontMetrics, StandardFontMetrics};
pub use resource::{ImageProvider, ImageSize, InMemoryImageProvider, ResourceError};
