//! The layout core: break-possibility protocol, layout managers, the area
//! tree and deferred resolution of page-number references.

use folio_style::StyleError;
use thiserror::Error;

pub use self::position::{ChildPosition, ManagerId, Position};

#[derive(Error, Debug)]
pub enum LayoutError {
    #[error("Property error: {0}")]
    Style(#[from] StyleError),
    #[error("Break requested from {0} after it finished.")]
    BreakAfterFinished(ManagerId),
    #[error("Re-entrant commit: {0} already holds a working area.")]
    ReentrantCommit(ManagerId),
    #[error("Position {0:?} was already committed.")]
    AlreadyCommitted(Position),
    #[error("Position {0:?} was not issued by this manager.")]
    UnknownPosition(Position),
    #[error("No progress possible: {0}")]
    NoProgress(String),
    #[error("Document exceeds the configured limit of {0} pages.")]
    PageLimitExceeded(usize),
    #[error("Invalid page number format: '{0}'")]
    PageNumberFormat(String),
    #[error("Registry error: {0}")]
    Registry(String),
    #[error("Area tree model error: {0}")]
    Model(String),
}

pub mod area;
pub mod bookmarks;
pub mod break_poss;
pub mod config;
pub mod context;
pub mod engine;
pub mod env;
pub mod managers;
pub mod page_number;
pub mod position;
pub mod resolve;
pub mod style;

pub use self::area::{
    Area, AreaTree, AreaTreeExtension, AreaTreeModel, BlockArea, InlineArea, LineArea,
    PageViewport, StorePagesModel, Trait, TraitValue, Traits,
};
pub use self::bookmarks::{BookmarkEntry, BookmarkTree};
pub use self::break_poss::{BreakFlags, BreakPoss, BreakResult, LineExtent};
pub use self::config::LayoutConfig;
pub use self::context::{LayoutContext, LayoutFlags};
pub use self::engine::{LayoutEngine, LayoutSummary};
pub use self::env::{CommitSink, LayoutEnv};
pub use self::managers::{LayoutManager, Manager};
pub use self::resolve::{NodeId, PageRef, Resolvable, ResolveRegistry};
pub use self::style::ComputedStyle;

#[cfg(test)]
mod resolve_test;
#[cfg(test)]
mod table_test;
#[cfg(test)]
mod test_utils;
