//! Consumers of finished pages.

use super::PageViewport;
use crate::LayoutError;
use crate::bookmarks::{BookmarkEntry, BookmarkTree};
use crate::resolve::Resolvable;
use std::any::Any;
use std::fmt::Debug;

/// Non-standard content attached to the area tree. The tree resolves its
/// ids without knowing its concrete type; consumers downcast through
/// `as_any`.
pub trait AreaTreeExtension: Resolvable + Debug + Send {
    fn name(&self) -> &str;

    fn as_any(&self) -> &dyn Any;
}

/// Receives pages in document order once they are fully resolved.
pub trait AreaTreeModel {
    fn start_page_sequence(&mut self, title: Option<&str>) -> Result<(), LayoutError>;

    fn add_page(&mut self, page: &PageViewport) -> Result<(), LayoutError>;

    /// Called once per extension, after all of its ids were resolved.
    fn add_extension(&mut self, extension: &dyn AreaTreeExtension) -> Result<(), LayoutError>;

    fn end_document(&mut self) -> Result<(), LayoutError>;
}

/// Keeps every page handed to it.
#[derive(Debug, Default)]
pub struct StorePagesModel {
    pub pages: Vec<PageViewport>,
    pub sequences: Vec<Option<String>>,
    pub extensions: Vec<String>,
    /// The outline, once the bookmark extension was delivered.
    pub outline: Vec<BookmarkEntry>,
    pub finished: bool,
}

impl StorePagesModel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }
}

impl AreaTreeModel for StorePagesModel {
    fn start_page_sequence(&mut self, title: Option<&str>) -> Result<(), LayoutError> {
        self.sequences.push(title.map(str::to_string));
        Ok(())
    }

    fn add_page(&mut self, page: &PageViewport) -> Result<(), LayoutError> {
        self.pages.push(page.clone());
        Ok(())
    }

    fn add_extension(&mut self, extension: &dyn AreaTreeExtension) -> Result<(), LayoutError> {
        self.extensions.push(extension.name().to_string());
        if let Some(bookmarks) = extension.as_any().downcast_ref::<BookmarkTree>() {
            self.outline = bookmarks.outline();
        }
        Ok(())
    }

    fn end_document(&mut self) -> Result<(), LayoutError> {
        if self.finished {
            return Err(LayoutError::Model("document already ended".to_string()));
        }
        self.finished = true;
        Ok(())
    }
}
