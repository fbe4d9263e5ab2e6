use crate::error::RenderError;
use crate::walker::Point;
use folio_layout::BookmarkEntry;
use folio_layout::area::{BlockArea, InlineArea, LineArea, PageViewport, RegionViewport};

/// A visitor over resolved pages.
///
/// [`crate::render_page`] walks a page and calls these hooks in document
/// order with absolute positions: `x` grows along the inline direction and
/// `y` along the block direction, both from the page's top-left corner.
/// Only `start_page` is required; every other hook defaults to doing
/// nothing.
pub trait Renderer {
    fn start_document(&mut self) -> Result<(), RenderError> {
        Ok(())
    }

    fn start_page_sequence(&mut self, _title: Option<&str>) -> Result<(), RenderError> {
        Ok(())
    }

    fn start_page(&mut self, page: &PageViewport) -> Result<(), RenderError>;

    fn start_region(&mut self, _region: &RegionViewport) -> Result<(), RenderError> {
        Ok(())
    }

    /// `at` is the block's border-box origin.
    fn start_block(&mut self, _block: &BlockArea, _at: Point) -> Result<(), RenderError> {
        Ok(())
    }

    fn end_block(&mut self, _block: &BlockArea) -> Result<(), RenderError> {
        Ok(())
    }

    /// Called before the line's inline areas; `at` is the line's top-left
    /// corner, alignment offset included.
    fn start_line(&mut self, _line: &LineArea, _at: Point) -> Result<(), RenderError> {
        Ok(())
    }

    fn end_line(&mut self, _line: &LineArea) -> Result<(), RenderError> {
        Ok(())
    }

    /// `at.y` is the baseline of the enclosing line. Inline parents are
    /// reported before their children.
    fn render_inline(&mut self, _inline: &InlineArea, _at: Point) -> Result<(), RenderError> {
        Ok(())
    }

    /// Called after the children of an inline parent.
    fn end_inline(&mut self, _inline: &InlineArea) -> Result<(), RenderError> {
        Ok(())
    }

    fn end_region(&mut self, _region: &RegionViewport) -> Result<(), RenderError> {
        Ok(())
    }

    fn end_page(&mut self, _page: &PageViewport) -> Result<(), RenderError> {
        Ok(())
    }

    /// The document outline, once all of its destinations are known.
    fn render_outline(&mut self, _outline: &[BookmarkEntry]) -> Result<(), RenderError> {
        Ok(())
    }

    fn end_document(&mut self) -> Result<(), RenderError> {
        Ok(())
    }
}
