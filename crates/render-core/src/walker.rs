//! Positions areas for a [`Renderer`].

use crate::error::RenderError;
use crate::traits::Renderer;
use folio_layout::area::{Area, BlockArea, InlineArea, LineArea, PageViewport, Stacking};
use folio_types::Mpt;

/// An absolute position on the page in millipoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Point {
    pub x: Mpt,
    pub y: Mpt,
}

impl Point {
    pub fn new(x: Mpt, y: Mpt) -> Self {
        Self { x, y }
    }
}

/// Walks one page, calling the renderer's hooks in document order.
///
/// Pages released by a tree that does not retain content only produce
/// `start_page` and `end_page`.
pub fn render_page<R: Renderer + ?Sized>(renderer: &mut R, page: &PageViewport) -> Result<(), RenderError> {
    renderer.start_page(page)?;
    if let Some(content) = &page.page {
        for region in &content.regions {
            renderer.start_region(region)?;
            let origin = Point::new(region.rect.x, region.rect.y);
            stack_blocks(renderer, &region.reference.children, origin, Stacking::Block)?;
            renderer.end_region(region)?;
        }
    }
    renderer.end_page(page)
}

/// Places `areas` inside a content rectangle whose top-left corner is
/// `origin`.
fn stack_blocks<R: Renderer + ?Sized>(
    renderer: &mut R,
    areas: &[Area],
    origin: Point,
    stacking: Stacking,
) -> Result<(), RenderError> {
    let mut y = origin.y;
    for area in areas {
        match area {
            Area::Block(block) => {
                let at = Point::new(origin.x + block.start_offset, y + block.space_before);
                render_block(renderer, block, at)?;
            }
            Area::Line(line) => render_line(renderer, line, Point::new(origin.x + line.start_offset, y))?,
            Area::Inline(inline) => render_inline(renderer, inline, Point::new(origin.x, y))?,
        }
        if stacking == Stacking::Block {
            y += area.allocation_bpd();
        }
    }
    Ok(())
}

fn render_block<R: Renderer + ?Sized>(renderer: &mut R, block: &BlockArea, at: Point) -> Result<(), RenderError> {
    renderer.start_block(block, at)?;
    let (dx, dy) = block.content_origin();
    stack_blocks(renderer, &block.children, Point::new(at.x + dx, at.y + dy), block.stacking)?;
    renderer.end_block(block)
}

fn render_line<R: Renderer + ?Sized>(renderer: &mut R, line: &LineArea, at: Point) -> Result<(), RenderError> {
    renderer.start_line(line, at)?;
    let mut x = at.x;
    let baseline = at.y + line.baseline;
    for inline in &line.children {
        render_inline(renderer, inline, Point::new(x, baseline))?;
        x += inline.ipd();
    }
    renderer.end_line(line)
}

fn render_inline<R: Renderer + ?Sized>(renderer: &mut R, inline: &InlineArea, at: Point) -> Result<(), RenderError> {
    renderer.render_inline(inline, at)?;
    if let InlineArea::Parent { children, .. } = inline {
        let mut x = at.x;
        for child in children {
            render_inline(renderer, child, Point::new(x, at.y))?;
            x += child.ipd();
        }
        renderer.end_inline(inline)?;
    }
    Ok(())
}
