use super::{Area, InlineArea};
use folio_types::{Mpt, Rect};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RegionKind {
    Body,
    Before,
    After,
}

impl RegionKind {
    pub fn name(&self) -> &'static str {
        match self {
            RegionKind::Body => "region-body",
            RegionKind::Before => "region-before",
            RegionKind::After => "region-after",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct RegionReference {
    pub children: Vec<Area>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RegionViewport {
    pub kind: RegionKind,
    /// Position and size on the page, origin at the top-left corner.
    pub rect: Rect,
    pub reference: RegionReference,
}

impl RegionViewport {
    pub fn new(kind: RegionKind, rect: Rect, children: Vec<Area>) -> Self {
        Self { kind, rect, reference: RegionReference { children } }
    }

    /// Extent used by the region's content.
    pub fn content_bpd(&self) -> Mpt {
        self.reference.children.iter().map(Area::allocation_bpd).sum()
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Page {
    pub regions: Vec<RegionViewport>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PageViewport {
    /// Zero-based position in the document.
    pub index: usize,
    /// The formatted page number.
    pub number: String,
    /// Index of the page sequence the page belongs to.
    pub sequence: usize,
    pub width: Mpt,
    pub height: Mpt,
    /// The page content. `None` once released by a tree that does not
    /// retain pages.
    pub page: Option<Page>,
    /// True once no citation on the page waits for a target.
    pub resolved: bool,
}

impl PageViewport {
    pub fn region(&self, kind: RegionKind) -> Option<&RegionViewport> {
        self.page.as_ref()?.regions.iter().find(|r| r.kind == kind)
    }

    pub fn citation_mut(&mut self, slot: u32) -> Option<&mut InlineArea> {
        self.page
            .as_mut()?
            .regions
            .iter_mut()
            .flat_map(|r| r.reference.children.iter_mut())
            .find_map(|a| a.citation_mut(slot))
    }

    /// Text of every line in a region, in document order.
    pub fn lines(&self, kind: RegionKind) -> Vec<String> {
        let mut out = Vec::new();
        if let Some(region) = self.region(kind) {
            for area in &region.reference.children {
                collect_lines(area, &mut out);
            }
        }
        out
    }
}

fn collect_lines(area: &Area, out: &mut Vec<String>) {
    match area {
        Area::Block(block) => {
            for child in &block.children {
                collect_lines(child, out);
            }
        }
        Area::Line(line) => out.push(line.text()),
        Area::Inline(_) => {}
    }
}
