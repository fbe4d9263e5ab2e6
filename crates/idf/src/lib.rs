//! Intermediate Document Format (IDF)
//!
//! The in-memory content tree handed to the layout engine: a document made
//! of page sequences whose flows hold block-level and inline-level nodes,
//! each carrying already-typed properties. Producing this tree (parsing
//! markup, running templates) happens elsewhere.

use folio_style::PropertyList;
use folio_types::{AnchorId, Insets, Mpt, ResourceUri, pt};

/// A string type for document text.
pub type TextStr = String;

/// Identity and specified properties shared by every formatting object.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct NodeMetadata {
    pub id: Option<AnchorId>,
    pub properties: PropertyList,
}

impl NodeMetadata {
    pub fn new(properties: PropertyList) -> Self {
        Self { id: None, properties }
    }

    pub fn with_id(mut self, id: impl Into<AnchorId>) -> Self {
        self.id = Some(id.into());
        self
    }
}

// --- Document structure ---

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Document {
    pub title: Option<TextStr>,
    pub sequences: Vec<PageSequence>,
    /// Outline entries pointing at ids inside the flows.
    pub bookmarks: Vec<Bookmark>,
}

/// Geometry of the pages of one sequence.
#[derive(Debug, Clone, PartialEq)]
pub struct PageMaster {
    pub name: TextStr,
    pub page_width: Mpt,
    pub page_height: Mpt,
    /// Distance from the page edges to the content rectangle.
    pub margins: Insets,
    /// Distance from the content rectangle to region-body.
    pub body_margins: Insets,
    /// Extent of region-before, measured from the top of the content rectangle.
    pub before_extent: Mpt,
    /// Extent of region-after, measured from the bottom of the content rectangle.
    pub after_extent: Mpt,
}

impl Default for PageMaster {
    /// A4 with 1in margins and no static regions.
    fn default() -> Self {
        Self {
            name: "default".to_string(),
            page_width: pt(595.0),
            page_height: pt(842.0),
            margins: Insets::uniform(pt(72.0)),
            body_margins: Insets::default(),
            before_extent: 0,
            after_extent: 0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct PageSequence {
    pub title: Option<TextStr>,
    pub master: PageMaster,
    /// First page number; continues from the previous sequence when `None`.
    pub initial_page_number: Option<usize>,
    /// Number format token (`1`, `01`, `i`, `I`, `a`, `A`). Empty means `1`.
    pub format: TextStr,
    /// Inheritable properties applied to all content of the sequence.
    pub properties: PropertyList,
    pub flow: Vec<IRNode>,
    pub region_before: Vec<IRNode>,
    pub region_after: Vec<IRNode>,
}

impl PageSequence {
    pub fn new(flow: Vec<IRNode>) -> Self {
        Self { flow, ..Default::default() }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Bookmark {
    pub title: TextStr,
    pub destination: AnchorId,
    pub children: Vec<Bookmark>,
}

impl Bookmark {
    pub fn new(title: impl Into<TextStr>, destination: impl Into<AnchorId>) -> Self {
        Self { title: title.into(), destination: destination.into(), children: Vec::new() }
    }

    pub fn with_children(mut self, children: Vec<Bookmark>) -> Self {
        self.children = children;
        self
    }
}

// --- Main Node Enums ---

/// A node that appears in a flow or block container.
#[derive(Debug, Clone, PartialEq)]
pub enum IRNode {
    /// A block container; children may mix block-level and inline-level nodes.
    Block {
        meta: NodeMetadata,
        children: Vec<IRNode>,
    },
    /// Inline-level content placed directly in a block.
    Inline(InlineNode),
    List {
        meta: NodeMetadata,
        items: Vec<ListItem>,
    },
    Table(Box<TableNode>),
}

impl IRNode {
    pub fn block(children: Vec<IRNode>) -> Self {
        IRNode::Block { meta: NodeMetadata::default(), children }
    }

    pub fn styled_block(properties: PropertyList, children: Vec<IRNode>) -> Self {
        IRNode::Block { meta: NodeMetadata::new(properties), children }
    }

    /// A block holding a single run of text.
    pub fn paragraph(text: impl Into<TextStr>) -> Self {
        IRNode::block(vec![IRNode::Inline(InlineNode::Text(text.into()))])
    }

    pub fn is_inline(&self) -> bool {
        matches!(self, IRNode::Inline(_))
    }

    pub fn meta(&self) -> Option<&NodeMetadata> {
        match self {
            IRNode::Block { meta, .. } | IRNode::List { meta, .. } => Some(meta),
            IRNode::Table(table) => Some(&table.meta),
            IRNode::Inline(inline) => inline.meta(),
        }
    }

    pub fn meta_mut(&mut self) -> Option<&mut NodeMetadata> {
        match self {
            IRNode::Block { meta, .. } | IRNode::List { meta, .. } => Some(meta),
            IRNode::Table(table) => Some(&mut table.meta),
            IRNode::Inline(inline) => inline.meta_mut(),
        }
    }

    /// Sets the node's id; nodes without metadata are returned unchanged.
    pub fn with_id(mut self, id: impl Into<AnchorId>) -> Self {
        if let Some(meta) = self.meta_mut() {
            meta.id = Some(id.into());
        }
        self
    }

    pub fn kind(&self) -> &'static str {
        match self {
            IRNode::Block { .. } => "block",
            IRNode::Inline(inline) => inline.kind(),
            IRNode::List { .. } => "list-block",
            IRNode::Table(_) => "table",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum LinkDestination {
    Internal(AnchorId),
    External(TextStr),
}

/// Inline-level content.
#[derive(Debug, Clone, PartialEq)]
pub enum InlineNode {
    /// A run of character data.
    Text(TextStr),
    /// `fo:inline`: a styled container.
    Inline {
        meta: NodeMetadata,
        children: Vec<InlineNode>,
    },
    /// `fo:basic-link`.
    Link {
        meta: NodeMetadata,
        destination: LinkDestination,
        children: Vec<InlineNode>,
    },
    /// The number of the page the node lands on.
    PageNumber { meta: NodeMetadata },
    /// The number of the page holding the first area of `ref_id`.
    PageNumberCitation { meta: NodeMetadata, ref_id: AnchorId },
    Leader { meta: NodeMetadata },
    ExternalGraphic { meta: NodeMetadata, src: ResourceUri },
    /// A forced line break.
    LineBreak,
}

impl InlineNode {
    pub fn text(text: impl Into<TextStr>) -> Self {
        InlineNode::Text(text.into())
    }

    pub fn citation(ref_id: impl Into<AnchorId>) -> Self {
        InlineNode::PageNumberCitation { meta: NodeMetadata::default(), ref_id: ref_id.into() }
    }

    pub fn page_number() -> Self {
        InlineNode::PageNumber { meta: NodeMetadata::default() }
    }

    pub fn meta(&self) -> Option<&NodeMetadata> {
        match self {
            InlineNode::Inline { meta, .. }
            | InlineNode::Link { meta, .. }
            | InlineNode::PageNumber { meta }
            | InlineNode::PageNumberCitation { meta, .. }
            | InlineNode::Leader { meta }
            | InlineNode::ExternalGraphic { meta, .. } => Some(meta),
            InlineNode::Text(_) | InlineNode::LineBreak => None,
        }
    }

    pub fn meta_mut(&mut self) -> Option<&mut NodeMetadata> {
        match self {
            InlineNode::Inline { meta, .. }
            | InlineNode::Link { meta, .. }
            | InlineNode::PageNumber { meta }
            | InlineNode::PageNumberCitation { meta, .. }
            | InlineNode::Leader { meta }
            | InlineNode::ExternalGraphic { meta, .. } => Some(meta),
            InlineNode::Text(_) | InlineNode::LineBreak => None,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            InlineNode::Text(_) => "text",
            InlineNode::Inline { .. } => "inline",
            InlineNode::Link { .. } => "basic-link",
            InlineNode::PageNumber { .. } => "page-number",
            InlineNode::PageNumberCitation { .. } => "page-number-citation",
            InlineNode::Leader { .. } => "leader",
            InlineNode::ExternalGraphic { .. } => "external-graphic",
            InlineNode::LineBreak => "line-break",
        }
    }
}

// --- List-specific Structures ---

#[derive(Debug, Clone, PartialEq, Default)]
pub struct ListItem {
    pub meta: NodeMetadata,
    pub label: Vec<IRNode>,
    pub body: Vec<IRNode>,
}

impl ListItem {
    pub fn new(label: Vec<IRNode>, body: Vec<IRNode>) -> Self {
        Self { meta: NodeMetadata::default(), label, body }
    }
}

// --- Table-specific Structures ---

#[derive(Debug, Clone, PartialEq)]
pub enum ColumnWidth {
    Fixed(Mpt),
    /// A share of the width left after fixed columns (`proportional-column-width(n)`).
    Proportional(f32),
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct TableNode {
    pub meta: NodeMetadata,
    pub columns: Vec<ColumnWidth>,
    /// Rows repeated at the top of every page the table spans.
    pub header: Vec<TableRow>,
    pub body: Vec<TableRow>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct TableRow {
    pub meta: NodeMetadata,
    pub cells: Vec<TableCell>,
}

impl TableRow {
    pub fn new(cells: Vec<TableCell>) -> Self {
        Self { meta: NodeMetadata::default(), cells }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct TableCell {
    pub meta: NodeMetadata,
    pub children: Vec<IRNode>,
}

impl TableCell {
    pub fn new(children: Vec<IRNode>) -> Self {
        Self { meta: NodeMetadata::default(), children }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inline_classification() {
        assert!(IRNode::Inline(InlineNode::text("x")).is_inline());
        assert!(!IRNode::paragraph("x").is_inline());
        assert_eq!(IRNode::Inline(InlineNode::citation("a")).kind(), "page-number-citation");
    }

    #[test]
    fn test_with_id_sets_metadata() {
        let node = IRNode::paragraph("hello").with_id("intro");
        assert_eq!(node.meta().and_then(|m| m.id.as_ref()).map(AnchorId::as_str), Some("intro"));

        let text = IRNode::Inline(InlineNode::text("plain")).with_id("ignored");
        assert!(text.meta().is_none());
    }
}
