//! The area tree: the paginated geometric result of layout.
//!
//! `PageViewport → Page → RegionViewport → RegionReference → Area`, where
//! areas are blocks (stacked in the block-progression direction or side by
//! side), lines and inline areas.

pub mod model;
pub mod page;
pub mod traits;
pub mod tree;

pub use self::model::{AreaTreeExtension, AreaTreeModel, StorePagesModel};
pub use self::page::{Page, PageViewport, RegionKind, RegionReference, RegionViewport};
pub use self::traits::{Trait, TraitValue, Traits};
pub use self::tree::AreaTree;

use folio_style::LeaderPattern;
use folio_traits::FontDescriptor;
use folio_types::{AnchorId, Color, Mpt, ResourceUri};

#[derive(Debug, Clone, PartialEq)]
pub enum Area {
    Block(BlockArea),
    Line(LineArea),
    Inline(InlineArea),
}

impl Area {
    /// Extent along the block-progression direction, including spaces.
    pub fn allocation_bpd(&self) -> Mpt {
        match self {
            Area::Block(b) => b.space_before + b.bpd + b.space_after,
            Area::Line(l) => l.bpd,
            Area::Inline(i) => i.bpd(),
        }
    }

    pub fn ipd(&self) -> Mpt {
        match self {
            Area::Block(b) => b.ipd,
            Area::Line(l) => l.ipd,
            Area::Inline(i) => i.ipd(),
        }
    }

    /// Finds the citation with the given slot anywhere below this area.
    pub fn citation_mut(&mut self, slot: u32) -> Option<&mut InlineArea> {
        match self {
            Area::Block(b) => b.children.iter_mut().find_map(|c| c.citation_mut(slot)),
            Area::Line(l) => l.children.iter_mut().find_map(|c| c.citation_mut(slot)),
            Area::Inline(i) => i.citation_mut(slot),
        }
    }
}

/// How a block's children are placed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Stacking {
    /// One after another in the block-progression direction.
    #[default]
    Block,
    /// All at the same block position, each at its own start offset
    /// (list item label and body, table cells).
    Inline,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct BlockArea {
    /// Width including padding and borders.
    pub ipd: Mpt,
    /// Height including padding and borders, excluding spaces.
    pub bpd: Mpt,
    /// Offset of the border edge from the parent's content start edge.
    pub start_offset: Mpt,
    pub space_before: Mpt,
    pub space_after: Mpt,
    pub stacking: Stacking,
    pub traits: Traits,
    pub children: Vec<Area>,
}

impl BlockArea {
    pub fn content_bpd(&self) -> Mpt {
        match self.stacking {
            Stacking::Block => self.children.iter().map(Area::allocation_bpd).sum(),
            Stacking::Inline => self.children.iter().map(Area::allocation_bpd).max().unwrap_or(0),
        }
    }

    /// Offset of the content rectangle from the border edge, inline then block.
    pub fn content_origin(&self) -> (Mpt, Mpt) {
        (
            self.traits.length(Trait::BorderStart) + self.traits.length(Trait::PaddingStart),
            self.traits.length(Trait::BorderBefore) + self.traits.length(Trait::PaddingBefore),
        )
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct LineArea {
    /// Sum of the inline areas' widths.
    pub ipd: Mpt,
    pub bpd: Mpt,
    /// Distance from the top of the line to the baseline.
    pub baseline: Mpt,
    /// Indent plus alignment offset.
    pub start_offset: Mpt,
    pub children: Vec<InlineArea>,
}

impl LineArea {
    /// Concatenated text of the line, spaces included.
    pub fn text(&self) -> String {
        let mut out = String::new();
        for child in &self.children {
            child.collect_text(&mut out);
        }
        out
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum InlineArea {
    Word {
        text: String,
        ipd: Mpt,
        font: FontDescriptor,
        color: Color,
    },
    Space {
        ipd: Mpt,
    },
    Leader {
        ipd: Mpt,
        pattern: LeaderPattern,
        thickness: Mpt,
        color: Color,
    },
    /// An image.
    Viewport {
        ipd: Mpt,
        bpd: Mpt,
        src: ResourceUri,
    },
    /// `fo:inline` / `fo:basic-link`.
    Parent {
        ipd: Mpt,
        traits: Traits,
        children: Vec<InlineArea>,
    },
    /// A page-number citation. Text and width are back-filled once the
    /// cited id is located; `slot` identifies the area until then.
    Citation {
        ref_id: AnchorId,
        slot: u32,
        text: String,
        ipd: Mpt,
        font: FontDescriptor,
        color: Color,
        resolved: bool,
    },
}

impl InlineArea {
    pub fn ipd(&self) -> Mpt {
        match self {
            InlineArea::Word { ipd, .. }
            | InlineArea::Space { ipd }
            | InlineArea::Leader { ipd, .. }
            | InlineArea::Viewport { ipd, .. }
            | InlineArea::Parent { ipd, .. }
            | InlineArea::Citation { ipd, .. } => *ipd,
        }
    }

    pub fn bpd(&self) -> Mpt {
        match self {
            InlineArea::Viewport { bpd, .. } => *bpd,
            _ => 0,
        }
    }

    fn citation_mut(&mut self, wanted: u32) -> Option<&mut InlineArea> {
        if matches!(self, InlineArea::Citation { slot, resolved: false, .. } if *slot == wanted) {
            return Some(self);
        }
        match self {
            InlineArea::Parent { children, .. } => {
                children.iter_mut().find_map(|c| c.citation_mut(wanted))
            }
            _ => None,
        }
    }

    fn collect_text(&self, out: &mut String) {
        match self {
            InlineArea::Word { text, .. } | InlineArea::Citation { text, .. } => out.push_str(text),
            InlineArea::Space { .. } => out.push(' '),
            InlineArea::Leader { pattern, .. } => out.push_str(match pattern {
                LeaderPattern::Dots => "...",
                LeaderPattern::Rule => "___",
                LeaderPattern::Space => "   ",
            }),
            InlineArea::Viewport { .. } => out.push_str("[image]"),
            InlineArea::Parent { children, .. } => {
                for child in children {
                    child.collect_text(out);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn word(text: &str, ipd: Mpt) -> InlineArea {
        InlineArea::Word {
            text: text.to_string(),
            ipd,
            font: FontDescriptor::new("Helvetica", 10_000),
            color: Color::BLACK,
        }
    }

    #[test]
    fn test_content_bpd_by_stacking() {
        let line = |h| Area::Line(LineArea { bpd: h, ..Default::default() });
        let mut block = BlockArea { children: vec![line(10), line(20)], ..Default::default() };
        assert_eq!(block.content_bpd(), 30);
        block.stacking = Stacking::Inline;
        assert_eq!(block.content_bpd(), 20);
    }

    #[test]
    fn test_citation_lookup_through_inline_parents() {
        let citation = InlineArea::Citation {
            ref_id: "x".into(),
            slot: 3,
            text: "?".into(),
            ipd: 500,
            font: FontDescriptor::new("Helvetica", 10_000),
            color: Color::BLACK,
            resolved: false,
        };
        let parent = InlineArea::Parent { ipd: 0, traits: Traits::new(), children: vec![word("see", 10), citation] };
        let mut area = Area::Line(LineArea { children: vec![parent], ..Default::default() });
        assert!(area.citation_mut(3).is_some());
        assert!(area.citation_mut(4).is_none());
        if let Area::Line(line) = &area {
            assert_eq!(line.text(), "see?");
        }
    }
}
