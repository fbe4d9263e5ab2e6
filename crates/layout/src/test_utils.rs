use crate::area::{AreaTree, PageViewport, RegionKind, StorePagesModel};
use crate::break_poss::BreakPoss;
use crate::config::LayoutConfig;
use crate::context::{LayoutContext, LayoutFlags};
use crate::engine::{LayoutEngine, LayoutSummary};
use crate::env::{LayoutEnv, ManagerIds};
use crate::managers::{BlockManager, LayoutManager, Manager};
use crate::style::ComputedStyle;
use folio_idf::{Document, IRNode, InlineNode, NodeMetadata, PageMaster, PageSequence};
use folio_style::PropertyList;
use folio_traits::{FontMetrics, InMemoryImageProvider, StandardFontMetrics};
use folio_types::{Insets, Mpt, SizeRange};
use std::sync::Arc;

pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Width of one Courier character at 10pt.
pub const CHAR: Mpt = 6_000;
/// Line height of 10pt text with `line-height: normal`.
pub const LINE: Mpt = 12_000;

/// Everything a `LayoutEnv` borrows, for driving managers directly.
pub struct TestServices {
    pub fonts: Arc<StandardFontMetrics>,
    pub images: InMemoryImageProvider,
    pub config: LayoutConfig,
    pub ids: ManagerIds,
    pub tree: AreaTree,
}

/// Every remaining break of `manager`, each sought at the top of a fresh
/// page `limit` tall.
pub fn drain(manager: &mut impl LayoutManager, env: &LayoutEnv, limit: Mpt) -> Vec<BreakPoss> {
    let ctx = LayoutContext::new(SizeRange::fixed(limit), 100_000).with_flags(LayoutFlags::AT_AREA_START);
    let mut breaks = Vec::new();
    while !manager.is_finished() {
        breaks.push(manager.get_next_break_poss(&ctx, env).unwrap().into_break().unwrap());
    }
    breaks
}

impl TestServices {
    pub fn new() -> Self {
        let fonts = Arc::new(StandardFontMetrics::new());
        let config = LayoutConfig::default();
        let tree = AreaTree::new(fonts.clone(), &config);
        Self { fonts, images: InMemoryImageProvider::new(), config, ids: ManagerIds::new(), tree }
    }

    pub fn env(&self) -> LayoutEnv<'_> {
        LayoutEnv {
            fonts: self.fonts.as_ref() as &dyn FontMetrics,
            images: &self.images,
            tree: &self.tree,
            page_number: "1",
            config: &self.config,
            ids: &self.ids,
        }
    }

    /// A childless block of the given block-progression-dimension.
    pub fn fixed_block(&self, bpd: SizeRange) -> Manager {
        let style = ComputedStyle { block_progression_dimension: Some(bpd), ..Default::default() };
        Manager::Block(BlockManager::new(self.ids.next(), None, Arc::new(style), Vec::new()))
    }

    pub fn block(&self, style: ComputedStyle, children: Vec<Manager>) -> BlockManager {
        BlockManager::new(self.ids.next(), None, Arc::new(style), children)
    }
}

/// 10pt Courier, so every character is `CHAR` wide.
pub fn courier() -> PropertyList {
    PropertyList::from_pairs([("font-family", "Courier"), ("font-size", "10pt")]).unwrap()
}

pub fn props(pairs: &[(&str, &str)]) -> PropertyList {
    PropertyList::from_pairs(pairs.iter().copied()).unwrap()
}

pub fn paragraph(properties: PropertyList, inlines: Vec<InlineNode>) -> IRNode {
    IRNode::Block {
        meta: NodeMetadata::new(properties),
        children: inlines.into_iter().map(IRNode::Inline).collect(),
    }
}

pub fn text(s: &str) -> InlineNode {
    InlineNode::text(s)
}

/// A page whose body region is `width` by `height`.
pub fn master(width: Mpt, height: Mpt) -> PageMaster {
    PageMaster {
        page_width: width,
        page_height: height,
        margins: Insets::default(),
        ..Default::default()
    }
}

/// A single-sequence document in 10pt Courier.
pub fn document(width: Mpt, height: Mpt, flow: Vec<IRNode>) -> Document {
    Document {
        sequences: vec![PageSequence {
            master: master(width, height),
            properties: courier(),
            flow,
            ..Default::default()
        }],
        ..Default::default()
    }
}

pub fn layout(document: &Document) -> (StorePagesModel, LayoutSummary) {
    init_logging();
    let engine = LayoutEngine::new(
        Arc::new(StandardFontMetrics::new()),
        Arc::new(InMemoryImageProvider::new()),
        LayoutConfig::default(),
    );
    let mut model = StorePagesModel::new();
    let summary = engine.layout_document(document, &mut model).unwrap();
    (model, summary)
}

pub fn body_lines(page: &PageViewport) -> Vec<String> {
    page.lines(RegionKind::Body)
}
