//! Pagination of one page sequence: fills region-body from the flow page
//! by page and formats the static regions for each page.

use super::builder::ManagerBuilder;
use super::flow::FlowManager;
use super::LayoutManager;
use crate::LayoutError;
use crate::area::{Area, AreaTree, AreaTreeModel, Page, PageViewport, RegionKind, RegionViewport};
use crate::break_poss::BreakResult;
use crate::config::LayoutConfig;
use crate::context::{LayoutContext, LayoutFlags};
use crate::env::{CommitSink, LayoutEnv, ManagerIds};
use crate::page_number::NumberFormat;
use crate::style::ComputedStyle;
use folio_idf::{IRNode, PageMaster, PageSequence};
use folio_traits::{FontMetrics, ImageProvider};
use folio_types::{Rect, SizeRange};
use log::{debug, info, warn};
use std::sync::Arc;

/// Services a page sequence is laid out with.
#[derive(Clone, Copy)]
pub struct SequenceServices<'a> {
    pub fonts: &'a dyn FontMetrics,
    pub images: &'a dyn ImageProvider,
    pub config: &'a LayoutConfig,
    pub ids: &'a ManagerIds,
}

/// Page and region rectangles derived from a page master.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageGeometry {
    pub body: Rect,
    pub before: Rect,
    pub after: Rect,
}

impl PageGeometry {
    pub fn from_master(master: &PageMaster) -> Self {
        let page = Rect::new(0, 0, master.page_width, master.page_height);
        let content = page.inset(&master.margins);
        Self {
            body: content.inset(&master.body_margins),
            before: Rect::new(content.x, content.y, content.width, master.before_extent),
            after: Rect::new(content.x, content.bottom() - master.after_extent, content.width, master.after_extent),
        }
    }
}

pub struct PageSequenceLayout<'a> {
    sequence: &'a PageSequence,
    index: usize,
    style: Arc<ComputedStyle>,
    format: NumberFormat,
    geometry: PageGeometry,
}

impl<'a> PageSequenceLayout<'a> {
    pub fn new(sequence: &'a PageSequence, index: usize, root: &Arc<ComputedStyle>) -> Result<Self, LayoutError> {
        let style = Arc::new(ComputedStyle::compute(&sequence.properties, root)?);
        Ok(Self {
            sequence,
            index,
            style,
            format: NumberFormat::parse(&sequence.format)?,
            geometry: PageGeometry::from_master(&sequence.master),
        })
    }

    /// Lays out the sequence starting at page number `first_number`.
    /// Returns the number of pages produced; there is always at least one.
    pub fn run(
        &self,
        first_number: usize,
        services: SequenceServices,
        tree: &mut AreaTree,
        model: &mut dyn AreaTreeModel,
    ) -> Result<usize, LayoutError> {
        let builder = ManagerBuilder::new(services.fonts, services.ids);
        let mut flow = builder.flow(&self.sequence.flow, &self.style)?;
        tree.start_page_sequence(self.sequence.title.as_deref());
        info!(
            "Laying out page sequence {} ('{}') from page {}",
            self.index,
            self.sequence.master.name,
            self.format.format(first_number)
        );

        let mut pages = 0;
        loop {
            if tree.page_count() >= services.config.max_pages {
                return Err(LayoutError::PageLimitExceeded(services.config.max_pages));
            }
            let number = self.format.format(first_number + pages);
            let mut sink = CommitSink::new();
            let page = self.layout_page(&mut flow, &builder, &number, services, tree, &mut sink)?;
            tree.add_page(page, &mut sink, model)?;
            pages += 1;
            if flow.is_finished() {
                break;
            }
        }
        debug!("Page sequence {} produced {} pages", self.index, pages);
        Ok(pages)
    }

    fn layout_page(
        &self,
        flow: &mut FlowManager,
        builder: &ManagerBuilder,
        number: &str,
        services: SequenceServices,
        tree: &AreaTree,
        sink: &mut CommitSink,
    ) -> Result<PageViewport, LayoutError> {
        let env = LayoutEnv {
            fonts: services.fonts,
            images: services.images,
            tree,
            page_number: number,
            config: services.config,
            ids: services.ids,
        };
        let body = self.geometry.body;
        let ctx = LayoutContext::new(SizeRange::fixed(body.height), body.width).with_flags(LayoutFlags::AT_AREA_START);
        let body_areas = if flow.is_finished() {
            Vec::new()
        } else {
            match flow.get_next_break_poss(&ctx, &env)? {
                BreakResult::Break(bp) => flow.add_areas(&[bp.position], &ctx, &env, sink)?,
                BreakResult::Exhausted => Vec::new(),
                BreakResult::NoFit => {
                    return Err(LayoutError::NoProgress(format!(
                        "nothing of the flow fits an empty body region on page {}",
                        number
                    )));
                }
            }
        };

        let mut regions = vec![RegionViewport::new(RegionKind::Body, body, body_areas)];
        for (kind, content, rect) in [
            (RegionKind::Before, &self.sequence.region_before, self.geometry.before),
            (RegionKind::After, &self.sequence.region_after, self.geometry.after),
        ] {
            if content.is_empty() {
                continue;
            }
            let areas = self.static_region(content, rect, builder, &env, sink)?;
            regions.push(RegionViewport::new(kind, rect, areas));
        }

        Ok(PageViewport {
            index: tree.page_count(),
            number: number.to_string(),
            sequence: self.index,
            width: self.sequence.master.page_width,
            height: self.sequence.master.page_height,
            page: Some(Page { regions }),
            resolved: false,
        })
    }

    /// Static content is rebuilt for every page, so page numbers in it
    /// show the page it is placed on.
    fn static_region(
        &self,
        content: &[IRNode],
        rect: Rect,
        builder: &ManagerBuilder,
        env: &LayoutEnv,
        sink: &mut CommitSink,
    ) -> Result<Vec<Area>, LayoutError> {
        let mut flow = builder.flow(content, &self.style)?;
        let ctx = LayoutContext::new(SizeRange::unbounded(), rect.width).with_flags(LayoutFlags::AT_AREA_START);
        let mut positions = Vec::new();
        while !flow.is_finished() {
            match flow.get_next_break_poss(&ctx, env)? {
                BreakResult::Break(bp) => positions.push(bp.position),
                BreakResult::NoFit | BreakResult::Exhausted => break,
            }
        }
        let areas = flow.add_areas(&positions, &ctx, env, sink)?;
        let used: i32 = areas.iter().map(Area::allocation_bpd).sum();
        if used > rect.height {
            warn!("Static content of {} overflows its region of height {}", used, rect.height);
        }
        Ok(areas)
    }
}
