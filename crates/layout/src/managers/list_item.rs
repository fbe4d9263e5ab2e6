//! `fo:list-item`: a label and a body placed side by side.
//!
//! The label occupies `provisional-distance-between-starts` minus
//! `provisional-label-separation` from the start edge; the body starts at
//! `provisional-distance-between-starts`.

use super::regions::{RegionGeometry, SideBySide};
use super::{CommitState, LayoutManager, Manager};
use crate::LayoutError;
use crate::area::{Area, BlockArea, Stacking, Trait, TraitValue};
use crate::break_poss::{BreakFlags, BreakPoss, BreakResult};
use crate::context::LayoutContext;
use crate::env::{CommitSink, LayoutEnv};
use crate::position::{ManagerId, Position};
use crate::style::ComputedStyle;
use folio_style::BreakKind;
use folio_types::{AnchorId, Mpt, SizeRange};
use log::{debug, warn};
use std::sync::Arc;

const LABEL: usize = 0;
const BODY: usize = 1;

#[derive(Debug, Clone)]
struct ItemRecord {
    regions: usize,
    space_before: Mpt,
}

#[derive(Debug)]
pub struct ListItemManager {
    id: ManagerId,
    node_id: Option<AnchorId>,
    style: Arc<ComputedStyle>,
    regions: SideBySide,
    records: Vec<ItemRecord>,
    commit: CommitState,
}

impl ListItemManager {
    pub fn new(
        id: ManagerId,
        node_id: Option<AnchorId>,
        style: Arc<ComputedStyle>,
        label: Vec<Manager>,
        body: Vec<Manager>,
    ) -> Self {
        Self {
            id,
            node_id,
            style,
            regions: SideBySide::new(id, vec![label, body]),
            records: Vec::new(),
            commit: CommitState::default(),
        }
    }

    pub fn breaks_before(&self) -> bool {
        self.records.is_empty() && (self.style.break_before == BreakKind::Page || self.regions.breaks_before())
    }

    fn content_ipd(&self, ref_ipd: Mpt) -> Mpt {
        ref_ipd - self.style.inline_frame()
    }

    fn geometry(&self, ref_ipd: Mpt) -> [RegionGeometry; 2] {
        let content = self.content_ipd(ref_ipd);
        let distance = self.style.provisional_distance_between_starts;
        let separation = self.style.provisional_label_separation;
        [
            RegionGeometry { offset: 0, ipd: (distance - separation).max(0), ..Default::default() },
            RegionGeometry { offset: distance, ipd: (content - distance).max(0), ..Default::default() },
        ]
    }
}

impl LayoutManager for ListItemManager {
    fn id(&self) -> ManagerId {
        self.id
    }

    fn get_next_break_poss(
        &mut self,
        ctx: &LayoutContext,
        env: &LayoutEnv,
    ) -> Result<BreakResult, LayoutError> {
        if self.is_finished() {
            return Err(LayoutError::BreakAfterFinished(self.id));
        }
        let style = self.style.clone();
        let first = self.records.is_empty();
        let space_before = if first && !ctx.at_area_start() { style.space_before } else { SizeRange::ZERO };
        let leading = space_before + SizeRange::fixed(if first { style.frame_before() } else { 0 });
        let trailing = SizeRange::fixed(style.frame_after()) + style.space_after;

        let region_ctx = ctx.with_limit(ctx.stack_limit - leading - trailing);
        let geometry = self.geometry(ctx.ref_ipd);
        let Some(index) = self.regions.fill(&region_ctx, env, &geometry)? else {
            return Ok(BreakResult::NoFit);
        };
        let record = self.regions.record(index);

        let mut flags = BreakFlags::empty();
        flags.set(BreakFlags::IS_FIRST, first);
        flags.set(BreakFlags::IS_LAST, record.last);
        flags.set(BreakFlags::NEXT_OVERFLOWS, record.overflow);
        flags.set(BreakFlags::FORCED_FIT, record.forced);
        flags.set(
            BreakFlags::FORCE_BREAK,
            record.force_break || (record.last && style.break_after == BreakKind::Page),
        );
        let mut size = leading + record.size;
        if record.last {
            size += trailing;
        }
        debug!("{}: list item piece {} of size {}", self.id, self.records.len(), size);

        self.records.push(ItemRecord { regions: index, space_before: space_before.opt });
        let position = Position::new(self.id, self.records.len() - 1);
        Ok(BreakResult::Break(BreakPoss::new(position, size).with_flags(flags)))
    }

    fn reset_position(&mut self, position: Option<Position>) {
        let index = match position {
            Some(p) if p.manager != self.id || p.index >= self.records.len() => {
                warn!("{}: ignoring reset to foreign position {:?}", self.id, p);
                return;
            }
            Some(p) => Some(p.index),
            None => None,
        };
        if self.commit.protects(index) {
            return;
        }
        match index {
            Some(i) => self.records.truncate(i + 1),
            None => self.records.clear(),
        }
        self.regions.reset_to(self.records.last().map(|r| r.regions));
    }

    fn is_finished(&self) -> bool {
        self.records.last().is_some_and(|r| self.regions.record(r.regions).last)
    }

    fn add_areas(
        &mut self,
        positions: &[Position],
        ctx: &LayoutContext,
        env: &LayoutEnv,
        sink: &mut CommitSink,
    ) -> Result<Vec<Area>, LayoutError> {
        let indices = self.commit.begin(self.id, positions, self.records.len())?;
        let (Some(&first_index), Some(&last_index)) = (indices.first(), indices.last()) else {
            self.commit.finish(&indices);
            return Ok(Vec::new());
        };
        let first = first_index == 0;
        let last = self.regions.record(self.records[last_index].regions).last;
        if first && let Some(id) = &self.node_id {
            sink.add_id(id);
        }

        let geometry = self.geometry(ctx.ref_ipd);
        let mut label = BlockArea { start_offset: geometry[LABEL].offset, ipd: geometry[LABEL].ipd, ..Default::default() };
        let mut body = BlockArea { start_offset: geometry[BODY].offset, ipd: geometry[BODY].ipd, ..Default::default() };
        for &index in &indices {
            let mut areas = self.regions.commit(self.records[index].regions, env, sink)?;
            body.children.append(&mut areas[BODY]);
            label.children.append(&mut areas[LABEL]);
        }
        label.bpd = label.content_bpd();
        body.bpd = body.content_bpd();

        let style = &self.style;
        let mut item = BlockArea {
            ipd: self.content_ipd(ctx.ref_ipd) + style.padding.start + style.padding.end
                + style.borders.start.extent()
                + style.borders.end.extent(),
            start_offset: style.start_indent,
            space_before: if first { self.records[first_index].space_before } else { 0 },
            space_after: if last { style.space_after.opt } else { 0 },
            stacking: Stacking::Inline,
            children: vec![Area::Block(label), Area::Block(body)],
            ..Default::default()
        };
        let frame = if first { style.frame_before() } else { 0 } + if last { style.frame_after() } else { 0 };
        item.bpd = item.content_bpd() + frame;
        if first {
            item.traits.set(Trait::IsFirst, TraitValue::Flag(true));
            if let Some(id) = &self.node_id {
                item.traits.set(Trait::Id, TraitValue::Id(id.clone()));
            }
        }
        if last {
            item.traits.set(Trait::IsLast, TraitValue::Flag(true));
        }
        item.traits.set_length(Trait::SpaceBefore, item.space_before);
        item.traits.set_length(Trait::SpaceAfter, item.space_after);
        if let Some(background) = style.background {
            item.traits.set(Trait::Background, TraitValue::Color(background));
        }

        self.commit.finish(&indices);
        Ok(vec![Area::Block(item)])
    }
}
