//! `fo:block` and other block-level containers.

use super::stack::BlockStack;
use super::{CommitState, LayoutManager, Manager};
use crate::LayoutError;
use crate::area::{Area, BlockArea, Trait, TraitValue};
use crate::break_poss::{BreakFlags, BreakPoss, BreakResult};
use crate::context::{LayoutContext, LayoutFlags};
use crate::env::{CommitSink, LayoutEnv};
use crate::position::{ManagerId, Position};
use crate::style::ComputedStyle;
use folio_style::BreakKind;
use folio_types::{AnchorId, Mpt, SizeRange};
use log::{debug, warn};
use std::sync::Arc;

#[derive(Debug, Clone)]
struct BlockRecord {
    /// Stack chunks making up this piece.
    chunks: Vec<usize>,
    first: bool,
    last: bool,
    /// Space-before actually applied (zero when discarded at area start).
    space_before: Mpt,
    /// Explicit block-progression-dimension.
    bpd: Option<Mpt>,
}

#[derive(Debug)]
pub struct BlockManager {
    id: ManagerId,
    node_id: Option<AnchorId>,
    style: Arc<ComputedStyle>,
    stack: BlockStack,
    records: Vec<BlockRecord>,
    commit: CommitState,
    working: Option<BlockArea>,
}

impl BlockManager {
    pub fn new(
        id: ManagerId,
        node_id: Option<AnchorId>,
        style: Arc<ComputedStyle>,
        children: Vec<Manager>,
    ) -> Self {
        Self {
            id,
            node_id,
            style,
            stack: BlockStack::new(id, children),
            records: Vec::new(),
            commit: CommitState::default(),
            working: None,
        }
    }

    pub fn style(&self) -> &Arc<ComputedStyle> {
        &self.style
    }

    pub fn breaks_before(&self) -> bool {
        self.records.is_empty()
            && (self.style.break_before == BreakKind::Page
                || self.stack.cursor.first().is_some_and(Manager::breaks_before))
    }

    fn content_ipd(&self, ref_ipd: Mpt) -> Mpt {
        ref_ipd - self.style.inline_frame()
    }

    fn push_record(&mut self, record: BlockRecord, size: SizeRange, mut flags: BreakFlags) -> BreakResult {
        if record.first {
            flags |= BreakFlags::IS_FIRST;
        }
        if record.last {
            flags |= BreakFlags::IS_LAST;
            if self.style.break_after == BreakKind::Page {
                flags |= BreakFlags::FORCE_BREAK;
            }
        }
        self.records.push(record);
        let position = Position::new(self.id, self.records.len() - 1);
        BreakResult::Break(BreakPoss::new(position, size).with_flags(flags))
    }

    /// A block with an explicit block-progression-dimension is placed as
    /// one unit; its content may overflow the dimension.
    fn atomic_break(
        &mut self,
        ctx: &LayoutContext,
        env: &LayoutEnv,
        leading: SizeRange,
        trailing: SizeRange,
        bpd: SizeRange,
        space_before: Mpt,
    ) -> Result<BreakResult, LayoutError> {
        let child_ctx = LayoutContext::new(SizeRange::unbounded(), self.content_ipd(ctx.ref_ipd))
            .with_flags(LayoutFlags::AT_AREA_START);
        let mut chunks = Vec::new();
        while !self.stack.is_finished() {
            match self.stack.fill(&child_ctx, env)? {
                Some(index) => chunks.push(index),
                None => break,
            }
        }

        let size = leading + bpd + trailing;
        let mut flags = BreakFlags::empty();
        if size.overflows(&ctx.stack_limit) {
            if !ctx.at_area_start() {
                self.stack.reset_to(None);
                return Ok(BreakResult::NoFit);
            }
            debug!("{}: fixed-size block {} forced into {}", self.id, size, ctx.stack_limit);
            flags |= BreakFlags::FORCED_FIT | BreakFlags::NEXT_OVERFLOWS;
        }
        let record = BlockRecord { chunks, first: true, last: true, space_before, bpd: Some(bpd.opt) };
        Ok(self.push_record(record, size, flags))
    }

    fn decorate(&self, area: &mut BlockArea, first: bool, last: bool) {
        let style = &self.style;
        let traits = &mut area.traits;
        if first {
            traits.set_length(Trait::PaddingBefore, style.padding.before);
            traits.set_border(Trait::BorderBefore, style.borders.before);
            traits.set_length(Trait::SpaceBefore, area.space_before);
            traits.set(Trait::IsFirst, TraitValue::Flag(true));
        }
        if last {
            traits.set_length(Trait::PaddingAfter, style.padding.after);
            traits.set_border(Trait::BorderAfter, style.borders.after);
            traits.set_length(Trait::SpaceAfter, area.space_after);
            traits.set(Trait::IsLast, TraitValue::Flag(true));
        }
        traits.set_length(Trait::PaddingStart, style.padding.start);
        traits.set_length(Trait::PaddingEnd, style.padding.end);
        traits.set_border(Trait::BorderStart, style.borders.start);
        traits.set_border(Trait::BorderEnd, style.borders.end);
        traits.set_length(Trait::StartIndent, style.start_indent);
        traits.set_length(Trait::EndIndent, style.end_indent);
        if let Some(background) = style.background {
            traits.set(Trait::Background, TraitValue::Color(background));
        }
    }
}

impl LayoutManager for BlockManager {
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
        let at_start = ctx.at_area_start();

        // Space-before is discarded at the start of an area.
        let space_before = if first && !at_start { style.space_before } else { SizeRange::ZERO };
        let leading = space_before + SizeRange::fixed(if first { style.frame_before() } else { 0 });
        let trailing = SizeRange::fixed(style.frame_after()) + style.space_after;

        if let Some(bpd) = style.block_progression_dimension {
            return self.atomic_break(ctx, env, leading, trailing, bpd, space_before.opt);
        }

        let mut child_flags = LayoutFlags::empty();
        child_flags.set(LayoutFlags::AT_AREA_START, at_start);
        let child_ctx = LayoutContext::new(ctx.stack_limit - leading - trailing, self.content_ipd(ctx.ref_ipd))
            .with_flags(child_flags);

        let mut flags = BreakFlags::empty();
        let (chunks, content) = match self.stack.fill(&child_ctx, env)? {
            Some(index) => {
                let chunk = self.stack.chunk(index);
                flags.set(BreakFlags::NEXT_OVERFLOWS, chunk.overflow);
                flags.set(BreakFlags::FORCED_FIT, chunk.forced);
                flags.set(BreakFlags::FORCE_BREAK, chunk.force_break);
                (vec![index], chunk.size)
            }
            None if self.stack.is_finished() => (Vec::new(), SizeRange::ZERO),
            None => return Ok(BreakResult::NoFit),
        };

        let last = self.stack.is_finished();
        let mut size = leading + content;
        if last {
            size += trailing;
        }
        if chunks.is_empty() && size.overflows(&ctx.stack_limit) {
            if !at_start {
                return Ok(BreakResult::NoFit);
            }
            flags |= BreakFlags::FORCED_FIT | BreakFlags::NEXT_OVERFLOWS;
        }

        let record = BlockRecord { chunks, first, last, space_before: space_before.opt, bpd: None };
        Ok(self.push_record(record, size, flags))
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
            debug!("{}: reset to {:?} would discard committed content", self.id, index);
            return;
        }
        match index {
            Some(i) => self.records.truncate(i + 1),
            None => self.records.clear(),
        }
        let to = self.records.iter().rev().find_map(|r| r.chunks.last().copied());
        self.stack.reset_to(to);
    }

    fn is_finished(&self) -> bool {
        self.records.last().is_some_and(|r| r.last)
    }

    fn add_areas(
        &mut self,
        positions: &[Position],
        ctx: &LayoutContext,
        env: &LayoutEnv,
        sink: &mut CommitSink,
    ) -> Result<Vec<Area>, LayoutError> {
        if self.working.is_some() {
            return Err(LayoutError::ReentrantCommit(self.id));
        }
        let indices = self.commit.begin(self.id, positions, self.records.len())?;
        let (Some(&first_index), Some(&last_index)) = (indices.first(), indices.last()) else {
            self.commit.finish(&indices);
            return Ok(Vec::new());
        };
        let first = self.records[first_index].first;
        let last = self.records[last_index].last;
        let content_ipd = self.content_ipd(ctx.ref_ipd);
        let child_ctx = LayoutContext::new(SizeRange::unbounded(), content_ipd);

        if first && let Some(id) = &self.node_id {
            sink.add_id(id);
        }

        let mut explicit_bpd = None;
        for &index in &indices {
            let record = self.records[index].clone();
            explicit_bpd = explicit_bpd.or(record.bpd);
            self.working.get_or_insert_with(BlockArea::default);
            for chunk in record.chunks {
                let children = self.stack.commit(chunk, &child_ctx, env, sink)?;
                self.working.get_or_insert_with(BlockArea::default).children.extend(children);
            }
        }

        let mut area = self.working.take().unwrap_or_default();
        let style = &self.style;
        area.ipd = content_ipd + style.padding.start + style.padding.end
            + style.borders.start.extent()
            + style.borders.end.extent();
        area.start_offset = style.start_indent;
        area.space_before = if first { self.records[first_index].space_before } else { 0 };
        area.space_after = if last { style.space_after.opt } else { 0 };
        let frame = if first { style.frame_before() } else { 0 } + if last { style.frame_after() } else { 0 };
        area.bpd = explicit_bpd.unwrap_or_else(|| area.content_bpd()) + frame;
        self.decorate(&mut area, first, last);
        if first && let Some(id) = &self.node_id {
            area.traits.set(Trait::Id, TraitValue::Id(id.clone()));
        }

        self.commit.finish(&indices);
        Ok(vec![Area::Block(area)])
    }
}
