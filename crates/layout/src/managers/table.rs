//! `fo:table` with a repeating header, and its rows.

use super::builder::ManagerBuilder;
use super::regions::{RegionGeometry, SideBySide};
use super::stack::BlockStack;
use super::{CommitState, LayoutManager, Manager};
use crate::LayoutError;
use crate::area::{Area, BlockArea, Stacking, Trait, TraitValue};
use crate::break_poss::{BreakFlags, BreakPoss, BreakResult};
use crate::context::{LayoutContext, LayoutFlags};
use crate::env::{CommitSink, LayoutEnv};
use crate::position::{ManagerId, Position};
use crate::style::ComputedStyle;
use folio_idf::{ColumnWidth, TableRow};
use folio_style::BreakKind;
use folio_types::{AnchorId, Mpt, SizeRange};
use log::{debug, warn};
use std::sync::Arc;

/// Resolves column widths against the table's content width. Columns
/// missing from `columns` share the proportional space equally.
pub fn column_widths(columns: &[ColumnWidth], count: usize, ipd: Mpt) -> Vec<Mpt> {
    let count = count.max(columns.len());
    if count == 0 {
        return Vec::new();
    }
    let column = |i: usize| columns.get(i).cloned().unwrap_or(ColumnWidth::Proportional(1.0));
    let fixed: Mpt = (0..count)
        .filter_map(|i| match column(i) {
            ColumnWidth::Fixed(w) => Some(w),
            ColumnWidth::Proportional(_) => None,
        })
        .sum();
    let shares: f64 = (0..count)
        .filter_map(|i| match column(i) {
            ColumnWidth::Proportional(p) => Some(p as f64),
            ColumnWidth::Fixed(_) => None,
        })
        .sum();
    let remaining = (ipd - fixed).max(0) as f64;
    (0..count)
        .map(|i| match column(i) {
            ColumnWidth::Fixed(w) => w,
            ColumnWidth::Proportional(p) if shares > 0.0 => (remaining * p as f64 / shares).round() as Mpt,
            ColumnWidth::Proportional(_) => 0,
        })
        .collect()
}

/// A cell's identity and style; its content lives in the row's regions.
#[derive(Debug)]
pub struct CellSpec {
    pub node_id: Option<AnchorId>,
    pub style: Arc<ComputedStyle>,
}

#[derive(Debug)]
pub struct TableRowManager {
    id: ManagerId,
    node_id: Option<AnchorId>,
    style: Arc<ComputedStyle>,
    columns: Vec<ColumnWidth>,
    cells: Vec<CellSpec>,
    regions: SideBySide,
    records: Vec<usize>,
    commit: CommitState,
}

impl TableRowManager {
    pub fn new(
        id: ManagerId,
        node_id: Option<AnchorId>,
        style: Arc<ComputedStyle>,
        columns: Vec<ColumnWidth>,
        cells: Vec<(CellSpec, Vec<Manager>)>,
    ) -> Self {
        let (cells, contents): (Vec<_>, Vec<_>) = cells.into_iter().unzip();
        Self {
            id,
            node_id,
            style,
            columns,
            cells,
            regions: SideBySide::new(id, contents),
            records: Vec::new(),
            commit: CommitState::default(),
        }
    }

    fn geometry(&self, ref_ipd: Mpt) -> (Vec<Mpt>, Vec<RegionGeometry>) {
        let widths = column_widths(&self.columns, self.cells.len(), ref_ipd);
        let mut offset = 0;
        let geometry = self
            .cells
            .iter()
            .zip(&widths)
            .map(|(cell, width)| {
                let g = RegionGeometry {
                    offset,
                    ipd: (width - cell.style.inline_frame()).max(0),
                    frame_before: cell.style.frame_before(),
                    frame_after: cell.style.frame_after(),
                };
                offset += width;
                g
            })
            .collect();
        (widths, geometry)
    }

    fn cell_area(cell: &CellSpec, offset: Mpt, width: Mpt, height: Mpt, first: bool, last: bool) -> BlockArea {
        let style = &cell.style;
        let mut area = BlockArea { ipd: width, bpd: height, start_offset: offset, ..Default::default() };
        let traits = &mut area.traits;
        if first {
            traits.set_length(Trait::PaddingBefore, style.padding.before);
            traits.set_border(Trait::BorderBefore, style.borders.before);
            if let Some(id) = &cell.node_id {
                traits.set(Trait::Id, TraitValue::Id(id.clone()));
            }
        }
        if last {
            traits.set_length(Trait::PaddingAfter, style.padding.after);
            traits.set_border(Trait::BorderAfter, style.borders.after);
        }
        traits.set_length(Trait::PaddingStart, style.padding.start + style.start_indent);
        traits.set_length(Trait::PaddingEnd, style.padding.end + style.end_indent);
        traits.set_border(Trait::BorderStart, style.borders.start);
        traits.set_border(Trait::BorderEnd, style.borders.end);
        if let Some(background) = style.background {
            traits.set(Trait::Background, TraitValue::Color(background));
        }
        area
    }
}

impl LayoutManager for TableRowManager {
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
        let (_, geometry) = self.geometry(ctx.ref_ipd);
        let Some(index) = self.regions.fill(ctx, env, &geometry)? else {
            return Ok(BreakResult::NoFit);
        };
        let record = self.regions.record(index);
        let mut flags = BreakFlags::empty();
        flags.set(BreakFlags::IS_FIRST, record.first);
        flags.set(BreakFlags::IS_LAST, record.last);
        flags.set(BreakFlags::NEXT_OVERFLOWS, record.overflow);
        flags.set(BreakFlags::FORCED_FIT, record.forced);
        flags.set(BreakFlags::FORCE_BREAK, record.force_break);
        let size = record.size;
        self.records.push(index);
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
        self.regions.reset_to(self.records.last().copied());
    }

    fn is_finished(&self) -> bool {
        self.records.last().is_some_and(|&r| self.regions.record(r).last)
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
        let first = self.regions.record(self.records[first_index]).first;
        let last = self.regions.record(self.records[last_index]).last;
        if first {
            let ids = self.node_id.iter().chain(self.cells.iter().filter_map(|c| c.node_id.as_ref()));
            for id in ids {
                sink.add_id(id);
            }
        }

        let (widths, _) = self.geometry(ctx.ref_ipd);
        let mut contents: Vec<Vec<Area>> = self.cells.iter().map(|_| Vec::new()).collect();
        let mut height = 0;
        for &index in &indices {
            let regions = self.records[index];
            height += self.regions.record(regions).size.opt;
            for (cell, mut areas) in self.regions.commit(regions, env, sink)?.into_iter().enumerate() {
                contents[cell].append(&mut areas);
            }
        }

        let mut offset = 0;
        let mut children = Vec::with_capacity(self.cells.len());
        for ((cell, width), content) in self.cells.iter().zip(&widths).zip(contents) {
            let mut area = Self::cell_area(cell, offset, *width, height, first, last);
            area.children = content;
            children.push(Area::Block(area));
            offset += width;
        }

        let mut row = BlockArea {
            ipd: widths.iter().sum(),
            bpd: height,
            stacking: Stacking::Inline,
            children,
            ..Default::default()
        };
        if let Some(background) = self.style.background {
            row.traits.set(Trait::Background, TraitValue::Color(background));
        }
        self.commit.finish(&indices);
        Ok(vec![Area::Block(row)])
    }
}

#[derive(Debug, Clone)]
struct TableRecord {
    /// Body chunk of this piece; `None` for a table without body rows.
    chunk: Option<usize>,
    first: bool,
    last: bool,
    space_before: Mpt,
}

/// A table whose header rows are repeated at the top of each piece.
///
/// Header rows are rebuilt from their content for every committed piece,
/// so page numbers inside them reflect the page they land on. Break-seeking
/// only needs the header's extent, which is measured once per width.
#[derive(Debug)]
pub struct TableManager {
    id: ManagerId,
    node_id: Option<AnchorId>,
    style: Arc<ComputedStyle>,
    columns: Vec<ColumnWidth>,
    header: Vec<TableRow>,
    header_size: Option<(Mpt, SizeRange)>,
    body: BlockStack,
    records: Vec<TableRecord>,
    commit: CommitState,
}

impl TableManager {
    pub fn new(
        id: ManagerId,
        node_id: Option<AnchorId>,
        style: Arc<ComputedStyle>,
        columns: Vec<ColumnWidth>,
        header: Vec<TableRow>,
        rows: Vec<Manager>,
    ) -> Self {
        Self {
            id,
            node_id,
            style,
            columns,
            header,
            header_size: None,
            body: BlockStack::new(id, rows),
            records: Vec::new(),
            commit: CommitState::default(),
        }
    }

    pub fn breaks_before(&self) -> bool {
        self.records.is_empty()
            && (self.style.break_before == BreakKind::Page
                || self.body.cursor.first().is_some_and(Manager::breaks_before))
    }

    fn content_ipd(&self, ref_ipd: Mpt) -> Mpt {
        ref_ipd - self.style.inline_frame()
    }

    /// Builds and fills a fresh copy of the header rows, returning the
    /// stack and its chunks.
    fn header_stack(&self, ipd: Mpt, env: &LayoutEnv) -> Result<(BlockStack, Vec<usize>, SizeRange), LayoutError> {
        let builder = ManagerBuilder::new(env.fonts, env.ids);
        let rows = self
            .header
            .iter()
            .map(|row| builder.table_row(row, &self.columns, &self.style).map(Manager::TableRow))
            .collect::<Result<Vec<_>, _>>()?;
        let mut stack = BlockStack::new(self.id, rows);
        let ctx = LayoutContext::new(SizeRange::unbounded(), ipd).with_flags(LayoutFlags::AT_AREA_START);
        let mut chunks = Vec::new();
        let mut size = SizeRange::ZERO;
        while !stack.is_finished() {
            let Some(chunk) = stack.fill(&ctx, env)? else { break };
            size += stack.chunk(chunk).size;
            chunks.push(chunk);
        }
        Ok((stack, chunks, size))
    }

    fn header_size(&mut self, ipd: Mpt, env: &LayoutEnv) -> Result<SizeRange, LayoutError> {
        if let Some((width, size)) = self.header_size
            && width == ipd
        {
            return Ok(size);
        }
        let size = if self.header.is_empty() { SizeRange::ZERO } else { self.header_stack(ipd, env)?.2 };
        self.header_size = Some((ipd, size));
        Ok(size)
    }
}

impl LayoutManager for TableManager {
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
        let space_before = if first && !at_start { style.space_before } else { SizeRange::ZERO };
        let leading = space_before + SizeRange::fixed(if first { style.frame_before() } else { 0 });
        let trailing = SizeRange::fixed(style.frame_after()) + style.space_after;
        let ipd = self.content_ipd(ctx.ref_ipd);
        let header = self.header_size(ipd, env)?;

        let mut body_flags = LayoutFlags::empty();
        body_flags.set(LayoutFlags::AT_AREA_START, at_start);
        let body_ctx = LayoutContext::new(ctx.stack_limit - leading - header - trailing, ipd).with_flags(body_flags);

        let mut flags = BreakFlags::empty();
        let (chunk, content) = match self.body.fill(&body_ctx, env)? {
            Some(index) => {
                let chunk = self.body.chunk(index);
                flags.set(BreakFlags::NEXT_OVERFLOWS, chunk.overflow);
                flags.set(BreakFlags::FORCED_FIT, chunk.forced);
                flags.set(BreakFlags::FORCE_BREAK, chunk.force_break);
                (Some(index), chunk.size)
            }
            None if self.body.is_finished() => (None, SizeRange::ZERO),
            None => return Ok(BreakResult::NoFit),
        };

        let last = self.body.is_finished();
        let mut size = leading + header + content;
        if last {
            size += trailing;
            if style.break_after == BreakKind::Page {
                flags |= BreakFlags::FORCE_BREAK;
            }
        }
        debug!("{}: table piece with header {} and body {}", self.id, header, content);
        flags.set(BreakFlags::IS_FIRST, first);
        flags.set(BreakFlags::IS_LAST, last);
        self.records.push(TableRecord { chunk, first, last, space_before: space_before.opt });
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
        let to = self.records.iter().rev().find_map(|r| r.chunk);
        self.body.reset_to(to);
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
        let indices = self.commit.begin(self.id, positions, self.records.len())?;
        let (Some(&first_index), Some(&last_index)) = (indices.first(), indices.last()) else {
            self.commit.finish(&indices);
            return Ok(Vec::new());
        };
        let first = self.records[first_index].first;
        let last = self.records[last_index].last;
        if first && let Some(id) = &self.node_id {
            sink.add_id(id);
        }

        let ipd = self.content_ipd(ctx.ref_ipd);
        let row_ctx = LayoutContext::new(SizeRange::unbounded(), ipd);
        let mut children = Vec::new();
        let (mut header, header_chunks, _) = self.header_stack(ipd, env)?;
        for chunk in header_chunks {
            children.extend(header.commit(chunk, &row_ctx, env, sink)?);
        }
        for &index in &indices {
            if let Some(chunk) = self.records[index].chunk {
                children.extend(self.body.commit(chunk, &row_ctx, env, sink)?);
            }
        }

        let style = &self.style;
        let mut area = BlockArea {
            ipd: ipd + style.padding.start + style.padding.end
                + style.borders.start.extent()
                + style.borders.end.extent(),
            start_offset: style.start_indent,
            space_before: if first { self.records[first_index].space_before } else { 0 },
            space_after: if last { style.space_after.opt } else { 0 },
            children,
            ..Default::default()
        };
        let frame = if first { style.frame_before() } else { 0 } + if last { style.frame_after() } else { 0 };
        area.bpd = area.content_bpd() + frame;
        let traits = &mut area.traits;
        traits.set_length(Trait::PaddingStart, style.padding.start);
        traits.set_length(Trait::PaddingEnd, style.padding.end);
        traits.set_border(Trait::BorderStart, style.borders.start);
        traits.set_border(Trait::BorderEnd, style.borders.end);
        if first {
            traits.set_length(Trait::PaddingBefore, style.padding.before);
            traits.set_border(Trait::BorderBefore, style.borders.before);
            traits.set(Trait::IsFirst, TraitValue::Flag(true));
            if let Some(id) = &self.node_id {
                traits.set(Trait::Id, TraitValue::Id(id.clone()));
            }
        }
        if last {
            traits.set_length(Trait::PaddingAfter, style.padding.after);
            traits.set_border(Trait::BorderAfter, style.borders.after);
            traits.set(Trait::IsLast, TraitValue::Flag(true));
        }
        if let Some(background) = style.background {
            traits.set(Trait::Background, TraitValue::Color(background));
        }
        self.commit.finish(&indices);
        Ok(vec![Area::Block(area)])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_column_widths_fixed_and_proportional() {
        let columns = [ColumnWidth::Fixed(100), ColumnWidth::Proportional(1.0), ColumnWidth::Proportional(3.0)];
        assert_eq!(column_widths(&columns, 3, 500), vec![100, 100, 300]);
    }

    #[test]
    fn test_column_widths_default_to_equal_shares() {
        assert_eq!(column_widths(&[], 4, 400), vec![100, 100, 100, 100]);
        assert_eq!(column_widths(&[ColumnWidth::Fixed(100)], 2, 300), vec![100, 200]);
        assert!(column_widths(&[], 0, 400).is_empty());
    }
}
