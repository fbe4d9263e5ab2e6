//! Builds lines from the break possibilities of inline-level children.

use super::cursor::ChildCursor;
use super::text::font_extent;
use super::{CommitState, LayoutManager, Manager};
use crate::LayoutError;
use crate::area::{Area, InlineArea, LineArea};
use crate::break_poss::{BreakFlags, BreakPoss, BreakResult};
use crate::context::{LayoutContext, LayoutFlags};
use crate::env::{CommitSink, LayoutEnv};
use crate::position::{ChildPosition, ManagerId, Position, group_by_child};
use crate::style::ComputedStyle;
use folio_style::TextAlign;
use folio_types::{Mpt, SizeRange};
use log::{debug, warn};
use std::sync::Arc;

#[derive(Debug, Clone)]
struct LineRecord {
    /// Units placed on the line, trailing spaces excluded.
    units: Vec<ChildPosition>,
    /// Last unit consumed, trailing spaces included.
    resume: Option<ChildPosition>,
    natural: SizeRange,
    available: Mpt,
    indent: Mpt,
    height: Mpt,
    baseline: Mpt,
    last: bool,
    forced_break: bool,
    has_leader: bool,
}

#[derive(Debug)]
pub struct LineManager {
    id: ManagerId,
    style: Arc<ComputedStyle>,
    cursor: ChildCursor,
    records: Vec<LineRecord>,
    commit: CommitState,
    /// Only suppressible spaces were left after the last line.
    exhausted: bool,
}

impl LineManager {
    pub fn new(id: ManagerId, style: Arc<ComputedStyle>, children: Vec<Manager>) -> Self {
        Self {
            id,
            style,
            cursor: ChildCursor::new(children),
            records: Vec::new(),
            commit: CommitState::default(),
            exhausted: false,
        }
    }

    /// Adjustment ratio for spaces and leaders, in `[-1, 1]`.
    fn adjust_ratio(record: &LineRecord, align: TextAlign) -> f64 {
        if align != TextAlign::Justify && !record.has_leader {
            return 0.0;
        }
        let slack = record.available - record.natural.opt;
        let elasticity = if slack >= 0 { record.natural.stretch() } else { record.natural.shrink() };
        if slack == 0 || elasticity <= 0 {
            return 0.0;
        }
        (slack as f64 / elasticity as f64).clamp(-1.0, 1.0)
    }
}

impl LayoutManager for LineManager {
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
        let first = self.records.is_empty();
        let indent = if first {
            self.style
                .text_indent
                .resolve(self.style.font.size, Some(ctx.ref_ipd))
                .unwrap_or(0)
        } else {
            0
        };
        let available = ctx.ref_ipd - indent;
        let start = self.records.last().and_then(|r| r.resume);

        let mut units: Vec<(ChildPosition, BreakPoss)> = Vec::new();
        let mut resume = start;
        let mut size = SizeRange::ZERO;
        let mut forced_break = false;

        while let Some(index) = self.cursor.next_unfinished() {
            let flags = if units.is_empty() {
                LayoutFlags::SUPPRESS_LEADING_SPACE
            } else {
                LayoutFlags::empty()
            };
            let unit_ctx = LayoutContext::new(SizeRange::fixed(available) - size, available).with_flags(flags);
            let bp = match self.cursor.children[index].get_next_break_poss(&unit_ctx, env)? {
                BreakResult::Exhausted => {
                    self.cursor.skip_current();
                    continue;
                }
                BreakResult::NoFit => break,
                BreakResult::Break(bp) => bp,
            };

            let accepted = ChildPosition::new(index, bp.position);
            let next = size + bp.stack_size;
            let space_only = bp.flags.contains(BreakFlags::SPACE_ONLY);
            if next.opt > available && !space_only {
                let has_content = units.iter().any(|(_, b)| !b.flags.contains(BreakFlags::SPACE_ONLY));
                if has_content {
                    self.cursor.rewind(resume);
                    break;
                }
                warn!(
                    "{}: content of width {} does not fit the line measure {}",
                    self.id, bp.stack_size.opt, available
                );
                units.push((accepted, bp));
                resume = Some(accepted);
                size = next;
                break;
            }

            units.push((accepted, bp));
            resume = Some(accepted);
            size = next;
            if bp.flags.contains(BreakFlags::FORCE_BREAK) {
                forced_break = true;
                break;
            }
        }

        while units.last().is_some_and(|(_, b)| b.flags.contains(BreakFlags::SPACE_ONLY)) {
            if let Some((_, dropped)) = units.pop() {
                size -= dropped.stack_size;
            }
        }

        let finished = self.cursor.is_finished();
        if units.is_empty() {
            if finished {
                debug!("{}: only suppressible content left", self.id);
                self.exhausted = true;
                return Ok(BreakResult::Exhausted);
            }
            self.cursor.rewind(start);
            return Ok(BreakResult::NoFit);
        }

        let extent = units.iter().fold(font_extent(&self.style, env.fonts), |acc, (_, b)| acc.merge(&b.extent));
        let height = extent.line_height.max(extent.ascent + extent.descent);
        let baseline = (height - (extent.ascent + extent.descent)) / 2 + extent.ascent;

        let mut flags = BreakFlags::empty();
        if height > ctx.stack_limit.max {
            if !ctx.at_area_start() {
                self.cursor.rewind(start);
                return Ok(BreakResult::NoFit);
            }
            debug!("{}: line of height {} forced into {}", self.id, height, ctx.stack_limit);
            flags |= BreakFlags::FORCED_FIT | BreakFlags::NEXT_OVERFLOWS;
        }
        if first {
            flags |= BreakFlags::IS_FIRST;
        }
        if finished {
            flags |= BreakFlags::IS_LAST;
        }

        self.records.push(LineRecord {
            units: units.iter().map(|(cp, _)| *cp).collect(),
            resume,
            natural: size,
            available,
            indent,
            height,
            baseline,
            last: finished,
            forced_break,
            has_leader: units.iter().any(|(_, b)| b.flags.contains(BreakFlags::LEADER)),
        });
        let position = Position::new(self.id, self.records.len() - 1);
        Ok(BreakResult::Break(
            BreakPoss::new(position, SizeRange::fixed(height)).with_flags(flags).with_extent(extent),
        ))
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
            debug!("{}: reset to {:?} would discard committed lines", self.id, index);
            return;
        }
        self.exhausted = false;
        match index {
            Some(i) => {
                self.records.truncate(i + 1);
                let resume = self.records[i].resume;
                self.cursor.rewind(resume);
            }
            None => {
                self.records.clear();
                self.cursor.rewind(None);
            }
        }
    }

    fn is_finished(&self) -> bool {
        self.exhausted || self.records.last().is_some_and(|r| r.last)
    }

    fn add_areas(
        &mut self,
        positions: &[Position],
        _ctx: &LayoutContext,
        env: &LayoutEnv,
        sink: &mut CommitSink,
    ) -> Result<Vec<Area>, LayoutError> {
        let indices = self.commit.begin(self.id, positions, self.records.len())?;
        let mut lines = Vec::with_capacity(indices.len());
        for &index in &indices {
            let record = self.records[index].clone();
            let align = if record.last || record.forced_break {
                self.style.last_line_align()
            } else {
                self.style.text_align
            };
            let ratio = Self::adjust_ratio(&record, align);
            let unit_ctx = LayoutContext::new(SizeRange::unbounded(), record.available).with_adjust(ratio);

            let mut children: Vec<InlineArea> = Vec::new();
            for (child, run) in group_by_child(&record.units) {
                for area in self.cursor.children[child].add_areas(&run, &unit_ctx, env, sink)? {
                    match area {
                        Area::Inline(inline) => children.push(inline),
                        other => warn!("{}: dropping non-inline area {:?} from a line", self.id, other),
                    }
                }
            }

            let ipd: Mpt = children.iter().map(InlineArea::ipd).sum();
            let slack = (record.available - ipd).max(0);
            let offset = match align {
                TextAlign::Center => slack / 2,
                TextAlign::End => slack,
                TextAlign::Start | TextAlign::Justify => 0,
            };
            lines.push(Area::Line(LineArea {
                ipd,
                bpd: record.height,
                baseline: record.baseline,
                start_offset: record.indent + offset,
                children,
            }));
        }
        self.commit.finish(&indices);
        Ok(lines)
    }
}
