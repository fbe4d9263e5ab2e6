//! Runs of character data, broken into words at Unicode line-break
//! opportunities.

use super::{CommitState, LayoutManager};
use crate::LayoutError;
use crate::area::{Area, InlineArea};
use crate::break_poss::{BreakFlags, BreakPoss, BreakResult, LineExtent};
use crate::context::LayoutContext;
use crate::env::{CommitSink, LayoutEnv};
use crate::position::{ManagerId, Position};
use crate::style::ComputedStyle;
use folio_style::LinefeedTreatment;
use folio_traits::FontMetrics;
use folio_types::{Mpt, SizeRange, scale};
use log::warn;
use std::sync::Arc;
use unicode_linebreak::linebreaks;

#[derive(Debug, Clone, PartialEq)]
enum TextItem {
    Word { text: String, width: Mpt },
    Space { width: Mpt },
    Linefeed,
}

/// One break unit: leading spaces followed by a word, a linefeed, or
/// nothing when the run ends in spaces.
#[derive(Debug, Clone)]
struct TextRecord {
    end: usize,
    space: SizeRange,
    word: Option<usize>,
}

/// Vertical metrics of the style's font, used as the line strut.
pub(crate) fn font_extent(style: &ComputedStyle, fonts: &dyn FontMetrics) -> LineExtent {
    LineExtent {
        ascent: fonts.ascender(&style.font),
        descent: fonts.descender(&style.font),
        line_height: style.line_height(),
    }
}

#[derive(Debug)]
pub struct TextManager {
    id: ManagerId,
    style: Arc<ComputedStyle>,
    items: Vec<TextItem>,
    next: usize,
    records: Vec<TextRecord>,
    commit: CommitState,
}

impl TextManager {
    pub fn new(id: ManagerId, style: Arc<ComputedStyle>, text: &str, fonts: &dyn FontMetrics) -> Self {
        let items = split_items(text, &style, fonts);
        Self { id, style, items, next: 0, records: Vec::new(), commit: CommitState::default() }
    }

    /// A forced line break (`fo:block` boundary inside a line, or an
    /// explicit line-break node).
    pub fn line_break(id: ManagerId, style: Arc<ComputedStyle>) -> Self {
        Self {
            id,
            style,
            items: vec![TextItem::Linefeed],
            next: 0,
            records: Vec::new(),
            commit: CommitState::default(),
        }
    }

    fn space_range(&self, width: Mpt, env: &LayoutEnv) -> SizeRange {
        SizeRange::new(
            width - scale(width, env.config.word_space_shrink as i64, 1000),
            width,
            width + scale(width, env.config.word_space_stretch as i64, 1000),
        )
    }

    fn push_record(&mut self, record: TextRecord, size: SizeRange, flags: BreakFlags, env: &LayoutEnv) -> BreakResult {
        self.next = record.end;
        self.records.push(record);
        let position = Position::new(self.id, self.records.len() - 1);
        let mut flags = flags;
        if self.records.len() == 1 {
            flags |= BreakFlags::IS_FIRST;
        }
        if self.next >= self.items.len() {
            flags |= BreakFlags::IS_LAST;
        }
        BreakResult::Break(
            BreakPoss::new(position, size)
                .with_flags(flags)
                .with_extent(font_extent(&self.style, env.fonts)),
        )
    }
}

/// Splits text into words and collapsed spaces. With `linefeed-treatment`
/// `preserve`, each `\n` becomes a forced break; otherwise it is a space.
fn split_items(text: &str, style: &ComputedStyle, fonts: &dyn FontMetrics) -> Vec<TextItem> {
    let space_width = fonts.char_width(&style.font, ' ');
    let mut items = Vec::new();
    let preserve = style.linefeed_treatment == LinefeedTreatment::Preserve;
    let segments: Vec<&str> = if preserve { text.split('\n').collect() } else { vec![text] };

    for (i, segment) in segments.iter().enumerate() {
        if i > 0 {
            items.push(TextItem::Linefeed);
        }
        let collapsed = segment.split_whitespace().collect::<Vec<_>>().join(" ");
        if segment.starts_with(char::is_whitespace) {
            items.push(TextItem::Space { width: space_width });
        }
        let mut start = 0;
        for (end, _) in linebreaks(&collapsed) {
            let piece = &collapsed[start..end];
            start = end;
            let word = piece.trim_end_matches(' ');
            if !word.is_empty() {
                items.push(TextItem::Word { text: word.to_string(), width: fonts.string_width(&style.font, word) });
            }
            if word.len() < piece.len() {
                items.push(TextItem::Space { width: space_width });
            }
        }
        if !collapsed.is_empty() && segment.ends_with(char::is_whitespace) {
            items.push(TextItem::Space { width: space_width });
        }
    }
    items
}

impl LayoutManager for TextManager {
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
        let suppress = ctx.suppress_leading_space();
        let mut index = self.next;
        let mut space = SizeRange::ZERO;
        while let Some(TextItem::Space { width }) = self.items.get(index) {
            if !suppress {
                space += self.space_range(*width, env);
            }
            index += 1;
        }

        match self.items.get(index) {
            Some(TextItem::Word { width, .. }) => {
                let size = space + SizeRange::fixed(*width);
                let record = TextRecord { end: index + 1, space, word: Some(index) };
                Ok(self.push_record(record, size, BreakFlags::empty(), env))
            }
            Some(TextItem::Linefeed) => {
                let record = TextRecord { end: index + 1, space: SizeRange::ZERO, word: None };
                Ok(self.push_record(record, SizeRange::ZERO, BreakFlags::FORCE_BREAK, env))
            }
            None | Some(TextItem::Space { .. }) => {
                if suppress {
                    self.next = index;
                    return Ok(BreakResult::Exhausted);
                }
                let record = TextRecord { end: index, space, word: None };
                Ok(self.push_record(record, space, BreakFlags::SPACE_ONLY, env))
            }
        }
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
            Some(i) => {
                self.records.truncate(i + 1);
                self.next = self.records[i].end;
            }
            None => {
                self.records.clear();
                self.next = 0;
            }
        }
    }

    fn is_finished(&self) -> bool {
        self.next >= self.items.len()
    }

    fn add_areas(
        &mut self,
        positions: &[Position],
        ctx: &LayoutContext,
        _env: &LayoutEnv,
        _sink: &mut CommitSink,
    ) -> Result<Vec<Area>, LayoutError> {
        let indices = self.commit.begin(self.id, positions, self.records.len())?;
        let mut areas = Vec::new();
        for &index in &indices {
            let record = &self.records[index];
            if !record.space.is_zero() {
                areas.push(Area::Inline(InlineArea::Space { ipd: record.space.adjusted(ctx.ipd_adjust) }));
            }
            let Some(word) = record.word else { continue };
            if let TextItem::Word { text, width } = &self.items[word] {
                areas.push(Area::Inline(InlineArea::Word {
                    text: text.clone(),
                    ipd: *width,
                    font: self.style.font.clone(),
                    color: self.style.color,
                }));
            }
        }
        self.commit.finish(&indices);
        Ok(areas)
    }

    fn generates_inline_areas(&self) -> bool {
        true
    }
}
