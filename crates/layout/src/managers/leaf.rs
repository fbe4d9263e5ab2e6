//! Atomic inline content: page numbers, citations, leaders and images.

use super::text::font_extent;
use super::{CommitState, LayoutManager};
use crate::LayoutError;
use crate::area::{Area, InlineArea};
use crate::break_poss::{BreakFlags, BreakPoss, BreakResult, LineExtent};
use crate::context::LayoutContext;
use crate::env::{CommitSink, LayoutEnv};
use crate::position::{ManagerId, Position};
use crate::style::ComputedStyle;
use folio_types::{AnchorId, Mpt, ResourceUri, SizeRange, scale};
use log::{debug, warn};
use std::sync::Arc;

#[derive(Debug, Clone, PartialEq)]
pub enum LeafKind {
    PageNumber,
    /// The page number of the first area generated for the id.
    Citation(AnchorId),
    Leader,
    Graphic(ResourceUri),
}

#[derive(Debug, Clone)]
struct LeafRecord {
    size: SizeRange,
    bpd: Mpt,
    /// Text for page numbers and citations.
    text: Option<String>,
    resolved: bool,
}

/// A manager with exactly one break.
#[derive(Debug)]
pub struct LeafManager {
    id: ManagerId,
    node_id: Option<AnchorId>,
    style: Arc<ComputedStyle>,
    kind: LeafKind,
    record: Option<LeafRecord>,
    commit: CommitState,
}

impl LeafManager {
    pub fn new(id: ManagerId, node_id: Option<AnchorId>, style: Arc<ComputedStyle>, kind: LeafKind) -> Self {
        Self { id, node_id, style, kind, record: None, commit: CommitState::default() }
    }

    fn text_record(&self, text: String, resolved: bool, env: &LayoutEnv) -> (LeafRecord, LineExtent) {
        let width = env.fonts.string_width(&self.style.font, &text);
        let record = LeafRecord { size: SizeRange::fixed(width), bpd: 0, text: Some(text), resolved };
        (record, font_extent(&self.style, env.fonts))
    }

    fn graphic_size(&self, src: &ResourceUri, ref_ipd: Mpt, env: &LayoutEnv) -> (Mpt, Mpt) {
        let font_size = self.style.font.size;
        let explicit_width = self.style.content_width.and_then(|w| w.resolve(font_size, Some(ref_ipd)));
        let explicit_height = self.style.content_height.and_then(|h| h.resolve(font_size, None));
        if let (Some(width), Some(height)) = (explicit_width, explicit_height) {
            return (width, height);
        }
        match env.images.intrinsic_size(src.as_str()) {
            Ok(size) => match (explicit_width, explicit_height) {
                (Some(width), None) if size.width > 0 => {
                    (width, scale(size.height, width as i64, size.width as i64))
                }
                (None, Some(height)) if size.height > 0 => {
                    (scale(size.width, height as i64, size.height as i64), height)
                }
                _ => (size.width, size.height),
            },
            Err(e) => {
                warn!("{}: image '{}' has no size: {}", self.id, src, e);
                (explicit_width.unwrap_or(0), explicit_height.unwrap_or(0))
            }
        }
    }
}

impl LayoutManager for LeafManager {
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
        let mut flags = BreakFlags::IS_FIRST | BreakFlags::IS_LAST;
        let (record, extent) = match &self.kind {
            LeafKind::PageNumber => self.text_record(env.page_number.to_string(), true, env),
            LeafKind::Citation(ref_id) => match env.tree.page_number_of(ref_id) {
                Some(number) => self.text_record(number.to_string(), true, env),
                None => {
                    debug!("{}: citation of '{}' is a forward reference", self.id, ref_id);
                    self.text_record(env.config.unresolved_placeholder.clone(), false, env)
                }
            },
            LeafKind::Leader => {
                flags |= BreakFlags::LEADER;
                let size = self
                    .style
                    .leader_length
                    .resolve(self.style.font.size, Some(ctx.ref_ipd))
                    .unwrap_or(SizeRange::ZERO);
                let record = LeafRecord { size, bpd: 0, text: None, resolved: true };
                (record, font_extent(&self.style, env.fonts))
            }
            LeafKind::Graphic(src) => {
                let (width, height) = self.graphic_size(src, ctx.ref_ipd, env);
                let record = LeafRecord { size: SizeRange::fixed(width), bpd: height, text: None, resolved: true };
                (record, LineExtent { ascent: height, descent: 0, line_height: 0 })
            }
        };
        let size = record.size;
        self.record = Some(record);
        let position = Position::new(self.id, 0);
        Ok(BreakResult::Break(BreakPoss::new(position, size).with_flags(flags).with_extent(extent)))
    }

    fn reset_position(&mut self, position: Option<Position>) {
        match position {
            Some(p) if p.manager != self.id || self.record.is_none() => {
                warn!("{}: ignoring reset to foreign position {:?}", self.id, p);
            }
            Some(_) => {}
            None if self.commit.protects(None) => {}
            None => self.record = None,
        }
    }

    fn is_finished(&self) -> bool {
        self.record.is_some()
    }

    fn add_areas(
        &mut self,
        positions: &[Position],
        ctx: &LayoutContext,
        _env: &LayoutEnv,
        sink: &mut CommitSink,
    ) -> Result<Vec<Area>, LayoutError> {
        let len = usize::from(self.record.is_some());
        let indices = self.commit.begin(self.id, positions, len)?;
        let Some(record) = self.record.clone().filter(|_| !indices.is_empty()) else {
            self.commit.finish(&indices);
            return Ok(Vec::new());
        };
        if let Some(id) = &self.node_id {
            sink.add_id(id);
        }
        let style = &self.style;
        let area = match &self.kind {
            LeafKind::PageNumber => InlineArea::Word {
                text: record.text.unwrap_or_default(),
                ipd: record.size.opt,
                font: style.font.clone(),
                color: style.color,
            },
            LeafKind::Citation(ref_id) => {
                let slot = if record.resolved { 0 } else { sink.add_unresolved(ref_id) };
                InlineArea::Citation {
                    ref_id: ref_id.clone(),
                    slot,
                    text: record.text.unwrap_or_default(),
                    ipd: record.size.opt,
                    font: style.font.clone(),
                    color: style.color,
                    resolved: record.resolved,
                }
            }
            LeafKind::Leader => InlineArea::Leader {
                ipd: record.size.adjusted(ctx.ipd_adjust),
                pattern: style.leader_pattern,
                thickness: style.rule_thickness,
                color: style.color,
            },
            LeafKind::Graphic(src) => InlineArea::Viewport { ipd: record.size.opt, bpd: record.bpd, src: src.clone() },
        };
        self.commit.finish(&indices);
        Ok(vec![Area::Inline(area)])
    }

    fn generates_inline_areas(&self) -> bool {
        true
    }
}
