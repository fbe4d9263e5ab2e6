//! `fo:inline` and `fo:basic-link`: styled containers of inline content.

use super::cursor::ChildCursor;
use super::{CommitState, LayoutManager, Manager};
use crate::LayoutError;
use crate::area::{Area, InlineArea, Trait, TraitValue, Traits};
use crate::break_poss::{BreakFlags, BreakPoss, BreakResult};
use crate::context::LayoutContext;
use crate::env::{CommitSink, LayoutEnv};
use crate::position::{ChildPosition, ManagerId, Position, group_by_child};
use crate::style::ComputedStyle;
use folio_idf::LinkDestination;
use folio_types::AnchorId;
use log::warn;
use std::sync::Arc;

#[derive(Debug)]
pub struct InlineManager {
    id: ManagerId,
    node_id: Option<AnchorId>,
    style: Arc<ComputedStyle>,
    link: Option<LinkDestination>,
    cursor: ChildCursor,
    /// One child break per record.
    records: Vec<ChildPosition>,
    commit: CommitState,
}

impl InlineManager {
    pub fn new(
        id: ManagerId,
        node_id: Option<AnchorId>,
        style: Arc<ComputedStyle>,
        link: Option<LinkDestination>,
        children: Vec<Manager>,
    ) -> Self {
        Self {
            id,
            node_id,
            style,
            link,
            cursor: ChildCursor::new(children),
            records: Vec::new(),
            commit: CommitState::default(),
        }
    }

    fn traits(&self) -> Traits {
        let mut traits = Traits::new();
        match &self.link {
            Some(LinkDestination::Internal(target)) => {
                traits.set(Trait::InternalLink, TraitValue::Id(target.clone()))
            }
            Some(LinkDestination::External(uri)) => {
                traits.set(Trait::ExternalLink, TraitValue::Text(uri.clone()))
            }
            None => {}
        }
        if let Some(background) = self.style.background {
            traits.set(Trait::Background, TraitValue::Color(background));
        }
        traits.set(Trait::Color, TraitValue::Color(self.style.color));
        traits
    }
}

impl LayoutManager for InlineManager {
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
        while let Some(index) = self.cursor.next_unfinished() {
            let bp = match self.cursor.children[index].get_next_break_poss(ctx, env)? {
                BreakResult::Exhausted => {
                    self.cursor.skip_current();
                    continue;
                }
                BreakResult::NoFit => return Ok(BreakResult::NoFit),
                BreakResult::Break(bp) => bp,
            };
            self.records.push(ChildPosition::new(index, bp.position));
            let mut flags = bp.flags - (BreakFlags::IS_FIRST | BreakFlags::IS_LAST);
            flags.set(BreakFlags::IS_FIRST, self.records.len() == 1);
            flags.set(BreakFlags::IS_LAST, self.cursor.is_finished());
            let position = Position::new(self.id, self.records.len() - 1);
            return Ok(BreakResult::Break(
                BreakPoss::new(position, bp.stack_size).with_flags(flags).with_extent(bp.extent),
            ));
        }
        Ok(BreakResult::Exhausted)
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
                self.cursor.rewind(Some(self.records[i]));
            }
            None => {
                self.records.clear();
                self.cursor.rewind(None);
            }
        }
    }

    fn is_finished(&self) -> bool {
        self.cursor.is_finished()
    }

    fn add_areas(
        &mut self,
        positions: &[Position],
        ctx: &LayoutContext,
        env: &LayoutEnv,
        sink: &mut CommitSink,
    ) -> Result<Vec<Area>, LayoutError> {
        let indices = self.commit.begin(self.id, positions, self.records.len())?;
        if indices.first() == Some(&0)
            && let Some(id) = &self.node_id
        {
            sink.add_id(id);
        }
        let units: Vec<ChildPosition> = indices.iter().map(|&i| self.records[i]).collect();
        let mut children = Vec::new();
        for (child, run) in group_by_child(&units) {
            for area in self.cursor.children[child].add_areas(&run, ctx, env, sink)? {
                match area {
                    Area::Inline(inline) => children.push(inline),
                    other => warn!("{}: dropping non-inline area {:?}", self.id, other),
                }
            }
        }
        self.commit.finish(&indices);
        Ok(vec![Area::Inline(InlineArea::Parent {
            ipd: children.iter().map(InlineArea::ipd).sum(),
            traits: self.traits(),
            children,
        })])
    }

    fn generates_inline_areas(&self) -> bool {
        true
    }
}
