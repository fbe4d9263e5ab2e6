//! `fo:flow` and `fo:static-content`: the top of a region's manager tree.

use super::stack::BlockStack;
use super::{CommitState, LayoutManager, Manager};
use crate::LayoutError;
use crate::area::Area;
use crate::break_poss::{BreakFlags, BreakPoss, BreakResult};
use crate::context::LayoutContext;
use crate::env::{CommitSink, LayoutEnv};
use crate::position::{ManagerId, Position};
use log::warn;

/// Stacks block-level managers into one chunk per region.
#[derive(Debug)]
pub struct FlowManager {
    id: ManagerId,
    stack: BlockStack,
    commit: CommitState,
}

impl FlowManager {
    pub fn new(id: ManagerId, children: Vec<Manager>) -> Self {
        Self { id, stack: BlockStack::new(id, children), commit: CommitState::default() }
    }
}

impl LayoutManager for FlowManager {
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
        let Some(index) = self.stack.fill(ctx, env)? else {
            return Ok(if self.stack.is_finished() { BreakResult::Exhausted } else { BreakResult::NoFit });
        };
        let chunk = self.stack.chunk(index);
        let mut flags = BreakFlags::empty();
        flags.set(BreakFlags::IS_FIRST, index == 0);
        flags.set(BreakFlags::IS_LAST, self.stack.is_finished());
        flags.set(BreakFlags::NEXT_OVERFLOWS, chunk.overflow);
        flags.set(BreakFlags::FORCED_FIT, chunk.forced);
        flags.set(BreakFlags::FORCE_BREAK, chunk.force_break);
        Ok(BreakResult::Break(BreakPoss::new(Position::new(self.id, index), chunk.size).with_flags(flags)))
    }

    fn reset_position(&mut self, position: Option<Position>) {
        match position {
            Some(p) if p.manager != self.id || p.index >= self.stack.chunk_count() => {
                warn!("{}: ignoring reset to foreign position {:?}", self.id, p);
            }
            Some(p) => self.stack.reset_to(Some(p.index)),
            None => self.stack.reset_to(None),
        }
    }

    fn is_finished(&self) -> bool {
        self.stack.is_finished()
    }

    fn add_areas(
        &mut self,
        positions: &[Position],
        ctx: &LayoutContext,
        env: &LayoutEnv,
        sink: &mut CommitSink,
    ) -> Result<Vec<Area>, LayoutError> {
        let indices = self.commit.begin(self.id, positions, self.stack.chunk_count())?;
        let mut areas = Vec::new();
        for &index in &indices {
            areas.extend(self.stack.commit(index, ctx, env, sink)?);
        }
        self.commit.finish(&indices);
        Ok(areas)
    }
}
