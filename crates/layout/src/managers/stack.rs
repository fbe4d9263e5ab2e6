//! Stacking of block-level children along the block-progression
//! direction, shared by blocks, the flow, list-item regions, table cells
//! and table bodies.

use super::cursor::ChildCursor;
use super::{LayoutManager, Manager};
use crate::LayoutError;
use crate::area::Area;
use crate::break_poss::{BreakFlags, BreakResult};
use crate::context::LayoutContext;
use crate::env::{CommitSink, LayoutEnv};
use crate::position::{ChildPosition, ManagerId, Position, group_by_child};
use folio_types::SizeRange;
use log::debug;

/// The children's breaks accepted into one piece of the owner's content.
#[derive(Debug, Clone, Default)]
pub struct StackChunk {
    pub breaks: Vec<ChildPosition>,
    /// The last child break accepted up to and including this chunk.
    pub resume: Option<ChildPosition>,
    pub size: SizeRange,
    /// The content following this chunk did not fit.
    pub overflow: bool,
    /// Some content was accepted beyond the limit to guarantee progress.
    pub forced: bool,
    /// Ended by a forced break.
    pub force_break: bool,
}

#[derive(Debug)]
pub struct BlockStack {
    owner: ManagerId,
    pub cursor: ChildCursor,
    chunks: Vec<StackChunk>,
    committed: usize,
}

impl BlockStack {
    pub fn new(owner: ManagerId, children: Vec<Manager>) -> Self {
        Self { owner, cursor: ChildCursor::new(children), chunks: Vec::new(), committed: 0 }
    }

    /// Accepts child breaks until the limit is reached, a child forces a
    /// break, or the children run out.
    ///
    /// A child break whose addition overflows the limit is rolled back to
    /// the last good break, unless nothing was accepted yet at the start
    /// of an area, in which case it is kept and flagged. Returns the new
    /// chunk's index, or `None` if nothing was accepted; in that case the
    /// children are as they were before the call.
    pub fn fill(&mut self, ctx: &LayoutContext, env: &LayoutEnv) -> Result<Option<usize>, LayoutError> {
        let limit = ctx.stack_limit;
        let at_start = ctx.at_area_start();
        let mut chunk = StackChunk {
            resume: self.chunks.last().and_then(|c| c.resume),
            ..Default::default()
        };

        while let Some(index) = self.cursor.next_unfinished() {
            let area_start = at_start && chunk.breaks.is_empty();
            if self.cursor.children[index].breaks_before() && !area_start {
                if !chunk.breaks.is_empty() {
                    chunk.force_break = true;
                    break;
                }
                debug!("{}: break-before of child {} ignored inside a started area", self.owner, index);
            }

            let child_ctx = ctx.remaining(chunk.size, area_start);
            let child = &mut self.cursor.children[index];
            match child.get_next_break_poss(&child_ctx, env)? {
                BreakResult::Exhausted => {
                    self.cursor.skip_current();
                }
                BreakResult::NoFit => {
                    chunk.overflow = true;
                    break;
                }
                BreakResult::Break(bp) => {
                    let size = chunk.size + bp.stack_size;
                    let overflows = size.overflows(&limit);
                    if overflows && !area_start {
                        debug!(
                            "{}: {} exceeds limit {}, rolling back to {:?}",
                            self.owner, size, limit, chunk.resume
                        );
                        self.cursor.rewind(chunk.resume);
                        chunk.overflow = true;
                        break;
                    }

                    let accepted = ChildPosition::new(index, bp.position);
                    chunk.breaks.push(accepted);
                    chunk.resume = Some(accepted);
                    chunk.size = size;
                    if overflows {
                        debug!("{}: forcing {} into limit {}", self.owner, size, limit);
                        chunk.forced = true;
                        chunk.overflow = true;
                        break;
                    }
                    if bp.flags.contains(BreakFlags::FORCED_FIT) {
                        chunk.forced = true;
                    }
                    if bp.next_overflows() {
                        chunk.overflow = true;
                        break;
                    }
                    if bp.flags.contains(BreakFlags::FORCE_BREAK) {
                        chunk.force_break = true;
                        break;
                    }
                }
            }
        }

        if chunk.breaks.is_empty() {
            return Ok(None);
        }
        self.chunks.push(chunk);
        Ok(Some(self.chunks.len() - 1))
    }

    pub fn chunk(&self, index: usize) -> &StackChunk {
        &self.chunks[index]
    }

    pub fn chunk_count(&self) -> usize {
        self.chunks.len()
    }

    pub fn is_finished(&self) -> bool {
        self.cursor.is_finished()
    }

    /// Rewinds to right after chunk `to`, or to the start.
    pub fn reset_to(&mut self, to: Option<usize>) {
        let protected = match to {
            None => self.committed > 0,
            Some(i) => i + 1 < self.committed || i >= self.chunks.len(),
        };
        if protected {
            debug!("{}: ignoring reset to chunk {:?}", self.owner, to);
            return;
        }
        match to {
            Some(index) => {
                self.chunks.truncate(index + 1);
                let resume = self.chunks[index].resume;
                self.cursor.rewind(resume);
            }
            None => {
                self.chunks.clear();
                self.cursor.rewind(None);
            }
        }
    }

    /// Commits chunk `index`, replaying the accepted child positions.
    pub fn commit(
        &mut self,
        index: usize,
        ctx: &LayoutContext,
        env: &LayoutEnv,
        sink: &mut CommitSink,
    ) -> Result<Vec<Area>, LayoutError> {
        if index < self.committed || index >= self.chunks.len() {
            return Err(LayoutError::AlreadyCommitted(Position::new(self.owner, index)));
        }
        let mut areas = Vec::new();
        for (child, positions) in group_by_child(&self.chunks[index].breaks) {
            areas.extend(self.cursor.children[child].add_areas(&positions, ctx, env, sink)?);
        }
        self.committed = index + 1;
        Ok(areas)
    }
}
