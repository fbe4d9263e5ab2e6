//! Layout managers: one per formatting object, each turning its content
//! into break possibilities and, once positions are accepted, into areas.

pub mod block;
pub mod builder;
pub mod cursor;
pub mod flow;
pub mod inline;
pub mod leaf;
pub mod line;
pub mod list_item;
pub mod page;
pub mod regions;
pub mod stack;
pub mod table;
pub mod text;

pub use self::block::BlockManager;
pub use self::builder::ManagerBuilder;
pub use self::flow::FlowManager;
pub use self::inline::InlineManager;
pub use self::leaf::{LeafKind, LeafManager};
pub use self::line::LineManager;
pub use self::list_item::ListItemManager;
pub use self::page::{PageGeometry, PageSequenceLayout, SequenceServices};
pub use self::table::{CellSpec, TableManager, TableRowManager};
pub use self::text::TextManager;

use crate::LayoutError;
use crate::area::Area;
use crate::break_poss::BreakResult;
use crate::context::LayoutContext;
use crate::env::{CommitSink, LayoutEnv};
use crate::position::{ManagerId, Position};

/// The break-possibility protocol.
///
/// A manager moves from not started, through in progress, to finished.
/// `get_next_break_poss` either advances and returns the next break, or
/// reports that nothing fits and leaves the manager as it was. Accepted
/// positions are later handed back, in order and exactly once, to
/// `add_areas`.
pub trait LayoutManager {
    fn id(&self) -> ManagerId;

    /// Returns the next legal break within `ctx.stack_limit`.
    ///
    /// At the start of an area a manager must return content even if it
    /// does not fit (flagged `FORCED_FIT` and `NEXT_OVERFLOWS`) so layout
    /// always terminates. Calling this after `is_finished()` is an error.
    fn get_next_break_poss(
        &mut self,
        ctx: &LayoutContext,
        env: &LayoutEnv,
    ) -> Result<BreakResult, LayoutError>;

    /// Rewinds so that the next break continues right after `position`,
    /// or from the very start for `None`. Rewinding into content that was
    /// already committed is ignored.
    fn reset_position(&mut self, position: Option<Position>);

    /// True once every piece of content was handed out in a break.
    fn is_finished(&self) -> bool;

    /// Commits accepted positions into areas for the parent to place.
    fn add_areas(
        &mut self,
        positions: &[Position],
        ctx: &LayoutContext,
        env: &LayoutEnv,
        sink: &mut CommitSink,
    ) -> Result<Vec<Area>, LayoutError>;

    fn generates_inline_areas(&self) -> bool {
        false
    }
}

/// The closed set of managers.
#[derive(Debug)]
pub enum Manager {
    Block(BlockManager),
    Line(LineManager),
    Inline(InlineManager),
    Text(TextManager),
    Leaf(LeafManager),
    ListItem(ListItemManager),
    Table(TableManager),
    TableRow(TableRowManager),
}

macro_rules! dispatch {
    ($self:expr, $m:ident => $body:expr) => {
        match $self {
            Manager::Block($m) => $body,
            Manager::Line($m) => $body,
            Manager::Inline($m) => $body,
            Manager::Text($m) => $body,
            Manager::Leaf($m) => $body,
            Manager::ListItem($m) => $body,
            Manager::Table($m) => $body,
            Manager::TableRow($m) => $body,
        }
    };
}

impl Manager {
    /// True when the manager has not started and wants its content to
    /// begin a new page.
    pub fn breaks_before(&self) -> bool {
        match self {
            Manager::Block(m) => m.breaks_before(),
            Manager::ListItem(m) => m.breaks_before(),
            Manager::Table(m) => m.breaks_before(),
            _ => false,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Manager::Block(_) => "block",
            Manager::Line(_) => "line",
            Manager::Inline(_) => "inline",
            Manager::Text(_) => "text",
            Manager::Leaf(_) => "leaf",
            Manager::ListItem(_) => "list-item",
            Manager::Table(_) => "table",
            Manager::TableRow(_) => "table-row",
        }
    }
}

impl LayoutManager for Manager {
    fn id(&self) -> ManagerId {
        dispatch!(self, m => m.id())
    }

    fn get_next_break_poss(
        &mut self,
        ctx: &LayoutContext,
        env: &LayoutEnv,
    ) -> Result<BreakResult, LayoutError> {
        dispatch!(self, m => m.get_next_break_poss(ctx, env))
    }

    fn reset_position(&mut self, position: Option<Position>) {
        dispatch!(self, m => m.reset_position(position))
    }

    fn is_finished(&self) -> bool {
        dispatch!(self, m => m.is_finished())
    }

    fn add_areas(
        &mut self,
        positions: &[Position],
        ctx: &LayoutContext,
        env: &LayoutEnv,
        sink: &mut CommitSink,
    ) -> Result<Vec<Area>, LayoutError> {
        dispatch!(self, m => m.add_areas(positions, ctx, env, sink))
    }

    fn generates_inline_areas(&self) -> bool {
        dispatch!(self, m => m.generates_inline_areas())
    }
}

/// Checks that `position` was issued by `id` and indexes one of `len`
/// records.
pub(crate) fn check_position(id: ManagerId, position: &Position, len: usize) -> Result<usize, LayoutError> {
    if position.manager != id || position.index >= len {
        return Err(LayoutError::UnknownPosition(*position));
    }
    Ok(position.index)
}

/// Bookkeeping shared by managers for the commit guards: how many
/// records were committed, and whether a working area is open.
#[derive(Debug, Default)]
pub(crate) struct CommitState {
    pub committed: usize,
    pub working: bool,
}

impl CommitState {
    /// Opens a commit of `indices` (ascending), failing on re-entry and on
    /// records that were committed before.
    pub fn begin(&mut self, id: ManagerId, positions: &[Position], len: usize) -> Result<Vec<usize>, LayoutError> {
        if self.working {
            return Err(LayoutError::ReentrantCommit(id));
        }
        let mut indices = Vec::with_capacity(positions.len());
        for position in positions {
            let index = check_position(id, position, len)?;
            if index < self.committed || indices.last().is_some_and(|last| index <= *last) {
                return Err(LayoutError::AlreadyCommitted(*position));
            }
            indices.push(index);
        }
        self.working = true;
        Ok(indices)
    }

    pub fn finish(&mut self, indices: &[usize]) {
        if let Some(last) = indices.last() {
            self.committed = self.committed.max(last + 1);
        }
        self.working = false;
    }

    /// Whether rewinding to just after record `index` (or to the start)
    /// would discard committed records.
    pub fn protects(&self, index: Option<usize>) -> bool {
        match index {
            None => self.committed > 0,
            Some(i) => i + 1 < self.committed,
        }
    }
}
