//! Break possibilities: the values managers hand to their parents.

use crate::position::Position;
use bitflags::bitflags;
use folio_types::{Mpt, SizeRange};

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct BreakFlags: u16 {
        /// The break ends the manager's first chunk of content.
        const IS_FIRST = 1;
        /// The break ends the manager's content.
        const IS_LAST = 1 << 1;
        /// The content following this break does not fit the limit it was
        /// offered; the parent must close its area here.
        const NEXT_OVERFLOWS = 1 << 2;
        /// A break must happen here (linefeed, `break-after="page"`).
        const FORCE_BREAK = 1 << 3;
        /// The chunk consists only of elastic space (suppressed at line ends).
        const SPACE_ONLY = 1 << 4;
        /// The chunk exceeds its limit and was emitted only to guarantee
        /// progress at the start of an empty area.
        const FORCED_FIT = 1 << 5;
        /// The chunk holds a leader that takes up slack when its line is
        /// committed.
        const LEADER = 1 << 6;
    }
}

/// Vertical metrics an inline chunk contributes to its line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LineExtent {
    pub ascent: Mpt,
    pub descent: Mpt,
    pub line_height: Mpt,
}

impl LineExtent {
    pub fn merge(&self, other: &LineExtent) -> LineExtent {
        LineExtent {
            ascent: self.ascent.max(other.ascent),
            descent: self.descent.max(other.descent),
            line_height: self.line_height.max(other.line_height),
        }
    }
}

/// A legal break point.
///
/// `stack_size` is the extent of the chunk ending at this break along the
/// manager's stacking direction: block-progression for block-level
/// managers, inline-progression for inline-level ones.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BreakPoss {
    pub position: Position,
    pub stack_size: SizeRange,
    pub flags: BreakFlags,
    pub extent: LineExtent,
}

impl BreakPoss {
    pub fn new(position: Position, stack_size: SizeRange) -> Self {
        Self {
            position,
            stack_size,
            flags: BreakFlags::empty(),
            extent: LineExtent::default(),
        }
    }

    pub fn with_flags(mut self, flags: BreakFlags) -> Self {
        self.flags |= flags;
        self
    }

    pub fn with_extent(mut self, extent: LineExtent) -> Self {
        self.extent = extent;
        self
    }

    pub fn next_overflows(&self) -> bool {
        self.flags.contains(BreakFlags::NEXT_OVERFLOWS)
    }

    pub fn is_last(&self) -> bool {
        self.flags.contains(BreakFlags::IS_LAST)
    }
}

/// Outcome of asking a manager for its next break.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BreakResult {
    Break(BreakPoss),
    /// Nothing fits the offered limit. The manager is back in the state it
    /// had before the call, so the request can be retried with a larger
    /// limit.
    NoFit,
    /// The manager had no content left to offer.
    Exhausted,
}

impl BreakResult {
    pub fn into_break(self) -> Option<BreakPoss> {
        match self {
            BreakResult::Break(bp) => Some(bp),
            _ => None,
        }
    }
}
