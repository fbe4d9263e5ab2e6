use crate::units::Mpt;
use serde::{Deserialize, Serialize};

/// An axis-aligned rectangle in millipoints, origin at the top-left of the
/// page, `y` growing downwards.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rect {
    pub x: Mpt,
    pub y: Mpt,
    pub width: Mpt,
    pub height: Mpt,
}

impl Rect {
    pub fn new(x: Mpt, y: Mpt, width: Mpt, height: Mpt) -> Self {
        Self { x, y, width, height }
    }

    pub fn right(&self) -> Mpt {
        self.x + self.width
    }

    pub fn bottom(&self) -> Mpt {
        self.y + self.height
    }

    /// Shrinks the rectangle by the given insets. Negative results collapse
    /// to zero extent.
    pub fn inset(&self, insets: &Insets) -> Rect {
        Rect {
            x: self.x + insets.left,
            y: self.y + insets.top,
            width: (self.width - insets.left - insets.right).max(0),
            height: (self.height - insets.top - insets.bottom).max(0),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Size {
    pub width: Mpt,
    pub height: Mpt,
}

impl Size {
    pub fn new(width: Mpt, height: Mpt) -> Self {
        Self { width, height }
    }

    pub fn zero() -> Self {
        Self { width: 0, height: 0 }
    }
}

/// Distances from each edge of a rectangle, used for page and region margins.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Insets {
    pub top: Mpt,
    pub right: Mpt,
    pub bottom: Mpt,
    pub left: Mpt,
}

impl Insets {
    pub fn uniform(value: Mpt) -> Self {
        Self { top: value, right: value, bottom: value, left: value }
    }

    pub fn new(top: Mpt, right: Mpt, bottom: Mpt, left: Mpt) -> Self {
        Self { top, right, bottom, left }
    }
}
