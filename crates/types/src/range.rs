//! Three-valued extents.
//!
//! A [`SizeRange`] describes how far a piece of content may shrink (`min`),
//! how large it would like to be (`opt`) and how far it may stretch (`max`).
//! Ranges compose additively when content is stacked and with
//! [`SizeRange::max_of`] when content sits side by side.
//!
//! Arithmetic never clamps and never reorders the components. A range whose
//! `min` exceeds its `max` is carried through unchanged; use
//! [`SizeRange::is_consistent`] where an ordered range is required.

use crate::units::Mpt;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, AddAssign, Neg, Sub, SubAssign};

/// Largest extent treated as "unbounded". Leaves headroom so sums of a few
/// unbounded limits do not overflow `i32`.
pub const UNBOUNDED: Mpt = i32::MAX / 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct SizeRange {
    pub min: Mpt,
    pub opt: Mpt,
    pub max: Mpt,
}

impl SizeRange {
    pub const ZERO: SizeRange = SizeRange { min: 0, opt: 0, max: 0 };

    pub const fn new(min: Mpt, opt: Mpt, max: Mpt) -> Self {
        Self { min, opt, max }
    }

    /// A rigid extent: all three components equal.
    pub const fn fixed(value: Mpt) -> Self {
        Self { min: value, opt: value, max: value }
    }

    /// A limit that nothing overflows.
    pub const fn unbounded() -> Self {
        Self { min: 0, opt: UNBOUNDED, max: UNBOUNDED }
    }

    pub fn is_zero(&self) -> bool {
        *self == Self::ZERO
    }

    /// `min <= opt <= max`.
    pub fn is_consistent(&self) -> bool {
        self.min <= self.opt && self.opt <= self.max
    }

    /// True when this extent, at its preferred size, exceeds the largest
    /// extent `limit` allows.
    pub fn overflows(&self, limit: &SizeRange) -> bool {
        self.opt > limit.max
    }

    /// True when this extent could fit `limit` if fully shrunk.
    pub fn can_fit(&self, limit: &SizeRange) -> bool {
        self.min <= limit.max
    }

    /// Component-wise maximum, used when regions share one block extent.
    pub fn max_of(&self, other: &SizeRange) -> SizeRange {
        SizeRange {
            min: self.min.max(other.min),
            opt: self.opt.max(other.opt),
            max: self.max.max(other.max),
        }
    }

    /// Amount available for shrinking below `opt`.
    pub fn shrink(&self) -> Mpt {
        self.opt - self.min
    }

    /// Amount available for stretching beyond `opt`.
    pub fn stretch(&self) -> Mpt {
        self.max - self.opt
    }

    /// The extent after applying an adjustment ratio in `[-1, 1]`: negative
    /// values shrink towards `min`, positive values stretch towards `max`.
    pub fn adjusted(&self, ratio: f64) -> Mpt {
        let ratio = ratio.clamp(-1.0, 1.0);
        let delta = if ratio >= 0.0 {
            ratio * self.stretch() as f64
        } else {
            ratio * self.shrink() as f64
        };
        self.opt + delta.round() as Mpt
    }

    /// Multiplies each component by `factor`.
    pub fn scaled(&self, factor: i32) -> SizeRange {
        SizeRange {
            min: self.min * factor,
            opt: self.opt * factor,
            max: self.max * factor,
        }
    }
}

impl Add for SizeRange {
    type Output = SizeRange;

    fn add(self, rhs: SizeRange) -> SizeRange {
        SizeRange {
            min: self.min + rhs.min,
            opt: self.opt + rhs.opt,
            max: self.max + rhs.max,
        }
    }
}

impl AddAssign for SizeRange {
    fn add_assign(&mut self, rhs: SizeRange) {
        *self = *self + rhs;
    }
}

impl Sub for SizeRange {
    type Output = SizeRange;

    fn sub(self, rhs: SizeRange) -> SizeRange {
        SizeRange {
            min: self.min - rhs.min,
            opt: self.opt - rhs.opt,
            max: self.max - rhs.max,
        }
    }
}

impl SubAssign for SizeRange {
    fn sub_assign(&mut self, rhs: SizeRange) {
        *self = *self - rhs;
    }
}

impl Neg for SizeRange {
    type Output = SizeRange;

    fn neg(self) -> SizeRange {
        SizeRange { min: -self.min, opt: -self.opt, max: -self.max }
    }
}

impl From<Mpt> for SizeRange {
    fn from(value: Mpt) -> Self {
        SizeRange::fixed(value)
    }
}

impl fmt::Display for SizeRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.min, self.opt, self.max)
    }
}
