//! Length units used throughout layout.
//!
//! All extents are integer millipoints (1/1000 of a typographic point) so
//! that accumulation over long documents never drifts.

/// A length in millipoints.
pub type Mpt = i32;

pub const MPT_PER_POINT: i32 = 1000;

/// Converts points to millipoints, rounding to the nearest unit.
pub fn pt(points: f64) -> Mpt {
    (points * MPT_PER_POINT as f64).round() as Mpt
}

/// Converts millipoints back to points.
pub fn to_points(mpt: Mpt) -> f64 {
    mpt as f64 / MPT_PER_POINT as f64
}

/// Scales a length by `num / den` using 64-bit intermediates.
pub fn scale(value: Mpt, num: i64, den: i64) -> Mpt {
    if den == 0 {
        return 0;
    }
    ((value as i64 * num) / den) as Mpt
}
