//! The immutable context threaded through break-seeking and commit calls.

use bitflags::bitflags;
use folio_types::{Mpt, SizeRange};

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct LayoutFlags: u8 {
        /// Nothing has been placed in the enclosing area yet: an oversized
        /// unit must be emitted anyway and space-before is discarded.
        const AT_AREA_START = 1;
        /// Drop leading elastic spaces (start of a line).
        const SUPPRESS_LEADING_SPACE = 1 << 1;
    }
}

/// Limits and measures for one call.
///
/// Each level derives its children's context instead of mutating a shared
/// one: `remaining = parent_limit - consumed_so_far` is computed locally.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutContext {
    /// Remaining budget along the stacking direction.
    pub stack_limit: SizeRange,
    /// Reference inline-progression-dimension (content width).
    pub ref_ipd: Mpt,
    pub flags: LayoutFlags,
    /// Adjustment ratio in `[-1, 1]` applied to elastic inline content when
    /// committing a line.
    pub ipd_adjust: f64,
}

impl LayoutContext {
    pub fn new(stack_limit: SizeRange, ref_ipd: Mpt) -> Self {
        Self {
            stack_limit,
            ref_ipd,
            flags: LayoutFlags::empty(),
            ipd_adjust: 0.0,
        }
    }

    pub fn with_flags(mut self, flags: LayoutFlags) -> Self {
        self.flags = flags;
        self
    }

    pub fn with_limit(mut self, stack_limit: SizeRange) -> Self {
        self.stack_limit = stack_limit;
        self
    }

    pub fn with_ref_ipd(mut self, ref_ipd: Mpt) -> Self {
        self.ref_ipd = ref_ipd;
        self
    }

    pub fn with_adjust(mut self, ipd_adjust: f64) -> Self {
        self.ipd_adjust = ipd_adjust;
        self
    }

    pub fn at_area_start(&self) -> bool {
        self.flags.contains(LayoutFlags::AT_AREA_START)
    }

    pub fn suppress_leading_space(&self) -> bool {
        self.flags.contains(LayoutFlags::SUPPRESS_LEADING_SPACE)
    }

    /// A child context: the same measure with `consumed` subtracted from
    /// the limit, flagged as area start only while nothing was consumed.
    pub fn remaining(&self, consumed: SizeRange, area_start: bool) -> LayoutContext {
        let mut flags = LayoutFlags::empty();
        flags.set(LayoutFlags::AT_AREA_START, area_start);
        LayoutContext {
            stack_limit: self.stack_limit - consumed,
            ref_ipd: self.ref_ipd,
            flags,
            ipd_adjust: 0.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_remaining_subtracts_without_mutating_parent() {
        let parent = LayoutContext::new(SizeRange::fixed(5_000), 100_000)
            .with_flags(LayoutFlags::AT_AREA_START);
        let child = parent.remaining(SizeRange::fixed(2_000), false);
        assert_eq!(child.stack_limit, SizeRange::fixed(3_000));
        assert!(!child.at_area_start());
        assert_eq!(parent.stack_limit, SizeRange::fixed(5_000));
        assert!(parent.at_area_start());
    }
}
