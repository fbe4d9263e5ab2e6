//! Opaque handles into layout managers' pending break lists.

use itertools::Itertools;
use std::fmt;

/// Identifies one layout manager instance within a layout run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ManagerId(pub(crate) u32);

impl fmt::Display for ManagerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "lm#{}", self.0)
    }
}

/// A break produced by a manager: the manager's id plus an index into the
/// list of break records that manager keeps.
///
/// Only the issuing manager can interpret the index. Parents store
/// positions and hand them back for `reset_position` and `add_areas`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Position {
    pub manager: ManagerId,
    pub index: usize,
}

impl Position {
    pub fn new(manager: ManagerId, index: usize) -> Self {
        Self { manager, index }
    }
}

/// A child's position tagged with the child's slot in its parent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChildPosition {
    pub child: usize,
    pub position: Position,
}

impl ChildPosition {
    pub fn new(child: usize, position: Position) -> Self {
        Self { child, position }
    }
}

/// Splits an accepted break sequence into runs of consecutive positions
/// from the same child, preserving order, for replay through `add_areas`.
pub fn group_by_child(positions: &[ChildPosition]) -> Vec<(usize, Vec<Position>)> {
    let mut groups = Vec::new();
    for (child, run) in &positions.iter().chunk_by(|p| p.child) {
        groups.push((child, run.map(|p| p.position).collect()));
    }
    groups
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_group_by_child_keeps_runs_in_order() {
        let a = ManagerId(1);
        let b = ManagerId(2);
        let positions = [
            ChildPosition::new(0, Position::new(a, 0)),
            ChildPosition::new(0, Position::new(a, 1)),
            ChildPosition::new(1, Position::new(b, 0)),
            ChildPosition::new(0, Position::new(a, 2)),
        ];
        let groups = group_by_child(&positions);
        assert_eq!(
            groups,
            vec![
                (0, vec![Position::new(a, 0), Position::new(a, 1)]),
                (1, vec![Position::new(b, 0)]),
                (0, vec![Position::new(a, 2)]),
            ]
        );
    }

    #[test]
    fn test_group_by_child_empty() {
        assert!(group_by_child(&[]).is_empty());
    }
}
