use super::{LayoutManager, Manager};
use crate::position::ChildPosition;

/// A manager's children plus the index of the child currently asked for
/// breaks.
#[derive(Debug, Default)]
pub struct ChildCursor {
    pub children: Vec<Manager>,
    current: usize,
}

impl ChildCursor {
    pub fn new(children: Vec<Manager>) -> Self {
        Self { children, current: 0 }
    }

    /// Moves past finished children and returns the first unfinished one.
    pub fn next_unfinished(&mut self) -> Option<usize> {
        while self.current < self.children.len() && self.children[self.current].is_finished() {
            self.current += 1;
        }
        (self.current < self.children.len()).then_some(self.current)
    }

    /// Steps past the current child, which reported it has nothing left.
    pub fn skip_current(&mut self) {
        self.current = (self.current + 1).min(self.children.len());
    }

    pub fn current(&self) -> usize {
        self.current
    }

    pub fn is_finished(&self) -> bool {
        self.children[self.current.min(self.children.len())..]
            .iter()
            .all(|c| c.is_finished())
    }

    /// Restores the children to the state right after `to`: that child is
    /// rewound to the position, every later child that was touched is
    /// rewound to its start. `None` rewinds all touched children.
    pub fn rewind(&mut self, to: Option<ChildPosition>) {
        let last_touched = self.current.min(self.children.len().saturating_sub(1));
        let first_reset = match to {
            Some(cp) => {
                self.children[cp.child].reset_position(Some(cp.position));
                self.current = cp.child;
                cp.child + 1
            }
            None => {
                self.current = 0;
                0
            }
        };
        if self.children.is_empty() {
            return;
        }
        for child in first_reset..=last_touched {
            self.children[child].reset_position(None);
        }
    }

    pub fn first(&self) -> Option<&Manager> {
        self.children.first()
    }

    pub fn len(&self) -> usize {
        self.children.len()
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }
}
