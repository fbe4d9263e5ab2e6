//! Services and collectors shared by all managers of one layout run.

use crate::area::AreaTree;
use crate::config::LayoutConfig;
use crate::position::ManagerId;
use folio_traits::{FontMetrics, ImageProvider};
use folio_types::AnchorId;
use std::sync::atomic::{AtomicU32, Ordering};

/// Hands out manager ids for one document.
#[derive(Debug, Default)]
pub struct ManagerIds(AtomicU32);

impl ManagerIds {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn next(&self) -> ManagerId {
        ManagerId(self.0.fetch_add(1, Ordering::Relaxed))
    }
}

/// Read-only environment for break-seeking and commit calls.
pub struct LayoutEnv<'a> {
    pub fonts: &'a dyn FontMetrics,
    pub images: &'a dyn ImageProvider,
    /// The pages laid out so far; backward citations are looked up here.
    pub tree: &'a AreaTree,
    /// Formatted number of the page being filled.
    pub page_number: &'a str,
    pub config: &'a LayoutConfig,
    pub ids: &'a ManagerIds,
}

/// A citation committed with placeholder text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnresolvedCitation {
    pub ref_id: AnchorId,
    pub slot: u32,
}

/// Collects what `add_areas` calls report about the page being built.
#[derive(Debug, Default)]
pub struct CommitSink {
    ids: Vec<AnchorId>,
    unresolved: Vec<UnresolvedCitation>,
    next_slot: u32,
}

impl CommitSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records an id whose area is being committed to the current page.
    pub fn add_id(&mut self, id: &AnchorId) {
        self.ids.push(id.clone());
    }

    /// Records a citation awaiting its target; returns the slot that
    /// identifies its area for back-filling.
    pub fn add_unresolved(&mut self, ref_id: &AnchorId) -> u32 {
        let slot = self.next_slot;
        self.next_slot += 1;
        self.unresolved.push(UnresolvedCitation { ref_id: ref_id.clone(), slot });
        slot
    }

    /// Takes what was collected for the current page.
    pub fn take_page(&mut self) -> (Vec<AnchorId>, Vec<UnresolvedCitation>) {
        (std::mem::take(&mut self.ids), std::mem::take(&mut self.unresolved))
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty() && self.unresolved.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slots_are_unique_across_pages() {
        let mut sink = CommitSink::new();
        assert_eq!(sink.add_unresolved(&"a".into()), 0);
        let (_, first) = sink.take_page();
        assert_eq!(first.len(), 1);
        assert_eq!(sink.add_unresolved(&"a".into()), 1);
        assert!(!sink.is_empty());
    }

    #[test]
    fn test_manager_ids_are_distinct() {
        let ids = ManagerIds::new();
        assert_ne!(ids.next(), ids.next());
    }
}
