//! The document outline as an area tree extension.

use crate::LayoutError;
use crate::area::AreaTreeExtension;
use crate::resolve::{NodeId, PageRef, Resolvable, ResolveRegistry};
use folio_idf::Bookmark;
use folio_types::AnchorId;
use std::any::Any;

/// A resolved outline entry.
#[derive(Debug, Clone, PartialEq)]
pub struct BookmarkEntry {
    pub title: String,
    pub destination: AnchorId,
    /// The page holding the destination; `None` if it was never located.
    pub target: Option<PageRef>,
    pub children: Vec<BookmarkEntry>,
}

#[derive(Debug)]
struct Item {
    node: NodeId,
    title: String,
    destination: AnchorId,
    children: Vec<Item>,
}

/// Nested bookmarks waiting for their destinations, backed by a registry
/// of their own.
#[derive(Debug)]
pub struct BookmarkTree {
    registry: ResolveRegistry,
    root: NodeId,
    items: Vec<Item>,
}

impl BookmarkTree {
    pub fn new(bookmarks: &[Bookmark]) -> Result<Self, LayoutError> {
        let mut registry = ResolveRegistry::new();
        let root = registry.create(None);
        let items = Self::attach(&mut registry, root, bookmarks)?;
        registry.register(root)?;
        Ok(Self { registry, root, items })
    }

    fn attach(registry: &mut ResolveRegistry, parent: NodeId, bookmarks: &[Bookmark]) -> Result<Vec<Item>, LayoutError> {
        let mut items = Vec::with_capacity(bookmarks.len());
        for bookmark in bookmarks {
            let node = registry.create(Some(bookmark.destination.clone()));
            let children = Self::attach(registry, node, &bookmark.children)?;
            registry.add_child(parent, node)?;
            items.push(Item {
                node,
                title: bookmark.title.clone(),
                destination: bookmark.destination.clone(),
                children,
            });
        }
        Ok(items)
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// The outline with the targets bound so far.
    pub fn outline(&self) -> Vec<BookmarkEntry> {
        fn entries(registry: &ResolveRegistry, items: &[Item]) -> Vec<BookmarkEntry> {
            items
                .iter()
                .map(|item| BookmarkEntry {
                    title: item.title.clone(),
                    destination: item.destination.clone(),
                    target: registry.target(item.node).cloned(),
                    children: entries(registry, &item.children),
                })
                .collect()
        }
        entries(&self.registry, &self.items)
    }
}

impl Resolvable for BookmarkTree {
    fn ids(&self) -> Vec<AnchorId> {
        self.registry.pending_ids(self.root)
    }

    fn resolve(&mut self, id: &AnchorId, targets: &[PageRef]) {
        self.registry.resolve(id, targets);
        self.registry.drain_completed();
    }

    fn is_resolved(&self) -> bool {
        self.registry.is_resolved(self.root)
    }
}

impl AreaTreeExtension for BookmarkTree {
    fn name(&self) -> &str {
        "bookmarks"
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn outline() -> Vec<Bookmark> {
        vec![
            Bookmark::new("Intro", "intro"),
            Bookmark::new("Part", "part").with_children(vec![Bookmark::new("Detail", "detail")]),
        ]
    }

    #[test]
    fn test_nested_ids_are_pending_until_resolved() {
        let mut tree = BookmarkTree::new(&outline()).unwrap();
        assert_eq!(tree.ids().len(), 3);
        tree.resolve(&"detail".into(), &[PageRef::new(2, "3")]);
        tree.resolve(&"intro".into(), &[PageRef::new(0, "1")]);
        assert!(!tree.is_resolved());
        tree.resolve(&"part".into(), &[PageRef::new(1, "2"), PageRef::new(2, "3")]);
        assert!(tree.is_resolved());

        let entries = tree.outline();
        assert_eq!(entries[1].target, Some(PageRef::new(1, "2")));
        assert_eq!(entries[1].children[0].target.as_ref().map(|t| t.number.as_str()), Some("3"));
    }

    #[test]
    fn test_empty_outline_is_resolved() {
        let tree = BookmarkTree::new(&[]).unwrap();
        assert!(tree.is_empty());
        assert!(tree.is_resolved());
    }
}
