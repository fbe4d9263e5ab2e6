//! The document-level container of pages, id locations and extensions.

use super::model::{AreaTreeExtension, AreaTreeModel};
use super::{InlineArea, PageViewport};
use crate::LayoutError;
use crate::config::LayoutConfig;
use crate::env::CommitSink;
use crate::resolve::{NodeId, PageRef, ResolveRegistry};
use folio_traits::FontMetrics;
use folio_types::AnchorId;
use log::{debug, warn};
use std::collections::{BTreeMap, HashMap, VecDeque};
use std::sync::Arc;

#[derive(Debug, Clone, Copy)]
enum Role {
    /// The container of a page's unresolved citations.
    Page(usize),
    Citation { page: usize, slot: u32 },
}

#[derive(Debug)]
struct ExtensionSlot {
    extension: Box<dyn AreaTreeExtension>,
    delivered: bool,
}

/// Owns the pages of one document and hands them to an
/// [`AreaTreeModel`] in order, each one only after every citation on it
/// was bound.
#[derive(Debug)]
pub struct AreaTree {
    fonts: Arc<dyn FontMetrics>,
    retain_pages: bool,
    pages: Vec<PageViewport>,
    id_locations: BTreeMap<AnchorId, Vec<PageRef>>,
    registry: ResolveRegistry,
    roles: HashMap<NodeId, Role>,
    extensions: Vec<ExtensionSlot>,
    extension_waits: BTreeMap<AnchorId, Vec<usize>>,
    sequence_starts: VecDeque<(usize, Option<String>)>,
    released: usize,
}

impl AreaTree {
    pub fn new(fonts: Arc<dyn FontMetrics>, config: &LayoutConfig) -> Self {
        Self {
            fonts,
            retain_pages: config.retain_pages,
            pages: Vec::new(),
            id_locations: BTreeMap::new(),
            registry: ResolveRegistry::new(),
            roles: HashMap::new(),
            extensions: Vec::new(),
            extension_waits: BTreeMap::new(),
            sequence_starts: VecDeque::new(),
            released: 0,
        }
    }

    /// Announces a page sequence. The model sees it right before the
    /// sequence's first page.
    pub fn start_page_sequence(&mut self, title: Option<&str>) {
        self.sequence_starts.push_back((self.pages.len(), title.map(str::to_string)));
    }

    /// Adds a finished page together with what its commit reported:
    /// ids placed on it and citations that were formatted with the
    /// placeholder.
    pub fn add_page(
        &mut self,
        mut page: PageViewport,
        sink: &mut CommitSink,
        model: &mut dyn AreaTreeModel,
    ) -> Result<(), LayoutError> {
        let index = self.pages.len();
        let (ids, citations) = sink.take_page();
        page.index = index;
        page.resolved = citations.is_empty();
        let page_ref = PageRef::new(index, page.number.clone());
        self.pages.push(page);

        let mut located = Vec::new();
        for id in ids {
            let locations = self.id_locations.entry(id.clone()).or_default();
            if locations.iter().any(|p| p.index == index) {
                continue;
            }
            locations.push(page_ref.clone());
            if locations.len() == 1 {
                located.push(id);
            }
        }
        for id in &located {
            if let Some(locations) = self.id_locations.get(id) {
                self.registry.resolve(id, locations);
                Self::resolve_extensions(&mut self.extensions, &mut self.extension_waits, id, locations);
            }
        }

        if !citations.is_empty() {
            let container = self.registry.create(None);
            self.roles.insert(container, Role::Page(index));
            for citation in &citations {
                let node = self.registry.create(Some(citation.ref_id.clone()));
                self.registry.add_child(container, node)?;
                self.roles.insert(node, Role::Citation { page: index, slot: citation.slot });
            }
            self.registry.register(container)?;
            for citation in &citations {
                if let Some(locations) = self.id_locations.get(&citation.ref_id) {
                    self.registry.resolve_node(container, &citation.ref_id, locations);
                }
            }
        }

        self.process_completed();
        self.deliver_extensions(model)?;
        self.release(model)
    }

    /// Attaches an extension. Ids located before it arrived are resolved
    /// right away; the model receives it once it is fully resolved.
    pub fn add_extension(
        &mut self,
        mut extension: Box<dyn AreaTreeExtension>,
        model: &mut dyn AreaTreeModel,
    ) -> Result<(), LayoutError> {
        let slot = self.extensions.len();
        for id in extension.ids() {
            match self.id_locations.get(&id) {
                Some(locations) => extension.resolve(&id, locations),
                None => self.extension_waits.entry(id).or_default().push(slot),
            }
        }
        self.extensions.push(ExtensionSlot { extension, delivered: false });
        self.deliver_extensions(model)
    }

    /// Resolves every id still pending with no target, leaving the
    /// placeholder text in place, and flushes the remaining pages.
    /// Returns the ids that were never located.
    pub fn end_document(&mut self, model: &mut dyn AreaTreeModel) -> Result<Vec<AnchorId>, LayoutError> {
        let mut unresolved = self.registry.waiting_ids();
        for id in &unresolved {
            warn!("Reference to unknown id '{}' left unresolved", id);
            self.registry.resolve(id, &[]);
        }
        self.process_completed();

        let extension_ids: Vec<AnchorId> = self.extension_waits.keys().cloned().collect();
        for id in extension_ids {
            warn!("Extension target '{}' was never located", id);
            Self::resolve_extensions(&mut self.extensions, &mut self.extension_waits, &id, &[]);
            if !unresolved.contains(&id) {
                unresolved.push(id);
            }
        }
        self.deliver_extensions(model)?;
        self.release(model)?;

        if self.released < self.pages.len() {
            return Err(LayoutError::Registry(format!(
                "{} pages still unresolved at document end",
                self.pages.len() - self.released
            )));
        }
        model.end_document()?;
        unresolved.sort();
        Ok(unresolved)
    }

    fn resolve_extensions(
        extensions: &mut [ExtensionSlot],
        waits: &mut BTreeMap<AnchorId, Vec<usize>>,
        id: &AnchorId,
        targets: &[PageRef],
    ) {
        if let Some(slots) = waits.remove(id) {
            for slot in slots {
                extensions[slot].extension.resolve(id, targets);
            }
        }
    }

    fn process_completed(&mut self) {
        for node in self.registry.drain_completed() {
            match self.roles.get(&node).copied() {
                Some(Role::Page(page)) => {
                    debug!("Page {} fully resolved", page);
                    self.pages[page].resolved = true;
                }
                Some(Role::Citation { page, slot }) => {
                    let Some(target) = self.registry.target(node).cloned() else {
                        continue;
                    };
                    let fonts = &self.fonts;
                    match self.pages[page].citation_mut(slot) {
                        Some(InlineArea::Citation { text, ipd, font, resolved, .. }) => {
                            *ipd = fonts.string_width(font, &target.number);
                            *text = target.number;
                            *resolved = true;
                        }
                        _ => warn!("Citation slot {} not found on page {}", slot, page),
                    }
                }
                None => {}
            }
        }
    }

    fn deliver_extensions(&mut self, model: &mut dyn AreaTreeModel) -> Result<(), LayoutError> {
        for slot in self.extensions.iter_mut().filter(|s| !s.delivered) {
            if slot.extension.is_resolved() {
                model.add_extension(slot.extension.as_ref())?;
                slot.delivered = true;
            }
        }
        Ok(())
    }

    fn release(&mut self, model: &mut dyn AreaTreeModel) -> Result<(), LayoutError> {
        while self.released < self.pages.len() && self.pages[self.released].resolved {
            while let Some((first, _)) = self.sequence_starts.front() {
                if *first > self.released {
                    break;
                }
                if let Some((_, title)) = self.sequence_starts.pop_front() {
                    model.start_page_sequence(title.as_deref())?;
                }
            }
            let page = &mut self.pages[self.released];
            model.add_page(page)?;
            if !self.retain_pages {
                page.page = None;
            }
            self.released += 1;
        }
        Ok(())
    }

    /// The formatted number of the first page holding `id`.
    pub fn page_number_of(&self, id: &AnchorId) -> Option<&str> {
        self.id_locations.get(id)?.first().map(|p| p.number.as_str())
    }

    pub fn locations(&self, id: &AnchorId) -> Option<&[PageRef]> {
        self.id_locations.get(id).map(Vec::as_slice)
    }

    pub fn pages(&self) -> &[PageViewport] {
        &self.pages
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// Pages handed to the model so far.
    pub fn released(&self) -> usize {
        self.released
    }
}
