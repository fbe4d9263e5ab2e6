//! Entry point: lays out a whole document into an area tree model.

use crate::LayoutError;
use crate::area::{AreaTree, AreaTreeModel};
use crate::bookmarks::BookmarkTree;
use crate::config::LayoutConfig;
use crate::env::ManagerIds;
use crate::managers::page::{PageSequenceLayout, SequenceServices};
use crate::style::ComputedStyle;
use folio_idf::Document;
use folio_traits::{FontMetrics, ImageProvider};
use folio_types::AnchorId;
use log::{info, warn};
use std::sync::Arc;

/// What a finished layout run produced.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct LayoutSummary {
    pub pages: usize,
    pub sequences: usize,
    /// Ids that were referenced but never located, sorted.
    pub unresolved: Vec<AnchorId>,
}

/// Holds the services layout needs. One engine can lay out any number of
/// documents; each run owns its own area tree and registry.
#[derive(Debug, Clone)]
pub struct LayoutEngine {
    fonts: Arc<dyn FontMetrics>,
    images: Arc<dyn ImageProvider>,
    config: LayoutConfig,
}

impl LayoutEngine {
    pub fn new(fonts: Arc<dyn FontMetrics>, images: Arc<dyn ImageProvider>, config: LayoutConfig) -> Self {
        Self { fonts, images, config }
    }

    pub fn config(&self) -> &LayoutConfig {
        &self.config
    }

    /// Lays out every page sequence in order, streaming resolved pages to
    /// `model`. Page numbering continues across sequences unless a
    /// sequence sets its own initial number.
    pub fn layout_document(
        &self,
        document: &Document,
        model: &mut dyn AreaTreeModel,
    ) -> Result<LayoutSummary, LayoutError> {
        let mut tree = AreaTree::new(self.fonts.clone(), &self.config);
        let ids = ManagerIds::new();
        let services = SequenceServices {
            fonts: self.fonts.as_ref(),
            images: self.images.as_ref(),
            config: &self.config,
            ids: &ids,
        };

        if !document.bookmarks.is_empty() {
            tree.add_extension(Box::new(BookmarkTree::new(&document.bookmarks)?), model)?;
        }
        if document.sequences.is_empty() {
            warn!("Document has no page sequences");
        }

        let root = Arc::new(ComputedStyle::default());
        let mut next_number = 1;
        for (index, sequence) in document.sequences.iter().enumerate() {
            let first = sequence.initial_page_number.unwrap_or(next_number);
            let layout = PageSequenceLayout::new(sequence, index, &root)?;
            let pages = layout.run(first, services, &mut tree, model)?;
            next_number = first + pages;
        }

        let unresolved = tree.end_document(model)?;
        let summary = LayoutSummary {
            pages: tree.page_count(),
            sequences: document.sequences.len(),
            unresolved,
        };
        info!(
            "Laid out {} pages in {} sequences ({} unresolved references)",
            summary.pages,
            summary.sequences,
            summary.unresolved.len()
        );
        Ok(summary)
    }
}
