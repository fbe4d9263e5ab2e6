use crate::error::RenderError;
use crate::traits::Renderer;
use crate::walker::render_page;
use folio_layout::area::{AreaTreeExtension, AreaTreeModel, PageViewport};
use folio_layout::{BookmarkTree, LayoutError};
use log::debug;

/// An area tree model that renders every page as soon as the tree
/// releases it, which happens once the page and all earlier pages are
/// resolved.
#[derive(Debug)]
pub struct RenderPagesModel<R: Renderer> {
    renderer: R,
    started: bool,
    pages: usize,
}

impl<R: Renderer> RenderPagesModel<R> {
    pub fn new(renderer: R) -> Self {
        Self { renderer, started: false, pages: 0 }
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    /// Pages rendered so far.
    pub fn pages(&self) -> usize {
        self.pages
    }

    pub fn into_renderer(self) -> R {
        self.renderer
    }

    fn ensure_started(&mut self) -> Result<(), RenderError> {
        if !self.started {
            self.started = true;
            self.renderer.start_document()?;
        }
        Ok(())
    }
}

fn model_error(err: RenderError) -> LayoutError {
    LayoutError::Model(err.to_string())
}

impl<R: Renderer> AreaTreeModel for RenderPagesModel<R> {
    fn start_page_sequence(&mut self, title: Option<&str>) -> Result<(), LayoutError> {
        self.ensure_started().map_err(model_error)?;
        self.renderer.start_page_sequence(title).map_err(model_error)
    }

    fn add_page(&mut self, page: &PageViewport) -> Result<(), LayoutError> {
        self.ensure_started().map_err(model_error)?;
        debug!("Rendering page {} ('{}')", page.index, page.number);
        render_page(&mut self.renderer, page).map_err(model_error)?;
        self.pages += 1;
        Ok(())
    }

    fn add_extension(&mut self, extension: &dyn AreaTreeExtension) -> Result<(), LayoutError> {
        self.ensure_started().map_err(model_error)?;
        match extension.as_any().downcast_ref::<BookmarkTree>() {
            Some(bookmarks) => self.renderer.render_outline(&bookmarks.outline()).map_err(model_error),
            None => {
                debug!("Renderer ignores extension '{}'", extension.name());
                Ok(())
            }
        }
    }

    fn end_document(&mut self) -> Result<(), LayoutError> {
        self.ensure_started().map_err(model_error)?;
        self.renderer.end_document().map_err(model_error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{TextRenderer, XmlRenderer};
    use folio_idf::{Bookmark, Document, IRNode, InlineNode, NodeMetadata, PageMaster, PageSequence};
    use folio_layout::{LayoutConfig, LayoutEngine};
    use folio_style::PropertyList;
    use folio_traits::{InMemoryImageProvider, StandardFontMetrics};
    use folio_types::Insets;
    use std::sync::Arc;

    fn engine() -> LayoutEngine {
        let _ = env_logger::builder().is_test(true).try_init();
        LayoutEngine::new(
            Arc::new(StandardFontMetrics::new()),
            Arc::new(InMemoryImageProvider::new()),
            LayoutConfig::default(),
        )
    }

    fn paragraph(properties: &[(&str, &str)], inlines: Vec<InlineNode>) -> IRNode {
        IRNode::Block {
            meta: NodeMetadata::new(PropertyList::from_pairs(properties.iter().copied()).unwrap()),
            children: inlines.into_iter().map(IRNode::Inline).collect(),
        }
    }

    /// Two pages; the first cites the second, so it is held back until the
    /// second is laid out.
    fn citing_document() -> Document {
        let courier = PropertyList::from_pairs([("font-family", "Courier"), ("font-size", "10pt")]).unwrap();
        Document {
            sequences: vec![PageSequence {
                title: Some("Report".to_string()),
                master: PageMaster {
                    page_width: 100_000,
                    page_height: 100_000,
                    margins: Insets::default(),
                    ..Default::default()
                },
                properties: courier,
                flow: vec![
                    paragraph(&[], vec![InlineNode::text("see "), InlineNode::citation("target")]),
                    paragraph(&[("break-before", "page")], vec![InlineNode::text("target & more")]).with_id("target"),
                ],
                ..Default::default()
            }],
            bookmarks: vec![Bookmark::new("Target", "target")],
            ..Default::default()
        }
    }

    #[test]
    fn test_text_renderer_sees_back_filled_citation() {
        let mut model = RenderPagesModel::new(TextRenderer::new());
        engine().layout_document(&citing_document(), &mut model).unwrap();
        assert_eq!(model.pages(), 2);
        let output = model.into_renderer().into_string();
        assert!(output.contains("--- page 1 ---\nsee 2\n--- page 2 ---\ntarget & more\n"));
        assert!(output.contains("--- outline ---\nTarget .. 2\n"));
    }

    #[test]
    fn test_xml_dump_of_resolved_tree() {
        let mut model = RenderPagesModel::new(XmlRenderer::new(Vec::new()));
        engine().layout_document(&citing_document(), &mut model).unwrap();
        let xml = String::from_utf8(model.into_renderer().into_inner()).unwrap();

        assert!(xml.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\"?>"));
        assert!(xml.contains("<pageSequence title=\"Report\">"));
        assert!(xml.contains("<pageViewport index=\"1\" nr=\"2\""));
        assert!(xml.contains("ref-id=\"target\""));
        assert!(xml.contains("resolved=\"true\">2</pageNumberCitation>"));
        assert!(xml.contains(">&amp;</word>"));
        assert!(xml.contains("<bookmark title=\"Target\" destination=\"target\" page=\"2\"/>"));
        assert!(xml.trim_end().ends_with("</areaTree>"));
        assert_eq!(xml.matches("<pageViewport").count(), xml.matches("</pageViewport>").count());
    }

    #[derive(Debug, Default)]
    struct FailingRenderer;

    impl Renderer for FailingRenderer {
        fn start_page(&mut self, _page: &PageViewport) -> Result<(), RenderError> {
            Err(RenderError::Other("disk full".to_string()))
        }
    }

    #[test]
    fn test_renderer_errors_abort_layout() {
        let mut model = RenderPagesModel::new(FailingRenderer);
        let result = engine().layout_document(&citing_document(), &mut model);
        match result {
            Err(LayoutError::Model(message)) => assert!(message.contains("disk full")),
            other => panic!("expected a model error, got {:?}", other),
        }
    }
}
