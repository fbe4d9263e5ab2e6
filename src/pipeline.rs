//! Wires fonts, images, layout and renderers into a reusable pipeline.

use crate::config::{ExecutorKind, FolioConfig};
use crate::error::PipelineError;
use folio_executor::{Executor, ExecutorImpl};
use folio_idf::Document;
use folio_layout::{LayoutConfig, LayoutEngine, LayoutSummary, StorePagesModel};
use folio_render_core::{RenderError, RenderPagesModel, Renderer, TextRenderer, XmlRenderer};
use folio_traits::{FontMetrics, ImageProvider, InMemoryImageProvider, StandardFontMetrics};
use log::{debug, info};
use std::fs;
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

/// Output produced by the built-in renderers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// The area tree as indented XML.
    #[default]
    Xml,
    /// One line of text per line area, with page markers.
    Text,
}

/// A document laid out into a `StorePagesModel`.
#[derive(Debug)]
pub struct LaidOutDocument {
    pub model: StorePagesModel,
    pub summary: LayoutSummary,
}

/// A document rendered by one of the built-in renderers.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedDocument {
    pub output: String,
    pub summary: LayoutSummary,
}

/// A builder for creating a `DocumentPipeline`.
#[derive(Default)]
pub struct PipelineBuilder {
    config: FolioConfig,
    fonts: Option<Arc<dyn FontMetrics>>,
    images: Option<Arc<dyn ImageProvider>>,
}

impl PipelineBuilder {
    /// Creates a builder with default settings, built-in font metrics and
    /// an empty image store.
    pub fn new() -> Self {
        Default::default()
    }

    pub fn with_config(mut self, config: FolioConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_config_file<P: AsRef<Path>>(mut self, path: P) -> Result<Self, PipelineError> {
        self.config = FolioConfig::from_file(path)?;
        Ok(self)
    }

    pub fn with_layout_config(mut self, layout: LayoutConfig) -> Self {
        self.config.layout = layout;
        self
    }

    pub fn with_executor(mut self, executor: ExecutorKind) -> Self {
        self.config.executor = executor;
        self
    }

    /// Runs batches on a dedicated pool of `threads` workers.
    pub fn with_threads(mut self, threads: usize) -> Self {
        self.config.threads = Some(threads);
        self
    }

    pub fn with_font_metrics(mut self, fonts: Arc<dyn FontMetrics>) -> Self {
        self.fonts = Some(fonts);
        self
    }

    pub fn with_image_provider(mut self, images: Arc<dyn ImageProvider>) -> Self {
        self.images = Some(images);
        self
    }

    pub fn build(self) -> Result<DocumentPipeline, PipelineError> {
        let executor = executor_for(&self.config)?;
        let fonts = self.fonts.unwrap_or_else(|| Arc::new(StandardFontMetrics::new()));
        let images = self.images.unwrap_or_else(|| Arc::new(InMemoryImageProvider::new()));
        debug!(
            "Building pipeline with {} fonts, {} images, {} executor",
            fonts.name(),
            images.name(),
            executor.name()
        );
        Ok(DocumentPipeline {
            engine: LayoutEngine::new(fonts, images, self.config.layout),
            executor,
        })
    }
}

fn executor_for(config: &FolioConfig) -> Result<ExecutorImpl, PipelineError> {
    match config.executor {
        ExecutorKind::Sync => Ok(ExecutorImpl::sequential()),
        #[cfg(feature = "rayon-executor")]
        ExecutorKind::Rayon => Ok(ExecutorImpl::parallel(config.threads)?),
        #[cfg(not(feature = "rayon-executor"))]
        ExecutorKind::Rayon => Err(PipelineError::Config(
            "the rayon executor requires the 'rayon-executor' feature".to_string(),
        )),
    }
}

/// Lays out and renders documents. Each call owns its own area tree and
/// reference registry, so one pipeline can serve many documents.
#[derive(Debug, Clone)]
pub struct DocumentPipeline {
    engine: LayoutEngine,
    executor: ExecutorImpl,
}

impl DocumentPipeline {
    pub fn engine(&self) -> &LayoutEngine {
        &self.engine
    }

    pub fn executor(&self) -> &ExecutorImpl {
        &self.executor
    }

    /// Lays out `document`, keeping every resolved page for inspection.
    pub fn layout(&self, document: &Document) -> Result<LaidOutDocument, PipelineError> {
        let mut model = StorePagesModel::new();
        let summary = self.engine.layout_document(document, &mut model)?;
        Ok(LaidOutDocument { model, summary })
    }

    /// Lays out `document` and streams each page to `renderer` as soon as
    /// it is resolved.
    pub fn render<R: Renderer>(
        &self,
        document: &Document,
        renderer: R,
    ) -> Result<(R, LayoutSummary), PipelineError> {
        let mut model = RenderPagesModel::new(renderer);
        let summary = self.engine.layout_document(document, &mut model)?;
        Ok((model.into_renderer(), summary))
    }

    pub fn render_to_string(
        &self,
        document: &Document,
        format: OutputFormat,
    ) -> Result<RenderedDocument, PipelineError> {
        render_document(&self.engine, document, format)
    }

    pub fn render_to_file<P: AsRef<Path>>(
        &self,
        document: &Document,
        format: OutputFormat,
        path: P,
    ) -> Result<LayoutSummary, PipelineError> {
        let rendered = self.render_to_string(document, format)?;
        fs::write(path.as_ref(), rendered.output)?;
        info!("Wrote {} pages to '{}'", rendered.summary.pages, path.as_ref().display());
        Ok(rendered.summary)
    }

    /// Renders independent documents through the configured executor.
    /// Results come back in input order; one failing document does not
    /// affect the others.
    pub fn process_batch(
        &self,
        documents: Vec<Document>,
        format: OutputFormat,
    ) -> Vec<Result<RenderedDocument, PipelineError>> {
        let count = documents.len();
        let start = Instant::now();
        let engine = self.engine.clone();
        let results = self
            .executor
            .execute_all_fallible(documents, move |document| render_document(&engine, &document, format));
        let failed = results.iter().filter(|r| r.is_err()).count();
        info!(
            "Processed {} documents ({} failed) with {} in {:?}",
            count,
            failed,
            self.executor.name(),
            start.elapsed()
        );
        results
    }
}

fn render_document(
    engine: &LayoutEngine,
    document: &Document,
    format: OutputFormat,
) -> Result<RenderedDocument, PipelineError> {
    match format {
        OutputFormat::Xml => {
            let mut model = RenderPagesModel::new(XmlRenderer::new(Vec::new()));
            let summary = engine.layout_document(document, &mut model)?;
            let bytes = model.into_renderer().into_inner();
            let output = String::from_utf8(bytes).map_err(RenderError::from)?;
            Ok(RenderedDocument { output, summary })
        }
        OutputFormat::Text => {
            let mut model = RenderPagesModel::new(TextRenderer::new());
            let summary = engine.layout_document(document, &mut model)?;
            Ok(RenderedDocument { output: model.into_renderer().into_string(), summary })
        }
    }
}
