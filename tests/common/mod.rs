pub mod fixtures;

use folio::{DocumentPipeline, ExecutorKind, FolioConfig, PipelineBuilder, PipelineError};

pub type TestResult = Result<(), Box<dyn std::error::Error>>;

pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// A sequential pipeline with default layout settings.
pub fn pipeline() -> Result<DocumentPipeline, PipelineError> {
    pipeline_with(FolioConfig { executor: ExecutorKind::Sync, ..Default::default() })
}

pub fn pipeline_with(config: FolioConfig) -> Result<DocumentPipeline, PipelineError> {
    init_logging();
    PipelineBuilder::new().with_config(config).build()
}

/// Splits text renderer output into pages, dropping the page markers and
/// any outline.
pub fn text_pages(output: &str) -> Vec<Vec<String>> {
    let mut pages: Vec<Vec<String>> = Vec::new();
    let mut in_outline = false;
    for line in output.lines() {
        if line.starts_with("--- outline ---") {
            in_outline = true;
        } else if line.starts_with("--- page ") {
            in_outline = false;
            pages.push(Vec::new());
        } else if !in_outline && let Some(page) = pages.last_mut() {
            page.push(line.to_string());
        }
    }
    pages
}

#[macro_export]
macro_rules! assert_output_contains {
    ($output:expr, $needle:expr) => {
        assert!(
            $output.contains($needle),
            "expected output to contain {:?}, got:\n{}",
            $needle,
            $output
        )
    };
}
