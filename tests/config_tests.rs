mod common;

use common::TestResult;
use common::fixtures::*;
use folio::{ExecutorKind, FolioConfig, OutputFormat, PipelineBuilder, PipelineError};
use folio::idf::InlineNode;
use folio::traits::Executor;
use std::io::Write;

#[test]
fn test_config_from_file() -> TestResult {
    let mut file = tempfile::NamedTempFile::new()?;
    write!(
        file,
        r#"{{ "layout": {{ "unresolvedPlaceholder": "<?>", "wordSpaceStretch": 250 }}, "executor": "sync" }}"#
    )?;

    let config = FolioConfig::from_file(file.path())?;
    assert_eq!(config.executor, ExecutorKind::Sync);
    assert_eq!(config.layout.unresolved_placeholder, "<?>");
    assert_eq!(config.layout.word_space_stretch, 250);
    assert_eq!(config.layout.word_space_shrink, 333);
    Ok(())
}

#[test]
fn test_builder_reads_config_file() -> TestResult {
    common::init_logging();
    let mut file = tempfile::NamedTempFile::new()?;
    write!(file, r#"{{ "layout": {{ "unresolvedPlaceholder": "n/a" }}, "executor": "sync" }}"#)?;

    let pipeline = PipelineBuilder::new().with_config_file(file.path())?.build()?;
    assert_eq!(pipeline.executor().name(), "SyncExecutor");

    let document = document(
        100_000,
        100_000,
        vec![block(&[], vec![InlineNode::text("page "), InlineNode::citation("gone")])],
    );
    let rendered = pipeline.render_to_string(&document, OutputFormat::Text)?;
    assert!(rendered.output.contains("page n/a"));
    Ok(())
}

#[test]
fn test_missing_config_file() {
    let err = FolioConfig::from_file("/nonexistent/folio.json").unwrap_err();
    assert!(matches!(err, PipelineError::Io(_)));
    assert!(err.to_string().contains("/nonexistent/folio.json"));
}

#[test]
fn test_malformed_config() {
    let err = FolioConfig::from_json_str(r#"{ "layout": { "maxPages": "many" } }"#).unwrap_err();
    assert!(matches!(err, PipelineError::Json(_)));
}

#[cfg(feature = "rayon-executor")]
#[test]
fn test_rayon_executor_selected() -> TestResult {
    let pipeline = PipelineBuilder::new().with_executor(ExecutorKind::Rayon).with_threads(2).build()?;
    assert_eq!(pipeline.executor().name(), "RayonExecutor");
    assert_eq!(pipeline.executor().parallelism(), 2);
    Ok(())
}

#[cfg(feature = "rayon-executor")]
#[test]
fn test_empty_pool_rejected() {
    let result = PipelineBuilder::new().with_executor(ExecutorKind::Rayon).with_threads(0).build();
    assert!(matches!(result, Err(PipelineError::Executor(_))));
}

#[cfg(not(feature = "rayon-executor"))]
#[test]
fn test_rayon_executor_needs_feature() {
    let result = PipelineBuilder::new().with_executor(ExecutorKind::Rayon).build();
    assert!(matches!(result, Err(PipelineError::Config(_))));
}
