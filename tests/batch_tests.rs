mod common;

use common::fixtures::*;
use common::{TestResult, pipeline_with};
use folio::layout::{LayoutConfig, LayoutError};
use folio::{ExecutorKind, FolioConfig, OutputFormat, PipelineError};

fn config(executor: ExecutorKind, max_pages: usize) -> FolioConfig {
    FolioConfig {
        layout: LayoutConfig { max_pages, ..Default::default() },
        executor,
        threads: None,
    }
}

#[test]
fn test_batch_results_keep_input_order() -> TestResult {
    let pipeline = pipeline_with(config(ExecutorKind::Sync, 100))?;
    let documents = vec![report(1), report(3), report(2)];

    let results = pipeline.process_batch(documents, OutputFormat::Text);
    let pages: Vec<usize> = results
        .into_iter()
        .map(|r| r.map(|rendered| rendered.summary.pages))
        .collect::<Result<_, _>>()?;
    assert_eq!(pages, vec![1, 3, 2]);
    Ok(())
}

#[test]
fn test_failing_document_does_not_affect_others() -> TestResult {
    let pipeline = pipeline_with(config(ExecutorKind::Sync, 2))?;
    let documents = vec![report(2), report(5), report(1)];

    let results = pipeline.process_batch(documents, OutputFormat::Xml);
    assert_eq!(results.len(), 3);
    assert!(results[0].is_ok());
    assert!(matches!(
        results[1],
        Err(PipelineError::Layout(LayoutError::PageLimitExceeded(2)))
    ));
    assert!(results[2].as_ref().is_ok_and(|r| r.output.contains(">section</word>")));
    Ok(())
}

#[cfg(feature = "rayon-executor")]
#[test]
fn test_rayon_batch_matches_sequential() -> TestResult {
    let documents: Vec<_> = (1..=8).map(report).collect();
    let sequential = pipeline_with(config(ExecutorKind::Sync, 100))?
        .process_batch(documents.clone(), OutputFormat::Text);
    let parallel = pipeline_with(FolioConfig { threads: Some(3), ..config(ExecutorKind::Rayon, 100) })?
        .process_batch(documents, OutputFormat::Text);

    let outputs = |results: Vec<Result<folio::RenderedDocument, PipelineError>>| {
        results.into_iter().map(|r| r.map(|d| d.output)).collect::<Result<Vec<_>, _>>()
    };
    assert_eq!(outputs(sequential)?, outputs(parallel)?);
    Ok(())
}
