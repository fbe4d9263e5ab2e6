#[macro_use]
mod common;

use common::fixtures::*;
use common::{TestResult, pipeline, pipeline_with, text_pages};
use folio::idf::{Bookmark, InlineNode};
use folio::layout::LayoutConfig;
use folio::render::TextRenderer;
use folio::types::AnchorId;
use folio::{ExecutorKind, FolioConfig, OutputFormat};

#[test]
fn test_paragraph_flows_across_pages() -> TestResult {
    let document = document(10 * CHAR, 2 * LINE, vec![paragraph("aaaa bbbb cccc dddd eeee")]);
    let rendered = pipeline()?.render_to_string(&document, OutputFormat::Text)?;

    assert_eq!(rendered.summary.pages, 2);
    assert_eq!(
        text_pages(&rendered.output),
        vec![vec!["aaaa bbbb", "cccc dddd"], vec!["eeee"]]
    );
    Ok(())
}

#[test]
fn test_forward_citation_is_back_filled() -> TestResult {
    let rendered = pipeline()?.render_to_string(&citing_document(), OutputFormat::Text)?;

    assert_output_contains!(rendered.output, "--- page 1 ---\nsee 2\n");
    assert_output_contains!(rendered.output, "--- outline ---\nTarget .. 2\n");
    assert!(rendered.summary.unresolved.is_empty());
    Ok(())
}

#[test]
fn test_configured_placeholder_for_missing_target() -> TestResult {
    let config = FolioConfig {
        layout: LayoutConfig { unresolved_placeholder: "??".to_string(), ..Default::default() },
        executor: ExecutorKind::Sync,
        threads: None,
    };
    let document = document(
        100_000,
        100_000,
        vec![block(&[], vec![InlineNode::text("see "), InlineNode::citation("missing")])],
    );
    let rendered = pipeline_with(config)?.render_to_string(&document, OutputFormat::Text)?;

    assert_eq!(text_pages(&rendered.output), vec![vec!["see ??"]]);
    let unresolved: Vec<&str> = rendered.summary.unresolved.iter().map(AnchorId::as_str).collect();
    assert_eq!(unresolved, vec!["missing"]);
    Ok(())
}

#[test]
fn test_xml_output_is_well_formed() -> TestResult {
    let rendered = pipeline()?.render_to_string(&citing_document(), OutputFormat::Xml)?;
    let xml = rendered.output;

    assert!(xml.starts_with("<?xml"));
    assert_output_contains!(xml, "<areaTree>");
    assert_output_contains!(xml, "ref-id=\"target\"");
    assert_output_contains!(xml, "<bookmark title=\"Target\" destination=\"target\" page=\"2\"/>");
    assert!(xml.trim_end().ends_with("</areaTree>"));
    assert_eq!(xml.matches("<pageViewport ").count(), 2);
    Ok(())
}

#[test]
fn test_layout_keeps_pages_for_inspection() -> TestResult {
    let laid_out = pipeline()?.layout(&report(3))?;

    assert_eq!(laid_out.summary.pages, 3);
    assert_eq!(laid_out.model.page_count(), 3);
    let numbers: Vec<&str> = laid_out.model.pages.iter().map(|p| p.number.as_str()).collect();
    assert_eq!(numbers, vec!["1", "2", "3"]);
    assert!(laid_out.model.finished);
    Ok(())
}

#[test]
fn test_custom_renderer() -> TestResult {
    let mut document = report(2);
    document.bookmarks = vec![Bookmark::new("Nowhere", "nowhere")];
    let (renderer, summary) = pipeline()?.render(&document, TextRenderer::new())?;

    assert_eq!(summary.pages, 2);
    assert_output_contains!(renderer.output(), "section 2");
    assert_output_contains!(renderer.output(), "Nowhere .. ?");
    Ok(())
}

#[test]
fn test_render_to_file() -> TestResult {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("report.txt");
    let summary = pipeline()?.render_to_file(&report(2), OutputFormat::Text, &path)?;

    assert_eq!(summary.pages, 2);
    let written = std::fs::read_to_string(&path)?;
    assert_eq!(text_pages(&written), vec![vec!["section 1"], vec!["section 2"]]);
    Ok(())
}
