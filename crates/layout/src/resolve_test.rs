#![cfg(test)]

use crate::area::{Area, InlineArea, RegionKind, StorePagesModel};
use crate::config::LayoutConfig;
use crate::engine::LayoutEngine;
use crate::resolve::{PageRef, ResolveRegistry};
use crate::test_utils::{body_lines, courier, document, init_logging, layout, paragraph, props, text};
use folio_idf::{Bookmark, Document, IRNode, InlineNode, PageSequence};
use folio_traits::{InMemoryImageProvider, StandardFontMetrics};
use folio_types::AnchorId;
use std::sync::Arc;

fn page(index: usize) -> PageRef {
    PageRef::new(index, (index + 1).to_string())
}

fn new_page(flow: Vec<IRNode>) -> IRNode {
    let mut node = IRNode::block(flow);
    if let Some(meta) = node.meta_mut() {
        meta.properties = props(&[("break-before", "page")]);
    }
    node
}

#[test]
fn test_nested_nodes_complete_exactly_once() {
    let mut registry = ResolveRegistry::new();
    let root = registry.create(None);
    let group = registry.create(None);
    let a = registry.create(Some("a".into()));
    let b = registry.create(Some("b".into()));
    registry.add_child(group, a).unwrap();
    registry.add_child(root, group).unwrap();
    registry.add_child(root, b).unwrap();
    registry.register(root).unwrap();
    assert_eq!(registry.pending_ids(root), vec![AnchorId::from("a"), AnchorId::from("b")]);

    registry.resolve(&"a".into(), &[page(0)]);
    assert_eq!(registry.drain_completed(), vec![a, group]);
    registry.resolve(&"a".into(), &[page(3)]);
    assert!(registry.drain_completed().is_empty());
    assert_eq!(registry.target(a), Some(&page(0)));

    registry.resolve(&"b".into(), &[page(1)]);
    assert_eq!(registry.drain_completed(), vec![b, root]);
    assert!(registry.is_resolved(root));
    assert!(registry.waiting_ids().is_empty());
}

#[test]
fn test_child_attached_after_register_waits_too() {
    let mut registry = ResolveRegistry::new();
    let root = registry.create(None);
    let first = registry.create(Some("x".into()));
    registry.add_child(root, first).unwrap();
    registry.register(root).unwrap();

    let late = registry.create(Some("y".into()));
    registry.add_child(root, late).unwrap();
    registry.resolve(&"x".into(), &[page(0)]);
    assert_eq!(registry.drain_completed(), vec![first]);
    registry.resolve(&"y".into(), &[page(2)]);
    assert_eq!(registry.drain_completed(), vec![late, root]);
}

#[test]
fn test_forward_citation_is_back_filled() {
    let doc = document(
        100_000,
        100_000,
        vec![
            paragraph(courier(), vec![text("see "), InlineNode::citation("target")]),
            new_page(vec![paragraph(courier(), vec![text("here")]).with_id("target")]),
        ],
    );
    let (model, summary) = layout(&doc);
    assert!(summary.unresolved.is_empty());
    assert_eq!(body_lines(&model.pages[0]), vec!["see 2"]);
    assert!(model.pages.iter().all(|p| p.resolved));
}

#[test]
fn test_backward_citation_resolves_immediately() {
    let doc = document(
        100_000,
        100_000,
        vec![
            paragraph(courier(), vec![text("here")]).with_id("target"),
            new_page(vec![paragraph(courier(), vec![text("back to "), InlineNode::citation("target")])]),
        ],
    );
    let (model, _) = layout(&doc);
    assert_eq!(body_lines(&model.pages[1]), vec!["back to 1"]);
    let resolved = model.pages[1]
        .region(RegionKind::Body)
        .map(|r| contains_citation(&r.reference.children, true))
        .unwrap_or(false);
    assert!(resolved);
}

fn contains_citation(areas: &[Area], wanted: bool) -> bool {
    fn inline(area: &InlineArea, wanted: bool) -> bool {
        match area {
            InlineArea::Citation { resolved, .. } => *resolved == wanted,
            InlineArea::Parent { children, .. } => children.iter().any(|c| inline(c, wanted)),
            _ => false,
        }
    }
    areas.iter().any(|area| match area {
        Area::Block(block) => contains_citation(&block.children, wanted),
        Area::Line(line) => line.children.iter().any(|c| inline(c, wanted)),
        Area::Inline(i) => inline(i, wanted),
    })
}

#[test]
fn test_unknown_id_keeps_placeholder() {
    let doc = document(
        100_000,
        100_000,
        vec![paragraph(courier(), vec![text("page "), InlineNode::citation("nowhere")])],
    );
    let (model, summary) = layout(&doc);
    assert_eq!(summary.unresolved, vec![AnchorId::from("nowhere")]);
    assert_eq!(body_lines(&model.pages[0]), vec!["page ?"]);
    assert!(model.finished);
}

#[test]
fn test_custom_placeholder() {
    init_logging();
    let config = LayoutConfig { unresolved_placeholder: "??".to_string(), ..Default::default() };
    let engine = LayoutEngine::new(Arc::new(StandardFontMetrics::new()), Arc::new(InMemoryImageProvider::new()), config);
    let doc = document(100_000, 100_000, vec![paragraph(courier(), vec![InlineNode::citation("missing")])]);
    let mut model = StorePagesModel::new();
    engine.layout_document(&doc, &mut model).unwrap();
    assert_eq!(body_lines(&model.pages[0]), vec!["??"]);
}

#[test]
fn test_citation_uses_first_page_of_split_target() {
    let preserve = props(&[("font-family", "Courier"), ("font-size", "10pt"), ("linefeed-treatment", "preserve")]);
    let doc = document(
        100_000,
        24_000,
        vec![
            paragraph(courier(), vec![InlineNode::citation("long")]),
            paragraph(preserve, vec![text("a\nb\nc")]).with_id("long"),
        ],
    );
    let (model, _) = layout(&doc);
    assert_eq!(model.pages.len(), 2);
    assert_eq!(body_lines(&model.pages[0]), vec!["1", "a"]);
    assert_eq!(body_lines(&model.pages[1]), vec!["b", "c"]);
}

#[test]
fn test_page_numbers_continue_across_sequences() {
    let sequence = |flow| PageSequence { properties: courier(), flow, ..PageSequence::default() };
    let doc = Document {
        sequences: vec![
            sequence(vec![paragraph(courier(), vec![text("one")]).with_id("start")]),
            sequence(vec![paragraph(courier(), vec![InlineNode::page_number(), text(" / "), InlineNode::citation("start")])]),
        ],
        ..Default::default()
    };
    let (model, summary) = layout(&doc);
    assert_eq!(summary.sequences, 2);
    assert_eq!(model.pages[1].number, "2");
    assert_eq!(body_lines(&model.pages[1]), vec!["2 / 1"]);
    assert_eq!(model.sequences.len(), 2);
}

#[test]
fn test_bookmarks_resolve_to_pages() {
    let mut doc = document(
        100_000,
        100_000,
        vec![
            paragraph(courier(), vec![text("intro")]).with_id("ch1"),
            new_page(vec![paragraph(courier(), vec![text("details")]).with_id("sec")]),
        ],
    );
    doc.bookmarks = vec![
        Bookmark::new("Chapter", "ch1").with_children(vec![Bookmark::new("Section", "sec")]),
        Bookmark::new("Missing", "nope"),
    ];
    let (model, summary) = layout(&doc);
    assert_eq!(model.extensions, vec!["bookmarks".to_string()]);
    assert_eq!(model.outline.len(), 2);
    assert_eq!(model.outline[0].target.as_ref().map(|p| p.index), Some(0));
    assert_eq!(model.outline[0].children[0].target.as_ref().map(|p| p.number.as_str()), Some("2"));
    assert_eq!(model.outline[1].target, None);
    assert_eq!(summary.unresolved, vec![AnchorId::from("nope")]);
}
