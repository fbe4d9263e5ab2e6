use folio::idf::{Bookmark, Document, IRNode, InlineNode, NodeMetadata, PageMaster, PageSequence};
use folio::style::PropertyList;
use folio::types::{Insets, Mpt};

/// Width of one Courier character at 10pt.
pub const CHAR: Mpt = 6_000;
/// Height of one line of 10pt text.
pub const LINE: Mpt = 12_000;

pub fn props(pairs: &[(&str, &str)]) -> PropertyList {
    PropertyList::from_pairs(pairs.iter().copied()).unwrap()
}

pub fn courier() -> PropertyList {
    props(&[("font-family", "Courier"), ("font-size", "10pt")])
}

/// A margin-less page whose body is `width` by `height`.
pub fn master(width: Mpt, height: Mpt) -> PageMaster {
    PageMaster {
        page_width: width,
        page_height: height,
        margins: Insets::default(),
        ..Default::default()
    }
}

pub fn block(properties: &[(&str, &str)], inlines: Vec<InlineNode>) -> IRNode {
    IRNode::Block {
        meta: NodeMetadata::new(props(properties)),
        children: inlines.into_iter().map(IRNode::Inline).collect(),
    }
}

pub fn paragraph(text: &str) -> IRNode {
    block(&[], vec![InlineNode::text(text)])
}

pub fn new_page(text: &str) -> IRNode {
    block(&[("break-before", "page")], vec![InlineNode::text(text)])
}

/// A single-sequence Courier document.
pub fn document(width: Mpt, height: Mpt, flow: Vec<IRNode>) -> Document {
    Document {
        sequences: vec![PageSequence {
            master: master(width, height),
            properties: courier(),
            flow,
            ..Default::default()
        }],
        ..Default::default()
    }
}

/// Page 1 cites a target placed on page 2; page 2 has a bookmark.
pub fn citing_document() -> Document {
    let mut document = document(
        100_000,
        100_000,
        vec![
            block(&[], vec![InlineNode::text("see "), InlineNode::citation("target")]),
            new_page("the target").with_id("target"),
        ],
    );
    document.title = Some("Citations".to_string());
    document.bookmarks = vec![Bookmark::new("Target", "target")];
    document
}

/// `count` paragraphs, one page each.
pub fn report(count: usize) -> Document {
    let flow = (0..count)
        .map(|i| {
            let text = format!("section {}", i + 1);
            if i == 0 { paragraph(&text) } else { new_page(&text) }
        })
        .collect();
    document(100_000, 100_000, flow)
}
