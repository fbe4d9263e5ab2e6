//! Layout engine micro-benchmarks
//!
//! Measures layout throughput for running text, forward citations and
//! tables split across pages.

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use folio::idf::{
    ColumnWidth, Document, IRNode, InlineNode, NodeMetadata, PageMaster, PageSequence, TableCell,
    TableNode, TableRow,
};
use folio::style::PropertyList;
use folio::{ExecutorKind, OutputFormat, PipelineBuilder};
use std::hint::black_box;

fn courier() -> PropertyList {
    PropertyList::from_pairs([("font-family", "Courier"), ("font-size", "10pt")])
        .expect("valid properties")
}

fn sequence(flow: Vec<IRNode>) -> Document {
    Document {
        sequences: vec![PageSequence {
            master: PageMaster::default(),
            properties: courier(),
            flow,
            ..Default::default()
        }],
        ..Default::default()
    }
}

/// `count` paragraphs of filler text.
fn running_text(count: usize) -> Document {
    let text = "lorem ipsum dolor sit amet consectetur adipiscing elit ".repeat(8);
    sequence((0..count).map(|_| IRNode::paragraph(text.clone())).collect())
}

/// Every paragraph cites the last one, so pages are held until the end.
fn forward_citations(count: usize) -> Document {
    let mut flow: Vec<IRNode> = (0..count)
        .map(|i| {
            IRNode::block(vec![
                IRNode::Inline(InlineNode::text(format!("entry {} continues on page ", i))),
                IRNode::Inline(InlineNode::citation("last")),
            ])
        })
        .collect();
    flow.push(IRNode::paragraph("the end").with_id("last"));
    sequence(flow)
}

fn table(rows: usize) -> Document {
    let cell = |text: String| TableCell::new(vec![IRNode::paragraph(text)]);
    let row = |i: usize| {
        TableRow::new(vec![cell(format!("row {}", i)), cell("value".to_string()), cell(i.to_string())])
    };
    sequence(vec![IRNode::Table(Box::new(TableNode {
        meta: NodeMetadata::default(),
        columns: vec![ColumnWidth::Proportional(2.0), ColumnWidth::Proportional(1.0), ColumnWidth::Proportional(1.0)],
        header: vec![row(0)],
        body: (1..=rows).map(row).collect(),
    }))])
}

fn benchmark_documents(c: &mut Criterion, name: &str, make: fn(usize) -> Document, sizes: [usize; 3]) {
    let _ = env_logger::builder().is_test(true).try_init();
    let pipeline = PipelineBuilder::new()
        .with_executor(ExecutorKind::Sync)
        .build()
        .expect("Failed to build pipeline");

    let mut group = c.benchmark_group(name);
    for size in sizes {
        let document = make(size);
        group.bench_with_input(BenchmarkId::new("nodes", size), &document, |b, document| {
            b.iter(|| {
                pipeline
                    .render_to_string(black_box(document), OutputFormat::Text)
                    .expect("Failed to lay out document")
            });
        });
    }
    group.finish();
}

fn benchmark_running_text(c: &mut Criterion) {
    benchmark_documents(c, "layout_running_text", running_text, [10, 100, 500]);
}

fn benchmark_forward_citations(c: &mut Criterion) {
    benchmark_documents(c, "layout_forward_citations", forward_citations, [10, 100, 500]);
}

fn benchmark_table(c: &mut Criterion) {
    benchmark_documents(c, "layout_table", table, [10, 100, 500]);
}

criterion_group!(
    benches,
    benchmark_running_text,
    benchmark_forward_citations,
    benchmark_table
);
criterion_main!(benches);
