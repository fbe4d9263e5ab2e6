#![cfg(test)]

use crate::area::{Area, RegionKind, Stacking};
use crate::context::{LayoutContext, LayoutFlags};
use crate::managers::{CellSpec, LayoutManager, ManagerBuilder, TableRowManager};
use crate::style::ComputedStyle;
use crate::test_utils::{CHAR, LINE, TestServices, body_lines, courier, document, drain, layout, paragraph, text};
use folio_idf::{ColumnWidth, IRNode, InlineNode, NodeMetadata, TableCell, TableNode, TableRow};
use folio_types::SizeRange;
use std::sync::Arc;

fn row(cells: &[&str]) -> TableRow {
    TableRow::new(
        cells
            .iter()
            .map(|c| {
                if c.is_empty() {
                    TableCell::new(Vec::new())
                } else {
                    TableCell::new(vec![paragraph(courier(), vec![text(c)])])
                }
            })
            .collect(),
    )
}

fn table(columns: Vec<ColumnWidth>, header: Vec<TableRow>, body: Vec<TableRow>) -> IRNode {
    IRNode::Table(Box::new(TableNode { meta: NodeMetadata::new(courier()), columns, header, body }))
}

#[test]
fn test_header_repeats_on_every_page() {
    let doc = document(
        100_000,
        3 * LINE,
        vec![table(Vec::new(), vec![row(&["H"])], vec![row(&["r1"]), row(&["r2"]), row(&["r3"])])],
    );
    let (model, summary) = layout(&doc);
    assert_eq!(summary.pages, 2);
    assert_eq!(body_lines(&model.pages[0]), vec!["H", "r1", "r2"]);
    assert_eq!(body_lines(&model.pages[1]), vec!["H", "r3"]);
}

#[test]
fn test_header_page_number_reflects_its_page() {
    let header = TableRow::new(vec![TableCell::new(vec![IRNode::block(vec![IRNode::Inline(
        InlineNode::page_number(),
    )])])]);
    let doc = document(100_000, 2 * LINE, vec![table(Vec::new(), vec![header], vec![row(&["a"]), row(&["b"])])]);
    let (model, _) = layout(&doc);
    assert_eq!(body_lines(&model.pages[0]), vec!["1", "a"]);
    assert_eq!(body_lines(&model.pages[1]), vec!["2", "b"]);
}

#[test]
fn test_cells_are_placed_by_column_width() {
    let doc = document(
        100_000,
        100_000,
        vec![table(
            vec![ColumnWidth::Fixed(20_000), ColumnWidth::Proportional(1.0)],
            Vec::new(),
            vec![row(&["left", ""])],
        )],
    );
    let (model, _) = layout(&doc);
    let body = model.pages[0].region(RegionKind::Body).unwrap();
    let Area::Block(table) = &body.reference.children[0] else { panic!("expected the table block") };
    let Area::Block(row) = &table.children[0] else { panic!("expected a row block") };
    assert_eq!(row.stacking, Stacking::Inline);
    assert_eq!(row.bpd, LINE);
    assert_eq!(row.children.len(), 2);

    let cells: Vec<(i32, i32, i32, usize)> = row
        .children
        .iter()
        .filter_map(|c| match c {
            Area::Block(cell) => Some((cell.start_offset, cell.ipd, cell.bpd, cell.children.len())),
            _ => None,
        })
        .collect();
    // The empty cell still gets an area stretched to the row height.
    assert_eq!(cells, vec![(0, 20_000, LINE, 1), (20_000, 80_000, LINE, 0)]);
}

#[test]
fn test_row_height_is_tallest_cell() {
    let doc = document(
        100_000,
        100_000,
        vec![table(
            vec![ColumnWidth::Fixed(4 * CHAR), ColumnWidth::Fixed(4 * CHAR)],
            Vec::new(),
            vec![row(&["aaaa bbbb cccc", "x"])],
        )],
    );
    let (model, _) = layout(&doc);
    let body = model.pages[0].region(RegionKind::Body).unwrap();
    let Area::Block(table) = &body.reference.children[0] else { panic!("expected the table block") };
    assert_eq!(table.bpd, 3 * LINE);
    assert_eq!(body_lines(&model.pages[0]), vec!["aaaa", "bbbb", "cccc", "x"]);
}

#[test]
fn test_row_split_across_pages() {
    let doc = document(
        100_000,
        2 * LINE,
        vec![table(
            vec![ColumnWidth::Fixed(4 * CHAR)],
            Vec::new(),
            vec![row(&["aaaa bbbb cccc"])],
        )],
    );
    let (model, summary) = layout(&doc);
    assert_eq!(summary.pages, 2);
    assert_eq!(body_lines(&model.pages[0]), vec!["aaaa", "bbbb"]);
    assert_eq!(body_lines(&model.pages[1]), vec!["cccc"]);
}

#[test]
fn test_row_reset_replays_the_same_pieces() {
    let services = TestServices::new();
    let cell = |count: usize| {
        let content: Vec<_> = (0..count).map(|_| services.fixed_block(SizeRange::fixed(2_000))).collect();
        (CellSpec { node_id: None, style: Arc::new(ComputedStyle::default()) }, content)
    };
    let mut row = TableRowManager::new(
        services.ids.next(),
        None,
        Arc::new(ComputedStyle::default()),
        Vec::new(),
        vec![cell(2), cell(3)],
    );
    let env = services.env();

    let breaks = drain(&mut row, &env, 3_000);
    assert_eq!(breaks.len(), 3);
    assert!(breaks[2].is_last());

    row.reset_position(Some(breaks[0].position));
    row.reset_position(Some(breaks[0].position));
    assert_eq!(drain(&mut row, &env, 3_000), breaks[1..].to_vec());

    row.reset_position(None);
    row.reset_position(None);
    assert_eq!(drain(&mut row, &env, 3_000), breaks);
}

#[test]
fn test_break_seeking_measures_header_once() {
    let services = TestServices::new();
    let node = table(Vec::new(), vec![row(&["H"])], vec![row(&["r1"]), row(&["r2"])]);
    let mut managers = ManagerBuilder::new(services.fonts.as_ref(), &services.ids)
        .blocks(&[node], &Arc::new(ComputedStyle::default()))
        .unwrap();
    let mut table = managers.remove(0);
    let env = services.env();
    let cramped = LayoutContext::new(SizeRange::fixed(LINE), 100_000);
    let roomy = LayoutContext::new(SizeRange::fixed(2 * LINE), 100_000).with_flags(LayoutFlags::AT_AREA_START);

    let before = services.ids.next();
    let first = table.get_next_break_poss(&roomy, &env).unwrap().into_break().unwrap();
    assert_eq!(first.stack_size, SizeRange::fixed(2 * LINE));
    assert!(table.get_next_break_poss(&cramped, &env).unwrap().into_break().is_none());
    table.reset_position(None);
    let again = table.get_next_break_poss(&roomy, &env).unwrap().into_break().unwrap();
    assert_eq!(again, first);
    // Header managers are only rebuilt when a piece is committed.
    assert_eq!(services.ids.next().0, before.0 + 1);
}
