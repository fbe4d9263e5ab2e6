//! Turns the document tree into a tree of layout managers.

use super::block::BlockManager;
use super::flow::FlowManager;
use super::inline::InlineManager;
use super::leaf::{LeafKind, LeafManager};
use super::line::LineManager;
use super::list_item::ListItemManager;
use super::table::{CellSpec, TableManager, TableRowManager};
use super::text::TextManager;
use super::Manager;
use crate::LayoutError;
use crate::env::ManagerIds;
use crate::style::ComputedStyle;
use folio_idf::{ColumnWidth, IRNode, InlineNode, TableRow};
use folio_traits::FontMetrics;
use itertools::Itertools;
use std::sync::Arc;

/// Builds managers for one layout run. Styles are computed here, once per
/// node, and shared with the managers through `Arc`.
pub struct ManagerBuilder<'a> {
    fonts: &'a dyn FontMetrics,
    ids: &'a ManagerIds,
}

impl<'a> ManagerBuilder<'a> {
    pub fn new(fonts: &'a dyn FontMetrics, ids: &'a ManagerIds) -> Self {
        Self { fonts, ids }
    }

    pub fn flow(&self, nodes: &[IRNode], style: &Arc<ComputedStyle>) -> Result<FlowManager, LayoutError> {
        Ok(FlowManager::new(self.ids.next(), self.blocks(nodes, style)?))
    }

    /// Block-level managers for a list of nodes. Consecutive inline nodes
    /// are gathered into one line manager.
    pub fn blocks(&self, nodes: &[IRNode], style: &Arc<ComputedStyle>) -> Result<Vec<Manager>, LayoutError> {
        let mut managers = Vec::new();
        for (inline, run) in &nodes.iter().chunk_by(|n| n.is_inline()) {
            if inline {
                let inlines: Vec<&InlineNode> = run
                    .filter_map(|n| match n {
                        IRNode::Inline(inline) => Some(inline),
                        _ => None,
                    })
                    .collect();
                managers.push(Manager::Line(self.line(&inlines, style)?));
            } else {
                for node in run {
                    managers.push(self.block(node, style)?);
                }
            }
        }
        Ok(managers)
    }

    fn block(&self, node: &IRNode, parent: &Arc<ComputedStyle>) -> Result<Manager, LayoutError> {
        let manager = match node {
            IRNode::Block { meta, children } => {
                let style = ComputedStyle::for_node(meta, parent)?;
                let children = self.blocks(children, &style)?;
                Manager::Block(BlockManager::new(self.ids.next(), meta.id.clone(), style, children))
            }
            IRNode::List { meta, items } => {
                let style = ComputedStyle::for_node(meta, parent)?;
                let mut children = Vec::with_capacity(items.len());
                for item in items {
                    let item_style = ComputedStyle::for_node(&item.meta, &style)?;
                    let label = self.blocks(&item.label, &item_style)?;
                    let body = self.blocks(&item.body, &item_style)?;
                    children.push(Manager::ListItem(ListItemManager::new(
                        self.ids.next(),
                        item.meta.id.clone(),
                        item_style,
                        label,
                        body,
                    )));
                }
                Manager::Block(BlockManager::new(self.ids.next(), meta.id.clone(), style, children))
            }
            IRNode::Table(table) => {
                let style = ComputedStyle::for_node(&table.meta, parent)?;
                let rows = table
                    .body
                    .iter()
                    .map(|row| self.table_row(row, &table.columns, &style).map(Manager::TableRow))
                    .collect::<Result<Vec<_>, _>>()?;
                Manager::Table(TableManager::new(
                    self.ids.next(),
                    table.meta.id.clone(),
                    style,
                    table.columns.clone(),
                    table.header.clone(),
                    rows,
                ))
            }
            IRNode::Inline(inline) => Manager::Line(self.line(&[inline], parent)?),
        };
        Ok(manager)
    }

    pub fn table_row(
        &self,
        row: &TableRow,
        columns: &[ColumnWidth],
        table_style: &Arc<ComputedStyle>,
    ) -> Result<TableRowManager, LayoutError> {
        let style = ComputedStyle::for_node(&row.meta, table_style)?;
        let mut cells = Vec::with_capacity(row.cells.len());
        for cell in &row.cells {
            let cell_style = ComputedStyle::for_node(&cell.meta, &style)?;
            let content = self.blocks(&cell.children, &cell_style)?;
            cells.push((CellSpec { node_id: cell.meta.id.clone(), style: cell_style }, content));
        }
        Ok(TableRowManager::new(self.ids.next(), row.meta.id.clone(), style, columns.to_vec(), cells))
    }

    fn line(&self, nodes: &[&InlineNode], style: &Arc<ComputedStyle>) -> Result<LineManager, LayoutError> {
        let children = self.inlines(nodes.iter().copied(), style)?;
        Ok(LineManager::new(self.ids.next(), style.clone(), children))
    }

    fn inlines<'n>(
        &self,
        nodes: impl Iterator<Item = &'n InlineNode>,
        style: &Arc<ComputedStyle>,
    ) -> Result<Vec<Manager>, LayoutError> {
        nodes.map(|node| self.inline(node, style)).collect()
    }

    fn inline(&self, node: &InlineNode, parent: &Arc<ComputedStyle>) -> Result<Manager, LayoutError> {
        let id = self.ids.next();
        let manager = match node {
            InlineNode::Text(text) => Manager::Text(TextManager::new(id, parent.clone(), text, self.fonts)),
            InlineNode::LineBreak => Manager::Text(TextManager::line_break(id, parent.clone())),
            InlineNode::Inline { meta, children } => {
                let style = ComputedStyle::for_node(meta, parent)?;
                let children = self.inlines(children.iter(), &style)?;
                Manager::Inline(InlineManager::new(id, meta.id.clone(), style, None, children))
            }
            InlineNode::Link { meta, destination, children } => {
                let style = ComputedStyle::for_node(meta, parent)?;
                let children = self.inlines(children.iter(), &style)?;
                Manager::Inline(InlineManager::new(id, meta.id.clone(), style, Some(destination.clone()), children))
            }
            InlineNode::PageNumber { meta } => {
                let style = ComputedStyle::for_node(meta, parent)?;
                Manager::Leaf(LeafManager::new(id, meta.id.clone(), style, LeafKind::PageNumber))
            }
            InlineNode::PageNumberCitation { meta, ref_id } => {
                let style = ComputedStyle::for_node(meta, parent)?;
                Manager::Leaf(LeafManager::new(id, meta.id.clone(), style, LeafKind::Citation(ref_id.clone())))
            }
            InlineNode::Leader { meta } => {
                let style = ComputedStyle::for_node(meta, parent)?;
                Manager::Leaf(LeafManager::new(id, meta.id.clone(), style, LeafKind::Leader))
            }
            InlineNode::ExternalGraphic { meta, src } => {
                let style = ComputedStyle::for_node(meta, parent)?;
                Manager::Leaf(LeafManager::new(id, meta.id.clone(), style, LeafKind::Graphic(src.clone())))
            }
        };
        Ok(manager)
    }
}
