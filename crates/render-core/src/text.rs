use crate::error::RenderError;
use crate::traits::Renderer;
use crate::walker::Point;
use folio_layout::BookmarkEntry;
use folio_layout::area::{LineArea, PageViewport};
use std::fmt::Write;

/// Renders the text of every line, one output line per line area, with a
/// marker line before each page.
#[derive(Debug, Default)]
pub struct TextRenderer {
    output: String,
}

impl TextRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn output(&self) -> &str {
        &self.output
    }

    pub fn into_string(self) -> String {
        self.output
    }

    fn write_outline(&mut self, entries: &[BookmarkEntry], depth: usize) -> Result<(), RenderError> {
        for entry in entries {
            let page = entry.target.as_ref().map_or("?", |t| t.number.as_str());
            writeln!(self.output, "{}{} .. {}", "  ".repeat(depth), entry.title, page)
                .map_err(|e| RenderError::Other(e.to_string()))?;
            self.write_outline(&entry.children, depth + 1)?;
        }
        Ok(())
    }
}

impl Renderer for TextRenderer {
    fn start_page(&mut self, page: &PageViewport) -> Result<(), RenderError> {
        writeln!(self.output, "--- page {} ---", page.number).map_err(|e| RenderError::Other(e.to_string()))
    }

    fn start_line(&mut self, line: &LineArea, _at: Point) -> Result<(), RenderError> {
        writeln!(self.output, "{}", line.text()).map_err(|e| RenderError::Other(e.to_string()))
    }

    fn render_outline(&mut self, outline: &[BookmarkEntry]) -> Result<(), RenderError> {
        writeln!(self.output, "--- outline ---").map_err(|e| RenderError::Other(e.to_string()))?;
        self.write_outline(outline, 0)
    }
}
