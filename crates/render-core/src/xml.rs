//! Area tree dump in XML, for debugging and regression tests.

use crate::error::RenderError;
use crate::traits::Renderer;
use crate::walker::Point;
use folio_layout::BookmarkEntry;
use folio_layout::area::{BlockArea, InlineArea, LineArea, PageViewport, RegionViewport, Traits};
use quick_xml::Writer;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use std::io::Write;

/// Writes the resolved area tree as indented XML.
///
/// Lengths are written in millipoints. Every element carries its absolute
/// position, so two dumps can be compared without re-running the walker.
pub struct XmlRenderer<W: Write> {
    writer: Writer<W>,
    in_sequence: bool,
}

impl<W: Write> XmlRenderer<W> {
    pub fn new(inner: W) -> Self {
        Self { writer: Writer::new_with_indent(inner, b' ', 2), in_sequence: false }
    }

    /// Returns the underlying writer. Call after `end_document`.
    pub fn into_inner(self) -> W {
        self.writer.into_inner()
    }

    fn write(&mut self, event: Event) -> Result<(), RenderError> {
        self.writer.write_event(event).map_err(|e| RenderError::Xml(e.to_string()))
    }

    fn start(&mut self, element: BytesStart) -> Result<(), RenderError> {
        self.write(Event::Start(element))
    }

    fn end(&mut self, name: &str) -> Result<(), RenderError> {
        self.write(Event::End(BytesEnd::new(name)))
    }

    fn text_element(&mut self, element: BytesStart, text: &str) -> Result<(), RenderError> {
        let name = String::from_utf8_lossy(element.name().as_ref()).into_owned();
        self.start(element)?;
        self.write(Event::Text(BytesText::new(text)))?;
        self.end(&name)
    }

    fn write_outline(&mut self, entries: &[BookmarkEntry]) -> Result<(), RenderError> {
        for entry in entries {
            let mut bookmark = BytesStart::new("bookmark");
            bookmark.push_attribute(("title", entry.title.as_str()));
            bookmark.push_attribute(("destination", entry.destination.as_str()));
            if let Some(target) = &entry.target {
                bookmark.push_attribute(("page", target.number.as_str()));
            }
            if entry.children.is_empty() {
                self.write(Event::Empty(bookmark))?;
            } else {
                self.start(bookmark)?;
                self.write_outline(&entry.children)?;
                self.end("bookmark")?;
            }
        }
        Ok(())
    }
}

fn positioned(name: &str, at: Point) -> BytesStart<'_> {
    let mut element = BytesStart::new(name);
    element.push_attribute(("x", at.x.to_string().as_str()));
    element.push_attribute(("y", at.y.to_string().as_str()));
    element
}

fn push_traits(element: &mut BytesStart, traits: &Traits) {
    for (name, value) in traits.iter() {
        element.push_attribute((name.name(), value.to_attribute().as_str()));
    }
}

impl<W: Write> Renderer for XmlRenderer<W> {
    fn start_document(&mut self) -> Result<(), RenderError> {
        self.write(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;
        self.start(BytesStart::new("areaTree"))
    }

    fn start_page_sequence(&mut self, title: Option<&str>) -> Result<(), RenderError> {
        if self.in_sequence {
            self.end("pageSequence")?;
        }
        let mut sequence = BytesStart::new("pageSequence");
        if let Some(title) = title {
            sequence.push_attribute(("title", title));
        }
        self.in_sequence = true;
        self.start(sequence)
    }

    fn start_page(&mut self, page: &PageViewport) -> Result<(), RenderError> {
        let mut viewport = BytesStart::new("pageViewport");
        viewport.push_attribute(("index", page.index.to_string().as_str()));
        viewport.push_attribute(("nr", page.number.as_str()));
        viewport.push_attribute(("width", page.width.to_string().as_str()));
        viewport.push_attribute(("height", page.height.to_string().as_str()));
        self.start(viewport)?;
        self.start(BytesStart::new("page"))
    }

    fn start_region(&mut self, region: &RegionViewport) -> Result<(), RenderError> {
        let mut element = positioned("regionViewport", Point::new(region.rect.x, region.rect.y));
        element.push_attribute(("name", region.kind.name()));
        element.push_attribute(("ipd", region.rect.width.to_string().as_str()));
        element.push_attribute(("bpd", region.rect.height.to_string().as_str()));
        self.start(element)
    }

    fn start_block(&mut self, block: &BlockArea, at: Point) -> Result<(), RenderError> {
        let mut element = positioned("block", at);
        element.push_attribute(("ipd", block.ipd.to_string().as_str()));
        element.push_attribute(("bpd", block.bpd.to_string().as_str()));
        push_traits(&mut element, &block.traits);
        self.start(element)
    }

    fn end_block(&mut self, _block: &BlockArea) -> Result<(), RenderError> {
        self.end("block")
    }

    fn start_line(&mut self, line: &LineArea, at: Point) -> Result<(), RenderError> {
        let mut element = positioned("lineArea", at);
        element.push_attribute(("ipd", line.ipd.to_string().as_str()));
        element.push_attribute(("bpd", line.bpd.to_string().as_str()));
        element.push_attribute(("baseline", line.baseline.to_string().as_str()));
        self.start(element)
    }

    fn end_line(&mut self, _line: &LineArea) -> Result<(), RenderError> {
        self.end("lineArea")
    }

    fn render_inline(&mut self, inline: &InlineArea, at: Point) -> Result<(), RenderError> {
        match inline {
            InlineArea::Word { text, ipd, font, .. } => {
                let mut element = positioned("word", at);
                element.push_attribute(("ipd", ipd.to_string().as_str()));
                element.push_attribute(("font", &*font.family));
                element.push_attribute(("size", font.size.to_string().as_str()));
                self.text_element(element, text)
            }
            InlineArea::Space { ipd } => {
                let mut element = positioned("space", at);
                element.push_attribute(("ipd", ipd.to_string().as_str()));
                self.write(Event::Empty(element))
            }
            InlineArea::Leader { ipd, pattern, thickness, .. } => {
                let mut element = positioned("leader", at);
                element.push_attribute(("ipd", ipd.to_string().as_str()));
                element.push_attribute(("pattern", pattern.name()));
                element.push_attribute(("thickness", thickness.to_string().as_str()));
                self.write(Event::Empty(element))
            }
            InlineArea::Viewport { ipd, bpd, src } => {
                let mut element = positioned("viewport", at);
                element.push_attribute(("ipd", ipd.to_string().as_str()));
                element.push_attribute(("bpd", bpd.to_string().as_str()));
                element.push_attribute(("src", src.as_str()));
                self.write(Event::Empty(element))
            }
            InlineArea::Parent { ipd, traits, .. } => {
                let mut element = positioned("inlineparent", at);
                element.push_attribute(("ipd", ipd.to_string().as_str()));
                push_traits(&mut element, traits);
                self.start(element)
            }
            InlineArea::Citation { ref_id, text, ipd, resolved, .. } => {
                let mut element = positioned("pageNumberCitation", at);
                element.push_attribute(("ref-id", ref_id.as_str()));
                element.push_attribute(("ipd", ipd.to_string().as_str()));
                element.push_attribute(("resolved", if *resolved { "true" } else { "false" }));
                self.text_element(element, text)
            }
        }
    }

    fn end_inline(&mut self, _inline: &InlineArea) -> Result<(), RenderError> {
        self.end("inlineparent")
    }

    fn end_region(&mut self, _region: &RegionViewport) -> Result<(), RenderError> {
        self.end("regionViewport")
    }

    fn end_page(&mut self, _page: &PageViewport) -> Result<(), RenderError> {
        self.end("page")?;
        self.end("pageViewport")
    }

    fn render_outline(&mut self, outline: &[BookmarkEntry]) -> Result<(), RenderError> {
        self.start(BytesStart::new("bookmarkTree"))?;
        self.write_outline(outline)?;
        self.end("bookmarkTree")
    }

    fn end_document(&mut self) -> Result<(), RenderError> {
        if self.in_sequence {
            self.in_sequence = false;
            self.end("pageSequence")?;
        }
        self.end("areaTree")?;
        self.writer.get_mut().flush()?;
        Ok(())
    }
}
