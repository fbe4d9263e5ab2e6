//! Rendering of resolved area trees.
//!
//! This crate provides the pieces between the layout engine and a concrete
//! output format:
//! - `Renderer` visitor trait and the walker that positions areas for it
//! - `RenderPagesModel`, an area tree model rendering pages as they resolve
//! - `XmlRenderer` (area tree dump) and `TextRenderer` (plain text lines)

mod error;
mod model;
mod text;
mod traits;
mod walker;
mod xml;

pub use error::RenderError;
pub use model::RenderPagesModel;
pub use text::TextRenderer;
pub use traits::Renderer;
pub use walker::{Point, render_page};
pub use xml::XmlRenderer;
