//! Enumerated property values.

/// A property value drawn from a fixed set of keywords.
pub trait Keyword: Sized {
    /// Human-readable description of the accepted keywords, for errors.
    const EXPECTED: &'static str;

    fn from_keyword(keyword: &str) -> Option<Self>;
}

/// `break-before` / `break-after`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum BreakKind {
    #[default]
    Auto,
    Page,
}

impl Keyword for BreakKind {
    const EXPECTED: &'static str = "auto | page";

    fn from_keyword(keyword: &str) -> Option<Self> {
        match keyword {
            "auto" => Some(BreakKind::Auto),
            // Column breaks degrade to page breaks: regions have one column.
            "page" | "column" | "even-page" | "odd-page" => Some(BreakKind::Page),
            _ => None,
        }
    }
}
