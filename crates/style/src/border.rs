use crate::keyword::Keyword;
use folio_types::{Color, Mpt};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum BorderStyle {
    #[default]
    None,
    Solid,
    Dashed,
    Dotted,
    Double,
}

impl BorderStyle {
    pub fn name(&self) -> &'static str {
        match self {
            BorderStyle::None => "none",
            BorderStyle::Solid => "solid",
            BorderStyle::Dashed => "dashed",
            BorderStyle::Dotted => "dotted",
            BorderStyle::Double => "double",
        }
    }
}

impl Keyword for BorderStyle {
    const EXPECTED: &'static str = "none | solid | dashed | dotted | double";

    fn from_keyword(keyword: &str) -> Option<Self> {
        match keyword {
            "none" | "hidden" => Some(BorderStyle::None),
            "solid" => Some(BorderStyle::Solid),
            "dashed" => Some(BorderStyle::Dashed),
            "dotted" => Some(BorderStyle::Dotted),
            "double" => Some(BorderStyle::Double),
            _ => None,
        }
    }
}

/// One resolved edge of a border.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct BorderSide {
    pub width: Mpt,
    pub style: BorderStyle,
    pub color: Color,
}

impl BorderSide {
    /// The extent the edge occupies; zero when the style is `none`.
    pub fn extent(&self) -> Mpt {
        if self.style == BorderStyle::None { 0 } else { self.width }
    }
}
