use crate::keyword::Keyword;

/// Alignment of lines within the content rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TextAlign {
    #[default]
    Start,
    Center,
    End,
    Justify,
}

impl Keyword for TextAlign {
    const EXPECTED: &'static str = "start | center | end | justify";

    fn from_keyword(keyword: &str) -> Option<Self> {
        match keyword {
            "start" | "left" | "inside" => Some(TextAlign::Start),
            "center" => Some(TextAlign::Center),
            "end" | "right" | "outside" => Some(TextAlign::End),
            "justify" => Some(TextAlign::Justify),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum LinefeedTreatment {
    #[default]
    TreatAsSpace,
    Preserve,
}

impl Keyword for LinefeedTreatment {
    const EXPECTED: &'static str = "treat-as-space | preserve";

    fn from_keyword(keyword: &str) -> Option<Self> {
        match keyword {
            "treat-as-space" | "ignore" => Some(LinefeedTreatment::TreatAsSpace),
            "preserve" => Some(LinefeedTreatment::Preserve),
            _ => None,
        }
    }
}

/// How a leader fills its extent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum LeaderPattern {
    #[default]
    Space,
    Rule,
    Dots,
}

impl LeaderPattern {
    pub fn name(&self) -> &'static str {
        match self {
            LeaderPattern::Space => "space",
            LeaderPattern::Rule => "rule",
            LeaderPattern::Dots => "dots",
        }
    }
}

impl Keyword for LeaderPattern {
    const EXPECTED: &'static str = "space | rule | dots";

    fn from_keyword(keyword: &str) -> Option<Self> {
        match keyword {
            "space" => Some(LeaderPattern::Space),
            "rule" => Some(LeaderPattern::Rule),
            "dots" => Some(LeaderPattern::Dots),
            _ => None,
        }
    }
}
