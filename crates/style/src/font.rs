use crate::keyword::Keyword;

/// Font weight on the 100–900 scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FontWeight(pub u16);

impl FontWeight {
    pub const NORMAL: FontWeight = FontWeight(400);
    pub const BOLD: FontWeight = FontWeight(700);

    pub fn is_bold(&self) -> bool {
        self.0 >= 600
    }

    /// Resolves `bolder`/`lighter` against the inherited weight.
    pub fn relative_to(keyword: &str, parent: FontWeight) -> Option<FontWeight> {
        match keyword {
            "bolder" => Some(FontWeight((parent.0 + 300).min(900))),
            "lighter" => Some(FontWeight(parent.0.saturating_sub(300).max(100))),
            _ => None,
        }
    }
}

impl Default for FontWeight {
    fn default() -> Self {
        FontWeight::NORMAL
    }
}

impl Keyword for FontWeight {
    const EXPECTED: &'static str = "normal | bold | 100..900";

    fn from_keyword(keyword: &str) -> Option<Self> {
        match keyword {
            "normal" => Some(FontWeight::NORMAL),
            "bold" => Some(FontWeight::BOLD),
            other => other
                .parse::<u16>()
                .ok()
                .filter(|n| (100..=900).contains(n) && n % 100 == 0)
                .map(FontWeight),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum FontStyle {
    #[default]
    Normal,
    Italic,
    Oblique,
}

impl Keyword for FontStyle {
    const EXPECTED: &'static str = "normal | italic | oblique";

    fn from_keyword(keyword: &str) -> Option<Self> {
        match keyword {
            "normal" => Some(FontStyle::Normal),
            "italic" => Some(FontStyle::Italic),
            "oblique" | "backslant" => Some(FontStyle::Oblique),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_weight_keywords() {
        assert_eq!(FontWeight::from_keyword("bold"), Some(FontWeight::BOLD));
        assert_eq!(FontWeight::from_keyword("300"), Some(FontWeight(300)));
        assert_eq!(FontWeight::from_keyword("350"), None);
        assert_eq!(FontWeight::from_keyword("heavy"), None);
    }

    #[test]
    fn test_relative_weights_clamp() {
        assert_eq!(FontWeight::relative_to("bolder", FontWeight(800)), Some(FontWeight(900)));
        assert_eq!(FontWeight::relative_to("lighter", FontWeight(200)), Some(FontWeight(100)));
        assert!(FontWeight::relative_to("bolder", FontWeight::NORMAL).unwrap().is_bold());
    }
}
