//! FontMetrics trait for abstracting glyph measurement.
//!
//! The layout engine only needs advance widths, kerning and vertical
//! metrics. Loading font files, shaping and embedding live elsewhere.

use folio_style::{FontStyle, FontWeight};
use folio_types::Mpt;
use std::collections::HashMap;
use std::fmt::Debug;
use std::sync::Arc;

/// The font selected for a run of text.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FontDescriptor {
    pub family: Arc<str>,
    pub weight: FontWeight,
    pub style: FontStyle,
    /// Font size in millipoints.
    pub size: Mpt,
}

impl FontDescriptor {
    pub fn new(family: impl Into<Arc<str>>, size: Mpt) -> Self {
        Self {
            family: family.into(),
            weight: FontWeight::NORMAL,
            style: FontStyle::Normal,
            size,
        }
    }

    pub fn with_weight(mut self, weight: FontWeight) -> Self {
        self.weight = weight;
        self
    }

    pub fn with_style(mut self, style: FontStyle) -> Self {
        self.style = style;
        self
    }
}

/// Width and height queries for a font service.
///
/// All values are millipoints at the descriptor's size. Queries are
/// synchronous and must be deterministic for a given descriptor.
pub trait FontMetrics: Send + Sync + Debug {
    /// Advance width of a single character.
    fn char_width(&self, font: &FontDescriptor, c: char) -> Mpt;

    /// Kerning adjustment between two adjacent characters (usually negative).
    fn kerning(&self, _font: &FontDescriptor, _left: char, _right: char) -> Mpt {
        0
    }

    /// Height above the baseline.
    fn ascender(&self, font: &FontDescriptor) -> Mpt;

    /// Depth below the baseline, as a positive number.
    fn descender(&self, font: &FontDescriptor) -> Mpt;

    /// Advance width of a string including kerning.
    fn string_width(&self, font: &FontDescriptor, text: &str) -> Mpt {
        let mut width = 0;
        let mut previous = None;
        for c in text.chars() {
            if let Some(p) = previous {
                width += self.kerning(font, p, c);
            }
            width += self.char_width(font, c);
            previous = Some(c);
        }
        width
    }

    /// Returns a human-readable name for this service (for logging/debugging).
    fn name(&self) -> &'static str;
}

/// Advance widths of printable ASCII (32..=126) for a Helvetica-like face,
/// in thousandths of an em.
const PROPORTIONAL_WIDTHS: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278, // ' '..'/'
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, // digits
    278, 278, 584, 584, 584, 556, 1015, // ':'..'@'
    667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, 722, 778, 667, 778, 722,
    667, 611, 722, 667, 944, 667, 667, 611, // 'A'..'Z'
    278, 278, 278, 469, 556, 333, // '['..'`'
    556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, 556, 556, 556, 556, 333,
    500, 278, 556, 500, 722, 500, 500, 500, // 'a'..'z'
    334, 260, 334, 584, // '{'..'~'
];

const PROPORTIONAL_DEFAULT: u16 = 556;
const PROPORTIONAL_ASCENDER: i64 = 718;
const PROPORTIONAL_DESCENDER: i64 = 207;

const MONOSPACE_WIDTH: u16 = 600;
const MONOSPACE_ASCENDER: i64 = 629;
const MONOSPACE_DESCENDER: i64 = 157;

/// Built-in metrics for the standard faces.
///
/// Families named `Courier` or `monospace` get a fixed 600/1000 em
/// advance; every other family uses Helvetica-like proportional widths.
/// Bold and italic faces share the regular widths. Kerning pairs can be
/// added for tests that exercise kerning.
#[derive(Debug, Clone, Default)]
pub struct StandardFontMetrics {
    kerning: HashMap<(char, char), i16>,
}

impl StandardFontMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a kerning pair, in thousandths of an em.
    pub fn with_kerning(mut self, left: char, right: char, adjustment: i16) -> Self {
        self.kerning.insert((left, right), adjustment);
        self
    }

    fn is_monospace(font: &FontDescriptor) -> bool {
        let family = font.family.to_ascii_lowercase();
        family.starts_with("courier") || family == "monospace"
    }

    fn units(font: &FontDescriptor, thousandths: i64) -> Mpt {
        (thousandths * font.size as i64 / 1000) as Mpt
    }
}

impl FontMetrics for StandardFontMetrics {
    fn char_width(&self, font: &FontDescriptor, c: char) -> Mpt {
        let em_units = if Self::is_monospace(font) {
            MONOSPACE_WIDTH
        } else {
            match c as u32 {
                code @ 32..=126 => PROPORTIONAL_WIDTHS[(code - 32) as usize],
                // No-break space measures like a space.
                0xA0 => PROPORTIONAL_WIDTHS[0],
                _ => PROPORTIONAL_DEFAULT,
            }
        };
        Self::units(font, em_units as i64)
    }

    fn kerning(&self, font: &FontDescriptor, left: char, right: char) -> Mpt {
        self.kerning
            .get(&(left, right))
            .map(|k| Self::units(font, *k as i64))
            .unwrap_or(0)
    }

    fn ascender(&self, font: &FontDescriptor) -> Mpt {
        if Self::is_monospace(font) {
            Self::units(font, MONOSPACE_ASCENDER)
        } else {
            Self::units(font, PROPORTIONAL_ASCENDER)
        }
    }

    fn descender(&self, font: &FontDescriptor) -> Mpt {
        if Self::is_monospace(font) {
            Self::units(font, MONOSPACE_DESCENDER)
        } else {
            Self::units(font, PROPORTIONAL_DESCENDER)
        }
    }

    fn name(&self) -> &'static str {
        "StandardFontMetrics"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn helvetica(size: Mpt) -> FontDescriptor {
        FontDescriptor::new("Helvetica", size)
    }

    #[test]
    fn test_proportional_widths_scale_with_size() {
        let metrics = StandardFontMetrics::new();
        assert_eq!(metrics.char_width(&helvetica(10_000), ' '), 2_780);
        assert_eq!(metrics.char_width(&helvetica(10_000), 'W'), 9_440);
        assert_eq!(metrics.char_width(&helvetica(20_000), 'i'), 4_440);
        assert_eq!(metrics.char_width(&helvetica(10_000), 'é'), 5_560);
    }

    #[test]
    fn test_monospace_family() {
        let metrics = StandardFontMetrics::new();
        let courier = FontDescriptor::new("Courier", 10_000);
        assert_eq!(metrics.char_width(&courier, 'i'), 6_000);
        assert_eq!(metrics.string_width(&courier, "abc"), 18_000);
        assert_eq!(metrics.ascender(&courier), 6_290);
    }

    #[test]
    fn test_string_width_applies_kerning() {
        let metrics = StandardFontMetrics::new().with_kerning('A', 'V', -70);
        let font = helvetica(10_000);
        let plain = metrics.char_width(&font, 'A') + metrics.char_width(&font, 'V');
        assert_eq!(metrics.string_width(&font, "AV"), plain - 700);
        assert_eq!(metrics.string_width(&font, "VA"), plain);
    }

    #[test]
    fn test_vertical_metrics() {
        let metrics = StandardFontMetrics::new();
        assert_eq!(metrics.ascender(&helvetica(10_000)), 7_180);
        assert_eq!(metrics.descender(&helvetica(10_000)), 2_070);
    }
}
