//! Length-valued properties before they are resolved against a font size or
//! a reference dimension.

use folio_types::{Mpt, SizeRange};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub enum Length {
    /// An absolute length in millipoints.
    Absolute(Mpt),
    /// A multiple of the font size in effect.
    Em(f32),
    /// A percentage of a reference dimension chosen by the property.
    Percent(f32),
    #[default]
    Auto,
}

impl Length {
    pub const ZERO: Length = Length::Absolute(0);

    pub fn is_auto(&self) -> bool {
        matches!(self, Length::Auto)
    }

    /// Resolves to millipoints. Returns `None` for `auto`, and for
    /// percentages when the property has no reference dimension.
    pub fn resolve(&self, font_size: Mpt, percent_base: Option<Mpt>) -> Option<Mpt> {
        match *self {
            Length::Absolute(v) => Some(v),
            Length::Em(factor) => Some((factor as f64 * font_size as f64).round() as Mpt),
            Length::Percent(p) => {
                percent_base.map(|base| (p as f64 * base as f64 / 100.0).round() as Mpt)
            }
            Length::Auto => None,
        }
    }
}

impl From<Mpt> for Length {
    fn from(value: Mpt) -> Self {
        Length::Absolute(value)
    }
}

/// The `.minimum`/`.optimum`/`.maximum` components of a space or dimension
/// property.
///
/// Components are kept exactly as specified. A minimum larger than the
/// maximum is not reconciled here.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LengthRange {
    pub min: Length,
    pub opt: Length,
    pub max: Length,
}

impl LengthRange {
    pub fn new(min: Length, opt: Length, max: Length) -> Self {
        Self { min, opt, max }
    }

    pub fn uniform(value: Length) -> Self {
        Self { min: value, opt: value, max: value }
    }

    pub fn zero() -> Self {
        Self::uniform(Length::ZERO)
    }

    /// Resolves all three components. `auto` components fall back to the
    /// resolved optimum; the range is `None` when the optimum itself cannot
    /// be resolved.
    pub fn resolve(&self, font_size: Mpt, percent_base: Option<Mpt>) -> Option<SizeRange> {
        let opt = self.opt.resolve(font_size, percent_base)?;
        let min = self.min.resolve(font_size, percent_base).unwrap_or(opt);
        let max = self.max.resolve(font_size, percent_base).unwrap_or(opt);
        Some(SizeRange::new(min, opt, max))
    }

    /// Replaces the component named by a compound suffix
    /// (`minimum`, `optimum` or `maximum`).
    pub fn with_component(mut self, component: &str, value: Length) -> Option<Self> {
        match component {
            "minimum" => self.min = value,
            "optimum" => self.opt = value,
            "maximum" => self.max = value,
            _ => return None,
        }
        Some(self)
    }
}

impl Default for LengthRange {
    fn default() -> Self {
        Self::zero()
    }
}
