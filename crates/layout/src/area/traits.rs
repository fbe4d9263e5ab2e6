//! Traits attached to areas at commit time.

use folio_style::BorderSide;
use folio_types::{AnchorId, Color, Mpt};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Trait {
    Id,
    SpaceBefore,
    SpaceAfter,
    StartIndent,
    EndIndent,
    PaddingBefore,
    PaddingAfter,
    PaddingStart,
    PaddingEnd,
    BorderBefore,
    BorderAfter,
    BorderStart,
    BorderEnd,
    Background,
    Color,
    FontFamily,
    FontSize,
    InternalLink,
    ExternalLink,
    /// Set on the first area of a split formatting object.
    IsFirst,
    /// Set on the last area of a split formatting object.
    IsLast,
}

impl Trait {
    pub fn name(&self) -> &'static str {
        match self {
            Trait::Id => "id",
            Trait::SpaceBefore => "space-before",
            Trait::SpaceAfter => "space-after",
            Trait::StartIndent => "start-indent",
            Trait::EndIndent => "end-indent",
            Trait::PaddingBefore => "padding-before",
            Trait::PaddingAfter => "padding-after",
            Trait::PaddingStart => "padding-start",
            Trait::PaddingEnd => "padding-end",
            Trait::BorderBefore => "border-before",
            Trait::BorderAfter => "border-after",
            Trait::BorderStart => "border-start",
            Trait::BorderEnd => "border-end",
            Trait::Background => "background-color",
            Trait::Color => "color",
            Trait::FontFamily => "font-family",
            Trait::FontSize => "font-size",
            Trait::InternalLink => "internal-link",
            Trait::ExternalLink => "external-link",
            Trait::IsFirst => "is-first",
            Trait::IsLast => "is-last",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum TraitValue {
    Length(Mpt),
    Color(Color),
    Border(BorderSide),
    Text(String),
    Id(AnchorId),
    Flag(bool),
}

impl TraitValue {
    /// Serialized form used by debugging renderers.
    pub fn to_attribute(&self) -> String {
        match self {
            TraitValue::Length(v) => v.to_string(),
            TraitValue::Color(c) => c.to_string(),
            TraitValue::Border(b) => format!("({},{},{})", b.style.name(), b.color, b.width),
            TraitValue::Text(s) => s.clone(),
            TraitValue::Id(id) => id.to_string(),
            TraitValue::Flag(f) => f.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Traits(BTreeMap<Trait, TraitValue>);

impl Traits {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, key: Trait, value: TraitValue) {
        self.0.insert(key, value);
    }

    /// Sets a length trait, skipping zero.
    pub fn set_length(&mut self, key: Trait, value: Mpt) {
        if value != 0 {
            self.0.insert(key, TraitValue::Length(value));
        }
    }

    /// Sets a border trait, skipping edges without a visible style.
    pub fn set_border(&mut self, key: Trait, side: BorderSide) {
        if side.extent() != 0 {
            self.0.insert(key, TraitValue::Border(side));
        }
    }

    pub fn get(&self, key: Trait) -> Option<&TraitValue> {
        self.0.get(&key)
    }

    pub fn length(&self, key: Trait) -> Mpt {
        match self.0.get(&key) {
            Some(TraitValue::Length(v)) => *v,
            Some(TraitValue::Border(b)) => b.extent(),
            _ => 0,
        }
    }

    pub fn contains(&self, key: Trait) -> bool {
        self.0.contains_key(&key)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Trait, &TraitValue)> {
        self.0.iter()
    }
}
