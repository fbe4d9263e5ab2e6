//! Property lists: the typed name→value map attached to every content node.

use crate::keyword::Keyword;
use crate::length::{Length, LengthRange};
use crate::parsers::{self, ValueKind, run_parser};
use crate::StyleError;
use folio_types::Color;
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq)]
pub enum PropertyValue {
    Length(Length),
    Range(LengthRange),
    Number(f64),
    Color(Color),
    Keyword(String),
    Text(String),
}

impl PropertyValue {
    fn type_name(&self) -> &'static str {
        match self {
            PropertyValue::Length(_) => "a length",
            PropertyValue::Range(_) => "a length range",
            PropertyValue::Number(_) => "a number",
            PropertyValue::Color(_) => "a color",
            PropertyValue::Keyword(_) => "a keyword",
            PropertyValue::Text(_) => "a string",
        }
    }
}

impl From<Length> for PropertyValue {
    fn from(value: Length) -> Self {
        PropertyValue::Length(value)
    }
}

impl From<LengthRange> for PropertyValue {
    fn from(value: LengthRange) -> Self {
        PropertyValue::Range(value)
    }
}

impl From<Color> for PropertyValue {
    fn from(value: Color) -> Self {
        PropertyValue::Color(value)
    }
}

/// Specified properties of one node, keyed by property name.
///
/// Only values that were specified are stored; inheritance and initial
/// values are applied by the consumer.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PropertyList {
    values: BTreeMap<String, PropertyValue>,
}

const EDGES: [&str; 4] = ["before", "after", "start", "end"];

impl PropertyList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a list from raw `(name, value)` strings.
    pub fn from_pairs<'a>(
        pairs: impl IntoIterator<Item = (&'a str, &'a str)>,
    ) -> Result<Self, StyleError> {
        let mut list = Self::new();
        for (name, value) in pairs {
            list.parse(name, value)?;
        }
        Ok(list)
    }

    pub fn set(&mut self, name: impl Into<String>, value: impl Into<PropertyValue>) {
        self.values.insert(name.into(), value.into());
    }

    /// Builder-style [`PropertyList::set`].
    pub fn with(mut self, name: impl Into<String>, value: impl Into<PropertyValue>) -> Self {
        self.set(name, value);
        self
    }

    /// Parses and stores a raw value. Handles compound components
    /// (`space-before.optimum`) and the `padding`/`border` shorthands.
    pub fn parse(&mut self, name: &str, raw: &str) -> Result<(), StyleError> {
        if let Some((base, component)) = name.split_once('.') {
            return self.parse_component(name, base, component, raw);
        }

        match name {
            "padding" => {
                let value = run_parser(parsers::parse_length, raw, name)?;
                for edge in EDGES {
                    self.set(format!("padding-{}", edge), value);
                }
                return Ok(());
            }
            "border" => {
                for edge in EDGES {
                    self.parse_border(&format!("border-{}", edge), raw)?;
                }
                return Ok(());
            }
            n if n.starts_with("border-") && EDGES.contains(&&n["border-".len()..]) => {
                return self.parse_border(n, raw);
            }
            _ => {}
        }

        let value = match parsers::kind_of(name) {
            ValueKind::Length => PropertyValue::Length(run_parser(parsers::parse_length, raw, name)?),
            ValueKind::LengthRange => {
                PropertyValue::Range(run_parser(parsers::parse_length_range, raw, name)?)
            }
            ValueKind::Color => PropertyValue::Color(run_parser(parsers::parse_color, raw, name)?),
            ValueKind::Keyword => {
                PropertyValue::Keyword(run_parser(parsers::parse_keyword, raw, name)?.to_string())
            }
            ValueKind::LineHeight => {
                let trimmed = raw.trim();
                if trimmed == "normal" {
                    PropertyValue::Keyword(trimmed.to_string())
                } else if let Ok(number) = run_parser(parsers::parse_number, trimmed, name) {
                    PropertyValue::Number(number)
                } else {
                    PropertyValue::Length(run_parser(parsers::parse_length, trimmed, name)?)
                }
            }
            ValueKind::Weight => {
                PropertyValue::Keyword(run_parser(parsers::parse_keyword, raw, name)?.to_string())
            }
            ValueKind::Text => PropertyValue::Text(raw.trim().to_string()),
        };
        self.values.insert(name.to_string(), value);
        Ok(())
    }

    fn parse_component(
        &mut self,
        name: &str,
        base: &str,
        component: &str,
        raw: &str,
    ) -> Result<(), StyleError> {
        if parsers::kind_of(base) != ValueKind::LengthRange {
            return Err(StyleError::InvalidValue {
                property: name.to_string(),
                value: raw.to_string(),
            });
        }
        let length = run_parser(parsers::parse_length, raw, name)?;
        // A lone component seeds the whole range; later components refine it.
        let current = match self.values.get(base) {
            Some(PropertyValue::Range(range)) => *range,
            Some(PropertyValue::Length(l)) => LengthRange::uniform(*l),
            _ => LengthRange::uniform(length),
        };
        let updated = current.with_component(component, length).ok_or_else(|| {
            StyleError::InvalidValue {
                property: name.to_string(),
                value: raw.to_string(),
            }
        })?;
        self.set(base, updated);
        Ok(())
    }

    fn parse_border(&mut self, edge_name: &str, raw: &str) -> Result<(), StyleError> {
        let (width, style, color) = run_parser(parsers::parse_border, raw, edge_name)?;
        self.set(format!("{}-width", edge_name), width);
        self.set(format!("{}-style", edge_name), PropertyValue::Keyword(style.name().to_string()));
        self.set(format!("{}-color", edge_name), color);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&PropertyValue> {
        self.values.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &PropertyValue)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }

    fn mismatch(name: &str, expected: &'static str, found: &PropertyValue) -> StyleError {
        StyleError::TypeMismatch {
            property: name.to_string(),
            expected,
            found: found.type_name(),
        }
    }

    pub fn length(&self, name: &str) -> Result<Option<Length>, StyleError> {
        match self.values.get(name) {
            None => Ok(None),
            Some(PropertyValue::Length(l)) => Ok(Some(*l)),
            Some(other) => Err(Self::mismatch(name, "a length", other)),
        }
    }

    /// A length range; a plain length is promoted to a rigid range.
    pub fn range(&self, name: &str) -> Result<Option<LengthRange>, StyleError> {
        match self.values.get(name) {
            None => Ok(None),
            Some(PropertyValue::Range(r)) => Ok(Some(*r)),
            Some(PropertyValue::Length(l)) => Ok(Some(LengthRange::uniform(*l))),
            Some(other) => Err(Self::mismatch(name, "a length range", other)),
        }
    }

    pub fn number(&self, name: &str) -> Result<Option<f64>, StyleError> {
        match self.values.get(name) {
            None => Ok(None),
            Some(PropertyValue::Number(n)) => Ok(Some(*n)),
            Some(other) => Err(Self::mismatch(name, "a number", other)),
        }
    }

    pub fn color(&self, name: &str) -> Result<Option<Color>, StyleError> {
        match self.values.get(name) {
            None => Ok(None),
            Some(PropertyValue::Color(c)) => Ok(Some(*c)),
            Some(other) => Err(Self::mismatch(name, "a color", other)),
        }
    }

    /// A string value; keywords are returned as their text.
    pub fn text(&self, name: &str) -> Result<Option<&str>, StyleError> {
        match self.values.get(name) {
            None => Ok(None),
            Some(PropertyValue::Text(s)) | Some(PropertyValue::Keyword(s)) => Ok(Some(s.as_str())),
            Some(other) => Err(Self::mismatch(name, "a string", other)),
        }
    }

    /// An enumerated value.
    pub fn keyword<K: Keyword>(&self, name: &str) -> Result<Option<K>, StyleError> {
        match self.values.get(name) {
            None => Ok(None),
            Some(PropertyValue::Keyword(k)) | Some(PropertyValue::Text(k)) => K::from_keyword(k)
                .map(Some)
                .ok_or_else(|| StyleError::InvalidValue {
                    property: name.to_string(),
                    value: format!("'{}' (expected {})", k, K::EXPECTED),
                }),
            Some(other) => Err(Self::mismatch(name, K::EXPECTED, other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::text::TextAlign;
    use crate::BorderStyle;

    #[test]
    fn test_parse_dispatches_by_property_name() {
        let props = PropertyList::from_pairs([
            ("font-size", "10pt"),
            ("space-before", "2pt 3pt 4pt"),
            ("color", "#333"),
            ("text-align", "justify"),
            ("font-family", "Helvetica"),
            ("line-height", "1.4"),
        ])
        .unwrap();

        assert_eq!(props.length("font-size").unwrap(), Some(Length::Absolute(10_000)));
        assert_eq!(
            props.range("space-before").unwrap().map(|r| r.max),
            Some(Length::Absolute(4_000))
        );
        assert_eq!(props.color("color").unwrap(), Some(Color::gray(0x33)));
        assert_eq!(props.keyword::<TextAlign>("text-align").unwrap(), Some(TextAlign::Justify));
        assert_eq!(props.text("font-family").unwrap(), Some("Helvetica"));
        assert_eq!(props.number("line-height").unwrap(), Some(1.4));
        assert_eq!(props.length("start-indent").unwrap(), None);
    }

    #[test]
    fn test_malformed_values_fail_at_parse_time() {
        let mut props = PropertyList::new();
        assert!(props.parse("font-size", "twelve").is_err());
        assert!(props.parse("color", "#zzzzzz").is_err());
        assert!(props.parse("space-before.conditionality", "discard").is_err());
        assert!(props.is_empty());
    }

    #[test]
    fn test_type_mismatch_is_reported() {
        let props = PropertyList::new().with("font-size", Color::BLACK);
        let err = props.length("font-size").unwrap_err();
        assert_eq!(
            err,
            StyleError::TypeMismatch {
                property: "font-size".into(),
                expected: "a length",
                found: "a color",
            }
        );
    }

    #[test]
    fn test_unknown_keyword_is_invalid() {
        let props = PropertyList::new().with("text-align", PropertyValue::Keyword("sideways".into()));
        assert!(matches!(
            props.keyword::<TextAlign>("text-align"),
            Err(StyleError::InvalidValue { .. })
        ));
    }

    #[test]
    fn test_compound_components_refine_a_range() {
        let mut props = PropertyList::new();
        props.parse("space-before.optimum", "6pt").unwrap();
        props.parse("space-before.maximum", "9pt").unwrap();
        let range = props.range("space-before").unwrap().unwrap();
        assert_eq!(range.min, Length::Absolute(6_000));
        assert_eq!(range.opt, Length::Absolute(6_000));
        assert_eq!(range.max, Length::Absolute(9_000));
    }

    #[test]
    fn test_shorthands_expand() {
        let props = PropertyList::from_pairs([("padding", "2pt"), ("border", "1pt dashed red")]).unwrap();
        for edge in EDGES {
            assert_eq!(
                props.length(&format!("padding-{}", edge)).unwrap(),
                Some(Length::Absolute(2_000))
            );
            assert_eq!(
                props.keyword::<BorderStyle>(&format!("border-{}-style", edge)).unwrap(),
                Some(BorderStyle::Dashed)
            );
        }
        assert_eq!(props.color("border-start-color").unwrap(), Some(Color::rgb(255, 0, 0)));
    }
}
