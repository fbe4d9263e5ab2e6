//! Low-level nom parser functions for property values.
//!
//! These are composable building blocks; [`crate::PropertyList::parse`]
//! chooses the right one per property name.

use crate::border::BorderStyle;
use crate::keyword::Keyword;
use crate::length::{Length, LengthRange};
use crate::StyleError;
use folio_types::Color;
use nom::branch::alt;
use nom::bytes::complete::{tag, tag_no_case, take_while1};
use nom::character::complete::{alpha1, char, digit1, hex_digit1, one_of, space0, space1};
use nom::combinator::{map, map_opt, map_res, opt, recognize};
use nom::multi::separated_list1;
use nom::sequence::{delimited, preceded};
use nom::{IResult, Parser};

type ParseError<'a> = nom::error::Error<&'a str>;

/// What kind of value a property name takes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    Length,
    LengthRange,
    Color,
    Keyword,
    /// `normal`, a plain number (font-size multiple) or a length.
    LineHeight,
    /// Keyword or number on the 100–900 scale.
    Weight,
    Text,
}

/// Maps a property name (without compound suffix) to its value kind.
pub fn kind_of(property: &str) -> ValueKind {
    match property {
        "space-before" | "space-after" | "block-progression-dimension" | "leader-length" => {
            ValueKind::LengthRange
        }
        "font-size"
        | "start-indent"
        | "end-indent"
        | "text-indent"
        | "provisional-distance-between-starts"
        | "provisional-label-separation"
        | "rule-thickness"
        | "content-width"
        | "content-height"
        | "column-width"
        | "page-width"
        | "page-height"
        | "extent" => ValueKind::Length,
        "color" | "background-color" => ValueKind::Color,
        "line-height" => ValueKind::LineHeight,
        "font-weight" => ValueKind::Weight,
        "text-align" | "text-align-last" | "font-style" | "break-before" | "break-after"
        | "leader-pattern" | "linefeed-treatment" => ValueKind::Keyword,
        p if p.starts_with("padding-") || (p.starts_with("border-") && p.ends_with("-width")) => {
            ValueKind::Length
        }
        p if p.starts_with("border-") && p.ends_with("-color") => ValueKind::Color,
        p if p.starts_with("border-") && p.ends_with("-style") => ValueKind::Keyword,
        _ => ValueKind::Text,
    }
}

// --- Helper Parsers ---

fn ws<'a, O, P>(inner: P) -> impl Parser<&'a str, Output = O, Error = ParseError<'a>>
where
    P: Parser<&'a str, Output = O, Error = ParseError<'a>>,
{
    delimited(space0, inner, space0)
}

/// Parses a signed decimal number such as `12`, `-0.5` or `.75`.
pub fn parse_number(input: &str) -> IResult<&str, f64> {
    map_res(
        recognize((
            opt(one_of("+-")),
            alt((
                recognize((digit1, opt((char('.'), digit1)))),
                recognize((char('.'), digit1)),
            )),
        )),
        |s: &str| s.parse::<f64>(),
    )
    .parse(input)
}

#[derive(Debug, Clone, Copy)]
enum Unit {
    Points(f64),
    Em,
    Percent,
}

fn parse_unit(input: &str) -> IResult<&str, Unit> {
    alt((
        map(tag_no_case("pt"), |_| Unit::Points(1.0)),
        map(tag_no_case("px"), |_| Unit::Points(0.75)),
        map(tag_no_case("pc"), |_| Unit::Points(12.0)),
        map(tag_no_case("in"), |_| Unit::Points(72.0)),
        map(tag_no_case("cm"), |_| Unit::Points(72.0 / 2.54)),
        map(tag_no_case("mm"), |_| Unit::Points(72.0 / 25.4)),
        map(tag_no_case("em"), |_| Unit::Em),
        map(tag("%"), |_| Unit::Percent),
    ))
    .parse(input)
}

/// Parses a length (`12pt`, `1in`, `1.2em`, `50%`, `auto`). A bare number
/// is taken as points.
pub fn parse_length(input: &str) -> IResult<&str, Length> {
    alt((
        map(tag_no_case("auto"), |_| Length::Auto),
        map((parse_number, opt(parse_unit)), |(value, unit)| {
            match unit.unwrap_or(Unit::Points(1.0)) {
                Unit::Points(factor) => Length::Absolute((value * factor * 1000.0).round() as i32),
                Unit::Em => Length::Em(value as f32),
                Unit::Percent => Length::Percent(value as f32),
            }
        }),
    ))
    .parse(input)
}

/// Parses one length (all three components) or three (`min opt max`).
pub fn parse_length_range(input: &str) -> IResult<&str, LengthRange> {
    map_opt(separated_list1(space1, parse_length), |parts| match parts.as_slice() {
        [single] => Some(LengthRange::uniform(*single)),
        [min, opt, max] => Some(LengthRange::new(*min, *opt, *max)),
        _ => None,
    })
    .parse(input)
}

/// Parses `#rgb`, `#rrggbb` or a basic color name.
pub fn parse_color(input: &str) -> IResult<&str, Color> {
    alt((
        map_res(recognize(preceded(char('#'), hex_digit1)), Color::from_hex),
        map_opt(alpha1, Color::named),
    ))
    .parse(input)
}

/// Parses a keyword made of letters, digits and hyphens.
pub fn parse_keyword(input: &str) -> IResult<&str, &str> {
    take_while1(|c: char| c.is_ascii_alphanumeric() || c == '-').parse(input)
}

fn parse_border_style(input: &str) -> IResult<&str, BorderStyle> {
    map_opt(parse_keyword, BorderStyle::from_keyword).parse(input)
}

/// Parses a border shorthand (`0.5pt solid #000`).
pub fn parse_border(input: &str) -> IResult<&str, (Length, BorderStyle, Color)> {
    (ws(parse_length), ws(parse_border_style), ws(parse_color)).parse(input)
}

/// Runs a parser over the whole (trimmed) input.
pub fn run_parser<'a, T, P>(mut parser: P, input: &'a str, property: &str) -> Result<T, StyleError>
where
    P: Parser<&'a str, Output = T, Error = ParseError<'a>>,
{
    match parser.parse(input.trim()) {
        Ok(("", value)) => Ok(value),
        Ok((rest, _)) => Err(StyleError::Parse {
            property: property.to_string(),
            value: input.to_string(),
            detail: format!("unexpected trailing input '{}'", rest),
        }),
        Err(e) => Err(StyleError::Parse {
            property: property.to_string(),
            value: input.to_string(),
            detail: e.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_number_forms() {
        assert_eq!(parse_number("12"), Ok(("", 12.0)));
        assert_eq!(parse_number("-0.5pt"), Ok(("pt", -0.5)));
        assert_eq!(parse_number(".25"), Ok(("", 0.25)));
        assert!(parse_number("pt").is_err());
    }

    #[test]
    fn test_parse_length_units() {
        assert_eq!(run_parser(parse_length, "12pt", "x"), Ok(Length::Absolute(12_000)));
        assert_eq!(run_parser(parse_length, "1in", "x"), Ok(Length::Absolute(72_000)));
        assert_eq!(run_parser(parse_length, "10mm", "x"), Ok(Length::Absolute(28_346)));
        assert_eq!(run_parser(parse_length, "1.5em", "x"), Ok(Length::Em(1.5)));
        assert_eq!(run_parser(parse_length, "100%", "x"), Ok(Length::Percent(100.0)));
        assert_eq!(run_parser(parse_length, " auto ", "x"), Ok(Length::Auto));
        assert_eq!(run_parser(parse_length, "3", "x"), Ok(Length::Absolute(3_000)));
    }

    #[test]
    fn test_parse_length_range() {
        let range = run_parser(parse_length_range, "2pt 3pt 4.5pt", "space-before").unwrap();
        assert_eq!(range.min, Length::Absolute(2_000));
        assert_eq!(range.opt, Length::Absolute(3_000));
        assert_eq!(range.max, Length::Absolute(4_500));

        let single = run_parser(parse_length_range, "6pt", "space-before").unwrap();
        assert_eq!(single, LengthRange::uniform(Length::Absolute(6_000)));

        assert!(run_parser(parse_length_range, "1pt 2pt", "space-before").is_err());
    }

    #[test]
    fn test_parse_color_forms() {
        assert_eq!(run_parser(parse_color, "#f00", "color"), Ok(Color::rgb(255, 0, 0)));
        assert_eq!(run_parser(parse_color, "#00ff00", "color"), Ok(Color::rgb(0, 255, 0)));
        assert_eq!(run_parser(parse_color, "navy", "color"), Ok(Color::rgb(0, 0, 128)));
        assert!(run_parser(parse_color, "#12", "color").is_err());
        assert!(run_parser(parse_color, "papayawhip", "color").is_err());
    }

    #[test]
    fn test_parse_border_shorthand() {
        let (width, style, color) = run_parser(parse_border, "0.5pt solid #000", "border").unwrap();
        assert_eq!(width, Length::Absolute(500));
        assert_eq!(style, BorderStyle::Solid);
        assert_eq!(color, Color::BLACK);
    }

    #[test]
    fn test_trailing_input_is_rejected() {
        let err = run_parser(parse_length, "12pt bold", "font-size").unwrap_err();
        assert!(matches!(err, StyleError::Parse { .. }));
        assert!(err.to_string().contains("font-size"));
    }

    #[test]
    fn test_kind_of_property_names() {
        assert_eq!(kind_of("space-before"), ValueKind::LengthRange);
        assert_eq!(kind_of("padding-start"), ValueKind::Length);
        assert_eq!(kind_of("border-after-width"), ValueKind::Length);
        assert_eq!(kind_of("border-after-color"), ValueKind::Color);
        assert_eq!(kind_of("border-after-style"), ValueKind::Keyword);
        assert_eq!(kind_of("font-family"), ValueKind::Text);
    }
}
