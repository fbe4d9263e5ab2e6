//! Computed (resolved and inherited) style of a formatting object.

use folio_idf::NodeMetadata;
use folio_style::{
    BorderSide, BorderStyle, BreakKind, FontStyle, FontWeight, Keyword, LeaderPattern, Length,
    LengthRange, LinefeedTreatment, PropertyList, PropertyValue, StyleError, TextAlign,
};
use folio_traits::FontDescriptor;
use folio_types::{Color, Mpt, SizeRange, pt};
use std::sync::Arc;

/// `line-height` as inherited: numbers are inherited as factors and
/// re-applied to each descendant's own font size.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LineHeight {
    Normal,
    Factor(f64),
    Absolute(Mpt),
}

impl LineHeight {
    pub fn resolve(&self, font_size: Mpt) -> Mpt {
        match *self {
            LineHeight::Normal => (font_size as f64 * 1.2).round() as Mpt,
            LineHeight::Factor(f) => (font_size as f64 * f).round() as Mpt,
            LineHeight::Absolute(v) => v,
        }
    }
}

/// Border edges in writing-mode relative terms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Borders {
    pub before: BorderSide,
    pub after: BorderSide,
    pub start: BorderSide,
    pub end: BorderSide,
}

/// Padding edges in writing-mode relative terms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Padding {
    pub before: Mpt,
    pub after: Mpt,
    pub start: Mpt,
    pub end: Mpt,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ComputedStyle {
    // Inherited
    pub font: FontDescriptor,
    pub color: Color,
    pub line_height: LineHeight,
    pub text_align: TextAlign,
    pub text_align_last: Option<TextAlign>,
    pub linefeed_treatment: LinefeedTreatment,
    pub provisional_distance_between_starts: Mpt,
    pub provisional_label_separation: Mpt,
    pub leader_pattern: LeaderPattern,
    pub leader_length: LengthRange,
    pub rule_thickness: Mpt,

    // Not inherited
    pub space_before: SizeRange,
    pub space_after: SizeRange,
    pub start_indent: Mpt,
    pub end_indent: Mpt,
    pub text_indent: Length,
    pub padding: Padding,
    pub borders: Borders,
    pub background: Option<Color>,
    pub break_before: BreakKind,
    pub break_after: BreakKind,
    pub block_progression_dimension: Option<SizeRange>,
    pub content_width: Option<Length>,
    pub content_height: Option<Length>,
}

impl Default for ComputedStyle {
    fn default() -> Self {
        Self {
            font: FontDescriptor::new("Helvetica", pt(12.0)),
            color: Color::BLACK,
            line_height: LineHeight::Normal,
            text_align: TextAlign::Start,
            text_align_last: None,
            linefeed_treatment: LinefeedTreatment::TreatAsSpace,
            provisional_distance_between_starts: pt(24.0),
            provisional_label_separation: pt(6.0),
            leader_pattern: LeaderPattern::Space,
            leader_length: LengthRange::new(
                Length::Absolute(0),
                Length::Absolute(pt(12.0)),
                Length::Percent(100.0),
            ),
            rule_thickness: pt(1.0),
            space_before: SizeRange::ZERO,
            space_after: SizeRange::ZERO,
            start_indent: 0,
            end_indent: 0,
            text_indent: Length::ZERO,
            padding: Padding::default(),
            borders: Borders::default(),
            background: None,
            break_before: BreakKind::Auto,
            break_after: BreakKind::Auto,
            block_progression_dimension: None,
            content_width: None,
            content_height: None,
        }
    }
}

impl ComputedStyle {
    /// Computes a child's style: inherited properties come from `parent`
    /// unless specified, the rest start from their initial values.
    pub fn compute(props: &PropertyList, parent: &ComputedStyle) -> Result<Self, StyleError> {
        let initial = ComputedStyle::default();
        let parent_size = parent.font.size;

        let font_size = props
            .length("font-size")?
            .and_then(|l| l.resolve(parent_size, Some(parent_size)))
            .unwrap_or(parent_size);
        let family: Arc<str> = match props.text("font-family")? {
            Some(family) => first_family(family).into(),
            None => parent.font.family.clone(),
        };
        let weight = match props.get("font-weight") {
            Some(PropertyValue::Keyword(k)) => FontWeight::relative_to(k, parent.font.weight)
                .or_else(|| FontWeight::from_keyword(k))
                .ok_or_else(|| StyleError::InvalidValue {
                    property: "font-weight".to_string(),
                    value: k.clone(),
                })?,
            Some(_) => props.keyword::<FontWeight>("font-weight")?.unwrap_or(parent.font.weight),
            None => parent.font.weight,
        };
        let font = FontDescriptor::new(family, font_size)
            .with_weight(weight)
            .with_style(props.keyword::<FontStyle>("font-style")?.unwrap_or(parent.font.style));

        let line_height = match props.get("line-height") {
            None => parent.line_height,
            Some(PropertyValue::Number(n)) => LineHeight::Factor(*n),
            Some(PropertyValue::Keyword(k)) if k == "normal" => LineHeight::Normal,
            Some(_) => match props.length("line-height")? {
                Some(Length::Percent(p)) => LineHeight::Factor(p as f64 / 100.0),
                Some(Length::Em(e)) => LineHeight::Factor(e as f64),
                Some(l) => l.resolve(font_size, None).map_or(LineHeight::Normal, LineHeight::Absolute),
                None => parent.line_height,
            },
        };

        let abs = |name: &str, fallback: Mpt| -> Result<Mpt, StyleError> {
            Ok(props
                .length(name)?
                .and_then(|l| l.resolve(font_size, None))
                .unwrap_or(fallback))
        };
        let space = |name: &str| -> Result<SizeRange, StyleError> {
            Ok(props
                .range(name)?
                .and_then(|r| r.resolve(font_size, None))
                .unwrap_or(SizeRange::ZERO))
        };

        let padding = Padding {
            before: abs("padding-before", 0)?,
            after: abs("padding-after", 0)?,
            start: abs("padding-start", 0)?,
            end: abs("padding-end", 0)?,
        };
        let borders = Borders {
            before: border_side(props, "before", font_size)?,
            after: border_side(props, "after", font_size)?,
            start: border_side(props, "start", font_size)?,
            end: border_side(props, "end", font_size)?,
        };

        Ok(ComputedStyle {
            font,
            color: props.color("color")?.unwrap_or(parent.color),
            line_height,
            text_align: props.keyword::<TextAlign>("text-align")?.unwrap_or(parent.text_align),
            text_align_last: match props.keyword::<TextAlign>("text-align-last")? {
                Some(align) => Some(align),
                None => parent.text_align_last,
            },
            linefeed_treatment: props
                .keyword::<LinefeedTreatment>("linefeed-treatment")?
                .unwrap_or(parent.linefeed_treatment),
            provisional_distance_between_starts: abs(
                "provisional-distance-between-starts",
                parent.provisional_distance_between_starts,
            )?,
            provisional_label_separation: abs(
                "provisional-label-separation",
                parent.provisional_label_separation,
            )?,
            leader_pattern: props
                .keyword::<LeaderPattern>("leader-pattern")?
                .unwrap_or(parent.leader_pattern),
            leader_length: props.range("leader-length")?.unwrap_or(parent.leader_length),
            rule_thickness: abs("rule-thickness", parent.rule_thickness)?,
            space_before: space("space-before")?,
            space_after: space("space-after")?,
            start_indent: abs("start-indent", initial.start_indent)?,
            end_indent: abs("end-indent", initial.end_indent)?,
            text_indent: props.length("text-indent")?.unwrap_or(initial.text_indent),
            padding,
            borders,
            background: props.color("background-color")?,
            break_before: props.keyword::<BreakKind>("break-before")?.unwrap_or_default(),
            break_after: props.keyword::<BreakKind>("break-after")?.unwrap_or_default(),
            block_progression_dimension: props
                .range("block-progression-dimension")?
                .and_then(|r| r.resolve(font_size, None)),
            content_width: props.length("content-width")?.filter(|l| !l.is_auto()),
            content_height: props.length("content-height")?.filter(|l| !l.is_auto()),
        })
    }

    /// Computes the style of a node from its metadata.
    pub fn for_node(meta: &NodeMetadata, parent: &Arc<ComputedStyle>) -> Result<Arc<Self>, StyleError> {
        if meta.properties.is_empty() {
            return Ok(Arc::new(Self::inherit(parent)));
        }
        Ok(Arc::new(Self::compute(&meta.properties, parent)?))
    }

    /// A child style with no properties of its own.
    pub fn inherit(parent: &ComputedStyle) -> Self {
        let initial = ComputedStyle::default();
        ComputedStyle {
            font: parent.font.clone(),
            color: parent.color,
            line_height: parent.line_height,
            text_align: parent.text_align,
            text_align_last: parent.text_align_last,
            linefeed_treatment: parent.linefeed_treatment,
            provisional_distance_between_starts: parent.provisional_distance_between_starts,
            provisional_label_separation: parent.provisional_label_separation,
            leader_pattern: parent.leader_pattern,
            leader_length: parent.leader_length,
            rule_thickness: parent.rule_thickness,
            ..initial
        }
    }

    pub fn line_height(&self) -> Mpt {
        self.line_height.resolve(self.font.size)
    }

    /// Alignment of the last line of a paragraph and of lines ended by a
    /// forced break.
    pub fn last_line_align(&self) -> TextAlign {
        match (self.text_align_last, self.text_align) {
            (Some(align), _) => align,
            (None, TextAlign::Justify) => TextAlign::Start,
            (None, align) => align,
        }
    }

    /// Inline space taken by start/end indents, padding and borders.
    pub fn inline_frame(&self) -> Mpt {
        self.start_indent
            + self.end_indent
            + self.padding.start
            + self.padding.end
            + self.borders.start.extent()
            + self.borders.end.extent()
    }

    /// Padding plus border before the content.
    pub fn frame_before(&self) -> Mpt {
        self.padding.before + self.borders.before.extent()
    }

    /// Padding plus border after the content.
    pub fn frame_after(&self) -> Mpt {
        self.padding.after + self.borders.after.extent()
    }

    pub fn has_frame(&self) -> bool {
        self.background.is_some()
            || self.frame_before() != 0
            || self.frame_after() != 0
            || self.padding.start != 0
            || self.padding.end != 0
            || self.borders.start.extent() != 0
            || self.borders.end.extent() != 0
    }
}

fn first_family(list: &str) -> &str {
    list.split(',')
        .next()
        .map(|f| f.trim().trim_matches(|c| c == '"' || c == '\''))
        .filter(|f| !f.is_empty())
        .unwrap_or("Helvetica")
}

fn border_side(props: &PropertyList, edge: &str, font_size: Mpt) -> Result<BorderSide, StyleError> {
    let style = props
        .keyword::<BorderStyle>(&format!("border-{}-style", edge))?
        .unwrap_or_default();
    let width = props
        .length(&format!("border-{}-width", edge))?
        .and_then(|l| l.resolve(font_size, None))
        .unwrap_or(if style == BorderStyle::None { 0 } else { pt(1.0) });
    let color = props.color(&format!("border-{}-color", edge))?.unwrap_or(Color::BLACK);
    Ok(BorderSide { width, style, color })
}
