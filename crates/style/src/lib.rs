//! Typed property values for formatting objects.
//!
//! Properties arrive as name/value pairs. [`PropertyList::parse`] turns raw
//! strings into typed [`PropertyValue`]s (rejecting malformed input up front)
//! and the typed getters hand them to the layout engine.

pub mod border;
pub mod font;
pub mod keyword;
pub mod length;
pub mod parsers;
pub mod property;
pub mod text;

use thiserror::Error;

pub use border::{BorderSide, BorderStyle};
pub use font::{FontStyle, FontWeight};
pub use keyword::{BreakKind, Keyword};
pub use length::{Length, LengthRange};
pub use property::{PropertyList, PropertyValue};
pub use text::{LeaderPattern, LinefeedTreatment, TextAlign};

/// Errors raised while evaluating property values.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum StyleError {
    #[error("Cannot parse '{value}' for '{property}': {detail}")]
    Parse {
        property: String,
        value: String,
        detail: String,
    },

    #[error("Invalid value for '{property}': {value}")]
    InvalidValue { property: String, value: String },

    #[error("Property '{property}' holds {found}, expected {expected}")]
    TypeMismatch {
        property: String,
        expected: &'static str,
        found: &'static str,
    },
}
