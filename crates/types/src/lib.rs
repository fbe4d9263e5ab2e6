pub mod color;
pub mod geometry;
pub mod ids;
pub mod range;
pub mod units;

pub use color::Color;
pub use geometry::{Insets, Rect, Size};
pub use ids::{AnchorId, ResourceUri};
pub use range::SizeRange;
pub use units::{Mpt, pt, scale, to_points};
