use serde::{de, Deserialize, Deserializer, Serialize};
use std::fmt;

/// An sRGB color. Color management is out of scope; values pass through to
/// renderers unchanged.
#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Default for Color {
    fn default() -> Self {
        Self::BLACK
    }
}

impl Color {
    pub const BLACK: Color = Color { r: 0, g: 0, b: 0 };
    pub const WHITE: Color = Color { r: 255, g: 255, b: 255 };

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    pub fn gray(value: u8) -> Self {
        Self { r: value, g: value, b: value }
    }

    /// Parses `#rgb` or `#rrggbb`.
    pub fn from_hex(s: &str) -> Result<Color, String> {
        let s = s.trim();
        let hex = s
            .strip_prefix('#')
            .ok_or_else(|| format!("Color must start with #, got: {}", s))?;
        let channel = |digits: &str, name: &str| {
            u8::from_str_radix(digits, 16).map_err(|e| format!("Invalid {} component: {}", name, e))
        };

        match hex.len() {
            3 => Ok(Color {
                r: channel(&hex[0..1].repeat(2), "red")?,
                g: channel(&hex[1..2].repeat(2), "green")?,
                b: channel(&hex[2..3].repeat(2), "blue")?,
            }),
            6 => Ok(Color {
                r: channel(&hex[0..2], "red")?,
                g: channel(&hex[2..4], "green")?,
                b: channel(&hex[4..6], "blue")?,
            }),
            _ => Err(format!("Invalid hex color length: expected 3 or 6, got {}", hex.len())),
        }
    }

    /// The sixteen basic color keywords.
    pub fn named(name: &str) -> Option<Color> {
        let color = match name.to_ascii_lowercase().as_str() {
            "black" => Color::rgb(0, 0, 0),
            "silver" => Color::rgb(192, 192, 192),
            "gray" | "grey" => Color::rgb(128, 128, 128),
            "white" => Color::rgb(255, 255, 255),
            "maroon" => Color::rgb(128, 0, 0),
            "red" => Color::rgb(255, 0, 0),
            "purple" => Color::rgb(128, 0, 128),
            "fuchsia" => Color::rgb(255, 0, 255),
            "green" => Color::rgb(0, 128, 0),
            "lime" => Color::rgb(0, 255, 0),
            "olive" => Color::rgb(128, 128, 0),
            "yellow" => Color::rgb(255, 255, 0),
            "navy" => Color::rgb(0, 0, 128),
            "blue" => Color::rgb(0, 0, 255),
            "teal" => Color::rgb(0, 128, 128),
            "aqua" => Color::rgb(0, 255, 255),
            _ => return None,
        };
        Some(color)
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl<'de> Deserialize<'de> for Color {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum ColorDef {
            Str(String),
            Map { r: u8, g: u8, b: u8 },
        }

        match ColorDef::deserialize(deserializer)? {
            ColorDef::Str(s) => Color::named(&s)
                .map(Ok)
                .unwrap_or_else(|| Self::from_hex(&s))
                .map_err(de::Error::custom),
            ColorDef::Map { r, g, b } => Ok(Color { r, g, b }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex_forms() {
        assert_eq!(Color::from_hex("#fff"), Ok(Color::WHITE));
        assert_eq!(Color::from_hex("#1a2b3c"), Ok(Color::rgb(0x1a, 0x2b, 0x3c)));
        assert!(Color::from_hex("123456").is_err());
        assert!(Color::from_hex("#12345").is_err());
    }

    #[test]
    fn test_named_colors_ignore_case() {
        assert_eq!(Color::named("Navy"), Some(Color::rgb(0, 0, 128)));
        assert_eq!(Color::named("chartreuse"), None);
    }

    #[test]
    fn test_display_is_lowercase_hex() {
        assert_eq!(Color::rgb(255, 0, 16).to_string(), "#ff0010");
    }
}
