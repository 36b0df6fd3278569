use egui::{Color32, Stroke};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Serde adapter storing `Color32` as a CSS color string.
///
/// Accepts `#rgb`, `#rrggbb`, `#rrggbbaa`, `transparent` and a few named
/// colors. Writes `transparent`, `#rrggbb` or `#rrggbbaa`.
pub mod css_color {
    use egui::Color32;
    use serde::{Deserialize, Deserializer, Serializer, de::Error as _};

    const NAMED: &[(&str, [u8; 3])] = &[
        ("black", [0, 0, 0]),
        ("white", [255, 255, 255]),
        ("red", [255, 0, 0]),
        ("green", [0, 128, 0]),
        ("blue", [0, 0, 255]),
        ("yellow", [255, 255, 0]),
        ("orange", [255, 165, 0]),
        ("purple", [128, 0, 128]),
        ("gray", [128, 128, 128]),
        ("grey", [128, 128, 128]),
    ];

    pub fn parse(input: &str) -> Option<Color32> {
        let value = input.trim().to_ascii_lowercase();
        if value == "transparent" {
            return Some(Color32::TRANSPARENT);
        }
        if let Some(hex) = value.strip_prefix('#') {
            return parse_hex(hex);
        }
        NAMED
            .iter()
            .find(|(name, _)| *name == value)
            .map(|(_, [r, g, b])| Color32::from_rgb(*r, *g, *b))
    }

    fn parse_hex(hex: &str) -> Option<Color32> {
        if !hex.is_ascii() {
            return None;
        }
        let channel = |s: &str| u8::from_str_radix(s, 16).ok();
        match hex.len() {
            3 => {
                let mut rgb = [0u8; 3];
                for (i, c) in hex.chars().enumerate() {
                    let v = c.to_digit(16)? as u8;
                    rgb[i] = v * 17;
                }
                Some(Color32::from_rgb(rgb[0], rgb[1], rgb[2]))
            }
            6 => Some(Color32::from_rgb(
                channel(&hex[0..2])?,
                channel(&hex[2..4])?,
                channel(&hex[4..6])?,
            )),
            8 => Some(Color32::from_rgba_unmultiplied(
                channel(&hex[0..2])?,
                channel(&hex[2..4])?,
                channel(&hex[4..6])?,
                channel(&hex[6..8])?,
            )),
            _ => None,
        }
    }

    pub fn format(color: Color32) -> String {
        if color.a() == 0 {
            return "transparent".to_owned();
        }
        let [r, g, b, a] = color.to_srgba_unmultiplied();
        if a == 255 {
            format!("#{r:02x}{g:02x}{b:02x}")
        } else {
            format!("#{r:02x}{g:02x}{b:02x}{a:02x}")
        }
    }

    pub fn serialize<S: Serializer>(color: &Color32, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&format(*color))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Color32, D::Error> {
        let value = String::deserialize(deserializer)?;
        parse(&value).ok_or_else(|| D::Error::custom(format!("unsupported color `{value}`")))
    }
}

fn default_color() -> Color32 {
    Color32::BLACK
}

fn default_fill() -> Color32 {
    Color32::TRANSPARENT
}

fn default_thickness() -> f32 {
    1.0
}

/// Stroke and fill of closed shapes (circle, square, triangle, click polygon)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShapeStyle {
    #[serde(with = "css_color", default = "default_color")]
    pub color: Color32,
    #[serde(with = "css_color", default = "default_fill")]
    pub fill_color: Color32,
    #[serde(default = "default_thickness")]
    pub thickness: f32,
}

impl Default for ShapeStyle {
    fn default() -> Self {
        Self {
            color: default_color(),
            fill_color: default_fill(),
            thickness: default_thickness(),
        }
    }
}

impl ShapeStyle {
    /// `None` when the fill is `transparent`, which means "do not fill".
    pub fn fill(&self) -> Option<Color32> {
        (self.fill_color.a() > 0).then_some(self.fill_color)
    }

    pub fn stroke(&self) -> Stroke {
        Stroke::new(self.thickness, self.color)
    }
}

/// Style of an open freehand polyline
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StrokeStyle {
    #[serde(with = "css_color", default = "default_color")]
    pub color: Color32,
    #[serde(default = "default_thickness")]
    pub thickness: f32,
}

impl Default for StrokeStyle {
    fn default() -> Self {
        Self {
            color: default_color(),
            thickness: 2.0,
        }
    }
}

impl StrokeStyle {
    pub fn stroke(&self) -> Stroke {
        Stroke::new(self.thickness, self.color)
    }
}

/// Font descriptor, persisted in CSS shorthand (`bold 16px Arial`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct FontSpec {
    pub bold: bool,
    pub size: f32,
    pub family: String,
}

impl Default for FontSpec {
    fn default() -> Self {
        Self {
            bold: false,
            size: 16.0,
            family: "Arial".to_owned(),
        }
    }
}

impl FontSpec {
    pub fn new(bold: bool, size: f32, family: impl Into<String>) -> Self {
        Self {
            bold,
            size,
            family: family.into(),
        }
    }

    /// Lenient CSS shorthand parser: unknown weight keywords are ignored and a
    /// missing `px` size falls back to the default.
    pub fn parse(value: &str) -> Self {
        let mut font = Self::default();
        let tokens: Vec<&str> = value.split_whitespace().collect();
        let size_at = tokens.iter().position(|t| t.ends_with("px"));

        if let Some(index) = size_at {
            if let Ok(size) = tokens[index].trim_end_matches("px").parse::<f32>() {
                font.size = size;
            }
            font.bold = tokens[..index].iter().any(|t| *t == "bold");
            if index + 1 < tokens.len() {
                font.family = tokens[index + 1..].join(" ");
            }
        } else {
            log::warn!("Font descriptor without a pixel size: {value:?}");
        }
        font
    }
}

impl fmt::Display for FontSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.bold {
            write!(f, "bold ")?;
        }
        write!(f, "{}px {}", self.size, self.family)
    }
}

impl From<String> for FontSpec {
    fn from(value: String) -> Self {
        Self::parse(&value)
    }
}

impl From<FontSpec> for String {
    fn from(font: FontSpec) -> Self {
        font.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_css_color_parsing() {
        assert_eq!(css_color::parse("#000000"), Some(Color32::BLACK));
        assert_eq!(css_color::parse("#fff"), Some(Color32::WHITE));
        assert_eq!(css_color::parse("Red"), Some(Color32::from_rgb(255, 0, 0)));
        assert_eq!(css_color::parse("transparent"), Some(Color32::TRANSPARENT));
        assert_eq!(css_color::parse("#12345"), None);
        assert_eq!(css_color::parse("chartreuse-ish"), None);
    }

    #[test]
    fn test_css_color_formatting() {
        assert_eq!(css_color::format(Color32::BLACK), "#000000");
        assert_eq!(css_color::format(Color32::from_rgb(255, 16, 1)), "#ff1001");
        assert_eq!(css_color::format(Color32::TRANSPARENT), "transparent");
    }

    #[test]
    fn test_transparent_fill_means_no_fill() {
        let style = ShapeStyle::default();
        assert_eq!(style.fill(), None);

        let filled = ShapeStyle {
            fill_color: Color32::RED,
            ..style
        };
        assert_eq!(filled.fill(), Some(Color32::RED));
    }

    #[test]
    fn test_font_shorthand() {
        let font = FontSpec::parse("bold 24px Comic Sans");
        assert!(font.bold);
        assert_eq!(font.size, 24.0);
        assert_eq!(font.family, "Comic Sans");
        assert_eq!(font.to_string(), "bold 24px Comic Sans");

        let plain = FontSpec::parse("normal 16px Arial");
        assert!(!plain.bold);
        assert_eq!(plain.to_string(), "16px Arial");
    }
}
