//! Style value object shared by all annotation kinds.
//!
//! Every field is optional. An unset field means "inherit the default" and is
//! resolved against [`StyleDefaults`] at paint time, never stored as zero.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum FontWeight {
    Light,
    #[default]
    Regular,
    Bold,
}

impl FontWeight {
    pub fn display_name(&self) -> &'static str {
        match self {
            FontWeight::Light => "Light",
            FontWeight::Regular => "Regular",
            FontWeight::Bold => "Bold",
        }
    }
}

/// On/off lengths (world units) for dashed strokes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DashPattern {
    pub dash: f32,
    pub gap: f32,
}

impl DashPattern {
    pub const fn new(dash: f32, gap: f32) -> Self {
        Self { dash, gap }
    }

    pub const fn dotted() -> Self {
        Self::new(2.0, 4.0)
    }

    pub const fn dashed() -> Self {
        Self::new(10.0, 6.0)
    }

    /// A pattern with a non-positive period cannot be walked.
    pub fn is_valid(&self) -> bool {
        self.dash > 0.0 && self.gap >= 0.0 && self.dash.is_finite() && self.gap.is_finite()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Style {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub foreground: Option<Color>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background: Option<Color>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line_width: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_weight: Option<FontWeight>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_size: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dash: Option<DashPattern>,
}

impl Style {
    pub fn with_foreground(mut self, color: Color) -> Self {
        self.foreground = Some(color);
        self
    }

    pub fn with_background(mut self, color: Color) -> Self {
        self.background = Some(color);
        self
    }

    pub fn with_line_width(mut self, width: f32) -> Self {
        self.line_width = Some(width);
        self
    }

    pub fn with_font_size(mut self, size: f32) -> Self {
        self.font_size = Some(size);
        self
    }

    pub fn with_font_weight(mut self, weight: FontWeight) -> Self {
        self.font_weight = Some(weight);
        self
    }

    pub fn with_dash(mut self, dash: DashPattern) -> Self {
        self.dash = Some(dash);
        self
    }

    /// True when no field is set.
    pub fn is_unset(&self) -> bool {
        *self == Style::default()
    }

    pub fn resolve(&self, defaults: &StyleDefaults) -> ResolvedStyle {
        ResolvedStyle {
            foreground: self.foreground.unwrap_or(defaults.foreground),
            background: self.background.or(defaults.background),
            line_width: self.line_width.unwrap_or(defaults.line_width),
            font_weight: self.font_weight.unwrap_or(defaults.font_weight),
            font_size: self.font_size.unwrap_or(defaults.font_size),
            dash: self.dash,
        }
    }
}

/// Values used for style fields an annotation leaves unset.
#[derive(Debug, Clone, PartialEq)]
pub struct StyleDefaults {
    pub foreground: Color,
    pub background: Option<Color>,
    pub line_width: f32,
    pub font_weight: FontWeight,
    pub font_size: f32,
}

impl Default for StyleDefaults {
    fn default() -> Self {
        Self {
            foreground: Color::srgb(1.0, 0.0, 0.0),
            background: None,
            line_width: 3.0,
            font_weight: FontWeight::Regular,
            font_size: 24.0,
        }
    }
}

/// A style with every field filled in, ready for painting.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedStyle {
    pub foreground: Color,
    pub background: Option<Color>,
    pub line_width: f32,
    pub font_weight: FontWeight,
    pub font_size: f32,
    pub dash: Option<DashPattern>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_style_is_unset() {
        let style = Style::default();
        assert!(style.is_unset());
        assert!(style.foreground.is_none());
        assert!(style.line_width.is_none());
    }

    #[test]
    fn test_resolve_inherits_unset_fields() {
        let defaults = StyleDefaults::default();
        let style = Style::default().with_line_width(7.0);
        let resolved = style.resolve(&defaults);

        assert_eq!(resolved.line_width, 7.0);
        assert_eq!(resolved.foreground, defaults.foreground);
        assert_eq!(resolved.font_size, defaults.font_size);
        assert!(resolved.dash.is_none());
    }

    #[test]
    fn test_unset_serializes_as_empty_object() {
        let json = serde_json::to_string(&Style::default()).unwrap();
        assert_eq!(json, "{}");

        let parsed: Style = serde_json::from_str("{}").unwrap();
        assert!(parsed.is_unset());
    }

    #[test]
    fn test_style_json_round_trip() {
        let style = Style::default()
            .with_foreground(Color::srgb(0.0, 0.0, 1.0))
            .with_background(Color::srgba(1.0, 1.0, 0.0, 0.5))
            .with_font_weight(FontWeight::Bold)
            .with_font_size(18.5)
            .with_dash(DashPattern::dashed());

        let json = serde_json::to_string(&style).unwrap();
        let parsed: Style = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, style);
    }

    #[test]
    fn test_dash_pattern_validity() {
        assert!(DashPattern::dashed().is_valid());
        assert!(DashPattern::dotted().is_valid());
        assert!(!DashPattern::new(0.0, 4.0).is_valid());
        assert!(!DashPattern::new(4.0, -1.0).is_valid());
    }
}
