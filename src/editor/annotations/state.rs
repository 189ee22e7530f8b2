//! State resources for tracking annotation tool state.

use bevy::ecs::system::SystemParam;
use bevy::prelude::*;

use crate::annotation::{AnnotationId, Style, StyleDefaults};
use crate::constants::DEFAULT_HIT_TOLERANCE;
use crate::layer::AnnotationLayer;

use super::super::tools::CurrentTool;

pub const MIN_LINE_WIDTH: f32 = 1.0;
pub const MAX_LINE_WIDTH: f32 = 20.0;

/// Stroke colors bound to the digit keys 1-9
pub const PALETTE: [Color; 9] = [
    Color::srgb(1.0, 0.0, 0.0),
    Color::srgb(1.0, 0.5, 0.0),
    Color::srgb(1.0, 0.9, 0.0),
    Color::srgb(0.1, 0.8, 0.2),
    Color::srgb(0.0, 0.7, 0.9),
    Color::srgb(0.1, 0.3, 1.0),
    Color::srgb(0.6, 0.2, 0.9),
    Color::WHITE,
    Color::BLACK,
];

/// Freehand stroke in progress
#[derive(Resource, Default)]
pub struct DrawState {
    pub is_drawing: bool,
    pub current_points: Vec<Vec2>,
}

/// Two-corner shape (arrow, rectangle, ellipse) being dragged out
#[derive(Resource, Default)]
pub struct ShapeDrawState {
    pub start: Option<Vec2>,
}

/// Vertices placed so far for a polyline or polygon
#[derive(Resource, Default)]
pub struct PolylineDrawState {
    pub points: Vec<Vec2>,
}

/// Text box for placing or editing a numbered marker.
#[derive(Resource, Default, Debug)]
pub struct TextEditState {
    /// Where a new marker will be placed when the box is confirmed
    pub anchor: Option<Vec2>,
    /// Existing marker whose text is being edited
    pub editing: Option<AnnotationId>,
    pub buffer: String,
}

impl TextEditState {
    pub fn is_active(&self) -> bool {
        self.anchor.is_some() || self.editing.is_some()
    }

    pub fn cancel(&mut self) {
        self.anchor = None;
        self.editing = None;
        self.buffer.clear();
    }
}

/// Defaults applied to new annotations and to unset style fields.
#[derive(Resource, Debug, Clone)]
pub struct AnnotationSettings {
    pub stroke_color: Color,
    pub stroke_width: f32,
    pub font_size: f32,
    /// Hit tolerance in screen pixels
    pub hit_tolerance: f32,
}

impl Default for AnnotationSettings {
    fn default() -> Self {
        let defaults = StyleDefaults::default();
        Self {
            stroke_color: defaults.foreground,
            stroke_width: defaults.line_width,
            font_size: defaults.font_size,
            hit_tolerance: DEFAULT_HIT_TOLERANCE,
        }
    }
}

impl AnnotationSettings {
    /// Fallbacks used when painting unset style fields
    pub fn style_defaults(&self) -> StyleDefaults {
        StyleDefaults {
            foreground: self.stroke_color,
            line_width: self.stroke_width,
            font_size: self.font_size,
            ..default()
        }
    }

    /// Style written into newly created annotations
    pub fn new_item_style(&self) -> Style {
        Style::default()
            .with_foreground(self.stroke_color)
            .with_line_width(self.stroke_width)
    }
}

#[derive(SystemParam)]
pub(crate) struct AnnotationResources<'w> {
    pub mouse_button: Res<'w, ButtonInput<MouseButton>>,
    pub current_tool: Res<'w, CurrentTool>,
    pub settings: Res<'w, AnnotationSettings>,
    pub layer: ResMut<'w, AnnotationLayer>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_edit_cancel_clears_everything() {
        let mut state = TextEditState {
            anchor: Some(Vec2::ONE),
            editing: None,
            buffer: "draft".into(),
        };
        assert!(state.is_active());
        state.cancel();
        assert!(!state.is_active());
        assert!(state.buffer.is_empty());
    }

    #[test]
    fn test_new_item_style_copies_settings() {
        let settings = AnnotationSettings {
            stroke_color: Color::WHITE,
            stroke_width: 5.0,
            ..default()
        };
        let style = settings.new_item_style();
        assert_eq!(style.foreground, Some(Color::WHITE));
        assert_eq!(style.line_width, Some(5.0));
        assert!(style.background.is_none());
        assert_eq!(settings.style_defaults().line_width, 5.0);
    }
}
