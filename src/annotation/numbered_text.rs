//! Numbered marker with a text label.

use bevy::prelude::*;

use crate::error::{FactoryError, MutationError};

use super::geometry::{ellipse_outline, point_near_segment, stroke};
use super::mutation::{self, AccessorTag, Mutation};
use super::state::{AnnotationState, FieldValue, Fields};
use super::{Annotation, AnnotationCore, Painter, Style, StyleDefaults, TextLabel};

const TEXT_FIELD: &str = "text";
const NUMBER_FIELD: &str = "number";

/// Gap between the marker circle and the label
const LABEL_GAP: f32 = 6.0;

/// A numbered circle anchored at its single point, followed by a label.
#[derive(Debug, Clone, PartialEq)]
pub struct NumberedText {
    pub(crate) core: AnnotationCore,
    text: String,
    number: u32,
}

impl Default for NumberedText {
    fn default() -> Self {
        Self {
            core: AnnotationCore::default(),
            text: String::new(),
            number: 1,
        }
    }
}

impl NumberedText {
    pub const KIND: &'static str = "numbered_text";

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn number(&self) -> u32 {
        self.number
    }

    pub fn anchor(&self) -> Option<Vec2> {
        self.core.points.first().copied()
    }

    /// State for a new marker placed at `anchor`.
    pub fn initial_state(anchor: Vec2, text: &str, number: u32, style: Style) -> AnnotationState {
        AnnotationState {
            points: vec![anchor],
            style,
            fields: marker_fields(text, number),
        }
    }

    fn marker_radius(font_size: f32) -> f32 {
        font_size * 0.75
    }

    /// Approximate label rectangle, to the right of the marker.
    fn label_rect(&self, anchor: Vec2, font_size: f32) -> Rect {
        let radius = Self::marker_radius(font_size);
        let width = (self.text.chars().count() as f32 * font_size * 0.5).max(40.0);
        let height = font_size.max(20.0);
        let left = anchor.x + radius + LABEL_GAP;
        Rect::new(left, anchor.y - height / 2.0, left + width, anchor.y + height / 2.0)
    }

    fn font_size(&self, defaults: &StyleDefaults) -> f32 {
        self.core.style.font_size.unwrap_or(defaults.font_size)
    }
}

impl Annotation for NumberedText {
    fn kind(&self) -> &'static str {
        Self::KIND
    }

    fn core(&self) -> &AnnotationCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut AnnotationCore {
        &mut self.core
    }

    fn point_limit(&self) -> Option<usize> {
        Some(1)
    }

    fn paint(&self, painter: &mut dyn Painter, defaults: &StyleDefaults) {
        let Some(anchor) = self.anchor() else {
            return;
        };
        let style = self.core.style.resolve(defaults);
        let radius = Self::marker_radius(style.font_size);
        let marker = Rect::from_center_half_size(anchor, Vec2::splat(radius));
        stroke(
            painter,
            &ellipse_outline(marker),
            true,
            style.foreground,
            style.line_width,
            None,
        );
        painter.label(TextLabel {
            anchor,
            text: self.number.to_string(),
            font_size: style.font_size,
            font_weight: style.font_weight,
            color: style.foreground,
            background: style.background,
            centered: true,
        });
        if !self.text.is_empty() {
            painter.label(TextLabel {
                anchor: Vec2::new(anchor.x + radius + LABEL_GAP, anchor.y),
                text: self.text.clone(),
                font_size: style.font_size,
                font_weight: style.font_weight,
                color: style.foreground,
                background: style.background,
                centered: false,
            });
        }
    }

    fn hit_test(&self, point: Vec2, tolerance: f32, defaults: &StyleDefaults) -> bool {
        let Some(anchor) = self.anchor() else {
            return false;
        };
        let font_size = self.font_size(defaults);
        let radius = Self::marker_radius(font_size);
        point_near_segment(point, anchor, anchor, radius + tolerance)
            || (!self.text.is_empty()
                && self
                    .label_rect(anchor, font_size)
                    .inflate(tolerance)
                    .contains(point))
    }

    fn bounds(&self, defaults: &StyleDefaults) -> Option<Rect> {
        let anchor = self.anchor()?;
        let font_size = self.font_size(defaults);
        let radius = Self::marker_radius(font_size);
        let marker = Rect::from_center_half_size(anchor, Vec2::splat(radius));
        if self.text.is_empty() {
            Some(marker)
        } else {
            Some(marker.union(self.label_rect(anchor, font_size)))
        }
    }

    fn supports(&self, accessor: AccessorTag) -> bool {
        matches!(accessor, AccessorTag::Text | AccessorTag::Number)
            || mutation::supports_common(accessor)
    }

    fn read(&self, accessor: AccessorTag) -> Option<FieldValue> {
        match accessor {
            AccessorTag::Text => Some(FieldValue::Text(self.text.clone())),
            AccessorTag::Number => Some(FieldValue::Int(i64::from(self.number))),
            _ => mutation::read_common(&self.core, accessor),
        }
    }

    fn apply(&mut self, mutation: &Mutation) -> Result<(), MutationError> {
        match mutation {
            Mutation::SetText(text) => {
                self.text = text.clone();
                Ok(())
            }
            Mutation::SetNumber(0) => Err(MutationError::InvalidValue {
                field: "number",
                reason: "markers are numbered from 1".to_owned(),
            }),
            Mutation::SetNumber(number) => {
                self.number = *number;
                Ok(())
            }
            other => mutation::apply_common(&mut self.core, Self::KIND, Some(1), other),
        }
    }

    fn export_fields(&self) -> Fields {
        marker_fields(&self.text, self.number)
    }

    fn import_fields(&mut self, fields: &Fields) -> Result<(), FactoryError> {
        let text = fields
            .get(TEXT_FIELD)
            .and_then(FieldValue::as_text)
            .ok_or_else(|| missing_field(TEXT_FIELD))?;
        let number = fields
            .get(NUMBER_FIELD)
            .and_then(FieldValue::as_int)
            .and_then(|n| u32::try_from(n).ok())
            .filter(|n| *n > 0)
            .ok_or_else(|| missing_field(NUMBER_FIELD))?;
        self.text = text.to_owned();
        self.number = number;
        Ok(())
    }
}

fn marker_fields(text: &str, number: u32) -> Fields {
    Fields::from([
        (TEXT_FIELD.to_owned(), FieldValue::Text(text.to_owned())),
        (NUMBER_FIELD.to_owned(), FieldValue::Int(i64::from(number))),
    ])
}

fn missing_field(name: &str) -> FactoryError {
    FactoryError::Import {
        kind: NumberedText::KIND.to_owned(),
        reason: format!("missing or invalid `{name}` field"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::annotation::tests::RecordingPainter;

    fn marker(text: &str) -> NumberedText {
        let mut marker = NumberedText::default();
        marker.core.points = vec![Vec2::ZERO];
        marker.text = text.to_owned();
        marker
    }

    #[test]
    fn test_single_anchor_point() {
        let mut m = marker("");
        assert!(m.apply(&Mutation::AddPoint(Vec2::ONE)).is_err());
        m.apply(&Mutation::SetPoint {
            index: 0,
            point: Vec2::ONE,
        })
        .unwrap();
        assert_eq!(m.anchor(), Some(Vec2::ONE));
    }

    #[test]
    fn test_set_text_and_number() {
        let mut m = marker("");
        m.apply(&Mutation::SetText("Camp".into())).unwrap();
        m.apply(&Mutation::SetNumber(4)).unwrap();
        assert_eq!(m.text(), "Camp");
        assert_eq!(m.number(), 4);
        assert!(m.apply(&Mutation::SetNumber(0)).is_err());
        assert_eq!(m.number(), 4);
    }

    #[test]
    fn test_paint_emits_number_and_label() {
        let mut painter = RecordingPainter::default();
        marker("Bridge").paint(&mut painter, &StyleDefaults::default());
        assert_eq!(painter.labels.len(), 2);
        assert_eq!(painter.labels[0].text, "1");
        assert_eq!(painter.labels[1].text, "Bridge");
        assert!(!painter.lines.is_empty());

        let mut painter = RecordingPainter::default();
        marker("").paint(&mut painter, &StyleDefaults::default());
        assert_eq!(painter.labels.len(), 1);
    }

    #[test]
    fn test_hit_marker_and_label() {
        let m = marker("Long label text");
        assert!(m.hit_test(Vec2::new(3.0, 3.0), 0.0, &StyleDefaults::default()));
        assert!(m.hit_test(Vec2::new(60.0, 0.0), 0.0, &StyleDefaults::default()));
        assert!(!m.hit_test(Vec2::new(0.0, 60.0), 0.0, &StyleDefaults::default()));
    }

    #[test]
    fn test_unset_font_size_follows_defaults() {
        let m = marker("");
        let large = StyleDefaults {
            font_size: 48.0,
            ..default()
        };
        // Radius 36 at size 48, 18 at the built-in 24
        let point = Vec2::new(30.0, 0.0);
        assert!(m.hit_test(point, 0.0, &large));
        assert!(!m.hit_test(point, 0.0, &StyleDefaults::default()));

        let bounds = m.bounds(&large).unwrap();
        assert_eq!(bounds.max, Vec2::splat(36.0));

        let mut painter = RecordingPainter::default();
        m.paint(&mut painter, &large);
        assert_eq!(painter.labels[0].font_size, 48.0);
    }

    #[test]
    fn test_explicit_font_size_wins_over_defaults() {
        let mut m = marker("");
        m.core.style = Style::default().with_font_size(16.0);
        let large = StyleDefaults {
            font_size: 48.0,
            ..default()
        };
        assert_eq!(m.bounds(&large).unwrap().max, Vec2::splat(12.0));
    }

    #[test]
    fn test_accessors() {
        let m = marker("x");
        assert!(m.supports(AccessorTag::Text));
        assert!(m.supports(AccessorTag::Foreground));
        assert_eq!(m.read(AccessorTag::Text), Some(FieldValue::Text("x".into())));
        assert_eq!(m.read(AccessorTag::Number), Some(FieldValue::Int(1)));
    }

    #[test]
    fn test_state_round_trip_includes_fields() {
        let mut m = marker("Ford");
        m.number = 7;
        let state = m.export_state();
        assert_eq!(state.fields.len(), 2);

        let mut copy = NumberedText::default();
        copy.import_state(state).unwrap();
        assert_eq!(copy, m);
    }

    #[test]
    fn test_initial_state_imports() {
        let state = NumberedText::initial_state(Vec2::ONE, "Well", 2, Style::default());
        let mut m = NumberedText::default();
        m.import_state(state).unwrap();
        assert_eq!(m.anchor(), Some(Vec2::ONE));
        assert_eq!(m.text(), "Well");
        assert_eq!(m.number(), 2);
    }

    #[test]
    fn test_import_requires_fields() {
        let mut m = NumberedText::default();
        let state = AnnotationState {
            points: vec![Vec2::ZERO],
            ..default()
        };
        assert!(m.import_state(state).is_err());
        assert!(m.points().is_empty());
    }
}
