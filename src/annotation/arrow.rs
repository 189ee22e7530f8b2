//! Arrow annotation: a straight line with a head at its second point.

use bevy::prelude::*;

use super::geometry::{point_near_segment, stroke};
use super::{stroke_slack, Annotation, AnnotationCore, Painter, StyleDefaults};

/// Angle between the shaft and each barb of the arrow head
const HEAD_ANGLE: f32 = 0.45;

/// Minimum barb length in world units
const MIN_HEAD_LENGTH: f32 = 12.0;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Arrow {
    pub(crate) core: AnnotationCore,
}

impl Arrow {
    pub const KIND: &'static str = "arrow";

    /// Tail and tip, once both points are placed.
    pub fn endpoints(&self) -> Option<(Vec2, Vec2)> {
        match self.core.points.as_slice() {
            [tail, tip] => Some((*tail, *tip)),
            _ => None,
        }
    }

    /// The two barb end points for a given line width.
    pub fn head_barbs(tail: Vec2, tip: Vec2, line_width: f32) -> Option<(Vec2, Vec2)> {
        let back = (tail - tip).try_normalize()?;
        let length = (line_width * 4.0).max(MIN_HEAD_LENGTH);
        let left = Vec2::from_angle(HEAD_ANGLE).rotate(back) * length;
        let right = Vec2::from_angle(-HEAD_ANGLE).rotate(back) * length;
        Some((tip + left, tip + right))
    }
}

impl Annotation for Arrow {
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
        Some(2)
    }

    fn paint(&self, painter: &mut dyn Painter, defaults: &StyleDefaults) {
        let Some((tail, tip)) = self.endpoints() else {
            return;
        };
        let style = self.core.style.resolve(defaults);
        stroke(
            painter,
            &[tail, tip],
            false,
            style.foreground,
            style.line_width,
            style.dash,
        );
        // The head is always solid so the direction stays readable
        if let Some((left, right)) = Self::head_barbs(tail, tip, style.line_width) {
            painter.line(tip, left, style.foreground, style.line_width);
            painter.line(tip, right, style.foreground, style.line_width);
        }
    }

    fn hit_test(&self, point: Vec2, tolerance: f32, defaults: &StyleDefaults) -> bool {
        let Some((tail, tip)) = self.endpoints() else {
            return false;
        };
        let threshold = tolerance + stroke_slack(&self.core.style, defaults);
        point_near_segment(point, tail, tip, threshold)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::annotation::tests::RecordingPainter;
    use crate::annotation::{DashPattern, Mutation, Style};
    use crate::error::MutationError;

    fn arrow(tail: Vec2, tip: Vec2) -> Arrow {
        let mut arrow = Arrow::default();
        arrow.core.points = vec![tail, tip];
        arrow
    }

    #[test]
    fn test_third_point_rejected() {
        let mut a = arrow(Vec2::ZERO, Vec2::X);
        let err = a.apply(&Mutation::AddPoint(Vec2::Y)).unwrap_err();
        assert!(matches!(err, MutationError::PointLimit { kind: "arrow", max: 2 }));
    }

    #[test]
    fn test_incomplete_arrow_paints_nothing() {
        let mut a = Arrow::default();
        a.core.points = vec![Vec2::ZERO];
        let mut painter = RecordingPainter::default();
        a.paint(&mut painter, &StyleDefaults::default());
        assert!(painter.lines.is_empty());
        assert!(!a.hit_test(Vec2::ZERO, 5.0, &StyleDefaults::default()));
    }

    #[test]
    fn test_paint_draws_shaft_and_head() {
        let a = arrow(Vec2::ZERO, Vec2::new(100.0, 0.0));
        let mut painter = RecordingPainter::default();
        a.paint(&mut painter, &StyleDefaults::default());
        assert_eq!(painter.lines.len(), 3);
    }

    #[test]
    fn test_head_stays_solid_when_dashed() {
        let mut a = arrow(Vec2::ZERO, Vec2::new(100.0, 0.0));
        a.core.style = Style::default().with_dash(DashPattern::new(10.0, 10.0));
        let mut painter = RecordingPainter::default();
        a.paint(&mut painter, &StyleDefaults::default());
        // 5 dashes along the shaft plus two barbs
        assert_eq!(painter.lines.len(), 7);
    }

    #[test]
    fn test_barbs_point_back_toward_tail() {
        let (left, right) = Arrow::head_barbs(Vec2::ZERO, Vec2::new(100.0, 0.0), 1.0).unwrap();
        assert!(left.x < 100.0 && right.x < 100.0);
        assert!(left.y * right.y < 0.0);
    }

    #[test]
    fn test_hit_test() {
        let a = arrow(Vec2::ZERO, Vec2::new(100.0, 0.0));
        assert!(a.hit_test(Vec2::new(50.0, 2.0), 3.0, &StyleDefaults::default()));
        assert!(!a.hit_test(Vec2::new(50.0, 20.0), 3.0, &StyleDefaults::default()));
    }
}
