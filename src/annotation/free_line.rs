//! Freehand stroke annotation.

use bevy::prelude::*;

use super::geometry::{point_near_polyline, stroke};
use super::{stroke_slack, Annotation, AnnotationCore, Painter, StyleDefaults};

/// Freehand drawing path (a series of connected points)
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FreeLine {
    pub(crate) core: AnnotationCore,
}

impl FreeLine {
    pub const KIND: &'static str = "free_line";
}

impl Annotation for FreeLine {
    fn kind(&self) -> &'static str {
        Self::KIND
    }

    fn core(&self) -> &AnnotationCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut AnnotationCore {
        &mut self.core
    }

    fn paint(&self, painter: &mut dyn Painter, defaults: &StyleDefaults) {
        let style = self.core.style.resolve(defaults);
        stroke(
            painter,
            &self.core.points,
            false,
            style.foreground,
            style.line_width,
            style.dash,
        );
    }

    fn hit_test(&self, point: Vec2, tolerance: f32, defaults: &StyleDefaults) -> bool {
        let threshold = tolerance + stroke_slack(&self.core.style, defaults);
        point_near_polyline(point, &self.core.points, false, threshold)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::annotation::tests::RecordingPainter;
    use crate::annotation::{Mutation, Style};

    fn zigzag() -> FreeLine {
        let mut line = FreeLine::default();
        line.core.points = vec![Vec2::ZERO, Vec2::new(10.0, 10.0), Vec2::new(20.0, 0.0)];
        line
    }

    #[test]
    fn test_hit_test_along_path() {
        let line = zigzag();
        assert!(line.hit_test(Vec2::new(5.0, 5.0), 1.0, &StyleDefaults::default()));
        assert!(line.hit_test(Vec2::new(15.0, 5.5), 1.0, &StyleDefaults::default()));
        assert!(!line.hit_test(Vec2::new(10.0, 0.0), 1.0, &StyleDefaults::default()));
    }

    #[test]
    fn test_line_width_widens_hit_area() {
        let mut line = zigzag();
        assert!(!line.hit_test(Vec2::new(10.0, 3.0), 1.0, &StyleDefaults::default()));
        line.core.style = Style::default().with_line_width(12.0);
        assert!(line.hit_test(Vec2::new(10.0, 3.0), 1.0, &StyleDefaults::default()));
    }

    #[test]
    fn test_paint_uses_foreground_and_ignores_background() {
        let mut line = zigzag();
        line.core.style = Style::default()
            .with_foreground(Color::srgb(0.0, 0.0, 1.0))
            .with_background(Color::WHITE);
        let mut painter = RecordingPainter::default();
        line.paint(&mut painter, &StyleDefaults::default());

        assert_eq!(painter.lines.len(), 2);
        assert!(painter
            .lines
            .iter()
            .all(|(_, _, color, _)| *color == Color::srgb(0.0, 0.0, 1.0)));
    }

    #[test]
    fn test_unbounded_points() {
        let mut line = FreeLine::default();
        for i in 0..50 {
            line.apply(&Mutation::AddPoint(Vec2::splat(i as f32))).unwrap();
        }
        assert_eq!(line.points().len(), 50);
        assert_eq!(line.point_limit(), None);
    }
}
