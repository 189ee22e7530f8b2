//! Multi-point polyline annotation, open or closed.

use bevy::prelude::*;

use super::geometry::{hatch_polygon, point_in_polygon, point_near_polyline, stroke};
use super::{stroke_slack, Annotation, AnnotationCore, Painter, StyleDefaults};

/// Straight segments through clicked points. A closed polyline is a polygon
/// and registers under its own kind.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Polyline {
    pub(crate) core: AnnotationCore,
    closed: bool,
}

impl Polyline {
    pub const OPEN_KIND: &'static str = "polyline";
    pub const CLOSED_KIND: &'static str = "polygon";

    pub fn open() -> Self {
        Self::default()
    }

    pub fn closed() -> Self {
        Self {
            closed: true,
            ..default()
        }
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }
}

impl Annotation for Polyline {
    fn kind(&self) -> &'static str {
        if self.closed {
            Self::CLOSED_KIND
        } else {
            Self::OPEN_KIND
        }
    }

    fn core(&self) -> &AnnotationCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut AnnotationCore {
        &mut self.core
    }

    fn paint(&self, painter: &mut dyn Painter, defaults: &StyleDefaults) {
        let style = self.core.style.resolve(defaults);
        if self.closed
            && let Some(fill) = style.background
        {
            hatch_polygon(painter, &self.core.points, fill);
        }
        stroke(
            painter,
            &self.core.points,
            self.closed,
            style.foreground,
            style.line_width,
            style.dash,
        );
    }

    fn hit_test(&self, point: Vec2, tolerance: f32, defaults: &StyleDefaults) -> bool {
        let threshold = tolerance + stroke_slack(&self.core.style, defaults);
        point_near_polyline(point, &self.core.points, self.closed, threshold)
            || (self.closed && point_in_polygon(point, &self.core.points))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::annotation::tests::RecordingPainter;

    fn triangle(closed: bool) -> Polyline {
        let mut shape = if closed {
            Polyline::closed()
        } else {
            Polyline::open()
        };
        shape.core.points = vec![Vec2::ZERO, Vec2::new(20.0, 0.0), Vec2::new(10.0, 20.0)];
        shape
    }

    #[test]
    fn test_kind_follows_closedness() {
        assert_eq!(Polyline::open().kind(), "polyline");
        assert_eq!(Polyline::closed().kind(), "polygon");
        assert!(Polyline::closed().is_closed());
    }

    #[test]
    fn test_open_polyline_has_no_closing_edge() {
        let open = triangle(false);
        let closed = triangle(true);
        // Midpoint of the closing edge (10,20)->(0,0)
        let on_closing_edge = Vec2::new(5.0, 10.0);
        assert!(!open.hit_test(on_closing_edge, 1.0, &StyleDefaults::default()));
        assert!(closed.hit_test(on_closing_edge, 1.0, &StyleDefaults::default()));
    }

    #[test]
    fn test_polygon_interior_hits() {
        assert!(triangle(true).hit_test(Vec2::new(10.0, 5.0), 0.0, &StyleDefaults::default()));
        assert!(!triangle(false).hit_test(Vec2::new(10.0, 5.0), 0.0, &StyleDefaults::default()));
    }

    #[test]
    fn test_paint_segment_counts() {
        let mut painter = RecordingPainter::default();
        triangle(false).paint(&mut painter, &StyleDefaults::default());
        assert_eq!(painter.lines.len(), 2);

        let mut painter = RecordingPainter::default();
        triangle(true).paint(&mut painter, &StyleDefaults::default());
        assert_eq!(painter.lines.len(), 3);
    }
}
