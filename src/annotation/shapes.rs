//! Rectangle and ellipse annotations, each spanned by two corner points.

use bevy::prelude::*;

use super::geometry::{
    corner_rect, ellipse_outline, hatch_ellipse, hatch_rect, point_in_ellipse, rect_outline,
    stroke,
};
use super::{stroke_slack, Annotation, AnnotationCore, Painter, StyleDefaults};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RectangleShape {
    pub(crate) core: AnnotationCore,
}

impl RectangleShape {
    pub const KIND: &'static str = "rectangle";
}

impl Annotation for RectangleShape {
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
        let Some(rect) = corner_rect(&self.core.points) else {
            return;
        };
        let style = self.core.style.resolve(defaults);
        if let Some(fill) = style.background {
            hatch_rect(painter, rect, fill);
        }
        stroke(
            painter,
            &rect_outline(rect),
            true,
            style.foreground,
            style.line_width,
            style.dash,
        );
    }

    fn hit_test(&self, point: Vec2, tolerance: f32, defaults: &StyleDefaults) -> bool {
        corner_rect(&self.core.points)
            .map(|rect| {
                rect.inflate(tolerance + stroke_slack(&self.core.style, defaults))
                    .contains(point)
            })
            .unwrap_or(false)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct EllipseShape {
    pub(crate) core: AnnotationCore,
}

impl EllipseShape {
    pub const KIND: &'static str = "ellipse";
}

impl Annotation for EllipseShape {
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
        let Some(rect) = corner_rect(&self.core.points) else {
            return;
        };
        let style = self.core.style.resolve(defaults);
        if let Some(fill) = style.background {
            hatch_ellipse(painter, rect, fill);
        }
        stroke(
            painter,
            &ellipse_outline(rect),
            true,
            style.foreground,
            style.line_width,
            style.dash,
        );
    }

    fn hit_test(&self, point: Vec2, tolerance: f32, defaults: &StyleDefaults) -> bool {
        corner_rect(&self.core.points)
            .map(|rect| {
                point_in_ellipse(point, rect, tolerance + stroke_slack(&self.core.style, defaults))
            })
            .unwrap_or(false)
    }
}
