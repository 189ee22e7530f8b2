//! Geometry helpers for painting and hit testing annotations.

use std::f32::consts::TAU;

use bevy::prelude::*;

use super::style::DashPattern;
use super::Painter;

/// Segments used to approximate a full ellipse outline.
const ELLIPSE_SEGMENTS: usize = 48;

/// Distance between background hatch lines (world units)
const HATCH_SPACING: f32 = 6.0;

/// Check if a point is within a given distance of a line segment
pub fn point_near_segment(point: Vec2, seg_start: Vec2, seg_end: Vec2, threshold: f32) -> bool {
    let line_vec = seg_end - seg_start;
    let line_len_sq = line_vec.length_squared();

    if line_len_sq < 0.0001 {
        // Segment is essentially a point
        return point.distance(seg_start) <= threshold;
    }

    // Project point onto line, clamped to segment
    let t = ((point - seg_start).dot(line_vec) / line_len_sq).clamp(0.0, 1.0);
    let projection = seg_start + line_vec * t;

    point.distance(projection) <= threshold
}

/// Check if a point is near any segment of a polyline
pub fn point_near_polyline(point: Vec2, points: &[Vec2], closed: bool, threshold: f32) -> bool {
    match points {
        [] => false,
        [only] => point.distance(*only) <= threshold,
        _ => {
            let near_open = points
                .windows(2)
                .any(|w| point_near_segment(point, w[0], w[1], threshold));
            near_open
                || (closed
                    && point_near_segment(point, points[points.len() - 1], points[0], threshold))
        }
    }
}

/// Even-odd containment test for a closed polygon
pub fn point_in_polygon(point: Vec2, polygon: &[Vec2]) -> bool {
    if polygon.len() < 3 {
        return false;
    }

    let mut inside = false;
    let mut j = polygon.len() - 1;
    for i in 0..polygon.len() {
        let (a, b) = (polygon[i], polygon[j]);
        if (a.y > point.y) != (b.y > point.y)
            && point.x < (b.x - a.x) * (point.y - a.y) / (b.y - a.y) + a.x
        {
            inside = !inside;
        }
        j = i;
    }
    inside
}

/// Bounding box of a point list, `None` when empty
pub fn points_bounds(points: &[Vec2]) -> Option<Rect> {
    let (first, rest) = points.split_first()?;
    let (min, max) = rest
        .iter()
        .fold((*first, *first), |(min, max), &p| (min.min(p), max.max(p)));
    Some(Rect::from_corners(min, max))
}

/// Rectangle spanned by the first two points
pub fn corner_rect(points: &[Vec2]) -> Option<Rect> {
    match points {
        [a, b, ..] => Some(Rect::from_corners(*a, *b)),
        _ => None,
    }
}

/// Check if a point is inside an axis-aligned ellipse inscribed in `rect`,
/// grown by `threshold` on both radii
pub fn point_in_ellipse(point: Vec2, rect: Rect, threshold: f32) -> bool {
    let radii = rect.half_size() + Vec2::splat(threshold);
    if radii.x <= 0.0 || radii.y <= 0.0 {
        return false;
    }
    let d = (point - rect.center()) / radii;
    d.length_squared() <= 1.0
}

/// Outline of an axis-aligned ellipse inscribed in `rect`
pub fn ellipse_outline(rect: Rect) -> Vec<Vec2> {
    let center = rect.center();
    let radii = rect.half_size();
    (0..ELLIPSE_SEGMENTS)
        .map(|i| {
            let angle = TAU * i as f32 / ELLIPSE_SEGMENTS as f32;
            center + Vec2::new(angle.cos(), angle.sin()) * radii
        })
        .collect()
}

/// Corners of a rectangle in drawing order
pub fn rect_outline(rect: Rect) -> Vec<Vec2> {
    vec![
        rect.min,
        Vec2::new(rect.max.x, rect.min.y),
        rect.max,
        Vec2::new(rect.min.x, rect.max.y),
    ]
}

/// Stroke a polyline, splitting it into dashes when a pattern is given.
///
/// The dash phase carries across vertices so corners do not restart the
/// pattern.
pub fn stroke(
    painter: &mut dyn Painter,
    points: &[Vec2],
    closed: bool,
    color: Color,
    width: f32,
    dash: Option<DashPattern>,
) {
    if points.len() < 2 {
        return;
    }

    let mut segments: Vec<(Vec2, Vec2)> = points.windows(2).map(|w| (w[0], w[1])).collect();
    if closed && points.len() > 2 {
        segments.push((points[points.len() - 1], points[0]));
    }

    let Some(pattern) = dash.filter(DashPattern::is_valid) else {
        for (a, b) in segments {
            painter.line(a, b, color, width);
        }
        return;
    };

    let period = pattern.dash + pattern.gap;
    let mut phase = 0.0_f32;
    for (a, b) in segments {
        let length = a.distance(b);
        if length <= f32::EPSILON {
            continue;
        }
        let dir = (b - a) / length;
        let mut travelled = 0.0_f32;
        while travelled < length {
            let in_dash = phase < pattern.dash;
            let remaining_in_state = if in_dash {
                pattern.dash - phase
            } else {
                period - phase
            };
            let step = remaining_in_state.min(length - travelled);
            if in_dash {
                painter.line(a + dir * travelled, a + dir * (travelled + step), color, width);
            }
            travelled += step;
            phase = (phase + step) % period;
        }
    }
}

/// Fill a rectangle with horizontal hatch lines
pub fn hatch_rect(painter: &mut dyn Painter, rect: Rect, color: Color) {
    let mut y = rect.min.y + HATCH_SPACING / 2.0;
    while y < rect.max.y {
        painter.line(Vec2::new(rect.min.x, y), Vec2::new(rect.max.x, y), color, 1.0);
        y += HATCH_SPACING;
    }
}

/// Fill an ellipse inscribed in `rect` with horizontal hatch lines
pub fn hatch_ellipse(painter: &mut dyn Painter, rect: Rect, color: Color) {
    let center = rect.center();
    let radii = rect.half_size();
    if radii.x <= 0.0 || radii.y <= 0.0 {
        return;
    }
    let mut y = rect.min.y + HATCH_SPACING / 2.0;
    while y < rect.max.y {
        let dy = (y - center.y) / radii.y;
        let half_chord = radii.x * (1.0 - dy * dy).max(0.0).sqrt();
        painter.line(
            Vec2::new(center.x - half_chord, y),
            Vec2::new(center.x + half_chord, y),
            color,
            1.0,
        );
        y += HATCH_SPACING;
    }
}

/// Fill a closed polygon with horizontal hatch lines (even-odd rule)
pub fn hatch_polygon(painter: &mut dyn Painter, polygon: &[Vec2], color: Color) {
    let Some(bounds) = points_bounds(polygon) else {
        return;
    };
    if polygon.len() < 3 {
        return;
    }

    let mut y = bounds.min.y + HATCH_SPACING / 2.0;
    while y < bounds.max.y {
        let mut crossings: Vec<f32> = Vec::new();
        let mut j = polygon.len() - 1;
        for i in 0..polygon.len() {
            let (a, b) = (polygon[i], polygon[j]);
            if (a.y > y) != (b.y > y) {
                crossings.push(a.x + (y - a.y) * (b.x - a.x) / (b.y - a.y));
            }
            j = i;
        }
        crossings.sort_by(f32::total_cmp);
        for pair in crossings.chunks_exact(2) {
            painter.line(Vec2::new(pair[0], y), Vec2::new(pair[1], y), color, 1.0);
        }
        y += HATCH_SPACING;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::annotation::tests::RecordingPainter;

    #[test]
    fn test_hatch_polygon_stays_inside() {
        let mut painter = RecordingPainter::default();
        let triangle = [Vec2::ZERO, Vec2::new(20.0, 0.0), Vec2::new(10.0, 20.0)];
        hatch_polygon(&mut painter, &triangle, Color::WHITE);
        assert!(!painter.lines.is_empty());
        for (a, b, _, _) in &painter.lines {
            assert!(a.x <= b.x);
            assert!(point_in_polygon((*a + *b) / 2.0, &triangle));
        }
    }

    #[test]
    fn test_point_near_segment() {
        let a = Vec2::ZERO;
        let b = Vec2::new(10.0, 0.0);
        assert!(point_near_segment(Vec2::new(5.0, 2.0), a, b, 3.0));
        assert!(!point_near_segment(Vec2::new(5.0, 5.0), a, b, 3.0));
        // Past the end of the segment
        assert!(!point_near_segment(Vec2::new(15.0, 0.0), a, b, 3.0));
    }

    #[test]
    fn test_degenerate_segment_is_a_point() {
        assert!(point_near_segment(Vec2::new(1.0, 1.0), Vec2::ZERO, Vec2::ZERO, 2.0));
    }

    #[test]
    fn test_point_in_polygon() {
        let square = [
            Vec2::ZERO,
            Vec2::new(10.0, 0.0),
            Vec2::new(10.0, 10.0),
            Vec2::new(0.0, 10.0),
        ];
        assert!(point_in_polygon(Vec2::new(5.0, 5.0), &square));
        assert!(!point_in_polygon(Vec2::new(15.0, 5.0), &square));
        assert!(!point_in_polygon(Vec2::new(5.0, 5.0), &square[..2]));
    }

    #[test]
    fn test_points_bounds() {
        assert!(points_bounds(&[]).is_none());
        let bounds = points_bounds(&[Vec2::new(3.0, -1.0), Vec2::new(-2.0, 4.0)]).unwrap();
        assert_eq!(bounds.min, Vec2::new(-2.0, -1.0));
        assert_eq!(bounds.max, Vec2::new(3.0, 4.0));
    }

    #[test]
    fn test_point_in_ellipse() {
        let rect = Rect::from_corners(Vec2::ZERO, Vec2::new(20.0, 10.0));
        assert!(point_in_ellipse(Vec2::new(10.0, 5.0), rect, 0.0));
        // Corner of the bounding box is outside the ellipse
        assert!(!point_in_ellipse(Vec2::new(0.5, 0.5), rect, 0.0));
    }

    #[test]
    fn test_solid_stroke_emits_one_line_per_segment() {
        let mut painter = RecordingPainter::default();
        let points = [Vec2::ZERO, Vec2::X * 10.0, Vec2::new(10.0, 10.0)];
        stroke(&mut painter, &points, true, Color::WHITE, 1.0, None);
        assert_eq!(painter.lines.len(), 3);
    }

    #[test]
    fn test_dashed_stroke_splits_segments() {
        let mut painter = RecordingPainter::default();
        let points = [Vec2::ZERO, Vec2::new(30.0, 0.0)];
        stroke(
            &mut painter,
            &points,
            false,
            Color::WHITE,
            1.0,
            Some(DashPattern::new(5.0, 5.0)),
        );
        // 0-5, 10-15, 20-25
        assert_eq!(painter.lines.len(), 3);
        assert_eq!(painter.lines[1].0, Vec2::new(10.0, 0.0));
        assert_eq!(painter.lines[1].1, Vec2::new(15.0, 0.0));
    }

    #[test]
    fn test_ellipse_outline_stays_inside_rect() {
        let rect = Rect::from_corners(Vec2::ZERO, Vec2::new(8.0, 4.0));
        for p in ellipse_outline(rect) {
            assert!(p.x >= -0.001 && p.x <= 8.001);
            assert!(p.y >= -0.001 && p.y <= 4.001);
        }
    }
}
