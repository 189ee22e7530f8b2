//! Shape tool system for arrows, rectangles and ellipses.
//!
//! Press to set the first corner, drag, release to place the second.
//! Right click cancels a shape in progress.

use bevy::prelude::*;
use bevy_egui::EguiContexts;

use crate::annotation::Arrow;
use crate::constants::MIN_SHAPE_SIZE;

use super::super::params::{is_cursor_over_ui, CameraWithProjection};
use super::draw_tool::commit_points;
use super::state::{AnnotationResources, ShapeDrawState};

/// Whether a drag from `start` to `end` is large enough to become a shape.
///
/// Arrows need length, rectangles and ellipses need both extents.
fn is_large_enough(kind: &str, start: Vec2, end: Vec2, min_size: f32) -> bool {
    let extent = (end - start).abs();
    if kind == Arrow::KIND {
        start.distance(end) >= min_size
    } else {
        extent.x >= min_size && extent.y >= min_size
    }
}

pub fn handle_shape(
    mut res: AnnotationResources,
    mut shape_state: ResMut<ShapeDrawState>,
    camera: CameraWithProjection,
    mut contexts: EguiContexts,
) {
    let tool = res.current_tool.tool;
    let Some(kind) = tool.creates_kind().filter(|_| tool.is_two_point()) else {
        shape_state.start = None;
        return;
    };

    // Right click cancels
    if res.mouse_button.just_pressed(MouseButton::Right) {
        shape_state.start = None;
        return;
    }

    let Some(world_pos) = camera.cursor_world_pos() else {
        return;
    };

    if res.mouse_button.just_pressed(MouseButton::Left) {
        if !is_cursor_over_ui(&mut contexts) {
            shape_state.start = Some(world_pos);
        }
        return;
    }

    if !res.mouse_button.just_released(MouseButton::Left) {
        return;
    }

    let Some(start) = shape_state.start.take() else {
        return;
    };

    // Minimum size is in screen pixels
    let min_size = MIN_SHAPE_SIZE * camera.zoom_scale();
    if !is_large_enough(kind, start, world_pos, min_size) {
        debug!("Discarded {} smaller than {:.1}", kind, min_size);
        return;
    }

    let style = res.settings.new_item_style();
    if let Err(e) = commit_points(&mut res.layer, kind, vec![start, world_pos], style) {
        warn!("Could not create {}: {}", kind, e);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flat_rectangle_is_too_small() {
        let start = Vec2::ZERO;
        assert!(!is_large_enough("rectangle", start, Vec2::new(50.0, 1.0), 2.0));
        assert!(is_large_enough("rectangle", start, Vec2::new(-5.0, 3.0), 2.0));
    }

    #[test]
    fn test_horizontal_arrow_is_large_enough() {
        assert!(is_large_enough("arrow", Vec2::ZERO, Vec2::new(50.0, 0.0), 2.0));
        assert!(!is_large_enough("arrow", Vec2::ZERO, Vec2::new(1.0, 1.0), 2.0));
    }
}
