//! Selection handling - click to select, start dragging.

use bevy::prelude::*;
use bevy_egui::EguiContexts;

use crate::constants::HANDLE_SIZE;
use crate::editor::annotations::AnnotationSettings;
use crate::editor::params::{is_cursor_over_ui, CameraWithProjection};
use crate::editor::tools::{CurrentTool, EditorTool, ToolBinding};
use crate::history::{SelectionState, ToolController};
use crate::layer::AnnotationLayer;

use super::{AnnotationSelection, DragTarget};

#[allow(clippy::too_many_arguments)]
pub fn handle_selection(
    mouse_button: Res<ButtonInput<MouseButton>>,
    current_tool: Res<CurrentTool>,
    camera: CameraWithProjection,
    layer: Res<AnnotationLayer>,
    settings: Res<AnnotationSettings>,
    mut selection: ResMut<AnnotationSelection>,
    mut tools: ToolBinding,
    mut contexts: EguiContexts,
) {
    if current_tool.tool != EditorTool::Select || !mouse_button.just_pressed(MouseButton::Left) {
        return;
    }

    // Don't interact if over UI
    if is_cursor_over_ui(&mut contexts) {
        return;
    }

    let Some(world_pos) = camera.cursor_world_pos() else {
        return;
    };

    // Handle and tolerance sizes are in screen pixels
    let camera_scale = camera.zoom_scale();

    // Vertex handles of the selected annotation take priority over bodies
    if let Some(id) = selection.get()
        && tools.bound.is_bound_to(id)
        && let Some(item) = layer.get(id)
        && let Some(index) = vertex_at(item.points(), world_pos, HANDLE_SIZE * camera_scale)
    {
        tools.drag.begin(id, DragTarget::Vertex(index), world_pos);
        return;
    }

    let tolerance = settings.hit_tolerance * camera_scale;
    match layer.hit_test(world_pos, tolerance, &settings.style_defaults()) {
        Some(id) => {
            if selection.get() != Some(id)
                && let Some(item) = layer.get(id)
            {
                selection.set_selected(Some(id));
                tools.activate_tool_for(item);
            }
            tools.drag.begin(id, DragTarget::Body, world_pos);
        }
        None => {
            if selection.get().is_some() {
                selection.clear();
                tools.deactivate();
            }
        }
    }
}

/// Index of the vertex nearest to `pos`, if any lies within `radius`.
pub(super) fn vertex_at(points: &[Vec2], pos: Vec2, radius: f32) -> Option<usize> {
    points
        .iter()
        .enumerate()
        .map(|(i, p)| (i, p.distance(pos)))
        .filter(|(_, d)| *d <= radius)
        .min_by(|a, b| a.1.total_cmp(&b.1))
        .map(|(i, _)| i)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vertex_at_picks_nearest() {
        let points = [Vec2::ZERO, Vec2::new(3.0, 0.0), Vec2::new(50.0, 0.0)];
        assert_eq!(vertex_at(&points, Vec2::new(2.0, 0.0), 4.0), Some(1));
        assert_eq!(vertex_at(&points, Vec2::new(0.5, 0.0), 4.0), Some(0));
        assert_eq!(vertex_at(&points, Vec2::new(25.0, 0.0), 4.0), None);
        assert_eq!(vertex_at(&[], Vec2::ZERO, 4.0), None);
    }
}
