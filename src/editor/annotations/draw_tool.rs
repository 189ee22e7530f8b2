//! Draw tool system for freehand lines.

use bevy::prelude::*;
use bevy_egui::EguiContexts;

use crate::annotation::{AnnotationId, AnnotationState, FreeLine, Style};
use crate::error::FactoryError;
use crate::layer::AnnotationLayer;

use super::super::params::{is_cursor_over_ui, CameraParams};
use super::super::tools::EditorTool;
use super::state::{AnnotationResources, DrawState};

/// Minimum distance between recorded points (reduces point count)
const MIN_POINT_SPACING: f32 = 2.0;

/// Adds a finished shape to the layer as a single creation step.
pub(super) fn commit_points(
    layer: &mut AnnotationLayer,
    kind: &str,
    points: Vec<Vec2>,
    style: Style,
) -> Result<AnnotationId, FactoryError> {
    let state = AnnotationState {
        points,
        style,
        ..default()
    };
    let item = layer.add_item_with(kind, state)?;
    debug!("Created {} {}", item.kind(), item.id());
    Ok(item.id())
}

fn finish_stroke(res: &mut AnnotationResources, draw_state: &mut DrawState) {
    draw_state.is_drawing = false;
    let points = std::mem::take(&mut draw_state.current_points);
    if points.len() < 2 {
        return;
    }
    let style = res.settings.new_item_style();
    if let Err(e) = commit_points(&mut res.layer, FreeLine::KIND, points, style) {
        warn!("Could not create freehand line: {}", e);
    }
}

pub fn handle_draw(
    mut res: AnnotationResources,
    mut draw_state: ResMut<DrawState>,
    camera: CameraParams,
    mut contexts: EguiContexts,
) {
    if res.current_tool.tool != EditorTool::Draw {
        // If we were drawing but switched tools, finalize
        if draw_state.is_drawing {
            finish_stroke(&mut res, &mut draw_state);
        }
        return;
    }

    if is_cursor_over_ui(&mut contexts) && !draw_state.is_drawing {
        return;
    }

    let Some(world_pos) = camera.cursor_world_pos() else {
        return;
    };

    if res.mouse_button.just_pressed(MouseButton::Left) {
        draw_state.is_drawing = true;
        draw_state.current_points.clear();
        draw_state.current_points.push(world_pos);
    } else if res.mouse_button.pressed(MouseButton::Left) && draw_state.is_drawing {
        if let Some(last) = draw_state.current_points.last()
            && world_pos.distance(*last) > MIN_POINT_SPACING
        {
            draw_state.current_points.push(world_pos);
        }
    } else if res.mouse_button.just_released(MouseButton::Left) && draw_state.is_drawing {
        draw_state.current_points.push(world_pos);
        finish_stroke(&mut res, &mut draw_state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::history::RecordKind;

    #[test]
    fn test_commit_points_is_one_create_record() {
        let mut layer = AnnotationLayer::with_builtin_variants().unwrap();
        let points = vec![Vec2::ZERO, Vec2::new(3.0, 1.0), Vec2::new(6.0, 4.0)];
        let style = Style::default().with_line_width(2.0);

        let id = commit_points(&mut layer, FreeLine::KIND, points.clone(), style.clone()).unwrap();

        let item = layer.get(id).unwrap();
        assert_eq!(item.points(), points.as_slice());
        assert_eq!(item.style(), &style);
        assert_eq!(layer.history().undo_count(), 1);
        assert_eq!(layer.history().records()[0].kind, RecordKind::Create);
    }

    #[test]
    fn test_commit_points_rejects_unknown_kind() {
        let mut layer = AnnotationLayer::with_builtin_variants().unwrap();
        let result = commit_points(&mut layer, "hexagon", vec![Vec2::ZERO], Style::default());
        assert!(matches!(result, Err(FactoryError::UnknownKind(_))));
        assert!(layer.is_empty());
        assert!(!layer.history().can_undo());
    }
}
