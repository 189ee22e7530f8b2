//! Selection gizmo drawing - visual indicators for the selected annotation.

use bevy::gizmos::config::{GizmoConfigGroup, GizmoConfigStore};
use bevy::prelude::*;

use crate::constants::HANDLE_SIZE;
use crate::editor::annotations::AnnotationSettings;
use crate::editor::params::CameraWithProjection;
use crate::editor::tools::BoundTool;
use crate::layer::AnnotationLayer;

use super::{AnnotationSelection, DragState, DragTarget};

/// Padding between an annotation's bounds and its selection box (screen px)
const SELECTION_PADDING: f32 = 4.0;

const SELECTION_COLOR: Color = Color::srgb(0.2, 0.6, 1.0);
const ACTIVE_HANDLE_COLOR: Color = Color::srgb(1.0, 0.8, 0.2);

/// Custom gizmo group for selection indicators
#[derive(Default, Reflect, GizmoConfigGroup)]
pub struct SelectionGizmoGroup;

/// Selection outlines stay thin regardless of annotation widths
pub fn configure_selection_gizmos(mut config_store: ResMut<GizmoConfigStore>) {
    let (config, _) = config_store.config_mut::<SelectionGizmoGroup>();
    config.line.width = 1.5;
}

pub fn draw_selection_indicators(
    mut gizmos: Gizmos<SelectionGizmoGroup>,
    layer: Res<AnnotationLayer>,
    selection: Res<AnnotationSelection>,
    bound: Res<BoundTool>,
    drag_state: Res<DragState>,
    settings: Res<AnnotationSettings>,
    camera: CameraWithProjection,
) {
    let Some(id) = selection.get() else {
        return;
    };
    let Some(item) = layer.get(id) else {
        return;
    };

    let camera_scale = camera.zoom_scale();
    let offset = drag_state.body_offset(id);

    if let Some(bounds) = item.bounds(&settings.style_defaults()) {
        let padding = Vec2::splat(SELECTION_PADDING * camera_scale * 2.0);
        gizmos.rect_2d(
            Isometry2d::from_translation(bounds.center() + offset),
            bounds.size() + padding,
            SELECTION_COLOR,
        );
    }

    // Vertex handles only while an editing tool is bound to the item
    if !bound.is_bound_to(id) {
        return;
    }

    let dragged_vertex = drag_state.active.and_then(|drag| match drag.target {
        DragTarget::Vertex(index) if drag.item == id => Some((index, drag.delta())),
        _ => None,
    });

    let handle = Vec2::splat(HANDLE_SIZE * camera_scale);
    for (index, point) in item.points().iter().enumerate() {
        let position = *point + offset;
        match dragged_vertex {
            Some((dragged, delta)) if dragged == index => {
                let target = position + delta;
                gizmos.line_2d(position, target, ACTIVE_HANDLE_COLOR);
                gizmos.rect_2d(
                    Isometry2d::from_translation(target),
                    handle,
                    ACTIVE_HANDLE_COLOR,
                );
            }
            _ => {
                gizmos.rect_2d(Isometry2d::from_translation(position), handle, SELECTION_COLOR);
            }
        }
    }
}
