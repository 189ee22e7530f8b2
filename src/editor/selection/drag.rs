//! Drag operations - move a whole annotation or one of its vertices.

use bevy::prelude::*;

use crate::editor::params::CameraParams;
use crate::error::MutationError;
use crate::layer::AnnotationLayer;

use super::{ActiveDrag, DragState, DragTarget};

pub fn handle_drag(
    mouse_button: Res<ButtonInput<MouseButton>>,
    camera: CameraParams,
    mut layer: ResMut<AnnotationLayer>,
    mut drag_state: ResMut<DragState>,
) {
    let Some(mut drag) = drag_state.active else {
        return;
    };

    if let Some(world_pos) = camera.cursor_world_pos() {
        drag.current = world_pos;
    }

    if mouse_button.pressed(MouseButton::Left) {
        drag_state.active = Some(drag);
        return;
    }

    // Released: write the whole drag as a single edit
    drag_state.active = None;
    if drag.delta() == Vec2::ZERO {
        return;
    }
    if let Err(e) = commit_drag(&mut layer, drag) {
        warn!("Could not move annotation {}: {}", drag.item, e);
    }
}

fn commit_drag(layer: &mut AnnotationLayer, drag: ActiveDrag) -> Result<(), MutationError> {
    let mut item = layer.edit(drag.item)?;
    match drag.target {
        DragTarget::Body => item.translate(drag.delta()),
        DragTarget::Vertex(index) => {
            let len = item.points().len();
            let point = item
                .points()
                .get(index)
                .copied()
                .ok_or(MutationError::IndexOutOfRange { index, len })?;
            item.set_point(index, point + drag.delta())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::annotation::{AnnotationId, AnnotationState, Polyline};

    fn layer_with_polyline() -> (AnnotationLayer, AnnotationId) {
        let mut layer = AnnotationLayer::with_builtin_variants().unwrap();
        let state = AnnotationState {
            points: vec![Vec2::ZERO, Vec2::new(10.0, 0.0), Vec2::new(10.0, 10.0)],
            ..default()
        };
        let id = layer
            .add_item_with(Polyline::OPEN_KIND, state)
            .unwrap()
            .id();
        (layer, id)
    }

    fn drag(item: AnnotationId, target: DragTarget, delta: Vec2) -> ActiveDrag {
        ActiveDrag {
            item,
            target,
            start: Vec2::new(1.0, 1.0),
            current: Vec2::new(1.0, 1.0) + delta,
        }
    }

    #[test]
    fn test_body_drag_is_one_translate() {
        let (mut layer, id) = layer_with_polyline();
        let before = layer.history().undo_count();

        commit_drag(&mut layer, drag(id, DragTarget::Body, Vec2::new(5.0, 5.0))).unwrap();

        assert_eq!(layer.get(id).unwrap().points()[0], Vec2::new(5.0, 5.0));
        assert_eq!(layer.history().undo_count(), before + 1);
    }

    #[test]
    fn test_vertex_drag_moves_one_point() {
        let (mut layer, id) = layer_with_polyline();

        commit_drag(&mut layer, drag(id, DragTarget::Vertex(1), Vec2::new(0.0, -3.0))).unwrap();

        let points = layer.get(id).unwrap().points().to_vec();
        assert_eq!(points[0], Vec2::ZERO);
        assert_eq!(points[1], Vec2::new(10.0, -3.0));
        assert_eq!(layer.history().undo_description(), Some("Move point"));
    }

    #[test]
    fn test_drag_of_missing_vertex_fails() {
        let (mut layer, id) = layer_with_polyline();
        let result = commit_drag(&mut layer, drag(id, DragTarget::Vertex(9), Vec2::ONE));
        assert!(matches!(result, Err(MutationError::IndexOutOfRange { index: 9, .. })));
    }
}
